use bigdecimal::{BigDecimal, Zero};
use std::collections::HashMap;
use std::str::FromStr;

use crate::models::Product;

/// 内置价格表 (服务端未给出价格时使用)
const DEFAULT_PRICES: &[(&str, &str)] = &[
    ("tea_TajMahal_tea", "2.99"),
    ("dettol", "185"),
    ("tea_RedLabel", "135"),
    ("Maggi", "15"),
    ("coffee_Bru", "300"),
    ("Masala_SakthiTurmeric", "45"),
    ("Toothpaste-Colgate", "149"),
    ("RKG_ghee", "62"),
    ("napkins_stayfree", "84"),
    ("napkins_Whisper", "44"),
    ("Mysore Sandal Soap 125 g", "42"),
];

/// 商品价格目录
#[derive(Debug, Clone, Default)]
pub struct PriceCatalog {
    prices: HashMap<String, BigDecimal>,
}

impl PriceCatalog {
    pub fn new() -> Self {
        Self { prices: HashMap::new() }
    }

    /// 带内置价格的目录
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();
        for (name, price) in DEFAULT_PRICES {
            if let Ok(price) = BigDecimal::from_str(price) {
                catalog.insert(*name, price);
            }
        }
        catalog
    }

    pub fn insert(&mut self, name: impl Into<String>, price: BigDecimal) {
        self.prices.insert(name.into(), price);
    }

    pub fn price_of(&self, name: &str) -> Option<&BigDecimal> {
        self.prices.get(name)
    }

    /// 用服务端商品目录覆盖本地价格，返回更新条数
    pub fn merge_products(&mut self, products: &[Product]) -> usize {
        let mut merged = 0;
        for product in products {
            match price_from_f64(product.price) {
                Some(price) => {
                    self.insert(product.name.clone(), price);
                    merged += 1;
                }
                None => {
                    tracing::warn!("Skipping product {} with invalid price {}", product.name, product.price);
                }
            }
        }
        merged
    }

    /// 定价：服务端价格优先，其次目录价格，都没有时为 0
    pub fn resolve(&self, name: &str, server_price: Option<f64>) -> BigDecimal {
        if let Some(price) = server_price.and_then(price_from_f64) {
            return price;
        }
        match self.price_of(name) {
            Some(price) => price.clone(),
            None => {
                tracing::warn!("No price known for {}, using 0", name);
                BigDecimal::zero()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

/// 非有限值或负数视为无效价格
fn price_from_f64(value: f64) -> Option<BigDecimal> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    BigDecimal::from_str(&value.to_string()).ok()
}
