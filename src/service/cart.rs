use bigdecimal::{BigDecimal, Zero};
use indexmap::IndexMap;

use crate::models::{BillLine, CartItem, LineId};

/// 购物车：按加入顺序保存每一件商品
///
/// 合计金额永远从列表实时计算，不单独缓存，删除后不会出现偏差。
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    items: Vec<CartItem>,
}

impl CartStore {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// 追加一件商品 (不去重、不合并数量)
    pub fn add(&mut self, item: CartItem) {
        tracing::debug!("Cart add {} {} @ {}", item.id(), item.name(), item.unit_price());
        self.items.push(item);
    }

    /// 按ID删除第一件匹配的商品，不存在时不做任何事
    pub fn remove(&mut self, id: LineId) -> Option<CartItem> {
        let pos = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(pos))
    }

    /// 合计 = 所有商品单价之和，空购物车为 0
    pub fn total(&self) -> BigDecimal {
        self.items
            .iter()
            .fold(BigDecimal::zero(), |acc, item| acc + item.unit_price())
    }

    /// 按商品名分组计数，顺序为首次出现顺序
    pub fn grouped_for_billing(&self) -> IndexMap<String, BillLine> {
        let mut grouped: IndexMap<String, BillLine> = IndexMap::new();
        for item in &self.items {
            grouped
                .entry(item.name().to_string())
                .or_insert_with(|| BillLine {
                    name: item.name().to_string(),
                    quantity: 0,
                })
                .quantity += 1;
        }
        grouped
    }

    /// 结算接口需要的行列表
    pub fn bill_lines(&self) -> Vec<BillLine> {
        self.grouped_for_billing().into_values().collect()
    }

    /// 清空购物车 (幂等)
    pub fn clear(&mut self) {
        if !self.items.is_empty() {
            tracing::info!("Cart cleared, {} items dropped", self.items.len());
        }
        self.items.clear();
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn item(id: u64, name: &str, price: &str) -> CartItem {
        CartItem::new(LineId(id), name, BigDecimal::from_str(price).unwrap(), 0.9)
    }

    fn sum_of(cart: &CartStore) -> BigDecimal {
        cart.items()
            .iter()
            .map(|i| i.unit_price().clone())
            .fold(BigDecimal::zero(), |a, b| a + b)
    }

    #[test]
    fn test_empty_total_is_zero() {
        let cart = CartStore::new();
        assert_eq!(cart.total(), BigDecimal::zero());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_total_tracks_interleaved_mutations() {
        let mut cart = CartStore::new();
        cart.add(item(1, "tea_RedLabel", "135"));
        cart.add(item(2, "tea_TajMahal_tea", "2.99"));
        assert_eq!(cart.total(), BigDecimal::from_str("137.99").unwrap());

        cart.remove(LineId(1));
        assert_eq!(cart.total(), sum_of(&cart));
        assert_eq!(cart.total(), BigDecimal::from_str("2.99").unwrap());

        cart.add(item(3, "Maggi", "15"));
        cart.add(item(4, "Maggi", "15"));
        cart.remove(LineId(3));
        assert_eq!(cart.total(), sum_of(&cart));
        assert_eq!(cart.total(), BigDecimal::from_str("17.99").unwrap());

        cart.clear();
        assert_eq!(cart.total(), BigDecimal::zero());

        cart.add(item(5, "dettol", "185"));
        assert_eq!(cart.total(), BigDecimal::from(185));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut cart = CartStore::new();
        cart.clear();
        cart.add(item(1, "dettol", "185"));
        cart.clear();
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), BigDecimal::zero());
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut cart = CartStore::new();
        cart.add(item(1, "dettol", "185"));
        assert!(cart.remove(LineId(42)).is_none());
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total(), BigDecimal::from(185));
    }

    #[test]
    fn test_duplicates_are_separate_lines() {
        let mut cart = CartStore::new();
        cart.add(item(1, "Maggi", "15"));
        cart.add(item(2, "Maggi", "15"));
        assert_eq!(cart.len(), 2);

        cart.remove(LineId(2));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].id(), LineId(1));
    }

    #[test]
    fn test_grouped_for_billing_keeps_first_appearance_order() {
        let mut cart = CartStore::new();
        cart.add(item(1, "A", "1"));
        cart.add(item(2, "A", "1"));
        cart.add(item(3, "B", "2"));

        let lines = cart.bill_lines();
        assert_eq!(
            lines,
            vec![
                BillLine { name: "A".to_string(), quantity: 2 },
                BillLine { name: "B".to_string(), quantity: 1 },
            ]
        );

        let grouped = cart.grouped_for_billing();
        assert_eq!(grouped["A"].quantity, 2);
        assert_eq!(grouped["B"].quantity, 1);
    }

    #[test]
    fn test_items_keep_insertion_order_after_remove() {
        let mut cart = CartStore::new();
        cart.add(item(7, "A", "1"));
        cart.add(item(9, "B", "1"));
        cart.add(item(11, "C", "1"));
        cart.remove(LineId(9));

        let names: Vec<&str> = cart.items().iter().map(|i| i.name()).collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    #[derive(Debug, Clone)]
    enum CartOp {
        Add(String, u32),
        Remove(usize),
        RemoveMissing,
        Clear,
    }

    fn cart_op() -> impl Strategy<Value = CartOp> {
        prop_oneof![
            4 => ("[a-zA-Z_]{1,12}", 0u32..100_000).prop_map(|(name, cents)| CartOp::Add(name, cents)),
            2 => (0usize..32).prop_map(CartOp::Remove),
            1 => Just(CartOp::RemoveMissing),
            1 => Just(CartOp::Clear),
        ]
    }

    fn price_from_cents(cents: u32) -> BigDecimal {
        BigDecimal::from_str(&format!("{}.{:02}", cents / 100, cents % 100)).unwrap()
    }

    proptest! {
        #[test]
        fn total_matches_items_after_every_step(ops in proptest::collection::vec(cart_op(), 0..64)) {
            let mut cart = CartStore::new();
            let mut expected_cents: Vec<(LineId, u64)> = Vec::new();
            let mut next_id = 1u64;

            for op in ops {
                match op {
                    CartOp::Add(name, cents) => {
                        let id = LineId(next_id);
                        next_id += 1;
                        cart.add(CartItem::new(id, name, price_from_cents(cents), 0.5));
                        expected_cents.push((id, cents as u64));
                    }
                    CartOp::Remove(idx) => {
                        let id = cart.items().get(idx).map(|i| i.id()).unwrap_or(LineId(u64::MAX));
                        cart.remove(id);
                        expected_cents.retain(|(line, _)| *line != id);
                    }
                    CartOp::RemoveMissing => {
                        let before = cart.len();
                        prop_assert!(cart.remove(LineId(u64::MAX)).is_none());
                        prop_assert_eq!(cart.len(), before);
                    }
                    CartOp::Clear => {
                        cart.clear();
                        expected_cents.clear();
                        prop_assert_eq!(cart.total(), BigDecimal::zero());
                    }
                }

                prop_assert_eq!(cart.total(), sum_of(&cart));
                let cents: u64 = expected_cents.iter().map(|(_, c)| c).sum();
                prop_assert_eq!(cart.total(), BigDecimal::from(cents) / BigDecimal::from(100));
                prop_assert_eq!(cart.len(), expected_cents.len());
            }

            cart.clear();
            prop_assert_eq!(cart.total(), BigDecimal::zero());
        }
    }
}
