use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 购物车行ID (会话内单调递增，不复用)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineId(pub u64);

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 购物车明细：一件商品
///
/// 创建后 name / unit_price 不可变，只有它在购物车中的成员关系会变化。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    id: LineId,
    name: String,
    unit_price: BigDecimal,
    confidence: f32,      // 仅供展示，不影响价格
    added_at: DateTime<Utc>,
}

impl CartItem {
    pub fn new(id: LineId, name: impl Into<String>, unit_price: BigDecimal, confidence: f32) -> Self {
        Self {
            id,
            name: name.into(),
            unit_price,
            confidence,
            added_at: Utc::now(),
        }
    }

    pub fn id(&self) -> LineId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_price(&self) -> &BigDecimal {
        &self.unit_price
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }
}

/// 按两位小数展示金额
pub fn format_money(amount: &BigDecimal) -> String {
    amount.round(2).with_scale(2).to_string()
}
