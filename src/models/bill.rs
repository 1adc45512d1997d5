use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// 账单分组行 (商品名 -> 数量)，发送给结算接口
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillLine {
    pub name: String,
    pub quantity: u32,
}

/// `POST /print_bill` 请求体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintBillRequest {
    pub items: Vec<BillLine>,
}

/// 结算成功响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintedBill {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub items: Vec<PrintedLine>,
    pub total: BigDecimal,
}

/// 结算明细行 (服务端按库存价格计算)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintedLine {
    pub name: String,
    pub quantity: u32,
    pub unit_price: BigDecimal,
    pub subtotal: BigDecimal,
}

/// 结算失败响应 (非 2xx)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintErrorBody {
    pub error: String,
}

/// 商品目录项 (`GET /products`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub quantity: i64,
}
