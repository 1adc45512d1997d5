//! 自助结账客户端错误类型

/// Result type alias
pub type Result<T> = std::result::Result<T, CheckoutError>;

/// 结账错误
///
/// 所有错误都可以由用户重新操作恢复，不会终止会话。
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    /// 检测服务正常返回，但未识别出商品
    #[error("No product detected: {0}")]
    NoProductDetected(String),

    /// 无法访问检测服务或响应无法解析
    #[error("Transport failure: {0}")]
    TransportFailure(String),

    /// 结算接口返回非 2xx 或响应格式错误
    #[error("Print failure: {0}")]
    PrintFailure(String),

    /// 账单未打开时请求结算
    #[error("Bill is not open")]
    BillNotOpen,

    /// 购物车为空时请求结算
    #[error("Cart is empty")]
    EmptyCart,

    /// 未获得相机权限
    #[error("Camera unavailable: permission not granted")]
    CameraUnavailable,

    /// 相机拍摄失败
    #[error("Camera error: {0}")]
    Camera(String),

    #[error("Config error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
