//! 外部协作者接口
//!
//! 相机、检测服务、结算服务都只通过这里的窄接口访问。

pub mod camera;
pub mod http;

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::models::{BillLine, DetectionOutcome, PrintedBill};

pub use camera::{Camera, CapturedImage, DirectoryCamera};
pub use http::HttpCheckoutClient;

/// 检测服务适配器
///
/// 每次调用只发送一张图片，不自动重试。所有失败都编码进 [`DetectionOutcome`]。
#[async_trait]
pub trait DetectionGateway: Send + Sync {
    async fn detect(&self, image: CapturedImage) -> DetectionOutcome;
}

/// 结算服务适配器
#[async_trait]
pub trait BillingGateway: Send + Sync {
    async fn print_bill(&self, items: &[BillLine]) -> Result<PrintedBill>;
}

// 同一个客户端同时充当检测和结算适配器
#[async_trait]
impl<T: DetectionGateway + ?Sized> DetectionGateway for Arc<T> {
    async fn detect(&self, image: CapturedImage) -> DetectionOutcome {
        (**self).detect(image).await
    }
}

#[async_trait]
impl<T: BillingGateway + ?Sized> BillingGateway for Arc<T> {
    async fn print_bill(&self, items: &[BillLine]) -> Result<PrintedBill> {
        (**self).print_bill(items).await
    }
}
