//! HttpCheckoutClient - 检测/结算服务 HTTP 适配器
//!
//! - `POST /`            上传图片，返回检测结果
//! - `POST /print_bill`  提交分组账单，服务端扣减库存并计算合计
//! - `GET  /products`    商品目录 (刷新本地价格表)

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::time::Duration;

use super::{BillingGateway, CapturedImage, DetectionGateway};
use crate::error::{CheckoutError, Result};
use crate::models::{
    BillLine, DetectResponse, DetectionOutcome, PrintBillRequest, PrintErrorBody, PrintedBill,
    Product, DEFAULT_NOT_DETECTED_REASON,
};
use crate::service::PriceCatalog;

/// 检测/结算服务客户端
pub struct HttpCheckoutClient {
    client: reqwest::Client,
    base_url: String,
    catalog: PriceCatalog,
}

impl HttpCheckoutClient {
    pub fn new(base_url: &str, timeout: Duration, catalog: PriceCatalog) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CheckoutError::TransportFailure(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            catalog,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn catalog(&self) -> &PriceCatalog {
        &self.catalog
    }

    /// 拉取服务端商品目录并合并到本地价格表
    pub async fn refresh_catalog(&mut self) -> Result<usize> {
        let products = self.fetch_products().await?;
        let merged = self.catalog.merge_products(&products);
        tracing::info!("Catalog refreshed: {} products merged", merged);
        Ok(merged)
    }

    pub async fn fetch_products(&self) -> Result<Vec<Product>> {
        let url = format!("{}/products", self.base_url);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CheckoutError::TransportFailure(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(CheckoutError::TransportFailure(format!(
                "product list failed: {}",
                resp.status()
            )));
        }

        resp.json::<Vec<Product>>()
            .await
            .map_err(|e| CheckoutError::TransportFailure(format!("malformed product list: {}", e)))
    }

    async fn request_detection(&self, image: CapturedImage) -> std::result::Result<DetectResponse, String> {
        let url = format!("{}/", self.base_url);

        let part = Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&image.mime)
            .map_err(|e| format!("invalid image mime type: {}", e))?;
        let form = Form::new().part("image", part);

        let resp = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| format!("Error connecting to detection service: {}", e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(format!("detection service returned {} - {}", status, body));
        }

        resp.json::<DetectResponse>()
            .await
            .map_err(|e| format!("malformed detection response: {}", e))
    }

    /// 只使用第一个检测到的物体，其余忽略
    fn interpret(&self, resp: DetectResponse) -> DetectionOutcome {
        let reason = || {
            resp.message
                .clone()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_NOT_DETECTED_REASON.to_string())
        };

        if !resp.success {
            return DetectionOutcome::NotDetected { reason: reason() };
        }

        match resp.objects.first() {
            Some(first) => {
                if resp.objects.len() > 1 {
                    tracing::debug!(
                        "Detection returned {} objects, using first ({})",
                        resp.objects.len(),
                        first.class_name
                    );
                }
                DetectionOutcome::Detected {
                    name: first.class_name.clone(),
                    unit_price: self.catalog.resolve(&first.class_name, first.price),
                    confidence: first.confidence,
                }
            }
            None => DetectionOutcome::NotDetected { reason: reason() },
        }
    }
}

#[async_trait]
impl DetectionGateway for HttpCheckoutClient {
    async fn detect(&self, image: CapturedImage) -> DetectionOutcome {
        match self.request_detection(image).await {
            Ok(resp) => {
                let outcome = self.interpret(resp);
                tracing::info!("Detection outcome: {:?}", outcome);
                outcome
            }
            Err(reason) => {
                tracing::error!("Detection error: {}", reason);
                DetectionOutcome::TransportFailure { reason }
            }
        }
    }
}

#[async_trait]
impl BillingGateway for HttpCheckoutClient {
    async fn print_bill(&self, items: &[BillLine]) -> Result<PrintedBill> {
        let url = format!("{}/print_bill", self.base_url);
        let body = PrintBillRequest { items: items.to_vec() };

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| CheckoutError::PrintFailure(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<PrintErrorBody>(&text)
                .map(|b| b.error)
                .unwrap_or_else(|_| format!("billing service returned {}", status));
            return Err(CheckoutError::PrintFailure(message));
        }

        resp.json::<PrintedBill>()
            .await
            .map_err(|e| CheckoutError::PrintFailure(format!("malformed bill response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DetectedObject;
    use bigdecimal::BigDecimal;

    fn client() -> HttpCheckoutClient {
        HttpCheckoutClient::new("http://127.0.0.1:9/", Duration::from_secs(1), PriceCatalog::with_defaults())
            .unwrap()
    }

    fn object(class: &str, confidence: f32, price: Option<f64>) -> DetectedObject {
        DetectedObject {
            class_name: class.to_string(),
            confidence,
            price,
            available_quantity: None,
        }
    }

    #[test]
    fn test_base_url_trimmed() {
        assert_eq!(client().base_url(), "http://127.0.0.1:9");
    }

    #[test]
    fn test_only_first_object_is_used() {
        let outcome = client().interpret(DetectResponse {
            success: true,
            objects: vec![object("tea_RedLabel", 0.92, None), object("dettol", 0.99, None)],
            message: None,
        });

        assert_eq!(
            outcome,
            DetectionOutcome::Detected {
                name: "tea_RedLabel".to_string(),
                unit_price: BigDecimal::from(135),
                confidence: 0.92,
            }
        );
    }

    #[test]
    fn test_empty_objects_uses_server_message() {
        let outcome = client().interpret(DetectResponse {
            success: true,
            objects: vec![],
            message: Some("No objects detected".to_string()),
        });
        assert_eq!(outcome, DetectionOutcome::NotDetected { reason: "No objects detected".to_string() });
    }

    #[test]
    fn test_unsuccessful_without_message_uses_generic_reason() {
        let outcome = client().interpret(DetectResponse {
            success: false,
            objects: vec![object("Maggi", 0.5, None)],
            message: None,
        });
        assert_eq!(
            outcome,
            DetectionOutcome::NotDetected { reason: DEFAULT_NOT_DETECTED_REASON.to_string() }
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_failure() {
        let outcome = client().detect(CapturedImage::jpeg(vec![1, 2, 3])).await;
        assert!(matches!(outcome, DetectionOutcome::TransportFailure { .. }));
    }
}
