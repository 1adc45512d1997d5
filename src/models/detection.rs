use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::error::CheckoutError;

/// 未携带 message 时的默认提示
pub const DEFAULT_NOT_DETECTED_REASON: &str = "No product detected. Please try again.";

/// 单次拍照的检测结果
///
/// 每次拍照只会有一个变体：要么识别出商品，要么是错误，不会同时存在。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DetectionOutcome {
    Detected {
        name: String,
        unit_price: BigDecimal,
        confidence: f32,
    },
    NotDetected {
        reason: String,
    },
    TransportFailure {
        reason: String,
    },
}

impl DetectionOutcome {
    /// 将失败结果转换为错误，识别成功时返回 None
    pub fn into_error(self) -> Option<CheckoutError> {
        match self {
            DetectionOutcome::Detected { .. } => None,
            DetectionOutcome::NotDetected { reason } => Some(CheckoutError::NoProductDetected(reason)),
            DetectionOutcome::TransportFailure { reason } => {
                Some(CheckoutError::TransportFailure(reason))
            }
        }
    }
}

/// 检测服务 `POST /` 响应体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectResponse {
    pub success: bool,
    #[serde(default)]
    pub objects: Vec<DetectedObject>,
    #[serde(default)]
    pub message: Option<String>,
}

/// 检测到的物体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedObject {
    #[serde(rename = "class")]
    pub class_name: String,
    pub confidence: f32,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub available_quantity: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_response_parsing() {
        let json = r#"{
            "success": true,
            "objects": [
                {"class": "Maggi", "confidence": 0.81, "price": 15, "available_quantity": 40},
                {"class": "dettol", "confidence": 0.55}
            ],
            "message": "Detection successful"
        }"#;

        let resp: DetectResponse = serde_json::from_str(json).unwrap();
        assert!(resp.success);
        assert_eq!(resp.objects.len(), 2);
        assert_eq!(resp.objects[0].class_name, "Maggi");
        assert_eq!(resp.objects[0].price, Some(15.0));
        assert_eq!(resp.objects[1].price, None);
    }

    #[test]
    fn test_failure_response_without_objects() {
        let resp: DetectResponse =
            serde_json::from_str(r#"{"success": false, "message": "No image uploaded"}"#).unwrap();
        assert!(!resp.success);
        assert!(resp.objects.is_empty());
        assert_eq!(resp.message.as_deref(), Some("No image uploaded"));
    }

    #[test]
    fn test_into_error() {
        let ok = DetectionOutcome::Detected {
            name: "Maggi".to_string(),
            unit_price: BigDecimal::from(15),
            confidence: 0.9,
        };
        assert!(ok.into_error().is_none());

        let err = DetectionOutcome::NotDetected { reason: "no object".to_string() };
        assert!(matches!(err.into_error(), Some(CheckoutError::NoProductDetected(r)) if r == "no object"));

        let err = DetectionOutcome::TransportFailure { reason: "timeout".to_string() };
        assert!(matches!(err.into_error(), Some(CheckoutError::TransportFailure(_))));
    }
}
