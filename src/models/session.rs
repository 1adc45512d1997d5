use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use super::detection::DetectionOutcome;

/// 拍照审核页的状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "outcome", rename_all = "snake_case")]
pub enum CaptureStatus {
    /// 已提交检测，等待结果
    Pending,
    /// 检测结果已返回
    Settled(DetectionOutcome),
}

/// 当前界面
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Screen {
    Welcome,
    Live,
    Reviewing(CaptureStatus),
    BillOpen,
}

impl Screen {
    pub fn kind(&self) -> ScreenKind {
        match self {
            Screen::Welcome => ScreenKind::Welcome,
            Screen::Live => ScreenKind::Live,
            Screen::Reviewing(_) => ScreenKind::Reviewing,
            Screen::BillOpen => ScreenKind::BillOpen,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenKind {
    Welcome,
    Live,
    Reviewing,
    BillOpen,
}

/// 会话快照，供界面渲染
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub screen: ScreenKind,
    pub pending_capture: bool,
    pub last_outcome: Option<DetectionOutcome>,
    pub line_count: usize,
    pub total: BigDecimal,
}
