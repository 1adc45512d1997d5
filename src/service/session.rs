use bigdecimal::BigDecimal;

use crate::error::{CheckoutError, Result};
use crate::gateway::{BillingGateway, Camera, CapturedImage, DetectionGateway};
use crate::models::{
    CaptureStatus, CartItem, DetectionOutcome, LineId, PrintedBill, Screen, SessionSnapshot,
};
use crate::service::CartStore;

/// 一次拍照提交的结果
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureAttempt {
    /// 当前不能拍照 (已有检测在进行，或不在相机界面)，未调用检测服务
    Rejected,
    Settled(DetectionOutcome),
}

/// 会话控制器：界面状态机 + 购物车
///
/// 状态迁移：
/// `Welcome -(start)-> Live -(begin_capture)-> Reviewing(Pending) -(resolve_capture)-> Reviewing(Settled) -(retry)-> Live`，
/// `Live/Reviewing(Settled) <-(open_bill/close_bill)-> BillOpen`，任意状态 `-(go_home)-> Welcome`。
pub struct SessionController<D, B> {
    screen: Screen,
    cart: CartStore,
    detector: D,
    billing: B,
    next_line_id: u64,
}

impl<D, B> SessionController<D, B>
where
    D: DetectionGateway,
    B: BillingGateway,
{
    pub fn new(detector: D, billing: B) -> Self {
        Self {
            screen: Screen::Welcome,
            cart: CartStore::new(),
            detector,
            billing,
            next_line_id: 1,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub fn pending_capture(&self) -> bool {
        matches!(self.screen, Screen::Reviewing(CaptureStatus::Pending))
    }

    pub fn last_outcome(&self) -> Option<&DetectionOutcome> {
        match &self.screen {
            Screen::Reviewing(CaptureStatus::Settled(outcome)) => Some(outcome),
            _ => None,
        }
    }

    /// 最近一次拍照的失败原因，识别成功或尚无结果时为 None
    pub fn last_error(&self) -> Option<CheckoutError> {
        self.last_outcome().cloned().and_then(DetectionOutcome::into_error)
    }

    pub fn total(&self) -> BigDecimal {
        self.cart.total()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            screen: self.screen.kind(),
            pending_capture: self.pending_capture(),
            last_outcome: self.last_outcome().cloned(),
            line_count: self.cart.len(),
            total: self.cart.total(),
        }
    }

    /// Welcome -> Live
    pub fn start(&mut self) -> bool {
        if self.screen != Screen::Welcome {
            return false;
        }
        self.transition(Screen::Live);
        true
    }

    /// 开始一次拍照，只能在 Live 界面调用；已有检测在进行时不做任何事
    pub fn begin_capture(&mut self) -> bool {
        if self.pending_capture() {
            tracing::debug!("Capture already pending, ignoring");
            return false;
        }
        if self.screen != Screen::Live {
            tracing::debug!("begin_capture ignored on {:?}", self.screen.kind());
            return false;
        }
        self.transition(Screen::Reviewing(CaptureStatus::Pending));
        true
    }

    /// 记录检测结果；识别成功时加入购物车，返回新行ID
    pub fn resolve_capture(&mut self, outcome: DetectionOutcome) -> Option<LineId> {
        if !self.pending_capture() {
            tracing::warn!("resolve_capture without a pending capture, dropping {:?}", outcome);
            return None;
        }

        let added = match &outcome {
            DetectionOutcome::Detected { name, unit_price, confidence } => {
                let id = self.issue_line_id();
                self.cart.add(CartItem::new(id, name.clone(), unit_price.clone(), *confidence));
                tracing::info!(
                    "Added {} to cart: {} items, total {}",
                    name,
                    self.cart.len(),
                    self.cart.total()
                );
                Some(id)
            }
            DetectionOutcome::NotDetected { reason } | DetectionOutcome::TransportFailure { reason } => {
                tracing::warn!("Capture failed: {}", reason);
                None
            }
        };

        self.transition(Screen::Reviewing(CaptureStatus::Settled(outcome)));
        added
    }

    /// Reviewing(Settled) -> Live，购物车保留
    pub fn retry(&mut self) -> bool {
        if self.last_outcome().is_none() {
            return false;
        }
        self.transition(Screen::Live);
        true
    }

    /// Live / Reviewing(Settled) -> BillOpen
    pub fn open_bill(&mut self) -> bool {
        let allowed = match &self.screen {
            Screen::Live => true,
            Screen::Reviewing(CaptureStatus::Settled(_)) => true,
            _ => false,
        };
        if allowed {
            self.transition(Screen::BillOpen);
        }
        allowed
    }

    /// BillOpen -> Live
    pub fn close_bill(&mut self) -> bool {
        if self.screen != Screen::BillOpen {
            return false;
        }
        self.transition(Screen::Live);
        true
    }

    /// 任意状态 -> Welcome，购物车保留；进行中的检测被放弃
    pub fn go_home(&mut self) {
        if self.pending_capture() {
            tracing::warn!("Abandoning pending capture");
        }
        self.transition(Screen::Welcome);
    }

    /// 提交一张图片：begin_capture -> detect -> resolve_capture
    pub async fn submit_capture(&mut self, image: CapturedImage) -> CaptureAttempt {
        if !self.begin_capture() {
            return CaptureAttempt::Rejected;
        }

        let outcome = self.detector.detect(image).await;
        self.resolve_capture(outcome.clone());
        CaptureAttempt::Settled(outcome)
    }

    /// 用相机拍照并提交
    pub async fn capture_from<C>(&mut self, camera: &C) -> Result<CaptureAttempt>
    where
        C: Camera + ?Sized,
    {
        if !camera.permission_granted() {
            return Err(CheckoutError::CameraUnavailable);
        }
        if self.pending_capture() || self.screen != Screen::Live {
            return Ok(CaptureAttempt::Rejected);
        }

        let image = camera.capture().await?;
        Ok(self.submit_capture(image).await)
    }

    pub fn remove_item(&mut self, id: LineId) -> Option<CartItem> {
        let removed = self.cart.remove(id);
        if let Some(item) = &removed {
            tracing::info!("Removed {} {} from cart", item.id(), item.name());
        }
        removed
    }

    /// 清空购物车并关闭账单
    pub fn reset_cart(&mut self) {
        self.cart.clear();
        if self.screen == Screen::BillOpen {
            self.transition(Screen::Live);
        }
    }

    /// 结算：成功后清空购物车并回到相机界面，失败时保持原状
    pub async fn print_bill(&mut self) -> Result<PrintedBill> {
        if self.screen != Screen::BillOpen {
            return Err(CheckoutError::BillNotOpen);
        }
        if self.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let lines = self.cart.bill_lines();
        match self.billing.print_bill(&lines).await {
            Ok(bill) => {
                tracing::info!("Bill printed: {} lines, total {}", lines.len(), bill.total);
                self.cart.clear();
                self.transition(Screen::Live);
                Ok(bill)
            }
            Err(e) => {
                tracing::error!("Print bill failed: {}", e);
                Err(e)
            }
        }
    }

    fn issue_line_id(&mut self) -> LineId {
        let id = LineId(self.next_line_id);
        self.next_line_id += 1;
        id
    }

    fn transition(&mut self, next: Screen) {
        tracing::debug!("Screen {:?} -> {:?}", self.screen.kind(), next.kind());
        self.screen = next;
    }
}
