pub mod bill;
pub mod cart;
pub mod detection;
pub mod session;

pub use bill::{BillLine, PrintBillRequest, PrintErrorBody, PrintedBill, PrintedLine, Product};
pub use cart::{format_money, CartItem, LineId};
pub use detection::{DetectResponse, DetectedObject, DetectionOutcome, DEFAULT_NOT_DETECTED_REASON};
pub use session::{CaptureStatus, Screen, ScreenKind, SessionSnapshot};
