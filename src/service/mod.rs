pub mod cart;
pub mod catalog;
pub mod receipt;
pub mod session;

pub use cart::CartStore;
pub use catalog::PriceCatalog;
pub use session::{CaptureAttempt, SessionController};
