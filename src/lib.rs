pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod service;

pub use config::AppConfig;
pub use error::{CheckoutError, Result};
pub use gateway::{BillingGateway, Camera, DetectionGateway, DirectoryCamera, HttpCheckoutClient};
pub use service::{CaptureAttempt, CartStore, PriceCatalog, SessionController};
