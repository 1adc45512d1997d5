use serde::{Deserialize, Serialize};

use crate::error::Result;

/// 环境变量前缀，例如 `CHECKOUT__SERVER__BASE_URL`
const ENV_PREFIX: &str = "CHECKOUT";

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub camera: CameraConfig,
    #[serde(default)]
    pub receipt: ReceiptConfig,
}

/// 检测/结算服务
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// 相机输出目录，拍照时取最新的图片
    pub capture_dir: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReceiptConfig {
    /// 小票 CSV 导出目录，未配置则不导出
    pub export_dir: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                base_url: "http://127.0.0.1:8080".to_string(),
                timeout_secs: 30,
            },
            camera: CameraConfig {
                capture_dir: "./captures".to_string(),
            },
            receipt: ReceiptConfig::default(),
        }
    }
}

impl AppConfig {
    /// 加载配置：默认值 < 配置文件 (可选) < 环境变量
    pub fn load(path: Option<&str>) -> Result<Self> {
        let defaults = Self::default();
        let mut builder = ::config::Config::builder()
            .set_default("server.base_url", defaults.server.base_url)?
            .set_default("server.timeout_secs", defaults.server.timeout_secs as i64)?
            .set_default("camera.capture_dir", defaults.camera.capture_dir)?;

        builder = builder.add_source(
            ::config::File::with_name(path.unwrap_or("checkout")).required(path.is_some()),
        );

        let cfg = builder
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        Ok(cfg.try_deserialize()?)
    }

    /// 从环境变量加载配置
    pub fn from_env() -> Self {
        match Self::load(None) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!("Failed to load config, falling back to defaults: {}", e);
                Self::default()
            }
        }
    }

    pub fn server_base_url(&self) -> &str {
        self.server.base_url.trim_end_matches('/')
    }
}
