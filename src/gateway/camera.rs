use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::{CheckoutError, Result};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// 一次拍摄得到的图片
#[derive(Debug, Clone)]
pub struct CapturedImage {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime: String,
}

impl CapturedImage {
    pub fn jpeg(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            file_name: "photo.jpg".to_string(),
            mime: "image/jpeg".to_string(),
        }
    }
}

/// 相机能力
#[async_trait]
pub trait Camera: Send + Sync {
    /// 未授权时不允许拍照
    fn permission_granted(&self) -> bool;

    async fn capture(&self) -> Result<CapturedImage>;
}

/// 以目录作为相机：拍照时读取目录中最新的图片文件
pub struct DirectoryCamera {
    dir: PathBuf,
}

impl DirectoryCamera {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn newest_image(&self) -> Result<Option<PathBuf>> {
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        let mut newest: Option<(SystemTime, PathBuf)> = None;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !is_image(&path) {
                continue;
            }
            let meta = entry.metadata().await?;
            if !meta.is_file() {
                continue;
            }
            let modified = meta.modified()?;

            let is_newer = match &newest {
                None => true,
                Some((best, _)) => modified > *best,
            };
            if is_newer {
                newest = Some((modified, path));
            }
        }

        Ok(newest.map(|(_, path)| path))
    }
}

#[async_trait]
impl Camera for DirectoryCamera {
    fn permission_granted(&self) -> bool {
        self.dir.is_dir()
    }

    async fn capture(&self) -> Result<CapturedImage> {
        let Some(path) = self.newest_image().await? else {
            return Err(CheckoutError::Camera(format!(
                "no image found in {}",
                self.dir.display()
            )));
        };

        let bytes = tokio::fs::read(&path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "photo.jpg".to_string());
        let mime = mime_for(&path).to_string();

        tracing::info!("Captured {} ({} bytes)", path.display(), bytes.len());
        Ok(CapturedImage { bytes, file_name, mime })
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension().map(|e| e.to_string_lossy().to_ascii_lowercase())
}

fn is_image(path: &Path) -> bool {
    extension_of(path)
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

fn mime_for(path: &Path) -> &'static str {
    match extension_of(path).as_deref() {
        Some("png") => "image/png",
        _ => "image/jpeg",
    }
}
