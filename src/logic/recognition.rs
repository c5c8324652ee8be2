use crate::datasources::PlantApiClient;
use crate::error::{DailyPlantError, Result};
use crate::models::RecognitionResult;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;
use tokio::io::AsyncReadExt;

const VALID_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp"];

/// Identifies plants in local images through the recognition API.
pub struct RecognitionService {
    client: PlantApiClient,
}

impl RecognitionService {
    pub fn new(client: PlantApiClient) -> Self {
        Self { client }
    }

    pub async fn recognize_file(&self, path: &Path) -> Result<RecognitionResult> {
        if path.as_os_str().is_empty() {
            return Err(DailyPlantError::InvalidImage("image path is empty".into()));
        }
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Err(DailyPlantError::NotFound(format!(
                "image file {}",
                path.display()
            )));
        }
        if !validate_image(path).await {
            return Err(DailyPlantError::InvalidImage(format!(
                "{} is not a JPEG, PNG or BMP image",
                path.display()
            )));
        }

        let bytes = tokio::fs::read(path).await?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "Recognizing plant");
        self.recognize_bytes(&bytes).await
    }

    pub async fn recognize_bytes(&self, bytes: &[u8]) -> Result<RecognitionResult> {
        if bytes.is_empty() {
            return Err(DailyPlantError::InvalidImage("image data is empty".into()));
        }

        let encoded = STANDARD.encode(bytes);
        self.client.recognize(&encoded).await.inspect_err(|e| {
            tracing::warn!(error = %e, "Plant recognition failed");
        })
    }
}

/// Cheap format check: extension plus magic bytes. Any IO problem reads as invalid.
pub async fn validate_image(path: &Path) -> bool {
    let has_valid_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .is_some_and(|e| VALID_EXTENSIONS.contains(&e.as_str()));
    if !has_valid_extension {
        return false;
    }

    let Ok(mut file) = tokio::fs::File::open(path).await else {
        return false;
    };
    if file.metadata().await.map(|m| m.len() == 0).unwrap_or(true) {
        return false;
    }

    let mut header = [0u8; 8];
    let mut read = 0;
    while read < header.len() {
        match file.read(&mut header[read..]).await {
            Ok(0) => break,
            Ok(n) => read += n,
            Err(_) => return false,
        }
    }

    is_image_header(&header[..read])
}

fn is_image_header(header: &[u8]) -> bool {
    header.starts_with(&[0xFF, 0xD8, 0xFF])
        || header.starts_with(&[0x89, 0x50, 0x4E, 0x47])
        || header.starts_with(&[0x42, 0x4D])
}
