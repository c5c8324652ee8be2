//! Best-effort photo capture through the desktop camera application.
//!
//! We can't talk to the camera app directly, so we launch it, watch the
//! directory it saves into for a new picture, wait until the file stops
//! growing, copy it out and close the app again.

use crate::config::CameraConfig;
use crate::error::{DailyPlantError, Result};
use chrono::Local;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::{Child, Command};
use tokio::time::{sleep, Instant};

const CAMERA_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];
const CAMERA_NAME_PATTERNS: &[&str] = &[
    "photo", "img", "win_", "camera", "capture", "picture", "wp_", "dsc",
];
const MIN_READY_BYTES: u64 = 1024;

pub struct CameraCapture {
    config: CameraConfig,
    output_dir: PathBuf,
    poll_interval: Duration,
    ready_retries: u32,
    ready_delay: Duration,
}

impl CameraCapture {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            config,
            output_dir: std::env::temp_dir().join("PlantRecognition"),
            poll_interval: Duration::from_secs(1),
            ready_retries: 20,
            ready_delay: Duration::from_millis(500),
        }
    }

    #[cfg(test)]
    pub fn with_output_dir(mut self, dir: PathBuf) -> Self {
        self.output_dir = dir;
        self
    }

    #[cfg(test)]
    pub fn with_timing(mut self, poll_interval: Duration, ready_retries: u32, ready_delay: Duration) -> Self {
        self.poll_interval = poll_interval;
        self.ready_retries = ready_retries;
        self.ready_delay = ready_delay;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.config.command.is_some()
    }

    /// Directory the camera app is expected to save into.
    pub async fn watch_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.config.watch_dir {
            return Ok(dir.clone());
        }

        let pictures = dirs::picture_dir()
            .ok_or_else(|| DailyPlantError::Camera("Cannot determine pictures directory".into()))?;
        let camera_roll = pictures.join("Camera Roll");
        let has_camera_roll = tokio::fs::metadata(&camera_roll)
            .await
            .is_ok_and(|m| m.is_dir());
        Ok(if has_camera_roll { camera_roll } else { pictures })
    }

    /// Launch the camera and wait for a new photo.
    ///
    /// Returns the path of a private copy of the photo, or `None` if nothing
    /// showed up before the capture timeout.
    pub async fn capture(&self) -> Result<Option<PathBuf>> {
        let command = self
            .config
            .command
            .as_deref()
            .ok_or_else(|| DailyPlantError::Camera("No camera command configured".into()))?;

        let watch_dir = self.watch_dir().await?;
        let existing = list_image_files(&watch_dir).await;
        tracing::debug!(dir = %watch_dir.display(), existing = existing.len(), "Watching for new photos");

        let child = Command::new(command)
            .args(&self.config.args)
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| DailyPlantError::Camera(format!("Failed to launch {}: {}", command, e)))?;

        let timeout = Duration::from_secs(self.config.capture_timeout_secs);
        let outcome = self.capture_from(&watch_dir, &existing, timeout).await;

        close_camera(child).await;
        outcome
    }

    async fn capture_from(
        &self,
        watch_dir: &Path,
        existing: &HashSet<PathBuf>,
        timeout: Duration,
    ) -> Result<Option<PathBuf>> {
        let Some(photo) = self.wait_for_new_photo(watch_dir, existing, timeout).await else {
            tracing::info!("No new photo appeared before timeout");
            return Ok(None);
        };

        self.wait_for_file_ready(&photo).await?;

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let target = self.output_dir.join(format!(
            "plant_photo_{}.jpg",
            Local::now().format("%Y%m%d_%H%M%S")
        ));
        tokio::fs::copy(&photo, &target).await?;

        tracing::info!(source = %photo.display(), target = %target.display(), "Captured photo");
        Ok(Some(target))
    }

    async fn wait_for_new_photo(
        &self,
        dir: &Path,
        existing: &HashSet<PathBuf>,
        timeout: Duration,
    ) -> Option<PathBuf> {
        let start = Instant::now();
        while start.elapsed() < timeout {
            let mut fresh: Vec<PathBuf> = list_image_files(dir)
                .await
                .into_iter()
                .filter(|f| !existing.contains(f) && is_likely_camera_file(f))
                .collect();
            fresh.sort();
            if let Some(file) = fresh.into_iter().next() {
                return Some(file);
            }
            sleep(self.poll_interval).await;
        }
        None
    }

    /// Wait until the file is big enough and has stopped growing.
    async fn wait_for_file_ready(&self, path: &Path) -> Result<()> {
        let mut last_len = None;
        for _ in 0..self.ready_retries {
            if let Ok(meta) = tokio::fs::metadata(path).await {
                let len = meta.len();
                if len > MIN_READY_BYTES && last_len == Some(len) {
                    return Ok(());
                }
                last_len = Some(len);
            }
            sleep(self.ready_delay).await;
        }
        Err(DailyPlantError::Camera(format!(
            "File not ready: {}",
            path.display()
        )))
    }
}

async fn close_camera(mut child: Child) {
    match child.try_wait() {
        Ok(Some(_)) => {}
        _ => {
            if let Err(e) = child.kill().await {
                tracing::warn!(error = %e, "Failed to close camera process");
            }
        }
    }
}

async fn list_image_files(dir: &Path) -> HashSet<PathBuf> {
    let mut files = HashSet::new();
    let Ok(mut entries) = tokio::fs::read_dir(dir).await else {
        return files;
    };

    while let Ok(Some(entry)) = entries.next_entry().await {
        let is_file = entry.file_type().await.is_ok_and(|t| t.is_file());
        let path = entry.path();
        if is_file && has_image_extension(&path) {
            files.insert(path);
        }
    }
    files
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| CAMERA_EXTENSIONS.contains(&e.to_lowercase().as_str()))
}

/// Camera apps name their pictures in a few recognisable ways.
pub fn is_likely_camera_file(path: &Path) -> bool {
    let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
        return false;
    };
    let stem = stem.to_lowercase();
    CAMERA_NAME_PATTERNS.iter().any(|p| stem.contains(p))
}
