// Folio - A flat-file CMS built with Rust
// Copyright (C) 2025 Folio Project Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Media library: uploaded images kept flat in the uploads directory and
//! served under `/uploads`.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use image::GenericImageView;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

pub const UPLOADS_URL_PREFIX: &str = "/uploads";

const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];
const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const GIF_MAGIC: &[u8] = b"GIF8";
const RIFF_MAGIC: &[u8] = b"RIFF";

const DANGEROUS_EXTENSIONS: &[&str] = &[
    "exe", "bat", "cmd", "com", "scr", "vbs", "js", "jar", "msi", "sh", "bash", "ps1", "pl",
    "py", "rb", "php", "asp", "aspx", "jsp", "cgi", "htm", "html", "svg", "htaccess",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("File exceeds the {0} byte upload limit")]
    TooLarge(usize),
    #[error("Only JPEG, PNG, GIF and WebP images can be uploaded")]
    UnsupportedFormat,
    #[error("Invalid file name: {0}")]
    InvalidName(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::Gif => "gif",
            ImageFormat::Webp => "webp",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Webp => "image/webp",
        }
    }

    /// Sniff the format from magic bytes; the client's file name and
    /// content type are not trusted
    pub fn detect(data: &[u8]) -> Option<Self> {
        if data.starts_with(JPEG_MAGIC) {
            Some(ImageFormat::Jpeg)
        } else if data.starts_with(PNG_MAGIC) {
            Some(ImageFormat::Png)
        } else if data.starts_with(GIF_MAGIC) {
            Some(ImageFormat::Gif)
        } else if data.starts_with(RIFF_MAGIC) && data.len() >= 12 && &data[8..12] == b"WEBP" {
            Some(ImageFormat::Webp)
        } else {
            None
        }
    }

    fn from_extension(name: &str) -> Option<Self> {
        match Path::new(name).extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "gif" => Some(ImageFormat::Gif),
            "webp" => Some(ImageFormat::Webp),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MediaFile {
    pub name: String,
    pub url: String,
    pub size: u64,
    pub mime_type: &'static str,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub uploaded_at: Option<DateTime<Utc>>,
}

/// True when any dot-separated part of the name is an executable or
/// markup extension, which also catches `shell.php.jpg`
pub fn is_dangerous_filename(filename: &str) -> bool {
    filename
        .to_lowercase()
        .split('.')
        .skip(1)
        .any(|ext| DANGEROUS_EXTENSIONS.contains(&ext))
}

/// Names handed to `delete` must be plain file names inside the library
pub fn validate_media_name(name: &str) -> Result<(), UploadError> {
    let invalid = |reason: &str| Err(UploadError::InvalidName(reason.to_string()));

    if name.is_empty() || name.len() > 255 {
        return invalid("length");
    }
    if name.starts_with('.') || name.contains(['/', '\\', '\0']) || name.contains("..") {
        return invalid("path characters");
    }
    if is_dangerous_filename(name) {
        return invalid("file type not allowed");
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct MediaLibrary {
    dir: PathBuf,
    max_size: usize,
}

impl MediaLibrary {
    pub fn new(dir: impl Into<PathBuf>, max_size: usize) -> Self {
        Self {
            dir: dir.into(),
            max_size,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Every image in the library, newest first
    pub async fn list(&self) -> Result<Vec<MediaFile>> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e).context("Failed to read uploads directory"),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            let Some(format) = ImageFormat::from_extension(&name) else {
                continue;
            };
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }

            files.push(MediaFile {
                url: format!("{}/{}", UPLOADS_URL_PREFIX, name),
                name,
                size: metadata.len(),
                mime_type: format.mime_type(),
                width: None,
                height: None,
                uploaded_at: metadata.modified().ok().map(DateTime::<Utc>::from),
            });
        }

        files.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(files)
    }

    /// Store an uploaded image under a fresh name
    pub async fn save(&self, original_name: &str, data: &[u8]) -> Result<MediaFile> {
        if data.len() > self.max_size {
            return Err(UploadError::TooLarge(self.max_size).into());
        }
        if is_dangerous_filename(original_name) {
            return Err(UploadError::InvalidName("file type not allowed".to_string()).into());
        }
        let format = ImageFormat::detect(data).ok_or(UploadError::UnsupportedFormat)?;

        let (width, height) = match image::load_from_memory(data) {
            Ok(img) => {
                let (w, h) = img.dimensions();
                (Some(w), Some(h))
            }
            Err(_) => (None, None),
        };

        tokio::fs::create_dir_all(&self.dir)
            .await
            .context("Failed to create uploads directory")?;

        let name = format!("{}.{}", Uuid::new_v4(), format.extension());
        let path = self.dir.join(&name);
        tokio::fs::write(&path, data)
            .await
            .with_context(|| format!("Failed to write upload {}", path.display()))?;

        tracing::info!(%name, original = %original_name, size = data.len(), "Stored upload");

        Ok(MediaFile {
            url: format!("{}/{}", UPLOADS_URL_PREFIX, name),
            name,
            size: data.len() as u64,
            mime_type: format.mime_type(),
            width,
            height,
            uploaded_at: Some(Utc::now()),
        })
    }

    /// Returns whether a file was removed
    pub async fn delete(&self, name: &str) -> Result<bool> {
        validate_media_name(name)?;

        match tokio::fs::remove_file(self.dir.join(name)).await {
            Ok(()) => {
                tracing::info!(%name, "Deleted upload");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).context("Failed to delete upload"),
        }
    }
}
