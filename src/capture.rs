use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{Result, TrackerError};

/// JPEG start-of-image marker.
const JPEG_SIGNATURE: [u8; 3] = [0xFF, 0xD8, 0xFF];

/// A single still JPEG frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    bytes: Vec<u8>,
}

impl CapturedImage {
    /// Wrap encoded bytes, rejecting anything that is not a JPEG.
    pub fn from_jpeg(bytes: Vec<u8>) -> Result<Self> {
        if !bytes.starts_with(&JPEG_SIGNATURE) {
            return Err(TrackerError::CameraAccess(
                "captured frame is not a JPEG image".to_string(),
            ));
        }
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Base64 body for inline image payloads.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

/// Something that can produce one still image per capture.
pub trait ImageSource {
    fn capture(&mut self) -> Result<CapturedImage>;
}

/// Reads a photo already taken and saved to disk.
#[derive(Debug, Clone)]
pub struct FileCapture {
    path: PathBuf,
}

impl FileCapture {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ImageSource for FileCapture {
    fn capture(&mut self) -> Result<CapturedImage> {
        let bytes = fs::read(&self.path).map_err(|e| {
            let reason = match e.kind() {
                ErrorKind::NotFound => "no image at that path".to_string(),
                ErrorKind::PermissionDenied => "permission denied".to_string(),
                _ => e.to_string(),
            };
            TrackerError::CameraAccess(format!("{}: {}", self.path.display(), reason))
        })?;
        CapturedImage::from_jpeg(bytes)
    }
}
