use std::io::Cursor;
use std::path::Path;

use bytes::Bytes;
use image::ImageReader;
use serde::Serialize;

use crate::types::{DatasetError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    /// Identify the encoding from its leading signature bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        match image::guess_format(bytes) {
            Ok(image::ImageFormat::Jpeg) => Some(ImageFormat::Jpeg),
            Ok(image::ImageFormat::Png) => Some(ImageFormat::Png),
            _ => None,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
        }
    }

    fn as_image_format(self) -> image::ImageFormat {
        match self {
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Png => image::ImageFormat::Png,
        }
    }
}

/// Decrypted bytes whose JPEG/PNG header parses.
///
/// Only the header is decoded; pixels belong to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    pub bytes: Bytes,
}

impl DecodedImage {
    pub fn from_bytes(path: &Path, bytes: Bytes) -> Result<Self> {
        let decode_err = |reason: String| DatasetError::Decode { path: path.to_path_buf(), reason };

        let format = ImageFormat::sniff(&bytes)
            .ok_or_else(|| decode_err("no JPEG or PNG signature".into()))?;
        let (width, height) = ImageReader::with_format(Cursor::new(&bytes[..]), format.as_image_format())
            .into_dimensions()
            .map_err(|e| decode_err(e.to_string()))?;

        Ok(Self { format, width, height, bytes })
    }
}
