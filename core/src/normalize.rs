// ## 📂 File: `src/normalize.rs`

//! normalize.rs
//! Image normalization applied before encryption.
//!
//! Every input is decoded, converted to RGB, resized so it covers the target
//! size with its aspect ratio kept, and re-encoded. Inputs that do not decode
//! are per-item `Decode` failures.

use std::io::Cursor;
use std::path::Path;

use image::imageops::FilterType;
use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::types::{DatasetError, Result};

pub const DEFAULT_TARGET_SIZE: (u32, u32) = (512, 512);

/// Encoding written into normalized items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
}

impl OutputFormat {
    /// Extension placed in front of `.enc` in output names.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Png => "png",
        }
    }

    fn image_format(self) -> image::ImageFormat {
        match self {
            OutputFormat::Jpeg => image::ImageFormat::Jpeg,
            OutputFormat::Png => image::ImageFormat::Png,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// When off, encrypt sweeps store the source bytes untouched.
    pub enabled: bool,
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            width: DEFAULT_TARGET_SIZE.0,
            height: DEFAULT_TARGET_SIZE.1,
            format: OutputFormat::default(),
        }
    }
}

impl NormalizeConfig {
    pub fn disabled() -> Self {
        Self { enabled: false, ..Self::default() }
    }

    pub fn with_target(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.enabled && (self.width == 0 || self.height == 0) {
            return Err(DatasetError::Config(format!(
                "normalize target must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// `Some(self)` when normalization is switched on.
    pub fn active(&self) -> Option<Self> {
        self.enabled.then_some(*self)
    }

    /// Encrypted output name for a source file: `<stem>.<format>.enc`.
    pub fn output_name(&self, source_name: &str, encrypted_suffix: &str) -> String {
        let stem = Path::new(source_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| source_name.to_string());
        format!("{stem}.{}.{encrypted_suffix}", self.format.extension())
    }
}

/// Smallest size with the source aspect ratio that covers `target`.
///
/// One side always equals the target; the other is rounded and at least 1.
pub fn cover_size(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (w, h) = source;
    let (tw, th) = target;
    if w == 0 || h == 0 {
        return target;
    }

    let im_ratio = w as f64 / h as f64;
    let dest_ratio = tw as f64 / th as f64;
    if im_ratio < dest_ratio {
        let nh = (h as f64 / w as f64 * tw as f64).round().max(1.0) as u32;
        (tw, nh)
    } else if im_ratio > dest_ratio {
        let nw = (w as f64 / h as f64 * th as f64).round().max(1.0) as u32;
        (nw, th)
    } else {
        target
    }
}

/// Decode `input`, cover-resize it and re-encode it per `config`.
pub fn normalize_image(path: &Path, input: &[u8], config: &NormalizeConfig) -> Result<Vec<u8>> {
    let decode_err = |reason: String| DatasetError::Decode { path: path.to_path_buf(), reason };

    let decoded = image::load_from_memory(input).map_err(|e| decode_err(e.to_string()))?;
    let rgb = DynamicImage::ImageRgb8(decoded.to_rgb8());

    let (w, h) = cover_size((rgb.width(), rgb.height()), (config.width, config.height));
    let resized = if (w, h) == (rgb.width(), rgb.height()) {
        rgb
    } else {
        rgb.resize_exact(w, h, FilterType::CatmullRom)
    };

    let mut out = Cursor::new(Vec::new());
    resized
        .write_to(&mut out, config.format.image_format())
        .map_err(|e| decode_err(format!("re-encoding failed: {e}")))?;
    Ok(out.into_inner())
}
