use crate::color::{BASE_COLOR, Rgb};
use crate::font::DEFAULT_FONT_FAMILY;
use crate::svg::Shape;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Double UI unit; the avatar edge length when neither width nor height is given.
pub const DEFAULT_SIZE: u32 = 44;
pub const BACKGROUND_MODIFIER: i32 = 50;
pub const FOREGROUND_MODIFIER: i32 = -180;

/// Avatar generator settings, loadable from camelCase JSON.
///
/// ```json
/// { "defaultSize": 64, "shape": "square", "fontPath": "fonts/OpenSans.woff" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct AvatarConfig {
    pub default_size: u32,
    pub base_color: Rgb,
    pub background_modifier: i32,
    pub foreground_modifier: i32,
    pub shape: Shape,
    pub font_family: String,
    /// WOFF/WOFF2/TTF/OTF file embedded into the font stylesheet.
    pub font_path: Option<PathBuf>,
    pub inline_font_css: bool,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            default_size: DEFAULT_SIZE,
            base_color: BASE_COLOR,
            background_modifier: BACKGROUND_MODIFIER,
            foreground_modifier: FOREGROUND_MODIFIER,
            shape: Shape::default(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_path: None,
            inline_font_css: false,
        }
    }
}

impl AvatarConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Loads a JSON config file. A relative `fontPath` is resolved against the file's directory.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut cfg = Self::from_json_str(&text)?;
        if let (Some(font), Some(dir)) = (cfg.font_path.as_mut(), path.parent()) {
            if font.is_relative() {
                *font = dir.join(&*font);
            }
        }
        Ok(cfg)
    }
}

/// What the rendering environment can do, injected instead of sniffing the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Base64 encoding is available; without it no fallback source is produced.
    pub base64: bool,
    /// The renderer resolves `@import` of the font stylesheet inside SVG images.
    pub font_delivery: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            base64: true,
            font_delivery: true,
        }
    }
}
