//! Web font delivery for generated avatars.
//!
//! The SVG cannot load fonts over the network, so the `@font-face` rule (optionally carrying the
//! whole font as a base64 payload) is wrapped into a `data:text/css` stylesheet that the avatar
//! markup imports.

use crate::{Error, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use std::path::Path;
use std::sync::OnceLock;

pub const DEFAULT_FONT_FAMILY: &str = "Open Sans";

/// Open Sans, weight 400.
static OPEN_SANS_WOFF: &[u8] = include_bytes!("../assets/OpenSans-Regular.woff");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontAsset {
    family: String,
    css: String,
    stylesheet_uri: String,
    data: Option<Vec<u8>>,
}

impl FontAsset {
    /// Declares `family` without embedding it; renderers resolve it from locally installed fonts.
    pub fn declared(family: &str) -> Self {
        let family = sanitize_family(family);
        let src = format!("local(\"{family}\")");
        Self::from_parts(family, &src, None)
    }

    /// Embeds `bytes` as a base64 `src: url(data:...)` so the font travels with every avatar.
    pub fn from_font_bytes(family: &str, mime: &str, bytes: &[u8]) -> Self {
        let family = sanitize_family(family);
        let format = match mime {
            "font/woff2" => "woff2",
            "font/ttf" => "truetype",
            "font/otf" => "opentype",
            _ => "woff",
        };
        let src = format!(
            "url('data:{mime};charset=utf-8;base64,{}') format('{format}')",
            STANDARD.encode(bytes)
        );
        Self::from_parts(family, &src, Some(bytes.to_vec()))
    }

    pub fn from_path(family: &str, path: &Path) -> Result<Self> {
        let mime = match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("woff") => "font/woff",
            Some("woff2") => "font/woff2",
            Some("ttf") => "font/ttf",
            Some("otf") => "font/otf",
            _ => {
                return Err(Error::UnsupportedFont {
                    path: path.display().to_string(),
                });
            }
        };
        let bytes = std::fs::read(path).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "embedding avatar font");
        Ok(Self::from_font_bytes(family, mime, &bytes))
    }

    fn from_parts(family: String, src: &str, data: Option<Vec<u8>>) -> Self {
        let css = format!(
            "@font-face {{\n\tfont-family: \"{family}\";\n\tsrc: {src};\n\tfont-style: normal;\n\tfont-weight: 400;\n}}"
        );
        let stylesheet_uri = format!("data:text/css;base64,{}", STANDARD.encode(css.as_bytes()));
        Self {
            family,
            css,
            stylesheet_uri,
            data,
        }
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    /// The `@font-face` rule.
    pub fn css(&self) -> &str {
        &self.css
    }

    /// `data:text/css;base64,...` reference to [`Self::css`].
    pub fn stylesheet_uri(&self) -> &str {
        &self.stylesheet_uri
    }

    /// Raw font file, when one is embedded.
    pub fn font_data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }
}

/// Process-wide font asset embedding the bundled Open Sans, built on first use.
pub fn bundled() -> &'static FontAsset {
    static FONT: OnceLock<FontAsset> = OnceLock::new();
    FONT.get_or_init(|| {
        FontAsset::from_font_bytes(DEFAULT_FONT_FAMILY, "font/woff", OPEN_SANS_WOFF)
    })
}

fn sanitize_family(family: &str) -> String {
    let family: String = family
        .chars()
        .filter(|c| !matches!(c, '"' | '\\' | '\'' | '<' | '>' | '&' | ';' | '{' | '}'))
        .collect();
    let family = family.trim();
    if family.is_empty() {
        DEFAULT_FONT_FAMILY.to_string()
    } else {
        family.to_string()
    }
}
