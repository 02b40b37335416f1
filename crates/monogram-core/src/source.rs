//! Memoized SVG data URIs.

use crate::color::color_for_name_with_base;
use crate::config::{AvatarConfig, Capabilities};
use crate::font::{self, FontAsset};
use crate::initials::initials;
use crate::svg::{AvatarMarkup, render_avatar_svg};
use crate::{Error, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use rustc_hash::FxHashMap;
use std::borrow::Cow;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

pub const SVG_DATA_URI_PREFIX: &str = "data:image/svg+xml;base64,";

/// Cache key: the arguments exactly as given, so `(10, 20)` and `(20, 10)` are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SourceKey {
    name: String,
    width: Option<u32>,
    height: Option<u32>,
}

/// Generates fallback avatars for one configuration and memoizes their data URIs.
///
/// The cache is unbounded and lives as long as the generator; the number of distinct
/// `(name, width, height)` triples seen by a UI session is small. The generator is `Send + Sync`.
#[derive(Debug)]
pub struct AvatarGenerator {
    config: AvatarConfig,
    capabilities: Capabilities,
    font: Cow<'static, FontAsset>,
    cache: Mutex<FxHashMap<SourceKey, Arc<str>>>,
}

impl Default for AvatarGenerator {
    fn default() -> Self {
        Self::with_font(
            AvatarConfig::default(),
            Capabilities::default(),
            Cow::Borrowed(font::bundled()),
        )
    }
}

impl AvatarGenerator {
    /// Builds a generator, embedding `config.font_path` when set.
    pub fn new(config: AvatarConfig, capabilities: Capabilities) -> Result<Self> {
        let font = match &config.font_path {
            Some(path) => Cow::Owned(FontAsset::from_path(&config.font_family, path)?),
            None if config.font_family == font::DEFAULT_FONT_FAMILY => {
                Cow::Borrowed(font::bundled())
            }
            None => Cow::Owned(FontAsset::declared(&config.font_family)),
        };
        Ok(Self::with_font(config, capabilities, font))
    }

    pub fn with_font(
        config: AvatarConfig,
        capabilities: Capabilities,
        font: Cow<'static, FontAsset>,
    ) -> Self {
        Self {
            config,
            capabilities,
            font,
            cache: Mutex::new(FxHashMap::default()),
        }
    }

    pub fn config(&self) -> &AvatarConfig {
        &self.config
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn font(&self) -> &FontAsset {
        &self.font
    }

    /// `width || height || default_size`; zero counts as absent.
    pub fn size_for(&self, width: Option<u32>, height: Option<u32>) -> u32 {
        width
            .filter(|w| *w > 0)
            .or(height.filter(|h| *h > 0))
            .unwrap_or(self.config.default_size)
    }

    /// Renders the avatar markup without touching the cache.
    pub fn svg(&self, name: &str, width: Option<u32>, height: Option<u32>) -> String {
        let initials = initials(name);
        let cfg = &self.config;
        let font_stylesheet = self
            .capabilities
            .font_delivery
            .then(|| self.font.stylesheet_uri());
        render_avatar_svg(&AvatarMarkup {
            initials: &initials,
            primary: color_for_name_with_base(name, cfg.base_color, cfg.background_modifier),
            secondary: color_for_name_with_base(name, cfg.base_color, cfg.foreground_modifier),
            size: self.size_for(width, height),
            font_stylesheet,
            font_face_css: self.font.css(),
            font_family: self.font.family(),
            shape: cfg.shape,
            inline_font_css: cfg.inline_font_css,
        })
    }

    /// Returns the `data:image/svg+xml;base64,...` source for `name`, computing it at most once
    /// per distinct argument triple.
    pub fn source(&self, name: &str, width: Option<u32>, height: Option<u32>) -> Arc<str> {
        let key = SourceKey {
            name: name.to_string(),
            width,
            height,
        };
        if let Some(hit) = self.lock_cache().get(&key) {
            tracing::trace!(name, ?width, ?height, "avatar source cache hit");
            return Arc::clone(hit);
        }

        let svg = self.svg(name, width, height);
        let mut uri = String::with_capacity(SVG_DATA_URI_PREFIX.len() + svg.len() * 4 / 3 + 4);
        uri.push_str(SVG_DATA_URI_PREFIX);
        STANDARD.encode_string(svg.as_bytes(), &mut uri);
        tracing::debug!(name, ?width, ?height, len = uri.len(), "generated avatar source");

        let mut cache = self.lock_cache();
        Arc::clone(cache.entry(key).or_insert_with(|| Arc::from(uri)))
    }

    pub fn cache_len(&self) -> usize {
        self.lock_cache().len()
    }

    pub fn clear_cache(&self) {
        self.lock_cache().clear();
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, FxHashMap<SourceKey, Arc<str>>> {
        // Entries are inserted whole; a panic elsewhere cannot leave one half-written.
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn default_generator() -> &'static AvatarGenerator {
    static GENERATOR: OnceLock<AvatarGenerator> = OnceLock::new();
    GENERATOR.get_or_init(AvatarGenerator::default)
}

/// Process-wide memoized source using the default configuration.
pub fn get_source(name: &str, width: Option<u32>, height: Option<u32>) -> Arc<str> {
    default_generator().source(name, width, height)
}

/// Decodes an SVG data URI produced by [`AvatarGenerator::source`] back into markup.
pub fn decode_source(uri: &str) -> Result<String> {
    let payload = uri
        .trim()
        .strip_prefix(SVG_DATA_URI_PREFIX)
        .ok_or(Error::NotSvgDataUri {
            expected: SVG_DATA_URI_PREFIX,
        })?;
    let bytes = STANDARD.decode(payload)?;
    Ok(String::from_utf8(bytes)?)
}
