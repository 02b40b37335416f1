#![forbid(unsafe_code)]

//! Deterministic initials avatars.
//!
//! A display name is turned into initials and a pair of name-derived colors, rendered as a small
//! SVG and encoded as a `data:image/svg+xml;base64,...` URI suitable for an image source. The
//! pipeline is pure: the same `(name, width, height)` always yields byte-identical output, which is
//! what makes the [`AvatarGenerator`] memo cache sound.

pub mod color;
pub mod config;
pub mod error;
pub mod font;
pub mod initials;
pub mod source;
pub mod svg;

pub use color::{Rgb, color_for_name, get_color_for_string, hash};
pub use config::{AvatarConfig, Capabilities, DEFAULT_SIZE};
pub use error::{Error, Result};
pub use font::FontAsset;
pub use initials::initials;
pub use source::{AvatarGenerator, SVG_DATA_URI_PREFIX, decode_source, get_source};
pub use svg::{AvatarMarkup, Shape, render_avatar_svg};
