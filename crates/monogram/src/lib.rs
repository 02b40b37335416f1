#![forbid(unsafe_code)]

//! `monogram` generates initials avatars as fallbacks for image elements.
//!
//! When an image has no source, or its source fails to load, [`spirit::ImageSpirit`] swaps in a
//! generated avatar: a circle or square in a name-derived color carrying the name's initials,
//! encoded as an SVG data URI.
//!
//! # Features
//!
//! - `raster`: enable PNG/JPG output via pure-Rust SVG rasterization (`monogram::raster`)

pub use monogram_core::*;

pub mod spirit;

#[cfg(feature = "raster")]
pub mod raster;

pub use spirit::{ImageEvent, ImageHost, ImageSpirit, LoadState};
