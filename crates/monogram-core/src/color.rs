//! Name-derived colors.
//!
//! A rolling hash over the UTF-16 code units of a name is turned into three channels (shifts
//! 3, 5 and 7 for red, green and blue). Each channel is averaged with a light base color and then
//! darkened or lightened by a modifier, so the same name always maps to the same pleasant tone.

use serde::{Deserialize, Serialize};

/// Light base the derived channels are blended toward.
pub const BASE_COLOR: Rgb = Rgb::new(245, 245, 245);

const RED_SHIFT: u32 = 3;
const GREEN_SHIFT: u32 = 5;
const BLUE_SHIFT: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Adds `modifier` to every channel, clamping to `0..=255`.
    pub fn shifted(self, modifier: i32) -> Self {
        fn shift(c: u8, n: i32) -> u8 {
            i32::from(c).saturating_add(n).clamp(0, 255) as u8
        }
        Self {
            r: shift(self.r, modifier),
            g: shift(self.g, modifier),
            b: shift(self.b, modifier),
        }
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        [c.r, c.g, c.b]
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// Rolling hash `h = c + ((h << shift) - h)` over UTF-16 code units.
///
/// The shift operates on the low 32 bits of `h` as a signed integer while the accumulation
/// itself stays wide, so long names keep growing past `i32` instead of wrapping.
pub fn hash(word: &str, shift: u32) -> u64 {
    let mut h: i64 = 0;
    for unit in word.encode_utf16() {
        let shifted = i64::from((h as i32).wrapping_shl(shift));
        h = i64::from(unit).wrapping_add(shifted.wrapping_sub(h));
    }
    h.unsigned_abs()
}

/// Maps the hash digits onto a channel: `floor(0.<digits> * 256)`.
pub fn color_channel(word: &str, shift: u32) -> u8 {
    let fraction = format!("0.{}", hash(word, shift))
        .parse::<f64>()
        .unwrap_or(0.0);
    (fraction * 256.0).floor().clamp(0.0, 255.0) as u8
}

pub fn color_for_name(name: &str, modifier: i32) -> Rgb {
    color_for_name_with_base(name, BASE_COLOR, modifier)
}

pub fn color_for_name_with_base(name: &str, base: Rgb, modifier: i32) -> Rgb {
    let blend = |c: u8, b: u8| ((u16::from(c) + u16::from(b)) / 2) as u8;
    Rgb {
        r: blend(color_channel(name, RED_SHIFT), base.r),
        g: blend(color_channel(name, GREEN_SHIFT), base.g),
        b: blend(color_channel(name, BLUE_SHIFT), base.b),
    }
    .shifted(modifier)
}

/// Unmodified avatar color for `name`, for callers that need to match it elsewhere
/// (e.g. coloring a text label next to the avatar).
pub fn get_color_for_string(name: &str) -> String {
    color_for_name(name, 0).to_string()
}
