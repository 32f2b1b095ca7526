//! Textual color descriptions: `white`, `black` or `RRGGBB`, optionally followed by
//! `,<opacity>` (e.g. `ff00ff,0.5`).

use std::str::FromStr;

use crate::foundation::core::Rgba;
use crate::foundation::error::{FramesError, FramesResult};

/// Parse a color description into straight-alpha [`Rgba`].
///
/// Opacity defaults to `1.0` and is taken as written: values outside `[0, 1]` are not clamped.
pub fn parse_color(text: &str) -> FramesResult<Rgba> {
    let mut parts = text.split(',');
    let color = parts.next().unwrap_or_default();
    let opacity = parts.next();
    if parts.next().is_some() {
        return Err(FramesError::invalid_color(text));
    }

    let base = parse_base(color).ok_or_else(|| FramesError::invalid_color(text))?;
    let a = match opacity {
        None => 1.0,
        Some(o) => o
            .trim()
            .parse::<f64>()
            .map_err(|_| FramesError::invalid_color(text))?,
    };
    Ok(base.with_alpha(a))
}

fn parse_base(color: &str) -> Option<Rgba> {
    if color.eq_ignore_ascii_case("white") {
        return Some(Rgba::WHITE);
    }
    if color.eq_ignore_ascii_case("black") {
        return Some(Rgba::BLACK);
    }
    if color.len() != 6 || !color.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |i: usize| -> Option<f64> {
        let v = u8::from_str_radix(&color[i..i + 2], 16).ok()?;
        Some(f64::from(v) / 255.0)
    };
    Some(Rgba::rgba(channel(0)?, channel(2)?, channel(4)?, 1.0))
}

impl FromStr for Rgba {
    type Err = FramesError;

    fn from_str(s: &str) -> FramesResult<Self> {
        parse_color(s)
    }
}
