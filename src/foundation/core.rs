use std::str::FromStr;

use crate::foundation::error::{FramesError, FramesResult};

/// Straight-alpha color with floating-point channels.
///
/// Channels are nominally in `[0, 1]`. Alpha parsed from user input is kept as given, so it may
/// fall outside that range; consumers that need a valid paint clamp with [`Rgba::clamped`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);

    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// Copy with every channel clamped into `[0, 1]`. NaN maps to 0.
    pub fn clamped(self) -> Self {
        fn c(v: f64) -> f64 {
            if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
        }
        Self::rgba(c(self.r), c(self.g), c(self.b), c(self.a))
    }
}

/// Placement of the document inside a canvas of a different aspect ratio.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Anchor {
    #[default]
    Center = 0,
    Start = 1,
    End = 2,
}

impl Anchor {
    /// Offset along one axis given the free space left after fitting the document.
    pub fn offset(self, free: f32) -> f32 {
        match self {
            Anchor::Start => 0.0,
            Anchor::Center => free / 2.0,
            Anchor::End => free,
        }
    }
}

impl FromStr for Anchor {
    type Err = FramesError;

    fn from_str(s: &str) -> FramesResult<Self> {
        match s.to_ascii_uppercase().as_str() {
            "CENTER" => Ok(Anchor::Center),
            "START" => Ok(Anchor::Start),
            "END" => Ok(Anchor::End),
            _ => Err(FramesError::Other(anyhow::anyhow!(
                "invalid position '{s}': expected CENTER, START or END"
            ))),
        }
    }
}

/// A `[<width>][x<height>]` size request. Zero means "unspecified".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SizeSpec {
    pub width: u32,
    pub height: u32,
}

impl SizeSpec {
    /// Parse a size, ignoring components that are not valid integers.
    pub fn parse_lenient(s: &str) -> Self {
        let mut parts = s.split('x');
        let width = parts.next().and_then(|v| v.trim().parse().ok()).unwrap_or(0);
        let height = parts.next().and_then(|v| v.trim().parse().ok()).unwrap_or(0);
        Self { width, height }
    }
}

impl FromStr for SizeSpec {
    type Err = FramesError;

    fn from_str(s: &str) -> FramesResult<Self> {
        fn component(v: &str, whole: &str) -> FramesResult<u32> {
            let v = v.trim();
            if v.is_empty() {
                return Ok(0);
            }
            v.parse().map_err(|_| FramesError::invalid_size(whole))
        }

        let parts: Vec<&str> = s.split('x').collect();
        match parts.as_slice() {
            [w] => Ok(Self {
                width: component(w, s)?,
                height: 0,
            }),
            [w, h] => Ok(Self {
                width: component(w, s)?,
                height: component(h, s)?,
            }),
            _ => Err(FramesError::invalid_size(s)),
        }
    }
}

/// Frames per second as handed to the rendering backend. Always at least 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fps(u32);

impl Fps {
    /// Coerce a caller-supplied rate; zero and negative values become 1.
    pub fn coerce(requested: i64) -> Self {
        Self(u32::try_from(requested.max(1)).unwrap_or(u32::MAX))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0)
    }

    /// Timeline position of frame `index`, in seconds from the document start.
    pub fn frame_time_secs(self, index: u64) -> f64 {
        (index as f64) / self.as_f64()
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self(25)
    }
}
