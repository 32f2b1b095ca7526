use crate::foundation::core::{Anchor, Rgba};

/// Caller-facing render overrides. Every field at its default means "let the backend decide".
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RenderOverrides {
    /// Canvas width in pixels, `0` for unspecified.
    pub width: u32,
    /// Canvas height in pixels, `0` for unspecified.
    pub height: u32,
    /// Seconds added to every frame's sample time.
    pub time_offset: f64,
    pub anchor: Anchor,
    /// Fill behind the document area.
    pub background: Option<Rgba>,
    /// Fill for the canvas area the document does not cover.
    pub border: Option<Rgba>,
}

impl RenderOverrides {
    pub fn is_default(&self) -> bool {
        self.width == 0
            && self.height == 0
            && self.time_offset == 0.0
            && self.anchor == Anchor::Center
            && self.background.is_none()
            && self.border.is_none()
    }

    /// Collapse the overrides into the all-or-nothing form the backend consumes.
    pub fn assemble(self) -> Option<RenderConfig> {
        if self.is_default() {
            return None;
        }
        Some(RenderConfig {
            width: self.width,
            height: self.height,
            time_offset: self.time_offset,
            anchor: self.anchor,
            background: self.background,
            border: self.border,
        })
    }
}

/// Positional form of [`RenderOverrides::assemble`].
pub fn assemble(
    width: u32,
    height: u32,
    time_offset: f64,
    anchor: Anchor,
    background: Option<Rgba>,
    border: Option<Rgba>,
) -> Option<RenderConfig> {
    RenderOverrides {
        width,
        height,
        time_offset,
        anchor,
        background,
        border,
    }
    .assemble()
}

/// A complete, explicit render configuration.
///
/// Only obtainable through [`RenderOverrides::assemble`], so holding one always means at least one
/// field differs from the defaults. Absence of a configuration is expressed as `Option::None`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderConfig {
    width: u32,
    height: u32,
    time_offset: f64,
    anchor: Anchor,
    background: Option<Rgba>,
    border: Option<Rgba>,
}

impl RenderConfig {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn time_offset(&self) -> f64 {
        self.time_offset
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn background(&self) -> Option<Rgba> {
        self.background
    }

    pub fn border(&self) -> Option<Rgba> {
        self.border
    }
}
