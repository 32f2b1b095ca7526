//! Render an SVG document's animation into a numbered sequence of still images.
//!
//! The pieces, in the order a run uses them:
//!
//! - [`parse_color`] / [`SizeSpec`] turn command-line text into typed values.
//! - [`RenderOverrides::assemble`] builds the all-or-nothing [`RenderConfig`].
//! - [`RenderSession`] owns one [`RenderBackend`] document and renders frames as PNG.
//! - [`OutputStrategy`] maps frame numbers to paths and re-encodes non-PNG outputs.
//! - [`render_sequence`] drives the whole thing for a frame rate and duration.
#![forbid(unsafe_code)]

pub mod backend;
pub mod color;
pub mod config;
pub mod logging;
pub mod output;
pub mod sequence;
pub mod session;
pub mod template;
pub mod uri;

mod foundation;

pub use backend::{
    RenderBackend,
    cpu::{ResvgBackend, ResvgDocument},
};
pub use color::parse_color;
pub use config::{RenderConfig, RenderOverrides, assemble};
pub use foundation::core::{Anchor, Fps, Rgba, SizeSpec};
pub use foundation::error::{FramesError, FramesResult};
pub use output::{OutputFormat, OutputStrategy};
pub use sequence::{SequenceOpts, SequenceStats, frame_count, render_sequence};
pub use session::{Frame, LoadErrorPolicy, RenderSession, load_document};
pub use template::PathTemplate;
pub use uri::{file_uri, resolve_uri};
