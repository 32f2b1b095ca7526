//! The call contract between a [`RenderSession`](crate::RenderSession) and the library that
//! actually parses, animates and rasterizes documents.

pub mod cpu;

use crate::{config::RenderConfig, foundation::core::Fps};

/// A stateful document renderer.
///
/// Documents are opaque handles owned by the caller between [`load_document`] and
/// [`unload_document`]. Handles are not assumed reentrant: one render at a time per handle.
///
/// [`load_document`]: RenderBackend::load_document
/// [`unload_document`]: RenderBackend::unload_document
pub trait RenderBackend {
    type Document;

    /// Load the document at `uri`. `config: None` selects the backend's defaults (intrinsic
    /// size, no fills, no time offset).
    fn load_document(
        &mut self,
        uri: &str,
        fps: Fps,
        config: Option<&RenderConfig>,
    ) -> anyhow::Result<Self::Document>;

    fn unload_document(&mut self, doc: Self::Document);

    /// Render frame `index` as PNG bytes. `Ok(None)` means the document has no data for that
    /// frame; `Err` is a rendering failure.
    fn render_frame_as_png(
        &mut self,
        index: u64,
        doc: &mut Self::Document,
    ) -> anyhow::Result<Option<Vec<u8>>>;
}

impl<B: RenderBackend + ?Sized> RenderBackend for &mut B {
    type Document = B::Document;

    fn load_document(
        &mut self,
        uri: &str,
        fps: Fps,
        config: Option<&RenderConfig>,
    ) -> anyhow::Result<Self::Document> {
        (**self).load_document(uri, fps, config)
    }

    fn unload_document(&mut self, doc: Self::Document) {
        (**self).unload_document(doc)
    }

    fn render_frame_as_png(
        &mut self,
        index: u64,
        doc: &mut Self::Document,
    ) -> anyhow::Result<Option<Vec<u8>>> {
        (**self).render_frame_as_png(index, doc)
    }
}
