use std::{io::Cursor, path::Path, sync::Arc};

use anyhow::Context as _;
use resvg::tiny_skia;

use crate::{
    backend::RenderBackend,
    config::RenderConfig,
    foundation::core::{Anchor, Fps, Rgba},
    uri::file_path,
};

const MAX_DIM: u32 = 16_384;

/// [`RenderBackend`] built on `usvg` + `resvg`.
///
/// resvg has no animation timeline, so every frame samples the document's static state. The
/// sample time is still computed and traced per frame.
pub struct ResvgBackend {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl ResvgBackend {
    /// Create a backend with the system fonts loaded.
    pub fn new() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        Self::with_fontdb(Arc::new(db))
    }

    pub fn with_fontdb(fontdb: Arc<usvg::fontdb::Database>) -> Self {
        Self { fontdb }
    }
}

impl Default for ResvgBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ResvgBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResvgBackend")
            .field("font_faces", &self.fontdb.len())
            .finish()
    }
}

/// A parsed document plus the canvas layout resolved from its [`RenderConfig`].
pub struct ResvgDocument {
    tree: usvg::Tree,
    fps: Fps,
    layout: Layout,
    time_offset: f64,
    background: Option<Rgba>,
    border: Option<Rgba>,
}

impl ResvgDocument {
    /// Output canvas size in pixels.
    pub fn canvas_size(&self) -> (u32, u32) {
        (self.layout.width, self.layout.height)
    }

    /// Timeline position sampled for frame `index`.
    pub fn sample_time(&self, index: u64) -> f64 {
        self.time_offset + self.fps.frame_time_secs(index)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Layout {
    width: u32,
    height: u32,
    scale: f32,
    dx: f32,
    dy: f32,
}

impl Layout {
    fn resolve(doc_w: f32, doc_h: f32, config: Option<&RenderConfig>) -> anyhow::Result<Self> {
        if !doc_w.is_finite() || !doc_h.is_finite() || doc_w <= 0.0 || doc_h <= 0.0 {
            anyhow::bail!("document has invalid width/height");
        }

        let (req_w, req_h, anchor) = match config {
            Some(c) => (c.width(), c.height(), c.anchor()),
            None => (0, 0, Anchor::Center),
        };

        let aspect = doc_w / doc_h;
        let (width, height) = match (req_w, req_h) {
            (0, 0) => (doc_w.ceil() as u32, doc_h.ceil() as u32),
            (w, 0) => (w, ((w as f32) / aspect).round().max(1.0) as u32),
            (0, h) => (((h as f32) * aspect).round().max(1.0) as u32, h),
            (w, h) => (w, h),
        };
        if width > MAX_DIM || height > MAX_DIM {
            anyhow::bail!("canvas too large: {width}x{height} (max {MAX_DIM}x{MAX_DIM})");
        }

        let scale = ((width as f32) / doc_w).min((height as f32) / doc_h);
        let dx = anchor.offset((width as f32) - doc_w * scale);
        let dy = anchor.offset((height as f32) - doc_h * scale);
        Ok(Self {
            width: width.max(1),
            height: height.max(1),
            scale,
            dx,
            dy,
        })
    }
}

impl RenderBackend for ResvgBackend {
    type Document = ResvgDocument;

    #[tracing::instrument(skip(self, config))]
    fn load_document(
        &mut self,
        uri: &str,
        fps: Fps,
        config: Option<&RenderConfig>,
    ) -> anyhow::Result<ResvgDocument> {
        let path = file_path(uri)
            .with_context(|| format!("unsupported uri scheme in '{uri}' (only file:// is readable)"))?;
        let bytes = std::fs::read(&path)
            .with_context(|| format!("read svg document from '{}'", path.display()))?;

        let opts = usvg::Options {
            resources_dir: path.parent().map(Path::to_path_buf),
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_data(&bytes, &opts).context("parse svg tree")?;

        let size = tree.size();
        let layout = Layout::resolve(size.width(), size.height(), config)?;
        tracing::debug!(?layout, "document loaded");

        Ok(ResvgDocument {
            tree,
            fps,
            layout,
            time_offset: config.map_or(0.0, RenderConfig::time_offset),
            background: config.and_then(RenderConfig::background),
            border: config.and_then(RenderConfig::border),
        })
    }

    fn unload_document(&mut self, doc: ResvgDocument) {
        drop(doc);
    }

    fn render_frame_as_png(
        &mut self,
        index: u64,
        doc: &mut ResvgDocument,
    ) -> anyhow::Result<Option<Vec<u8>>> {
        tracing::trace!(index, time = doc.sample_time(index), "sampling document");

        let Layout {
            width,
            height,
            scale,
            dx,
            dy,
        } = doc.layout;
        let mut pixmap = tiny_skia::Pixmap::new(width, height)
            .with_context(|| format!("allocate {width}x{height} pixmap"))?;

        if let Some(border) = doc.border {
            pixmap.fill(skia_color(border));
        }
        if let Some(background) = doc.background {
            let size = doc.tree.size();
            let area = tiny_skia::Rect::from_xywh(
                dx,
                dy,
                size.width() * scale,
                size.height() * scale,
            );
            if let Some(area) = area {
                let mut paint = tiny_skia::Paint::default();
                paint.set_color(skia_color(background));
                pixmap.fill_rect(area, &paint, tiny_skia::Transform::identity(), None);
            }
        }

        let xform = tiny_skia::Transform::from_row(scale, 0.0, 0.0, scale, dx, dy);
        resvg::render(&doc.tree, xform, &mut pixmap.as_mut());

        encode_png(&pixmap).map(Some)
    }
}

fn skia_color(c: Rgba) -> tiny_skia::Color {
    let c = c.clamped();
    tiny_skia::Color::from_rgba(c.r as f32, c.g as f32, c.b as f32, c.a as f32)
        .unwrap_or(tiny_skia::Color::TRANSPARENT)
}

fn encode_png(pixmap: &tiny_skia::Pixmap) -> anyhow::Result<Vec<u8>> {
    let straight: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    let img = image::RgbaImage::from_raw(pixmap.width(), pixmap.height(), straight)
        .context("pixmap buffer does not match its dimensions")?;

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode frame as png")?;
    Ok(buf)
}
