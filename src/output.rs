use std::path::{Path, PathBuf};

use anyhow::Context as _;
use image::ImageFormat;

use crate::{
    foundation::error::{FramesError, FramesResult},
    template::{PathTemplate, insert_placeholder},
};

/// How frames reach disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Backend PNG bytes are written unmodified.
    Direct,
    /// PNG bytes are decoded and encoded again in the given format.
    Reencode(ImageFormat),
}

/// Per-frame file naming and encoding for one output template.
#[derive(Clone, Debug)]
pub struct OutputStrategy {
    template: PathTemplate,
    format: OutputFormat,
}

impl OutputStrategy {
    /// Resolve the output format from the template's extension and validate the placeholder.
    ///
    /// - `.png` (exact, case-sensitive) is written directly.
    /// - No extension is written directly as PNG: `.png` is appended, preceded by `.%d` when
    ///   the template carries no placeholder.
    /// - Anything else is re-encoded; an extension without an available encoder fails here
    ///   with [`FramesError::UnsupportedFormat`], before any frame is rendered.
    ///
    /// Templates without a placeholder get one inserted before the extension.
    pub fn new(template: &str) -> FramesResult<Self> {
        let ext = Path::new(template)
            .extension()
            .map(|e| e.to_string_lossy().into_owned());

        let (candidate, format) = match ext.as_deref() {
            Some("png") => (template.to_string(), OutputFormat::Direct),
            None => {
                let candidate = if PathTemplate::parse(template).is_some() {
                    format!("{template}.png")
                } else {
                    format!("{template}.%d.png")
                };
                (candidate, OutputFormat::Direct)
            }
            Some(ext) => (template.to_string(), OutputFormat::Reencode(encoder_for(ext)?)),
        };

        let template = resolve_template(&candidate)?;
        tracing::debug!(template = %template, ?format, "output resolved");
        Ok(Self { template, format })
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn is_direct(&self) -> bool {
        self.format == OutputFormat::Direct
    }

    pub fn template(&self) -> &PathTemplate {
        &self.template
    }

    pub fn path_for(&self, index: i64) -> PathBuf {
        self.template.render(index)
    }

    /// Write one frame's PNG bytes at output index `index`, returning the path written.
    pub fn write(&self, index: i64, png: &[u8]) -> FramesResult<PathBuf> {
        let path = self.path_for(index);
        ensure_parent_dir(&path)?;

        match self.format {
            OutputFormat::Direct => {
                std::fs::write(&path, png).map_err(|e| FramesError::io(&path, e))?;
            }
            OutputFormat::Reencode(format) => {
                let img = image::load_from_memory_with_format(png, ImageFormat::Png)?;
                prepare_for(format, img)
                    .save_with_format(&path, format)
                    .with_context(|| format!("encode {format:?} frame '{}'", path.display()))?;
            }
        }
        Ok(path)
    }
}

/// Multi-frame containers; per-frame still encoding cannot produce them.
const ANIMATED_CONTAINERS: [&str; 2] = ["apng", "mng"];

fn encoder_for(ext: &str) -> FramesResult<ImageFormat> {
    if ANIMATED_CONTAINERS.iter().any(|c| c.eq_ignore_ascii_case(ext)) {
        return Err(FramesError::unsupported_format(format!(".{ext}")));
    }
    ImageFormat::from_extension(ext)
        .filter(|f| f.writing_enabled() && accepts_any_size(*f))
        .ok_or_else(|| FramesError::unsupported_format(format!(".{ext}")))
}

/// ICO caps both dimensions at 256 pixels, which frame sizes routinely exceed.
fn accepts_any_size(format: ImageFormat) -> bool {
    format != ImageFormat::Ico
}

fn resolve_template(candidate: &str) -> FramesResult<PathTemplate> {
    if let Some(t) = PathTemplate::parse(candidate) {
        return Ok(t);
    }
    let synthesized = insert_placeholder(candidate);
    PathTemplate::parse(&synthesized).ok_or_else(|| FramesError::invalid_template(candidate))
}

fn ensure_parent_dir(path: &Path) -> FramesResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Convert a decoded frame into a pixel layout `format` can encode.
fn prepare_for(format: ImageFormat, img: image::DynamicImage) -> image::DynamicImage {
    match format {
        ImageFormat::Jpeg | ImageFormat::Pnm => {
            image::DynamicImage::ImageRgb8(flatten_to_rgb8(&img.to_rgba8(), [0, 0, 0]))
        }
        ImageFormat::Hdr => image::DynamicImage::ImageRgb32F(img.to_rgb32f()),
        ImageFormat::OpenExr => image::DynamicImage::ImageRgba32F(img.to_rgba32f()),
        ImageFormat::Farbfeld => image::DynamicImage::ImageRgba16(img.to_rgba16()),
        _ => img,
    }
}

/// Composite straight-alpha RGBA8 over an opaque background.
fn flatten_to_rgb8(src: &image::RgbaImage, bg: [u8; 3]) -> image::RgbImage {
    image::RgbImage::from_fn(src.width(), src.height(), |x, y| {
        let [r, g, b, a] = src.get_pixel(x, y).0;
        let a = u16::from(a);
        let inv = 255 - a;
        let mix = |c: u8, bg: u8| (mul_div255(u16::from(c), a) + mul_div255(u16::from(bg), inv)).min(255) as u8;
        image::Rgb([mix(r, bg[0]), mix(g, bg[1]), mix(b, bg[2])])
    })
}

fn mul_div255(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_without_placeholder_gets_one_inserted() {
        let out = OutputStrategy::new("frame.png").unwrap();
        assert!(out.is_direct());
        assert_eq!(out.template().as_str(), "frame.%d.png");
        assert_eq!(out.path_for(3), PathBuf::from("frame.3.png"));
    }

    #[test]
    fn explicit_placeholder_is_kept() {
        let out = OutputStrategy::new("f%d.png").unwrap();
        assert!(out.is_direct());
        assert_eq!(out.template().as_str(), "f%d.png");
        assert_eq!(out.path_for(12), PathBuf::from("f12.png"));
    }

    #[test]
    fn missing_extension_forces_png() {
        let out = OutputStrategy::new("frames").unwrap();
        assert!(out.is_direct());
        assert_eq!(out.template().as_str(), "frames.%d.png");

        let out = OutputStrategy::new("out/f%03d").unwrap();
        assert_eq!(out.path_for(7), PathBuf::from("out/f007.png"));
    }

    #[test]
    fn gif_always_reencodes_with_or_without_placeholder() {
        let plain = OutputStrategy::new("out.gif").unwrap();
        assert_eq!(plain.format(), OutputFormat::Reencode(ImageFormat::Gif));
        assert_eq!(plain.path_for(1), PathBuf::from("out.1.gif"));

        let explicit = OutputStrategy::new("out.%d.gif").unwrap();
        assert_eq!(explicit.format(), plain.format());
        assert_eq!(explicit.path_for(1), plain.path_for(1));
    }

    #[test]
    fn extension_match_for_direct_png_is_case_sensitive() {
        let out = OutputStrategy::new("frame.PNG").unwrap();
        assert_eq!(out.format(), OutputFormat::Reencode(ImageFormat::Png));
        assert_eq!(out.path_for(0), PathBuf::from("frame.0.PNG"));
    }

    #[test]
    fn formats_without_an_encoder_fail_at_construction() {
        for t in ["movie.apng", "movie.mng", "notes.txt", "frame.", "icon.ico", "tex.dds", "old.pcx"] {
            assert!(
                matches!(OutputStrategy::new(t), Err(FramesError::UnsupportedFormat(_))),
                "{t}"
            );
        }
        assert_eq!(
            OutputStrategy::new("movie.mng").unwrap_err().to_string(),
            "image format .mng not supported"
        );
    }

    #[test]
    fn unusable_template_is_rejected_up_front() {
        assert!(matches!(
            OutputStrategy::new("a%d%d.png"),
            Err(FramesError::InvalidTemplate(_))
        ));
        assert!(matches!(
            OutputStrategy::new("100%.png"),
            Err(FramesError::InvalidTemplate(_))
        ));
    }

    #[test]
    fn float_and_wide_formats_get_matching_pixel_layouts() {
        let img = image::DynamicImage::ImageRgba8(image::RgbaImage::new(1, 1));
        assert!(matches!(
            prepare_for(ImageFormat::OpenExr, img.clone()),
            image::DynamicImage::ImageRgba32F(_)
        ));
        assert!(matches!(
            prepare_for(ImageFormat::Farbfeld, img.clone()),
            image::DynamicImage::ImageRgba16(_)
        ));
        assert!(matches!(
            prepare_for(ImageFormat::Hdr, img.clone()),
            image::DynamicImage::ImageRgb32F(_)
        ));
        assert!(matches!(prepare_for(ImageFormat::Jpeg, img), image::DynamicImage::ImageRgb8(_)));
    }

    #[test]
    fn flatten_over_black_scales_by_alpha() {
        let src = image::RgbaImage::from_raw(1, 1, vec![255, 0, 0, 128]).unwrap();
        let dst = flatten_to_rgb8(&src, [0, 0, 0]);
        assert_eq!(dst.get_pixel(0, 0).0, [128, 0, 0]);

        let opaque = image::RgbaImage::from_raw(1, 1, vec![10, 20, 30, 255]).unwrap();
        assert_eq!(flatten_to_rgb8(&opaque, [255, 255, 255]).get_pixel(0, 0).0, [10, 20, 30]);
    }
}
