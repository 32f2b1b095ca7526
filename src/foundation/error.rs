use std::path::PathBuf;

pub type FramesResult<T> = Result<T, FramesError>;

#[derive(thiserror::Error, Debug)]
pub enum FramesError {
    #[error("failed to load document '{uri}' ({w}x{h}@{fps}fps)", w = dim(.width), h = dim(.height))]
    DocumentLoad {
        uri: String,
        fps: u32,
        width: u32,
        height: u32,
        #[source]
        source: anyhow::Error,
    },

    #[error("invalid color format '{0}'")]
    InvalidColorFormat(String),

    #[error("image format {0} not supported")]
    UnsupportedFormat(String),

    #[error("file '{}' not found", .0.display())]
    FileNotFound(PathBuf),

    #[error("invalid output template '{0}': expected exactly one integer placeholder")]
    InvalidTemplate(String),

    #[error("invalid size '{0}': expected [<width>][x<height>]")]
    InvalidSize(String),

    #[error("failed to write '{}'", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// Unset dimensions print as empty, e.g. "(x240@25fps)".
fn dim(v: &u32) -> String {
    if *v == 0 { String::new() } else { v.to_string() }
}

impl FramesError {
    pub fn invalid_color(text: impl Into<String>) -> Self {
        Self::InvalidColorFormat(text.into())
    }

    pub fn unsupported_format(ext: impl Into<String>) -> Self {
        Self::UnsupportedFormat(ext.into())
    }

    pub fn invalid_template(template: impl Into<String>) -> Self {
        Self::InvalidTemplate(template.into())
    }

    pub fn invalid_size(text: impl Into<String>) -> Self {
        Self::InvalidSize(text.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
