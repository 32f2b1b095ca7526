use crate::{
    backend::RenderBackend,
    config::RenderConfig,
    foundation::{
        core::Fps,
        error::{FramesError, FramesResult},
    },
};

/// One rendered sample: the logical frame index and its PNG encoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub index: u64,
    pub png: Vec<u8>,
}

impl Frame {
    pub fn len(&self) -> usize {
        self.png.len()
    }

    pub fn is_empty(&self) -> bool {
        self.png.is_empty()
    }
}

/// Owner of exactly one backend document handle.
///
/// The handle is released once, on the first [`close`](Self::close) or when the session is
/// dropped, whichever comes first. A closed session renders nothing.
pub struct RenderSession<B: RenderBackend> {
    backend: B,
    doc: Option<B::Document>,
    uri: String,
    fps: Fps,
    config: Option<RenderConfig>,
}

impl<B: RenderBackend> RenderSession<B> {
    /// Load `uri` through `backend`. `fps` below 1 is raised to 1.
    #[tracing::instrument(skip(backend, config))]
    pub fn open(
        mut backend: B,
        uri: &str,
        fps: i64,
        config: Option<RenderConfig>,
    ) -> FramesResult<Self> {
        let fps = Fps::coerce(fps);
        let doc = backend
            .load_document(uri, fps, config.as_ref())
            .map_err(|source| FramesError::DocumentLoad {
                uri: uri.to_string(),
                fps: fps.get(),
                width: config.map_or(0, |c| c.width()),
                height: config.map_or(0, |c| c.height()),
                source,
            })?;
        tracing::debug!(fps = fps.get(), "session opened");

        Ok(Self {
            backend,
            doc: Some(doc),
            uri: uri.to_string(),
            fps,
            config,
        })
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn fps(&self) -> Fps {
        self.fps
    }

    pub fn config(&self) -> Option<&RenderConfig> {
        self.config.as_ref()
    }

    /// Seconds into the animation sampled by frame `index`, before any configured time offset.
    pub fn sample_time(&self, index: u64) -> f64 {
        self.fps.frame_time_secs(index)
    }

    /// Render frame `index`, or `None` if the backend has nothing for it, failed to render it,
    /// or the session is closed.
    pub fn render_frame(&mut self, index: u64) -> Option<Frame> {
        let doc = self.doc.as_mut()?;
        match self.backend.render_frame_as_png(index, doc) {
            Ok(Some(png)) => Some(Frame { index, png }),
            Ok(None) => None,
            Err(err) => {
                tracing::debug!(index, error = %format!("{err:#}"), "backend failed to render frame");
                None
            }
        }
    }

    /// Release the backend handle. Further calls are no-ops.
    pub fn close(&mut self) {
        if let Some(doc) = self.doc.take() {
            self.backend.unload_document(doc);
            tracing::debug!(uri = %self.uri, "session closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.doc.is_none()
    }
}

impl<B: RenderBackend> Drop for RenderSession<B> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<B: RenderBackend> std::fmt::Debug for RenderSession<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderSession")
            .field("uri", &self.uri)
            .field("fps", &self.fps)
            .field("config", &self.config)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

/// What [`load_document`] does when the backend rejects a document.
pub enum LoadErrorPolicy<'a> {
    /// Swallow the error and return `Ok(None)`.
    Ignore,
    /// Return the error.
    Propagate,
    /// Hand the error to a callback, then return `Ok(None)`.
    Handle(Box<dyn FnOnce(FramesError) + 'a>),
}

impl std::fmt::Debug for LoadErrorPolicy<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ignore => f.write_str("Ignore"),
            Self::Propagate => f.write_str("Propagate"),
            Self::Handle(_) => f.write_str("Handle(..)"),
        }
    }
}

/// Open a session, routing load failures according to `policy`.
pub fn load_document<B: RenderBackend>(
    backend: B,
    uri: &str,
    fps: i64,
    config: Option<RenderConfig>,
    policy: LoadErrorPolicy<'_>,
) -> FramesResult<Option<RenderSession<B>>> {
    match RenderSession::open(backend, uri, fps, config) {
        Ok(session) => Ok(Some(session)),
        Err(err) => match policy {
            LoadErrorPolicy::Ignore => Ok(None),
            LoadErrorPolicy::Propagate => Err(err),
            LoadErrorPolicy::Handle(handler) => {
                handler(err);
                Ok(None)
            }
        },
    }
}
