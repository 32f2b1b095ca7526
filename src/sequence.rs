use crate::{
    backend::RenderBackend,
    config::RenderOverrides,
    foundation::{
        core::Fps,
        error::{FramesError, FramesResult},
    },
    output::OutputStrategy,
    session::RenderSession,
};

/// Options for [`render_sequence`].
#[derive(Clone, Debug, PartialEq)]
pub struct SequenceOpts {
    /// Requested frame rate. Values below 1 still yield one frame and are raised to 1 for sampling.
    pub fps: i64,
    /// Animation span to cover, in seconds.
    pub duration_secs: f64,
    /// Output number given to logical frame 0. Shifts file names only, never sample times.
    pub first_index: i64,
    pub overrides: RenderOverrides,
}

impl Default for SequenceOpts {
    fn default() -> Self {
        Self {
            fps: 25,
            duration_secs: 1.0,
            first_index: 0,
            overrides: RenderOverrides::default(),
        }
    }
}

impl SequenceOpts {
    /// Number of frames covering `[0, duration]` with both endpoints included.
    pub fn frame_count(&self) -> u64 {
        frame_count(self.fps, self.duration_secs)
    }

    /// Output number for logical frame `frame`.
    pub fn output_index(&self, frame: u64) -> i64 {
        self.first_index.saturating_add_unsigned(frame)
    }

    /// Sample time of every logical frame, in seconds (before the configured time offset).
    pub fn sample_times(&self) -> Vec<f64> {
        let fps = Fps::coerce(self.fps);
        (0..self.frame_count())
            .map(|f| fps.frame_time_secs(f))
            .collect()
    }
}

/// `floor(fps * duration) + 1`, or 0 when that is not positive.
pub fn frame_count(fps: i64, duration_secs: f64) -> u64 {
    let n = (fps as f64 * duration_secs).floor() + 1.0;
    if n.is_finite() && n >= 1.0 { n as u64 } else { 0 }
}

/// Outcome of a [`render_sequence`] run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SequenceStats {
    pub frames_total: u64,
    pub frames_written: u64,
    /// Output indices the backend produced no data for.
    pub missing: Vec<i64>,
}

/// Render every frame of `uri` covered by `opts` and write it through `output`.
///
/// Frames the backend has no data for are logged and skipped. A failed write aborts the run.
/// The backend document is released on every path out of this function.
#[tracing::instrument(skip(backend, output), fields(template = %output.template()))]
pub fn render_sequence<B: RenderBackend>(
    backend: B,
    uri: &str,
    opts: &SequenceOpts,
    output: &OutputStrategy,
) -> FramesResult<SequenceStats> {
    if !opts.duration_secs.is_finite() {
        return Err(FramesError::Other(anyhow::anyhow!(
            "duration must be a finite number of seconds, got {}",
            opts.duration_secs
        )));
    }

    let config = opts.overrides.assemble();
    let mut session = RenderSession::open(backend, uri, opts.fps, config)?;

    let mut stats = SequenceStats {
        frames_total: opts.frame_count(),
        ..Default::default()
    };
    for f in 0..stats.frames_total {
        let index = opts.output_index(f);
        match session.render_frame(f) {
            Some(frame) => {
                let path = output.write(index, &frame.png)?;
                tracing::debug!(index, bytes = frame.len(), path = %path.display(), "frame written");
                stats.frames_written += 1;
            }
            None => {
                tracing::warn!("frame {index} has no data");
                stats.missing.push(index);
            }
        }
    }
    session.close();

    tracing::info!(
        total = stats.frames_total,
        written = stats.frames_written,
        missing = stats.missing.len(),
        "sequence rendered"
    );
    Ok(stats)
}
