use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use svg_frames::{
    Anchor, FramesError, OutputStrategy, RenderOverrides, ResvgBackend, Rgba, SequenceOpts,
    SizeSpec, file_uri, render_sequence,
};

#[derive(Parser, Debug)]
#[command(name = "svg2fps", version, about = "Render an SVG animation into numbered frames")]
struct Cli {
    /// Input SVG document.
    input_file: PathBuf,

    /// Output path template; `%d` receives the frame number.
    #[arg(default_value = "frame.%d.png")]
    output_file: String,

    /// Frames per second.
    #[arg(long, default_value_t = 25, allow_negative_numbers = true)]
    fps: i64,

    /// Duration in seconds.
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    dur: f64,

    /// Size of the document, `[<width>][x<height>]`.
    #[arg(long, value_name = "SIZE")]
    size: Option<SizeSpec>,

    /// Position of the document: CENTER, START or END.
    #[arg(long, value_name = "POSITION")]
    position: Option<Anchor>,

    /// Background color of the document.
    #[arg(long, value_name = "COLOR")]
    background: Option<Rgba>,

    /// Color where the canvas is not drawn. Defaults to transparent.
    ///
    /// COLOR is white, black or 'RRGGBB' hex, optionally followed by an opacity between 0.0 and
    /// 1.0 separated by a comma, e.g. 'ff00ff,0.5'.
    #[arg(long, value_name = "COLOR")]
    border: Option<Rgba>,

    /// Time offset of the animation in seconds.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    elapsed: f64,

    /// Start numbering with this index.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    first_index: i64,

    /// Log per-frame progress.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    svg_frames::logging::init(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if !cli.input_file.exists() {
        return Err(FramesError::FileNotFound(cli.input_file).into());
    }
    let output = OutputStrategy::new(&cli.output_file)?;

    let size = cli.size.unwrap_or_default();
    let opts = SequenceOpts {
        fps: cli.fps,
        duration_secs: cli.dur,
        first_index: cli.first_index,
        overrides: RenderOverrides {
            width: size.width,
            height: size.height,
            time_offset: cli.elapsed,
            anchor: cli.position.unwrap_or_default(),
            background: cli.background,
            border: cli.border,
        },
    };

    let uri = file_uri(&cli.input_file);
    render_sequence(ResvgBackend::new(), &uri, &opts, &output)?;
    Ok(())
}
