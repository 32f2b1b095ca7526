use std::{io::Write as _, path::PathBuf, process::ExitCode};

use anyhow::Context as _;
use clap::{CommandFactory, Parser};
use svg_frames::{
    FramesError, LoadErrorPolicy, RenderOverrides, ResvgBackend, SizeSpec, load_document,
    resolve_uri,
};

#[derive(Parser, Debug)]
#[command(name = "svg2png", version, about = "Render the first frame of an SVG document as PNG")]
struct Cli {
    /// Document uri or local path. Paths that do not exist are fetched over http.
    uri: String,

    /// Output PNG file. Writes to standard output when omitted.
    output_file: Option<PathBuf>,

    /// Size of the document, `[<width>][x<height>]`. Unparseable parts are ignored.
    size: Option<String>,
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
    svg_frames::logging::init(false);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            report(Some(&err));
            ExitCode::FAILURE
        }
    }
}

fn report(err: Option<&anyhow::Error>) {
    if let Some(err) = err {
        eprintln!("Error: {err:#}");
    }
    eprintln!("{}", Cli::command().render_usage());
}

fn run(cli: Cli) -> anyhow::Result<bool> {
    let uri = resolve_uri(&cli.uri);
    let size = cli
        .size
        .as_deref()
        .map(SizeSpec::parse_lenient)
        .unwrap_or_default();
    let config = RenderOverrides {
        width: size.width,
        height: size.height,
        ..Default::default()
    }
    .assemble();

    let on_error = |err: FramesError| report(Some(&anyhow::Error::from(err)));
    let Some(mut session) = load_document(
        ResvgBackend::new(),
        &uri,
        0,
        config,
        LoadErrorPolicy::Handle(Box::new(on_error)),
    )?
    else {
        return Ok(false);
    };

    let Some(frame) = session.render_frame(0) else {
        report(None);
        return Ok(false);
    };
    session.close();

    match cli.output_file {
        Some(path) => std::fs::write(&path, &frame.png)
            .with_context(|| format!("write png '{}'", path.display()))?,
        None => {
            let mut out = std::io::stdout().lock();
            out.write_all(&frame.png).context("write png to stdout")?;
            out.flush().context("flush stdout")?;
        }
    }
    Ok(true)
}
