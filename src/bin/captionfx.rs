use std::{
    io::Write as _,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use sha2::Digest as _;

#[derive(Parser, Debug)]
#[command(name = "captionfx", version)]
struct Cli {
    /// Log debug diagnostics to stderr (`RUST_LOG` takes precedence).
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate a single frame and print it as JSON.
    Frame(FrameArgs),
    /// Evaluate a frame range and write it as JSON.
    Eval(EvalArgs),
    /// Print the font size that fits a line of text.
    Fit(FitArgs),
    /// List built-in styles, or print one as JSON.
    Styles(StylesArgs),
    /// Print loaded font families with the SHA-256 of their source bytes.
    Fonts(FontsArgs),
}

#[derive(Args, Debug)]
struct JobArgs {
    /// Input caption job JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Override the job's style (built-in name).
    #[arg(long)]
    style: Option<String>,

    /// Override the job's canvas, e.g. `1080x1920`.
    #[arg(long, value_parser = parse_canvas)]
    canvas: Option<captionfx::Canvas>,

    /// Override the job's integer frame rate.
    #[arg(long)]
    fps: Option<u32>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    job: JobArgs,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

#[derive(Parser, Debug)]
struct EvalArgs {
    #[command(flatten)]
    job: JobArgs,

    /// First frame (inclusive).
    #[arg(long, default_value_t = 0)]
    start: u64,

    /// Last frame (exclusive); defaults to the job duration.
    #[arg(long)]
    end: Option<u64>,

    /// Output JSON path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Evaluate on a rayon thread pool.
    #[arg(long)]
    parallel: bool,

    /// Worker threads (implies --parallel).
    #[arg(long)]
    threads: Option<usize>,

    #[arg(long, default_value_t = 64)]
    chunk_size: usize,

    /// Reuse the result of identical frames instead of re-evaluating them.
    #[arg(long)]
    elide: bool,
}

#[derive(Parser, Debug)]
struct FitArgs {
    /// Font files or directories to load.
    #[arg(long = "font", required = true)]
    fonts: Vec<PathBuf>,

    /// Font family to measure with.
    #[arg(long)]
    family: String,

    /// Available line width in pixels.
    #[arg(long)]
    width: f64,

    /// Upper-case the text before measuring.
    #[arg(long)]
    uppercase: bool,

    /// Cap the result at this size.
    #[arg(long)]
    desired: Option<f64>,

    text: String,
}

#[derive(Parser, Debug)]
struct StylesArgs {
    /// Print this style's full descriptor as JSON.
    name: Option<String>,
}

#[derive(Parser, Debug)]
struct FontsArgs {
    /// Font files or directories to load.
    #[arg(long = "font", required = true)]
    fonts: Vec<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Eval(args) => cmd_eval(args),
        Command::Fit(args) => cmd_fit(args),
        Command::Styles(args) => cmd_styles(args),
        Command::Fonts(args) => cmd_fonts(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_canvas(s: &str) -> Result<captionfx::Canvas, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let width = w.trim().parse().map_err(|e| format!("width: {e}"))?;
    let height = h.trim().parse().map_err(|e| format!("height: {e}"))?;
    captionfx::Canvas::new(width, height).map_err(|e| e.to_string())
}

fn load_job(args: &JobArgs) -> anyhow::Result<(captionfx::PreparedJob, captionfx::FontBook)> {
    let mut job = captionfx::CaptionJob::from_path(&args.in_path)
        .with_context(|| format!("load caption job '{}'", args.in_path.display()))?;
    if let Some(style) = &args.style {
        job.style = captionfx::StyleRef::Named(style.clone());
    }
    if let Some(canvas) = args.canvas {
        job.canvas = canvas;
    }
    if let Some(fps) = args.fps {
        job.fps = captionfx::Fps::new(fps, 1)?;
    }
    let prepared = job.prepare().with_context(|| "prepare caption job")?;
    let fonts = job.load_fonts().with_context(|| "load job fonts")?;
    Ok((prepared, fonts))
}

fn load_fonts(paths: &[PathBuf]) -> anyhow::Result<captionfx::FontBook> {
    let mut book = captionfx::FontBook::new();
    for path in paths {
        if path.is_dir() {
            book.load_dir(path)?;
        } else {
            book.load_file(path)?;
        }
    }
    Ok(book)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let (job, fonts) = load_job(&args.job)?;
    let mut fitter = captionfx::TextFitter::new(captionfx::ParleyMeasurer::new(&fonts));
    let frame = captionfx::evaluate_frame(&job, &mut fitter, captionfx::FrameIndex(args.frame))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if args.pretty {
        serde_json::to_writer_pretty(&mut out, &frame)?;
    } else {
        serde_json::to_writer(&mut out, &frame)?;
    }
    writeln!(out)?;
    Ok(())
}

fn cmd_eval(args: EvalArgs) -> anyhow::Result<()> {
    let (job, fonts) = load_job(&args.job)?;
    let end = args.end.unwrap_or(job.duration.0);
    let range = captionfx::FrameRange::new(
        captionfx::FrameIndex(args.start),
        captionfx::FrameIndex(end),
    )?;
    let threading = captionfx::EvalThreading {
        parallel: args.parallel || args.threads.is_some(),
        chunk_size: args.chunk_size,
        threads: args.threads,
        static_frame_elision: args.elide,
    };

    let (frames, stats) =
        captionfx::evaluate_frames_with_stats(&job, &fonts, range, &threading)?;

    match &args.out {
        Some(path) => {
            ensure_parent_dir(path)?;
            let f = std::fs::File::create(path)
                .with_context(|| format!("create output '{}'", path.display()))?;
            serde_json::to_writer(std::io::BufWriter::new(f), &frames)
                .with_context(|| format!("write frames '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            serde_json::to_writer(&mut out, &frames)?;
            writeln!(out)?;
        }
    }
    eprintln!(
        "frames: {} evaluated: {} elided: {}",
        stats.frames_total, stats.frames_evaluated, stats.frames_elided
    );
    Ok(())
}

fn cmd_fit(args: FitArgs) -> anyhow::Result<()> {
    let fonts = load_fonts(&args.fonts)?;
    let family = fonts.require(&args.family)?.to_owned();
    let transform = if args.uppercase {
        captionfx::TextTransform::Uppercase
    } else {
        captionfx::TextTransform::None
    };
    let mut fitter = captionfx::TextFitter::new(captionfx::ParleyMeasurer::new(&fonts));
    let fitted = fitter.fit(&args.text, &family, args.width, transform)?;
    let size = match args.desired {
        Some(desired) => captionfx::final_font_size(desired, fitted),
        None => fitted.font_size,
    };
    println!("{size}");
    Ok(())
}

fn cmd_styles(args: StylesArgs) -> anyhow::Result<()> {
    match args.name {
        Some(name) => {
            let style = captionfx::builtin_style(&name)?;
            println!("{}", serde_json::to_string_pretty(&style)?);
        }
        None => {
            for name in captionfx::BUILTIN_STYLE_NAMES {
                println!("{name}");
            }
        }
    }
    Ok(())
}

fn cmd_fonts(args: FontsArgs) -> anyhow::Result<()> {
    let fonts = load_fonts(&args.fonts)?;
    for face in fonts.faces() {
        println!("{}", face.family);
        println!("    origin: {}", face.origin);
        println!("    sha256: {}", sha256_hex(&face.bytes));
    }
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}
