use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use nightreel::{Config, NarrationTrack, RenderThreading, ScriptBundle, VideoPipeline};

#[derive(Parser, Debug)]
#[command(name = "nightreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a narrated video (requires `ffmpeg` and `ffprobe` on PATH).
    Render(RenderArgs),
    /// Print the segment timing table for a script as JSON.
    Plan(PlanArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// YAML configuration file. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Script bundle JSON (`title`, `script`, `topic`, ...).
    #[arg(long)]
    script: PathBuf,

    /// Narration audio file.
    #[arg(long)]
    audio: PathBuf,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Narration duration in seconds; probed from the audio file when omitted.
    #[arg(long)]
    duration: Option<f64>,

    /// Render the vertical short-form frame.
    #[arg(long)]
    short: bool,

    /// Render frames on a worker pool.
    #[arg(long)]
    parallel: bool,

    /// Worker thread count for `--parallel`.
    #[arg(long)]
    threads: Option<usize>,

    /// Frames per scheduling chunk.
    #[arg(long, default_value_t = 64)]
    chunk_size: usize,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Script bundle JSON.
    #[arg(long)]
    script: PathBuf,

    /// Narration duration in seconds.
    #[arg(long)]
    duration: f64,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Plan(args) => cmd_plan(args),
    }
}

fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("nightreel=info"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false),
            )
            .with(env_filter)
            .init();
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::from_yaml_str("{}")?.with_credentials(nightreel::ProviderCredentials::from_env()),
    };
    if args.short {
        config = config.as_short();
    }

    let bundle = ScriptBundle::from_json_file(&args.script)?;
    let narration = match args.duration {
        Some(d) => NarrationTrack::new(&args.audio, d)?,
        None => NarrationTrack::probe(&args.audio)
            .with_context(|| format!("probe narration '{}'", args.audio.display()))?,
    };

    let threading = RenderThreading {
        parallel: args.parallel,
        chunk_size: args.chunk_size,
        threads: args.threads,
        ..RenderThreading::default()
    };
    let mut pipeline = VideoPipeline::new(&config)?.with_threading(threading);
    let (path, stats) = pipeline.create_video_with_stats(&bundle, &narration, &args.out)?;

    eprintln!(
        "wrote {} ({} segments, {} frames, {} elided)",
        path.display(),
        stats.segments,
        stats.frames_total,
        stats.frames_elided
    );
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let bundle = ScriptBundle::from_json_file(&args.script)?;
    let segments = nightreel::allocate_segments(&bundle.script, args.duration)?;

    let mut start = 0.0f64;
    let rows: Vec<serde_json::Value> = segments
        .iter()
        .map(|s| {
            let row = serde_json::json!({
                "start": start,
                "duration": s.duration,
                "word_count": s.word_count,
                "text": s.text,
            });
            start += s.duration;
            row
        })
        .collect();

    let table = serde_json::json!({
        "title": bundle.title,
        "duration": args.duration,
        "segments": rows,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&table).context("serialize plan")?
    );
    Ok(())
}
