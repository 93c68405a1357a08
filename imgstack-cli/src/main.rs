use std::{path::PathBuf, time::Duration};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use imgstack::{
    ImageStack, Invalidate, PooledLoader, RasterCanvas, SLOT_COUNT, SchemeFetcher, StackConfig,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "imgstack", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load up to four images and render the stack as a PNG.
    Render(RenderArgs),
    /// Print the default stack configuration as JSON.
    Config,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Stack configuration JSON. Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Give up on loads still pending after this many milliseconds.
    #[arg(long, default_value_t = 10_000)]
    timeout_ms: u64,

    /// Loader worker threads.
    #[arg(long, default_value_t = SLOT_COUNT)]
    threads: usize,

    /// Image URLs or paths, front to back.
    urls: Vec<String>,
}

/// Headless host: redraw requests are only counted.
#[derive(Default)]
struct LogHost {
    redraws: usize,
}

impl Invalidate for LogHost {
    fn invalidate(&mut self) {
        self.redraws += 1;
        tracing::trace!(redraws = self.redraws, "redraw requested");
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Config => cmd_config(),
    }
}

fn cmd_config() -> anyhow::Result<()> {
    println!("{}", StackConfig::default().to_json_pretty()?);
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let (config, assets_root) = match &args.config {
        Some(path) => (
            StackConfig::from_path(path)?,
            path.parent()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
        ),
        None => (StackConfig::default(), PathBuf::from(".")),
    };

    let fetcher = SchemeFetcher::new(std::env::current_dir()?).context("create fetcher")?;
    let loader = PooledLoader::new(fetcher, args.threads)?;
    let mut stack = ImageStack::from_config(config, &assets_root, loader, LogHost::default())?;

    stack.set_images(&args.urls);
    if !stack.wait_for_loads(Duration::from_millis(args.timeout_ms)) {
        tracing::warn!(
            pending = stack.pending_loads(),
            "rendering with loads still pending"
        );
    }

    let (width, height) = stack.geometry().surface_size(SLOT_COUNT);
    let mut canvas = RasterCanvas::new(width, height)?;
    stack.draw(&mut canvas)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &canvas.to_rgba8(),
        canvas.width(),
        canvas.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    tracing::info!(
        out = %args.out.display(),
        width,
        height,
        redraws = stack.host().redraws,
        "wrote stack"
    );
    Ok(())
}
