use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

mod scene;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the JSON scene
    #[arg(value_name = "SCENE")]
    scene: PathBuf,

    /// Output PNG path
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Also write CPU previews of each element's shader functions
    #[arg(long)]
    preview: bool,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum LogFormat {
    Pretty,
    Json,
}

fn init_logging(level: LogLevel, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(level.to_string().parse()?)
        .from_env_lossy();

    let subscriber_builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match format {
        LogFormat::Json => subscriber_builder.json().init(),
        LogFormat::Pretty => subscriber_builder.pretty().init(),
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let output = cli
        .output
        .unwrap_or_else(|| cli.scene.with_extension("png"));

    info!("Scene: {:?}", cli.scene);
    info!("Output: {:?}", output);

    let scene = scene::Scene::load(&cli.scene)?;
    let image = scene::render(&scene)?;
    scene::write_png(&image, &output)?;

    if cli.preview {
        for (i, (glass, border)) in scene::previews(&scene)?.iter().enumerate() {
            let stem = output.with_extension("");
            let stem = stem.to_string_lossy();
            scene::write_png(glass, &PathBuf::from(format!("{}.glass{}.png", stem, i)))?;
            scene::write_png(border, &PathBuf::from(format!("{}.border{}.png", stem, i)))?;
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = init_logging(cli.log_level, cli.log_format) {
        eprintln!("Invalid log configuration: {}", e);
        std::process::exit(2);
    }
    if let Err(e) = run(cli) {
        error!("Render failed: {:#}", e);
        std::process::exit(1);
    }
}
