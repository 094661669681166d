use clap::Parser;
use image_text_extractor::config::{self, Config};
use image_text_extractor::engines::EngineRegistry;
use image_text_extractor::preprocessing::FilterSettings;
use image_text_extractor::{DirectorySink, ExtractOutcome, Orchestrator, SelectedImage, SessionView};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "image-text-extractor")]
#[command(about = "Enhance an image and extract its text with OCR")]
#[command(version)]
pub struct Args {
    /// Image to read (PNG, JPEG, GIF, BMP, WebP, TIFF, ...)
    pub image: Option<PathBuf>,

    /// OCR language (e.g., "eng", "deu", "fra"; "eng+fra" for leptess)
    #[arg(long, env = "OCR_DEFAULT_LANGUAGE", default_value = config::DEFAULT_LANGUAGE)]
    pub language: String,

    /// OCR engine to use (defaults to the first one compiled in)
    #[arg(long, env = "OCR_ENGINE")]
    pub engine: Option<String>,

    /// Maximum file size in bytes (default: 50MB)
    #[arg(long, env = "OCR_MAX_FILE_SIZE", default_value_t = config::DEFAULT_MAX_FILE_SIZE)]
    pub max_file_size: usize,

    /// Path to tessdata directory (downloaded into the cache dir if not set)
    #[arg(long, env = "TESSDATA_PREFIX")]
    pub tessdata_path: Option<String>,

    /// Contrast multiplier applied before recognition
    #[arg(long, default_value_t = FilterSettings::default().contrast)]
    pub contrast: f32,

    /// Brightness multiplier applied after contrast
    #[arg(long, default_value_t = FilterSettings::default().brightness)]
    pub brightness: f32,

    /// Directory that receives extractedText.txt
    #[arg(long, short = 'o', default_value = ".")]
    pub output_dir: PathBuf,

    /// Print the text without writing extractedText.txt
    #[arg(long)]
    pub no_export: bool,

    /// Print an extraction report as JSON instead of plain text
    #[arg(long)]
    pub json: bool,

    /// List available engines and exit
    #[arg(long)]
    pub list_engines: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Whether this invocation uses an OCR engine at all
    fn needs_engines(&self) -> bool {
        self.image.is_some() || self.list_engines
    }
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        Self {
            default_language: args.language.clone(),
            engine: args.engine.clone(),
            max_file_size: args.max_file_size,
            tessdata_path: args.tessdata_path.clone(),
            filter: FilterSettings {
                contrast: args.contrast,
                brightness: args.brightness,
            },
            output_dir: args.output_dir.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout carries only the extracted text
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from(&args);

    tracing::info!(
        "Starting image-text-extractor v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Engines may download models; skip that when there is nothing to do
    if !args.needs_engines() {
        tracing::info!("No image selected, nothing to extract");
        return Ok(());
    }

    let registry = EngineRegistry::new(&config)?;

    if args.list_engines {
        println!("{}", serde_json::to_string_pretty(&registry.info())?);
        return Ok(());
    }

    let engine = registry.select(config.engine.as_deref())?;
    let orchestrator = Orchestrator::new(engine, config.filter);

    // A missing or unreadable file leaves nothing selected
    if let Some(path) = &args.image {
        orchestrator.select_loaded(SelectedImage::open(path, config.max_file_size));
    }

    match orchestrator.extract_text(&config.default_language).await {
        ExtractOutcome::Completed => {}
        ExtractOutcome::NoImage => {
            tracing::info!("No image selected, nothing to extract");
            return Ok(());
        }
        ExtractOutcome::AlreadyRunning | ExtractOutcome::Failed => return Ok(()),
    }

    let state = orchestrator.state();
    match state.view() {
        SessionView::Result(text) => {
            if args.json {
                if let Some(report) = orchestrator.last_report() {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
            } else {
                println!("{}", text);
            }
        }
        SessionView::Idle => tracing::info!("No text recognized"),
        SessionView::Loading => {}
    }

    if !args.no_export {
        let sink = DirectorySink::new(&config.output_dir);
        if let Some(path) = orchestrator.export_text(&sink)? {
            tracing::info!("Saved text to {}", path.display());
        }
    }

    Ok(())
}
