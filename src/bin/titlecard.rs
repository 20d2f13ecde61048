use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;

use titlecard::{
    BatchJob, Composer, DEFAULT_FONT_SIZE_PX, FontSpec, Theme, Tier, TitleRequest, decode_source,
    process_batch, resolve_title, save_copy,
};

#[derive(Parser, Debug)]
#[command(name = "titlecard", version)]
struct Cli {
    /// Title text; overrides the title derived from the file name.
    #[arg(short, long)]
    title: Option<String>,

    /// Input image path, or an input directory with --batch.
    #[arg(short, long)]
    path: PathBuf,

    /// Output directory (defaults to the input's directory).
    #[arg(short, long = "output-path")]
    output: Option<PathBuf>,

    /// Logo image drawn as a thumbnail in the bottom-left corner.
    #[arg(short, long = "logo-path")]
    logo: Option<PathBuf>,

    /// Accent tier: "free" or "premium". Anything else draws no outline.
    #[arg(short = 'r', long)]
    tier: Option<String>,

    /// Title every image in the --path directory instead of a single file.
    #[arg(short, long, default_value_t = false)]
    batch: bool,

    /// Font file (.ttf/.otf); defaults to the first system font found.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Font size in pixels.
    #[arg(long, default_value_t = DEFAULT_FONT_SIZE_PX)]
    font_size: f32,

    /// Separator replaced by spaces when deriving titles from file names.
    #[arg(long, default_value_t = '-')]
    separator: char,

    /// JSON theme file; keys left out keep their defaults.
    #[arg(long)]
    theme: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let theme = match &cli.theme {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("read theme '{}'", path.display()))?;
            serde_json::from_str(&json)
                .with_context(|| format!("parse theme '{}'", path.display()))?
        }
        None => Theme::default(),
    };
    let tier = cli.tier.as_deref().map(Tier::from_token).unwrap_or_default();
    let font = FontSpec {
        source: cli.font.clone(),
        size_px: cli.font_size,
    };
    let output_dir = match &cli.output {
        Some(dir) => dir.clone(),
        None => default_output_dir(&cli.path, cli.batch),
    };

    if cli.batch {
        let report = process_batch(&BatchJob {
            input_dir: cli.path,
            output_dir,
            tier,
            logo_path: cli.logo,
            font,
            separator: cli.separator,
            theme,
        })?;
        eprintln!(
            "titled {} of {} images ({} failed)",
            report.succeeded.len(),
            report.attempted(),
            report.failed.len()
        );
        return Ok(());
    }

    let source = decode_source(&cli.path)?;
    let title = resolve_title(cli.title.as_deref(), Some(&cli.path), cli.separator);
    let mut composer = Composer::new(theme);
    let composed = composer.compose(&TitleRequest {
        source,
        title,
        tier,
        logo_path: cli.logo,
        font,
    })?;
    let out = save_copy(&composed, &output_dir)?;
    eprintln!("wrote {}", out.display());
    Ok(())
}

fn default_output_dir(input: &Path, batch: bool) -> PathBuf {
    if batch {
        return input.to_path_buf();
    }
    input
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}
