//! diaryconv - adiary export converter

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use diaryconv::export::{DEFAULT_INPUT, ExportConfig, HtmlConfig, Timezone, write_outputs};
use diaryconv::{ImageResolver, convert_file};

#[derive(Parser)]
#[command(name = "diaryconv")]
#[command(version, about = "Convert an adiary XML diary export", long_about = None)]
#[command(after_help = "OUTPUTS:
    posts.json            Posts with their comments
    download_images.sh    Fetches embedded images into images/
    diary.html            Plain reading view

EXAMPLES:
    diaryconv                       Convert ./adiary.xml into the current directory
    diaryconv export.xml -o out     Convert export.xml into out/
    sh download_images.sh           Then fetch the images")]
struct Cli {
    /// Diary export produced by mixi_export
    #[arg(value_name = "INPUT", default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Directory the output files are written to
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    out_dir: PathBuf,

    /// Seconds the download script waits before each image
    #[arg(long, value_name = "SECS", default_value_t = 1)]
    delay: u32,

    /// Render HTML timestamps in UTC instead of local time
    #[arg(long)]
    utc: bool,

    /// Suppress output messages
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    let config = ExportConfig {
        input: cli.input,
        out_dir: cli.out_dir,
        fetch_delay_secs: cli.delay,
        html: HtmlConfig {
            timezone: if cli.utc { Timezone::Utc } else { Timezone::Local },
        },
        ..ExportConfig::default()
    };

    match convert(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(quiet: bool) {
    let default = if quiet { "diaryconv=warn" } else { "diaryconv=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn convert(config: &ExportConfig) -> diaryconv::Result<()> {
    let resolver = ImageResolver::with_image_dir(config.image_dir.as_str());
    let diary = convert_file(&config.input, &resolver)?;
    let paths = write_outputs(&diary.posts, &diary.images, config)?;

    tracing::info!(
        posts = diary.posts.len(),
        images = diary.images.len(),
        json = %paths.posts.display(),
        script = %paths.script.display(),
        html = %paths.html.display(),
        "conversion finished"
    );
    Ok(())
}
