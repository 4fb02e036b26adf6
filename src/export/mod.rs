//! Export module for writing converted diaries.
//!
//! Provides the `Exporter` trait and one implementation per output artifact:
//!
//! - [`JsonExporter`]: the post list as indented JSON
//! - [`HtmlExporter`]: a minimal HTML fragment for reading
//! - [`ScriptExporter`]: a POSIX shell script that downloads every image
//!
//! # Example
//!
//! ```no_run
//! use diaryconv::{ImageResolver, convert_file};
//! use diaryconv::export::{Exporter, JsonExporter};
//! use std::fs::File;
//!
//! let diary = convert_file("adiary.xml", &ImageResolver::new())?;
//! let mut file = File::create("posts.json")?;
//! JsonExporter::new().export(&diary.posts, &diary.images, &mut file)?;
//! # Ok::<(), diaryconv::Error>(())
//! ```

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::images::{DEFAULT_IMAGE_DIR, ImageManifest};
use crate::model::Post;

mod html;
mod json;
mod script;

pub use html::{HtmlConfig, HtmlExporter, Timezone};
pub use json::JsonExporter;
pub use script::{ScriptConfig, ScriptExporter, shell_quote};

/// Default input file name.
pub const DEFAULT_INPUT: &str = "adiary.xml";
pub const DEFAULT_POSTS_FILE: &str = "posts.json";
pub const DEFAULT_SCRIPT_FILE: &str = "download_images.sh";
pub const DEFAULT_HTML_FILE: &str = "diary.html";

/// Trait for exporting converted posts.
///
/// Exporters hold their configuration and write a complete artifact to any
/// `Write` destination (`File`, `Vec<u8>`, ...).
pub trait Exporter {
    fn export<W: Write>(&self, posts: &[Post], images: &ImageManifest, writer: &mut W)
    -> Result<()>;

    /// Render to an in-memory buffer.
    fn export_to_vec(&self, posts: &[Post], images: &ImageManifest) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.export(posts, images, &mut buf)?;
        Ok(buf)
    }
}

/// Where the input is read from and where the three artifacts go.
///
/// The default reproduces the fixed layout: `adiary.xml` in, and
/// `posts.json`, `download_images.sh`, `diary.html` written next to it with
/// images fetched into `images/`.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub input: PathBuf,
    pub out_dir: PathBuf,
    pub posts_file: String,
    pub script_file: String,
    pub html_file: String,
    /// Image directory, relative to `out_dir`.
    pub image_dir: String,
    pub html: HtmlConfig,
    /// Seconds the download script waits before each fetch.
    pub fetch_delay_secs: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            out_dir: PathBuf::from("."),
            posts_file: DEFAULT_POSTS_FILE.to_string(),
            script_file: DEFAULT_SCRIPT_FILE.to_string(),
            html_file: DEFAULT_HTML_FILE.to_string(),
            image_dir: DEFAULT_IMAGE_DIR.to_string(),
            html: HtmlConfig::default(),
            fetch_delay_secs: 1,
        }
    }
}

impl ExportConfig {
    fn script_config(&self) -> ScriptConfig {
        ScriptConfig {
            image_dir: self.image_dir.clone(),
            delay_secs: self.fetch_delay_secs,
            ..ScriptConfig::default()
        }
    }
}

/// Paths of the files written by [`write_outputs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub posts: PathBuf,
    pub script: PathBuf,
    pub html: PathBuf,
}

/// Write all three artifacts into `config.out_dir`.
///
/// Each file is rendered fully in memory and written in one call. Any
/// failure aborts; nothing is retried.
pub fn write_outputs(
    posts: &[Post],
    images: &ImageManifest,
    config: &ExportConfig,
) -> Result<OutputPaths> {
    fs::create_dir_all(&config.out_dir)?;

    let paths = OutputPaths {
        posts: config.out_dir.join(&config.posts_file),
        script: config.out_dir.join(&config.script_file),
        html: config.out_dir.join(&config.html_file),
    };

    write_artifact(&JsonExporter::new(), posts, images, &paths.posts)?;
    write_artifact(
        &ScriptExporter::with_config(config.script_config()),
        posts,
        images,
        &paths.script,
    )?;
    write_artifact(
        &HtmlExporter::with_config(config.html.clone()),
        posts,
        images,
        &paths.html,
    )?;

    Ok(paths)
}

fn write_artifact<E: Exporter>(
    exporter: &E,
    posts: &[Post],
    images: &ImageManifest,
    path: &Path,
) -> Result<()> {
    let bytes = exporter.export_to_vec(posts, images)?;
    fs::write(path, &bytes)?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "wrote output");
    Ok(())
}
