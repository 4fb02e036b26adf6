//! Download script exporter.
//!
//! The script is plain POSIX `sh`: it creates the image directory, then for
//! each image sleeps and fetches it with `curl`, one at a time.

use std::io::Write;

use crate::error::Result;
use crate::images::{DEFAULT_IMAGE_DIR, ImageManifest};
use crate::model::Post;

use super::Exporter;

/// Configuration for the download script.
#[derive(Debug, Clone)]
pub struct ScriptConfig {
    /// Directory created before fetching. Must match the resolver's prefix.
    pub image_dir: String,
    /// Seconds to wait before each request.
    pub delay_secs: u32,
    /// HTTP client invoked as `<command> <url> > <path>`.
    pub fetch_command: String,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            image_dir: DEFAULT_IMAGE_DIR.to_string(),
            delay_secs: 1,
            fetch_command: "curl".to_string(),
        }
    }
}

/// Exporter for `download_images.sh`.
#[derive(Debug, Clone, Default)]
pub struct ScriptExporter {
    config: ScriptConfig,
}

impl ScriptExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ScriptConfig) -> Self {
        Self { config }
    }
}

impl Exporter for ScriptExporter {
    fn export<W: Write>(
        &self,
        _posts: &[Post],
        images: &ImageManifest,
        writer: &mut W,
    ) -> Result<()> {
        writeln!(writer, "#!/bin/sh")?;
        writeln!(writer, "mkdir -p {}", shell_quote(&self.config.image_dir))?;
        for image in images.references() {
            writeln!(
                writer,
                "sleep {}; {} {} > {}",
                self.config.delay_secs,
                self.config.fetch_command,
                shell_quote(&image.url),
                shell_quote(&image.path)
            )?;
        }
        Ok(())
    }
}

/// Quote a string as a single POSIX shell word.
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}
