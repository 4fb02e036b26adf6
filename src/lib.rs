//! # diaryconv
//!
//! Converts an adiary XML diary export (dated entries with rich-text bodies
//! and comments) into:
//!
//! - `posts.json`: a flat list of [`Post`] records
//! - `diary.html`: a minimal reading view
//! - `download_images.sh`: a shell script fetching every embedded image
//!
//! ## Pipeline
//!
//! 1. [`tree::parse_document`] normalizes the XML into a [`Node`] tree.
//! 2. [`extract::extract_all`] turns each day entry into a [`Post`].
//! 3. [`ImageResolver::resolve_all`] numbers image URLs and points post text
//!    at the local copies.
//! 4. The [`export`] module renders the artifacts.
//!
//! ## Quick Start
//!
//! ```no_run
//! use diaryconv::export::{ExportConfig, write_outputs};
//! use diaryconv::{ImageResolver, convert_file};
//!
//! let config = ExportConfig::default();
//! let diary = convert_file(&config.input, &ImageResolver::new())?;
//! write_outputs(&diary.posts, &diary.images, &config)?;
//! # Ok::<(), diaryconv::Error>(())
//! ```
//!
//! Everything is in memory and deterministic: running twice on the same
//! export produces identical files.

pub mod error;
pub mod export;
pub mod extract;
pub mod images;
pub mod model;
pub mod tree;
pub(crate) mod util;

use std::fs;
use std::path::Path;

pub use error::{Error, Result};
pub use images::{ImageManifest, ImageReference, ImageResolver, extract_image_urls};
pub use model::{Comment, Post};
pub use tree::Node;

/// Posts extracted from one export, with their image manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diary {
    pub posts: Vec<Post>,
    pub images: ImageManifest,
}

/// Run the whole pipeline on an XML string.
pub fn convert_str(xml: &str, resolver: &ImageResolver) -> Result<Diary> {
    let root = tree::parse_str(xml)?;
    from_tree(&root, resolver)
}

/// Run the whole pipeline on raw export bytes, detecting their encoding.
pub fn convert_bytes(bytes: &[u8], resolver: &ImageResolver) -> Result<Diary> {
    let root = tree::parse_document(bytes)?;
    from_tree(&root, resolver)
}

/// Read an export from disk and run the whole pipeline.
pub fn convert_file(path: impl AsRef<Path>, resolver: &ImageResolver) -> Result<Diary> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "read diary export");
    convert_bytes(&bytes, resolver)
}

fn from_tree(root: &Node, resolver: &ImageResolver) -> Result<Diary> {
    let mut posts = extract::extract_all(root)?;
    let images = resolver.resolve_all(&mut posts);
    Ok(Diary { posts, images })
}
