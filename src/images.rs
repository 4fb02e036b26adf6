//! Image URL discovery and local path assignment.
//!
//! Diary bodies link images on the original service. Each distinct URL gets a
//! local path `images/NNNNNN.ext`, numbered in sorted URL order so that the
//! same export always produces the same numbering. Bodies are then rewritten
//! to point at the local files, and the resulting [`ImageManifest`] drives the
//! download script.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex_lite::Regex;

use crate::model::Post;

/// Directory (relative to the output directory) that images are saved into.
pub const DEFAULT_IMAGE_DIR: &str = "images";

/// Soft line-break markup the service inserts into long URLs.
const WBR: &str = "<wbr />";

/// Shortest http(s) URL ending in `.jpg` or `.gif`.
static IMAGE_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://.*?\.(?:jpg|gif)").unwrap());

/// A discovered image and the local path assigned to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    /// URL with any `<wbr />` markup removed.
    pub url: String,
    /// Assigned path, e.g. `images/000003.jpg`.
    pub path: String,
    /// Every spelling of the URL seen in post text, including the clean one.
    raw_forms: BTreeSet<String>,
}

/// All image references of one conversion, in index order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageManifest {
    references: Vec<ImageReference>,
}

impl ImageManifest {
    pub fn references(&self) -> &[ImageReference] {
        &self.references
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    /// Assigned path for a clean URL.
    pub fn path_for(&self, url: &str) -> Option<&str> {
        self.references
            .iter()
            .find(|r| r.url == url)
            .map(|r| r.path.as_str())
    }

    /// Replace every occurrence of every known URL in `text` with its local path.
    ///
    /// Longer URLs are replaced first so a URL that is a substring of another
    /// cannot clobber part of the longer one.
    pub fn rewrite(&self, text: &str) -> String {
        let mut replacements: Vec<(&str, &str)> = self
            .references
            .iter()
            .flat_map(|r| r.raw_forms.iter().map(move |raw| (raw.as_str(), r.path.as_str())))
            .collect();
        replacements.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(b.0)));

        let mut out = text.to_string();
        for (from, to) in replacements {
            if out.contains(from) {
                out = out.replace(from, to);
            }
        }
        out
    }
}

/// Assigns local paths to image URLs and rewrites post bodies.
#[derive(Debug, Clone)]
pub struct ImageResolver {
    image_dir: String,
}

impl Default for ImageResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageResolver {
    pub fn new() -> Self {
        Self {
            image_dir: DEFAULT_IMAGE_DIR.to_string(),
        }
    }

    /// Use a different directory prefix for assigned paths.
    pub fn with_image_dir(image_dir: impl Into<String>) -> Self {
        Self {
            image_dir: image_dir.into(),
        }
    }

    /// Build the manifest for a set of texts without modifying anything.
    ///
    /// URLs are deduplicated and sorted before numbering, so the result does
    /// not depend on the order the texts are given in.
    pub fn plan<'a>(&self, texts: impl IntoIterator<Item = &'a str>) -> ImageManifest {
        let mut found: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for text in texts {
            for (raw, clean) in find_image_urls(text) {
                let forms = found.entry(clean.clone()).or_default();
                forms.insert(raw.to_string());
                forms.insert(clean);
            }
        }

        let references = found
            .into_iter()
            .enumerate()
            .map(|(index, (url, raw_forms))| {
                let path = format!("{}/{:06}{}", self.image_dir, index, url_extension(&url));
                ImageReference {
                    url,
                    path,
                    raw_forms,
                }
            })
            .collect();

        ImageManifest { references }
    }

    /// Number every image found in the posts and rewrite their text in place.
    pub fn resolve_all(&self, posts: &mut [Post]) -> ImageManifest {
        let manifest = self.plan(posts.iter().map(|p| p.text.as_str()));

        for post in posts.iter_mut() {
            post.text = manifest.rewrite(&post.text);
        }

        tracing::info!(images = manifest.len(), "resolved image references");
        manifest
    }
}

/// Image URLs in `text`, in order of appearance, with `<wbr />` removed.
pub fn extract_image_urls(text: &str) -> Vec<String> {
    find_image_urls(text).into_iter().map(|(_, clean)| clean).collect()
}

fn find_image_urls(text: &str) -> Vec<(&str, String)> {
    IMAGE_URL_RE
        .find_iter(text)
        .map(|m| (m.as_str(), m.as_str().replace(WBR, "")))
        .collect()
}

/// Extension of the last path segment, dot included, or `""` when there is
/// none. Leading dots of the segment do not start an extension.
fn url_extension(url: &str) -> &str {
    let name = url.rsplit('/').next().unwrap_or(url);
    let stem_start = name.len() - name.trim_start_matches('.').len();
    match name[stem_start..].rfind('.') {
        Some(dot) => &name[stem_start + dot..],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_extract_image_urls() {
        let text = "see http://a/x.jpg and https://b/y.gif, not https://c/z.png";
        assert_eq!(extract_image_urls(text), ["http://a/x.jpg", "https://b/y.gif"]);
    }

    #[test]
    fn test_extract_is_non_greedy() {
        let text = "https://x/a.jpg then more text https://x/b.jpg";
        assert_eq!(extract_image_urls(text), ["https://x/a.jpg", "https://x/b.jpg"]);
    }

    #[test]
    fn test_extract_is_case_sensitive() {
        assert!(extract_image_urls("https://x/a.JPG").is_empty());
    }

    #[test]
    fn test_extract_strips_wbr() {
        let text = "<a href='x'>https://img.example.com/very/long<wbr />/path.jpg</a>";
        assert_eq!(
            extract_image_urls(text),
            ["https://img.example.com/very/long/path.jpg"]
        );
    }

    #[test]
    fn test_url_extension() {
        assert_eq!(url_extension("https://x/a.jpg"), ".jpg");
        assert_eq!(url_extension("https://x/dir.d/a.tar.gif"), ".gif");
        assert_eq!(url_extension("https://x/a"), "");
        assert_eq!(url_extension("https://x/.jpg"), "");
    }

    #[test]
    fn test_sorted_index_assignment() {
        let resolver = ImageResolver::new();
        let manifest = resolver.plan(["https://x/b.jpg https://x/a.gif"]);

        assert_eq!(manifest.path_for("https://x/a.gif"), Some("images/000000.gif"));
        assert_eq!(manifest.path_for("https://x/b.jpg"), Some("images/000001.jpg"));
    }

    #[test]
    fn test_duplicates_share_one_path() {
        let manifest = ImageResolver::new().plan(["https://x/a.jpg", "again https://x/a.jpg"]);
        assert_eq!(manifest.len(), 1);
    }

    #[test]
    fn test_resolve_all_rewrites_posts() {
        let mut posts = vec![
            Post::new(1, "hi https://x/a.jpg bye"),
            Post::new(2, "https://x/b<wbr />c.gif and https://x/a.jpg"),
        ];
        let manifest = ImageResolver::new().resolve_all(&mut posts);

        assert_eq!(manifest.len(), 2);
        assert_eq!(posts[0].text, "hi images/000000.jpg bye");
        assert_eq!(posts[1].text, "images/000001.gif and images/000000.jpg");
    }

    #[test]
    fn test_custom_image_dir() {
        let manifest = ImageResolver::with_image_dir("media").plan(["http://x/a.jpg"]);
        assert_eq!(manifest.references()[0].path, "media/000000.jpg");
    }

    #[test]
    fn test_rewrite_longest_first() {
        let short = "http://x/a.jpg";
        let long = "http://y/?u=http://x/a.jpg";
        let manifest = ImageResolver::new().plan([long, short]);
        // Sorted: "http://x/a.jpg" < "http://y/..."
        assert_eq!(manifest.path_for(short), Some("images/000000.jpg"));
        assert_eq!(manifest.path_for(long), Some("images/000001.jpg"));

        let rewritten = manifest.rewrite(&format!("{long} {short}"));
        assert_eq!(rewritten, "images/000001.jpg images/000000.jpg");
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let mut posts = vec![Post::new(0, "a https://x/a.jpg b http://y/b.gif")];
        let resolver = ImageResolver::new();
        resolver.resolve_all(&mut posts);
        let once = posts.clone();

        let second = resolver.resolve_all(&mut posts);
        assert!(second.is_empty());
        assert_eq!(posts, once);
    }

    proptest! {
        #[test]
        fn prop_indexing_ignores_discovery_order(
            names in prop::collection::btree_set("[a-z]{1,6}", 1..8),
            seed in any::<u64>(),
        ) {
            let urls: Vec<String> = names
                .iter()
                .enumerate()
                .map(|(i, n)| format!("https://x/{n}.{}", if i % 2 == 0 { "jpg" } else { "gif" }))
                .collect();
            let mut shuffled = urls.clone();
            let len = shuffled.len();
            shuffled.rotate_left((seed as usize) % len);
            shuffled.reverse();

            let resolver = ImageResolver::new();
            let a = resolver.plan(urls.iter().map(String::as_str));
            let b = resolver.plan(shuffled.iter().map(String::as_str));
            prop_assert_eq!(a, b);
        }

        #[test]
        fn prop_no_url_survives_rewrite(
            names in prop::collection::vec("[a-z]{1,6}", 1..6),
        ) {
            let text: String = names
                .iter()
                .map(|n| format!("x https://h/{n}.jpg "))
                .collect();
            let mut posts = vec![Post::new(0, text)];
            ImageResolver::new().resolve_all(&mut posts);
            prop_assert!(extract_image_urls(&posts[0].text).is_empty());
        }
    }
}
