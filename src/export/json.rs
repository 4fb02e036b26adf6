//! JSON exporter: the post list with nested comments.

use std::io::Write;

use serde::Serialize;
use serde_json::Serializer;
use serde_json::ser::PrettyFormatter;

use crate::error::Result;
use crate::images::ImageManifest;
use crate::model::Post;

use super::Exporter;

/// Writes posts as a JSON array indented by four spaces, followed by a newline.
///
/// Non-ASCII text is written as UTF-8, not as `\u` escapes.
#[derive(Debug, Clone, Default)]
pub struct JsonExporter;

impl JsonExporter {
    pub fn new() -> Self {
        Self
    }
}

impl Exporter for JsonExporter {
    fn export<W: Write>(
        &self,
        posts: &[Post],
        _images: &ImageManifest,
        writer: &mut W,
    ) -> Result<()> {
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut ser = Serializer::with_formatter(&mut *writer, formatter);
        posts.serialize(&mut ser)?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Comment;

    fn render(posts: &[Post]) -> String {
        let bytes = JsonExporter::new()
            .export_to_vec(posts, &ImageManifest::default())
            .unwrap();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(render(&[]), "[]\n");
    }

    #[test]
    fn test_field_order_and_indent() {
        let posts = [Post::new(1000, "hi").with_comment(Comment::new("u", 2000, "c"))];
        let expected = r#"[
    {
        "timestamp": 1000,
        "text": "hi",
        "comments": [
            {
                "username": "u",
                "timestamp": 2000,
                "text": "c"
            }
        ]
    }
]
"#;
        assert_eq!(render(&posts), expected);
    }

    #[test]
    fn test_non_ascii_kept() {
        let out = render(&[Post::new(0, "日記")]);
        assert!(out.contains("\"日記\""));
    }

    #[test]
    fn test_output_parses_back() {
        let posts = vec![
            Post::new(1, "a<br>b"),
            Post::new(2, "\"quoted\"").with_comment(Comment::new("x", 3, "y")),
        ];
        let parsed: Vec<Post> = serde_json::from_str(&render(&posts)).unwrap();
        assert_eq!(parsed, posts);
    }
}
