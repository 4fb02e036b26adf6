//! Assemble [`Post`] and [`Comment`] records from the normalized tree.
//!
//! Expected shape of a day entry:
//!
//! ```text
//! <day>
//!   <attributes tm="1234567890" .../>
//!   <body>rich <b>content</b></body>
//!   <comments>
//!     <comment><username/><timestamp/><body/></comment>
//!   </comments>
//! </day>
//! ```
//!
//! Missing `attributes` and `comments` children, and missing comment fields,
//! fall back to empty defaults. A missing `body` or an unparseable comment
//! timestamp aborts extraction.

use crate::error::{Error, Result};
use crate::model::{Comment, Post};
use crate::tree::{Node, content_string, find_child};

/// Maximum length of the markup excerpt attached to a missing-body error.
const CONTEXT_LIMIT: usize = 200;

/// Extract one post per direct child of `root`, in document order.
pub fn extract_all(root: &Node) -> Result<Vec<Post>> {
    let posts = root
        .children
        .iter()
        .enumerate()
        .map(|(index, day)| extract_post(day, index))
        .collect::<Result<Vec<_>>>()?;

    tracing::info!(
        posts = posts.len(),
        comments = posts.iter().map(|p| p.comments.len()).sum::<usize>(),
        "extracted diary"
    );
    Ok(posts)
}

/// Extract a single day entry. `index` is its position under the root and
/// only appears in error reports.
pub fn extract_post(day: &Node, index: usize) -> Result<Post> {
    let empty = Node::default();

    let tm = find_child(day, "attributes", &empty).attr("tm");
    let timestamp = match tm.map(|s| s.trim().parse::<i64>()) {
        Some(Ok(t)) => t,
        Some(Err(_)) | None => {
            tracing::debug!(index, tm = ?tm, "day entry without usable tm attribute, using 0");
            0
        }
    };

    let body = day.child("body").ok_or_else(|| Error::MissingBody {
        index,
        context: excerpt(day),
    })?;
    let text = content_string(body, true);

    let comments = find_child(day, "comments", &empty)
        .children
        .iter()
        .enumerate()
        .map(|(n, comment)| extract_comment(comment, index, n))
        .collect::<Result<Vec<_>>>()?;

    Ok(Post {
        timestamp,
        text,
        comments,
    })
}

/// Extract a comment. The body is read from `body`, or from `text` when the
/// export names it that way.
pub fn extract_comment(node: &Node, post: usize, index: usize) -> Result<Comment> {
    let empty = Node::default();

    let username = find_child(node, "username", &empty).text.clone();
    let raw_timestamp = &find_child(node, "timestamp", &empty).text;
    let text = node
        .child("body")
        .or_else(|| node.child("text"))
        .map(|n| n.text.clone())
        .unwrap_or_default();

    let timestamp = raw_timestamp
        .trim()
        .parse::<i64>()
        .map_err(|source| Error::InvalidTimestamp {
            post,
            comment: index,
            value: raw_timestamp.clone(),
            source,
        })?;

    Ok(Comment {
        username,
        timestamp,
        text,
    })
}

/// A short markup excerpt identifying a node in error messages.
fn excerpt(node: &Node) -> String {
    let markup = content_string(node, false);
    match markup.char_indices().nth(CONTEXT_LIMIT) {
        Some((cut, _)) => format!("{}...", &markup[..cut]),
        None => markup,
    }
}
