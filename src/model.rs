//! Diary records produced by extraction.
//!
//! Field order matches the JSON output: serde serializes struct fields in
//! declaration order.

use serde::{Deserialize, Serialize};

/// One diary entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Unix seconds.
    pub timestamp: i64,
    /// Body with its inline markup preserved.
    pub text: String,
    pub comments: Vec<Comment>,
}

/// A comment left on a diary entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub username: String,
    /// Unix seconds.
    pub timestamp: i64,
    pub text: String,
}

impl Post {
    pub fn new(timestamp: i64, text: impl Into<String>) -> Self {
        Self {
            timestamp,
            text: text.into(),
            comments: Vec::new(),
        }
    }

    pub fn with_comment(mut self, comment: Comment) -> Self {
        self.comments.push(comment);
        self
    }
}

impl Comment {
    pub fn new(username: impl Into<String>, timestamp: i64, text: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            timestamp,
            text: text.into(),
        }
    }
}
