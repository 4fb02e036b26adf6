//! HTML exporter: a bare fragment listing every post and its comments.
//!
//! Post bodies already contain inline markup and are inserted as-is; only
//! newlines are turned into `<br>`. Posts keep their export order.

use std::io::Write;

use chrono::{Local, Utc};

use crate::error::Result;
use crate::images::ImageManifest;
use crate::model::{Comment, Post};
use crate::util::format_timestamp;

use super::Exporter;

/// Zone used to display timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Timezone {
    #[default]
    Local,
    Utc,
}

impl Timezone {
    fn format(self, timestamp: i64) -> Result<String> {
        match self {
            Timezone::Local => format_timestamp(timestamp, &Local),
            Timezone::Utc => format_timestamp(timestamp, &Utc),
        }
    }
}

/// Configuration for HTML export.
#[derive(Debug, Clone, Default)]
pub struct HtmlConfig {
    pub timezone: Timezone,
}

/// Exporter for the HTML reading view.
#[derive(Debug, Clone, Default)]
pub struct HtmlExporter {
    config: HtmlConfig,
}

impl HtmlExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: HtmlConfig) -> Self {
        Self { config }
    }

    fn render_post(&self, post: &Post) -> Result<String> {
        let comments = post
            .comments
            .iter()
            .map(|c| self.render_comment(c))
            .collect::<Result<Vec<_>>>()?
            .join("<br>");

        Ok(format!(
            "<div>DIARY: {}<br>{}<br>{}</div>",
            self.config.timezone.format(post.timestamp)?,
            post.text.replace('\n', "<br>"),
            comments
        ))
    }

    fn render_comment(&self, comment: &Comment) -> Result<String> {
        Ok(format!(
            "COMMENT: {} {}: {}",
            self.config.timezone.format(comment.timestamp)?,
            comment.username,
            comment.text
        ))
    }
}

impl Exporter for HtmlExporter {
    fn export<W: Write>(
        &self,
        posts: &[Post],
        _images: &ImageManifest,
        writer: &mut W,
    ) -> Result<()> {
        let blocks = posts
            .iter()
            .map(|p| self.render_post(p))
            .collect::<Result<Vec<_>>>()?;

        writer.write_all(blocks.join("<br>\n").as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}
