//! Article records exchanged with the surrounding system.

use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArticleError {
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("invalid article JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// An article as supplied by the content source.
///
/// Only `summary` and `model_name` are written by this crate. Any other
/// fields the source attached (ids, urls, dates) are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, alias = "modelName", skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Article {
    pub fn new(title: impl Into<String>, content: Option<String>) -> Self {
        Self {
            title: title.into(),
            content,
            summary: None,
            model_name: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// Read a JSON array of articles.
pub fn read_articles<R: Read>(reader: R) -> Result<Vec<Article>, ArticleError> {
    Ok(serde_json::from_reader(reader)?)
}

pub fn load_articles<P: AsRef<Path>>(path: P) -> Result<Vec<Article>, ArticleError> {
    let file = std::fs::File::open(path)?;
    read_articles(std::io::BufReader::new(file))
}

/// Write articles as a pretty-printed JSON array.
pub fn write_articles<W: Write>(mut writer: W, articles: &[Article]) -> Result<(), ArticleError> {
    serde_json::to_writer_pretty(&mut writer, articles)?;
    writeln!(writer)?;
    Ok(())
}

pub fn save_articles<P: AsRef<Path>>(path: P, articles: &[Article]) -> Result<(), ArticleError> {
    let file = std::fs::File::create(path)?;
    write_articles(std::io::BufWriter::new(file), articles)
}
