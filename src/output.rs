use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;

pub const DECLARATION_EXT: &str = ".d.ts";

#[async_trait]
pub trait OutputWriter: Send + Sync {
    async fn write(&self, path: &Path, content: &str) -> Result<()>;
}

/// Writes declaration files to disk, creating parent directories as needed.
pub struct FsWriter;

#[async_trait]
impl OutputWriter for FsWriter {
    async fn write(&self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
        tokio::fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}

/// `CallbackURL` → `callbackURL.d.ts`. `None` when the name has no
/// alphanumeric characters.
pub fn file_name(class_name: &str) -> Option<String> {
    let mut stem = String::new();
    let words = class_name
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty());

    for (i, word) in words.enumerate() {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            if i == 0 {
                stem.extend(first.to_lowercase());
            } else {
                stem.extend(first.to_uppercase());
            }
            stem.push_str(chars.as_str());
        }
    }

    if stem.is_empty() {
        None
    } else {
        Some(format!("{stem}{DECLARATION_EXT}"))
    }
}
