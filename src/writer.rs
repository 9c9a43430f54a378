//! Writes rendered pages and the contents document to disk.

use crate::model::Bucket;
use crate::render::Page;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Remove output from a previous run: every bucket directory and the
/// contents file. Anything else in `output_dir` is left alone.
pub fn clean(output_dir: &Path, contents_filename: &str) -> Result<()> {
    for bucket in Bucket::CONTENTS_ORDER {
        let dir = output_dir.join(bucket.dir_name());
        if dir.is_dir() {
            fs::remove_dir_all(&dir)
                .with_context(|| format!("failed to remove {}", dir.display()))?;
            debug!(path = %dir.display(), "removed");
        }
    }
    let contents = output_dir.join(contents_filename);
    if contents.is_file() {
        fs::remove_file(&contents)
            .with_context(|| format!("failed to remove {}", contents.display()))?;
    }
    Ok(())
}

/// Write all pages below `output_dir`, then the contents document.
pub fn write(
    output_dir: &Path,
    contents_filename: &str,
    pages: &[Page],
    contents: &str,
) -> Result<()> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    for page in pages {
        let path = output_dir.join(&page.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&path, &page.text)
            .with_context(|| format!("failed to write {}", path.display()))?;
        debug!(path = %path.display(), "wrote page");
    }

    let contents_path = output_dir.join(contents_filename);
    fs::write(&contents_path, contents)
        .with_context(|| format!("failed to write {}", contents_path.display()))?;

    info!(
        pages = pages.len(),
        output = %output_dir.display(),
        "documentation written"
    );
    Ok(())
}
