//! Entity pages and the contents document.

pub mod contents;
pub mod markdown;

use crate::error::{IndexError, RenderError};
use crate::index::DocumentIndex;
use crate::model::{Bucket, Entity};
use std::path::PathBuf;
use tracing::warn;

/// Presentation switches recognised by the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Wrap each member in a collapsed `<details>` block.
    pub collapsible_sections: bool,
    /// Prepend a list of member anchors to each page.
    pub table_of_contents: bool,
}

/// Render a single entity as Markdown. Pure; never touches the disk.
pub fn render(entity: &Entity, options: &RenderOptions) -> Result<String, RenderError> {
    markdown::MarkdownRenderer::new(*options).render(entity)
}

/// One rendered entity page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub bucket: Bucket,
    pub name: String,
    /// Path relative to the output directory, e.g. `structs/Foo.md`.
    pub path: PathBuf,
    pub text: String,
}

/// Render every entity of a finalized index. Entities that fail to render
/// are logged and left out; the rest are returned in contents order.
pub fn render_index(
    index: &DocumentIndex,
    options: &RenderOptions,
) -> Result<Vec<Page>, IndexError> {
    let mut pages = Vec::new();
    for (bucket, entities) in index.buckets()? {
        for entity in entities {
            match render(entity, options) {
                Ok(text) => pages.push(Page {
                    bucket,
                    name: entity.name().to_string(),
                    path: page_path(bucket, entity.name(), markdown::FILE_EXTENSION),
                    text,
                }),
                Err(err) => warn!(bucket = bucket.dir_name(), "skipping entity: {}", err),
            }
        }
    }
    Ok(pages)
}

/// `<bucket>/<name>.<ext>`, with path separators in the name flattened.
pub fn page_path(bucket: Bucket, name: &str, ext: &str) -> PathBuf {
    let stem: String = name
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    PathBuf::from(bucket.dir_name()).join(format!("{}.{}", stem, ext))
}
