//! Root contents document listing every rendered page by bucket.

use crate::model::Bucket;
use crate::render::Page;

pub const DEFAULT_CONTENTS_FILENAME: &str = "README.md";

/// Render the contents document. Buckets appear in `Bucket::CONTENTS_ORDER`
/// and keep the page order they were given in; empty buckets are left out.
pub fn render_contents(pages: &[Page]) -> String {
    let mut lines: Vec<String> = vec!["# Reference Documentation\n".to_string()];

    for bucket in Bucket::CONTENTS_ORDER {
        let entries: Vec<&Page> = pages.iter().filter(|p| p.bucket == bucket).collect();
        if entries.is_empty() {
            continue;
        }
        lines.push(format!("## {}\n", bucket.title()));
        for page in entries {
            lines.push(format!("- [{}]({})", page.name, link_target(page)));
        }
        lines.push(String::new());
    }

    let mut output = lines.join("\n");
    if !output.ends_with('\n') {
        output.push('\n');
    }
    output
}

/// Links always use `/`, whatever the host separator.
fn link_target(page: &Page) -> String {
    page.path
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
