//! GitHub-flavored markdown renderer for entity pages.
//!
//! Documentation comments are emitted exactly as written; only structure
//! (headings, code blocks, anchors, disclosure blocks) is generated here.

use crate::error::RenderError;
use crate::model::*;
use crate::record::AccessLevel;
use crate::render::RenderOptions;
use crate::toc;

pub const FILE_EXTENSION: &str = "md";

/// A member paired with its in-page anchor.
type Anchored<'a> = (&'a Member, &'a str);

/// Member groups in page order.
const GROUPS: [MemberKind; 3] = [MemberKind::Case, MemberKind::Property, MemberKind::Method];

pub struct MarkdownRenderer {
    options: RenderOptions,
}

impl MarkdownRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn render(&self, entity: &Entity) -> Result<String, RenderError> {
        let decl = entity.decl();
        if decl.name.trim().is_empty() {
            return Err(RenderError::MissingName {
                bucket: entity.bucket().dir_name(),
            });
        }
        if entity.members().iter().any(|m| m.name.trim().is_empty()) {
            return Err(RenderError::MissingMemberName {
                entity: decl.name.clone(),
            });
        }

        let mut lines: Vec<String> = Vec::new();

        lines.push(format!("**{}**\n", entity.kind_label()));
        lines.push(format!("# `{}`\n", decl.name));

        if let Some(code) = declaration_block(entity) {
            lines.push(code);
            lines.push(String::new());
        }

        if let Some(ref comment) = decl.doc_comment {
            lines.push(comment.clone());
            lines.push(String::new());
        }

        let anchors = toc::member_anchors(entity.members());
        let groups: Vec<(MemberKind, Vec<Anchored>)> = GROUPS
            .iter()
            .map(|&kind| {
                let members: Vec<Anchored> = entity
                    .members()
                    .iter()
                    .zip(anchors.iter())
                    .filter(|(m, _)| m.kind == kind)
                    .map(|(m, a)| (m, a.as_str()))
                    .collect();
                (kind, members)
            })
            .filter(|(_, members)| !members.is_empty())
            .collect();

        if self.options.table_of_contents && !groups.is_empty() {
            render_contents(&mut lines, &groups);
        }

        for (kind, members) in &groups {
            lines.push(format!("## {}\n", kind.group_title()));
            for &(member, anchor) in members {
                if self.options.collapsible_sections {
                    render_member_collapsible(&mut lines, member, anchor);
                } else {
                    render_member_flat(&mut lines, member, anchor);
                }
            }
        }

        let mut output = lines.join("\n");
        while output.ends_with("\n\n") {
            output.pop();
        }
        if !output.ends_with('\n') {
            output.push('\n');
        }
        Ok(output)
    }
}

/// Declaration code block. Aliases without a parsed declaration are
/// reconstructed from the aliased type.
fn declaration_block(entity: &Entity) -> Option<String> {
    let decl = entity.decl();
    let code = match (entity, decl.declaration.as_deref()) {
        (_, Some(declaration)) => declaration.to_string(),
        (Entity::Alias(AliasEntity { aliased: Some(aliased), .. }), None) => {
            format!("typealias {} = {}", decl.name, aliased)
        }
        _ => return None,
    };
    Some(swift_block(&code))
}

fn swift_block(code: &str) -> String {
    format!("```swift\n{}\n```", code)
}

fn render_contents(lines: &mut Vec<String>, groups: &[(MemberKind, Vec<Anchored>)]) {
    lines.push("## Contents\n".to_string());
    for (kind, members) in groups {
        lines.push(format!("- {}", kind.group_title()));
        for &(member, anchor) in members {
            let title = format!("`{}`", member.name);
            lines.push(format!("  {}", toc::render_toc_item(&title, anchor)));
        }
    }
    lines.push(String::new());
}

fn render_member_flat(lines: &mut Vec<String>, member: &Member, anchor: &str) {
    lines.push(anchor_tag(anchor));
    lines.push(format!("### `{}`\n", member.name));
    render_member_body(lines, member);
}

fn render_member_collapsible(lines: &mut Vec<String>, member: &Member, anchor: &str) {
    lines.push(anchor_tag(anchor));
    lines.push(format!(
        "<details><summary><code>{}</code></summary>\n",
        html_escape(&member.name)
    ));
    render_member_body(lines, member);
    lines.push("</details>\n".to_string());
}

fn render_member_body(lines: &mut Vec<String>, member: &Member) {
    if let Some(badge) = access_badge(member.access) {
        lines.push(badge);
        lines.push(String::new());
    }
    if let Some(ref declaration) = member.declaration {
        lines.push(swift_block(declaration));
        lines.push(String::new());
    }
    if let Some(ref comment) = member.doc_comment {
        lines.push(comment.clone());
        lines.push(String::new());
    }
}

fn anchor_tag(anchor: &str) -> String {
    format!("<a id=\"{}\"></a>", anchor)
}

/// `> `public`` style badge. Internal is the default and gets none.
fn access_badge(access: Option<AccessLevel>) -> Option<String> {
    match access? {
        AccessLevel::Internal => None,
        level => Some(format!("> `{}`", level)),
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
