//! Anchor slugs and table-of-contents links.

use crate::model::Member;
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// Hex digits of the signature hash kept in an anchor.
const HASH_LEN: usize = 8;

/// GitHub heading anchor slug generation.
///
/// - lowercase
/// - remove all chars that aren't alphanumeric, space, or hyphen
/// - replace spaces with hyphens
pub fn github_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        if c.is_alphanumeric() || c == ' ' || c == '-' {
            slug.push(c);
        }
        // All other chars (including ':', '(', '_') are stripped
    }
    slug.replace(' ', "-")
}

/// Anchor for a member: slug of its name plus a short hash of its
/// declaration, so overloads sharing a name get distinct anchors.
/// Members without a declaration hash their name and source offset.
pub fn member_anchor(member: &Member) -> String {
    let signature = match (&member.declaration, member.offset) {
        (Some(declaration), _) => declaration.clone(),
        (None, Some(offset)) => format!("{}@{}", member.name, offset),
        (None, None) => member.name.clone(),
    };
    let mut slug = github_slug(&member.name);
    if slug.is_empty() {
        // Operators such as `==` slug to nothing.
        slug.push_str("member");
    }
    format!("{}-{}", slug, signature_hash(&signature))
}

/// Anchors for every member of one page, in member order. Anchors that
/// still collide get a `-1`, `-2`, ... suffix, the way GitHub numbers
/// repeated headings.
pub fn member_anchors(members: &[Member]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    members
        .iter()
        .map(|member| {
            let anchor = member_anchor(member);
            let count = seen.entry(anchor.clone()).or_insert(0);
            let unique = match *count {
                0 => anchor,
                n => format!("{}-{}", anchor, n),
            };
            *count += 1;
            unique
        })
        .collect()
}

fn signature_hash(signature: &str) -> String {
    let digest = Sha256::digest(signature.as_bytes());
    let mut hex = hex::encode(digest);
    hex.truncate(HASH_LEN);
    hex
}

/// A TOC list item pointing at an in-page anchor.
pub fn render_toc_item(title: &str, anchor: &str) -> String {
    format!("- [{}](#{})", title, anchor)
}
