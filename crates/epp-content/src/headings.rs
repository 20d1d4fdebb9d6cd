//! Top-level section headings for a table of contents

use serde::Serialize;

use crate::content::{Content, Heading, Node};

/// One table-of-contents entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadingEntry {
    pub id: Option<String>,
    pub text: String,
}

/// Collect the depth-1 headings that sit at the top level of `content`,
/// in document order.
///
/// Nested sequences are flattened, but headings inside other nodes (a
/// figure caption, a list item) are not sections and are skipped. Deeper
/// headings are never promoted when no depth-1 heading exists.
pub fn extract_headings(content: &Content) -> Vec<&Heading> {
    content
        .top_level_nodes()
        .into_iter()
        .filter_map(|node| match node {
            Node::Heading(heading) if heading.depth == 1 => Some(heading),
            _ => None,
        })
        .collect()
}

/// Table of contents for `content`: the depth-1 headings rendered as text.
pub fn table_of_contents(content: &Content) -> Vec<HeadingEntry> {
    extract_headings(content)
        .into_iter()
        .map(|heading| HeadingEntry {
            id: heading.id.clone(),
            text: heading.content.to_plain_text(),
        })
        .collect()
}
