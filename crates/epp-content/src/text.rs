//! Plain-text rendering of content, used for titles in listings and logs

use crate::content::{Content, Node};

impl Content {
    /// Concatenate all text in document order, dropping markup. List items
    /// and citation groups are joined with a single space.
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        push_content(self, &mut out);
        out
    }
}

fn push_content(content: &Content, out: &mut String) {
    match content {
        Content::Text(text) => out.push_str(text),
        Content::Node(node) => push_node(node, out),
        Content::Sequence(items) => items.iter().for_each(|item| push_content(item, out)),
    }
}

fn push_node(node: &Node, out: &mut String) {
    match node {
        Node::Paragraph(n) => push_content(&n.content, out),
        Node::Strong(n) => push_content(&n.content, out),
        Node::Emphasis(n) => push_content(&n.content, out),
        Node::Superscript(n) => push_content(&n.content, out),
        Node::Subscript(n) => push_content(&n.content, out),
        Node::Date(n) => push_content(&n.content, out),
        Node::ListItem(n) => push_content(&n.content, out),
        Node::Heading(n) => push_content(&n.content, out),
        Node::Link(n) => push_content(&n.content, out),
        Node::Cite(n) => push_content(&n.content, out),
        Node::Figure(n) => {
            push_content(&n.content, out);
            if let Some(caption) = &n.caption {
                push_content(caption, out);
            }
        }
        Node::ImageObject(n) => {
            if let Some(content) = &n.content {
                push_content(content, out);
            }
        }
        Node::List(n) => {
            for (i, item) in n.items.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                push_content(&item.content, out);
            }
        }
        Node::CiteGroup(n) => {
            for (i, cite) in n.items.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                push_content(&cite.content, out);
            }
        }
        Node::Claim(n) => {
            for part in [&n.label, &n.title, &n.content].into_iter().flatten() {
                push_content(part, out);
            }
        }
    }
}
