//! Content tree types
//!
//! Every node kind is its own struct carrying a serde `type` tag, so a node
//! serializes the same way whether it sits directly in a Content value or
//! inside a `List`/`CiteGroup` item list. Deserialization always goes
//! through [`crate::validate`].

use serde::{Deserialize, Deserializer, Serialize};

/// A content value: text, a single node, or an ordered sequence of
/// content values nested to any depth.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Content {
    Text(String),
    Node(Box<Node>),
    Sequence(Vec<Content>),
}

impl Default for Content {
    fn default() -> Self {
        Content::Text(String::new())
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::Text(text.to_string())
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::Text(text)
    }
}

impl From<Node> for Content {
    fn from(node: Node) -> Self {
        Content::Node(Box::new(node))
    }
}

impl From<Vec<Content>> for Content {
    fn from(items: Vec<Content>) -> Self {
        Content::Sequence(items)
    }
}

impl<'de> Deserialize<'de> for Content {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        crate::validate::validate(&raw).map_err(serde::de::Error::custom)
    }
}

impl Content {
    /// True for empty text and for sequences holding only empty content.
    pub fn is_empty(&self) -> bool {
        match self {
            Content::Text(text) => text.is_empty(),
            Content::Node(_) => false,
            Content::Sequence(items) => items.iter().all(Content::is_empty),
        }
    }

    /// Iterate the nodes of this value, flattening nested sequences but not
    /// descending into the nodes themselves.
    pub fn top_level_nodes(&self) -> Vec<&Node> {
        let mut nodes = Vec::new();
        collect_top_level(self, &mut nodes);
        nodes
    }
}

fn collect_top_level<'a>(content: &'a Content, nodes: &mut Vec<&'a Node>) {
    match content {
        Content::Text(_) => {}
        Content::Node(node) => nodes.push(node.as_ref()),
        Content::Sequence(items) => {
            for item in items {
                collect_top_level(item, nodes);
            }
        }
    }
}

macro_rules! node_into_content {
    ($($name:ident),* $(,)?) => {
        $(
            impl From<$name> for Content {
                fn from(node: $name) -> Self {
                    Content::Node(Box::new(node.into()))
                }
            }
        )*
    };
}

node_into_content!(
    Paragraph,
    Strong,
    Emphasis,
    Superscript,
    Subscript,
    DateNode,
    Heading,
    List,
    ListItem,
    Figure,
    ImageObject,
    Link,
    Cite,
    CiteGroup,
    Claim,
);

/// A typed content node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Paragraph(Paragraph),
    Strong(Strong),
    Emphasis(Emphasis),
    Superscript(Superscript),
    Subscript(Subscript),
    Date(DateNode),
    Heading(Heading),
    List(List),
    ListItem(ListItem),
    Figure(Figure),
    ImageObject(ImageObject),
    Link(Link),
    Cite(Cite),
    CiteGroup(CiteGroup),
    Claim(Claim),
}

impl Node {
    /// The `type` tag this node carries on the wire.
    pub fn type_name(&self) -> &'static str {
        match self {
            Node::Paragraph(_) => "Paragraph",
            Node::Strong(_) => "Strong",
            Node::Emphasis(_) => "Emphasis",
            Node::Superscript(_) => "Superscript",
            Node::Subscript(_) => "Subscript",
            Node::Date(_) => "Date",
            Node::Heading(_) => "Heading",
            Node::List(_) => "List",
            Node::ListItem(_) => "ListItem",
            Node::Figure(_) => "Figure",
            Node::ImageObject(_) => "ImageObject",
            Node::Link(_) => "Link",
            Node::Cite(_) => "Cite",
            Node::CiteGroup(_) => "CiteGroup",
            Node::Claim(_) => "Claim",
        }
    }
}

macro_rules! wrapper_node {
    ($(#[$meta:meta])* $name:ident => $variant:ident, $tag:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize)]
        #[serde(tag = "type", rename = $tag)]
        pub struct $name {
            pub content: Content,
        }

        impl $name {
            pub fn new(content: impl Into<Content>) -> Self {
                Self {
                    content: content.into(),
                }
            }
        }

        impl From<$name> for Node {
            fn from(node: $name) -> Self {
                Node::$variant(node)
            }
        }
    };
}

wrapper_node!(
    /// Block of running text.
    Paragraph => Paragraph,
    "Paragraph"
);
wrapper_node!(Strong => Strong, "Strong");
wrapper_node!(Emphasis => Emphasis, "Emphasis");
wrapper_node!(Superscript => Superscript, "Superscript");
wrapper_node!(Subscript => Subscript, "Subscript");
wrapper_node!(
    /// A date rendered from its content.
    DateNode => Date,
    "Date"
);
wrapper_node!(ListItem => ListItem, "ListItem");

/// Section heading. `depth` is 1 for top-level sections.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "Heading")]
pub struct Heading {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub depth: u8,
    pub content: Content,
}

impl From<Heading> for Node {
    fn from(node: Heading) -> Self {
        Node::Heading(node)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ListOrder {
    Unordered,
    Ascending,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "List")]
pub struct List {
    pub order: ListOrder,
    pub items: Vec<ListItem>,
}

impl From<List> for Node {
    fn from(node: List) -> Self {
        Node::List(node)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "Figure")]
pub struct Figure {
    pub content: Content,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl From<Figure> for Node {
    fn from(node: Figure) -> Self {
        Node::Figure(node)
    }
}

/// Image either referenced by URL or carried inline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "ImageObject", rename_all = "camelCase")]
pub struct ImageObject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ImageMeta>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ImageMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline: Option<bool>,
}

impl From<ImageObject> for Node {
    fn from(node: ImageObject) -> Self {
        Node::ImageObject(node)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "Link")]
pub struct Link {
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
    pub content: Content,
}

impl From<Link> for Node {
    fn from(node: Link) -> Self {
        Node::Link(node)
    }
}

/// In-text citation pointing at a reference id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "Cite")]
pub struct Cite {
    pub target: String,
    pub content: Content,
}

impl From<Cite> for Node {
    fn from(node: Cite) -> Self {
        Node::Cite(node)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "CiteGroup")]
pub struct CiteGroup {
    pub items: Vec<Cite>,
}

impl From<CiteGroup> for Node {
    fn from(node: CiteGroup) -> Self {
        Node::CiteGroup(node)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ClaimType {
    Statement,
    Theorem,
    Lemma,
    Proof,
    Postulate,
    Hypothesis,
    Proposition,
    Corollary,
}

impl ClaimType {
    pub const ALL: [ClaimType; 8] = [
        ClaimType::Statement,
        ClaimType::Theorem,
        ClaimType::Lemma,
        ClaimType::Proof,
        ClaimType::Postulate,
        ClaimType::Hypothesis,
        ClaimType::Proposition,
        ClaimType::Corollary,
    ];

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimType::Statement => "Statement",
            ClaimType::Theorem => "Theorem",
            ClaimType::Lemma => "Lemma",
            ClaimType::Proof => "Proof",
            ClaimType::Postulate => "Postulate",
            ClaimType::Hypothesis => "Hypothesis",
            ClaimType::Proposition => "Proposition",
            ClaimType::Corollary => "Corollary",
        }
    }
}

/// A labelled statement such as a theorem or a proof.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "Claim", rename_all = "camelCase")]
pub struct Claim {
    pub claim_type: ClaimType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
}

impl From<Claim> for Node {
    fn from(node: Claim) -> Self {
        Node::Claim(node)
    }
}
