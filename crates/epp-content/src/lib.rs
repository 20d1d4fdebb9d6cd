//! Structured content for enhanced preprints
//!
//! Article bodies, abstracts, titles and captions share one recursive
//! representation:
//! - Content: plain text, a single typed node, or a sequence of Content
//! - Node: paragraphs, inline wrappers, headings, lists, figures, links,
//!   citations, claims, dates and images
//! - Validation: a recursive-descent walk from raw JSON into typed Content,
//!   reporting the path of the first offending subtree
//! - Headings: top-level section headings for a table of contents

pub mod content;
pub mod error;
pub mod headings;
pub mod text;
pub mod validate;

pub use content::*;
pub use error::*;
pub use headings::*;
pub use validate::*;
