//! Validation errors with typed paths into the rejected document

use std::fmt;

/// One step from a parent value into a child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

/// Location of a value inside a JSON document, rendered as `$.a.b[2].c`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentPath(Vec<PathSegment>);

impl ContentPath {
    /// The document root, `$`.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.0.push(PathSegment::Field(name.into()));
        self
    }

    pub fn index(mut self, index: usize) -> Self {
        self.0.push(PathSegment::Index(index));
        self
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub(crate) fn push(&mut self, segment: PathSegment) {
        self.0.push(segment);
    }

    pub(crate) fn pop(&mut self) {
        self.0.pop();
    }
}

impl fmt::Display for ContentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for segment in &self.0 {
            match segment {
                PathSegment::Field(name) => write!(f, ".{}", name)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

/// What was wrong with the rejected subtree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationErrorKind {
    #[error("expected text, a node or a sequence, found {0}")]
    NotContent(&'static str),

    #[error("node has no `type` tag")]
    MissingType,

    #[error("unknown node type `{0}`")]
    UnknownType(String),

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` must be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },

    #[error("content nested deeper than {0} levels")]
    TooDeep(usize),
}

/// Structural validation failure. The whole input is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid content at {path}: {kind}")]
pub struct ValidationError {
    pub path: ContentPath,
    pub kind: ValidationErrorKind,
}

impl ValidationError {
    pub fn new(path: ContentPath, kind: ValidationErrorKind) -> Self {
        Self { path, kind }
    }
}
