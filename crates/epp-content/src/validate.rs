//! Recursive-descent validation from raw JSON into typed [`Content`]
//!
//! One case per node type. The first structural mismatch stops the walk and
//! is reported with the path of the offending subtree; nothing is partially
//! accepted. Unknown keys on a recognised node are ignored.

use serde_json::{Map, Value};

use crate::content::*;
use crate::error::{ContentPath, PathSegment, ValidationError, ValidationErrorKind};

/// Maximum JSON nesting below a content value, counted one level per array
/// element or object field entered (`$.items[0].content` is three).
///
/// Stored article documents wrap content in at most four more levels and
/// must stay under serde_json's parser limit of 128 to be read back.
pub const MAX_DEPTH: usize = 100;

type Result<T> = std::result::Result<T, ValidationError>;

/// Validate a raw JSON value as Content, reporting paths from `$`.
pub fn validate(raw: &Value) -> Result<Content> {
    validate_at(raw, ContentPath::root())
}

/// Validate a raw JSON value as Content located at `path` inside a larger
/// document, so errors point into that document.
pub fn validate_at(raw: &Value, path: ContentPath) -> Result<Content> {
    Walker { path, depth: 0 }.content(raw)
}

struct Walker {
    path: ContentPath,
    depth: usize,
}

impl Walker {
    fn fail<T>(&self, kind: ValidationErrorKind) -> Result<T> {
        Err(ValidationError::new(self.path.clone(), kind))
    }

    fn nested<T>(
        &mut self,
        segment: PathSegment,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        self.path.push(segment);
        self.depth += 1;
        let result = if self.depth > MAX_DEPTH {
            self.fail(ValidationErrorKind::TooDeep(MAX_DEPTH))
        } else {
            f(self)
        };
        self.depth -= 1;
        self.path.pop();
        result
    }

    fn content(&mut self, raw: &Value) -> Result<Content> {
        match raw {
            Value::String(text) => Ok(Content::Text(text.clone())),
            Value::Array(items) => {
                let mut parts = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    parts.push(self.nested(PathSegment::Index(index), |w| w.content(item))?);
                }
                Ok(Content::Sequence(parts))
            }
            Value::Object(map) => self.node(map).map(|node| Content::Node(Box::new(node))),
            other => self.fail(ValidationErrorKind::NotContent(json_kind(other))),
        }
    }

    fn node(&mut self, map: &Map<String, Value>) -> Result<Node> {
        let tag = match map.get("type") {
            None => return self.fail(ValidationErrorKind::MissingType),
            Some(Value::String(tag)) => tag.as_str(),
            Some(_) => {
                return self.fail(ValidationErrorKind::InvalidField {
                    field: "type",
                    expected: "a string",
                })
            }
        };

        let node = match tag {
            "Paragraph" => Paragraph::new(self.required_content(map, "content")?).into(),
            "Strong" => Strong::new(self.required_content(map, "content")?).into(),
            "Emphasis" => Emphasis::new(self.required_content(map, "content")?).into(),
            "Superscript" => Superscript::new(self.required_content(map, "content")?).into(),
            "Subscript" => Subscript::new(self.required_content(map, "content")?).into(),
            "Date" => DateNode::new(self.required_content(map, "content")?).into(),
            "ListItem" => ListItem::new(self.required_content(map, "content")?).into(),
            "Heading" => Heading {
                id: self.optional_string(map, "id")?,
                depth: self.heading_depth(map)?,
                content: self.required_content(map, "content")?,
            }
            .into(),
            "List" => List {
                order: self.list_order(map)?,
                items: self.items(map, |w, raw| {
                    let item = w.tagged_object(raw, "ListItem")?;
                    Ok(ListItem::new(w.required_content(item, "content")?))
                })?,
            }
            .into(),
            "Figure" => Figure {
                content: self.required_content(map, "content")?,
                caption: self.optional_content(map, "caption")?,
                id: self.optional_string(map, "id")?,
                label: self.optional_string(map, "label")?,
            }
            .into(),
            "ImageObject" => ImageObject {
                content_url: self.optional_string(map, "contentUrl")?,
                content: self.optional_content(map, "content")?,
                meta: self.image_meta(map)?,
            }
            .into(),
            "Link" => Link {
                target: self.required_string(map, "target")?,
                relation: self.optional_string(map, "relation")?,
                content: self.required_content(map, "content")?,
            }
            .into(),
            "Cite" => self.cite(map)?.into(),
            "CiteGroup" => CiteGroup {
                items: self.items(map, |w, raw| {
                    let cite = w.tagged_object(raw, "Cite")?;
                    w.cite(cite)
                })?,
            }
            .into(),
            "Claim" => Claim {
                claim_type: self.claim_type(map)?,
                label: self.optional_content(map, "label")?,
                title: self.optional_content(map, "title")?,
                content: self.optional_content(map, "content")?,
            }
            .into(),
            unknown => return self.fail(ValidationErrorKind::UnknownType(unknown.to_string())),
        };

        Ok(node)
    }

    fn cite(&mut self, map: &Map<String, Value>) -> Result<Cite> {
        Ok(Cite {
            target: self.required_string(map, "target")?,
            content: self.required_content(map, "content")?,
        })
    }

    /// An element of `items` that must be a node with the given tag.
    fn tagged_object<'v>(
        &self,
        raw: &'v Value,
        expected: &'static str,
    ) -> Result<&'v Map<String, Value>> {
        let map = match raw {
            Value::Object(map) => map,
            other => return self.fail(ValidationErrorKind::NotContent(json_kind(other))),
        };
        match map.get("type") {
            Some(Value::String(tag)) if tag == expected => Ok(map),
            Some(Value::String(_)) => self.fail(ValidationErrorKind::InvalidField {
                field: "type",
                expected,
            }),
            _ => self.fail(ValidationErrorKind::MissingType),
        }
    }

    fn items<T>(
        &mut self,
        map: &Map<String, Value>,
        mut each: impl FnMut(&mut Self, &Value) -> Result<T>,
    ) -> Result<Vec<T>> {
        let items = match map.get("items") {
            None => return self.fail(ValidationErrorKind::MissingField("items")),
            Some(Value::Array(items)) => items,
            Some(_) => {
                return self.fail(ValidationErrorKind::InvalidField {
                    field: "items",
                    expected: "an array",
                })
            }
        };
        self.nested(PathSegment::Field("items".into()), |w| {
            let mut out = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                out.push(w.nested(PathSegment::Index(index), |w| each(w, item))?);
            }
            Ok(out)
        })
    }

    fn required_content(&mut self, map: &Map<String, Value>, field: &'static str) -> Result<Content> {
        match map.get(field) {
            Some(raw) => self.nested(PathSegment::Field(field.into()), |w| w.content(raw)),
            None => self.fail(ValidationErrorKind::MissingField(field)),
        }
    }

    fn optional_content(
        &mut self,
        map: &Map<String, Value>,
        field: &'static str,
    ) -> Result<Option<Content>> {
        match map.get(field) {
            Some(raw) => self
                .nested(PathSegment::Field(field.into()), |w| w.content(raw))
                .map(Some),
            None => Ok(None),
        }
    }

    fn required_string(&self, map: &Map<String, Value>, field: &'static str) -> Result<String> {
        match self.optional_string(map, field)? {
            Some(value) => Ok(value),
            None => self.fail(ValidationErrorKind::MissingField(field)),
        }
    }

    fn optional_string(
        &self,
        map: &Map<String, Value>,
        field: &'static str,
    ) -> Result<Option<String>> {
        match map.get(field) {
            None => Ok(None),
            Some(Value::String(value)) => Ok(Some(value.clone())),
            Some(_) => self.fail(ValidationErrorKind::InvalidField {
                field,
                expected: "a string",
            }),
        }
    }

    fn heading_depth(&self, map: &Map<String, Value>) -> Result<u8> {
        let invalid = ValidationErrorKind::InvalidField {
            field: "depth",
            expected: "an integer from 1 to 6",
        };
        match map.get("depth") {
            None => self.fail(ValidationErrorKind::MissingField("depth")),
            Some(Value::Number(n)) => match n.as_u64() {
                Some(depth @ 1..=6) => Ok(depth as u8),
                _ => self.fail(invalid),
            },
            Some(_) => self.fail(invalid),
        }
    }

    fn list_order(&self, map: &Map<String, Value>) -> Result<ListOrder> {
        match self.required_string(map, "order")?.as_str() {
            "Unordered" => Ok(ListOrder::Unordered),
            "Ascending" => Ok(ListOrder::Ascending),
            _ => self.fail(ValidationErrorKind::InvalidField {
                field: "order",
                expected: "`Unordered` or `Ascending`",
            }),
        }
    }

    fn claim_type(&self, map: &Map<String, Value>) -> Result<ClaimType> {
        let name = self.required_string(map, "claimType")?;
        match ClaimType::parse(&name) {
            Some(kind) => Ok(kind),
            None => self.fail(ValidationErrorKind::InvalidField {
                field: "claimType",
                expected: "a known claim type",
            }),
        }
    }

    fn image_meta(&self, map: &Map<String, Value>) -> Result<Option<ImageMeta>> {
        let meta = match map.get("meta") {
            None => return Ok(None),
            Some(Value::Object(meta)) => meta,
            Some(_) => {
                return self.fail(ValidationErrorKind::InvalidField {
                    field: "meta",
                    expected: "an object",
                })
            }
        };
        let inline = match meta.get("inline") {
            None => None,
            Some(Value::Bool(inline)) => Some(*inline),
            Some(_) => {
                return self.fail(ValidationErrorKind::InvalidField {
                    field: "meta",
                    expected: "an object with a boolean `inline`",
                })
            }
        };
        Ok(Some(ImageMeta { inline }))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
