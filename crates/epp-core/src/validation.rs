//! Validation of submitted article payloads
//!
//! Content-typed fields are walked first so a malformed tree is reported
//! with its full path in the payload (`$.article.content[3].items[0]`); the
//! remaining fields are then decoded with serde.

use epp_content::{validate_at, ContentPath, ValidationError};
use serde_json::Value;
use tracing::debug;

use crate::model::EnhancedArticle;

#[derive(Debug, thiserror::Error)]
pub enum ArticleValidationError {
    #[error(transparent)]
    Content(#[from] ValidationError),

    #[error("Invalid article: {0}")]
    Schema(String),
}

impl ArticleValidationError {
    /// Path of the offending content subtree, when the failure is in content.
    pub fn content_path(&self) -> Option<String> {
        match self {
            ArticleValidationError::Content(err) => Some(err.path.to_string()),
            ArticleValidationError::Schema(_) => None,
        }
    }
}

/// Validate a raw payload and decode it into an [`EnhancedArticle`].
///
/// The whole payload is rejected on the first failure.
pub fn validate_enhanced_article(raw: &Value) -> Result<EnhancedArticle, ArticleValidationError> {
    let record = raw
        .as_object()
        .ok_or_else(|| ArticleValidationError::Schema("payload must be a JSON object".into()))?;

    if let Some(Value::Object(body)) = record.get("article") {
        let base = ContentPath::root().field("article");
        for field in ["title", "abstract", "content"] {
            if let Some(value) = body.get(field) {
                validate_at(value, base.clone().field(field))?;
            }
        }
        if let Some(Value::Array(licenses)) = body.get("licenses") {
            for (index, license) in licenses.iter().enumerate() {
                if let Some(content) = license.get("content") {
                    let path = base.clone().field("licenses").index(index).field("content");
                    validate_at(content, path)?;
                }
            }
        }
    }

    let article: EnhancedArticle = serde_json::from_value(raw.clone())
        .map_err(|e| ArticleValidationError::Schema(e.to_string()))?;
    debug!(id = %article.id, msid = %article.msid, "validated article payload");
    Ok(article)
}
