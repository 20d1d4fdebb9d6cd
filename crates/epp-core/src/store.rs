use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use crate::listing::{list_no_content, ListingQuery};
use crate::model::{
    ArticleSummary, EnhancedArticle, EnhancedArticleWithVersions,
    EnhancedArticlesNoContentWithTotal,
};
use crate::resolve::{assemble_versions, select_current, Visibility};

/// Raw record access that every storage backend implements.
///
/// Each call is a single-document operation; backends provide no
/// cross-document transactions.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Insert the record, or replace the whole record with the same `id`.
    async fn upsert(&self, article: &EnhancedArticle) -> Result<(), StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<EnhancedArticle>, StoreError>;

    /// Every stored version of a manuscript, in no particular order.
    async fn find_by_msid(&self, msid: &str) -> Result<Vec<EnhancedArticle>, StoreError>;

    async fn list_all(&self) -> Result<Vec<EnhancedArticle>, StoreError>;

    /// Remove one version. Returns whether a record existed.
    async fn remove(&self, id: &str) -> Result<bool, StoreError>;
}

/// Version-aware access to stored articles.
///
/// Provided for every [`ArticleStore`], so all backends share one
/// resolution algorithm.
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Idempotent upsert keyed by `article.id`.
    async fn store_enhanced_article(&self, article: EnhancedArticle) -> Result<bool, StoreError>;

    /// Resolve `identifier` as a version id, falling back to a manuscript
    /// id. Absence is `Ok(None)`.
    async fn find_article_version(
        &self,
        identifier: &str,
        include_previews: bool,
    ) -> Result<Option<EnhancedArticleWithVersions>, StoreError>;

    /// Fetch a version known to exist. Absence is [`StoreError::NotFound`].
    async fn get_enhanced_article(&self, id: &str) -> Result<EnhancedArticle, StoreError>;

    /// One entry per stored version, previews included, ordered by id.
    async fn get_enhanced_article_summaries(&self) -> Result<Vec<ArticleSummary>, StoreError>;

    async fn get_enhanced_articles_no_content(
        &self,
        query: &ListingQuery,
    ) -> Result<EnhancedArticlesNoContentWithTotal, StoreError>;

    async fn delete_article_version(&self, id: &str) -> Result<bool, StoreError>;
}

#[async_trait]
impl<S: ArticleStore> ArticleRepository for S {
    async fn store_enhanced_article(&self, article: EnhancedArticle) -> Result<bool, StoreError> {
        self.upsert(&article).await?;
        debug!(id = %article.id, msid = %article.msid, "stored article version");
        Ok(true)
    }

    async fn find_article_version(
        &self,
        identifier: &str,
        include_previews: bool,
    ) -> Result<Option<EnhancedArticleWithVersions>, StoreError> {
        let visibility = Visibility::for_request(include_previews);

        let current = match self.find_by_id(identifier).await? {
            Some(exact) if visibility.admits(&exact) => Some(exact),
            _ => {
                let candidates = self.find_by_msid(identifier).await?;
                select_current(candidates.into_iter().filter(|a| visibility.admits(a)))
            }
        };
        let Some(current) = current else {
            debug!(identifier, include_previews, "no visible version");
            return Ok(None);
        };

        let siblings = self.find_by_msid(&current.msid).await?;
        debug!(
            identifier,
            id = %current.id,
            msid = %current.msid,
            versions = siblings.len(),
            "resolved article version"
        );
        Ok(Some(assemble_versions(current, siblings, &visibility)))
    }

    async fn get_enhanced_article(&self, id: &str) -> Result<EnhancedArticle, StoreError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn get_enhanced_article_summaries(&self) -> Result<Vec<ArticleSummary>, StoreError> {
        let mut summaries: Vec<ArticleSummary> =
            self.list_all().await?.iter().map(ArticleSummary::from).collect();
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(summaries)
    }

    async fn get_enhanced_articles_no_content(
        &self,
        query: &ListingQuery,
    ) -> Result<EnhancedArticlesNoContentWithTotal, StoreError> {
        let records = self.list_all().await?;
        Ok(list_no_content(records, query, Utc::now()))
    }

    async fn delete_article_version(&self, id: &str) -> Result<bool, StoreError> {
        let removed = self.remove(id).await?;
        debug!(id, removed, "deleted article version");
        Ok(removed)
    }
}

/// Errors from the article repository.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Article not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(#[from] crate::validation::ArticleValidationError),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Config error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}
