use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::model::EnhancedArticle;
use crate::store::{ArticleStore, StoreError};

/// In-process backend. Each instance owns its records; nothing is shared
/// between instances.
#[derive(Debug, Default)]
pub struct InMemoryArticleStore {
    articles: RwLock<HashMap<String, EnhancedArticle>>,
}

impl InMemoryArticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `articles`, later entries replacing earlier
    /// ones with the same id.
    pub fn with_articles(articles: impl IntoIterator<Item = EnhancedArticle>) -> Self {
        let articles = articles
            .into_iter()
            .map(|article| (article.id.clone(), article))
            .collect();
        Self {
            articles: RwLock::new(articles),
        }
    }

    pub fn len(&self) -> usize {
        self.articles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: PoisonError<T>) -> StoreError {
    StoreError::Storage("lock poisoned".to_string())
}

#[async_trait]
impl ArticleStore for InMemoryArticleStore {
    async fn upsert(&self, article: &EnhancedArticle) -> Result<(), StoreError> {
        self.articles
            .write()
            .map_err(poisoned)?
            .insert(article.id.clone(), article.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<EnhancedArticle>, StoreError> {
        Ok(self.articles.read().map_err(poisoned)?.get(id).cloned())
    }

    async fn find_by_msid(&self, msid: &str) -> Result<Vec<EnhancedArticle>, StoreError> {
        Ok(self
            .articles
            .read()
            .map_err(poisoned)?
            .values()
            .filter(|article| article.msid == msid)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<EnhancedArticle>, StoreError> {
        Ok(self.articles.read().map_err(poisoned)?.values().cloned().collect())
    }

    async fn remove(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.articles.write().map_err(poisoned)?.remove(id).is_some())
    }
}
