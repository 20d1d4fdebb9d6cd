//! Content-free paginated listings
//!
//! One entry per manuscript: the current visible version, carrying the
//! date the manuscript first became visible. Filtering, ordering and
//! pagination run over plain records fetched from any backend.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{
    ArticleHeader, EnhancedArticle, EnhancedArticleNoContent, EnhancedArticlesNoContentWithTotal,
};
use crate::resolve::{select_current, Visibility};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// The date a listing filters and sorts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListingDate {
    /// `published` of the current version.
    #[default]
    Published,
    /// Earliest `published` across the manuscript's visible versions.
    FirstPublished,
}

/// Listing parameters. `page` is 1-based; pagination applies only when both
/// `page` and `per_page` are set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingQuery {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
    #[serde(default)]
    pub order: SortOrder,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub use_date: ListingDate,
}

impl ListingQuery {
    pub fn paginated(page: usize, per_page: usize) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
            ..Default::default()
        }
    }

    fn in_range(&self, date: DateTime<Utc>) -> bool {
        let day = date.date_naive();
        self.start_date.map_or(true, |start| day >= start)
            && self.end_date.map_or(true, |end| day <= end)
    }
}

fn project(current: &EnhancedArticle, first_published: DateTime<Utc>) -> EnhancedArticleNoContent {
    EnhancedArticleNoContent {
        summary: current.summary(),
        article: ArticleHeader {
            title: current.article.title.clone(),
            authors: current.article.authors.clone(),
            licenses: current.article.licenses.clone(),
        },
        first_published,
    }
}

/// List the visible manuscripts in `records` as of `now`.
pub fn list_no_content(
    records: Vec<EnhancedArticle>,
    query: &ListingQuery,
    now: DateTime<Utc>,
) -> EnhancedArticlesNoContentWithTotal {
    let visibility = Visibility::PublishedOnly { now };

    let mut by_msid: HashMap<String, Vec<EnhancedArticle>> = HashMap::new();
    for record in records.into_iter().filter(|r| visibility.admits(r)) {
        by_msid.entry(record.msid.clone()).or_default().push(record);
    }

    let mut entries: Vec<(DateTime<Utc>, EnhancedArticleNoContent)> = by_msid
        .into_values()
        .filter_map(|group| {
            let first_published = group.iter().filter_map(|r| r.published).min()?;
            let current = select_current(group)?;
            let published = current.published?;
            let key = match query.use_date {
                ListingDate::Published => published,
                ListingDate::FirstPublished => first_published,
            };
            Some((key, project(&current, first_published)))
        })
        .filter(|(key, _)| query.in_range(*key))
        .collect();

    entries.sort_by(|(a_key, a), (b_key, b)| {
        a_key.cmp(b_key).then_with(|| a.summary.id.cmp(&b.summary.id))
    });
    if query.order == SortOrder::Desc {
        entries.reverse();
    }

    let total_count = entries.len();
    let articles = entries.into_iter().map(|(_, entry)| entry);
    let articles = match (query.page, query.per_page) {
        (Some(page), Some(per_page)) => articles
            .skip(page.saturating_sub(1).saturating_mul(per_page))
            .take(per_page)
            .collect(),
        _ => articles.collect(),
    };

    EnhancedArticlesNoContentWithTotal {
        total_count,
        articles,
    }
}
