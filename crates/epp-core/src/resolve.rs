//! Backend-independent version resolution
//!
//! Backends only fetch records; visibility, current-version selection,
//! sibling projection and the review reordering all happen here on plain
//! in-memory data.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::model::{EnhancedArticle, EnhancedArticleWithVersions};

/// Which versions a caller may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Only versions with a `published` date at or before `now`.
    PublishedOnly { now: DateTime<Utc> },
    /// Every stored version, previews included.
    IncludePreviews,
}

impl Visibility {
    pub fn for_request(include_previews: bool) -> Self {
        if include_previews {
            Visibility::IncludePreviews
        } else {
            Visibility::PublishedOnly { now: Utc::now() }
        }
    }

    pub fn admits(&self, article: &EnhancedArticle) -> bool {
        match self {
            Visibility::IncludePreviews => true,
            Visibility::PublishedOnly { now } => {
                matches!(article.published, Some(published) if published <= *now)
            }
        }
    }
}

/// Order versions by `preprintPosted`, breaking ties on `id`.
pub fn version_order(a: &EnhancedArticle, b: &EnhancedArticle) -> Ordering {
    a.preprint_posted
        .cmp(&b.preprint_posted)
        .then_with(|| a.id.cmp(&b.id))
}

/// The current version among `candidates`: latest `preprintPosted`, then
/// greatest `id`.
pub fn select_current<I>(candidates: I) -> Option<EnhancedArticle>
where
    I: IntoIterator<Item = EnhancedArticle>,
{
    candidates.into_iter().max_by(version_order)
}

/// Build the resolved response from the chosen version and its version set.
///
/// `siblings` is the stored version set for `current.msid`; only versions
/// passing `visibility` are listed. The resolved version is always listed.
pub fn assemble_versions(
    mut current: EnhancedArticle,
    siblings: Vec<EnhancedArticle>,
    visibility: &Visibility,
) -> EnhancedArticleWithVersions {
    let mut versions: BTreeMap<_, _> = siblings
        .iter()
        .filter(|sibling| sibling.msid == current.msid && visibility.admits(sibling))
        .map(|sibling| (sibling.id.clone(), sibling.summary()))
        .collect();
    versions
        .entry(current.id.clone())
        .or_insert_with(|| current.summary());

    reverse_reviews(&mut current);
    EnhancedArticleWithVersions {
        article: current,
        versions,
    }
}

/// Reverse stored review order so the most recent review comes first.
///
/// Applied on every read. Stored documents keep insertion order.
// TODO: drop once ingestion stores reviews newest-first and clients are migrated.
pub fn reverse_reviews(article: &mut EnhancedArticle) {
    if let Some(peer_review) = article.peer_review.as_mut() {
        peer_review.reviews.reverse();
    }
}
