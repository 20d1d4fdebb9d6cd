//! Article records and their projections
//!
//! Wire names are camelCase so stored documents match what the ingestion
//! pipeline submits.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use epp_content::Content;
use serde::{Deserialize, Serialize};

use crate::dates;
use crate::identifiers::{Identifier, RegistryIdentifier};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organisation {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub family_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_names: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliations: Option<Vec<Organisation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emails: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifiers: Option<Vec<Identifier>>,
}

impl Author {
    /// The author's first ORCID, if any.
    pub fn orcid(&self) -> Option<&str> {
        self.identifiers
            .iter()
            .flatten()
            .find(|identifier| identifier.is_orcid())
            .map(|identifier| identifier.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct License {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
}

/// Page numbers and volume numbers arrive as either form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrString {
    Number(i64),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PublicationType {
    CreativeWork,
    Periodical,
    PublicationIssue,
    PublicationVolume,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    #[serde(rename = "type")]
    pub kind: PublicationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_number: Option<NumberOrString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_part_of: Option<Box<Publication>>,
}

/// A reference's author is a person or, for corporate authors, an organisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReferenceAuthor {
    Person(Author),
    Organisation(Organisation),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReferenceMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferenceType {
    Article,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    #[serde(rename = "type")]
    pub kind: ReferenceType,
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_start: Option<NumberOrString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_end: Option<NumberOrString>,
    pub authors: Vec<ReferenceAuthor>,
    #[serde(
        default,
        deserialize_with = "dates::deserialize_date_node_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_published: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_part_of: Option<Publication>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifiers: Option<Vec<RegistryIdentifier>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ReferenceMeta>,
}

/// The document body of one version. The Content fields may be omitted;
/// the lists may be empty but must be present.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProcessedArticle {
    #[serde(default)]
    pub title: Content,
    #[serde(default, rename = "abstract")]
    pub abstract_: Content,
    pub authors: Vec<Author>,
    pub licenses: Vec<License>,
    #[serde(default)]
    pub content: Content,
    pub references: Vec<Reference>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReviewType {
    #[serde(rename = "evaluation-summary")]
    EvaluationSummary,
    #[serde(rename = "review-article")]
    Review,
    #[serde(rename = "reply")]
    AuthorResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
}

/// One peer-review document: a summary, a review or the authors' reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    #[serde(deserialize_with = "dates::deserialize")]
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    pub review_type: ReviewType,
    pub text: String,
    pub participants: Vec<Participant>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerReview {
    pub evaluation_summary: Evaluation,
    pub reviews: Vec<Evaluation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_response: Option<Evaluation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedContent {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// One stored version of a manuscript, keyed by `id` and grouped by `msid`.
///
/// `published` is always serialized, as `null` for previews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedArticle {
    pub id: String,
    pub msid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subjects: Option<Vec<String>>,
    pub doi: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e_location_id: Option<String>,
    pub version_identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_doi: Option<String>,
    pub article: ProcessedArticle,
    pub preprint_doi: String,
    pub preprint_url: String,
    #[serde(deserialize_with = "dates::deserialize")]
    pub preprint_posted: DateTime<Utc>,
    #[serde(
        default,
        deserialize_with = "dates::deserialize_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub sent_for_review: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peer_review: Option<PeerReview>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_content: Option<Vec<RelatedContent>>,
    #[serde(default, deserialize_with = "dates::deserialize_option")]
    pub published: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
}

impl EnhancedArticle {
    /// Project to the sibling-listing shape, dropping body and peer review.
    pub fn summary(&self) -> VersionSummary {
        VersionSummary {
            id: self.id.clone(),
            msid: self.msid.clone(),
            subjects: self.subjects.clone(),
            doi: self.doi.clone(),
            volume: self.volume.clone(),
            e_location_id: self.e_location_id.clone(),
            version_identifier: self.version_identifier.clone(),
            version_doi: self.version_doi.clone(),
            preprint_doi: self.preprint_doi.clone(),
            preprint_url: self.preprint_url.clone(),
            preprint_posted: self.preprint_posted,
            sent_for_review: self.sent_for_review,
            related_content: self.related_content.clone(),
            published: self.published,
            published_year: self.published_year,
            pdf_url: self.pdf_url.clone(),
            license: self.license.clone(),
        }
    }
}

/// An [`EnhancedArticle`] without `article` and `peerReview`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionSummary {
    pub id: String,
    pub msid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subjects: Option<Vec<String>>,
    pub doi: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e_location_id: Option<String>,
    pub version_identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_doi: Option<String>,
    pub preprint_doi: String,
    pub preprint_url: String,
    #[serde(deserialize_with = "dates::deserialize")]
    pub preprint_posted: DateTime<Utc>,
    #[serde(
        default,
        deserialize_with = "dates::deserialize_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub sent_for_review: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_content: Option<Vec<RelatedContent>>,
    #[serde(default, deserialize_with = "dates::deserialize_option")]
    pub published: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
}

/// A resolved version together with every visible sibling, keyed by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedArticleWithVersions {
    pub article: EnhancedArticle,
    pub versions: BTreeMap<String, VersionSummary>,
}

/// Flat per-version listing entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleSummary {
    pub id: String,
    pub msid: String,
    pub doi: String,
    pub title: Content,
    pub date: Option<DateTime<Utc>>,
}

impl From<&EnhancedArticle> for ArticleSummary {
    fn from(article: &EnhancedArticle) -> Self {
        Self {
            id: article.id.clone(),
            msid: article.msid.clone(),
            doi: article.doi.clone(),
            title: article.article.title.clone(),
            date: article.published,
        }
    }
}

/// The article body fields kept in content-free listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleHeader {
    pub title: Content,
    pub authors: Vec<Author>,
    pub licenses: Vec<License>,
}

/// Listing entry: a version summary, the header of its body, and the date
/// the manuscript first became visible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedArticleNoContent {
    #[serde(flatten)]
    pub summary: VersionSummary,
    pub article: ArticleHeader,
    pub first_published: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedArticlesNoContentWithTotal {
    pub total_count: usize,
    pub articles: Vec<EnhancedArticleNoContent>,
}
