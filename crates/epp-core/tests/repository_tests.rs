//! Repository contract, run identically against every backend.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use epp_content::{validate, MAX_DEPTH};
use epp_core::{
    ArticleRepository, Content, EnhancedArticle, Evaluation, InMemoryArticleStore, License,
    ListingQuery, PeerReview, ProcessedArticle, ReviewType, StoreError,
};
use serde_json::json;

fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

fn article(id: &str, msid: &str, posted: DateTime<Utc>, published: Option<DateTime<Utc>>) -> EnhancedArticle {
    EnhancedArticle {
        id: id.into(),
        msid: msid.into(),
        subjects: None,
        doi: format!("10.7554/eLife.{}", msid),
        volume: None,
        e_location_id: None,
        version_identifier: id.trim_start_matches(msid).into(),
        version_doi: None,
        article: ProcessedArticle {
            title: format!("Title of {}", id).into(),
            content: "Body".into(),
            ..Default::default()
        },
        preprint_doi: "10.1101/2024.01.01.000001".into(),
        preprint_url: "https://www.biorxiv.org/content/10.1101/2024.01.01.000001".into(),
        preprint_posted: posted,
        sent_for_review: None,
        peer_review: None,
        related_content: None,
        published,
        published_year: None,
        pdf_url: None,
        license: None,
    }
}

fn evaluation(text: &str) -> Evaluation {
    Evaluation {
        date: at(2024, 1, 3),
        doi: None,
        review_type: ReviewType::Review,
        text: text.into(),
        participants: Vec::new(),
    }
}

/// The deepest tree the validator accepts.
fn deepest_content() -> Content {
    let mut raw = json!("leaf");
    for _ in 0..MAX_DEPTH {
        raw = json!([raw]);
    }
    validate(&raw).unwrap()
}

macro_rules! repository_contract {
    ($backend:ident, $make:expr) => {
        mod $backend {
            use super::*;

            fn repo() -> Arc<dyn ArticleRepository> {
                $make
            }

            #[tokio::test]
            async fn resolves_msid_to_latest_posted_version() {
                let repo = repo();
                let v1 = article("v1", "M", at(2024, 1, 1), Some(at(2024, 1, 5)));
                let v2 = article("v2", "M", at(2024, 2, 1), Some(at(2024, 2, 5)));
                assert!(repo.store_enhanced_article(v1.clone()).await.unwrap());
                assert!(repo.store_enhanced_article(v2.clone()).await.unwrap());

                let by_msid = repo.find_article_version("M", false).await.unwrap().unwrap();
                assert_eq!(by_msid.article.id, "v2");
                assert_eq!(by_msid.versions.len(), 2);
                assert_eq!(by_msid.versions["v1"], v1.summary());
                assert_eq!(by_msid.versions["v2"], v2.summary());

                let by_id = repo.find_article_version("v1", false).await.unwrap().unwrap();
                assert_eq!(by_id.article.id, "v1");
                assert_eq!(by_id.versions, by_msid.versions);
            }

            #[tokio::test]
            async fn exact_id_wins_over_newer_versions() {
                let repo = repo();
                for (id, month) in [("v1", 1), ("v2", 2), ("v3", 3)] {
                    let posted = at(2024, month, 1);
                    repo.store_enhanced_article(article(id, "M", posted, Some(posted)))
                        .await
                        .unwrap();
                }
                let resolved = repo.find_article_version("v2", false).await.unwrap().unwrap();
                assert_eq!(resolved.article.id, "v2");
                assert_eq!(resolved.versions.len(), 3);
            }

            #[tokio::test]
            async fn previews_are_hidden_unless_requested() {
                let repo = repo();
                let future = Utc::now() + Duration::days(30);
                repo.store_enhanced_article(article("v1", "M", at(2024, 1, 1), Some(at(2024, 1, 5))))
                    .await
                    .unwrap();
                repo.store_enhanced_article(article("v2", "M", at(2024, 2, 1), None))
                    .await
                    .unwrap();
                repo.store_enhanced_article(article("v3", "M", at(2024, 3, 1), Some(future)))
                    .await
                    .unwrap();

                let public = repo.find_article_version("M", false).await.unwrap().unwrap();
                assert_eq!(public.article.id, "v1");
                assert_eq!(public.versions.keys().collect::<Vec<_>>(), vec!["v1"]);

                let preview = repo.find_article_version("M", true).await.unwrap().unwrap();
                assert_eq!(preview.article.id, "v3");
                assert_eq!(preview.versions.len(), 3);

                assert!(repo.find_article_version("v2", false).await.unwrap().is_none());
                assert_eq!(
                    repo.find_article_version("v2", true).await.unwrap().unwrap().article.id,
                    "v2"
                );
            }

            #[tokio::test]
            async fn only_previews_is_not_found() {
                let repo = repo();
                repo.store_enhanced_article(article("p1", "P", at(2024, 1, 1), None))
                    .await
                    .unwrap();
                assert!(repo.find_article_version("P", false).await.unwrap().is_none());
                assert!(repo.find_article_version("p1", false).await.unwrap().is_none());
                assert!(repo.find_article_version("missing", true).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn delete_removes_one_version() {
                let repo = repo();
                repo.store_enhanced_article(article("v1", "M", at(2024, 1, 1), Some(at(2024, 1, 5))))
                    .await
                    .unwrap();
                repo.store_enhanced_article(article("v2", "M", at(2024, 2, 1), Some(at(2024, 2, 5))))
                    .await
                    .unwrap();

                assert!(repo.delete_article_version("v2").await.unwrap());
                assert!(!repo.delete_article_version("v2").await.unwrap());

                let resolved = repo.find_article_version("v2", true).await.unwrap();
                assert!(resolved.is_none());

                let sibling = repo.find_article_version("M", false).await.unwrap().unwrap();
                assert_eq!(sibling.article.id, "v1");
                assert_eq!(sibling.versions.keys().collect::<Vec<_>>(), vec!["v1"]);
            }

            #[tokio::test]
            async fn reviews_are_returned_newest_first() {
                let repo = repo();
                let mut stored = article("v1", "M", at(2024, 1, 1), Some(at(2024, 1, 5)));
                stored.peer_review = Some(PeerReview {
                    evaluation_summary: evaluation("summary"),
                    reviews: vec![evaluation("R1"), evaluation("R2"), evaluation("R3")],
                    author_response: None,
                });
                repo.store_enhanced_article(stored).await.unwrap();

                for _ in 0..2 {
                    let resolved = repo.find_article_version("v1", false).await.unwrap().unwrap();
                    let texts: Vec<_> = resolved
                        .article
                        .peer_review
                        .unwrap()
                        .reviews
                        .into_iter()
                        .map(|r| r.text)
                        .collect();
                    assert_eq!(texts, vec!["R3", "R2", "R1"]);
                }

                let raw = repo.get_enhanced_article("v1").await.unwrap();
                assert_eq!(raw.peer_review.unwrap().reviews[0].text, "R1");
            }

            #[tokio::test]
            async fn upsert_is_idempotent_and_replaces() {
                let repo = repo();
                let mut v1 = article("v1", "M", at(2024, 1, 1), Some(at(2024, 1, 5)));
                repo.store_enhanced_article(v1.clone()).await.unwrap();
                repo.store_enhanced_article(v1.clone()).await.unwrap();
                assert_eq!(repo.get_enhanced_article_summaries().await.unwrap().len(), 1);

                v1.article.title = "Revised".into();
                repo.store_enhanced_article(v1.clone()).await.unwrap();
                assert_eq!(repo.get_enhanced_article("v1").await.unwrap(), v1);
            }

            #[tokio::test]
            async fn get_missing_article_is_an_error() {
                let repo = repo();
                assert!(matches!(
                    repo.get_enhanced_article("nope").await,
                    Err(StoreError::NotFound(id)) if id == "nope"
                ));
            }

            #[tokio::test]
            async fn summaries_list_every_version() {
                let repo = repo();
                repo.store_enhanced_article(article("v2", "M", at(2024, 2, 1), None))
                    .await
                    .unwrap();
                repo.store_enhanced_article(article("v1", "M", at(2024, 1, 1), Some(at(2024, 1, 5))))
                    .await
                    .unwrap();

                let summaries = repo.get_enhanced_article_summaries().await.unwrap();
                let ids: Vec<_> = summaries.iter().map(|s| s.id.as_str()).collect();
                assert_eq!(ids, vec!["v1", "v2"]);
                assert_eq!(summaries[0].date, Some(at(2024, 1, 5)));
                assert_eq!(summaries[1].date, None);
                assert_eq!(summaries[1].title.to_plain_text(), "Title of v2");
            }

            #[tokio::test]
            async fn deepest_valid_content_reads_back() {
                let repo = repo();
                let mut deep = article("v1", "M", at(2024, 1, 1), Some(at(2024, 1, 5)));
                deep.article.content = deepest_content();
                deep.article.licenses = vec![License {
                    kind: "CreativeWork".into(),
                    url: None,
                    content: Some(deepest_content()),
                }];
                repo.store_enhanced_article(deep.clone()).await.unwrap();
                repo.store_enhanced_article(article("v2", "M", at(2024, 2, 1), Some(at(2024, 2, 5))))
                    .await
                    .unwrap();

                assert_eq!(repo.get_enhanced_article("v1").await.unwrap(), deep);
                let by_id = repo.find_article_version("v1", false).await.unwrap().unwrap();
                assert_eq!(by_id.article, deep);
                let by_msid = repo.find_article_version("M", false).await.unwrap().unwrap();
                assert_eq!(by_msid.article.id, "v2");
                assert_eq!(by_msid.versions.len(), 2);

                assert_eq!(repo.get_enhanced_article_summaries().await.unwrap().len(), 2);
                let listing = repo
                    .get_enhanced_articles_no_content(&ListingQuery::default())
                    .await
                    .unwrap();
                assert_eq!(listing.total_count, 1);
            }

            #[tokio::test]
            async fn listing_pages_visible_manuscripts() {
                let repo = repo();
                repo.store_enhanced_article(article("a1", "A", at(2023, 1, 1), Some(at(2023, 1, 2))))
                    .await
                    .unwrap();
                repo.store_enhanced_article(article("a2", "A", at(2023, 6, 1), Some(at(2023, 6, 2))))
                    .await
                    .unwrap();
                repo.store_enhanced_article(article("b1", "B", at(2023, 3, 1), Some(at(2023, 3, 2))))
                    .await
                    .unwrap();
                repo.store_enhanced_article(article("c1", "C", at(2023, 4, 1), None))
                    .await
                    .unwrap();

                let all = repo
                    .get_enhanced_articles_no_content(&ListingQuery::default())
                    .await
                    .unwrap();
                assert_eq!(all.total_count, 2);
                let ids: Vec<_> = all.articles.iter().map(|a| a.summary.id.as_str()).collect();
                assert_eq!(ids, vec!["a2", "b1"]);

                let first = repo
                    .get_enhanced_articles_no_content(&ListingQuery::paginated(1, 1))
                    .await
                    .unwrap();
                assert_eq!(first.total_count, 2);
                assert_eq!(first.articles.len(), 1);
                assert_eq!(first.articles[0].first_published, at(2023, 1, 2));
            }
        }
    };
}

repository_contract!(in_memory, Arc::new(InMemoryArticleStore::new()));

#[cfg(feature = "sqlite")]
repository_contract!(
    sqlite,
    Arc::new(epp_core::SqliteArticleStore::open_in_memory().unwrap())
);

#[test]
fn seeded_in_memory_store_keeps_last_duplicate() {
    let mut replaced = article("v1", "M", at(2024, 1, 1), None);
    replaced.version_identifier = "replaced".into();
    let store = InMemoryArticleStore::with_articles(vec![
        article("v1", "M", at(2024, 1, 1), None),
        replaced,
    ]);
    assert_eq!(store.len(), 1);
}
