//! Catalog queries: post metadata over the database endpoints.
//!
//! Mirrors what the block store gives us per entry — title, slug, authors,
//! categories, publish state — into [`PostMeta`], and exposes the read
//! queries the front end consumes.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use tracing::{debug, instrument};

use pagemill_notion::{NotionClient, RawPage, SchemaProperty, map_spans};
use pagemill_shared::{PageId, PagemillError, PostMeta, Profile, Result};

use crate::filter::{PostFilter, list_query, search_query, slug_query};

/// Name of the category reserved for draft/testing posts.
const TESTING_CATEGORY: &str = "Testing";

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Read access to the post catalog database.
pub struct Catalog<'a> {
    client: &'a NotionClient,
    database_id: String,
    profile: Profile,
}

impl<'a> Catalog<'a> {
    pub fn new(client: &'a NotionClient, database_id: impl Into<String>, profile: Profile) -> Self {
        Self {
            client,
            database_id: database_id.into(),
            profile,
        }
    }

    /// List post metadata, narrowed by `filter` and sorted by publish date.
    #[instrument(skip_all)]
    pub async fn list(&self, filter: &PostFilter) -> Result<Vec<PostMeta>> {
        let query = list_query(filter, self.profile);
        let pages = self.client.query_database(&self.database_id, &query).await?;

        debug!(entries = pages.len(), "catalog listing fetched");
        pages.iter().map(post_meta_from_page).collect()
    }

    /// Look up a single post by its exact slug.
    #[instrument(skip_all, fields(slug = %slug))]
    pub async fn by_slug(&self, slug: &str) -> Result<PostMeta> {
        let query = slug_query(slug);
        let pages = self.client.query_database(&self.database_id, &query).await?;

        let page = pages
            .first()
            .ok_or_else(|| PagemillError::not_found(format!("no post with slug '{slug}'")))?;
        post_meta_from_page(page)
    }

    /// Search posts by title substring.
    #[instrument(skip_all, fields(text = %text))]
    pub async fn search(&self, text: &str) -> Result<Vec<PostMeta>> {
        let query = search_query(text, self.profile);
        let pages = self.client.query_database(&self.database_id, &query).await?;

        pages.iter().map(post_meta_from_page).collect()
    }

    /// All category options defined on the catalog database.
    ///
    /// Production hides the Testing category, matching every other query.
    #[instrument(skip_all)]
    pub async fn categories(&self) -> Result<Vec<String>> {
        let database = self.client.retrieve_database(&self.database_id).await?;

        let Some(SchemaProperty::MultiSelect { multi_select }) =
            database.properties.get("Categories")
        else {
            return Ok(Vec::new());
        };

        Ok(multi_select
            .options
            .iter()
            .map(|option| option.name.clone())
            .filter(|name| self.profile != Profile::Production || name != TESTING_CATEGORY)
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Metadata assembly
// ---------------------------------------------------------------------------

/// Assemble post metadata from one database entry.
///
/// Absent properties fall back to empty values rather than failing; only a
/// malformed page id is an error. An empty Slug property falls back to a
/// slug derived from the name (in memory only — the catalog entry is never
/// written back).
pub fn post_meta_from_page(page: &RawPage) -> Result<PostMeta> {
    let props = &page.properties;

    let name = props
        .get("Name")
        .and_then(|p| p.as_title())
        .unwrap_or_default();

    let slug = props
        .get("Slug")
        .and_then(|p| p.as_rich_text())
        .map(|runs| {
            runs.iter()
                .map(|run| run.plain_text.as_str())
                .collect::<String>()
        })
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| slugify(&name));

    let publish_date = props
        .get("PublishDate")
        .and_then(|p| p.as_date_range())
        .and_then(|(start, _end)| start)
        .and_then(parse_publish_date)
        .unwrap_or_else(Utc::now);

    Ok(PostMeta {
        id: PageId::parse(&page.id)?,
        name,
        categories: props
            .get("Categories")
            .and_then(|p| p.as_multi_select())
            .unwrap_or_default(),
        publish_date,
        publish: props
            .get("Publish")
            .and_then(|p| p.as_checkbox())
            .unwrap_or(false),
        authors: props
            .get("Authors")
            .and_then(|p| p.as_people())
            .unwrap_or_default(),
        slug,
        description: props
            .get("Description")
            .and_then(|p| p.as_rich_text())
            .map(|runs| map_spans(runs, None))
            .unwrap_or_default(),
        image: page.cover.as_ref().map(|cover| cover.url().to_owned()),
        featured: props.get("Featured").and_then(|p| p.as_checkbox()),
    })
}

/// Derive a URL slug from a post name: lowercase, non-alphanumeric runs
/// collapse to single dashes.
pub fn slugify(name: &str) -> String {
    static NON_ALNUM_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid regex"));

    NON_ALNUM_RE
        .replace_all(&name.to_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}

/// Parse a publish date: full RFC 3339 timestamps and date-only values both
/// occur in the wild.
fn parse_publish_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}
