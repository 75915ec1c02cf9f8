//! Catalog query composition.
//!
//! Builds the filter/sort JSON bodies the database query endpoint expects.
//! The serving profile leaks into every query: development surfaces the
//! Testing category, production filters it out.

use serde_json::{Value, json};

use pagemill_shared::Profile;

/// Name of the category reserved for draft/testing posts.
const TESTING_CATEGORY: &str = "Testing";

/// Options narrowing the catalog listing.
#[derive(Debug, Clone)]
pub struct PostFilter {
    /// Match posts in any of these categories.
    pub categories: Vec<String>,
    /// Only posts with the Publish checkbox set.
    pub only_published: bool,
    /// Only posts with the Featured checkbox set.
    pub featured: bool,
    /// Sort by publish date ascending (false = descending).
    pub ascending: bool,
}

impl Default for PostFilter {
    fn default() -> Self {
        Self {
            categories: Vec::new(),
            only_published: false,
            featured: false,
            ascending: true,
        }
    }
}

/// Build the query body for the catalog listing.
pub fn list_query(filter: &PostFilter, profile: Profile) -> Value {
    let mut categories = filter.categories.clone();
    if profile == Profile::Development {
        categories.push(TESTING_CATEGORY.into());
    }

    let category_clauses: Vec<Value> = categories
        .iter()
        .map(|category| {
            json!({
                "property": "Categories",
                "multi_select": { "contains": category }
            })
        })
        .collect();
    let has_categories = !category_clauses.is_empty();

    let filter_value = if has_categories && !filter.only_published && !filter.featured {
        Some(json!({ "or": category_clauses }))
    } else {
        let mut clauses = Vec::new();

        if filter.only_published {
            clauses.push(json!({
                "property": "Publish",
                "checkbox": { "equals": true }
            }));
        }
        if has_categories {
            clauses.push(json!({ "or": category_clauses }));
        }
        if profile == Profile::Production {
            clauses.push(json!({
                "property": "Categories",
                "multi_select": { "does_not_contain": TESTING_CATEGORY }
            }));
        }
        if filter.featured {
            clauses.push(json!({
                "property": "Featured",
                "checkbox": { "equals": true }
            }));
        }

        (!clauses.is_empty()).then(|| json!({ "and": clauses }))
    };

    let direction = if filter.ascending {
        "ascending"
    } else {
        "descending"
    };
    let mut query = json!({
        "sorts": [ { "property": "PublishDate", "direction": direction } ]
    });
    if let Some(value) = filter_value {
        query["filter"] = value;
    }
    query
}

/// Build the query body for an exact-slug lookup.
pub fn slug_query(slug: &str) -> Value {
    json!({
        "filter": {
            "and": [
                { "property": "Slug", "rich_text": { "equals": slug } }
            ]
        }
    })
}

/// Build the query body for a title search.
pub fn search_query(text: &str, profile: Profile) -> Value {
    let mut clauses = vec![json!({
        "property": "Name",
        "title": { "contains": text }
    })];
    if profile == Profile::Production {
        clauses.push(json!({
            "property": "Categories",
            "multi_select": { "does_not_contain": TESTING_CATEGORY }
        }));
    }

    json!({ "filter": { "and": clauses } })
}
