//! Translation of list query parameters into gateway filters.
//!
//! Only a fixed set of parameters is recognised per entity kind. Text matching is
//! case-insensitive and unanchored, and list fields match when any element matches.

use serde::Deserialize;

use culinary_core::query::{Expr, Filter};

use crate::validation::ValidationErrors;

/// Fields searched by `q` on recipes.
pub const RECIPE_SEARCH_FIELDS: &[&str] = &["title", "description", "ingredients", "tags"];
/// Fields searched by `q` on lessons.
pub const LESSON_SEARCH_FIELDS: &[&str] = &["title", "content", "tags"];
/// Fields searched by `q` on videos.
pub const VIDEO_SEARCH_FIELDS: &[&str] = &["title", "description", "tags"];

/// `?q=` for lessons and videos.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// `?q=&tag=` for recipes.
#[derive(Debug, Default, Deserialize)]
pub struct RecipeParams {
    pub q: Option<String>,
    pub tag: Option<String>,
}

/// `?active=` for ads, kept raw so the tri-state can be parsed explicitly.
#[derive(Debug, Default, Deserialize)]
pub struct AdParams {
    pub active: Option<String>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Builds "`q` appears in any of `fields`". An absent or empty `q` matches everything.
pub fn text_search(q: Option<&str>, fields: &[&str]) -> Option<Expr> {
    let q = non_empty(q)?;

    Some(Filter::or(
        fields
            .iter()
            .map(|field| Filter::contains(*field, q)),
    ))
}

/// `q` over the recipe search fields AND `tag` over `tags`, each only when given.
pub fn recipe_filter(q: Option<&str>, tag: Option<&str>) -> Option<Expr> {
    let search = text_search(q, RECIPE_SEARCH_FIELDS);
    let tag = non_empty(tag).map(|tag| Filter::contains("tags", tag));

    match (search, tag) {
        (Some(search), Some(tag)) => Some(search.and(tag)),
        (search, tag) => search.or(tag),
    }
}

pub fn lesson_filter(q: Option<&str>) -> Option<Expr> {
    text_search(q, LESSON_SEARCH_FIELDS)
}

pub fn video_filter(q: Option<&str>) -> Option<Expr> {
    text_search(q, VIDEO_SEARCH_FIELDS)
}

/// Parses the `active` parameter.
///
/// Missing means `Some(true)`. `all`, `any` and `null` lift the filter (`None`).
pub fn parse_active(raw: Option<&str>) -> Result<Option<bool>, ValidationErrors> {
    let Some(raw) = raw else {
        return Ok(Some(true));
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(Some(true)),
        "false" | "0" | "no" | "off" => Ok(Some(false)),
        "all" | "any" | "null" => Ok(None),
        _ => Err(ValidationErrors::single(
            "active",
            format!("could not parse '{raw}' as a boolean"),
        )),
    }
}

pub fn ad_filter(active: Option<bool>) -> Option<Expr> {
    active.map(|active| Filter::eq("active", active))
}
