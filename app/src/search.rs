//! Recipe search: filter composition and numbered pagination.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use plateshare_core::{Difficulty, PlateshareClient, QueryBuilder};

use crate::error::AppError;
use crate::pagination::{page_count, page_offset, PAGE_SIZE};
use crate::ratings::{RatingSummary, RatingValue};

/// Cuisines offered by the search filter UI.
pub const CUISINE_OPTIONS: &[&str] = &[
    "Italian",
    "Mexican",
    "Asian",
    "Indian",
    "Mediterranean",
    "American",
    "French",
    "Thai",
    "Chinese",
    "Japanese",
    "Korean",
];

/// Dietary tags offered by the search filter UI.
pub const DIETARY_OPTIONS: &[&str] = &[
    "Vegetarian",
    "Vegan",
    "Gluten-Free",
    "Dairy-Free",
    "Nut-Free",
    "Keto",
    "Paleo",
    "Low-Carb",
    "High-Protein",
];

/// The search filter set. Dimensions AND-combine; an empty dimension
/// imposes no restriction.
#[derive(Debug, Clone, Default)]
pub struct RecipeFilters {
    /// Free-text query matched against title and description.
    pub query: String,
    pub cuisines: Vec<String>,
    pub difficulties: Vec<Difficulty>,
    pub dietary_tags: Vec<String>,
    pub max_prep_minutes: Option<u32>,
    pub max_cook_minutes: Option<u32>,
}

/// Embedded recipe author, selected with `users!inner(...)`.
#[derive(Debug, Clone, Deserialize)]
pub struct Author {
    pub username: String,
    pub avatar_url: Option<String>,
}

/// Projection for recipe cards, shared by search, category, featured,
/// and profile listings.
pub(crate) const RECIPE_CARD_SELECT: &str = "id,title,description,image_urls,prep_time_minutes,cook_time_minutes,servings,difficulty,cuisine_type,dietary_tags,created_at,users!inner(username,avatar_url),ratings(rating)";

/// Wire shape of one recipe card row.
#[derive(Debug, Deserialize)]
pub(crate) struct RecipeCardRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub image_urls: Vec<String>,
    pub prep_time_minutes: Option<u32>,
    pub cook_time_minutes: Option<u32>,
    pub servings: Option<u32>,
    pub difficulty: Difficulty,
    pub cuisine_type: Option<String>,
    pub dietary_tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub users: Author,
    #[serde(default)]
    pub ratings: Vec<RatingValue>,
}

/// A recipe card ready for display: the row plus its aggregated rating.
#[derive(Debug, Clone)]
pub struct RecipeSummary {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub image_urls: Vec<String>,
    pub prep_time_minutes: Option<u32>,
    pub cook_time_minutes: Option<u32>,
    pub servings: Option<u32>,
    pub difficulty: Difficulty,
    pub cuisine_type: Option<String>,
    pub dietary_tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub author: Author,
    pub rating: RatingSummary,
}

impl RecipeCardRow {
    pub(crate) fn into_summary(self) -> RecipeSummary {
        let rating = RatingSummary::from_values(&self.ratings);
        RecipeSummary {
            id: self.id,
            title: self.title,
            description: self.description,
            image_urls: self.image_urls,
            prep_time_minutes: self.prep_time_minutes,
            cook_time_minutes: self.cook_time_minutes,
            servings: self.servings,
            difficulty: self.difficulty,
            cuisine_type: self.cuisine_type,
            dietary_tags: self.dietary_tags,
            created_at: self.created_at,
            author: self.users,
            rating,
        }
    }
}

/// One page of search results with the exact total for pagination.
#[derive(Debug)]
pub struct SearchPage {
    pub recipes: Vec<RecipeSummary>,
    pub total: u64,
    pub page: u32,
}

impl SearchPage {
    pub fn total_pages(&self) -> u32 {
        page_count(self.total)
    }
}

/// Recipe search over public recipes.
pub struct SearchService {
    client: Arc<PlateshareClient>,
}

impl SearchService {
    pub fn new(client: Arc<PlateshareClient>) -> Self {
        Self { client }
    }

    /// Run one search request: all active filter dimensions applied to
    /// public recipes, newest first, with the requested page window and
    /// an exact total. Author and rating values ride along in the same
    /// request.
    pub async fn search(
        &self,
        filters: &RecipeFilters,
        page: u32,
    ) -> Result<SearchPage, AppError> {
        let query = apply_filters(self.client.from("recipes"), filters)
            .select(RECIPE_CARD_SELECT)
            .order_desc("created_at")
            .range(page_offset(page), PAGE_SIZE)
            .count_exact();

        let result = query.fetch::<RecipeCardRow>().await?;
        let total = result.total.unwrap_or(result.rows.len() as u64);
        tracing::debug!(query = %filters.query, page, total, "search complete");

        Ok(SearchPage {
            recipes: result.rows.into_iter().map(RecipeCardRow::into_summary).collect(),
            total,
            page,
        })
    }
}

/// Apply the filter set to a recipes query. Only the public restriction
/// is unconditional.
fn apply_filters<'a>(query: QueryBuilder<'a>, filters: &RecipeFilters) -> QueryBuilder<'a> {
    let mut query = query.eq("is_public", true);

    let text = filters.query.trim();
    if !text.is_empty() {
        query = query.or(&format!(
            "title.ilike.%{text}%,description.ilike.%{text}%"
        ));
    }
    if !filters.cuisines.is_empty() {
        query = query.in_list("cuisine_type", &filters.cuisines);
    }
    if !filters.difficulties.is_empty() {
        let values: Vec<&str> = filters.difficulties.iter().map(Difficulty::as_str).collect();
        query = query.in_list("difficulty", &values);
    }
    if !filters.dietary_tags.is_empty() {
        query = query.overlaps("dietary_tags", &filters.dietary_tags);
    }
    if let Some(minutes) = filters.max_prep_minutes {
        query = query.lte("prep_time_minutes", minutes);
    }
    if let Some(minutes) = filters.max_cook_minutes {
        query = query.lte("cook_time_minutes", minutes);
    }
    query
}
