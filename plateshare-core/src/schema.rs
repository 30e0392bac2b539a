//! Canonical typed records for the remote tables.
//!
//! Query results are decoded into these (or into per-query records in
//! the app layer) at the boundary; untyped JSON never travels inward.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Recipe difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// Self-declared cooking experience on a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CookingLevel {
    Beginner,
    Intermediate,
    Advanced,
}

/// One ingredient line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub amount: String,
    pub unit: String,
}

/// One instruction step. Persisted steps are numbered contiguously
/// from 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionStep {
    pub step: u32,
    pub instruction: String,
}

/// A row of the `users` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub cooking_level: CookingLevel,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A row of the `recipes` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<InstructionStep>,
    pub prep_time_minutes: Option<u32>,
    pub cook_time_minutes: Option<u32>,
    pub servings: Option<u32>,
    pub difficulty: Difficulty,
    pub cuisine_type: Option<String>,
    pub dietary_tags: Vec<String>,
    pub image_urls: Vec<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A row of the `ratings` table. At most one per (user, recipe),
/// enforced by the caller's check-then-update-or-insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub recipe_id: Uuid,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
}

/// A row of the `comments` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub recipe_id: Uuid,
    pub parent_comment_id: Option<Uuid>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A row of the `recipe_likes` table. Presence means favorited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeLikeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub recipe_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A row of the `follows` table, used only for profile counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowRow {
    pub follower_id: Uuid,
    pub following_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for `recipes`.
#[derive(Debug, Clone, Serialize)]
pub struct NewRecipe {
    pub user_id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<InstructionStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prep_time_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cook_time_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servings: Option<u32>,
    pub difficulty: Difficulty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine_type: Option<String>,
    pub dietary_tags: Vec<String>,
    pub image_urls: Vec<String>,
    pub is_public: bool,
}

/// Insert payload for `ratings`.
#[derive(Debug, Clone, Serialize)]
pub struct NewRating {
    pub user_id: Uuid,
    pub recipe_id: Uuid,
    pub rating: i32,
}

/// Insert payload for `comments`.
#[derive(Debug, Clone, Serialize)]
pub struct NewComment {
    pub user_id: Uuid,
    pub recipe_id: Uuid,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_comment_id: Option<Uuid>,
}

/// Insert payload for `recipe_likes`.
#[derive(Debug, Clone, Serialize)]
pub struct NewRecipeLike {
    pub user_id: Uuid,
    pub recipe_id: Uuid,
}

/// Patch payload for a profile edit. Username is immutable in this
/// layer and deliberately absent.
#[derive(Debug, Clone, Serialize)]
pub struct ProfilePatch {
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub cooking_level: CookingLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}
