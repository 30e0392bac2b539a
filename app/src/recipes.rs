//! Recipe publishing, management, and detail assembly.

use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use plateshare_core::{
    Difficulty, Ingredient, InstructionStep, NewRecipe, PlateshareClient, RecipeRow,
};

use crate::comments::{self, CommentThread};
use crate::error::AppError;
use crate::favorites::FavoriteState;
use crate::ratings::{self, RatingSummary};
use crate::search::{Author, RecipeCardRow, RecipeSummary, RECIPE_CARD_SELECT};

/// Stock image attached to recipes published without an upload.
pub const DEFAULT_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1556909114-f6e7ad7d3136?ixlib=rb-4.0.3&auto=format&fit=crop&w=500&q=80";

/// Recipes shown on the home page.
const FEATURED_LIMIT: u64 = 6;

/// A recipe as entered in the share/edit form, before normalization.
/// Instruction text is positional; step numbers are assigned on
/// normalize.
#[derive(Debug, Clone, Default)]
pub struct RecipeDraft {
    pub title: String,
    pub description: String,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    pub prep_time_minutes: Option<u32>,
    pub cook_time_minutes: Option<u32>,
    pub servings: Option<u32>,
    pub difficulty: Option<Difficulty>,
    pub cuisine_type: String,
    pub dietary_tags: Vec<String>,
    pub image_urls: Vec<String>,
}

impl RecipeDraft {
    /// Normalize the draft into an insert payload: trim text, drop
    /// ingredient lines missing a name or amount, drop blank
    /// instruction steps and renumber the rest contiguously from 1,
    /// and fall back to the stock image when nothing was uploaded.
    pub fn normalize(self, user_id: Uuid) -> Result<NewRecipe, AppError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::validation("A recipe title is required"));
        }

        let ingredients: Vec<Ingredient> = self
            .ingredients
            .into_iter()
            .filter(|i| !i.name.trim().is_empty() && !i.amount.trim().is_empty())
            .map(|i| Ingredient {
                name: i.name.trim().to_string(),
                amount: i.amount.trim().to_string(),
                unit: i.unit.trim().to_string(),
            })
            .collect();

        let instructions: Vec<InstructionStep> = self
            .instructions
            .iter()
            .map(|text| text.trim())
            .filter(|text| !text.is_empty())
            .enumerate()
            .map(|(index, text)| InstructionStep {
                step: index as u32 + 1,
                instruction: text.to_string(),
            })
            .collect();

        let image_urls = if self.image_urls.is_empty() {
            vec![DEFAULT_IMAGE_URL.to_string()]
        } else {
            self.image_urls
        };

        Ok(NewRecipe {
            user_id,
            title,
            description: non_empty(&self.description),
            ingredients,
            instructions,
            prep_time_minutes: self.prep_time_minutes,
            cook_time_minutes: self.cook_time_minutes,
            servings: self.servings,
            difficulty: self.difficulty.unwrap_or(Difficulty::Easy),
            cuisine_type: non_empty(&self.cuisine_type),
            dietary_tags: self.dietary_tags,
            image_urls,
            is_public: true,
        })
    }
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct RecipeDetailRow {
    #[serde(flatten)]
    recipe: RecipeRow,
    users: Author,
}

/// A fully assembled recipe page: the recipe, its author, aggregate
/// rating, favorite state, the viewer's own rating, and comments.
#[derive(Debug)]
pub struct RecipeDetail {
    pub recipe: RecipeRow,
    pub author: Author,
    pub rating: RatingSummary,
    pub viewer_rating: Option<i32>,
    pub favorite: FavoriteState,
    pub comments: Vec<CommentThread>,
}

/// Recipe CRUD and page assembly.
pub struct RecipeService {
    client: Arc<PlateshareClient>,
}

impl RecipeService {
    pub fn new(client: Arc<PlateshareClient>) -> Self {
        Self { client }
    }

    /// Publish a recipe and return the created row.
    pub async fn create(&self, draft: RecipeDraft) -> Result<RecipeRow, AppError> {
        let session = self
            .client
            .current_session()
            .ok_or(AppError::SignInRequired)?;
        let payload = draft.normalize(session.user.id)?;
        let row: RecipeRow = self.client.from("recipes").insert(&payload).await?;
        tracing::debug!(recipe_id = %row.id, "recipe published");
        Ok(row)
    }

    /// Update an owned recipe with a re-normalized draft. The patch is
    /// filtered by owner as well as id; a non-owner's edit matches
    /// nothing here and is re-enforced by the platform regardless.
    pub async fn update(&self, recipe_id: Uuid, draft: RecipeDraft) -> Result<(), AppError> {
        let session = self
            .client
            .current_session()
            .ok_or(AppError::SignInRequired)?;
        let payload = draft.normalize(session.user.id)?;
        self.client
            .from("recipes")
            .eq("id", recipe_id)
            .eq("user_id", session.user.id)
            .update(&payload)
            .await?;
        Ok(())
    }

    /// Delete an owned recipe.
    pub async fn delete(&self, recipe_id: Uuid) -> Result<(), AppError> {
        let session = self
            .client
            .current_session()
            .ok_or(AppError::SignInRequired)?;
        self.client
            .from("recipes")
            .eq("id", recipe_id)
            .eq("user_id", session.user.id)
            .delete()
            .await?;
        Ok(())
    }

    /// All of the signed-in user's recipes, public and private, newest
    /// first.
    pub async fn my_recipes(&self) -> Result<Vec<RecipeRow>, AppError> {
        let session = self
            .client
            .current_session()
            .ok_or(AppError::SignInRequired)?;
        let page = self
            .client
            .from("recipes")
            .eq("user_id", session.user.id)
            .order_desc("created_at")
            .fetch::<RecipeRow>()
            .await?;
        Ok(page.rows)
    }

    /// Flip an owned recipe's visibility.
    pub async fn set_visibility(&self, recipe_id: Uuid, public: bool) -> Result<(), AppError> {
        let session = self
            .client
            .current_session()
            .ok_or(AppError::SignInRequired)?;
        self.client
            .from("recipes")
            .eq("id", recipe_id)
            .eq("user_id", session.user.id)
            .update(&json!({ "is_public": public }))
            .await?;
        Ok(())
    }

    /// The newest public recipes for the home page.
    pub async fn featured(&self) -> Result<Vec<RecipeSummary>, AppError> {
        let page = self
            .client
            .from("recipes")
            .select(RECIPE_CARD_SELECT)
            .eq("is_public", true)
            .order_desc("created_at")
            .limit(FEATURED_LIMIT)
            .fetch::<RecipeCardRow>()
            .await?;
        Ok(page.rows.into_iter().map(RecipeCardRow::into_summary).collect())
    }

    /// Assemble the recipe page. A missing or private recipe is a
    /// distinct not-found outcome; the remaining pieces load in
    /// sequence after the recipe itself resolves.
    pub async fn detail(&self, recipe_id: Uuid) -> Result<RecipeDetail, AppError> {
        let row = self
            .client
            .from("recipes")
            .select("*,users!inner(username,avatar_url)")
            .eq("id", recipe_id)
            .eq("is_public", true)
            .fetch_one::<RecipeDetailRow>()
            .await?;

        let rating = ratings::recipe_summary(&self.client, recipe_id).await?;

        let like_count = self
            .client
            .from("recipe_likes")
            .eq("recipe_id", recipe_id)
            .count()
            .await?;

        let (viewer_rating, favorited) = match self.client.current_session() {
            Some(session) => {
                let viewer_rating =
                    ratings::viewer_rating(&self.client, session.user.id, recipe_id).await?;
                let favorited = self
                    .client
                    .from("recipe_likes")
                    .select("id")
                    .eq("user_id", session.user.id)
                    .eq("recipe_id", recipe_id)
                    .fetch_optional::<serde_json::Value>()
                    .await?
                    .is_some();
                (viewer_rating, favorited)
            }
            None => (None, false),
        };

        let comments = comments::threads(&self.client, recipe_id).await?;

        Ok(RecipeDetail {
            recipe: row.recipe,
            author: row.users,
            rating,
            viewer_rating,
            favorite: FavoriteState {
                favorited,
                like_count,
            },
            comments,
        })
    }
}
