//! Public profiles and profile editing.

use std::sync::Arc;

use plateshare_core::{CookingLevel, PlateshareClient, ProfilePatch, UserRow};

use crate::error::AppError;
use crate::search::{RecipeCardRow, RecipeSummary, RECIPE_CARD_SELECT};

/// A profile page: the user, their counts, and their public recipes.
#[derive(Debug)]
pub struct ProfileView {
    pub user: UserRow,
    pub recipe_count: u64,
    pub follower_count: u64,
    pub following_count: u64,
    pub recipes: Vec<RecipeSummary>,
}

/// Edit form for the signed-in user's own profile. Username is
/// immutable in this layer.
#[derive(Debug, Clone)]
pub struct ProfileEdit {
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub cooking_level: CookingLevel,
    /// Set when a new avatar was uploaded first.
    pub avatar_url: Option<String>,
}

/// Profile loading and editing.
pub struct ProfileService {
    client: Arc<PlateshareClient>,
}

impl ProfileService {
    pub fn new(client: Arc<PlateshareClient>) -> Self {
        Self { client }
    }

    /// Load a profile by username. An unknown username is a distinct
    /// not-found outcome; an individual count query failing degrades
    /// that count to zero without failing the page.
    pub async fn by_username(&self, username: &str) -> Result<ProfileView, AppError> {
        let user = self
            .client
            .from("users")
            .eq("username", username)
            .fetch_one::<UserRow>()
            .await?;

        let recipe_count = self
            .count(
                self.client
                    .from("recipes")
                    .eq("user_id", user.id)
                    .eq("is_public", true),
                "recipe",
            )
            .await;
        let follower_count = self
            .count(
                self.client.from("follows").eq("following_id", user.id),
                "follower",
            )
            .await;
        let following_count = self
            .count(
                self.client.from("follows").eq("follower_id", user.id),
                "following",
            )
            .await;

        let recipes = self
            .client
            .from("recipes")
            .select(RECIPE_CARD_SELECT)
            .eq("user_id", user.id)
            .eq("is_public", true)
            .order_desc("created_at")
            .fetch::<RecipeCardRow>()
            .await?;

        Ok(ProfileView {
            user,
            recipe_count,
            follower_count,
            following_count,
            recipes: recipes
                .rows
                .into_iter()
                .map(RecipeCardRow::into_summary)
                .collect(),
        })
    }

    async fn count(&self, query: plateshare_core::QueryBuilder<'_>, kind: &str) -> u64 {
        match query.count().await {
            Ok(count) => count,
            Err(err) => {
                tracing::warn!(kind, error = %err, "profile count failed, showing zero");
                0
            }
        }
    }

    /// Update the signed-in user's own profile row.
    pub async fn update_own(&self, edit: ProfileEdit) -> Result<(), AppError> {
        let session = self
            .client
            .current_session()
            .ok_or(AppError::SignInRequired)?;
        let patch = ProfilePatch {
            full_name: edit.full_name.and_then(|s| trimmed(&s)),
            bio: edit.bio.and_then(|s| trimmed(&s)),
            cooking_level: edit.cooking_level,
            avatar_url: edit.avatar_url,
        };
        self.client
            .from("users")
            .eq("id", session.user.id)
            .update(&patch)
            .await?;
        Ok(())
    }
}

fn trimmed(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
