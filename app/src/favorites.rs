//! Favorite/like toggle: an explicit optimistic state machine with
//! rollback and a per-(user, recipe) in-flight guard.

use dashmap::DashMap;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use plateshare_core::{NewRecipeLike, PlateshareClient};

use crate::error::AppError;
use crate::search::{RecipeCardRow, RecipeSummary, RECIPE_CARD_SELECT};

/// Per-(user, recipe) display state the toggle operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FavoriteState {
    pub favorited: bool,
    pub like_count: u64,
}

/// Outcome of a toggle attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Favorited,
    Unfavorited,
    /// A toggle for the same (user, recipe) was already in flight;
    /// nothing was done.
    Pending,
}

/// A toggle result: the outcome plus the state the display should show.
/// On an error return the caller's state is unchanged (the optimistic
/// flip was rolled back).
#[derive(Debug, Clone, Copy)]
pub struct ToggleResult {
    pub outcome: ToggleOutcome,
    pub state: FavoriteState,
}

#[derive(Debug, Deserialize)]
struct LikeKey {
    #[allow(dead_code)]
    id: Uuid,
}

#[derive(Debug, Deserialize)]
struct FavoritedRecipeRow {
    recipes: RecipeCardRow,
}

/// Removes its (user, recipe) key when dropped, so the in-flight slot
/// is released even when the toggle future is cancelled mid-request.
struct InFlightSlot<'a> {
    map: &'a DashMap<(Uuid, Uuid), ()>,
    key: (Uuid, Uuid),
}

impl Drop for InFlightSlot<'_> {
    fn drop(&mut self) {
        self.map.remove(&self.key);
    }
}

/// Favorite operations. One instance guards all recipes: the in-flight
/// map is keyed by (user, recipe).
pub struct FavoriteService {
    client: Arc<PlateshareClient>,
    in_flight: DashMap<(Uuid, Uuid), ()>,
}

impl FavoriteService {
    pub fn new(client: Arc<PlateshareClient>) -> Self {
        Self {
            client,
            in_flight: DashMap::new(),
        }
    }

    /// Initial state for a recipe view: like count always, presence
    /// only when a viewer is signed in.
    pub async fn status(&self, recipe_id: Uuid) -> Result<FavoriteState, AppError> {
        let like_count = self.like_count(recipe_id).await?;
        let favorited = match self.client.current_session() {
            Some(session) => self.is_favorited(session.user.id, recipe_id).await?,
            None => false,
        };
        Ok(FavoriteState {
            favorited,
            like_count,
        })
    }

    /// The signed-in user's favorited recipes as cards, most recently
    /// favorited first. The cards ride along on the like rows through
    /// an inner join.
    pub async fn my_favorites(&self) -> Result<Vec<RecipeSummary>, AppError> {
        let session = self
            .client
            .current_session()
            .ok_or(AppError::SignInRequired)?;
        let result = self
            .client
            .from("recipe_likes")
            .select(&format!("created_at,recipes!inner({RECIPE_CARD_SELECT})"))
            .eq("user_id", session.user.id)
            .order_desc("created_at")
            .fetch::<FavoritedRecipeRow>()
            .await?;
        Ok(result
            .rows
            .into_iter()
            .map(|row| row.recipes.into_summary())
            .collect())
    }

    /// Exact number of likes on a recipe.
    pub async fn like_count(&self, recipe_id: Uuid) -> Result<u64, AppError> {
        let count = self
            .client
            .from("recipe_likes")
            .eq("recipe_id", recipe_id)
            .count()
            .await?;
        Ok(count)
    }

    async fn is_favorited(&self, user_id: Uuid, recipe_id: Uuid) -> Result<bool, AppError> {
        let row = self
            .client
            .from("recipe_likes")
            .select("id")
            .eq("user_id", user_id)
            .eq("recipe_id", recipe_id)
            .fetch_optional::<LikeKey>()
            .await?;
        Ok(row.is_some())
    }

    /// Flip the favorite state of a recipe.
    ///
    /// Unauthenticated callers are rejected before any remote call. A
    /// second toggle while one is in flight for the same (user, recipe)
    /// returns [`ToggleOutcome::Pending`] and performs no work. The
    /// state flips optimistically and is rolled back if the write
    /// fails, so an `Err` leaves the caller's state valid as passed.
    pub async fn toggle(
        &self,
        recipe_id: Uuid,
        state: FavoriteState,
    ) -> Result<ToggleResult, AppError> {
        let session = self
            .client
            .current_session()
            .ok_or(AppError::SignInRequired)?;
        let user_id = session.user.id;
        let key = (user_id, recipe_id);

        let _slot = match self.in_flight.entry(key) {
            dashmap::Entry::Occupied(_) => {
                tracing::debug!(%recipe_id, "favorite toggle already in flight");
                return Ok(ToggleResult {
                    outcome: ToggleOutcome::Pending,
                    state,
                });
            }
            dashmap::Entry::Vacant(slot) => {
                slot.insert(());
                InFlightSlot {
                    map: &self.in_flight,
                    key,
                }
            }
        };

        let was_favorited = state.favorited;
        // Optimistic flip; the counter never goes below zero.
        let optimistic = if was_favorited {
            FavoriteState {
                favorited: false,
                like_count: state.like_count.saturating_sub(1),
            }
        } else {
            FavoriteState {
                favorited: true,
                like_count: state.like_count + 1,
            }
        };

        let result = if was_favorited {
            self.client
                .from("recipe_likes")
                .eq("user_id", user_id)
                .eq("recipe_id", recipe_id)
                .delete()
                .await
        } else {
            self.client
                .from("recipe_likes")
                .insert_only(&NewRecipeLike { user_id, recipe_id })
                .await
        };

        match result {
            Ok(()) => Ok(ToggleResult {
                outcome: if was_favorited {
                    ToggleOutcome::Unfavorited
                } else {
                    ToggleOutcome::Favorited
                },
                state: optimistic,
            }),
            Err(err) => {
                // Roll back: the caller keeps the state it passed in.
                tracing::debug!(%recipe_id, error = %err, "favorite toggle rolled back");
                Err(err.into())
            }
        }
    }
}
