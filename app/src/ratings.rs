//! Rating aggregation and the rate-submit flow.

use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use plateshare_core::{NewRating, PlateshareClient};

use crate::error::AppError;

/// One embedded rating value, as selected with `ratings(rating)`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RatingValue {
    pub rating: i32,
}

/// Aggregate of a recipe's ratings. A recipe nobody has rated reports
/// `average: None`, never 0.0 as a real average.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingSummary {
    pub average: Option<f64>,
    pub count: usize,
}

impl RatingSummary {
    /// Arithmetic mean and count of a list of 1-5 values.
    pub fn summarize(values: &[i32]) -> Self {
        if values.is_empty() {
            return Self {
                average: None,
                count: 0,
            };
        }
        let sum: i64 = values.iter().map(|&v| i64::from(v)).sum();
        Self {
            average: Some(sum as f64 / values.len() as f64),
            count: values.len(),
        }
    }

    pub(crate) fn from_values(values: &[RatingValue]) -> Self {
        let raw: Vec<i32> = values.iter().map(|v| v.rating).collect();
        Self::summarize(&raw)
    }

    /// Display form, rounded to one decimal only here: "4.5", or
    /// "No rating" for the empty sentinel.
    pub fn display(&self) -> String {
        match self.average {
            Some(average) => format!("{:.1}", average),
            None => "No rating".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RatingKey {
    id: Uuid,
}

#[derive(Debug, Deserialize)]
struct OwnRating {
    rating: i32,
}

/// Fetch and summarize all ratings of a recipe.
pub async fn recipe_summary(
    client: &PlateshareClient,
    recipe_id: Uuid,
) -> Result<RatingSummary, AppError> {
    let page = client
        .from("ratings")
        .select("rating")
        .eq("recipe_id", recipe_id)
        .fetch::<RatingValue>()
        .await?;
    Ok(RatingSummary::from_values(&page.rows))
}

/// The signed-in viewer's own rating of a recipe, if any.
pub async fn viewer_rating(
    client: &PlateshareClient,
    user_id: Uuid,
    recipe_id: Uuid,
) -> Result<Option<i32>, AppError> {
    let row = client
        .from("ratings")
        .select("rating")
        .eq("user_id", user_id)
        .eq("recipe_id", recipe_id)
        .fetch_optional::<OwnRating>()
        .await?;
    Ok(row.map(|r| r.rating))
}

/// Rating operations for the signed-in user.
pub struct RatingService {
    client: Arc<PlateshareClient>,
}

impl RatingService {
    pub fn new(client: Arc<PlateshareClient>) -> Self {
        Self { client }
    }

    /// Submit a 1-5 star rating, upserting the caller's existing rating
    /// if there is one, then refetch and re-summarize so the returned
    /// average already includes the just-submitted value.
    pub async fn rate(&self, recipe_id: Uuid, stars: i32) -> Result<RatingSummary, AppError> {
        let session = self
            .client
            .current_session()
            .ok_or(AppError::SignInRequired)?;
        if !(1..=5).contains(&stars) {
            return Err(AppError::validation("Rating must be between 1 and 5 stars"));
        }
        let user_id = session.user.id;

        // Check-then-update-or-insert; uniqueness per (user, recipe) is
        // this check, not a database constraint visible here.
        let existing = self
            .client
            .from("ratings")
            .select("id")
            .eq("user_id", user_id)
            .eq("recipe_id", recipe_id)
            .fetch_optional::<RatingKey>()
            .await?;

        match existing {
            Some(row) => {
                self.client
                    .from("ratings")
                    .eq("id", row.id)
                    .update(&serde_json::json!({ "rating": stars }))
                    .await?;
                tracing::debug!(%recipe_id, stars, "rating updated");
            }
            None => {
                self.client
                    .from("ratings")
                    .insert_only(&NewRating {
                        user_id,
                        recipe_id,
                        rating: stars,
                    })
                    .await?;
                tracing::debug!(%recipe_id, stars, "rating created");
            }
        }

        recipe_summary(&self.client, recipe_id).await
    }

    /// Current aggregate for a recipe.
    pub async fn summary(&self, recipe_id: Uuid) -> Result<RatingSummary, AppError> {
        recipe_summary(&self.client, recipe_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_mean_and_count() {
        let summary = RatingSummary::summarize(&[5, 4, 4]);
        assert_eq!(summary.count, 3);
        let average = summary.average.unwrap();
        assert!((average - 13.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_list_is_a_sentinel_not_zero() {
        let summary = RatingSummary::summarize(&[]);
        assert_eq!(summary.average, None);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.display(), "No rating");
    }

    #[test]
    fn test_display_rounds_to_one_decimal() {
        let summary = RatingSummary::summarize(&[4, 5]);
        assert_eq!(summary.display(), "4.5");
        assert_eq!(RatingSummary::summarize(&[1, 2, 2]).display(), "1.7");
    }
}
