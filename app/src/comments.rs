//! Recipe comments: single-level threaded listing and posting.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use plateshare_core::{NewComment, PlateshareClient};

use crate::error::AppError;
use crate::search::Author;

const COMMENT_SELECT: &str =
    "id,user_id,content,parent_comment_id,created_at,users!inner(username,avatar_url)";

/// One comment with its author embedded.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentWithAuthor {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub parent_comment_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "users")]
    pub author: Author,
}

/// A top-level comment with its replies. The data shape would allow
/// deeper nesting; the view renders one level.
#[derive(Debug, Clone)]
pub struct CommentThread {
    pub comment: CommentWithAuthor,
    pub replies: Vec<CommentWithAuthor>,
}

/// List a recipe's comment threads: top-level comments newest first,
/// each with its replies oldest first.
pub async fn threads(
    client: &PlateshareClient,
    recipe_id: Uuid,
) -> Result<Vec<CommentThread>, AppError> {
    let top_level = client
        .from("comments")
        .select(COMMENT_SELECT)
        .eq("recipe_id", recipe_id)
        .is_null("parent_comment_id")
        .order_desc("created_at")
        .fetch::<CommentWithAuthor>()
        .await?;

    let mut result = Vec::with_capacity(top_level.rows.len());
    for comment in top_level.rows {
        let replies = client
            .from("comments")
            .select(COMMENT_SELECT)
            .eq("parent_comment_id", comment.id)
            .order_asc("created_at")
            .fetch::<CommentWithAuthor>()
            .await?;
        result.push(CommentThread {
            comment,
            replies: replies.rows,
        });
    }
    Ok(result)
}

/// Comment listing and posting.
pub struct CommentService {
    client: Arc<PlateshareClient>,
}

impl CommentService {
    pub fn new(client: Arc<PlateshareClient>) -> Self {
        Self { client }
    }

    pub async fn list(&self, recipe_id: Uuid) -> Result<Vec<CommentThread>, AppError> {
        threads(&self.client, recipe_id).await
    }

    /// Post a comment (or a reply, when `parent` is set) and return it
    /// with the author embedded for immediate display.
    pub async fn post(
        &self,
        recipe_id: Uuid,
        content: &str,
        parent: Option<Uuid>,
    ) -> Result<CommentWithAuthor, AppError> {
        let session = self
            .client
            .current_session()
            .ok_or(AppError::SignInRequired)?;
        let content = content.trim();
        if content.is_empty() {
            return Err(AppError::validation("A comment cannot be empty"));
        }

        let created: CommentWithAuthor = self
            .client
            .from("comments")
            .select(COMMENT_SELECT)
            .insert(&NewComment {
                user_id: session.user.id,
                recipe_id,
                content: content.to_string(),
                parent_comment_id: parent,
            })
            .await?;
        tracing::debug!(%recipe_id, comment_id = %created.id, "comment posted");
        Ok(created)
    }
}
