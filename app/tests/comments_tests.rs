//! Comment threads: single-level listing and posting.

mod common;

use serde_json::json;

use plateshare_core::{Method, MockResponse};
use plateshare_app::comments::CommentService;
use plateshare_app::AppError;

fn comment(id: &str, content: &str, parent: Option<&str>) -> serde_json::Value {
    json!({
        "id": id,
        "user_id": common::USER_ID,
        "content": content,
        "parent_comment_id": parent,
        "created_at": "2024-03-02T08:00:00Z",
        "users": { "username": "cook", "avatar_url": null }
    })
}

#[tokio::test]
async fn listing_nests_replies_under_their_parent() {
    let (client, mock) = common::client();
    let parent_id = "66666666-6666-6666-6666-666666666666";
    mock.push_response(
        Method::Get,
        "/rest/v1/comments",
        MockResponse::json(json!([comment(parent_id, "Lovely recipe", None)])),
    );
    mock.push_response(
        Method::Get,
        "/rest/v1/comments",
        MockResponse::json(json!([comment(
            "77777777-7777-7777-7777-777777777777",
            "Agreed!",
            Some(parent_id)
        )])),
    );

    let threads = CommentService::new(client)
        .list(common::RECIPE_ID.parse().unwrap())
        .await
        .unwrap();
    assert_eq!(threads.len(), 1);
    assert_eq!(threads[0].comment.content, "Lovely recipe");
    assert_eq!(threads[0].replies.len(), 1);
    assert_eq!(threads[0].replies[0].content, "Agreed!");

    let requests = mock.requests();
    // Top-level comments newest first, replies oldest first.
    assert_eq!(requests[0].query_param("parent_comment_id"), Some("is.null"));
    assert_eq!(requests[0].query_param("order"), Some("created_at.desc"));
    assert_eq!(
        requests[1].query_param("parent_comment_id"),
        Some(format!("eq.{}", parent_id).as_str())
    );
    assert_eq!(requests[1].query_param("order"), Some("created_at.asc"));
}

#[tokio::test]
async fn posting_requires_a_session() {
    let (client, mock) = common::client();
    let err = CommentService::new(client)
        .post(common::RECIPE_ID.parse().unwrap(), "Nice!", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::SignInRequired));
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn blank_comments_are_rejected_locally() {
    let (client, mock) = common::client();
    common::sign_in(&client, &mock).await;
    let requests_after_sign_in = mock.request_count();

    let err = CommentService::new(client)
        .post(common::RECIPE_ID.parse().unwrap(), "   ", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(mock.request_count(), requests_after_sign_in);
}

#[tokio::test]
async fn posting_returns_the_comment_with_author() {
    let (client, mock) = common::client();
    common::sign_in(&client, &mock).await;
    let comment_id = "88888888-8888-8888-8888-888888888888";
    mock.push_response(
        Method::Post,
        "/rest/v1/comments",
        MockResponse::json(json!([comment(comment_id, "Nice!", None)])),
    );

    let created = CommentService::new(client)
        .post(common::RECIPE_ID.parse().unwrap(), "  Nice!  ", None)
        .await
        .unwrap();
    assert_eq!(created.content, "Nice!");
    assert_eq!(created.author.username, "cook");

    let request = mock
        .requests()
        .into_iter()
        .find(|r| r.method == Method::Post && r.path == "/rest/v1/comments")
        .unwrap();
    let plateshare_core::RequestBody::Json(body) = request.body else {
        panic!("expected a JSON body");
    };
    assert_eq!(body["content"], json!("Nice!"));
    assert!(body.get("parent_comment_id").is_none());
}
