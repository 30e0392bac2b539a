//! Rate-submit flow: upsert semantics and the synchronous re-summarize.

mod common;

use serde_json::json;
use uuid::Uuid;

use plateshare_core::{Method, MockResponse};
use plateshare_app::ratings::RatingService;
use plateshare_app::AppError;

#[tokio::test]
async fn unauthenticated_rating_makes_no_network_call() {
    let (client, mock) = common::client();
    let service = RatingService::new(client);

    let err = service
        .rate(common::RECIPE_ID.parse().unwrap(), 4)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::SignInRequired));
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn out_of_range_stars_are_rejected_locally() {
    let (client, mock) = common::client();
    common::sign_in(&client, &mock).await;
    let requests_after_sign_in = mock.request_count();

    let service = RatingService::new(client);
    for stars in [0, 6, -1] {
        let err = service
            .rate(common::RECIPE_ID.parse().unwrap(), stars)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
    assert_eq!(mock.request_count(), requests_after_sign_in);
}

#[tokio::test]
async fn first_rating_inserts_then_rerating_updates() {
    let (client, mock) = common::client();
    common::sign_in(&client, &mock).await;
    let recipe_id: Uuid = common::RECIPE_ID.parse().unwrap();
    let rating_row_id = "44444444-4444-4444-4444-444444444444";

    // GET /rest/v1/ratings responses in call order: existence check
    // (none), refetch after insert, existence check (found), refetch
    // after update.
    mock.push_response(Method::Get, "/rest/v1/ratings", MockResponse::json(json!([])));
    mock.push_response(
        Method::Get,
        "/rest/v1/ratings",
        MockResponse::json(json!([{ "rating": 4 }])),
    );
    mock.push_response(
        Method::Get,
        "/rest/v1/ratings",
        MockResponse::json(json!([{ "id": rating_row_id }])),
    );
    mock.push_response(
        Method::Get,
        "/rest/v1/ratings",
        MockResponse::json(json!([{ "rating": 2 }])),
    );
    mock.push_response(Method::Post, "/rest/v1/ratings", MockResponse::no_content());
    mock.push_response(Method::Patch, "/rest/v1/ratings", MockResponse::no_content());

    let service = RatingService::new(client);

    // First-time rater: average becomes 4.0, count 1.
    let summary = service.rate(recipe_id, 4).await.unwrap();
    assert_eq!(summary.average, Some(4.0));
    assert_eq!(summary.count, 1);

    // Same user re-rates: update, not insert; count stays 1.
    let summary = service.rate(recipe_id, 2).await.unwrap();
    assert_eq!(summary.average, Some(2.0));
    assert_eq!(summary.count, 1);

    let requests = mock.requests();
    let posts = requests
        .iter()
        .filter(|r| r.method == Method::Post && r.path == "/rest/v1/ratings")
        .count();
    assert_eq!(posts, 1, "re-rating must not insert a second row");

    let patch = requests
        .iter()
        .find(|r| r.method == Method::Patch)
        .expect("re-rating issues an update");
    assert_eq!(
        patch.query_param("id"),
        Some(format!("eq.{}", rating_row_id).as_str())
    );
}

#[tokio::test]
async fn insert_failure_surfaces_the_platform_message() {
    let (client, mock) = common::client();
    common::sign_in(&client, &mock).await;

    mock.push_response(Method::Get, "/rest/v1/ratings", MockResponse::json(json!([])));
    mock.push_response(
        Method::Post,
        "/rest/v1/ratings",
        MockResponse::error(403, "row-level security violation"),
    );

    let err = RatingService::new(client)
        .rate(common::RECIPE_ID.parse().unwrap(), 5)
        .await
        .unwrap_err();
    match err {
        AppError::Platform(platform) => {
            assert!(platform.to_string().contains("row-level security violation"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}
