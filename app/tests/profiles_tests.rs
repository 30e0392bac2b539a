//! Profile page assembly and profile editing.

mod common;

use serde_json::json;

use plateshare_core::{CookingLevel, Method, MockResponse, RequestBody};
use plateshare_app::profiles::{ProfileEdit, ProfileService};
use plateshare_app::AppError;

#[tokio::test]
async fn profile_assembles_counts_and_public_recipes() {
    let (client, mock) = common::client();
    mock.push_response(
        Method::Get,
        "/rest/v1/users",
        MockResponse::json(json!([common::user_row(common::USER_ID, "cook")])),
    );
    mock.push_response(Method::Head, "/rest/v1/recipes", MockResponse::count(4));
    // Follower count, then following count.
    mock.push_response(Method::Head, "/rest/v1/follows", MockResponse::count(10));
    mock.push_response(Method::Head, "/rest/v1/follows", MockResponse::count(3));
    mock.push_response(
        Method::Get,
        "/rest/v1/recipes",
        MockResponse::json(json!([common::recipe_card(common::RECIPE_ID, "Pad Thai", &[4])])),
    );

    let view = ProfileService::new(client).by_username("cook").await.unwrap();
    assert_eq!(view.user.username, "cook");
    assert_eq!(view.recipe_count, 4);
    assert_eq!(view.follower_count, 10);
    assert_eq!(view.following_count, 3);
    assert_eq!(view.recipes.len(), 1);

    let requests = mock.requests();
    assert_eq!(requests[0].query_param("username"), Some("eq.cook"));
    assert_eq!(
        requests[2].query_param("following_id"),
        Some(format!("eq.{}", common::USER_ID).as_str())
    );
    assert_eq!(
        requests[3].query_param("follower_id"),
        Some(format!("eq.{}", common::USER_ID).as_str())
    );
}

#[tokio::test]
async fn unknown_username_is_not_found() {
    let (client, mock) = common::client();
    mock.push_response(Method::Get, "/rest/v1/users", MockResponse::json(json!([])));

    let err = ProfileService::new(client)
        .by_username("nobody")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    assert_eq!(mock.request_count(), 1, "counts are never attempted");
}

#[tokio::test]
async fn failed_count_degrades_to_zero() {
    let (client, mock) = common::client();
    mock.push_response(
        Method::Get,
        "/rest/v1/users",
        MockResponse::json(json!([common::user_row(common::USER_ID, "cook")])),
    );
    mock.push_response(Method::Head, "/rest/v1/recipes", MockResponse::count(4));
    mock.push_response(
        Method::Head,
        "/rest/v1/follows",
        MockResponse::error(500, "upstream timeout"),
    );
    mock.push_response(Method::Get, "/rest/v1/recipes", MockResponse::json(json!([])));

    let view = ProfileService::new(client).by_username("cook").await.unwrap();
    assert_eq!(view.recipe_count, 4);
    assert_eq!(view.follower_count, 0);
    assert_eq!(view.following_count, 0);
}

#[tokio::test]
async fn editing_updates_only_the_own_row_and_never_the_username() {
    let (client, mock) = common::client();
    common::sign_in(&client, &mock).await;
    mock.push_response(Method::Patch, "/rest/v1/users", MockResponse::no_content());

    ProfileService::new(client)
        .update_own(ProfileEdit {
            full_name: Some("Test Cook".to_string()),
            bio: Some("  I cook  ".to_string()),
            cooking_level: CookingLevel::Advanced,
            avatar_url: None,
        })
        .await
        .unwrap();

    let request = mock
        .requests()
        .into_iter()
        .find(|r| r.method == Method::Patch)
        .unwrap();
    assert_eq!(
        request.query_param("id"),
        Some(format!("eq.{}", common::USER_ID).as_str())
    );
    let RequestBody::Json(body) = request.body else {
        panic!("expected a JSON body");
    };
    assert_eq!(body["bio"], json!("I cook"));
    assert_eq!(body["cooking_level"], json!("advanced"));
    assert!(body.get("username").is_none());
}

#[tokio::test]
async fn editing_requires_a_session() {
    let (client, mock) = common::client();
    let err = ProfileService::new(client)
        .update_own(ProfileEdit {
            full_name: None,
            bio: None,
            cooking_level: CookingLevel::Beginner,
            avatar_url: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::SignInRequired));
    assert_eq!(mock.request_count(), 0);
}
