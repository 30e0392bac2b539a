//! Shared fixtures: a client over the mock transport, a canned
//! sign-in, and recipe row JSON in the platform's wire shape.

#![allow(dead_code)]

use std::sync::Arc;

use serde_json::{json, Value};

use plateshare_core::{Method, MockResponse, MockTransport, PlateshareClient};

pub const USER_ID: &str = "11111111-1111-1111-1111-111111111111";
pub const RECIPE_ID: &str = "22222222-2222-2222-2222-222222222222";

pub fn client() -> (Arc<PlateshareClient>, Arc<MockTransport>) {
    let mock = Arc::new(MockTransport::new());
    let client = Arc::new(PlateshareClient::with_transport(
        mock.clone(),
        "https://platform.test",
        "anon-key",
    ));
    (client, mock)
}

/// Sign in through a canned token response so subsequent requests carry
/// a session.
pub async fn sign_in(client: &PlateshareClient, mock: &MockTransport) {
    mock.push_response(
        Method::Post,
        "/auth/v1/token",
        MockResponse::json(json!({
            "access_token": "jwt-token",
            "refresh_token": "refresh-token",
            "user": { "id": USER_ID, "email": "cook@example.com" }
        })),
    );
    client
        .auth()
        .sign_in("cook@example.com", "hunter22")
        .await
        .expect("test sign-in");
}

/// A recipe card row as returned by the card projection.
pub fn recipe_card(id: &str, title: &str, ratings: &[i32]) -> Value {
    let ratings: Vec<Value> = ratings.iter().map(|r| json!({ "rating": r })).collect();
    json!({
        "id": id,
        "title": title,
        "description": "A test recipe",
        "image_urls": ["https://cdn.test/pic.jpg"],
        "prep_time_minutes": 15,
        "cook_time_minutes": 30,
        "servings": 4,
        "difficulty": "easy",
        "cuisine_type": "Italian",
        "dietary_tags": ["Vegetarian"],
        "created_at": "2024-03-01T12:00:00Z",
        "users": { "username": "cook", "avatar_url": null },
        "ratings": ratings
    })
}

/// A full recipe row, optionally with the author embed for the detail
/// projection.
pub fn recipe_row(id: &str, with_author: bool) -> Value {
    let mut row = json!({
        "id": id,
        "user_id": USER_ID,
        "title": "Pad Thai",
        "description": "Street-food classic",
        "ingredients": [
            { "name": "Rice noodles", "amount": "200", "unit": "g" }
        ],
        "instructions": [
            { "step": 1, "instruction": "Soak the noodles" },
            { "step": 2, "instruction": "Stir-fry everything" }
        ],
        "prep_time_minutes": 20,
        "cook_time_minutes": 10,
        "servings": 2,
        "difficulty": "medium",
        "cuisine_type": "Thai",
        "dietary_tags": [],
        "image_urls": ["https://cdn.test/padthai.jpg"],
        "is_public": true,
        "created_at": "2024-03-01T12:00:00Z",
        "updated_at": "2024-03-01T12:00:00Z"
    });
    if with_author {
        row["users"] = json!({ "username": "cook", "avatar_url": null });
    }
    row
}

pub fn user_row(id: &str, username: &str) -> Value {
    json!({
        "id": id,
        "username": username,
        "full_name": "Test Cook",
        "avatar_url": null,
        "bio": "I cook",
        "cooking_level": "intermediate",
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z"
    })
}
