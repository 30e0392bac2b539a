//! Typed client of the Plateshare hosted platform: REST tables, auth,
//! and object storage behind one injectable handle.

pub mod auth;
pub mod client;
pub mod error;
pub mod rest;
pub mod schema;
pub mod session;
pub mod storage;
pub mod transport;

pub use auth::AuthApi;
pub use client::{ClientBuilder, PlateshareClient};
pub use error::ApiError;
pub use rest::{Page, QueryBuilder};
pub use schema::{
    CommentRow, CookingLevel, Difficulty, FollowRow, Ingredient, InstructionStep, NewComment,
    NewRating, NewRecipe, NewRecipeLike, ProfilePatch, RatingRow, RecipeLikeRow, RecipeRow,
    UserRow,
};
pub use session::{AuthUser, Session, SessionStore};
pub use storage::StorageApi;
pub use transport::{
    HttpTransport, Method, MockResponse, MockTransport, RequestBody, RestRequest, RestResponse,
    RestTransport,
};
