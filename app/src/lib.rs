//! Page-orchestration services of the Plateshare application layer.
//!
//! Each module owns one page area and talks to the hosted platform
//! through an injected [`plateshare_core::PlateshareClient`]. Services
//! return typed view models; rendering is out of scope.

pub mod account;
pub mod categories;
pub mod comments;
pub mod error;
pub mod favorites;
pub mod images;
pub mod pagination;
pub mod profiles;
pub mod ratings;
pub mod recipes;
pub mod search;

pub use account::AccountService;
pub use categories::{category_by_slug, Category, CategoryCount, CategoryService, CUISINE_CATEGORIES};
pub use comments::{CommentService, CommentThread, CommentWithAuthor};
pub use error::AppError;
pub use favorites::{FavoriteService, FavoriteState, ToggleOutcome, ToggleResult};
pub use images::{ImageFile, ImageService, MAX_IMAGE_BYTES, MAX_RECIPE_IMAGES};
pub use pagination::{page_count, page_offset, Feed, PAGE_SIZE};
pub use profiles::{ProfileEdit, ProfileService, ProfileView};
pub use ratings::{RatingService, RatingSummary, RatingValue};
pub use recipes::{RecipeDetail, RecipeDraft, RecipeService, DEFAULT_IMAGE_URL};
pub use search::{
    Author, RecipeFilters, RecipeSummary, SearchPage, SearchService, CUISINE_OPTIONS,
    DIETARY_OPTIONS,
};
