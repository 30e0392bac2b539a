//! Cuisine categories: the hand-maintained listing, per-category
//! counts, and the category feed.

use std::sync::Arc;

use plateshare_core::PlateshareClient;

use crate::error::AppError;
use crate::pagination::{page_offset, Feed, PAGE_SIZE};
use crate::search::{RecipeCardRow, RecipeSummary, RECIPE_CARD_SELECT};

/// One cuisine category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub name: &'static str,
    pub slug: &'static str,
    pub description: &'static str,
    pub image_url: &'static str,
}

/// The categories listing, in display order.
pub const CUISINE_CATEGORIES: &[Category] = &[
    Category {
        name: "Italian",
        slug: "italian",
        description: "Classic pasta, pizza, and Mediterranean flavors",
        image_url: "https://images.unsplash.com/photo-1565299624946-b28f40a0ca4b?w=500&q=80",
    },
    Category {
        name: "Mexican",
        slug: "mexican",
        description: "Spicy and vibrant dishes with bold flavors",
        image_url: "https://images.unsplash.com/photo-1565299585323-38174c4a6c56?w=500&q=80",
    },
    Category {
        name: "Asian",
        slug: "asian",
        description: "Fresh ingredients and aromatic spices from Asia",
        image_url: "https://images.unsplash.com/photo-1563379091339-03246963d396?w=500&q=80",
    },
    Category {
        name: "American",
        slug: "american",
        description: "Comfort food classics and BBQ favorites",
        image_url: "https://images.unsplash.com/photo-1571091718767-18b5b1457add?w=500&q=80",
    },
    Category {
        name: "Mediterranean",
        slug: "mediterranean",
        description: "Healthy and flavorful dishes from the Mediterranean",
        image_url: "https://images.unsplash.com/photo-1544982503-9f984c14501a?w=500&q=80",
    },
    Category {
        name: "Indian",
        slug: "indian",
        description: "Rich curries and aromatic spices",
        image_url: "https://images.unsplash.com/photo-1565557623262-b51c2513a641?w=500&q=80",
    },
    Category {
        name: "French",
        slug: "french",
        description: "Elegant cuisine with refined techniques",
        image_url: "https://images.unsplash.com/photo-1555939594-58d7cb561ad1?w=500&q=80",
    },
    Category {
        name: "Chinese",
        slug: "chinese",
        description: "Traditional stir-fries, dumplings, and noodles",
        image_url: "https://images.unsplash.com/photo-1526318896980-cf78c088247c?w=500&q=80",
    },
    Category {
        name: "Thai",
        slug: "thai",
        description: "Sweet, sour, and spicy flavors in perfect balance",
        image_url: "https://images.unsplash.com/photo-1559314809-0f31657def5e?w=500&q=80",
    },
    Category {
        name: "Japanese",
        slug: "japanese",
        description: "Fresh sushi, ramen, and umami-rich dishes",
        image_url: "https://images.unsplash.com/photo-1579584425555-c3ce17fd4351?w=500&q=80",
    },
    Category {
        name: "Greek",
        slug: "greek",
        description: "Mediterranean classics with olive oil and herbs",
        image_url: "https://images.unsplash.com/photo-1551782450-17144efb9c50?w=500&q=80",
    },
    Category {
        name: "Spanish",
        slug: "spanish",
        description: "Paella, tapas, and flavorful regional dishes",
        image_url: "https://images.unsplash.com/photo-1534080564583-6be75777b70a?w=500&q=80",
    },
];

/// Look up a category by its URL slug.
pub fn category_by_slug(slug: &str) -> Option<&'static Category> {
    CUISINE_CATEGORIES.iter().find(|c| c.slug == slug)
}

/// A category with its public recipe count for the listing page.
#[derive(Debug, Clone, Copy)]
pub struct CategoryCount {
    pub category: &'static Category,
    pub recipe_count: u64,
}

/// Category listing and per-category feeds.
pub struct CategoryService {
    client: Arc<PlateshareClient>,
}

impl CategoryService {
    pub fn new(client: Arc<PlateshareClient>) -> Self {
        Self { client }
    }

    /// Count public recipes per category, one count request each. A
    /// failed category degrades to zero instead of failing the listing;
    /// the other categories keep their counts.
    pub async fn counts(&self) -> Vec<CategoryCount> {
        let mut counts = Vec::with_capacity(CUISINE_CATEGORIES.len());
        for category in CUISINE_CATEGORIES {
            let recipe_count = match self.count_category(category).await {
                Ok(count) => count,
                Err(err) => {
                    tracing::warn!(
                        category = category.name,
                        error = %err,
                        "category count failed, showing zero"
                    );
                    0
                }
            };
            counts.push(CategoryCount {
                category,
                recipe_count,
            });
        }
        counts
    }

    async fn count_category(&self, category: &Category) -> Result<u64, AppError> {
        let count = self
            .client
            .from("recipes")
            .eq("is_public", true)
            .ilike("cuisine_type", &format!("%{}%", category.name))
            .count()
            .await?;
        Ok(count)
    }

    /// Load the feed's next page of a category's recipes into `feed`:
    /// page 1 replaces the list, later pages append.
    pub async fn load_more(
        &self,
        category: &Category,
        feed: &mut Feed<RecipeSummary>,
    ) -> Result<(), AppError> {
        let page = feed.next_page();
        let result = self
            .client
            .from("recipes")
            .select(RECIPE_CARD_SELECT)
            .eq("is_public", true)
            .ilike("cuisine_type", &format!("%{}%", category.name))
            .order_desc("created_at")
            .range(page_offset(page), PAGE_SIZE)
            .count_exact()
            .fetch::<RecipeCardRow>()
            .await?;

        let total = result.total.unwrap_or(result.rows.len() as u64);
        let items: Vec<RecipeSummary> = result
            .rows
            .into_iter()
            .map(RecipeCardRow::into_summary)
            .collect();
        if page <= 1 {
            feed.replace(items, total);
        } else {
            feed.append(items, total);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_by_slug() {
        assert_eq!(category_by_slug("thai").unwrap().name, "Thai");
        assert!(category_by_slug("martian").is_none());
    }
}
