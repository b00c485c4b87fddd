//! The Core X product catalog.
//!
//! The catalog is the ground truth for the query engine: a fixed, read-only
//! list of products created once at startup and never mutated. Everything
//! downstream (query results, cart lines, the assistant's product list)
//! works from references or snapshots of this data.

use corex_core::{Price, ProductId};
use serde::{Deserialize, Serialize};

pub mod query;

pub use query::{CatalogQuery, SortKey, query};

/// Promotional badge shown on a product card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Badge {
    Sale,
    New,
}

/// Closed set of catalog categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Tees,
    Compression,
    SportsBras,
    Joggers,
    Hoodies,
    Tanks,
}

impl Category {
    /// The URL/filter slug for this category.
    #[must_use]
    pub const fn as_slug(self) -> &'static str {
        match self {
            Self::Tees => "tees",
            Self::Compression => "compression",
            Self::SportsBras => "sports-bras",
            Self::Joggers => "joggers",
            Self::Hoodies => "hoodies",
            Self::Tanks => "tanks",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_slug())
    }
}

impl std::str::FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tees" => Ok(Self::Tees),
            "compression" => Ok(Self::Compression),
            "sports-bras" => Ok(Self::SportsBras),
            "joggers" => Ok(Self::Joggers),
            "hoodies" => Ok(Self::Hoodies),
            "tanks" => Ok(Self::Tanks),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

/// Error returned when parsing an unrecognized category slug.
#[derive(Debug, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

/// An immutable catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique catalog identifier (e.g., `xt-001`).
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Current selling price.
    pub price: Price,
    /// Pre-discount price, when the product is marked down.
    pub original_price: Option<Price>,
    /// Primary image URL.
    pub image: String,
    /// Short marketing description.
    pub description: String,
    /// Category this product belongs to.
    pub category: Category,
    /// Average review rating, 0 to 5.
    pub rating: f64,
    /// Number of reviews behind the rating.
    pub reviews: u32,
    /// Available colors, in display order. Never empty.
    pub colors: Vec<String>,
    /// Available sizes, in display order.
    pub sizes: Vec<String>,
    /// Promotional badge, if any.
    pub badge: Option<Badge>,
    /// Whether the product is featured (default sort puts these first).
    pub featured: bool,
}

/// The fixed set of purchasable products known to the client.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Create a catalog from an explicit product list.
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// All products, in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Read-only snapshot of the current product names.
    ///
    /// This is the catalog-name export consumed by the chat session manager
    /// when it builds the assistant's system directive. Passing the snapshot
    /// explicitly keeps the chat subsystem free of ambient catalog state.
    #[must_use]
    pub fn product_names(&self) -> Vec<String> {
        self.products.iter().map(|p| p.name.clone()).collect()
    }

    /// The Core X athletic-wear line-up.
    #[must_use]
    pub fn corex() -> Self {
        let products = vec![
            Product {
                id: ProductId::new("xt-001"),
                name: "X-Perform Training Tee".to_string(),
                price: Price::usd_cents(4500),
                original_price: Some(Price::usd_cents(6000)),
                image: "https://images.unsplash.com/photo-1581655353564-df123a1eb820".to_string(),
                description: "Premium performance tee engineered for maximum comfort and \
                              durability during intense training sessions."
                    .to_string(),
                category: Category::Tees,
                rating: 4.8,
                reviews: 124,
                colors: owned(&["Black", "White", "Navy", "Red"]),
                sizes: owned(&["XS", "S", "M", "L", "XL", "XXL"]),
                badge: Some(Badge::Sale),
                featured: true,
            },
            Product {
                id: ProductId::new("cs-002"),
                name: "Core Compression Shorts".to_string(),
                price: Price::usd_cents(3800),
                original_price: None,
                image: "https://images.unsplash.com/photo-1506902540976-5005d40e1e9e".to_string(),
                description: "High-performance compression shorts designed for optimal muscle \
                              support and recovery."
                    .to_string(),
                category: Category::Compression,
                rating: 4.9,
                reviews: 89,
                colors: owned(&["Black", "Charcoal", "Navy"]),
                sizes: owned(&["XS", "S", "M", "L", "XL"]),
                badge: None,
                featured: true,
            },
            Product {
                id: ProductId::new("xb-003"),
                name: "X-Flex Sports Bra".to_string(),
                price: Price::usd_cents(4200),
                original_price: None,
                image: "https://images.unsplash.com/photo-1568252542512-9fe8fe9c87bb".to_string(),
                description: "Medium to high support sports bra with innovative moisture \
                              management technology."
                    .to_string(),
                category: Category::SportsBras,
                rating: 4.7,
                reviews: 156,
                colors: owned(&["Black", "White", "Pink", "Purple"]),
                sizes: owned(&["XS", "S", "M", "L", "XL"]),
                badge: Some(Badge::New),
                featured: false,
            },
            Product {
                id: ProductId::new("xj-004"),
                name: "X-Run Performance Joggers".to_string(),
                price: Price::usd_cents(6500),
                original_price: None,
                image: "https://images.unsplash.com/photo-1556821840-3a63f95609a7".to_string(),
                description: "Premium joggers designed for runners who demand comfort, \
                              flexibility, and style."
                    .to_string(),
                category: Category::Joggers,
                rating: 4.6,
                reviews: 92,
                colors: owned(&["Black", "Navy", "Charcoal", "Olive"]),
                sizes: owned(&["XS", "S", "M", "L", "XL", "XXL"]),
                badge: None,
                featured: false,
            },
            Product {
                id: ProductId::new("xh-005"),
                name: "X-Core Training Hoodie".to_string(),
                price: Price::usd_cents(7500),
                original_price: Some(Price::usd_cents(9500)),
                image: "https://images.unsplash.com/photo-1556821840-3a63f95609a7".to_string(),
                description: "Versatile training hoodie perfect for pre-workout warmups and \
                              post-training recovery."
                    .to_string(),
                category: Category::Hoodies,
                rating: 4.8,
                reviews: 67,
                colors: owned(&["Black", "Gray", "Navy"]),
                sizes: owned(&["S", "M", "L", "XL", "XXL"]),
                badge: Some(Badge::Sale),
                featured: false,
            },
            Product {
                id: ProductId::new("xt-006"),
                name: "X-Tank Performance Top".to_string(),
                price: Price::usd_cents(3500),
                original_price: None,
                image: "https://images.unsplash.com/photo-1571019613454-1cb2f99b2d8b".to_string(),
                description: "Lightweight performance tank designed for high-intensity training \
                              and summer workouts."
                    .to_string(),
                category: Category::Tanks,
                rating: 4.5,
                reviews: 143,
                colors: owned(&["Black", "White", "Blue", "Green"]),
                sizes: owned(&["XS", "S", "M", "L", "XL"]),
                badge: None,
                featured: false,
            },
        ];

        Self::new(products)
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}
