//! Pure filter + sort over the catalog.
//!
//! `query` is a pure function from (catalog, criteria) to an ordered list of
//! references into the catalog. It never copies or fabricates products, has
//! no side effects, and is deterministic: every sort key is applied as a
//! single stable sort, so products that compare equal keep their catalog
//! order. The weak tie-break contracts for `newest` and `featured` are
//! intentional (the storefront never promised more), but "stable with
//! respect to input order" is pinned here and tested.

use super::{Badge, Category, Product};

/// Sort orderings offered by the shop filter bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Featured products first (the storefront default).
    #[default]
    Featured,
    /// Ascending price.
    PriceLow,
    /// Descending price.
    PriceHigh,
    /// Descending rating.
    Rating,
    /// NEW-badged products first.
    Newest,
}

impl SortKey {
    /// The filter-bar slug for this sort key.
    #[must_use]
    pub const fn as_slug(self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
            Self::Rating => "rating",
            Self::Newest => "newest",
        }
    }
}

impl std::str::FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "featured" => Ok(Self::Featured),
            "price-low" => Ok(Self::PriceLow),
            "price-high" => Ok(Self::PriceHigh),
            "rating" => Ok(Self::Rating),
            "newest" => Ok(Self::Newest),
            other => Err(UnknownSortKey(other.to_string())),
        }
    }
}

/// Error returned when parsing an unrecognized sort slug.
#[derive(Debug, thiserror::Error)]
#[error("unknown sort key: {0}")]
pub struct UnknownSortKey(pub String);

/// Filter criteria and ordering for a catalog query.
#[derive(Debug, Clone, Default)]
pub struct CatalogQuery {
    /// Restrict to one category; `None` means "all".
    pub category: Option<Category>,
    /// Case-insensitive substring match on the product name. Empty matches
    /// everything.
    pub search: String,
    /// Requested ordering.
    pub sort: SortKey,
}

impl CatalogQuery {
    /// Whether a product passes the filter portion of this query.
    fn matches(&self, product: &Product) -> bool {
        let category_ok = self.category.is_none_or(|c| product.category == c);
        let search_ok = self.search.is_empty()
            || product
                .name
                .to_lowercase()
                .contains(&self.search.to_lowercase());
        category_ok && search_ok
    }
}

/// Compute the visible, ordered subset of the catalog.
///
/// The result borrows from `products`; an empty result is a valid outcome
/// (the caller offers a reset-filters affordance), not an error.
#[must_use]
pub fn query<'a>(products: &'a [Product], criteria: &CatalogQuery) -> Vec<&'a Product> {
    let mut visible: Vec<&Product> = products.iter().filter(|p| criteria.matches(p)).collect();

    match criteria.sort {
        SortKey::Featured => visible.sort_by_key(|p| !p.featured),
        SortKey::PriceLow => visible.sort_by(|a, b| a.price.cmp(&b.price)),
        SortKey::PriceHigh => visible.sort_by(|a, b| b.price.cmp(&a.price)),
        SortKey::Rating => visible.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        SortKey::Newest => visible.sort_by_key(|p| p.badge != Some(Badge::New)),
    }

    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use corex_core::{Price, ProductId};

    fn product(id: &str, price_cents: i64, featured: bool, badge: Option<Badge>) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Price::usd_cents(price_cents),
            original_price: None,
            image: String::new(),
            description: String::new(),
            category: Category::Tees,
            rating: 4.0,
            reviews: 10,
            colors: vec!["Black".to_string()],
            sizes: vec!["M".to_string()],
            badge,
            featured,
        }
    }

    fn ids(result: &[&Product]) -> Vec<String> {
        result.iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn test_filter_by_category() {
        let catalog = Catalog::corex();
        let criteria = CatalogQuery {
            category: Some(Category::Tees),
            ..CatalogQuery::default()
        };

        let result = query(catalog.products(), &criteria);
        assert!(result.iter().all(|p| p.category == Category::Tees));
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let catalog = Catalog::corex();
        let criteria = CatalogQuery {
            search: "FLEX".to_string(),
            ..CatalogQuery::default()
        };

        let result = query(catalog.products(), &criteria);
        assert_eq!(ids(&result), vec!["xb-003"]);
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let catalog = Catalog::corex();
        let criteria = CatalogQuery {
            search: "trampoline".to_string(),
            ..CatalogQuery::default()
        };

        assert!(query(catalog.products(), &criteria).is_empty());
    }

    #[test]
    fn test_output_is_permutation_of_filtered_subset() {
        let catalog = Catalog::corex();
        for sort in [
            SortKey::Featured,
            SortKey::PriceLow,
            SortKey::PriceHigh,
            SortKey::Rating,
            SortKey::Newest,
        ] {
            let criteria = CatalogQuery {
                sort,
                ..CatalogQuery::default()
            };
            let result = query(catalog.products(), &criteria);
            assert_eq!(result.len(), catalog.products().len());

            let mut seen = ids(&result);
            seen.sort();
            let mut expected: Vec<String> =
                catalog.products().iter().map(|p| p.id.to_string()).collect();
            expected.sort();
            assert_eq!(seen, expected, "sort {sort:?} dropped or duplicated items");
        }
    }

    #[test]
    fn test_price_sorts_are_mutual_reverses() {
        // The Core X catalog has no price ties, so the orders must be exact
        // reverses of each other.
        let catalog = Catalog::corex();
        let low = query(
            catalog.products(),
            &CatalogQuery {
                sort: SortKey::PriceLow,
                ..CatalogQuery::default()
            },
        );
        let mut high = query(
            catalog.products(),
            &CatalogQuery {
                sort: SortKey::PriceHigh,
                ..CatalogQuery::default()
            },
        );

        high.reverse();
        assert_eq!(ids(&low), ids(&high));
    }

    #[test]
    fn test_idempotent_including_tie_break() {
        let products = vec![
            product("a", 4000, false, None),
            product("b", 4000, false, None),
            product("c", 4000, true, None),
        ];
        let criteria = CatalogQuery {
            sort: SortKey::PriceLow,
            ..CatalogQuery::default()
        };

        let first = ids(&query(&products, &criteria));
        let second = ids(&query(&products, &criteria));
        assert_eq!(first, second);
        // Stable sort: equal prices keep input order.
        assert_eq!(first, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_featured_ties_keep_input_order() {
        let products = vec![
            product("a", 1000, false, None),
            product("b", 2000, true, None),
            product("c", 3000, false, None),
            product("d", 4000, true, None),
        ];

        let result = query(&products, &CatalogQuery::default());
        assert_eq!(ids(&result), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_two_tees_order_under_each_sort() {
        // A: tees, 45.00, featured, no badge. B: tees, 38.00, NEW.
        let a = product("a", 4500, true, None);
        let b = product("b", 3800, false, Some(Badge::New));
        let products = vec![a, b];
        let base = CatalogQuery {
            category: Some(Category::Tees),
            ..CatalogQuery::default()
        };

        let featured = query(
            &products,
            &CatalogQuery {
                sort: SortKey::Featured,
                ..base.clone()
            },
        );
        assert_eq!(ids(&featured), vec!["a", "b"]);

        let price_low = query(
            &products,
            &CatalogQuery {
                sort: SortKey::PriceLow,
                ..base.clone()
            },
        );
        assert_eq!(ids(&price_low), vec!["b", "a"]);

        let newest = query(
            &products,
            &CatalogQuery {
                sort: SortKey::Newest,
                ..base
            },
        );
        assert_eq!(ids(&newest), vec!["b", "a"]);
    }

    #[test]
    fn test_rating_sort_descending() {
        let catalog = Catalog::corex();
        let result = query(
            catalog.products(),
            &CatalogQuery {
                sort: SortKey::Rating,
                ..CatalogQuery::default()
            },
        );

        for pair in result.windows(2) {
            assert!(pair[0].rating >= pair[1].rating);
        }
    }

    #[test]
    fn test_sort_key_slug_roundtrip() {
        for key in [
            SortKey::Featured,
            SortKey::PriceLow,
            SortKey::PriceHigh,
            SortKey::Rating,
            SortKey::Newest,
        ] {
            let parsed: SortKey = key.as_slug().parse().expect("parse slug");
            assert_eq!(parsed, key);
        }

        assert!("alphabetical".parse::<SortKey>().is_err());
    }
}
