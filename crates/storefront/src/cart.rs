//! Shopping cart service.
//!
//! The cart is an ordered, append-only list of selected-item records. Lines
//! have no identity beyond insertion order and are never merged: adding the
//! same product twice produces two lines, matching how the shop section has
//! always behaved. What *is* new relative to the old storefront is input
//! validation - a size or color that the product does not offer is rejected
//! instead of silently accepted.

use corex_core::{Price, ProductId};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::Product;

/// Errors that can occur when mutating the cart.
#[derive(Debug, thiserror::Error)]
pub enum CartError {
    /// The requested size is not offered for this product.
    #[error("size {size:?} is not available for {product}")]
    InvalidSize {
        /// Product display name.
        product: String,
        /// The rejected size.
        size: String,
    },

    /// The requested color is not offered for this product.
    #[error("color {color:?} is not available for {product}")]
    InvalidColor {
        /// Product display name.
        product: String,
        /// The rejected color.
        color: String,
    },
}

/// A single cart entry: one product in one chosen size and color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Catalog id of the product.
    pub product_id: ProductId,
    /// Product display name at the time of adding.
    pub name: String,
    /// Price at the time of adding.
    pub price: Price,
    /// Product image URL.
    pub image: String,
    /// Chosen size.
    pub size: String,
    /// Chosen color.
    pub color: String,
}

/// External collaborator informed of cart size changes (e.g., the header
/// badge).
pub trait CartDisplay {
    /// Called after every successful add with the new total line count.
    fn cart_count_changed(&self, count: usize);
}

/// Accumulates selected-item records for the current session.
pub struct CartService {
    lines: Vec<CartLine>,
    display: Option<Box<dyn CartDisplay>>,
}

impl CartService {
    /// Create an empty cart with no display collaborator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lines: Vec::new(),
            display: None,
        }
    }

    /// Create an empty cart that notifies `display` of count changes.
    #[must_use]
    pub fn with_display(display: Box<dyn CartDisplay>) -> Self {
        Self {
            lines: Vec::new(),
            display: Some(display),
        }
    }

    /// Add a line for `product` in the chosen size and color.
    ///
    /// Appends to the line list (duplicates allowed) and notifies the
    /// display collaborator of the new total.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidSize`] or [`CartError::InvalidColor`]
    /// when the choice is not offered by the product.
    pub fn add_line(
        &mut self,
        product: &Product,
        size: &str,
        color: &str,
    ) -> Result<CartLine, CartError> {
        if !product.sizes.iter().any(|s| s == size) {
            return Err(CartError::InvalidSize {
                product: product.name.clone(),
                size: size.to_string(),
            });
        }
        if !product.colors.iter().any(|c| c == color) {
            return Err(CartError::InvalidColor {
                product: product.name.clone(),
                color: color.to_string(),
            });
        }

        let line = CartLine {
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            size: size.to_string(),
            color: color.to_string(),
        };
        self.lines.push(line.clone());
        debug!(product = %line.product_id, count = self.lines.len(), "added cart line");

        if let Some(display) = &self.display {
            display.cart_count_changed(self.lines.len());
        }

        Ok(line)
    }

    /// Current cart lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of lines in the cart.
    #[must_use]
    pub fn count(&self) -> usize {
        self.lines.len()
    }
}

impl Default for CartService {
    fn default() -> Self {
        Self::new()
    }
}
