//! Identity-gated wishlist toggling.
//!
//! The wishlist service is a thin orchestrator, not the store of record:
//! membership lives in an external backend keyed by user id, and the service
//! keeps a local mirror for synchronous `contains` checks. Toggling requires
//! an authenticated user, and at most one mutation may be in flight per
//! service instance - a toggle that arrives while another is outstanding is
//! suppressed (dropped, never queued).

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use corex_core::{ProductId, UserId};
use tracing::instrument;

/// Errors that can occur when toggling the wishlist.
#[derive(Debug, thiserror::Error)]
pub enum WishlistError {
    /// No signed-in user; the caller should surface a sign-in prompt and
    /// must not retry the mutation.
    #[error("sign in required to use the wishlist")]
    AuthenticationRequired,

    /// The external persistence collaborator failed.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Failure reported by the external wishlist store.
#[derive(Debug, thiserror::Error)]
#[error("wishlist backend error: {0}")]
pub struct BackendError(pub String);

/// Result of a completed toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// The product was not a member and has been added.
    Added,
    /// The product was a member and has been removed.
    Removed,
}

/// External store of record for wishlist membership, keyed by user.
pub trait WishlistBackend {
    /// Fetch the full membership set for a user.
    fn fetch(
        &self,
        user: &UserId,
    ) -> impl Future<Output = Result<HashSet<ProductId>, BackendError>> + Send;

    /// Persist a new membership.
    fn add(
        &self,
        user: &UserId,
        product: &ProductId,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;

    /// Remove an existing membership.
    fn remove(
        &self,
        user: &UserId,
        product: &ProductId,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;
}

/// Wishlist toggle orchestrator over a pluggable backend.
pub struct WishlistService<B> {
    backend: B,
    mirror: Mutex<HashSet<ProductId>>,
    in_flight: AtomicBool,
}

impl<B: WishlistBackend> WishlistService<B> {
    /// Create a service with an empty membership mirror.
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            mirror: Mutex::new(HashSet::new()),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Reload the membership mirror from the backend.
    ///
    /// # Errors
    ///
    /// Returns [`WishlistError::Backend`] if the fetch fails; the mirror is
    /// left unchanged in that case.
    pub async fn refresh(&self, user: &UserId) -> Result<(), WishlistError> {
        let members = self.backend.fetch(user).await?;
        *self.mirror() = members;
        Ok(())
    }

    /// Whether `product` is currently wishlisted, per the local mirror.
    #[must_use]
    pub fn contains(&self, product: &ProductId) -> bool {
        self.mirror().contains(product)
    }

    /// Whether a mutation is currently in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Toggle membership of `product` for `user`.
    ///
    /// Returns `Ok(None)` when the call is suppressed because another
    /// mutation is still in flight; `Ok(Some(_))` reports whether the
    /// product was added or removed. The mirror is only updated after the
    /// backend mutation succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`WishlistError::AuthenticationRequired`] when `user` is
    /// `None` (the mutation is never attempted), or
    /// [`WishlistError::Backend`] when the external store fails.
    #[instrument(skip(self, user), fields(product = %product))]
    pub async fn toggle(
        &self,
        user: Option<&UserId>,
        product: &ProductId,
    ) -> Result<Option<Toggle>, WishlistError> {
        let Some(user) = user else {
            return Err(WishlistError::AuthenticationRequired);
        };

        // At-most-one concurrent mutation: suppress, never queue.
        if self.in_flight.swap(true, Ordering::AcqRel) {
            return Ok(None);
        }

        let result = self.toggle_inner(user, product).await;
        self.in_flight.store(false, Ordering::Release);
        result.map(Some)
    }

    async fn toggle_inner(
        &self,
        user: &UserId,
        product: &ProductId,
    ) -> Result<Toggle, WishlistError> {
        let is_member = self.mirror().contains(product);

        if is_member {
            self.backend.remove(user, product).await?;
            self.mirror().remove(product);
            Ok(Toggle::Removed)
        } else {
            self.backend.add(user, product).await?;
            self.mirror().insert(product.clone());
            Ok(Toggle::Added)
        }
    }

    /// Consume the service and return the backend, e.g. to rebuild the
    /// service after a profile switch.
    #[must_use]
    pub fn into_backend(self) -> B {
        self.backend
    }

    fn mirror(&self) -> MutexGuard<'_, HashSet<ProductId>> {
        // The mirror mutex is never held across an await, so poisoning can
        // only come from a panicking test assertion.
        match self.mirror.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// In-process wishlist backend.
///
/// Used by tests and ephemeral sessions; swap in a remote-backed
/// implementation without touching the service.
#[derive(Debug, Default)]
pub struct MemoryWishlist {
    sets: Mutex<std::collections::HashMap<UserId, HashSet<ProductId>>>,
}

impl MemoryWishlist {
    fn sets(&self) -> MutexGuard<'_, std::collections::HashMap<UserId, HashSet<ProductId>>> {
        match self.sets.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl WishlistBackend for MemoryWishlist {
    async fn fetch(&self, user: &UserId) -> Result<HashSet<ProductId>, BackendError> {
        Ok(self.sets().get(user).cloned().unwrap_or_default())
    }

    async fn add(&self, user: &UserId, product: &ProductId) -> Result<(), BackendError> {
        self.sets()
            .entry(user.clone())
            .or_default()
            .insert(product.clone());
        Ok(())
    }

    async fn remove(&self, user: &UserId, product: &ProductId) -> Result<(), BackendError> {
        if let Some(set) = self.sets().get_mut(user) {
            set.remove(product);
        }
        Ok(())
    }
}
