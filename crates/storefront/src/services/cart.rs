//! Cart service over pluggable storage.
//!
//! Each mutation loads the visitor's current cart, applies one
//! [`Cart`] operation and writes the whole cart back. Two concurrent requests
//! from the same visitor race; the last write wins.

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tower_sessions::Session;

use bistro_core::{Cart, CartItem, ProductId};

use crate::models::session_keys;

/// Errors reading or writing a stored cart.
#[derive(Debug, Error)]
pub enum CartStorageError {
    /// The session store failed, or the stored cart could not be decoded.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

/// Where a visitor's cart lives between requests.
pub trait CartStorage: Send + Sync {
    /// Current cart, empty if none was stored yet.
    fn load(&self) -> impl Future<Output = Result<Cart, CartStorageError>> + Send;

    /// Replace the stored cart.
    fn save(&self, cart: &Cart) -> impl Future<Output = Result<(), CartStorageError>> + Send;
}

/// Cart stored in the visitor's session under `cartItems`.
#[derive(Debug, Clone)]
pub struct SessionCartStorage {
    session: Session,
}

impl SessionCartStorage {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

impl CartStorage for SessionCartStorage {
    async fn load(&self) -> Result<Cart, CartStorageError> {
        Ok(self
            .session
            .get::<Cart>(session_keys::CART_ITEMS)
            .await?
            .unwrap_or_default())
    }

    async fn save(&self, cart: &Cart) -> Result<(), CartStorageError> {
        self.session.insert(session_keys::CART_ITEMS, cart).await?;
        Ok(())
    }
}

/// In-process cart storage, shared between clones.
#[derive(Debug, Clone, Default)]
pub struct MemoryCartStorage {
    cart: Arc<Mutex<Cart>>,
}

impl MemoryCartStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CartStorage for MemoryCartStorage {
    async fn load(&self) -> Result<Cart, CartStorageError> {
        Ok(self.cart.lock().await.clone())
    }

    async fn save(&self, cart: &Cart) -> Result<(), CartStorageError> {
        *self.cart.lock().await = cart.clone();
        Ok(())
    }
}

/// Cart operations persisted through a [`CartStorage`].
#[derive(Debug, Clone)]
pub struct CartService<S> {
    storage: S,
}

impl<S: CartStorage> CartService<S> {
    #[must_use]
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    /// The cart as currently stored.
    ///
    /// # Errors
    ///
    /// Returns `CartStorageError` if the storage cannot be read.
    pub async fn snapshot(&self) -> Result<Cart, CartStorageError> {
        self.storage.load().await
    }

    /// Add one unit of `item`; see [`Cart::add`].
    ///
    /// # Errors
    ///
    /// Returns `CartStorageError` if the storage cannot be read or written.
    pub async fn add(&self, item: CartItem) -> Result<Cart, CartStorageError> {
        let product_id = item.product_id;
        let cart = self.update(|cart| cart.add(item)).await?;
        tracing::debug!(%product_id, quantity = cart.quantity_of(product_id), "cart add");
        Ok(cart)
    }

    /// Remove one unit of a product.
    ///
    /// # Errors
    ///
    /// Returns `CartStorageError` if the storage cannot be read or written.
    pub async fn decrement(&self, product_id: ProductId) -> Result<Cart, CartStorageError> {
        let cart = self.update(|cart| cart.decrement(product_id)).await?;
        tracing::debug!(%product_id, quantity = cart.quantity_of(product_id), "cart decrement");
        Ok(cart)
    }

    /// Remove a product entirely.
    ///
    /// # Errors
    ///
    /// Returns `CartStorageError` if the storage cannot be read or written.
    pub async fn remove(&self, product_id: ProductId) -> Result<Cart, CartStorageError> {
        tracing::debug!(%product_id, "cart remove");
        self.update(|cart| cart.remove(product_id)).await
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartStorageError` if the storage cannot be written.
    pub async fn clear(&self) -> Result<Cart, CartStorageError> {
        let cart = Cart::new();
        self.storage.save(&cart).await?;
        tracing::debug!("cart cleared");
        Ok(cart)
    }

    async fn update(&self, apply: impl FnOnce(&mut Cart)) -> Result<Cart, CartStorageError> {
        let mut cart = self.storage.load().await?;
        apply(&mut cart);
        self.storage.save(&cart).await?;
        Ok(cart)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;
    use tower_sessions::MemoryStore;

    use super::*;

    fn item(id: i32) -> CartItem {
        CartItem {
            product_id: ProductId::new(id),
            name: format!("Item {id}"),
            image_url: String::new(),
            base_price: Decimal::from(10),
            size: None,
            extras: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_mutations_are_persisted() {
        let storage = MemoryCartStorage::new();
        let service = CartService::new(storage.clone());

        service.add(item(1)).await.unwrap();
        service.add(item(1)).await.unwrap();
        service.add(item(2)).await.unwrap();

        let stored = storage.load().await.unwrap();
        assert_eq!(stored.total_quantity(), 3);
        assert_eq!(stored.quantity_of(ProductId::new(1)), 2);
    }

    #[tokio::test]
    async fn test_decrement_remove_and_clear() {
        let service = CartService::new(MemoryCartStorage::new());
        service.add(item(1)).await.unwrap();
        service.add(item(2)).await.unwrap();
        service.add(item(2)).await.unwrap();

        let cart = service.decrement(ProductId::new(1)).await.unwrap();
        assert_eq!(cart.quantity_of(ProductId::new(1)), 0);

        let cart = service.remove(ProductId::new(2)).await.unwrap();
        assert!(cart.is_empty());

        service.add(item(3)).await.unwrap();
        service.clear().await.unwrap();
        assert!(service.snapshot().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_session_storage_round_trips_under_cart_items_key() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        let service = CartService::new(SessionCartStorage::new(session.clone()));

        assert!(service.snapshot().await.unwrap().is_empty());
        service.add(item(5)).await.unwrap();

        let raw: serde_json::Value = session
            .get(session_keys::CART_ITEMS)
            .await
            .unwrap()
            .unwrap();
        assert!(raw.is_array());
        assert_eq!(raw[0]["productId"], 5);

        let reloaded = CartService::new(SessionCartStorage::new(session));
        assert_eq!(
            reloaded
                .snapshot()
                .await
                .unwrap()
                .quantity_of(ProductId::new(5)),
            1
        );
    }
}
