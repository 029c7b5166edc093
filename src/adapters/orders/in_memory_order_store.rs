//! In-memory OrderStore for tests and local runs.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::ports::{CollaboratorError, OrderStore};

/// Orders keyed by checkout session id, holding the paid flag.
///
/// Only sessions registered with [`InMemoryOrderStore::with_orders`] or
/// [`InMemoryOrderStore::insert`] are updated, mirroring an `UPDATE` against
/// rows created at checkout time.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: RwLock<HashMap<String, bool>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with unpaid orders for each session id.
    pub fn with_orders<I, S>(session_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let orders = session_ids
            .into_iter()
            .map(|id| (id.into(), false))
            .collect();
        Self {
            orders: RwLock::new(orders),
        }
    }

    /// Records an unpaid order for `checkout_session_id`.
    pub async fn insert(&self, checkout_session_id: impl Into<String>) {
        self.orders
            .write()
            .await
            .insert(checkout_session_id.into(), false);
    }

    /// Paid flag for a session, or `None` if no order exists.
    pub async fn is_paid(&self, checkout_session_id: &str) -> Option<bool> {
        self.orders.read().await.get(checkout_session_id).copied()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn mark_paid(
        &self,
        checkout_session_id: &str,
        paid: bool,
    ) -> Result<u64, CollaboratorError> {
        let mut orders = self.orders.write().await;
        match orders.get_mut(checkout_session_id) {
            Some(flag) => {
                *flag = paid;
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
