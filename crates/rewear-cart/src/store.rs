//! The cart store: ordered lines, derived totals, synchronous persistence.
//!
//! Every mutation runs to completion, recomputes totals in full, persists
//! the new snapshot through the injected [`KvStore`], and returns the state.
//! Operations never fail for domain-valid input: a storage write failure is
//! logged at `warn` and the in-memory state stays authoritative, and a
//! malformed persisted document hydrates to the empty cart instead of an
//! error the user would see.

use crate::kv::KvStore;
use rewear_types::{Amount, CartLine, CartState, CartTotals, PaymentMode, ProductId};
use std::sync::Arc;
use tracing::{debug, warn};

/// Storage key older clients already write their cart document under.
pub const DEFAULT_STORAGE_KEY: &str = "marketplace-cart";

/// Cart persistence configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub storage_key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

/// Owns the [`CartState`] and exposes the total set of mutations.
///
/// Single-writer: one `CartStore` per session mutates its storage key.
/// Concurrent sessions racing the same key are last-writer-wins.
pub struct CartStore {
    kv: Arc<dyn KvStore>,
    config: StoreConfig,
    state: CartState,
}

impl CartStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self::with_config(kv, StoreConfig::default())
    }

    pub fn with_config(kv: Arc<dyn KvStore>, config: StoreConfig) -> Self {
        let state = hydrate(kv.as_ref(), &config.storage_key);
        CartStore { kv, config, state }
    }

    /// The current snapshot. Totals are always consistent with the lines.
    pub fn state(&self) -> &CartState {
        &self.state
    }

    /// Add a line, merging quantities when the product is already present.
    /// The incoming line's other fields win; prices may have refreshed
    /// since the earlier add.
    pub fn add_line(&mut self, line: CartLine) -> &CartState {
        match self
            .state
            .lines
            .iter_mut()
            .find(|l| l.product_id == line.product_id)
        {
            Some(existing) => {
                let quantity = existing.quantity.saturating_add(line.quantity);
                *existing = CartLine { quantity, ..line };
            }
            None => self.state.lines.push(line),
        }
        self.commit()
    }

    /// Delete the line with this id. Absent ids are a no-op, not an error.
    pub fn remove_line(&mut self, product_id: ProductId) -> &CartState {
        self.state.lines.retain(|l| l.product_id != product_id);
        self.commit()
    }

    /// Set a line's quantity, clamping anything below 1 up to 1. Deletion is
    /// [`CartStore::remove_line`]'s exclusive responsibility.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: u32) -> &CartState {
        if let Some(line) = self.line_mut(product_id) {
            line.quantity = quantity.max(1);
        }
        self.commit()
    }

    /// Switch a line's payment mode. Leaving `Exchange` clears the
    /// exchange-only fields, which are invalid under any other mode.
    pub fn set_payment_mode(&mut self, product_id: ProductId, mode: PaymentMode) -> &CartState {
        if let Some(line) = self.line_mut(product_id) {
            line.payment_mode = mode;
            if mode != PaymentMode::Exchange {
                line.clear_exchange_fields();
            }
        }
        self.commit()
    }

    /// Atomically mark a line as an exchange against `target`, owing
    /// `top_up` tokens. Forces the mode so exchange fields can never exist
    /// outside `Exchange`.
    pub fn set_exchange_details(
        &mut self,
        product_id: ProductId,
        target: ProductId,
        top_up: Amount,
    ) -> &CartState {
        if let Some(line) = self.line_mut(product_id) {
            line.payment_mode = PaymentMode::Exchange;
            line.exchange_target_product_id = Some(target);
            line.token_top_up = Some(top_up);
        }
        self.commit()
    }

    /// Reset to the empty cart and persist the empty document.
    pub fn clear(&mut self) -> &CartState {
        self.state = CartState::empty();
        self.commit()
    }

    /// Drawer visibility. Persisted, but irrelevant to totals and checkout.
    pub fn set_open(&mut self, open: bool) -> &CartState {
        self.state.is_open = open;
        self.commit()
    }

    fn line_mut(&mut self, product_id: ProductId) -> Option<&mut CartLine> {
        self.state.lines.iter_mut().find(|l| l.product_id == product_id)
    }

    fn commit(&mut self) -> &CartState {
        self.state.totals = CartTotals::compute(&self.state.lines);
        self.persist();
        &self.state
    }

    fn persist(&self) {
        let document = match serde_json::to_string(&self.state) {
            Ok(document) => document,
            Err(e) => {
                warn!(error = %e, "cart snapshot did not serialize, skipping persist");
                return;
            }
        };
        if let Err(e) = self.kv.set(&self.config.storage_key, &document) {
            warn!(key = %self.config.storage_key, error = %e, "cart snapshot not persisted");
        }
    }
}

/// Restore a snapshot from storage, or start empty.
///
/// The document is user-editable, so everything about it is untrusted:
/// parse failures fall back to the empty cart (logged, never surfaced),
/// quantities below 1 clamp up, stray exchange fields are dropped, and
/// totals are recomputed from the lines rather than read back.
fn hydrate(kv: &dyn KvStore, key: &str) -> CartState {
    let raw = match kv.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return CartState::empty(),
        Err(e) => {
            warn!(key = %key, error = %e, "cart storage unreadable, starting empty");
            return CartState::empty();
        }
    };
    let mut state: CartState = match serde_json::from_str(&raw) {
        Ok(state) => state,
        Err(e) => {
            warn!(key = %key, error = %e, "discarding malformed cart document");
            return CartState::empty();
        }
    };
    sanitize(&mut state);
    debug!(lines = state.lines.len(), "cart hydrated from storage");
    state
}

fn sanitize(state: &mut CartState) {
    // Collapse duplicate ids into the first occurrence, summing quantities.
    let mut kept: Vec<CartLine> = Vec::with_capacity(state.lines.len());
    for line in state.lines.drain(..) {
        match kept.iter_mut().find(|l| l.product_id == line.product_id) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(line.quantity);
            }
            None => kept.push(line),
        }
    }
    for line in &mut kept {
        line.quantity = line.quantity.max(1);
        if line.payment_mode != PaymentMode::Exchange {
            line.clear_exchange_fields();
        }
    }
    state.lines = kept;
    state.totals = CartTotals::compute(&state.lines);
}
