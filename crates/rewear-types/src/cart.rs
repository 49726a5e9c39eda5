//! Cart lines, derived totals, and the persisted cart document.
//!
//! `CartState` serializes directly to the document layout older clients
//! wrote to storage under the `marketplace-cart` key: camelCase fields,
//! `items` / `total` / `isOpen` at the top level, and every integer as a
//! marked decimal string (see [`crate::codec`]).

use crate::amount::{Amount, ProductId};
use serde::{Deserialize, Serialize};

/// How a cart line settles at checkout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    /// Pay in the chain's base currency (wei).
    #[default]
    NativeAsset,
    /// Pay in the platform's fungible token.
    PlatformToken,
    /// Settle by offering another product, with an optional token top-up.
    Exchange,
}

/// Render-only listing metadata carried on a line. Never invariant-bearing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineDetails {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub condition: Option<String>,
}

fn default_quantity() -> u32 {
    1
}

/// One product entry in the cart.
///
/// `product_id` is unique within a cart; adding an existing id merges
/// quantities instead of duplicating the line. `exchange_target_product_id`
/// and `token_top_up` are only meaningful under [`PaymentMode::Exchange`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    #[serde(default = "default_quantity", with = "crate::codec::quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub payment_mode: PaymentMode,
    /// Unit price in wei. Retained for display whatever the mode.
    #[serde(default)]
    pub unit_price_native: Amount,
    /// Unit price in token base units. Retained for display whatever the mode.
    #[serde(default)]
    pub unit_price_token: Amount,
    #[serde(default)]
    pub exchange_target_product_id: Option<ProductId>,
    /// Token owed on top of the offered item when exchanged values differ.
    #[serde(default)]
    pub token_top_up: Option<Amount>,
    #[serde(default)]
    pub details: LineDetails,
}

impl CartLine {
    /// Drop the exchange-only fields. Called whenever the line leaves
    /// [`PaymentMode::Exchange`].
    pub fn clear_exchange_fields(&mut self) {
        self.exchange_target_product_id = None;
        self.token_top_up = None;
    }
}

/// Aggregate amounts owed per asset. Derived from the lines, never mutated
/// independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    /// Wei owed across all native-asset lines.
    #[serde(rename = "eth", default)]
    pub native: Amount,
    /// Token base units owed: platform-token lines at unit price, exchange
    /// lines top-up only.
    #[serde(rename = "tokens", default)]
    pub token: Amount,
}

impl CartTotals {
    /// Full recomputation from the lines. Carts are tiny, so the closed-form
    /// sum on every mutation beats carrying incremental state.
    pub fn compute(lines: &[CartLine]) -> Self {
        let mut totals = CartTotals::default();
        for line in lines {
            match line.payment_mode {
                PaymentMode::NativeAsset => {
                    totals.native = totals
                        .native
                        .saturating_add(line.unit_price_native.saturating_mul(line.quantity));
                }
                PaymentMode::PlatformToken => {
                    totals.token = totals
                        .token
                        .saturating_add(line.unit_price_token.saturating_mul(line.quantity));
                }
                PaymentMode::Exchange => {
                    // Top-up only: an exchange line never contributes its
                    // unit price to the token sum.
                    totals.token = totals
                        .token
                        .saturating_add(line.token_top_up.unwrap_or(Amount::ZERO));
                }
            }
        }
        totals
    }
}

/// The full cart snapshot: ordered lines (insertion order = display order),
/// totals consistent with them, and the drawer-visibility flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartState {
    #[serde(rename = "items", default)]
    pub lines: Vec<CartLine>,
    #[serde(rename = "total", default)]
    pub totals: CartTotals,
    #[serde(rename = "isOpen", default)]
    pub is_open: bool,
}

impl CartState {
    pub fn empty() -> Self {
        CartState::default()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }
}
