//! Checkout submission: the cart's snapshot → one batched escrow call.
//!
//! A submission captures its id/quantity arrays and aggregate total up
//! front, so cart edits made while the call is pending do not affect it;
//! the cart stays editable the whole time and only a second *submission* is
//! blocked. A pending checkout therefore never tracks later edits, and an
//! acknowledged one clears whatever the cart holds at that point.

use crate::errors::{CheckoutError, GatewayError};
use crate::gateway::{PaymentGateway, TxHandle};
use rewear_cart::CartStore;
use rewear_types::{Amount, ProductId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

/// Which asset settled the checkout, and how much of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Native(Amount),
    Token(Amount),
}

/// Acknowledged checkout. The caller navigates to the order-status view for
/// `tx` on receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutReceipt {
    pub tx: TxHandle,
    pub settlement: Settlement,
    pub line_count: usize,
}

/// Submits the cart through a [`PaymentGateway`], one submission at a time.
///
/// The in-flight flag spans both payment paths: while either submission is
/// outstanding, another of either kind is rejected with
/// [`CheckoutError::Busy`] rather than queued. Duplicate submissions (a
/// rapid double-click) therefore cannot double-spend.
pub struct CheckoutSubmitter<G: PaymentGateway> {
    gateway: G,
    cart: Arc<Mutex<CartStore>>,
    in_flight: AtomicBool,
}

impl<G: PaymentGateway> CheckoutSubmitter<G> {
    pub fn new(gateway: G, cart: Arc<Mutex<CartStore>>) -> Self {
        CheckoutSubmitter {
            gateway,
            cart,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Whether a submission is currently outstanding.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Shared handle to the cart this submitter settles. Editing it while a
    /// submission is pending is allowed; the submission already captured
    /// its own snapshot.
    pub fn cart(&self) -> &Arc<Mutex<CartStore>> {
        &self.cart
    }

    /// Pay every line in one native-asset batch call, transferring the
    /// cart's aggregate native total. Clears the cart on acknowledged
    /// success; leaves it untouched on any failure.
    pub async fn submit_native(&self) -> Result<CheckoutReceipt, CheckoutError> {
        let _guard = self.acquire()?;
        let (product_ids, quantities, value) = {
            let cart = self.lock_cart();
            let totals = cart.state().totals;
            if totals.native.is_zero() {
                return Err(CheckoutError::NothingDue);
            }
            let (ids, quantities) = snapshot_lines(&cart);
            (ids, quantities, totals.native)
        };

        let line_count = product_ids.len();
        info!(lines = line_count, value = %value, "submitting native-asset checkout");
        let tx = self.gateway.batch_pay_native(product_ids, quantities, value).await;
        self.settle(tx, Settlement::Native(value), line_count).await
    }

    /// Pay every line in one platform-token batch call. The token amount is
    /// resolved contract-side; the receipt records the cart's token total.
    pub async fn submit_token(&self) -> Result<CheckoutReceipt, CheckoutError> {
        let _guard = self.acquire()?;
        let (product_ids, quantities, total) = {
            let cart = self.lock_cart();
            let totals = cart.state().totals;
            if totals.token.is_zero() {
                return Err(CheckoutError::NothingDue);
            }
            let (ids, quantities) = snapshot_lines(&cart);
            (ids, quantities, totals.token)
        };

        let line_count = product_ids.len();
        info!(lines = line_count, total = %total, "submitting platform-token checkout");
        let tx = self.gateway.batch_pay_token(product_ids, quantities).await;
        self.settle(tx, Settlement::Token(total), line_count).await
    }

    /// Await confirmation and clear the cart; on any failure leave the cart
    /// alone and hand back a retryable reason.
    async fn settle(
        &self,
        submitted: Result<TxHandle, GatewayError>,
        settlement: Settlement,
        line_count: usize,
    ) -> Result<CheckoutReceipt, CheckoutError> {
        let outcome = match submitted {
            Ok(tx) => self.gateway.wait_for_confirmation(tx).await,
            Err(e) => Err(e),
        };
        let confirmed = match outcome {
            Ok(tx) => tx,
            Err(e) => {
                warn!(error = %e, "checkout failed, cart preserved");
                return Err(e.into());
            }
        };

        self.lock_cart().clear();
        info!(tx = %confirmed, lines = line_count, "checkout confirmed, cart cleared");
        Ok(CheckoutReceipt {
            tx: confirmed,
            settlement,
            line_count,
        })
    }

    fn acquire(&self) -> Result<FlightGuard<'_>, CheckoutError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| CheckoutError::Busy)?;
        Ok(FlightGuard(&self.in_flight))
    }

    // Held only to snapshot or clear, never across an await.
    fn lock_cart(&self) -> MutexGuard<'_, CartStore> {
        self.cart.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Parallel id/quantity arrays over all lines, as the batch interface takes.
fn snapshot_lines(cart: &CartStore) -> (Vec<ProductId>, Vec<u32>) {
    cart.state()
        .lines
        .iter()
        .map(|l| (l.product_id, l.quantity))
        .unzip()
}

/// Releases the in-flight flag on every exit path.
struct FlightGuard<'a>(&'a AtomicBool);

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
