//! The external escrow-gateway interface.
//!
//! The escrow contract itself is an external collaborator; the submitter
//! only ever sees this trait. Both batch operations take parallel
//! product-id / quantity arrays and return an opaque transaction handle
//! whose eventual confirmed-or-failed resolution is awaited through
//! [`PaymentGateway::wait_for_confirmation`]. No local timeout is applied;
//! the gateway's own policy governs.

use crate::errors::GatewayError;
use rewear_types::{Amount, ProductId};
use std::fmt;
use std::future::Future;

/// Opaque handle to a submitted transaction (e.g. a tx hash).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxHandle(pub String);

impl fmt::Display for TxHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fixed call interface of the batched escrow payment contract.
pub trait PaymentGateway: Send + Sync {
    /// Pay for `product_ids[i] × quantities[i]` in the native asset, with a
    /// single aggregate `value` transfer attached.
    fn batch_pay_native(
        &self,
        product_ids: Vec<ProductId>,
        quantities: Vec<u32>,
        value: Amount,
    ) -> impl Future<Output = Result<TxHandle, GatewayError>> + Send;

    /// Pay for `product_ids[i] × quantities[i]` in the platform token. The
    /// token amount is resolved contract-side from unit prices, so no value
    /// rides along.
    fn batch_pay_token(
        &self,
        product_ids: Vec<ProductId>,
        quantities: Vec<u32>,
    ) -> impl Future<Output = Result<TxHandle, GatewayError>> + Send;

    /// Suspend until the transaction behind `tx` is confirmed or failed.
    fn wait_for_confirmation(
        &self,
        tx: TxHandle,
    ) -> impl Future<Output = Result<TxHandle, GatewayError>> + Send;
}
