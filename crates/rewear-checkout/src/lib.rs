//! Batched escrow checkout submission for the rewear marketplace client.
//!
//! Converts the cart's current snapshot into exactly one batched payment
//! call against the externally-deployed escrow contract, enforces a single
//! submission in flight, and clears the cart on acknowledged success.

mod errors;
mod gateway;
mod submit;

pub use errors::{CheckoutError, GatewayError};
pub use gateway::{PaymentGateway, TxHandle};
pub use submit::{CheckoutReceipt, CheckoutSubmitter, Settlement};
