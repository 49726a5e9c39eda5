//! Shared types and pure logic for the rewear marketplace client.
//! Dependency-light (serde only), usable from every workspace member.

mod amount;
mod cart;
pub mod codec;
mod error;

pub use amount::{Amount, ProductId};
pub use cart::{CartLine, CartState, CartTotals, LineDetails, PaymentMode};
pub use error::CodecError;
