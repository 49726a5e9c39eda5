/// Failure reported by the escrow gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The payment was rejected: reverted on-chain, declined signature,
    /// insufficient funds.
    Rejected(String),
    /// The gateway could not be reached or the call never resolved.
    Network(String),
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected(reason) => write!(f, "payment rejected: {reason}"),
            Self::Network(reason) => write!(f, "payment network error: {reason}"),
        }
    }
}

impl std::error::Error for GatewayError {}

/// Checkout failure surfaced to the user. Every variant is retryable by an
/// explicit user action; none of them loses cart state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// Another submission is still pending.
    Busy,
    /// Nothing owed in the selected asset; the batch call was never made.
    NothingDue,
    /// The external payment call failed; the cart is untouched.
    Gateway(String),
}

impl std::fmt::Display for CheckoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Busy => write!(f, "a checkout is already in progress"),
            Self::NothingDue => write!(f, "nothing due for the selected payment method"),
            Self::Gateway(reason) => write!(f, "{reason}"),
        }
    }
}

impl std::error::Error for CheckoutError {}

impl From<GatewayError> for CheckoutError {
    fn from(e: GatewayError) -> Self {
        CheckoutError::Gateway(e.to_string())
    }
}
