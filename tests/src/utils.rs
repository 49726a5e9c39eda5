use rewear_checkout::{GatewayError, PaymentGateway, TxHandle};
use rewear_types::{Amount, CartLine, LineDetails, PaymentMode, ProductId};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn native_line(id: u128, price_wei: u128, quantity: u32) -> CartLine {
    CartLine {
        product_id: ProductId(id),
        quantity,
        payment_mode: PaymentMode::NativeAsset,
        unit_price_native: Amount(price_wei),
        unit_price_token: Amount::ZERO,
        exchange_target_product_id: None,
        token_top_up: None,
        details: LineDetails {
            name: format!("listing #{id}"),
            image: format!("ipfs://item/{id}"),
            brand: "thriftworks".to_string(),
            size: Some("M".to_string()),
            condition: Some("gently used".to_string()),
        },
    }
}

pub fn token_line(id: u128, price_tokens: u128, quantity: u32) -> CartLine {
    CartLine {
        payment_mode: PaymentMode::PlatformToken,
        unit_price_token: Amount(price_tokens),
        ..native_line(id, 0, quantity)
    }
}

/// A fresh scratch directory for file-store tests.
pub fn scratch_dir(label: &str) -> PathBuf {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("rewear-{label}-{}-{n}", std::process::id()))
}

/// Escrow-gateway double shared by the end-to-end tests. `fail_next` makes
/// the next confirmation fail; `hold` parks confirmations until `release`.
#[derive(Default)]
pub struct MockGateway {
    pub native_calls: AtomicU32,
    pub token_calls: AtomicU32,
    pub fail_next: AtomicBool,
    pub hold: AtomicBool,
    pub release: tokio::sync::Notify,
    pub last_native: Mutex<Option<(Vec<ProductId>, Vec<u32>, Amount)>>,
    pub last_token: Mutex<Option<(Vec<ProductId>, Vec<u32>)>>,
}

impl PaymentGateway for Arc<MockGateway> {
    async fn batch_pay_native(
        &self,
        product_ids: Vec<ProductId>,
        quantities: Vec<u32>,
        value: Amount,
    ) -> Result<TxHandle, GatewayError> {
        self.native_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_native.lock().unwrap() = Some((product_ids, quantities, value));
        Ok(TxHandle("0xabc123".to_string()))
    }

    async fn batch_pay_token(
        &self,
        product_ids: Vec<ProductId>,
        quantities: Vec<u32>,
    ) -> Result<TxHandle, GatewayError> {
        self.token_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_token.lock().unwrap() = Some((product_ids, quantities));
        Ok(TxHandle("0xdef456".to_string()))
    }

    async fn wait_for_confirmation(&self, tx: TxHandle) -> Result<TxHandle, GatewayError> {
        if self.hold.load(Ordering::SeqCst) {
            self.release.notified().await;
        }
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(GatewayError::Rejected("simulated escrow revert".to_string()));
        }
        Ok(tx)
    }
}
