use crate::utils::{init_tracing, native_line, token_line, MockGateway};
use anyhow::Result;
use rewear_cart::{CartStore, KvStore, MemoryStore, DEFAULT_STORAGE_KEY};
use rewear_checkout::{CheckoutError, CheckoutSubmitter, Settlement};
use rewear_types::{Amount, CartState, ProductId};
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};

fn submitter_over(
    kv: Arc<MemoryStore>,
) -> (Arc<MockGateway>, CheckoutSubmitter<Arc<MockGateway>>) {
    let cart = Arc::new(Mutex::new(CartStore::new(kv)));
    let gateway = Arc::new(MockGateway::default());
    (gateway.clone(), CheckoutSubmitter::new(gateway, cart))
}

#[tokio::test]
async fn full_native_shopping_flow() -> Result<()> {
    init_tracing();
    let kv = Arc::new(MemoryStore::new());
    let (gateway, submitter) = submitter_over(kv.clone());

    {
        let mut cart = submitter.cart().lock().unwrap();
        cart.add_line(native_line(1, 1000, 1));
        cart.add_line(native_line(1, 1000, 1)); // double-click on "add"
        cart.add_line(native_line(2, 2500, 1));
        cart.set_open(true);
        assert_eq!(cart.state().totals.native, Amount(4500));
    }

    let receipt = submitter.submit_native().await?;
    assert_eq!(receipt.settlement, Settlement::Native(Amount(4500)));
    assert_eq!(receipt.line_count, 2);

    let (ids, quantities, value) = gateway.last_native.lock().unwrap().clone().unwrap();
    assert_eq!(ids, vec![ProductId(1), ProductId(2)]);
    assert_eq!(quantities, vec![2, 1]);
    assert_eq!(value, Amount(4500));

    // Acknowledged checkout empties both the cart and the stored document.
    assert!(submitter.cart().lock().unwrap().state().is_empty());
    assert_eq!(
        kv.get(DEFAULT_STORAGE_KEY)?.unwrap(),
        serde_json::to_string(&CartState::empty())?
    );
    Ok(())
}

#[tokio::test]
async fn exchange_and_token_lines_settle_together() -> Result<()> {
    init_tracing();
    let kv = Arc::new(MemoryStore::new());
    let (gateway, submitter) = submitter_over(kv);

    {
        let mut cart = submitter.cart().lock().unwrap();
        cart.add_line(token_line(10, 100, 3));
        cart.add_line(native_line(11, 0, 1));
        cart.set_exchange_details(ProductId(11), ProductId(90), Amount(300));
        assert_eq!(cart.state().totals.token, Amount(600));
    }

    let receipt = submitter.submit_token().await?;
    assert_eq!(receipt.settlement, Settlement::Token(Amount(600)));
    let (ids, _) = gateway.last_token.lock().unwrap().clone().unwrap();
    assert_eq!(ids, vec![ProductId(10), ProductId(11)]);
    Ok(())
}

#[tokio::test]
async fn failed_payment_keeps_selection_for_retry() -> Result<()> {
    init_tracing();
    let kv = Arc::new(MemoryStore::new());
    let (gateway, submitter) = submitter_over(kv.clone());

    {
        let mut cart = submitter.cart().lock().unwrap();
        cart.add_line(native_line(1, 1000, 2));
    }
    gateway.fail_next.store(true, Ordering::SeqCst);

    let err = submitter.submit_native().await.unwrap_err();
    assert!(matches!(err, CheckoutError::Gateway(_)));

    // Selection intact in memory and in storage; explicit retry succeeds.
    {
        let cart = submitter.cart().lock().unwrap();
        assert_eq!(cart.state().totals.native, Amount(2000));
    }
    let stored: CartState = serde_json::from_str(&kv.get(DEFAULT_STORAGE_KEY)?.unwrap())?;
    assert_eq!(stored.lines.len(), 1);

    let receipt = submitter.submit_native().await?;
    assert_eq!(receipt.settlement, Settlement::Native(Amount(2000)));
    Ok(())
}

#[tokio::test]
async fn cart_edits_during_pending_checkout_do_not_leak_into_it() -> Result<()> {
    init_tracing();
    let kv = Arc::new(MemoryStore::new());
    let (gateway, submitter) = submitter_over(kv);

    {
        let mut cart = submitter.cart().lock().unwrap();
        cart.add_line(native_line(1, 1000, 2));
    }
    gateway.hold.store(true, Ordering::SeqCst);

    let (receipt, ()) = tokio::join!(submitter.submit_native(), async {
        tokio::task::yield_now().await;
        assert!(submitter.is_busy());
        // Cart edits stay permitted while the submission is outstanding.
        submitter.cart().lock().unwrap().add_line(native_line(3, 500, 1));
        gateway.release.notify_one();
    });
    let receipt = receipt?;

    // The submission captured its arrays up front; the mid-flight line is
    // not part of it.
    let (ids, quantities, value) = gateway.last_native.lock().unwrap().clone().unwrap();
    assert_eq!(receipt.line_count, 1);
    assert_eq!(ids, vec![ProductId(1)]);
    assert_eq!(quantities, vec![2]);
    assert_eq!(value, Amount(2000));

    // Known decoupling: the acknowledged checkout clears the whole cart,
    // the mid-flight line included.
    assert!(submitter.cart().lock().unwrap().state().is_empty());
    Ok(())
}
