//! Asynchronous oracle delivery handling
//!
//! Deliveries arrive out of band on a channel; the loop must apply good
//! ones and swallow replays or spoofs without disturbing the service.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use seedforge::randomness::oracle::run_delivery_loop;
use seedforge::{
    Address, MintPayload, RandomSeed, RandomnessDelivery, RandomnessService, RequestId,
    ServiceConfig,
};

use crate::mocks::MockCoordinator;

fn addr(byte: u8) -> Address {
    Address::new([byte; 20])
}

const OWNER: u8 = 0xff;
const HERO: u8 = 0x01;

fn service() -> RandomnessService<MockCoordinator> {
    let mut service = RandomnessService::new(
        addr(OWNER),
        ServiceConfig::development(),
        MockCoordinator::new(),
    )
    .unwrap();
    service.authorize_consumer(addr(OWNER), addr(HERO)).unwrap();
    service
}

#[tokio::test]
async fn delivery_loop_fulfills_pending_commitment() {
    let mut svc = service();
    let due = svc.quote(5).unwrap();
    let request_id = svc
        .commit_mint(addr(HERO), addr(0xaa), 5, due, MintPayload::default(), 1_000)
        .unwrap();

    let shared = Arc::new(Mutex::new(svc));
    let (tx, rx) = mpsc::channel(8);
    let loop_handle = tokio::spawn(run_delivery_loop(Arc::clone(&shared), rx));

    tx.send(RandomnessDelivery {
        request_id,
        seed: RandomSeed::new([0x42; 32]),
    })
    .await
    .unwrap();
    drop(tx);
    loop_handle.await.unwrap();

    let mut svc = shared.lock().await;
    assert!(svc.peek(&addr(0xaa)).is_ready());
    let batch = svc.finalize_mint(addr(HERO), addr(0xaa)).unwrap();
    assert_eq!(batch.outcomes.len(), 5);
}

#[tokio::test]
async fn duplicate_and_spoofed_deliveries_are_swallowed() {
    let mut svc = service();
    let due = svc.quote(3).unwrap();
    let request_id = svc
        .commit_mint(addr(HERO), addr(0xaa), 3, due, MintPayload::default(), 1_000)
        .unwrap();

    let shared = Arc::new(Mutex::new(svc));
    let (tx, rx) = mpsc::channel(8);
    let loop_handle = tokio::spawn(run_delivery_loop(Arc::clone(&shared), rx));

    let good_seed = RandomSeed::new([0x42; 32]);
    // Spoof for an id that was never issued.
    tx.send(RandomnessDelivery {
        request_id: RequestId(9_999),
        seed: RandomSeed::new([0xee; 32]),
    })
    .await
    .unwrap();
    // The real delivery.
    tx.send(RandomnessDelivery {
        request_id,
        seed: good_seed,
    })
    .await
    .unwrap();
    // A replay with a different seed, which must not double-apply.
    tx.send(RandomnessDelivery {
        request_id,
        seed: RandomSeed::new([0x13; 32]),
    })
    .await
    .unwrap();
    drop(tx);
    loop_handle.await.unwrap();

    // The loop survived all three and only the first real seed counts.
    let mut svc = shared.lock().await;
    let batch = svc.finalize_mint(addr(HERO), addr(0xaa)).unwrap();

    let mut reference = service();
    let due = reference.quote(3).unwrap();
    let reference_id = reference
        .commit_mint(addr(HERO), addr(0xaa), 3, due, MintPayload::default(), 1_000)
        .unwrap();
    reference
        .on_randomness_delivered(reference_id, good_seed)
        .unwrap();
    let expected = reference.finalize_mint(addr(HERO), addr(0xaa)).unwrap();
    assert_eq!(batch.outcomes, expected.outcomes);
}
