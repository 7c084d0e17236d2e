//! Whole-application lifecycle integration tests
//!
//! Drives the marketplace core through the account registry's ledger
//! implementation with snapshots persisted between steps, the way the UI
//! shell runs it: load at startup, mutate, save on every change.

use accounts::{AccountRegistry, SignUp};
use marketplace::{
    BookingRequest, CreditLedger, EscrowStatus, MarketConfig, Party, ReviewDraft,
};
use storage::seed::seed_demo_data;
use storage::JsonStore;
use tempfile::TempDir;

#[test]
fn booking_against_seeded_offer_settles_through_registry() {
    let dir = TempDir::new().unwrap();
    let files = JsonStore::new(dir.path());
    let config = MarketConfig::default();

    // Startup: nothing on disk yet, so seed.
    let mut market = files.load_market();
    let mut registry = files.load_accounts();
    assert!(seed_demo_data(&files, &mut market, &mut registry, &config).unwrap());

    // A new user signs up and tops up.
    let buyer_id = registry
        .sign_up(SignUp {
            name: "Billie".to_string(),
            email: "billie@example.com".to_string(),
            password: "pw".to_string(),
        })
        .unwrap()
        .id
        .clone();
    registry.add_credits(10);

    // Book 1 hour of Alex's AWS review (8 credits/hr).
    let offer = market
        .offers()
        .iter()
        .find(|o| o.user_id == "u_seed_alex")
        .unwrap();
    let offer_id = offer.id.clone();
    let escrow_id = market
        .create_escrow(
            BookingRequest {
                offer_id: offer_id.clone(),
                buyer_id: buyer_id.clone(),
                hours: 1,
            },
            &mut registry,
        )
        .unwrap()
        .id
        .clone();

    assert_eq!(registry.balance_of(&buyer_id), 2);
    files.save_market(&market).unwrap();
    files.save_accounts(&registry).unwrap();

    // Restart: state comes back from disk.
    let mut market = files.load_market();
    let mut registry = files.load_accounts();
    assert_eq!(market.escrows().len(), 1);
    assert_eq!(registry.balance_of(&buyer_id), 2);

    // Provider accepts, both confirm, buyer reviews.
    market.accept_escrow(&escrow_id, Party::Provider).unwrap();
    market
        .complete_escrow(&escrow_id, Party::Provider, &mut registry)
        .unwrap();
    market
        .complete_escrow(&escrow_id, Party::Buyer, &mut registry)
        .unwrap();
    market
        .add_review(
            &escrow_id,
            ReviewDraft {
                rating: 5,
                text: "Sharp and fast.".to_string(),
                reviewer_id: buyer_id.clone(),
            },
        )
        .unwrap();

    let escrow = market.escrow(&escrow_id).unwrap();
    assert_eq!(escrow.status, EscrowStatus::Released);
    // Alex started with 12 seeded credits.
    assert_eq!(registry.balance_of("u_seed_alex"), 20);
    assert_eq!(market.offer(&offer_id).unwrap().rating_count, 1);

    files.save_market(&market).unwrap();
    files.save_accounts(&registry).unwrap();

    // Conservation: seeded 12 + 5 plus the buyer's 10 top-up.
    let market = files.load_market();
    let registry = files.load_accounts();
    let wallets: u32 = registry.all().map(|u| u.credits).sum();
    let in_flight: u32 = market
        .escrows()
        .iter()
        .filter(|e| !e.status.is_terminal())
        .map(|e| e.amount_credits)
        .sum();
    assert_eq!(wallets + in_flight, 27);
}

#[test]
fn registry_balance_check_blocks_unaffordable_booking() {
    let dir = TempDir::new().unwrap();
    let files = JsonStore::new(dir.path());
    let config = MarketConfig::default();

    let mut market = files.load_market();
    let mut registry = files.load_accounts();
    seed_demo_data(&files, &mut market, &mut registry, &config).unwrap();

    let buyer_id = registry
        .sign_up(SignUp {
            name: "Broke".to_string(),
            email: "broke@example.com".to_string(),
            password: "pw".to_string(),
        })
        .unwrap()
        .id
        .clone();

    let offer_id = market.offers()[0].id.clone();
    let result = market.create_escrow(
        BookingRequest {
            offer_id,
            buyer_id: buyer_id.clone(),
            hours: 2,
        },
        &mut registry,
    );

    assert!(result.is_err());
    assert_eq!(registry.balance(&buyer_id), 0);
    assert!(market.escrows().is_empty());
}
