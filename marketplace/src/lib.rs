//! Marketplace core for the skillshare credit economy.
//!
//! Users publish service offers priced in credits, book each other, and
//! settle through an escrow that releases credits only when both parties
//! confirm completion.
//!
//! # Key Components
//!
//! - [`MarketStore`]: owned state container for offers, escrows, favorites
//! - [`CreditLedger`]: port the escrow engine moves credits through
//! - [`MarketConfig`]: pricing knobs (GBP-per-credit, rate clamp)
//! - Escrow operations: `create`, `accept`, `amend`, `complete`, `cancel`,
//!   messaging, and reviews, all as methods on [`MarketStore`]
//!
//! # Example
//!
//! ```
//! use marketplace::{
//!     BookingRequest, CreditLedger, InMemoryLedger, MarketConfig, MarketStore, OfferDraft, Party,
//! };
//!
//! let mut store = MarketStore::new();
//! let mut ledger = InMemoryLedger::new();
//! ledger.set_balance("buyer", 10);
//!
//! let offer_id = store
//!     .publish_offer(
//!         OfferDraft {
//!             user_id: "provider".to_string(),
//!             user_name: "Pat".to_string(),
//!             title: "Brand polish session".to_string(),
//!             desc: "1h design review".to_string(),
//!             category: Some("creative".to_string()),
//!             gbp_per_hour: 40,
//!         },
//!         &MarketConfig::default(),
//!     )
//!     .id
//!     .clone();
//!
//! let escrow_id = store
//!     .create_escrow(
//!         BookingRequest { offer_id, buyer_id: "buyer".to_string(), hours: 2 },
//!         &mut ledger,
//!     )
//!     .unwrap()
//!     .id
//!     .clone();
//!
//! store.accept_escrow(&escrow_id, Party::Provider).unwrap();
//! store.complete_escrow(&escrow_id, Party::Provider, &mut ledger).unwrap();
//! store.complete_escrow(&escrow_id, Party::Buyer, &mut ledger).unwrap();
//! assert_eq!(ledger.balance("provider"), 8);
//! ```

pub mod catalog;
pub mod categories;
pub mod config;
pub mod escrow;
pub mod ledger;
pub mod selectors;
pub mod store;
pub mod types;

// Re-export main types
pub use catalog::CatalogError;
pub use categories::{category_label, Category, CATEGORIES};
pub use config::MarketConfig;
pub use escrow::{BookingRequest, EscrowError, MessageDraft, ReviewDraft};
pub use ledger::{CreditLedger, InMemoryLedger};
pub use store::MarketStore;
pub use types::*;
