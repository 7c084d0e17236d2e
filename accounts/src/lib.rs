//! User accounts and wallets for the skillshare marketplace.
//!
//! The marketplace core never owns user records; it moves credits through
//! its `CreditLedger` port. This crate owns the records: demo email/password
//! auth, profile metadata, the wallet, and the port implementation.
//!
//! # Key Components
//!
//! - [`AccountRegistry`]: user map plus the signed-in session
//! - [`UserAccount`]: identity, wallet, and profile record
//! - `impl CreditLedger for AccountRegistry`: escrow settlement routes here

pub mod registry;
pub mod types;

// Re-export main types
pub use registry::{AccountRegistry, AuthError, SignUp};
pub use types::{ProfilePatch, UserAccount};
