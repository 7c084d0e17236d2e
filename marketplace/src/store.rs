//! The owned marketplace state container.
//!
//! One [`MarketStore`] holds every offer, escrow, and favorites set. It is
//! passed by reference into the engine operations rather than living as
//! ambient global state, and it serializes as the single persisted
//! marketplace record.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::types::{Escrow, Offer};

/// Container for offers, escrows, and per-user favorites.
///
/// Containers are fixed at construction: offers and escrows are ordered
/// newest-first, favorites are sets of offer ids keyed by user id. The
/// persistence layer loads and saves the whole record; the store itself
/// never touches disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketStore {
    #[serde(default)]
    pub(crate) offers: Vec<Offer>,
    #[serde(default)]
    pub(crate) escrows: Vec<Escrow>,
    #[serde(default)]
    pub(crate) favorites: HashMap<String, BTreeSet<String>>,
}

impl MarketStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// All offers, newest first.
    pub fn offers(&self) -> &[Offer] {
        &self.offers
    }

    /// All escrows, newest first.
    pub fn escrows(&self) -> &[Escrow] {
        &self.escrows
    }

    /// Look up an offer by id.
    pub fn offer(&self, id: &str) -> Option<&Offer> {
        self.offers.iter().find(|o| o.id == id)
    }

    /// Look up an escrow by id.
    pub fn escrow(&self, id: &str) -> Option<&Escrow> {
        self.escrows.iter().find(|e| e.id == id)
    }

    pub(crate) fn offer_mut(&mut self, id: &str) -> Option<&mut Offer> {
        self.offers.iter_mut().find(|o| o.id == id)
    }

    pub(crate) fn escrow_mut(&mut self, id: &str) -> Option<&mut Escrow> {
        self.escrows.iter_mut().find(|e| e.id == id)
    }
}
