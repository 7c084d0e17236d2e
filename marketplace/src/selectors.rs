//! Derived views over the marketplace state.
//!
//! Stateless queries for the UI layer: funds at risk, review listings, and
//! per-user favorites. Nothing here mutates escrows or ledger balances
//! except the favorites toggle, which only flips set membership.

use crate::store::MarketStore;
use crate::types::{EscrowStatus, Offer, Review};

impl MarketStore {
    /// Credits a buyer has locked in non-terminal escrows.
    ///
    /// Rendered separately from the spendable balance as "funds at risk".
    pub fn pending_for_buyer(&self, user_id: &str) -> u32 {
        self.escrows
            .iter()
            .filter(|e| e.buyer_id == user_id && !e.status.is_terminal())
            .map(|e| e.amount_credits)
            .sum()
    }

    /// Reviews attached to released escrows of an offer, newest first.
    pub fn reviews_for_offer(&self, offer_id: &str) -> Vec<&Review> {
        let mut reviews: Vec<&Review> = self
            .escrows
            .iter()
            .filter(|e| e.offer_id == offer_id && e.status == EscrowStatus::Released)
            .filter_map(|e| e.review.as_ref())
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        reviews
    }

    /// Flip an offer in or out of a user's favorites.
    pub fn toggle_favorite(&mut self, user_id: &str, offer_id: &str) {
        if user_id.is_empty() || offer_id.is_empty() {
            return;
        }
        let set = self.favorites.entry(user_id.to_string()).or_default();
        if !set.remove(offer_id) {
            set.insert(offer_id.to_string());
        }
    }

    /// Check favorite membership.
    pub fn is_favorite(&self, user_id: &str, offer_id: &str) -> bool {
        self.favorites
            .get(user_id)
            .map(|set| set.contains(offer_id))
            .unwrap_or(false)
    }

    /// A user's favorited offers.
    ///
    /// Ids with no matching offer render as nothing rather than erroring.
    pub fn favorites_for(&self, user_id: &str) -> Vec<&Offer> {
        let Some(ids) = self.favorites.get(user_id) else {
            return Vec::new();
        };
        self.offers.iter().filter(|o| ids.contains(&o.id)).collect()
    }
}
