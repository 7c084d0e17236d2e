//! Offer catalog operations.
//!
//! Providers publish and edit offers here. The booking flow never mutates an
//! offer except through [`MarketStore::recompute_offer_rating`], which keeps
//! the rating aggregate in step with released-escrow reviews.

use chrono::Utc;

use crate::config::MarketConfig;
use crate::store::MarketStore;
use crate::types::{EscrowStatus, Offer, OfferDraft, OfferPatch};

/// Error types for catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Offer not found
    #[error("Offer not found: {0}")]
    NotFound(String),
}

fn normalize_category(category: Option<String>) -> String {
    match category {
        Some(c) if !c.trim().is_empty() => c,
        _ => "other".to_string(),
    }
}

impl MarketStore {
    /// Publish a new offer.
    ///
    /// The credits-per-hour rate is derived from the GBP rate and the offer
    /// starts unrated. Newest offers sort first.
    pub fn publish_offer(&mut self, draft: OfferDraft, config: &MarketConfig) -> &Offer {
        let offer = Offer {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: draft.user_id,
            user_name: draft.user_name,
            title: draft.title,
            desc: draft.desc,
            category: normalize_category(draft.category),
            gbp_per_hour: draft.gbp_per_hour,
            credits_per_hour: config.credits_per_hour(draft.gbp_per_hour),
            rating_count: 0,
            rating_avg: 0.0,
            created_at: Utc::now(),
        };
        self.offers.insert(0, offer);
        &self.offers[0]
    }

    /// Apply a provider edit to an offer.
    ///
    /// Changing the GBP rate re-derives the credits rate; existing escrows
    /// keep the amount they locked at booking time.
    pub fn update_offer(
        &mut self,
        id: &str,
        patch: OfferPatch,
        config: &MarketConfig,
    ) -> Result<(), CatalogError> {
        let offer = self
            .offer_mut(id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;

        if let Some(title) = patch.title {
            offer.title = title;
        }
        if let Some(desc) = patch.desc {
            offer.desc = desc;
        }
        if let Some(gbp) = patch.gbp_per_hour {
            offer.gbp_per_hour = gbp;
            offer.credits_per_hour = config.credits_per_hour(gbp);
        }
        if let Some(category) = patch.category {
            offer.category = normalize_category(Some(category));
        }

        Ok(())
    }

    /// Recompute an offer's rating aggregate from scratch.
    ///
    /// Walks every released escrow for the offer that carries a review.
    /// A full recompute on each new review avoids incremental drift.
    pub fn recompute_offer_rating(&mut self, offer_id: &str) {
        let ratings: Vec<u8> = self
            .escrows
            .iter()
            .filter(|e| e.offer_id == offer_id && e.status == EscrowStatus::Released)
            .filter_map(|e| e.review.as_ref().map(|r| r.rating))
            .collect();

        let count = ratings.len() as u32;
        let avg = if count == 0 {
            0.0
        } else {
            let mean = ratings.iter().map(|r| *r as f32).sum::<f32>() / count as f32;
            (mean * 100.0).round() / 100.0
        };

        if let Some(offer) = self.offer_mut(offer_id) {
            offer.rating_count = count;
            offer.rating_avg = avg;
        }
    }
}
