//! Core types for the marketplace.
//!
//! These types model offers, escrows (bookings with credits held in them),
//! chat messages, and reviews.
//!
//! With the `typescript` feature enabled, these types can be exported to
//! TypeScript using ts-rs for consistency with the web frontend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Lifecycle status of an escrow.
///
/// `Locked → Accepted → Released`, with `Cancelled` reachable from `Locked`
/// or `Accepted` but never from `Released`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum EscrowStatus {
    /// Credits debited from the buyer and held; waiting for both parties to accept
    Locked,
    /// Both parties accepted; work may begin
    Accepted,
    /// Both parties confirmed completion; credits paid to the provider
    Released,
    /// Booking cancelled; credits refunded to the buyer
    Cancelled,
}

impl EscrowStatus {
    /// Check if this status is terminal (funds already settled).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Released | Self::Cancelled)
    }
}

/// Which side of a booking a participant is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum Party {
    Buyer,
    Provider,
}

/// A published service offer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Offer {
    /// Unique identifier
    pub id: String,
    /// Providing user's id
    pub user_id: String,
    /// Providing user's display name at publish time
    pub user_name: String,
    /// Short title
    pub title: String,
    /// Longer description
    pub desc: String,
    /// Category slug (falls back to "other")
    pub category: String,
    /// Reference price in GBP per hour
    pub gbp_per_hour: u32,
    /// Derived price in credits per hour, re-derived on every rate edit
    pub credits_per_hour: u32,
    /// Number of reviews contributing to the aggregate
    #[serde(default)]
    pub rating_count: u32,
    /// Mean review rating, rounded to 2 decimals (0.0 when unrated)
    #[serde(default)]
    pub rating_avg: f32,
    /// When the offer was published
    pub created_at: DateTime<Utc>,
}

/// Input for publishing a new offer.
#[derive(Debug, Clone)]
pub struct OfferDraft {
    pub user_id: String,
    pub user_name: String,
    pub title: String,
    pub desc: String,
    /// Category slug; `None` or empty becomes "other"
    pub category: Option<String>,
    pub gbp_per_hour: u32,
}

/// Patch for provider edits to an existing offer.
///
/// Only the fields a provider may change. The credits rate is never patched
/// directly; it is re-derived whenever the GBP rate changes.
#[derive(Debug, Clone, Default)]
pub struct OfferPatch {
    pub title: Option<String>,
    pub desc: Option<String>,
    pub gbp_per_hour: Option<u32>,
    pub category: Option<String>,
}

/// A chat message attached to an escrow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct ChatMessage {
    /// Unique identifier
    pub id: String,
    /// Sending user's id
    pub sender_id: String,
    /// Sending user's display name at send time
    pub sender_name: String,
    /// Trimmed message text
    pub text: String,
    /// When the message was sent
    pub sent_at: DateTime<Utc>,
}

/// A review left by the buyer after release.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Review {
    /// Rating, clamped to 1..=5
    pub rating: u8,
    /// Trimmed review text
    pub text: String,
    /// Reviewing user's id (always the buyer)
    pub reviewer_id: String,
    /// When the review was left
    pub created_at: DateTime<Utc>,
}

/// A booking with credits held in escrow.
///
/// Created in `Locked` with the buyer already debited; terminates in
/// `Released` (provider paid exactly once) or `Cancelled` (buyer refunded
/// exactly once). Never deleted; history stays queryable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Escrow {
    /// Unique identifier
    pub id: String,
    /// The booked offer
    pub offer_id: String,
    /// Buying user's id
    pub buyer_id: String,
    /// Providing user's id
    pub provider_id: String,
    /// Hours booked (at least 1)
    pub hours: u32,
    /// Credits locked at booking time (hours x offer rate)
    pub amount_credits: u32,
    /// Lifecycle status
    pub status: EscrowStatus,
    /// Buyer accepted the booking (true from creation)
    pub accept_buyer: bool,
    /// Provider accepted the booking
    pub accept_provider: bool,
    /// Buyer confirmed completion
    #[serde(default)]
    pub done_buyer: bool,
    /// Provider confirmed completion
    #[serde(default)]
    pub done_provider: bool,
    /// Guard: provider payout fired (at most once per escrow)
    #[serde(default)]
    pub payout_done: bool,
    /// Guard: buyer refund fired (at most once per escrow)
    #[serde(default)]
    pub refund_done: bool,
    /// Optional reason recorded at cancellation
    #[serde(default)]
    pub cancel_reason: Option<String>,
    /// Free-text session notes
    #[serde(default)]
    pub session_desc: String,
    /// GBP rate snapshot from the offer at booking time
    pub gbp_per_hour: u32,
    /// Buyer review, attachable once after release
    #[serde(default)]
    pub review: Option<Review>,
    /// Append-only chat log
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    /// Messages the buyer has not yet read
    #[serde(default)]
    pub unread_by_buyer: u32,
    /// Messages the provider has not yet read
    #[serde(default)]
    pub unread_by_provider: u32,
    /// When the booking was created
    pub created_at: DateTime<Utc>,
}

impl Escrow {
    /// Which side of the booking a user is on, if either.
    pub fn side_of(&self, user_id: &str) -> Option<Party> {
        if user_id == self.buyer_id {
            Some(Party::Buyer)
        } else if user_id == self.provider_id {
            Some(Party::Provider)
        } else {
            None
        }
    }

    /// Unread message count for one side.
    pub fn unread_for(&self, party: Party) -> u32 {
        match party {
            Party::Buyer => self.unread_by_buyer,
            Party::Provider => self.unread_by_provider,
        }
    }

    /// Derive the booking progress row.
    ///
    /// Purely computed from the escrow; the first step that is not done is
    /// marked current. Cancelled bookings have no current step.
    pub fn booking_steps(&self) -> Vec<StepState> {
        let done = [
            (BookingStep::Requested, true),
            (
                BookingStep::Accepted,
                self.accept_buyer && self.accept_provider,
            ),
            (BookingStep::Delivered, self.done_provider),
            (BookingStep::Released, self.status == EscrowStatus::Released),
        ];

        let current = if self.status == EscrowStatus::Cancelled {
            None
        } else {
            done.iter().find(|(_, d)| !d).map(|(s, _)| *s)
        };

        done.iter()
            .map(|(step, done)| StepState {
                step: *step,
                done: *done,
                current: current == Some(*step),
            })
            .collect()
    }
}

/// Stages of the booking progress row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum BookingStep {
    Requested,
    Accepted,
    Delivered,
    Released,
}

/// One entry of the derived progress row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct StepState {
    pub step: BookingStep,
    pub done: bool,
    pub current: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_escrow() -> Escrow {
        Escrow {
            id: "e1".to_string(),
            offer_id: "o1".to_string(),
            buyer_id: "buyer".to_string(),
            provider_id: "provider".to_string(),
            hours: 2,
            amount_credits: 8,
            status: EscrowStatus::Locked,
            accept_buyer: true,
            accept_provider: false,
            done_buyer: false,
            done_provider: false,
            payout_done: false,
            refund_done: false,
            cancel_reason: None,
            session_desc: String::new(),
            gbp_per_hour: 40,
            review: None,
            messages: Vec::new(),
            unread_by_buyer: 0,
            unread_by_provider: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(EscrowStatus::Released.is_terminal());
        assert!(EscrowStatus::Cancelled.is_terminal());
        assert!(!EscrowStatus::Locked.is_terminal());
        assert!(!EscrowStatus::Accepted.is_terminal());
    }

    #[test]
    fn test_side_of() {
        let e = bare_escrow();
        assert_eq!(e.side_of("buyer"), Some(Party::Buyer));
        assert_eq!(e.side_of("provider"), Some(Party::Provider));
        assert_eq!(e.side_of("stranger"), None);
    }

    #[test]
    fn test_booking_steps_current_is_first_not_done() {
        let mut e = bare_escrow();
        let steps = e.booking_steps();
        assert!(steps[0].done);
        assert!(steps[1].current);

        e.accept_provider = true;
        e.status = EscrowStatus::Accepted;
        let steps = e.booking_steps();
        assert!(steps[1].done);
        assert!(steps[2].current);
    }

    #[test]
    fn test_booking_steps_cancelled_has_no_current() {
        let mut e = bare_escrow();
        e.status = EscrowStatus::Cancelled;
        assert!(e.booking_steps().iter().all(|s| !s.current));
    }
}
