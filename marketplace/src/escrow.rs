//! The escrow engine.
//!
//! Every booking moves through `Locked → Accepted → Released`, or out to
//! `Cancelled` while no delivery work has started. Credits are debited from
//! the buyer when the escrow is created and held until settlement; the
//! `payout_done` and `refund_done` guards make payout and refund each fire
//! at most once regardless of duplicate calls.
//!
//! Operations report failure as values. Unknown ids and unaffordable
//! amounts come back as errors the caller can render inline; transition
//! attempts the UI prevents by construction (double accept, cancel of a
//! settled booking, second review) are no-ops that leave state unchanged.

use chrono::Utc;

use crate::ledger::CreditLedger;
use crate::store::MarketStore;
use crate::types::{ChatMessage, Escrow, EscrowStatus, Party, Review};

/// Error types for escrow operations.
#[derive(Debug, thiserror::Error)]
pub enum EscrowError {
    /// Escrow not found
    #[error("Escrow not found: {0}")]
    EscrowNotFound(String),

    /// Offer not found
    #[error("Offer not found: {0}")]
    OfferNotFound(String),

    /// Buyer cannot afford the booking or the amendment
    #[error("Insufficient balance: {need} more credits required")]
    InsufficientBalance {
        /// Credits required to proceed
        need: u32,
    },

    /// Operation not valid in the escrow's current state
    #[error("Invalid transition: {0}")]
    InvalidTransition(&'static str),
}

/// Input for creating an escrow.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub offer_id: String,
    pub buyer_id: String,
    /// Hours to book; floored to 1
    pub hours: u32,
}

/// Input for appending a chat message.
#[derive(Debug, Clone)]
pub struct MessageDraft {
    pub sender_id: String,
    pub sender_name: String,
    pub text: String,
}

/// Input for leaving a review.
#[derive(Debug, Clone)]
pub struct ReviewDraft {
    /// Rating; clamped to 1..=5
    pub rating: u8,
    pub text: String,
    pub reviewer_id: String,
}

impl MarketStore {
    /// Create a booking and lock the buyer's credits.
    ///
    /// The booking UI checks affordability before calling; the engine
    /// rechecks defensively and debits the buyer through the ledger before
    /// the escrow exists, so credits are held rather than merely reserved.
    pub fn create_escrow(
        &mut self,
        req: BookingRequest,
        ledger: &mut dyn CreditLedger,
    ) -> Result<&Escrow, EscrowError> {
        let offer = self
            .offer(&req.offer_id)
            .ok_or_else(|| EscrowError::OfferNotFound(req.offer_id.clone()))?;

        let hours = req.hours.max(1);
        let rate = offer.credits_per_hour.max(1);
        let amount = hours * rate;
        let provider_id = offer.user_id.clone();
        let gbp_per_hour = offer.gbp_per_hour;

        let balance = ledger.balance(&req.buyer_id);
        if balance < amount {
            return Err(EscrowError::InsufficientBalance { need: amount });
        }
        ledger.debit(&req.buyer_id, amount);

        let escrow = Escrow {
            id: uuid::Uuid::new_v4().to_string(),
            offer_id: req.offer_id,
            buyer_id: req.buyer_id,
            provider_id,
            hours,
            amount_credits: amount,
            status: EscrowStatus::Locked,
            accept_buyer: true,
            accept_provider: false,
            done_buyer: false,
            done_provider: false,
            payout_done: false,
            refund_done: false,
            cancel_reason: None,
            session_desc: String::new(),
            gbp_per_hour,
            review: None,
            messages: Vec::new(),
            unread_by_buyer: 0,
            unread_by_provider: 0,
            created_at: Utc::now(),
        };

        tracing::debug!(escrow_id = %escrow.id, amount, "credits locked in escrow");
        self.escrows.insert(0, escrow);
        Ok(&self.escrows[0])
    }

    /// Record a party's acceptance of the booking.
    ///
    /// Once both sides have accepted, a locked escrow becomes `Accepted`.
    /// Accepting twice is a no-op; settled bookings are left untouched.
    pub fn accept_escrow(&mut self, id: &str, who: Party) -> Result<(), EscrowError> {
        let escrow = self
            .escrow_mut(id)
            .ok_or_else(|| EscrowError::EscrowNotFound(id.to_string()))?;

        if escrow.status.is_terminal() {
            return Ok(());
        }

        match who {
            Party::Buyer => escrow.accept_buyer = true,
            Party::Provider => escrow.accept_provider = true,
        }

        if escrow.accept_buyer && escrow.accept_provider && escrow.status == EscrowStatus::Locked {
            escrow.status = EscrowStatus::Accepted;
        }

        Ok(())
    }

    /// Change the booked hours while the escrow is still locked.
    ///
    /// Only the buyer may amend, and only before acceptance completes. The
    /// amount is recomputed at the offer's current rate and the signed
    /// difference settles through the ledger: an increase debits the buyer
    /// (after an affordability check), a decrease refunds the difference.
    pub fn amend_escrow(
        &mut self,
        id: &str,
        caller_id: &str,
        new_hours: u32,
        ledger: &mut dyn CreditLedger,
    ) -> Result<(), EscrowError> {
        let escrow = self
            .escrow(id)
            .ok_or_else(|| EscrowError::EscrowNotFound(id.to_string()))?;

        if escrow.status != EscrowStatus::Locked || escrow.buyer_id != caller_id {
            return Err(EscrowError::InvalidTransition(
                "only pending bookings can be edited by the buyer",
            ));
        }

        let rate = self
            .offer(&escrow.offer_id)
            .map(|o| o.credits_per_hour)
            .unwrap_or(1)
            .max(1);
        let hours = new_hours.max(1);
        let new_amount = hours * rate;
        let buyer_id = escrow.buyer_id.clone();
        let old_amount = escrow.amount_credits;

        if new_amount > old_amount {
            let delta = new_amount - old_amount;
            if ledger.balance(&buyer_id) < delta {
                return Err(EscrowError::InsufficientBalance { need: delta });
            }
            ledger.debit(&buyer_id, delta);
        } else if new_amount < old_amount {
            ledger.credit(&buyer_id, old_amount - new_amount);
        }

        // Lookups above keep the borrow short; re-fetch to mutate.
        if let Some(escrow) = self.escrow_mut(id) {
            escrow.hours = hours;
            escrow.amount_credits = new_amount;
        }

        Ok(())
    }

    /// Record a party's completion confirmation.
    ///
    /// Only accepted bookings take confirmations. When both sides have
    /// confirmed and no payout has fired yet, the escrow releases and the
    /// provider is credited the locked amount exactly once.
    pub fn complete_escrow(
        &mut self,
        id: &str,
        who: Party,
        ledger: &mut dyn CreditLedger,
    ) -> Result<(), EscrowError> {
        let escrow = self
            .escrow_mut(id)
            .ok_or_else(|| EscrowError::EscrowNotFound(id.to_string()))?;

        if escrow.status != EscrowStatus::Accepted {
            return Ok(());
        }

        match who {
            Party::Buyer => escrow.done_buyer = true,
            Party::Provider => escrow.done_provider = true,
        }

        if escrow.done_buyer && escrow.done_provider && !escrow.payout_done {
            escrow.status = EscrowStatus::Released;
            escrow.payout_done = true;
            let provider_id = escrow.provider_id.clone();
            let amount = escrow.amount_credits.max(1);
            tracing::debug!(escrow_id = %id, amount, "escrow released, paying provider");
            ledger.credit(&provider_id, amount);
        }

        Ok(())
    }

    /// Cancel a booking and refund the buyer.
    ///
    /// Allowed while no delivery work has started: a locked escrow, or an
    /// accepted one with neither done flag set. The refund fires at most
    /// once; cancelling a settled booking is a no-op.
    pub fn cancel_escrow(
        &mut self,
        id: &str,
        reason: Option<&str>,
        ledger: &mut dyn CreditLedger,
    ) -> Result<(), EscrowError> {
        let escrow = self
            .escrow_mut(id)
            .ok_or_else(|| EscrowError::EscrowNotFound(id.to_string()))?;

        if escrow.status.is_terminal() || escrow.refund_done {
            return Ok(());
        }

        let work_started =
            escrow.status == EscrowStatus::Accepted && (escrow.done_buyer || escrow.done_provider);
        if work_started {
            return Ok(());
        }

        escrow.status = EscrowStatus::Cancelled;
        escrow.refund_done = true;
        escrow.cancel_reason = reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(String::from);

        let buyer_id = escrow.buyer_id.clone();
        let amount = escrow.amount_credits;
        tracing::debug!(escrow_id = %id, amount, "escrow cancelled, refunding buyer");
        ledger.credit(&buyer_id, amount);

        Ok(())
    }

    /// Append a chat message and bump the other side's unread counter.
    ///
    /// Messaging stays open in every state so parties can still talk about
    /// a settled booking. Blank messages are dropped.
    pub fn add_message(&mut self, id: &str, draft: MessageDraft) -> Result<(), EscrowError> {
        let text = draft.text.trim();
        if text.is_empty() {
            return Ok(());
        }

        let escrow = self
            .escrow_mut(id)
            .ok_or_else(|| EscrowError::EscrowNotFound(id.to_string()))?;

        let from_buyer = draft.sender_id == escrow.buyer_id;
        escrow.messages.push(ChatMessage {
            id: uuid::Uuid::new_v4().to_string(),
            sender_id: draft.sender_id,
            sender_name: draft.sender_name,
            text: text.to_string(),
            sent_at: Utc::now(),
        });

        if from_buyer {
            escrow.unread_by_provider += 1;
        } else {
            escrow.unread_by_buyer += 1;
        }

        Ok(())
    }

    /// Zero the unread counter for whichever side the user is on.
    pub fn mark_chat_read(&mut self, id: &str, user_id: &str) -> Result<(), EscrowError> {
        let escrow = self
            .escrow_mut(id)
            .ok_or_else(|| EscrowError::EscrowNotFound(id.to_string()))?;

        match escrow.side_of(user_id) {
            Some(Party::Buyer) => escrow.unread_by_buyer = 0,
            Some(Party::Provider) => escrow.unread_by_provider = 0,
            None => {}
        }

        Ok(())
    }

    /// Attach the buyer's review to a released escrow.
    ///
    /// Only the buyer, only after release, only once. The rating is clamped
    /// to 1..=5 and the offer's aggregate is recomputed in full.
    pub fn add_review(&mut self, id: &str, draft: ReviewDraft) -> Result<(), EscrowError> {
        let escrow = self
            .escrow_mut(id)
            .ok_or_else(|| EscrowError::EscrowNotFound(id.to_string()))?;

        if escrow.status != EscrowStatus::Released
            || escrow.buyer_id != draft.reviewer_id
            || escrow.review.is_some()
        {
            return Ok(());
        }

        escrow.review = Some(Review {
            rating: draft.rating.clamp(1, 5),
            text: draft.text.trim().to_string(),
            reviewer_id: draft.reviewer_id,
            created_at: Utc::now(),
        });

        let offer_id = escrow.offer_id.clone();
        self.recompute_offer_rating(&offer_id);

        Ok(())
    }
}
