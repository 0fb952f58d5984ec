//! Purchase Order Entity
//!
//! ## 不変条件
//! - `needs_verification` は検証者が指定された場合のみ true で作成され、
//!   Verify によって一度だけ false になる
//! - `needs_closure` は常に true で作成され、決済成功時に一度だけ false になる
//! - `needs_closure == false` になった注文は終端状態で、以後どのフィールドも変化しない
//! - 検証者がいない注文の `rewards` は 0

use chrono::{DateTime, Utc};
use kernel::TokenAmount;
use kernel::id::{ListingId, PurchaseOrderId, TraderId};

use crate::domain::value_object::authorization::Authorization;
use crate::domain::value_object::order_state::OrderState;
use crate::error::{PurchaseError, PurchaseResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseOrder {
    pub order_id: PurchaseOrderId,
    pub buyer_id: TraderId,
    pub listing_id: ListingId,
    pub verifier_id: Option<TraderId>,
    /// Block at which the buyer opened the payment channel
    pub create_block: u64,
    pub rewards: TokenAmount,
    pub buyer_auth: Authorization,
    pub verifier_auth: Option<Authorization>,
    pub needs_verification: bool,
    pub needs_closure: bool,
    /// Block of the settlement receipt
    pub settled_block: Option<u64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated inputs of a new order
pub struct NewPurchaseOrder {
    pub buyer_id: TraderId,
    pub listing_id: ListingId,
    pub verifier_id: Option<TraderId>,
    pub create_block: u64,
    pub rewards: TokenAmount,
    pub buyer_auth: Authorization,
}

impl PurchaseOrder {
    pub fn new(input: NewPurchaseOrder) -> Self {
        let now = Utc::now();
        let needs_verification = input.verifier_id.is_some();

        Self {
            order_id: PurchaseOrderId::new(),
            buyer_id: input.buyer_id,
            listing_id: input.listing_id,
            verifier_id: input.verifier_id,
            create_block: input.create_block,
            rewards: if needs_verification {
                input.rewards
            } else {
                TokenAmount::ZERO
            },
            buyer_auth: input.buyer_auth,
            verifier_auth: None,
            needs_verification,
            needs_closure: true,
            settled_block: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn state(&self) -> OrderState {
        OrderState::from_flags(self.needs_verification, self.needs_closure)
    }

    pub fn ensure_verifiable(&self) -> PurchaseResult<()> {
        if !self.needs_verification {
            return Err(PurchaseError::VerificationNotRequired);
        }
        if !self.needs_closure {
            return Err(PurchaseError::AlreadyClosed);
        }
        Ok(())
    }

    pub fn ensure_closeable(&self) -> PurchaseResult<()> {
        if self.needs_verification {
            return Err(PurchaseError::NeedsVerification);
        }
        if !self.needs_closure {
            return Err(PurchaseError::AlreadyClosed);
        }
        Ok(())
    }

    /// PENDING_VERIFICATION → READY_TO_CLOSE
    pub fn record_verification(
        &mut self,
        verifier_auth: Authorization,
        now: DateTime<Utc>,
    ) -> PurchaseResult<()> {
        self.ensure_verifiable()?;
        self.verifier_auth = Some(verifier_auth);
        self.needs_verification = false;
        self.updated_at = now;
        Ok(())
    }

    /// READY_TO_CLOSE → CLOSED
    pub fn record_settlement(&mut self, settled_block: u64, now: DateTime<Utc>) -> PurchaseResult<()> {
        self.ensure_closeable()?;
        self.needs_closure = false;
        self.settled_block = Some(settled_block);
        self.updated_at = now;
        Ok(())
    }
}
