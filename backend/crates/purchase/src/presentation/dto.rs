//! Purchase DTOs
//!
//! Requests use the camelCase field names existing clients send;
//! responses are snake_case.

use chrono::{DateTime, Utc};
use kernel::id::TraderId;
use kernel::{AccountAddress, TokenAmount};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entity::purchase_order::PurchaseOrder;
use crate::domain::value_object::order_state::OrderState;
use crate::domain::view::{Party, PurchaseOrderView};
use crate::error::PurchaseError;

/// `rewards` arrives either as a JSON number or a numeric string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(u64),
    Text(String),
}

impl AmountInput {
    pub fn value(&self) -> Result<u64, PurchaseError> {
        match self {
            AmountInput::Number(n) => Ok(*n),
            AmountInput::Text(s) => s
                .trim()
                .parse::<u64>()
                .map_err(|_| PurchaseError::InvalidRewards(format!("'{s}' is not a whole number"))),
        }
    }
}

impl Default for AmountInput {
    fn default() -> Self {
        AmountInput::Number(0)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    pub buyer: String,
    pub listing: String,
    pub verifier: Option<String>,
    #[serde(default)]
    pub rewards: AmountInput,
    pub create_block: u64,
    pub buyer_auth: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub item: String,
    pub verifier_auth: String,
}

#[derive(Debug, Deserialize)]
pub struct CloseRequest {
    pub id: String,
    /// Signed settlement transaction, `0x` hex
    pub data: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub buyer: Option<String>,
    pub seller: Option<String>,
    pub verifier: Option<String>,
}

/// Order fields shared by the plain and the joined representation
#[derive(Debug, Serialize)]
pub struct OrderFields {
    pub id: Uuid,
    pub create_block: u64,
    pub rewards: TokenAmount,
    pub buyer_auth: String,
    pub verifier_auth: Option<String>,
    pub needs_verification: bool,
    pub needs_closure: bool,
    pub settled_block: Option<u64>,
    pub state: OrderState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&PurchaseOrder> for OrderFields {
    fn from(order: &PurchaseOrder) -> Self {
        Self {
            id: order.order_id.into_uuid(),
            create_block: order.create_block,
            rewards: order.rewards,
            buyer_auth: order.buyer_auth.as_str().to_string(),
            verifier_auth: order.verifier_auth.as_ref().map(|a| a.as_str().to_string()),
            needs_verification: order.needs_verification,
            needs_closure: order.needs_closure,
            settled_block: order.settled_block,
            state: order.state(),
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

/// Order with its references as ids
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    #[serde(flatten)]
    pub fields: OrderFields,
    pub buyer: Uuid,
    pub listing: Uuid,
    pub verifier: Option<Uuid>,
}

impl From<&PurchaseOrder> for OrderResponse {
    fn from(order: &PurchaseOrder) -> Self {
        Self {
            fields: OrderFields::from(order),
            buyer: order.buyer_id.into_uuid(),
            listing: order.listing_id.into_uuid(),
            verifier: order.verifier_id.map(|id| id.into_uuid()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CloseResponse {
    /// Block of the settlement receipt
    pub create_block: u64,
    pub purchase: OrderResponse,
}

#[derive(Debug, Serialize)]
pub struct PartyResponse {
    pub id: Uuid,
    pub name: String,
    pub account: AccountAddress,
}

impl From<&Party> for PartyResponse {
    fn from(party: &Party) -> Self {
        Self {
            id: party.trader_id.into_uuid(),
            name: party.name.clone(),
            account: party.account.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListingSummaryResponse {
    pub id: Uuid,
    pub name: String,
    pub size: u64,
    pub price: TokenAmount,
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cid: Option<String>,
    pub owner: PartyResponse,
}

#[derive(Debug, Serialize)]
pub struct OrderViewResponse {
    #[serde(flatten)]
    pub fields: OrderFields,
    pub listing: ListingSummaryResponse,
    pub buyer: PartyResponse,
    pub verifier: Option<PartyResponse>,
}

impl OrderViewResponse {
    /// The content id is shown to order participants only
    pub fn for_viewer(view: &PurchaseOrderView, viewer: TraderId) -> Self {
        let cid = view
            .is_participant(viewer)
            .then(|| view.listing.cid.clone());

        Self {
            fields: OrderFields::from(&view.order),
            listing: ListingSummaryResponse {
                id: view.listing.listing_id.into_uuid(),
                name: view.listing.name.clone(),
                size: view.listing.size_bytes,
                price: view.listing.price,
                category: view.listing.category.clone(),
                cid,
                owner: PartyResponse::from(&view.seller),
            },
            buyer: PartyResponse::from(&view.buyer),
            verifier: view.verifier.as_ref().map(PartyResponse::from),
        }
    }
}
