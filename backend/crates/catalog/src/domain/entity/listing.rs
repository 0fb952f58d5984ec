//! Listing Entity

use chrono::{DateTime, Utc};
use kernel::id::{ListingId, TraderId};
use kernel::{AccountAddress, TokenAmount};

use crate::domain::value_object::content_id::ContentId;

/// A file offered for sale; immutable once created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub listing_id: ListingId,
    pub cid: ContentId,
    pub size_bytes: u64,
    pub name: String,
    /// Always > 0
    pub price: TokenAmount,
    pub owner_id: TraderId,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Listing {
    pub fn new(
        cid: ContentId,
        size_bytes: u64,
        name: String,
        price: TokenAmount,
        owner_id: TraderId,
        category: Option<String>,
    ) -> Self {
        Self {
            listing_id: ListingId::new(),
            cid,
            size_bytes,
            name,
            price,
            owner_id,
            category,
            created_at: Utc::now(),
        }
    }
}

/// Public fields of the listing owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingOwner {
    pub trader_id: TraderId,
    pub name: String,
    pub account: AccountAddress,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingWithOwner {
    pub listing: Listing,
    pub owner: ListingOwner,
}
