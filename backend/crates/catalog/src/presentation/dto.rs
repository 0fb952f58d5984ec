//! Catalog DTOs

use chrono::{DateTime, Utc};
use kernel::{AccountAddress, TokenAmount};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entity::listing::{Listing, ListingOwner, ListingWithOwner};

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub price: u64,
    pub name: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListingsQuery {
    pub owner: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    #[serde(alias = "CID")]
    pub cid: String,
}

#[derive(Debug, Serialize)]
pub struct OwnerResponse {
    pub id: Uuid,
    pub name: String,
    pub account: AccountAddress,
}

impl From<&ListingOwner> for OwnerResponse {
    fn from(owner: &ListingOwner) -> Self {
        Self {
            id: owner.trader_id.into_uuid(),
            name: owner.name.clone(),
            account: owner.account.clone(),
        }
    }
}

/// Listing as returned to clients
///
/// `cid` is only filled in for the uploader's own response.
#[derive(Debug, Serialize)]
pub struct ListingResponse {
    pub id: Uuid,
    pub name: String,
    pub size: u64,
    pub price: TokenAmount,
    pub category: Option<String>,
    pub owner: OwnerResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cid: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ListingResponse {
    fn build(listing: &Listing, owner: &ListingOwner, cid: Option<String>) -> Self {
        Self {
            id: listing.listing_id.into_uuid(),
            name: listing.name.clone(),
            size: listing.size_bytes,
            price: listing.price,
            category: listing.category.clone(),
            owner: OwnerResponse::from(owner),
            cid,
            created_at: listing.created_at,
        }
    }

    /// Public view
    pub fn public(view: &ListingWithOwner) -> Self {
        Self::build(&view.listing, &view.owner, None)
    }

    /// The uploader's view, including the content id
    pub fn owned(listing: &Listing, owner: &ListingOwner) -> Self {
        Self::build(listing, owner, Some(listing.cid.to_string()))
    }
}
