//! History projection views

use chrono::{DateTime, Utc};
use kernel::id::{ListingId, TraderId};
use kernel::{AccountAddress, TokenAmount};

use crate::domain::entity::purchase_order::PurchaseOrder;

/// Public identity of a trader taking part in an order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Party {
    pub trader_id: TraderId,
    pub name: String,
    pub account: AccountAddress,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingSummary {
    pub listing_id: ListingId,
    pub name: String,
    pub cid: String,
    pub size_bytes: u64,
    pub price: TokenAmount,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An order joined with its listing, the listing owner, buyer and verifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseOrderView {
    pub order: PurchaseOrder,
    pub listing: ListingSummary,
    pub seller: Party,
    pub buyer: Party,
    pub verifier: Option<Party>,
}

impl PurchaseOrderView {
    /// Buyer, seller and verifier may see the content id
    pub fn is_participant(&self, trader_id: TraderId) -> bool {
        self.buyer.trader_id == trader_id
            || self.seller.trader_id == trader_id
            || self.verifier.as_ref().is_some_and(|v| v.trader_id == trader_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryFilter {
    Buyer(AccountAddress),
    /// Listing owner
    Seller(AccountAddress),
    Verifier(AccountAddress),
}

impl HistoryFilter {
    /// Pick one filter; buyer wins over seller, seller over verifier
    pub fn from_query(
        buyer: Option<&str>,
        seller: Option<&str>,
        verifier: Option<&str>,
    ) -> Result<Option<Self>, kernel::AccountAddressError> {
        let filter = if let Some(raw) = buyer {
            Some(Self::Buyer(AccountAddress::parse(raw)?))
        } else if let Some(raw) = seller {
            Some(Self::Seller(AccountAddress::parse(raw)?))
        } else if let Some(raw) = verifier {
            Some(Self::Verifier(AccountAddress::parse(raw)?))
        } else {
            None
        };
        Ok(filter)
    }

    pub fn matches(&self, view: &PurchaseOrderView) -> bool {
        match self {
            HistoryFilter::Buyer(account) => &view.buyer.account == account,
            HistoryFilter::Seller(account) => &view.seller.account == account,
            HistoryFilter::Verifier(account) => {
                view.verifier.as_ref().is_some_and(|v| &v.account == account)
            }
        }
    }
}
