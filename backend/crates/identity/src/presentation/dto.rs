//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::AccountAddress;
use kernel::id::TraderId;
use serde::{Deserialize, Serialize};

use crate::domain::entity::trader::{Trader, TraderProfile};

#[derive(Debug, Clone, Deserialize)]
pub struct SignUpRequest {
    pub username: String,
    pub password: String,
    pub account: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Public trader record; never carries the credential hash
#[derive(Debug, Clone, Serialize)]
pub struct TraderResponse {
    pub id: TraderId,
    pub name: String,
    pub account: AccountAddress,
    pub created_at: DateTime<Utc>,
}

impl From<TraderProfile> for TraderResponse {
    fn from(profile: TraderProfile) -> Self {
        Self {
            id: profile.trader_id,
            name: profile.name,
            account: profile.account,
            created_at: profile.created_at,
        }
    }
}

impl From<&Trader> for TraderResponse {
    fn from(trader: &Trader) -> Self {
        trader.profile().into()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub trader: TraderResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct MeResponse {
    pub trader: TraderResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
