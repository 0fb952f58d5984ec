//! Ledger DTOs
//!
//! 128-bit quantities are rendered as decimal strings; JSON numbers lose
//! precision past 2^53 in most clients.

use kernel::AccountAddress;
use serde::{Deserialize, Serialize};

use crate::application::{AccountBalance, ChainInfo};
use crate::domain::receipt::TransactionReceipt;

#[derive(Debug, Deserialize)]
pub struct BalanceQuery {
    pub account: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawTxRequest {
    pub data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainInfoResponse {
    pub gas_price: String,
    pub chain_id: u64,
    pub token_contract: Option<AccountAddress>,
}

impl From<ChainInfo> for ChainInfoResponse {
    fn from(info: ChainInfo) -> Self {
        Self {
            gas_price: info.gas_price.to_string(),
            chain_id: info.chain_id,
            token_contract: info.token_contract,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub balance: String,
    pub eth: String,
}

impl From<AccountBalance> for BalanceResponse {
    fn from(balance: AccountBalance) -> Self {
        Self {
            balance: balance.token.to_string(),
            eth: balance.native.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NonceResponse {
    pub nonce: u64,
}

/// Receipt fields plus `create_block`, which older clients read
#[derive(Debug, Serialize)]
pub struct RawTxResponse {
    #[serde(flatten)]
    pub receipt: TransactionReceipt,
    pub create_block: u64,
}

impl From<TransactionReceipt> for RawTxResponse {
    fn from(receipt: TransactionReceipt) -> Self {
        let create_block = receipt.block_number;
        Self {
            receipt,
            create_block,
        }
    }
}
