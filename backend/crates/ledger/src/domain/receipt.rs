//! Transaction receipts

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptStatus {
    Success,
    Reverted,
}

/// Outcome of a mined transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: String,
    pub block_number: u64,
    pub status: ReceiptStatus,
    pub gas_used: u64,
}

impl TransactionReceipt {
    pub fn is_success(&self) -> bool {
        self.status == ReceiptStatus::Success
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "transactionHash": self.transaction_hash,
            "blockNumber": self.block_number,
            "status": self.status,
            "gasUsed": self.gas_used,
        })
    }
}
