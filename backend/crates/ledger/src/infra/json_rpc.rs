//! JSON-RPC ledger client
//!
//! Speaks the standard Ethereum JSON-RPC 2.0 dialect over HTTP.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use kernel::AccountAddress;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::application::config::LedgerConfig;
use crate::domain::gateway::LedgerGateway;
use crate::domain::raw_transaction::RawTransaction;
use crate::domain::receipt::{ReceiptStatus, TransactionReceipt};
use crate::error::{LedgerError, LedgerResult};

/// `balanceOf(address)` function selector
const BALANCE_OF_SELECTOR: &str = "70a08231";

/// JSON-RPC backed [`LedgerGateway`]
pub struct JsonRpcLedger {
    client: reqwest::Client,
    config: Arc<LedgerConfig>,
    next_id: AtomicU64,
}

impl JsonRpcLedger {
    pub fn new(config: LedgerConfig) -> LedgerResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| LedgerError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            config: Arc::new(config),
            next_id: AtomicU64::new(1),
        })
    }

    async fn call<T: DeserializeOwned>(&self, method: &'static str, params: Value) -> LedgerResult<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let payload = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": id,
        });

        tracing::trace!(method, id, "JSON-RPC request");

        let resp = self
            .client
            .post(&self.config.rpc_url)
            .json(&payload)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(LedgerError::Transport(format!(
                "HTTP {} from {}",
                resp.status(),
                self.config.rpc_url
            )));
        }

        let envelope: RpcEnvelope = resp.json().await?;
        if let Some(err) = envelope.error {
            return Err(LedgerError::Rpc {
                code: err.code,
                message: err.message,
            });
        }

        serde_json::from_value(envelope.result)
            .map_err(|e| LedgerError::InvalidResponse(format!("{method}: {e}")))
    }

    async fn wait_for_receipt(&self, tx_hash: &str) -> LedgerResult<TransactionReceipt> {
        // The transaction is already broadcast: only `receipt_timeout` ends the wait
        loop {
            match self
                .call::<Option<RpcReceipt>>("eth_getTransactionReceipt", json!([tx_hash]))
                .await
            {
                Ok(Some(receipt)) => return receipt.into_receipt(),
                Ok(None) => {}
                Err(err) if err.is_transient() => {
                    tracing::warn!(tx_hash, error = %err, "Receipt poll failed, retrying");
                }
                Err(err) => return Err(err),
            }
            tokio::time::sleep(self.config.receipt_poll_interval).await;
        }
    }
}

impl LedgerGateway for JsonRpcLedger {
    async fn submit_raw_transaction(
        &self,
        tx: &RawTransaction,
    ) -> LedgerResult<TransactionReceipt> {
        let tx_hash: String = self
            .call("eth_sendRawTransaction", json!([tx.as_str()]))
            .await?;

        tracing::info!(tx_hash = %tx_hash, "Transaction broadcast, waiting for receipt");

        tokio::time::timeout(self.config.receipt_timeout, self.wait_for_receipt(&tx_hash))
            .await
            .map_err(|_| LedgerError::Timeout)?
    }

    async fn token_balance(&self, account: &AccountAddress) -> LedgerResult<u128> {
        let contract = self
            .config
            .token_contract
            .as_ref()
            .ok_or(LedgerError::TokenContractNotConfigured)?;

        let result: String = self
            .call(
                "eth_call",
                json!([
                    { "to": contract.as_str(), "data": balance_of_calldata(account) },
                    "latest"
                ]),
            )
            .await?;
        parse_quantity(&result)
    }

    async fn native_balance(&self, account: &AccountAddress) -> LedgerResult<u128> {
        let result: String = self
            .call("eth_getBalance", json!([account.as_str(), "latest"]))
            .await?;
        parse_quantity(&result)
    }

    async fn nonce(&self, account: &AccountAddress) -> LedgerResult<u64> {
        let result: String = self
            .call("eth_getTransactionCount", json!([account.as_str(), "pending"]))
            .await?;
        to_u64(parse_quantity(&result)?)
    }

    async fn gas_price(&self) -> LedgerResult<u128> {
        let result: String = self.call("eth_gasPrice", json!([])).await?;
        parse_quantity(&result)
    }

    async fn chain_id(&self) -> LedgerResult<u64> {
        let result: String = self.call("eth_chainId", json!([])).await?;
        to_u64(parse_quantity(&result)?)
    }
}

#[derive(Deserialize)]
struct RpcEnvelope {
    #[serde(default)]
    result: Value,
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcReceipt {
    transaction_hash: String,
    block_number: String,
    /// Absent on pre-Byzantium chains
    status: Option<String>,
    gas_used: String,
}

impl RpcReceipt {
    fn into_receipt(self) -> LedgerResult<TransactionReceipt> {
        // Only an explicit 1 counts as success
        let status = match self.status.as_deref().map(parse_quantity).transpose()? {
            Some(1) => ReceiptStatus::Success,
            _ => ReceiptStatus::Reverted,
        };

        Ok(TransactionReceipt {
            transaction_hash: self.transaction_hash,
            block_number: to_u64(parse_quantity(&self.block_number)?)?,
            status,
            gas_used: to_u64(parse_quantity(&self.gas_used)?)?,
        })
    }
}

/// ABI-encoded `balanceOf(account)` call data
pub fn balance_of_calldata(account: &AccountAddress) -> String {
    format!("0x{}{:0>64}", BALANCE_OF_SELECTOR, account.hex_digits())
}

/// Parse a hex quantity (`0x1a`) or a 32-byte ABI word into a `u128`
pub fn parse_quantity(raw: &str) -> LedgerResult<u128> {
    let digits = raw
        .strip_prefix("0x")
        .ok_or_else(|| LedgerError::InvalidResponse(format!("not a hex quantity: {raw}")))?;

    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        return Ok(0);
    }
    if significant.len() > 32 {
        return Err(LedgerError::InvalidResponse(format!(
            "quantity does not fit in 128 bits: {raw}"
        )));
    }

    u128::from_str_radix(significant, 16)
        .map_err(|e| LedgerError::InvalidResponse(format!("{raw}: {e}")))
}

fn to_u64(value: u128) -> LedgerResult<u64> {
    u64::try_from(value)
        .map_err(|_| LedgerError::InvalidResponse(format!("quantity {value} exceeds u64")))
}
