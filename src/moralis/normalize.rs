//! Renames upstream records into the compact schema served to frontends.
//!
//! Upstream is not consistent about naming, so every output field is resolved
//! from a priority-ordered list of upstream keys: the first key that is present
//! and not `null` wins. A missing field stays `null` in the output; nothing is
//! computed or synthesized. The lists are:
//!
//! | output      | transactions      | erc20 transfers                   | internal transactions       |
//! |-------------|-------------------|-----------------------------------|-----------------------------|
//! | `hash`      | `hash`            | `transaction_hash`, `hash`        | `transaction_hash`, `hash`  |
//! | `from`      | `from_address`    | `from_address`                    | `from`, `from_address`      |
//! | `to`        | `to_address`      | `to_address`                      | `to`, `to_address`          |
//! | `value`     | `value`           | `value`                           | `value`                     |
//! | `input`     | `input`           |                                   |                             |
//! | `token`     |                   | `address`, `token_address`        |                             |
//! | `symbol`    |                   | `token_symbol`, `symbol`          |                             |
//! | `decimals`  |                   | `token_decimals`, `decimals`      |                             |
//! | `block`     | `block_number`    | `block_number`                    | `block_number`              |
//! | `ts`        | `block_timestamp` | `block_timestamp`                 | `block_timestamp`           |
//! | `gas`       | `gas`             |                                   |                             |
//! | `gasPrice`  | `gas_price`       |                                   |                             |
//! | `status`    | `receipt_status`  |                                   |                             |
//!
//! Records themselves are read from `result`, falling back to `items`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Keys that may hold the record list, in priority order.
pub const RECORD_KEYS: &[&str] = &["result", "items"];

mod tx_keys {
    pub const HASH: &[&str] = &["hash"];
    pub const FROM: &[&str] = &["from_address"];
    pub const TO: &[&str] = &["to_address"];
    pub const VALUE: &[&str] = &["value"];
    pub const INPUT: &[&str] = &["input"];
    pub const BLOCK: &[&str] = &["block_number"];
    pub const TS: &[&str] = &["block_timestamp"];
    pub const GAS: &[&str] = &["gas"];
    pub const GAS_PRICE: &[&str] = &["gas_price"];
    pub const STATUS: &[&str] = &["receipt_status"];
}

mod erc20_keys {
    pub const HASH: &[&str] = &["transaction_hash", "hash"];
    pub const FROM: &[&str] = &["from_address"];
    pub const TO: &[&str] = &["to_address"];
    pub const VALUE: &[&str] = &["value"];
    pub const TOKEN: &[&str] = &["address", "token_address"];
    pub const SYMBOL: &[&str] = &["token_symbol", "symbol"];
    pub const DECIMALS: &[&str] = &["token_decimals", "decimals"];
    pub const BLOCK: &[&str] = &["block_number"];
    pub const TS: &[&str] = &["block_timestamp"];
}

mod internal_keys {
    pub const HASH: &[&str] = &["transaction_hash", "hash"];
    pub const FROM: &[&str] = &["from", "from_address"];
    pub const TO: &[&str] = &["to", "to_address"];
    pub const VALUE: &[&str] = &["value"];
    pub const BLOCK: &[&str] = &["block_number"];
    pub const TS: &[&str] = &["block_timestamp"];
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedTransaction {
    pub hash: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub value: Option<String>,
    /// Raw call data, left for the consumer to decode.
    pub input: Option<String>,
    pub block: Option<String>,
    pub ts: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizedTransfer {
    pub hash: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub value: Option<String>,
    pub token: Option<String>,
    pub symbol: Option<String>,
    pub decimals: Option<String>,
    pub ts: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizedInternal {
    pub hash: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub value: Option<String>,
    pub ts: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<String>,
}

impl From<&Value> for NormalizedTransaction {
    fn from(record: &Value) -> Self {
        Self {
            hash: resolve(record, tx_keys::HASH),
            from: resolve(record, tx_keys::FROM),
            to: resolve(record, tx_keys::TO),
            value: resolve(record, tx_keys::VALUE),
            input: resolve(record, tx_keys::INPUT),
            block: resolve(record, tx_keys::BLOCK),
            ts: resolve(record, tx_keys::TS),
            gas: resolve(record, tx_keys::GAS),
            gas_price: resolve(record, tx_keys::GAS_PRICE),
            status: resolve(record, tx_keys::STATUS),
        }
    }
}

impl From<&Value> for NormalizedTransfer {
    fn from(record: &Value) -> Self {
        Self {
            hash: resolve(record, erc20_keys::HASH),
            from: resolve(record, erc20_keys::FROM),
            to: resolve(record, erc20_keys::TO),
            value: resolve(record, erc20_keys::VALUE),
            token: resolve(record, erc20_keys::TOKEN),
            symbol: resolve(record, erc20_keys::SYMBOL),
            decimals: resolve(record, erc20_keys::DECIMALS),
            ts: resolve(record, erc20_keys::TS),
            block: resolve(record, erc20_keys::BLOCK),
        }
    }
}

impl From<&Value> for NormalizedInternal {
    fn from(record: &Value) -> Self {
        Self {
            hash: resolve(record, internal_keys::HASH),
            from: resolve(record, internal_keys::FROM),
            to: resolve(record, internal_keys::TO),
            value: resolve(record, internal_keys::VALUE),
            ts: resolve(record, internal_keys::TS),
            block: resolve(record, internal_keys::BLOCK),
        }
    }
}

/// The record list of an upstream page, or an empty slice.
pub fn records(body: &Value) -> &[Value] {
    RECORD_KEYS
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_array))
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Normalizes every record of an upstream page, keeping upstream order.
pub fn normalize<T>(body: &Value) -> Vec<T>
where
    T: for<'a> From<&'a Value>,
{
    records(body).iter().map(T::from).collect()
}

fn resolve(record: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| record.get(key))
        .find_map(as_text)
}

/// Upstream mixes strings and numbers for the same field across chains.
fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}
