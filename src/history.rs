//! Fans a history request out to the three upstream listings and joins the results.

use crate::address::is_hex_address;
use crate::chains::{Chain, DEFAULT_CHAIN_KEY};
use crate::errors::HistoryError;
use crate::moralis::{
    Endpoint, MoralisClient,
    normalize::{NormalizedInternal, NormalizedTransaction, NormalizedTransfer, normalize},
};
use futures::future::join3;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// A request that passed validation: known chain, well-formed address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    /// The lowercased key the caller asked for, echoed back in the response.
    pub chain_key: String,
    pub chain: &'static Chain,
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryResponse {
    pub ok: bool,
    pub chain: String,
    pub address: String,
    pub txs: Vec<NormalizedTransaction>,
    pub erc20: Vec<NormalizedTransfer>,
    pub internals: Vec<NormalizedInternal>,
}

impl HistoryRequest {
    /// Validates raw query values. An absent or empty `chain` means
    /// [`DEFAULT_CHAIN_KEY`].
    pub fn validate(chain: Option<&str>, address: Option<&str>) -> Result<Self, HistoryError> {
        let address = match address {
            Some(address) if !address.is_empty() => address,
            _ => return Err(HistoryError::MissingAddress),
        };

        if !is_hex_address(address) {
            return Err(HistoryError::BadAddress(address.to_string()));
        }

        let chain_key = chain
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CHAIN_KEY)
            .to_ascii_lowercase();

        let chain =
            Chain::lookup(&chain_key).ok_or_else(|| HistoryError::BadChain(chain_key.clone()))?;

        Ok(Self {
            chain_key,
            chain,
            address: address.to_string(),
        })
    }
}

/// Issues all three upstream calls at once and waits for every one of them.
///
/// If any call fails the whole request fails, and every failed call is
/// reported, so a caller never receives a silently empty section.
pub async fn aggregate(
    client: &MoralisClient,
    request: &HistoryRequest,
) -> Result<HistoryResponse, HistoryError> {
    let address = request.address.as_str();
    let chain_id = request.chain.upstream_id;

    let (txs, erc20, internals) = join3(
        client.fetch(Endpoint::Transactions, address, chain_id),
        client.fetch(Endpoint::Erc20Transfers, address, chain_id),
        client.fetch(Endpoint::InternalTransactions, address, chain_id),
    )
    .await;

    match (txs, erc20, internals) {
        (Ok(txs), Ok(erc20), Ok(internals)) => {
            let response = HistoryResponse {
                ok: true,
                chain: request.chain_key.clone(),
                address: request.address.clone(),
                txs: normalize(&txs),
                erc20: normalize(&erc20),
                internals: normalize(&internals),
            };

            info!(
                chain = %response.chain,
                address = %response.address,
                txs = response.txs.len(),
                erc20 = response.erc20.len(),
                internals = response.internals.len(),
                "history served"
            );

            Ok(response)
        },
        (txs, erc20, internals) => {
            let failures: Vec<_> = [txs.err(), erc20.err(), internals.err()]
                .into_iter()
                .flatten()
                .collect();

            warn!(
                chain = %request.chain_key,
                address = %request.address,
                failed = failures.len(),
                "history request failed upstream"
            );

            Err(HistoryError::Upstream {
                chain: request.chain_key.clone(),
                address: request.address.clone(),
                failures,
            })
        },
    }
}
