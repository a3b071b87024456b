use serde::Serialize;

/// Chain key used when the caller does not send one.
pub const DEFAULT_CHAIN_KEY: &str = "eth";

/// A caller-facing chain key and the identifier upstream expects for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Chain {
    pub key: &'static str,
    pub upstream_id: &'static str,
}

/// Every chain we serve. Keys are lowercase; lookups lowercase the input first.
///
/// Upstream has no symbolic name for PulseChain, so `pulse` maps to its
/// numeric chain id 369 in the hex form upstream accepts.
pub const CHAINS: &[Chain] = &[
    Chain { key: "eth", upstream_id: "eth" },
    Chain { key: "sepolia", upstream_id: "sepolia" },
    Chain { key: "polygon", upstream_id: "polygon" },
    Chain { key: "bsc", upstream_id: "bsc" },
    Chain { key: "arbitrum", upstream_id: "arbitrum" },
    Chain { key: "base", upstream_id: "base" },
    Chain { key: "optimism", upstream_id: "optimism" },
    Chain { key: "avalanche", upstream_id: "avalanche" },
    Chain { key: "pulse", upstream_id: "0x171" },
];

impl Chain {
    pub fn lookup(key: &str) -> Option<&'static Chain> {
        let key = key.to_ascii_lowercase();

        CHAINS.iter().find(|chain| chain.key == key)
    }

    pub fn keys() -> Vec<&'static str> {
        CHAINS.iter().map(|chain| chain.key).collect()
    }
}
