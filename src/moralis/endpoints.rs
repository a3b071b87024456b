use serde::{Deserialize, Serialize};
use std::fmt;

/// Sort order sent with every upstream request. Newest first.
pub const ORDER: &str = "DESC";

/// The three upstream listings fetched for one history request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    Transactions,
    Erc20Transfers,
    InternalTransactions,
}

impl Endpoint {
    pub const ALL: [Endpoint; 3] = [
        Endpoint::Transactions,
        Endpoint::Erc20Transfers,
        Endpoint::InternalTransactions,
    ];

    /// Path relative to the API base, e.g. `0xabc.../erc20/transfers`.
    pub fn path(&self, address: &str) -> String {
        match self {
            Self::Transactions => format!("{address}/transactions"),
            Self::Erc20Transfers => format!("{address}/erc20/transfers"),
            Self::InternalTransactions => format!("{address}/internal-transactions"),
        }
    }

    /// Fixed page size; we never follow cursors.
    pub fn limit(&self) -> u32 {
        match self {
            Self::Transactions => 100,
            Self::Erc20Transfers | Self::InternalTransactions => 200,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transactions => "transactions",
            Self::Erc20Transfers => "erc20_transfers",
            Self::InternalTransactions => "internal_transactions",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const ADDRESS: &str = "0xde709f2102306220921060314715629080e2fb77";

    #[rstest]
    #[case(Endpoint::Transactions, "0xde709f2102306220921060314715629080e2fb77/transactions", 100)]
    #[case(Endpoint::Erc20Transfers, "0xde709f2102306220921060314715629080e2fb77/erc20/transfers", 200)]
    #[case(
        Endpoint::InternalTransactions,
        "0xde709f2102306220921060314715629080e2fb77/internal-transactions",
        200
    )]
    fn test_path_and_limit(
        #[case] endpoint: Endpoint,
        #[case] expected_path: &str,
        #[case] expected_limit: u32,
    ) {
        assert_eq!(endpoint.path(ADDRESS), expected_path);
        assert_eq!(endpoint.limit(), expected_limit);
    }

    #[test]
    fn test_serializes_like_display() {
        for endpoint in Endpoint::ALL {
            let json = serde_json::to_value(endpoint).unwrap();
            assert_eq!(json, serde_json::Value::String(endpoint.to_string()));
        }
    }
}
