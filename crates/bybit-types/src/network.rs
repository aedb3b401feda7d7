//! Network selection and the fixed endpoint pairs

use std::fmt;

/// REST base URL for mainnet
pub const MAINNET_REST_URL: &str = "https://api.bybit.com";
/// Realtime stream URL for mainnet
pub const MAINNET_WS_URL: &str = "wss://stream.bybit.com/realtime";
/// REST base URL for testnet
pub const TESTNET_REST_URL: &str = "https://api-testnet.bybit.com";
/// Realtime stream URL for testnet
pub const TESTNET_WS_URL: &str = "wss://stream-testnet.bybit.com/realtime";

/// Bybit network
///
/// The REST and stream URLs are a fixed pair per network and cannot be
/// configured independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Network {
    /// Production exchange
    Mainnet,
    /// Test network (default)
    #[default]
    Testnet,
}

impl Network {
    /// Select a network from a `mainnet` flag
    pub fn from_mainnet(mainnet: bool) -> Self {
        if mainnet {
            Self::Mainnet
        } else {
            Self::Testnet
        }
    }

    /// REST base URL for this network
    pub fn rest_url(&self) -> &'static str {
        match self {
            Self::Mainnet => MAINNET_REST_URL,
            Self::Testnet => TESTNET_REST_URL,
        }
    }

    /// Realtime stream URL for this network
    pub fn ws_url(&self) -> &'static str {
        match self {
            Self::Mainnet => MAINNET_WS_URL,
            Self::Testnet => TESTNET_WS_URL,
        }
    }

    /// Check if this is the production network
    pub fn is_mainnet(&self) -> bool {
        matches!(self, Self::Mainnet)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mainnet => write!(f, "mainnet"),
            Self::Testnet => write!(f, "testnet"),
        }
    }
}
