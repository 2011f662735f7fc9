use std::fmt;
use std::str::FromStr;

use alloy::primitives::Address;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// EIP-155 chain identifier. Stored numerically; the wire form is the
/// `0x`-prefixed lowercase hex string, so comparing the numeric value is
/// equivalent to a case-insensitive comparison of the wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl ChainId {
    pub const MAINNET: ChainId = ChainId(1);
    pub const SEPOLIA: ChainId = ChainId(11_155_111);

    pub fn as_hex(&self) -> String {
        format!("0x{:x}", self.0)
    }
}

#[derive(Debug, Error)]
#[error("invalid chain id: {0}")]
pub struct InvalidChainId(String);

impl FromStr for ChainId {
    type Err = InvalidChainId;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.starts_with("0x") || raw.starts_with("0X") {
            u64::from_str_radix(&raw[2..], 16)
                .map(ChainId)
                .map_err(|_| InvalidChainId(raw.to_owned()))
        } else {
            raw.parse()
                .map(ChainId)
                .map_err(|_| InvalidChainId(raw.to_owned()))
        }
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

impl Serialize for ChainId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_hex())
    }
}

impl<'de> Deserialize<'de> for ChainId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Parameters for `wallet_addEthereumChain`, serialized in the shape the
/// provider expects. Immutable per chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainDescriptor {
    pub chain_id: ChainId,
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub block_explorer_urls: Vec<String>,
}

impl ChainDescriptor {
    pub fn mainnet() -> Self {
        Self {
            chain_id: ChainId::MAINNET,
            chain_name: "Ethereum Mainnet".to_owned(),
            native_currency: NativeCurrency {
                name: "Ether".to_owned(),
                symbol: "ETH".to_owned(),
                decimals: 18,
            },
            rpc_urls: vec!["https://rpc.ankr.com/eth".to_owned()],
            block_explorer_urls: vec!["https://etherscan.io".to_owned()],
        }
    }

    pub fn sepolia() -> Self {
        Self {
            chain_id: ChainId::SEPOLIA,
            chain_name: "Sepolia".to_owned(),
            native_currency: NativeCurrency {
                name: "Sepolia Ether".to_owned(),
                symbol: "SEP".to_owned(),
                decimals: 18,
            },
            rpc_urls: vec!["https://rpc.ankr.com/eth_sepolia".to_owned()],
            block_explorer_urls: vec!["https://sepolia.etherscan.io".to_owned()],
        }
    }

    /// Registry of chains this application knows how to register with the
    /// wallet. Switching to anything else cannot recover from a 4902.
    pub fn known(chain_id: ChainId) -> Option<Self> {
        match chain_id.0 {
            1 => Some(Self::mainnet()),
            11_155_111 => Some(Self::sepolia()),
            _ => None,
        }
    }

    pub fn display_name(chain_id: ChainId) -> String {
        match Self::known(chain_id) {
            Some(descriptor) => descriptor.chain_name,
            None => chain_id.as_hex(),
        }
    }
}

/// Mutable wallet session state. One logical writer: the session store's own
/// methods plus provider event intake.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub account: Option<Address>,
    pub chain_id: Option<ChainId>,
    pub is_connecting: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerificationStatus {
    #[default]
    Idle,
    Pending,
    Verified,
    Failed,
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            VerificationStatus::Idle => "idle",
            VerificationStatus::Pending => "pending",
            VerificationStatus::Verified => "verified",
            VerificationStatus::Failed => "failed",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationResult {
    pub status: VerificationStatus,
    pub error: Option<String>,
}

/// Out-of-band change pushed by the wallet extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletChange {
    AccountsChanged(Vec<Address>),
    ChainChanged(ChainId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEvent {
    pub sequence: u64,
    pub change: WalletChange,
}

/// Read-only view handed to the UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub account: Option<Address>,
    pub chain_id: Option<ChainId>,
    pub target_chain_id: ChainId,
    pub is_on_target_network: bool,
    pub is_connecting: bool,
    pub error: Option<String>,
    pub verification: VerificationResult,
}
