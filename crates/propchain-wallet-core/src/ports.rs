use alloy::primitives::{Address, Bytes};
use thiserror::Error;

use crate::domain::{ChainDescriptor, ChainId, ProviderEvent};

/// EIP-1193: the user rejected the request.
pub const CODE_USER_REJECTED: i64 = 4001;
/// MetaMask: the requested chain has not been added to the wallet.
pub const CODE_UNRECOGNIZED_CHAIN: i64 = 4902;

#[derive(Debug, Error)]
pub enum PortError {
    #[error("wallet extension not detected")]
    NotDetected,
    #[error("request rejected by user")]
    Rejected,
    #[error("chain not recognized by wallet")]
    UnrecognizedChain,
    #[error("no accounts returned")]
    NoAccounts,
    #[error("port not implemented: {0}")]
    NotImplemented(&'static str),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("validation error: {0}")]
    Validation(String),
}

impl PortError {
    /// Maps a provider error object (`{ code, message }`) onto the variants
    /// the session layer distinguishes. Unknown codes keep their message.
    pub fn from_rpc(code: Option<i64>, message: &str) -> Self {
        match code {
            Some(CODE_USER_REJECTED) => PortError::Rejected,
            Some(CODE_UNRECOGNIZED_CHAIN) => PortError::UnrecognizedChain,
            _ => PortError::Transport(message.to_owned()),
        }
    }
}

/// Result of the capability check performed before any gateway round-trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderAvailability {
    Available,
    Unavailable(String),
}

/// The sole interface to the injected wallet extension. Every call is a
/// request/response round-trip that may suspend for user approval; no timeout
/// is imposed and no retries are performed.
pub trait ProviderPort {
    fn availability(&self) -> ProviderAvailability;
    /// `eth_requestAccounts`: prompts the user when not yet authorized.
    fn request_accounts(&self) -> Result<Vec<Address>, PortError>;
    /// `eth_accounts`: silent read of already-authorized accounts.
    fn authorized_accounts(&self) -> Result<Vec<Address>, PortError>;
    fn chain_id(&self) -> Result<ChainId, PortError>;
    fn switch_chain(&self, chain_id: ChainId) -> Result<(), PortError>;
    fn add_chain(&self, descriptor: &ChainDescriptor) -> Result<(), PortError>;
    fn personal_sign(&self, message: &str, account: Address) -> Result<Bytes, PortError>;
    fn recover_signer(&self, message: &str, signature: &Bytes) -> Result<Address, PortError>;
    /// Queued `accountsChanged`/`chainChanged` notifications since the last
    /// drain, in arrival order.
    fn drain_events(&self) -> Result<Vec<ProviderEvent>, PortError>;
}

/// Soft cache of the last known account address.
pub trait AccountCachePort {
    fn load(&self) -> Result<Option<Address>, PortError>;
    fn store(&self, account: Address) -> Result<(), PortError>;
    fn clear(&self) -> Result<(), PortError>;
}

/// Nonce material for ownership challenges.
pub trait EntropyPort {
    /// 16 bytes of nonce material, hex-encoded. Implementations fall back to
    /// a weaker source rather than fail.
    fn challenge_nonce(&self) -> String;
}
