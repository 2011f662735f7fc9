pub mod domain;
pub mod format;
pub mod network;
pub mod ports;
pub mod session;
pub mod verify;

pub use domain::{
    ChainDescriptor, ChainId, NativeCurrency, ProviderEvent, Session, SessionSnapshot,
    VerificationResult, VerificationStatus, WalletChange,
};
pub use format::truncate_address;
pub use ports::{
    AccountCachePort, EntropyPort, PortError, ProviderAvailability, ProviderPort,
    CODE_UNRECOGNIZED_CHAIN, CODE_USER_REJECTED,
};
pub use session::WalletSession;
pub use verify::challenge_message;
