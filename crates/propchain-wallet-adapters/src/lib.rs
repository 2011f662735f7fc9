pub mod config;
pub mod eip1193;
pub mod entropy;
pub mod storage;

pub use config::{RuntimeProfile, WalletAdapterConfig};
pub use eip1193::Eip1193Adapter;
pub use entropy::EntropyAdapter;
pub use storage::AccountCacheAdapter;
