use std::path::PathBuf;

use propchain_wallet_core::ChainId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeProfile {
    Development,
    Production,
}

#[derive(Debug, Clone)]
pub struct WalletAdapterConfig {
    pub runtime_profile: RuntimeProfile,
    /// Native runtime: base URL of an EIP-1193 JSON-RPC proxy standing in for
    /// the injected browser provider. Unset falls back to the deterministic
    /// fixture provider in development profiles.
    pub eip1193_proxy_url: Option<String>,
    /// `None` leaves proxy requests without a deadline: wallet approval
    /// prompts can stay open indefinitely and must not be timed out.
    pub request_timeout_ms: Option<u64>,
    /// Native runtime: file backing the cached account. Unset keeps the cache
    /// in memory only.
    pub account_cache_path: Option<PathBuf>,
    pub target_chain_id: ChainId,
}

impl Default for WalletAdapterConfig {
    fn default() -> Self {
        Self {
            runtime_profile: RuntimeProfile::Development,
            eip1193_proxy_url: None,
            request_timeout_ms: None,
            account_cache_path: None,
            target_chain_id: ChainId::SEPOLIA,
        }
    }
}

impl WalletAdapterConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(profile) = std::env::var("PROPCHAIN_RUNTIME_PROFILE") {
            if profile.eq_ignore_ascii_case("production") {
                config.runtime_profile = RuntimeProfile::Production;
            }
        }
        if let Ok(url) = std::env::var("PROPCHAIN_EIP1193_PROXY_URL") {
            if !url.is_empty() {
                config.eip1193_proxy_url = Some(url);
            }
        }
        if let Ok(raw) = std::env::var("PROPCHAIN_REQUEST_TIMEOUT_MS") {
            config.request_timeout_ms = raw.parse().ok();
        }
        if let Ok(path) = std::env::var("PROPCHAIN_ACCOUNT_CACHE_PATH") {
            if !path.is_empty() {
                config.account_cache_path = Some(PathBuf::from(path));
            }
        }
        if let Ok(raw) = std::env::var("PROPCHAIN_TARGET_CHAIN_ID") {
            if let Ok(chain_id) = raw.parse() {
                config.target_chain_id = chain_id;
            }
        }
        config
    }

    /// Production refuses to run against fixture fallbacks.
    pub fn strict_runtime_required(&self) -> bool {
        self.runtime_profile == RuntimeProfile::Production
    }
}
