use alloy::primitives::Address;

use propchain_wallet_core::{AccountCachePort, PortError};

use crate::WalletAdapterConfig;

/// localStorage key used by the browser runtime.
#[cfg(target_arch = "wasm32")]
const ACCOUNT_KEY: &str = "pc_account";

/// Persists the last connected account so page reloads (or process restarts)
/// can show the cached address before the wallet answers.
///
/// Backends: browser localStorage on wasm32; a single-line file or an
/// in-process slot on native.
#[derive(Debug)]
pub struct AccountCacheAdapter {
    backend: Backend,
}

#[derive(Debug)]
enum Backend {
    #[cfg(not(target_arch = "wasm32"))]
    Memory(std::sync::Mutex<Option<Address>>),
    #[cfg(not(target_arch = "wasm32"))]
    File(std::path::PathBuf),
    #[cfg(target_arch = "wasm32")]
    LocalStorage,
}

impl Default for AccountCacheAdapter {
    fn default() -> Self {
        Self::with_config(&WalletAdapterConfig::default())
    }
}

impl AccountCacheAdapter {
    pub fn with_config(config: &WalletAdapterConfig) -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            let _ = config;
            Self {
                backend: Backend::LocalStorage,
            }
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            match &config.account_cache_path {
                Some(path) => Self::file(path.clone()),
                None => Self::in_memory(),
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(std::sync::Mutex::new(None)),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn file(path: std::path::PathBuf) -> Self {
        Self {
            backend: Backend::File(path),
        }
    }
}

impl AccountCachePort for AccountCacheAdapter {
    fn load(&self) -> Result<Option<Address>, PortError> {
        match &self.backend {
            #[cfg(not(target_arch = "wasm32"))]
            Backend::Memory(slot) => Ok(*slot
                .lock()
                .map_err(|e| PortError::Transport(format!("account cache lock poisoned: {e}")))?),
            #[cfg(not(target_arch = "wasm32"))]
            Backend::File(path) => match std::fs::read_to_string(path) {
                Ok(raw) => {
                    let trimmed = raw.trim();
                    if trimmed.is_empty() {
                        return Ok(None);
                    }
                    let parsed = trimmed.parse().map_err(|e| {
                        PortError::Validation(format!("corrupt account cache entry: {e}"))
                    })?;
                    Ok(Some(parsed))
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(PortError::Transport(format!(
                    "failed to read account cache: {e}"
                ))),
            },
            #[cfg(target_arch = "wasm32")]
            Backend::LocalStorage => {
                let storage = local_storage()?;
                let raw = storage.get_item(ACCOUNT_KEY).map_err(|e| {
                    PortError::Transport(format!("localStorage read failed: {e:?}"))
                })?;
                match raw {
                    None => Ok(None),
                    Some(raw) => {
                        let parsed = raw.parse().map_err(|e| {
                            PortError::Validation(format!("corrupt account cache entry: {e}"))
                        })?;
                        Ok(Some(parsed))
                    }
                }
            }
        }
    }

    fn store(&self, account: Address) -> Result<(), PortError> {
        match &self.backend {
            #[cfg(not(target_arch = "wasm32"))]
            Backend::Memory(slot) => {
                *slot.lock().map_err(|e| {
                    PortError::Transport(format!("account cache lock poisoned: {e}"))
                })? = Some(account);
                Ok(())
            }
            #[cfg(not(target_arch = "wasm32"))]
            Backend::File(path) => {
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent).map_err(|e| {
                            PortError::Transport(format!("failed to create cache directory: {e}"))
                        })?;
                    }
                }
                std::fs::write(path, account.to_string()).map_err(|e| {
                    PortError::Transport(format!("failed to write account cache: {e}"))
                })
            }
            #[cfg(target_arch = "wasm32")]
            Backend::LocalStorage => {
                let storage = local_storage()?;
                storage
                    .set_item(ACCOUNT_KEY, &account.to_string())
                    .map_err(|e| PortError::Transport(format!("localStorage write failed: {e:?}")))
            }
        }
    }

    fn clear(&self) -> Result<(), PortError> {
        match &self.backend {
            #[cfg(not(target_arch = "wasm32"))]
            Backend::Memory(slot) => {
                *slot.lock().map_err(|e| {
                    PortError::Transport(format!("account cache lock poisoned: {e}"))
                })? = None;
                Ok(())
            }
            #[cfg(not(target_arch = "wasm32"))]
            Backend::File(path) => match std::fs::remove_file(path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(PortError::Transport(format!(
                    "failed to remove account cache: {e}"
                ))),
            },
            #[cfg(target_arch = "wasm32")]
            Backend::LocalStorage => {
                let storage = local_storage()?;
                storage
                    .remove_item(ACCOUNT_KEY)
                    .map_err(|e| PortError::Transport(format!("localStorage remove failed: {e:?}")))
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Result<web_sys::Storage, PortError> {
    web_sys::window()
        .ok_or_else(|| PortError::Transport("missing window".to_owned()))?
        .local_storage()
        .map_err(|e| PortError::Transport(format!("localStorage unavailable: {e:?}")))?
        .ok_or_else(|| PortError::Transport("localStorage disabled".to_owned()))
}
