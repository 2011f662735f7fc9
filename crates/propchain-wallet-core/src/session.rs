use std::sync::{Mutex, MutexGuard};

use alloy::primitives::Address;

use crate::domain::{
    ChainId, Session, SessionSnapshot, VerificationResult, WalletChange,
};
use crate::ports::{AccountCachePort, EntropyPort, PortError, ProviderAvailability, ProviderPort};

pub(crate) const MSG_NOT_DETECTED: &str = "MetaMask not detected";
pub(crate) const MSG_CONNECT_REJECTED: &str = "Connection request rejected";
pub(crate) const MSG_NO_ACCOUNTS: &str = "No accounts returned";
pub(crate) const MSG_CONNECT_FAILED: &str = "Failed to connect wallet";

pub(crate) struct SessionInner {
    pub session: Session,
    pub verification: VerificationResult,
}

/// Single-instance wallet session store. Owns the provider gateway, the
/// account cache, and the entropy source; lives for the application's
/// lifetime. All mutation goes through its own methods and the provider
/// event intake, so the interior mutex is uncontended in practice.
pub struct WalletSession<P, S, E>
where
    P: ProviderPort,
    S: AccountCachePort,
    E: EntropyPort,
{
    pub provider: P,
    pub cache: S,
    pub entropy: E,
    target_chain_id: ChainId,
    pub(crate) state: Mutex<SessionInner>,
}

impl<P, S, E> WalletSession<P, S, E>
where
    P: ProviderPort,
    S: AccountCachePort,
    E: EntropyPort,
{
    /// Creates an empty session. Call [`WalletSession::bootstrap`] once
    /// afterwards to hydrate it.
    pub fn new(provider: P, cache: S, entropy: E, target_chain_id: ChainId) -> Self {
        Self {
            provider,
            cache,
            entropy,
            target_chain_id,
            state: Mutex::new(SessionInner {
                session: Session::default(),
                verification: VerificationResult::default(),
            }),
        }
    }

    pub fn target_chain_id(&self) -> ChainId {
        self.target_chain_id
    }

    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, SessionInner>, PortError> {
        self.state
            .lock()
            .map_err(|e| PortError::Transport(format!("session lock poisoned: {e}")))
    }

    pub fn snapshot(&self) -> Result<SessionSnapshot, PortError> {
        let g = self.lock()?;
        Ok(SessionSnapshot {
            account: g.session.account,
            chain_id: g.session.chain_id,
            target_chain_id: self.target_chain_id,
            is_on_target_network: g.session.chain_id == Some(self.target_chain_id),
            is_connecting: g.session.is_connecting,
            error: g.session.error.clone(),
            verification: g.verification.clone(),
        })
    }

    /// Silent startup discovery: already-authorized accounts and current
    /// chain, falling back to the cached address when the extension is
    /// unreachable or reports nothing. Never sets `is_connecting` and never
    /// surfaces an error.
    pub fn bootstrap(&self) {
        if let ProviderAvailability::Unavailable(_) = self.provider.availability() {
            self.restore_cached_account();
            return;
        }

        if let Ok(chain_id) = self.provider.chain_id() {
            if let Ok(mut g) = self.lock() {
                g.session.chain_id = Some(chain_id);
            }
        }

        match self.provider.authorized_accounts() {
            Ok(accounts) if !accounts.is_empty() => {
                let _ = self.handle_accounts_changed(accounts);
            }
            _ => self.restore_cached_account(),
        }
    }

    fn restore_cached_account(&self) {
        if let Ok(Some(account)) = self.cache.load() {
            if let Ok(mut g) = self.lock() {
                g.session.account = Some(account);
            }
        }
    }

    /// Requests account access from the extension. The first returned account
    /// becomes the session account and is persisted. No-op when a connect is
    /// already in flight; `is_connecting` is always cleared on exit.
    pub fn connect(&self) -> Result<(), PortError> {
        {
            let mut g = self.lock()?;
            if g.session.is_connecting {
                return Ok(());
            }
            g.session.is_connecting = true;
            g.session.error = None;
        }

        let outcome = self.connect_inner();
        let mut g = self.lock()?;
        g.session.is_connecting = false;
        match outcome {
            Ok(account) => {
                g.session.account = Some(account);
                Ok(())
            }
            Err(err) => {
                g.session.error = Some(connect_error_message(&err));
                Err(err)
            }
        }
    }

    fn connect_inner(&self) -> Result<Address, PortError> {
        if let ProviderAvailability::Unavailable(_) = self.provider.availability() {
            return Err(PortError::NotDetected);
        }

        // Chain read is best-effort so the UI can render the network chip
        // even when the account prompt is rejected.
        if let Ok(chain_id) = self.provider.chain_id() {
            if let Ok(mut g) = self.lock() {
                g.session.chain_id = Some(chain_id);
            }
        }

        let accounts = self.provider.request_accounts()?;
        let first = accounts.first().copied().ok_or(PortError::NoAccounts)?;
        let _ = self.cache.store(first);
        Ok(first)
    }

    /// Local-only reset: the extension has no programmatic disconnect. Clears
    /// the account, the persisted cache, and any verification state.
    pub fn disconnect(&self) -> Result<(), PortError> {
        {
            let mut g = self.lock()?;
            g.session.account = None;
            g.verification = VerificationResult::default();
        }
        self.cache.clear()
    }

    /// Applies an `accountsChanged` notification. An empty list means the
    /// user revoked access and is treated as a disconnect.
    pub fn handle_accounts_changed(&self, accounts: Vec<Address>) -> Result<(), PortError> {
        match accounts.first().copied() {
            Some(first) => {
                let _ = self.cache.store(first);
                let mut g = self.lock()?;
                g.session.account = Some(first);
            }
            None => {
                let _ = self.cache.clear();
                let mut g = self.lock()?;
                g.session.account = None;
            }
        }
        Ok(())
    }

    pub fn handle_chain_changed(&self, chain_id: ChainId) -> Result<(), PortError> {
        let mut g = self.lock()?;
        g.session.chain_id = Some(chain_id);
        Ok(())
    }

    /// Drains queued extension notifications and applies them. Drain failures
    /// are swallowed: background intake must not surface noise.
    pub fn pump_events(&self) -> Result<(), PortError> {
        let Ok(events) = self.provider.drain_events() else {
            return Ok(());
        };
        for event in events {
            match event.change {
                WalletChange::AccountsChanged(accounts) => {
                    self.handle_accounts_changed(accounts)?;
                }
                WalletChange::ChainChanged(chain_id) => {
                    self.handle_chain_changed(chain_id)?;
                }
            }
        }
        Ok(())
    }

    pub(crate) fn set_error(&self, message: &str) -> Result<(), PortError> {
        let mut g = self.lock()?;
        g.session.error = Some(message.to_owned());
        Ok(())
    }
}

fn connect_error_message(err: &PortError) -> String {
    match err {
        PortError::NotDetected => MSG_NOT_DETECTED.to_owned(),
        PortError::Rejected => MSG_CONNECT_REJECTED.to_owned(),
        PortError::NoAccounts => MSG_NO_ACCOUNTS.to_owned(),
        PortError::Transport(message) if !message.is_empty() => message.clone(),
        _ => MSG_CONNECT_FAILED.to_owned(),
    }
}
