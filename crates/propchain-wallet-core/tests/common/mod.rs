#![allow(dead_code)]

use std::sync::{Mutex, MutexGuard};

use alloy::primitives::{Address, Bytes};

use propchain_wallet_core::{
    AccountCachePort, ChainDescriptor, ChainId, EntropyPort, PortError, ProviderAvailability,
    ProviderEvent, ProviderPort, WalletChange, WalletSession,
};

pub const FIXED_NONCE: &str = "00112233445566778899aabbccddeeff";

pub fn account_a() -> Address {
    "0x1000000000000000000000000000000000000001"
        .parse()
        .expect("valid account a")
}

pub fn account_b() -> Address {
    "0x2000000000000000000000000000000000000002"
        .parse()
        .expect("valid account b")
}

#[derive(Debug, Clone)]
pub enum RequestAccountsOutcome {
    Grant(Vec<Address>),
    Reject,
    Fail(String),
}

#[derive(Debug, Clone, Copy)]
pub enum SwitchOutcome {
    Accept,
    Unrecognized,
    Reject,
    Fail,
}

#[derive(Debug, Clone, Copy)]
pub enum AddChainOutcome {
    Accept,
    Reject,
    Fail,
}

#[derive(Debug, Clone)]
pub enum SignOutcome {
    Signature(Vec<u8>),
    Reject,
    Fail(String),
}

#[derive(Debug)]
pub struct Script {
    pub available: bool,
    pub chain_id: Option<ChainId>,
    pub authorized: Vec<Address>,
    pub authorized_fails: bool,
    pub request_accounts: RequestAccountsOutcome,
    pub switch: SwitchOutcome,
    pub add_chain: AddChainOutcome,
    pub added_chains: Vec<ChainDescriptor>,
    pub sign: SignOutcome,
    pub sign_calls: u64,
    pub last_signed_message: Option<String>,
    pub recover: Option<Address>,
    pub events: Vec<ProviderEvent>,
    pub event_seq: u64,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            available: true,
            chain_id: Some(ChainId::MAINNET),
            authorized: Vec::new(),
            authorized_fails: false,
            request_accounts: RequestAccountsOutcome::Grant(Vec::new()),
            switch: SwitchOutcome::Accept,
            add_chain: AddChainOutcome::Accept,
            added_chains: Vec::new(),
            sign: SignOutcome::Fail("unscripted sign".to_owned()),
            sign_calls: 0,
            last_signed_message: None,
            recover: None,
            events: Vec::new(),
            event_seq: 0,
        }
    }
}

#[derive(Debug, Default)]
pub struct ScriptedProvider {
    inner: Mutex<Script>,
}

impl ScriptedProvider {
    pub fn with_script(script: Script) -> Self {
        Self {
            inner: Mutex::new(script),
        }
    }

    pub fn absent() -> Self {
        Self::with_script(Script {
            available: false,
            ..Script::default()
        })
    }

    pub fn granting(accounts: Vec<Address>) -> Self {
        Self::with_script(Script {
            request_accounts: RequestAccountsOutcome::Grant(accounts),
            ..Script::default()
        })
    }

    pub fn script(&self) -> MutexGuard<'_, Script> {
        self.inner.lock().expect("script lock")
    }

    pub fn push_event(&self, change: WalletChange) {
        let mut g = self.script();
        g.event_seq += 1;
        let sequence = g.event_seq;
        g.events.push(ProviderEvent { sequence, change });
    }
}

impl ProviderPort for ScriptedProvider {
    fn availability(&self) -> ProviderAvailability {
        if self.script().available {
            ProviderAvailability::Available
        } else {
            ProviderAvailability::Unavailable("window.ethereum missing".to_owned())
        }
    }

    fn request_accounts(&self) -> Result<Vec<Address>, PortError> {
        match self.script().request_accounts.clone() {
            RequestAccountsOutcome::Grant(accounts) => Ok(accounts),
            RequestAccountsOutcome::Reject => Err(PortError::Rejected),
            RequestAccountsOutcome::Fail(message) => Err(PortError::Transport(message)),
        }
    }

    fn authorized_accounts(&self) -> Result<Vec<Address>, PortError> {
        let g = self.script();
        if g.authorized_fails {
            return Err(PortError::Transport("eth_accounts failed".to_owned()));
        }
        Ok(g.authorized.clone())
    }

    fn chain_id(&self) -> Result<ChainId, PortError> {
        self.script()
            .chain_id
            .ok_or_else(|| PortError::Transport("eth_chainId failed".to_owned()))
    }

    fn switch_chain(&self, chain_id: ChainId) -> Result<(), PortError> {
        let mut g = self.script();
        match g.switch {
            SwitchOutcome::Accept => {
                g.chain_id = Some(chain_id);
                Ok(())
            }
            SwitchOutcome::Unrecognized => Err(PortError::UnrecognizedChain),
            SwitchOutcome::Reject => Err(PortError::Rejected),
            SwitchOutcome::Fail => Err(PortError::Transport("switch failed".to_owned())),
        }
    }

    fn add_chain(&self, descriptor: &ChainDescriptor) -> Result<(), PortError> {
        let mut g = self.script();
        match g.add_chain {
            AddChainOutcome::Accept => {
                g.added_chains.push(descriptor.clone());
                g.chain_id = Some(descriptor.chain_id);
                Ok(())
            }
            AddChainOutcome::Reject => Err(PortError::Rejected),
            AddChainOutcome::Fail => Err(PortError::Transport("add chain failed".to_owned())),
        }
    }

    fn personal_sign(&self, message: &str, _account: Address) -> Result<Bytes, PortError> {
        let mut g = self.script();
        g.sign_calls += 1;
        g.last_signed_message = Some(message.to_owned());
        match g.sign.clone() {
            SignOutcome::Signature(bytes) => Ok(Bytes::from(bytes)),
            SignOutcome::Reject => Err(PortError::Rejected),
            SignOutcome::Fail(message) => Err(PortError::Transport(message)),
        }
    }

    fn recover_signer(&self, _message: &str, _signature: &Bytes) -> Result<Address, PortError> {
        self.script()
            .recover
            .ok_or_else(|| PortError::Validation("signature recovery failed".to_owned()))
    }

    fn drain_events(&self) -> Result<Vec<ProviderEvent>, PortError> {
        let mut g = self.script();
        Ok(std::mem::take(&mut g.events))
    }
}

#[derive(Debug, Default)]
pub struct MemoryCache {
    pub stored: Mutex<Option<Address>>,
}

impl MemoryCache {
    pub fn seeded(account: Address) -> Self {
        Self {
            stored: Mutex::new(Some(account)),
        }
    }
}

impl AccountCachePort for MemoryCache {
    fn load(&self) -> Result<Option<Address>, PortError> {
        Ok(*self.stored.lock().expect("cache lock"))
    }

    fn store(&self, account: Address) -> Result<(), PortError> {
        *self.stored.lock().expect("cache lock") = Some(account);
        Ok(())
    }

    fn clear(&self) -> Result<(), PortError> {
        *self.stored.lock().expect("cache lock") = None;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct FixedEntropy;

impl EntropyPort for FixedEntropy {
    fn challenge_nonce(&self) -> String {
        FIXED_NONCE.to_owned()
    }
}

pub type TestSession = WalletSession<ScriptedProvider, MemoryCache, FixedEntropy>;

pub fn new_session(provider: ScriptedProvider) -> TestSession {
    WalletSession::new(provider, MemoryCache::default(), FixedEntropy, ChainId::SEPOLIA)
}

pub fn new_session_with_cache(provider: ScriptedProvider, cache: MemoryCache) -> TestSession {
    WalletSession::new(provider, cache, FixedEntropy, ChainId::SEPOLIA)
}

pub fn cached_account(session: &TestSession) -> Option<Address> {
    *session.cache.stored.lock().expect("cache lock")
}
