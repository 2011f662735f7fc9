use std::sync::{Arc, Mutex, MutexGuard};

use alloy::primitives::{keccak256, Address, Bytes};
use serde_json::Value;

use propchain_wallet_core::{
    ChainDescriptor, ChainId, PortError, ProviderAvailability, ProviderEvent, ProviderPort,
    WalletChange,
};

use crate::WalletAdapterConfig;

/// Gateway to the injected EIP-1193 wallet provider.
///
/// Runtimes:
/// - `Browser` (wasm32): the real `window.ethereum` object.
/// - `Proxy` (native): an HTTP JSON-RPC proxy standing in for the extension,
///   used by integration environments.
/// - `Deterministic`: an in-process fixture with one built-in account, used
///   in development profiles and tests.
/// - `Disabled`: production profile without a real runtime; every call fails
///   the capability check.
#[derive(Debug, Clone)]
pub struct Eip1193Adapter {
    mode: ProviderMode,
    state: Arc<Mutex<ProviderState>>,
    #[cfg(target_arch = "wasm32")]
    hooks: Arc<Mutex<BrowserHooks>>,
}

#[derive(Debug, Clone)]
enum ProviderMode {
    Disabled(String),
    Deterministic,
    #[cfg(not(target_arch = "wasm32"))]
    Proxy(ProxyRuntime),
    #[cfg(target_arch = "wasm32")]
    Browser,
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
struct ProxyRuntime {
    base_url: String,
    client: reqwest::blocking::Client,
}

#[derive(Debug)]
struct ProviderState {
    accounts: Vec<Address>,
    authorized: bool,
    chain_id: ChainId,
    recognized_chains: Vec<ChainId>,
    event_seq: u64,
    events: Vec<ProviderEvent>,
}

impl Default for ProviderState {
    fn default() -> Self {
        Self {
            accounts: vec!["0x1000000000000000000000000000000000000001"
                .parse()
                .expect("valid built-in deterministic account")],
            authorized: false,
            chain_id: ChainId::MAINNET,
            // Sepolia is deliberately absent so the registration path is
            // exercised in the deterministic runtime.
            recognized_chains: vec![ChainId::MAINNET],
            event_seq: 0,
            events: Vec::new(),
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
struct BrowserHooks {
    accounts_changed: Option<wasm_bindgen::closure::Closure<dyn FnMut(wasm_bindgen::JsValue)>>,
    chain_changed: Option<wasm_bindgen::closure::Closure<dyn FnMut(wasm_bindgen::JsValue)>>,
}

impl Default for Eip1193Adapter {
    fn default() -> Self {
        Self::with_config(WalletAdapterConfig::from_env())
    }
}

impl Eip1193Adapter {
    pub fn with_config(config: WalletAdapterConfig) -> Self {
        #[cfg(target_arch = "wasm32")]
        let mode = if browser_provider_available() {
            ProviderMode::Browser
        } else if config.strict_runtime_required() {
            ProviderMode::Disabled(
                "EIP-1193 browser provider not found in production runtime profile".to_owned(),
            )
        } else {
            ProviderMode::Deterministic
        };

        #[cfg(not(target_arch = "wasm32"))]
        let mode = if let Some(ref base_url) = config.eip1193_proxy_url {
            let timeout = config
                .request_timeout_ms
                .map(std::time::Duration::from_millis);
            match reqwest::blocking::Client::builder().timeout(timeout).build() {
                Ok(client) => ProviderMode::Proxy(ProxyRuntime {
                    base_url: base_url.clone(),
                    client,
                }),
                Err(e) => {
                    if config.strict_runtime_required() {
                        ProviderMode::Disabled(format!(
                            "failed to initialize EIP-1193 proxy client in production profile: {e}"
                        ))
                    } else {
                        ProviderMode::Deterministic
                    }
                }
            }
        } else if config.strict_runtime_required() {
            ProviderMode::Disabled(
                "EIP-1193 proxy URL not configured in production runtime profile".to_owned(),
            )
        } else {
            ProviderMode::Deterministic
        };

        Self {
            mode,
            state: Arc::new(Mutex::new(ProviderState::default())),
            #[cfg(target_arch = "wasm32")]
            hooks: Arc::new(Mutex::new(BrowserHooks::default())),
        }
    }

    fn check_mode(&self) -> Result<(), PortError> {
        if let ProviderMode::Disabled(_) = &self.mode {
            return Err(PortError::NotDetected);
        }
        Ok(())
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, ProviderState>, PortError> {
        self.state
            .lock()
            .map_err(|e| PortError::Transport(format!("provider lock poisoned: {e}")))
    }

    pub fn debug_inject_accounts_changed(&self, accounts: Vec<Address>) -> Result<(), PortError> {
        let mut g = self.lock_state()?;
        g.accounts = accounts.clone();
        g.authorized = !accounts.is_empty();
        record_event(&mut g, WalletChange::AccountsChanged(accounts));
        Ok(())
    }

    pub fn debug_inject_chain_changed(&self, chain_id: ChainId) -> Result<(), PortError> {
        let mut g = self.lock_state()?;
        g.chain_id = chain_id;
        record_event(&mut g, WalletChange::ChainChanged(chain_id));
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn proxy_call(&self, method: &str, params: Value) -> Result<Value, PortError> {
        let proxy = match &self.mode {
            ProviderMode::Proxy(proxy) => proxy,
            ProviderMode::Disabled(_) => return Err(PortError::NotDetected),
            _ => {
                return Err(PortError::NotImplemented(
                    "eip1193 proxy runtime not enabled",
                ))
            }
        };

        let payload = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        let response = proxy
            .client
            .post(&proxy.base_url)
            .json(&payload)
            .send()
            .map_err(|e| PortError::Transport(format!("eip1193 proxy request failed: {e}")))?;
        let status = response.status();
        let body: Value = response
            .json()
            .map_err(|e| PortError::Transport(format!("eip1193 proxy json decode failed: {e}")))?;
        // Provider error objects carry the codes the session layer maps
        // (4001, 4902); decode them before complaining about HTTP status.
        if let Some(err) = body.get("error") {
            let code = err.get("code").and_then(Value::as_i64);
            let message = err
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("provider error");
            return Err(PortError::from_rpc(code, message));
        }
        if !status.is_success() {
            return Err(PortError::Transport(format!(
                "eip1193 proxy status {status}: {body}"
            )));
        }
        body.get("result")
            .cloned()
            .ok_or_else(|| PortError::Transport("eip1193 proxy missing result".to_owned()))
    }
}

impl ProviderPort for Eip1193Adapter {
    fn availability(&self) -> ProviderAvailability {
        match &self.mode {
            ProviderMode::Disabled(reason) => ProviderAvailability::Unavailable(reason.clone()),
            _ => ProviderAvailability::Available,
        }
    }

    fn request_accounts(&self) -> Result<Vec<Address>, PortError> {
        self.check_mode()?;

        #[cfg(not(target_arch = "wasm32"))]
        if matches!(self.mode, ProviderMode::Proxy(_)) {
            let result = self.proxy_call("eth_requestAccounts", serde_json::json!([]))?;
            let accounts = parse_accounts(&result)?;
            // An empty grant is not a revocation: only the wallet's own
            // accountsChanged may queue a disconnect, so an empty response
            // passes through without touching state.
            if accounts.is_empty() {
                return Ok(accounts);
            }
            let mut g = self.lock_state()?;
            if g.accounts != accounts || !g.authorized {
                g.accounts = accounts.clone();
                g.authorized = true;
                record_event(&mut g, WalletChange::AccountsChanged(accounts.clone()));
            }
            return Ok(accounts);
        }

        #[cfg(target_arch = "wasm32")]
        if matches!(self.mode, ProviderMode::Browser) {
            return Err(PortError::NotImplemented(
                "wasm sync request_accounts is unavailable; use request_accounts_async",
            ));
        }

        let mut g = self.lock_state()?;
        if !g.authorized {
            g.authorized = true;
            let accounts = g.accounts.clone();
            record_event(&mut g, WalletChange::AccountsChanged(accounts));
        }
        Ok(g.accounts.clone())
    }

    fn authorized_accounts(&self) -> Result<Vec<Address>, PortError> {
        self.check_mode()?;

        #[cfg(not(target_arch = "wasm32"))]
        if matches!(self.mode, ProviderMode::Proxy(_)) {
            let result = self.proxy_call("eth_accounts", serde_json::json!([]))?;
            let accounts = parse_accounts(&result)?;
            let mut g = self.lock_state()?;
            if !accounts.is_empty() {
                g.accounts = accounts.clone();
                g.authorized = true;
            }
            return Ok(accounts);
        }

        #[cfg(target_arch = "wasm32")]
        if matches!(self.mode, ProviderMode::Browser) {
            self.refresh_browser_snapshot()?;
            let g = self.lock_state()?;
            return Ok(if g.authorized { g.accounts.clone() } else { Vec::new() });
        }

        let g = self.lock_state()?;
        Ok(if g.authorized {
            g.accounts.clone()
        } else {
            Vec::new()
        })
    }

    fn chain_id(&self) -> Result<ChainId, PortError> {
        self.check_mode()?;

        #[cfg(not(target_arch = "wasm32"))]
        if matches!(self.mode, ProviderMode::Proxy(_)) {
            let result = self.proxy_call("eth_chainId", serde_json::json!([]))?;
            let chain_id = parse_chain_id(&result)?;
            let mut g = self.lock_state()?;
            if g.chain_id != chain_id {
                g.chain_id = chain_id;
                record_event(&mut g, WalletChange::ChainChanged(chain_id));
            }
            return Ok(chain_id);
        }

        #[cfg(target_arch = "wasm32")]
        if matches!(self.mode, ProviderMode::Browser) {
            self.refresh_browser_snapshot()?;
            let g = self.lock_state()?;
            return Ok(g.chain_id);
        }

        let g = self.lock_state()?;
        Ok(g.chain_id)
    }

    fn switch_chain(&self, chain_id: ChainId) -> Result<(), PortError> {
        self.check_mode()?;

        #[cfg(not(target_arch = "wasm32"))]
        if matches!(self.mode, ProviderMode::Proxy(_)) {
            self.proxy_call(
                "wallet_switchEthereumChain",
                serde_json::json!([{ "chainId": chain_id.as_hex() }]),
            )?;
            let mut g = self.lock_state()?;
            g.chain_id = chain_id;
            record_event(&mut g, WalletChange::ChainChanged(chain_id));
            return Ok(());
        }

        #[cfg(target_arch = "wasm32")]
        if matches!(self.mode, ProviderMode::Browser) {
            return Err(PortError::NotImplemented(
                "wasm sync switch_chain is unavailable; use switch_chain_async",
            ));
        }

        let mut g = self.lock_state()?;
        if !g.recognized_chains.contains(&chain_id) {
            return Err(PortError::UnrecognizedChain);
        }
        g.chain_id = chain_id;
        record_event(&mut g, WalletChange::ChainChanged(chain_id));
        Ok(())
    }

    fn add_chain(&self, descriptor: &ChainDescriptor) -> Result<(), PortError> {
        self.check_mode()?;

        #[cfg(not(target_arch = "wasm32"))]
        if matches!(self.mode, ProviderMode::Proxy(_)) {
            self.proxy_call("wallet_addEthereumChain", serde_json::json!([descriptor]))?;
            let mut g = self.lock_state()?;
            g.chain_id = descriptor.chain_id;
            record_event(&mut g, WalletChange::ChainChanged(descriptor.chain_id));
            return Ok(());
        }

        #[cfg(target_arch = "wasm32")]
        if matches!(self.mode, ProviderMode::Browser) {
            return Err(PortError::NotImplemented(
                "wasm sync add_chain is unavailable; use add_chain_async",
            ));
        }

        let mut g = self.lock_state()?;
        if !g.recognized_chains.contains(&descriptor.chain_id) {
            g.recognized_chains.push(descriptor.chain_id);
        }
        g.chain_id = descriptor.chain_id;
        record_event(&mut g, WalletChange::ChainChanged(descriptor.chain_id));
        Ok(())
    }

    fn personal_sign(&self, message: &str, account: Address) -> Result<Bytes, PortError> {
        self.check_mode()?;

        #[cfg(not(target_arch = "wasm32"))]
        if matches!(self.mode, ProviderMode::Proxy(_)) {
            let payload_hex = format!("0x{}", alloy::hex::encode(message.as_bytes()));
            let result = self.proxy_call(
                "personal_sign",
                serde_json::json!([payload_hex, account.to_string()]),
            )?;
            let sig_raw = result.as_str().ok_or_else(|| {
                PortError::Transport("signature response must be hex string".to_owned())
            })?;
            return sig_raw
                .parse()
                .map_err(|e| PortError::Validation(format!("invalid signature hex: {e}")));
        }

        #[cfg(target_arch = "wasm32")]
        if matches!(self.mode, ProviderMode::Browser) {
            return Err(PortError::NotImplemented(
                "wasm sync personal_sign is unavailable; use personal_sign_async",
            ));
        }

        let g = self.lock_state()?;
        if !g.authorized || !g.accounts.contains(&account) {
            return Err(PortError::Validation(format!(
                "signer {account} is not an authorized account"
            )));
        }
        Ok(deterministic_signature(message, account))
    }

    fn recover_signer(&self, message: &str, signature: &Bytes) -> Result<Address, PortError> {
        self.check_mode()?;

        #[cfg(not(target_arch = "wasm32"))]
        if matches!(self.mode, ProviderMode::Proxy(_)) {
            let payload_hex = format!("0x{}", alloy::hex::encode(message.as_bytes()));
            let result = self.proxy_call(
                "personal_ecRecover",
                serde_json::json!([payload_hex, signature.to_string()]),
            )?;
            let raw = result.as_str().ok_or_else(|| {
                PortError::Transport("recovery response must be address string".to_owned())
            })?;
            return raw
                .parse()
                .map_err(|e| PortError::Validation(format!("invalid recovered address: {e}")));
        }

        #[cfg(target_arch = "wasm32")]
        if matches!(self.mode, ProviderMode::Browser) {
            return Err(PortError::NotImplemented(
                "wasm sync recover_signer is unavailable; use recover_signer_async",
            ));
        }

        let g = self.lock_state()?;
        g.accounts
            .iter()
            .copied()
            .find(|account| deterministic_signature(message, *account) == *signature)
            .ok_or_else(|| {
                PortError::Validation("signature was not produced by a known account".to_owned())
            })
    }

    fn drain_events(&self) -> Result<Vec<ProviderEvent>, PortError> {
        self.check_mode()?;
        let mut g = self.lock_state()?;
        Ok(std::mem::take(&mut g.events))
    }
}

fn record_event(state: &mut ProviderState, change: WalletChange) {
    state.event_seq = state.event_seq.saturating_add(1);
    state.events.push(ProviderEvent {
        sequence: state.event_seq,
        change,
    });
}

/// Stable stand-in signature for the deterministic runtime: 65 bytes derived
/// from the signer and message, recoverable by re-derivation.
fn deterministic_signature(message: &str, signer: Address) -> Bytes {
    let mut seed = Vec::new();
    seed.extend_from_slice(b"personal_sign");
    seed.extend_from_slice(signer.as_slice());
    seed.extend_from_slice(message.as_bytes());
    let hash = keccak256(seed);
    let mut sig = Vec::with_capacity(65);
    sig.extend_from_slice(hash.as_slice());
    sig.extend_from_slice(hash.as_slice());
    sig.push(27);
    Bytes::from(sig)
}

fn parse_accounts(result: &Value) -> Result<Vec<Address>, PortError> {
    let arr = result
        .as_array()
        .ok_or_else(|| PortError::Transport("account response must be array".to_owned()))?;
    let mut accounts = Vec::with_capacity(arr.len());
    for item in arr {
        let raw = item
            .as_str()
            .ok_or_else(|| PortError::Transport("account entry must be string".to_owned()))?;
        let parsed: Address = raw
            .parse()
            .map_err(|e| PortError::Validation(format!("invalid account address: {e}")))?;
        accounts.push(parsed);
    }
    Ok(accounts)
}

fn parse_chain_id(result: &Value) -> Result<ChainId, PortError> {
    if let Some(n) = result.as_u64() {
        return Ok(ChainId(n));
    }
    let raw = result
        .as_str()
        .ok_or_else(|| PortError::Validation("chain id must be string or number".to_owned()))?;
    raw.parse()
        .map_err(|e| PortError::Validation(format!("{e}")))
}

#[cfg(target_arch = "wasm32")]
impl Eip1193Adapter {
    pub async fn request_accounts_async(&self) -> Result<Vec<Address>, PortError> {
        self.check_mode()?;
        let result = self
            .browser_request("eth_requestAccounts", serde_json::json!([]))
            .await?;
        let accounts = parse_accounts(&result)?;
        // Empty grants pass through untouched; see the sync proxy arm.
        if accounts.is_empty() {
            return Ok(accounts);
        }
        let mut g = self.lock_state()?;
        g.accounts = accounts.clone();
        g.authorized = true;
        record_event(&mut g, WalletChange::AccountsChanged(accounts.clone()));
        Ok(accounts)
    }

    pub async fn chain_id_async(&self) -> Result<ChainId, PortError> {
        self.check_mode()?;
        let result = self
            .browser_request("eth_chainId", serde_json::json!([]))
            .await?;
        let chain_id = parse_chain_id(&result)?;
        let mut g = self.lock_state()?;
        if g.chain_id != chain_id {
            g.chain_id = chain_id;
            record_event(&mut g, WalletChange::ChainChanged(chain_id));
        }
        Ok(chain_id)
    }

    pub async fn switch_chain_async(&self, chain_id: ChainId) -> Result<(), PortError> {
        self.check_mode()?;
        self.browser_request(
            "wallet_switchEthereumChain",
            serde_json::json!([{ "chainId": chain_id.as_hex() }]),
        )
        .await?;
        let mut g = self.lock_state()?;
        g.chain_id = chain_id;
        record_event(&mut g, WalletChange::ChainChanged(chain_id));
        Ok(())
    }

    pub async fn add_chain_async(&self, descriptor: &ChainDescriptor) -> Result<(), PortError> {
        self.check_mode()?;
        self.browser_request("wallet_addEthereumChain", serde_json::json!([descriptor]))
            .await?;
        let mut g = self.lock_state()?;
        g.chain_id = descriptor.chain_id;
        record_event(&mut g, WalletChange::ChainChanged(descriptor.chain_id));
        Ok(())
    }

    pub async fn personal_sign_async(
        &self,
        message: &str,
        account: Address,
    ) -> Result<Bytes, PortError> {
        self.check_mode()?;
        let payload_hex = format!("0x{}", alloy::hex::encode(message.as_bytes()));
        let result = self
            .browser_request(
                "personal_sign",
                serde_json::json!([payload_hex, account.to_string()]),
            )
            .await?;
        let sig_raw = result.as_str().ok_or_else(|| {
            PortError::Transport("signature response must be hex string".to_owned())
        })?;
        sig_raw
            .parse()
            .map_err(|e| PortError::Validation(format!("invalid signature hex: {e}")))
    }

    pub async fn recover_signer_async(
        &self,
        message: &str,
        signature: &Bytes,
    ) -> Result<Address, PortError> {
        self.check_mode()?;
        let payload_hex = format!("0x{}", alloy::hex::encode(message.as_bytes()));
        let result = self
            .browser_request(
                "personal_ecRecover",
                serde_json::json!([payload_hex, signature.to_string()]),
            )
            .await?;
        let raw = result.as_str().ok_or_else(|| {
            PortError::Transport("recovery response must be address string".to_owned())
        })?;
        raw.parse()
            .map_err(|e| PortError::Validation(format!("invalid recovered address: {e}")))
    }

    async fn browser_request(&self, method: &str, params: Value) -> Result<Value, PortError> {
        use wasm_bindgen::JsCast;

        let provider = browser_provider()?;
        let request_fn = get_prop(&provider, "request")
            .ok()
            .and_then(|v| v.dyn_into::<js_sys::Function>().ok())
            .ok_or(PortError::NotImplemented(
                "window.ethereum.request is unavailable",
            ))?;

        let request = serde_json::json!({
            "method": method,
            "params": params,
        });
        let request_js = serde_wasm_bindgen::to_value(&request)
            .map_err(|e| PortError::Transport(format!("failed to encode provider request: {e}")))?;
        let promise_js = request_fn.call1(&provider, &request_js).map_err(|e| {
            PortError::Transport(format!("provider request dispatch failed: {e:?}"))
        })?;
        let promise = promise_js.dyn_into::<js_sys::Promise>().map_err(|_| {
            PortError::Transport("provider request did not return Promise".to_owned())
        })?;
        match wasm_bindgen_futures::JsFuture::from(promise).await {
            Ok(result_js) => serde_wasm_bindgen::from_value(result_js).map_err(|e| {
                PortError::Transport(format!("failed to decode provider response: {e}"))
            }),
            Err(rejection) => Err(rejection_to_port_error(rejection)),
        }
    }

    fn refresh_browser_snapshot(&self) -> Result<(), PortError> {
        use wasm_bindgen::JsValue;

        let provider = browser_provider()?;
        let selected = get_prop(&provider, "selectedAddress").unwrap_or(JsValue::NULL);
        let chain = get_prop(&provider, "chainId").unwrap_or(JsValue::NULL);

        let mut g = self.lock_state()?;

        if let Some(raw) = selected.as_string() {
            let parsed: Address = raw
                .parse()
                .map_err(|e| PortError::Validation(format!("invalid selectedAddress: {e}")))?;
            if g.accounts.first().copied() != Some(parsed) || !g.authorized {
                g.accounts = vec![parsed];
                g.authorized = true;
                record_event(&mut g, WalletChange::AccountsChanged(vec![parsed]));
            }
        }

        if let Some(raw) = chain.as_string() {
            let parsed: ChainId = raw
                .parse()
                .map_err(|e| PortError::Validation(format!("{e}")))?;
            if g.chain_id != parsed {
                g.chain_id = parsed;
                record_event(&mut g, WalletChange::ChainChanged(parsed));
            }
        }

        Ok(())
    }

    /// Registers `accountsChanged`/`chainChanged` listeners that feed the
    /// event queue. Must stay registered for the adapter's lifetime; the
    /// closures are retained in `hooks`.
    pub fn register_browser_hooks(&self) -> Result<(), PortError> {
        use wasm_bindgen::{closure::Closure, JsCast, JsValue};

        let provider = browser_provider()?;
        let on_fn = get_prop(&provider, "on")
            .ok()
            .and_then(|v| v.dyn_into::<js_sys::Function>().ok())
            .ok_or(PortError::NotImplemented(
                "provider does not expose on/addListener",
            ))?;

        let mut hooks = self
            .hooks
            .lock()
            .map_err(|e| PortError::Transport(format!("provider hooks lock poisoned: {e}")))?;
        if hooks.accounts_changed.is_some() && hooks.chain_changed.is_some() {
            return Ok(());
        }

        let state_for_accounts = Arc::clone(&self.state);
        let accounts_cb = Closure::<dyn FnMut(JsValue)>::new(move |value: JsValue| {
            let mut accounts = Vec::new();
            if js_sys::Array::is_array(&value) {
                for item in js_sys::Array::from(&value).iter() {
                    if let Some(raw) = item.as_string() {
                        if let Ok(addr) = raw.parse::<Address>() {
                            accounts.push(addr);
                        }
                    }
                }
            }
            if let Ok(mut g) = state_for_accounts.lock() {
                g.accounts = accounts.clone();
                g.authorized = !accounts.is_empty();
                record_event(&mut g, WalletChange::AccountsChanged(accounts));
            }
        });

        let state_for_chain = Arc::clone(&self.state);
        let chain_cb = Closure::<dyn FnMut(JsValue)>::new(move |value: JsValue| {
            if let Some(raw) = value.as_string() {
                if let Ok(chain_id) = raw.parse::<ChainId>() {
                    if let Ok(mut g) = state_for_chain.lock() {
                        g.chain_id = chain_id;
                        record_event(&mut g, WalletChange::ChainChanged(chain_id));
                    }
                }
            }
        });

        on_fn
            .call2(
                &provider,
                &JsValue::from_str("accountsChanged"),
                accounts_cb.as_ref().unchecked_ref(),
            )
            .map_err(|e| PortError::Transport(format!("register accountsChanged failed: {e:?}")))?;
        on_fn
            .call2(
                &provider,
                &JsValue::from_str("chainChanged"),
                chain_cb.as_ref().unchecked_ref(),
            )
            .map_err(|e| PortError::Transport(format!("register chainChanged failed: {e:?}")))?;

        hooks.accounts_changed = Some(accounts_cb);
        hooks.chain_changed = Some(chain_cb);
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
fn rejection_to_port_error(value: wasm_bindgen::JsValue) -> PortError {
    let code = js_sys::Reflect::get(&value, &wasm_bindgen::JsValue::from_str("code"))
        .ok()
        .and_then(|v| v.as_f64())
        .map(|v| v as i64);
    let message = js_sys::Reflect::get(&value, &wasm_bindgen::JsValue::from_str("message"))
        .ok()
        .and_then(|v| v.as_string())
        .unwrap_or_else(|| format!("provider request rejected: {value:?}"));
    PortError::from_rpc(code, &message)
}

#[cfg(target_arch = "wasm32")]
fn browser_provider_available() -> bool {
    browser_provider().is_ok()
}

#[cfg(target_arch = "wasm32")]
fn browser_provider() -> Result<wasm_bindgen::JsValue, PortError> {
    let window =
        web_sys::window().ok_or_else(|| PortError::Transport("missing window".to_owned()))?;
    let provider = get_prop(&window.into(), "ethereum")?;
    if provider.is_null() || provider.is_undefined() {
        return Err(PortError::NotDetected);
    }
    Ok(provider)
}

#[cfg(target_arch = "wasm32")]
fn get_prop(target: &wasm_bindgen::JsValue, key: &str) -> Result<wasm_bindgen::JsValue, PortError> {
    js_sys::Reflect::get(target, &wasm_bindgen::JsValue::from_str(key))
        .map_err(|e| PortError::Transport(format!("read provider property {key} failed: {e:?}")))
}
