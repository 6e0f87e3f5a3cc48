use alloy_primitives::{Address, ChainId, TxHash, U64, keccak256};
use alloy_rpc_types_eth::TransactionRequest;
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use mood_config::NamedChain;
use mood_contract::IMood;
use mood_wallets::{
    EventHandler, EventHub, ProviderError, ProviderEvent, ProviderEventKind, ProviderGateway,
    Subscription,
    error::codes,
    provider::{AddEthereumChainParameter, SwitchEthereumChainParameter, methods},
};
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::{collections::BTreeSet, sync::Arc};
use tokio::sync::Semaphore;

use crate::MockMood;

/// A scripted EIP-1193 wallet.
///
/// Starts on mainnet, knows mainnet and nothing else, and hands out its accounts to whoever asks.
/// Cloning yields another handle on the same wallet.
#[derive(Clone)]
pub struct MockWallet {
    state: Arc<Mutex<WalletState>>,
    events: EventHub,
    approvals: Arc<Semaphore>,
    mood: MockMood,
}

#[derive(Debug)]
struct WalletState {
    available: bool,
    chain_id: ChainId,
    known_chains: BTreeSet<ChainId>,
    accounts: Vec<Address>,
    authorized: bool,
    reject_accounts: bool,
    reject_switch: bool,
    reject_add: bool,
    gated: bool,
    requests: Vec<(String, Value)>,
    sent: u64,
}

impl MockWallet {
    pub fn new(accounts: impl IntoIterator<Item = Address>) -> Self {
        let mainnet = NamedChain::Mainnet as u64;
        Self {
            state: Arc::new(Mutex::new(WalletState {
                available: true,
                chain_id: mainnet,
                known_chains: BTreeSet::from([mainnet]),
                accounts: accounts.into_iter().collect(),
                authorized: false,
                reject_accounts: false,
                reject_switch: false,
                reject_add: false,
                gated: false,
                requests: Vec::new(),
                sent: 0,
            })),
            events: EventHub::new(),
            approvals: Arc::new(Semaphore::new(0)),
            mood: MockMood::default(),
        }
    }

    /// No wallet injected: every request fails with [`ProviderError::Unavailable`].
    pub fn absent() -> Self {
        let wallet = Self::new([]);
        wallet.state.lock().available = false;
        wallet
    }

    /// Applies `setMood` transactions to `mood` instead of the default Sepolia deployment.
    pub fn with_mood(mut self, mood: MockMood) -> Self {
        self.mood = mood;
        self
    }

    /// Puts the wallet on `chain_id`, registering it if needed. Emits nothing.
    pub fn on_chain(self, chain_id: ChainId) -> Self {
        {
            let mut state = self.state.lock();
            state.known_chains.insert(chain_id);
            state.chain_id = chain_id;
        }
        self
    }

    /// Registers `chain_id` without switching to it.
    pub fn knowing(self, chain_id: ChainId) -> Self {
        self.state.lock().known_chains.insert(chain_id);
        self
    }

    /// Accounts are already authorized, as after a previous visit.
    pub fn authorized(self) -> Self {
        self.state.lock().authorized = true;
        self
    }

    /// The user declines the account access prompt.
    pub fn rejecting_accounts(self) -> Self {
        self.state.lock().reject_accounts = true;
        self
    }

    /// The user declines network switch prompts.
    pub fn rejecting_switch(self) -> Self {
        self.state.lock().reject_switch = true;
        self
    }

    /// The user declines network registration prompts.
    pub fn rejecting_add_chain(self) -> Self {
        self.state.lock().reject_add = true;
        self
    }

    /// Holds every `eth_requestAccounts` prompt open until [`approve`](Self::approve) is called.
    pub fn pause_approvals(&self) {
        self.state.lock().gated = true;
    }

    /// Lets `n` held account prompts through.
    pub fn approve(&self, n: usize) {
        self.approvals.add_permits(n);
    }

    /// Replaces the account list and emits `accountsChanged`.
    pub fn set_accounts(&self, accounts: impl IntoIterator<Item = Address>) {
        let accounts: Vec<Address> = accounts.into_iter().collect();
        {
            let mut state = self.state.lock();
            state.authorized = !accounts.is_empty();
            state.accounts = accounts.clone();
        }
        self.emit(ProviderEvent::AccountsChanged(accounts));
    }

    /// The user switched chains from the wallet UI.
    pub fn change_chain(&self, chain_id: ChainId) {
        {
            let mut state = self.state.lock();
            state.known_chains.insert(chain_id);
            state.chain_id = chain_id;
        }
        self.emit(ProviderEvent::ChainChanged(chain_id));
    }

    pub fn emit(&self, event: ProviderEvent) {
        self.events.emit(&event);
    }

    pub fn chain_id(&self) -> ChainId {
        self.state.lock().chain_id
    }

    pub fn knows_chain(&self, chain_id: ChainId) -> bool {
        self.state.lock().known_chains.contains(&chain_id)
    }

    /// Number of requests made for `method`.
    pub fn count(&self, method: &str) -> usize {
        self.state.lock().requests.iter().filter(|(m, _)| m == method).count()
    }

    /// Every requested method, in order.
    pub fn methods(&self) -> Vec<String> {
        self.state.lock().requests.iter().map(|(m, _)| m.clone()).collect()
    }

    /// Parameters of the last request for `method`.
    pub fn last_params(&self, method: &str) -> Option<Value> {
        self.state.lock().requests.iter().rev().find(|(m, _)| m == method).map(|(_, p)| p.clone())
    }

    pub fn listener_count(&self, kind: ProviderEventKind) -> usize {
        self.events.listener_count(kind)
    }

    fn answer_switch(&self, params: &Value) -> Result<Value, ProviderError> {
        let param: SwitchEthereumChainParameter = first_param(methods::SWITCH_CHAIN, params)?;
        let chain_id = parse_chain_id(methods::SWITCH_CHAIN, &param.chain_id)?;
        let changed = {
            let mut state = self.state.lock();
            if state.reject_switch {
                return Err(user_rejected(methods::SWITCH_CHAIN));
            }
            if !state.known_chains.contains(&chain_id) {
                return Err(ProviderError::rejected(
                    methods::SWITCH_CHAIN,
                    codes::UNRECOGNIZED_CHAIN,
                    format!("Unrecognized chain ID \"{}\"", param.chain_id),
                ));
            }
            std::mem::replace(&mut state.chain_id, chain_id) != chain_id
        };
        if changed {
            self.emit(ProviderEvent::ChainChanged(chain_id));
        }
        Ok(Value::Null)
    }

    fn answer_add_chain(&self, params: &Value) -> Result<Value, ProviderError> {
        let param: AddEthereumChainParameter = first_param(methods::ADD_CHAIN, params)?;
        let chain_id = parse_chain_id(methods::ADD_CHAIN, &param.chain_id)?;
        let mut state = self.state.lock();
        if state.reject_add {
            return Err(user_rejected(methods::ADD_CHAIN));
        }
        state.known_chains.insert(chain_id);
        Ok(Value::Null)
    }

    async fn answer_request_accounts(&self) -> Result<Value, ProviderError> {
        let gated = self.state.lock().gated;
        if gated {
            let permit = self
                .approvals
                .acquire()
                .await
                .map_err(|err| {
                    ProviderError::rejected(methods::REQUEST_ACCOUNTS, codes::DISCONNECTED, err.to_string())
                })?;
            permit.forget();
        }
        let mut state = self.state.lock();
        if state.reject_accounts {
            return Err(user_rejected(methods::REQUEST_ACCOUNTS));
        }
        state.authorized = true;
        Ok(json!(state.accounts))
    }

    fn answer_send_transaction(&self, params: &Value) -> Result<Value, ProviderError> {
        let tx: TransactionRequest = first_param(methods::SEND_TRANSACTION, params)?;
        let mut state = self.state.lock();
        let from = tx.from.filter(|from| state.authorized && state.accounts.contains(from));
        let Some(from) = from else {
            return Err(ProviderError::rejected(
                methods::SEND_TRANSACTION,
                codes::UNAUTHORIZED,
                "The requested account has not been authorized by the user.",
            ));
        };
        if tx.to.and_then(|to| to.to().copied()) == Some(self.mood.address()) {
            if state.chain_id != self.mood.chain_id() {
                return Err(ProviderError::rejected(
                    methods::SEND_TRANSACTION,
                    codes::CHAIN_DISCONNECTED,
                    "contract is not deployed on the active chain",
                ));
            }
            let input = tx.input.input().cloned().unwrap_or_default();
            let call = IMood::setMoodCall::abi_decode(&input).map_err(|err| {
                ProviderError::rejected(methods::SEND_TRANSACTION, -32000, err.to_string())
            })?;
            self.mood.set(from, call._mood);
        }
        state.sent += 1;
        let hash: TxHash = keccak256(state.sent.to_be_bytes());
        Ok(json!(hash))
    }
}

#[async_trait]
impl ProviderGateway for MockWallet {
    fn is_available(&self) -> bool {
        self.state.lock().available
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let available = {
            let mut state = self.state.lock();
            state.requests.push((method.to_string(), params.clone()));
            state.available
        };
        if !available {
            return Err(ProviderError::Unavailable);
        }
        trace!(method, "mock wallet request");

        match method {
            methods::CHAIN_ID => Ok(json!(U64::from(self.chain_id()))),
            methods::ACCOUNTS => {
                let state = self.state.lock();
                Ok(if state.authorized { json!(state.accounts) } else { json!([]) })
            }
            methods::REQUEST_ACCOUNTS => self.answer_request_accounts().await,
            methods::SWITCH_CHAIN => self.answer_switch(&params),
            methods::ADD_CHAIN => self.answer_add_chain(&params),
            methods::SEND_TRANSACTION => self.answer_send_transaction(&params),
            _ => Err(ProviderError::rejected(
                method,
                codes::UNSUPPORTED_METHOD,
                "The requested method is not supported by this Ethereum provider.",
            )),
        }
    }

    fn subscribe(&self, kind: ProviderEventKind, handler: EventHandler) -> Subscription {
        self.events.subscribe(kind, handler)
    }
}

impl std::fmt::Debug for MockWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockWallet").field("state", &*self.state.lock()).finish_non_exhaustive()
    }
}

fn user_rejected(method: &str) -> ProviderError {
    ProviderError::rejected(method, codes::USER_REJECTED_REQUEST, "User rejected the request.")
}

fn first_param<T: serde::de::DeserializeOwned>(
    method: &str,
    params: &Value,
) -> Result<T, ProviderError> {
    let param = params.get(0).cloned().unwrap_or(Value::Null);
    serde_json::from_value(param).map_err(|err| ProviderError::rejected(method, -32602, err.to_string()))
}

fn parse_chain_id(method: &str, hex: &str) -> Result<ChainId, ProviderError> {
    hex.strip_prefix("0x")
        .and_then(|digits| u64::from_str_radix(digits, 16).ok())
        .ok_or_else(|| ProviderError::rejected(method, -32602, format!("invalid chain id {hex}")))
}
