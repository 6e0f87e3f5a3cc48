use alloy_primitives::{Address, ChainId, TxHash};
use async_trait::async_trait;
use mood_config::{ContractTarget, NamedChain};
use mood_contract::{ContractClient, ContractError, send_set_mood};
use mood_wallets::ProviderGateway;
use parking_lot::Mutex;
use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

/// An in-memory Mood contract deployed at a fixed address on a fixed chain.
#[derive(Clone, Debug)]
pub struct MockMood {
    address: Address,
    chain_id: ChainId,
    state: Arc<Mutex<MoodState>>,
}

#[derive(Debug, Default)]
struct MoodState {
    mood: String,
    writes: Vec<(Address, String)>,
}

impl Default for MockMood {
    fn default() -> Self {
        Self::new(ContractTarget::SEPOLIA_MOOD, NamedChain::Sepolia as u64)
    }
}

impl MockMood {
    pub fn new(address: Address, chain_id: ChainId) -> Self {
        Self { address, chain_id, state: Default::default() }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    /// The stored mood.
    pub fn get(&self) -> String {
        self.state.lock().mood.clone()
    }

    pub fn set(&self, from: Address, mood: impl Into<String>) {
        let mood = mood.into();
        let mut state = self.state.lock();
        state.writes.push((from, mood.clone()));
        state.mood = mood;
    }

    /// Every accepted `setMood`, in order.
    pub fn writes(&self) -> Vec<(Address, String)> {
        self.state.lock().writes.clone()
    }
}

/// A [`ContractClient`] over a [`MockMood`].
///
/// Reads go straight to the contract. Writes take the real path: ABI-encoded and sent through the
/// wallet with `eth_sendTransaction`, which is where a [`MockWallet`](crate::MockWallet) applies
/// them.
#[derive(Clone)]
pub struct MockMoodClient {
    mood: MockMood,
    gateway: Arc<dyn ProviderGateway>,
    reads: Arc<AtomicUsize>,
    writes: Arc<AtomicUsize>,
    fail_reads: Arc<AtomicBool>,
}

impl MockMoodClient {
    pub fn new(mood: MockMood, gateway: Arc<dyn ProviderGateway>) -> Self {
        Self {
            mood,
            gateway,
            reads: Default::default(),
            writes: Default::default(),
            fail_reads: Default::default(),
        }
    }

    /// Number of `getMood` calls that reached the client.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of `setMood` calls that reached the client.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Makes every subsequent read fail like an unreachable RPC endpoint.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ContractClient for MockMoodClient {
    async fn read_mood(&self, target: Address) -> Result<String, ContractError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ContractError::Backend("connection refused".to_string()));
        }
        if target != self.mood.address() {
            return Err(ContractError::Backend(format!("no contract deployed at {target}")));
        }
        Ok(self.mood.get())
    }

    async fn write_mood(
        &self,
        target: Address,
        from: Address,
        mood: &str,
    ) -> Result<TxHash, ContractError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(send_set_mood(self.gateway.as_ref(), target, from, mood).await?)
    }
}
