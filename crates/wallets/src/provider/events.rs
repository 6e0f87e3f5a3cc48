//! Provider-pushed events and their subscriptions.

use alloy_primitives::{Address, ChainId, U64};
use parking_lot::Mutex;
use serde_json::Value;
use std::{
    fmt,
    sync::{Arc, Weak},
};

use crate::ProviderError;

/// Callback invoked for every event of the kind it was registered for.
pub type EventHandler = Arc<dyn Fn(&ProviderEvent) + Send + Sync>;

/// The two EIP-1193 events the dApp listens to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProviderEventKind {
    AccountsChanged,
    ChainChanged,
}

impl ProviderEventKind {
    /// The event name on the EIP-1193 wire.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AccountsChanged => "accountsChanged",
            Self::ChainChanged => "chainChanged",
        }
    }
}

impl fmt::Display for ProviderEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event pushed by the wallet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProviderEvent {
    /// The set of authorized accounts changed. Empty when the user revoked access or locked the
    /// wallet.
    AccountsChanged(Vec<Address>),
    /// The wallet's active chain changed.
    ChainChanged(ChainId),
}

impl ProviderEvent {
    pub fn kind(&self) -> ProviderEventKind {
        match self {
            Self::AccountsChanged(_) => ProviderEventKind::AccountsChanged,
            Self::ChainChanged(_) => ProviderEventKind::ChainChanged,
        }
    }

    /// Parses a raw EIP-1193 event, as emitted by `provider.on(name, payload)`.
    pub fn from_wire(name: &str, payload: Value) -> Result<Self, ProviderError> {
        match name {
            "accountsChanged" => serde_json::from_value(payload)
                .map(Self::AccountsChanged)
                .map_err(|err| ProviderError::invalid_response(name, err)),
            "chainChanged" => serde_json::from_value::<U64>(payload)
                .map(|id| Self::ChainChanged(id.to::<u64>()))
                .map_err(|err| ProviderError::invalid_response(name, err)),
            _ => Err(ProviderError::invalid_response(name, "unknown provider event")),
        }
    }
}

/// A registered event handler.
///
/// The handler stays registered until [`unsubscribe`](Self::unsubscribe) is called or the
/// subscription is dropped.
#[must_use = "dropping a subscription unregisters its handler"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self { release: Some(Box::new(release)) }
    }

    /// A subscription that never receives anything, for providers without events.
    pub fn noop() -> Self {
        Self { release: None }
    }

    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("active", &self.release.is_some()).finish()
    }
}

/// Ordered listener registry shared by gateway implementations.
///
/// Events are delivered one at a time: a handler runs to completion before the next event (or the
/// next handler for the same event) starts. Handlers must not emit from within a handler.
#[derive(Clone, Default)]
pub struct EventHub {
    listeners: Arc<Mutex<Listeners>>,
    delivery: Arc<Mutex<()>>,
}

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, ProviderEventKind, EventHandler)>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for events of `kind`.
    pub fn subscribe(&self, kind: ProviderEventKind, handler: EventHandler) -> Subscription {
        let id = {
            let mut listeners = self.listeners.lock();
            let id = listeners.next_id;
            listeners.next_id += 1;
            listeners.entries.push((id, kind, handler));
            id
        };
        trace!(%kind, id, "subscribed");

        let listeners: Weak<Mutex<Listeners>> = Arc::downgrade(&self.listeners);
        Subscription::new(move || {
            if let Some(listeners) = listeners.upgrade() {
                listeners.lock().entries.retain(|(entry, ..)| *entry != id);
                trace!(%kind, id, "unsubscribed");
            }
        })
    }

    /// Delivers `event` to every handler registered for its kind, in registration order.
    pub fn emit(&self, event: &ProviderEvent) {
        let _delivery = self.delivery.lock();
        let kind = event.kind();
        let handlers: Vec<EventHandler> = self
            .listeners
            .lock()
            .entries
            .iter()
            .filter(|(_, entry, _)| *entry == kind)
            .map(|(.., handler)| handler.clone())
            .collect();
        debug!(%kind, listeners = handlers.len(), "provider event");
        for handler in handlers {
            handler(event);
        }
    }

    /// Number of handlers currently registered for `kind`.
    pub fn listener_count(&self, kind: ProviderEventKind) -> usize {
        self.listeners.lock().entries.iter().filter(|(_, entry, _)| *entry == kind).count()
    }
}

impl fmt::Debug for EventHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHub").field("listeners", &self.listeners.lock().entries.len()).finish()
    }
}
