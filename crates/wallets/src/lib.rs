//! # mood-wallets
//!
//! Wallet connectivity for the Mood dApp, following
//! [EIP-1193](https://eips.ethereum.org/EIPS/eip-1193) for the provider API and
//! [EIP-3085](https://eips.ethereum.org/EIPS/eip-3085) /
//! [EIP-3326](https://eips.ethereum.org/EIPS/eip-3326) for adding and switching chains.
//!
//! ## Architecture
//!
//! 1. [`ProviderGateway`] is a thin request/subscribe handle on the wallet.
//! 2. [`NetworkNegotiator`] brings the wallet onto the required chain, registering the chain
//!    first if the wallet does not know it.
//! 3. [`SessionManager`] owns the connection state and follows the wallet's
//!    `accountsChanged`/`chainChanged` events.
//!
//! All of it is driven from a single task: calls suspend while the wallet answers and event
//! handlers run to completion one at a time.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

pub mod error;
pub use error::ProviderError;

pub mod provider;
pub use provider::{
    EventHandler, EventHub, HttpGateway, NoProvider, ProviderEvent, ProviderEventKind,
    ProviderGateway, ProviderGatewayExt, Subscription, TimeoutGateway,
};

pub mod network;
pub use network::{Negotiation, NegotiationError, NetworkNegotiator};

pub mod session;
pub use session::{Session, SessionError, SessionManager, SessionSnapshot, SessionStatus};
