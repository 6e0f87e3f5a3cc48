//! Test doubles for the Mood dApp: a scripted wallet and an in-memory Mood contract.

#![warn(unused_crate_dependencies, unreachable_pub)]

#[macro_use]
extern crate tracing;

mod mood;
pub use mood::{MockMood, MockMoodClient};

mod wallet;
pub use wallet::MockWallet;

/// Initializes tracing for tests.
pub fn init_tracing() {
    let _ = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
