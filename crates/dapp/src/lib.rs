//! # mood-dapp
//!
//! The surface a view layer drives: connect a wallet, read the stored mood, set a new one.
//!
//! ```ignore
//! use mood_dapp::MoodDapp;
//!
//! let dapp = MoodDapp::load(gateway)?;
//! dapp.start().await?;
//! dapp.connect().await?;
//! println!("{}", dapp.set_mood("happy").await);
//! println!("{}", dapp.get_mood().await);
//! ```

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

mod dapp;
pub use dapp::MoodDapp;

mod error;
pub use error::DappError;

mod outcome;
pub use outcome::OperationResult;

pub use mood_config::Config;
pub use mood_wallets::{SessionSnapshot, SessionStatus};
