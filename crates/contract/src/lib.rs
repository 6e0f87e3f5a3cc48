//! # mood-contract
//!
//! The Mood contract: a single stored string behind `getMood()` and `setMood(string)`.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

use alloy_sol_types::sol;

mod client;
pub use client::{ContractClient, ContractError, RpcContractClient, send_set_mood};

mod invoker;
pub use invoker::{ContractInvoker, InvokeError, NotReady};

sol! {
    #[sol(rpc)]
    interface IMood {
        #[derive(Debug)]
        function getMood() external view returns (string memory);
        #[derive(Debug)]
        function setMood(string memory _mood) external;
    }
}
