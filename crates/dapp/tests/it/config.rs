//! Wiring from configuration.

use crate::utils::*;
use mood_config::Config;
use mood_dapp::{DappError, MoodDapp, SessionStatus};
use mood_test_utils::MockWallet;
use mood_wallets::{NoProvider, ProviderError, provider::methods};
use std::{sync::Arc, time::Duration};

#[test]
fn loads_from_file_and_environment() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "mood.toml",
            r#"
                rpc_url = "http://localhost:8545"
                request_timeout = 5
            "#,
        )?;
        jail.set_env("MOOD_CONTRACT__ADDRESS", "0x5FbDB2315678afecb367f032d93F642f64180aa3");

        let dapp = MoodDapp::load(Arc::new(NoProvider)).map_err(|err| err.to_string())?;
        let config = dapp.config();
        assert_eq!(config.read_rpc_url(), Some("http://localhost:8545"));
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(
            config.contract.address.to_string(),
            "0x5FbDB2315678afecb367f032d93F642f64180aa3"
        );
        assert_eq!(config.network.chain_id, SEPOLIA);
        Ok(())
    });
}

#[test]
fn invalid_config_is_an_error() {
    figment::Jail::expect_with(|jail| {
        jail.create_file("mood.toml", "request_timeout = \"soon\"")?;
        let err = MoodDapp::load(Arc::new(NoProvider)).unwrap_err();
        assert!(matches!(err, DappError::Config(_)), "{err:?}");
        Ok(())
    });
}

#[test]
fn invalid_rpc_url_is_an_error() {
    let config = Config { rpc_url: Some("localhost 8545".to_string()), ..Default::default() };
    let err = MoodDapp::new(config, Arc::new(NoProvider)).unwrap_err();
    assert!(matches!(err, DappError::Setup(_)), "{err:?}");
}

#[tokio::test(start_paused = true)]
async fn unanswered_prompt_times_out() {
    let config = Config { request_timeout: Some(30), ..Default::default() };
    let t = TestDapp::with_config(MockWallet::new([ALICE]).on_chain(SEPOLIA), config);
    t.wallet.pause_approvals();

    let err = t.dapp.connect().await.unwrap_err();
    match &err {
        DappError::ProviderRejected(ProviderError::Timeout { method, timeout }) => {
            assert_eq!(method, methods::REQUEST_ACCOUNTS);
            assert_eq!(*timeout, Duration::from_secs(30));
        }
        err => panic!("unexpected error: {err:?}"),
    }
    assert_eq!(t.dapp.session_snapshot().status, SessionStatus::Disconnected);
}

#[tokio::test(start_paused = true)]
async fn no_timeout_by_default() {
    let t = TestDapp::new(MockWallet::new([ALICE]).on_chain(SEPOLIA));
    t.wallet.pause_approvals();

    let pending = tokio::time::timeout(Duration::from_secs(3600), t.dapp.connect()).await;
    assert!(pending.is_err(), "connect should still be waiting on the wallet");

    t.wallet.approve(1);
    assert_eq!(t.dapp.connect().await.unwrap().account, Some(ALICE));
}
