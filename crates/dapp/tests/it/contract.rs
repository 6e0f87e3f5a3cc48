//! Reading and setting the mood.

use crate::utils::*;
use mood_config::Config;
use mood_contract::NotReady;
use mood_dapp::{DappError, MoodDapp, OperationResult};
use mood_test_utils::{MockMood, MockMoodClient, MockWallet};
use mood_wallets::{NegotiationError, NoProvider, provider::methods};
use std::sync::Arc;

#[tokio::test]
async fn read_needs_no_wallet() {
    let mood = MockMood::default();
    mood.set(ALICE, "calm");
    let client = MockMoodClient::new(mood, Arc::new(NoProvider));
    let dapp = MoodDapp::with_client(Config::default(), Arc::new(NoProvider), Arc::new(client));

    assert_eq!(dapp.read_value().await.unwrap(), "calm");
    assert_eq!(dapp.get_mood().await.to_string(), "calm");
}

#[tokio::test]
async fn empty_mood_message() {
    let t = TestDapp::new(MockWallet::absent());
    assert_eq!(t.dapp.read_value().await.unwrap(), "");
    assert_eq!(t.dapp.get_mood().await.to_string(), "No mood set yet");
}

#[tokio::test]
async fn write_then_read() {
    let t = TestDapp::knowing_sepolia();
    t.dapp.connect().await.unwrap();

    let hash = t.dapp.write_value("happy").await.unwrap();
    assert_eq!(t.dapp.read_value().await.unwrap(), "happy");
    assert_eq!(t.mood.writes(), [(ALICE, "happy".to_string())]);

    let written = t.dapp.set_mood("sleepy").await;
    assert!(written.is_ok());
    let OperationResult::Written(second) = written else { panic!("{written:?}") };
    assert_ne!(second, hash);
    assert_eq!(
        written.to_string(),
        format!("Mood set successfully! Transaction hash: {second}")
    );
    assert_eq!(t.dapp.get_mood().await.to_string(), "sleepy");
}

#[tokio::test]
async fn write_requires_connection() {
    let t = TestDapp::knowing_sepolia();

    let err = t.dapp.write_value("happy").await.unwrap_err();
    assert!(matches!(err, DappError::NotReady(NotReady::Disconnected)), "{err:?}");
    assert_eq!(t.client.writes(), 0);
    assert_eq!(t.wallet.count(methods::SEND_TRANSACTION), 0);
    assert_eq!(t.mood.get(), "");
}

#[tokio::test]
async fn write_refused_off_network() {
    let t = TestDapp::new(MockWallet::new([ALICE]).on_chain(SEPOLIA).rejecting_switch());
    t.dapp.connect().await.unwrap();

    // the user moves to mainnet and then declines to come back
    t.wallet.change_chain(MAINNET);
    let err = t.dapp.write_value("happy").await.unwrap_err();
    assert!(
        matches!(err, DappError::NotReady(NotReady::Network(NegotiationError::Switch(_)))),
        "{err:?}"
    );
    assert!(err.is_user_rejection());
    assert_eq!(t.client.writes(), 0);
    assert_eq!(t.wallet.count(methods::SEND_TRANSACTION), 0);
    assert!(t.mood.writes().is_empty());

    // a refused write leaves the session alone
    assert!(t.dapp.sessions().session().is_connected());
}

#[tokio::test]
async fn write_renegotiates_after_chain_change() {
    let t = TestDapp::knowing_sepolia();
    t.dapp.connect().await.unwrap();
    t.wallet.change_chain(MAINNET);
    assert!(!t.dapp.sessions().session().chain_verified());

    t.dapp.write_value("happy").await.unwrap();
    assert_eq!(t.wallet.chain_id(), SEPOLIA);
    assert_eq!(t.wallet.count(methods::SWITCH_CHAIN), 2);
    assert!(t.dapp.sessions().session().chain_verified());
    assert_eq!(t.mood.get(), "happy");
}

#[tokio::test]
async fn write_from_the_active_account() {
    let t = TestDapp::new(MockWallet::new([ALICE, BOB]).on_chain(SEPOLIA));
    t.dapp.connect().await.unwrap();
    t.wallet.set_accounts([BOB, ALICE]);

    t.dapp.write_value("curious").await.unwrap();
    assert_eq!(t.mood.writes(), [(BOB, "curious".to_string())]);
}

#[tokio::test]
async fn read_failure_is_reported() {
    let t = TestDapp::new(MockWallet::absent());
    t.client.fail_reads(true);

    let err = t.dapp.read_value().await.unwrap_err();
    assert!(matches!(err, DappError::ReadFailed(_)), "{err:?}");

    let result = t.dapp.get_mood().await;
    assert!(result.error().is_some());
    assert_eq!(result.to_string(), "Error: failed to read the mood: connection refused");
}

#[tokio::test]
async fn write_to_undeployed_chain_fails() {
    // the wallet is on the configured network, but the contract only exists on Sepolia
    let mut config = Config::default();
    config.network.chain_id = MAINNET;
    let t = TestDapp::with_config(MockWallet::new([ALICE]), config);
    t.dapp.connect().await.unwrap();

    let err = t.dapp.write_value("happy").await.unwrap_err();
    assert!(matches!(err, DappError::WriteFailed(_)), "{err:?}");
    assert_eq!(t.client.writes(), 1);
    assert!(t.mood.writes().is_empty());
}
