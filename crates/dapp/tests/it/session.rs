//! Connecting, disconnecting and following wallet events.

use crate::utils::*;
use mood_dapp::{DappError, MoodDapp, SessionStatus};
use mood_test_utils::MockWallet;
use mood_wallets::{NoProvider, ProviderEventKind, provider::methods};
use std::sync::Arc;

#[tokio::test]
async fn connect_switches_network_then_requests_accounts() {
    let t = TestDapp::knowing_sepolia();

    let snapshot = t.dapp.connect().await.unwrap();
    assert_eq!(snapshot.status, SessionStatus::Connected);
    assert_eq!(snapshot.account, Some(ALICE));
    assert_eq!(t.wallet.chain_id(), SEPOLIA);
    assert_eq!(
        t.wallet.methods(),
        [methods::CHAIN_ID, methods::SWITCH_CHAIN, methods::REQUEST_ACCOUNTS]
    );
    assert!(t.dapp.sessions().session().chain_verified());

    // already connected: nothing is asked of the wallet again
    assert_eq!(t.dapp.connect().await.unwrap(), snapshot);
    assert_eq!(t.wallet.count(methods::REQUEST_ACCOUNTS), 1);
}

#[tokio::test]
async fn concurrent_connects_share_one_attempt() {
    let t = TestDapp::knowing_sepolia();
    t.wallet.pause_approvals();

    let (first, second, ()) = tokio::join!(t.dapp.connect(), t.dapp.connect(), async {
        tokio::task::yield_now().await;
        t.wallet.approve(1);
    });

    assert_eq!(first.unwrap(), second.unwrap());
    assert_eq!(t.wallet.count(methods::CHAIN_ID), 1);
    assert_eq!(t.wallet.count(methods::SWITCH_CHAIN), 1);
    assert_eq!(t.wallet.count(methods::REQUEST_ACCOUNTS), 1);
    assert_eq!(t.dapp.session_snapshot().account, Some(ALICE));
}

#[tokio::test]
async fn missing_wallet() {
    let t = TestDapp::new(MockWallet::absent());
    let err = t.dapp.connect().await.unwrap_err();
    assert!(matches!(err, DappError::ProviderUnavailable), "{err:?}");
    assert_eq!(t.dapp.session_snapshot().status, SessionStatus::Disconnected);
    assert!(t.wallet.methods().is_empty());

    let dapp = MoodDapp::with_client(
        Default::default(),
        Arc::new(NoProvider),
        Arc::new(t.client.clone()),
    );
    assert!(matches!(dapp.connect().await, Err(DappError::ProviderUnavailable)));
    assert_eq!(dapp.session_snapshot().status, SessionStatus::Disconnected);
}

#[tokio::test]
async fn declined_account_access() {
    let t = TestDapp::new(MockWallet::new([ALICE]).on_chain(SEPOLIA).rejecting_accounts());
    let err = t.dapp.connect().await.unwrap_err();
    assert!(matches!(err, DappError::AccessDenied), "{err:?}");
    t.assert_session_invariant();
    assert_eq!(t.dapp.session_snapshot().status, SessionStatus::Disconnected);
    assert_eq!(t.wallet.listener_count(ProviderEventKind::AccountsChanged), 0);
}

#[tokio::test]
async fn wallet_without_accounts() {
    let t = TestDapp::new(MockWallet::new([]).on_chain(SEPOLIA));
    assert!(matches!(t.dapp.connect().await, Err(DappError::AccessDenied)));
    t.assert_session_invariant();
}

#[tokio::test]
async fn revoked_accounts_disconnect() {
    let t = TestDapp::knowing_sepolia();
    t.dapp.connect().await.unwrap();
    assert_eq!(t.wallet.listener_count(ProviderEventKind::AccountsChanged), 1);

    t.wallet.set_accounts([]);

    let snapshot = t.dapp.session_snapshot();
    assert_eq!(snapshot.status, SessionStatus::Disconnected);
    assert_eq!(snapshot.account, None);
    assert_eq!(t.wallet.listener_count(ProviderEventKind::AccountsChanged), 0);
    assert_eq!(t.wallet.listener_count(ProviderEventKind::ChainChanged), 0);
}

#[tokio::test]
async fn account_present_iff_connected_across_events() {
    let t = TestDapp::knowing_sepolia();
    t.assert_session_invariant();

    // events before connecting are ignored
    t.wallet.set_accounts([BOB]);
    t.assert_session_invariant();
    assert_eq!(t.dapp.session_snapshot().status, SessionStatus::Disconnected);

    t.wallet.set_accounts([ALICE]);
    t.dapp.connect().await.unwrap();
    t.assert_session_invariant();

    t.wallet.set_accounts([BOB, ALICE]);
    t.assert_session_invariant();
    assert_eq!(t.dapp.session_snapshot().account, Some(BOB));

    t.wallet.change_chain(MAINNET);
    t.assert_session_invariant();

    t.wallet.set_accounts([]);
    t.assert_session_invariant();

    t.wallet.set_accounts([ALICE]);
    t.assert_session_invariant();
    assert_eq!(t.dapp.session_snapshot().status, SessionStatus::Disconnected);

    t.wallet.set_accounts([]);
    t.assert_session_invariant();
}

#[tokio::test]
async fn disconnect_releases_subscriptions() {
    let t = TestDapp::knowing_sepolia();
    t.dapp.connect().await.unwrap();

    let snapshot = t.dapp.disconnect();
    assert_eq!(snapshot.status, SessionStatus::Disconnected);
    assert_eq!(snapshot.account, None);
    assert_eq!(t.wallet.listener_count(ProviderEventKind::AccountsChanged), 0);

    // a reconnect subscribes exactly once again
    t.dapp.connect().await.unwrap();
    assert_eq!(t.wallet.listener_count(ProviderEventKind::AccountsChanged), 1);
    assert_eq!(t.wallet.listener_count(ProviderEventKind::ChainChanged), 1);
}

#[tokio::test]
async fn disconnect_overtakes_pending_connect() {
    let t = TestDapp::knowing_sepolia();
    t.wallet.pause_approvals();

    let (connect, ()) = tokio::join!(t.dapp.connect(), async {
        tokio::task::yield_now().await;
        t.dapp.disconnect();
        t.wallet.approve(1);
    });

    assert!(matches!(connect, Err(DappError::Aborted)), "{connect:?}");
    assert_eq!(t.dapp.session_snapshot().status, SessionStatus::Disconnected);
    t.assert_session_invariant();
}

#[tokio::test]
async fn chain_change_keeps_session() {
    let t = TestDapp::knowing_sepolia();
    t.dapp.connect().await.unwrap();

    t.wallet.change_chain(MAINNET);

    let session = t.dapp.sessions().session();
    assert!(session.is_connected());
    assert_eq!(session.account(), Some(ALICE));
    assert!(!session.chain_verified());
}

#[tokio::test]
async fn chain_change_during_account_prompt_is_kept() {
    let t = TestDapp::knowing_sepolia();
    t.wallet.pause_approvals();

    let (connect, ()) = tokio::join!(t.dapp.connect(), async {
        tokio::task::yield_now().await;
        t.wallet.change_chain(MAINNET);
        t.wallet.approve(1);
    });

    assert_eq!(connect.unwrap().account, Some(ALICE));
    assert_eq!(t.wallet.chain_id(), MAINNET);
    let session = t.dapp.sessions().session();
    assert!(session.is_connected());
    assert!(!session.chain_verified());
}

#[tokio::test]
async fn start_restores_prior_authorization() {
    let t = TestDapp::new(MockWallet::new([ALICE]).authorized());

    let snapshot = t.dapp.start().await.unwrap();
    assert_eq!(snapshot.status, SessionStatus::Connected);
    assert_eq!(snapshot.account, Some(ALICE));
    // no prompt and no network change on startup
    assert_eq!(t.wallet.methods(), [methods::ACCOUNTS]);
    assert_eq!(t.wallet.chain_id(), MAINNET);
    assert!(!t.dapp.sessions().session().chain_verified());

    // events are followed from the restored session on
    t.wallet.set_accounts([]);
    assert_eq!(t.dapp.session_snapshot().status, SessionStatus::Disconnected);
}

#[tokio::test]
async fn start_without_authorization() {
    let t = TestDapp::knowing_sepolia();
    let snapshot = t.dapp.start().await.unwrap();
    assert_eq!(snapshot.status, SessionStatus::Disconnected);
    assert_eq!(t.wallet.listener_count(ProviderEventKind::AccountsChanged), 0);

    let t = TestDapp::new(MockWallet::absent());
    assert_eq!(t.dapp.start().await.unwrap().status, SessionStatus::Disconnected);
}
