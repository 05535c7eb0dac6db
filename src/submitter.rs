//! Transaction submission with an observable lifecycle state machine.
//!
//! One submitter owns at most one in-flight transaction. Phases only move
//! forward (`idle -> pending -> confirming -> success | error`); the only
//! way back to `idle` is an explicit [`TransactionSubmitter::reset`].

use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use alloy::primitives::B256;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::consts::{CONFIRM_POLL_INTERVAL_SECS, CONFIRM_TIMEOUT_SECS};
use crate::errors::{TxError, TxErrorKind};
use crate::gas::GasEstimator;
use crate::provider::{TxRequest, WalletProvider};

/// Lifecycle phase of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxPhase {
    Idle,
    /// Waiting for the wallet to sign and broadcast.
    Pending,
    /// Broadcast; waiting for an on-chain receipt.
    Confirming,
    Success,
    Error,
}

/// Observable state of the current/last submission.
#[derive(Debug, Clone)]
pub struct TxState {
    pub phase: TxPhase,
    /// Set exactly once per submission, cleared only by reset.
    pub hash: Option<B256>,
    /// Present only in the error phase.
    pub error: Option<TxError>,
}

impl TxState {
    fn idle() -> Self {
        Self {
            phase: TxPhase::Idle,
            hash: None,
            error: None,
        }
    }
}

/// Submits contract writes through a [`WalletProvider`], pricing them with
/// the [`GasEstimator`] and tracking the lifecycle in a shared [`TxState`].
pub struct TransactionSubmitter<W> {
    wallet: Arc<W>,
    estimator: GasEstimator,
    state: Arc<StdMutex<TxState>>,
    // Serializes submissions; try_lock failure means one is in flight.
    tx_lock: Arc<Mutex<()>>,
    confirm_interval: Duration,
    confirm_timeout: Duration,
}

impl<W: WalletProvider> TransactionSubmitter<W> {
    pub fn new(wallet: Arc<W>, estimator: GasEstimator) -> Self {
        Self {
            wallet,
            estimator,
            state: Arc::new(StdMutex::new(TxState::idle())),
            tx_lock: Arc::new(Mutex::new(())),
            confirm_interval: Duration::from_secs(CONFIRM_POLL_INTERVAL_SECS),
            confirm_timeout: Duration::from_secs(CONFIRM_TIMEOUT_SECS),
        }
    }

    /// Override the confirmation polling cadence and ceiling.
    pub fn with_confirmation(mut self, interval: Duration, timeout: Duration) -> Self {
        self.confirm_interval = interval;
        self.confirm_timeout = timeout;
        self
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> TxState {
        self.state.lock().expect("tx state lock poisoned").clone()
    }

    /// True while a submission is between broadcast request and receipt.
    pub fn is_in_flight(&self) -> bool {
        matches!(self.state().phase, TxPhase::Pending | TxPhase::Confirming)
    }

    /// Return the state to idle, clearing hash and error, so the same
    /// holder can run a fresh submission.
    pub fn reset(&self) {
        *self.state.lock().expect("tx state lock poisoned") = TxState::idle();
    }

    /// Submit a write: estimate gas, sign, broadcast, then poll for the
    /// receipt until confirmation or the timeout ceiling.
    ///
    /// Exactly one terminal phase is reached per submission. Gas estimation
    /// failures are recovered internally and never abort the submission.
    pub async fn submit(&self, req: TxRequest) -> Result<B256, TxError> {
        // Re-entrancy guard: rapid repeated clicks must not double-submit.
        // Acquired before any state write so a rejected call can never
        // touch the state owned by the in-flight submission.
        let _guard = match self.tx_lock.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                return Err(TxError::new(
                    TxErrorKind::Unknown,
                    "A transaction is already in flight for this action.",
                ));
            }
        };

        if self.wallet.address().is_none() {
            let err = TxError::new(
                TxErrorKind::NotConnected,
                TxErrorKind::NotConnected.user_message(),
            );
            self.fail(err.clone());
            return Err(err);
        }

        self.set_state(TxState {
            phase: TxPhase::Pending,
            hash: None,
            error: None,
        });

        // Live estimate first, static table on any failure. Never surfaces.
        let gas = match self.wallet.estimate_gas(&req).await {
            Ok(live) => self.estimator.refine(&req.function, live),
            Err(e) => {
                debug!(
                    function = %req.function,
                    error = %e,
                    "live gas estimation failed, falling back to static table"
                );
                self.estimator.estimate(&req.function)
            }
        };

        let tx_hash = match self.wallet.sign_and_send(&req, &gas).await {
            Ok(hash) => hash,
            Err(e) => {
                let err = TxError::from_provider(&req.function, &e.to_string());
                self.fail(err.clone());
                return Err(err);
            }
        };

        info!(function = %req.function, tx_hash = ?tx_hash, "transaction broadcast");
        self.set_state(TxState {
            phase: TxPhase::Confirming,
            hash: Some(tx_hash),
            error: None,
        });

        match self.wait_for_receipt(&req.function, tx_hash).await {
            Ok(()) => {
                self.set_state(TxState {
                    phase: TxPhase::Success,
                    hash: Some(tx_hash),
                    error: None,
                });
                Ok(tx_hash)
            }
            Err(err) => {
                self.set_state(TxState {
                    phase: TxPhase::Error,
                    hash: Some(tx_hash),
                    error: Some(err.clone()),
                });
                Err(err)
            }
        }
    }

    async fn wait_for_receipt(&self, function: &str, tx_hash: B256) -> Result<(), TxError> {
        let deadline = Instant::now() + self.confirm_timeout;

        loop {
            match self.wallet.receipt(tx_hash).await {
                Ok(Some(outcome)) => {
                    if outcome.success {
                        info!(
                            function,
                            tx_hash = ?tx_hash,
                            gas_used = outcome.gas_used,
                            effective_gas_price = outcome.effective_gas_price,
                            total_cost = outcome.gas_used as u128 * outcome.effective_gas_price,
                            "transaction confirmed"
                        );
                        return Ok(());
                    }
                    return Err(TxError::new(
                        TxErrorKind::Unknown,
                        format!("{function} reverted on-chain. Tx hash: {tx_hash:?}"),
                    ));
                }
                Ok(None) => {}
                // Transient read failures must not abandon a broadcast tx.
                Err(e) => {
                    debug!(function, error = %e, "receipt poll failed, will retry");
                }
            }

            if Instant::now() >= deadline {
                warn!(function, tx_hash = ?tx_hash, "gave up waiting for receipt");
                return Err(TxError::new(
                    TxErrorKind::Unknown,
                    format!(
                        "{function} was broadcast but not confirmed within {}s. Tx hash: {tx_hash:?}",
                        self.confirm_timeout.as_secs()
                    ),
                ));
            }
            tokio::time::sleep(self.confirm_interval).await;
        }
    }

    fn set_state(&self, state: TxState) {
        *self.state.lock().expect("tx state lock poisoned") = state;
    }

    fn fail(&self, error: TxError) {
        self.set_state(TxState {
            phase: TxPhase::Error,
            hash: None,
            error: Some(error),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::chain::ChainProfile;
    use crate::gas::GasSettings;
    use crate::provider::TxOutcome;
    use alloy::primitives::{Address, Bytes, U256};
    use anyhow::{bail, Result};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

    /// Scripted wallet: controls connection, broadcast result and receipt.
    struct ScriptedWallet {
        address: StdMutex<Option<Address>>,
        send_error: Option<String>,
        receipt_success: bool,
        /// Receipt appears after this many polls.
        receipt_after_polls: u32,
        polls: AtomicU32,
        /// While false, every receipt poll reports "still pending".
        receipt_gate_open: AtomicBool,
        estimate_fails: bool,
        last_gas: StdMutex<Option<GasSettings>>,
    }

    impl ScriptedWallet {
        fn connected() -> Self {
            Self {
                address: StdMutex::new(Some(Address::repeat_byte(0x11))),
                send_error: None,
                receipt_success: true,
                receipt_after_polls: 0,
                polls: AtomicU32::new(0),
                receipt_gate_open: AtomicBool::new(true),
                estimate_fails: true,
                last_gas: StdMutex::new(None),
            }
        }
    }

    #[async_trait]
    impl WalletProvider for ScriptedWallet {
        fn address(&self) -> Option<Address> {
            *self.address.lock().unwrap()
        }

        async fn estimate_gas(&self, _req: &TxRequest) -> Result<u64> {
            if self.estimate_fails {
                bail!("cannot estimate gas");
            }
            Ok(100_000)
        }

        async fn sign_and_send(&self, _req: &TxRequest, gas: &GasSettings) -> Result<B256> {
            *self.last_gas.lock().unwrap() = Some(gas.clone());
            if let Some(msg) = &self.send_error {
                bail!("{msg}");
            }
            Ok(B256::repeat_byte(0xab))
        }

        async fn receipt(&self, tx_hash: B256) -> Result<Option<TxOutcome>> {
            if !self.receipt_gate_open.load(Ordering::SeqCst) {
                return Ok(None);
            }
            if self.polls.fetch_add(1, Ordering::SeqCst) < self.receipt_after_polls {
                return Ok(None);
            }
            Ok(Some(TxOutcome {
                tx_hash,
                success: self.receipt_success,
                gas_used: 90_000,
                effective_gas_price: 1_000_000_000,
            }))
        }
    }

    fn submitter(wallet: ScriptedWallet) -> TransactionSubmitter<ScriptedWallet> {
        TransactionSubmitter::new(
            Arc::new(wallet),
            GasEstimator::new(ChainProfile::default()),
        )
        .with_confirmation(Duration::from_millis(1), Duration::from_millis(200))
    }

    fn mint_request() -> TxRequest {
        TxRequest::new(
            Address::repeat_byte(0x22),
            "mintTrack",
            Bytes::from(vec![0xde, 0xad]),
        )
    }

    #[tokio::test]
    async fn test_successful_submission_reaches_success() {
        let submitter = submitter(ScriptedWallet {
            receipt_after_polls: 2,
            ..ScriptedWallet::connected()
        });

        let hash = submitter.submit(mint_request()).await.unwrap();

        let state = submitter.state();
        assert_eq!(state.phase, TxPhase::Success);
        assert_eq!(state.hash, Some(hash));
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_not_connected_fails_without_broadcast() {
        let submitter = submitter(ScriptedWallet {
            address: StdMutex::new(None),
            ..ScriptedWallet::connected()
        });

        let err = submitter.submit(mint_request()).await.unwrap_err();
        assert_eq!(err.kind, TxErrorKind::NotConnected);

        let state = submitter.state();
        assert_eq!(state.phase, TxPhase::Error);
        assert!(state.hash.is_none());
    }

    #[tokio::test]
    async fn test_user_rejection_is_categorized() {
        let submitter = submitter(ScriptedWallet {
            send_error: Some("user rejected the request".to_string()),
            ..ScriptedWallet::connected()
        });

        let err = submitter.submit(mint_request()).await.unwrap_err();
        assert_eq!(err.kind, TxErrorKind::UserRejected);

        let state = submitter.state();
        assert_eq!(state.phase, TxPhase::Error);
        assert_eq!(state.error.unwrap().kind, TxErrorKind::UserRejected);
    }

    #[tokio::test]
    async fn test_reverted_receipt_ends_in_error_with_hash() {
        let submitter = submitter(ScriptedWallet {
            receipt_success: false,
            ..ScriptedWallet::connected()
        });

        let err = submitter.submit(mint_request()).await.unwrap_err();
        assert!(err.message.contains("reverted on-chain"));

        let state = submitter.state();
        assert_eq!(state.phase, TxPhase::Error);
        assert!(state.hash.is_some());
    }

    #[tokio::test]
    async fn test_confirmation_timeout() {
        let submitter = submitter(ScriptedWallet {
            receipt_after_polls: u32::MAX,
            ..ScriptedWallet::connected()
        });

        let err = submitter.submit(mint_request()).await.unwrap_err();
        assert!(err.message.contains("not confirmed"));
        assert_eq!(submitter.state().phase, TxPhase::Error);
    }

    #[tokio::test]
    async fn test_estimator_failure_falls_back_to_static_table() {
        let wallet = Arc::new(ScriptedWallet::connected());
        let submitter = TransactionSubmitter::new(
            wallet.clone(),
            GasEstimator::new(ChainProfile::default()),
        )
        .with_confirmation(Duration::from_millis(1), Duration::from_millis(200));

        submitter.submit(mint_request()).await.unwrap();

        // estimate_gas failed, so the static mintTrack baseline applied
        let gas = wallet.last_gas.lock().unwrap().clone().unwrap();
        assert_eq!(gas.gas_limit, 180_000);
    }

    #[tokio::test]
    async fn test_live_estimate_refines_gas_limit() {
        let wallet = Arc::new(ScriptedWallet {
            estimate_fails: false,
            ..ScriptedWallet::connected()
        });
        let submitter = TransactionSubmitter::new(
            wallet.clone(),
            GasEstimator::new(ChainProfile::default()),
        )
        .with_confirmation(Duration::from_millis(1), Duration::from_millis(200));

        submitter.submit(mint_request()).await.unwrap();

        // 100_000 live estimate * 1.2
        let gas = wallet.last_gas.lock().unwrap().clone().unwrap();
        assert_eq!(gas.gas_limit, 120_000);
    }

    #[tokio::test]
    async fn test_second_submission_refused_while_first_in_flight() {
        let wallet = Arc::new(ScriptedWallet {
            receipt_gate_open: AtomicBool::new(false),
            ..ScriptedWallet::connected()
        });
        let submitter = Arc::new(
            TransactionSubmitter::new(
                wallet.clone(),
                GasEstimator::new(ChainProfile::default()),
            )
            .with_confirmation(Duration::from_millis(1), Duration::from_secs(5)),
        );

        let first = tokio::spawn({
            let submitter = submitter.clone();
            async move { submitter.submit(mint_request()).await }
        });
        while submitter.state().phase != TxPhase::Confirming {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }

        let err = submitter.submit(mint_request()).await.unwrap_err();
        assert!(err.message.contains("already in flight"));
        // The rejection left the first submission's state untouched
        assert_eq!(submitter.state().phase, TxPhase::Confirming);

        wallet.receipt_gate_open.store(true, Ordering::SeqCst);
        let hash = first.await.unwrap().unwrap();
        let state = submitter.state();
        assert_eq!(state.phase, TxPhase::Success);
        assert_eq!(state.hash, Some(hash));
    }

    #[tokio::test]
    async fn test_disconnect_during_confirmation_does_not_clobber_state() {
        let wallet = Arc::new(ScriptedWallet {
            receipt_gate_open: AtomicBool::new(false),
            ..ScriptedWallet::connected()
        });
        let submitter = Arc::new(
            TransactionSubmitter::new(
                wallet.clone(),
                GasEstimator::new(ChainProfile::default()),
            )
            .with_confirmation(Duration::from_millis(1), Duration::from_secs(5)),
        );

        let first = tokio::spawn({
            let submitter = submitter.clone();
            async move { submitter.submit(mint_request()).await }
        });
        while submitter.state().phase != TxPhase::Confirming {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }

        // Wallet drops its connection; a retried click must still be
        // refused without overwriting the confirming submission.
        *wallet.address.lock().unwrap() = None;
        let err = submitter.submit(mint_request()).await.unwrap_err();
        assert_ne!(err.kind, TxErrorKind::NotConnected);
        assert_eq!(submitter.state().phase, TxPhase::Confirming);

        wallet.receipt_gate_open.store(true, Ordering::SeqCst);
        first.await.unwrap().unwrap();
        assert_eq!(submitter.state().phase, TxPhase::Success);
    }

    #[tokio::test]
    async fn test_reset_returns_to_idle_after_terminal_phase() {
        let submitter = submitter(ScriptedWallet::connected());

        submitter.submit(mint_request()).await.unwrap();
        assert_eq!(submitter.state().phase, TxPhase::Success);

        submitter.reset();
        let state = submitter.state();
        assert_eq!(state.phase, TxPhase::Idle);
        assert!(state.hash.is_none());
        assert!(state.error.is_none());
    }
}
