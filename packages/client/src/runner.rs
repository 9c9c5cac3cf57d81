//! Client execution logic with reconnection support.

use std::{sync::Arc, time::Duration};

use tokio::{sync::Mutex, time::Instant};

use crate::{error::ClientError, player::SimulatedPlayer, reconciler::Reconciler};

use super::{
    session::{SharedReconciler, connect_url, run_client_session},
    ui::{prompt_for, spawn_readline},
};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Run the watch-party client with reconnection logic
///
/// The simulated player and the prompt survive reconnects; every new
/// connection joins the room again and requests its state once.
pub async fn run_client(url: String, room_id: String, name: String) -> Result<(), ClientError> {
    let url = connect_url(&url, &name)?;
    let reconciler: SharedReconciler = Arc::new(Mutex::new(Reconciler::new(
        room_id.clone(),
        SimulatedPlayer::new(Instant::now()),
    )));
    let mut input_rx = spawn_readline(prompt_for(&name, &room_id));
    let mut failures = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} as '{}' (attempt {}/{})",
            url,
            name,
            failures + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        match run_client_session(&url, &name, &reconciler, &mut input_rx).await {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                // If connection ended normally (user exit), don't reconnect
                break;
            }
            Err(e) => {
                tracing::warn!("{}", e);
                failures = next_failure_count(&e, failures);

                if !should_attempt_reconnect(failures, MAX_RECONNECT_ATTEMPTS) {
                    return Err(ClientError::ReconnectExhausted(MAX_RECONNECT_ATTEMPTS));
                }

                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL_SECS,
                    failures + 1,
                    MAX_RECONNECT_ATTEMPTS
                );

                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    }

    Ok(())
}

/// Consecutive failures after `error`
///
/// Losing an established connection starts a fresh series of attempts.
fn next_failure_count(error: &ClientError, failures: u32) -> u32 {
    match error {
        ClientError::ConnectionLost(_) => 1,
        _ => failures + 1,
    }
}

fn should_attempt_reconnect(failures: u32, max_attempts: u32) -> bool {
    failures < max_attempts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_attempt_reconnect_within_limit() {
        // テスト項目: 失敗回数が上限未満なら再接続する
        // given (前提条件):
        let max_attempts = 5;

        // when (操作) / then (期待する結果):
        assert!(should_attempt_reconnect(1, max_attempts));
        assert!(should_attempt_reconnect(4, max_attempts));
        assert!(!should_attempt_reconnect(5, max_attempts));
    }

    #[test]
    fn test_connect_failures_accumulate() {
        // テスト項目: 接続に失敗し続けると失敗回数が積み上がる
        // given (前提条件):
        let error = ClientError::ConnectionError("refused".to_string());

        // when (操作):
        let failures = (0..3).fold(0, |failures, _| next_failure_count(&error, failures));

        // then (期待する結果):
        assert_eq!(failures, 3);
    }

    #[test]
    fn test_lost_connection_resets_failures() {
        // テスト項目: 確立済みの接続が切れた場合は失敗回数が 1 からやり直しになる
        // given (前提条件):
        let error = ClientError::ConnectionLost("reset".to_string());

        // when (操作):
        let failures = next_failure_count(&error, 4);

        // then (期待する結果):
        assert_eq!(failures, 1);
    }
}
