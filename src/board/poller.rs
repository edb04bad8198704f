use std::sync::Arc;
use std::time::Duration;

use board_common::Column;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use super::assignments::fetch_board;
use super::repository::{BoardRepository, PeopleRepository};

/// Default refresh period.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Periodically rebuilds the board from the remote side and publishes it.
///
/// Polls run one at a time on a single task; a tick that comes due while a
/// poll is still in flight is skipped. Stopping or dropping the poller
/// cancels the task.
pub struct BoardPoller {
    board_rx: watch::Receiver<Option<Vec<Column>>>,
    shutdown_tx: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl BoardPoller {
    pub fn spawn(
        board_repo: Arc<dyn BoardRepository>,
        people_repo: Arc<dyn PeopleRepository>,
        interval: Duration,
    ) -> Self {
        let (board_tx, board_rx) = watch::channel(None);
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = shutdown_rx.changed() => break,
                }
                match fetch_board(board_repo.as_ref(), people_repo.as_ref()).await {
                    Ok((store, _people)) => {
                        let columns = store.into_columns();
                        debug!(columns = columns.len(), "board poll succeeded");
                        board_tx.send_if_modified(|current| {
                            if current.as_ref() == Some(&columns) {
                                false
                            } else {
                                *current = Some(columns);
                                true
                            }
                        });
                    }
                    Err(err) => warn!(error = %err, "board poll failed, keeping last board"),
                }
            }
            debug!("board poller stopped");
        });

        Self {
            board_rx,
            shutdown_tx,
            handle: Some(handle),
        }
    }

    /// A receiver that is notified whenever the polled board changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<Vec<Column>>> {
        self.board_rx.clone()
    }

    /// The most recent successfully polled board.
    pub fn latest(&self) -> Option<Vec<Column>> {
        self.board_rx.borrow().clone()
    }

    /// Stop polling and wait for the task to finish.
    pub async fn stop(mut self) {
        let _ = self.shutdown_tx.send(true);
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for BoardPoller {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
