//! Hash resolution and download state, with the status banner it drives

use std::time::Duration;

use tokio::sync::watch;

use crate::api::{ApiError, CatalogBackend};
use crate::messages::Messages;
use crate::task::{LatestTask, PollResult};
use crate::view::StatusView;

use super::StateEvent;

/// Visible phases of a resolve-then-open download
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DownloadPhase {
    #[default]
    Idle,
    Searching,
    Downloading,
    Downloaded,
    Failed,
}

impl DownloadPhase {
    /// Status banner for an in-progress phase
    fn status(self, msgs: &Messages) -> Option<StatusView> {
        match self {
            DownloadPhase::Searching => Some(StatusView::info(msgs.searching, true)),
            DownloadPhase::Downloading => Some(StatusView::info(msgs.downloading, true)),
            _ => None,
        }
    }
}

/// Download flow state
pub struct DownloadState {
    pub phase: DownloadPhase,
    pub status: StatusView,
    completion_delay: Duration,
    progress_rx: Option<watch::Receiver<DownloadPhase>>,
    task: LatestTask<Result<String, ApiError>>,
}

impl DownloadState {
    pub fn new(completion_delay: Duration) -> Self {
        Self {
            phase: DownloadPhase::Idle,
            status: StatusView::default(),
            completion_delay,
            progress_rx: None,
            task: LatestTask::default(),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.task.is_pending()
    }

    /// Resolve a content hash, then open the URL the server answers with.
    ///
    /// The "downloaded" phase follows the server's answer after the
    /// configured completion delay.
    pub fn start<B: CatalogBackend>(&mut self, hash: &str, backend: &B, msgs: &Messages) {
        let (progress_tx, progress_rx) = watch::channel(DownloadPhase::Searching);
        self.progress_rx = Some(progress_rx);
        self.phase = DownloadPhase::Searching;
        self.status = StatusView::info(msgs.searching, true);

        let backend = backend.clone();
        let hash = hash.to_string();
        let delay = self.completion_delay;
        let token = self.task.spawn(async move {
            let url = backend.resolve_download(&hash).await?;
            let _ = progress_tx.send(DownloadPhase::Downloading);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            Ok(url)
        });
        tracing::debug!("Download request {}", token);
    }

    /// Poll progress and completion of the current download
    pub fn poll(&mut self, msgs: &Messages) -> Vec<StateEvent> {
        let mut events = Vec::new();

        if let Some(rx) = &mut self.progress_rx {
            if rx.has_changed().unwrap_or(false) {
                self.phase = *rx.borrow_and_update();
                if let Some(status) = self.phase.status(msgs) {
                    self.status = status;
                }
            }
        }

        match self.task.poll() {
            PollResult::Complete(Ok(Ok(url))) => {
                self.progress_rx = None;
                self.phase = DownloadPhase::Downloaded;
                self.status = StatusView::success(msgs.downloaded);
                tracing::info!("Resolved download URL {}", url);
                events.push(StateEvent::OpenUrl(url));
            }
            PollResult::Complete(Ok(Err(e))) => {
                self.progress_rx = None;
                self.phase = DownloadPhase::Failed;
                tracing::warn!("Failed to resolve download: {}", e);
                self.status = StatusView::error(msgs.download_failure(&e));
            }
            PollResult::Complete(Err(e)) => {
                self.progress_rx = None;
                self.phase = DownloadPhase::Failed;
                tracing::error!("Download task panicked: {}", e);
                self.status = StatusView::error(msgs.search_game_error);
            }
            PollResult::Pending | PollResult::NoTask => {}
        }

        events
    }

    /// Show a message in the status banner
    pub fn set_status(&mut self, status: StatusView) {
        self.status = status;
    }

    /// Hide the status banner. A download in flight still completes and
    /// reports its later phases.
    pub fn clear_status(&mut self) {
        self.status = StatusView::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockBackend;
    use crate::view::StatusKind;

    async fn run(state: &mut DownloadState, msgs: &Messages) -> Vec<StateEvent> {
        let mut events = Vec::new();
        for _ in 0..100 {
            events.extend(state.poll(msgs));
            if !state.is_busy() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        events
    }

    #[tokio::test]
    async fn test_resolved_url_is_opened() {
        let backend = MockBackend::default();
        backend.set_download_url("https://files.example/rom.zip");
        let msgs = Messages::english();
        let mut state = DownloadState::new(Duration::ZERO);

        state.start("ABCDEF12", &backend, &msgs);
        assert_eq!(state.phase, DownloadPhase::Searching);
        assert!(state.status.spinner);

        let events = run(&mut state, &msgs).await;
        assert_eq!(events, vec![StateEvent::OpenUrl("https://files.example/rom.zip".to_string())]);
        assert_eq!(state.phase, DownloadPhase::Downloaded);
        assert_eq!(state.status, StatusView::success(msgs.downloaded));
    }

    #[tokio::test]
    async fn test_failure_copy() {
        let msgs = Messages::english();
        let cases = [
            (Some(404), None, msgs.not_found_hash),
            (Some(500), None, msgs.server_json_error),
            (None, Some("Juego no disponible"), "Juego no disponible"),
            (Some(502), None, msgs.search_game_error),
        ];

        for (status, message, expected) in cases {
            let backend = MockBackend::default();
            backend.fail_download(status, message);
            let mut state = DownloadState::new(Duration::ZERO);
            state.start("ABCDEF12", &backend, &msgs);

            let events = run(&mut state, &msgs).await;
            assert!(events.is_empty());
            assert_eq!(state.phase, DownloadPhase::Failed);
            assert_eq!(state.status.kind, StatusKind::Error);
            assert_eq!(state.status.message, expected);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_completion_delay_precedes_downloaded() {
        let backend = MockBackend::default();
        backend.set_download_url("https://files.example/rom.zip");
        let msgs = Messages::english();
        let mut state = DownloadState::new(Duration::from_millis(1000));

        state.start("ABCDEF12", &backend, &msgs);
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(state.poll(&msgs).is_empty());
        assert_eq!(state.phase, DownloadPhase::Downloading);
        assert_eq!(state.status.message, msgs.downloading);

        tokio::time::advance(Duration::from_millis(999)).await;
        assert!(state.poll(&msgs).is_empty());

        tokio::time::advance(Duration::from_millis(1)).await;
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert_eq!(state.poll(&msgs).len(), 1);
        assert_eq!(state.phase, DownloadPhase::Downloaded);
    }

    #[tokio::test]
    async fn test_clear_status_hides_banner() {
        let msgs = Messages::english();
        let mut state = DownloadState::new(Duration::ZERO);
        state.set_status(StatusView::error(msgs.invalid_hash));
        assert!(state.status.is_visible());
        state.clear_status();
        assert!(!state.status.is_visible());
    }

    #[tokio::test]
    async fn test_clear_status_keeps_download_running() {
        let backend = MockBackend::default();
        backend.set_download_url("https://files.example/rom.zip");
        let msgs = Messages::english();
        let mut state = DownloadState::new(Duration::ZERO);

        state.start("ABCDEF12", &backend, &msgs);
        state.clear_status();
        assert!(state.is_busy());

        let events = run(&mut state, &msgs).await;
        assert_eq!(events, vec![StateEvent::OpenUrl("https://files.example/rom.zip".to_string())]);
        assert_eq!(state.status, StatusView::success(msgs.downloaded));
    }
}
