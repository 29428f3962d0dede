//! Versions modal state: one game-details request and its local pagination

use crate::api::{ApiError, CatalogBackend, GameId, GameVersion};
use crate::messages::Messages;
use crate::task::{LatestTask, PollResult};
use crate::view::{VersionsCursor, VersionsView};

type VersionsResult = Result<Vec<GameVersion>, ApiError>;

/// Where the current game-details request stands
#[derive(Debug, Clone, Default)]
pub enum VersionsPhase {
    #[default]
    Idle,
    Loading {
        game_id: GameId,
        name: String,
    },
    Loaded {
        game_id: GameId,
        name: String,
        cursor: VersionsCursor,
    },
    Failed {
        game_id: GameId,
        name: String,
        message: String,
    },
}

/// Versions modal state
pub struct VersionsState {
    pub phase: VersionsPhase,
    page_size: usize,
    task: LatestTask<VersionsResult>,
}

impl VersionsState {
    pub fn new(page_size: usize) -> Self {
        Self {
            phase: VersionsPhase::Idle,
            page_size,
            task: LatestTask::default(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.task.is_pending()
    }

    /// Start fetching the versions of a game, superseding any earlier request
    pub fn request<B: CatalogBackend>(&mut self, game_id: GameId, name: &str, backend: &B) {
        let backend = backend.clone();
        let id = game_id.clone();
        let token = self.task.spawn(async move { backend.game_versions(&id).await });
        tracing::debug!("Versions request {} for game {} ({})", token, game_id, name);

        self.phase = VersionsPhase::Loading {
            game_id,
            name: name.to_string(),
        };
    }

    /// Poll the in-flight request and move to `Loaded` or `Failed`
    pub fn poll(&mut self, msgs: &Messages) {
        let result = match self.task.poll() {
            PollResult::Complete(Ok(result)) => result,
            PollResult::Complete(Err(e)) => {
                tracing::error!("Versions task panicked: {}", e);
                Err(ApiError::Unsuccessful(None))
            }
            PollResult::Pending | PollResult::NoTask => return,
        };

        let (game_id, name) = match std::mem::take(&mut self.phase) {
            VersionsPhase::Loading { game_id, name } => (game_id, name),
            other => {
                self.phase = other;
                return;
            }
        };

        self.phase = match result {
            Ok(versions) if versions.is_empty() => VersionsPhase::Failed {
                game_id,
                name,
                message: msgs.no_versions.to_string(),
            },
            Ok(versions) => VersionsPhase::Loaded {
                game_id,
                name,
                cursor: VersionsCursor::new(versions, self.page_size),
            },
            Err(ApiError::Unsuccessful(_)) => {
                tracing::warn!("Server could not load versions of game {}", game_id);
                VersionsPhase::Failed {
                    game_id,
                    name,
                    message: msgs.load_versions_error.to_string(),
                }
            }
            Err(e) => {
                tracing::warn!("Failed to fetch versions of game {}: {}", game_id, e);
                VersionsPhase::Failed {
                    game_id,
                    name,
                    message: msgs.load_versions_generic_error.to_string(),
                }
            }
        };
    }

    /// Re-slice the fetched list; never re-fetches
    pub fn set_page(&mut self, page: u32) {
        if let VersionsPhase::Loaded { cursor, .. } = &mut self.phase {
            cursor.set_page(page);
        }
    }

    /// Version by its position in server order
    pub fn version(&self, index: usize) -> Option<&GameVersion> {
        match &self.phase {
            VersionsPhase::Loaded { cursor, .. } => cursor.get(index),
            _ => None,
        }
    }

    /// Forget the current game; a late response is discarded
    pub fn reset(&mut self) {
        self.task.clear();
        self.phase = VersionsPhase::Idle;
    }

    /// What the modal shows, if a game has been selected
    pub fn view(&self) -> Option<VersionsView> {
        match &self.phase {
            VersionsPhase::Idle => None,
            VersionsPhase::Loading { name, .. } => Some(VersionsView::loading(name)),
            VersionsPhase::Loaded { name, cursor, .. } => Some(VersionsView::page(name, cursor)),
            VersionsPhase::Failed { name, message, .. } => Some(VersionsView::error(name, message.as_str())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{settle, versions, MockBackend};
    use crate::view::VersionsBody;

    #[tokio::test]
    async fn test_loaded_versions_paginate_locally() {
        let backend = MockBackend::default();
        backend.set_versions("7", versions(23));
        let msgs = Messages::english();
        let mut state = VersionsState::new(10);

        state.request(GameId::new("7"), "Zelda", &backend);
        assert!(matches!(state.view().map(|v| v.body), Some(VersionsBody::Loading)));
        settle(&mut state, |s| {
            s.poll(&msgs);
            s.is_loading()
        })
        .await;

        state.set_page(3);
        let view = state.view().expect("view");
        assert_eq!(view.cards().len(), 3);
        assert_eq!(view.cards()[0].index, 20);
        assert_eq!(state.version(0).map(|v| v.hash.as_str()), Some("HASH0000"));
        assert_eq!(backend.versions_calls(), 1);
    }

    #[tokio::test]
    async fn test_failures_get_distinct_copy() {
        let msgs = Messages::english();
        let backend = MockBackend::default();
        backend.set_versions("1", Vec::new());
        backend.fail_versions("2", None);
        backend.fail_versions("3", Some(500));

        let mut seen = Vec::new();
        for id in ["1", "2", "3"] {
            let mut state = VersionsState::new(10);
            state.request(GameId::new(id), "Game", &backend);
            settle(&mut state, |s| {
                s.poll(&msgs);
                s.is_loading()
            })
            .await;
            match state.view().map(|v| v.body) {
                Some(VersionsBody::Error(message)) => seen.push(message),
                other => panic!("unexpected body {other:?}"),
            }
        }
        assert_eq!(
            seen,
            vec![
                msgs.no_versions.to_string(),
                msgs.load_versions_error.to_string(),
                msgs.load_versions_generic_error.to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_reset_discards_late_response() {
        let backend = MockBackend::default();
        backend.set_versions("7", versions(2));
        let msgs = Messages::english();
        let mut state = VersionsState::new(10);

        state.request(GameId::new("7"), "Zelda", &backend);
        state.reset();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        state.poll(&msgs);
        assert!(state.view().is_none());
    }
}
