//! Tests for the library view-model: queue derivation, reconciliation and
//! gated mutations.

mod common;

use common::{attached_client, ids, FakeBackend};
use nothing_core::{TrackCatalog, TrackId, UserProfile};
use nothing_sync::{
    Direction, LibraryAction, LibraryError, LibraryViewModel, MutationOutcome, NetworkMonitor,
    RemoteClient, RenameStep, SyncError, MIGRATED_PLAYLIST_NAME,
};
use std::collections::HashSet;
use std::sync::Arc;

// ===== Helpers =====

async fn signed_in(backend: &Arc<FakeBackend>) -> (LibraryViewModel, Arc<NetworkMonitor>) {
    let (client, network) = attached_client(backend).await;
    let mut library = LibraryViewModel::new(Arc::new(TrackCatalog::builtin()), client);
    library.sign_in().await;
    (library, network)
}

fn queue_ids(library: &LibraryViewModel) -> Vec<String> {
    library
        .queue()
        .into_iter()
        .map(|t| t.id.to_string())
        .collect()
}

fn with_playlist(name: &'static str, tracks: &'static [&'static str]) -> Arc<FakeBackend> {
    FakeBackend::with(|s| {
        s.playlists.push((name.to_string(), ids(tracks)));
        s.active = Some(name.to_string());
    })
}

// =============================================================================
// Queue Derivation
// =============================================================================

mod queue {
    use super::*;

    #[tokio::test]
    async fn signed_out_queue_is_catalog_order() {
        let network = Arc::new(NetworkMonitor::new(true));
        let client = Arc::new(RemoteClient::new(network));
        let library = LibraryViewModel::new(Arc::new(TrackCatalog::builtin()), client);

        assert_eq!(queue_ids(&library), vec!["track-1", "track-2", "track-3"]);
    }

    #[tokio::test]
    async fn active_playlist_orders_queue_and_drops_unknown_ids() {
        let backend = with_playlist("Mix", &["track-3", "deleted-track", "track-1"]);
        let (library, _) = signed_in(&backend).await;

        assert_eq!(queue_ids(&library), vec!["track-3", "track-1"]);
    }

    #[tokio::test]
    async fn available_tracks_excludes_playlist() {
        let backend = with_playlist("Mix", &["track-2"]);
        let (library, _) = signed_in(&backend).await;

        let available: Vec<String> = library
            .available_tracks()
            .into_iter()
            .map(|t| t.id.to_string())
            .collect();
        assert_eq!(available, vec!["track-1", "track-3"]);
        assert!(library.is_in_playlist(&TrackId::new("track-2")));
    }
}

// =============================================================================
// Reconciliation
// =============================================================================

mod reconcile {
    use super::*;

    #[tokio::test]
    async fn legacy_playlist_is_migrated_and_activated() {
        let backend = FakeBackend::with(|s| s.legacy = ids(&["track-2", "track-1"]));
        let (library, _) = signed_in(&backend).await;

        assert!(library.migration_done());
        assert_eq!(library.active_playlist_name(), Some(MIGRATED_PLAYLIST_NAME));
        assert_eq!(
            backend.state().playlist(MIGRATED_PLAYLIST_NAME),
            Some(&ids(&["track-2", "track-1"]))
        );
        assert_eq!(queue_ids(&library), vec!["track-2", "track-1"]);
    }

    #[tokio::test]
    async fn migration_runs_at_most_once_per_session() {
        let backend = FakeBackend::with(|s| s.legacy = ids(&["track-3"]));
        let (mut library, _) = signed_in(&backend).await;
        assert_eq!(backend.count("savePlaylistByName"), 1);

        // Deleting the migrated playlist brings back the migration conditions
        library.delete_playlist(MIGRATED_PLAYLIST_NAME).await.unwrap();
        library.refresh().await;

        assert!(backend.state().playlists.is_empty());
        assert_eq!(backend.count("savePlaylistByName"), 1);
    }

    #[tokio::test]
    async fn no_migration_when_named_playlists_exist() {
        let backend = FakeBackend::with(|s| {
            s.legacy = ids(&["track-3"]);
            s.playlists.push(("Existing".into(), ids(&["track-1"])));
        });
        let (library, _) = signed_in(&backend).await;

        assert!(!library.migration_done());
        assert_eq!(backend.state().names(), vec!["Existing"]);
    }

    #[tokio::test]
    async fn no_migration_while_offline() {
        let backend = FakeBackend::with(|s| s.legacy = ids(&["track-3"]));
        let (client, network) = attached_client(&backend).await;
        network.set_online(false);
        let mut library = LibraryViewModel::new(Arc::new(TrackCatalog::builtin()), client);

        library.sign_in().await;

        assert!(!library.migration_done());
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn first_playlist_becomes_active() {
        let backend = FakeBackend::with(|s| {
            s.playlists.push(("Morning".into(), ids(&["track-2"])));
            s.playlists.push(("Evening".into(), ids(&["track-3"])));
        });
        let (library, _) = signed_in(&backend).await;

        assert_eq!(library.active_playlist_name(), Some("Morning"));
        assert_eq!(backend.state().active.as_deref(), Some("Morning"));
        assert_eq!(queue_ids(&library), vec!["track-2"]);
    }

    #[tokio::test]
    async fn empty_active_playlist_is_seeded_with_catalog() {
        let backend = with_playlist("Fresh", &[]);
        let (library, _) = signed_in(&backend).await;

        assert_eq!(
            backend.state().playlist("Fresh"),
            Some(&ids(&["track-1", "track-2", "track-3"]))
        );
        assert_eq!(library.active_tracks().len(), 3);
    }

    #[tokio::test]
    async fn failed_active_read_never_overwrites_playlist() {
        let backend = with_playlist("Mix", &["track-3"]);
        backend.fail("getActivePlaylist");
        let (library, _) = signed_in(&backend).await;

        assert_eq!(backend.state().playlist("Mix"), Some(&ids(&["track-3"])));
        assert_eq!(backend.count("savePlaylistByName"), 0);
        assert_eq!(queue_ids(&library), vec!["track-1", "track-2", "track-3"]);
    }

    #[tokio::test]
    async fn failed_activation_skips_seeding() {
        let backend = FakeBackend::with(|s| {
            s.playlists.push(("Morning".into(), ids(&["track-2"])));
            s.playlists.push(("Evening".into(), Vec::new()));
            s.active = Some("Evening".into());
        });
        backend.fail("setActivePlaylist");
        let (library, _) = signed_in(&backend).await;

        assert_eq!(library.active_playlist_name(), None);
        assert_eq!(backend.state().playlist("Morning"), Some(&ids(&["track-2"])));
        assert_eq!(backend.count("savePlaylistByName"), 0);
    }

    #[tokio::test]
    async fn migration_survives_sign_out() {
        let backend = FakeBackend::with(|s| s.legacy = ids(&["track-3"]));
        let (mut library, _) = signed_in(&backend).await;
        library.delete_playlist(MIGRATED_PLAYLIST_NAME).await.unwrap();

        library.sign_out().await;
        library.sign_in().await;

        assert!(library.migration_done());
        assert_eq!(backend.count("savePlaylistByName"), 1);
        assert!(backend.state().playlists.is_empty());
    }
}

// =============================================================================
// Gating
// =============================================================================

mod gating {
    use super::*;

    #[tokio::test]
    async fn signed_out_mutations_are_skipped() {
        let backend = FakeBackend::new();
        let (client, _) = attached_client(&backend).await;
        let mut library = LibraryViewModel::new(Arc::new(TrackCatalog::builtin()), client);
        let track = TrackId::new("track-1");

        assert_eq!(
            library.toggle_favorite(&track).await,
            Ok(MutationOutcome::Skipped)
        );
        assert_eq!(
            library.add_to_playlist(&track).await,
            Ok(MutationOutcome::Skipped)
        );
        assert_eq!(
            library.create_playlist("Mix").await,
            Ok(MutationOutcome::Skipped)
        );
        assert_eq!(
            library.move_track(0, Direction::Down).await,
            Ok(MutationOutcome::Skipped)
        );
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn offline_mutations_rejected_without_network_calls() {
        let backend = with_playlist("Mix", &["track-1", "track-2"]);
        let (mut library, network) = signed_in(&backend).await;
        network.set_online(false);
        backend.clear_calls();
        let track = TrackId::new("track-3");

        let errors = vec![
            library.save_profile("Ada").await.unwrap_err(),
            library.toggle_favorite(&track).await.unwrap_err(),
            library.move_track(0, Direction::Down).await.unwrap_err(),
            library.add_to_playlist(&track).await.unwrap_err(),
            library.remove_from_playlist(&track).await.unwrap_err(),
            library.create_playlist("Other").await.unwrap_err(),
            library.rename_playlist("Mix", "Renamed").await.unwrap_err(),
            library.delete_playlist("Mix").await.unwrap_err(),
            library.switch_playlist("Other").await.unwrap_err(),
        ];

        assert!(errors.iter().all(|e| matches!(e, LibraryError::Offline(_))));
        let distinct: HashSet<String> = errors.iter().map(|e| e.to_string()).collect();
        assert_eq!(distinct.len(), errors.len());
        assert_eq!(
            LibraryError::Offline(LibraryAction::ToggleFavorite).to_string(),
            "You're offline. Connect to the internet to update favorites."
        );
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn writes_resume_after_backend_recovers() {
        let backend = with_playlist("Mix", &["track-1"]);
        let (mut library, network) = signed_in(&backend).await;
        let track = TrackId::new("track-1");

        backend.state().unreachable = true;
        assert!(matches!(
            library.toggle_favorite(&track).await,
            Err(LibraryError::Sync { .. })
        ));
        assert!(!network.is_online());

        backend.state().unreachable = false;
        library.refresh().await;

        assert!(network.is_online());
        assert_eq!(
            library.toggle_favorite(&track).await,
            Ok(MutationOutcome::Applied)
        );
        assert!(library.is_favorite(&track));
    }

    #[tokio::test]
    async fn write_failure_names_action() {
        let backend = with_playlist("Mix", &["track-1"]);
        let (mut library, _) = signed_in(&backend).await;
        backend.fail("saveFavorites");

        let err = library
            .toggle_favorite(&TrackId::new("track-1"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            LibraryError::Sync {
                action: LibraryAction::ToggleFavorite,
                source: SyncError::Remote { .. }
            }
        ));
    }
}

// =============================================================================
// Mutations
// =============================================================================

mod mutations {
    use super::*;

    #[tokio::test]
    async fn toggle_favorite_adds_then_removes() {
        let backend = with_playlist("Mix", &["track-1"]);
        let (mut library, _) = signed_in(&backend).await;
        let track = TrackId::new("track-2");

        library.toggle_favorite(&track).await.unwrap();
        assert!(library.is_favorite(&track));
        assert_eq!(backend.state().favorites, ids(&["track-2"]));

        library.toggle_favorite(&track).await.unwrap();
        assert!(!library.is_favorite(&track));
        assert!(backend.state().favorites.is_empty());
    }

    #[tokio::test]
    async fn toggle_favorite_never_duplicates() {
        let backend = with_playlist("Mix", &["track-1"]);
        let (mut library, _) = signed_in(&backend).await;

        for id in ["track-1", "track-3", "track-1", "track-1"] {
            library.toggle_favorite(&TrackId::new(id)).await.unwrap();
        }

        let favorites = backend.state().favorites.clone();
        let unique: HashSet<_> = favorites.iter().collect();
        assert_eq!(unique.len(), favorites.len());
        assert_eq!(favorites, ids(&["track-3", "track-1"]));
    }

    #[tokio::test]
    async fn move_track_swaps_neighbours() {
        let backend = with_playlist("Mix", &["track-1", "track-2", "track-3"]);
        let (mut library, _) = signed_in(&backend).await;

        let outcome = library.move_track(1, Direction::Up).await.unwrap();

        assert_eq!(outcome, MutationOutcome::Applied);
        assert_eq!(queue_ids(&library), vec!["track-2", "track-1", "track-3"]);
    }

    #[tokio::test]
    async fn move_track_at_edges_is_noop() {
        let backend = with_playlist("Mix", &["track-1", "track-2", "track-3"]);
        let (mut library, _) = signed_in(&backend).await;
        backend.clear_calls();

        assert_eq!(
            library.move_track(0, Direction::Up).await,
            Ok(MutationOutcome::Skipped)
        );
        assert_eq!(
            library.move_track(2, Direction::Down).await,
            Ok(MutationOutcome::Skipped)
        );
        assert_eq!(
            library.move_track(9, Direction::Up).await,
            Ok(MutationOutcome::Skipped)
        );
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn add_and_remove_track() {
        let backend = with_playlist("Mix", &["track-1"]);
        let (mut library, _) = signed_in(&backend).await;
        let track = TrackId::new("track-3");

        library.add_to_playlist(&track).await.unwrap();
        assert_eq!(queue_ids(&library), vec!["track-1", "track-3"]);

        library.remove_from_playlist(&track).await.unwrap();
        assert_eq!(queue_ids(&library), vec!["track-1"]);
    }

    #[tokio::test]
    async fn create_playlist_validates_name() {
        let backend = with_playlist("Mix", &["track-1"]);
        let (mut library, _) = signed_in(&backend).await;

        assert_eq!(
            library.create_playlist("   ").await,
            Err(LibraryError::EmptyPlaylistName)
        );
        assert_eq!(
            library.create_playlist(" Mix ").await,
            Err(LibraryError::DuplicatePlaylist("Mix".into()))
        );

        library.create_playlist("  Road Trip ").await.unwrap();
        assert_eq!(library.playlist_names(), ["Mix", "Road Trip"]);
        assert_eq!(library.active_playlist_name(), Some("Mix"));
    }

    #[tokio::test]
    async fn switch_playlist_changes_queue() {
        let backend = FakeBackend::with(|s| {
            s.playlists.push(("A".into(), ids(&["track-1"])));
            s.playlists.push(("B".into(), ids(&["track-3", "track-2"])));
        });
        let (mut library, _) = signed_in(&backend).await;

        library.switch_playlist("B").await.unwrap();

        assert_eq!(library.active_playlist_name(), Some("B"));
        assert_eq!(queue_ids(&library), vec!["track-3", "track-2"]);
        assert_eq!(
            library.switch_playlist("B").await,
            Ok(MutationOutcome::Skipped)
        );
    }

    #[tokio::test]
    async fn deleting_active_playlist_selects_next() {
        let backend = FakeBackend::with(|s| {
            s.playlists.push(("A".into(), ids(&["track-1"])));
            s.playlists.push(("B".into(), ids(&["track-2"])));
        });
        let (mut library, _) = signed_in(&backend).await;

        library.delete_playlist("A").await.unwrap();

        assert_eq!(library.active_playlist_name(), Some("B"));
        assert_eq!(queue_ids(&library), vec!["track-2"]);
    }

    #[tokio::test]
    async fn rename_active_playlist() {
        let backend = with_playlist("Old", &["track-3", "track-1"]);
        let (mut library, _) = signed_in(&backend).await;

        library.rename_playlist("Old", "New").await.unwrap();

        let state = backend.state();
        assert_eq!(state.names(), vec!["New"]);
        assert_eq!(state.active.as_deref(), Some("New"));
        assert_eq!(state.playlist("New"), Some(&ids(&["track-3", "track-1"])));
        drop(state);
        assert_eq!(library.active_playlist_name(), Some("New"));
    }

    #[tokio::test]
    async fn rename_inactive_playlist_keeps_its_tracks() {
        let backend = FakeBackend::with(|s| {
            s.playlists.push(("A".into(), ids(&["track-1"])));
            s.playlists.push(("B".into(), ids(&["track-2", "track-3"])));
        });
        let (mut library, _) = signed_in(&backend).await;

        library.rename_playlist("B", "C").await.unwrap();

        let state = backend.state();
        assert_eq!(state.names(), vec!["A", "C"]);
        assert_eq!(state.playlist("C"), Some(&ids(&["track-2", "track-3"])));
        assert_eq!(state.active.as_deref(), Some("A"));
    }

    #[tokio::test]
    async fn rename_failure_reports_partial_state() {
        let backend = with_playlist("Old", &["track-2"]);
        let (mut library, _) = signed_in(&backend).await;
        backend.fail("deletePlaylist");

        let err = library.rename_playlist("Old", "New").await.unwrap_err();

        match err {
            LibraryError::PartialRename {
                from,
                to,
                completed,
                ..
            } => {
                assert_eq!(from, "Old");
                assert_eq!(to, "New");
                assert_eq!(completed, RenameStep::Activated);
            }
            other => panic!("Expected PartialRename, got {:?}", other),
        }
        // Both playlists are left behind
        assert_eq!(backend.state().names(), vec!["Old", "New"]);
    }

    #[tokio::test]
    async fn rename_unknown_playlist_is_rejected() {
        let backend = with_playlist("Mix", &["track-1"]);
        let (mut library, _) = signed_in(&backend).await;

        assert_eq!(
            library.rename_playlist("Nope", "Other").await,
            Err(LibraryError::PlaylistNotFound("Nope".into()))
        );
    }
}

// =============================================================================
// Profile & Identity
// =============================================================================

mod identity {
    use super::*;

    #[tokio::test]
    async fn new_user_needs_profile_setup() {
        let backend = FakeBackend::new();
        let (mut library, _) = signed_in(&backend).await;
        assert!(library.needs_profile_setup());

        assert_eq!(
            library.save_profile("  ").await,
            Err(LibraryError::EmptyProfileName)
        );
        library.save_profile(" Ada ").await.unwrap();

        assert!(!library.needs_profile_setup());
        assert_eq!(library.profile(), Some(&UserProfile::new("Ada")));
    }

    #[tokio::test]
    async fn failed_profile_read_does_not_prompt() {
        let backend = FakeBackend::new();
        backend.fail("getCallerUserProfile");
        let (library, _) = signed_in(&backend).await;

        assert!(!library.needs_profile_setup());
    }

    #[tokio::test]
    async fn sign_out_clears_user_data() {
        let backend = with_playlist("Mix", &["track-3"]);
        backend.state().favorites = ids(&["track-3"]);
        let (mut library, _) = signed_in(&backend).await;
        assert!(library.is_favorite(&TrackId::new("track-3")));

        library.sign_out().await;

        assert!(!library.is_authenticated());
        assert!(library.favorites().is_empty());
        assert!(library.playlist_names().is_empty());
        assert_eq!(queue_ids(&library), vec!["track-1", "track-2", "track-3"]);
    }
}
