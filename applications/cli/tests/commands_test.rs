//! End-to-end tests for CLI subcommands against a real SQLite file

use cadence_cli::{App, CadenceConfig, Command};
use tempfile::TempDir;

// ===== Test Helpers =====

struct TestApp {
    app: App,
    _temp_dir: TempDir,
}

impl TestApp {
    async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let mut config = CadenceConfig::default();
        config.storage.database_url =
            format!("sqlite://{}", temp_dir.path().join("cli.db").display());

        let app = App::open(config).await.expect("Failed to open app");
        Self {
            app,
            _temp_dir: temp_dir,
        }
    }

    async fn run(&self, command: Command) -> anyhow::Result<String> {
        let mut out = Vec::new();
        self.app.run(command, &mut out).await?;
        Ok(String::from_utf8(out).expect("output is utf-8"))
    }
}

// ===== Startup =====

#[tokio::test]
async fn opens_database_under_missing_data_directory() {
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("data").join("cadence.db");
    let mut config = CadenceConfig::default();
    config.storage.database_url = format!("sqlite://{}", db_path.display());

    let app = App::open(config).await.expect("default-shaped path should open");
    let mut out = Vec::new();
    app.run(Command::Playlists, &mut out).await.unwrap();

    assert!(db_path.exists());
    assert_eq!(String::from_utf8(out).unwrap().trim(), "No playlists");
}

// ===== Playlists =====

#[tokio::test]
async fn empty_catalog_lists_nothing() {
    let app = TestApp::new().await;

    let output = app.run(Command::Playlists).await.unwrap();

    assert_eq!(output.trim(), "No playlists");
}

#[tokio::test]
async fn created_playlists_are_listed_in_order() {
    let app = TestApp::new().await;
    app.run(Command::Create {
        name: "Morning".to_string(),
    })
    .await
    .unwrap();
    app.run(Command::Create {
        name: "Evening".to_string(),
    })
    .await
    .unwrap();

    let output = app.run(Command::Playlists).await.unwrap();
    let lines: Vec<&str> = output.lines().collect();

    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("  1. Morning"));
    assert!(lines[1].starts_with("  2. Evening"));
}

#[tokio::test]
async fn reorder_rewrites_listing() {
    let app = TestApp::new().await;
    let catalog = app.app.catalog();
    let first = catalog.create_playlist("First").await.unwrap();
    let second = catalog.create_playlist("Second").await.unwrap();

    app.run(Command::Reorder {
        playlists: vec![second.id.to_string(), first.id.to_string()],
    })
    .await
    .unwrap();

    let output = app.run(Command::Playlists).await.unwrap();
    assert!(output.lines().next().unwrap().contains("Second"));
}

#[tokio::test]
async fn empty_name_is_rejected() {
    let app = TestApp::new().await;

    let result = app
        .run(Command::Create {
            name: "   ".to_string(),
        })
        .await;

    assert!(result.is_err());
    assert!(app.app.catalog().list_playlists().await.unwrap().is_empty());
}

#[tokio::test]
async fn rename_unknown_playlist_fails() {
    let app = TestApp::new().await;

    let result = app
        .run(Command::Rename {
            playlist: "missing".to_string(),
            name: "New".to_string(),
        })
        .await;

    assert!(result.is_err());
}

// ===== Songs =====

#[tokio::test]
async fn added_song_defaults_title_to_video_id() {
    let app = TestApp::new().await;
    let playlist = app.app.catalog().create_playlist("Mix").await.unwrap();

    let output = app
        .run(Command::AddSong {
            playlist: playlist.id.to_string(),
            url: "https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string(),
            title: None,
        })
        .await
        .unwrap();
    assert!(output.starts_with("Added dQw4w9WgXcQ"));

    let listing = app
        .run(Command::Songs {
            playlist: playlist.id.to_string(),
        })
        .await
        .unwrap();
    assert!(listing.starts_with("Mix - 1 songs"));
    assert!(listing.contains("dQw4w9WgXcQ  --:--  processing"));
}

#[tokio::test]
async fn invalid_song_url_is_rejected() {
    let app = TestApp::new().await;
    let playlist = app.app.catalog().create_playlist("Mix").await.unwrap();

    let result = app
        .run(Command::AddSong {
            playlist: playlist.id.to_string(),
            url: "https://example.com/song.mp3".to_string(),
            title: Some("Song".to_string()),
        })
        .await;

    assert!(result.is_err());
    assert!(app
        .app
        .catalog()
        .list_songs(&playlist.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn remove_song_and_delete_playlist() {
    let app = TestApp::new().await;
    let catalog = app.app.catalog();
    let playlist = catalog.create_playlist("Mix").await.unwrap();
    let song = catalog
        .add_song(&playlist.id, "Intro", "https://youtu.be/intro")
        .await
        .unwrap();

    app.run(Command::RemoveSong {
        song: song.id.to_string(),
    })
    .await
    .unwrap();
    assert!(catalog.list_songs(&playlist.id).await.unwrap().is_empty());

    app.run(Command::Delete {
        playlist: playlist.id.to_string(),
    })
    .await
    .unwrap();
    assert!(catalog.list_playlists().await.unwrap().is_empty());
}

#[tokio::test]
async fn resolve_without_extraction_backend_reports_error() {
    let app = TestApp::new().await;
    let catalog = app.app.catalog();
    let playlist = catalog.create_playlist("Mix").await.unwrap();
    let song = catalog
        .add_song(&playlist.id, "Intro", "https://youtu.be/intro")
        .await
        .unwrap();

    let result = app
        .run(Command::Resolve {
            song: song.id.to_string(),
        })
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn config_command_prints_toml() {
    let app = TestApp::new().await;

    let output = app.run(Command::Config).await.unwrap();

    assert!(output.contains("[playback]"));
    assert!(output.contains("skip_interval_secs = 15.0"));
}
