//! Organizer integration tests.
//!
//! These run whole chains against a real filesystem (tempfile) with a mock
//! completion endpoint and, where needed, a mock metadata catalog:
//! - Classification to placement for series and movies
//! - Idempotent placement and move mode
//! - Classification failures leave the library untouched
//! - Cancellation before placement

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use autoshelf_core::{
    orchestrator::ProcessError,
    testing::{fixtures, MockCatalog, MockLlmClient, MockPlacer},
    ClassificationError, FileStage, FsPlacer, LlmError, MetadataCatalog, Organizer, PlacementMode,
    ProcessOutcome,
};

/// Test helper holding a download folder, a library root and the mocks.
struct TestHarness {
    organizer: Organizer,
    llm: Arc<MockLlmClient>,
    downloads: TempDir,
    library: PathBuf,
    _library_parent: TempDir,
}

impl TestHarness {
    fn new(mode: PlacementMode) -> Self {
        Self::build(mode, None)
    }

    fn with_catalog(catalog: Arc<MockCatalog>) -> Self {
        Self::build(PlacementMode::HardLink, Some(catalog as Arc<dyn MetadataCatalog>))
    }

    fn build(mode: PlacementMode, catalog: Option<Arc<dyn MetadataCatalog>>) -> Self {
        let downloads = TempDir::new().expect("Failed to create download dir");
        let library_parent = TempDir::new().expect("Failed to create library parent");
        let library = library_parent.path().join("library");
        let llm = Arc::new(MockLlmClient::new());

        let organizer = fixtures::organizer(
            &library,
            Arc::clone(&llm),
            catalog,
            Arc::new(FsPlacer::new()),
            mode,
        );

        Self {
            organizer,
            llm,
            downloads,
            library,
            _library_parent: library_parent,
        }
    }

    fn create_source_file(&self, name: &str) -> PathBuf {
        let path = self.downloads.path().join(name);
        std::fs::write(&path, format!("contents of {name}")).expect("Failed to write source");
        path
    }

    async fn process(&self, source: &Path) -> ProcessOutcome {
        let token = self.organizer.session_token();
        self.organizer.process_one(source, &token).await
    }
}

#[cfg(unix)]
fn link_count(path: &Path) -> u64 {
    use std::os::unix::fs::MetadataExt;
    std::fs::metadata(path).unwrap().nlink()
}

#[tokio::test]
async fn test_anime_episode_is_linked_into_season_folder() {
    let harness = TestHarness::new(PlacementMode::HardLink);
    harness
        .llm
        .respond_to(
            "Attack.on.Titan.S04E05",
            fixtures::media_json("Shingeki no Kyojin", "Anime", "", 4, 5),
        )
        .await;
    let source = harness.create_source_file("Attack.on.Titan.S04E05.1080p.mkv");

    let outcome = harness.process(&source).await;

    let expected = harness
        .library
        .join("Anime/Shingeki no Kyojin/Season 4/Shingeki no Kyojin - S04E05.mkv");
    match &outcome {
        ProcessOutcome::Placed {
            destination, mode, ..
        } => {
            assert_eq!(destination, &expected);
            assert_eq!(*mode, PlacementMode::HardLink);
        }
        other => panic!("expected placement, got {other:?}"),
    }
    assert!(source.exists(), "hard link mode keeps the source");
    assert_eq!(
        std::fs::read_to_string(&expected).unwrap(),
        "contents of Attack.on.Titan.S04E05.1080p.mkv"
    );
    #[cfg(unix)]
    assert_eq!(link_count(&source), 2);
}

#[tokio::test]
async fn test_movie_gets_year_folder() {
    let harness = TestHarness::new(PlacementMode::HardLink);
    harness
        .llm
        .respond_to(
            "Oppenheimer.2023",
            format!(
                "```json\n{}\n```",
                fixtures::media_json("Oppenheimer", "Movie", "2023", 0, 0)
            ),
        )
        .await;
    let source = harness.create_source_file("Oppenheimer.2023.mkv");

    let outcome = harness.process(&source).await;

    assert!(outcome.is_placed(), "{outcome:?}");
    assert!(harness
        .library
        .join("Movie/Oppenheimer (2023)/Oppenheimer (2023).mkv")
        .is_file());
}

#[tokio::test]
async fn test_second_run_skips_existing_destination() {
    let harness = TestHarness::new(PlacementMode::HardLink);
    harness
        .llm
        .respond_to(
            "Oppenheimer",
            fixtures::media_json("Oppenheimer", "Movie", "2023", 0, 0),
        )
        .await;
    let source = harness.create_source_file("Oppenheimer.2023.mkv");

    let first = harness.process(&source).await;
    assert_eq!(first.stage(), FileStage::Placed);

    let second = harness.process(&source).await;
    match &second {
        ProcessOutcome::Skipped { destination, .. } => {
            assert!(destination.ends_with("Oppenheimer (2023)/Oppenheimer (2023).mkv"));
        }
        other => panic!("expected skip, got {other:?}"),
    }
    assert!(source.exists());

    let status = harness.organizer.status();
    assert_eq!(status.outcomes.placed, 1);
    assert_eq!(status.outcomes.skipped, 1);
}

#[tokio::test]
async fn test_existing_destination_is_left_alone() {
    let harness = TestHarness::new(PlacementMode::Move);
    harness
        .llm
        .respond_to(
            "Planet.Earth",
            fixtures::media_json("Planet Earth", "Doc", "2006", 1, 2),
        )
        .await;
    let source = harness.create_source_file("Planet.Earth.S01E02.mkv");

    let destination = harness
        .library
        .join("Doc/Planet Earth/Season 1/Planet Earth - S01E02.mkv");
    std::fs::create_dir_all(destination.parent().unwrap()).unwrap();
    std::fs::write(&destination, "already shelved").unwrap();

    let outcome = harness.process(&source).await;

    assert_eq!(outcome.stage(), FileStage::Skipped);
    assert!(source.exists(), "skipped move leaves the source in place");
    assert_eq!(std::fs::read_to_string(&destination).unwrap(), "already shelved");
}

#[tokio::test]
async fn test_unauthorized_endpoint_touches_nothing() {
    let harness = TestHarness::new(PlacementMode::Move);
    harness.llm.fail_with_status(401, "invalid api key").await;
    let source = harness.create_source_file("Attack.on.Titan.S04E05.1080p.mkv");

    let outcome = harness.process(&source).await;

    match &outcome {
        ProcessOutcome::Failed {
            info: None,
            error:
                ProcessError::NoClassification(ClassificationError::Llm(LlmError::Api {
                    status, ..
                })),
            ..
        } => assert_eq!(*status, 401),
        other => panic!("expected classification failure, got {other:?}"),
    }
    assert!(source.exists());
    assert!(!harness.library.exists(), "no directories are created");
    assert_eq!(harness.organizer.status().outcomes.failed, 1);
}

#[tokio::test]
async fn test_empty_title_is_not_processed() {
    let harness = TestHarness::new(PlacementMode::HardLink);
    harness
        .llm
        .respond_to("sample", fixtures::media_json("  ", "Movie", "2020", 0, 0))
        .await;
    let source = harness.create_source_file("sample.mkv");

    let outcome = harness.process(&source).await;

    assert!(matches!(
        outcome,
        ProcessOutcome::Failed {
            error: ProcessError::NoClassification(ClassificationError::MissingTitle),
            ..
        }
    ));
    assert!(!harness.library.exists());
}

#[tokio::test]
async fn test_move_mode_removes_source() {
    let harness = TestHarness::new(PlacementMode::Move);
    harness
        .llm
        .respond_to(
            "Breaking.Bad",
            fixtures::media_json("绝命毒师", "TV", "2008", 1, 1),
        )
        .await;
    let source = harness.create_source_file("Breaking.Bad.S01E01.mp4");

    let outcome = harness.process(&source).await;

    assert!(outcome.is_placed(), "{outcome:?}");
    assert!(!source.exists());
    assert!(harness
        .library
        .join("TV/绝命毒师/Season 1/绝命毒师 - S01E01.mp4")
        .is_file());
}

#[tokio::test]
async fn test_catalog_correction_renames_movie() {
    let catalog = Arc::new(MockCatalog::new());
    catalog
        .set_movies(vec![fixtures::movie_match(872585, "奥本海默", "2023-07-19")])
        .await;
    let harness = TestHarness::with_catalog(Arc::clone(&catalog));
    harness
        .llm
        .respond_to(
            "Oppenheimer",
            fixtures::media_json("Oppenheimer", "Movie", "2022", 0, 0),
        )
        .await;
    let source = harness.create_source_file("Oppenheimer.2023.1080p.mkv");

    let outcome = harness.process(&source).await;

    assert!(outcome.is_placed(), "{outcome:?}");
    assert!(harness
        .library
        .join("Movie/奥本海默 (2023)/奥本海默 (2023).mkv")
        .is_file());
    assert_eq!(
        catalog.movie_queries().await,
        vec![("Oppenheimer".to_string(), Some(2022))]
    );
}

#[tokio::test]
async fn test_batch_processes_files_independently() {
    let harness = TestHarness::new(PlacementMode::HardLink);
    harness
        .llm
        .respond_to(
            "Oppenheimer",
            fixtures::media_json("Oppenheimer", "Movie", "2023", 0, 0),
        )
        .await;
    harness.llm.fail_for("broken", 500).await;

    let good = harness.create_source_file("Oppenheimer.2023.mkv");
    let bad = harness.create_source_file("broken.mkv");
    let missing = harness.downloads.path().join("missing.mkv");
    harness
        .llm
        .respond_to("missing", fixtures::media_json("Missing", "Movie", "", 0, 0))
        .await;

    let token = harness.organizer.session_token();
    let outcomes = harness
        .organizer
        .process_batch(&[good.clone(), bad.clone(), missing.clone()], &token)
        .await;

    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[0].source(), &good);
    assert_eq!(outcomes[0].stage(), FileStage::Placed);
    assert_eq!(outcomes[1].stage(), FileStage::Failed);
    assert!(matches!(
        &outcomes[2],
        ProcessOutcome::Failed {
            error: ProcessError::Placement(_),
            ..
        }
    ));
}

#[tokio::test]
async fn test_cancelled_session_stops_before_placement() {
    let llm = Arc::new(MockLlmClient::with_response(fixtures::media_json(
        "Oppenheimer",
        "Movie",
        "2023",
        0,
        0,
    )));
    llm.set_delay(Duration::from_secs(10)).await;
    let placer = Arc::new(MockPlacer::new());
    let organizer = Arc::new(fixtures::organizer(
        "/library",
        Arc::clone(&llm),
        None,
        Arc::clone(&placer) as Arc<dyn autoshelf_core::Placer>,
        PlacementMode::HardLink,
    ));

    let session = organizer.session_token();
    let handle = organizer.submit(PathBuf::from("/dl/Oppenheimer.2023.mkv"), session.clone());

    tokio::time::sleep(Duration::from_millis(50)).await;
    session.cancel();

    let outcome = tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("chain did not observe cancellation")
        .unwrap();
    assert_eq!(outcome.stage(), FileStage::Cancelled);
    assert!(placer.recorded_placements().await.is_empty());
    assert_eq!(organizer.status().outcomes.cancelled, 1);
}

#[tokio::test]
async fn test_shutdown_cancels_every_session() {
    let llm = Arc::new(MockLlmClient::with_response(fixtures::media_json(
        "Oppenheimer",
        "Movie",
        "2023",
        0,
        0,
    )));
    llm.set_delay(Duration::from_secs(10)).await;
    let organizer = Arc::new(fixtures::organizer(
        "/library",
        Arc::clone(&llm),
        None,
        Arc::new(MockPlacer::new()),
        PlacementMode::HardLink,
    ));

    let first = organizer.submit(PathBuf::from("/dl/a.mkv"), organizer.session_token());
    let second = organizer.submit(PathBuf::from("/dl/b.mkv"), organizer.session_token());

    tokio::time::sleep(Duration::from_millis(50)).await;
    organizer.shutdown();
    assert!(organizer.is_shut_down());

    for handle in [first, second] {
        let outcome = tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(outcome.stage(), FileStage::Cancelled);
    }
}
