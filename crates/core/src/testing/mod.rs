//! Testing utilities and mock implementations.
//!
//! Mocks stand in for the completion endpoint, the metadata catalog and
//! the placer so a whole organizer can run without network or disk.
//!
//! # Example
//!
//! ```rust,ignore
//! use autoshelf_core::testing::{fixtures, MockCatalog, MockLlmClient};
//!
//! let llm = MockLlmClient::with_response(fixtures::media_json("Oppenheimer", "Movie", "2023", 0, 0));
//! let catalog = MockCatalog::new();
//! catalog.set_movies(vec![fixtures::movie_match(872585, "奥本海默", "2023-07-19")]).await;
//! ```

mod mock_catalog;
mod mock_llm;
mod mock_placer;

pub use mock_catalog::MockCatalog;
pub use mock_llm::MockLlmClient;
pub use mock_placer::{MockPlacer, RecordedPlacement};

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::sync::Arc;

    use crate::classifier::Classifier;
    use crate::metadata::{Corrector, MetadataCatalog, MovieMatch, SeriesMatch};
    use crate::orchestrator::{Organizer, OrganizerConfig};
    use crate::placer::{PlacementMode, Placer};
    use crate::planner::{CategoryDirs, PathPlanner};

    use super::MockLlmClient;

    /// A completion reply in the shape the classifier expects.
    pub fn media_json(title: &str, kind: &str, year: &str, season: u32, episode: u32) -> String {
        serde_json::json!({
            "title": title,
            "type": kind,
            "year": year,
            "season": season,
            "episode": episode,
        })
        .to_string()
    }

    /// A catalog movie hit.
    pub fn movie_match(id: u32, title: &str, release_date: &str) -> MovieMatch {
        MovieMatch {
            id,
            title: title.to_string(),
            release_date: Some(release_date.to_string()),
        }
    }

    /// A catalog series hit.
    pub fn series_match(id: u32, name: &str, first_air_date: &str) -> SeriesMatch {
        SeriesMatch {
            id,
            name: name.to_string(),
            first_air_date: Some(first_air_date.to_string()),
        }
    }

    /// An organizer wired to mocks, placing under `library` with default
    /// category directories.
    pub fn organizer(
        library: impl Into<std::path::PathBuf>,
        llm: Arc<MockLlmClient>,
        catalog: Option<Arc<dyn MetadataCatalog>>,
        placer: Arc<dyn Placer>,
        mode: PlacementMode,
    ) -> Organizer {
        let corrector = match catalog {
            Some(catalog) => Corrector::new(catalog),
            None => Corrector::disabled(),
        };
        Organizer::new(
            OrganizerConfig::default(),
            Classifier::new(llm),
            corrector,
            PathPlanner::new(library, CategoryDirs::default()),
            placer,
            mode,
        )
    }
}
