pub mod classifier;
pub mod config;
pub mod media;
pub mod metadata;
pub mod metrics;
pub mod orchestrator;
pub mod placer;
pub mod planner;
pub mod testing;
pub mod watcher;

pub use classifier::{
    ChatCompletionsClient, ClassificationError, Classifier, ClassifierConfig, LlmClient, LlmError,
    LlmProvider,
};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, LibraryConfig,
    SanitizedConfig, ServerConfig,
};
pub use media::{Category, MediaInfo};
pub use metadata::{
    CatalogError, Corrector, MetadataCatalog, MovieMatch, SeriesMatch, TmdbClient, TmdbConfig,
};
pub use orchestrator::{
    FileStage, OrchestratorError, Organizer, OrganizerConfig, OrganizerStatus, OutcomeReport,
    ProcessError, ProcessOutcome,
};
pub use placer::{FsPlacer, PlacementMode, PlacementResult, Placer, PlacerError};
pub use planner::{CategoryDirs, PathPlanner};
pub use watcher::{FileWatcher, WatchConfig, WatchError, WatchFilter, WatchHandle};
