pub mod achievements;
pub mod builtin;
pub mod catalog;
pub mod compound;
pub mod config;
pub mod explanation;
pub mod levels;
pub mod limiting;
pub mod molar_mass;
pub mod nomenclature;
pub mod progress;
pub mod question;
pub mod quiz;
pub mod reaction;
pub mod session;
pub mod thermo;
pub mod timer;
pub mod units;

#[cfg(target_arch = "wasm32")]
mod wasm;

pub use achievements::{Achievement, AchievementLog, AchievementTracker, NoAchievements};
pub use builtin::{BINARY_MOLECULES, THERMO_TABLE, builtin_catalog, builtin_compounds};
pub use catalog::{Catalog, CatalogEntry, CatalogError, CatalogLoadError};
pub use compound::{Compound, CompoundKind};
pub use config::{ConfigError, GameConfig, GameKind, MasteryRule};
pub use explanation::{ProblemKind, score_explanation};
pub use levels::{
    LevelBuildError, LevelData, binary_naming_question, build_level, chain_question,
    limiting_mass_question,
};
pub use limiting::{CalculationResult, Quantity, calculate, calculate_quantities};
pub use molar_mass::{FormulaError, molar_mass, parse_formula};
pub use nomenclature::{BinaryMolecule, NamingError, binary_molecular_name};
pub use progress::{
    FileStore, GameProgress, KeyValueStore, LevelProgress, MemoryStore, ProgressStore, StoreError,
};
pub use question::{Answer, Grade, Question, QuestionError};
pub use quiz::{QuizError, QuizItem, QuizMode, generate_quiz};
pub use reaction::{Difficulty, ReactantSlot, Reaction, ReactionError, Species};
pub use session::{
    GameSession, LevelError, LevelId, LevelOutcome, LevelRun, Phase, Screen, ScreenEvent,
    SessionError, Step, TransitionError, transition,
};
pub use thermo::{EntropyCue, EntropyDirection, Spontaneity, ThermoCase, ThermoData, gibbs_free_energy};
pub use timer::{Countdown, Tick};
pub use units::{ConversionFactor, Unit, UnitError, apply_chain, convert, significant_figures};
