use crate::reaction::Difficulty;

/// The four games in the suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameKind {
    DimensionalAnalysis,
    Nomenclature,
    LimitingReactant,
    Thermodynamics,
}

impl GameKind {
    /// Key of the JSON progress blob this game owns in the store.
    pub fn storage_key(self) -> &'static str {
        match self {
            Self::DimensionalAnalysis => "dimensional-analysis",
            Self::Nomenclature => "nafnakerfidProgress",
            Self::LimitingReactant => "takmarkandi-levels-progress",
            Self::Thermodynamics => "thermodynamics-predictor-progress",
        }
    }
}

/// Gate a level's results must pass before the next level unlocks.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MasteryRule {
    pub min_correct: u32,
    pub out_of: u32,
    /// Average free-text score required, when the level asks for explanations.
    #[serde(default)]
    pub min_explanation_average: Option<f64>,
}

impl MasteryRule {
    pub fn is_met(&self, correct: u32, explanation_average: Option<f64>) -> bool {
        if correct < self.min_correct {
            return false;
        }

        match (self.min_explanation_average, explanation_average) {
            (Some(required), Some(average)) => average >= required,
            (Some(_), None) => false,
            (None, _) => true,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse game config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("level {level} is configured with {min_correct} required of {out_of} questions")]
    UnreachableMastery {
        level: usize,
        min_correct: u32,
        out_of: u32,
    },
    #[error("timer_seconds must be positive; use null for untimed levels")]
    ZeroTimer,
}

/// Tunables for one game. Missing fields in JSON fall back to the defaults
/// of [`GameConfig::for_game`] for the limiting reactant game.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Mastery rules for levels 1, 2 and 3.
    pub mastery: [MasteryRule; 3],
    /// Difficulty used to draw questions for each level.
    pub difficulties: [Difficulty; 3],
    /// Countdown length for timed levels; `None` disables the timer.
    pub timer_seconds: Option<u32>,
    pub points_per_correct: u32,
    /// Multiplier applied to a question's points when a hint was used.
    pub hint_multiplier: f64,
    /// Options per multiple-choice question.
    pub option_count: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::for_game(GameKind::LimitingReactant)
    }
}

const EIGHT_OF_TEN: MasteryRule = MasteryRule {
    min_correct: 8,
    out_of: 10,
    min_explanation_average: None,
};

const FIVE_OF_SIX: MasteryRule = MasteryRule {
    min_correct: 5,
    out_of: 6,
    min_explanation_average: None,
};

const EXPLAINED_EIGHT_OF_TEN: MasteryRule = MasteryRule {
    min_correct: 8,
    out_of: 10,
    min_explanation_average: Some(0.7),
};

const LEVEL_DIFFICULTIES: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

impl GameConfig {
    pub fn for_game(kind: GameKind) -> Self {
        match kind {
            GameKind::LimitingReactant => Self {
                mastery: [EIGHT_OF_TEN, EXPLAINED_EIGHT_OF_TEN, FIVE_OF_SIX],
                difficulties: LEVEL_DIFFICULTIES,
                timer_seconds: Some(90),
                points_per_correct: 10,
                hint_multiplier: 0.5,
                option_count: 4,
            },
            GameKind::Thermodynamics => Self {
                mastery: [EIGHT_OF_TEN, EXPLAINED_EIGHT_OF_TEN, EIGHT_OF_TEN],
                difficulties: LEVEL_DIFFICULTIES,
                timer_seconds: Some(120),
                points_per_correct: 10,
                hint_multiplier: 0.5,
                option_count: 3,
            },
            GameKind::Nomenclature | GameKind::DimensionalAnalysis => Self {
                mastery: [FIVE_OF_SIX; 3],
                difficulties: LEVEL_DIFFICULTIES,
                timer_seconds: None,
                points_per_correct: 10,
                hint_multiplier: 0.5,
                option_count: 4,
            },
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (index, rule) in self.mastery.iter().enumerate() {
            if rule.out_of == 0 || rule.min_correct > rule.out_of {
                return Err(ConfigError::UnreachableMastery {
                    level: index + 1,
                    min_correct: rule.min_correct,
                    out_of: rule.out_of,
                });
            }
        }
        if self.timer_seconds == Some(0) {
            return Err(ConfigError::ZeroTimer);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_keys_are_fixed() {
        assert_eq!(
            GameKind::LimitingReactant.storage_key(),
            "takmarkandi-levels-progress"
        );
        assert_eq!(GameKind::Nomenclature.storage_key(), "nafnakerfidProgress");
    }

    #[test]
    fn explained_mastery_needs_both_gates() {
        assert!(EXPLAINED_EIGHT_OF_TEN.is_met(8, Some(0.7)));
        assert!(!EXPLAINED_EIGHT_OF_TEN.is_met(8, Some(0.69)));
        assert!(!EXPLAINED_EIGHT_OF_TEN.is_met(7, Some(0.9)));
        assert!(!EXPLAINED_EIGHT_OF_TEN.is_met(10, None));
        assert!(FIVE_OF_SIX.is_met(5, None));
    }

    #[test]
    fn json_overrides_fall_back_to_defaults() {
        let config = GameConfig::from_json(r#"{ "timer_seconds": null, "hint_multiplier": 0.25 }"#)
            .expect("partial config parses");

        assert_eq!(config.timer_seconds, None);
        assert_eq!(config.hint_multiplier, 0.25);
        assert_eq!(config.points_per_correct, 10);
        assert_eq!(config.mastery[0], EIGHT_OF_TEN);
    }

    #[test]
    fn rejects_unreachable_mastery() {
        let json = r#"{
            "mastery": [
                { "min_correct": 7, "out_of": 6 },
                { "min_correct": 5, "out_of": 6 },
                { "min_correct": 5, "out_of": 6 }
            ]
        }"#;

        let error = GameConfig::from_json(json).expect_err("7 of 6 is unreachable");
        assert!(matches!(
            error,
            ConfigError::UnreachableMastery {
                level: 1,
                min_correct: 7,
                out_of: 6
            }
        ));
    }

    #[test]
    fn rejects_zero_second_timer() {
        assert!(matches!(
            GameConfig::from_json(r#"{ "timer_seconds": 0 }"#),
            Err(ConfigError::ZeroTimer)
        ));
        assert!(GameConfig::from_json(r#"{ "timer_seconds": 1 }"#).is_ok());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            GameConfig::from_json("{"),
            Err(ConfigError::Parse(_))
        ));
    }
}
