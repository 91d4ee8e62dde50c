//! Keyword heuristics for grading free-text explanations.
//!
//! This is pattern matching, not language understanding: it rewards answers
//! that are long enough and use the vocabulary the problem calls for.

/// Explanations shorter than this (in characters, after trimming) score zero.
pub const MIN_EXPLANATION_LENGTH: usize = 20;

const SPECIFIC_WEIGHT: f64 = 0.15;
const SPECIFIC_CAP: f64 = 0.6;
const GENERAL_WEIGHT: f64 = 0.1;
const GENERAL_CAP: f64 = 0.2;

const GENERAL_KEYWORDS: &[&str] = &[
    "because",
    "therefore",
    "so ",
    "since",
    "ratio",
    "compare",
    "calculate",
];

/// Problem category an explanation is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProblemKind {
    LimitingReactant,
    Thermodynamics,
    UnitConversion,
    Nomenclature,
}

impl ProblemKind {
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::LimitingReactant => &[
                "limiting",
                "excess",
                "coefficient",
                "mole",
                "runs out",
                "product",
                "left over",
            ],
            Self::Thermodynamics => &[
                "enthalpy",
                "entropy",
                "gibbs",
                "temperature",
                "spontaneous",
                "disorder",
                "δg",
            ],
            Self::UnitConversion => &[
                "unit",
                "cancel",
                "factor",
                "multiply",
                "divide",
                "significant",
            ],
            Self::Nomenclature => &[
                "prefix",
                "ion",
                "charge",
                "suffix",
                "anion",
                "cation",
            ],
        }
    }
}

fn matched(text: &str, keywords: &[&str]) -> usize {
    keywords
        .iter()
        .filter(|keyword| text.contains(*keyword))
        .count()
}

fn length_bonus(length: usize) -> f64 {
    if length >= 150 {
        0.2
    } else if length >= 80 {
        0.1
    } else {
        0.0
    }
}

/// Scores an explanation between 0 and 1.
pub fn score_explanation(text: &str, kind: ProblemKind) -> f64 {
    let trimmed = text.trim();
    let length = trimmed.chars().count();
    if length < MIN_EXPLANATION_LENGTH {
        return 0.0;
    }

    let lowered = format!("{} ", trimmed.to_lowercase());
    let specific = (matched(&lowered, kind.keywords()) as f64 * SPECIFIC_WEIGHT).min(SPECIFIC_CAP);
    let general = (matched(&lowered, GENERAL_KEYWORDS) as f64 * GENERAL_WEIGHT).min(GENERAL_CAP);

    (specific + general + length_bonus(length)).clamp(0.0, 1.0)
}
