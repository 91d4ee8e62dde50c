use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;

use crate::compound::Compound;

/// Quiz type describing the relationship between prompt and answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuizMode {
    /// Prompts with a compound name and expects the formula as the answer.
    NameToFormula,
    /// Prompts with a formula and expects the compound name as the answer.
    FormulaToName,
}

impl QuizMode {
    fn prompt_for(self, compound: &Compound) -> String {
        match self {
            Self::NameToFormula => compound.display_name(),
            Self::FormulaToName => compound.formula.clone(),
        }
    }

    fn option_for(self, compound: &Compound) -> String {
        match self {
            Self::NameToFormula => compound.formula.clone(),
            Self::FormulaToName => compound.display_name(),
        }
    }
}

/// A single generated matching question.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct QuizItem {
    pub mode: QuizMode,
    /// Text shown as the question prompt.
    pub prompt: String,
    /// List of answer options. Length is always `option_count` passed to the generator.
    pub options: Vec<String>,
    /// Index in `options` that contains the correct answer.
    pub correct_index: usize,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("requires at least {required} compounds but only {available} provided")]
    NotEnoughCompounds { required: usize, available: usize },
    #[error("requires at least {required} unique options but only {unique} available")]
    InsufficientUniqueOptions { required: usize, unique: usize },
    #[error("option count must be at least 2")]
    OptionCountTooSmall,
}

/// Generates a quiz item for the given compounds and quiz mode.
///
/// The function picks unique compounds at random using the supplied random number generator,
/// making it deterministic for testing when used with a seeded RNG.
///
/// # Errors
/// * Returns [`QuizError::OptionCountTooSmall`] if `option_count` is less than 2.
/// * Returns [`QuizError::NotEnoughCompounds`] if fewer than `option_count` compounds are available.
/// * Returns [`QuizError::InsufficientUniqueOptions`] if the provided compounds do not contain
///   enough unique names or formulas for the requested `option_count`.
pub fn generate_quiz<R: Rng + ?Sized>(
    rng: &mut R,
    compounds: &[Compound],
    mode: QuizMode,
    option_count: usize,
) -> Result<QuizItem, QuizError> {
    if option_count < 2 {
        return Err(QuizError::OptionCountTooSmall);
    }

    if compounds.len() < option_count {
        return Err(QuizError::NotEnoughCompounds {
            required: option_count,
            available: compounds.len(),
        });
    }

    let mut seen = HashSet::new();
    let mut unique_indices = Vec::new();

    for (idx, compound) in compounds.iter().enumerate() {
        if seen.insert(mode.option_for(compound)) {
            unique_indices.push(idx);
        }
    }

    if unique_indices.len() < option_count {
        return Err(QuizError::InsufficientUniqueOptions {
            required: option_count,
            unique: unique_indices.len(),
        });
    }

    let mut selected = unique_indices;
    selected.shuffle(rng);
    selected.truncate(option_count);

    // The selection is already in random order, so the answer's slot is drawn directly.
    let correct_index = rng.gen_range(0..selected.len());
    let correct_compound_index = selected[correct_index];

    let options: Vec<String> = selected
        .iter()
        .map(|idx| mode.option_for(&compounds[*idx]))
        .collect();

    Ok(QuizItem {
        mode,
        prompt: mode.prompt_for(&compounds[correct_compound_index]),
        options,
        correct_index,
    })
}
