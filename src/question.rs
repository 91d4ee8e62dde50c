use rand::Rng;
use rand::seq::SliceRandom;

use crate::catalog::{Catalog, CatalogError};
use crate::explanation::{ProblemKind, score_explanation};
use crate::limiting::{CalculationResult, Quantity, calculate, calculate_quantities};
use crate::quiz::QuizItem;
use crate::reaction::{Difficulty, ReactantSlot, Reaction};
use crate::thermo::{Spontaneity, ThermoData, gibbs_free_energy};
use crate::units::{
    ConversionFactor, Unit, UnitError, answer_matches, apply_chain, convert, significant_figures,
};

/// Explanations scoring at least this much count as correct answers.
pub const EXPLANATION_PASS_SCORE: f64 = 0.5;

/// Every kind of question the games ask, discriminated by `type` in JSON.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Question {
    MultipleChoice {
        prompt: String,
        options: Vec<String>,
        correct_index: usize,
        #[serde(default)]
        hint: Option<String>,
    },
    Numeric {
        prompt: String,
        expected: f64,
        #[serde(default)]
        unit: Option<Unit>,
        /// Relative tolerance accepted around `expected`.
        tolerance: f64,
    },
    LimitingReactant {
        reaction: Reaction,
        amounts: [f64; 2],
    },
    /// Limiting reactant from masses, converted to moles through the molar masses.
    LimitingMass {
        reaction: Reaction,
        grams: [f64; 2],
        /// g/mol, in reactant order.
        molar_masses: [f64; 2],
    },
    /// Convert `value` through the given factors.
    FactorChain {
        value: f64,
        unit: Unit,
        factors: Vec<ConversionFactor>,
        tolerance: f64,
        /// When set, the typed answer must carry this many significant figures.
        #[serde(default)]
        sig_figs: Option<usize>,
    },
    Spontaneity {
        equation: String,
        delta_h: f64,
        delta_s: f64,
        temperature: f64,
    },
    Explanation {
        prompt: String,
        problem: ProblemKind,
    },
}

/// A learner's response to a [`Question`].
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Answer {
    Choice { index: usize },
    Number { value: f64 },
    /// The chosen limiting reactant, and optionally the amount of the first product.
    Limiting {
        reactant: ReactantSlot,
        #[serde(default)]
        product_amount: Option<u64>,
    },
    Spontaneity { prediction: Spontaneity },
    Text { text: String },
}

impl Answer {
    fn kind(&self) -> &'static str {
        match self {
            Self::Choice { .. } => "choice",
            Self::Number { .. } => "number",
            Self::Limiting { .. } => "limiting",
            Self::Spontaneity { .. } => "spontaneity",
            Self::Text { .. } => "text",
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Grade {
    pub correct: bool,
    /// Partial credit between 0 and 1.
    pub score: f64,
    /// The expected answer, formatted for the feedback panel.
    pub expected: String,
    /// Set only for free-text questions.
    pub explanation_score: Option<f64>,
}

impl Grade {
    fn binary(correct: bool, expected: String) -> Self {
        Self {
            correct,
            score: if correct { 1.0 } else { 0.0 },
            expected,
            explanation_score: None,
        }
    }

    /// Two-part answer: half credit for each part that is right.
    fn partial(first: bool, second: bool, expected: String) -> Self {
        let parts = u8::from(first) + u8::from(second);
        Self {
            correct: first && second,
            score: f64::from(parts) / 2.0,
            expected,
            explanation_score: None,
        }
    }

    /// Grade for a question whose time ran out before an answer was submitted.
    pub fn unanswered(expected: String) -> Self {
        Self::binary(false, expected)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QuestionError {
    #[error("a {answer} answer cannot be given to a {question} question")]
    AnswerKindMismatch {
        question: &'static str,
        answer: &'static str,
    },
    #[error("choice {index} is out of range for {options} options")]
    ChoiceOutOfRange { index: usize, options: usize },
    #[error(transparent)]
    Unit(#[from] UnitError),
}

fn mass_result(reaction: &Reaction, grams: &[f64; 2], molar_masses: &[f64; 2]) -> CalculationResult {
    calculate_quantities(
        reaction,
        Quantity::Grams {
            grams: grams[0],
            molar_mass: molar_masses[0],
        },
        Quantity::Grams {
            grams: grams[1],
            molar_mass: molar_masses[1],
        },
    )
}

fn chain_target(factors: &[ConversionFactor], unit: Unit) -> Unit {
    factors
        .last()
        .map(|factor| factor.numerator_unit)
        .unwrap_or(unit)
}

impl Question {
    fn kind(&self) -> &'static str {
        match self {
            Self::MultipleChoice { .. } => "multiple-choice",
            Self::Numeric { .. } => "numeric",
            Self::LimitingReactant { .. } => "limiting-reactant",
            Self::LimitingMass { .. } => "limiting-mass",
            Self::FactorChain { .. } => "factor-chain",
            Self::Spontaneity { .. } => "spontaneity",
            Self::Explanation { .. } => "explanation",
        }
    }

    pub fn prompt(&self) -> String {
        match self {
            Self::MultipleChoice { prompt, .. }
            | Self::Numeric { prompt, .. }
            | Self::Explanation { prompt, .. } => prompt.clone(),
            Self::LimitingReactant { reaction, amounts } => format!(
                "{}: {} × {} and {} × {}. Which reactant runs out first?",
                reaction.equation,
                amounts[0],
                reaction.reactants[0].formula,
                amounts[1],
                reaction.reactants[1].formula
            ),
            Self::LimitingMass {
                reaction,
                grams,
                molar_masses,
            } => format!(
                "{}: {} g of {} ({:.2} g/mol) and {} g of {} ({:.2} g/mol). Which reactant runs out first?",
                reaction.equation,
                grams[0],
                reaction.reactants[0].formula,
                molar_masses[0],
                grams[1],
                reaction.reactants[1].formula,
                molar_masses[1]
            ),
            Self::FactorChain {
                value,
                unit,
                factors,
                ..
            } => {
                let steps: Vec<String> = factors.iter().map(ToString::to_string).collect();
                format!(
                    "Convert {value} {unit} to {} using {}.",
                    chain_target(factors, *unit),
                    steps.join(" × ")
                )
            }
            Self::Spontaneity {
                equation,
                delta_h,
                delta_s,
                temperature,
            } => format!(
                "{equation}: ΔH = {delta_h} kJ/mol, ΔS = {delta_s} J/(mol·K), T = {temperature} K. Is it spontaneous?"
            ),
        }
    }

    pub fn hint(&self) -> Option<String> {
        match self {
            Self::MultipleChoice { hint, .. } => hint.clone(),
            Self::Numeric { unit, .. } => unit.map(|unit| format!("Give the answer in {unit}.")),
            Self::LimitingReactant { .. } => {
                Some("Divide each amount by its coefficient and compare.".to_string())
            }
            Self::LimitingMass { .. } => Some(
                "Turn each mass into moles first, then divide by its coefficient.".to_string(),
            ),
            Self::FactorChain { sig_figs, .. } => Some(match sig_figs {
                Some(figures) => format!(
                    "Each factor's bottom unit cancels the unit before it. Keep {figures} significant figures."
                ),
                None => "Each factor's bottom unit cancels the unit before it.".to_string(),
            }),
            Self::Spontaneity { .. } => {
                Some("Use ΔG = ΔH − TΔS; remember ΔS is in J, not kJ.".to_string())
            }
            Self::Explanation { problem, .. } => Some(format!(
                "Try to mention: {}",
                problem.keywords()[..3].join(", ")
            )),
        }
    }

    /// The correct answer, formatted for feedback.
    pub fn expected(&self) -> String {
        match self {
            Self::MultipleChoice {
                options,
                correct_index,
                ..
            } => options.get(*correct_index).cloned().unwrap_or_default(),
            Self::Numeric { expected, unit, .. } => match unit {
                Some(unit) => format!("{expected} {unit}"),
                None => expected.to_string(),
            },
            Self::LimitingReactant { reaction, amounts } => {
                let result = calculate(reaction, amounts[0], amounts[1]);
                let formed: Vec<String> = reaction
                    .products
                    .iter()
                    .map(|product| {
                        format!("{} {}", result.product_amount(&product.formula), product.formula)
                    })
                    .collect();
                format!(
                    "{} is limiting; forms {}; {} {} left over",
                    result.limiting_formula,
                    formed.join(" + "),
                    result.excess_remaining,
                    result.excess_formula
                )
            }
            Self::LimitingMass {
                reaction,
                grams,
                molar_masses,
            } => {
                let moles: Vec<String> = grams
                    .iter()
                    .zip(molar_masses)
                    .zip(&reaction.reactants)
                    .map(|((grams, molar_mass), species)| {
                        let amount = Quantity::Grams {
                            grams: *grams,
                            molar_mass: *molar_mass,
                        }
                        .amount();
                        format!("{:.2} mol {}", amount, species.formula)
                    })
                    .collect();
                format!(
                    "{} is limiting; {}",
                    mass_result(reaction, grams, molar_masses).limiting_formula,
                    moles.join(" and ")
                )
            }
            Self::FactorChain {
                value,
                unit,
                factors,
                sig_figs,
                ..
            } => match apply_chain(*value, *unit, factors) {
                Ok((result, target)) => match sig_figs {
                    Some(figures) => format!(
                        "{:.*e} {} ({} significant figures)",
                        figures.saturating_sub(1),
                        result,
                        target,
                        figures
                    ),
                    None => format!("{result} {target}"),
                },
                Err(error) => error.to_string(),
            },
            Self::Spontaneity {
                delta_h,
                delta_s,
                temperature,
                ..
            } => {
                let delta_g = gibbs_free_energy(*delta_h, *delta_s, *temperature);
                format!(
                    "ΔG = {:.1} kJ/mol: {:?}",
                    delta_g,
                    Spontaneity::from_delta_g(delta_g)
                )
            }
            Self::Explanation { problem, .. } => {
                format!("An explanation using: {}", problem.keywords().join(", "))
            }
        }
    }

    /// Scores an answer against the precomputed expected value.
    pub fn grade(&self, answer: &Answer) -> Result<Grade, QuestionError> {
        let expected = self.expected();

        match (self, answer) {
            (
                Self::MultipleChoice {
                    options,
                    correct_index,
                    ..
                },
                Answer::Choice { index },
            ) => {
                if *index >= options.len() {
                    return Err(QuestionError::ChoiceOutOfRange {
                        index: *index,
                        options: options.len(),
                    });
                }
                Ok(Grade::binary(index == correct_index, expected))
            }
            (
                Self::Numeric {
                    expected: target,
                    tolerance,
                    ..
                },
                Answer::Number { value },
            ) => Ok(Grade::binary(
                answer_matches(*value, *target, *tolerance),
                expected,
            )),
            (
                Self::LimitingReactant { reaction, amounts },
                Answer::Limiting {
                    reactant,
                    product_amount,
                },
            ) => {
                let result = calculate(reaction, amounts[0], amounts[1]);
                let reactant_right = *reactant == result.limiting;

                Ok(match product_amount {
                    None => Grade::binary(reactant_right, expected),
                    Some(amount) => {
                        let formed = reaction
                            .products
                            .first()
                            .map(|product| result.product_amount(&product.formula))
                            .unwrap_or(0);
                        Grade::partial(reactant_right, *amount == formed, expected)
                    }
                })
            }
            (
                Self::LimitingMass {
                    reaction,
                    grams,
                    molar_masses,
                },
                Answer::Limiting { reactant, .. },
            ) => Ok(Grade::binary(
                *reactant == mass_result(reaction, grams, molar_masses).limiting,
                expected,
            )),
            (
                Self::FactorChain {
                    value,
                    unit,
                    factors,
                    tolerance,
                    sig_figs,
                },
                Answer::Number { value: answer },
            ) => {
                let (target, _) = apply_chain(*value, *unit, factors)?;
                let value_right = answer_matches(*answer, target, *tolerance);
                // A bare number cannot show its significant figures.
                let figures_right = sig_figs.is_none();
                Ok(Grade::partial(value_right, figures_right, expected))
            }
            (
                Self::FactorChain {
                    value,
                    unit,
                    factors,
                    tolerance,
                    sig_figs,
                },
                Answer::Text { text },
            ) => {
                let (target, _) = apply_chain(*value, *unit, factors)?;
                let value_right = text
                    .trim()
                    .parse::<f64>()
                    .is_ok_and(|answer| answer_matches(answer, target, *tolerance));
                let figures_right = match sig_figs {
                    Some(figures) => significant_figures(text) == Some(*figures),
                    None => true,
                };
                Ok(Grade::partial(value_right, figures_right, expected))
            }
            (
                Self::Spontaneity {
                    delta_h,
                    delta_s,
                    temperature,
                    ..
                },
                Answer::Spontaneity { prediction },
            ) => Ok(Grade::binary(
                *prediction == Spontaneity::predict(*delta_h, *delta_s, *temperature),
                expected,
            )),
            (Self::Explanation { problem, .. }, Answer::Text { text }) => {
                let score = score_explanation(text, *problem);
                Ok(Grade {
                    correct: score >= EXPLANATION_PASS_SCORE,
                    score,
                    expected,
                    explanation_score: Some(score),
                })
            }
            (question, answer) => Err(QuestionError::AnswerKindMismatch {
                question: question.kind(),
                answer: answer.kind(),
            }),
        }
    }
}

impl From<QuizItem> for Question {
    fn from(item: QuizItem) -> Self {
        Self::MultipleChoice {
            prompt: item.prompt,
            options: item.options,
            correct_index: item.correct_index,
            hint: None,
        }
    }
}

/// Largest reactant amount offered at each difficulty.
pub fn max_amount(difficulty: Difficulty) -> u32 {
    match difficulty {
        Difficulty::Easy => 10,
        Difficulty::Medium => 20,
        Difficulty::Hard => 40,
    }
}

/// Builds a limiting reactant round from a random reaction of the given difficulty.
pub fn limiting_question<R: Rng + ?Sized>(
    rng: &mut R,
    catalog: &Catalog,
    difficulty: Difficulty,
) -> Result<Question, CatalogError> {
    let reaction = catalog.random_reaction(rng, difficulty)?.clone();
    let max = max_amount(difficulty);
    let amounts = [
        f64::from(rng.gen_range(1..=max)),
        f64::from(rng.gen_range(1..=max)),
    ];

    Ok(Question::LimitingReactant { reaction, amounts })
}

const TEMPERATURES: [f64; 5] = [200.0, 298.0, 500.0, 1000.0, 1500.0];

pub fn spontaneity_question<R: Rng + ?Sized>(rng: &mut R, table: &[ThermoData]) -> Option<Question> {
    let data = table.choose(rng)?;
    let temperature = *TEMPERATURES.choose(rng)?;

    Some(Question::Spontaneity {
        equation: data.equation.to_string(),
        delta_h: data.delta_h,
        delta_s: data.delta_s,
        temperature,
    })
}

const CONVERSION_PAIRS: [(Unit, Unit); 8] = [
    (Unit::Gram, Unit::Milligram),
    (Unit::Kilogram, Unit::Gram),
    (Unit::Litre, Unit::Millilitre),
    (Unit::Millilitre, Unit::Litre),
    (Unit::Mole, Unit::Millimole),
    (Unit::Kilometre, Unit::Metre),
    (Unit::Centimetre, Unit::Millimetre),
    (Unit::Hour, Unit::Second),
];

/// Relative tolerance accepted on unit conversion answers.
pub const CONVERSION_TOLERANCE: f64 = 0.01;

pub fn conversion_question<R: Rng + ?Sized>(rng: &mut R) -> Question {
    let (from, to) = CONVERSION_PAIRS[rng.gen_range(0..CONVERSION_PAIRS.len())];
    let value = f64::from(rng.gen_range(1..=500u32)) / 10.0;
    let expected = convert(value, from, to).unwrap_or_default();

    Question::Numeric {
        prompt: format!("Convert {value} {from} to {to}."),
        expected,
        unit: Some(to),
        tolerance: CONVERSION_TOLERANCE,
    }
}
