//! Question lists for each game's levels.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::builtin::THERMO_TABLE;
use crate::catalog::{Catalog, CatalogError};
use crate::compound::Compound;
use crate::config::{GameConfig, GameKind};
use crate::explanation::ProblemKind;
use crate::molar_mass::{FormulaError, molar_mass};
use crate::nomenclature::{BinaryMolecule, NamingError};
use crate::question::{
    CONVERSION_TOLERANCE, Question, conversion_question, limiting_question, max_amount,
    spontaneity_question,
};
use crate::quiz::{QuizError, QuizMode, generate_quiz};
use crate::reaction::Difficulty;
use crate::session::LevelId;
use crate::thermo::{EntropyDirection, ThermoCase, ThermoData};
use crate::units::{ConversionFactor, Unit, UnitError, significant_figures};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LevelBuildError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Formula(#[from] FormulaError),
    #[error(transparent)]
    Naming(#[from] NamingError),
    #[error(transparent)]
    Unit(#[from] UnitError),
    #[error("thermodynamics table is empty")]
    EmptyThermoTable,
    #[error("no binary molecules to name")]
    EmptyMoleculeTable,
}

/// Data the level builders draw from.
#[derive(Debug, Clone)]
pub struct LevelData<'a> {
    pub catalog: &'a Catalog,
    pub compounds: &'a [Compound],
    pub molecules: &'a [BinaryMolecule],
}

const LIMITING_PROMPTS: [&str; 3] = [
    "Explain why this reactant runs out first.",
    "How do the coefficients decide which reactant is limiting?",
    "What is left over when the reaction stops, and why?",
];

const THERMO_PROMPTS: [&str; 3] = [
    "Explain how temperature changes whether this reaction is spontaneous.",
    "Why does the sign of ΔS matter at high temperature?",
    "Describe what ΔG tells you about the reaction.",
];

fn explanation(index: usize, prompts: &[&str; 3], problem: ProblemKind) -> Question {
    Question::Explanation {
        prompt: prompts[index % prompts.len()].to_string(),
        problem,
    }
}

/// Limiting reactant round given in grams, so each amount needs its molar mass.
pub fn limiting_mass_question<R: Rng + ?Sized>(
    rng: &mut R,
    catalog: &Catalog,
    difficulty: Difficulty,
) -> Result<Question, LevelBuildError> {
    let reaction = catalog.random_reaction(rng, difficulty)?.clone();
    let molar_masses = [
        molar_mass(&reaction.reactants[0].formula)?,
        molar_mass(&reaction.reactants[1].formula)?,
    ];
    let max = max_amount(difficulty) * 5;
    let grams = [
        f64::from(rng.gen_range(2..=max)),
        f64::from(rng.gen_range(2..=max)),
    ];

    Ok(Question::LimitingMass {
        reaction,
        grams,
        molar_masses,
    })
}

/// Multiple choice naming round: the distractors shift or swap the prefixes.
pub fn binary_naming_question<R: Rng + ?Sized>(
    rng: &mut R,
    molecules: &[BinaryMolecule],
    option_count: usize,
) -> Result<Question, LevelBuildError> {
    if option_count < 2 {
        return Err(QuizError::OptionCountTooSmall.into());
    }
    let molecule = molecules
        .choose(rng)
        .ok_or(LevelBuildError::EmptyMoleculeTable)?;
    let correct = molecule.name()?;

    let (first, second) = (molecule.first_count, molecule.second_count);
    let variants = [
        (first, second + 1),
        (first + 1, second),
        (first, second.saturating_sub(1)),
        (first.saturating_sub(1), second),
        (second, first),
        (first + 1, second + 1),
    ];
    let mut distractors: Vec<String> = Vec::new();
    for (first_count, second_count) in variants {
        let variant = BinaryMolecule {
            first_count,
            second_count,
            ..*molecule
        };
        // Counts outside the prefix table have no name to offer.
        let Ok(name) = variant.name() else {
            continue;
        };
        if name != correct && !distractors.contains(&name) {
            distractors.push(name);
        }
    }

    if distractors.len() + 1 < option_count {
        return Err(QuizError::InsufficientUniqueOptions {
            required: option_count,
            unique: distractors.len() + 1,
        }
        .into());
    }
    distractors.shuffle(rng);
    distractors.truncate(option_count - 1);

    let correct_index = rng.gen_range(0..option_count);
    let mut options = distractors;
    options.insert(correct_index, correct);

    Ok(Question::MultipleChoice {
        prompt: format!("Name the compound {}.", molecule.formula()),
        options,
        correct_index,
        hint: Some("The first element only takes a prefix when there is more than one.".to_string()),
    })
}

const CHAIN_ROUTES: [[Unit; 3]; 5] = [
    [Unit::Kilogram, Unit::Gram, Unit::Milligram],
    [Unit::Hour, Unit::Minute, Unit::Second],
    [Unit::Kilometre, Unit::Metre, Unit::Centimetre],
    [Unit::Litre, Unit::Millilitre, Unit::CubicCentimetre],
    [Unit::Metre, Unit::Centimetre, Unit::Millimetre],
];

/// Two-step conversion through an intermediate unit.
///
/// With `keep_figures` the answer must also be typed with the same number of
/// significant figures as the given value.
pub fn chain_question<R: Rng + ?Sized>(
    rng: &mut R,
    keep_figures: bool,
) -> Result<Question, LevelBuildError> {
    let route = CHAIN_ROUTES[rng.gen_range(0..CHAIN_ROUTES.len())];
    let factors = route
        .windows(2)
        .map(|pair| ConversionFactor::between(pair[0], pair[1]))
        .collect::<Result<Vec<_>, _>>()?;
    let value = f64::from(rng.gen_range(101..=999u32)) / 100.0;
    let sig_figs = if keep_figures {
        significant_figures(&value.to_string())
    } else {
        None
    };

    Ok(Question::FactorChain {
        value,
        unit: route[0],
        factors,
        tolerance: CONVERSION_TOLERANCE,
        sig_figs,
    })
}

fn thermo_case_question<R: Rng + ?Sized>(
    rng: &mut R,
    table: &[ThermoData],
) -> Result<Question, LevelBuildError> {
    let data = table.choose(rng).ok_or(LevelBuildError::EmptyThermoTable)?;

    Ok(Question::MultipleChoice {
        prompt: format!(
            "{}: ΔH = {} kJ/mol, ΔS = {} J/(mol·K). When is it spontaneous?",
            data.equation, data.delta_h, data.delta_s
        ),
        options: ThermoCase::DESCRIPTIONS.iter().map(ToString::to_string).collect(),
        correct_index: data.case().description_index(),
        hint: Some("Look at the signs of ΔH and ΔS together.".to_string()),
    })
}

fn crossover_question<R: Rng + ?Sized>(
    rng: &mut R,
    table: &[ThermoData],
) -> Result<Question, LevelBuildError> {
    let candidates: Vec<(&ThermoData, f64)> = table
        .iter()
        .filter_map(|data| data.case().crossover().map(|crossover| (data, crossover)))
        .collect();
    let (data, crossover) = candidates
        .choose(rng)
        .ok_or(LevelBuildError::EmptyThermoTable)?;

    Ok(Question::Numeric {
        prompt: format!(
            "{}: ΔH = {} kJ/mol, ΔS = {} J/(mol·K). At what temperature in K does ΔG change sign?",
            data.equation, data.delta_h, data.delta_s
        ),
        expected: (crossover * 10.0).round() / 10.0,
        unit: None,
        tolerance: 0.02,
    })
}

fn entropy_question<R: Rng + ?Sized>(
    rng: &mut R,
    table: &[ThermoData],
) -> Result<Question, LevelBuildError> {
    let data = table.choose(rng).ok_or(LevelBuildError::EmptyThermoTable)?;

    Ok(Question::MultipleChoice {
        prompt: format!("{}: which way does the entropy change?", data.equation),
        options: EntropyDirection::ALL
            .iter()
            .map(|direction| direction.label().to_string())
            .collect(),
        correct_index: data.entropy_direction().index(),
        hint: Some("Count the moles of gas on each side.".to_string()),
    })
}

/// Builds the question list for one level, sized by the level's mastery rule.
///
/// Level 2 of the limiting reactant and thermodynamics games alternates
/// calculations with written explanations. Level 3 of every game mixes in
/// the harder rounds: masses, chained factors, prefixes and sign cases.
pub fn build_level<R: Rng + ?Sized>(
    rng: &mut R,
    kind: GameKind,
    level: LevelId,
    config: &GameConfig,
    data: &LevelData<'_>,
) -> Result<Vec<Question>, LevelBuildError> {
    let count = config.mastery[level.index()].out_of as usize;
    let difficulty = config.difficulties[level.index()];
    let explained = config.mastery[level.index()]
        .min_explanation_average
        .is_some();

    (0..count)
        .map(|index| -> Result<Question, LevelBuildError> {
            let wants_explanation = explained && index % 2 == 1;
            match (kind, level) {
                (GameKind::LimitingReactant, _) if wants_explanation => Ok(explanation(
                    index / 2,
                    &LIMITING_PROMPTS,
                    ProblemKind::LimitingReactant,
                )),
                (GameKind::LimitingReactant, LevelId::Three) if index % 2 == 0 => {
                    limiting_mass_question(rng, data.catalog, difficulty)
                }
                (GameKind::LimitingReactant, _) => {
                    Ok(limiting_question(rng, data.catalog, difficulty)?)
                }
                (GameKind::Thermodynamics, _) if wants_explanation => Ok(explanation(
                    index / 2,
                    &THERMO_PROMPTS,
                    ProblemKind::Thermodynamics,
                )),
                (GameKind::Thermodynamics, LevelId::Three) => match index % 3 {
                    0 => thermo_case_question(rng, THERMO_TABLE),
                    1 => crossover_question(rng, THERMO_TABLE),
                    _ => entropy_question(rng, THERMO_TABLE),
                },
                (GameKind::Thermodynamics, _) => {
                    spontaneity_question(rng, THERMO_TABLE).ok_or(LevelBuildError::EmptyThermoTable)
                }
                (GameKind::Nomenclature, LevelId::Three) if index % 3 == 2 => {
                    binary_naming_question(rng, data.molecules, config.option_count)
                }
                (GameKind::Nomenclature, _) => {
                    let mode = match level {
                        LevelId::One => QuizMode::NameToFormula,
                        LevelId::Two => QuizMode::FormulaToName,
                        LevelId::Three if index % 3 == 0 => QuizMode::NameToFormula,
                        LevelId::Three => QuizMode::FormulaToName,
                    };
                    Ok(generate_quiz(rng, data.compounds, mode, config.option_count)?.into())
                }
                (GameKind::DimensionalAnalysis, LevelId::One) => Ok(conversion_question(rng)),
                (GameKind::DimensionalAnalysis, LevelId::Two) => chain_question(rng, false),
                (GameKind::DimensionalAnalysis, LevelId::Three) => chain_question(rng, true),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::{BINARY_MOLECULES, builtin_catalog, builtin_compounds};
    use crate::question::Answer;
    use crate::reaction::ReactantSlot;
    use rand::SeedableRng;

    fn build(kind: GameKind, level: LevelId) -> Result<Vec<Question>, LevelBuildError> {
        let catalog = builtin_catalog();
        let compounds = builtin_compounds();
        let data = LevelData {
            catalog: &catalog,
            compounds: &compounds,
            molecules: BINARY_MOLECULES,
        };
        let mut rng = rand::rngs::StdRng::seed_from_u64(21);
        build_level(&mut rng, kind, level, &GameConfig::for_game(kind), &data)
    }

    #[test]
    fn limiting_level_two_mixes_explanations() {
        let questions = build(GameKind::LimitingReactant, LevelId::Two).expect("builds");

        assert_eq!(questions.len(), 10);
        let explanations = questions
            .iter()
            .filter(|question| matches!(question, Question::Explanation { .. }))
            .count();
        assert_eq!(explanations, 5);
    }

    #[test]
    fn limiting_level_three_alternates_masses_and_counts() {
        let questions = build(GameKind::LimitingReactant, LevelId::Three).expect("builds");

        assert_eq!(questions.len(), 6);
        for (index, question) in questions.iter().enumerate() {
            match question {
                Question::LimitingMass {
                    reaction,
                    grams,
                    molar_masses,
                } => {
                    assert_eq!(index % 2, 0);
                    assert_eq!(reaction.difficulty, Difficulty::Hard);
                    assert!(grams.iter().all(|grams| (2.0..=200.0).contains(grams)));
                    assert!(molar_masses.iter().all(|mass| *mass > 0.0));
                    let grade = question
                        .grade(&Answer::Limiting {
                            reactant: ReactantSlot::First,
                            product_amount: None,
                        })
                        .expect("mass questions take a reactant");
                    assert!(grade.expected.contains(" mol "));
                }
                Question::LimitingReactant { reaction, amounts } => {
                    assert_eq!(index % 2, 1);
                    assert_eq!(reaction.difficulty, Difficulty::Hard);
                    assert!(amounts.iter().all(|amount| (1.0..=40.0).contains(amount)));
                }
                other => panic!("unexpected {other:?} at level three"),
            }
        }
    }

    #[test]
    fn nomenclature_level_three_names_binary_molecules() {
        let questions = build(GameKind::Nomenclature, LevelId::Three).expect("builds");

        let naming: Vec<&Question> = questions.iter().skip(2).step_by(3).collect();
        assert_eq!(naming.len(), 2);
        for question in naming {
            let Question::MultipleChoice {
                prompt,
                options,
                correct_index,
                ..
            } = question
            else {
                panic!("naming rounds are multiple choice");
            };
            assert!(prompt.starts_with("Name the compound "));
            assert_eq!(options.len(), 4);
            let correct = &options[*correct_index];
            assert!(
                BINARY_MOLECULES
                    .iter()
                    .any(|molecule| prompt.contains(&molecule.formula())
                        && molecule.name().as_ref() == Ok(correct))
            );
            let mut unique = options.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), 4);
        }
    }

    #[test]
    fn carbon_monoxide_still_gets_three_distractors() {
        let monoxide = [BINARY_MOLECULES[0]];
        assert_eq!(monoxide[0].formula(), "CO");
        let mut rng = rand::rngs::StdRng::seed_from_u64(5);

        let Question::MultipleChoice {
            options,
            correct_index,
            ..
        } = binary_naming_question(&mut rng, &monoxide, 4).expect("enough variants")
        else {
            panic!("naming rounds are multiple choice");
        };
        assert_eq!(options[correct_index], "carbon monoxide");
        assert!(options.contains(&"carbon dioxide".to_string()));

        assert_eq!(
            binary_naming_question(&mut rng, &monoxide, 5),
            Err(LevelBuildError::Quiz(QuizError::InsufficientUniqueOptions {
                required: 5,
                unique: 4,
            }))
        );
        assert_eq!(
            binary_naming_question(&mut rng, &[], 4),
            Err(LevelBuildError::EmptyMoleculeTable)
        );
    }

    #[test]
    fn dimensional_levels_move_to_factor_chains() {
        let first = build(GameKind::DimensionalAnalysis, LevelId::One).expect("builds");
        assert!(
            first
                .iter()
                .all(|question| matches!(question, Question::Numeric { .. }))
        );

        for (level, wants_figures) in [(LevelId::Two, false), (LevelId::Three, true)] {
            for question in build(GameKind::DimensionalAnalysis, level).expect("builds") {
                let Question::FactorChain {
                    factors, sig_figs, ..
                } = &question
                else {
                    panic!("level {level} asks factor chains");
                };
                assert_eq!(factors.len(), 2);
                assert!(factors.iter().all(ConversionFactor::is_valid));
                assert_eq!(sig_figs.is_some(), wants_figures);
                assert!(!question.expected().contains("cannot"));
            }
        }
    }

    #[test]
    fn thermo_level_three_rotates_case_crossover_and_entropy() {
        let questions = build(GameKind::Thermodynamics, LevelId::Three).expect("builds");

        assert_eq!(questions.len(), 10);
        for (index, question) in questions.iter().enumerate() {
            match (index % 3, question) {
                (0, Question::MultipleChoice { options, .. }) => {
                    assert_eq!(options.len(), ThermoCase::DESCRIPTIONS.len());
                }
                (1, Question::Numeric { expected, .. }) => {
                    assert!(*expected > 0.0);
                }
                (2, Question::MultipleChoice { options, .. }) => {
                    assert_eq!(options[0], EntropyDirection::Increases.label());
                }
                (slot, other) => panic!("slot {slot} built {other:?}"),
            }
        }
    }

    #[test]
    fn crossover_needs_a_row_with_mixed_signs() {
        let table = [ThermoData {
            equation: "A → B",
            delta_h: -10.0,
            delta_s: 20.0,
            entropy_cue: crate::thermo::EntropyCue::GasMoles {
                reactants: 1,
                products: 2,
            },
        }];
        let mut rng = rand::rngs::StdRng::seed_from_u64(2);

        assert_eq!(
            crossover_question(&mut rng, &table),
            Err(LevelBuildError::EmptyThermoTable)
        );
        let Question::MultipleChoice { correct_index, .. } =
            thermo_case_question(&mut rng, &table).expect("row exists")
        else {
            panic!("case rounds are multiple choice");
        };
        assert_eq!(correct_index, 0);
    }

    #[test]
    fn nomenclature_levels_are_multiple_choice() {
        let questions = build(GameKind::Nomenclature, LevelId::One).expect("builds");

        assert_eq!(questions.len(), 6);
        assert!(questions.iter().all(|question| matches!(
            question,
            Question::MultipleChoice { options, .. } if options.len() == 4
        )));
    }

    #[test]
    fn every_game_builds_every_level() {
        for kind in [
            GameKind::DimensionalAnalysis,
            GameKind::Nomenclature,
            GameKind::LimitingReactant,
            GameKind::Thermodynamics,
        ] {
            for level in LevelId::ALL {
                assert!(build(kind, level).is_ok(), "{kind:?} {level} failed to build");
            }
        }
    }

    #[test]
    fn empty_catalog_surfaces_error() {
        let catalog = Catalog::new(Vec::new());
        let data = LevelData {
            catalog: &catalog,
            compounds: &[],
            molecules: &[],
        };
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);

        let error = build_level(
            &mut rng,
            GameKind::LimitingReactant,
            LevelId::One,
            &GameConfig::for_game(GameKind::LimitingReactant),
            &data,
        )
        .expect_err("no reactions to draw from");

        assert_eq!(
            error,
            LevelBuildError::Catalog(CatalogError::NoReactionsForDifficulty {
                difficulty: crate::Difficulty::Easy
            })
        );
    }
}
