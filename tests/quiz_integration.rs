use chemgames::{Answer, Question, QuizMode, builtin_compounds, generate_quiz};
use rand::SeedableRng;

#[test]
fn deterministic_generation_from_seed() {
    let compounds = builtin_compounds();
    let quiz = |seed| {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        generate_quiz(&mut rng, &compounds, QuizMode::FormulaToName, 4)
            .expect("quiz should be generated with builtin data")
    };

    assert_eq!(quiz(99), quiz(99));
    assert_eq!(quiz(99).options.len(), 4);
}

#[test]
fn options_are_unique() {
    let compounds = builtin_compounds();
    let mut rng = rand::rngs::StdRng::seed_from_u64(120);

    let quiz = generate_quiz(&mut rng, &compounds, QuizMode::NameToFormula, 6)
        .expect("quiz should be generated with unique options");

    let mut seen = std::collections::HashSet::new();
    for option in &quiz.options {
        assert!(seen.insert(option));
    }
}

#[test]
fn prompt_matches_selected_option() {
    let compounds = builtin_compounds();
    let mut rng = rand::rngs::StdRng::seed_from_u64(5);

    let quiz = generate_quiz(&mut rng, &compounds, QuizMode::FormulaToName, 4)
        .expect("quiz should generate");

    let matched = compounds
        .iter()
        .find(|compound| compound.formula == quiz.prompt)
        .expect("prompt should match provided compounds");

    assert_eq!(quiz.options[quiz.correct_index], matched.display_name());
}

#[test]
fn quiz_items_grade_as_multiple_choice() {
    let compounds = builtin_compounds();
    let mut rng = rand::rngs::StdRng::seed_from_u64(17);

    let quiz = generate_quiz(&mut rng, &compounds, QuizMode::NameToFormula, 3)
        .expect("quiz should generate");
    let correct_index = quiz.correct_index;
    let question = Question::from(quiz);

    let right = question
        .grade(&Answer::Choice {
            index: correct_index,
        })
        .expect("answer kind matches");
    let wrong = question
        .grade(&Answer::Choice {
            index: (correct_index + 1) % 3,
        })
        .expect("answer kind matches");

    assert!(right.correct);
    assert!(!wrong.correct);
}
