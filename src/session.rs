//! Screen and level state machines shared by all games.
//!
//! A game moves between [`Screen`]s through [`transition`]; inside a level a
//! [`LevelRun`] walks the questions through its [`Phase`]s. [`GameSession`]
//! ties both to the persisted progress and the achievement tracker.

use std::fmt;

use crate::achievements::AchievementTracker;
use crate::config::{GameConfig, GameKind, MasteryRule};
use crate::progress::{GameProgress, KeyValueStore, ProgressStore, StoreError};
use crate::question::{Answer, Grade, Question, QuestionError};
use crate::timer::{Countdown, Tick};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("there is no level {0}")]
pub struct InvalidLevel(pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum LevelId {
    One,
    Two,
    Three,
}

impl LevelId {
    pub const ALL: [LevelId; 3] = [LevelId::One, LevelId::Two, LevelId::Three];

    pub fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }

    pub fn index(self) -> usize {
        usize::from(self.number() - 1)
    }

    pub fn previous(self) -> Option<Self> {
        match self {
            Self::One => None,
            Self::Two => Some(Self::One),
            Self::Three => Some(Self::Two),
        }
    }

    pub fn next(self) -> Option<Self> {
        match self {
            Self::One => Some(Self::Two),
            Self::Two => Some(Self::Three),
            Self::Three => None,
        }
    }
}

impl TryFrom<u8> for LevelId {
    type Error = InvalidLevel;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            other => Err(InvalidLevel(other)),
        }
    }
}

impl From<LevelId> for u8 {
    fn from(level: LevelId) -> Self {
        level.number()
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "level {}", self.number())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Level(LevelId),
    Summary(LevelId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenEvent {
    StartLevel(LevelId),
    FinishLevel,
    ReturnToMenu,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("{level} is locked until {required} is mastered")]
    LevelLocked { level: LevelId, required: LevelId },
    #[error("{event:?} is not allowed from {from:?}")]
    NotAllowed { from: Screen, event: ScreenEvent },
}

/// The screen transition table.
///
/// Levels can be started from the menu or from a summary (retry or continue),
/// but only once the previous level is mastered in `progress`.
pub fn transition(
    from: Screen,
    event: ScreenEvent,
    progress: &GameProgress,
) -> Result<Screen, TransitionError> {
    match (from, event) {
        (Screen::Menu | Screen::Summary(_), ScreenEvent::StartLevel(level)) => {
            match level.previous() {
                Some(required) if !progress.is_mastered(required) => {
                    Err(TransitionError::LevelLocked { level, required })
                }
                _ => Ok(Screen::Level(level)),
            }
        }
        (Screen::Level(level), ScreenEvent::FinishLevel) => Ok(Screen::Summary(level)),
        (Screen::Level(_) | Screen::Summary(_), ScreenEvent::ReturnToMenu) => Ok(Screen::Menu),
        (from, event) => Err(TransitionError::NotAllowed { from, event }),
    }
}

/// Where the current question stands.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    QuestionShown,
    AnswerSelected(Answer),
    FeedbackShown(Grade),
}

/// What [`LevelRun::next`] moved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    NextQuestion(usize),
    LevelComplete,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LevelError {
    #[error("a level needs at least one question")]
    NoQuestions,
    #[error("cannot {operation} in the current phase")]
    WrongPhase { operation: &'static str },
    #[error(transparent)]
    Question(#[from] QuestionError),
}

/// Summary of a finished level.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct LevelOutcome {
    pub level: LevelId,
    pub correct: u32,
    pub total: u32,
    pub points: f64,
    pub hints_used: u32,
    pub explanation_average: Option<f64>,
    pub mastered: bool,
}

impl LevelOutcome {
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            f64::from(self.correct) / f64::from(self.total)
        }
    }
}

/// One pass through a level's questions.
#[derive(Debug, Clone)]
pub struct LevelRun {
    level: LevelId,
    questions: Vec<Question>,
    index: usize,
    phase: Phase,
    hint_used: bool,
    hints_used: u32,
    correct: u32,
    points: f64,
    explanation_scores: Vec<f64>,
    countdown: Option<Countdown>,
    points_per_correct: f64,
    hint_multiplier: f64,
}

impl LevelRun {
    pub fn new(
        level: LevelId,
        questions: Vec<Question>,
        config: &GameConfig,
    ) -> Result<Self, LevelError> {
        if questions.is_empty() {
            return Err(LevelError::NoQuestions);
        }

        Ok(Self {
            level,
            questions,
            index: 0,
            phase: Phase::QuestionShown,
            hint_used: false,
            hints_used: 0,
            correct: 0,
            points: 0.0,
            explanation_scores: Vec::new(),
            // Zero seconds means untimed.
            countdown: config
                .timer_seconds
                .filter(|seconds| *seconds > 0)
                .map(Countdown::new),
            points_per_correct: f64::from(config.points_per_correct),
            hint_multiplier: config.hint_multiplier,
        })
    }

    pub fn level(&self) -> LevelId {
        self.level
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn position(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn correct(&self) -> u32 {
        self.correct
    }

    pub fn points(&self) -> f64 {
        self.points
    }

    pub fn countdown(&self) -> Option<&Countdown> {
        self.countdown.as_ref()
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.index]
    }

    pub fn is_last_question(&self) -> bool {
        self.index + 1 == self.questions.len()
    }

    pub fn is_complete(&self) -> bool {
        self.is_last_question() && matches!(self.phase, Phase::FeedbackShown(_))
    }

    /// Records (or replaces) the learner's pending answer.
    pub fn select(&mut self, answer: Answer) -> Result<(), LevelError> {
        match self.phase {
            Phase::QuestionShown | Phase::AnswerSelected(_) => {
                self.phase = Phase::AnswerSelected(answer);
                Ok(())
            }
            Phase::FeedbackShown(_) => Err(LevelError::WrongPhase { operation: "select" }),
        }
    }

    /// Reveals the hint; a correct answer afterwards earns reduced points.
    pub fn use_hint(&mut self) -> Result<Option<String>, LevelError> {
        if matches!(self.phase, Phase::FeedbackShown(_)) {
            return Err(LevelError::WrongPhase { operation: "use a hint" });
        }

        let hint = self.current_question().hint();
        if hint.is_some() && !self.hint_used {
            self.hint_used = true;
            self.hints_used += 1;
        }
        Ok(hint)
    }

    /// Grades the selected answer and shows feedback.
    pub fn submit(&mut self) -> Result<&Grade, LevelError> {
        let Phase::AnswerSelected(answer) = &self.phase else {
            return Err(LevelError::WrongPhase { operation: "submit" });
        };

        let grade = match self.current_question().grade(answer) {
            Ok(grade) => grade,
            Err(error) => {
                self.phase = Phase::QuestionShown;
                return Err(error.into());
            }
        };

        if let Some(score) = grade.explanation_score {
            self.explanation_scores.push(score);
        }
        if grade.correct {
            self.correct += 1;
            let multiplier = if self.hint_used { self.hint_multiplier } else { 1.0 };
            self.points += self.points_per_correct * multiplier;
        }

        Ok(self.show_feedback(grade))
    }

    /// Shows the correct answer without crediting the learner.
    pub fn reveal(&mut self) -> Result<&Grade, LevelError> {
        if matches!(self.phase, Phase::FeedbackShown(_)) {
            return Err(LevelError::WrongPhase { operation: "reveal" });
        }

        let question = self.current_question();
        let grade = Grade::unanswered(question.expected());
        if matches!(question, Question::Explanation { .. }) {
            self.explanation_scores.push(0.0);
        }

        Ok(self.show_feedback(grade))
    }

    fn show_feedback(&mut self, grade: Grade) -> &Grade {
        self.phase = Phase::FeedbackShown(grade);
        match &self.phase {
            Phase::FeedbackShown(grade) => grade,
            _ => unreachable!("phase was just set to feedback"),
        }
    }

    /// Advances the countdown by a second, forcing a reveal when it runs out.
    pub fn tick(&mut self) -> Tick {
        if matches!(self.phase, Phase::FeedbackShown(_)) {
            return Tick::Idle;
        }

        let Some(countdown) = self.countdown.as_mut() else {
            return Tick::Idle;
        };

        let tick = countdown.tick();
        if tick == Tick::Expired {
            log::debug!("time ran out on question {} of {}", self.index + 1, self.level);
            let _ = self.reveal();
        }
        tick
    }

    pub fn next(&mut self) -> Result<Step, LevelError> {
        if !matches!(self.phase, Phase::FeedbackShown(_)) {
            return Err(LevelError::WrongPhase { operation: "advance" });
        }

        if self.is_last_question() {
            return Ok(Step::LevelComplete);
        }

        self.index += 1;
        self.phase = Phase::QuestionShown;
        self.hint_used = false;
        if let Some(countdown) = self.countdown.as_mut() {
            countdown.reset();
        }

        Ok(Step::NextQuestion(self.index))
    }

    pub fn explanation_average(&self) -> Option<f64> {
        if self.explanation_scores.is_empty() {
            None
        } else {
            Some(self.explanation_scores.iter().sum::<f64>() / self.explanation_scores.len() as f64)
        }
    }

    pub fn outcome(&self, rule: &MasteryRule) -> LevelOutcome {
        let explanation_average = self.explanation_average();

        LevelOutcome {
            level: self.level,
            correct: self.correct,
            total: self.questions.len() as u32,
            points: self.points,
            hints_used: self.hints_used,
            explanation_average,
            mastered: rule.is_met(self.correct, explanation_average),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error("no level is being played")]
    NoActiveLevel,
    #[error("the level still has unanswered questions")]
    LevelNotComplete,
    #[error("progress could not be saved: {0}")]
    Store(#[from] StoreError),
}

/// A game's screens, active level, persisted progress and achievements.
pub struct GameSession<S, A> {
    kind: GameKind,
    config: GameConfig,
    store: ProgressStore<S>,
    progress: GameProgress,
    screen: Screen,
    run: Option<LevelRun>,
    last_outcome: Option<LevelOutcome>,
    achievements: A,
}

impl<S: KeyValueStore, A: AchievementTracker> GameSession<S, A> {
    /// Opens a session, reading the game's progress blob once.
    pub fn new(kind: GameKind, config: GameConfig, store: ProgressStore<S>, achievements: A) -> Self {
        let progress = store.get(kind.storage_key(), GameProgress::default());

        Self {
            kind,
            config,
            store,
            progress,
            screen: Screen::Menu,
            run: None,
            last_outcome: None,
            achievements,
        }
    }

    pub fn kind(&self) -> GameKind {
        self.kind
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn progress(&self) -> &GameProgress {
        &self.progress
    }

    pub fn store(&self) -> &ProgressStore<S> {
        &self.store
    }

    pub fn achievements(&self) -> &A {
        &self.achievements
    }

    pub fn achievements_mut(&mut self) -> &mut A {
        &mut self.achievements
    }

    pub fn run(&self) -> Option<&LevelRun> {
        self.run.as_ref()
    }

    pub fn last_outcome(&self) -> Option<&LevelOutcome> {
        self.last_outcome.as_ref()
    }

    fn apply(&mut self, event: ScreenEvent) -> Result<Screen, TransitionError> {
        let next = transition(self.screen, event, &self.progress)?;
        log::debug!("{:?}: {:?} --{:?}--> {:?}", self.kind, self.screen, event, next);
        self.screen = next;
        Ok(next)
    }

    fn run_mut(&mut self) -> Result<&mut LevelRun, SessionError> {
        self.run.as_mut().ok_or(SessionError::NoActiveLevel)
    }

    pub fn start_level(&mut self, level: LevelId, questions: Vec<Question>) -> Result<(), SessionError> {
        transition(self.screen, ScreenEvent::StartLevel(level), &self.progress)?;
        let run = LevelRun::new(level, questions, &self.config)?;
        self.apply(ScreenEvent::StartLevel(level))?;
        self.run = Some(run);
        Ok(())
    }

    pub fn select(&mut self, answer: Answer) -> Result<(), SessionError> {
        Ok(self.run_mut()?.select(answer)?)
    }

    pub fn use_hint(&mut self) -> Result<Option<String>, SessionError> {
        Ok(self.run_mut()?.use_hint()?)
    }

    pub fn submit(&mut self) -> Result<Grade, SessionError> {
        let kind = self.kind;
        let run = self.run_mut()?;
        let level = run.level();
        let grade = run.submit()?.clone();

        if grade.correct {
            self.achievements.track_correct_answer(kind, level);
        } else {
            self.achievements.track_wrong_answer(kind, level);
        }
        Ok(grade)
    }

    pub fn reveal(&mut self) -> Result<Grade, SessionError> {
        let kind = self.kind;
        let run = self.run_mut()?;
        let level = run.level();
        let grade = run.reveal()?.clone();
        self.achievements.track_wrong_answer(kind, level);
        Ok(grade)
    }

    pub fn tick(&mut self) -> Result<Tick, SessionError> {
        let kind = self.kind;
        let run = self.run_mut()?;
        let level = run.level();
        let tick = run.tick();
        if tick == Tick::Expired {
            self.achievements.track_wrong_answer(kind, level);
        }
        Ok(tick)
    }

    pub fn next(&mut self) -> Result<Step, SessionError> {
        Ok(self.run_mut()?.next()?)
    }

    /// Closes the level, records the attempt and writes progress.
    pub fn finish_level(&mut self) -> Result<LevelOutcome, SessionError> {
        let run = self.run.as_ref().ok_or(SessionError::NoActiveLevel)?;
        if !run.is_complete() {
            return Err(SessionError::LevelNotComplete);
        }

        let level = run.level();
        let outcome = run.outcome(&self.config.mastery[level.index()]);
        self.apply(ScreenEvent::FinishLevel)?;
        self.run = None;
        self.last_outcome = Some(outcome);

        let was_complete = self.progress.all_mastered();
        self.progress
            .record(level, outcome.correct, outcome.points, outcome.mastered);
        self.achievements
            .track_level_complete(self.kind, level, outcome.mastered);

        if !was_complete && self.progress.all_mastered() {
            self.progress.games_completed += 1;
            self.achievements.track_game_complete(self.kind);
        }

        log::info!(
            "{:?} {} finished: {}/{} correct, {} points, mastered: {}",
            self.kind,
            level,
            outcome.correct,
            outcome.total,
            outcome.points,
            outcome.mastered
        );

        self.store.set(self.kind.storage_key(), &self.progress)?;
        Ok(outcome)
    }

    /// Leaves the level or summary. An unfinished level is discarded.
    pub fn return_to_menu(&mut self) -> Result<(), SessionError> {
        self.apply(ScreenEvent::ReturnToMenu)?;
        self.run = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::achievements::AchievementLog;
    use crate::progress::MemoryStore;
    use crate::thermo::Spontaneity;

    fn spontaneity(delta_h: f64, delta_s: f64) -> Question {
        Question::Spontaneity {
            equation: "A → B".to_string(),
            delta_h,
            delta_s,
            temperature: 298.0,
        }
    }

    fn questions() -> Vec<Question> {
        vec![spontaneity(-10.0, 10.0), spontaneity(10.0, -10.0)]
    }

    fn right() -> Answer {
        Answer::Spontaneity {
            prediction: Spontaneity::Spontaneous,
        }
    }

    fn config() -> GameConfig {
        GameConfig {
            mastery: [MasteryRule {
                min_correct: 1,
                out_of: 2,
                min_explanation_average: None,
            }; 3],
            timer_seconds: Some(2),
            ..GameConfig::default()
        }
    }

    #[test]
    fn level_one_is_always_open() {
        let progress = GameProgress::default();
        assert_eq!(
            transition(Screen::Menu, ScreenEvent::StartLevel(LevelId::One), &progress),
            Ok(Screen::Level(LevelId::One))
        );
    }

    #[test]
    fn later_levels_need_mastery() {
        let mut progress = GameProgress::default();
        assert_eq!(
            transition(Screen::Menu, ScreenEvent::StartLevel(LevelId::Two), &progress),
            Err(TransitionError::LevelLocked {
                level: LevelId::Two,
                required: LevelId::One
            })
        );

        progress.record(LevelId::One, 8, 80.0, true);
        assert_eq!(
            transition(
                Screen::Summary(LevelId::One),
                ScreenEvent::StartLevel(LevelId::Two),
                &progress
            ),
            Ok(Screen::Level(LevelId::Two))
        );
    }

    #[test]
    fn illegal_transitions_are_rejected() {
        let progress = GameProgress::default();
        assert_eq!(
            transition(Screen::Menu, ScreenEvent::FinishLevel, &progress),
            Err(TransitionError::NotAllowed {
                from: Screen::Menu,
                event: ScreenEvent::FinishLevel
            })
        );
        assert!(
            transition(
                Screen::Level(LevelId::One),
                ScreenEvent::StartLevel(LevelId::One),
                &progress
            )
            .is_err()
        );
    }

    #[test]
    fn level_id_serializes_as_number() {
        assert_eq!(serde_json::to_string(&LevelId::Two).expect("serializes"), "2");
        assert_eq!(LevelId::try_from(4), Err(InvalidLevel(4)));
    }

    #[test]
    fn run_walks_through_phases() {
        let mut run = LevelRun::new(LevelId::One, questions(), &config()).expect("has questions");

        assert_eq!(run.phase(), &Phase::QuestionShown);
        assert_eq!(run.next(), Err(LevelError::WrongPhase { operation: "advance" }));
        assert_eq!(
            run.submit().map(|_| ()),
            Err(LevelError::WrongPhase { operation: "submit" })
        );

        run.select(right()).expect("select allowed");
        assert!(run.submit().expect("answer selected").correct);
        assert_eq!(run.next(), Ok(Step::NextQuestion(1)));

        run.select(right()).expect("select allowed");
        assert!(!run.submit().expect("answer selected").correct);
        assert!(run.is_complete());
        assert_eq!(run.next(), Ok(Step::LevelComplete));

        let outcome = run.outcome(&config().mastery[0]);
        assert_eq!(outcome.correct, 1);
        assert_eq!(outcome.total, 2);
        assert_eq!(outcome.points, 10.0);
        assert!(outcome.mastered);
    }

    #[test]
    fn hint_reduces_points() {
        let mut run = LevelRun::new(LevelId::One, questions(), &config()).expect("has questions");

        assert!(run.use_hint().expect("hint allowed").is_some());
        run.use_hint().expect("second look is free");
        run.select(right()).expect("select allowed");
        run.submit().expect("answer selected");

        assert_eq!(run.points(), 5.0);
        assert_eq!(run.outcome(&config().mastery[0]).hints_used, 1);
    }

    #[test]
    fn mismatched_answer_returns_to_question() {
        let mut run = LevelRun::new(LevelId::One, questions(), &config()).expect("has questions");

        run.select(Answer::Choice { index: 0 }).expect("select allowed");
        assert!(matches!(run.submit(), Err(LevelError::Question(_))));
        assert_eq!(run.phase(), &Phase::QuestionShown);
    }

    #[test]
    fn countdown_expiry_reveals_answer() {
        let mut run = LevelRun::new(LevelId::One, questions(), &config()).expect("has questions");

        assert_eq!(run.tick(), Tick::Running { remaining: 1 });
        assert_eq!(run.tick(), Tick::Expired);
        assert!(matches!(run.phase(), Phase::FeedbackShown(grade) if !grade.correct));
        assert_eq!(run.tick(), Tick::Idle);

        run.next().expect("feedback shown");
        assert_eq!(run.countdown().map(Countdown::remaining), Some(2));
    }

    #[test]
    fn zero_second_timer_leaves_level_untimed() {
        let config = GameConfig {
            timer_seconds: Some(0),
            ..config()
        };
        let mut run = LevelRun::new(LevelId::One, questions(), &config).expect("has questions");

        assert!(run.countdown().is_none());
        assert_eq!(run.tick(), Tick::Idle);
        assert_eq!(run.phase(), &Phase::QuestionShown);
    }

    #[test]
    fn empty_level_is_rejected() {
        assert!(matches!(
            LevelRun::new(LevelId::One, Vec::new(), &config()),
            Err(LevelError::NoQuestions)
        ));
    }

    #[test]
    fn session_persists_progress_and_unlocks_next_level() {
        let store = ProgressStore::new(MemoryStore::new());
        let mut session = GameSession::new(
            GameKind::Thermodynamics,
            config(),
            store,
            AchievementLog::new(),
        );

        assert!(matches!(
            session.start_level(LevelId::Two, questions()),
            Err(SessionError::Transition(TransitionError::LevelLocked { .. }))
        ));

        session
            .start_level(LevelId::One, questions())
            .expect("level one is open");
        assert_eq!(session.screen(), Screen::Level(LevelId::One));
        assert!(matches!(
            session.finish_level(),
            Err(SessionError::LevelNotComplete)
        ));

        for _ in 0..2 {
            session.select(right()).expect("select");
            session.submit().expect("submit");
            session.next().expect("advance");
        }

        let outcome = session.finish_level().expect("level complete");
        assert!(outcome.mastered);
        assert_eq!(session.screen(), Screen::Summary(LevelId::One));

        let saved: GameProgress = session
            .store()
            .get("thermodynamics-predictor-progress", GameProgress::default());
        assert!(saved.is_mastered(LevelId::One));
        assert!(session.achievements().unlocked().count() >= 2);

        session
            .start_level(LevelId::Two, questions())
            .expect("level two unlocked");
        session.return_to_menu().expect("abandon level");
        assert_eq!(session.screen(), Screen::Menu);
        assert!(session.run().is_none());
    }
}
