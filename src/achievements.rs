use std::collections::{BTreeSet, VecDeque};

use crate::config::GameKind;
use crate::session::LevelId;

/// Correct answers in a row needed for [`Achievement::Streak`].
pub const STREAK_LENGTH: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Achievement {
    FirstCorrect { game: GameKind },
    Streak { game: GameKind },
    LevelMastered { game: GameKind, level: LevelId },
    GameComplete { game: GameKind },
}

impl Achievement {
    pub fn title(&self) -> String {
        match self {
            Self::FirstCorrect { .. } => "First correct answer".to_string(),
            Self::Streak { .. } => format!("{STREAK_LENGTH} in a row"),
            Self::LevelMastered { level, .. } => format!("Level {} mastered", level.number()),
            Self::GameComplete { .. } => "Game complete".to_string(),
        }
    }
}

/// Receives game events that may unlock achievements.
pub trait AchievementTracker {
    fn track_correct_answer(&mut self, game: GameKind, level: LevelId);
    fn track_wrong_answer(&mut self, game: GameKind, level: LevelId);
    fn track_level_complete(&mut self, game: GameKind, level: LevelId, mastered: bool);
    fn track_game_complete(&mut self, game: GameKind);
    fn dismiss_notification(&mut self);
}

/// Tracker that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAchievements;

impl AchievementTracker for NoAchievements {
    fn track_correct_answer(&mut self, _game: GameKind, _level: LevelId) {}
    fn track_wrong_answer(&mut self, _game: GameKind, _level: LevelId) {}
    fn track_level_complete(&mut self, _game: GameKind, _level: LevelId, _mastered: bool) {}
    fn track_game_complete(&mut self, _game: GameKind) {}
    fn dismiss_notification(&mut self) {}
}

/// In-memory tracker that unlocks achievements and queues notifications.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct AchievementLog {
    unlocked: BTreeSet<Achievement>,
    #[serde(skip)]
    pending: VecDeque<Achievement>,
    #[serde(skip)]
    streak: u32,
}

impl AchievementLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unlocked(&self) -> impl Iterator<Item = &Achievement> {
        self.unlocked.iter()
    }

    pub fn is_unlocked(&self, achievement: &Achievement) -> bool {
        self.unlocked.contains(achievement)
    }

    /// The notification currently on screen, if any.
    pub fn current_notification(&self) -> Option<&Achievement> {
        self.pending.front()
    }

    fn unlock(&mut self, achievement: Achievement) {
        if self.unlocked.insert(achievement) {
            log::info!("achievement unlocked: {}", achievement.title());
            self.pending.push_back(achievement);
        }
    }
}

impl AchievementTracker for AchievementLog {
    fn track_correct_answer(&mut self, game: GameKind, _level: LevelId) {
        self.streak += 1;
        self.unlock(Achievement::FirstCorrect { game });
        if self.streak >= STREAK_LENGTH {
            self.unlock(Achievement::Streak { game });
        }
    }

    fn track_wrong_answer(&mut self, _game: GameKind, _level: LevelId) {
        self.streak = 0;
    }

    fn track_level_complete(&mut self, game: GameKind, level: LevelId, mastered: bool) {
        if mastered {
            self.unlock(Achievement::LevelMastered { game, level });
        }
    }

    fn track_game_complete(&mut self, game: GameKind) {
        self.unlock(Achievement::GameComplete { game });
    }

    fn dismiss_notification(&mut self) {
        self.pending.pop_front();
    }
}
