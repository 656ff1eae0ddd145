use std::str::FromStr;

use anyhow::{anyhow, Error};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::content::SCENARIOS;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FlagChoice {
    Red,
    Green,
}

impl FromStr for FlagChoice {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "red" | "r" => Ok(FlagChoice::Red),
            "green" | "g" => Ok(FlagChoice::Green),
            other => Err(anyhow!("expected red or green, got '{other}'")),
        }
    }
}

/// A quoted line from a book, labelled as a red or green flag.
#[derive(Debug)]
pub struct Scenario {
    pub quote: &'static str,
    pub character: &'static str,
    pub book: &'static str,
    pub flag: FlagChoice,
    pub explanation: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagFeedback {
    pub correct: bool,
    /// Shown whether or not the guess was right.
    pub explanation: &'static str,
}

/// Red-flag / green-flag judgement game.
///
/// One scenario is live at a time. Answering reveals feedback and locks input
/// until [`next`](Self::next) draws a fresh scenario.
#[derive(Debug)]
pub struct FlagGame {
    current: &'static Scenario,
    feedback: Option<FlagFeedback>,
}

impl FlagGame {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            current: draw(rng),
            feedback: None,
        }
    }

    pub fn scenario(&self) -> &'static Scenario {
        self.current
    }

    pub fn feedback(&self) -> Option<&FlagFeedback> {
        self.feedback.as_ref()
    }

    pub fn is_locked(&self) -> bool {
        self.feedback.is_some()
    }

    /// Judges `choice`; ignored (returns `None`) while locked.
    pub fn answer(&mut self, choice: FlagChoice) -> Option<FlagFeedback> {
        if self.is_locked() {
            return None;
        }

        let feedback = FlagFeedback {
            correct: choice == self.current.flag,
            explanation: self.current.explanation,
        };
        self.feedback = Some(feedback.clone());
        Some(feedback)
    }

    pub fn next<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        *self = Self::new(rng);
    }
}

fn draw<R: Rng + ?Sized>(rng: &mut R) -> &'static Scenario {
    &SCENARIOS[rng.gen_range(0..SCENARIOS.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn opposite(choice: FlagChoice) -> FlagChoice {
        match choice {
            FlagChoice::Red => FlagChoice::Green,
            FlagChoice::Green => FlagChoice::Red,
        }
    }

    #[test]
    fn wrong_answer_still_reveals_explanation_and_locks() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut game = FlagGame::new(&mut rng);
        let wrong = opposite(game.scenario().flag);

        let feedback = game.answer(wrong).unwrap();
        assert!(!feedback.correct);
        assert_eq!(feedback.explanation, game.scenario().explanation);
        assert!(game.is_locked());

        assert_eq!(game.answer(game.scenario().flag), None);
        assert!(!game.feedback().unwrap().correct);
    }

    #[test]
    fn next_unlocks_with_fresh_state() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut game = FlagGame::new(&mut rng);
        assert!(game.answer(game.scenario().flag).unwrap().correct);

        game.next(&mut rng);
        assert!(!game.is_locked());
        assert!(game.feedback().is_none());
    }

    #[test]
    fn parses_choices() {
        assert_eq!("Red".parse::<FlagChoice>().unwrap(), FlagChoice::Red);
        assert_eq!(" g ".parse::<FlagChoice>().unwrap(), FlagChoice::Green);
        assert!("blue".parse::<FlagChoice>().is_err());
    }
}
