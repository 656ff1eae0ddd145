use rand::{seq::SliceRandom, Rng};
use serde::Serialize;

use super::content::EMOJI_PUZZLES;

#[derive(Debug)]
pub struct EmojiPuzzle {
    pub emojis: &'static str,
    pub answer: &'static str,
    pub options: [&'static str; 4],
}

/// How an option button should look once an answer is in.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum OptionMark {
    Neutral,
    Correct,
    Wrong,
}

/// Guess-the-book-from-emoji game.
///
/// Options are reshuffled on every load, so the answer's position carries no
/// information. Selecting an option locks the puzzle until `next`.
#[derive(Debug)]
pub struct EmojiGame {
    puzzle: &'static EmojiPuzzle,
    options: Vec<&'static str>,
    selected: Option<usize>,
}

impl EmojiGame {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let puzzle = &EMOJI_PUZZLES[rng.gen_range(0..EMOJI_PUZZLES.len())];
        let mut options = puzzle.options.to_vec();
        options.shuffle(rng);

        Self {
            puzzle,
            options,
            selected: None,
        }
    }

    pub fn puzzle(&self) -> &'static EmojiPuzzle {
        self.puzzle
    }

    /// Options in display order.
    pub fn options(&self) -> &[&'static str] {
        &self.options
    }

    pub fn correct_index(&self) -> usize {
        self.options
            .iter()
            .position(|option| *option == self.puzzle.answer)
            .unwrap_or(0)
    }

    pub fn is_locked(&self) -> bool {
        self.selected.is_some()
    }

    /// Picks the option at `index`. Returns whether it was right, or `None`
    /// when locked or out of range.
    pub fn answer(&mut self, index: usize) -> Option<bool> {
        if self.is_locked() || index >= self.options.len() {
            return None;
        }
        self.selected = Some(index);
        Some(self.options[index] == self.puzzle.answer)
    }

    pub fn marks(&self) -> Vec<OptionMark> {
        let Some(selected) = self.selected else {
            return vec![OptionMark::Neutral; self.options.len()];
        };

        self.options
            .iter()
            .enumerate()
            .map(|(index, option)| {
                if *option == self.puzzle.answer {
                    OptionMark::Correct
                } else if index == selected {
                    OptionMark::Wrong
                } else {
                    OptionMark::Neutral
                }
            })
            .collect()
    }

    pub fn next<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        *self = Self::new(rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashSet;

    #[test]
    fn answer_position_varies_across_loads() {
        let mut rng = StdRng::seed_from_u64(2024);
        let mut game = EmojiGame::new(&mut rng);
        let mut positions = HashSet::new();

        for _ in 0..200 {
            positions.insert(game.correct_index());
            game.next(&mut rng);
        }

        assert!(positions.len() > 1, "answer always landed at {positions:?}");
    }

    #[test]
    fn options_are_a_permutation_of_the_puzzle() {
        let mut rng = StdRng::seed_from_u64(5);
        let game = EmojiGame::new(&mut rng);
        let mut shown = game.options().to_vec();
        let mut expected = game.puzzle().options.to_vec();
        shown.sort();
        expected.sort();
        assert_eq!(shown, expected);
    }

    #[test]
    fn wrong_pick_marks_both_buttons_and_locks() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut game = EmojiGame::new(&mut rng);
        let correct = game.correct_index();
        let wrong = (correct + 1) % game.options().len();

        assert_eq!(game.answer(wrong), Some(false));
        let marks = game.marks();
        assert_eq!(marks[correct], OptionMark::Correct);
        assert_eq!(marks[wrong], OptionMark::Wrong);
        assert_eq!(marks.iter().filter(|m| **m == OptionMark::Neutral).count(), 2);

        assert_eq!(game.answer(correct), None);
        game.next(&mut rng);
        assert!(!game.is_locked());
        assert!(game.marks().iter().all(|m| *m == OptionMark::Neutral));
    }

    #[test]
    fn out_of_range_pick_is_ignored() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut game = EmojiGame::new(&mut rng);
        assert_eq!(game.answer(4), None);
        assert!(!game.is_locked());
    }
}
