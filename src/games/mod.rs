pub mod content;
pub mod emoji;
pub mod flag;

pub use emoji::{EmojiGame, EmojiPuzzle, OptionMark};
pub use flag::{FlagChoice, FlagFeedback, FlagGame, Scenario};
