//! Fixed puzzle, scenario and passage pools for the arcade.

use super::flag::{FlagChoice, Scenario};
use super::emoji::EmojiPuzzle;

pub static SCENARIOS: [Scenario; 4] = [
    Scenario {
        quote: "He’s not my boyfriend. He’s my watcher.",
        character: "Edward Cullen",
        book: "Twilight",
        flag: FlagChoice::Red,
        explanation: "Stalking is presented as romantic. That's a classic red flag.",
    },
    Scenario {
        quote: "I would have come for you. And if I couldn't walk, I'd crawl to you.",
        character: "Kaz Brekker",
        book: "Six of Crows",
        flag: FlagChoice::Green,
        explanation: "Shows immense loyalty and devotion, a definite green light for a fantasy hero.",
    },
    Scenario {
        quote: "Whatever our souls are made of, his and mine are the same.",
        character: "Catherine Earnshaw",
        book: "Wuthering Heights",
        flag: FlagChoice::Red,
        explanation: "While iconic, this reflects a deeply obsessive and destructive relationship. It's a major red flag.",
    },
    Scenario {
        quote: "To be loved by you is to be truly seen.",
        character: "Simon Spier",
        book: "Simon vs. the Homo Sapiens Agenda",
        flag: FlagChoice::Green,
        explanation: "This highlights acceptance and understanding, the cornerstones of a healthy relationship. Green light!",
    },
];

pub static EMOJI_PUZZLES: [EmojiPuzzle; 4] = [
    EmojiPuzzle {
        emojis: "🧙‍♂️⚡🏰",
        answer: "Harry Potter",
        options: ["The Hobbit", "Harry Potter", "Lord of the Rings", "Eragon"],
    },
    EmojiPuzzle {
        emojis: "🦁🧙‍♀️🚪",
        answer: "The Lion, the Witch and the Wardrobe",
        options: [
            "The Golden Compass",
            "Alice in Wonderland",
            "The Lion, the Witch and the Wardrobe",
            "Narnia",
        ],
    },
    EmojiPuzzle {
        emojis: "🏹👩‍🍳🔥",
        answer: "The Hunger Games",
        options: ["Divergent", "The Maze Runner", "The 5th Wave", "The Hunger Games"],
    },
    EmojiPuzzle {
        emojis: "🧛‍♂️❤️👩",
        answer: "Twilight",
        options: ["Vampire Academy", "Twilight", "Interview with the Vampire", "Dracula"],
    },
];

pub static READING_PASSAGES: [&str; 3] = [
    "It is a truth universally acknowledged, that a single man in possession of a good fortune, must be in want of a wife. However little known the feelings or views of such a man may be on his first entering a neighbourhood, this truth is so well fixed in the minds of the surrounding families, that he is considered the rightful property of some one or other of their daughters.",
    "The story so far: in the beginning, the universe was created. This has made a lot of people very angry and been widely regarded as a bad move. Many races believe that it was created by some sort of god, though the Jatravartid people of Viltvodle VI believe that the entire universe was in fact sneezed out of the nose of a being called the Great Green Arkleseizure.",
    "There was no possibility of taking a walk that day. We had been wandering, indeed, in the leafless shrubbery an hour in the morning; but since dinner the cold winter wind had brought with it clouds so sombre, and a rain so penetrating, that further out-door exercise was now out of the question. I was glad of it: I never liked long walks, especially on chilly afternoons.",
];
