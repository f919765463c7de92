use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::mood_entry::Mood;

const VERY_SAD: &[&str] = &[
    "You don't have to see the whole staircase, just take the first step.",
    "Storms don't last forever. Be gentle with yourself today.",
    "It's okay to rest. Healing is not a straight line.",
];

const SAD: &[&str] = &[
    "Small steps still move you forward.",
    "Feelings are visitors. Let them come and go.",
    "Tomorrow is a fresh page.",
];

const NEUTRAL: &[&str] = &[
    "A calm day is a good day to plant new seeds.",
    "Notice one small thing that went right today.",
    "Balance is its own kind of progress.",
];

const HAPPY: &[&str] = &[
    "Happiness grows when it is shared.",
    "Keep doing what lights you up.",
    "Good days are worth writing down.",
];

const VERY_HAPPY: &[&str] = &[
    "Celebrate this feeling. You earned it.",
    "Joy is contagious. Pass it on!",
    "Remember this day on the cloudy ones.",
];

/// Quotes for a mood ordinal (-2..=2); empty for anything else.
pub fn quotes_for(mood_value: i8) -> &'static [&'static str] {
    match Mood::from_ordinal(mood_value) {
        Some(Mood::VerySad) => VERY_SAD,
        Some(Mood::Sad) => SAD,
        Some(Mood::Neutral) => NEUTRAL,
        Some(Mood::Happy) => HAPPY,
        Some(Mood::VeryHappy) => VERY_HAPPY,
        None => &[],
    }
}

pub fn random_quote<R: Rng>(mood_value: i8, rng: &mut R) -> Option<&'static str> {
    quotes_for(mood_value).choose(rng).copied()
}
