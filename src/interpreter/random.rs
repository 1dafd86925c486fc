use rand::Rng;

use super::{
    mood::{apply_mood_override, MOOD_TRAIT},
    value::Traits,
};

pub const EARS: &[&str] = &["pointy", "droopy", "round", "long", "short"];
pub const MOUTHS: &[&str] = &["smile", "frown", "neutral", "open", "smirk"];
pub const BODIES: &[&str] = &["smooth", "fluffy", "normal", "chubby"];
pub const TAILS: &[&str] = &["none", "fluffy", "straight", "curled"];
pub const WHISKERS: &[&str] = &["long", "short", "curled"];
pub const MOODS: &[&str] = &["happy", "sleepy", "excited", "loving", "curious", "angry"];

pub const TRAIT_OPTIONS: [(&str, &[&str]); 6] = [
    ("ears", EARS),
    ("mouth", MOUTHS),
    ("body", BODIES),
    ("tail", TAILS),
    ("whiskers", WHISKERS),
    (MOOD_TRAIT, MOODS),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RandomMode {
    /// Every visual trait is picked independently and there is no mood.
    Traits,
    /// A mood is picked, applied, and the remaining traits are filled in.
    Mood,
}

fn choose<R: Rng + ?Sized>(rng: &mut R, options: &'static [&'static str]) -> &'static str {
    options[rng.gen_range(0..options.len())]
}

pub fn generate_random_traits<R: Rng + ?Sized>(rng: &mut R) -> Traits {
    let mode = if rng.gen_bool(0.5) {
        RandomMode::Mood
    } else {
        RandomMode::Traits
    };
    generate_with_mode(rng, mode)
}

pub fn generate_with_mode<R: Rng + ?Sized>(rng: &mut R, mode: RandomMode) -> Traits {
    let mut traits = Traits::new();
    match mode {
        RandomMode::Traits => {
            for (name, options) in TRAIT_OPTIONS {
                if name != MOOD_TRAIT {
                    traits.insert(name.into(), choose(rng, options).into());
                }
            }
        }
        RandomMode::Mood => {
            traits.insert(MOOD_TRAIT.into(), choose(rng, MOODS).into());
            apply_mood_override(&mut traits);
            for (name, options) in TRAIT_OPTIONS {
                if !traits.contains_key(name) {
                    traits.insert(name.into(), choose(rng, options).into());
                }
            }
        }
    }
    log::debug!("Generated random cat in {mode:?} mode with {} traits", traits.len());
    traits
}
