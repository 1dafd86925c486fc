use super::value::{CadlValue, Traits};

pub const MOOD_TRAIT: &str = "mood";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    Sleepy,
    Happy,
    Angry,
    Loving,
    Curious,
    Excited,
}

impl Mood {
    /// Case-insensitive lookup. Unknown moods have no effect on a cat.
    pub fn parse(text: &str) -> Option<Mood> {
        match text.to_ascii_lowercase().as_str() {
            "sleepy" => Some(Mood::Sleepy),
            "happy" => Some(Mood::Happy),
            "angry" => Some(Mood::Angry),
            "loving" => Some(Mood::Loving),
            "curious" => Some(Mood::Curious),
            "excited" => Some(Mood::Excited),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mood::Sleepy => "sleepy",
            Mood::Happy => "happy",
            Mood::Angry => "angry",
            Mood::Loving => "loving",
            Mood::Curious => "curious",
            Mood::Excited => "excited",
        }
    }

    /// The traits a mood forces onto a cat.
    pub fn overrides(&self) -> [(&'static str, &'static str); 3] {
        match self {
            Mood::Sleepy => [("ears", "droopy"), ("mouth", "neutral"), ("whiskers", "short")],
            Mood::Happy => [("mouth", "smile"), ("ears", "pointy"), ("whiskers", "long")],
            Mood::Angry => [("mouth", "frown"), ("ears", "short"), ("whiskers", "curled")],
            Mood::Loving => [("mouth", "smile"), ("ears", "round"), ("whiskers", "long")],
            Mood::Curious => [("ears", "pointy"), ("mouth", "neutral"), ("whiskers", "long")],
            Mood::Excited => [("mouth", "open"), ("ears", "long"), ("whiskers", "long")],
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Rewrites the mood-controlled traits of `traits` if it carries a known string mood.
pub fn apply_mood_override(traits: &mut Traits) -> Option<Mood> {
    let mood = match traits.get(MOOD_TRAIT) {
        Some(CadlValue::String(text)) => Mood::parse(text)?,
        _ => return None,
    };
    for (name, value) in mood.overrides() {
        traits.insert(name.into(), value.into());
    }
    Some(mood)
}
