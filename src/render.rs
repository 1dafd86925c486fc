//! ASCII-art rendering of cats.
//!
//! Rendering only reads the traits; mood overrides are applied by the
//! interpreter before a cat is drawn.

use crate::interpreter::{
    mood::{Mood, MOOD_TRAIT},
    value::{CadlValue, Traits},
};

const VISUAL_TRAITS: [&str; 5] = ["ears", "mouth", "body", "tail", "whiskers"];

fn trait_text<'a>(traits: &'a Traits, name: &str) -> Option<&'a str> {
    match traits.get(name) {
        Some(CadlValue::String(value)) => Some(value.as_str()),
        _ => None,
    }
}

fn ears(value: Option<&str>) -> &'static str {
    match value.map(str::to_ascii_lowercase).as_deref() {
        Some("droopy") => r"\/_\/",
        Some("round") => r"(\_/)",
        Some("long") => r"/|_|\",
        Some("short") => r"^\_/^",
        _ => r"/\_/\",
    }
}

fn eyes(mood: Option<Mood>) -> &'static str {
    match mood {
        Some(Mood::Sleepy) => "-.-",
        Some(Mood::Happy) => "^.^",
        Some(Mood::Angry) => ">.<",
        Some(Mood::Loving) => "*.*",
        Some(Mood::Curious) => "o.O",
        Some(Mood::Excited) => "O.O",
        None => "o.o",
    }
}

fn whiskers(value: Option<&str>) -> (&'static str, &'static str) {
    match value.map(str::to_ascii_lowercase).as_deref() {
        Some("long") => ("==", "=="),
        Some("curled") => (" ~", "~ "),
        _ => (" -", "- "),
    }
}

fn mouth(value: Option<&str>) -> &'static str {
    match value.map(str::to_ascii_lowercase).as_deref() {
        Some("smile") => "u",
        Some("frown") => "n",
        Some("open") => "O",
        Some("smirk") => "~",
        _ => "-",
    }
}

fn body(value: Option<&str>) -> &'static str {
    match value.map(str::to_ascii_lowercase).as_deref() {
        Some("smooth") => "  (     )",
        Some("fluffy") => "  {~~~~~}",
        Some("chubby") => " (   |   )",
        _ => "  ( | | )",
    }
}

fn tail(value: Option<&str>) -> &'static str {
    match value.map(str::to_ascii_lowercase).as_deref() {
        Some("fluffy") => "~~}",
        Some("straight") => "____",
        Some("curled") => "~@",
        _ => "",
    }
}

fn caption(traits: &Traits) -> Option<String> {
    let entries: Vec<String> = traits
        .iter()
        .filter(|(name, _)| !VISUAL_TRAITS.contains(&name.as_str()))
        .map(|(name, value)| match value {
            CadlValue::Cat(_) => format!("{name}: <cat>"),
            value => format!("{name}: {value}"),
        })
        .collect();
    if entries.is_empty() {
        None
    } else {
        Some(entries.join(", "))
    }
}

/// Draws a cat. Missing or unknown trait values fall back to a default part.
pub fn render_cat(traits: &Traits) -> String {
    let mood = trait_text(traits, MOOD_TRAIT).and_then(Mood::parse);
    let (left, right) = whiskers(trait_text(traits, "whiskers"));
    let mut lines = vec![
        format!("   {}", ears(trait_text(traits, "ears"))),
        format!("  ( {} )", eyes(mood)),
        format!("{left} > {} <{right}", mouth(trait_text(traits, "mouth"))),
        format!(
            "{}{}",
            body(trait_text(traits, "body")),
            tail(trait_text(traits, "tail"))
        ),
    ];
    if let Some(caption) = caption(traits) {
        lines.push(caption);
    }
    lines
        .iter()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn traits_of(pairs: &[(&str, &str)]) -> Traits {
        pairs
            .iter()
            .map(|(name, value)| ((*name).into(), (*value).into()))
            .collect()
    }

    #[test]
    fn empty_cat_uses_defaults() {
        let expected = "   /\\_/\\\n  ( o.o )\n - > - <-\n  ( | | )";
        assert_eq!(render_cat(&Traits::new()), expected);
    }

    #[test]
    fn every_visual_trait_changes_the_drawing() {
        let traits = traits_of(&[
            ("ears", "round"),
            ("mouth", "smile"),
            ("body", "fluffy"),
            ("tail", "curled"),
            ("whiskers", "long"),
        ]);
        let expected = "   (\\_/)\n  ( o.o )\n== > u <==\n  {~~~~~}~@";
        assert_eq!(render_cat(&traits), expected);
    }

    #[test]
    fn mood_and_extra_traits_appear_in_caption() {
        let traits = traits_of(&[("mood", "sleepy"), ("color", "orange"), ("ears", "droopy")]);
        let art = render_cat(&traits);
        assert!(art.contains("( -.- )"));
        assert_eq!(art.lines().last(), Some("color: orange, mood: sleepy"));
    }

    #[test]
    fn unknown_values_fall_back_to_defaults() {
        let mut traits = traits_of(&[("ears", "wings"), ("tail", "rocket")]);
        traits.insert("body".into(), CadlValue::Integer(4));
        assert_eq!(render_cat(&traits), render_cat(&Traits::new()));
    }

    #[test]
    fn rendering_does_not_mutate() {
        let traits = traits_of(&[("mood", "happy")]);
        let before = traits.clone();
        let _ = render_cat(&traits);
        assert_eq!(traits, before);
    }
}
