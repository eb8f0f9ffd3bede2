//! English pluralization for table names.
//!
//! Only the last word of an identifier is inflected (`user_group` -> `user_groups`,
//! `UserGroup` -> `UserGroups`). Everything before it is kept verbatim.

use crate::case::token_spans;

const UNCOUNTABLE: &[&str] = &[
    "data",
    "deer",
    "equipment",
    "feedback",
    "fish",
    "information",
    "media",
    "metadata",
    "news",
    "series",
    "sheep",
    "species",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("child", "children"),
    ("criterion", "criteria"),
    ("datum", "data"),
    ("echo", "echoes"),
    ("foot", "feet"),
    ("goose", "geese"),
    ("hero", "heroes"),
    ("index", "indices"),
    ("leaf", "leaves"),
    ("loaf", "loaves"),
    ("man", "men"),
    ("matrix", "matrices"),
    ("medium", "media"),
    ("mouse", "mice"),
    ("ox", "oxen"),
    ("person", "people"),
    ("potato", "potatoes"),
    ("thief", "thieves"),
    ("tomato", "tomatoes"),
    ("tooth", "teeth"),
    ("vertex", "vertices"),
    ("woman", "women"),
];

/// Pluralize the last word of `name`.
///
/// Words are the tokens of [`tokenize`](crate::case::tokenize), so `HTTPServer` inflects
/// `Server`. Names whose last word is uncountable, already plural, or does not end in a
/// letter are returned unchanged.
pub fn pluralize(name: &str) -> String {
    let Some(last) = token_spans(name).pop() else {
        return name.to_string();
    };
    if last.end != name.len() || !name.ends_with(|c: char| c.is_ascii_alphabetic()) {
        return name.to_string();
    }

    let (head, word) = name.split_at(last.start);
    let lower = word.to_ascii_lowercase();
    let plural = pluralize_lower(&lower);
    if plural == lower {
        return name.to_string();
    }

    format!("{head}{}", restore_case(word, &plural))
}

fn pluralize_lower(word: &str) -> String {
    if word.is_empty() || UNCOUNTABLE.contains(&word) {
        return word.to_string();
    }

    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == word) {
        return plural.to_string();
    }
    if IRREGULAR.iter().any(|(_, plural)| *plural == word) {
        return word.to_string();
    }

    if word.ends_with('s') && !(word.ends_with("ss") || word.ends_with("us") || word.ends_with("is"))
    {
        return word.to_string();
    }

    if let Some(stem) = word.strip_suffix("is") {
        return format!("{stem}es");
    }

    if ["s", "x", "z", "ch", "sh"].iter().any(|s| word.ends_with(s)) {
        return format!("{word}es");
    }

    if let Some(stem) = word.strip_suffix('y') {
        if stem.chars().last().is_some_and(|c| !is_vowel(c)) {
            return format!("{stem}ies");
        }
    }

    if let Some(stem) = word.strip_suffix("fe") {
        if stem.ends_with(['i', 'l', 'r']) {
            return format!("{stem}ves");
        }
    }
    if let Some(stem) = word.strip_suffix('f') {
        if stem.ends_with(['l', 'r']) {
            return format!("{stem}ves");
        }
    }

    format!("{word}s")
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

fn restore_case(original: &str, plural: &str) -> String {
    let has_lower = original.chars().any(|c| c.is_ascii_lowercase());
    if !has_lower && original.len() > 1 {
        return plural.to_ascii_uppercase();
    }

    if original.starts_with(|c: char| c.is_ascii_uppercase()) {
        let mut out = String::with_capacity(plural.len());
        let mut chars = plural.chars();
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
            out.extend(chars);
        }
        return out;
    }

    plural.to_string()
}
