//! Skill normalization and string similarity.
//!
//! Skills arrive as free text ("React, Node.js, TypeScript") on the job side and
//! as catalog names on the student side. Both are reduced to lower-cased,
//! trimmed tokens and compared with a normalized Levenshtein similarity.

use strsim::levenshtein;

/// Splits a comma-separated skills field into normalized tokens.
///
/// Order follows the input and repeated skills are kept as-is.
pub fn extract_skills(text: Option<&str>) -> Vec<String> {
    let Some(text) = text else {
        return vec![];
    };
    text.split(',')
        .map(normalize_skill)
        .filter(|skill| !skill.is_empty())
        .collect()
}

/// Splits a requirements field for the employer composite score.
///
/// Unlike [`extract_skills`], blank segments are kept: `"Rust, "` is two
/// required skills, the second of which no student can hold. An absent or
/// empty field has no requirements.
pub fn requirement_tokens(text: Option<&str>) -> Vec<String> {
    match text {
        Some(text) if !text.is_empty() => text.split(',').map(normalize_skill).collect(),
        _ => vec![],
    }
}

/// Lower-cases and trims a single skill mention.
pub fn normalize_skill(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Similarity in `[0, 1]` between two skill names.
///
/// `1.0` for case-insensitively identical strings (two empty strings included),
/// otherwise `(max_len - levenshtein) / max_len` measured in chars.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();

    if a == b {
        return 1.0;
    }

    let longest = a.chars().count().max(b.chars().count());
    let distance = levenshtein(&a, &b);
    (longest - distance) as f64 / longest as f64
}
