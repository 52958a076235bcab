// Skill matching core: normalization, fuzzy similarity, match scoring.
// Pure functions only; all I/O lives in recommendation/ and applications/.

pub mod scoring;
pub mod skills;
