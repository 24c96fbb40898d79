// Keyword coverage: alias-aware keyword matching and sentence/span highlighting.
// The matcher is built once per keyword set and reused across texts.

pub mod aliases;
pub mod handlers;
pub mod highlighter;
pub mod matcher;
