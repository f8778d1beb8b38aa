// File: src/core/validation.rs

/// Whether `text` may be stored as a word.
///
/// Words are full-width/non-ASCII text. The empty string is accepted because
/// it is how an entry is deleted.
pub fn is_acceptable_word(text: &str) -> bool {
    text.chars().all(|c| !c.is_ascii())
}
