//! Vocabulary indices.

use std::collections::HashMap;

use tracing::warn;

/// Build the word to row mapping for `words`.
///
/// Words are assigned the index of their position. If a word occurs
/// more than once, the index of its last occurrence is used. The
/// earlier rows remain part of the table, but cannot be looked up
/// by word.
pub fn create_indices(words: &[String]) -> HashMap<String, usize> {
    let mut indices = HashMap::with_capacity(words.len());
    for (idx, word) in words.iter().enumerate() {
        indices.insert(word.clone(), idx);
    }

    if indices.len() != words.len() {
        warn!(
            shadowed = words.len() - indices.len(),
            "Vocabulary contains duplicate words, the last occurrence is indexed"
        );
    }

    indices
}
