//! Embedding tables.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use ndarray::{Array2, ArrayView1, ArrayView2};

use crate::error::{Error, Result};
use crate::io::EmbeddingFormat;
use crate::vocab::create_indices;

/// Word embeddings.
///
/// A table stores the words of an embedding file in file order, the
/// mapping from words to rows, and the embedding matrix. Row `i` of the
/// matrix is the embedding of `words()[i]`.
#[derive(Clone, Debug, PartialEq)]
pub struct EmbeddingTable {
    words: Vec<String>,
    indices: HashMap<String, usize>,
    vectors: Array2<f32>,
}

impl EmbeddingTable {
    /// Construct a table from words and their embeddings.
    ///
    /// Fails with `ShapeMismatch` when the number of words differs from
    /// the number of matrix rows. Duplicate words are permitted, lookups
    /// resolve to the last occurrence.
    pub fn new(words: impl Into<Vec<String>>, vectors: Array2<f32>) -> Result<Self> {
        let words = words.into();
        if words.len() != vectors.nrows() {
            return Err(Error::ShapeMismatch {
                words: words.len(),
                rows: vectors.nrows(),
            });
        }

        let indices = create_indices(&words);

        Ok(EmbeddingTable {
            words,
            indices,
            vectors,
        })
    }

    /// Words in the order of the embedding matrix rows.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Mapping from words to matrix rows.
    pub fn indices(&self) -> &HashMap<String, usize> {
        &self.indices
    }

    /// The embedding matrix.
    pub fn vectors(&self) -> ArrayView2<f32> {
        self.vectors.view()
    }

    /// Number of rows.
    pub fn n_words(&self) -> usize {
        self.vectors.nrows()
    }

    /// Embedding dimensionality.
    pub fn n_dim(&self) -> usize {
        self.vectors.ncols()
    }

    /// The distinct words of the table.
    pub fn vocab(&self) -> HashSet<&str> {
        self.indices.keys().map(String::as_str).collect()
    }

    /// Get the row of a word.
    pub fn idx(&self, word: &str) -> Option<usize> {
        self.indices.get(word).cloned()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.indices.contains_key(word)
    }

    /// Get the embedding of a word.
    pub fn embedding(&self, word: &str) -> Option<ArrayView1<f32>> {
        self.idx(word).map(|idx| self.vectors.row(idx))
    }

    /// Decompose the table into its words and embedding matrix.
    pub fn into_parts(self) -> (Vec<String>, Array2<f32>) {
        (self.words, self.vectors)
    }

    /// Write the table to `path` in the given format.
    pub fn write(
        &self,
        path: impl AsRef<Path>,
        format: EmbeddingFormat,
        encoding: &str,
    ) -> Result<()> {
        format.write(path, &self.words, self.vectors.view(), encoding)
    }
}
