//! A library for reading and writing word embedding files.
//!
//! zellig reads and writes embeddings in the word2vec binary and text
//! formats and in a bare text format without header. Embeddings are
//! loaded into an `EmbeddingTable`, which holds the words in file
//! order, an index from words to rows, and the embedding matrix.
//!
//! ```
//! use ndarray::arr2;
//! use zellig::prelude::*;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("vectors.bin");
//!
//! let words = ["cat", "dog", "fish"];
//! let vectors = arr2(&[[1.0, -2.5], [0.0, 3.25], [-1.0, -1.0]]);
//! write_word2vec(&path, &words, vectors.view(), "utf-8", true).unwrap();
//!
//! let embeddings = load_word2vec(&path, "utf-8", true, Some(2)).unwrap();
//! assert_eq!(embeddings.words(), &["cat", "dog"]);
//! assert!(!embeddings.contains("fish"));
//! ```

pub mod compat;

pub mod config;

pub mod embeddings;

pub mod encoding;

pub mod error;

pub mod io;

pub mod prelude;

pub(crate) mod util;

pub mod vocab;
