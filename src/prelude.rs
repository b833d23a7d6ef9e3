//! Prelude exports the most commonly-used types and traits.

pub use crate::compat::text::{ReadBareText, WriteBareText};

pub use crate::compat::word2vec::{ReadWord2Vec, WriteWord2Vec};

pub use crate::config::{EmbeddingConfig, FileFormat};

pub use crate::embeddings::EmbeddingTable;

pub use crate::encoding::TextEncoding;

pub use crate::io::{
    load_bare_text, load_word2vec, write_bare_text, write_word2vec, EmbeddingFormat,
};
