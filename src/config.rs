//! Embedding file configuration.
//!
//! An `EmbeddingConfig` describes an embedding file: its path, format,
//! word encoding, and how many words to read. Configurations can be
//! read from TOML:
//!
//! ```toml
//! modelf = "vectors.bin"
//! fmt = "word2vec"
//! encoding = "utf-8"
//! binary = true
//! max_words = 100000
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::embeddings::EmbeddingTable;
use crate::error::{Error, Result};
use crate::io::EmbeddingFormat;

/// Family of an embedding file format.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum FileFormat {
    /// word2vec, binary or text depending on `EmbeddingConfig::binary`.
    #[serde(rename = "word2vec")]
    Word2Vec,

    #[serde(rename = "bare_text")]
    BareText,
}

impl Default for FileFormat {
    fn default() -> Self {
        FileFormat::Word2Vec
    }
}

/// Configuration of an embedding file.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmbeddingConfig {
    /// Path to the embedding file.
    pub modelf: Option<PathBuf>,

    /// File format.
    pub fmt: FileFormat,

    /// Encoding label of the words in the file.
    pub encoding: String,

    /// Use the word2vec binary format. Ignored for bare text.
    pub binary: bool,

    /// Read only the first `max_words` words. `None` or zero reads
    /// all words.
    pub max_words: Option<usize>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        EmbeddingConfig {
            modelf: None,
            fmt: FileFormat::Word2Vec,
            encoding: "utf-8".to_owned(),
            binary: true,
            max_words: None,
        }
    }
}

impl EmbeddingConfig {
    /// Parse a configuration from a TOML string.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        toml::from_str(toml)
            .map_err(|e| Error::Config(format!("Cannot deserialize configuration: {}", e)))
    }

    /// Read a configuration from a TOML file.
    pub fn read_toml(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let toml = fs::read_to_string(path).map_err(|e| {
            Error::read_error(format!("Cannot read configuration {}", path.display()), e)
        })?;

        Self::from_toml_str(&toml)
    }

    /// The embedding format selected by `fmt` and `binary`.
    pub fn format(&self) -> EmbeddingFormat {
        match (self.fmt, self.binary) {
            (FileFormat::Word2Vec, true) => EmbeddingFormat::Word2VecBinary,
            (FileFormat::Word2Vec, false) => EmbeddingFormat::Word2VecText,
            (FileFormat::BareText, _) => EmbeddingFormat::BareText,
        }
    }

    /// Load the configured embedding file.
    pub fn load(&self) -> Result<EmbeddingTable> {
        let path = self
            .modelf
            .as_ref()
            .ok_or_else(|| Error::Config("No embedding file configured".to_owned()))?;

        self.format().read(path, &self.encoding, self.max_words)
    }

    /// Write `embeddings` to the configured embedding file.
    pub fn write(&self, embeddings: &EmbeddingTable) -> Result<()> {
        let path = self
            .modelf
            .as_ref()
            .ok_or_else(|| Error::Config("No embedding file configured".to_owned()))?;

        embeddings.write(path, self.format(), &self.encoding)
    }
}
