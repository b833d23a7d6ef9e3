//! Reading and writing embedding files.
//!
//! This module provides the file-level operations `load_word2vec`,
//! `write_word2vec`, `load_bare_text`, and `write_bare_text`, and the
//! `EmbeddingFormat` type to choose between them. Encodings are given
//! by label, e.g. `utf-8` or `latin1`.
//!
//! ```
//! use ndarray::arr2;
//! use zellig::io::{load_bare_text, write_bare_text};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("embeddings.txt");
//!
//! let words = ["cat", "dog", "fish"];
//! let vectors = arr2(&[[1.0, -2.5], [0.0, 3.25], [-1.0, -1.0]]);
//! write_bare_text(&path, &words, vectors.view(), "utf-8").unwrap();
//!
//! let embeddings = load_bare_text(&path, "utf-8", None).unwrap();
//! assert_eq!(embeddings.embedding("dog").unwrap().to_vec(), vec![0.0, 3.25]);
//! ```

use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;
use std::str::FromStr;

use ndarray::ArrayView2;
use tracing::debug;

use crate::compat::text::{self, ReadBareText};
use crate::compat::word2vec::{self, ReadWord2Vec};
use crate::embeddings::EmbeddingTable;
use crate::encoding::TextEncoding;
use crate::error::{Error, Result};
use crate::util::{check_shape, encode_words};

/// Embedding file formats.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EmbeddingFormat {
    /// word2vec binary format.
    Word2VecBinary,

    /// word2vec text format, with a shape header.
    Word2VecText,

    /// Text format without a header.
    BareText,
}

impl EmbeddingFormat {
    /// Read embeddings in this format from `path`.
    pub fn read(
        self,
        path: impl AsRef<Path>,
        encoding: &str,
        max_words: Option<usize>,
    ) -> Result<EmbeddingTable> {
        use EmbeddingFormat::*;

        match self {
            Word2VecBinary => load_word2vec(path, encoding, true, max_words),
            Word2VecText => load_word2vec(path, encoding, false, max_words),
            BareText => load_bare_text(path, encoding, max_words),
        }
    }

    /// Write embeddings in this format to `path`.
    pub fn write<S>(
        self,
        path: impl AsRef<Path>,
        words: &[S],
        vectors: ArrayView2<f32>,
        encoding: &str,
    ) -> Result<()>
    where
        S: AsRef<str>,
    {
        use EmbeddingFormat::*;

        match self {
            Word2VecBinary => write_word2vec(path, words, vectors, encoding, true),
            Word2VecText => write_word2vec(path, words, vectors, encoding, false),
            BareText => write_bare_text(path, words, vectors, encoding),
        }
    }
}

impl fmt::Display for EmbeddingFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use EmbeddingFormat::*;

        let name = match self {
            Word2VecBinary => "word2vec",
            Word2VecText => "word2vec_text",
            BareText => "bare_text",
        };

        f.write_str(name)
    }
}

impl FromStr for EmbeddingFormat {
    type Err = Error;

    fn from_str(format: &str) -> Result<Self> {
        use EmbeddingFormat::*;

        match format {
            "word2vec" => Ok(Word2VecBinary),
            "word2vec_text" => Ok(Word2VecText),
            "bare_text" => Ok(BareText),
            unknown => Err(Error::Config(format!(
                "Unknown embedding format: {}",
                unknown
            ))),
        }
    }
}

/// Load embeddings in a word2vec format.
///
/// `binary` selects the binary format, otherwise the text format is
/// read. `max_words` limits the number of words read, `None` or
/// `Some(0)` reads all words.
pub fn load_word2vec(
    path: impl AsRef<Path>,
    encoding: &str,
    binary: bool,
    max_words: Option<usize>,
) -> Result<EmbeddingTable> {
    let path = path.as_ref();
    let mut reader = open(path)?;
    let encoding = TextEncoding::for_label(encoding)?;

    let table = if binary {
        EmbeddingTable::read_word2vec_binary(&mut reader, encoding, max_words)?
    } else {
        EmbeddingTable::read_word2vec_text(&mut reader, encoding, max_words)?
    };

    debug!(
        path = %path.display(),
        n_words = table.n_words(),
        dims = table.n_dim(),
        "Loaded word2vec embeddings"
    );

    Ok(table)
}

/// Write embeddings in a word2vec format.
///
/// Row `i` of `vectors` is written as the embedding of `words[i]`. The
/// file is only created after every word is validated and encoded.
pub fn write_word2vec<S>(
    path: impl AsRef<Path>,
    words: &[S],
    vectors: ArrayView2<f32>,
    encoding: &str,
    binary: bool,
) -> Result<()>
where
    S: AsRef<str>,
{
    let encoding = TextEncoding::for_label(encoding)?;
    check_shape(words.len(), vectors.nrows())?;
    let words = encode_words(words, encoding)?;

    let mut writer = create(path.as_ref())?;
    if binary {
        word2vec::write_word2vec_binary_encoded(&mut writer, &words, vectors)?;
    } else {
        word2vec::write_word2vec_text_encoded(&mut writer, &words, vectors)?;
    }

    writer
        .flush()
        .map_err(|e| Error::write_error("Cannot flush embedding file", e))
}

/// Load embeddings in the bare text format.
pub fn load_bare_text(
    path: impl AsRef<Path>,
    encoding: &str,
    max_words: Option<usize>,
) -> Result<EmbeddingTable> {
    let path = path.as_ref();
    let mut reader = open(path)?;
    let encoding = TextEncoding::for_label(encoding)?;

    let table = EmbeddingTable::read_bare_text(&mut reader, encoding, max_words)?;

    debug!(
        path = %path.display(),
        n_words = table.n_words(),
        dims = table.n_dim(),
        "Loaded bare text embeddings"
    );

    Ok(table)
}

/// Write embeddings in the bare text format.
///
/// The file is only created after every word is validated and encoded.
pub fn write_bare_text<S>(
    path: impl AsRef<Path>,
    words: &[S],
    vectors: ArrayView2<f32>,
    encoding: &str,
) -> Result<()>
where
    S: AsRef<str>,
{
    let encoding = TextEncoding::for_label(encoding)?;
    check_shape(words.len(), vectors.nrows())?;
    let words = encode_words(words, encoding)?;

    let mut writer = create(path.as_ref())?;
    text::write_embeds(&mut writer, &words, vectors)?;

    writer
        .flush()
        .map_err(|e| Error::write_error("Cannot flush embedding file", e))
}

fn open(path: &Path) -> Result<BufReader<File>> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_owned(),
        });
    }

    let f = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::FileNotFound {
            path: path.to_owned(),
        },
        _ => Error::read_error(format!("Cannot open {}", path.display()), e),
    })?;

    Ok(BufReader::new(f))
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let f = File::create(path)
        .map_err(|e| Error::write_error(format!("Cannot create {}", path.display()), e))?;

    Ok(BufWriter::new(f))
}
