//! Reader and writer for the bare text format.
//!
//! In this format, each line contains a word followed by its
//! embedding. The word and the embedding vector components are
//! separated by whitespace. There is no header, the dimensionality
//! is the number of components on the first line.
//!
//! *word0 component_1 component_2 ... component_n*
//!
//! The word2vec text format uses the same lines after its header,
//! see the `word2vec` module.

use std::io::{BufRead, Write};

use itertools::Itertools;
use ndarray::{Array2, ArrayView2};
use tracing::debug;

use crate::embeddings::EmbeddingTable;
use crate::encoding::TextEncoding;
use crate::error::{Error, Result};
use crate::util::{
    check_shape, encode_words, fields, initial_capacity, parse_component, read_line, word_budget,
};

/// Method to construct an `EmbeddingTable` from a bare text file.
pub trait ReadBareText<R>
where
    Self: Sized,
    R: BufRead,
{
    /// Read the embeddings from the given buffered reader.
    ///
    /// Reading stops at the end of the stream, or after `max_words`
    /// lines if a non-zero limit is given.
    fn read_bare_text(
        reader: &mut R,
        encoding: TextEncoding,
        max_words: Option<usize>,
    ) -> Result<Self>;
}

impl<R> ReadBareText<R> for EmbeddingTable
where
    R: BufRead,
{
    fn read_bare_text(
        reader: &mut R,
        encoding: TextEncoding,
        max_words: Option<usize>,
    ) -> Result<Self> {
        read_embeds(reader, None, encoding, max_words)
    }
}

/// Read embedding lines.
///
/// With a `shape`, exactly `min(n_words, max_words)` lines of `dims`
/// components must follow. Without a shape, lines are read until the
/// end of the stream or until `max_words` lines are read, and the
/// dimensionality is taken from the first line.
pub(crate) fn read_embeds(
    reader: &mut dyn BufRead,
    shape: Option<(usize, usize)>,
    encoding: TextEncoding,
    max_words: Option<usize>,
) -> Result<EmbeddingTable> {
    let (budget, mut dims) = match shape {
        Some((n_words, dims)) => (Some(word_budget(n_words, max_words)), Some(dims)),
        None => (max_words.filter(|&max_words| max_words != 0), None),
    };

    let (mut words, mut data) = match (budget, dims) {
        (Some(n_words), Some(dims)) => {
            let (words_capacity, data_capacity) = initial_capacity(n_words, dims);
            (
                Vec::with_capacity(words_capacity),
                Vec::with_capacity(data_capacity),
            )
        }
        _ => (Vec::new(), Vec::new()),
    };

    let mut line = Vec::new();
    while budget.map(|n_words| words.len() < n_words).unwrap_or(true) {
        let row = words.len();
        if !read_line(reader, &mut line)
            .map_err(|e| Error::read_error("Cannot read line from embedding file", e))?
        {
            match budget {
                Some(n_words) if shape.is_some() => {
                    return Err(Error::truncated(
                        row,
                        format!("expected {} words, the file ended", n_words),
                    ))
                }
                _ => break,
            }
        }

        let mut parts = fields(&line);
        let word = parts
            .next()
            .ok_or_else(|| Error::format(row, "Spurious empty line"))?;
        words.push(encoding.decode(word, row)?.into_owned());

        let offset = data.len();
        for part in parts {
            data.push(parse_component(part, row)?);
        }

        let found = data.len() - offset;
        match dims {
            Some(expected) if expected != found => {
                return Err(Error::DimensionMismatch {
                    row,
                    expected,
                    found,
                })
            }
            Some(_) => (),
            None if found == 0 => return Err(Error::format(row, "Line has no embedding")),
            None => dims = Some(found),
        }
    }

    let shape = (words.len(), dims.unwrap_or(0));
    debug!(
        n_words = shape.0,
        dims = shape.1,
        "Read text embeddings"
    );

    let matrix = Array2::from_shape_vec(shape, data)?;

    EmbeddingTable::new(words, matrix)
}

/// Method to write an `EmbeddingTable` as bare text.
pub trait WriteBareText<W>
where
    W: Write,
{
    /// Write the embeddings to the given writer.
    fn write_bare_text(&self, write: &mut W, encoding: TextEncoding) -> Result<()>;
}

impl<W> WriteBareText<W> for EmbeddingTable
where
    W: Write,
{
    fn write_bare_text(&self, write: &mut W, encoding: TextEncoding) -> Result<()> {
        write_bare_text(write, self.words(), self.vectors(), encoding)
    }
}

/// Write words and their embeddings as bare text.
///
/// All words are validated before anything is written.
pub fn write_bare_text<W, S>(
    write: &mut W,
    words: &[S],
    vectors: ArrayView2<f32>,
    encoding: TextEncoding,
) -> Result<()>
where
    W: Write,
    S: AsRef<str>,
{
    check_shape(words.len(), vectors.nrows())?;
    let words = encode_words(words, encoding)?;
    write_embeds(write, &words, vectors)
}

/// Write one line per encoded word.
///
/// Components are formatted with the shortest representation that
/// parses back to the same `f32`.
pub(crate) fn write_embeds<W, B>(write: &mut W, words: &[B], vectors: ArrayView2<f32>) -> Result<()>
where
    W: Write,
    B: AsRef<[u8]>,
{
    for (word, embedding) in words.iter().zip(vectors.outer_iter()) {
        let embed_str = embedding.iter().map(ToString::to_string).join(" ");

        write
            .write_all(word.as_ref())
            .map_err(|e| Error::write_error("Cannot write token", e))?;
        writeln!(write, " {}", embed_str)
            .map_err(|e| Error::write_error("Cannot write word embedding", e))?;
    }

    debug!(
        n_words = words.len(),
        dims = vectors.ncols(),
        "Wrote text embeddings"
    );

    Ok(())
}
