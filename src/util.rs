use std::borrow::Cow;
use std::io::{self, BufRead, ErrorKind};
use std::mem::size_of;
use std::str;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::encoding::TextEncoding;
use crate::error::{Error, Result};

/// Upper bound on the number of words reserved before reading.
const PREALLOC_WORDS: usize = 1 << 16;

/// Upper bound on the number of vector components reserved before reading.
const PREALLOC_COMPONENTS: usize = 1 << 22;

/// Number of components read from a binary embedding at a time.
const READ_CHUNK: usize = 1 << 12;

/// Token separators: ASCII whitespace and vertical tab, as C `isspace`.
pub fn is_separator(b: &u8) -> bool {
    b.is_ascii_whitespace() || *b == 0x0b
}

/// Number of words to read given the vocabulary size and word limit.
///
/// A limit of `None` or `Some(0)` means that all words are read.
pub fn word_budget(n_words: usize, max_words: Option<usize>) -> usize {
    match max_words {
        Some(max_words) if max_words != 0 => n_words.min(max_words),
        _ => n_words,
    }
}

/// Capacities to reserve for the words and components of a table.
///
/// Capacities are bounded, buffers grow as rows are read, so that a
/// header that overstates the vocabulary does not allocate memory for
/// rows that are not in the file.
pub fn initial_capacity(n_words: usize, dims: usize) -> (usize, usize) {
    let words = n_words.min(PREALLOC_WORDS);
    let components = words.saturating_mul(dims).min(PREALLOC_COMPONENTS);
    (words, components)
}

pub fn check_shape(n_words: usize, n_rows: usize) -> Result<()> {
    if n_words != n_rows {
        return Err(Error::ShapeMismatch {
            words: n_words,
            rows: n_rows,
        });
    }

    Ok(())
}

/// Encode a word for writing.
///
/// Words must be non-empty and must not contain whitespace, since
/// readers split tokens on whitespace.
pub fn encode_word(word: &str, row: usize, encoding: TextEncoding) -> Result<Cow<[u8]>> {
    let bytes = encoding.encode(word, row)?;
    if bytes.is_empty() {
        return Err(Error::format(row, "Cannot write empty word"));
    }

    if bytes.iter().any(is_separator) {
        return Err(Error::format(
            row,
            format!("Word '{}' contains whitespace", word),
        ));
    }

    Ok(bytes)
}

/// Encode all words, so that no output is written for invalid words.
pub fn encode_words<S>(words: &[S], encoding: TextEncoding) -> Result<Vec<Cow<[u8]>>>
where
    S: AsRef<str>,
{
    words
        .iter()
        .enumerate()
        .map(|(row, word)| encode_word(word.as_ref(), row, encoding))
        .collect()
}

/// Read a word2vec header, returning the vocabulary size and dimensionality.
///
/// Shapes whose matrix size in bytes does not fit in `usize` are rejected.
pub fn read_header(reader: &mut dyn BufRead) -> Result<(usize, usize)> {
    let mut buf = Vec::new();
    if !read_line(reader, &mut buf).map_err(|e| Error::read_error("Cannot read header", e))? {
        return Err(Error::HeaderFormat("missing header line".to_owned()));
    }

    let header = str::from_utf8(&buf)
        .map_err(|_| Error::HeaderFormat("header is not ASCII".to_owned()))?;
    let fields: Vec<&str> = header
        .split(|c: char| c.is_ascii() && is_separator(&(c as u8)))
        .filter(|field| !field.is_empty())
        .collect();
    if fields.len() != 2 {
        return Err(Error::HeaderFormat(format!(
            "expected vocabulary size and dimensionality, got '{}'",
            header.trim()
        )));
    }

    let (n_words, dims) = (parse_shape(fields[0])?, parse_shape(fields[1])?);
    if n_words
        .checked_mul(dims)
        .and_then(|n| n.checked_mul(size_of::<f32>()))
        .is_none()
    {
        return Err(Error::HeaderFormat(format!(
            "embedding matrix of shape {}x{} is too large",
            n_words, dims
        )));
    }

    Ok((n_words, dims))
}

fn parse_shape(field: &str) -> Result<usize> {
    field.parse().map_err(|e| {
        Error::HeaderFormat(format!(
            "Cannot parse shape component '{}': {}",
            field, e
        ))
    })
}

/// Read `dims` little-endian `f32` components of `row`, appending them to `data`.
///
/// `data` grows in chunks, so a truncated stream fails before memory for
/// the full row is allocated.
pub fn read_embedding(
    reader: &mut dyn BufRead,
    data: &mut Vec<f32>,
    dims: usize,
    row: usize,
) -> Result<()> {
    let mut remaining = dims;
    while remaining != 0 {
        let len = remaining.min(READ_CHUNK);
        let offset = data.len();
        data.resize(offset + len, 0.);
        reader
            .read_f32_into::<LittleEndian>(&mut data[offset..])
            .map_err(|e| match e.kind() {
                ErrorKind::UnexpectedEof => Error::truncated(
                    row,
                    format!("embedding has fewer than {} components", dims),
                ),
                _ => Error::read_error("Cannot read word embedding", e),
            })?;
        remaining -= len;
    }

    Ok(())
}

/// Read a line, without the line terminator.
///
/// Returns `false` at the end of the stream.
pub fn read_line(reader: &mut dyn BufRead, buf: &mut Vec<u8>) -> io::Result<bool> {
    buf.clear();
    if reader.read_until(b'\n', buf)? == 0 {
        return Ok(false);
    }

    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }

    Ok(true)
}

/// Read a token delimited by whitespace.
///
/// Leading whitespace is skipped and the whitespace byte that ends the
/// token is consumed. Nothing after it is read. Returns `false` if the
/// stream ended before a token started.
pub fn read_token(reader: &mut dyn BufRead, buf: &mut Vec<u8>) -> io::Result<bool> {
    buf.clear();

    loop {
        let available = match reader.fill_buf() {
            Ok(available) => available,
            Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        if available.is_empty() {
            return Ok(!buf.is_empty());
        }

        let mut start = 0;
        if buf.is_empty() {
            match available.iter().position(|b| !is_separator(b)) {
                Some(pos) => start = pos,
                None => {
                    let len = available.len();
                    reader.consume(len);
                    continue;
                }
            }
        }

        match available[start..].iter().position(is_separator) {
            Some(len) => {
                buf.extend_from_slice(&available[start..start + len]);
                reader.consume(start + len + 1);
                return Ok(true);
            }
            None => {
                buf.extend_from_slice(&available[start..]);
                let len = available.len();
                reader.consume(len);
            }
        }
    }
}

/// Split a line into its non-empty whitespace-delimited fields.
pub fn fields(line: &[u8]) -> impl Iterator<Item = &[u8]> {
    line.split(is_separator).filter(|field| !field.is_empty())
}

pub fn parse_component(field: &[u8], row: usize) -> Result<f32> {
    str::from_utf8(field)
        .ok()
        .and_then(|field| field.parse().ok())
        .ok_or_else(|| {
            Error::format(
                row,
                format!(
                    "Cannot parse vector component '{}'",
                    String::from_utf8_lossy(field)
                ),
            )
        })
}
