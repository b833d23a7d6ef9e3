//! Reader and writer for the word2vec formats.
//!
//! A word2vec file starts with a header line containing the vocabulary
//! size and the embedding dimensionality. In the binary format, each word
//! is followed by a single space and the embedding as little-endian
//! `f32` values; every record ends with a newline. In the text format,
//! each line holds a word and its embedding components, separated by
//! spaces.
//!
//! ```
//! use std::io::Cursor;
//!
//! use zellig::prelude::*;
//!
//! let mut reader = Cursor::new("2 3\nBerlin 1 0 0\nParis 0 1 0\n");
//! let embeddings =
//!     EmbeddingTable::read_word2vec_text(&mut reader, TextEncoding::utf8(), None).unwrap();
//!
//! assert_eq!(embeddings.n_words(), 2);
//! assert_eq!(embeddings.embedding("Paris").unwrap()[1], 1.0);
//! ```

use std::io::{BufRead, Write};

use byteorder::{LittleEndian, WriteBytesExt};
use ndarray::{Array2, ArrayView2};
use tracing::debug;

use crate::compat::text::{read_embeds, write_embeds};
use crate::embeddings::EmbeddingTable;
use crate::encoding::TextEncoding;
use crate::error::{Error, Result};
use crate::util::{
    check_shape, encode_words, initial_capacity, read_embedding, read_header, read_token,
    word_budget,
};

/// Method to construct an `EmbeddingTable` from a word2vec file.
///
/// `max_words` limits the number of words that are read, `None` or
/// `Some(0)` reads the whole vocabulary. Data after the last word that
/// is read is not consumed.
pub trait ReadWord2Vec<R>
where
    Self: Sized,
    R: BufRead,
{
    /// Read embeddings in the word2vec binary format.
    fn read_word2vec_binary(
        reader: &mut R,
        encoding: TextEncoding,
        max_words: Option<usize>,
    ) -> Result<Self>;

    /// Read embeddings in the word2vec text format.
    fn read_word2vec_text(
        reader: &mut R,
        encoding: TextEncoding,
        max_words: Option<usize>,
    ) -> Result<Self>;
}

impl<R> ReadWord2Vec<R> for EmbeddingTable
where
    R: BufRead,
{
    fn read_word2vec_binary(
        reader: &mut R,
        encoding: TextEncoding,
        max_words: Option<usize>,
    ) -> Result<Self> {
        let (n_words, dims) = read_header(reader)?;
        let budget = word_budget(n_words, max_words);
        debug!(n_words, dims, budget, "Read word2vec binary header");

        let (words_capacity, data_capacity) = initial_capacity(budget, dims);
        let mut words = Vec::with_capacity(words_capacity);
        let mut data = Vec::with_capacity(data_capacity);
        let mut token = Vec::new();

        for row in 0..budget {
            if !read_token(reader, &mut token)
                .map_err(|e| Error::read_error(format!("Cannot read word at row {}", row), e))?
            {
                return Err(Error::truncated(row, "missing word"));
            }
            words.push(encoding.decode(&token, row)?.into_owned());

            read_embedding(reader, &mut data, dims, row)?;
        }

        let matrix = Array2::from_shape_vec((budget, dims), data)?;

        EmbeddingTable::new(words, matrix)
    }

    fn read_word2vec_text(
        reader: &mut R,
        encoding: TextEncoding,
        max_words: Option<usize>,
    ) -> Result<Self> {
        let (n_words, dims) = read_header(reader)?;
        debug!(n_words, dims, "Read word2vec text header");

        read_embeds(reader, Some((n_words, dims)), encoding, max_words)
    }
}

/// Method to write an `EmbeddingTable` in a word2vec format.
pub trait WriteWord2Vec<W>
where
    W: Write,
{
    /// Write the embeddings in the word2vec binary format.
    fn write_word2vec_binary(&self, write: &mut W, encoding: TextEncoding) -> Result<()>;

    /// Write the embeddings in the word2vec text format.
    fn write_word2vec_text(&self, write: &mut W, encoding: TextEncoding) -> Result<()>;
}

impl<W> WriteWord2Vec<W> for EmbeddingTable
where
    W: Write,
{
    fn write_word2vec_binary(&self, write: &mut W, encoding: TextEncoding) -> Result<()> {
        write_word2vec_binary(write, self.words(), self.vectors(), encoding)
    }

    fn write_word2vec_text(&self, write: &mut W, encoding: TextEncoding) -> Result<()> {
        write_word2vec_text(write, self.words(), self.vectors(), encoding)
    }
}

/// Write words and their embeddings in the word2vec binary format.
///
/// Row `i` of `vectors` is written as the embedding of `words[i]`. All
/// words are validated before anything is written.
pub fn write_word2vec_binary<W, S>(
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
    write_word2vec_binary_encoded(write, &words, vectors)
}

/// Write encoded words and their embeddings in the word2vec binary format.
pub(crate) fn write_word2vec_binary_encoded<W, B>(
    write: &mut W,
    words: &[B],
    vectors: ArrayView2<f32>,
) -> Result<()>
where
    W: Write,
    B: AsRef<[u8]>,
{
    writeln!(write, "{} {}", words.len(), vectors.ncols())
        .map_err(|e| Error::write_error("Cannot write word embedding matrix shape", e))?;

    for (word, embedding) in words.iter().zip(vectors.outer_iter()) {
        write
            .write_all(word.as_ref())
            .map_err(|e| Error::write_error("Cannot write token", e))?;
        write
            .write_all(b" ")
            .map_err(|e| Error::write_error("Cannot write token separator", e))?;

        for &v in embedding.iter() {
            write
                .write_f32::<LittleEndian>(v)
                .map_err(|e| Error::write_error("Cannot write embedding component", e))?;
        }

        write
            .write_all(&[0x0a])
            .map_err(|e| Error::write_error("Cannot write embedding separator", e))?;
    }

    debug!(
        n_words = words.len(),
        dims = vectors.ncols(),
        "Wrote word2vec binary embeddings"
    );

    Ok(())
}

/// Write words and their embeddings in the word2vec text format.
pub fn write_word2vec_text<W, S>(
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
    write_word2vec_text_encoded(write, &words, vectors)
}

/// Write encoded words and their embeddings in the word2vec text format.
pub(crate) fn write_word2vec_text_encoded<W, B>(
    write: &mut W,
    words: &[B],
    vectors: ArrayView2<f32>,
) -> Result<()>
where
    W: Write,
    B: AsRef<[u8]>,
{
    writeln!(write, "{} {}", words.len(), vectors.ncols())
        .map_err(|e| Error::write_error("Cannot write word embedding matrix shape", e))?;

    write_embeds(write, words, vectors)
}

#[cfg(test)]
mod tests {
    use std::io::{BufReader, Cursor, Read};

    use approx::assert_abs_diff_eq;
    use ndarray::{arr1, arr2, Array2};

    use super::{write_word2vec_binary, ReadWord2Vec, WriteWord2Vec};
    use crate::embeddings::EmbeddingTable;
    use crate::encoding::TextEncoding;
    use crate::error::Error;

    fn test_table() -> EmbeddingTable {
        let words = vec![
            "Berlin".to_owned(),
            "Potsdam".to_owned(),
            "Hamburg".to_owned(),
            "Leipzig".to_owned(),
        ];
        let vectors = arr2(&[
            [0.25, -1.5, 3.0e-7],
            [1.0, 0.0, -0.0],
            [f32::MAX, f32::MIN_POSITIVE, -7.125],
            [0.1, 0.2, 0.3],
        ]);
        EmbeddingTable::new(words, vectors).unwrap()
    }

    fn binary_bytes(table: &EmbeddingTable) -> Vec<u8> {
        let mut output = Vec::new();
        table
            .write_word2vec_binary(&mut output, TextEncoding::utf8())
            .unwrap();
        output
    }

    #[test]
    fn binary_layout() {
        let table =
            EmbeddingTable::new(vec!["ab".to_owned()], arr2(&[[1.0f32, -2.0]])).unwrap();
        let mut check = b"1 2\nab ".to_vec();
        check.extend_from_slice(&1.0f32.to_le_bytes());
        check.extend_from_slice(&(-2.0f32).to_le_bytes());
        check.push(b'\n');

        assert_eq!(binary_bytes(&table), check);
    }

    #[test]
    fn binary_roundtrip_is_exact() {
        let check = test_table();
        let output = binary_bytes(&check);

        let table = EmbeddingTable::read_word2vec_binary(
            &mut Cursor::new(&output),
            TextEncoding::utf8(),
            None,
        )
        .unwrap();
        assert_eq!(table.words(), check.words());
        for (v, check_v) in table.vectors().iter().zip(check.vectors().iter()) {
            assert_eq!(v.to_bits(), check_v.to_bits());
        }

        // Writing the table again gives the same bytes.
        assert_eq!(binary_bytes(&table), output);
    }

    #[test]
    fn binary_payload_may_contain_whitespace_bytes() {
        // 0x0a0a0a0a and 0x20202020 are valid f32 bit patterns made of
        // newline and space bytes.
        let vectors = arr2(&[
            [f32::from_bits(0x0a0a_0a0a), f32::from_bits(0x2020_2020)],
            [f32::from_bits(0x2020_2020), f32::from_bits(0x0a0a_0a0a)],
        ]);
        let check = EmbeddingTable::new(vec!["a".to_owned(), "b".to_owned()], vectors).unwrap();

        let output = binary_bytes(&check);
        let table = EmbeddingTable::read_word2vec_binary(
            &mut Cursor::new(&output),
            TextEncoding::utf8(),
            None,
        )
        .unwrap();
        assert_eq!(table, check);
    }

    #[test]
    fn binary_reads_small_buffers() {
        let check = test_table();
        let output = binary_bytes(&check);
        let mut reader = BufReader::with_capacity(3, Cursor::new(output));
        let table =
            EmbeddingTable::read_word2vec_binary(&mut reader, TextEncoding::utf8(), None).unwrap();
        assert_eq!(table, check);
    }

    #[test]
    fn binary_truncation_leaves_rest_unread() {
        let check = test_table();
        let output = binary_bytes(&check);

        let mut reader = Cursor::new(&output);
        let table =
            EmbeddingTable::read_word2vec_binary(&mut reader, TextEncoding::utf8(), Some(2))
                .unwrap();
        assert_eq!(table.n_words(), 2);
        assert_eq!(table.n_dim(), 3);
        assert_eq!(table.words(), &check.words()[..2]);
        assert_eq!(table.vectors(), check.vectors().slice(ndarray::s![..2, ..]));

        // Only the newline terminating the second record remains before
        // the third word.
        let mut rest = Vec::new();
        reader.read_to_end(&mut rest).unwrap();
        assert!(rest.starts_with(b"\nHamburg "));
    }

    #[test]
    fn max_words_larger_than_vocab() {
        let check = test_table();
        let output = binary_bytes(&check);
        let table = EmbeddingTable::read_word2vec_binary(
            &mut Cursor::new(&output),
            TextEncoding::utf8(),
            Some(100),
        )
        .unwrap();
        assert_eq!(table, check);

        let table = EmbeddingTable::read_word2vec_binary(
            &mut Cursor::new(&output),
            TextEncoding::utf8(),
            Some(0),
        )
        .unwrap();
        assert_eq!(table, check);
    }

    #[test]
    fn binary_empty_vocab_keeps_dims() {
        let table = EmbeddingTable::read_word2vec_binary(
            &mut Cursor::new("0 300\n"),
            TextEncoding::utf8(),
            None,
        )
        .unwrap();
        assert_eq!(table.n_words(), 0);
        assert_eq!(table.n_dim(), 300);
    }

    #[test]
    fn binary_truncated_payload() {
        let output = binary_bytes(&test_table());

        // Cut in the middle of the last embedding.
        let cut = &output[..output.len() - 6];
        let err = EmbeddingTable::read_word2vec_binary(
            &mut Cursor::new(cut),
            TextEncoding::utf8(),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, Error::TruncatedPayload { row: 3, .. }));

        // Header promises more words than the file contains.
        let mut more = output.clone();
        more[0] = b'5';
        let err = EmbeddingTable::read_word2vec_binary(
            &mut Cursor::new(&more),
            TextEncoding::utf8(),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, Error::TruncatedPayload { row: 4, .. }));
    }

    #[test]
    fn binary_invalid_word_reports_row() {
        let mut output = binary_bytes(&test_table());
        let pos = output
            .windows(7)
            .position(|w| w == b"Hamburg")
            .unwrap();
        output[pos + 1] = 0xff;

        let err = EmbeddingTable::read_word2vec_binary(
            &mut Cursor::new(&output),
            TextEncoding::utf8(),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Decode { row: 2, .. }));
    }

    #[test]
    fn binary_malformed_header() {
        for header in &["abc 5\n", "5\n"] {
            let err = EmbeddingTable::read_word2vec_binary(
                &mut Cursor::new(header),
                TextEncoding::utf8(),
                None,
            )
            .unwrap_err();
            assert!(matches!(err, Error::HeaderFormat(_)));
        }
    }

    #[test]
    fn binary_non_utf8_encoding() {
        let latin1 = TextEncoding::for_label("latin1").unwrap();
        let check =
            EmbeddingTable::new(vec!["café".to_owned()], arr2(&[[1.0f32, 2.0]])).unwrap();

        let mut output = Vec::new();
        check.write_word2vec_binary(&mut output, latin1).unwrap();
        assert!(output.starts_with(b"1 2\ncaf\xe9 "));

        let table =
            EmbeddingTable::read_word2vec_binary(&mut Cursor::new(&output), latin1, None).unwrap();
        assert_eq!(table, check);

        // The same bytes are not valid UTF-8.
        let err = EmbeddingTable::read_word2vec_binary(
            &mut Cursor::new(&output),
            TextEncoding::utf8(),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Decode { row: 0, .. }));
    }

    #[test]
    fn writer_checks_shape() {
        let mut output = Vec::new();
        let err = write_word2vec_binary(
            &mut output,
            &["a", "b"],
            Array2::zeros((3, 2)).view(),
            TextEncoding::utf8(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { words: 2, rows: 3 }));
        assert!(output.is_empty());
    }

    #[test]
    fn writer_rejects_words_with_whitespace() {
        let mut output = Vec::new();
        let err = write_word2vec_binary(
            &mut output,
            &["a", "b c"],
            Array2::zeros((2, 2)).view(),
            TextEncoding::utf8(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Format { row: 1, .. }));
        assert!(output.is_empty());
    }

    #[test]
    fn binary_rejects_oversized_header() {
        let err = EmbeddingTable::read_word2vec_binary(
            &mut Cursor::new("18446744073709551615 2\ncat "),
            TextEncoding::utf8(),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, Error::HeaderFormat(_)));
    }

    #[test]
    fn binary_overstated_vocab_fails_at_missing_row() {
        let mut data = b"100000000 300\ncat ".to_vec();
        for _ in 0..300 {
            data.extend_from_slice(&0.5f32.to_le_bytes());
        }
        data.extend_from_slice(b"\ndog ");

        let err = EmbeddingTable::read_word2vec_binary(
            &mut Cursor::new(&data),
            TextEncoding::utf8(),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, Error::TruncatedPayload { row: 1, .. }));

        // Huge dimensionality with a short payload.
        let err = EmbeddingTable::read_word2vec_binary(
            &mut Cursor::new(&b"1 1000000000\ncat \x00\x00\x80\x3f"[..]),
            TextEncoding::utf8(),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, Error::TruncatedPayload { row: 0, .. }));
    }

    #[test]
    fn text_rejects_oversized_header() {
        let err = EmbeddingTable::read_word2vec_text(
            &mut Cursor::new("9223372036854775807 4\n"),
            TextEncoding::utf8(),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, Error::HeaderFormat(_)));

        let err = EmbeddingTable::read_word2vec_text(
            &mut Cursor::new("100000000 300\n"),
            TextEncoding::utf8(),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, Error::TruncatedPayload { row: 0, .. }));
    }

    #[test]
    fn text_roundtrip() {
        let check = test_table();
        let mut output = Vec::new();
        check
            .write_word2vec_text(&mut output, TextEncoding::utf8())
            .unwrap();
        assert!(output.starts_with(b"4 3\nBerlin 0.25 -1.5 "));

        let table = EmbeddingTable::read_word2vec_text(
            &mut Cursor::new(&output),
            TextEncoding::utf8(),
            None,
        )
        .unwrap();
        assert_eq!(table.words(), check.words());
        for (&v, &check_v) in table.vectors().iter().zip(check.vectors().iter()) {
            assert_abs_diff_eq!(v, check_v, epsilon = 1e-6 * check_v.abs().max(1.0));
        }
    }

    #[test]
    fn text_truncation() {
        let text = "3 2\ncat 1.0 -2.5\ndog 0.0 3.25\nfish -1.0 -1.0\n";
        let table =
            EmbeddingTable::read_word2vec_text(&mut Cursor::new(text), TextEncoding::utf8(), Some(2))
                .unwrap();
        assert_eq!(table.words(), &["cat", "dog"]);
        assert_eq!(table.embedding("dog").unwrap(), arr1(&[0.0, 3.25]));
    }

    #[test]
    fn text_ignores_surrounding_whitespace() {
        let text = "2 2\n  cat\t1.0  -2.5 \r\ndog 0 3.25";
        let table =
            EmbeddingTable::read_word2vec_text(&mut Cursor::new(text), TextEncoding::utf8(), None)
                .unwrap();
        assert_eq!(table.vectors(), arr2(&[[1.0, -2.5], [0.0, 3.25]]));
    }

    #[test]
    fn text_errors_carry_row() {
        let read = |text: &str| {
            EmbeddingTable::read_word2vec_text(&mut Cursor::new(text), TextEncoding::utf8(), None)
                .unwrap_err()
        };

        assert!(matches!(
            read("2 2\ncat 1.0 -2.5\ndog 0.0\n"),
            Error::DimensionMismatch {
                row: 1,
                expected: 2,
                found: 1
            }
        ));
        assert!(matches!(
            read("2 2\ncat 1.0 -2.5\ndog 0.0 x\n"),
            Error::Format { row: 1, .. }
        ));
        assert!(matches!(
            read("3 2\ncat 1.0 -2.5\ndog 0.0 1.0\n"),
            Error::TruncatedPayload { row: 2, .. }
        ));
        assert!(matches!(read("abc 2\n"), Error::HeaderFormat(_)));
    }
}
