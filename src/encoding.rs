//! Character encodings of words.
//!
//! Word tokens are stored in the encoding chosen by the producer of an
//! embedding file. Headers and vector components are always ASCII, so
//! only ASCII-compatible encodings can be used.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use encoding_rs::{Encoding, UTF_8};

use crate::error::{Error, Result};

/// Encoding of the words in an embedding file.
///
/// ```
/// use zellig::encoding::TextEncoding;
///
/// let encoding = TextEncoding::for_label("latin1").unwrap();
/// assert_eq!(encoding.name(), "windows-1252");
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TextEncoding(&'static Encoding);

impl TextEncoding {
    /// Look up an encoding by its label, e.g. `utf-8` or `latin1`.
    ///
    /// Labels follow the WHATWG Encoding Standard. Encodings that are
    /// not ASCII-compatible are rejected.
    pub fn for_label(label: &str) -> Result<Self> {
        let encoding = Encoding::for_label(label.as_bytes())
            .ok_or_else(|| Error::UnknownEncoding(label.to_owned()))?;

        if !encoding.is_ascii_compatible() {
            return Err(Error::UnsupportedEncoding(encoding.name().to_owned()));
        }

        Ok(TextEncoding(encoding))
    }

    /// The UTF-8 encoding.
    pub fn utf8() -> Self {
        TextEncoding(UTF_8)
    }

    /// Canonical name of the encoding.
    pub fn name(self) -> &'static str {
        self.0.name()
    }

    /// Decode the word at `row`.
    ///
    /// Malformed byte sequences are an error, they are never replaced.
    pub fn decode(self, bytes: &[u8], row: usize) -> Result<Cow<str>> {
        self.0
            .decode_without_bom_handling_and_without_replacement(bytes)
            .ok_or(Error::Decode {
                row,
                encoding: self.name(),
            })
    }

    /// Encode the word at `row`.
    pub fn encode(self, word: &str, row: usize) -> Result<Cow<[u8]>> {
        let (bytes, _, unmappable) = self.0.encode(word);
        if unmappable {
            return Err(Error::Encode {
                row,
                encoding: self.name(),
            });
        }

        Ok(bytes)
    }
}

impl Default for TextEncoding {
    fn default() -> Self {
        TextEncoding::utf8()
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TextEncoding {
    type Err = Error;

    fn from_str(label: &str) -> Result<Self> {
        TextEncoding::for_label(label)
    }
}
