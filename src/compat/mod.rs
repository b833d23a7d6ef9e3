//! Readers/writers for embedding file formats.

pub mod text;

pub mod word2vec;
