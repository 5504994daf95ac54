//! # Tinynet Serde
//! Byte-level wire primitives shared by the tinynet server, client & shared
//! crates. Every value is written with a fixed little-endian layout so that
//! peers built from the same schema read back exactly what was written.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod byte_reader;
mod error;
mod number;
mod serde;
mod stream_writer;
mod string;

pub use byte_reader::ByteReader;
pub use error::SerdeErr;
pub use serde::{ConstByteLength, Serde};
pub use stream_writer::{ByteWrite, ByteWriter};
pub use string::MAX_STRING_BYTES;
