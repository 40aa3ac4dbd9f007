pub mod bits;
pub mod code_table;
pub mod codec;
pub mod error;
pub mod files;
pub mod frequency;
pub mod header;
pub mod tree;

pub use codec::{compress, compress_to, decompress, decompress_from, ArchiveStats};
pub use error::{Error, FormatError, Result};
