//! Encoding and decoding with a learned merge table.
//!
//! - [`MergeReplayEncoder`]: text -> symbols, replaying merges in training order
//! - [`Decoder`]: symbols -> readable text

pub mod decoder;
pub mod encoder;

pub use decoder::Decoder;
pub use encoder::MergeReplayEncoder;
