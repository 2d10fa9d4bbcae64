//! Text encoding helpers

pub mod utf8;

pub use utf8::{at_end, count_chars, next_char, prev_char, seek_to_char, Chars};
