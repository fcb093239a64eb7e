//! Small tracker for the cost of everyday meals. Every weekday you answer whether you had
//! breakfast, lunch and dinner, and the tracker tells you what food cost you this week and month.
//! Records are kept in a plain key-value store, see [storage].
//!

pub mod cli;
pub mod expenses;
pub mod storage;
pub mod utils;
