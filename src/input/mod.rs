//! Input reading from files, command-line words and stdin.

mod reader;

pub use reader::{InputError, InputReader, InputSource};
