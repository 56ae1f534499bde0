//! Signed access credentials over `jsonwebtoken`, with the algorithm and
//! its key shape resolved once at construction.

mod algorithm;
mod builder;
mod key;
mod parser;

pub use algorithm::*;
pub use builder::*;
pub use key::read_key;
pub use parser::*;
