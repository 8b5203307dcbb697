pub mod output;
pub mod parse;
pub mod seek;
