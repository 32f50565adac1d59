pub mod check;
pub mod common;
pub mod compare;
pub mod completions;
pub mod inspect;
pub mod rewrite;
pub mod stats;
pub mod table;
