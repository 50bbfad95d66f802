//! Query expressions for filtered fetches.

mod predicate;

pub use predicate::{CompareOp, Field, Predicate};
