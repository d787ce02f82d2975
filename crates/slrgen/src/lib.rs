//! An SLR parser generator.
//!
//! The construction runs in four stages, each consuming the output of the
//! previous ones:
//!
//! 1. [`Grammar`](grammar::Grammar) is declared through [`Grammar::define`](grammar::Grammar::define).
//! 2. [`FirstSets`](first_follow::FirstSets) and [`FollowSets`](first_follow::FollowSets) are computed.
//! 3. [`LR0Automaton::build`](lr0::LR0Automaton::build) collects the canonical LR(0) item sets.
//! 4. [`ParseTable::compile`](table::ParseTable::compile) derives the action and goto tables.
//!
//! [`SlrDefinition`](definition::SlrDefinition) runs the whole pipeline and
//! hands the result to the `slrgen-runtime` parser.

pub mod definition;
pub mod first_follow;
pub mod grammar;
pub mod lr0;
pub mod table;
pub mod types;

mod util;

pub use crate::definition::SlrDefinition;
