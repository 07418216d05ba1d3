pub mod engine;

pub use engine::{SearchEngine, SearchOutcome, build_results};
