// Core algorithm exports
pub mod aggregator;
pub mod classifier;
pub mod explanation;
pub mod recommendations;

pub use aggregator::{aggregate, aggregate_pair};
pub use classifier::{classify, score_pair, PairMetrics};
pub use explanation::build_explanation;
pub use recommendations::recommendations;
