//! Synthetic conversation corpora with known topics, and a purity report for
//! scoring cluster assignments against them.

pub mod synthetic;

pub use synthetic::{BenchReport, SyntheticCorpus, TopicReport, TopicTemplate, default_topics};
