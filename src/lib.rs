//! Conversation map: encode a text corpus, train an autoencoder on it, then
//! project the embeddings to 2-D and cluster them for visualization.
//!
//! The stages live in the workspace crates (`datasets`, `model_enc`,
//! `trainer`, `clustering`); this crate wires them into a [`TrainedPipeline`]
//! and gates access to it behind the [`VisualizationService`] readiness
//! state machine.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod response;
pub mod service;

pub use config::PipelineConfig;
pub use error::PipelineError;
pub use pipeline::TrainedPipeline;
pub use response::{ClusterSummary, Example, VisualizationResponse, assemble};
pub use service::{PipelineState, VisualizationService};
