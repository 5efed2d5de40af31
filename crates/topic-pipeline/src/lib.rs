//! # topic-pipeline
//!
//! Drives enrichment and graph construction as one refresh pass and publishes
//! the results.
//!
//! Passes may overlap. Each pass is stamped with a generation when it starts
//! and only the most recently started pass may publish, so a slow pass can
//! never overwrite the result of a newer one.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use topic_pipeline::{init_tracing, TopicGraphPipeline};
//! use topic_types::Settings;
//!
//! let settings = Settings::load(None)?;
//! init_tracing(&settings);
//!
//! let pipeline = TopicGraphPipeline::new(sources, relations, &settings);
//! pipeline.refresh().await?;
//! let graph = pipeline.latest().map(|p| p.value.graph.clone());
//! ```

pub mod error;
pub mod logging;
pub mod pipeline;
pub mod relations;
pub mod slot;

pub use error::PipelineError;
pub use logging::init_tracing;
pub use pipeline::{PipelineOutput, RefreshOutcome, TopicGraphPipeline};
pub use relations::{MockRelationSource, RelationSource};
pub use slot::{Generation, Published, ResultSlot};
