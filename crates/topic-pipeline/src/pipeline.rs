//! Enrichment-to-graph refresh.
//!
//! A refresh joins every enrichment source and the relation matrix, builds the
//! graph and publishes topics and graph together as one [`PipelineOutput`].
//! A pass that finishes after a newer pass has begun publishes nothing.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use topic_enrich::{TopicEnricher, TopicSources};
use topic_graph::{BuildReport, GraphBuilder};
use topic_types::{Graph, Settings, Topic};

use crate::error::PipelineError;
use crate::relations::RelationSource;
use crate::slot::{Generation, Published, ResultSlot};

/// Topics and the graph built from them, published as one value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineOutput {
    pub topics: Vec<Topic>,
    pub graph: Graph,
}

/// Result of one refresh pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RefreshOutcome {
    /// Topics and graph of this pass are now current
    Published {
        generation: Generation,
        report: BuildReport,
    },
    /// A newer pass began before this one finished
    Stale {
        generation: Generation,
        latest: Generation,
    },
}

impl RefreshOutcome {
    pub fn generation(&self) -> Generation {
        match self {
            RefreshOutcome::Published { generation, .. } => *generation,
            RefreshOutcome::Stale { generation, .. } => *generation,
        }
    }

    pub fn is_published(&self) -> bool {
        matches!(self, RefreshOutcome::Published { .. })
    }
}

/// Owns the sources and the published output.
pub struct TopicGraphPipeline<S, R> {
    enricher: TopicEnricher<S>,
    relations: Arc<R>,
    builder: GraphBuilder,
    output: ResultSlot<PipelineOutput>,
}

impl<S, R> TopicGraphPipeline<S, R>
where
    S: TopicSources + 'static,
    R: RelationSource + 'static,
{
    pub fn new(sources: Arc<S>, relations: Arc<R>, settings: &Settings) -> Self {
        Self {
            enricher: TopicEnricher::new(sources).with_variant(settings.enrichment.variant),
            relations,
            builder: GraphBuilder::from_settings(&settings.graph),
            output: ResultSlot::new(),
        }
    }

    /// Load settings (see [`Settings::load`]) and create a pipeline.
    pub fn from_config(
        sources: Arc<S>,
        relations: Arc<R>,
        config_path: Option<&str>,
    ) -> Result<Self, PipelineError> {
        let settings = Settings::load(config_path)?;
        Ok(Self::new(sources, relations, &settings))
    }

    pub fn enricher(&self) -> &TopicEnricher<S> {
        &self.enricher
    }

    pub fn builder(&self) -> &GraphBuilder {
        &self.builder
    }

    /// Run one pass.
    ///
    /// Any source failure aborts the pass and leaves the published values
    /// untouched.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<RefreshOutcome, PipelineError> {
        let start = Instant::now();
        let generation = self.output.begin();
        debug!(generation, "Refresh started");

        let relations = self.relations.as_ref();
        let (topics, rows) = tokio::try_join!(
            async { self.enricher.enrich().await.map_err(PipelineError::from) },
            async {
                relations.relations().await.map_err(|e| {
                    warn!(error = %e, "Relation source failed");
                    PipelineError::Relations(e)
                })
            },
        )?;

        let (graph, report) = self.builder.build_with_report(&topics, &rows);

        if !self.output.publish(generation, PipelineOutput { topics, graph }) {
            let latest = self.output.latest_generation();
            info!(generation, latest, "Refresh superseded, result discarded");
            return Ok(RefreshOutcome::Stale { generation, latest });
        }

        info!(
            generation,
            nodes = report.primary_nodes + report.secondary_nodes,
            orphans = report.orphan_endpoints.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Refresh published"
        );

        Ok(RefreshOutcome::Published { generation, report })
    }

    /// The most recently published output.
    pub fn latest(&self) -> Option<Published<PipelineOutput>> {
        self.output.latest()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Published<PipelineOutput>>> {
        self.output.subscribe()
    }
}
