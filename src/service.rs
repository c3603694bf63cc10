//! Readiness state machine around a single training run.
//!
//! `Loading -> Training -> Ready`, with any failure on the way landing in the
//! terminal `Failed` state. Requests only ever see a fully trained pipeline:
//! it is published with one write of an `Arc` and cloned out under a read lock.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::thread::{self, JoinHandle};

use datasets::Record;
use serde::Serialize;
use tracing::{error, info, instrument};
use trainer::EpochObserver;

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::pipeline::TrainedPipeline;
use crate::response::VisualizationResponse;

/// Externally visible readiness.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineState {
    Loading,
    Training,
    Ready,
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Loading => "loading",
            Self::Training => "training",
            Self::Ready => "ready",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
enum Phase {
    Loading,
    Training,
    Ready(Arc<TrainedPipeline>),
    Failed(String),
}

impl Phase {
    fn state(&self) -> PipelineState {
        match self {
            Self::Loading => PipelineState::Loading,
            Self::Training => PipelineState::Training,
            Self::Ready(_) => PipelineState::Ready,
            Self::Failed(_) => PipelineState::Failed,
        }
    }
}

/// Serves cluster visualizations once its pipeline has been trained.
///
/// Cloning is cheap; clones share the same state.
#[derive(Clone, Debug)]
pub struct VisualizationService {
    config: Arc<PipelineConfig>,
    phase: Arc<RwLock<Phase>>,
    started: Arc<AtomicBool>,
}

impl VisualizationService {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config: Arc::new(config),
            phase: Arc::new(RwLock::new(Phase::Loading)),
            started: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn state(&self) -> PipelineState {
        self.phase.read().unwrap_or_else(PoisonError::into_inner).state()
    }

    /// The trained pipeline, once ready.
    pub fn pipeline(&self) -> Option<Arc<TrainedPipeline>> {
        self.outcome().ok()
    }

    /// Loads the corpus and trains, blocking the caller until the service is
    /// `Ready` or `Failed`.
    ///
    /// Only the first call does any work. Later calls report the outcome of
    /// that run: the pipeline when ready, [`PipelineError::Failed`] after a
    /// failure, [`PipelineError::NotReady`] while it is still in progress.
    #[instrument(skip_all)]
    pub fn initialize<L, E>(
        &self,
        loader: L,
        observer: Option<&mut dyn EpochObserver>,
    ) -> Result<Arc<TrainedPipeline>, PipelineError>
    where
        L: FnOnce() -> Result<Vec<Record>, E>,
        E: Into<PipelineError>,
    {
        if self.started.swap(true, Ordering::AcqRel) {
            return self.outcome();
        }

        let records = match loader() {
            Ok(records) => records,
            Err(error) => return Err(self.fail(error.into())),
        };
        self.transition(Phase::Training);

        match TrainedPipeline::train(records, &self.config, observer) {
            Ok(pipeline) => {
                let pipeline = Arc::new(pipeline);
                self.transition(Phase::Ready(Arc::clone(&pipeline)));
                Ok(pipeline)
            }
            Err(error) => Err(self.fail(error)),
        }
    }

    /// Runs [`VisualizationService::initialize`] on a background thread.
    pub fn spawn<L, E>(
        &self,
        loader: L,
        observer: Option<Box<dyn EpochObserver + Send>>,
    ) -> JoinHandle<Result<(), PipelineError>>
    where
        L: FnOnce() -> Result<Vec<Record>, E> + Send + 'static,
        E: Into<PipelineError>,
    {
        let service = self.clone();
        thread::spawn(move || {
            let mut observer = observer;
            let hook = observer
                .as_deref_mut()
                .map(|hook| hook as &mut dyn EpochObserver);
            service.initialize(loader, hook).map(|_| ())
        })
    }

    /// Embeds, projects and clusters the corpus for one request.
    pub fn cluster_visualization(&self) -> Result<VisualizationResponse, PipelineError> {
        self.outcome()?.visualize()
    }

    fn outcome(&self) -> Result<Arc<TrainedPipeline>, PipelineError> {
        match &*self.phase.read().unwrap_or_else(PoisonError::into_inner) {
            Phase::Ready(pipeline) => Ok(Arc::clone(pipeline)),
            Phase::Failed(reason) => Err(PipelineError::Failed {
                reason: reason.clone(),
            }),
            other => Err(PipelineError::NotReady {
                state: other.state(),
            }),
        }
    }

    fn transition(&self, next: Phase) {
        let state = next.state();
        *self.phase.write().unwrap_or_else(PoisonError::into_inner) = next;
        info!(%state, "pipeline state changed");
    }

    fn fail(&self, error: PipelineError) -> PipelineError {
        error!(%error, "pipeline initialization failed");
        self.transition(Phase::Failed(error.to_string()));
        error
    }
}
