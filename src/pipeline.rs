//! The trained pipeline: encoded corpus, frozen encoder and everything a
//! visualization request needs, owned by one value.

use candle_core::{Device, Tensor};
use clustering::{Kmeans, Pca};
use datasets::Record;
use model_enc::{CorpusEncoder, DataError, EncodedCorpus, Tokenizer};
use tracing::{info, instrument};
use trainer::{AutoencoderTrainer, Encoder, EpochObserver, TrainingHistory, rows_to_tensor};

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::response::{VisualizationResponse, assemble};

/// Immutable after [`TrainedPipeline::train`]; shared across requests behind an `Arc`.
#[derive(Debug)]
pub struct TrainedPipeline {
    config: PipelineConfig,
    records: Vec<Record>,
    corpus_encoder: CorpusEncoder,
    encoded: EncodedCorpus,
    /// Normalized corpus as an `[n, sequence_length]` tensor.
    inputs: Tensor,
    encoder: Encoder,
    history: TrainingHistory,
}

impl TrainedPipeline {
    /// Encodes `records` and trains the autoencoder on them.
    #[instrument(skip_all, fields(records = records.len()))]
    pub fn train(
        records: Vec<Record>,
        config: &PipelineConfig,
        observer: Option<&mut dyn EpochObserver>,
    ) -> Result<Self, PipelineError> {
        config.validate()?;
        if records.is_empty() {
            return Err(DataError::EmptyCorpus.into());
        }

        let corpus_encoder = CorpusEncoder::new(
            Tokenizer::new(config.stopwords.build()),
            config.sequence_length,
        );
        let encoded = corpus_encoder.fit(records.iter().map(|record| record.text.as_str()))?;
        let inputs = rows_to_tensor(
            encoded.normalized().rows(),
            config.sequence_length,
            &Device::Cpu,
        )?;

        let trained = AutoencoderTrainer::new(config.autoencoder()).fit_tensor(&inputs, observer)?;
        let (encoder, _, history) = trained.into_parts();
        info!(
            vocabulary = encoded.vocabulary().len(),
            max_id = encoded.normalized().max_id(),
            "pipeline trained"
        );

        Ok(Self {
            config: config.clone(),
            records,
            corpus_encoder,
            encoded,
            inputs,
            encoder,
            history,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn encoded(&self) -> &EncodedCorpus {
        &self.encoded
    }

    pub fn history(&self) -> &TrainingHistory {
        &self.history
    }

    /// `[n, embedding_dim]` embeddings of the training corpus, recomputed on each call.
    pub fn embeddings(&self) -> Result<Tensor, PipelineError> {
        Ok(self.encoder.embed(&self.inputs)?)
    }

    /// Embeds unseen text with the frozen vocabulary and normalization scale.
    pub fn embed_text(&self, text: &str) -> Result<Vec<f32>, PipelineError> {
        let row = self.corpus_encoder.transform(&self.encoded, text);
        let mut embedded = self.encoder.embed_rows(&[row])?;
        Ok(embedded.pop().unwrap_or_default())
    }

    /// Projects the corpus to 2-D, clusters the projections and assembles the response.
    #[instrument(skip_all, fields(records = self.records.len(), clusters = self.config.cluster_count))]
    pub fn visualize(&self) -> Result<VisualizationResponse, PipelineError> {
        let embeddings = self.embeddings()?;
        let projected = Pca::new(2)
            .with_seed(self.config.seed)
            .fit_transform(&embeddings)?;
        let fit = Kmeans::new(self.config.cluster_count)
            .with_seed(self.config.seed)
            .with_max_iter(self.config.max_cluster_iterations)
            .fit(&projected)?;
        info!(
            iterations = fit.iterations,
            reseeds = fit.reseeds,
            sizes = ?fit.cluster_sizes(),
            "corpus clustered"
        );

        Ok(assemble(
            &self.records,
            &projected,
            &fit.labels,
            self.config.cluster_count,
            self.config.max_points,
            self.config.examples_per_cluster,
        ))
    }
}
