//! # Viral gene-model assembly
//!
//! Turns protein-to-genome alignment fragments into scored candidate gene
//! models for viral genomes, accounting for translational tricks that
//! ordinary gene finders miss.
//!
//! ## Stages
//!
//! 1. **Chaining**: enumerate maximal chains of compatible fragments
//! 2. **Assembly**: one exon per fragment, partial ends flagged
//! 3. **Gap splitting**: cut exons and models around ambiguous sequence
//! 4. **Viral tricks**: ribosomal slippage, leaky stops and RNA editing
//! 5. **Scoring**: weighted total over the named score components
//!
//! ## Usage Example
//!
//! ```ignore
//! use vireo::{ModelConfig, ModelGenerator};
//!
//! let generator = ModelGenerator::new(ModelConfig::default());
//! let models = generator.generate(&alignment)?;
//! for model in &models {
//!     println!("{model}");
//! }
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod assembly;
pub mod config;
pub mod model;
pub mod pipeline;
pub mod scoring;
pub mod tricks;

pub use assembly::{
    assemble_model, merge_identical_protein_alignments, split_at_gaps, FragmentChain,
    FragmentChainBuilder,
};
pub use config::{ConfigError, ModelConfig, ScoreFactors};
pub use model::{
    Alignment, AlignmentFragment, Direction, Exon, Frame, Interval, Model, ModelError,
    ScoreComponent, ViralProtein, VirusGenome,
};
pub use pipeline::{GenomeRecord, RecordModels};
pub use scoring::ScoreEvaluator;
pub use tricks::{TrickPipeline, ViralTrick};

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, debug_span};

/// Errors surfaced by the model generator.
#[derive(Error, Debug)]
pub enum VireoError {
    /// Invalid or incomplete configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Input that cannot be turned into models.
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Runs chaining, assembly, gap splitting, viral tricks and scoring.
///
/// Proteins carrying their own [`ModelConfig`] use it for chaining
/// tolerances and score factors; everything else uses the generator's.
#[derive(Debug)]
pub struct ModelGenerator {
    config: ModelConfig,
    tricks: TrickPipeline,
    evaluator: ScoreEvaluator,
}

impl ModelGenerator {
    /// Generator with the standard detector pipeline.
    pub fn new(config: ModelConfig) -> Self {
        Self {
            tricks: TrickPipeline::standard(&config),
            evaluator: ScoreEvaluator::new(config.score_factors),
            config,
        }
    }

    /// Generator configured from raw key/value parameters.
    pub fn from_params<I, K, V>(params: I) -> Result<Self, VireoError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        Ok(Self::new(ModelConfig::from_params(params)?))
    }

    /// Replace the detector pipeline.
    pub fn with_tricks(mut self, tricks: TrickPipeline) -> Self {
        self.tricks = tricks;
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Every scored candidate model for one alignment.
    ///
    /// An alignment without fragments is rejected; one whose fragments
    /// form no chain yields no models.
    pub fn generate(&self, alignment: &Arc<Alignment>) -> Result<Vec<Model>, VireoError> {
        let protein = &alignment.protein;
        let _span = debug_span!(
            "generate",
            protein = %protein.id,
            genome = alignment.genome.id()
        )
        .entered();

        if alignment.fragments.is_empty() {
            return Err(ModelError::NoFragments {
                protein: protein.id.clone(),
            }
            .into());
        }

        let config = protein.config.as_ref().unwrap_or(&self.config);
        let chains = FragmentChainBuilder::from_config(config).build(&alignment.fragments);

        let mut models = Vec::new();
        for chain in &chains {
            let model = assemble_model(alignment, chain)?;
            for piece in split_at_gaps(&model, alignment.genome.gaps())? {
                models.extend(
                    self.tricks
                        .apply(piece)
                        .into_iter()
                        .map(|candidate| self.evaluator.evaluate(candidate)),
                );
            }
        }
        debug!(chains = chains.len(), models = models.len(), "generated models");
        Ok(models)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_alignment_is_rejected() {
        let protein = Arc::new(ViralProtein::new("p1", 10));
        let genome = Arc::new(VirusGenome::new("g1", vec![b'A'; 60], Vec::new()).unwrap());
        let alignment = Arc::new(Alignment::new(protein, genome, Vec::new(), 1.0));

        let err = ModelGenerator::new(ModelConfig::default())
            .generate(&alignment)
            .unwrap_err();
        assert!(matches!(err, VireoError::Model(ModelError::NoFragments { .. })));
    }

    #[test]
    fn missing_tolerance_is_a_config_error() {
        let err = ModelGenerator::from_params([("AAOverlapMaximum", "10")]).unwrap_err();
        assert!(matches!(err, VireoError::Config(_)));
    }
}
