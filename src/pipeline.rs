//! Per-genome and batch model generation.
//!
//! A genome record bundles one genome with every alignment reported
//! against it. Alignments of the same protein are merged first; a failing
//! alignment is logged and skipped without affecting the rest of the
//! record, and records are processed in parallel.

use std::sync::Arc;

use rayon::prelude::*;
use tracing::{info, info_span, warn};

use crate::assembly::merge_identical_protein_alignments;
use crate::model::{Alignment, Model, VirusGenome};
use crate::ModelGenerator;

/// One genome and the protein alignments reported against it.
#[derive(Debug, Clone)]
pub struct GenomeRecord {
    /// Target genome.
    pub genome: Arc<VirusGenome>,
    /// Alignments against `genome`, possibly several per protein.
    pub alignments: Vec<Alignment>,
}

impl GenomeRecord {
    /// Record for `genome` with no alignments yet.
    pub fn new(genome: Arc<VirusGenome>) -> Self {
        Self {
            genome,
            alignments: Vec::new(),
        }
    }

    /// Add an alignment.
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignments.push(alignment);
        self
    }
}

/// Models generated for one genome record.
#[derive(Debug, Clone)]
pub struct RecordModels {
    /// Genome identifier.
    pub genome_id: String,
    /// Scored candidate models, grouped by protein in input order.
    pub models: Vec<Model>,
    /// Proteins whose alignment failed, with the reason.
    pub skipped: Vec<(String, String)>,
}

impl ModelGenerator {
    /// Models for every protein aligned against one genome.
    pub fn generate_for_genome(&self, record: &GenomeRecord) -> RecordModels {
        let genome_id = record.genome.id().to_string();
        let _span = info_span!("genome", genome = %genome_id).entered();

        let mut models = Vec::new();
        let mut skipped = Vec::new();
        for alignment in merge_identical_protein_alignments(record.alignments.clone()) {
            let alignment = Arc::new(alignment);
            match self.generate(&alignment) {
                Ok(generated) => models.extend(generated),
                Err(err) => {
                    warn!(protein = %alignment.protein.id, error = %err, "skipping alignment");
                    skipped.push((alignment.protein.id.clone(), err.to_string()));
                }
            }
        }

        info!(models = models.len(), skipped = skipped.len(), "genome processed");
        RecordModels {
            genome_id,
            models,
            skipped,
        }
    }

    /// Process independent genome records in parallel, one result each, in
    /// input order.
    pub fn generate_batch(&self, records: &[GenomeRecord]) -> Vec<RecordModels> {
        records
            .par_iter()
            .map(|record| self.generate_for_genome(record))
            .collect()
    }
}
