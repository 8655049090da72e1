//! Weighted total score over a model's score components.

use tracing::debug;

use crate::config::ScoreFactors;
use crate::model::{Model, ScoreComponent};

/// Combines the five weighted score components into `totalScore`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreEvaluator {
    factors: ScoreFactors,
}

impl ScoreEvaluator {
    /// Evaluator using `factors` unless a protein carries its own.
    pub fn new(factors: ScoreFactors) -> Self {
        Self { factors }
    }

    /// Factors this evaluator falls back to.
    pub fn factors(&self) -> &ScoreFactors {
        &self.factors
    }

    /// Score `model` and hand it back.
    pub fn evaluate(&self, mut model: Model) -> Model {
        self.evaluate_in_place(&mut model);
        model
    }

    /// Weight every component, write absent ones as 0 and store the total.
    pub fn evaluate_in_place(&self, model: &mut Model) {
        let factors = model
            .alignment
            .protein
            .config
            .as_ref()
            .map_or(self.factors, |config| config.score_factors);

        let mut total = 0.0;
        for component in ScoreComponent::WEIGHTED {
            let weighted = model.score(component).unwrap_or(0.0) * factor(&factors, component);
            model.scores.insert(component, weighted);
            total += weighted;
        }
        model.scores.insert(ScoreComponent::Total, total);
        debug!(protein = %model.alignment.protein.id, total, "scored model");
    }
}

fn factor(factors: &ScoreFactors, component: ScoreComponent) -> f64 {
    match component {
        ScoreComponent::Alignment => factors.alignment,
        ScoreComponent::StartCodon => factors.start,
        ScoreComponent::LeakyStop => factors.leaky_stop,
        ScoreComponent::Splice => factors.splicing,
        ScoreComponent::StopCodon => factors.stop,
        ScoreComponent::Total => 1.0,
    }
}
