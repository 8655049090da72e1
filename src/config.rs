//! Typed configuration for model generation.
//!
//! Parameters arrive from the outside as string key/value pairs (the keys
//! listed on [`ConfigParameter`]); [`ModelConfig::from_params`] validates
//! them once so every stage works with plain numbers.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// Default maximum protein overlap between chained fragments, in residues.
pub const DEFAULT_AA_OVERLAP_MAX: u32 = 10;
/// Default maximum genome overlap between chained fragments, in bases.
pub const DEFAULT_NT_OVERLAP_MAX: u32 = 30;
/// Default distance around an exon junction searched for viral tricks.
pub const DEFAULT_JUNCTION_WINDOW: u32 = 20;

/// Errors raised while reading configuration parameters.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A required parameter was not supplied.
    #[error("missing required parameter {0}")]
    Missing(ConfigParameter),

    /// A parameter value could not be parsed as a number.
    #[error("parameter {parameter} is not numeric: {value:?}")]
    NotNumeric {
        /// Offending parameter.
        parameter: ConfigParameter,
        /// Raw value.
        value: String,
    },

    /// A score factor was negative.
    #[error("parameter {parameter} must not be negative (got {value})")]
    Negative {
        /// Offending parameter.
        parameter: ConfigParameter,
        /// Parsed value.
        value: f64,
    },
}

/// Named parameters understood by [`ModelConfig::from_params`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigParameter {
    /// Maximum protein overlap between chained fragments (required).
    AaOverlapMaximum,
    /// Maximum genome overlap between chained fragments (required).
    NtOverlapMaximum,
    /// Window around exon junctions searched by the detectors.
    JunctionWindow,
    /// Weight of the alignment score.
    ScoreFactorAlignment,
    /// Weight of the start-codon score.
    ScoreFactorStart,
    /// Weight of the splicing score.
    ScoreFactorSplicing,
    /// Weight of the stop-codon score.
    ScoreFactorStop,
    /// Weight of the leaky-stop score.
    ScoreFactorLeakyStop,
}

impl ConfigParameter {
    /// Key under which the parameter is supplied.
    pub fn key(self) -> &'static str {
        match self {
            ConfigParameter::AaOverlapMaximum => "AAOverlapMaximum",
            ConfigParameter::NtOverlapMaximum => "NTOverlapMaximum",
            ConfigParameter::JunctionWindow => "JunctionWindow",
            ConfigParameter::ScoreFactorAlignment => "ScoreFactorAlignment",
            ConfigParameter::ScoreFactorStart => "ScoreFactorStart",
            ConfigParameter::ScoreFactorSplicing => "ScoreFactorSplicing",
            ConfigParameter::ScoreFactorStop => "ScoreFactorStop",
            ConfigParameter::ScoreFactorLeakyStop => "ScoreFactorLeakyStop",
        }
    }
}

impl fmt::Display for ConfigParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Weights applied to score components. Every factor defaults to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScoreFactors {
    /// Weight of `alignmentScore`.
    pub alignment: f64,
    /// Weight of `startCodonScore`.
    pub start: f64,
    /// Weight of `spliceScore`.
    pub splicing: f64,
    /// Weight of `stopCodonScore`.
    pub stop: f64,
    /// Weight of `leakyStopScore`.
    pub leaky_stop: f64,
}

impl Default for ScoreFactors {
    fn default() -> Self {
        Self {
            alignment: 1.0,
            start: 1.0,
            splicing: 1.0,
            stop: 1.0,
            leaky_stop: 1.0,
        }
    }
}

/// Configuration for chaining, adjustment and scoring.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ModelConfig {
    /// Maximum protein overlap between adjacent chained fragments.
    pub aa_overlap_max: u32,
    /// Maximum genome overlap between adjacent chained fragments.
    pub nt_overlap_max: u32,
    /// Bases searched on either side of an exon junction by the detectors.
    pub junction_window: u32,
    /// Score weights.
    pub score_factors: ScoreFactors,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            aa_overlap_max: DEFAULT_AA_OVERLAP_MAX,
            nt_overlap_max: DEFAULT_NT_OVERLAP_MAX,
            junction_window: DEFAULT_JUNCTION_WINDOW,
            score_factors: ScoreFactors::default(),
        }
    }
}

impl ModelConfig {
    /// Set both overlap tolerances.
    pub fn with_overlap_tolerances(mut self, aa_overlap_max: u32, nt_overlap_max: u32) -> Self {
        self.aa_overlap_max = aa_overlap_max;
        self.nt_overlap_max = nt_overlap_max;
        self
    }

    /// Set the junction search window.
    pub fn with_junction_window(mut self, junction_window: u32) -> Self {
        self.junction_window = junction_window;
        self
    }

    /// Set the score weights.
    pub fn with_score_factors(mut self, score_factors: ScoreFactors) -> Self {
        self.score_factors = score_factors;
        self
    }

    /// Parse raw key/value parameters.
    ///
    /// Both overlap tolerances are required; the junction window and the
    /// score factors fall back to their defaults. Unknown keys are ignored.
    pub fn from_params<I, K, V>(params: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let params: HashMap<String, String> = params
            .into_iter()
            .map(|(key, value)| (key.as_ref().to_string(), value.as_ref().trim().to_string()))
            .collect();
        let raw = |parameter: ConfigParameter| params.get(parameter.key()).map(String::as_str);

        let count = |parameter: ConfigParameter| -> Result<Option<u32>, ConfigError> {
            raw(parameter)
                .map(|value| {
                    value.parse::<u32>().map_err(|_| ConfigError::NotNumeric {
                        parameter,
                        value: value.to_string(),
                    })
                })
                .transpose()
        };
        let factor = |parameter: ConfigParameter| -> Result<f64, ConfigError> {
            let Some(value) = raw(parameter) else {
                return Ok(1.0);
            };
            let parsed = value
                .parse::<f64>()
                .ok()
                .filter(|parsed| parsed.is_finite())
                .ok_or_else(|| ConfigError::NotNumeric {
                    parameter,
                    value: value.to_string(),
                })?;
            if parsed < 0.0 {
                return Err(ConfigError::Negative {
                    parameter,
                    value: parsed,
                });
            }
            Ok(parsed)
        };

        let aa_overlap_max = count(ConfigParameter::AaOverlapMaximum)?
            .ok_or(ConfigError::Missing(ConfigParameter::AaOverlapMaximum))?;
        let nt_overlap_max = count(ConfigParameter::NtOverlapMaximum)?
            .ok_or(ConfigError::Missing(ConfigParameter::NtOverlapMaximum))?;
        let junction_window =
            count(ConfigParameter::JunctionWindow)?.unwrap_or(DEFAULT_JUNCTION_WINDOW);

        Ok(Self {
            aa_overlap_max,
            nt_overlap_max,
            junction_window,
            score_factors: ScoreFactors {
                alignment: factor(ConfigParameter::ScoreFactorAlignment)?,
                start: factor(ConfigParameter::ScoreFactorStart)?,
                splicing: factor(ConfigParameter::ScoreFactorSplicing)?,
                stop: factor(ConfigParameter::ScoreFactorStop)?,
                leaky_stop: factor(ConfigParameter::ScoreFactorLeakyStop)?,
            },
        })
    }
}
