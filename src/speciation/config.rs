//! Speciation and threshold-control configuration.
//!
//! [`SpeciationConfig`] tunes the clustering pass. [`ThresholdConfig`]
//! holds the parameters of the compatibility-threshold control loop.

use super::error::{Result, SpeciationError};

/// Configuration for [`SpeciationStrategy`](super::SpeciationStrategy).
///
/// # Examples
///
/// ```
/// use neat_speciation::speciation::SpeciationConfig;
///
/// let config = SpeciationConfig::default()
///     .with_tie_tolerance(1e-6)
///     .with_parallel(false);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpeciationConfig {
    /// Distances within this tolerance of the minimum count as ties.
    ///
    /// Ties go to the specie with the lowest id.
    pub tie_tolerance: f64,

    /// Whether to measure distances to carried-forward centroids in
    /// parallel. Only has an effect with the `parallel` feature.
    pub parallel: bool,

    /// Whether [`SpeciationRunner`](super::SpeciationRunner) recenters every
    /// specie right after clustering. When `false` centroids stay at their
    /// seeds until the caller recenters.
    pub eager_recenter: bool,
}

impl Default for SpeciationConfig {
    fn default() -> Self {
        Self {
            tie_tolerance: 1e-9,
            parallel: true,
            eager_recenter: true,
        }
    }
}

impl SpeciationConfig {
    pub fn with_tie_tolerance(mut self, tolerance: f64) -> Self {
        self.tie_tolerance = tolerance;
        self
    }

    /// Enables or disables parallel distance computation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_eager_recenter(mut self, eager: bool) -> Self {
        self.eager_recenter = eager;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// [`SpeciationError::InvalidConfig`] if `tie_tolerance` is negative or
    /// not finite.
    pub fn validate(&self) -> Result<()> {
        if !self.tie_tolerance.is_finite() || self.tie_tolerance < 0.0 {
            return Err(SpeciationError::InvalidConfig(
                "tie_tolerance must be finite and non-negative".into(),
            ));
        }
        Ok(())
    }
}

/// Configuration for [`ThresholdController`](super::ThresholdController).
///
/// Each generation the threshold moves by a factor
/// `1 + clamp(gain * e, -max_step, max_step)` where
/// `e = (realized - target) / target`, then is clamped to
/// `[min_threshold, max_threshold]`.
///
/// # Examples
///
/// ```
/// use neat_speciation::speciation::ThresholdConfig;
///
/// let config = ThresholdConfig::default()
///     .with_target_specie_count(15)
///     .with_bounds(0.1, 20.0)
///     .with_initial_threshold(4.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThresholdConfig {
    /// Number of species the controller steers toward.
    pub target_specie_count: usize,

    /// Threshold used for the first generation.
    pub initial_threshold: f64,

    /// Lower bound. Must be positive.
    pub min_threshold: f64,

    /// Upper bound.
    pub max_threshold: f64,

    /// Proportional gain applied to the relative specie-count error, in `(0, 1)`.
    pub gain: f64,

    /// Largest relative change per generation, in `(0, 1)`.
    pub max_step: f64,

    /// Step-scale multiplier applied when the error changes sign, in `(0, 1]`.
    ///
    /// `1.0` disables damping.
    pub damping: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            target_specie_count: 10,
            initial_threshold: 3.0,
            min_threshold: 0.01,
            max_threshold: 100.0,
            gain: 0.1,
            max_step: 0.2,
            damping: 0.5,
        }
    }
}

impl ThresholdConfig {
    pub fn with_target_specie_count(mut self, n: usize) -> Self {
        self.target_specie_count = n;
        self
    }

    pub fn with_initial_threshold(mut self, t: f64) -> Self {
        self.initial_threshold = t;
        self
    }

    /// Sets both threshold bounds.
    pub fn with_bounds(mut self, min: f64, max: f64) -> Self {
        self.min_threshold = min;
        self.max_threshold = max;
        self
    }

    pub fn with_gain(mut self, gain: f64) -> Self {
        self.gain = gain;
        self
    }

    pub fn with_max_step(mut self, max_step: f64) -> Self {
        self.max_step = max_step;
        self
    }

    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// [`SpeciationError::InvalidConfig`] describing the first bad value.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(SpeciationError::InvalidConfig(msg.into()));

        if self.target_specie_count == 0 {
            return invalid("target_specie_count must be at least 1");
        }
        if !self.min_threshold.is_finite() || self.min_threshold <= 0.0 {
            return invalid("min_threshold must be positive and finite");
        }
        if !self.max_threshold.is_finite() || self.max_threshold <= 0.0 {
            return invalid("max_threshold must be positive and finite");
        }
        if self.min_threshold > self.max_threshold {
            return invalid("min_threshold must not exceed max_threshold");
        }
        if !(self.min_threshold..=self.max_threshold).contains(&self.initial_threshold) {
            return invalid("initial_threshold must lie within [min_threshold, max_threshold]");
        }
        if !(self.gain > 0.0 && self.gain < 1.0) {
            return invalid("gain must be in (0, 1)");
        }
        if !(self.max_step > 0.0 && self.max_step < 1.0) {
            return invalid("max_step must be in (0, 1)");
        }
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return invalid("damping must be in (0, 1]");
        }
        Ok(())
    }
}
