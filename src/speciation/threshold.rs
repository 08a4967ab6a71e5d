//! Adaptive compatibility threshold.
//!
//! [`ThresholdController`] closes the loop between the realised specie
//! count and the compatibility threshold: too many species raise the
//! threshold (merge), too few lower it (split).
//!
//! # Damping
//!
//! A proportional controller with a fixed step tends to hunt around the
//! target when the specie count responds with a lag. The stateful
//! [`update`](ThresholdController::update) path shrinks its step scale by
//! `damping` whenever the error changes sign and relaxes it back toward 1
//! while the error keeps its sign.

use std::cmp::Ordering;

use log::{debug, warn};

use super::config::ThresholdConfig;
use super::error::{Result, SpeciationError};

/// Lower limit of the damped step scale. Keeps every non-zero error
/// producing a strictly non-zero move.
const MIN_STEP_SCALE: f64 = 1e-3;

/// Steers the compatibility threshold toward a target specie count.
///
/// # Examples
///
/// ```
/// use neat_speciation::speciation::{ThresholdConfig, ThresholdController};
///
/// let mut ctl = ThresholdController::new(
///     ThresholdConfig::default().with_target_specie_count(10),
/// ).unwrap();
/// let start = ctl.threshold();
/// let raised = ctl.update(25);
/// assert!(raised > start);
/// ```
#[derive(Debug, Clone)]
pub struct ThresholdController {
    config: ThresholdConfig,
    threshold: f64,
    step_scale: f64,
    last_error: Ordering,
}

impl ThresholdController {
    /// Creates a controller starting at `config.initial_threshold`.
    ///
    /// # Errors
    /// [`SpeciationError::InvalidConfig`](super::SpeciationError::InvalidConfig)
    /// if the configuration does not validate.
    pub fn new(config: ThresholdConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            threshold: config.initial_threshold,
            config,
            step_scale: 1.0,
            last_error: Ordering::Equal,
        })
    }

    /// Current threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Configured target specie count.
    pub fn target(&self) -> usize {
        self.config.target_specie_count
    }

    pub fn config(&self) -> &ThresholdConfig {
        &self.config
    }

    /// Next threshold for an explicit state, without damping.
    ///
    /// - `realized > target`: strictly greater than `current`, capped at
    ///   `max_threshold`
    /// - `realized < target`: strictly less than `current`, floored at
    ///   `min_threshold`
    /// - `realized == target`: `current` unchanged
    ///
    /// # Errors
    /// [`SpeciationError::InvalidConfig`] if `target` is 0 or `current` lies
    /// outside `[min_threshold, max_threshold]`.
    pub fn next_threshold(&self, current: f64, realized: usize, target: usize) -> Result<f64> {
        if target == 0 {
            return Err(SpeciationError::InvalidConfig(
                "target specie count must be positive".into(),
            ));
        }
        let (min, max) = (self.config.min_threshold, self.config.max_threshold);
        if !(min..=max).contains(&current) {
            return Err(SpeciationError::InvalidConfig(format!(
                "current threshold {current} outside [{min}, {max}]"
            )));
        }
        Ok(self.step(current, realized, target, 1.0))
    }

    /// Advances one generation using the configured target and the
    /// controller's own threshold, returning the new threshold.
    pub fn update(&mut self, realized: usize) -> f64 {
        let target = self.config.target_specie_count;
        let error = realized.cmp(&target);

        if error != Ordering::Equal {
            if self.last_error != Ordering::Equal && error != self.last_error {
                self.step_scale = (self.step_scale * self.config.damping).max(MIN_STEP_SCALE);
            } else {
                self.step_scale = (self.step_scale / self.config.damping).min(1.0);
            }
            self.last_error = error;
        }

        let previous = self.threshold;
        self.threshold = self.step(previous, realized, target, self.step_scale);
        debug!(
            "threshold {:.4} -> {:.4} (species {}/{}, step scale {:.3})",
            previous, self.threshold, realized, target, self.step_scale
        );

        let pinned = (error == Ordering::Greater && self.threshold >= self.config.max_threshold)
            || (error == Ordering::Less && self.threshold <= self.config.min_threshold);
        if pinned {
            warn!(
                "threshold pinned at {:.4} with {} species against target {}",
                self.threshold, realized, target
            );
        }
        self.threshold
    }

    /// Returns to the initial threshold and undamped step.
    pub fn reset(&mut self) {
        self.threshold = self.config.initial_threshold;
        self.step_scale = 1.0;
        self.last_error = Ordering::Equal;
    }

    fn step(&self, current: f64, realized: usize, target: usize, scale: f64) -> f64 {
        if realized == target {
            return current;
        }
        let target = target as f64;
        let error = (realized as f64 - target) / target;
        let max_step = self.config.max_step;
        let delta = (self.config.gain * error).clamp(-max_step, max_step) * scale;
        (current * (1.0 + delta)).clamp(self.config.min_threshold, self.config.max_threshold)
    }
}
