//! Attack configuration
//!
//! `AttackConfig` can only be obtained through validation, either from its
//! defaults or by applying an `AttackParams` override. Deserialization goes
//! through the same path.
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated, immutable parameters of a Boundary Attack run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AttackParams")]
pub struct AttackConfig {
    targeted: bool,
    delta: f64,
    epsilon: f64,
    step_adapt: f64,
    max_iter: usize,
    sample_size: usize,
    init_size: usize,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            targeted: true,
            delta: 0.01,
            epsilon: 0.01,
            step_adapt: 0.9,
            max_iter: 100,
            sample_size: 20,
            init_size: 100,
        }
    }
}

impl AttackConfig {
    /// Returns a copy of `self` with `params` applied.
    ///
    /// # Errors
    /// Any overridden or inherited value outside its domain.
    pub fn update(&self, params: &AttackParams) -> Result<Self, ConfigError> {
        let config = Self {
            targeted: params.targeted.unwrap_or(self.targeted),
            delta: params.delta.unwrap_or(self.delta),
            epsilon: params.epsilon.unwrap_or(self.epsilon),
            step_adapt: params.step_adapt.unwrap_or(self.step_adapt),
            max_iter: params.max_iter.unwrap_or(self.max_iter),
            sample_size: params.sample_size.unwrap_or(self.sample_size),
            init_size: params.init_size.unwrap_or(self.init_size),
        };
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    /// The first parameter found outside its domain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_iter == 0 {
            return Err(ConfigError::NonPositiveMaxIter);
        }
        if self.sample_size == 0 {
            return Err(ConfigError::NonPositiveSampleSize);
        }
        if self.init_size == 0 {
            return Err(ConfigError::NonPositiveInitSize);
        }
        // Negated comparisons also reject NaN
        if !(self.epsilon > 0.) {
            return Err(ConfigError::NonPositiveEpsilon(self.epsilon));
        }
        if self.epsilon > 1. {
            return Err(ConfigError::EpsilonAboveOne(self.epsilon));
        }
        if !(self.delta > 0.) {
            return Err(ConfigError::NonPositiveDelta(self.delta));
        }
        if !(self.step_adapt > 0. && self.step_adapt < 1.) {
            return Err(ConfigError::StepAdaptOutOfRange(self.step_adapt));
        }
        Ok(())
    }

    pub const fn targeted(&self) -> bool {
        self.targeted
    }

    pub const fn delta(&self) -> f64 {
        self.delta
    }

    pub const fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub const fn step_adapt(&self) -> f64 {
        self.step_adapt
    }

    pub const fn max_iter(&self) -> usize {
        self.max_iter
    }

    pub const fn sample_size(&self) -> usize {
        self.sample_size
    }

    pub const fn init_size(&self) -> usize {
        self.init_size
    }

    /// Upper bound on classifier queries spent on one example.
    pub const fn query_budget(&self) -> usize {
        self.init_size + self.max_iter * 2 * self.sample_size
    }
}

impl TryFrom<AttackParams> for AttackConfig {
    type Error = ConfigError;

    fn try_from(params: AttackParams) -> Result<Self, Self::Error> {
        Self::default().update(&params)
    }
}

impl fmt::Display for AttackConfig {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "targeted={} delta={} epsilon={} step_adapt={} max_iter={} sample_size={} init_size={}",
            self.targeted,
            self.delta,
            self.epsilon,
            self.step_adapt,
            self.max_iter,
            self.sample_size,
            self.init_size
        )
    }
}

/// Partial override of an `AttackConfig`. Unset fields keep their current value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AttackParams {
    pub targeted: Option<bool>,
    pub delta: Option<f64>,
    pub epsilon: Option<f64>,
    pub step_adapt: Option<f64>,
    pub max_iter: Option<usize>,
    pub sample_size: Option<usize>,
    pub init_size: Option<usize>,
}

impl AttackParams {
    #[must_use]
    pub const fn targeted(mut self, targeted: bool) -> Self {
        self.targeted = Some(targeted);
        self
    }

    #[must_use]
    pub const fn delta(mut self, delta: f64) -> Self {
        self.delta = Some(delta);
        self
    }

    #[must_use]
    pub const fn epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = Some(epsilon);
        self
    }

    #[must_use]
    pub const fn step_adapt(mut self, step_adapt: f64) -> Self {
        self.step_adapt = Some(step_adapt);
        self
    }

    #[must_use]
    pub const fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = Some(max_iter);
        self
    }

    #[must_use]
    pub const fn sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = Some(sample_size);
        self
    }

    #[must_use]
    pub const fn init_size(mut self, init_size: usize) -> Self {
        self.init_size = Some(init_size);
        self
    }
}
