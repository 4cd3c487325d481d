//! Boundary Attack
//!
//! Paper: Brendel, Rauber and Bethge, "Decision-Based Adversarial Attacks:
//! Reliable Attacks Against Black-Box Machine Learning Models" (2018),
//! <https://arxiv.org/abs/1712.04248>
//!
//! Examples of a batch are attacked one after the other, each with its own
//! random generator and `SearchState`. An example whose initialization fails is
//! returned unchanged.
pub mod init;
pub mod walk;

pub use init::{find_initial, InitOutcome};
pub use walk::{walk, BoundaryWalker, SearchState, StepOutcome};

use crate::classifier::Classifier;
use crate::config::{AttackConfig, AttackParams};
use crate::error::{AttackError, ConfigError};
use crate::{Element, Label};
use log::{info, trace};
use ndarray::{ArrayD, ArrayView1, ArrayViewD, Axis, Zip};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Label condition a sample has to meet to count as adversarial
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Goal {
    /// Classified as exactly this label
    Targeted(Label),
    /// Classified as anything but the source's label
    Untargeted { source: Label },
}

impl Goal {
    pub const fn new(target: Option<Label>, predicted: Label) -> Self {
        match target {
            Some(target) => Self::Targeted(target),
            None => Self::Untargeted { source: predicted },
        }
    }

    pub const fn is_adversarial(&self, label: Label) -> bool {
        match *self {
            Self::Targeted(target) => label == target,
            Self::Untargeted { source } => label != source,
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Targeted(target) => write!(f, "targeted (class {})", target),
            Self::Untargeted { source } => write!(f, "untargeted (away from class {})", source),
        }
    }
}

/// What happened to one example of a batch
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExampleOutcome {
    /// An initial adversarial sample was found and walked toward the input
    Refined,
    /// Targeted attack on an input already classified as the target
    AlreadySatisfied,
    /// No initial adversarial sample within `init_size` draws
    InitFailed,
}

#[derive(Clone, Debug)]
pub struct AttackReport<A> {
    /// Same shape as the attacked batch
    pub adversarial: ArrayD<A>,
    pub outcomes: Vec<ExampleOutcome>,
    /// Fraction of examples whose predicted label changed
    pub success_rate: f64,
}

pub struct BoundaryAttack<C> {
    classifier: C,
    config: AttackConfig,
    seed: Option<u64>,
}

impl<C> BoundaryAttack<C> {
    pub const fn new(classifier: C, config: AttackConfig) -> Self {
        Self {
            classifier,
            config,
            seed: None,
        }
    }

    /// # Errors
    /// If `params` yields an invalid configuration.
    pub fn with_params(classifier: C, params: &AttackParams) -> Result<Self, AttackError> {
        Ok(Self::new(classifier, AttackConfig::default().update(params)?))
    }

    /// Example `i` of every batch draws from a generator seeded with `seed + i`.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub const fn config(&self) -> &AttackConfig {
        &self.config
    }

    pub const fn classifier(&self) -> &C {
        &self.classifier
    }

    /// # Errors
    /// If `params` yields an invalid configuration, which leaves the current
    /// one in place.
    pub fn set_params(&mut self, params: &AttackParams) -> Result<(), AttackError> {
        self.config = self.config.update(params)?;
        Ok(())
    }

    fn example_rng(&self, index: usize) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(index as u64)),
            None => StdRng::from_entropy(),
        }
    }
}

impl<C> BoundaryAttack<C> {
    /// Attacks every example along axis 0 of `x`.
    ///
    /// `y` holds one target label per example and is required for a targeted
    /// attack. It is ignored otherwise.
    ///
    /// # Errors
    /// Configuration errors are reported before the classifier is queried.
    /// Otherwise invalid clip values or a failing classifier.
    pub fn generate<A>(
        &self,
        x: ArrayViewD<A>,
        y: Option<ArrayView1<Label>>,
    ) -> Result<ArrayD<A>, AttackError>
    where
        A: Element,
        C: Classifier<A>,
    {
        Ok(self.run(&self.config, x, y)?.adversarial)
    }

    /// `generate` with `params` overriding the stored configuration for this call only.
    ///
    /// # Errors
    /// See `generate`.
    pub fn generate_with<A>(
        &self,
        x: ArrayViewD<A>,
        y: Option<ArrayView1<Label>>,
        params: &AttackParams,
    ) -> Result<ArrayD<A>, AttackError>
    where
        A: Element,
        C: Classifier<A>,
    {
        let config = self.config.update(params)?;
        Ok(self.run(&config, x, y)?.adversarial)
    }

    /// `generate`, also returning per-example outcomes and the success rate.
    ///
    /// # Errors
    /// See `generate`.
    pub fn generate_report<A>(
        &self,
        x: ArrayViewD<A>,
        y: Option<ArrayView1<Label>>,
    ) -> Result<AttackReport<A>, AttackError>
    where
        A: Element,
        C: Classifier<A>,
    {
        self.run(&self.config, x, y)
    }

    #[allow(clippy::cast_precision_loss)]
    fn run<A>(
        &self,
        config: &AttackConfig,
        x: ArrayViewD<A>,
        y: Option<ArrayView1<Label>>,
    ) -> Result<AttackReport<A>, AttackError>
    where
        A: Element,
        C: Classifier<A>,
    {
        if x.ndim() == 0 {
            return Err(AttackError::InvalidBatchRank(0));
        }
        let num_examples = x.len_of(Axis(0));
        let targets = if config.targeted() {
            let y = y.ok_or(ConfigError::MissingTargetLabels)?;
            if y.len() != num_examples {
                return Err(ConfigError::TargetLabelCount {
                    expected: num_examples,
                    found: y.len(),
                }
                .into());
            }
            Some(y)
        } else {
            None
        };
        let clip_values = self.classifier.clip_values();
        check_clip_values(clip_values.0, clip_values.1)?;

        // Prediction from the original inputs
        let preds = self.classifier.predict_labels(x.view())?;

        let mut adversarial = x.to_owned();
        let mut outcomes = Vec::with_capacity(num_examples);
        for (index, mut row) in adversarial.outer_iter_mut().enumerate() {
            let target = targets.as_ref().map(|y| y[index]);
            trace!("attacking example {} with goal {}", index, Goal::new(target, preds[index]));
            let mut rng = self.example_rng(index);
            let original = x.index_axis(Axis(0), index);
            let outcome = match find_initial(
                &self.classifier,
                original.view(),
                target,
                preds[index],
                clip_values,
                config,
                &mut rng,
            )? {
                InitOutcome::Found(initial) => {
                    let goal = Goal::new(target, preds[index]);
                    let adv = walk(&self.classifier, initial, original, goal, config, &mut rng)?;
                    row.assign(&adv);
                    ExampleOutcome::Refined
                }
                InitOutcome::Satisfied => ExampleOutcome::AlreadySatisfied,
                InitOutcome::NotFound => ExampleOutcome::InitFailed,
            };
            outcomes.push(outcome);
        }

        let success_rate = if num_examples == 0 {
            0.
        } else {
            let preds_adv = self.classifier.predict_labels(adversarial.view())?;
            let changed = Zip::from(&preds)
                .and(&preds_adv)
                .fold(0_usize, |acc, a, b| acc + usize::from(a != b));
            changed as f64 / num_examples as f64
        };
        info!(
            "Success rate of Boundary attack: {:.2}%",
            success_rate * 100.
        );

        Ok(AttackReport {
            adversarial,
            outcomes,
            success_rate,
        })
    }
}

pub(crate) fn check_clip_values<A: Element>(min: A, max: A) -> Result<(), AttackError> {
    // Uniform sampling over the box needs a representable width
    if min < max && (max - min).is_finite() {
        Ok(())
    } else {
        Err(AttackError::InvalidClipValues {
            min: min.into_f64(),
            max: max.into_f64(),
        })
    }
}
