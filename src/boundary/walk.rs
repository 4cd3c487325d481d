//! Random walk along the decision boundary toward the original input
//!
//! Every round makes two moves. The orthogonal step samples `sample_size`
//! points on the sphere around the original input that passes through the
//! current sample, which explores the boundary without changing the distance.
//! The source step then moves the surviving points a fraction `epsilon` of
//! the way to the original. Each step size is shrunk when fewer than 20% of
//! its candidates stay adversarial and grown when more than 50% do.
use crate::boundary::{check_clip_values, Goal};
use crate::classifier::Classifier;
use crate::config::AttackConfig;
use crate::error::AttackError;
use crate::util::{clip_inplace, dot, l2_distance, l2_norm};
use crate::Element;
use log::debug;
use ndarray::{stack, ArrayD, ArrayViewD, Axis};
use ordered_float::OrderedFloat;
use rand::Rng;

/// Success fraction under which a step size is multiplied by `step_adapt`
const SHRINK_BELOW: f64 = 0.2;
/// Success fraction above which a step size is divided by `step_adapt`
const GROW_ABOVE: f64 = 0.5;

/// Per-example state of the walk.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchState<A> {
    pub current: ArrayD<A>,
    pub delta: A,
    pub epsilon: A,
}

/// What a round of the walk did to the current sample
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Moved to an adversarial point closer to the original
    SourceStep,
    /// Only the orthogonal step kept a candidate adversarial; moved to it
    OrthogonalStep,
    /// No candidate stayed adversarial, the sample is unchanged
    Rejected,
    /// The current sample coincides with the original
    Converged,
}

pub struct BoundaryWalker<'a, A: Element, C: ?Sized> {
    classifier: &'a C,
    original: ArrayViewD<'a, A>,
    goal: Goal,
    clip_values: (A, A),
    sample_size: usize,
    step_adapt: A,
    state: SearchState<A>,
}

impl<'a, A, C> BoundaryWalker<'a, A, C>
where
    A: Element,
    C: Classifier<A> + ?Sized,
{
    /// # Errors
    /// If `initial_sample` and `original` differ in shape or the classifier's
    /// clip values are invalid.
    pub fn new(
        classifier: &'a C,
        initial_sample: ArrayD<A>,
        original: ArrayViewD<'a, A>,
        goal: Goal,
        config: &AttackConfig,
    ) -> Result<Self, AttackError> {
        if initial_sample.shape() != original.shape() {
            return Err(AttackError::ShapeMismatch {
                expected: original.shape().to_vec(),
                found: initial_sample.shape().to_vec(),
            });
        }
        let clip_values = classifier.clip_values();
        check_clip_values(clip_values.0, clip_values.1)?;
        let state = SearchState {
            current: initial_sample,
            delta: A::from_f64_lossy(config.delta()),
            epsilon: A::from_f64_lossy(config.epsilon()),
        };
        Ok(Self {
            classifier,
            original,
            goal,
            clip_values,
            sample_size: config.sample_size(),
            step_adapt: A::from_f64_lossy(config.step_adapt()),
            state,
        })
    }

    pub const fn state(&self) -> &SearchState<A> {
        &self.state
    }

    pub fn distance(&self) -> A {
        l2_distance(&self.state.current.view(), &self.original)
    }

    pub fn into_sample(self) -> ArrayD<A> {
        self.state.current
    }

    /// Performs one round: an orthogonal step, then a step toward the original.
    ///
    /// # Errors
    /// If the classifier fails.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<StepOutcome, AttackError> {
        if !(self.distance() > A::zero()) {
            return Ok(StepOutcome::Converged);
        }
        let (clip_min, clip_max) = self.clip_values;

        let orthogonal: Vec<ArrayD<A>> = (0..self.sample_size)
            .map(|_| {
                let perturb = orthogonal_perturb(
                    self.state.delta,
                    &self.state.current.view(),
                    &self.original,
                    rng,
                );
                let mut candidate = &self.state.current + &perturb;
                clip_inplace(&mut candidate, clip_min, clip_max);
                candidate
            })
            .collect();
        let orthogonal_valid = self.query(&orthogonal)?;
        let delta_ratio = success_ratio(&orthogonal_valid);
        self.state.delta = adapt(self.state.delta, delta_ratio, self.step_adapt);

        let epsilon = self.state.epsilon;
        let stepped: Vec<ArrayD<A>> = {
            let mut starts: Vec<ArrayViewD<A>> = orthogonal
                .iter()
                .zip(&orthogonal_valid)
                .filter(|(_, &valid)| valid)
                .map(|(candidate, _)| candidate.view())
                .collect();
            if starts.is_empty() {
                starts.push(self.state.current.view());
            }
            starts
                .iter()
                .map(|start| {
                    let mut candidate = start + &((&self.original - start) * epsilon);
                    clip_inplace(&mut candidate, clip_min, clip_max);
                    candidate
                })
                .collect()
        };
        let stepped_valid = self.query(&stepped)?;
        let epsilon_ratio = success_ratio(&stepped_valid);
        // A source step longer than 1 would overshoot the original
        self.state.epsilon =
            adapt(self.state.epsilon, epsilon_ratio, self.step_adapt).min(A::one());

        debug!(
            "orthogonal success {:.2}, source success {:.2}, delta {}, epsilon {}",
            delta_ratio, epsilon_ratio, self.state.delta, self.state.epsilon
        );

        if let Some(best) = self.closest(stepped, &stepped_valid) {
            self.state.current = best;
            Ok(StepOutcome::SourceStep)
        } else if let Some(best) = self.closest(orthogonal, &orthogonal_valid) {
            self.state.current = best;
            Ok(StepOutcome::OrthogonalStep)
        } else {
            Ok(StepOutcome::Rejected)
        }
    }

    /// Queries all candidates in one batch, returning which are adversarial.
    fn query(&self, candidates: &[ArrayD<A>]) -> Result<Vec<bool>, AttackError> {
        let views: Vec<ArrayViewD<A>> = candidates.iter().map(ArrayD::view).collect();
        let batch = stack(Axis(0), &views)?;
        let labels = self.classifier.predict_labels(batch.view())?;
        Ok(labels.iter().map(|&l| self.goal.is_adversarial(l)).collect())
    }

    /// Valid candidate nearest to the original, the first one on ties.
    fn closest(&self, candidates: Vec<ArrayD<A>>, valid: &[bool]) -> Option<ArrayD<A>> {
        candidates
            .into_iter()
            .zip(valid)
            .filter(|(_, &valid)| valid)
            .map(|(candidate, _)| candidate)
            .min_by_key(|candidate| {
                OrderedFloat(l2_distance(&candidate.view(), &self.original).into_f64())
            })
    }
}

/// Walks `initial_sample` toward `original_x` for `config.max_iter()` rounds,
/// or until it reaches `original_x`, and returns the last adversarial sample.
///
/// # Errors
/// Mismatched shapes, invalid clip values or a failing classifier. Running out
/// of rounds is not an error.
pub fn walk<'a, A, C, R>(
    classifier: &'a C,
    initial_sample: ArrayD<A>,
    original_x: ArrayViewD<'a, A>,
    goal: Goal,
    config: &AttackConfig,
    rng: &mut R,
) -> Result<ArrayD<A>, AttackError>
where
    A: Element,
    C: Classifier<A> + ?Sized,
    R: Rng + ?Sized,
{
    let mut walker = BoundaryWalker::new(classifier, initial_sample, original_x, goal, config)?;
    for iteration in 0..config.max_iter() {
        if walker.step(rng)? == StepOutcome::Converged {
            debug!("Reached the original input after {} rounds", iteration);
            break;
        }
    }
    Ok(walker.into_sample())
}

/// Random direction perpendicular to `original - current`, scaled to
/// `delta * ||original - current||`.
///
/// When `current == original` there is no source direction and the draw is
/// only rescaled, which yields zero.
pub fn orthogonal_direction<A: Element, R: Rng + ?Sized>(
    delta: A,
    current: &ArrayViewD<A>,
    original: &ArrayViewD<A>,
    rng: &mut R,
) -> ArrayD<A> {
    let source = original - current;
    let distance = l2_norm(&source);
    let mut direction = ArrayD::from_shape_simple_fn(current.raw_dim(), || A::standard_normal(rng));
    if distance > A::zero() {
        let unit = source.mapv(|x| x / distance);
        let along = dot(&direction.view(), &unit.view());
        direction.scaled_add(-along, &unit);
    }
    let norm = l2_norm(&direction);
    if norm > A::zero() {
        let scale = delta * distance / norm;
        direction.mapv_inplace(|x| x * scale);
    }
    direction
}

/// Perturbation moving `current` onto a random point of the sphere centred on
/// `original` that passes through `current`, at angle `atan(delta)`.
pub fn orthogonal_perturb<A: Element, R: Rng + ?Sized>(
    delta: A,
    current: &ArrayViewD<A>,
    original: &ArrayViewD<A>,
    rng: &mut R,
) -> ArrayD<A> {
    let direction = orthogonal_direction(delta, current, original, rng);
    let hypotenuse = (A::one() + delta * delta).sqrt();
    ((current - original) * (A::one() - hypotenuse) + direction) / hypotenuse
}

#[allow(clippy::cast_precision_loss)]
fn success_ratio(valid: &[bool]) -> f64 {
    if valid.is_empty() {
        return 0.;
    }
    valid.iter().filter(|&&v| v).count() as f64 / valid.len() as f64
}

fn adapt<A: Element>(step: A, success_ratio: f64, step_adapt: A) -> A {
    if success_ratio < SHRINK_BELOW {
        step * step_adapt
    } else if success_ratio > GROW_ABOVE {
        step / step_adapt
    } else {
        step
    }
}
