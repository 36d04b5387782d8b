//! Generic implementation of step processing.
use super::{BatchBase, GenericTransitionBatch};
use crate::{Env, Obs, StepProcessor};
use std::{default::Default, marker::PhantomData};

/// Configuration of [`SimpleStepProcessor`].
#[derive(Clone, Debug)]
pub struct SimpleStepProcessorConfig {}

impl Default for SimpleStepProcessorConfig {
    fn default() -> Self {
        Self {}
    }
}

/// A generic implementation of the [`StepProcessor`] trait.
///
/// This processor converts an environment step into a transition
/// `(o_t, a_t, o_t+1, r_t)` by keeping the previous observation `o_t`
/// between calls. It supports non-vectorized environments, meaning that
/// each step contains exactly one observation.
pub struct SimpleStepProcessor<E, O, A> {
    /// The previous observation, used to construct transitions.
    prev_obs: Option<O>,
    phantom: PhantomData<(E, A)>,
}

impl<E, O, A> StepProcessor<E> for SimpleStepProcessor<E, O, A>
where
    E: Env,
    O: BatchBase + From<E::Obs>,
    A: BatchBase + From<E::Act>,
{
    type Config = SimpleStepProcessorConfig;
    type Output = GenericTransitionBatch<O, A>;

    fn build(_config: &Self::Config) -> Self {
        Self {
            prev_obs: None,
            phantom: PhantomData,
        }
    }

    /// Resets the processor with an initial observation.
    ///
    /// This method must be called before processing any steps of a new
    /// episode.
    fn reset(&mut self, init_obs: E::Obs) {
        self.prev_obs = Some(init_obs.into());
    }

    /// Processes a [`Step`](crate::Step) object into a transition.
    ///
    /// # Panics
    ///
    /// Panics if `reset()` has not been called before, if the step contains
    /// more than one observation, or if the step is terminal but does not
    /// contain an initial observation of the next episode.
    fn process(&mut self, step: crate::Step<E>) -> Self::Output {
        assert_eq!(step.obs.len(), 1);

        if self.prev_obs.is_none() {
            panic!("prev_obs is not set. Forgot to call reset()?");
        }

        let is_done = step.is_done();
        let next_obs = step.obs.clone().into();
        let obs = self.prev_obs.replace(step.obs.into()).unwrap();
        let act = step.act.into();

        if is_done {
            self.prev_obs
                .replace(step.init_obs.expect("Failed to unwrap init_obs").into());
        }

        GenericTransitionBatch {
            obs,
            act,
            next_obs,
            reward: step.reward,
            is_terminated: step.is_terminated,
            is_truncated: step.is_truncated,
        }
    }
}
