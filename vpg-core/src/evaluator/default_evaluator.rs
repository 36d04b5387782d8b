//! Default implementation of the [`Evaluator`] trait.
use super::Evaluator;
use crate::{Env, Policy};
use anyhow::Result;
use std::marker::PhantomData;

/// A default implementation of the [`Evaluator`] trait.
///
/// This evaluator runs a fixed number of episodes and calculates the average
/// return (cumulative reward) across all episodes. Each episode resets the
/// environment with the episode index, so that evaluation conditions are
/// reproducible.
pub struct DefaultEvaluator<E: Env, P: Policy<E>> {
    /// The number of episodes to run during evaluation.
    n_episodes: usize,

    /// The environment instance used for evaluation.
    env: E,

    phantom: PhantomData<P>,
}

impl<E: Env, P: Policy<E>> Evaluator<E, P> for DefaultEvaluator<E, P> {
    fn evaluate(&mut self, policy: &mut P) -> Result<f32> {
        let mut r_total = 0f32;

        for ix in 0..self.n_episodes {
            let mut prev_obs = self.env.reset_with_index(ix)?;

            loop {
                let act = policy.sample(&prev_obs);
                let (step, _) = self.env.step(&act);
                r_total += step.reward[0];
                if step.is_done() {
                    break;
                }
                prev_obs = step.obs;
            }
        }

        Ok(r_total / self.n_episodes as f32)
    }
}

impl<E: Env, P: Policy<E>> DefaultEvaluator<E, P> {
    /// Constructs a [`DefaultEvaluator`] running `n_episodes` episodes.
    pub fn new(env: E, n_episodes: usize) -> Result<Self> {
        Ok(Self {
            n_episodes,
            env,
            phantom: PhantomData,
        })
    }
}
