//! Configuration of [`GymEnv`](crate::GymEnv).
use crate::{GymActFilter, GymObsFilter};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use vpg_core::{Act, Obs};

#[derive(Serialize, Deserialize, Debug)]
/// Configuration of [`GymEnv`](crate::GymEnv).
pub struct GymEnvConfig<O, A, OF, AF>
where
    O: Obs,
    A: Act,
    OF: GymObsFilter<O>,
    AF: GymActFilter<A>,
{
    /// Name of the environment, e.g., `CartPole-v1`.
    pub name: String,

    /// Maximum number of steps of an episode. Steps beyond it truncate
    /// the episode.
    pub max_steps: Option<usize>,

    /// Rendering mode of the environment, e.g., `human`.
    pub render_mode: Option<String>,

    /// Wait time at every interaction step, in milliseconds.
    pub wait_in_millis: u64,

    /// Configuration of the observation filter.
    pub obs_filter_config: Option<OF::Config>,

    /// Configuration of the action filter.
    pub act_filter_config: Option<AF::Config>,
}

impl<O, A, OF, AF> Clone for GymEnvConfig<O, A, OF, AF>
where
    O: Obs,
    A: Act,
    OF: GymObsFilter<O>,
    AF: GymActFilter<A>,
{
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            max_steps: self.max_steps,
            render_mode: self.render_mode.clone(),
            wait_in_millis: self.wait_in_millis,
            obs_filter_config: self.obs_filter_config.clone(),
            act_filter_config: self.act_filter_config.clone(),
        }
    }
}

impl<O, A, OF, AF> Default for GymEnvConfig<O, A, OF, AF>
where
    O: Obs,
    A: Act,
    OF: GymObsFilter<O>,
    AF: GymActFilter<A>,
{
    fn default() -> Self {
        Self {
            name: "".to_string(),
            max_steps: None,
            render_mode: None,
            wait_in_millis: 0,
            obs_filter_config: None,
            act_filter_config: None,
        }
    }
}

impl<O, A, OF, AF> GymEnvConfig<O, A, OF, AF>
where
    O: Obs,
    A: Act,
    OF: GymObsFilter<O>,
    AF: GymActFilter<A>,
{
    /// Set the name of the environment.
    pub fn name(mut self, name: String) -> Self {
        self.name = name;
        self
    }

    /// Set the maximum number of steps of an episode.
    pub fn max_steps(mut self, max_steps: Option<usize>) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Set the rendering mode.
    pub fn render_mode(mut self, render_mode: Option<String>) -> Self {
        self.render_mode = render_mode;
        self
    }

    /// Set wait time at every interaction step.
    pub fn set_wait_in_millis(mut self, wait_in_millis: u64) -> Self {
        self.wait_in_millis = wait_in_millis;
        self
    }

    /// Returns the wait time as a [`Duration`].
    pub fn wait(&self) -> Duration {
        Duration::from_millis(self.wait_in_millis)
    }

    /// Set the observation filter config.
    pub fn obs_filter_config(mut self, obs_filter_config: OF::Config) -> Self {
        self.obs_filter_config = Some(obs_filter_config);
        self
    }

    /// Set the action filter config.
    pub fn act_filter_config(mut self, act_filter_config: AF::Config) -> Self {
        self.act_filter_config = Some(act_filter_config);
        self
    }
}
