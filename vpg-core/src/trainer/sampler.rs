//! Sampling of experiences from the environment.
use crate::{
    record::{Record, RecordValue::Scalar},
    Env, ExperienceBufferBase, Policy, StepProcessor,
};
use anyhow::Result;
use std::time::SystemTime;

/// Manages the sampling of experiences from the environment.
///
/// This struct handles the interaction between the policy and environment,
/// processes the resulting steps into transitions, and pushes them into an
/// episode buffer. It also tracks the return and length of the episode being
/// collected.
pub struct Sampler<E, P>
where
    E: Env,
    P: StepProcessor<E>,
{
    /// The environment being sampled from.
    env: E,

    /// Previous observation from the environment.
    prev_obs: Option<E::Obs>,

    /// Processor for converting steps into transitions.
    step_processor: P,

    /// Cumulative reward of the episode being collected.
    r_total: f32,

    /// Length of the episode being collected.
    episode_len: usize,

    /// Environment steps since the frame counter was reset.
    n_frames: usize,

    /// Timer for frames per second.
    time: SystemTime,
}

impl<E, P> Sampler<E, P>
where
    E: Env,
    P: StepProcessor<E>,
{
    /// Creates a new sampler with the given environment and step processor.
    pub fn new(env: E, step_processor: P) -> Self {
        Self {
            env,
            prev_obs: None,
            step_processor,
            r_total: 0.,
            episode_len: 0,
            n_frames: 0,
            time: SystemTime::now(),
        }
    }

    /// Samples a transition and pushes it into the episode buffer.
    ///
    /// The second return value tells if the episode ended at this step.
    /// When it did, the returned record contains `episode_return` and
    /// `episode_len`.
    pub fn sample_and_push<A, R>(
        &mut self,
        policy: &mut A,
        buffer: &mut R,
    ) -> Result<(Record, bool)>
    where
        A: Policy<E>,
        R: ExperienceBufferBase<Item = P::Output>,
    {
        // Reset the environment at the beginning of the run.
        if self.prev_obs.is_none() {
            self.prev_obs = Some(self.env.reset(None)?);
            self.step_processor
                .reset(self.prev_obs.as_ref().unwrap().clone());
        }

        // Sample an action and apply it to the environment.
        let (step, mut record) = {
            let act = policy.sample(self.prev_obs.as_ref().unwrap());
            self.env.step_with_reset(&act)
        };
        let is_done = step.is_done();

        self.r_total += step.reward[0];
        self.episode_len += 1;
        self.n_frames += 1;

        // Update the previous observation.
        self.prev_obs = match is_done {
            true => Some(step.init_obs.clone().expect("Failed to unwrap init_obs")),
            false => Some(step.obs.clone()),
        };

        // Produce and push the transition.
        let transition = self.step_processor.process(step);
        buffer.push(transition)?;

        if is_done {
            self.step_processor
                .reset(self.prev_obs.as_ref().unwrap().clone());
            record.insert("episode_return", Scalar(self.r_total));
            record.insert("episode_len", Scalar(self.episode_len as f32));
            self.r_total = 0.;
            self.episode_len = 0;
        }

        Ok((record, is_done))
    }

    /// Returns frames per second, including the time for taking actions,
    /// applying them to the environment and processing steps.
    pub fn fps(&self) -> f32 {
        let elapsed = self.time.elapsed();
        match elapsed {
            Ok(elapsed) => self.n_frames as f32 / elapsed.as_millis() as f32 * 1000.,
            Err(_) => 0.,
        }
    }

    /// Resets the frame counter and the timer.
    pub fn reset_fps_counter(&mut self) {
        self.n_frames = 0;
        self.time = SystemTime::now();
    }
}
