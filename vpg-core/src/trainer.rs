//! Train [`Agent`].
mod config;
mod sampler;

use crate::{
    record::{AggregateRecorder, Record, RecordValue::Scalar},
    Agent, Env, EpisodeBufferBase, Evaluator, ExperienceBufferBase, StepProcessor,
};
use anyhow::Result;
pub use config::TrainerConfig;
use log::info;
pub use sampler::Sampler;

/// Manages the training loop and related objects.
///
/// # Training loop
///
/// 0. Given an agent implementing [`Agent`] and a recorder implementing
///    [`AggregateRecorder`].
/// 1. Initialize the objects used in the training loop, involving instances
///    of [`Env`], [`StepProcessor`] and [`Sampler`], and reset the episode
///    counter: `episodes = 0`.
/// 2. Do an environment step with [`Sampler::sample_and_push`] and push the
///    transition into the episode buffer, implementing
///    [`EpisodeBufferBase`]. Repeat until the episode ends.
/// 3. On the terminal step of an episode:
///     1. Do an optimization step for the agent with the transitions of the
///        finished episode, taken from the episode buffer. The buffer is
///        empty afterwards.
///     2. `episodes += 1`
///     3. If `episodes % eval_interval == 0`, run an evaluation of the
///        agent and record the result as `eval_reward`. If the result is
///        the best so far, parameters are saved in `(model_dir)/best`.
///     4. If `episodes % save_interval == 0`, parameters are saved in
///        `(model_dir)/(episodes)`.
///     5. If `episodes == max_episodes`, flush the recorder and finish the
///        training loop.
/// 4. Back to step 2.
///
/// Between episode boundaries the agent's parameters are never mutated;
/// collecting and updating strictly alternate.
pub struct Trainer {
    /// The maximum number of training episodes.
    max_episodes: usize,

    /// Interval of evaluation in episodes.
    eval_interval: usize,

    /// Interval of flushing records in episodes.
    flush_record_interval: usize,

    /// Interval of recording agent information in episodes.
    record_agent_info_interval: usize,

    /// Interval of recording computational cost in episodes.
    record_compute_cost_interval: usize,

    /// Interval of saving the model in episodes.
    save_interval: usize,

    /// Where to save the trained model.
    model_dir: Option<String>,
}

impl Trainer {
    /// Constructs a trainer.
    pub fn build(config: TrainerConfig) -> Self {
        Self {
            max_episodes: config.max_episodes,
            eval_interval: config.eval_interval,
            flush_record_interval: config.flush_record_interval,
            record_agent_info_interval: config.record_agent_info_interval,
            record_compute_cost_interval: config.record_compute_cost_interval,
            save_interval: config.save_interval,
            model_dir: config.model_dir,
        }
    }

    fn save_model<E, R, A>(agent: &A, model_dir: String)
    where
        E: Env,
        R: EpisodeBufferBase,
        A: Agent<E, R>,
    {
        match agent.save_params(model_dir.as_ref()) {
            Ok(()) => info!("Saved the model in {:?}.", &model_dir),
            Err(_) => info!("Failed to save model in {:?}.", &model_dir),
        }
    }

    fn save_best_model<E, R, A>(agent: &A, model_dir: String)
    where
        E: Env,
        R: EpisodeBufferBase,
        A: Agent<E, R>,
    {
        let model_dir = model_dir + "/best";
        Self::save_model::<E, R, A>(agent, model_dir);
    }

    fn save_model_with_episodes<E, R, A>(agent: &A, model_dir: String, episodes: usize)
    where
        E: Env,
        R: EpisodeBufferBase,
        A: Agent<E, R>,
    {
        let model_dir = model_dir + format!("/{}", episodes).as_str();
        Self::save_model::<E, R, A>(agent, model_dir);
    }

    /// Train the agent.
    pub fn train<E, P, A, R, D>(
        &mut self,
        env: E,
        step_proc: P,
        agent: &mut A,
        buffer: &mut R,
        recorder: &mut Box<dyn AggregateRecorder>,
        evaluator: &mut D,
    ) -> Result<()>
    where
        E: Env,
        P: StepProcessor<E>,
        A: Agent<E, R>,
        R: EpisodeBufferBase + ExperienceBufferBase<Item = P::Output>,
        D: Evaluator<E, A>,
    {
        let mut sampler = Sampler::new(env, step_proc);
        let mut max_eval_reward = f32::MIN;
        let mut episodes: usize = 0;
        sampler.reset_fps_counter();
        agent.train();

        loop {
            let (mut record, is_done) = sampler.sample_and_push(agent, buffer)?;

            if is_done {
                // One optimization step per finished episode. The episode
                // buffer is drained by the agent.
                let record_agent = if (episodes + 1) % self.record_agent_info_interval == 0 {
                    agent.opt_with_record(buffer)?
                } else {
                    agent.opt(buffer)?;
                    Record::empty()
                };
                record = record.merge(record_agent);
                episodes += 1;
                record.insert("episode", Scalar(episodes as f32));

                if episodes % self.record_compute_cost_interval == 0 {
                    record.insert("fps", Scalar(sampler.fps()));
                    sampler.reset_fps_counter();
                }

                // Evaluation
                if episodes % self.eval_interval == 0 {
                    info!("Starts evaluation of the trained model");
                    agent.eval();
                    let eval_reward = evaluator.evaluate(agent)?;
                    agent.train();
                    record.insert("eval_reward", Scalar(eval_reward));

                    // Save the best model up to the current episode
                    if eval_reward > max_eval_reward {
                        max_eval_reward = eval_reward;
                        if let Some(model_dir) = self.model_dir.as_ref() {
                            Self::save_best_model::<E, R, A>(agent, model_dir.clone())
                        }
                    }
                };

                // Save the current model
                if (self.save_interval > 0) && (episodes % self.save_interval == 0) {
                    if let Some(model_dir) = self.model_dir.as_ref() {
                        Self::save_model_with_episodes::<E, R, A>(agent, model_dir.clone(), episodes);
                    }
                }
            }

            // Store record to the recorder
            if !record.is_empty() {
                recorder.store(record);
            }

            // Flush records
            if is_done && (episodes % self.flush_record_interval == 0) {
                recorder.flush(episodes as _);
            }

            // End loop
            if is_done && episodes == self.max_episodes {
                recorder.flush(episodes as _);
                break;
            }
        }

        Ok(())
    }
}
