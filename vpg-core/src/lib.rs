#![warn(missing_docs)]
//! Core components for policy-gradient reinforcement learning.
pub mod error;
pub mod generic_episode_buffer;
pub mod record;
pub mod util;

mod base;
pub use base::{
    Act, Agent, Configurable, Env, EpisodeBufferBase, ExperienceBufferBase, Info, Obs, Policy,
    Step, StepProcessor, TransitionBatch,
};

mod baseline;
pub use baseline::BaselineWindow;

mod returns;
pub use returns::discounted_returns;

mod evaluator;
pub use evaluator::{DefaultEvaluator, Evaluator};

mod trainer;
pub use trainer::{Sampler, Trainer, TrainerConfig};
