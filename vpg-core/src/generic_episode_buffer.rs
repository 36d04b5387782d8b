//! Generic implementation of episode buffers for on-policy training.
//!
//! This module provides an episode buffer that can store transitions of
//! arbitrary observation and action types:
//!
//! - [`SimpleEpisodeBuffer`]: a generic episode buffer implementation
//! - [`GenericTransitionBatch`]: a generic batch structure for transitions
//! - [`SimpleStepProcessor`]: a processor for converting environment steps
//!   to transitions
//!
//! Transitions are stored in insertion order and consumed as a single batch
//! covering the whole episode; there is no random sampling.
mod base;
mod batch;
mod config;
mod step_proc;
pub use base::SimpleEpisodeBuffer;
pub use batch::{BatchBase, GenericTransitionBatch};
pub use config::SimpleEpisodeBufferConfig;
pub use step_proc::{SimpleStepProcessor, SimpleStepProcessorConfig};
