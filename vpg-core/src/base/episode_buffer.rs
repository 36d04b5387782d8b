//! Episode buffer interface for on-policy reinforcement learning.
//!
//! Unlike an off-policy replay buffer, an episode buffer holds the transitions
//! of the episode being collected and hands all of them over, in temporal
//! order, once the episode ends. The buffer is empty after each update.
use anyhow::Result;

/// Interface for buffers that store experiences from environments.
pub trait ExperienceBufferBase {
    /// The type of items stored in the buffer.
    type Item;

    /// Pushes a new experience into the buffer.
    fn push(&mut self, tr: Self::Item) -> Result<()>;

    /// Returns the current number of experiences in the buffer.
    fn len(&self) -> usize;

    /// Returns `true` if the buffer holds no experiences.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Interface for buffers that yield whole episodes for training.
pub trait EpisodeBufferBase {
    /// Configuration parameters of the buffer.
    type Config: Clone;

    /// The type of batches generated for training.
    type Batch;

    /// Builds an episode buffer from the given configuration.
    fn build(config: &Self::Config) -> Self;

    /// Takes all stored transitions, in insertion (temporal) order,
    /// and clears the buffer.
    ///
    /// Returns an error if the buffer is empty.
    fn take_episode(&mut self) -> Result<Self::Batch>;

    /// Discards all stored transitions.
    fn clear(&mut self);
}

/// A batch of transitions `(o_t, a_t, o_t+1, r_t, is_terminated_t, is_truncated_t)`.
pub trait TransitionBatch {
    /// A set of observations in a batch.
    type ObsBatch;

    /// A set of actions in a batch.
    type ActBatch;

    /// Unpacks the data
    /// `(o_t, a_t, o_t+1, r_t, is_terminated_t, is_truncated_t)`.
    fn unpack(
        self,
    ) -> (
        Self::ObsBatch,
        Self::ActBatch,
        Self::ObsBatch,
        Vec<f32>,
        Vec<i8>,
        Vec<i8>,
    );

    /// Returns the number of transitions in the batch.
    fn len(&self) -> usize;

    /// Returns `o_t`.
    fn obs(&self) -> &Self::ObsBatch;

    /// Returns `a_t`.
    fn act(&self) -> &Self::ActBatch;
}
