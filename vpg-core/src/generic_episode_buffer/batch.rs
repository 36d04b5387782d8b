//! Generic implementation of transition batches.
use crate::TransitionBatch;

/// A trait defining basic batch operations.
///
/// This trait provides fundamental operations for managing pre-allocated
/// column storage of observations or actions.
pub trait BatchBase {
    /// Creates a new batch with the specified capacity.
    fn new(capacity: usize) -> Self;

    /// Adds data at the specified index.
    fn push(&mut self, ix: usize, data: Self);

    /// Retrieves samples at the specified indices.
    fn sample(&self, ixs: &Vec<usize>) -> Self;
}

/// A generic structure representing a batch of transitions.
///
/// # Type Parameters
///
/// * `O` - Observation type, must implement [`BatchBase`]
/// * `A` - Action type, must implement [`BatchBase`]
pub struct GenericTransitionBatch<O, A>
where
    O: BatchBase,
    A: BatchBase,
{
    /// Current observations.
    pub obs: O,

    /// Selected actions.
    pub act: A,

    /// Next state observations.
    pub next_obs: O,

    /// Transition rewards.
    pub reward: Vec<f32>,

    /// Episode termination flags.
    pub is_terminated: Vec<i8>,

    /// Episode truncation flags.
    pub is_truncated: Vec<i8>,
}

impl<O, A> TransitionBatch for GenericTransitionBatch<O, A>
where
    O: BatchBase,
    A: BatchBase,
{
    type ObsBatch = O;
    type ActBatch = A;

    fn unpack(
        self,
    ) -> (
        Self::ObsBatch,
        Self::ActBatch,
        Self::ObsBatch,
        Vec<f32>,
        Vec<i8>,
        Vec<i8>,
    ) {
        (
            self.obs,
            self.act,
            self.next_obs,
            self.reward,
            self.is_terminated,
            self.is_truncated,
        )
    }

    fn len(&self) -> usize {
        self.reward.len()
    }

    fn obs(&self) -> &Self::ObsBatch {
        &self.obs
    }

    fn act(&self) -> &Self::ActBatch {
        &self.act
    }
}

impl<O, A> GenericTransitionBatch<O, A>
where
    O: BatchBase,
    A: BatchBase,
{
    /// Creates a new batch with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            obs: O::new(capacity),
            act: A::new(capacity),
            next_obs: O::new(capacity),
            reward: Vec::with_capacity(capacity),
            is_terminated: Vec::with_capacity(capacity),
            is_truncated: Vec::with_capacity(capacity),
        }
    }
}
