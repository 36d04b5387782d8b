//! A generic episode buffer.
use super::{BatchBase, GenericTransitionBatch, SimpleEpisodeBufferConfig};
use crate::{
    error::VpgError, EpisodeBufferBase, ExperienceBufferBase, TransitionBatch,
};
use anyhow::Result;

/// A generic implementation of an episode buffer.
///
/// This buffer stores the transitions of the episode being collected, in
/// temporal order, and yields all of them as a single batch through
/// [`EpisodeBufferBase::take_episode`]. It is strictly on-policy: no random
/// sampling, no retention across updates.
///
/// # Type Parameters
///
/// * `O` - The type of observation columns, must implement [`BatchBase`]
/// * `A` - The type of action columns, must implement [`BatchBase`]
pub struct SimpleEpisodeBuffer<O, A>
where
    O: BatchBase,
    A: BatchBase,
{
    /// Maximum number of transitions that can be stored.
    capacity: usize,

    /// Current number of stored transitions.
    size: usize,

    /// Storage for observations.
    obs: O,

    /// Storage for actions.
    act: A,

    /// Storage for next observations.
    next_obs: O,

    /// Storage for rewards.
    reward: Vec<f32>,

    /// Storage for termination flags.
    is_terminated: Vec<i8>,

    /// Storage for truncation flags.
    is_truncated: Vec<i8>,
}

impl<O, A> SimpleEpisodeBuffer<O, A>
where
    O: BatchBase,
    A: BatchBase,
{
    /// Returns the sum of all rewards in the buffer.
    pub fn sum_rewards(&self) -> f32 {
        self.reward[..self.size].iter().sum()
    }
}

impl<O, A> ExperienceBufferBase for SimpleEpisodeBuffer<O, A>
where
    O: BatchBase,
    A: BatchBase,
{
    type Item = GenericTransitionBatch<O, A>;

    fn len(&self) -> usize {
        self.size
    }

    /// Appends a transition at the tail of the buffer.
    ///
    /// Returns an error if the episode exceeds the configured capacity.
    fn push(&mut self, tr: Self::Item) -> Result<()> {
        let len = tr.len();
        if self.size + len > self.capacity {
            return Err(VpgError::EpisodeBufferOverflow(self.capacity).into());
        }

        let (obs, act, next_obs, reward, is_terminated, is_truncated) = tr.unpack();
        self.obs.push(self.size, obs);
        self.act.push(self.size, act);
        self.next_obs.push(self.size, next_obs);
        for (i, r) in reward.iter().enumerate() {
            self.reward[self.size + i] = *r;
        }
        for (i, t) in is_terminated.iter().enumerate() {
            self.is_terminated[self.size + i] = *t;
        }
        for (i, t) in is_truncated.iter().enumerate() {
            self.is_truncated[self.size + i] = *t;
        }
        self.size += len;

        Ok(())
    }
}

impl<O, A> EpisodeBufferBase for SimpleEpisodeBuffer<O, A>
where
    O: BatchBase,
    A: BatchBase,
{
    type Config = SimpleEpisodeBufferConfig;
    type Batch = GenericTransitionBatch<O, A>;

    fn build(config: &Self::Config) -> Self {
        let capacity = config.capacity;

        Self {
            capacity,
            size: 0,
            obs: O::new(capacity),
            act: A::new(capacity),
            next_obs: O::new(capacity),
            reward: vec![0.; capacity],
            is_terminated: vec![0; capacity],
            is_truncated: vec![0; capacity],
        }
    }

    /// Takes all transitions in temporal order and clears the buffer.
    fn take_episode(&mut self) -> Result<Self::Batch> {
        if self.size == 0 {
            return Err(VpgError::EmptyEpisodeBuffer.into());
        }

        let ixs = (0..self.size).collect::<Vec<_>>();
        let batch = GenericTransitionBatch {
            obs: self.obs.sample(&ixs),
            act: self.act.sample(&ixs),
            next_obs: self.next_obs.sample(&ixs),
            reward: self.reward[..self.size].to_vec(),
            is_terminated: self.is_terminated[..self.size].to_vec(),
            is_truncated: self.is_truncated[..self.size].to_vec(),
        };
        self.clear();

        Ok(batch)
    }

    fn clear(&mut self) {
        self.size = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Column of scalar observations, for tests.
    struct VecBatch(Vec<f32>);

    impl BatchBase for VecBatch {
        fn new(capacity: usize) -> Self {
            Self(vec![0.; capacity])
        }

        fn push(&mut self, ix: usize, data: Self) {
            for (i, v) in data.0.iter().enumerate() {
                self.0[ix + i] = *v;
            }
        }

        fn sample(&self, ixs: &Vec<usize>) -> Self {
            Self(ixs.iter().map(|ix| self.0[*ix]).collect())
        }
    }

    fn transition(obs: f32, act: f32, reward: f32, done: i8) -> GenericTransitionBatch<VecBatch, VecBatch> {
        GenericTransitionBatch {
            obs: VecBatch(vec![obs]),
            act: VecBatch(vec![act]),
            next_obs: VecBatch(vec![obs + 1.]),
            reward: vec![reward],
            is_terminated: vec![done],
            is_truncated: vec![0],
        }
    }

    #[test]
    fn test_take_episode_preserves_order() -> Result<()> {
        let config = SimpleEpisodeBufferConfig::default().capacity(8);
        let mut buffer = SimpleEpisodeBuffer::<VecBatch, VecBatch>::build(&config);

        for i in 0..3 {
            buffer.push(transition(i as f32, i as f32, 1., if i == 2 { 1 } else { 0 }))?;
        }
        assert_eq!(buffer.len(), 3);

        let batch = buffer.take_episode()?;
        assert_eq!(batch.len(), 3);
        assert_eq!(batch.obs.0, vec![0., 1., 2.]);
        assert_eq!(batch.act.0, vec![0., 1., 2.]);
        assert_eq!(batch.reward, vec![1., 1., 1.]);
        assert_eq!(batch.is_terminated, vec![0, 0, 1]);
        assert_eq!(buffer.len(), 0);

        Ok(())
    }

    #[test]
    fn test_take_episode_on_empty_buffer_fails() {
        let config = SimpleEpisodeBufferConfig::default();
        let mut buffer = SimpleEpisodeBuffer::<VecBatch, VecBatch>::build(&config);
        assert!(buffer.take_episode().is_err());
    }

    #[test]
    fn test_push_beyond_capacity_fails() -> Result<()> {
        let config = SimpleEpisodeBufferConfig::default().capacity(2);
        let mut buffer = SimpleEpisodeBuffer::<VecBatch, VecBatch>::build(&config);
        buffer.push(transition(0., 0., 1., 0))?;
        buffer.push(transition(1., 1., 1., 0))?;
        assert!(buffer.push(transition(2., 0., 1., 1)).is_err());
        Ok(())
    }
}
