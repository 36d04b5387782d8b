//! Discounted return-to-go computation.

/// Computes the discounted return-to-go for every step of a finished episode.
///
/// The slices are traversed in reverse temporal order with a running
/// accumulator: `return[t] = reward[t] + gamma * return[t+1]` within an
/// episode. The accumulator is reset whenever `dones[t] != 0`, so a buffer
/// that happens to span several episodes is still scored per episode.
///
/// An empty input yields an empty output.
pub fn discounted_returns(rewards: &[f32], dones: &[i8], gamma: f32) -> Vec<f32> {
    debug_assert_eq!(rewards.len(), dones.len());

    let mut returns = vec![0f32; rewards.len()];
    let mut run_add = 0f32;

    for (t, (reward, done)) in rewards.iter().zip(dones.iter()).enumerate().rev() {
        if *done != 0 {
            run_add = 0.;
        }
        run_add = run_add * gamma + reward;
        returns[t] = run_add;
    }

    returns
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_step_return_equals_reward() {
        let rewards = vec![0.5, -1.0, 2.0];
        let dones = vec![0, 0, 1];
        let returns = discounted_returns(&rewards, &dones, 0.99);

        assert_eq!(returns[2], 2.0);
        assert!((returns[1] - (-1.0 + 0.99 * returns[2])).abs() < 1e-6);
        assert!((returns[0] - (0.5 + 0.99 * returns[1])).abs() < 1e-6);
    }

    #[test]
    fn test_undiscounted_returns() {
        let rewards = vec![1., 1., 1.];
        let dones = vec![0, 0, 1];
        assert_eq!(discounted_returns(&rewards, &dones, 1.0), vec![3., 2., 1.]);
    }

    #[test]
    fn test_zero_rewards_give_zero_returns() {
        let rewards = vec![0.; 5];
        let dones = vec![0, 0, 0, 0, 1];
        assert_eq!(discounted_returns(&rewards, &dones, 0.99), vec![0.; 5]);
    }

    #[test]
    fn test_empty_episode() {
        assert_eq!(discounted_returns(&[], &[], 0.99), Vec::<f32>::new());
    }

    #[test]
    fn test_accumulator_resets_across_episodes() {
        // Two concatenated episodes of length 2, gamma = 1.
        let rewards = vec![1., 1., 1., 1.];
        let dones = vec![0, 1, 0, 1];
        assert_eq!(discounted_returns(&rewards, &dones, 1.0), vec![2., 1., 2., 1.]);
    }
}
