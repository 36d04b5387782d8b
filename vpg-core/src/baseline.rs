//! Running baseline for variance reduction.
use std::collections::VecDeque;

/// A bounded FIFO window of past discounted returns.
///
/// The window accumulates the return-to-go values of every step of past
/// episodes, across the whole training run. Its running mean is used as a
/// baseline subtracted from returns to reduce the variance of the
/// policy-gradient estimator without biasing it.
///
/// When the number of stored values exceeds the capacity, the oldest values
/// are evicted first.
pub struct BaselineWindow {
    buf: VecDeque<f32>,
    capacity: usize,
}

impl BaselineWindow {
    /// Creates a window holding at most `capacity` values.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "baseline window capacity must be positive");
        Self {
            buf: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends values at the tail, evicting from the head beyond capacity.
    pub fn extend(&mut self, values: &[f32]) {
        for v in values.iter() {
            if self.buf.len() == self.capacity {
                self.buf.pop_front();
            }
            self.buf.push_back(*v);
        }
    }

    /// Arithmetic mean of the currently held values, `None` when empty.
    pub fn mean(&self) -> Option<f32> {
        if self.buf.is_empty() {
            None
        } else {
            Some(self.buf.iter().sum::<f32>() / self.buf.len() as f32)
        }
    }

    /// Returns the number of currently held values.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if the window holds no values.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_of_retained_values() {
        let mut window = BaselineWindow::new(8);
        assert_eq!(window.mean(), None);

        window.extend(&[3., 2., 1.]);
        assert_eq!(window.len(), 3);
        assert_eq!(window.mean(), Some(2.));
    }

    #[test]
    fn test_capacity_bound_and_fifo_eviction() {
        let mut window = BaselineWindow::new(4);
        for i in 0..10 {
            window.extend(&[i as f32]);
            assert!(window.len() <= 4);
        }

        // Survivors are the most recent four values: 6, 7, 8, 9.
        assert_eq!(window.len(), 4);
        assert_eq!(window.mean(), Some(7.5));
    }

    #[test]
    fn test_extend_longer_than_capacity() {
        let mut window = BaselineWindow::new(2);
        window.extend(&[1., 2., 3., 4., 5.]);
        assert_eq!(window.len(), 2);
        assert_eq!(window.mean(), Some(4.5));
    }
}
