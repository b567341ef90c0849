//! Input pool consumed by `cin`

use std::collections::VecDeque;

/// A finite queue of integers read front to back
#[derive(Debug, Clone, Default)]
pub struct InputPool {
    values: VecDeque<i32>,
    consumed: usize,
}

impl InputPool {
    pub fn new(values: impl IntoIterator<Item = i32>) -> Self {
        InputPool {
            values: values.into_iter().collect(),
            consumed: 0,
        }
    }

    /// Take the next integer, or `None` once the pool is exhausted
    pub fn next_value(&mut self) -> Option<i32> {
        let value = self.values.pop_front()?;
        self.consumed += 1;
        Some(value)
    }

    /// How many values have been read so far
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_is_consumed_in_order() {
        let mut pool = InputPool::new([3, 1, 2]);
        assert_eq!(pool.next_value(), Some(3));
        assert_eq!(pool.next_value(), Some(1));
        assert_eq!(pool.remaining(), 1);
        assert_eq!(pool.next_value(), Some(2));
        assert_eq!(pool.next_value(), None);
        assert_eq!(pool.consumed(), 3);
    }
}
