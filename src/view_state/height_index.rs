//! HeightIndex - O(log n) prefix sums and lower_bound via Fenwick tree
//!
//! Backs the measured (variable-height) layout: slot tops and the
//! offset → slot lookup used by the window calculation.
//!
//! # Complexity
//!
//! - `set`: O(log n)
//! - `prefix_sum` / `top_of`: O(log n)
//! - `lower_bound`: O(log² n)
//! - `push`: O(log n) amortized
//! - `insert` / `remove`: O(n log n) (tree rebuilt; positions shift anyway)
//! - `len`: O(1)

/// Cumulative slot heights with logarithmic updates and queries.
#[derive(Debug, Clone, Default)]
pub struct HeightIndex {
    /// Fenwick tree backing storage. May be longer than `heights`; the
    /// extra nodes hold zero.
    tree: Vec<i64>,
    /// Plain per-slot heights, kept for O(1) reads and for rebuilds.
    heights: Vec<u64>,
}

impl HeightIndex {
    /// Creates an empty index with room for `capacity` slots.
    ///
    /// # Examples
    ///
    /// ```
    /// # use convlist::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::new(100);
    /// assert_eq!(index.len(), 0);
    /// assert_eq!(index.total(), 0);
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self {
            tree: vec![0; capacity],
            heights: Vec::with_capacity(capacity),
        }
    }

    /// Builds an index from `len` slots of the same height.
    pub fn uniform(len: usize, height: u64) -> Self {
        let mut index = Self {
            tree: Vec::new(),
            heights: vec![height; len],
        };
        index.rebuild(len);
        index
    }

    /// Height of the slot at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn height(&self, index: usize) -> u64 {
        self.heights[index]
    }

    /// Sets the height at the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use convlist::view_state::height_index::HeightIndex;
    /// let mut index = HeightIndex::new(10);
    /// index.push(5);
    /// index.set(0, 10);
    /// assert_eq!(index.prefix_sum(0), 10);
    /// ```
    pub fn set(&mut self, index: usize, height: u64) {
        let len = self.len();
        assert!(index < len, "index {} out of bounds (len: {})", index, len);

        let delta = height as i64 - self.heights[index] as i64;
        if delta != 0 {
            self.heights[index] = height;
            fenwick::array::update(&mut self.tree, index, delta);
        }
    }

    /// Returns the cumulative height up to and including the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use convlist::view_state::height_index::HeightIndex;
    /// let mut index = HeightIndex::new(10);
    /// index.push(3);
    /// index.push(4);
    /// index.push(5);
    /// assert_eq!(index.prefix_sum(0), 3);
    /// assert_eq!(index.prefix_sum(1), 7);
    /// assert_eq!(index.prefix_sum(2), 12);
    /// ```
    pub fn prefix_sum(&self, index: usize) -> u64 {
        let len = self.len();
        assert!(index < len, "index {} out of bounds (len: {})", index, len);

        fenwick::array::prefix_sum(&self.tree, index).max(0) as u64
    }

    /// Offset of the top edge of slot `index` (sum of all heights before it).
    ///
    /// `top_of(len())` is the total height.
    pub fn top_of(&self, index: usize) -> u64 {
        match index.min(self.len()) {
            0 => 0,
            end => self.prefix_sum(end - 1),
        }
    }

    /// Binary search for the first index where `prefix_sum(index) > value`,
    /// i.e. the slot containing the vertical offset `value`.
    ///
    /// Returns `None` if `value >= total()` or the index is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use convlist::view_state::height_index::HeightIndex;
    /// let mut index = HeightIndex::new(10);
    /// index.push(10);  // [0..10)
    /// index.push(20);  // [10..30)
    /// index.push(15);  // [30..45)
    ///
    /// assert_eq!(index.lower_bound(0), Some(0));
    /// assert_eq!(index.lower_bound(10), Some(1));
    /// assert_eq!(index.lower_bound(30), Some(2));
    /// assert_eq!(index.lower_bound(100), None);
    /// ```
    pub fn lower_bound(&self, value: u64) -> Option<usize> {
        let mut left = 0;
        let mut right = self.len();

        while left < right {
            let mid = left + (right - left) / 2;
            if self.prefix_sum(mid) > value {
                right = mid;
            } else {
                left = mid + 1;
            }
        }

        (left < self.len()).then_some(left)
    }

    /// Total height of all slots.
    pub fn total(&self) -> u64 {
        self.top_of(self.len())
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// Returns true if the index contains no slots.
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Appends a slot with the given height.
    ///
    /// # Examples
    ///
    /// ```
    /// # use convlist::view_state::height_index::HeightIndex;
    /// let mut index = HeightIndex::new(1);
    /// index.push(5);
    /// index.push(3);
    /// assert_eq!(index.len(), 2);
    /// assert_eq!(index.total(), 8);
    /// ```
    pub fn push(&mut self, height: u64) {
        let idx = self.heights.len();
        self.heights.push(height);

        if idx >= self.tree.len() {
            // Nodes added by growth would miss earlier contributions; rebuild.
            let capacity = (self.tree.len().max(1) * 2).max(self.heights.len());
            self.rebuild(capacity);
        } else {
            fenwick::array::update(&mut self.tree, idx, height as i64);
        }
    }

    /// Inserts a slot at `index`, shifting later slots down.
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`.
    pub fn insert(&mut self, index: usize, height: u64) {
        self.heights.insert(index, height);
        let capacity = self.tree.len().max(self.heights.len());
        self.rebuild(capacity);
    }

    /// Removes the slot at `index`, returning its height.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn remove(&mut self, index: usize) -> u64 {
        let height = self.heights.remove(index);
        let capacity = self.tree.len();
        self.rebuild(capacity);
        height
    }

    /// Clears all slots, retaining allocated capacity.
    pub fn clear(&mut self) {
        self.tree.iter_mut().for_each(|node| *node = 0);
        self.heights.clear();
    }

    fn rebuild(&mut self, capacity: usize) {
        self.tree.clear();
        self.tree.resize(capacity, 0);
        for (i, &h) in self.heights.iter().enumerate() {
            if h != 0 {
                fenwick::array::update(&mut self.tree, i, h as i64);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_index() {
        let index = HeightIndex::new(10);
        assert_eq!(index.len(), 0);
        assert_eq!(index.total(), 0);
        assert!(index.is_empty());
        assert_eq!(index.lower_bound(0), None);
    }

    #[test]
    fn test_multiple_entries() {
        let mut index = HeightIndex::new(10);
        index.push(3);
        index.push(4);
        index.push(5);

        assert_eq!(index.len(), 3);
        assert_eq!(index.prefix_sum(0), 3);
        assert_eq!(index.prefix_sum(1), 7);
        assert_eq!(index.prefix_sum(2), 12);
        assert_eq!(index.total(), 12);
        assert_eq!(index.top_of(0), 0);
        assert_eq!(index.top_of(2), 7);
    }

    #[test]
    fn test_set_updates_height() {
        let mut index = HeightIndex::new(10);
        index.push(3);
        index.push(4);
        index.push(5);

        index.set(1, 10);

        assert_eq!(index.height(1), 10);
        assert_eq!(index.prefix_sum(1), 13);
        assert_eq!(index.total(), 18);
    }

    #[test]
    fn test_push_past_capacity_keeps_sums() {
        let mut index = HeightIndex::new(1);
        for h in 1..=9 {
            index.push(h);
        }
        assert_eq!(index.total(), 45);
        assert_eq!(index.prefix_sum(7), 36);
    }

    #[test]
    fn test_insert_shifts_tops() {
        let mut index = HeightIndex::uniform(3, 10);
        index.insert(1, 50);

        assert_eq!(index.len(), 4);
        assert_eq!(index.top_of(1), 10);
        assert_eq!(index.top_of(2), 60);
        assert_eq!(index.total(), 80);
    }

    #[test]
    fn test_remove_returns_height() {
        let mut index = HeightIndex::uniform(3, 10);
        index.set(1, 25);

        assert_eq!(index.remove(1), 25);
        assert_eq!(index.total(), 20);
        assert_eq!(index.lower_bound(15), Some(1));
    }

    #[test]
    fn test_lower_bound_edge_cases() {
        let index = HeightIndex::uniform(3, 5);

        assert_eq!(index.lower_bound(0), Some(0));
        assert_eq!(index.lower_bound(5), Some(1));
        assert_eq!(index.lower_bound(10), Some(2));
        assert_eq!(index.lower_bound(15), None);
        assert_eq!(index.lower_bound(100), None);
    }

    #[test]
    fn test_clear_and_reuse() {
        let mut index = HeightIndex::new(10);
        index.push(5);
        index.clear();

        index.push(10);
        assert_eq!(index.len(), 1);
        assert_eq!(index.total(), 10);
    }

    proptest! {
        #[test]
        fn prop_prefix_sum_is_cumulative(heights in prop::collection::vec(1u64..=100, 1..50)) {
            let mut index = HeightIndex::new(2);
            for &h in &heights {
                index.push(h);
            }

            let mut expected_sum = 0;
            for (i, &h) in heights.iter().enumerate() {
                expected_sum += h;
                prop_assert_eq!(index.prefix_sum(i), expected_sum);
            }
        }

        #[test]
        fn prop_insert_remove_match_vec_model(
            heights in prop::collection::vec(1u64..=100, 1..40),
            at in 0usize..40,
            new_height in 1u64..=100,
        ) {
            let mut index = HeightIndex::new(heights.len());
            for &h in &heights {
                index.push(h);
            }
            let mut model = heights.clone();

            let at = at % (model.len() + 1);
            index.insert(at, new_height);
            model.insert(at, new_height);
            prop_assert_eq!(index.total(), model.iter().sum::<u64>());

            let removed = index.remove(0);
            prop_assert_eq!(removed, model.remove(0));
            for i in 0..model.len() {
                prop_assert_eq!(index.prefix_sum(i), model[..=i].iter().sum::<u64>());
            }
        }

        #[test]
        fn prop_lower_bound_contains_offset(
            heights in prop::collection::vec(1u64..=100, 1..50),
            offset in 0u64..5000,
        ) {
            let mut index = HeightIndex::new(heights.len());
            for &h in &heights {
                index.push(h);
            }

            match index.lower_bound(offset) {
                Some(i) => {
                    prop_assert!(index.top_of(i) <= offset);
                    prop_assert!(offset < index.prefix_sum(i));
                }
                None => prop_assert!(offset >= index.total()),
            }
        }
    }
}
