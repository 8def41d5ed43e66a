//! Deduplication strategies for accepted integers
//!
//! Provides two exact approaches for collapsing the integers found in a file:
//! - Hash: hashbrown `HashSet` with ahash (works for any range)
//! - Bitset: one bit per value in the accepted range (fixed, tiny footprint)

use crate::cli::DedupStrategy;
use crate::filter::IntegerRange;
use ahash::RandomState;
use hashbrown::HashSet;

/// Trait for deduplication implementations
pub trait Deduplicator {
    /// Add a value, returning true if it was not seen before
    fn insert(&mut self, value: i32) -> bool;

    /// Get the number of unique values
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Unique values in no particular order
    fn values(&self) -> Vec<i32>;

    /// Get approximate memory usage in bytes
    fn memory_usage(&self) -> usize;
}

/// In-memory HashSet-based deduplicator
pub struct HashDeduplicator {
    set: HashSet<i32, RandomState>,
}

impl HashDeduplicator {
    pub fn new() -> Self {
        Self {
            set: HashSet::with_hasher(RandomState::new()),
        }
    }
}

impl Default for HashDeduplicator {
    fn default() -> Self {
        Self::new()
    }
}

impl Deduplicator for HashDeduplicator {
    fn insert(&mut self, value: i32) -> bool {
        self.set.insert(value)
    }

    fn len(&self) -> usize {
        self.set.len()
    }

    fn values(&self) -> Vec<i32> {
        self.set.iter().copied().collect()
    }

    fn memory_usage(&self) -> usize {
        self.set.capacity() * (std::mem::size_of::<i32>() + 1)
    }
}

/// Bitmap deduplicator covering exactly one range
///
/// Values outside the range are never stored; `insert` reports them as
/// already present so callers cannot mistake them for new values.
pub struct BitsetDeduplicator {
    bits: Vec<u64>,
    range: IntegerRange,
    count: usize,
}

impl BitsetDeduplicator {
    pub fn new(range: IntegerRange) -> Self {
        let num_u64s = (range.span() + 63) / 64;

        Self {
            bits: vec![0; num_u64s],
            range,
            count: 0,
        }
    }

    #[inline]
    fn slot(&self, value: i32) -> Option<(usize, u64)> {
        if !self.range.contains(value) {
            return None;
        }
        let index = (i64::from(value) - i64::from(self.range.min)) as usize;
        Some((index / 64, 1u64 << (index % 64)))
    }
}

impl Deduplicator for BitsetDeduplicator {
    fn insert(&mut self, value: i32) -> bool {
        let Some((word, mask)) = self.slot(value) else {
            return false;
        };

        if self.bits[word] & mask != 0 {
            return false;
        }

        self.bits[word] |= mask;
        self.count += 1;
        true
    }

    fn len(&self) -> usize {
        self.count
    }

    fn values(&self) -> Vec<i32> {
        let mut values = Vec::with_capacity(self.count);

        for (word_index, &word) in self.bits.iter().enumerate() {
            let mut word = word;
            while word != 0 {
                let bit = word.trailing_zeros() as i64;
                let offset = word_index as i64 * 64 + bit;
                values.push((i64::from(self.range.min) + offset) as i32);
                word &= word - 1;
            }
        }

        values
    }

    fn memory_usage(&self) -> usize {
        self.bits.len() * 8
    }
}

/// Factory for creating deduplicators based on configuration
pub fn create_deduplicator(strategy: DedupStrategy, range: IntegerRange) -> Box<dyn Deduplicator> {
    match strategy {
        DedupStrategy::Hash => Box::new(HashDeduplicator::new()),
        DedupStrategy::Bitset => Box::new(BitsetDeduplicator::new(range)),
    }
}
