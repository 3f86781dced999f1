use crate::config::MapConfig;
use crate::error::Result;
use crate::flat_table::FlatTable;
use crate::key_strategy::KeyStrategy;
use crate::sparse_table::InsertOutcome;
use crate::sparse_table::SparseTable;
use crate::sparse_table::next_prime;

/// Smallest capacity a sparse table grows to from empty.
const MIN_GROWTH: usize = 8;

/// Representation currently backing a container.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    /// Open hashing over a two-region slot arena.
    Sparse,
    /// Presence bitset plus a value array indexed directly by key.
    Flat,
}

/// The two interchangeable representations of a container. Mode is the variant; there is no separate flag.
#[derive(Clone, Debug)]
pub(crate) enum Storage<K, V> {
    Sparse(SparseTable<K, V>),
    Flat(FlatTable<K, V>),
}

/// Picks the representation for a container that needs `capacity` slots.
fn select_mode<K, S: KeyStrategy<K>>(strategy: &S, config: &MapConfig, capacity: usize) -> Mode {
    match strategy.domain() {
        Some(domain) if capacity > config.flat_threshold_for(domain.len) => Mode::Flat,
        _ => Mode::Sparse,
    }
}

#[inline]
fn sparse_capacity_for(capacity: usize) -> usize {
    if capacity == 0 { 0 } else { next_prime(capacity) }
}

impl<K, V> Storage<K, V> {
    pub(crate) fn with_capacity<S: KeyStrategy<K>>(
        strategy: &S,
        config: &MapConfig,
        capacity: usize,
    ) -> Self {
        match (select_mode(strategy, config, capacity), strategy.domain()) {
            (Mode::Flat, Some(domain)) => Self::Flat(FlatTable::new(domain)),
            _ => Self::Sparse(SparseTable::with_capacity(sparse_capacity_for(capacity))),
        }
    }

    #[inline]
    pub(crate) fn mode(&self) -> Mode {
        match self {
            Self::Sparse(_) => Mode::Sparse,
            Self::Flat(_) => Mode::Flat,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        match self {
            Self::Sparse(table) => table.len(),
            Self::Flat(table) => table.len(),
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        match self {
            Self::Sparse(table) => table.capacity(),
            Self::Flat(table) => table.capacity(),
        }
    }

    #[inline]
    pub(crate) fn is_live(&self, index: usize) -> bool {
        match self {
            Self::Sparse(table) => table.is_live(index),
            Self::Flat(table) => table.is_live(index),
        }
    }

    #[inline]
    pub(crate) fn live_at_or_after(&self, from: usize) -> Option<usize> {
        match self {
            Self::Sparse(table) => table.live_at_or_after(from),
            Self::Flat(table) => table.live_at_or_after(from),
        }
    }

    #[inline]
    pub(crate) fn entry(&self, index: usize) -> Option<(&K, &Option<V>)> {
        match self {
            Self::Sparse(table) => table.slot(index).map(|slot| (&slot.key, &slot.value)),
            Self::Flat(table) => table.key(index).zip(table.value(index)),
        }
    }

    #[inline]
    pub(crate) fn value_mut(&mut self, index: usize) -> Option<&mut Option<V>> {
        match self {
            Self::Sparse(table) => table.slot_mut(index).map(|slot| &mut slot.value),
            Self::Flat(table) => table.value_mut(index),
        }
    }

    #[inline]
    pub(crate) fn find<S: KeyStrategy<K>>(&self, strategy: &S, key: &K) -> Option<usize> {
        match self {
            Self::Sparse(table) => table.find(strategy, key),
            Self::Flat(table) => table.find(key),
        }
    }

    /// Inserts or replaces, growing (and possibly switching to flat mode) when the sparse table is full.
    ///
    /// Returns `Some(previous)` if the key was already present.
    pub(crate) fn insert<S: KeyStrategy<K>>(
        &mut self,
        strategy: &mut S,
        config: &MapConfig,
        key: K,
        value: Option<V>,
    ) -> Option<Option<V>> {
        let outcome = match self {
            Self::Flat(table) => return table.insert(&key, value),
            Self::Sparse(table) => table.insert(strategy, config.collision_threshold, key, value),
        };
        match outcome {
            InsertOutcome::Inserted => None,
            InsertOutcome::Replaced(previous) => Some(previous),
            InsertOutcome::Full(key, value) => {
                let target = (self.capacity() * 2).max(MIN_GROWTH);
                self.resize(strategy, config, target);
                self.insert(strategy, config, key, value)
            }
        }
    }

    pub(crate) fn remove<S: KeyStrategy<K>>(&mut self, strategy: &S, key: &K) -> Option<Option<V>> {
        match self {
            Self::Sparse(table) => table.remove(strategy, key).map(|(_, value)| value),
            Self::Flat(table) => table.remove(key),
        }
    }

    pub(crate) fn clear(&mut self) {
        match self {
            Self::Sparse(table) => table.clear(),
            Self::Flat(table) => table.clear(),
        }
    }

    /// Re-lays the storage out for `capacity` slots, converting between sparse and flat when the selected mode
    /// changes. `capacity` must be at least [`len`][Self::len]. Returns `false` when the layout is kept as is.
    ///
    /// The empty replacement is allocated while the current storage is still in place, so a capacity overflow
    /// or allocation panic leaves every entry where it was. Moving entries across cannot fail.
    pub(crate) fn resize<S: KeyStrategy<K>>(
        &mut self,
        strategy: &S,
        config: &MapConfig,
        capacity: usize,
    ) -> bool {
        debug_assert!(capacity >= self.len());
        let from = self.mode();
        let next = match (&*self, select_mode(strategy, config, capacity), strategy.domain()) {
            // a flat table already covers the whole domain
            (Self::Flat(_), Mode::Flat, Some(_)) => return false,
            (_, Mode::Flat, Some(domain)) => Self::Flat(FlatTable::new(domain)),
            _ => Self::Sparse(SparseTable::with_capacity(sparse_capacity_for(
                capacity.max(self.len()),
            ))),
        };
        let old = core::mem::replace(self, next);
        match (old, &mut *self) {
            (Self::Sparse(old), Self::Sparse(table)) => table.absorb(old),
            (Self::Sparse(old), Self::Flat(table)) => {
                for slot in old.into_entries() {
                    table.insert(&slot.key, slot.value);
                }
            }
            (Self::Flat(old), Self::Sparse(table)) => table.extend_unique(strategy, old.into_entries()),
            (Self::Flat(old), Self::Flat(table)) => {
                for (key, value) in old.into_entries() {
                    table.insert(&key, value);
                }
            }
        }

        let to = self.mode();
        if from == to {
            tracing::debug!(mode = ?to, len = self.len(), capacity = self.capacity(), "storage resized");
        } else {
            tracing::debug!(
                from = ?from,
                to = ?to,
                len = self.len(),
                capacity = self.capacity(),
                "storage switched representation"
            );
        }
        true
    }

    pub(crate) fn validate<S: KeyStrategy<K>>(&self, strategy: &S) -> Result<()> {
        match self {
            Self::Sparse(table) => table.validate(strategy),
            Self::Flat(table) => table.validate(),
        }
    }

    /// Sparse region sizes `(lo, hi)`, `None` in flat mode.
    pub(crate) fn regions(&self) -> Option<(usize, usize)> {
        match self {
            Self::Sparse(table) => Some((table.lo_len(), table.hi_len())),
            Self::Flat(_) => None,
        }
    }

    pub(crate) fn values_mut(&mut self) -> Box<dyn Iterator<Item = &mut Option<V>> + '_> {
        match self {
            Self::Sparse(table) => Box::new(table.values_mut()),
            Self::Flat(table) => Box::new(table.values_mut()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::Mode;
    use super::Storage;
    use crate::config::MapConfig;
    use crate::key_strategy::DirectStrategy;
    use crate::key_strategy::PrimitiveStrategy;

    #[test]
    fn unbounded_keys_stay_sparse() {
        let config = MapConfig::default().always_flat();
        let mut strategy = PrimitiveStrategy;
        let mut storage: Storage<u32, ()> = Storage::with_capacity(&strategy, &config, 100);
        assert_eq!(storage.mode(), Mode::Sparse);
        for key in 0..1000 {
            storage.insert(&mut strategy, &config, key, None);
        }
        assert_eq!(storage.mode(), Mode::Sparse);
        assert_eq!(storage.len(), 1000);
    }

    #[test]
    fn growth_promotes_and_shrink_demotes() {
        let config = MapConfig::default().with_flat_threshold(64);
        let mut strategy = DirectStrategy;
        let mut storage: Storage<u16, u16> = Storage::with_capacity(&strategy, &config, 0);
        assert_eq!(storage.mode(), Mode::Sparse);

        for key in 0..100u16 {
            assert_eq!(storage.insert(&mut strategy, &config, key * 3, Some(key)), None);
        }
        assert_eq!(storage.mode(), Mode::Flat);
        assert_eq!(storage.capacity(), 65536);
        storage.validate(&strategy).unwrap();

        for key in 50..100u16 {
            assert_eq!(storage.remove(&strategy, &(key * 3)), Some(Some(key)));
        }
        // flat to flat has nothing to rebuild
        assert!(!storage.resize(&strategy, &config, 1000));
        assert_eq!(storage.mode(), Mode::Flat);

        assert!(storage.resize(&strategy, &config, 50));
        assert_eq!(storage.mode(), Mode::Sparse);
        assert_eq!(storage.capacity(), 53);
        storage.validate(&strategy).unwrap();
        for key in 0..50u16 {
            let index = storage.find(&strategy, &(key * 3)).unwrap();
            assert_eq!(storage.entry(index), Some((&(key * 3), &Some(key))));
        }
    }
}
