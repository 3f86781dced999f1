use crate::error::Error;
use crate::error::Result;
use crate::key_strategy::KeyDomain;

const WORD_BITS: usize = u64::BITS as usize;

/// Fixed-size presence bitset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct BitSet {
    words: Box<[u64]>,
    bits: usize,
}

impl BitSet {
    pub(crate) fn new(bits: usize) -> Self {
        Self {
            words: vec![0; bits.div_ceil(WORD_BITS)].into_boxed_slice(),
            bits,
        }
    }

    #[inline]
    pub(crate) fn contains(&self, bit: usize) -> bool {
        bit < self.bits && self.words[bit / WORD_BITS] & (1u64 << (bit % WORD_BITS)) != 0
    }

    /// Sets `bit`, returning `true` if it was previously clear.
    #[inline]
    pub(crate) fn insert(&mut self, bit: usize) -> bool {
        let word = &mut self.words[bit / WORD_BITS];
        let mask = 1u64 << (bit % WORD_BITS);
        let was_clear = *word & mask == 0;
        *word |= mask;
        was_clear
    }

    /// Clears `bit`, returning `true` if it was previously set.
    #[inline]
    pub(crate) fn remove(&mut self, bit: usize) -> bool {
        let word = &mut self.words[bit / WORD_BITS];
        let mask = 1u64 << (bit % WORD_BITS);
        let was_set = *word & mask != 0;
        *word &= !mask;
        was_set
    }

    pub(crate) fn clear(&mut self) {
        self.words.fill(0);
    }

    pub(crate) fn count_ones(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// First set bit at or after `from`.
    pub(crate) fn next_set(&self, from: usize) -> Option<usize> {
        if from >= self.bits {
            return None;
        }
        let mut word_index = from / WORD_BITS;
        let mut word = self.words[word_index] & (!0u64 << (from % WORD_BITS));
        loop {
            if word != 0 {
                return Some(word_index * WORD_BITS + word.trailing_zeros() as usize);
            }
            word_index += 1;
            word = *self.words.get(word_index)?;
        }
    }

    pub(crate) fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        let mut next = self.next_set(0);
        core::iter::from_fn(move || {
            let current = next?;
            next = self.next_set(current + 1);
            Some(current)
        })
    }
}

/// Direct-mapped table for keys with a small bounded domain: the key's index in the domain is its slot.
///
/// The key table is materialised once so that accessors can hand out `&K` like the sparse table does.
#[derive(Clone, Debug)]
pub(crate) struct FlatTable<K, V> {
    domain: KeyDomain<K>,
    present: BitSet,
    keys: Box<[K]>,
    values: Box<[Option<V>]>,
    len: usize,
}

impl<K, V> FlatTable<K, V> {
    pub(crate) fn new(domain: KeyDomain<K>) -> Self {
        Self {
            domain,
            present: BitSet::new(domain.len),
            keys: (0..domain.len).map(domain.key_at).collect(),
            values: core::iter::repeat_with(|| None).take(domain.len).collect(),
            len: 0,
        }
    }

    /// The flat table always spans the whole key domain.
    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.domain.len
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn index_of(&self, key: &K) -> usize {
        (self.domain.index_of)(key)
    }

    #[inline]
    pub(crate) fn find(&self, key: &K) -> Option<usize> {
        let index = self.index_of(key);
        self.present.contains(index).then_some(index)
    }

    #[inline]
    pub(crate) fn is_live(&self, index: usize) -> bool {
        self.present.contains(index)
    }

    #[inline]
    pub(crate) fn key(&self, index: usize) -> Option<&K> {
        self.is_live(index).then(|| &self.keys[index])
    }

    #[inline]
    pub(crate) fn value(&self, index: usize) -> Option<&Option<V>> {
        self.is_live(index).then(|| &self.values[index])
    }

    #[inline]
    pub(crate) fn value_mut(&mut self, index: usize) -> Option<&mut Option<V>> {
        if self.is_live(index) {
            Some(&mut self.values[index])
        } else {
            None
        }
    }

    /// Inserts or replaces. Returns `Some(previous)` when the key was already present.
    pub(crate) fn insert(&mut self, key: &K, value: Option<V>) -> Option<Option<V>> {
        let index = self.index_of(key);
        let previous = core::mem::replace(&mut self.values[index], value);
        if self.present.insert(index) {
            self.len += 1;
            None
        } else {
            Some(previous)
        }
    }

    pub(crate) fn remove(&mut self, key: &K) -> Option<Option<V>> {
        let index = self.index_of(key);
        if self.present.remove(index) {
            self.len -= 1;
            Some(self.values[index].take())
        } else {
            None
        }
    }

    pub(crate) fn clear(&mut self) {
        self.present.clear();
        self.values.fill_with(|| None);
        self.len = 0;
    }

    #[inline]
    pub(crate) fn live_at_or_after(&self, from: usize) -> Option<usize> {
        self.present.next_set(from)
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut Option<V>> {
        let present = &self.present;
        self.values
            .iter_mut()
            .enumerate()
            .filter_map(move |(index, value)| present.contains(index).then_some(value))
    }

    /// Consumes the table, yielding present entries in key-index order.
    pub(crate) fn into_entries(self) -> impl Iterator<Item = (K, Option<V>)> {
        let present = self.present;
        self.keys
            .into_vec()
            .into_iter()
            .zip(self.values.into_vec())
            .enumerate()
            .filter_map(move |(index, entry)| present.contains(index).then_some(entry))
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let ones = self.present.count_ones();
        if ones != self.len {
            return Err(Error::Corrupted(format!(
                "presence bitset holds {ones} keys but the table counts {}",
                self.len
            )));
        }
        if let Some(index) = self
            .present
            .ones()
            .find(|index| self.index_of(&self.keys[*index]) != *index)
        {
            return Err(Error::Corrupted(format!(
                "key table entry {index} does not map back to its own index"
            )));
        }
        if let Some(index) = (0..self.values.len())
            .find(|index| !self.present.contains(*index) && self.values[*index].is_some())
        {
            return Err(Error::Corrupted(format!(
                "absent key index {index} still holds a value"
            )));
        }
        Ok(())
    }
}
