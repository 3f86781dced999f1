use core::num::NonZeroU32;

use crate::error::Error;
use crate::error::Result;
use crate::error::panic_chain_overrun;
use crate::key_strategy::KeyStrategy;

/// Typed index of a slot in the entry arena.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub(crate) struct SlotIndex(pub(crate) usize);

/// Largest capacity whose slot indices still fit a 1-based `NonZeroU32` bucket cell.
pub(crate) const MAX_CAPACITY: usize = u32::MAX as usize - 1;

#[derive(Clone, Debug)]
pub(crate) struct Slot<K, V> {
    pub(crate) hash: u32,
    pub(crate) key: K,
    pub(crate) value: Option<V>,
    // `None` for hi-region terminals, always `Some` in the lo-region.
    link: Option<SlotIndex>,
}

pub(crate) enum InsertOutcome<K, V> {
    Inserted,
    Replaced(Option<V>),
    /// No free slot is left; the entry is handed back so the caller can grow and retry.
    Full(K, Option<V>),
}

/// Open hashing table over a fixed-size slot arena.
///
/// Live slots occupy two disjoint regions: the lo-region `[0, lo)` grows upwards and holds chain members that
/// were pushed in front of an existing chain head, the hi-region `[capacity - hi, capacity)` grows downwards and
/// holds the entries that started a chain, which are therefore always chain terminals. A chain is walked from
/// its bucket through lo-region links until a hi-region slot is reached.
///
/// Removal never leaves a hole: the freed slot is refilled with the outermost slot of its region through
/// [`relocate`][SparseTable::relocate], so there are no tombstones.
#[derive(Clone, Debug)]
pub(crate) struct SparseTable<K, V> {
    // 1-based index of the chain head, `None` for an empty bucket.
    buckets: Box<[Option<NonZeroU32>]>,
    slots: Box<[Option<Slot<K, V>>]>,
    lo: usize,
    hi: usize,
}

impl<K, V> Default for SparseTable<K, V> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl<K, V> SparseTable<K, V> {
    /// Creates a table with exactly `capacity` slots and buckets.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        if capacity > MAX_CAPACITY {
            capacity_overflow(capacity);
        }
        Self {
            buckets: vec![None; capacity].into_boxed_slice(),
            slots: core::iter::repeat_with(|| None).take(capacity).collect(),
            lo: 0,
            hi: 0,
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.lo + self.hi
    }

    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }

    #[inline]
    pub(crate) fn lo_len(&self) -> usize {
        self.lo
    }

    #[inline]
    pub(crate) fn hi_len(&self) -> usize {
        self.hi
    }

    #[inline]
    fn hi_start(&self) -> usize {
        self.capacity() - self.hi
    }

    #[inline]
    pub(crate) fn is_live(&self, index: usize) -> bool {
        index < self.lo || (index >= self.hi_start() && index < self.capacity())
    }

    #[inline]
    fn bucket_of(&self, hash: u32) -> usize {
        hash as usize % self.buckets.len()
    }

    #[inline]
    fn head(&self, bucket: usize) -> Option<SlotIndex> {
        self.buckets[bucket].map(|cell| SlotIndex(cell.get() as usize - 1))
    }

    #[inline]
    fn set_head(&mut self, bucket: usize, head: Option<SlotIndex>) {
        // `with_capacity` guarantees every index + 1 fits in a `u32`.
        self.buckets[bucket] = head.and_then(|index| NonZeroU32::new(index.0 as u32 + 1));
    }

    #[inline]
    fn live(&self, index: SlotIndex) -> &Slot<K, V> {
        match self.slots[index.0].as_ref() {
            Some(slot) => slot,
            None => panic_empty_slot(index),
        }
    }

    #[inline]
    fn take(&mut self, index: SlotIndex) -> Slot<K, V> {
        match self.slots[index.0].take() {
            Some(slot) => slot,
            None => panic_empty_slot(index),
        }
    }

    /// Returns the live slot at `index`, if any.
    #[inline]
    pub(crate) fn slot(&self, index: usize) -> Option<&Slot<K, V>> {
        if self.is_live(index) {
            self.slots[index].as_ref()
        } else {
            None
        }
    }

    #[inline]
    pub(crate) fn slot_mut(&mut self, index: usize) -> Option<&mut Slot<K, V>> {
        if self.is_live(index) {
            self.slots[index].as_mut()
        } else {
            None
        }
    }

    /// First live index at or after `from`, in iteration order (lo-region, then hi-region).
    pub(crate) fn live_at_or_after(&self, from: usize) -> Option<usize> {
        if from < self.lo {
            return Some(from);
        }
        let next = from.max(self.hi_start());
        (next < self.capacity()).then_some(next)
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut Option<V>> {
        let (lo, rest) = self.slots.split_at_mut(self.lo);
        let hi_start = rest.len() - self.hi;
        lo.iter_mut()
            .chain(rest[hi_start..].iter_mut())
            .filter_map(|slot| slot.as_mut().map(|slot| &mut slot.value))
    }

    /// Consumes the table, yielding its entries lo-region first.
    pub(crate) fn into_entries(self) -> impl Iterator<Item = Slot<K, V>> {
        self.slots.into_vec().into_iter().flatten()
    }

    pub(crate) fn clear(&mut self) {
        self.buckets.fill(None);
        self.slots.fill_with(|| None);
        self.lo = 0;
        self.hi = 0;
    }

    /// Walks the chain for `hash`, returning the matching slot and the slot linking to it.
    fn locate<S: KeyStrategy<K>>(
        &self,
        strategy: &S,
        hash: u32,
        key: &K,
    ) -> Option<(SlotIndex, Option<SlotIndex>)> {
        if self.buckets.is_empty() {
            return None;
        }
        let mut current = self.head(self.bucket_of(hash))?;
        let mut predecessor = None;
        let mut hops = 0;
        loop {
            hops += 1;
            if hops > self.lo + 1 {
                panic_chain_overrun(hops);
            }
            let slot = self.live(current);
            if slot.hash == hash && strategy.equals(&slot.key, key) {
                return Some((current, predecessor));
            }
            if current.0 >= self.lo {
                return None;
            }
            predecessor = Some(current);
            current = match slot.link {
                Some(next) => next,
                None => panic_broken_chain(current),
            };
        }
    }

    pub(crate) fn find<S: KeyStrategy<K>>(&self, strategy: &S, key: &K) -> Option<usize> {
        self.locate(strategy, strategy.hash(key), key)
            .map(|(index, _)| index.0)
    }

    /// Inserts or replaces the value for `key`.
    ///
    /// Walking more than `collision_threshold` colliding entries makes the table ask the strategy for a fresh
    /// seed and rehash everything in place before the new entry is placed.
    pub(crate) fn insert<S: KeyStrategy<K>>(
        &mut self,
        strategy: &mut S,
        collision_threshold: usize,
        key: K,
        value: Option<V>,
    ) -> InsertOutcome<K, V> {
        let mut hash = strategy.hash(&key);
        let mut collisions = 0;
        if !self.buckets.is_empty() {
            if let Some(mut current) = self.head(self.bucket_of(hash)) {
                loop {
                    if collisions > self.lo {
                        panic_chain_overrun(collisions + 1);
                    }
                    let slot = self.live(current);
                    if slot.hash == hash && strategy.equals(&slot.key, &key) {
                        let previous = core::mem::replace(&mut self.take_mut(current).value, value);
                        return InsertOutcome::Replaced(previous);
                    }
                    if current.0 >= self.lo {
                        break;
                    }
                    collisions += 1;
                    current = match slot.link {
                        Some(next) => next,
                        None => panic_broken_chain(current),
                    };
                }
            }
        }

        if self.is_full() {
            return InsertOutcome::Full(key, value);
        }

        if collisions > collision_threshold {
            if let Some(reseeded) = strategy.reseed() {
                tracing::warn!(
                    collisions,
                    len = self.len(),
                    capacity = self.capacity(),
                    "collision chain over threshold, rehashing with a fresh seed"
                );
                *strategy = reseeded;
                self.rehash(strategy);
                hash = strategy.hash(&key);
            }
        }

        self.place(hash, key, value);
        InsertOutcome::Inserted
    }

    #[inline]
    fn take_mut(&mut self, index: SlotIndex) -> &mut Slot<K, V> {
        match self.slots[index.0].as_mut() {
            Some(slot) => slot,
            None => panic_empty_slot(index),
        }
    }

    /// Places an entry known not to be present. The table must not be full.
    fn place(&mut self, hash: u32, key: K, value: Option<V>) -> SlotIndex {
        debug_assert!(!self.is_full());
        let bucket = self.bucket_of(hash);
        let (index, link) = match self.head(bucket) {
            None => {
                let index = SlotIndex(self.capacity() - 1 - self.hi);
                self.hi += 1;
                (index, None)
            }
            Some(head) => {
                let index = SlotIndex(self.lo);
                self.lo += 1;
                (index, Some(head))
            }
        };
        debug_assert!(self.slots[index.0].is_none());
        self.slots[index.0] = Some(Slot {
            hash,
            key,
            value,
            link,
        });
        self.set_head(bucket, Some(index));
        index
    }

    /// Removes `key`, returning its entry.
    pub(crate) fn remove<S: KeyStrategy<K>>(
        &mut self,
        strategy: &S,
        key: &K,
    ) -> Option<(K, Option<V>)> {
        let hash = strategy.hash(key);
        let (target, predecessor) = self.locate(strategy, hash, key)?;
        let bucket = self.bucket_of(hash);

        let removed = if target.0 >= self.lo {
            match predecessor {
                None => {
                    // sole entry of its chain
                    self.set_head(bucket, None);
                    let removed = self.take(target);
                    self.relocate(SlotIndex(self.hi_start()), target);
                    self.hi -= 1;
                    removed
                }
                Some(predecessor) => {
                    // Pull the predecessor forward into the terminal slot and free the predecessor's lo slot
                    // instead, so the hi-region needs no compaction.
                    let pulled = self.take(predecessor);
                    let removed = core::mem::replace(
                        self.take_mut(target),
                        Slot {
                            hash: pulled.hash,
                            key: pulled.key,
                            value: pulled.value,
                            link: None,
                        },
                    );
                    self.repoint(bucket, predecessor, target);
                    self.relocate(SlotIndex(self.lo - 1), predecessor);
                    self.lo -= 1;
                    removed
                }
            }
        } else {
            let removed = self.take(target);
            match predecessor {
                None => self.set_head(bucket, removed.link),
                Some(predecessor) => self.take_mut(predecessor).link = removed.link,
            }
            self.relocate(SlotIndex(self.lo - 1), target);
            self.lo -= 1;
            removed
        };

        Some((removed.key, removed.value))
    }

    /// Moves the live slot at `src` into the empty slot `dst` and rewrites whichever bucket or link pointed at
    /// `src`. Every compaction path goes through here.
    fn relocate(&mut self, src: SlotIndex, dst: SlotIndex) {
        if src == dst {
            return;
        }
        let slot = self.take(src);
        let bucket = self.bucket_of(slot.hash);
        debug_assert!(self.slots[dst.0].is_none());
        self.slots[dst.0] = Some(slot);
        self.repoint(bucket, src, dst);
    }

    /// Makes the bucket head or chain link that refers to `from` refer to `to`.
    fn repoint(&mut self, bucket: usize, from: SlotIndex, to: SlotIndex) {
        let Some(mut current) = self.head(bucket) else {
            panic_broken_chain(from);
        };
        if current == from {
            self.set_head(bucket, Some(to));
            return;
        }
        let mut hops = 0;
        loop {
            hops += 1;
            if hops > self.lo + 1 {
                panic_chain_overrun(hops);
            }
            let slot = self.take_mut(current);
            match slot.link {
                Some(next) if next == from => {
                    slot.link = Some(to);
                    return;
                }
                Some(next) => current = next,
                None => panic_broken_chain(from),
            }
        }
    }

    /// Moves every entry of `other` into this table with its stored hash, lo-region entries first, then the
    /// hi-region. The table must have room for all of them.
    pub(crate) fn absorb(&mut self, other: Self) {
        debug_assert!(self.capacity() - self.len() >= other.len());
        for slot in other.into_entries() {
            self.place(slot.hash, slot.key, slot.value);
        }
    }

    /// Recomputes every stored hash with `strategy` and rebuilds the chains at the current capacity.
    pub(crate) fn rehash<S: KeyStrategy<K>>(&mut self, strategy: &S) {
        let capacity = self.capacity();
        let old = core::mem::replace(self, Self::with_capacity(capacity));
        for slot in old.into_entries() {
            self.place(strategy.hash(&slot.key), slot.key, slot.value);
        }
    }

    /// Places entries known to be distinct from each other and from everything already stored.
    pub(crate) fn extend_unique<S: KeyStrategy<K>>(
        &mut self,
        strategy: &S,
        entries: impl IntoIterator<Item = (K, Option<V>)>,
    ) {
        for (key, value) in entries {
            self.place(strategy.hash(&key), key, value);
        }
    }

    /// Checks every structural invariant of the table.
    pub(crate) fn validate<S: KeyStrategy<K>>(&self, strategy: &S) -> Result<()> {
        let capacity = self.capacity();
        if self.buckets.len() != capacity {
            return Err(Error::Corrupted(format!(
                "{} buckets for {capacity} slots",
                self.buckets.len()
            )));
        }
        if self.lo + self.hi > capacity {
            return Err(Error::Corrupted(format!(
                "regions overlap: lo {} + hi {} > capacity {capacity}",
                self.lo, self.hi
            )));
        }
        for (index, slot) in self.slots.iter().enumerate() {
            if slot.is_some() != self.is_live(index) {
                return Err(Error::Corrupted(format!(
                    "slot {index} liveness does not match its region"
                )));
            }
        }

        // bucket each slot was first reached from
        let mut reached: Vec<Option<usize>> = vec![None; capacity];
        for bucket in 0..self.buckets.len() {
            let mut next = self.head(bucket);
            let mut hops = 0;
            while let Some(index) = next {
                hops += 1;
                if hops > self.lo + 1 {
                    return Err(Error::ConcurrentModification { hops });
                }
                let Some(slot) = self.slot(index.0) else {
                    return Err(Error::Corrupted(format!(
                        "bucket {bucket} reaches dead slot {}",
                        index.0
                    )));
                };
                match core::mem::replace(&mut reached[index.0], Some(bucket)) {
                    None => {}
                    // a chain that loops back on itself is what a write racing the walk leaves behind
                    Some(owner) if owner == bucket => {
                        return Err(Error::ConcurrentModification { hops });
                    }
                    Some(owner) => {
                        return Err(Error::Corrupted(format!(
                            "slot {} reachable from buckets {owner} and {bucket}",
                            index.0
                        )));
                    }
                }
                if self.bucket_of(slot.hash) != bucket || strategy.hash(&slot.key) != slot.hash {
                    return Err(Error::Corrupted(format!(
                        "slot {} hashed into the wrong bucket",
                        index.0
                    )));
                }
                match (index.0 < self.lo, slot.link) {
                    (true, None) => {
                        return Err(Error::Corrupted(format!(
                            "lo slot {} has no link",
                            index.0
                        )));
                    }
                    (false, Some(_)) => {
                        return Err(Error::Corrupted(format!(
                            "hi slot {} is not a terminal",
                            index.0
                        )));
                    }
                    _ => {}
                }
                next = slot.link;
            }
        }
        let reached = reached.iter().filter(|owner| owner.is_some()).count();
        if reached != self.len() {
            return Err(Error::Corrupted(format!(
                "{reached} of {} live slots reachable from buckets",
                self.len()
            )));
        }
        Ok(())
    }
}

/// Smallest prime `>= n` (and at least 2), used as table capacity so that `hash % capacity` spreads well.
pub(crate) fn next_prime(n: usize) -> usize {
    fn is_prime(n: usize) -> bool {
        if n < 4 {
            return n >= 2;
        }
        if n % 2 == 0 {
            return false;
        }
        let mut divisor = 3;
        while divisor * divisor <= n {
            if n % divisor == 0 {
                return false;
            }
            divisor += 2;
        }
        true
    }

    let mut candidate = n.max(2);
    while !is_prime(candidate) {
        candidate += 1;
    }
    candidate
}

#[cold]
#[inline(never)]
fn panic_empty_slot(index: SlotIndex) -> ! {
    panic!("slot {} is empty but referenced as live", index.0)
}

#[cold]
#[inline(never)]
fn panic_broken_chain(index: SlotIndex) -> ! {
    panic!("collision chain broken at slot {}", index.0)
}

#[cold]
#[inline(never)]
fn capacity_overflow(capacity: usize) -> ! {
    panic!("capacity {capacity} exceeds the maximum of {MAX_CAPACITY}")
}

#[cfg(test)]
mod test {
    use super::InsertOutcome;
    use super::SlotIndex;
    use super::SparseTable;
    use super::next_prime;
    use crate::error::Error;
    use crate::key_strategy::KeyStrategy;
    use crate::key_strategy::PrimitiveStrategy;

    /// Sends every key to the same bucket.
    #[derive(Clone, Copy, Default)]
    struct Colliding;

    impl KeyStrategy<u32> for Colliding {
        fn hash(&self, _key: &u32) -> u32 {
            7
        }

        fn equals(&self, a: &u32, b: &u32) -> bool {
            a == b
        }
    }

    /// Uses the key itself as its hash.
    #[derive(Clone, Copy, Default)]
    struct Identity;

    impl KeyStrategy<u32> for Identity {
        fn hash(&self, key: &u32) -> u32 {
            *key
        }

        fn equals(&self, a: &u32, b: &u32) -> bool {
            a == b
        }
    }

    fn insert<S: KeyStrategy<u32>>(
        table: &mut SparseTable<u32, &'static str>,
        strategy: &mut S,
        key: u32,
        value: &'static str,
    ) -> bool {
        match table.insert(strategy, 100, key, Some(value)) {
            InsertOutcome::Inserted => true,
            InsertOutcome::Replaced(_) => false,
            InsertOutcome::Full(..) => panic!("table unexpectedly full"),
        }
    }

    #[test]
    fn first_entry_of_a_bucket_goes_to_the_hi_region() {
        let mut table = SparseTable::with_capacity(7);
        assert!(insert(&mut table, &mut Colliding, 1, "a"));
        assert_eq!((table.lo_len(), table.hi_len()), (0, 1));
        assert!(table.slot(6).is_some());

        assert!(insert(&mut table, &mut Colliding, 2, "b"));
        assert!(insert(&mut table, &mut Colliding, 3, "c"));
        assert_eq!((table.lo_len(), table.hi_len()), (2, 1));
        table.validate(&Colliding).unwrap();
    }

    #[test]
    fn removing_middle_of_a_chain_shrinks_lo_by_one() {
        let mut table = SparseTable::with_capacity(7);
        for (key, value) in [(1, "a"), (2, "b"), (3, "c")] {
            insert(&mut table, &mut Colliding, key, value);
        }
        let lo_before = table.lo_len();

        assert_eq!(table.remove(&Colliding, &2), Some((2, Some("b"))));
        assert_eq!(table.lo_len(), lo_before - 1);
        assert!(table.find(&Colliding, &1).is_some());
        assert!(table.find(&Colliding, &3).is_some());
        assert!(table.find(&Colliding, &2).is_none());
        table.validate(&Colliding).unwrap();
    }

    #[test]
    fn removing_a_terminal_pulls_its_predecessor_forward() {
        let mut table = SparseTable::with_capacity(7);
        for (key, value) in [(1, "a"), (2, "b"), (3, "c")] {
            insert(&mut table, &mut Colliding, key, value);
        }

        // key 1 is the hi-region terminal; its lo-region predecessor takes its slot
        assert_eq!(table.remove(&Colliding, &1), Some((1, Some("a"))));
        assert_eq!((table.lo_len(), table.hi_len()), (1, 1));
        let terminal = table.slot(6).unwrap();
        assert_eq!(terminal.key, 2);
        assert_eq!(table.find(&Colliding, &3), Some(0));
        table.validate(&Colliding).unwrap();

        assert_eq!(table.remove(&Colliding, &2), Some((2, Some("b"))));
        assert_eq!(table.remove(&Colliding, &3), Some((3, Some("c"))));
        assert_eq!(table.len(), 0);
        table.validate(&Colliding).unwrap();
    }

    #[test]
    fn removing_a_lone_head_compacts_the_hi_region() {
        let mut strategy = PrimitiveStrategy;
        let mut table = SparseTable::with_capacity(next_prime(64));
        for key in 0..40u32 {
            insert(&mut table, &mut strategy, key, "v");
        }
        for key in (0..40u32).step_by(3) {
            assert!(table.remove(&strategy, &key).is_some());
            table.validate(&strategy).unwrap();
        }
        for key in 0..40u32 {
            assert_eq!(table.find(&strategy, &key).is_some(), key % 3 != 0);
        }
    }

    #[test]
    fn overwrite_keeps_the_slot() {
        let mut table = SparseTable::with_capacity(7);
        insert(&mut table, &mut Colliding, 5, "a");
        let slot = table.find(&Colliding, &5);
        assert!(!insert(&mut table, &mut Colliding, 5, "b"));
        assert_eq!(table.find(&Colliding, &5), slot);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn full_table_hands_the_entry_back() {
        let mut table = SparseTable::with_capacity(2);
        insert(&mut table, &mut Colliding, 1, "a");
        insert(&mut table, &mut Colliding, 2, "b");
        assert!(table.is_full());
        match table.insert(&mut Colliding, 100, 3, Some("c")) {
            InsertOutcome::Full(key, value) => assert_eq!((key, value), (3, Some("c"))),
            _ => panic!("expected a full table"),
        }
        // replacing still works when full
        assert!(!insert(&mut table, &mut Colliding, 2, "z"));
    }

    #[test]
    fn resize_preserves_entries() {
        let mut strategy = PrimitiveStrategy;
        let mut table = SparseTable::with_capacity(11);
        for key in 0..11u32 {
            insert(&mut table, &mut strategy, key, "v");
        }
        let mut grown = SparseTable::with_capacity(next_prime(22));
        grown.absorb(table);
        assert_eq!(grown.capacity(), 23);
        assert_eq!(grown.len(), 11);
        for key in 0..11u32 {
            assert!(grown.find(&strategy, &key).is_some());
        }
        grown.validate(&strategy).unwrap();
    }

    /// Three colliding keys whose lo-region links are bent into a loop `1 -> 0 -> 1`.
    fn looped_chain() -> SparseTable<u32, &'static str> {
        let mut table = SparseTable::with_capacity(7);
        for (key, value) in [(1, "a"), (2, "b"), (3, "c")] {
            insert(&mut table, &mut Colliding, key, value);
        }
        table.validate(&Colliding).unwrap();
        table.slots[0].as_mut().unwrap().link = Some(SlotIndex(1));
        table
    }

    #[test]
    fn looped_chain_is_reported_as_concurrent_modification() {
        let table = looped_chain();
        assert_eq!(
            table.validate(&Colliding),
            Err(Error::ConcurrentModification { hops: 3 })
        );
    }

    #[test]
    #[should_panic(expected = "concurrent modification")]
    fn lookup_on_a_looped_chain_panics() {
        let table = looped_chain();
        table.find(&Colliding, &99);
    }

    #[test]
    #[should_panic(expected = "concurrent modification")]
    fn insert_on_a_looped_chain_panics() {
        let mut table = looped_chain();
        table.insert(&mut Colliding, 100, 99, Some("d"));
    }

    #[test]
    fn chain_shared_between_buckets_is_corrupted() {
        let mut table = SparseTable::with_capacity(7);
        let mut strategy = Identity;
        for key in [0u32, 7, 1] {
            insert(&mut table, &mut strategy, key, "v");
        }
        table.validate(&strategy).unwrap();
        // bucket 1 now also starts at the head of bucket 0
        table.buckets[1] = table.buckets[0];
        assert!(matches!(table.validate(&strategy), Err(Error::Corrupted(_))));
    }

    #[test]
    fn iteration_walks_lo_then_hi() {
        let mut table = SparseTable::with_capacity(7);
        for (key, value) in [(1, "a"), (2, "b"), (3, "c")] {
            insert(&mut table, &mut Colliding, key, value);
        }
        let indices: Vec<usize> =
            core::iter::successors(table.live_at_or_after(0), |index| table.live_at_or_after(index + 1))
                .collect();
        assert_eq!(indices, vec![0, 1, 6]);
        assert_eq!(table.live_at_or_after(0), Some(0));
        assert_eq!(table.live_at_or_after(2), Some(6));
        assert_eq!(table.live_at_or_after(7), None);
    }

    #[test]
    fn primes() {
        assert_eq!(next_prime(0), 2);
        assert_eq!(next_prime(14), 17);
        assert_eq!(next_prime(17), 17);
        assert_eq!(next_prime(32), 37);
    }
}
