use core::fmt;
use core::hash::BuildHasher;
use core::hash::BuildHasherDefault;
use core::hash::Hash;

/// Hashing and equality capability used by [`AdaptiveMap`][crate::AdaptiveMap] to place and find keys.
///
/// The map never calls [`Hash`] or [`Eq`] on keys directly; everything goes through the strategy, so a strategy
/// may implement any notion of key identity as long as `equals(a, b)` implies `hash(a) == hash(b)`.
///
/// The container [`Hash`] impls are the exception: they hash entries through `K: Hash` with a fixed seed so that
/// equal containers hash equally whatever their strategy seed. A strategy whose `equals` is looser than `K: Eq`
/// therefore gives containers that compare equal but may hash differently.
///
/// Two optional capabilities change how the map behaves:
///
/// - [`reseed`][KeyStrategy::reseed]: when a strategy can derive a fresh, differently-seeded copy of itself, the
///   sparse table uses it to defend against hash flooding. If an insert walks more than
///   [`MapConfig::collision_threshold`][crate::MapConfig::collision_threshold] colliding entries, the whole table is
///   rehashed in place with the reseeded strategy.
/// - [`domain`][KeyStrategy::domain]: when the key type has a small, bounded domain, the map may switch to a
///   direct-mapped flat representation once it grows past its flat threshold.
pub trait KeyStrategy<K> {
    /// Hashes `key` to the 32 bits stored alongside every sparse entry.
    fn hash(&self, key: &K) -> u32;

    /// Returns `true` if both keys designate the same entry.
    fn equals(&self, a: &K, b: &K) -> bool;

    /// Derives a strategy with a fresh seed, or `None` if this strategy has no seed to change.
    fn reseed(&self) -> Option<Self>
    where
        Self: Sized,
    {
        None
    }

    /// Describes the bounded key domain, if any, that allows flat storage.
    fn domain(&self) -> Option<KeyDomain<K>> {
        None
    }
}

/// A bounded key domain where every key maps one-to-one onto an index in `0..len`.
pub struct KeyDomain<K> {
    /// Number of distinct keys in the domain.
    pub len: usize,
    /// Maps a key to its index.
    pub index_of: fn(&K) -> usize,
    /// Maps an index back to its key.
    pub key_at: fn(usize) -> K,
}

impl<K> Clone for KeyDomain<K> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for KeyDomain<K> {}

impl<K> fmt::Debug for KeyDomain<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyDomain").field("len", &self.len).finish()
    }
}

/// Implemented by key types small enough to be stored in a direct-mapped table indexed by the key itself.
pub trait DirectKey: Sized {
    /// Number of distinct values of the type.
    const DOMAIN: usize;

    /// Index of this key in `0..DOMAIN`.
    fn to_index(&self) -> usize;

    /// Inverse of [`to_index`][DirectKey::to_index].
    fn from_index(index: usize) -> Self;
}

macro_rules! impl_direct_key {
    ($($ty:ty => $unsigned:ty),* $(,)?) => {
        $(
            impl DirectKey for $ty {
                const DOMAIN: usize = 1 << <$unsigned>::BITS;

                #[inline(always)]
                fn to_index(&self) -> usize {
                    *self as $unsigned as usize
                }

                #[inline(always)]
                fn from_index(index: usize) -> Self {
                    index as $unsigned as $ty
                }
            }
        )*
    };
}

impl_direct_key! {
    u8 => u8,
    i8 => u8,
    u16 => u16,
    i16 => u16,
}

impl DirectKey for bool {
    const DOMAIN: usize = 2;

    #[inline(always)]
    fn to_index(&self) -> usize {
        usize::from(*self)
    }

    #[inline(always)]
    fn from_index(index: usize) -> Self {
        index != 0
    }
}

#[inline(always)]
fn fold_to_u32(hash: u64) -> u32 {
    (hash ^ (hash >> 32)) as u32
}

/// Strategy for small keys made only of primitive types, hashed with `FxHasher`.
///
/// Never reseeds, so tables using it have no flooding defence.
#[derive(Default, Clone, Copy, Debug)]
pub struct PrimitiveStrategy;

impl<K: Hash + Eq> KeyStrategy<K> for PrimitiveStrategy {
    #[inline]
    fn hash(&self, key: &K) -> u32 {
        fold_to_u32(BuildHasherDefault::<rustc_hash::FxHasher>::default().hash_one(key))
    }

    #[inline]
    fn equals(&self, a: &K, b: &K) -> bool {
        a == b
    }
}

/// Strategy for [`DirectKey`] types. Hashes like [`PrimitiveStrategy`] but exposes the key domain so the map
/// can switch to flat storage.
#[derive(Default, Clone, Copy, Debug)]
pub struct DirectStrategy;

impl<K: DirectKey + Hash + Eq> KeyStrategy<K> for DirectStrategy {
    #[inline]
    fn hash(&self, key: &K) -> u32 {
        KeyStrategy::<K>::hash(&PrimitiveStrategy, key)
    }

    #[inline]
    fn equals(&self, a: &K, b: &K) -> bool {
        a == b
    }

    #[inline]
    fn domain(&self) -> Option<KeyDomain<K>> {
        Some(KeyDomain {
            len: K::DOMAIN,
            index_of: K::to_index,
            key_at: K::from_index,
        })
    }
}

/// Strategy for object keys backed by a randomly seeded [`foldhash`] state.
///
/// Reseeding draws a new random seed, which makes this the strategy to use for keys that may be chosen by an
/// adversary.
#[derive(Default, Clone, Debug)]
pub struct RandomStrategy {
    state: foldhash::fast::RandomState,
}

impl<K: Hash + Eq> KeyStrategy<K> for RandomStrategy {
    #[inline]
    fn hash(&self, key: &K) -> u32 {
        fold_to_u32(self.state.hash_one(key))
    }

    #[inline]
    fn equals(&self, a: &K, b: &K) -> bool {
        a == b
    }

    fn reseed(&self) -> Option<Self> {
        Some(Self::default())
    }
}

/// Strategy backed by a fixed-seed [`foldhash`] state. Reseeding is deterministic, so two maps fed the same
/// operations end up with the same layout.
#[derive(Clone, Debug)]
pub struct FixedStrategy {
    seed: u64,
    state: foldhash::fast::FixedState,
}

impl FixedStrategy {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            state: foldhash::fast::FixedState::with_seed(seed),
        }
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for FixedStrategy {
    #[inline]
    fn default() -> Self {
        Self::with_seed(crate::STATIC_RANDOM_SEED)
    }
}

impl<K: Hash + Eq> KeyStrategy<K> for FixedStrategy {
    #[inline]
    fn hash(&self, key: &K) -> u32 {
        fold_to_u32(self.state.hash_one(key))
    }

    #[inline]
    fn equals(&self, a: &K, b: &K) -> bool {
        a == b
    }

    fn reseed(&self) -> Option<Self> {
        // golden-ratio step keeps successive seeds far apart
        Some(Self::with_seed(
            self.seed.wrapping_add(0x9e37_79b9_7f4a_7c15).rotate_left(17),
        ))
    }
}

/// Adapts any [`BuildHasher`] into a [`KeyStrategy`]. Never reseeds.
#[derive(Default, Clone, Copy, Debug)]
pub struct BuildHasherStrategy<B>(pub B);

impl<K: Hash + Eq, B: BuildHasher> KeyStrategy<K> for BuildHasherStrategy<B> {
    #[inline]
    fn hash(&self, key: &K) -> u32 {
        fold_to_u32(self.0.hash_one(key))
    }

    #[inline]
    fn equals(&self, a: &K, b: &K) -> bool {
        a == b
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn direct_key_indices_round_trip() {
        for key in [i16::MIN, -1, 0, 1, i16::MAX] {
            assert_eq!(i16::from_index(key.to_index()), key);
            assert!(key.to_index() < i16::DOMAIN);
        }
        assert_eq!((-1i8).to_index(), 255);
        assert_eq!(u16::DOMAIN, 65536);
        assert!(bool::from_index(true.to_index()));
    }

    #[test]
    fn only_direct_strategy_exposes_a_domain() {
        assert!(KeyStrategy::<u16>::domain(&PrimitiveStrategy).is_none());
        let domain = KeyStrategy::<u16>::domain(&DirectStrategy).unwrap();
        assert_eq!(domain.len, 65536);
        assert_eq!((domain.key_at)((domain.index_of)(&1234)), 1234);
    }

    #[test]
    fn fixed_reseed_changes_hashes() {
        let a = FixedStrategy::default();
        let b = KeyStrategy::<&str>::reseed(&a).unwrap();
        assert_ne!(a.seed(), b.seed());
        assert_ne!(
            KeyStrategy::<&str>::hash(&a, &"flood"),
            KeyStrategy::<&str>::hash(&b, &"flood")
        );
    }
}
