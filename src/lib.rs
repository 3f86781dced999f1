//! # `tokmap`
//!
//! Maps and sets over scalar and object keys that adapt their storage to their size, with first-class support for
//! "nothing": a key may hold an absent value, and one extra entry may live under a null key.
//!
//! # Provided Collections
//!
//! - [`AdaptiveMap`], a key-value map with nullable values, a null-key slot, and versioned [`Token`]s for walking
//!   and addressing entries.
//! - [`AdaptiveSet`], the set counterpart, with a null element.
//!
//! # Storage modes
//!
//! Every container starts in [`Mode::Sparse`]: an open-hashing table over a slot arena split into a lo-region and
//! a hi-region, compacted in place on every removal so there are never tombstones. When the key type has a small
//! bounded domain (8 and 16 bit integers, through [`DirectStrategy`]) and the container grows past its flat
//! threshold, entries move into [`Mode::Flat`]: a presence bitset plus a value array indexed by the key itself.
//! Trimming below the threshold moves them back. See [`MapConfig`] for the knobs.
//!
//! # Aliases
//!
//! Key type | Map | Set | Strategy
//! ---|---|---|---
//! `u8`, `i8`, `u16`, `i16` | [`U8Map`], [`I8Map`], [`U16Map`], [`I16Map`] | [`U8Set`], ... | [`DirectStrategy`], flat mode available
//! `u32`, `i32`, `u64`, `i64` | [`U32Map`], [`I32Map`], [`U64Map`], [`I64Map`] | [`U32Set`], ... | [`PrimitiveStrategy`], sparse only
//! anything `Hash + Eq` | [`ObjectMap`] | [`ObjectSet`] | [`RandomStrategy`], reseeds on hash flooding
//!
//! # Key strategies
//!
//! The [`key_strategy`] module contains the [`KeyStrategy`] trait the containers hash and compare keys through,
//! and the strategies above. A strategy that can [`reseed`][KeyStrategy::reseed] protects its table against
//! hash flooding: once an insert walks more than [`MapConfig::collision_threshold`] colliding entries, the table
//! is rehashed with a fresh seed.
//!
//! # Tokens
//!
//! [`Token`]s are versioned: any mutation makes them stale and the checked accessors return
//! [`Error::StaleToken`]. [`RawToken`]s skip the check for loops over containers known not to change.
//!
//! # Feature flags
//!
//! `tokmap` uses a set of [feature flags] to optionally reduce the number of dependencies.
//!
//! The following optional features are available:
//!
//! Name | Description | Default?
//! ---|---|---
//! `speedy` | Enables [`speedy`] support for the containers | No
//! `serde` | Enables [`serde`] support for the containers and [`MapConfig`] | No
//!
//! Both write a container as a sequence of `(Option<K>, Option<V>)` entries in iteration order, null key last.
//!
//! [`speedy`]: https://crates.io/crates/speedy
//! [`serde`]: https://crates.io/crates/serde
//! [feature flags]: https://doc.rust-lang.org/cargo/reference/features.html

#![cfg_attr(docsrs, feature(doc_auto_cfg, doc_cfg))]

use core::hash::BuildHasher;
use core::hash::Hash;

/// Provides the adaptive key-value map.
pub mod adaptive_map;
#[doc(inline)]
pub use adaptive_map::AdaptiveMap;

/// Provides the adaptive set.
pub mod adaptive_set;
#[doc(inline)]
pub use adaptive_set::AdaptiveSet;

mod config;
pub use config::DEFAULT_COLLISION_THRESHOLD;
pub use config::DEFAULT_FLAT_DIVISOR;
pub use config::MapConfig;

mod error;
pub use error::Error;
pub use error::Result;

/// Hashing and equality capabilities the containers are parameterized over.
pub mod key_strategy;
#[doc(inline)]
pub use key_strategy::BuildHasherStrategy;
#[doc(inline)]
pub use key_strategy::DirectKey;
#[doc(inline)]
pub use key_strategy::DirectStrategy;
#[doc(inline)]
pub use key_strategy::FixedStrategy;
#[doc(inline)]
pub use key_strategy::KeyStrategy;
#[doc(inline)]
pub use key_strategy::PrimitiveStrategy;
#[doc(inline)]
pub use key_strategy::RandomStrategy;

mod flat_table;
mod sparse_table;
mod storage;
pub use storage::Mode;

mod token;
pub use token::RawToken;
pub use token::Token;

/// Map keyed by `u8`, flat once it outgrows 16 slots.
pub type U8Map<V> = AdaptiveMap<u8, V, DirectStrategy>;
/// Map keyed by `i8`.
pub type I8Map<V> = AdaptiveMap<i8, V, DirectStrategy>;
/// Map keyed by `u16`, flat once it outgrows 4096 slots.
pub type U16Map<V> = AdaptiveMap<u16, V, DirectStrategy>;
/// Map keyed by `i16`.
pub type I16Map<V> = AdaptiveMap<i16, V, DirectStrategy>;
/// Map keyed by `u32`. Always sparse.
pub type U32Map<V> = AdaptiveMap<u32, V, PrimitiveStrategy>;
pub type I32Map<V> = AdaptiveMap<i32, V, PrimitiveStrategy>;
pub type U64Map<V> = AdaptiveMap<u64, V, PrimitiveStrategy>;
pub type I64Map<V> = AdaptiveMap<i64, V, PrimitiveStrategy>;
/// Map over arbitrary `Hash + Eq` keys with a randomly seeded hasher that reseeds under hash flooding.
pub type ObjectMap<K, V> = AdaptiveMap<K, V, RandomStrategy>;

pub type U8Set = AdaptiveSet<u8, DirectStrategy>;
pub type I8Set = AdaptiveSet<i8, DirectStrategy>;
pub type U16Set = AdaptiveSet<u16, DirectStrategy>;
pub type I16Set = AdaptiveSet<i16, DirectStrategy>;
pub type U32Set = AdaptiveSet<u32, PrimitiveStrategy>;
pub type I32Set = AdaptiveSet<i32, PrimitiveStrategy>;
pub type U64Set = AdaptiveSet<u64, PrimitiveStrategy>;
pub type I64Set = AdaptiveSet<i64, PrimitiveStrategy>;
/// Set over arbitrary `Hash + Eq` elements, see [`ObjectMap`].
pub type ObjectSet<T> = AdaptiveSet<T, RandomStrategy>;

#[cfg(test)]
mod tests;

const STATIC_RANDOM_SEED: u64 = 0x86c11a44c63f4f2f;

/// Fixed-seed hasher behind the `Hash` impls of the containers, so that equal containers hash equally across
/// instances and processes.
pub static FIXED_BUILD_HASHER: foldhash::fast::FixedState =
    foldhash::fast::FixedState::with_seed(STATIC_RANDOM_SEED);

#[inline(always)]
pub fn hash_one_fixed<H: Hash>(one: H) -> u64 {
    FIXED_BUILD_HASHER.hash_one(one)
}
