use core::fmt;
use core::hash::Hash;
use core::hash::Hasher;
use core::iter::FusedIterator;

use crate::config::MapConfig;
use crate::error::Error;
use crate::error::Result;
use crate::hash_one_fixed;
use crate::key_strategy::KeyStrategy;
use crate::key_strategy::RandomStrategy;
use crate::storage::Mode;
use crate::storage::Storage;
use crate::token::Position;
use crate::token::RawToken;
use crate::token::Token;

/// A map over scalar or object keys that switches its representation as it grows.
///
/// While small, entries live in a sparse open-hashing table. If the key strategy exposes a bounded key domain
/// (see [`KeyStrategy::domain`]) and the map grows past its flat threshold, the entries are moved into a
/// direct-mapped array indexed by the key itself; trimming below the threshold moves them back. The switch is
/// invisible through the API apart from [`mode`][AdaptiveMap::mode] and [`capacity`][AdaptiveMap::capacity].
///
/// Two kinds of "nothing" are supported on top of plain absence:
///
/// - every key may carry an absent value (`put_absent`, or `put_nullable(key, None)`), which is distinct from the
///   key not being in the map at all;
/// - one extra entry may be stored under the *null key*, outside the key domain. It is always iterated last.
///
/// # Tokens
///
/// Entries can be walked and addressed with [`Token`]s. Every mutation bumps the map's version and invalidates all
/// outstanding tokens; using a stale token fails with [`Error::StaleToken`]. The [`RawToken`] cursor skips that
/// check for tight loops over a map that is known not to change.
///
/// ```
/// use tokmap::ObjectMap;
///
/// let mut map = ObjectMap::new();
/// map.put("a", 1);
/// map.put_absent("b");
/// map.put_null_key(Some(3));
///
/// let mut seen = Vec::new();
/// let mut token = map.first_token();
/// while let Some(current) = token {
///     seen.push((map.key(current).unwrap().copied(), map.value(current).unwrap().copied()));
///     token = map.next_token(current).unwrap();
/// }
/// seen.sort();
/// assert_eq!(seen, vec![(None, Some(3)), (Some("a"), Some(1)), (Some("b"), None)]);
/// ```
///
/// Implements `PartialEq`, `Eq`, and `Hash` such that two maps are equal and hash to the same value if they hold
/// the same entries, regardless of representation or order.
pub struct AdaptiveMap<K, V, S = RandomStrategy> {
    storage: Storage<K, V>,
    null_key: Option<Option<V>>,
    strategy: S,
    config: MapConfig,
    version: u64,
}

impl<K, V, S> AdaptiveMap<K, V, S>
where
    S: KeyStrategy<K> + Default,
{
    /// Creates an empty map with the default configuration.
    #[inline]
    pub fn new() -> Self {
        Self::with_config_and_strategy(MapConfig::default(), S::default())
    }

    /// Creates an empty map with room for at least `capacity` entries.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(MapConfig::default().with_initial_capacity(capacity))
    }

    #[inline]
    pub fn with_config(config: MapConfig) -> Self {
        Self::with_config_and_strategy(config, S::default())
    }
}

impl<K, V, S> AdaptiveMap<K, V, S>
where
    S: KeyStrategy<K>,
{
    #[inline]
    pub fn with_strategy(strategy: S) -> Self {
        Self::with_config_and_strategy(MapConfig::default(), strategy)
    }

    pub fn with_config_and_strategy(config: MapConfig, strategy: S) -> Self {
        Self {
            storage: Storage::with_capacity(&strategy, &config, config.initial_capacity),
            null_key: None,
            strategy,
            config,
            version: 0,
        }
    }

    /// Associates `value` with `key`. Returns `true` if the key was not present before.
    #[inline]
    pub fn put(&mut self, key: K, value: V) -> bool {
        self.put_nullable(key, Some(value))
    }

    /// Stores `key` with an absent value. Returns `true` if the key was not present before.
    #[inline]
    pub fn put_absent(&mut self, key: K) -> bool {
        self.put_nullable(key, None)
    }

    #[inline]
    pub fn put_nullable(&mut self, key: K, value: Option<V>) -> bool {
        self.insert(key, value).is_none()
    }

    /// Stores an entry in token protocol form: a `None` key addresses the null key.
    pub fn put_entry(&mut self, key: Option<K>, value: Option<V>) -> bool {
        match key {
            Some(key) => self.put_nullable(key, value),
            None => self.put_null_key(value),
        }
    }

    /// Inserts or replaces the entry for `key`, returning the previous value if the key was present.
    ///
    /// Replacing a value counts as a mutation and invalidates outstanding tokens.
    pub fn insert(&mut self, key: K, value: Option<V>) -> Option<Option<V>> {
        self.bump();
        self.storage
            .insert(&mut self.strategy, &self.config, key, value)
    }

    /// Removes `key`, returning its value if it was present.
    pub fn remove(&mut self, key: &K) -> Option<Option<V>> {
        let removed = self.storage.remove(&self.strategy, key)?;
        self.bump();
        Some(removed)
    }

    /// Looks up `key`. Returns `None` both when the key is missing and when it holds an absent value; use
    /// [`get_nullable`][Self::get_nullable] to tell them apart.
    #[inline]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_nullable(key).flatten()
    }

    #[inline]
    pub fn get_nullable(&self, key: &K) -> Option<Option<&V>> {
        let index = self.storage.find(&self.strategy, key)?;
        self.storage.entry(index).map(|(_, value)| value.as_ref())
    }

    /// Mutable access to the value of `key`. Counts as a mutation.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let index = self.storage.find(&self.strategy, key)?;
        self.bump();
        self.storage.value_mut(index)?.as_mut()
    }

    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.storage.find(&self.strategy, key).is_some()
    }

    /// Position of `key`, if present.
    pub fn token_of(&self, key: &K) -> Option<Token> {
        let index = self.storage.find(&self.strategy, key)?;
        Some(Token::new(self.version, Position::Slot(index)))
    }

    /// Makes room for at least `capacity` entries, switching to flat storage if that crosses the flat threshold.
    pub fn ensure_capacity(&mut self, capacity: usize) {
        if capacity > self.storage.capacity() && self.storage.resize(&self.strategy, &self.config, capacity) {
            self.bump();
        }
    }

    /// Shrinks the storage to `capacity`, which may move a flat map back to sparse storage.
    ///
    /// Does nothing, and leaves outstanding tokens valid, if the layout would not change: the map already fits in
    /// `capacity`, or it is flat and `capacity` still selects flat storage. Fails with [`Error::TrimBelowSize`]
    /// when the map holds more than `capacity` entries.
    pub fn trim(&mut self, capacity: usize) -> Result<()> {
        let len = self.len();
        if capacity < len {
            return Err(Error::TrimBelowSize {
                requested: capacity,
                len,
            });
        }
        let before = self.storage.capacity();
        if capacity < before && self.storage.resize(&self.strategy, &self.config, capacity) {
            self.bump();
            tracing::trace!(
                requested = capacity,
                before,
                after = self.storage.capacity(),
                mode = ?self.storage.mode(),
                "trimmed"
            );
        }
        Ok(())
    }

    pub fn shrink_to_fit(&mut self) {
        let len = self.storage.len();
        if len < self.storage.capacity() && self.storage.resize(&self.strategy, &self.config, len) {
            self.bump();
        }
    }

    /// Keeps only the entries for which `keep_fn` returns `true`. The null key is offered with a `None` key.
    pub fn retain<F>(&mut self, mut keep_fn: F)
    where
        F: FnMut(Option<&K>, Option<&V>) -> bool,
        K: Clone,
    {
        let mut to_remove = Vec::new();
        let mut remove_null = false;
        for (key, value) in self.iter() {
            if !keep_fn(key, value) {
                match key {
                    Some(key) => to_remove.push(key.clone()),
                    None => remove_null = true,
                }
            }
        }
        for key in &to_remove {
            self.remove(key);
        }
        if remove_null {
            self.remove_null_key();
        }
    }

    /// Checks every structural invariant of the backing storage.
    pub fn validate(&self) -> Result<()> {
        self.storage.validate(&self.strategy)?;
        let expected = self.storage.len() + usize::from(self.null_key.is_some());
        let walked = self.iter().count();
        if walked != expected {
            return Err(Error::Corrupted(format!(
                "iteration visits {walked} entries but the map holds {expected}"
            )));
        }
        Ok(())
    }

    /// Deep copy that is checked against the source before it is handed out.
    pub fn try_clone(&self) -> Result<Self>
    where
        K: Clone,
        V: Clone + PartialEq,
        S: Clone,
    {
        let copy = self.clone();
        copy.validate()
            .map_err(|err| Error::CloneFailure(err.to_string()))?;
        if copy != *self {
            return Err(Error::CloneFailure(
                "copy does not hold the same entries".to_owned(),
            ));
        }
        Ok(copy)
    }
}

impl<K, V, S> AdaptiveMap<K, V, S> {
    #[inline]
    fn bump(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    /// Number of entries, the null key included.
    #[inline]
    pub fn len(&self) -> usize {
        self.storage.len() + usize::from(self.null_key.is_some())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of slots of the current representation. In flat mode this is the size of the key domain.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.storage.mode()
    }

    /// Current version. Bumped by every mutation.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    #[inline]
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    #[inline]
    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Sizes of the lo-region and hi-region of the sparse table, `None` in flat mode.
    #[inline]
    pub fn regions(&self) -> Option<(usize, usize)> {
        self.storage.regions()
    }

    /// Stores `value` under the null key. Returns `true` if the null key was not present before.
    pub fn put_null_key(&mut self, value: Option<V>) -> bool {
        self.bump();
        self.null_key.replace(value).is_none()
    }

    pub fn remove_null_key(&mut self) -> Option<Option<V>> {
        let removed = self.null_key.take()?;
        self.bump();
        Some(removed)
    }

    #[inline]
    pub fn has_null_key(&self) -> bool {
        self.null_key.is_some()
    }

    /// Returns `true` if the null key is present and holds a value.
    #[inline]
    pub fn null_key_has_value(&self) -> bool {
        matches!(self.null_key, Some(Some(_)))
    }

    #[inline]
    pub fn null_key_value(&self) -> Option<&V> {
        self.null_key.as_ref()?.as_ref()
    }

    pub fn null_key_token(&self) -> Option<Token> {
        self.null_key
            .is_some()
            .then(|| Token::new(self.version, Position::NullKey))
    }

    /// Returns `true` if any entry, the null key included, holds `value`. `None` looks for absent values.
    pub fn contains_value(&self, value: Option<&V>) -> bool
    where
        V: PartialEq,
    {
        self.iter().any(|(_, candidate)| candidate == value)
    }

    /// Removes every entry. The capacity and representation are kept.
    pub fn clear(&mut self) {
        self.storage.clear();
        self.null_key = None;
        self.bump();
    }

    /// Iterates `(key, value)` pairs; the null key comes last with a `None` key.
    #[inline]
    pub fn iter(&self) -> Iter<'_, K, V, S> {
        Iter {
            map: self,
            next: self.position_after(None),
            remaining: self.len(),
        }
    }

    #[inline]
    pub fn keys(&self) -> impl Iterator<Item = Option<&K>> {
        self.iter().map(|(key, _)| key)
    }

    /// Mutable access to every value slot, null key last. Counts as a mutation.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut Option<V>> {
        self.bump();
        self.storage.values_mut().chain(self.null_key.as_mut())
    }

    fn position_after(&self, position: Option<Position>) -> Option<Position> {
        let from = match position {
            None => 0,
            Some(Position::Slot(index)) => index + 1,
            Some(Position::NullKey) => return None,
        };
        match self.storage.live_at_or_after(from) {
            Some(index) => Some(Position::Slot(index)),
            None => self.null_key.is_some().then_some(Position::NullKey),
        }
    }

    fn entry_at(&self, position: Position) -> Option<(Option<&K>, Option<&V>)> {
        match position {
            Position::Slot(index) => self
                .storage
                .entry(index)
                .map(|(key, value)| (Some(key), value.as_ref())),
            Position::NullKey => self.null_key.as_ref().map(|value| (None, value.as_ref())),
        }
    }

    fn check(&self, token: Token) -> Result<Position> {
        if token.version != self.version {
            return Err(Error::StaleToken {
                token_version: token.version,
                map_version: self.version,
            });
        }
        let live = match token.position {
            Position::Slot(index) => self.storage.is_live(index),
            Position::NullKey => self.null_key.is_some(),
        };
        if live {
            Ok(token.position)
        } else {
            Err(Error::InvalidToken)
        }
    }

    /// Token of the first entry in iteration order, `None` if the map is empty.
    #[inline]
    pub fn first_token(&self) -> Option<Token> {
        self.position_after(None)
            .map(|position| Token::new(self.version, position))
    }

    /// Token of the entry following `token`, `None` once the walk is complete.
    pub fn next_token(&self, token: Token) -> Result<Option<Token>> {
        let position = self.check(token)?;
        Ok(self
            .position_after(Some(position))
            .map(|position| Token::new(self.version, position)))
    }

    /// Key designated by `token`; `None` for the null key.
    pub fn key(&self, token: Token) -> Result<Option<&K>> {
        match self.check(token)? {
            Position::Slot(index) => self
                .storage
                .entry(index)
                .map(|(key, _)| Some(key))
                .ok_or(Error::InvalidToken),
            Position::NullKey => Ok(None),
        }
    }

    pub fn value(&self, token: Token) -> Result<Option<&V>> {
        let position = self.check(token)?;
        self.entry_at(position)
            .map(|(_, value)| value)
            .ok_or(Error::InvalidToken)
    }

    #[inline]
    pub fn has_value(&self, token: Token) -> Result<bool> {
        self.value(token).map(|value| value.is_some())
    }

    #[inline]
    pub fn is_key_null(&self, token: Token) -> Result<bool> {
        self.check(token)
            .map(|position| position == Position::NullKey)
    }

    /// Replaces the value designated by `token`, returning the old one. Invalidates `token`.
    pub fn set_value(&mut self, token: Token, value: Option<V>) -> Result<Option<V>> {
        let slot = match self.check(token)? {
            Position::Slot(index) => self.storage.value_mut(index),
            Position::NullKey => self.null_key.as_mut(),
        };
        let previous = core::mem::replace(slot.ok_or(Error::InvalidToken)?, value);
        self.bump();
        Ok(previous)
    }

    /// Advances an unchecked cursor; `None` starts the walk.
    ///
    /// The result is only meaningful if the map was not mutated since `previous` was obtained.
    #[inline]
    pub fn raw_next(&self, previous: Option<RawToken>) -> Option<RawToken> {
        self.position_after(previous.map(|raw| raw.0)).map(RawToken)
    }

    /// Entry under an unchecked cursor, or `None` if its position is no longer live.
    #[inline]
    pub fn raw_entry(&self, raw: RawToken) -> Option<(Option<&K>, Option<&V>)> {
        self.entry_at(raw.0)
    }
}

/// An iterator over the entries of an [`AdaptiveMap`], see [`AdaptiveMap::iter`].
pub struct Iter<'a, K, V, S> {
    map: &'a AdaptiveMap<K, V, S>,
    next: Option<Position>,
    remaining: usize,
}

impl<'a, K, V, S> Iterator for Iter<'a, K, V, S> {
    type Item = (Option<&'a K>, Option<&'a V>);

    fn next(&mut self) -> Option<Self::Item> {
        let position = self.next?;
        self.next = self.map.position_after(Some(position));
        self.remaining = self.remaining.saturating_sub(1);
        self.map.entry_at(position)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, S> ExactSizeIterator for Iter<'_, K, V, S> {}

impl<K, V, S> FusedIterator for Iter<'_, K, V, S> {}

impl<K, V, S> Clone for Iter<'_, K, V, S> {
    fn clone(&self) -> Self {
        Self {
            map: self.map,
            next: self.next,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a AdaptiveMap<K, V, S> {
    type Item = (Option<&'a K>, Option<&'a V>);
    type IntoIter = Iter<'a, K, V, S>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, S> Clone for AdaptiveMap<K, V, S>
where
    K: Clone,
    V: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            null_key: self.null_key.clone(),
            strategy: self.strategy.clone(),
            config: self.config,
            version: self.version,
        }
    }
}

impl<K, V, S> Default for AdaptiveMap<K, V, S>
where
    S: KeyStrategy<K> + Default,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> fmt::Debug for AdaptiveMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> PartialEq for AdaptiveMap<K, V, S>
where
    V: PartialEq,
    S: KeyStrategy<K>,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() || self.null_key != other.null_key {
            return false;
        }
        self.iter().all(|(key, value)| match key {
            Some(key) => other.get_nullable(key) == Some(value),
            None => true,
        })
    }
}

impl<K, V, S> Eq for AdaptiveMap<K, V, S>
where
    V: Eq,
    S: KeyStrategy<K>,
{
}

/// Consistent with [`PartialEq`] only when the strategy's `equals` agrees with `K: Eq`: keys the strategy treats
/// as the same must also hash the same through `K: Hash`.
impl<K, V, S> Hash for AdaptiveMap<K, V, S>
where
    K: Hash,
    V: Hash,
    S: KeyStrategy<K>,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        // fixed-seed hasher, so xor gives the same result for equal maps whatever their layout
        let mut hash = 0u64;
        for entry in self.iter() {
            hash ^= hash_one_fixed(entry);
        }
        state.write_u64(hash);
    }
}

impl<K, V, S> Extend<(K, V)> for AdaptiveMap<K, V, S>
where
    S: KeyStrategy<K>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        self.ensure_capacity(self.storage.len() + lower);
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for AdaptiveMap<K, V, S>
where
    S: KeyStrategy<K> + Default,
{
    #[inline]
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V, S, const N: usize> From<[(K, V); N]> for AdaptiveMap<K, V, S>
where
    S: KeyStrategy<K> + Default,
{
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}

#[cfg(feature = "serde")]
impl<K, V, RS> serde::Serialize for AdaptiveMap<K, V, RS>
where
    K: serde::Serialize,
    V: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for entry in self.iter() {
            seq.serialize_element(&entry)?;
        }
        seq.end()
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V, S> serde::Deserialize<'de> for AdaptiveMap<K, V, S>
where
    K: serde::Deserialize<'de>,
    V: serde::Deserialize<'de>,
    S: KeyStrategy<K> + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use core::marker::PhantomData;
        use serde::de::SeqAccess;
        use serde::de::Visitor;

        struct EntrySeqVisitor<K, V, S>(PhantomData<(K, V, S)>);

        impl<'de, K, V, S> Visitor<'de> for EntrySeqVisitor<K, V, S>
        where
            K: serde::Deserialize<'de>,
            V: serde::Deserialize<'de>,
            S: KeyStrategy<K> + Default,
        {
            type Value = AdaptiveMap<K, V, S>;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a sequence of (Option<K>, Option<V>) entries")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut map = AdaptiveMap::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some((key, value)) = seq.next_element::<(Option<K>, Option<V>)>()? {
                    map.put_entry(key, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_seq(EntrySeqVisitor::<K, V, S>(PhantomData))
    }
}

/// Writes `value` the way speedy encodes an `Option`: a presence byte, then the payload.
#[cfg(feature = "speedy")]
pub(crate) fn write_optional<C, T, W>(value: Option<&T>, writer: &mut W) -> Result<(), C::Error>
where
    C: speedy::Context,
    T: speedy::Writable<C>,
    W: ?Sized + speedy::Writer<C>,
{
    match value {
        Some(value) => {
            writer.write_u8(1)?;
            value.write_to(writer)
        }
        None => writer.write_u8(0),
    }
}

#[cfg(feature = "speedy")]
pub(crate) fn optional_bytes_needed<C, T>(value: Option<&T>) -> Result<usize, C::Error>
where
    C: speedy::Context,
    T: speedy::Writable<C>,
{
    match value {
        Some(value) => Ok(1 + value.bytes_needed()?),
        None => Ok(1),
    }
}

#[cfg(feature = "speedy")]
impl<'a, C, K, V, S> speedy::Readable<'a, C> for AdaptiveMap<K, V, S>
where
    C: speedy::Context,
    K: speedy::Readable<'a, C>,
    V: speedy::Readable<'a, C>,
    S: KeyStrategy<K> + Default,
{
    fn read_from<R: speedy::Reader<'a, C>>(reader: &mut R) -> Result<Self, C::Error> {
        let length = reader.read_u32()? as usize;
        let mut map = Self::with_capacity(length);
        for _ in 0..length {
            let key = <Option<K> as speedy::Readable<'a, C>>::read_from(reader)?;
            let value = <Option<V> as speedy::Readable<'a, C>>::read_from(reader)?;
            map.put_entry(key, value);
        }
        Ok(map)
    }

    #[inline]
    fn minimum_bytes_needed() -> usize {
        4
    }
}

#[cfg(feature = "speedy")]
impl<C, K, V, S> speedy::Writable<C> for AdaptiveMap<K, V, S>
where
    C: speedy::Context,
    K: speedy::Writable<C>,
    V: speedy::Writable<C>,
{
    fn write_to<W: ?Sized + speedy::Writer<C>>(
        &self,
        writer: &mut W,
    ) -> Result<(), <C as speedy::Context>::Error> {
        writer.write_u32(self.len() as u32)?;
        for (key, value) in self.iter() {
            write_optional::<C, _, _>(key, writer)?;
            write_optional::<C, _, _>(value, writer)?;
        }
        Ok(())
    }

    fn bytes_needed(&self) -> Result<usize, C::Error> {
        let mut count = core::mem::size_of::<u32>(); // for len
        for (key, value) in self.iter() {
            count += optional_bytes_needed::<C, _>(key)?;
            count += optional_bytes_needed::<C, _>(value)?;
        }
        Ok(count)
    }
}
