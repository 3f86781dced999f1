use core::fmt;
use core::hash::Hash;
use core::hash::Hasher;

use crate::adaptive_map;
use crate::adaptive_map::AdaptiveMap;
use crate::config::MapConfig;
use crate::error::Result;
use crate::key_strategy::KeyStrategy;
use crate::key_strategy::RandomStrategy;
use crate::storage::Mode;
use crate::token::RawToken;
use crate::token::Token;

/// A set with the same adaptive storage as [`AdaptiveMap`], plus an optional null element.
///
/// This is an `AdaptiveMap<T, (), S>` underneath; tokens, versioning, and mode transitions behave identically.
pub struct AdaptiveSet<T, S = RandomStrategy> {
    pub(crate) inner: AdaptiveMap<T, (), S>,
}

impl<T, S> AdaptiveSet<T, S>
where
    S: KeyStrategy<T> + Default,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            inner: AdaptiveMap::new(),
        }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: AdaptiveMap::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn with_config(config: MapConfig) -> Self {
        Self {
            inner: AdaptiveMap::with_config(config),
        }
    }
}

impl<T, S> AdaptiveSet<T, S>
where
    S: KeyStrategy<T>,
{
    #[inline]
    pub fn with_config_and_strategy(config: MapConfig, strategy: S) -> Self {
        Self {
            inner: AdaptiveMap::with_config_and_strategy(config, strategy),
        }
    }

    /// Returns `true` if `value` was not present before.
    #[inline]
    pub fn insert(&mut self, value: T) -> bool {
        self.inner.put_absent(value)
    }

    /// Returns `true` if `value` was present.
    #[inline]
    pub fn remove(&mut self, value: &T) -> bool {
        self.inner.remove(value).is_some()
    }

    #[inline]
    pub fn contains(&self, value: &T) -> bool {
        self.inner.contains_key(value)
    }

    #[inline]
    pub fn token_of(&self, value: &T) -> Option<Token> {
        self.inner.token_of(value)
    }

    #[inline]
    pub fn ensure_capacity(&mut self, capacity: usize) {
        self.inner.ensure_capacity(capacity);
    }

    /// See [`AdaptiveMap::trim`].
    #[inline]
    pub fn trim(&mut self, capacity: usize) -> Result<()> {
        self.inner.trim(capacity)
    }

    #[inline]
    pub fn shrink_to_fit(&mut self) {
        self.inner.shrink_to_fit();
    }

    pub fn retain<F>(&mut self, mut keep_fn: F)
    where
        F: FnMut(Option<&T>) -> bool,
        T: Clone,
    {
        self.inner.retain(|value, _| keep_fn(value));
    }

    #[inline]
    pub fn validate(&self) -> Result<()> {
        self.inner.validate()
    }
}

impl<T, S> AdaptiveSet<T, S> {
    /// Number of elements, the null element included.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.inner.mode()
    }

    /// Adds the null element. Returns `true` if it was not present before.
    #[inline]
    pub fn insert_null(&mut self) -> bool {
        self.inner.put_null_key(None)
    }

    #[inline]
    pub fn remove_null(&mut self) -> bool {
        self.inner.remove_null_key().is_some()
    }

    #[inline]
    pub fn contains_null(&self) -> bool {
        self.inner.has_null_key()
    }

    #[inline]
    pub fn null_token(&self) -> Option<Token> {
        self.inner.null_key_token()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Iterates the elements; the null element comes last as `None`.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T, S> {
        Iter {
            iter: self.inner.iter(),
        }
    }

    #[inline]
    pub fn first_token(&self) -> Option<Token> {
        self.inner.first_token()
    }

    #[inline]
    pub fn next_token(&self, token: Token) -> Result<Option<Token>> {
        self.inner.next_token(token)
    }

    /// Element designated by `token`; `None` for the null element.
    #[inline]
    pub fn key(&self, token: Token) -> Result<Option<&T>> {
        self.inner.key(token)
    }

    #[inline]
    pub fn is_key_null(&self, token: Token) -> Result<bool> {
        self.inner.is_key_null(token)
    }

    #[inline]
    pub fn raw_next(&self, previous: Option<RawToken>) -> Option<RawToken> {
        self.inner.raw_next(previous)
    }

    /// Element under an unchecked cursor: `Some(None)` is the null element.
    #[inline]
    pub fn raw_key(&self, raw: RawToken) -> Option<Option<&T>> {
        self.inner.raw_entry(raw).map(|(key, _)| key)
    }
}

/// An iterator over the elements of an [`AdaptiveSet`], see [`AdaptiveSet::iter`].
pub struct Iter<'a, T, S> {
    iter: adaptive_map::Iter<'a, T, (), S>,
}

impl<'a, T, S> Iterator for Iter<'a, T, S> {
    type Item = Option<&'a T>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(key, _)| key)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<T, S> ExactSizeIterator for Iter<'_, T, S> {}

impl<'a, T, S> IntoIterator for &'a AdaptiveSet<T, S> {
    type Item = Option<&'a T>;
    type IntoIter = Iter<'a, T, S>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, S> Clone for AdaptiveSet<T, S>
where
    T: Clone,
    S: Clone,
{
    #[inline]
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T, S> Default for AdaptiveSet<T, S>
where
    S: KeyStrategy<T> + Default,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S> fmt::Debug for AdaptiveSet<T, S>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, S> PartialEq for AdaptiveSet<T, S>
where
    S: KeyStrategy<T>,
{
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T, S> Eq for AdaptiveSet<T, S> where S: KeyStrategy<T> {}

/// Consistent with [`PartialEq`] under the same condition as the map: the strategy must agree with `T: Eq`.
impl<T, S> Hash for AdaptiveSet<T, S>
where
    T: Hash,
    S: KeyStrategy<T>,
{
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.hash(state);
    }
}

impl<T, S> Extend<T> for AdaptiveSet<T, S>
where
    S: KeyStrategy<T>,
{
    #[inline]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.inner.extend(iter.into_iter().map(|value| (value, ())));
    }
}

impl<T, S> FromIterator<T> for AdaptiveSet<T, S>
where
    S: KeyStrategy<T> + Default,
{
    #[inline]
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T, S, const N: usize> From<[T; N]> for AdaptiveSet<T, S>
where
    S: KeyStrategy<T> + Default,
{
    fn from(arr: [T; N]) -> Self {
        arr.into_iter().collect()
    }
}

#[cfg(feature = "serde")]
impl<T, RS> serde::Serialize for AdaptiveSet<T, RS>
where
    T: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for elt in self.iter() {
            seq.serialize_element(&elt)?;
        }
        seq.end()
    }
}

#[cfg(feature = "serde")]
impl<'de, T, S> serde::Deserialize<'de> for AdaptiveSet<T, S>
where
    T: serde::Deserialize<'de>,
    S: KeyStrategy<T> + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use core::marker::PhantomData;
        use serde::de::SeqAccess;
        use serde::de::Visitor;

        struct ElementSeqVisitor<T, S>(PhantomData<(T, S)>);

        impl<'de, T, S> Visitor<'de> for ElementSeqVisitor<T, S>
        where
            T: serde::Deserialize<'de>,
            S: KeyStrategy<T> + Default,
        {
            type Value = AdaptiveSet<T, S>;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a sequence of Option<T>")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut set = AdaptiveSet::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(elt) = seq.next_element::<Option<T>>()? {
                    match elt {
                        Some(elt) => set.insert(elt),
                        None => set.insert_null(),
                    };
                }
                Ok(set)
            }
        }

        deserializer.deserialize_seq(ElementSeqVisitor::<T, S>(PhantomData))
    }
}

#[cfg(feature = "speedy")]
impl<'a, C, T, S> speedy::Readable<'a, C> for AdaptiveSet<T, S>
where
    C: speedy::Context,
    T: speedy::Readable<'a, C>,
    S: KeyStrategy<T> + Default,
{
    fn read_from<R: speedy::Reader<'a, C>>(reader: &mut R) -> Result<Self, C::Error> {
        let length = reader.read_u32()? as usize;
        let mut set = Self::with_capacity(length);
        for _ in 0..length {
            match <Option<T> as speedy::Readable<'a, C>>::read_from(reader)? {
                Some(elt) => set.insert(elt),
                None => set.insert_null(),
            };
        }
        Ok(set)
    }

    #[inline]
    fn minimum_bytes_needed() -> usize {
        4
    }
}

#[cfg(feature = "speedy")]
impl<C, T, S> speedy::Writable<C> for AdaptiveSet<T, S>
where
    C: speedy::Context,
    T: speedy::Writable<C>,
{
    fn write_to<W: ?Sized + speedy::Writer<C>>(
        &self,
        writer: &mut W,
    ) -> Result<(), <C as speedy::Context>::Error> {
        writer.write_u32(self.len() as u32)?;
        for elt in self.iter() {
            adaptive_map::write_optional::<C, _, _>(elt, writer)?;
        }
        Ok(())
    }

    fn bytes_needed(&self) -> Result<usize, C::Error> {
        let mut count = core::mem::size_of::<u32>(); // for len
        for elt in self.iter() {
            count += adaptive_map::optional_bytes_needed::<C, _>(elt)?;
        }
        Ok(count)
    }
}
