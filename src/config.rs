/// Number of colliding entries an insert may walk before a reseedable strategy triggers a full rehash.
pub const DEFAULT_COLLISION_THRESHOLD: usize = 100;

/// Divisor applied to the key domain size to derive the default flat threshold.
///
/// With 16-bit keys the map turns flat once it would need more than 4096 slots; with 8-bit keys, more than 16.
pub const DEFAULT_FLAT_DIVISOR: usize = 16;

/// Tuning knobs of an [`AdaptiveMap`][crate::AdaptiveMap] or [`AdaptiveSet`][crate::AdaptiveSet].
///
/// ```
/// use tokmap::MapConfig;
/// use tokmap::U16Map;
///
/// // never leave sparse mode, whatever the size
/// let mut map = U16Map::<&str>::with_config(MapConfig::default().never_flat());
/// map.put(7, "seven");
/// assert_eq!(map.mode(), tokmap::Mode::Sparse);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MapConfig {
    /// Capacity reserved when the container is created.
    pub initial_capacity: usize,
    /// Capacity above which a container with a bounded key domain switches to flat storage.
    ///
    /// `None` derives it from the domain size (see [`DEFAULT_FLAT_DIVISOR`]). Ignored when the key strategy has
    /// no bounded domain.
    pub flat_threshold: Option<usize>,
    /// See [`DEFAULT_COLLISION_THRESHOLD`].
    pub collision_threshold: usize,
}

impl Default for MapConfig {
    #[inline]
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            flat_threshold: None,
            collision_threshold: DEFAULT_COLLISION_THRESHOLD,
        }
    }
}

impl MapConfig {
    #[inline]
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    #[inline]
    pub fn with_flat_threshold(mut self, threshold: usize) -> Self {
        self.flat_threshold = Some(threshold);
        self
    }

    /// Keeps the container in sparse mode regardless of its size.
    #[inline]
    pub fn never_flat(self) -> Self {
        self.with_flat_threshold(usize::MAX)
    }

    /// Switches to flat mode as soon as any capacity is needed.
    #[inline]
    pub fn always_flat(self) -> Self {
        self.with_flat_threshold(0)
    }

    #[inline]
    pub fn with_collision_threshold(mut self, threshold: usize) -> Self {
        self.collision_threshold = threshold;
        self
    }

    /// Flat threshold that applies to a key domain of `domain_len` keys.
    #[inline]
    pub fn flat_threshold_for(&self, domain_len: usize) -> usize {
        self.flat_threshold
            .unwrap_or(domain_len / DEFAULT_FLAT_DIVISOR)
    }
}
