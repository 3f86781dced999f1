use core::fmt;

/// Position of an entry inside a container: either a slot of the backing storage or the out-of-band null key.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub(crate) enum Position {
    Slot(usize),
    NullKey,
}

/// Versioned handle to an entry of an [`AdaptiveMap`][crate::AdaptiveMap] or [`AdaptiveSet`][crate::AdaptiveSet].
///
/// A token is only valid for the container version it was issued at. Any structural change to the container
/// (insertion, removal, value replacement, resize, mode transition, clear) makes every outstanding token stale,
/// and the safe accessors reject stale tokens with [`Error::StaleToken`][crate::Error::StaleToken].
///
/// Tokens cannot be built from raw integers; they are only handed out by the container.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub(crate) version: u64,
    pub(crate) position: Position,
}

impl Token {
    #[inline]
    pub(crate) fn new(version: u64, position: Position) -> Self {
        Self { version, position }
    }

    /// Version of the container this token was issued at.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns `true` if this token designates the null key.
    #[inline]
    pub fn is_null_key(&self) -> bool {
        self.position == Position::NullKey
    }

    /// Strips the version, producing a cursor for the unchecked iteration API.
    #[inline]
    pub fn to_raw(self) -> RawToken {
        RawToken(self.position)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Position::Slot(index) => write!(f, "Token({index}v{})", self.version),
            Position::NullKey => write!(f, "Token(null v{})", self.version),
        }
    }
}

/// Unversioned cursor for the fast iteration path.
///
/// Raw tokens are never checked against the container version. Walking with them is correct only if the
/// container is not structurally modified between calls; otherwise entries may be skipped or visited twice.
/// Accessors never read outside live storage, they just return `None` for positions that are no longer live.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct RawToken(pub(crate) Position);

impl RawToken {
    /// Returns `true` if this cursor sits on the null key.
    #[inline]
    pub fn is_null_key(&self) -> bool {
        self.0 == Position::NullKey
    }
}
