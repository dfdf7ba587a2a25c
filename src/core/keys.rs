use std::fmt;
use bytes::Bytes;
use crate::core::error::{Error, ErrorKind, Result};

mod sealed {
    pub trait Sealed {}

    impl Sealed for u32 {}
    impl Sealed for u64 {}
    impl Sealed for i32 {}
    impl Sealed for i64 {}
    impl Sealed for super::ByteKey {}
}

/// Key strategy for roll numbers and course identifiers.
///
/// The set of implementors is closed: unsigned and signed integers, and
/// [`ByteKey`]. Ordering is numeric for integers and byte-lexicographic for
/// byte strings. Equality is exact for both, so two byte keys that differ
/// only in letter case are distinct.
pub trait RecordKey: sealed::Sealed + Clone + fmt::Debug + fmt::Display + Send + Sync + 'static {
    fn key_less(&self, other: &Self) -> bool;

    fn key_eq(&self, other: &Self) -> bool;

    fn parse_key(raw: &str) -> Result<Self>;
}

macro_rules! numeric_key {
    ($($ty:ty),*) => {
        $(
            impl RecordKey for $ty {
                #[inline]
                fn key_less(&self, other: &Self) -> bool {
                    self < other
                }

                #[inline]
                fn key_eq(&self, other: &Self) -> bool {
                    self == other
                }

                fn parse_key(raw: &str) -> Result<Self> {
                    let trimmed = raw.trim();
                    trimmed.parse::<$ty>().map_err(|e| {
                        Error::new(
                            ErrorKind::Parse,
                            format!("invalid {} key {:?}: {}", stringify!($ty), trimmed, e),
                        )
                    })
                }
            }
        )*
    };
}

numeric_key!(u32, u64, i32, i64);

/// Owned byte-string key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ByteKey(Bytes);

impl ByteKey {
    pub fn new(raw: impl AsRef<[u8]>) -> Self {
        ByteKey(Bytes::copy_from_slice(raw.as_ref()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copy with ASCII letters upper-cased, for normalizing user input
    /// before an exact-match lookup.
    pub fn to_ascii_uppercase(&self) -> Self {
        ByteKey(Bytes::from(self.0.to_ascii_uppercase()))
    }
}

impl RecordKey for ByteKey {
    #[inline]
    fn key_less(&self, other: &Self) -> bool {
        self.0.as_ref() < other.0.as_ref()
    }

    #[inline]
    fn key_eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }

    fn parse_key(raw: &str) -> Result<Self> {
        Ok(ByteKey::new(raw.trim()))
    }
}

impl fmt::Display for ByteKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

impl From<&str> for ByteKey {
    fn from(raw: &str) -> Self {
        ByteKey::new(raw)
    }
}

impl From<String> for ByteKey {
    fn from(raw: String) -> Self {
        ByteKey(Bytes::from(raw.into_bytes()))
    }
}
