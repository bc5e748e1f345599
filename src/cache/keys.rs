//! Key Scheme Module
//!
//! Maps a type and an addressing mode to physical backend names.
//!
//! Case folding is the only normalization. Two types (or two indices) whose
//! names differ only by case share a namespace; keeping them apart is the
//! caller's responsibility.

use std::fmt;

// == Type Tag ==
/// Lowercased name of a domain type, used as a namespace root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeTag(String);

impl TypeTag {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().to_lowercase())
    }

    /// Derives the tag from the Rust type name, without module path or
    /// generic arguments. `Page<Order>` and `Page<Invoice>` both map to
    /// `page`.
    pub fn of<T: ?Sized>() -> Self {
        let full = std::any::type_name::<T>();
        let base = full.split('<').next().unwrap_or(full);
        let short = base.rsplit("::").next().unwrap_or(base);
        Self::new(short)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// == Index Name ==
/// Lowercased name of a custom secondary index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexName(String);

impl IndexName {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// == Namespace ==
/// Physical bucket name (Grouped-Hash) or key prefix (Keyed-String).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace(String);

impl Namespace {
    /// Namespace for identity addressing: the type tag itself.
    pub fn primary(tag: &TypeTag) -> Self {
        Self(tag.0.clone())
    }

    /// Namespace for a custom index: `tag_by_index`.
    pub fn secondary(tag: &TypeTag, index: &IndexName) -> Self {
        Self(format!("{}_by_{}", tag.0, index.0))
    }

    /// An arbitrary, caller-named bucket.
    pub fn named(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// == Entry Key ==
/// Full address of a single cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntryKey {
    /// A member inside a namespace; the member is used verbatim.
    Member { namespace: Namespace, member: String },
    /// A caller-chosen key used verbatim, outside any namespace.
    Raw(String),
}

impl EntryKey {
    pub fn member(namespace: Namespace, member: impl Into<String>) -> Self {
        EntryKey::Member {
            namespace,
            member: member.into(),
        }
    }

    pub fn raw(key: impl Into<String>) -> Self {
        EntryKey::Raw(key.into())
    }

    /// Single-key form used by the Keyed-String layout.
    pub fn flattened(&self) -> String {
        match self {
            EntryKey::Member { namespace, member } => flatten(namespace, member),
            EntryKey::Raw(key) => key.clone(),
        }
    }
}

/// Joins a namespace and a member into `namespace:member`.
pub fn flatten(namespace: &Namespace, member: &str) -> String {
    format!("{}:{}", namespace.0, member)
}
