//! String interner for identifiers and literal text.
//!
//! Interning is thread-safe so that independent units can be lowered in
//! parallel against one shared interner.

use super::Name;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// Storage behind the lock.
struct InternTable {
    /// Map from string content to its name.
    map: FxHashMap<&'static str, Name>,
    /// Storage for string contents, indexed by `Name::index`.
    strings: Vec<&'static str>,
}

/// Thread-safe string interner.
///
/// Interned strings live for the rest of the process; names are only
/// meaningful for the interner that produced them.
pub struct StringInterner {
    table: RwLock<InternTable>,
}

impl StringInterner {
    /// Create a new interner with the empty string pre-interned.
    pub fn new() -> Self {
        let empty: &'static str = "";
        let mut map = FxHashMap::default();
        map.insert(empty, Name::EMPTY);
        Self {
            table: RwLock::new(InternTable {
                map,
                strings: vec![empty],
            }),
        }
    }

    /// Intern a string, returning its name.
    pub fn intern(&self, s: &str) -> Name {
        if let Some(&name) = self.table.read().map.get(s) {
            return name;
        }

        let mut table = self.table.write();
        // Another writer may have inserted it between the two locks.
        if let Some(&name) = table.map.get(s) {
            return name;
        }
        let index = u32::try_from(table.strings.len())
            .unwrap_or_else(|_| panic!("interner exceeded u32::MAX strings"));
        let name = Name::from_raw(index);
        let owned: &'static str = Box::leak(s.to_owned().into_boxed_str());
        table.strings.push(owned);
        table.map.insert(owned, name);
        name
    }

    /// Look up the string for a name.
    ///
    /// Names from a different interner resolve to the empty string.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.table
            .read()
            .strings
            .get(name.index())
            .copied()
            .unwrap_or("")
    }

    /// Number of interned strings, including the empty string.
    pub fn len(&self) -> usize {
        self.table.read().strings.len()
    }

    /// Always false: the empty string is pre-interned.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}
