//! Staged allow-list storage.
//!
//! [`AllowListStore`] is the in-memory, ordered collection of VIDs that an
//! operator is preparing to write to the device. It is deliberately dumb:
//! it knows how to deduplicate by [`CanonicalKey`] and how to keep insertion
//! order, and nothing about devices, reboots or concurrency.
//!
//! # Examples
//!
//! ```
//! use vidgate_core::store::{AddResult, AllowListStore};
//! use vidgate_core::Vid;
//!
//! let mut store = AllowListStore::new();
//! store.replace_all(vec!["046D".to_string(), "0x18D1".to_string()]);
//!
//! let dup = Vid::normalize("0x046d").unwrap();
//! assert!(matches!(store.add(dup), AddResult::DuplicateRejected(_)));
//! assert_eq!(store.len(), 2);
//! ```

use crate::vid::{CanonicalKey, Vid, canonical_key};

/// One staged allow-list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VidEntry {
    /// Text exactly as entered or as reported by the device.
    raw: String,

    /// Deduplication key derived from `raw`.
    key: CanonicalKey,
}

impl VidEntry {
    /// Build an entry from arbitrary text, deriving its key.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let key = canonical_key(&raw);
        Self { raw, key }
    }

    /// Display text.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Deduplication key.
    #[must_use]
    pub fn key(&self) -> &CanonicalKey {
        &self.key
    }
}

impl From<Vid> for VidEntry {
    fn from(vid: Vid) -> Self {
        Self::new(vid.into_string())
    }
}

/// Result of [`AllowListStore::add`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddResult {
    /// Appended at the given index.
    Added(usize),

    /// An entry with the same canonical key already exists; nothing changed.
    DuplicateRejected(CanonicalKey),
}

/// Result of [`AllowListStore::remove_at`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveResult {
    /// The entry that was removed.
    Removed(VidEntry),

    /// Index was outside `[0, len)`; nothing changed.
    OutOfRange,
}

/// Ordered, canonically deduplicated list of staged VIDs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowListStore {
    entries: Vec<VidEntry>,
}

impl AllowListStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every entry with `items`, in order.
    ///
    /// Items are taken verbatim: no validation and no deduplication.
    /// Keys are still derived so that subsequent [`add`](Self::add) calls
    /// dedupe against device-sourced entries.
    pub fn replace_all<I, S>(&mut self, items: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries = items.into_iter().map(VidEntry::new).collect();
    }

    /// Append a normalized VID unless its canonical key is already present.
    pub fn add(&mut self, vid: Vid) -> AddResult {
        let key = vid.canonical_key();
        if self.contains_key(&key) {
            return AddResult::DuplicateRejected(key);
        }

        self.entries.push(VidEntry::from(vid));
        AddResult::Added(self.entries.len() - 1)
    }

    /// Remove the entry at `index`, keeping the order of the rest.
    pub fn remove_at(&mut self, index: usize) -> RemoveResult {
        if index >= self.entries.len() {
            return RemoveResult::OutOfRange;
        }
        RemoveResult::Removed(self.entries.remove(index))
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Whether any entry has the given canonical key.
    #[must_use]
    pub fn contains_key(&self, key: &CanonicalKey) -> bool {
        self.entries.iter().any(|entry| entry.key() == key)
    }

    /// Index of the first entry with the given canonical key.
    #[must_use]
    pub fn position_of(&self, key: &CanonicalKey) -> Option<usize> {
        self.entries.iter().position(|entry| entry.key() == key)
    }

    /// Raw texts in staged order; the exact payload written on apply.
    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.raw.clone()).collect()
    }

    /// Iterate entries in staged order.
    pub fn iter(&self) -> std::slice::Iter<'_, VidEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<'a> IntoIterator for &'a AllowListStore {
    type Item = &'a VidEntry;
    type IntoIter = std::slice::Iter<'a, VidEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn vid(raw: &str) -> Vid {
        Vid::normalize(raw).unwrap()
    }

    fn store_of(items: &[&str]) -> AllowListStore {
        let mut store = AllowListStore::new();
        store.replace_all(items.iter().copied());
        store
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = AllowListStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert!(store.to_vec().is_empty());
    }

    #[test]
    fn test_add_appends_in_order() {
        let mut store = AllowListStore::new();

        assert_eq!(store.add(vid("046d")), AddResult::Added(0));
        assert_eq!(store.add(vid("0x18d1")), AddResult::Added(1));

        assert_eq!(store.to_vec(), vec!["046D", "0x18D1"]);
    }

    #[test]
    fn test_add_rejects_same_key_in_other_form() {
        let mut store = AllowListStore::new();
        store.add(vid("046D"));

        let result = store.add(vid("0x046d"));

        assert!(matches!(
            result,
            AddResult::DuplicateRejected(ref key) if key == "046D"
        ));
        assert_eq!(store.len(), 1);
        assert_eq!(store.to_vec(), vec!["046D"]);
    }

    #[test]
    fn test_add_dedupes_against_replaced_entries() {
        let mut store = store_of(&["046D", "0x18D1"]);

        let result = store.add(vid("0x046D"));

        assert_eq!(result, AddResult::DuplicateRejected(canonical_key("046D")));
        assert_eq!(store.to_vec(), vec!["046D", "0x18D1"]);
    }

    #[test]
    fn test_replace_all_keeps_items_verbatim() {
        // Device-sourced lists are trusted, including duplicates.
        let store = store_of(&["0x046d", "046D", " abc "]);

        assert_eq!(store.to_vec(), vec!["0x046d", "046D", " abc "]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_replace_all_discards_previous_entries() {
        let mut store = store_of(&["046D"]);
        store.replace_all(vec!["1234".to_string()]);
        assert_eq!(store.to_vec(), vec!["1234"]);
    }

    #[test]
    fn test_remove_at_keeps_relative_order() {
        let mut store = store_of(&["AAAA", "BBBB", "CCCC", "DDDD"]);

        let removed = store.remove_at(1);

        assert_eq!(removed, RemoveResult::Removed(VidEntry::new("BBBB")));
        assert_eq!(store.to_vec(), vec!["AAAA", "CCCC", "DDDD"]);
    }

    #[test]
    fn test_remove_at_out_of_range_is_noop() {
        let mut store = store_of(&["AAAA"]);

        assert_eq!(store.remove_at(1), RemoveResult::OutOfRange);
        assert_eq!(store.remove_at(usize::MAX), RemoveResult::OutOfRange);
        assert_eq!(store.to_vec(), vec!["AAAA"]);
    }

    #[test]
    fn test_remove_from_empty_store() {
        let mut store = AllowListStore::new();
        assert_eq!(store.remove_at(0), RemoveResult::OutOfRange);
    }

    #[test]
    fn test_removed_key_can_be_added_again() {
        let mut store = store_of(&["046D"]);
        store.remove_at(0);

        assert_eq!(store.add(vid("0x046D")), AddResult::Added(0));
    }

    #[test]
    fn test_position_of() {
        let store = store_of(&["AAAA", "0x18D1"]);

        assert_eq!(store.position_of(&canonical_key("18d1")), Some(1));
        assert_eq!(store.position_of(&canonical_key("FFFF")), None);
    }

    #[test]
    fn test_clear() {
        let mut store = store_of(&["AAAA", "BBBB"]);
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_entry_accessors() {
        let entry = VidEntry::from(vid("0x18d1"));
        assert_eq!(entry.raw(), "0x18D1");
        assert_eq!(entry.key(), &canonical_key("18D1"));
    }

    proptest! {
        #[test]
        fn prop_remove_at_shrinks_by_one(
            items in prop::collection::vec("[0-9A-F]{4}", 1..16),
            pick in any::<prop::sample::Index>(),
        ) {
            let mut store = AllowListStore::new();
            store.replace_all(items.clone());
            let index = pick.index(items.len());

            let before = store.to_vec();
            let removed = store.remove_at(index);
            let after = store.to_vec();

            let mut expected = before.clone();
            let gone = expected.remove(index);

            prop_assert_eq!(removed, RemoveResult::Removed(VidEntry::new(gone)));
            prop_assert_eq!(after.len(), before.len() - 1);
            prop_assert_eq!(after, expected);
        }

        #[test]
        fn prop_add_never_duplicates_keys(raws in prop::collection::vec("(0[xX])?[0-9a-fA-F]{1,4}", 0..24)) {
            let mut store = AllowListStore::new();
            for raw in &raws {
                store.add(Vid::normalize(raw).unwrap());
            }

            let mut keys: Vec<_> = store.iter().map(|e| e.key().clone()).collect();
            let total = keys.len();
            keys.sort();
            keys.dedup();
            prop_assert_eq!(keys.len(), total);
        }
    }
}
