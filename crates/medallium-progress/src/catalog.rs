//! Read-only index over the external item catalog.

use std::collections::BTreeMap;

use medallium_types::{CategoryKind, CollectibleItem, ItemId};

/// Source of the full static list of collectible items.
pub trait CatalogProvider {
    /// Every catalog item.
    fn items(&self) -> Vec<CollectibleItem>;
}

impl CatalogProvider for Vec<CollectibleItem> {
    fn items(&self) -> Vec<CollectibleItem> {
        self.clone()
    }
}

impl CatalogProvider for [CollectibleItem] {
    fn items(&self) -> Vec<CollectibleItem> {
        self.to_vec()
    }
}

/// Catalog items indexed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    items: BTreeMap<ItemId, CollectibleItem>,
}

impl Catalog {
    /// Build an index from a provider. Later duplicates of an id replace
    /// earlier ones.
    pub fn from_provider<P: CatalogProvider + ?Sized>(provider: &P) -> Self {
        Self::from_items(provider.items())
    }

    /// Build an index from items.
    pub fn from_items(items: impl IntoIterator<Item = CollectibleItem>) -> Self {
        Self {
            items: items
                .into_iter()
                .map(|item| (item.id.clone(), item))
                .collect(),
        }
    }

    /// Look up one item.
    pub fn get(&self, id: &str) -> Option<&CollectibleItem> {
        self.items.get(id)
    }

    /// All items, ordered by id.
    pub fn items(&self) -> impl Iterator<Item = &CollectibleItem> {
        self.items.values()
    }

    /// Number of catalog items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item count per category value, e.g. tribe name to number of items.
    pub fn totals_by(&self, kind: CategoryKind) -> BTreeMap<&str, usize> {
        let mut totals: BTreeMap<&str, usize> = BTreeMap::new();
        for value in self.items.values().filter_map(|item| item.category(kind)) {
            let count = totals.entry(value).or_insert(0);
            *count = count.saturating_add(1);
        }
        totals
    }

    /// Number of items whose `kind` equals `value`.
    pub fn count_in(&self, kind: CategoryKind, value: &str) -> usize {
        self.items
            .values()
            .filter(|item| item.category(kind) == Some(value))
            .count()
    }
}
