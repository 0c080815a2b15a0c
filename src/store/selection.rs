//! Selection set keyed by (id, kind).

use crate::remote::DeleteItemsRequest;
use crate::types::{ItemId, ItemKind};
use serde::Serialize;

/// Identifies a selectable item independently of any particular object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SelectionKey {
    pub id: ItemId,
    pub kind: ItemKind,
}

impl SelectionKey {
    pub fn new(id: impl Into<ItemId>, kind: ItemKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }

    pub fn folder(id: impl Into<ItemId>) -> Self {
        Self::new(id, ItemKind::Folder)
    }

    pub fn file(id: impl Into<ItemId>) -> Self {
        Self::new(id, ItemKind::File)
    }
}

/// Chosen items, unique by (id, kind), kept in the order they were picked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionSet {
    keys: Vec<SelectionKey>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove `key` if an equal key is present, otherwise add it.
    /// Returns whether the key is selected afterwards.
    pub fn toggle(&mut self, key: SelectionKey) -> bool {
        match self.keys.iter().position(|k| *k == key) {
            Some(index) => {
                self.keys.remove(index);
                false
            }
            None => {
                self.keys.push(key);
                true
            }
        }
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn contains(&self, key: &SelectionKey) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn can_rename(&self) -> bool {
        self.keys.len() == 1
    }

    pub fn can_delete(&self) -> bool {
        !self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectionKey> {
        self.keys.iter()
    }

    /// The only selected key, when exactly one is selected.
    pub fn single(&self) -> Option<&SelectionKey> {
        match self.keys.as_slice() {
            [key] => Some(key),
            _ => None,
        }
    }

    /// Split the selection into the batch-delete body.
    pub fn to_delete_request(&self) -> DeleteItemsRequest {
        let ids_of = |kind: ItemKind| {
            self.keys
                .iter()
                .filter(|k| k.kind == kind)
                .map(|k| k.id.clone())
                .collect()
        };
        DeleteItemsRequest {
            folder_ids: ids_of(ItemKind::Folder),
            file_ids: ids_of(ItemKind::File),
        }
    }
}
