//! Per-entity client-side caches
//!
//! A slice mirrors one server collection. Screens fill it from a list call and
//! then reconcile it with the server's answer to each mutation rather than
//! re-fetching the whole collection.

use serde_json::Value;

/// Something with a server-assigned identifier
pub trait Identified {
    fn id(&self) -> Option<&str>;
}

impl Identified for Value {
    /// Reads `_id`, falling back to `id`
    fn id(&self) -> Option<&str> {
        self.get("_id")
            .or_else(|| self.get("id"))
            .and_then(Value::as_str)
    }
}

/// Cached state for one entity collection
#[derive(Clone, Debug, PartialEq)]
pub struct EntitySlice<T> {
    items: Vec<T>,
    loading: bool,
    error: Option<String>,
}

impl<T> Default for EntitySlice<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

impl<T: Identified> EntitySlice<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// A request for this collection started
    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Store a freshly fetched list
    pub fn replace_all(&mut self, items: Vec<T>) {
        self.items = items;
        self.loading = false;
        self.error = None;
    }

    /// Apply a created or updated item returned by the server
    ///
    /// Replaces the cached item with the same id in place, or appends.
    pub fn upsert(&mut self, item: T) {
        let existing = item
            .id()
            .and_then(|id| self.items.iter().position(|cached| cached.id() == Some(id)));

        match existing {
            Some(index) => self.items[index] = item,
            None => self.items.push(item),
        }
        self.loading = false;
        self.error = None;
    }

    /// Drop a deleted item; returns whether it was cached
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|cached| cached.id() != Some(id));
        self.loading = false;
        self.error = None;
        self.items.len() != before
    }

    /// A request failed; cached items are kept
    pub fn fail(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
    }

    pub fn find(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|cached| cached.id() == Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vehicles() -> Vec<Value> {
        vec![
            json!({"_id": "v1", "plate": "WP CAB-1234"}),
            json!({"_id": "v2", "plate": "CP LH-5678"}),
        ]
    }

    #[test]
    fn test_begin_and_replace() {
        let mut slice = EntitySlice::new();
        slice.begin();
        assert!(slice.is_loading());

        slice.replace_all(vehicles());
        assert!(!slice.is_loading());
        assert_eq!(slice.items().len(), 2);
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut slice = EntitySlice::new();
        slice.replace_all(vehicles());

        slice.upsert(json!({"_id": "v1", "plate": "WP CAB-9999"}));
        assert_eq!(slice.items().len(), 2);
        assert_eq!(slice.items()[0]["plate"], "WP CAB-9999");

        slice.upsert(json!({"id": "v3", "plate": "SP KA-0001"}));
        assert_eq!(slice.items().len(), 3);
        assert!(slice.find("v3").is_some());
    }

    #[test]
    fn test_remove_and_fail() {
        let mut slice = EntitySlice::new();
        slice.replace_all(vehicles());

        assert!(slice.remove("v2"));
        assert!(!slice.remove("v2"));
        assert_eq!(slice.items().len(), 1);

        slice.begin();
        slice.fail("Vehicle is assigned to an order");
        assert!(!slice.is_loading());
        assert_eq!(slice.error(), Some("Vehicle is assigned to an order"));
        assert_eq!(slice.items().len(), 1);
    }
}
