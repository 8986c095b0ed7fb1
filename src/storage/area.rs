use anyhow::Result;

/// Object-safe key/value storage area (DOM's Storage).
pub trait StorageArea: Send + Sync {
    /// Retrieves the value associated with the given key, or `None` if not found.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Sets the value for the given key, overwriting any existing value.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Removes the item with the given key. Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;

    /// Returns the number of items in the storage area.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Shared contract checks, run against every backend.
#[cfg(test)]
pub(crate) fn assert_area_contract(area: &dyn StorageArea) {
    // starts empty
    assert_eq!(area.len(), 0);
    assert!(area.is_empty());
    assert!(area.get_item("missing").is_none());

    // set + get
    area.set_item("b", "2").unwrap();
    area.set_item("a", "1").unwrap();
    assert_eq!(area.len(), 2);
    assert_eq!(area.get_item("a").as_deref(), Some("1"));
    assert_eq!(area.get_item("b").as_deref(), Some("2"));

    // overwrite keeps len()
    area.set_item("a", "ONE").unwrap();
    assert_eq!(area.len(), 2);
    assert_eq!(area.get_item("a").as_deref(), Some("ONE"));

    // remove, twice
    area.remove_item("b").unwrap();
    area.remove_item("b").unwrap();
    assert_eq!(area.len(), 1);
    assert!(area.get_item("b").is_none());

    area.remove_item("a").unwrap();
    assert!(area.is_empty());
}
