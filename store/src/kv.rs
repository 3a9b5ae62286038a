//! Module-scoped key-value storage.

/// Raw byte store scoped to the tax module.
///
/// Writes land in the current transaction branch and become visible to other
/// transactions only when the branch is committed.
pub trait KvStore {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;
    fn set(&mut self, key: &[u8], value: Vec<u8>);
    fn delete(&mut self, key: &[u8]);

    fn has(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }
}
