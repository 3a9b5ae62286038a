//! Burn-tax exemption sets.
//!
//! A pair exemption is stored as two singleton entries, one per address, so
//! membership of either address exempts a transfer. Entries are reference
//! counted: an address added by two pairs stays exempt until both are removed,
//! and inserting then removing a pair leaves the set as it was.

use crate::address::AccAddress;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExemptionSet {
    entries: BTreeMap<AccAddress, u32>,
}

impl ExemptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, address: AccAddress) {
        *self.entries.entry(address).or_insert(0) += 1;
    }

    /// Remove one reference to `address`. Returns false if it was absent.
    pub fn remove(&mut self, address: &AccAddress) -> bool {
        match self.entries.get_mut(address) {
            Some(count) if *count > 1 => {
                *count -= 1;
                true
            }
            Some(_) => {
                self.entries.remove(address);
                true
            }
            None => false,
        }
    }

    pub fn insert_pair(&mut self, a: AccAddress, b: AccAddress) {
        self.insert(a);
        self.insert(b);
    }

    pub fn remove_pair(&mut self, a: &AccAddress, b: &AccAddress) -> bool {
        let removed_a = self.remove(a);
        let removed_b = self.remove(b);
        removed_a && removed_b
    }

    /// O(log n) membership.
    pub fn contains(&self, address: &AccAddress) -> bool {
        self.entries.contains_key(address)
    }

    /// True if any of `addresses` is a member.
    pub fn contains_any(&self, addresses: &[&AccAddress]) -> bool {
        addresses.iter().any(|a| self.contains(a))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AccAddress> {
        self.entries.keys()
    }
}

impl FromIterator<AccAddress> for ExemptionSet {
    fn from_iter<I: IntoIterator<Item = AccAddress>>(iter: I) -> Self {
        let mut set = Self::new();
        for address in iter {
            set.insert(address);
        }
        set
    }
}
