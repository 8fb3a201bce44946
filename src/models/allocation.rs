//! Allocation (solution) model.
//!
//! An allocation is the ordered list of facilities a greedy policy decided
//! to use, each with the quantity it supplies. Entries keep the order in
//! which the policy appended them, so the remainder-bearing entry is last.

use serde::{Deserialize, Serialize};

use super::Facility;

/// One facility together with the quantity assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationEntry {
    /// The facility supplying the quantity.
    pub facility: Facility,
    /// Quantity assigned to the facility.
    pub quantity: f64,
}

impl AllocationEntry {
    /// Creates an entry.
    pub fn new(facility: Facility, quantity: f64) -> Self {
        Self { facility, quantity }
    }

    /// Fixed plus variable cost of this entry.
    #[inline]
    pub fn cost(&self) -> f64 {
        self.facility.cost_for(self.quantity)
    }

    /// Whether the facility runs below its capacity.
    #[inline]
    pub fn is_partial(&self) -> bool {
        self.quantity < self.facility.capacity
    }
}

/// Facilities and quantities chosen by an allocator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    /// Name of the policy that produced this allocation.
    pub policy: String,
    /// Entries in the order they were appended.
    pub entries: Vec<AllocationEntry>,
}

impl Allocation {
    /// Creates an empty allocation for the named policy.
    pub fn new(policy: impl Into<String>) -> Self {
        Self {
            policy: policy.into(),
            entries: Vec::new(),
        }
    }

    /// Appends a facility with its assigned quantity.
    pub fn push(&mut self, facility: Facility, quantity: f64) {
        self.entries.push(AllocationEntry::new(facility, quantity));
    }

    /// Number of facilities used.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no facility is used.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the entries.
    pub fn iter(&self) -> impl Iterator<Item = &AllocationEntry> {
        self.entries.iter()
    }

    /// Sum of assigned quantities.
    pub fn total_assigned(&self) -> f64 {
        self.entries.iter().map(|e| e.quantity).sum()
    }

    /// Entries running below capacity.
    pub fn partial_entries(&self) -> impl Iterator<Item = &AllocationEntry> {
        self.entries.iter().filter(|e| e.is_partial())
    }

    /// Quantity assigned to the facility with the given ID.
    pub fn quantity_of(&self, facility_id: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.facility.id == facility_id)
            .map(|e| e.quantity)
    }

    /// IDs of the facilities used, in allocation order.
    pub fn facility_ids(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.facility.id.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Allocation {
        let mut allocation = Allocation::new("test");
        allocation.push(Facility::new("F2", 10.0, 20.0, 1.0), 10.0);
        allocation.push(Facility::new("F1", 5.0, 10.0, 2.0), 2.0);
        allocation
    }

    #[test]
    fn test_allocation_queries() {
        let a = sample();
        assert_eq!(a.len(), 2);
        assert!(!a.is_empty());
        assert!((a.total_assigned() - 12.0).abs() < 1e-10);
        assert_eq!(a.facility_ids(), vec!["F2", "F1"]);
        assert_eq!(a.quantity_of("F1"), Some(2.0));
        assert_eq!(a.quantity_of("F9"), None);
    }

    #[test]
    fn test_partial_entries() {
        let a = sample();
        let partial: Vec<_> = a.partial_entries().collect();
        assert_eq!(partial.len(), 1);
        assert_eq!(partial[0].facility.id, "F1");
    }

    #[test]
    fn test_entry_cost() {
        let a = sample();
        assert!((a.entries[0].cost() - 30.0).abs() < 1e-10);
        assert!((a.entries[1].cost() - 14.0).abs() < 1e-10);
    }

    #[test]
    fn test_empty() {
        let a = Allocation::new("empty");
        assert!(a.is_empty());
        assert!((a.total_assigned() - 0.0).abs() < 1e-10);
    }
}
