//! Facility model.
//!
//! A facility is a candidate supply source: opening it costs a fixed amount,
//! every unit it ships costs a linear unit cost, and it can ship at most its
//! capacity.
//!
//! # Reference
//! Cornuéjols, Nemhauser & Wolsey (1990), "The Uncapacitated Facility
//! Location Problem", in *Discrete Location Theory*, Ch. 3

use serde::{Deserialize, Serialize};

/// A capacitated facility as consumed by the greedy allocators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    /// Stable label for reporting (e.g. "F3").
    pub id: String,
    /// Cost incurred if the facility is used at all.
    pub fixed_cost: f64,
    /// Marginal cost per unit of demand served.
    pub unit_cost: f64,
    /// Maximum quantity the facility can supply.
    pub capacity: f64,
}

impl Facility {
    /// Creates a facility.
    ///
    /// No validation happens here; see [`crate::catalog`] for checked
    /// construction from raw records.
    pub fn new(id: impl Into<String>, capacity: f64, fixed_cost: f64, unit_cost: f64) -> Self {
        Self {
            id: id.into(),
            fixed_cost,
            unit_cost,
            capacity,
        }
    }

    /// Average cost per unit when used at full capacity.
    ///
    /// `(fixed_cost + unit_cost * capacity) / capacity`. This is the greedy
    /// sort key: lower means more efficient.
    #[inline]
    pub fn efficiency_ratio(&self) -> f64 {
        (self.fixed_cost + self.unit_cost * self.capacity) / self.capacity
    }

    /// Cost of serving `quantity` units from this facility.
    ///
    /// The fixed cost is charged in full for any quantity.
    #[inline]
    pub fn cost_for(&self, quantity: f64) -> f64 {
        self.fixed_cost + self.unit_cost * quantity
    }

    /// Cost of running the facility at full capacity.
    #[inline]
    pub fn full_cost(&self) -> f64 {
        self.cost_for(self.capacity)
    }
}
