//! Allocation cost evaluation.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Total cost | Σ (fixed_cost + unit_cost × quantity) |
//! | Fixed cost | Σ fixed_cost, once per entry |
//! | Variable cost | Σ unit_cost × quantity |
//! | Total assigned | Σ quantity |
//! | Partial facilities | Entries with quantity < capacity |

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::Allocation;

/// Cost breakdown of an allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationCost {
    /// Fixed plus variable cost.
    pub total_cost: f64,
    /// Fixed costs of all facilities used.
    pub fixed_cost: f64,
    /// Unit costs times quantities.
    pub variable_cost: f64,
    /// Sum of assigned quantities.
    pub total_assigned: f64,
    /// Number of entries.
    pub facilities_used: usize,
    /// Number of entries below capacity.
    pub partial_facilities: usize,
}

impl AllocationCost {
    /// Computes the cost breakdown.
    ///
    /// The fixed cost is charged once per entry, however small its quantity.
    pub fn calculate(allocation: &Allocation) -> Self {
        let mut fixed_cost = 0.0;
        let mut variable_cost = 0.0;
        let mut total_assigned = 0.0;
        let mut partial_facilities = 0;

        for entry in allocation.iter() {
            fixed_cost += entry.facility.fixed_cost;
            variable_cost += entry.facility.unit_cost * entry.quantity;
            total_assigned += entry.quantity;
            if entry.is_partial() {
                partial_facilities += 1;
            }
        }

        Self {
            total_cost: fixed_cost + variable_cost,
            fixed_cost,
            variable_cost,
            total_assigned,
            facilities_used: allocation.len(),
            partial_facilities,
        }
    }

    /// Checks that the allocation covers `demand`.
    ///
    /// `tolerance` is relative to `max(demand, 1)`.
    pub fn check_demand(&self, demand: f64, tolerance: f64) -> Result<()> {
        if (self.total_assigned - demand).abs() > tolerance * demand.max(1.0) {
            warn!(
                "allocation assigns {} but demand is {}",
                self.total_assigned, demand
            );
            return Err(Error::DemandMismatch {
                expected: demand,
                assigned: self.total_assigned,
            });
        }
        Ok(())
    }
}

/// Total cost and total assigned quantity of an allocation.
pub fn evaluate(allocation: &Allocation) -> (f64, f64) {
    let cost = AllocationCost::calculate(allocation);
    (cost.total_cost, cost.total_assigned)
}
