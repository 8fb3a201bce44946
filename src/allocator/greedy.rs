//! Sort + saturate template shared by every remainder policy.
//!
//! # Algorithm
//!
//! 1. Validate facilities and demand.
//! 2. Zero demand → empty allocation; total capacity below demand →
//!    [`Error::Infeasible`].
//! 3. Stable-sort facilities ascending by efficiency ratio.
//! 4. Hand the sorted facilities and a [`Saturation`] accumulator to the
//!    policy, which saturates small facilities and places the remainder.
//!
//! # Complexity
//! O(n log n) for the sort plus one linear pass per policy.

use log::debug;

use super::RemainderPolicy;
use crate::catalog;
use crate::error::{Error, Result};
use crate::models::{Allocation, Facility};

/// Running state of one greedy walk.
///
/// Tracks the quantity already covered by fully used ("small") facilities
/// and collects the allocation entries in order.
#[derive(Debug, Clone)]
pub struct Saturation {
    demand: f64,
    small_sum: f64,
    total_capacity: f64,
    allocation: Allocation,
}

impl Saturation {
    pub(crate) fn new(policy: &str, demand: f64, total_capacity: f64) -> Self {
        Self {
            demand,
            small_sum: 0.0,
            total_capacity,
            allocation: Allocation::new(policy),
        }
    }

    /// Demand being covered.
    pub fn demand(&self) -> f64 {
        self.demand
    }

    /// Capacity already consumed by saturated facilities.
    pub fn small_sum(&self) -> f64 {
        self.small_sum
    }

    /// `demand - small_sum`.
    pub fn remainder(&self) -> f64 {
        self.demand - self.small_sum
    }

    /// Whether the facility can run at full capacity without meeting demand.
    ///
    /// `small_sum + capacity < demand`, where a sum within rounding of the
    /// demand counts as meeting it (see [`catalog::covers`]).
    pub fn fits(&self, facility: &Facility) -> bool {
        !catalog::covers(self.small_sum + facility.capacity, self.demand)
    }

    /// Uses the facility at full capacity.
    pub fn saturate(&mut self, facility: &Facility) {
        self.small_sum += facility.capacity;
        self.allocation.push(facility.clone(), facility.capacity);
    }

    /// Gives the whole remainder to the facility.
    pub fn assign_remainder(&mut self, facility: &Facility) {
        let remainder = self.remainder();
        self.allocation.push(facility.clone(), remainder);
    }

    /// The error to raise when no facility can take the remainder.
    pub fn infeasible(&self) -> Error {
        Error::Infeasible {
            demand: self.demand,
            capacity: self.total_capacity,
        }
    }

    fn into_allocation(self) -> Allocation {
        self.allocation
    }
}

/// Indices of `facilities` in ascending efficiency-ratio order.
///
/// Ties keep input order.
pub fn efficiency_order(facilities: &[Facility]) -> Vec<usize> {
    let ratios: Vec<f64> = facilities.iter().map(Facility::efficiency_ratio).collect();
    let mut indices: Vec<usize> = (0..facilities.len()).collect();
    indices.sort_by(|&a, &b| {
        ratios[a]
            .partial_cmp(&ratios[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    indices
}

/// Facilities in ascending efficiency-ratio order.
pub fn sort_by_efficiency(facilities: &[Facility]) -> Vec<&Facility> {
    efficiency_order(facilities)
        .into_iter()
        .map(|i| &facilities[i])
        .collect()
}

/// Greedy allocator parameterized by its remainder policy.
///
/// # Example
///
/// ```
/// use u_facility::allocator::{CheapestBig, GreedyAllocator};
/// use u_facility::models::Facility;
///
/// let facilities = vec![
///     Facility::new("F1", 5.0, 10.0, 2.0),
///     Facility::new("F2", 10.0, 20.0, 1.0),
/// ];
/// let allocation = GreedyAllocator::new(CheapestBig).allocate(&facilities, 3.0).unwrap();
/// assert_eq!(allocation.facility_ids(), vec!["F1"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GreedyAllocator<P> {
    policy: P,
}

impl<P: RemainderPolicy> GreedyAllocator<P> {
    /// Creates an allocator using the given policy.
    pub fn new(policy: P) -> Self {
        Self { policy }
    }

    /// Allocates `demand` across `facilities`.
    ///
    /// # Errors
    /// - [`Error::InvalidInput`] for a bad facility record or demand.
    /// - [`Error::Infeasible`] if total capacity is below demand.
    pub fn allocate(&self, facilities: &[Facility], demand: f64) -> Result<Allocation> {
        catalog::validate_demand(demand)?;
        catalog::validate_facilities(facilities)?;

        let total_capacity: f64 = facilities.iter().map(|f| f.capacity).sum();
        let mut fill = Saturation::new(self.policy.name(), demand, total_capacity);

        if demand == 0.0 {
            debug!("{}: zero demand, no facility used", self.policy.name());
            return Ok(fill.into_allocation());
        }

        if !catalog::covers(total_capacity, demand) {
            return Err(fill.infeasible());
        }

        let sorted = sort_by_efficiency(facilities);
        self.policy.place(&sorted, &mut fill)?;

        let allocation = fill.into_allocation();
        debug!(
            "{}: {} of {} facilities used for demand {}",
            self.policy.name(),
            allocation.len(),
            facilities.len(),
            demand
        );
        Ok(allocation)
    }
}
