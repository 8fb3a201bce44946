//! Greedy allocators and cost evaluation.
//!
//! Both greedy variants share one template ([`GreedyAllocator`]): sort
//! facilities by efficiency ratio, saturate "small" facilities, then let a
//! [`RemainderPolicy`] decide who supplies the remainder.
//!
//! | Policy | Remainder goes to |
//! |--------|-------------------|
//! | [`CheapestBig`] | cheapest facility among the big candidates (indivisible) |
//! | [`NextInOrder`] | next facility in sorted order (fractional) |
//!
//! Neither is optimal; they are fast baselines to compare against the
//! exact optimum from [`crate::exact`].
//!
//! # Usage
//!
//! ```
//! use u_facility::allocator::{allocate_fractional, allocate_indivisible, evaluate};
//! use u_facility::models::Facility;
//!
//! let facilities = vec![
//!     Facility::new("f1", 5.0, 10.0, 2.0),
//!     Facility::new("f2", 10.0, 20.0, 1.0),
//! ];
//! let allocation = allocate_fractional(&facilities, 12.0).unwrap();
//! assert_eq!(evaluate(&allocation), (44.0, 12.0));
//!
//! let allocation = allocate_indivisible(&facilities, 3.0).unwrap();
//! assert_eq!(evaluate(&allocation), (16.0, 3.0));
//! ```

mod cost;
mod greedy;
mod policies;

pub use cost::{evaluate, AllocationCost};
pub use greedy::{efficiency_order, sort_by_efficiency, GreedyAllocator, Saturation};
pub use policies::{CheapestBig, FractionalThreshold, NextInOrder};

use crate::error::Result;
use crate::models::{Allocation, Facility};
use std::fmt::Debug;

/// Decides how sorted facilities are used to cover the demand.
///
/// Implementations receive facilities in ascending efficiency order and a
/// [`Saturation`] accumulator. They must either append entries whose
/// quantities sum to the demand, or return
/// [`Error::Infeasible`](crate::Error::Infeasible) via
/// [`Saturation::infeasible`].
pub trait RemainderPolicy: Send + Sync + Debug {
    /// Policy name (e.g. "indivisible"), recorded on the allocation.
    fn name(&self) -> &'static str;

    /// Places the demand on the sorted facilities.
    fn place(&self, sorted: &[&Facility], fill: &mut Saturation) -> Result<()>;

    /// Policy description.
    fn description(&self) -> &'static str {
        self.name()
    }
}

/// Greedy with indivisible remainder ([`CheapestBig`]).
pub fn allocate_indivisible(facilities: &[Facility], demand: f64) -> Result<Allocation> {
    GreedyAllocator::new(CheapestBig).allocate(facilities, demand)
}

/// Greedy with fractional remainder ([`NextInOrder`], cumulative threshold).
pub fn allocate_fractional(facilities: &[Facility], demand: f64) -> Result<Allocation> {
    GreedyAllocator::new(NextInOrder::cumulative()).allocate(facilities, demand)
}
