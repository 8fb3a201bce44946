//! Facility-location domain models.
//!
//! Provides the data types for describing problems and the allocations the
//! greedy policies produce.
//!
//! # Domain Mappings
//!
//! | u-facility | Manufacturing | Logistics | Energy |
//! |------------|---------------|-----------|--------|
//! | Facility | Plant | Warehouse | Generator |
//! | Client | Store | Customer zone | Load bus |
//! | Allocation | Production plan | Sourcing plan | Dispatch |

mod allocation;
mod facility;
mod instance;

pub use allocation::{Allocation, AllocationEntry};
pub use facility::Facility;
pub use instance::{Client, FacilitySite, Instance};
