//! Greedy heuristics for single-demand capacitated facility location.
//!
//! Given facilities with a fixed opening cost, a linear unit cost and a
//! capacity, cover one aggregate demand cheaply. Two greedy allocators sort
//! facilities by efficiency ratio and differ only in how they place the
//! remainder; an exact MIP gives the reference optimum.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Facility`, `Allocation`, `Instance`
//! - **`catalog`**: Builds and validates facility records
//! - **`allocator`**: Greedy allocators, remainder policies, cost evaluation
//! - **`dataset`**: Plain-text instance files
//! - **`generator`**: Seeded random instances
//! - **`exact`**: `ExactSolver` trait and `microlp` MIP backend
//! - **`benchmark`**: Greedy versus exact comparison
//!
//! # Example
//!
//! ```
//! use u_facility::allocator::{allocate_indivisible, evaluate};
//! use u_facility::catalog;
//! use u_facility::models::FacilitySite;
//!
//! let sites = vec![
//!     FacilitySite::new("f1", 5.0, 10.0),
//!     FacilitySite::new("f2", 10.0, 20.0),
//! ];
//! let facilities = catalog::build(&sites, &[2.0, 1.0])?;
//! let allocation = allocate_indivisible(&facilities, 3.0)?;
//! assert_eq!(evaluate(&allocation), (16.0, 3.0));
//! # Ok::<(), u_facility::Error>(())
//! ```
//!
//! # References
//!
//! - Cornuéjols, Sridharan, Thizy (1991), "A comparison of heuristics and
//!   relaxations for the capacitated plant location problem"
//! - Sridharan (1995), "The capacitated plant location problem"

pub mod allocator;
pub mod benchmark;
pub mod catalog;
pub mod dataset;
mod error;
pub mod exact;
pub mod generator;
pub mod models;

pub use error::{Error, Result};
