//! Exact reference optimum.
//!
//! The greedy policies are heuristics. To measure how far they are from
//! optimal, an [`ExactSolver`] solves the full mixed-integer formulation of
//! the capacitated facility-location problem. [`MipSolver`] hands the model
//! to `microlp`, a pure-Rust LP/MIP solver.
//!
//! # Formulation
//!
//! ```text
//! minimize   Σ_f Σ_l cost[f][l] · flow[f][l] + Σ_f fixed[f] · build[f]
//! subject to Σ_l flow[f][l] ≤ capacity[f] · build[f]     ∀ f
//!            Σ_f flow[f][l] ≥ demand[l]                  ∀ l
//!            flow ≥ 0 (integer by default), build ∈ {0, 1}
//! ```
//!
//! # Reference
//! Sridharan (1995), "The capacitated plant location problem",
//! European Journal of Operational Research 87(2)

mod mip;

pub use mip::MipSolver;

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::error::Result;
use crate::models::Instance;

/// A positive flow from a facility to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Facility ID.
    pub facility: String,
    /// Client ID.
    pub client: String,
    /// Quantity shipped.
    pub quantity: f64,
}

/// Optimal solution of an instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExactSolution {
    /// Optimal objective value (fixed + transport cost).
    pub objective: f64,
    /// IDs of the facilities opened.
    pub opened: Vec<String>,
    /// Positive flows.
    pub routes: Vec<Route>,
}

impl ExactSolution {
    /// Total quantity shipped over all routes.
    pub fn total_shipped(&self) -> f64 {
        self.routes.iter().map(|r| r.quantity).sum()
    }

    /// Quantity shipped from one facility.
    pub fn shipped_from(&self, facility_id: &str) -> f64 {
        self.routes
            .iter()
            .filter(|r| r.facility == facility_id)
            .map(|r| r.quantity)
            .sum()
    }
}

/// Solves an instance to optimality.
pub trait ExactSolver: Send + Sync + Debug {
    /// Solver name (e.g. "mip").
    fn name(&self) -> &'static str;

    /// Computes the optimal solution.
    ///
    /// # Errors
    /// [`Error::Infeasible`](crate::Error::Infeasible) when the demand
    /// cannot be met, [`Error::Solver`](crate::Error::Solver) when the
    /// backend fails otherwise.
    fn solve(&self, instance: &Instance) -> Result<ExactSolution>;
}
