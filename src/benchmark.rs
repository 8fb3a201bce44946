//! Greedy versus exact comparison.
//!
//! Runs both greedy policies and, optionally, an exact solver on the same
//! single-client instance, and reports cost, quantity and wall time for
//! each.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Total cost | Fixed plus variable cost of the solution |
//! | Total assigned | Quantity supplied |
//! | Facilities used | Entries (greedy) or opened facilities (exact) |
//! | Gap | (cost − optimum) / optimum |

use std::time::{Duration, Instant};

use log::{debug, info};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::allocator::{allocate_fractional, allocate_indivisible, AllocationCost};
use crate::error::Result;
use crate::exact::ExactSolver;
use crate::generator::{GeneratorConfig, InstanceGenerator};
use crate::models::{Allocation, Facility, Instance};

type AllocateFn = fn(&[Facility], f64) -> Result<Allocation>;

/// Method name of the indivisible greedy.
pub const INDIVISIBLE: &str = "indivisible";
/// Method name of the fractional greedy.
pub const FRACTIONAL: &str = "fractional";

/// Comparison settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    /// Also run the exact solver.
    pub run_exact: bool,
    /// Relative tolerance for the demand check on greedy results.
    pub tolerance: f64,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            run_exact: true,
            tolerance: 1e-9,
        }
    }
}

impl BenchmarkConfig {
    /// Enables or disables the exact solver.
    pub fn with_exact(mut self, run_exact: bool) -> Self {
        self.run_exact = run_exact;
        self
    }

    /// Sets the demand check tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// Result of one method on one instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodReport {
    /// Method name.
    pub method: String,
    /// Total cost.
    pub total_cost: f64,
    /// Quantity supplied.
    pub total_assigned: f64,
    /// Facilities used.
    pub facilities_used: usize,
    /// Wall time.
    pub elapsed: Duration,
}

/// All method results for one instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// One report per method, greedy first.
    pub reports: Vec<MethodReport>,
    /// Exact optimum, when the exact solver ran.
    pub optimum: Option<f64>,
}

impl Comparison {
    /// Report of a method.
    pub fn report(&self, method: &str) -> Option<&MethodReport> {
        self.reports.iter().find(|r| r.method == method)
    }

    /// Relative gap of a method to the optimum.
    ///
    /// `None` without an optimum or for an unknown method. A zero optimum
    /// gives 0 for a zero cost and infinity otherwise.
    pub fn gap(&self, method: &str) -> Option<f64> {
        let optimum = self.optimum?;
        let cost = self.report(method)?.total_cost;
        if optimum.abs() < f64::EPSILON {
            return Some(if cost.abs() < f64::EPSILON {
                0.0
            } else {
                f64::INFINITY
            });
        }
        Some((cost - optimum) / optimum)
    }

    /// Cheapest greedy report.
    pub fn best_greedy(&self) -> Option<&MethodReport> {
        self.reports
            .iter()
            .filter(|r| r.method == INDIVISIBLE || r.method == FRACTIONAL)
            .min_by(|a, b| {
                a.total_cost
                    .partial_cmp(&b.total_cost)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }
}

/// Compares both greedy policies and the exact solver on `instance`.
///
/// The instance must have exactly one client.
///
/// # Errors
/// - [`Error::InvalidInput`](crate::Error::InvalidInput) for a bad or
///   multi-client instance.
/// - [`Error::Infeasible`](crate::Error::Infeasible) if capacity is short.
/// - [`Error::DemandMismatch`](crate::Error::DemandMismatch) if a greedy
///   result misses the demand.
/// - Any solver error.
pub fn compare(
    instance: &Instance,
    config: &BenchmarkConfig,
    solver: &dyn ExactSolver,
) -> Result<Comparison> {
    let demand = instance.single_demand()?;
    let facilities = instance.facility_catalog(0)?;

    let mut reports = Vec::with_capacity(3);
    let greedy: [(&str, AllocateFn); 2] = [
        (INDIVISIBLE, allocate_indivisible),
        (FRACTIONAL, allocate_fractional),
    ];
    for (method, allocate) in greedy {
        let start = Instant::now();
        let allocation = allocate(&facilities, demand)?;
        let elapsed = start.elapsed();

        let cost = AllocationCost::calculate(&allocation);
        cost.check_demand(demand, config.tolerance)?;
        reports.push(MethodReport {
            method: method.to_string(),
            total_cost: cost.total_cost,
            total_assigned: cost.total_assigned,
            facilities_used: cost.facilities_used,
            elapsed,
        });
    }

    let mut optimum = None;
    if config.run_exact {
        let start = Instant::now();
        let solution = solver.solve(instance)?;
        let elapsed = start.elapsed();

        optimum = Some(solution.objective);
        reports.push(MethodReport {
            method: solver.name().to_string(),
            total_cost: solution.objective,
            total_assigned: solution.total_shipped(),
            facilities_used: solution.opened.len(),
            elapsed,
        });
    }

    let comparison = Comparison { reports, optimum };
    for report in &comparison.reports {
        match comparison.gap(&report.method) {
            Some(gap) => info!(
                "{}: cost {} (gap {:.4}) in {:?}",
                report.method, report.total_cost, gap, report.elapsed
            ),
            None => info!(
                "{}: cost {} in {:?}",
                report.method, report.total_cost, report.elapsed
            ),
        }
    }
    Ok(comparison)
}

/// Generates `runs` instances and compares each.
///
/// Run `i` uses a `SmallRng` seeded with `seed + i`.
pub fn run_random(
    generator: &GeneratorConfig,
    config: &BenchmarkConfig,
    runs: usize,
    seed: u64,
    solver: &dyn ExactSolver,
) -> Result<Vec<Comparison>> {
    let generator = InstanceGenerator::new(generator.clone())?;
    debug!(
        "{runs} random runs with {} facilities, load factor {}",
        generator.config().num_facilities,
        generator.config().load_factor
    );
    (0..runs as u64)
        .map(|i| {
            let mut rng = SmallRng::seed_from_u64(seed.wrapping_add(i));
            let instance = generator.generate(&mut rng);
            compare(&instance, config, solver)
        })
        .collect()
}

/// Mean gap of a method over several comparisons.
///
/// Comparisons without an optimum are skipped; `None` if none remain.
pub fn mean_gap(comparisons: &[Comparison], method: &str) -> Option<f64> {
    let gaps: Vec<f64> = comparisons.iter().filter_map(|c| c.gap(method)).collect();
    if gaps.is_empty() {
        None
    } else {
        Some(gaps.iter().sum::<f64>() / gaps.len() as f64)
    }
}
