//! Mixed-integer model solved with `microlp`.

use log::{debug, info};
use microlp::{ComparisonOp, OptimizationDirection, Problem, Variable};
use serde::{Deserialize, Serialize};

use super::{ExactSolution, ExactSolver, Route};
use crate::catalog;
use crate::error::{Error, Result};
use crate::models::Instance;

/// Flows below this are reported as zero.
const FLOW_EPSILON: f64 = 1e-9;

/// Exact solver backed by `microlp` branch and bound.
///
/// Keep instances small: branch and bound on one binary per facility grows
/// exponentially in the worst case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MipSolver {
    /// Restrict flows to integers.
    pub integral_flow: bool,
}

impl Default for MipSolver {
    fn default() -> Self {
        Self {
            integral_flow: true,
        }
    }
}

impl MipSolver {
    /// Solver with integer flows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether flows must be integers.
    pub fn with_integral_flow(mut self, integral_flow: bool) -> Self {
        self.integral_flow = integral_flow;
        self
    }

    fn add_flow(&self, problem: &mut Problem, cost: f64, capacity: f64) -> Variable {
        if self.integral_flow {
            let max = capacity.floor().min(i32::MAX as f64) as i32;
            problem.add_integer_var(cost, (0, max))
        } else {
            problem.add_var(cost, (0.0, capacity))
        }
    }
}

impl ExactSolver for MipSolver {
    fn name(&self) -> &'static str {
        "mip"
    }

    fn solve(&self, instance: &Instance) -> Result<ExactSolution> {
        instance.validate()?;

        let demand = instance.total_demand();
        let capacity = instance.total_capacity();
        if !catalog::covers(capacity, demand) {
            return Err(Error::Infeasible { demand, capacity });
        }

        let mut problem = Problem::new(OptimizationDirection::Minimize);

        let build: Vec<Variable> = instance
            .sites
            .iter()
            .map(|site| problem.add_binary_var(site.fixed_cost))
            .collect();

        let flow: Vec<Vec<Variable>> = instance
            .sites
            .iter()
            .zip(&instance.costs)
            .map(|(site, row)| {
                row.iter()
                    .map(|&cost| self.add_flow(&mut problem, cost, site.capacity))
                    .collect()
            })
            .collect();

        // Supply: Σ_l flow[f][l] - capacity[f] * build[f] <= 0
        for (f, site) in instance.sites.iter().enumerate() {
            let mut terms: Vec<(Variable, f64)> = flow[f].iter().map(|&v| (v, 1.0)).collect();
            terms.push((build[f], -site.capacity));
            problem.add_constraint(terms, ComparisonOp::Le, 0.0);
        }

        // Demand: Σ_f flow[f][l] >= demand[l]
        for (l, client) in instance.clients.iter().enumerate() {
            let terms: Vec<(Variable, f64)> = flow.iter().map(|row| (row[l], 1.0)).collect();
            problem.add_constraint(terms, ComparisonOp::Ge, client.demand);
        }

        debug!(
            "mip: {} facilities, {} clients, integral flow {}",
            instance.num_facilities(),
            instance.num_clients(),
            self.integral_flow
        );

        let solution = problem.solve().map_err(|err| match err {
            microlp::Error::Infeasible => Error::Infeasible { demand, capacity },
            other => Error::Solver(other.to_string()),
        })?;

        let opened = instance
            .sites
            .iter()
            .zip(&build)
            .filter(|(_, var)| *solution.var_value(**var) > 0.5)
            .map(|(site, _)| site.id.clone())
            .collect();

        let mut routes = Vec::new();
        for (site, row) in instance.sites.iter().zip(&flow) {
            for (client, &var) in instance.clients.iter().zip(row) {
                let mut quantity = *solution.var_value(var);
                if self.integral_flow {
                    quantity = quantity.round();
                }
                if quantity > FLOW_EPSILON {
                    routes.push(Route {
                        facility: site.id.clone(),
                        client: client.id.clone(),
                        quantity,
                    });
                }
            }
        }

        let objective = solution.objective();
        info!("mip: optimum {objective}");

        Ok(ExactSolution {
            objective,
            opened,
            routes,
        })
    }
}
