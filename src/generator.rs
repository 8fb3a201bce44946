//! Random instance generation.
//!
//! Produces instances of the same shape as the dataset files, for
//! benchmarking the greedy policies against the exact optimum.
//!
//! # Algorithm
//! 1. Draw capacity, fixed cost and per-client unit costs uniformly from
//!    the configured ranges.
//! 2. Total demand = `load_factor × total capacity`, split across clients
//!    with random weights in [0.5, 1.5].
//! 3. With `integral`, round every value (capacities to at least 1, demands
//!    down) so integer flows can meet the demand exactly.
//!
//! With `load_factor ≤ 1` the demand may still exceed the capacity by a few
//! ulps when not integral; the allocators and the MIP accept that rounding.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{Client, FacilitySite, Instance};

/// Generator parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Number of facilities (≥ 1).
    pub num_facilities: usize,
    /// Number of clients (≥ 1).
    pub num_clients: usize,
    /// Inclusive capacity range (min > 0).
    pub capacity: (f64, f64),
    /// Inclusive fixed cost range (min ≥ 0).
    pub fixed_cost: (f64, f64),
    /// Inclusive unit cost range (min ≥ 0).
    pub unit_cost: (f64, f64),
    /// Total demand as a fraction of total capacity (0.0..=1.0 is feasible,
    /// up to float rounding).
    pub load_factor: f64,
    /// Round all generated values to integers.
    pub integral: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            num_facilities: 10,
            num_clients: 1,
            capacity: (50.0, 500.0),
            fixed_cost: (1_000.0, 10_000.0),
            unit_cost: (1.0, 50.0),
            load_factor: 0.6,
            integral: true,
        }
    }
}

impl GeneratorConfig {
    /// Config for `num_facilities` facilities and `num_clients` clients.
    pub fn new(num_facilities: usize, num_clients: usize) -> Self {
        Self {
            num_facilities,
            num_clients,
            ..Default::default()
        }
    }

    /// Sets the capacity range.
    pub fn with_capacity(mut self, min: f64, max: f64) -> Self {
        self.capacity = (min, max);
        self
    }

    /// Sets the fixed cost range.
    pub fn with_fixed_cost(mut self, min: f64, max: f64) -> Self {
        self.fixed_cost = (min, max);
        self
    }

    /// Sets the unit cost range.
    pub fn with_unit_cost(mut self, min: f64, max: f64) -> Self {
        self.unit_cost = (min, max);
        self
    }

    /// Sets the load factor.
    pub fn with_load_factor(mut self, load_factor: f64) -> Self {
        self.load_factor = load_factor;
        self
    }

    /// Enables or disables integer rounding.
    pub fn with_integral(mut self, integral: bool) -> Self {
        self.integral = integral;
        self
    }

    /// Checks the parameters.
    pub fn validate(&self) -> Result<()> {
        if self.num_facilities == 0 {
            return Err(Error::invalid("generator needs at least one facility"));
        }
        if self.num_clients == 0 {
            return Err(Error::invalid("generator needs at least one client"));
        }
        check_range("capacity", self.capacity)?;
        if self.capacity.0 <= 0.0 {
            return Err(Error::invalid("capacity range must be positive"));
        }
        check_range("fixed cost", self.fixed_cost)?;
        check_range("unit cost", self.unit_cost)?;
        if !self.load_factor.is_finite() || self.load_factor < 0.0 {
            return Err(Error::invalid(format!(
                "load factor must be non-negative, got {}",
                self.load_factor
            )));
        }
        Ok(())
    }
}

fn check_range(what: &str, (min, max): (f64, f64)) -> Result<()> {
    if !min.is_finite() || !max.is_finite() || min < 0.0 || min > max {
        return Err(Error::invalid(format!(
            "{what} range [{min}, {max}] is not a non-negative interval"
        )));
    }
    Ok(())
}

/// Random instance generator.
///
/// # Example
/// ```
/// use u_facility::generator::{GeneratorConfig, InstanceGenerator};
///
/// let generator = InstanceGenerator::new(GeneratorConfig::new(5, 1)).unwrap();
/// let instance = generator.generate_seeded(42);
/// assert_eq!(instance.num_facilities(), 5);
/// assert!(instance.total_demand() <= instance.total_capacity());
/// ```
#[derive(Debug, Clone)]
pub struct InstanceGenerator {
    config: GeneratorConfig,
}

impl InstanceGenerator {
    /// Creates a generator after validating the config.
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The generator config.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates an instance from the given RNG.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Instance {
        let cfg = &self.config;

        let sites: Vec<FacilitySite> = (0..cfg.num_facilities)
            .map(|i| {
                let mut capacity = draw(rng, cfg.capacity);
                let mut fixed_cost = draw(rng, cfg.fixed_cost);
                if cfg.integral {
                    capacity = capacity.round().max(1.0);
                    fixed_cost = fixed_cost.round();
                }
                FacilitySite::new(format!("F{i}"), capacity, fixed_cost)
            })
            .collect();

        let costs: Vec<Vec<f64>> = (0..cfg.num_facilities)
            .map(|_| {
                (0..cfg.num_clients)
                    .map(|_| {
                        let cost = draw(rng, cfg.unit_cost);
                        if cfg.integral {
                            cost.round()
                        } else {
                            cost
                        }
                    })
                    .collect()
            })
            .collect();

        let total_capacity: f64 = sites.iter().map(|s| s.capacity).sum();
        let total_demand = cfg.load_factor * total_capacity;
        let weights: Vec<f64> = (0..cfg.num_clients)
            .map(|_| rng.random_range(0.5..=1.5))
            .collect();
        let weight_sum: f64 = weights.iter().sum();

        let clients = weights
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let demand = total_demand * w / weight_sum;
                let demand = if cfg.integral { demand.floor() } else { demand };
                Client::new(format!("L{i}"), demand)
            })
            .collect();

        Instance::new(sites, clients, costs)
    }

    /// Generates an instance from a `SmallRng` seeded with `seed`.
    pub fn generate_seeded(&self, seed: u64) -> Instance {
        let mut rng = SmallRng::seed_from_u64(seed);
        self.generate(&mut rng)
    }
}

fn draw<R: Rng>(rng: &mut R, (min, max): (f64, f64)) -> f64 {
    if min == max {
        min
    } else {
        rng.random_range(min..=max)
    }
}
