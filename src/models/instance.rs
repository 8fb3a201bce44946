//! Problem instance model.
//!
//! An instance holds the full facility-location data as read from a dataset
//! or produced by the generator: facility sites with capacity and fixed cost,
//! clients with demand, and a facility × client unit cost matrix.
//!
//! The greedy allocators only ever see one demand value. Reducing the
//! clients to that value is an explicit call ([`Instance::single_demand`] or
//! [`Instance::total_demand`]).

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::Facility;
use crate::catalog;
use crate::error::{Error, Result};

/// Raw facility record: identity, capacity and fixed opening cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilitySite {
    /// Facility identifier (e.g. "F0").
    pub id: String,
    /// Maximum quantity the facility can supply.
    pub capacity: f64,
    /// Cost of opening the facility.
    pub fixed_cost: f64,
}

impl FacilitySite {
    /// Creates a site record.
    pub fn new(id: impl Into<String>, capacity: f64, fixed_cost: f64) -> Self {
        Self {
            id: id.into(),
            capacity,
            fixed_cost,
        }
    }
}

/// A demand point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    /// Client identifier (e.g. "L0").
    pub id: String,
    /// Quantity the client requires.
    pub demand: f64,
}

impl Client {
    /// Creates a client.
    pub fn new(id: impl Into<String>, demand: f64) -> Self {
        Self {
            id: id.into(),
            demand,
        }
    }
}

/// Complete facility-location problem data.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Instance {
    /// Facility sites in input order.
    pub sites: Vec<FacilitySite>,
    /// Clients in input order.
    pub clients: Vec<Client>,
    /// Unit cost from each facility (row) to each client (column).
    pub costs: Vec<Vec<f64>>,
}

impl Instance {
    /// Creates an instance from its parts.
    pub fn new(sites: Vec<FacilitySite>, clients: Vec<Client>, costs: Vec<Vec<f64>>) -> Self {
        Self {
            sites,
            clients,
            costs,
        }
    }

    /// Number of facility sites.
    pub fn num_facilities(&self) -> usize {
        self.sites.len()
    }

    /// Number of clients.
    pub fn num_clients(&self) -> usize {
        self.clients.len()
    }

    /// Sum of all facility capacities.
    pub fn total_capacity(&self) -> f64 {
        self.sites.iter().map(|s| s.capacity).sum()
    }

    /// Sum of all client demands.
    pub fn total_demand(&self) -> f64 {
        self.clients.iter().map(|c| c.demand).sum()
    }

    /// The demand of the only client.
    ///
    /// Fails with [`Error::InvalidInput`] unless the instance has exactly one
    /// client.
    pub fn single_demand(&self) -> Result<f64> {
        match self.clients.as_slice() {
            [client] => Ok(client.demand),
            clients => Err(Error::invalid(format!(
                "expected exactly one demand point, found {}",
                clients.len()
            ))),
        }
    }

    /// Unit costs of every facility towards one client (a cost-matrix column).
    pub fn unit_costs_for(&self, client_index: usize) -> Result<Vec<f64>> {
        if client_index >= self.clients.len() {
            return Err(Error::invalid(format!(
                "client index {client_index} out of range (have {})",
                self.clients.len()
            )));
        }
        self.costs
            .iter()
            .enumerate()
            .map(|(f, row)| {
                row.get(client_index).copied().ok_or_else(|| {
                    Error::invalid(format!("cost row {f} has no column {client_index}"))
                })
            })
            .collect()
    }

    /// Builds the greedy facility catalog using one client's unit costs.
    pub fn facility_catalog(&self, client_index: usize) -> Result<Vec<Facility>> {
        let unit_costs = self.unit_costs_for(client_index)?;
        catalog::build(&self.sites, &unit_costs)
    }

    /// Checks structural consistency.
    ///
    /// 1. At least one facility
    /// 2. Unique facility and client IDs
    /// 3. Positive, finite capacities; non-negative, finite fixed costs
    /// 4. Non-negative, finite demands
    /// 5. One cost row per facility, one column per client, all non-negative
    pub fn validate(&self) -> Result<()> {
        if self.sites.is_empty() {
            return Err(Error::invalid("instance has no facilities"));
        }

        let mut site_ids = HashSet::new();
        for site in &self.sites {
            if !site_ids.insert(site.id.as_str()) {
                return Err(Error::invalid(format!("duplicate facility ID: {}", site.id)));
            }
            catalog::check_capacity(&site.id, site.capacity)?;
            catalog::check_cost(&site.id, "fixed cost", site.fixed_cost)?;
        }

        let mut client_ids = HashSet::new();
        for client in &self.clients {
            if !client_ids.insert(client.id.as_str()) {
                return Err(Error::invalid(format!("duplicate client ID: {}", client.id)));
            }
            catalog::validate_demand(client.demand)?;
        }

        if self.costs.len() != self.sites.len() {
            return Err(Error::invalid(format!(
                "{} cost rows for {} facilities",
                self.costs.len(),
                self.sites.len()
            )));
        }
        for (site, row) in self.sites.iter().zip(&self.costs) {
            if row.len() != self.clients.len() {
                return Err(Error::invalid(format!(
                    "facility {} has {} costs for {} clients",
                    site.id,
                    row.len(),
                    self.clients.len()
                )));
            }
            for &cost in row {
                catalog::check_cost(&site.id, "unit cost", cost)?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Instance with {} facilities (capacity {}) and {} clients (demand {}):",
            self.num_facilities(),
            self.total_capacity(),
            self.num_clients(),
            self.total_demand()
        )?;
        for site in &self.sites {
            writeln!(
                f,
                "    {} capacity {}, fixed cost {}",
                site.id, site.capacity, site.fixed_cost
            )?;
        }
        for client in &self.clients {
            writeln!(f, "    {} demand {}", client.id, client.demand)?;
        }
        Ok(())
    }
}
