//! Facility catalog construction and input validation.
//!
//! Normalizes raw facility records (identity, capacity, fixed cost) and a
//! per-facility unit cost into the [`Facility`] records the greedy
//! allocators consume. Detects:
//! - Non-positive or non-finite capacities
//! - Negative or non-finite costs
//! - Record count mismatches between sites and unit costs
//! - Duplicate facility IDs
//! - Negative or non-finite demand

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::models::{Facility, FacilitySite};

/// Builds the facility catalog.
///
/// `unit_costs[i]` is the unit cost of `sites[i]`. Input order is preserved.
///
/// # Errors
/// [`Error::InvalidInput`] if the counts differ, an ID repeats, a capacity
/// is not positive, or a cost is negative.
///
/// # Example
/// ```
/// use u_facility::catalog;
/// use u_facility::models::FacilitySite;
///
/// let sites = vec![
///     FacilitySite::new("F0", 5.0, 10.0),
///     FacilitySite::new("F1", 10.0, 20.0),
/// ];
/// let facilities = catalog::build(&sites, &[2.0, 1.0]).unwrap();
/// assert_eq!(facilities[1].unit_cost, 1.0);
/// ```
pub fn build(sites: &[FacilitySite], unit_costs: &[f64]) -> Result<Vec<Facility>> {
    if sites.len() != unit_costs.len() {
        return Err(Error::invalid(format!(
            "{} facility records but {} unit costs",
            sites.len(),
            unit_costs.len()
        )));
    }

    let mut seen = HashSet::new();
    let mut facilities = Vec::with_capacity(sites.len());

    for (site, &unit_cost) in sites.iter().zip(unit_costs) {
        if !seen.insert(site.id.as_str()) {
            return Err(Error::invalid(format!("duplicate facility ID: {}", site.id)));
        }
        let facility = Facility::new(site.id.clone(), site.capacity, site.fixed_cost, unit_cost);
        validate_facility(&facility)?;
        facilities.push(facility);
    }

    Ok(facilities)
}

/// Checks a single facility record.
pub fn validate_facility(facility: &Facility) -> Result<()> {
    check_capacity(&facility.id, facility.capacity)?;
    check_cost(&facility.id, "fixed cost", facility.fixed_cost)?;
    check_cost(&facility.id, "unit cost", facility.unit_cost)
}

/// Checks every facility record; stops at the first problem.
pub fn validate_facilities(facilities: &[Facility]) -> Result<()> {
    facilities.iter().try_for_each(validate_facility)
}

/// Rejects negative or non-finite demand.
pub fn validate_demand(demand: f64) -> Result<()> {
    if !demand.is_finite() || demand < 0.0 {
        return Err(Error::invalid(format!(
            "demand must be a non-negative number, got {demand}"
        )));
    }
    Ok(())
}

/// Relative slack for float sums of capacities.
const CAPACITY_EPSILON: f64 = 1e-12;

/// Whether `capacity` covers `demand`, up to summation rounding.
///
/// Capacities summed in different orders can differ in the last bits, so
/// `capacity` counts as enough when it falls short by at most
/// `1e-12 * max(demand, 1)`.
pub fn covers(capacity: f64, demand: f64) -> bool {
    capacity >= demand - CAPACITY_EPSILON * demand.max(1.0)
}

pub(crate) fn check_capacity(id: &str, capacity: f64) -> Result<()> {
    // The efficiency ratio divides by capacity.
    if !capacity.is_finite() || capacity <= 0.0 {
        return Err(Error::invalid(format!(
            "facility {id} has non-positive capacity {capacity}"
        )));
    }
    Ok(())
}

pub(crate) fn check_cost(id: &str, what: &str, cost: f64) -> Result<()> {
    if !cost.is_finite() || cost < 0.0 {
        return Err(Error::invalid(format!(
            "facility {id} has invalid {what} {cost}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_sites() -> Vec<FacilitySite> {
        vec![
            FacilitySite::new("F0", 5.0, 10.0),
            FacilitySite::new("F1", 10.0, 20.0),
            FacilitySite::new("F2", 8.0, 0.0),
        ]
    }

    #[test]
    fn test_covers_tolerates_rounding() {
        assert!(covers(15.0, 15.0));
        assert!(covers(16.0, 15.0));
        assert!(!covers(15.0, 15.5));
        // 0.3 + 0.2 + 0.1 vs 0.1 + 0.2 + 0.3
        assert!(0.3 + 0.2 + 0.1 < 0.1 + 0.2 + 0.3);
        assert!(covers(0.3 + 0.2 + 0.1, 0.1 + 0.2 + 0.3));
        assert!(!covers(0.0, 1e-9));
    }

    #[test]
    fn test_build_preserves_order() {
        let facilities = build(&sample_sites(), &[2.0, 1.0, 4.0]).unwrap();
        let ids: Vec<_> = facilities.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["F0", "F1", "F2"]);
        assert_eq!(facilities[0], Facility::new("F0", 5.0, 10.0, 2.0));
        assert!((facilities[2].unit_cost - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_count_mismatch() {
        let err = build(&sample_sites(), &[2.0, 1.0]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(err.to_string().contains("3 facility records but 2 unit costs"));
    }

    #[test]
    fn test_zero_capacity() {
        let mut sites = sample_sites();
        sites[1].capacity = 0.0;
        let err = build(&sites, &[2.0, 1.0, 4.0]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(err.to_string().contains("F1"));
    }

    #[test]
    fn test_negative_capacity() {
        let mut sites = sample_sites();
        sites[0].capacity = -3.0;
        assert!(matches!(
            build(&sites, &[2.0, 1.0, 4.0]),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_nan_capacity() {
        let mut sites = sample_sites();
        sites[2].capacity = f64::NAN;
        assert!(build(&sites, &[2.0, 1.0, 4.0]).is_err());
    }

    #[test]
    fn test_negative_costs() {
        assert!(build(&sample_sites(), &[2.0, -1.0, 4.0]).is_err());

        let mut sites = sample_sites();
        sites[0].fixed_cost = -10.0;
        assert!(build(&sites, &[2.0, 1.0, 4.0]).is_err());
    }

    #[test]
    fn test_duplicate_id() {
        let mut sites = sample_sites();
        sites[2].id = "F0".into();
        let err = build(&sites, &[2.0, 1.0, 4.0]).unwrap_err();
        assert!(err.to_string().contains("duplicate facility ID: F0"));
    }

    #[test]
    fn test_empty_catalog() {
        assert!(build(&[], &[]).unwrap().is_empty());
    }

    #[test]
    fn test_validate_demand() {
        assert!(validate_demand(0.0).is_ok());
        assert!(validate_demand(12.5).is_ok());
        assert!(validate_demand(-0.1).is_err());
        assert!(validate_demand(f64::NAN).is_err());
        assert!(validate_demand(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_facilities() {
        let ok = vec![Facility::new("A", 1.0, 0.0, 0.0)];
        assert!(validate_facilities(&ok).is_ok());

        let bad = vec![
            Facility::new("A", 1.0, 0.0, 0.0),
            Facility::new("B", 0.0, 1.0, 1.0),
        ];
        assert!(validate_facilities(&bad).is_err());
    }
}
