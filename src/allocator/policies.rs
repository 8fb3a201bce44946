//! Built-in remainder policies.
//!
//! - **`CheapestBig`**: indivisible remainder. Saturates small facilities,
//!   then gives the whole remainder to the cheapest big facility.
//! - **`NextInOrder`**: fractional remainder. Saturates facilities in order
//!   and gives the remainder to the first one that does not fit entirely.
//!
//! # Small / big classification
//! With `small_sum` the capacity already saturated, a facility is *small*
//! when `small_sum + capacity < demand` and *big* otherwise. Sums within
//! rounding of the demand count as big, so the last facility of an exactly
//! feasible input is never saturated away.

use log::debug;
use serde::{Deserialize, Serialize};

use super::{RemainderPolicy, Saturation};
use crate::catalog;
use crate::error::Result;
use crate::models::Facility;

/// Indivisible remainder: one big facility absorbs the whole remainder.
///
/// Facilities are walked in efficiency order. Small ones are saturated.
/// Big ones are candidates for the remainder; the candidate set restarts
/// whenever a big facility follows a small one, so the candidates are the
/// latest run of consecutive big facilities. The candidate minimizing
/// `fixed_cost + unit_cost * remainder` wins, earliest first on ties.
///
/// Every candidate had `small_sum + capacity >= demand` when visited and
/// `small_sum` only grows afterwards, so the winner can always hold the
/// remainder, up to summation rounding.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheapestBig;

impl RemainderPolicy for CheapestBig {
    fn name(&self) -> &'static str {
        "indivisible"
    }

    fn place(&self, sorted: &[&Facility], fill: &mut Saturation) -> Result<()> {
        let mut bigs: Vec<&Facility> = Vec::new();
        let mut in_big_run = false;

        for &facility in sorted {
            if fill.fits(facility) {
                debug!(
                    "{} small (capacity {}, cost {})",
                    facility.id,
                    facility.capacity,
                    facility.full_cost()
                );
                fill.saturate(facility);
                in_big_run = false;
            } else {
                if !in_big_run {
                    bigs.clear();
                    in_big_run = true;
                }
                bigs.push(facility);
            }
        }

        let remainder = fill.remainder();
        let mut best: Option<(&Facility, f64)> = None;
        for &big in &bigs {
            let cost = big.cost_for(remainder);
            if best.map_or(true, |(_, best_cost)| cost < best_cost) {
                best = Some((big, cost));
            }
        }

        let (chosen, cost) = best.ok_or_else(|| fill.infeasible())?;
        debug!(
            "{} takes remainder {} of demand {} at cost {} ({} candidates)",
            chosen.id,
            remainder,
            fill.demand(),
            cost,
            bigs.len()
        );
        fill.assign_remainder(chosen);
        Ok(())
    }

    fn description(&self) -> &'static str {
        "Greedy, indivisible remainder to the cheapest big facility"
    }
}

/// Saturation test used by [`NextInOrder`].
///
/// | Threshold | Saturate while | Remainder fits its facility |
/// |-----------|----------------|-----------------------------|
/// | `CumulativeDemand` | `small_sum + capacity < demand` | always |
/// | `RunningSum` | `small_sum + capacity < demand - small_sum` | not always |
///
/// Both give the same allocation when the first two facilities in order
/// already cover the demand (e.g. capacities 10 and 5 for a demand of 12).
/// They split once a second facility would be saturated:
/// with capacities 4, 4, 4 and demand 10, `CumulativeDemand` yields
/// `[4, 4, 2]` while `RunningSum` stops early with `[4, 6]`, overloading the
/// second facility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FractionalThreshold {
    /// Saturated capacity plus this facility against the original demand.
    #[default]
    CumulativeDemand,
    /// Saturated capacity plus this facility against the shrinking
    /// remainder, so saturated capacity is counted twice.
    RunningSum,
}

/// Fractional remainder: the next facility in order takes what is left.
///
/// Walks facilities in efficiency order, saturating each one that passes
/// the threshold test. The first one that fails receives the remainder and
/// the walk stops, even if it could supply more. No cost comparison.
#[derive(Debug, Clone, Copy, Default)]
pub struct NextInOrder {
    /// Saturation test.
    pub threshold: FractionalThreshold,
}

impl NextInOrder {
    /// Policy using [`FractionalThreshold::CumulativeDemand`].
    pub fn cumulative() -> Self {
        Self {
            threshold: FractionalThreshold::CumulativeDemand,
        }
    }

    /// Policy using [`FractionalThreshold::RunningSum`].
    pub fn running_sum() -> Self {
        Self {
            threshold: FractionalThreshold::RunningSum,
        }
    }

    fn saturates(&self, facility: &Facility, fill: &Saturation) -> bool {
        match self.threshold {
            FractionalThreshold::CumulativeDemand => fill.fits(facility),
            FractionalThreshold::RunningSum => {
                !catalog::covers(fill.small_sum() + facility.capacity, fill.remainder())
            }
        }
    }
}

impl RemainderPolicy for NextInOrder {
    fn name(&self) -> &'static str {
        match self.threshold {
            FractionalThreshold::CumulativeDemand => "fractional",
            FractionalThreshold::RunningSum => "fractional-running-sum",
        }
    }

    fn place(&self, sorted: &[&Facility], fill: &mut Saturation) -> Result<()> {
        for &facility in sorted {
            if self.saturates(facility, fill) {
                fill.saturate(facility);
            } else {
                debug!("{} takes remainder {}", facility.id, fill.remainder());
                fill.assign_remainder(facility);
                return Ok(());
            }
        }
        Err(fill.infeasible())
    }

    fn description(&self) -> &'static str {
        "Greedy, fractional remainder to the next facility in order"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::{evaluate, GreedyAllocator};
    use crate::error::Error;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn two_facilities() -> Vec<Facility> {
        vec![
            Facility::new("f1", 5.0, 10.0, 2.0),
            Facility::new("f2", 10.0, 20.0, 1.0),
        ]
    }

    fn random_facilities(rng: &mut SmallRng, n: usize) -> Vec<Facility> {
        (0..n)
            .map(|i| {
                Facility::new(
                    format!("F{i}"),
                    rng.random_range(1.0..50.0),
                    rng.random_range(0.0..500.0),
                    rng.random_range(0.0..20.0),
                )
            })
            .collect()
    }

    fn assert_covers(facilities: &[Facility], demand: f64, allocation: &crate::models::Allocation) {
        let assigned = allocation.total_assigned();
        assert!(
            (assigned - demand).abs() <= 1e-9 * demand.max(1.0),
            "assigned {assigned} for demand {demand}"
        );
        for entry in allocation.iter() {
            assert!(entry.quantity > 0.0);
            assert!(entry.quantity <= entry.facility.capacity + 1e-9);
            assert!(facilities.contains(&entry.facility));
        }
    }

    // ======================== Indivisible ========================

    #[test]
    fn test_indivisible_first_facility_covers_demand() {
        // Sorted [f2, f1]; both big; f1: 10+2*3=16 beats f2: 20+1*3=23
        let allocation = GreedyAllocator::new(CheapestBig)
            .allocate(&two_facilities(), 3.0)
            .unwrap();
        assert_eq!(allocation.facility_ids(), vec!["f1"]);
        assert_eq!(allocation.quantity_of("f1"), Some(3.0));
        let (cost, assigned) = evaluate(&allocation);
        assert!((cost - 16.0).abs() < 1e-10);
        assert!((assigned - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_indivisible_saturates_then_remainder() {
        let allocation = GreedyAllocator::new(CheapestBig)
            .allocate(&two_facilities(), 12.0)
            .unwrap();
        assert_eq!(allocation.facility_ids(), vec!["f2", "f1"]);
        assert_eq!(allocation.quantity_of("f2"), Some(10.0));
        assert_eq!(allocation.quantity_of("f1"), Some(2.0));
        let (cost, _) = evaluate(&allocation);
        assert!((cost - 44.0).abs() < 1e-10);
    }

    #[test]
    fn test_indivisible_exact_total_capacity() {
        // 10 + 5 == 15 → f1 is big, remainder 5 equals its capacity
        let allocation = GreedyAllocator::new(CheapestBig)
            .allocate(&two_facilities(), 15.0)
            .unwrap();
        assert_eq!(allocation.facility_ids(), vec!["f2", "f1"]);
        assert_eq!(allocation.partial_entries().count(), 0);
    }

    #[test]
    fn test_indivisible_tie_goes_to_first_in_order() {
        let facilities = vec![
            Facility::new("late", 10.0, 10.0, 1.0), // ratio 2
            Facility::new("early", 10.0, 5.0, 1.0), // ratio 1.5
        ];
        // Remainder 5: late 10+5=15, early 5+5=10 → early cheaper anyway
        let a = GreedyAllocator::new(CheapestBig)
            .allocate(&facilities, 5.0)
            .unwrap();
        assert_eq!(a.facility_ids(), vec!["early"]);

        // Same cost for the remainder: earliest in sorted order wins
        let facilities = vec![
            Facility::new("b", 10.0, 10.0, 1.0), // ratio 2, cost(4) = 14
            Facility::new("a", 20.0, 12.0, 0.5), // ratio 1.1, cost(4) = 14
        ];
        let a = GreedyAllocator::new(CheapestBig)
            .allocate(&facilities, 4.0)
            .unwrap();
        assert_eq!(a.facility_ids(), vec!["a"]);
    }

    #[test]
    fn test_indivisible_small_after_big_run() {
        let facilities = vec![
            Facility::new("A", 10.0, 0.0, 1.0),  // ratio 1
            Facility::new("B", 5.0, 0.0, 2.0),   // ratio 2
            Facility::new("C", 0.25, 0.0, 3.0),  // ratio 3
            Facility::new("E", 1.0, 0.0, 4.0),   // ratio 4
        ];
        // A small (10), B big, C small (10.25), E big → candidate set restarts at E
        let a = GreedyAllocator::new(CheapestBig)
            .allocate(&facilities, 10.5)
            .unwrap();
        assert_eq!(a.facility_ids(), vec!["A", "C", "E"]);
        assert_eq!(a.quantity_of("E"), Some(0.25));
        assert_eq!(a.partial_entries().count(), 1);
    }

    #[test]
    fn test_indivisible_infeasible() {
        let err = GreedyAllocator::new(CheapestBig)
            .allocate(&two_facilities(), 15.5)
            .unwrap_err();
        match err {
            Error::Infeasible { demand, capacity } => {
                assert!((demand - 15.5).abs() < 1e-10);
                assert!((capacity - 15.0).abs() < 1e-10);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_indivisible_random_invariants() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..200 {
            let n = rng.random_range(1..12);
            let facilities = random_facilities(&mut rng, n);
            let total: f64 = facilities.iter().map(|f| f.capacity).sum();
            let demand = rng.random_range(0.01..=1.0) * total;

            let a = GreedyAllocator::new(CheapestBig)
                .allocate(&facilities, demand)
                .unwrap();
            assert_covers(&facilities, demand, &a);
            assert!(a.partial_entries().count() <= 1);
            // Only the last entry may be partial
            for entry in &a.entries[..a.len() - 1] {
                assert_eq!(entry.quantity, entry.facility.capacity);
            }
        }
    }

    // ======================== Fractional ========================

    #[test]
    fn test_fractional_scenario() {
        let a = GreedyAllocator::new(NextInOrder::default())
            .allocate(&two_facilities(), 12.0)
            .unwrap();
        assert_eq!(a.policy, "fractional");
        assert_eq!(a.facility_ids(), vec!["f2", "f1"]);
        assert_eq!(a.quantity_of("f2"), Some(10.0));
        assert_eq!(a.quantity_of("f1"), Some(2.0));
        let (cost, assigned) = evaluate(&a);
        assert!((cost - 44.0).abs() < 1e-10);
        assert!((assigned - 12.0).abs() < 1e-10);
    }

    #[test]
    fn test_fractional_no_cost_comparison() {
        // Sorted [f2, f1]; f2 takes all 3 although f1 would be cheaper
        let a = GreedyAllocator::new(NextInOrder::default())
            .allocate(&two_facilities(), 3.0)
            .unwrap();
        assert_eq!(a.facility_ids(), vec!["f2"]);
        let (cost, _) = evaluate(&a);
        assert!((cost - 23.0).abs() < 1e-10);
    }

    #[test]
    fn test_fractional_infeasible() {
        for policy in [NextInOrder::cumulative(), NextInOrder::running_sum()] {
            let err = GreedyAllocator::new(policy)
                .allocate(&two_facilities(), 20.0)
                .unwrap_err();
            assert!(matches!(err, Error::Infeasible { .. }));
        }
    }

    #[test]
    fn test_fractional_thresholds_match_scenarios() {
        for policy in [NextInOrder::cumulative(), NextInOrder::running_sum()] {
            let a = GreedyAllocator::new(policy)
                .allocate(&two_facilities(), 12.0)
                .unwrap();
            assert_eq!(a.facility_ids(), vec!["f2", "f1"]);
            assert_eq!(a.quantity_of("f1"), Some(2.0));
        }
    }

    #[test]
    fn test_fractional_thresholds_diverge() {
        let facilities = vec![
            Facility::new("x", 4.0, 4.0, 1.0),
            Facility::new("y", 4.0, 4.0, 1.0),
            Facility::new("z", 4.0, 4.0, 1.0),
        ];

        // 4 < 10, 8 < 10, 12 >= 10
        let cumulative = GreedyAllocator::new(NextInOrder::cumulative())
            .allocate(&facilities, 10.0)
            .unwrap();
        assert_eq!(cumulative.facility_ids(), vec!["x", "y", "z"]);
        assert_eq!(cumulative.quantity_of("z"), Some(2.0));
        assert!(cumulative.iter().all(|e| e.quantity <= e.facility.capacity));

        // 4 < 10 - 0, then 8 >= 10 - 4: y takes the remaining 6
        let running = GreedyAllocator::new(NextInOrder::running_sum())
            .allocate(&facilities, 10.0)
            .unwrap();
        assert_eq!(running.policy, "fractional-running-sum");
        assert_eq!(running.facility_ids(), vec!["x", "y"]);
        assert_eq!(running.quantity_of("y"), Some(6.0));
        assert!(running.quantity_of("y").unwrap() > facilities[1].capacity);
        assert!((running.total_assigned() - 10.0).abs() < 1e-10);

        // Only the cumulative threshold keeps every entry within capacity,
        // which is why it backs allocate_fractional.
        assert_eq!(
            crate::allocator::allocate_fractional(&facilities, 10.0).unwrap(),
            cumulative
        );
    }

    #[test]
    fn test_fractional_random_invariants() {
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..200 {
            let n = rng.random_range(1..12);
            let facilities = random_facilities(&mut rng, n);
            let total: f64 = facilities.iter().map(|f| f.capacity).sum();
            let demand = rng.random_range(0.01..=1.0) * total;

            let cumulative = GreedyAllocator::new(NextInOrder::cumulative())
                .allocate(&facilities, demand)
                .unwrap();
            assert_covers(&facilities, demand, &cumulative);

            let (last, head) = cumulative.entries.split_last().unwrap();
            let mut saturated = 0.0;
            for entry in head {
                assert_eq!(entry.quantity, entry.facility.capacity);
                saturated += entry.quantity;
            }
            assert!((last.quantity - (demand - saturated)).abs() < 1e-9 * demand.max(1.0));

            // Entries follow efficiency order
            let ratios: Vec<f64> = cumulative
                .iter()
                .map(|e| e.facility.efficiency_ratio())
                .collect();
            assert!(ratios.windows(2).all(|w| w[0] <= w[1]));

            // The running-sum threshold is stricter, so it stops no later.
            let running = GreedyAllocator::new(NextInOrder::running_sum())
                .allocate(&facilities, demand)
                .unwrap();
            assert!((running.total_assigned() - demand).abs() <= 1e-9 * demand.max(1.0));
            assert!(running.len() <= cumulative.len());
        }
    }

    #[test]
    fn test_names() {
        assert_eq!(CheapestBig.name(), "indivisible");
        assert_eq!(NextInOrder::cumulative().name(), "fractional");
        assert_eq!(NextInOrder::running_sum().name(), "fractional-running-sum");
        assert_ne!(CheapestBig.description(), CheapestBig.name());
    }
}
