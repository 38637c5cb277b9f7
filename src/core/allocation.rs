//! Allocation engine - Distributes a generator's expected monthly generation
//! across its subscribers.
//!
//! Pure computation over already-loaded data; no I/O. Two mutually exclusive
//! modes:
//!
//! - **Percentage**: each subscriber receives `expected * percentage / 100`,
//!   taken verbatim from the caller. Percentages are not normalized; whether
//!   a sum above 100 is rejected depends on the configured
//!   [`ValidationPolicy`].
//! - **Priority**: subscribers are served in ascending rank order, each
//!   receiving up to its contracted consumption from the remaining pool.
//!   The pool exhausts naturally, leaving later ranks with zero.

use crate::errors::{Error, Result};

/// Allocation policy selected for one rateio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationMode {
    /// Fixed percentage shares of the expected generation
    Percentage,
    /// Water-fill by ascending priority rank, clamped to contracted kWh
    Priority,
}

impl AllocationMode {
    /// Parses the persisted literal (`"porcentagem"` or `"prioridade"`).
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "porcentagem" => Ok(Self::Percentage),
            "prioridade" => Ok(Self::Priority),
            other => Err(Error::Validation {
                message: format!("Unknown allocation type: {other}"),
            }),
        }
    }

    /// The literal stored in the database for this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Percentage => "porcentagem",
            Self::Priority => "prioridade",
        }
    }
}

/// Whether percentage sums above 100 are rejected or passed through.
///
/// The observed production behavior trusts caller-supplied percentages
/// verbatim, so `Lenient` is the default; `Strict` is an opt-in guard,
/// never applied silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationPolicy {
    /// Reject percentage-mode inputs whose shares sum to more than 100
    Strict,
    /// Accept shares as given, allowing over- and under-allocation
    #[default]
    Lenient,
}

/// One subscriber's allocation request
#[derive(Debug, Clone)]
pub struct AllocationRequest {
    /// Subscriber being allocated to
    pub subscriber_id: i64,
    /// Contracted monthly consumption in kWh (priority-mode cap)
    pub contracted_kwh: f64,
    /// Share of expected generation, 0-100 (percentage mode)
    pub percentage: Option<f64>,
    /// Priority rank, lower served first (priority mode)
    pub priority: Option<i32>,
}

/// Result of one allocation computation
#[derive(Debug, Clone)]
pub struct AllocationOutcome {
    /// kWh allocated to each subscriber, in input order
    pub allocated_kwh: Vec<f64>,
    /// Sum of all allocations in kWh
    pub total_distributed_kwh: f64,
    /// Expected generation minus distributed; negative when over-allocated
    pub energy_surplus_kwh: f64,
}

/// Tolerance for the strict percentage-sum check; floating shares like
/// three times 33.33 must not trip it.
const PERCENT_SUM_EPSILON: f64 = 1e-6;

/// Computes each subscriber's allocated kWh, the total distributed, and the
/// surplus for the given mode.
pub fn compute(
    mode: AllocationMode,
    expected_generation_kwh: f64,
    items: &[AllocationRequest],
    policy: ValidationPolicy,
) -> Result<AllocationOutcome> {
    if !expected_generation_kwh.is_finite() || expected_generation_kwh < 0.0 {
        return Err(Error::InvalidAmount {
            amount: expected_generation_kwh,
        });
    }
    if items.is_empty() {
        return Err(Error::Validation {
            message: "An allocation requires at least one subscriber".to_string(),
        });
    }

    let allocated_kwh = match mode {
        AllocationMode::Percentage => {
            compute_percentage(expected_generation_kwh, items, policy)?
        }
        AllocationMode::Priority => compute_priority(expected_generation_kwh, items)?,
    };

    let total_distributed_kwh: f64 = allocated_kwh.iter().sum();
    Ok(AllocationOutcome {
        energy_surplus_kwh: expected_generation_kwh - total_distributed_kwh,
        total_distributed_kwh,
        allocated_kwh,
    })
}

fn compute_percentage(
    expected_generation_kwh: f64,
    items: &[AllocationRequest],
    policy: ValidationPolicy,
) -> Result<Vec<f64>> {
    let mut shares = Vec::with_capacity(items.len());
    for item in items {
        let percentage = item.percentage.ok_or_else(|| Error::Validation {
            message: format!(
                "Subscriber {} has no percentage in a percentage-mode allocation",
                item.subscriber_id
            ),
        })?;
        if !percentage.is_finite() || percentage < 0.0 {
            return Err(Error::InvalidAmount { amount: percentage });
        }
        shares.push(percentage);
    }

    if policy == ValidationPolicy::Strict {
        let sum: f64 = shares.iter().sum();
        if sum > 100.0 + PERCENT_SUM_EPSILON {
            return Err(Error::Validation {
                message: format!("Percentage shares sum to {sum:.2}, above 100"),
            });
        }
    }

    Ok(shares
        .iter()
        .map(|pct| expected_generation_kwh * (pct / 100.0))
        .collect())
}

fn compute_priority(
    expected_generation_kwh: f64,
    items: &[AllocationRequest],
) -> Result<Vec<f64>> {
    // Stable sort of indices by rank; duplicate ranks keep input order
    let mut order: Vec<usize> = (0..items.len()).collect();
    for item in items {
        if item.priority.is_none() {
            return Err(Error::Validation {
                message: format!(
                    "Subscriber {} has no priority in a priority-mode allocation",
                    item.subscriber_id
                ),
            });
        }
        if !item.contracted_kwh.is_finite() || item.contracted_kwh < 0.0 {
            return Err(Error::InvalidAmount {
                amount: item.contracted_kwh,
            });
        }
    }
    order.sort_by_key(|&i| items[i].priority.unwrap_or(i32::MAX));

    let mut allocated = vec![0.0; items.len()];
    let mut remaining = expected_generation_kwh;
    for index in order {
        if remaining <= 0.0 {
            break;
        }
        let share = items[index].contracted_kwh.min(remaining);
        allocated[index] = share;
        remaining -= share;
    }
    Ok(allocated)
}
