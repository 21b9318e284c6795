//! Pure statistics math. No I/O, no clocks except the `now` passed in;
//! everything here is deterministic over its inputs.

use chrono::{DateTime, Utc};

use deepwatch_core::validation::validate_balance;
use deepwatch_core::{Amount, DeepwatchError, EstimatedDays, HalvingPhase, HalvingStats};

/// Phase selection from current issuance. Total: at or above the SECOND
/// target means the second halving is done and the THIRD is counting.
pub fn determine_phase(current: &Amount) -> HalvingPhase {
    if current >= HalvingPhase::Second.target() {
        HalvingPhase::Third
    } else {
        HalvingPhase::Second
    }
}

/// `target(phase) − current`. The phase rule keeps this non-negative, but a
/// snapshot taken right as the phase flips can still overshoot, so the
/// subtraction clamps at zero instead of trusting that.
pub fn remaining_amount(current: &Amount, phase: HalvingPhase) -> Amount {
    phase.target().saturating_sub(current)
}

/// Average issuance growth per day over the window, rounded half-up to a
/// whole unit. A non-positive window or a historical reading above the
/// current one is an inconsistent snapshot and fails outright.
pub fn daily_increase(
    current: &Amount,
    previous: &Amount,
    days: i64,
) -> Result<Amount, DeepwatchError> {
    if days <= 0 {
        return Err(DeepwatchError::WindowNotPositive { days });
    }
    let delta = current
        .checked_sub(previous)
        .ok_or_else(|| DeepwatchError::IssuanceRegression {
            current: current.to_string(),
            previous: previous.to_string(),
        })?;
    delta.div_round(&Amount::from_u128(days as u128))
}

/// Days until `remaining` is covered at `daily` growth, rounded up.
/// Zero growth yields `Unbounded`, never a division by zero.
pub fn remaining_days(daily: &Amount, remaining: &Amount) -> EstimatedDays {
    if daily.is_zero() {
        return EstimatedDays::Unbounded;
    }
    match remaining.div_ceil(daily) {
        Ok(days) => EstimatedDays::Days(days.to_u128().unwrap_or(u128::MAX)),
        // divisor checked nonzero above
        Err(_) => EstimatedDays::Unbounded,
    }
}

/// `now + days`. An unbounded estimate has no date; that and calendar
/// overflow are errors, never clamped.
pub fn estimated_date(
    days: EstimatedDays,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, DeepwatchError> {
    let days = match days {
        EstimatedDays::Days(n) => n,
        EstimatedDays::Unbounded => return Err(DeepwatchError::UnboundedEstimate),
    };
    let days = i64::try_from(days).map_err(|_| DeepwatchError::DateOverflow)?;
    let span = chrono::Duration::try_days(days).ok_or(DeepwatchError::DateOverflow)?;
    now.checked_add_signed(span).ok_or(DeepwatchError::DateOverflow)
}

/// Whole-percent progress toward `target`, capped at 100.
pub fn progress_percent(current: &Amount, target: &Amount) -> u8 {
    if target.is_zero() {
        return 100;
    }
    match (current * &Amount::from_u128(100)).div_round(target) {
        Ok(pct) => pct.to_u128().map_or(100, |p| p.min(100) as u8),
        // divisor checked nonzero above
        Err(_) => 100,
    }
}

/// The full composition one refresh runs: phase, remaining, growth rate,
/// day estimate, then a final validation pass over every balance field
/// before the record is allowed out.
pub fn compute_stats(
    current: &Amount,
    previous: &Amount,
    days: u32,
) -> Result<HalvingStats, DeepwatchError> {
    let phase = determine_phase(current);
    let remaining = remaining_amount(current, phase);
    let daily = daily_increase(current, previous, i64::from(days))?;
    let estimated_days = remaining_days(&daily, &remaining);
    let stats = HalvingStats {
        current_issuance: current.to_string(),
        remaining_amount: remaining.to_string(),
        estimated_days,
        average_daily_increase: daily.to_string(),
        halving_phase: phase,
    };
    for value in [
        &stats.current_issuance,
        &stats.remaining_amount,
        &stats.average_daily_increase,
    ] {
        if !validate_balance(value) {
            return Err(DeepwatchError::InvalidBalance(value.clone()));
        }
    }
    Ok(stats)
}
