//! Bound checks for zoom and rotation values.
//!
//! Every function here is pure: it takes the current value and returns the
//! next one. The session decides which policy applies to which quantity.
//!
//! # Policies
//!
//! - [`StepPolicy::Clamp`]: `clamp(value ± step, min, max)`. The value can
//!   always reach the bound exactly.
//! - [`StepPolicy::Gate`]: the step is applied only when the result stays
//!   within bounds, otherwise nothing happens. Depending on how the step
//!   divides the range, the value may stop short of the bound.

use serde::{Deserialize, Serialize};

/// How a stepped value behaves when a step would leave its bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepPolicy {
    /// Land on the bound.
    #[default]
    Clamp,
    /// Ignore the step.
    Gate,
}

/// How rotation behaves when a step leaves `[min_rotation, max_rotation]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationPolicy {
    /// Normalize into `[min, max)` by the span, so a full turn comes back
    /// to where it started.
    #[default]
    Wrap,
    /// Land on the bound.
    Clamp,
    /// Ignore the step.
    Gate,
}

/// Closed range plus the step used by the button-driven mutators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Bounds {
    pub fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// Width of the range.
    #[inline]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Whether a further increase is allowed from `value`.
    ///
    /// Advisory only: evaluated against the current value, before any step.
    #[inline]
    pub fn can_increase(&self, value: f64) -> bool {
        value < self.max
    }

    /// Whether a further decrease is allowed from `value`.
    #[inline]
    pub fn can_decrease(&self, value: f64) -> bool {
        value > self.min
    }

    /// Whether `value` lies inside the closed range.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamp `value` into `[min, max]`.
    #[inline]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Add `by` to `value` under `policy`.
    pub fn step_up(&self, value: f64, by: f64, policy: StepPolicy) -> f64 {
        self.apply(value, value + by, policy)
    }

    /// Subtract `by` from `value` under `policy`.
    pub fn step_down(&self, value: f64, by: f64, policy: StepPolicy) -> f64 {
        self.apply(value, value - by, policy)
    }

    /// Normalize `value` into `[min, max)`.
    ///
    /// A zero or negative span leaves the value clamped instead.
    pub fn wrap(&self, value: f64) -> f64 {
        let span = self.span();
        if span <= 0.0 {
            return self.clamp(value);
        }
        let wrapped = self.min + (value - self.min).rem_euclid(span);
        // rem_euclid can round up to exactly `span` for tiny negative inputs
        if wrapped >= self.max {
            self.min
        } else {
            wrapped
        }
    }

    fn apply(&self, current: f64, next: f64, policy: StepPolicy) -> f64 {
        match policy {
            StepPolicy::Clamp => self.clamp(next),
            StepPolicy::Gate => {
                if self.contains(next) {
                    next
                } else {
                    current
                }
            }
        }
    }
}

/// Step a rotation value by a signed amount under `policy`.
pub fn step_rotation(bounds: &Bounds, value: f64, delta: f64, policy: RotationPolicy) -> f64 {
    match policy {
        RotationPolicy::Wrap => bounds.wrap(value + delta),
        RotationPolicy::Clamp if delta >= 0.0 => bounds.step_up(value, delta, StepPolicy::Clamp),
        RotationPolicy::Clamp => bounds.step_down(value, -delta, StepPolicy::Clamp),
        RotationPolicy::Gate if delta >= 0.0 => bounds.step_up(value, delta, StepPolicy::Gate),
        RotationPolicy::Gate => bounds.step_down(value, -delta, StepPolicy::Gate),
    }
}

/// Bring an arbitrary rotation (from a slider or a setter) into range.
pub fn normalize_rotation(bounds: &Bounds, value: f64, policy: RotationPolicy) -> f64 {
    match policy {
        RotationPolicy::Wrap => bounds.wrap(value),
        RotationPolicy::Clamp | RotationPolicy::Gate => bounds.clamp(value),
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn policy_strategy() -> impl Strategy<Value = StepPolicy> {
        prop_oneof![Just(StepPolicy::Clamp), Just(StepPolicy::Gate)]
    }

    proptest! {
        /// Stepping from inside the range never leaves it.
        #[test]
        fn prop_steps_stay_in_range(
            start in 0.5f64..=4.0,
            step in 0.01f64..=1.0,
            ups in proptest::collection::vec(any::<bool>(), 0..50),
            policy in policy_strategy(),
        ) {
            let b = Bounds::new(0.5, 4.0, step);
            let mut value = start;
            for up in ups {
                value = if up {
                    b.step_up(value, step, policy)
                } else {
                    b.step_down(value, step, policy)
                };
                prop_assert!(b.contains(value), "value {} escaped", value);
            }
        }

        /// Wrapping always lands in the half-open range.
        #[test]
        fn prop_wrap_in_half_open_range(value in -10_000.0f64..10_000.0) {
            let b = Bounds::new(0.0, 360.0, 5.0);
            let w = b.wrap(value);
            prop_assert!(w >= 0.0 && w < 360.0, "wrapped {} -> {}", value, w);
        }

        /// Wrapping is idempotent.
        #[test]
        fn prop_wrap_idempotent(value in -10_000.0f64..10_000.0) {
            let b = Bounds::new(-180.0, 180.0, 5.0);
            let once = b.wrap(value);
            prop_assert_eq!(b.wrap(once), once);
        }
    }
}
