//! 1D phase unwrapping.

use std::f64::consts::{PI, TAU};

/// Removes 2-pi jumps from a profile of wrapped phases.
pub(crate) fn unwrap(wrapped: &[f64]) -> Vec<f64> {
    unwrap_from(wrapped, 0)
}

/// Unwraps with an initial whole-cycle offset applied to every sample.
///
/// A successive difference above +pi records a -1 cycle correction, one below
/// -pi records +1; the running correction times 2-pi is added back onto the
/// wrapped values. Exact and reproducible for identical inputs.
pub(crate) fn unwrap_from(wrapped: &[f64], initial_cycles: i64) -> Vec<f64> {
    let mut out = Vec::with_capacity(wrapped.len());
    let Some((&first, rest)) = wrapped.split_first() else {
        return out;
    };
    let mut cycles = initial_cycles;
    out.push(first + cycles as f64 * TAU);
    let mut prev = first;
    for &v in rest {
        let diff = v - prev;
        if diff > PI {
            cycles -= 1;
        } else if diff < -PI {
            cycles += 1;
        }
        out.push(v + cycles as f64 * TAU);
        prev = v;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{unwrap, unwrap_from};
    use std::f64::consts::{PI, TAU};

    fn wrap(v: f64) -> f64 {
        let mut w = v % TAU;
        if w > PI {
            w -= TAU;
        } else if w <= -PI {
            w += TAU;
        }
        w
    }

    #[test]
    fn recovers_linear_ramp() {
        let slope = 0.9;
        let wrapped: Vec<f64> = (0..100).map(|i| wrap(slope * i as f64)).collect();
        let unwrapped = unwrap(&wrapped);
        for (i, v) in unwrapped.iter().enumerate() {
            assert!((v - slope * i as f64).abs() < 1e-9);
        }
    }

    #[test]
    fn recovers_descending_ramp() {
        let slope = -1.3;
        let wrapped: Vec<f64> = (0..80).map(|i| wrap(slope * i as f64)).collect();
        let unwrapped = unwrap(&wrapped);
        for (i, v) in unwrapped.iter().enumerate() {
            assert!((v - slope * i as f64).abs() < 1e-9);
        }
    }

    #[test]
    fn initial_cycle_offset_shifts_everything() {
        let wrapped = vec![0.1, 0.2, 0.3];
        let base = unwrap(&wrapped);
        let offset = unwrap_from(&wrapped, 2);
        for (a, b) in base.iter().zip(&offset) {
            assert!((b - a - 2.0 * TAU).abs() < 1e-12);
        }
    }

    #[test]
    fn empty_profile_stays_empty() {
        assert!(unwrap(&[]).is_empty());
    }
}
