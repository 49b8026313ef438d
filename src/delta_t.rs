// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! # ΔT (Delta T) — UT↔TT Correction Layer
//!
//! This module interpolates **ΔT = TT − UT** linearly over a fixed table of
//! smoothed historical measurements derived from total solar eclipses and,
//! after the invention of the telescope, lunar occultations of stars.
//!
//! ## Integration with Time Scales
//!
//! The correction is applied by the [`UT`](super::UT) time scale marker:
//! converting `Time<UT>` to [`JD`](super::JD) adds ΔT for the instant's
//! calendar year; the inverse runs a fixed-point solver.  The base civil
//! conversion does **not** consult this table — it uses the fixed
//! leap-second constant of the [`Unix`](super::Unix) scale.
//!
//! ## Boundary policy
//!
//! The table spans −500 to 2018.  Queries outside that span are linearly
//! extrapolated from the nearest breakpoint pair, with no further
//! safeguard; far from the table this can be inaccurate.  Callers get
//! reduced accuracy, never a failure.
//!
//! ## Quick Example
//! ```rust
//! use syzygy::delta_t_lerp;
//!
//! // Exactly on a breakpoint:
//! let dt = delta_t_lerp(2000.0);
//! println!("ΔT(2000) = {dt}");
//! ```

use super::instant::Time;
use super::scales::UT;
use qtty::Seconds;

/// A tabulated (calendar year, ΔT) measurement.
#[derive(Debug, Clone, Copy)]
struct YearDt {
    year: f64,
    dt: Seconds,
}

/// Smoothed historical ΔT measurements, ordered by strictly increasing year.
///
/// ΔT decreased from +17 190 s in −500 to a plateau in the telescope era,
/// went negative for about three decades before 1902 (reaching −6.64 s),
/// then rose to +63.83 s in January 2000 and +68.97 s in January 2018.
#[rustfmt::skip]
const DELTA_T_YR: [YearDt; 8] = [
    YearDt { year: -500.0, dt: Seconds::new(17_190.0) },
    YearDt { year: 0.0, dt: Seconds::new(10_580.0) },
    YearDt { year: 500.0, dt: Seconds::new(5_710.0) },
    YearDt { year: 1000.0, dt: Seconds::new(1_570.0) },
    YearDt { year: 1500.0, dt: Seconds::new(200.0) },
    YearDt { year: 1900.0, dt: Seconds::new(-6.64) },
    YearDt { year: 2000.0, dt: Seconds::new(63.83) },
    YearDt { year: 2018.0, dt: Seconds::new(68.97) },
];

/// Returns **ΔT** in seconds for a calendar year, by piecewise-linear
/// interpolation over the fixed breakpoint table.
///
/// The bracketing pair is the first breakpoint whose year exceeds the
/// query together with its predecessor; past the end of the table the last
/// pair is reused, so out-of-table years extrapolate linearly.
///
/// Deterministic and side-effect-free; the table is read-only, so
/// concurrent calls are safe.
pub fn delta_t_lerp(year: f64) -> Seconds {
    let mut point = 1;
    while year > DELTA_T_YR[point].year && point + 1 < DELTA_T_YR.len() {
        point += 1;
    }
    let lo = DELTA_T_YR[point - 1];
    let hi = DELTA_T_YR[point];
    let slope = (hi.dt - lo.dt).value() / (hi.year - lo.year);
    hi.dt - Seconds::new((hi.year - year) * slope)
}

// ── Time<UT> convenience method ───────────────────────────────────────────

impl Time<UT> {
    /// Returns **ΔT = TT − UT** in seconds for this UT epoch.
    ///
    /// This is a convenience accessor; the same correction is applied
    /// automatically when converting to [`JD`](super::JD).
    #[inline]
    pub fn delta_t(&self) -> Seconds {
        delta_t_lerp(
            super::instant::Time::<super::scales::JD>::from_days(self.quantity()).julian_epoch(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_t_exact_on_every_breakpoint() {
        for bp in DELTA_T_YR {
            let dt = delta_t_lerp(bp.year);
            assert!(
                (dt - bp.dt).abs() < Seconds::new(1e-9),
                "ΔT({}) = {}, expected {}",
                bp.year,
                dt,
                bp.dt
            );
        }
    }

    #[test]
    fn delta_t_1250_is_strictly_inside_bracket() {
        let dt = delta_t_lerp(1250.0);
        assert!(dt > Seconds::new(200.0) && dt < Seconds::new(1_570.0));
        // Midpoint of the 1000→1500 segment.
        assert!((dt - Seconds::new(885.0)).abs() < Seconds::new(1e-9));
    }

    #[test]
    fn delta_t_extrapolates_before_first_breakpoint() {
        // Monotonic extension of the initial slope.
        assert!(delta_t_lerp(-700.0) > Seconds::new(17_190.0));
        let dt = delta_t_lerp(-700.0);
        assert!((dt - Seconds::new(19_834.0)).abs() < Seconds::new(1e-6));
    }

    #[test]
    fn delta_t_extrapolates_past_last_breakpoint() {
        assert!(delta_t_lerp(2030.0) > Seconds::new(68.97));
        let dt = delta_t_lerp(2030.0);
        // 68.97 + 12 × (68.97 − 63.83)/18
        assert!((dt - Seconds::new(72.396_666_666_666_67)).abs() < Seconds::new(1e-9));
    }

    #[test]
    fn delta_t_2000() {
        // IERS reference value: ~63.83 s
        let dt = delta_t_lerp(2000.0);
        assert!((dt - Seconds::new(63.83)).abs() < Seconds::new(1e-9));
    }

    #[test]
    fn delta_t_trough_near_1900() {
        let dt = delta_t_lerp(1900.0);
        assert!((dt - Seconds::new(-6.64)).abs() < Seconds::new(1e-9));
    }

    #[test]
    fn delta_t_convenience_method() {
        let ut = Time::<UT>::new(2_451_545.0);
        let dt = ut.delta_t();
        assert!((dt - Seconds::new(63.83)).abs() < Seconds::new(1e-6));
    }
}
