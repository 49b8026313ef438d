// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Fixed-step hysteresis extremum scanner.
//!
//! [`ExtremumScanner`] drives a [`JulianDate`](crate::JulianDate) clock
//! forward in fixed steps, queries an [`EphemerisSource`] for two relative
//! state vectors per step, reduces them to a scalar with
//! [`closeness`](crate::closeness), and feeds the [`Hysteresis`] state
//! machine until the cycle completes.
//!
//! A single minimum-tracking pass is vulnerable to numerical jitter near
//! the true extremum producing spurious local minima.  The hysteresis rule
//! instead requires the signal to cross a tight bound around the extremum
//! *and* recover past a separated completion threshold before the cycle is
//! declared done, which filters jitter while bounding detection latency to
//! one sample step.
//!
//! One scanner owns one clock and one source; it carries mutable rolling
//! state and must not be driven from two threads.  Independent scanners
//! (e.g. tracking different body pairs) can run on separate threads if
//! each owns its own source handle.

use log::{debug, info, trace, warn};
use qtty::Days;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::ephemeris::{Body, EphemerisSource};
use super::error::{Error, Result};
use super::instant::Time;
use super::proximity::closeness;
use super::scales::JD;

// ---------------------------------------------------------------------------
// Named scan constants
// ---------------------------------------------------------------------------

/// One simulated minute, the default scan step.
pub const MINUTE_STEP: Days = Days::new(1.0 / 1_440.0);

/// Default step cap: one synodic month of minute steps, so a scan always
/// terminates even when no valid event is found.
pub const SYNODIC_STEP_CAP: u32 = 29 * 24 * 60;

/// Default completion threshold the signal must recover past.
pub const UPPER_THRESHOLD: f64 = 1.0;

/// Default bound the running extremum must cross before recovery counts.
pub const LOWER_THRESHOLD: f64 = 0.01;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Whether the scan hunts the signal's minimum or its maximum.
///
/// The projected vector-sum magnitude bottoms out at one syzygy and peaks
/// at the other, depending on the vector convention the source supplies;
/// which polarity corresponds to "new moon" is a calibration choice, so it
/// is explicit configuration rather than a baked-in guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Track the running minimum; complete on recovery above the upper
    /// threshold after the minimum dipped below the lower one.
    MinSeeking,
    /// Mirror image: track the running maximum; complete on collapse below
    /// the lower threshold after the maximum exceeded the upper one.
    MaxSeeking,
}

/// One relative ephemeris query: `target` as seen from `center`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyPair {
    pub target: Body,
    pub center: Body,
}

/// Scanner configuration.
///
/// `Default` is the new-moon geometry: minute steps over one synodic
/// month, Moon seen from Earth against the Earth-Moon barycenter seen
/// from the Sun, min-seeking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanConfig {
    /// Clock advance per step, in days.
    pub step: Days,
    /// Hard cap on steps per cycle.
    pub max_steps: u32,
    /// Bound the running extremum must cross (see [`Polarity`]).
    pub lower_threshold: f64,
    /// Threshold the signal must clear to complete the cycle.
    pub upper_threshold: f64,
    /// Min- or max-seeking detection.
    pub polarity: Polarity,
    /// First ephemeris query of each step.
    pub primary: BodyPair,
    /// Second ephemeris query of each step.
    pub secondary: BodyPair,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            step: MINUTE_STEP,
            max_steps: SYNODIC_STEP_CAP,
            lower_threshold: LOWER_THRESHOLD,
            upper_threshold: UPPER_THRESHOLD,
            polarity: Polarity::MinSeeking,
            primary: BodyPair {
                target: Body::Moon,
                center: Body::Earth,
            },
            secondary: BodyPair {
                target: Body::EarthMoonBarycenter,
                center: Body::Sun,
            },
        }
    }
}

impl ScanConfig {
    /// Check the configuration for internal consistency.
    pub fn validate(&self) -> std::result::Result<(), &'static str> {
        if !(self.step.value() > 0.0) {
            return Err("scan step must be a positive number of days");
        }
        if self.max_steps == 0 {
            return Err("step cap must allow at least one sample");
        }
        if !(self.lower_threshold < self.upper_threshold) {
            return Err("lower threshold must lie strictly below the upper threshold");
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Hysteresis state machine
// ---------------------------------------------------------------------------

/// Scan cycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Still hunting the extremum.
    Searching,
    /// The extremum is locked in; the recorded candidate is the event.
    CycleComplete,
}

/// The per-cycle update rule, isolated from clock and ephemeris I/O so the
/// completion condition can be exercised on a bare synthetic signal.
///
/// The first sample primes the rolling window and becomes the initial
/// candidate; each later sample is judged against the previous one
/// (`dmag`) and the running extremum.
#[derive(Debug, Clone)]
pub struct Hysteresis {
    polarity: Polarity,
    lower: f64,
    upper: f64,
    last_mag: Option<f64>,
    best: Option<(Time<JD>, f64)>,
}

impl Hysteresis {
    /// A fresh tracker for one detection cycle.
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            polarity: config.polarity,
            lower: config.lower_threshold,
            upper: config.upper_threshold,
            last_mag: None,
            best: None,
        }
    }

    /// Feed one sample; returns the cycle state after the update.
    pub fn observe(&mut self, at: Time<JD>, mag: f64) -> ScanState {
        let dmag = match self.last_mag.replace(mag) {
            None => {
                self.best = Some((at, mag));
                return ScanState::Searching;
            }
            Some(prev) => mag - prev,
        };
        let (_, best_mag) = match self.best {
            Some(best) => best,
            None => {
                self.best = Some((at, mag));
                return ScanState::Searching;
            }
        };

        match self.polarity {
            Polarity::MinSeeking => {
                if mag < best_mag && dmag < 0.0 {
                    self.best = Some((at, mag));
                } else if mag > self.upper && best_mag < self.lower && dmag > 0.0 {
                    return ScanState::CycleComplete;
                }
            }
            Polarity::MaxSeeking => {
                if mag > best_mag && dmag > 0.0 {
                    self.best = Some((at, mag));
                } else if mag < self.lower && best_mag > self.upper && dmag < 0.0 {
                    return ScanState::CycleComplete;
                }
            }
        }
        ScanState::Searching
    }

    /// The recorded candidate extremum, if any sample has been seen.
    pub fn extremum(&self) -> Option<(Time<JD>, f64)> {
        self.best
    }
}

// ---------------------------------------------------------------------------
// Detected events
// ---------------------------------------------------------------------------

/// One extremum located by a completed (or capped) scan cycle.
///
/// Ownership passes to the caller; a long-running driver sees an
/// unbounded, time-ordered stream of these.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DetectedEvent {
    /// Clock reading at the recorded extremum.
    pub time: Time<JD>,
    /// Metric value at the recorded extremum.
    pub magnitude: f64,
}

impl std::fmt::Display for DetectedEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "extremum {:.6} at {}", self.magnitude, self.time)
    }
}

// ---------------------------------------------------------------------------
// The scanner
// ---------------------------------------------------------------------------

/// Drives the clock, the ephemeris queries, and the hysteresis rule.
///
/// The clock only ever moves forward: each completed cycle leaves it where
/// the cycle ended, so repeated [`run_cycle`](Self::run_cycle) calls walk
/// an unbounded stream of events.  Outer repetition, retry policy, and
/// sleep scheduling belong to the caller.
pub struct ExtremumScanner<E: EphemerisSource> {
    source: E,
    clock: Time<JD>,
    config: ScanConfig,
}

impl<E: EphemerisSource> ExtremumScanner<E> {
    /// Build a scanner starting at `start`.
    ///
    /// Fails fast on an inconsistent configuration; nothing is queried
    /// until the first cycle runs.
    pub fn new(source: E, start: Time<JD>, config: ScanConfig) -> Result<Self> {
        config.validate().map_err(|e| Error::Config(e.into()))?;
        Ok(Self {
            source,
            clock: start,
            config,
        })
    }

    /// The clock's current reading.
    pub fn clock(&self) -> Time<JD> {
        self.clock
    }

    /// The active configuration.
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Consume the scanner, returning the ephemeris source.
    pub fn into_source(self) -> E {
        self.source
    }

    /// Run one detection cycle and return its event.
    ///
    /// Advances the clock one step at a time, up to the configured cap.
    /// If the cap is reached before the hysteresis completes, the best
    /// extremum recorded so far is emitted as a best-effort event (and
    /// logged as such) rather than silently dropped.
    ///
    /// Any ephemeris or geometry failure aborts the cycle immediately and
    /// propagates; the clock stays where the failure occurred.
    pub fn run_cycle(&mut self) -> Result<DetectedEvent> {
        let mut tracker = Hysteresis::new(&self.config);

        for _ in 0..self.config.max_steps {
            self.clock += self.config.step;

            let primary = self.source.state(
                self.clock,
                self.config.primary.target,
                self.config.primary.center,
            )?;
            let secondary = self.source.state(
                self.clock,
                self.config.secondary.target,
                self.config.secondary.center,
            )?;
            let reading = closeness(primary.position, secondary.position)?;
            trace!(
                "magnitude {:.6} angle {:.6} at {}",
                reading.magnitude,
                reading.angle,
                self.clock
            );

            let before = tracker.extremum();
            let state = tracker.observe(self.clock, reading.magnitude);
            if tracker.extremum() != before {
                debug!("candidate extremum {:.6} at {}", reading.magnitude, self.clock);
            }

            if state == ScanState::CycleComplete {
                if let Some((time, magnitude)) = tracker.extremum() {
                    let event = DetectedEvent { time, magnitude };
                    info!("cycle complete: {event}");
                    return Ok(event);
                }
            }
        }

        // Step cap exhausted: emit what we have, best-effort.
        let (time, magnitude) = tracker
            .extremum()
            .ok_or_else(|| Error::Config("step cap exhausted before any sample".into()))?;
        let event = DetectedEvent { time, magnitude };
        warn!(
            "step cap of {} reached without completion; emitting {event}",
            self.config.max_steps
        );
        Ok(event)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
