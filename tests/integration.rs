use chrono::DateTime;
use qtty::{Days, Second, Seconds};
use syzygy::{
    delta_t_lerp, Body, BodyPair, EphemerisError, EphemerisSource, ExtremumScanner, JulianDate,
    ScanConfig, StateVector, Time, UniversalTime, JD,
};

/// Two directions sweeping apart at a synodic rate, anti-aligned at `t_min`.
struct SweepSource {
    t_min: JulianDate,
    period_days: f64,
}

impl EphemerisSource for SweepSource {
    fn state(
        &mut self,
        jd: JulianDate,
        target: Body,
        _center: Body,
    ) -> Result<StateVector, EphemerisError> {
        let position = if target == Body::Moon {
            let theta = std::f64::consts::PI
                + 2.0 * std::f64::consts::PI * (jd - self.t_min).value() / self.period_days;
            // Realistic magnitudes: the metric must not care (≈ 0.0026 AU).
            [0.002_57 * theta.cos(), 0.002_57 * theta.sin(), 0.000_1]
        } else {
            [1.016, 0.0, 0.000_2]
        };
        Ok(StateVector {
            position,
            velocity: [0.0; 3],
        })
    }
}

#[test]
fn civil_j2000_noon_matches_documented_epoch_constant() {
    // 2000-01-01T12:00:00Z = unix 946 728 000 s → JD 2451545.0 + 27/86400.
    let jd = JulianDate::from_unix_seconds(946_728_000);
    assert!(
        (jd.quantity() - Days::new(2_451_545.000_312_5)).abs() < Days::new(5e-7),
        "JD = {jd}"
    );
    assert!(format!("{jd}").starts_with("Julian Day: 2451545.000"));
}

#[test]
fn utc_roundtrip_j2000_is_stable() {
    let datetime = DateTime::from_timestamp(946_728_000, 0).unwrap();
    let jd = JulianDate::from_utc(datetime);
    let back = jd.to_utc().expect("to_utc");
    let delta_ns = back.timestamp_nanos_opt().unwrap() - datetime.timestamp_nanos_opt().unwrap();
    assert!(delta_ns.abs() < 1_000);
}

#[test]
fn ut_mode_applies_tabulated_delta_t_on_top_of_the_core_conversion() {
    let core = JulianDate::from_unix_seconds(946_728_000);
    let corrected: JulianDate = UniversalTime::from_unix_seconds(946_728_000).to::<JD>();
    let fold = (corrected - core).to::<Second>();
    assert!((fold - Seconds::new(63.83)).abs() < Seconds::new(0.01));

    // The raw table agrees with the fold.
    assert!((delta_t_lerp(2000.0) - Seconds::new(63.83)).abs() < Seconds::new(1e-9));
}

#[test]
fn scanner_tracks_a_civil_started_clock_to_the_synthetic_minimum() {
    let start = JulianDate::from_unix_seconds(946_728_000);
    let t_min = start + Days::new(11.25);
    let source = SweepSource {
        t_min,
        period_days: 29.530_589,
    };

    let mut scanner = ExtremumScanner::new(source, start, ScanConfig::default()).unwrap();
    let event = scanner.run_cycle().expect("one cycle");

    assert!(
        (event.time - t_min).abs() < Days::new(1.0 / 1_440.0),
        "event at {}, analytic minimum at {}",
        event.time,
        t_min
    );
    assert!(event.magnitude < 0.01);
    // The event is still on the civil axis the clock started from.
    let civil = event.time.to_utc().expect("civil timestamp");
    let start_civil = DateTime::from_timestamp(946_728_000, 0).unwrap();
    let elapsed = civil - start_civil;
    assert!((elapsed.num_days() - 11).abs() <= 1);
}

#[test]
fn custom_body_pairs_reach_the_source() {
    struct PairAsserting;
    impl EphemerisSource for PairAsserting {
        fn state(
            &mut self,
            _jd: JulianDate,
            target: Body,
            center: Body,
        ) -> Result<StateVector, EphemerisError> {
            match (target, center) {
                (Body::Venus, Body::Earth) => Ok(StateVector {
                    position: [1.0, 0.0, 0.0],
                    velocity: [0.0; 3],
                }),
                (Body::Venus, Body::Sun) => Ok(StateVector {
                    position: [0.0, 1.0, 0.0],
                    velocity: [0.0; 3],
                }),
                _ => Err(EphemerisError::InvalidBodyPair { target, center }),
            }
        }
    }

    let mut config = ScanConfig::default();
    config.primary = BodyPair {
        target: Body::Venus,
        center: Body::Earth,
    };
    config.secondary = BodyPair {
        target: Body::Venus,
        center: Body::Sun,
    };
    config.max_steps = 10;

    let mut scanner =
        ExtremumScanner::new(PairAsserting, Time::<JD>::new(2_451_545.0), config).unwrap();
    // Constant orthogonal directions: capped best-effort event, no error.
    let event = scanner.run_cycle().expect("capped cycle");
    assert!((event.magnitude - std::f64::consts::SQRT_2).abs() < 1e-12);
}

#[cfg(feature = "serde")]
#[test]
fn serde_event_roundtrips_time_as_bare_day_count() {
    use syzygy::DetectedEvent;

    let event = DetectedEvent {
        time: Time::<JD>::new(2_451_556.25),
        magnitude: 0.004_2,
    };
    let json = serde_json::to_string(&event).unwrap();
    assert!(json.contains("2451556.25"));
    let back: DetectedEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(back, event);
}
