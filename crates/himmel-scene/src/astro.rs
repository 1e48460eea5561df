//! Sun and moon state derived from wall-clock time.
//!
//! The approximations here are tuned for scene plausibility, not for
//! ephemeris accuracy: the moon phase is elapsed time since a reference
//! new moon divided by the mean synodic month, and the sun path is a
//! decorative arc across the scene, not a solar elevation model.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Mean length of the synodic month (new moon to new moon), in days.
pub const SYNODIC_MONTH_DAYS: f64 = 29.530_588_67;

/// Reference new moon, 2000-01-06T18:14:00Z, as Unix milliseconds.
const NEW_MOON_EPOCH_MS: i64 = 947_182_440_000;

const MS_PER_DAY: f64 = 86_400_000.0;

/// Half-width of the window in which a computed fraction counts as an
/// exact quarter phase. Roughly seven hours of the lunar cycle.
const PHASE_EPSILON: f64 = 0.01;

/// Fraction of the current lunation at `at`, in `[0, 1)`.
///
/// 0.0 is new moon, 0.5 is full moon. Pure function of the instant, so
/// dates before the reference epoch work too.
pub fn moon_phase(at: DateTime<Utc>) -> f64 {
    let elapsed_ms = at.timestamp_millis() - NEW_MOON_EPOCH_MS;
    let days = elapsed_ms as f64 / MS_PER_DAY;
    (days / SYNODIC_MONTH_DAYS).rem_euclid(1.0)
}

/// The eight canonical moon phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoonPhase {
    New,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    Full,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl MoonPhase {
    /// Map a lunation fraction from [`moon_phase`] onto a named phase.
    ///
    /// The four quarter phases each own a `PHASE_EPSILON` window around
    /// their nominal fraction; exact float comparison would make them
    /// unreachable from computed values.
    pub fn from_fraction(phase: f64) -> Self {
        let near = |target: f64| (phase - target).abs() < PHASE_EPSILON;
        if near(0.0) || near(1.0) {
            MoonPhase::New
        } else if near(0.25) {
            MoonPhase::FirstQuarter
        } else if near(0.5) {
            MoonPhase::Full
        } else if near(0.75) {
            MoonPhase::LastQuarter
        } else if phase < 0.25 {
            MoonPhase::WaxingCrescent
        } else if phase < 0.5 {
            MoonPhase::WaxingGibbous
        } else if phase < 0.75 {
            MoonPhase::WaningGibbous
        } else {
            MoonPhase::WaningCrescent
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            MoonPhase::New => "🌑",
            MoonPhase::WaxingCrescent => "🌒",
            MoonPhase::FirstQuarter => "🌓",
            MoonPhase::WaxingGibbous => "🌔",
            MoonPhase::Full => "🌕",
            MoonPhase::WaningGibbous => "🌖",
            MoonPhase::LastQuarter => "🌗",
            MoonPhase::WaningCrescent => "🌘",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MoonPhase::New => "New moon",
            MoonPhase::WaxingCrescent => "Waxing crescent",
            MoonPhase::FirstQuarter => "First quarter",
            MoonPhase::WaxingGibbous => "Waxing gibbous",
            MoonPhase::Full => "Full moon",
            MoonPhase::WaningGibbous => "Waning gibbous",
            MoonPhase::LastQuarter => "Last quarter",
            MoonPhase::WaningCrescent => "Waning crescent",
        }
    }
}

/// How far the day has progressed between sunrise and sunset, in `[0, 1]`.
///
/// Returns the neutral 0.0 when either bound is missing or the span is
/// degenerate (sunset at or before sunrise), so callers always get a
/// renderable value.
pub fn sun_progress(
    now: NaiveDateTime,
    sunrise: Option<NaiveDateTime>,
    sunset: Option<NaiveDateTime>,
) -> f64 {
    let (sunrise, sunset) = match (sunrise, sunset) {
        (Some(sunrise), Some(sunset)) => (sunrise, sunset),
        _ => return 0.0,
    };
    let total = sunset.signed_duration_since(sunrise).num_seconds();
    if total <= 0 {
        return 0.0;
    }
    let elapsed = now.signed_duration_since(sunrise).num_seconds();
    (elapsed as f64 / total as f64).clamp(0.0, 1.0)
}

/// Placement of a celestial body in the scene, in percent of the viewport.
///
/// `left_pct` grows rightwards, `bottom_pct` grows upwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CelestialPosition {
    pub left_pct: f64,
    pub bottom_pct: f64,
}

impl CelestialPosition {
    /// Apex of the arc; used when sunrise/sunset are unknown.
    pub const MIDDAY: CelestialPosition = CelestialPosition {
        left_pct: 50.0,
        bottom_pct: 80.0,
    };
}

/// Place the sun on its arc for a day progress in `[0, 1]`.
///
/// Horizontal travel is linear from 10% to 90%; vertical travel follows a
/// half sine from 20% up to 80% and back.
pub fn sun_position(progress: f64) -> CelestialPosition {
    let progress = progress.clamp(0.0, 1.0);
    CelestialPosition {
        left_pct: 10.0 + 80.0 * progress,
        bottom_pct: 20.0 + 60.0 * (progress * std::f64::consts::PI).sin(),
    }
}

/// Astronomical inputs for one observation instant.
///
/// Sunrise and sunset are naive local times as reported by the forecast
/// feed for the observed location; either may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkyState {
    pub moon_phase: f64,
    pub sunrise: Option<NaiveDateTime>,
    pub sunset: Option<NaiveDateTime>,
}

impl SkyState {
    /// Derive the sky state for an observation instant.
    pub fn observe(
        now_utc: DateTime<Utc>,
        sunrise: Option<NaiveDateTime>,
        sunset: Option<NaiveDateTime>,
    ) -> Self {
        SkyState {
            moon_phase: moon_phase(now_utc),
            sunrise,
            sunset,
        }
    }
}
