//! Scene engine for himmel
//!
//! Turns a weather observation plus sun/moon state into a deterministic
//! scene description: base day/night theme, additive overlays, particle
//! requests, and celestial-body placement. Everything in this crate is
//! pure computation with no I/O and no shared state; callers supply the
//! observation and the timestamps.

pub mod astro;
pub mod conditions;
pub mod theme;

pub use astro::{
    moon_phase, sun_position, sun_progress, CelestialPosition, MoonPhase, SkyState,
    SYNODIC_MONTH_DAYS,
};
pub use conditions::{describe_code, icon_for_code, WeatherCondition, WeatherObservation};
pub use theme::{
    resolve_theme, BaseTheme, CelestialBody, CityFlags, OneShotEffect, Overlay, ParticleKind,
    ParticleRequest, ThemeDescriptor,
};
