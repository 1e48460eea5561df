//! Scene theme resolution.
//!
//! [`resolve_theme`] maps one weather observation plus sky state onto a
//! [`ThemeDescriptor`]: a base day/night theme, additive overlays, particle
//! requests, one-shot effects, and cityscape flags. The mapping is a fixed
//! rule set evaluated in a fixed order, and every rule reads only the
//! raw inputs, so the result is deterministic and rule order cannot
//! leak into the output.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::astro::{sun_position, sun_progress, CelestialPosition, MoonPhase, SkyState};
use crate::conditions::{WeatherCondition, WeatherObservation};

/// Temperatures at or below this add the cold overlay, in °C.
const COLD_THRESHOLD_C: f64 = 10.0;

/// Wind speeds strictly above this add the windy overlay, in km/h.
const WINDY_THRESHOLD_KMH: f64 = 20.0;

/// Dawn/dusk overlays apply within this distance of the event.
const TWILIGHT_WINDOW_SECS: i64 = 3600;

const CLOUD_PARTICLES: u32 = 5;
const FOG_PARTICLES: u32 = 4;
const RAIN_PARTICLES: u32 = 100;
const SNOW_PARTICLES: u32 = 60;
const STAR_PARTICLES: u32 = 50;

const WINDMILL_MIN_SECS: f64 = 0.2;
const WINDMILL_MAX_SECS: f64 = 10.0;

/// Base scene theme, selected by the feed's day flag alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseTheme {
    Day,
    Night,
}

impl BaseTheme {
    pub fn label(&self) -> &'static str {
        match self {
            BaseTheme::Day => "day",
            BaseTheme::Night => "night",
        }
    }
}

/// Additive scene overlays. Any subset can be active at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Overlay {
    Cloudy,
    Fog,
    Rain,
    Snow,
    Storm,
    Dawn,
    Dusk,
    Cold,
    Windy,
}

impl Overlay {
    pub fn label(&self) -> &'static str {
        match self {
            Overlay::Cloudy => "cloudy",
            Overlay::Fog => "fog",
            Overlay::Rain => "rain",
            Overlay::Snow => "snow",
            Overlay::Storm => "storm",
            Overlay::Dawn => "dawn",
            Overlay::Dusk => "dusk",
            Overlay::Cold => "cold",
            Overlay::Windy => "windy",
        }
    }
}

/// Particle layers the renderer should spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticleKind {
    Clouds,
    Fog,
    Rain,
    Snow,
    Stars,
}

impl ParticleKind {
    pub fn label(&self) -> &'static str {
        match self {
            ParticleKind::Clouds => "clouds",
            ParticleKind::Fog => "fog",
            ParticleKind::Rain => "rain",
            ParticleKind::Snow => "snow",
            ParticleKind::Stars => "stars",
        }
    }
}

/// One particle layer with its element count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticleRequest {
    pub kind: ParticleKind,
    pub count: u32,
}

/// Transient effects the renderer plays once per refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OneShotEffect {
    LightningFlash,
    ShootingStar,
}

impl OneShotEffect {
    pub fn label(&self) -> &'static str {
        match self {
            OneShotEffect::LightningFlash => "lightning flash",
            OneShotEffect::ShootingStar => "shooting star",
        }
    }
}

/// The single body shown in the sky: sun by day, moon by night.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CelestialBody {
    Sun { position: CelestialPosition },
    Moon { phase: MoonPhase },
}

/// Cityscape accents derived from the observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CityFlags {
    /// Windows glow at night.
    pub lights_on: bool,
    /// Streets reflect after rain.
    pub wet_street: bool,
    /// Rooftops carry snow.
    pub snow_cover: bool,
    /// Skyline silhouetted against storm light.
    pub storm: bool,
}

/// Complete description of one resolved scene.
///
/// Overlays live in a [`BTreeSet`] so equal inputs produce bitwise-equal
/// descriptors, iteration order included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeDescriptor {
    pub base: BaseTheme,
    pub overlays: BTreeSet<Overlay>,
    pub celestial: CelestialBody,
    /// Celestial body opacity in `[0, 1]` after visibility attenuation.
    pub celestial_opacity: f64,
    /// Celestial body blur radius in pixels.
    pub celestial_blur_px: f64,
    pub particles: Vec<ParticleRequest>,
    pub effects: Vec<OneShotEffect>,
    pub city: CityFlags,
    /// Seconds per windmill rotation, derived from wind speed.
    pub windmill_spin_secs: f64,
}

/// Resolve the scene for one observation.
///
/// `now` is naive local time at the observed location, matching the
/// timestamps the forecast feed reports for sunrise and sunset.
pub fn resolve_theme(
    observation: &WeatherObservation,
    sky: &SkyState,
    now: NaiveDateTime,
) -> ThemeDescriptor {
    let condition = WeatherCondition::from_wmo_code(observation.code);
    let (celestial_opacity, celestial_blur_px) = visibility(condition);

    let (base, celestial) = if observation.is_day {
        let position = match (sky.sunrise, sky.sunset) {
            (Some(_), Some(_)) => sun_position(sun_progress(now, sky.sunrise, sky.sunset)),
            _ => CelestialPosition::MIDDAY,
        };
        (BaseTheme::Day, CelestialBody::Sun { position })
    } else {
        let phase = MoonPhase::from_fraction(sky.moon_phase);
        (BaseTheme::Night, CelestialBody::Moon { phase })
    };

    let mut city = CityFlags {
        lights_on: !observation.is_day,
        ..CityFlags::default()
    };

    let mut overlays = BTreeSet::new();
    if let Some(sunrise) = sky.sunrise {
        if within_twilight_window(now, sunrise) {
            overlays.insert(Overlay::Dawn);
        }
    }
    if let Some(sunset) = sky.sunset {
        if within_twilight_window(now, sunset) {
            overlays.insert(Overlay::Dusk);
        }
    }
    if observation.temperature_c <= COLD_THRESHOLD_C {
        overlays.insert(Overlay::Cold);
    }
    if observation.wind_speed_kmh > WINDY_THRESHOLD_KMH {
        overlays.insert(Overlay::Windy);
    }

    let mut particles = Vec::new();
    let mut effects = Vec::new();
    match condition {
        WeatherCondition::PartlyCloudy => {
            overlays.insert(Overlay::Cloudy);
            particles.push(ParticleRequest {
                kind: ParticleKind::Clouds,
                count: CLOUD_PARTICLES,
            });
        }
        WeatherCondition::Fog => {
            overlays.insert(Overlay::Fog);
            particles.push(ParticleRequest {
                kind: ParticleKind::Fog,
                count: FOG_PARTICLES,
            });
        }
        WeatherCondition::Rain | WeatherCondition::RainShowers => {
            overlays.insert(Overlay::Rain);
            particles.push(ParticleRequest {
                kind: ParticleKind::Rain,
                count: RAIN_PARTICLES,
            });
            city.wet_street = true;
        }
        WeatherCondition::Snow => {
            overlays.insert(Overlay::Snow);
            particles.push(ParticleRequest {
                kind: ParticleKind::Snow,
                count: SNOW_PARTICLES,
            });
            city.snow_cover = true;
        }
        WeatherCondition::Thunderstorm => {
            overlays.insert(Overlay::Storm);
            particles.push(ParticleRequest {
                kind: ParticleKind::Rain,
                count: RAIN_PARTICLES,
            });
            effects.push(OneShotEffect::LightningFlash);
            city.wet_street = true;
            city.storm = true;
        }
        WeatherCondition::Clear | WeatherCondition::Unknown => {}
    }

    // Starfield only under a clear-enough night sky: code 3 is overcast.
    let clear_night = matches!(
        condition,
        WeatherCondition::Clear | WeatherCondition::PartlyCloudy
    ) && observation.code < 3;
    if !observation.is_day && clear_night {
        particles.push(ParticleRequest {
            kind: ParticleKind::Stars,
            count: STAR_PARTICLES,
        });
        effects.push(OneShotEffect::ShootingStar);
    }

    ThemeDescriptor {
        base,
        overlays,
        celestial,
        celestial_opacity,
        celestial_blur_px,
        particles,
        effects,
        city,
        windmill_spin_secs: windmill_spin_secs(observation.wind_speed_kmh),
    }
}

/// Opacity and blur applied to the celestial body per condition category.
fn visibility(condition: WeatherCondition) -> (f64, f64) {
    match condition {
        WeatherCondition::PartlyCloudy => (0.8, 2.0),
        WeatherCondition::Fog => (0.5, 5.0),
        WeatherCondition::Rain | WeatherCondition::Snow | WeatherCondition::RainShowers => {
            (0.4, 4.0)
        }
        WeatherCondition::Thunderstorm => (0.2, 8.0),
        WeatherCondition::Clear | WeatherCondition::Unknown => (1.0, 0.0),
    }
}

fn within_twilight_window(now: NaiveDateTime, event: NaiveDateTime) -> bool {
    now.signed_duration_since(event).num_seconds().abs() < TWILIGHT_WINDOW_SECS
}

/// Seconds for one windmill rotation: inversely proportional to wind
/// speed, clamped so the blades never freeze or blur. Calm readings
/// (zero or below) spin at the one-unit rate.
fn windmill_spin_secs(wind_speed_kmh: f64) -> f64 {
    let wind = if wind_speed_kmh <= 0.0 {
        1.0
    } else {
        wind_speed_kmh
    };
    (40.0 / wind).clamp(WINDMILL_MIN_SECS, WINDMILL_MAX_SECS)
}
