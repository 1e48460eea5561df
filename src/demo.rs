//! Canned weather scenarios, rendered offline.
//!
//! Exercises the whole scene pipeline without touching the network:
//! synthetic observation and series data flow through the same resolve
//! and sampling code the live path uses.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use himmel_scene::{resolve_theme, SkyState, WeatherObservation};
use himmel_weather::{
    sample_hourly, summarize_daily, Dashboard, DailySeries, HourlySeries, Location,
};

use crate::render;

/// Fixed lunation fraction so demo nights always show a full moon.
const DEMO_MOON_PHASE: f64 = 0.5;

pub struct DemoScenario {
    pub name: &'static str,
    pub code: i32,
    pub is_day: bool,
    pub temperature_c: f64,
    pub wind_speed_kmh: f64,
    /// Pretend sunset is right now, lighting the dusk overlay.
    pub force_dusk: bool,
}

pub const SCENARIOS: &[DemoScenario] = &[
    DemoScenario {
        name: "sunny",
        code: 0,
        is_day: true,
        temperature_c: 25.0,
        wind_speed_kmh: 10.0,
        force_dusk: false,
    },
    DemoScenario {
        name: "clear-night",
        code: 0,
        is_day: false,
        temperature_c: 12.0,
        wind_speed_kmh: 5.0,
        force_dusk: false,
    },
    DemoScenario {
        name: "rain",
        code: 63,
        is_day: true,
        temperature_c: 15.0,
        wind_speed_kmh: 25.0,
        force_dusk: false,
    },
    DemoScenario {
        name: "thunderstorm",
        code: 95,
        is_day: false,
        temperature_c: 18.0,
        wind_speed_kmh: 65.0,
        force_dusk: false,
    },
    DemoScenario {
        name: "snow",
        code: 73,
        is_day: true,
        temperature_c: -2.0,
        wind_speed_kmh: 15.0,
        force_dusk: false,
    },
    DemoScenario {
        name: "fog",
        code: 45,
        is_day: true,
        temperature_c: 8.0,
        wind_speed_kmh: 2.0,
        force_dusk: false,
    },
    DemoScenario {
        name: "dusk",
        code: 0,
        is_day: true,
        temperature_c: 20.0,
        wind_speed_kmh: 5.0,
        force_dusk: true,
    },
];

/// Render one scenario by name, or all of them.
pub fn run(name: Option<&str>) -> Result<()> {
    let now_local = Local::now().naive_local();
    let now_utc = Utc::now();

    match name {
        Some(wanted) => {
            let scenario = SCENARIOS
                .iter()
                .find(|s| s.name == wanted)
                .with_context(|| {
                    let names: Vec<&str> = SCENARIOS.iter().map(|s| s.name).collect();
                    format!(
                        "Unknown scenario '{}'. Available: {}",
                        wanted,
                        names.join(", ")
                    )
                })?;
            println!(
                "{}",
                render::render_dashboard(&build_dashboard(scenario, now_local, now_utc))
            );
        }
        None => {
            for (i, scenario) in SCENARIOS.iter().enumerate() {
                if i > 0 {
                    println!("\n{}\n", "─".repeat(48));
                }
                println!(
                    "{}",
                    render::render_dashboard(&build_dashboard(scenario, now_local, now_utc))
                );
            }
        }
    }
    Ok(())
}

fn build_dashboard(
    scenario: &DemoScenario,
    now_local: NaiveDateTime,
    now_utc: DateTime<Utc>,
) -> Dashboard {
    let observation = WeatherObservation {
        code: scenario.code,
        is_day: scenario.is_day,
        temperature_c: scenario.temperature_c,
        wind_speed_kmh: scenario.wind_speed_kmh,
    };

    let today = now_local.date();
    let hourly = mock_hourly(today, scenario);
    let daily = mock_daily(today, scenario);

    let sunrise = daily.sunrise.first().copied();
    let sunset = if scenario.force_dusk {
        Some(now_local)
    } else {
        daily.sunset.first().copied()
    };
    let sky = SkyState {
        moon_phase: DEMO_MOON_PHASE,
        sunrise,
        sunset,
    };

    Dashboard {
        location: Location {
            latitude: 53.55,
            longitude: 9.99,
            place_name: None,
        },
        place: format!("Demo: {}", scenario.name),
        current: observation,
        sky,
        theme: resolve_theme(&observation, &sky, now_local),
        hourly: sample_hourly(&hourly, now_local, 3, 8),
        daily: summarize_daily(&daily, 1, 5),
        refreshed_at: now_utc,
    }
}

/// Two days of hourly data from midnight, temperature gently oscillating
/// around the scenario's value.
fn mock_hourly(today: NaiveDate, scenario: &DemoScenario) -> HourlySeries {
    let midnight = today.and_time(NaiveTime::MIN);
    let mut series = HourlySeries::default();
    for i in 0..48i64 {
        series.time.push(midnight + Duration::hours(i));
        series
            .temperature_2m
            .push(scenario.temperature_c + (i as f64 / 5.0).sin() * 3.0);
        series.weathercode.push(scenario.code);
    }
    series
}

/// Six days starting today: the scenario's weather lingers, then a varied
/// week follows so the forecast rows differ.
fn mock_daily(today: NaiveDate, scenario: &DemoScenario) -> DailySeries {
    let t = scenario.temperature_c;
    let codes = [scenario.code, scenario.code, 0, 63, 71, 95];
    let maxes = [t + 2.0, t + 1.0, 20.0, 15.0, 0.0, 25.0];
    let mins = [t - 5.0, t - 4.0, 10.0, 10.0, -5.0, 15.0];

    let mut series = DailySeries::default();
    for (i, code) in codes.into_iter().enumerate() {
        let date = today + Duration::days(i as i64);
        series.time.push(date);
        series.weathercode.push(code);
        series.temperature_2m_max.push(maxes[i]);
        series.temperature_2m_min.push(mins[i]);
        series
            .sunrise
            .push(date.and_time(NaiveTime::MIN) + Duration::hours(6));
        series
            .sunset
            .push(date.and_time(NaiveTime::MIN) + Duration::hours(20));
    }
    series
}
