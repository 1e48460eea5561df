//! Terminal presentation for a resolved dashboard.
//!
//! Pure string building so every layout decision is testable; printing
//! stays in main.

use himmel_scene::{describe_code, icon_for_code, CelestialBody, ThemeDescriptor};
use himmel_weather::{normalize_range, Dashboard};

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

pub fn render_dashboard(dashboard: &Dashboard) -> String {
    let mut lines = Vec::new();
    let current = &dashboard.current;

    lines.push(dashboard.place.clone());
    lines.push(format!(
        "  {} · {:.0}°C · wind {:.0} km/h · {}",
        describe_code(current.code),
        current.temperature_c,
        current.wind_speed_kmh,
        icon_for_code(current.code)
    ));
    lines.push(String::new());
    lines.extend(scene_lines(&dashboard.theme));

    if !dashboard.hourly.is_empty() {
        let temperatures: Vec<f64> = dashboard.hourly.iter().map(|s| s.temperature).collect();
        lines.push(String::new());
        lines.push(format!("Next hours  {}", temperature_bar(&temperatures)));
        for sample in &dashboard.hourly {
            lines.push(format!(
                "  {}  {:>4.0}°C  {}",
                sample.time.format("%H:%M"),
                sample.temperature,
                icon_for_code(sample.code)
            ));
        }
    }

    if !dashboard.daily.is_empty() {
        lines.push(String::new());
        lines.push("Forecast".to_string());
        for day in &dashboard.daily {
            lines.push(format!(
                "  {}  {:>4.0}° / {:>4.0}°  {}",
                day.date.format("%a %d %b"),
                day.temp_max,
                day.temp_min,
                describe_code(day.code)
            ));
        }
    }

    lines.join("\n")
}

fn scene_lines(theme: &ThemeDescriptor) -> Vec<String> {
    let mut lines = Vec::new();

    let mut headline = format!("Scene  {}", theme.base.label());
    if !theme.overlays.is_empty() {
        let overlays: Vec<&str> = theme.overlays.iter().map(|o| o.label()).collect();
        headline.push_str(" · ");
        headline.push_str(&overlays.join(", "));
    }
    lines.push(headline);

    let body = match &theme.celestial {
        CelestialBody::Sun { position } => format!(
            "sun at {:.0}% across, {:.0}% up",
            position.left_pct, position.bottom_pct
        ),
        CelestialBody::Moon { phase } => format!("moon {} {}", phase.glyph(), phase.name()),
    };
    lines.push(format!(
        "  {} · opacity {:.1} · blur {:.0}px",
        body, theme.celestial_opacity, theme.celestial_blur_px
    ));

    if !theme.particles.is_empty() {
        let particles: Vec<String> = theme
            .particles
            .iter()
            .map(|p| format!("{} ×{}", p.kind.label(), p.count))
            .collect();
        lines.push(format!("  particles {}", particles.join(", ")));
    }
    if !theme.effects.is_empty() {
        let effects: Vec<&str> = theme.effects.iter().map(|e| e.label()).collect();
        lines.push(format!("  effects {}", effects.join(", ")));
    }

    let mut city = Vec::new();
    if theme.city.lights_on {
        city.push("lights on");
    }
    if theme.city.wet_street {
        city.push("wet streets");
    }
    if theme.city.snow_cover {
        city.push("snow cover");
    }
    if theme.city.storm {
        city.push("storm skyline");
    }
    if !city.is_empty() {
        lines.push(format!("  city {}", city.join(", ")));
    }

    lines.push(format!(
        "  windmill one turn every {:.1}s",
        theme.windmill_spin_secs
    ));
    lines
}

/// One glyph per value, scaled into the sequence's own range.
fn temperature_bar(values: &[f64]) -> String {
    let range = match normalize_range(values) {
        Some(range) => range,
        None => return String::new(),
    };
    values
        .iter()
        .map(|&value| {
            let idx = (range.position(value) * (BARS.len() - 1) as f64).round() as usize;
            BARS[idx.min(BARS.len() - 1)]
        })
        .collect()
}
