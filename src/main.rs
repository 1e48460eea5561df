mod args;
mod demo;
mod render;

use std::time::Duration;

use chrono::{Local, Utc};

use himmel_core::{AppError, Config};
use himmel_weather::{DashboardService, Location, ServiceOptions};

use args::{CliAction, ParsedArgs};

#[tokio::main]
async fn main() {
    let parsed = ParsedArgs::parse(std::env::args());

    match parsed.action {
        CliAction::ShowHelp => args::print_help(),
        CliAction::ShowVersion => args::print_version(),
        CliAction::ShowHelpDueToError => {
            args::print_help();
            std::process::exit(2);
        }
        CliAction::Demo { scenario } => {
            init_or_exit();
            if let Err(e) = demo::run(scenario.as_deref()) {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        }
        CliAction::Run { once } => {
            init_or_exit();
            if let Err(e) = run(once).await {
                tracing::error!("Fatal: {}", e);
                eprintln!("{}", e.user_message());
                std::process::exit(1);
            }
        }
    }
}

fn init_or_exit() {
    if let Err(e) = himmel_core::init() {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }
}

async fn run(once: bool) -> Result<(), AppError> {
    let (config, _validation) = Config::load_validated()
        .map_err(|e| AppError::Config(format!("{:#}", e)))?;

    let service = DashboardService::new(service_options(&config))?;
    tracing::info!("himmel started");

    // refresh_minutes 0 means fetch once, whatever the flags say.
    let once = once || config.weather.refresh_minutes == 0;
    let interval = Duration::from_secs(u64::from(config.weather.refresh_minutes.max(1)) * 60);

    loop {
        match service
            .refresh(Local::now().naive_local(), Utc::now())
            .await
        {
            Ok(dashboard) => println!("{}", render::render_dashboard(&dashboard)),
            Err(e) => {
                tracing::error!("Refresh failed: {}", e);
                if once {
                    return Err(e.into());
                }
                eprintln!("{}", e.user_message());
            }
        }

        if once {
            return Ok(());
        }
        tokio::time::sleep(interval).await;
    }
}

fn service_options(config: &Config) -> ServiceOptions {
    let fixed_location = match (config.location.latitude, config.location.longitude) {
        (Some(latitude), Some(longitude)) => Some(Location {
            latitude,
            longitude,
            place_name: config.location.place_name.clone(),
        }),
        _ => None,
    };

    ServiceOptions {
        weather_base_url: config.weather.weather_api_url.clone(),
        geocode_base_url: config.weather.geocode_api_url.clone(),
        locate_base_url: config.weather.locate_api_url.clone(),
        fixed_location,
        hourly_step_hours: config.scene.hourly_step_hours,
        hourly_points: config.scene.hourly_points,
        forecast_days: config.scene.forecast_days,
    }
}
