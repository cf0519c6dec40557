use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use locfinder_core::{Config, ResourceState, WeatherScenario};
use locfinder_session::{ResolvedLocation, Session};
use locfinder_weather::WeatherSnapshot;

#[derive(Parser, Debug)]
#[command(name = "locfinder")]
#[command(about = "Where am I, what's the weather, and what does that say about me")]
struct Cli {
    /// Config file to read instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Serve canned data instead of calling external services
    #[arg(long, global = true, default_value_t = false)]
    mock: bool,

    /// Mock weather scenario: default, sunny, rainy, snowy, thunderstorm, random
    #[arg(long, global = true)]
    scenario: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Resolve the current position to a place name
    Locate,
    /// Locate, then show current weather
    Weather,
    /// Generate a location insight
    Roast {
        /// Place to roast; defaults to the resolved city
        #[arg(long)]
        location: Option<String>,
        /// Instructions to use instead of the built-in prompt
        #[arg(long)]
        prompt: Option<String>,
    },
    /// Location, weather and insight
    All,
    /// Show the config path and validation results
    Config,
}

fn main() -> Result<ExitCode> {
    locfinder_core::init()?;
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    if let Some(Command::Config) = cli.command {
        return show_config(&config, cli.config.as_deref());
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let ok = runtime.block_on(run(&config, cli.command.unwrap_or(Command::All)))?;
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = Config::load_from(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            config.apply_env_overrides(|key| std::env::var(key).ok());
            config
        }
        None => Config::load().context("Failed to load configuration")?,
    };

    if cli.mock {
        config.mock.enabled = true;
    }
    if let Some(name) = &cli.scenario {
        config.mock.weather_scenario = name.parse::<WeatherScenario>()?;
    }

    let validation = config.validate();
    if !validation.is_valid() {
        anyhow::bail!("Invalid configuration: {}", validation.error_summary());
    }
    Ok(config)
}

fn show_config(config: &Config, explicit: Option<&Path>) -> Result<ExitCode> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => Config::config_path()?,
    };
    println!("Config file: {}", path.display());
    println!("Mock mode:   {}", if config.mock.enabled { "on" } else { "off" });

    let validation = config.validate();
    for warning in &validation.warnings {
        println!("warning: {}: {}", warning.field, warning.message);
    }
    if validation.warnings.is_empty() {
        println!("No warnings.");
    }
    Ok(ExitCode::SUCCESS)
}

/// Run `command`; false when any rendered resource failed.
async fn run(config: &Config, command: Command) -> Result<bool> {
    tracing::debug!(?command, mock = config.mock.enabled, "Running command");
    let session = Session::from_config(config)?;

    let ok = match command {
        Command::Locate => {
            let location = session.location.locate().await;
            render("Location", &location, print_location)
        }
        Command::Weather => {
            let (location, weather) = session.locate_and_fetch().await;
            let located = render("Location", &location, print_location);
            located & render("Weather", &weather, print_weather)
        }
        Command::Roast { location, prompt } => {
            let insight = session.roast(location.as_deref(), prompt.as_deref()).await;
            render("Insight", &insight, |text| println!("{}", text))
        }
        Command::All => {
            let (location, weather) = session.locate_and_fetch().await;
            let mut ok = render("Location", &location, print_location);
            ok &= render("Weather", &weather, print_weather);
            println!();
            let insight = session.roast(None, None).await;
            ok &= render("Insight", &insight, |text| println!("{}", text));
            ok
        }
        Command::Config => true,
    };
    Ok(ok)
}

fn render<T>(label: &str, state: &ResourceState<T>, show: impl FnOnce(&T)) -> bool {
    match state {
        ResourceState::Idle => {
            println!("{}: not requested", label);
            true
        }
        ResourceState::Loading => {
            println!("{}: loading...", label);
            true
        }
        ResourceState::Ready(value) => {
            show(value);
            true
        }
        ResourceState::Failed(message) => {
            eprintln!("{}: {}", label, message);
            false
        }
    }
}

fn print_location(location: &ResolvedLocation) {
    println!("Coordinates: {}", location.coordinates);
    println!(
        "City:        {}",
        location.city.as_deref().unwrap_or("(unresolved)")
    );
    println!(
        "Location:    {}",
        location.full_location.as_deref().unwrap_or("(unresolved)")
    );
}

fn print_weather(weather: &WeatherSnapshot) {
    let c = weather.classification();
    println!("{} {}", c.icon.glyph(), c.description);
    println!("Temperature:   {:.1} °C", weather.temperature_c);
    println!("Humidity:      {:.0} %", weather.humidity_pct);
    println!("Wind:          {:.1} km/h", weather.wind_speed_kmh);
    println!("Precipitation: {:.1} mm", weather.precipitation_mm);
    println!(
        "Raining: {}  Cloudy: {}  Sunny: {}",
        yes_no(c.is_raining),
        yes_no(c.is_cloudy),
        yes_no(c.is_sunny)
    );
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
