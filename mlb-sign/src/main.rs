use clap::Parser;
use led_panel_sim::{DisplaySink, SimPanel};
use log::*;
#[cfg(debug_assertions)]
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::{
    append::rolling_file::{
        RollingFileAppender,
        policy::compound::{
            CompoundPolicy, roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger,
        },
    },
    config::{Appender, Config as LogConfig, Logger, Root},
    encode::pattern::PatternEncoder,
};
use sign_common::{
    cache::CacheStore,
    config::{self, Config},
    data_source::DataSource,
    signapi::SignApiClient,
};
use std::{error::Error, path::PathBuf};

mod driver;
mod serial_sink;

use driver::Driver;
use serial_sink::SerialPanel;

const APP_NAME: &str = "mlb-sign";

/// Crates whose log output follows the verbosity flags. Everything else only logs errors.
const LOG_TARGETS: [&str; 5] = [
    "mlb_sign",
    "sign_common",
    "matrix_drawing",
    "led_panel_sim",
    "fonts",
];

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[clap(long, short, action(clap::ArgAction::Count))]
    /// Increase the log verbosity
    verbose: u8,

    #[clap(long, short)]
    /// Config file to use instead of the platform default
    config: Option<PathBuf>,

    #[clap(long, default_missing_value = "/dev/ttyUSB0", num_args = 0..=1)]
    /// Serial port of the panel controller, overrides the config file
    serial_port: Option<String>,

    #[clap(long)]
    /// Baud rate for the serial port, overrides the config file
    baud_rate: Option<u32>,

    #[clap(long)]
    /// Request slides for this date (YYYY-MM-DD) instead of today
    date: Option<String>,

    #[clap(long)]
    /// Directory within which log files will be placed, default is platform dependent
    log_location: Option<PathBuf>,

    #[clap(long, default_value = "5000000")]
    /// Max size in bytes that a log file is allowed to reach before being rolled over
    log_max_file_size: u64,

    #[clap(long, default_value = "3")]
    /// Number of archived logs to keep
    num_old_logs: u32,
}

fn init_logging(args: &Cli) -> Result<(), Box<dyn Error>> {
    let log_level = match args.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let log_base_path = match &args.log_location {
        Some(path) => path.clone(),
        None => {
            let mut path = directories::BaseDirs::new()
                .ok_or("Could not find a directory to store logs")?
                .data_local_dir()
                .to_path_buf();
            path.push("mlb-sign-logs");
            path
        }
    };
    let mut log_path = log_base_path.clone();
    let mut archived_log_path = log_base_path;
    log_path.push(format!("{APP_NAME}-log.txt"));
    archived_log_path.push(format!("{APP_NAME}-log-{{}}.txt.gz"));

    #[cfg(debug_assertions)]
    println!("Log path: {}", log_path.display());

    // Only log to the console in debug mode
    #[cfg(debug_assertions)]
    let console = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("[{d} {h({l:5})} {M}] {m}{n}")))
        .build();

    let roller = FixedWindowRoller::builder().build(
        archived_log_path
            .to_str()
            .ok_or("Log location is not valid UTF-8")?,
        args.num_old_logs,
    )?;
    let file_policy = CompoundPolicy::new(
        Box::new(SizeTrigger::new(args.log_max_file_size)),
        Box::new(roller),
    );
    let file_appender = RollingFileAppender::builder()
        .append(true)
        .encoder(Box::new(PatternEncoder::new("[{d} {l:5} {M}] {m}{n}")))
        .build(log_path, Box::new(file_policy))?;

    let root = Root::builder().appender("file_appender");
    #[cfg(debug_assertions)]
    let root = root.appender("console");
    let root = root.build(LevelFilter::Error);

    let log_config = LogConfig::builder()
        .appender(Appender::builder().build("file_appender", Box::new(file_appender)));

    #[cfg(debug_assertions)]
    let log_config = log_config.appender(Appender::builder().build("console", Box::new(console)));

    let log_config = LOG_TARGETS
        .iter()
        .fold(log_config, |c, target| {
            c.logger(Logger::builder().build(*target, log_level))
        })
        .build(root)?;

    log4rs::init_config(log_config)?;
    log_panics::init();
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<Config, Box<dyn Error>> {
    let loaded = match path {
        Some(path) => {
            info!("Reading config file from {path:?}");
            confy::load_path(path)
        }
        None => {
            info!(
                "Reading config file from {:?}",
                confy::get_configuration_file_path(APP_NAME, None)?
            );
            confy::load(APP_NAME, None)
        }
    };

    let config = match loaded {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file, overwriting with default. Error: {e}");
            let config = Config::default();
            match path {
                Some(path) => confy::store_path(path, &config)?,
                None => confy::store(APP_NAME, None, &config)?,
            }
            config
        }
    };
    Ok(config)
}

/// Uses the serial panel when its port can be opened, the simulated panel otherwise.
fn select_sink(display: &config::Display) -> Box<dyn DisplaySink> {
    if let Some(port) = &display.serial_port {
        match SerialPanel::open(port, display.baud_rate, display.width, display.height) {
            Ok(panel) => {
                info!("Hardware panel: serial port {port}");
                return Box::new(panel);
            }
            Err(e) => warn!("Could not open serial port {port}, falling back to simulation: {e}"),
        }
    }

    info!("Hardware panel: none, frames are logged at debug level");
    Box::new(SimPanel::new(display.width, display.height))
}

async fn run(config: Config) -> Result<(), Box<dyn Error>> {
    let client = SignApiClient::from_config(&config.api)?;
    let cache = CacheStore::new(config.cache_file.clone());
    let data = DataSource::new(client, cache, config.api.refresh_interval());

    // The serial stream needs the runtime's reactor, so the sink is opened inside it.
    let sink = select_sink(&config.display);

    Driver::new(data, sink, &config)
        .run(tokio::signal::ctrl_c())
        .await;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();
    init_logging(&args)?;

    info!("Starting MLB sign");

    let mut config = load_config(args.config.as_ref())?;
    config.apply_env_overrides();
    if let Some(port) = args.serial_port {
        config.display.serial_port = Some(port);
    }
    if let Some(baud_rate) = args.baud_rate {
        config.display.baud_rate = baud_rate;
    }
    if args.date.is_some() {
        config.api.date = args.date;
    }

    if let Ok(offset) = time::UtcOffset::current_local_offset() {
        let configured = config.schedule.timezone;
        if offset != configured.offset_at(time::OffsetDateTime::now_utc()) {
            warn!(
                "The timezone in the config file ({configured}) does not match the detected \
                 system offset ({offset}). The config timezone will be used."
            );
        }
    }

    info!("  API URL: {}", config.api.base_url);
    info!("  Timezone: {}", config.schedule.timezone);
    info!(
        "  Display: {}x{}, brightness {}%",
        config.display.width, config.display.height, config.display.brightness
    );
    info!(
        "  Rotation every {}s, refresh every {}s",
        config.display.rotation_interval_secs, config.api.refresh_interval_secs
    );

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(run(config))
}
