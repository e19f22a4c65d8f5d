//! Kafka Client Configuration CLI
//!
//! Loads a client configuration, runs the full builder wiring and prints the
//! property sets each client role would be created with.

use clap::{Parser, ValueEnum};
use tracing::{info, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use kafka_clients_core::config::LoggingConfig;
use kafka_clients_core::librdkafka;
use kafka_clients_core::{
    ClientContext, ClientFactories, ClientRole, ClientsConfig, FamilyKey,
};

/// Resolve Kafka client configurations for a security setup.
#[derive(Parser)]
#[command(name = "kafka-clients")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file.
    #[arg(short, long, default_value = "clients.yaml")]
    config: String,

    /// Configuration file format.
    #[arg(long, value_enum, default_value_t = ConfigFormat::Yaml)]
    format: ConfigFormat,

    /// Builder family to print.
    #[arg(long, default_value = "primary", value_parser = parse_family)]
    family: FamilyKey,

    /// Client role to print.
    #[arg(long, value_enum, default_value_t = RoleArg::All)]
    role: RoleArg,

    /// Session identifier used for client attribution.
    #[arg(long)]
    session: Option<String>,

    /// Print passwords and JAAS configs instead of masking them.
    #[arg(long)]
    show_secrets: bool,

    /// Print librdkafka key names instead of the Java client's.
    #[arg(long)]
    librdkafka: bool,

    /// Increase logging verbosity (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum ConfigFormat {
    /// YAML document.
    Yaml,
    /// Flat `kafka.*` catalog properties.
    Properties,
}

#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    Producer,
    Consumer,
    Admin,
    All,
}

impl RoleArg {
    fn roles(self) -> Vec<ClientRole> {
        match self {
            Self::Producer => vec![ClientRole::Producer],
            Self::Consumer => vec![ClientRole::Consumer],
            Self::Admin => vec![ClientRole::Admin],
            Self::All => ClientRole::ALL.to_vec(),
        }
    }
}

fn parse_family(value: &str) -> Result<FamilyKey, String> {
    value.parse()
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = match args.format {
        ConfigFormat::Yaml => ClientsConfig::from_file(&args.config)?,
        ConfigFormat::Properties => ClientsConfig::from_properties_file(&args.config)?,
    };

    // Override log level from verbosity flag
    let log_config = match args.verbose {
        0 => config.logging.clone(),
        1 => LoggingConfig {
            level: "debug".to_string(),
            ..config.logging.clone()
        },
        _ => LoggingConfig {
            level: "trace".to_string(),
            ..config.logging.clone()
        },
    };

    // Setup tracing
    setup_tracing(&log_config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %args.config,
        protocol = %config.security.security_protocol,
        nodes = config.kafka.nodes.len(),
        "resolving kafka client configurations"
    );

    let factories = ClientFactories::from_config(&config)?;
    let family = factories.family(args.family);
    let context = args
        .session
        .as_deref()
        .map(ClientContext::new)
        .unwrap_or_default();

    for role in args.role.roles() {
        let mut properties = family.builder(role).configure(&context);
        if args.librdkafka {
            properties = librdkafka::translate(&properties)?;
        }
        let properties = if args.show_secrets {
            properties
        } else {
            properties.redacted()
        };
        println!("# {} {role} ({})", args.family, family.protocol());
        print!("{properties}");
        println!();
    }

    Ok(())
}

fn setup_tracing(config: &LoggingConfig) {
    let level = match config.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    // Logs go to stderr so stdout carries only the resolved properties.
    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}
