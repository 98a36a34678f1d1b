//! Atlas CLI Client
//!
//! Command-line interface for issuing single commands through the client.

use atlas_client::{Client, ClientError, Config, Version};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

/// Atlas CLI
#[derive(Parser, Debug)]
#[command(name = "atlas-cli")]
#[command(about = "CLI for Redis-compatible key-value servers")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:6379")]
    server: String,

    /// Database index
    #[arg(short = 'n', long, default_value = "0")]
    db: u32,

    /// Assume this server version instead of asking the server
    #[arg(long)]
    server_version: Option<Version>,

    /// Send the command with queue-jump priority
    #[arg(long)]
    priority: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Increment a counter
    Incr {
        key: String,

        /// Amount to add
        #[arg(default_value = "1", allow_hyphen_values = true)]
        by: i64,
    },

    /// Decrement a counter
    Decr {
        key: String,

        /// Amount to subtract
        #[arg(default_value = "1", allow_hyphen_values = true)]
        by: i64,
    },

    /// Delete keys
    Del {
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Get several keys at once
    Mget {
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Set several pairs at once: KEY VALUE [KEY VALUE ...]
    Mset {
        #[arg(required = true)]
        pairs: Vec<String>,
    },

    /// Show server information
    Info {
        section: Option<String>,
    },

    /// Ping the server
    Ping,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,atlas_client=info"));

    fmt().with_env_filter(filter).with_target(false).init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("(error) {}", e);
        // Distinguish a lost server from a rejected command
        std::process::exit(if e.is_connectivity() { 2 } else { 1 });
    }
}

fn run(args: Args) -> Result<(), ClientError> {
    let mut builder = Config::builder().server_addr(&args.server).default_db(args.db);
    if let Some(version) = args.server_version {
        builder = builder.server_version(version);
    }
    let config = builder.build();

    let client = Client::connect(&config)?;
    let db = config.default_db;
    let priority = args.priority;

    match args.command {
        Commands::Get { key } => print_text(client.get_string(db, key, priority).wait()?),
        Commands::Set { key, value } => {
            client.set(db, key, value, priority).wait()?;
            println!("OK");
        }
        Commands::Incr { key, by } => {
            println!("(integer) {}", client.increment(db, key, by, priority).wait()?)
        }
        Commands::Decr { key, by } => {
            println!("(integer) {}", client.decrement(db, key, by, priority).wait()?)
        }
        Commands::Del { keys } => println!("(integer) {}", client.del(db, keys, priority).wait()?),
        Commands::Mget { keys } => {
            let values = client.mget_strings(db, keys, priority).wait()?;
            for (i, value) in values.into_iter().enumerate() {
                print!("{}) ", i + 1);
                print_text(value);
            }
        }
        Commands::Mset { pairs } => {
            if pairs.len() % 2 != 0 {
                return Err(ClientError::InvalidArgument(
                    "MSET takes KEY VALUE pairs".to_string(),
                ));
            }
            let pairs: Vec<(String, String)> = pairs
                .chunks(2)
                .map(|pair| (pair[0].clone(), pair[1].clone()))
                .collect();
            client.mset(db, pairs, priority).wait()?;
            println!("OK");
        }
        Commands::Info { section } => {
            print_text(client.info(db, section.as_deref(), priority).wait()?)
        }
        Commands::Ping => print_text(client.ping(db, priority).wait()?),
    }

    Ok(())
}

fn print_text(value: Option<String>) {
    match value {
        Some(text) => println!("{}", text),
        None => println!("(nil)"),
    }
}
