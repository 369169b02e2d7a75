mod commands;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use cache::{RedisClient, RedisConfig};
use clap::Parser;
use common_log::config::LogConfig;
use distributed_lock::{DistributedLockError, Lock, LockOptions, LockStore};
use env_config_parse::YamlValue;
use log::{error, info};

use crate::commands::LockCommands;

const EXIT_UNAVAILABLE: u8 = 2;
const EXIT_LOCK_LOST: u8 = 3;

#[derive(Parser)]
#[clap(author, version, about = "Redis distributed lock tool", long_about = None)]
struct Cli {
    /// YAML file with `redis` and `lock` sections
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Redis URL, overrides the config file and REDIS_URL
    #[clap(long)]
    redis_url: Option<String>,

    /// Logging configuration file; logs go to the console when omitted
    #[clap(long)]
    log_config: Option<PathBuf>,

    #[clap(subcommand)]
    command: LockCommands,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = init_logging(cli.log_config.as_deref()) {
        eprintln!("Failed to initialize logger: {}", e);
    }
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(path) => common_log::init_with_yaml(path),
        None => common_log::init_with_config(LogConfig { output_dir: None, loggers: Vec::new() }),
    }
}

fn redis_config(cli: &Cli, yaml: Option<&YamlValue>) -> Result<RedisConfig, Box<dyn std::error::Error>> {
    if let Some(url) = &cli.redis_url {
        return Ok(RedisConfig::new(url.clone()));
    }
    match yaml {
        Some(yaml) if yaml.lookup("redis.url").is_some() => Ok(RedisConfig::from_yaml(yaml)?),
        _ => Ok(RedisConfig::from_env()?),
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let yaml = cli.config.as_ref().map(YamlValue::from_file).transpose()?;
    let client = RedisClient::connect(redis_config(&cli, yaml.as_ref())?)?;

    match cli.command {
        LockCommands::Ping => {
            println!("PONG");
            Ok(ExitCode::SUCCESS)
        }
        LockCommands::Run { key, policy, hold_ms } => {
            let base = yaml.as_ref().map(LockOptions::from_yaml).unwrap_or_default();
            let lock = Lock::new(Arc::new(client), key, policy.apply(base))?;
            run_critical_section(&lock, Duration::from_millis(hold_ms))
        }
        LockCommands::Ttl { key } => {
            match LockStore::pttl(&client, &key)? {
                Some(remaining) => println!("{} ms", remaining.as_millis()),
                None => println!("{} is not locked", key),
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run_critical_section(lock: &Lock, hold: Duration) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let guard = match lock.acquire_guard() {
        Ok(guard) => guard,
        Err(e @ DistributedLockError::LockUnavailable { .. }) => {
            eprintln!("{}", e);
            return Ok(ExitCode::from(EXIT_UNAVAILABLE));
        }
        Err(e) => return Err(e.into()),
    };
    println!("acquired {} as {}", lock.key(), lock.token());
    info!("Holding lock {} for {:?}", lock.key(), hold);
    thread::sleep(hold);

    match guard.release() {
        Ok(()) => {
            println!("released {}", lock.key());
            Ok(ExitCode::SUCCESS)
        }
        Err(e @ DistributedLockError::LockNotHeld { .. }) => {
            error!("{}; the hold outlived the lease", e);
            eprintln!("{}", e);
            Ok(ExitCode::from(EXIT_LOCK_LOST))
        }
        Err(e) => Err(e.into()),
    }
}
