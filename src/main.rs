//! rune-stack - Docker Swarm stack housekeeping
//!
//! This is the CLI entry point for rune-stack.

use clap::{Parser, Subcommand};
use rune_stack::config::StackConfig;
use rune_stack::error::{Result, StackError};
use rune_stack::swarm::Orchestrator;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// rune-stack - swarm stack removal and service health checks
#[derive(Parser)]
#[command(name = "rune-stack")]
#[command(author = "Evoker Industries")]
#[command(version)]
#[command(about = "Remove swarm stacks and check service health via the docker CLI", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Config file (defaults to <config dir>/rune-stack/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// docker binary to invoke
    #[arg(long, global = true, env = "RUNE_STACK_DOCKER")]
    docker: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage stacks
    Stack {
        #[command(subcommand)]
        command: StackCommands,
    },

    /// Check services
    Service {
        #[command(subcommand)]
        command: ServiceCommands,
    },

    /// Print the effective configuration
    Config,
}

#[derive(Subcommand)]
enum StackCommands {
    /// Remove a stack and wait for its network to go away
    #[command(name = "rm")]
    Remove {
        /// Stack name
        stack: String,
        /// Seconds between network checks
        #[arg(long)]
        poll_interval: Option<u64>,
        /// Give up after this many seconds
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// List services of a stack
    Services {
        /// Stack name
        stack: String,
    },
    /// Exit 0 if the stack network still exists, 1 otherwise
    #[command(name = "network-exists")]
    NetworkExists {
        /// Stack name
        stack: String,
    },
}

#[derive(Subcommand)]
enum ServiceCommands {
    /// Exit 0 if the service runs all desired tasks, 1 otherwise
    Replicated {
        /// Service name
        service: String,
    },
    /// Exit 0 if at least one task of the service is stable, 1 otherwise
    Running {
        /// Service name
        service: String,
        /// Seconds a task must have been running
        #[arg(long)]
        stability_window: Option<u64>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::from(2)
        }
    }
}

/// Errors exit with 2 so they never read as a negative check result
fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = StackConfig::load(cli.config.as_deref())?;
    if let Some(docker) = cli.docker {
        config = config.docker_binary(docker);
    }

    match cli.command {
        Commands::Stack { command } => match command {
            StackCommands::Remove {
                stack,
                poll_interval,
                timeout,
            } => {
                if let Some(secs) = poll_interval {
                    config = config.poll_interval(secs);
                }
                if timeout.is_some() {
                    config = config.removal_timeout(timeout);
                }
                config.validate()?;

                Orchestrator::from_config(&config).remove_stack(&stack)?;
                println!("Removed stack {}", stack);
            }
            StackCommands::Services { stack } => {
                config.validate()?;
                for service in Orchestrator::from_config(&config).list_stack_services(&stack)? {
                    println!("{}", service);
                }
            }
            StackCommands::NetworkExists { stack } => {
                config.validate()?;
                let exists = Orchestrator::from_config(&config).stack_network_exists(&stack)?;
                println!("{}", if exists { "present" } else { "absent" });
                return Ok(status(exists));
            }
        },

        Commands::Service { command } => match command {
            ServiceCommands::Replicated { service } => {
                config.validate()?;
                let replication = Orchestrator::from_config(&config).replication(&service)?;
                println!(
                    "{}: {}/{} tasks running",
                    service, replication.running, replication.desired
                );
                return Ok(status(replication.is_complete()));
            }
            ServiceCommands::Running {
                service,
                stability_window,
            } => {
                if let Some(secs) = stability_window {
                    config = config.stability_window(secs);
                }
                config.validate()?;

                let running = Orchestrator::from_config(&config).is_service_running(&service)?;
                println!(
                    "{}: {}",
                    service,
                    if running { "running" } else { "not running" }
                );
                return Ok(status(running));
            }
        },

        Commands::Config => {
            let yaml = serde_yaml::to_string(&config)
                .map_err(|e| StackError::Yaml(format!("Failed to render config: {}", e)))?;
            print!("{}", yaml);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn status(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
