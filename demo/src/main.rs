//! VolunteerFlow access-control demo CLI.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- matrix
//!   cargo run -p demo -- scenarios
//!   cargo run -p demo -- check-config config/development.toml

mod scenarios;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use volunteerflow_contracts::{capability::Capability, error::FlowResult, role::Role};
use volunteerflow_rbac::PermissionTable;
use volunteerflow_server::AppConfig;

// ── CLI definition ────────────────────────────────────────────────────────────

/// VolunteerFlow role-based access control demo.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "VolunteerFlow access-control demo",
    long_about = "Prints the role-permission matrix and runs end-to-end access scenarios\n\
                  through the server gate, the client navigation guard and the audit trail."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the matrix, then run every scenario.
    RunAll,
    /// Print the role × capability matrix.
    Matrix,
    /// Run the access scenarios against a development-mode service.
    Scenarios,
    /// Load and validate a TOML configuration file.
    CheckConfig {
        /// Path to the configuration file.
        path: PathBuf,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // RUST_LOG=debug shows every gate step.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::RunAll => {
            print_matrix();
            scenarios::run_all()
        }
        Command::Matrix => {
            print_matrix();
            Ok(())
        }
        Command::Scenarios => scenarios::run_all(),
        Command::CheckConfig { path } => check_config(&path),
    };

    match result {
        Ok(()) => println!("\nDone."),
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

// ── Matrix ────────────────────────────────────────────────────────────────────

fn print_matrix() {
    let table = PermissionTable::standard();

    println!();
    print!("{:<26}", "capability");
    for role in Role::ALL {
        print!("{:>19}", role.display_name());
    }
    println!();

    for capability in Capability::ALL {
        print!("{:<26}", capability.as_str());
        for role in Role::ALL {
            let cell = if table.lookup(role, capability) { "yes" } else { "-" };
            print!("{cell:>19}");
        }
        println!();
    }
}

// ── Config ────────────────────────────────────────────────────────────────────

fn check_config(path: &Path) -> FlowResult<()> {
    let config = AppConfig::from_file(path)?;
    println!("environment:   {:?}", config.environment);
    println!("identity mode: {:?}", config.identity.mode);
    println!("session ttl:   {}s", config.identity.session_ttl_secs);
    println!("audit enabled: {}", config.audit.enabled);
    Ok(())
}
