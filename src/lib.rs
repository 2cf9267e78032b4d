//! # storecode
//!
//! Prefixed, human-readable store codes for persisted records.
//!
//! A store code is an entity prefix followed by a numeric section and an
//! alphabetic section, for example `COMP000412876hRtK`:
//!
//! - **Generator**: draws a number, encodes it into both sections
//! - **Store service**: assigns codes on save and retries on collisions
//! - **Storage**: in-memory or file-backed records keyed by store code
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                            storecode                                 │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────┐  ┌────────────┐ │
//! │  │     CLI     │  │   Service   │  │   Storage   │  │  Domain    │ │
//! │  │   (clap)    │→ │   Layer     │→ │   Layer     │  │  Models    │ │
//! │  └─────────────┘  └─────────────┘  └─────────────┘  └────────────┘ │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod storage;

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::cli::{Cli, Command};
use crate::config::AppConfig;
use crate::domain::{Company, CustomUser, StoreCode};
use crate::service::{StoreCodeGen, StoreService};
use crate::storage::create_storage;

/// Run the `storecode` command line.
///
/// This function:
/// 1. Loads `.env`, configuration files and environment
/// 2. Initializes logging
/// 3. Builds the generator, and the storage backend when the command saves records
/// 4. Executes the command
///
/// # Errors
///
/// Returns an error if:
/// - Configuration cannot be loaded
/// - A code or entity fails validation
/// - Storage fails or a save runs out of attempts
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    // .env is optional
    dotenvy::dotenv().ok();

    let mut config = AppConfig::load()?;

    init_logging(&config);

    debug!(version = env!("CARGO_PKG_VERSION"), "Starting storecode");

    match cli.command {
        Command::Generate {
            prefix,
            count,
            seed,
        } => {
            if seed.is_some() {
                config.generator.seed = seed;
            }
            let generator = StoreCodeGen::new(&config.generator)?;
            for _ in 0..count {
                println!("{}", generator.generate(&prefix));
            }
        }
        Command::Validate { code, prefix } => {
            let code = StoreCode::parse(code, &prefix)?;
            println!("{code}: valid");
        }
        Command::CreateCompany {
            name,
            tax_document,
            doctype,
        } => {
            let mut company = Company::new(name);
            company.doctype = doctype;
            company.tax_document = tax_document;

            let service = build_service(&config).await?;
            print_json(&service.create(company).await?)?;
        }
        Command::CreateUser {
            username,
            email,
            user_type,
            superuser,
        } => {
            let user = if superuser {
                CustomUser::superuser(username, &email)?
            } else {
                CustomUser::new(username, &email, user_type)?
            };

            let service = build_service(&config).await?;
            print_json(&service.create(user).await?)?;
        }
    }

    Ok(())
}

/// Build the store service from configuration.
///
/// # Errors
///
/// Returns an error if the generator configuration is invalid or storage
/// cannot be initialized.
pub async fn build_service(config: &AppConfig) -> anyhow::Result<StoreService> {
    let storage = create_storage(&config.storage).await?;
    let generator = Arc::new(StoreCodeGen::new(&config.generator)?);

    Ok(StoreService::new(storage, generator).with_max_attempts(config.persistence.max_attempts))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Initialize logging based on configuration.
///
/// Logs go to stderr so command output on stdout stays machine-readable.
fn init_logging(config: &AppConfig) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.observability.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.observability.log_format == "json" {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}
