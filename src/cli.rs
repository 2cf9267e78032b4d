//! Command-line interface.

use clap::{Parser, Subcommand};

use crate::domain::{DocType, UserType};

/// Store-code generator and record store.
#[derive(Debug, Parser)]
#[command(name = "storecode", version)]
#[command(about = "Generate, validate and assign prefixed store codes", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print freshly generated store codes.
    Generate {
        /// Prefix prepended to every code.
        #[arg(long, default_value = "")]
        prefix: String,

        /// Number of codes to print.
        #[arg(long, default_value_t = 1)]
        count: usize,

        /// Seed overriding `generator.seed`.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Check that a code has the store-code format.
    Validate {
        /// Code to check, prefix included.
        code: String,

        /// Expected prefix.
        #[arg(long, default_value = "")]
        prefix: String,
    },

    /// Save a company under a new store code.
    CreateCompany {
        #[arg(long)]
        name: String,

        #[arg(long)]
        tax_document: Option<String>,

        /// TIN, IRS, EIN or SSN.
        #[arg(long, default_value_t = DocType::Ssn)]
        doctype: DocType,
    },

    /// Save a user under a new store code.
    CreateUser {
        #[arg(long)]
        username: String,

        #[arg(long)]
        email: String,

        /// ADM, SADM, CLI, STF or PRV.
        #[arg(long, default_value_t = UserType::Client)]
        user_type: UserType,

        /// Grant staff and superuser rights.
        #[arg(long)]
        superuser: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::try_parse_from(["storecode", "generate", "--prefix", "COMP", "--count", "3"])
            .unwrap();
        match cli.command {
            Command::Generate {
                prefix,
                count,
                seed,
            } => {
                assert_eq!(prefix, "COMP");
                assert_eq!(count, 3);
                assert_eq!(seed, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_create_user() {
        let cli = Cli::try_parse_from([
            "storecode",
            "create-user",
            "--username",
            "jane",
            "--email",
            "jane@example.com",
            "--user-type",
            "STF",
        ])
        .unwrap();
        match cli.command {
            Command::CreateUser {
                user_type,
                superuser,
                ..
            } => {
                assert_eq!(user_type, UserType::Staff);
                assert!(!superuser);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_doctype() {
        assert!(
            Cli::try_parse_from(["storecode", "create-company", "--name", "Acme", "--doctype", "X"])
                .is_err()
        );
    }
}
