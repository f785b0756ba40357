//! CLI module for cadastre
//!
//! Provides the command-line interface using clap.

pub mod commands;
mod display;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Cadastre - Case management for mining permits
#[derive(Parser, Debug)]
#[command(name = "cadastre")]
#[command(version)]
#[command(about = "Case management for mining permits: procedures, document validation and committee decisions")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress info-level output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Override the working directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a data store in the current directory, filled with demo data
    Init {
        /// Replace an existing .cadastre store
        #[arg(long)]
        force: bool,
    },

    /// Open a session
    Login {
        email: String,
        password: String,
    },

    /// Close the current session
    Logout,

    /// Show the logged-in user and their menu
    Whoami,

    /// List permits with optional filtering
    Permits {
        /// Substring of the permit code
        #[arg(long)]
        code: Option<String>,

        /// Substring of the holder's legal name
        #[arg(long)]
        entity: Option<String>,

        /// Substring of a substance name
        #[arg(long)]
        substance: Option<String>,

        /// Filter by status (valide, expire, suspendu, annule, fusionne, all)
        #[arg(long)]
        status: Option<String>,

        /// Issued on or after (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Issued on or before (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show details of a permit
    Permit {
        /// Permit code or id
        code: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List procedures with optional filtering
    Procedures {
        /// Substring of the procedure code
        #[arg(long)]
        code: Option<String>,

        /// Filter by type (demande, transfert, cession, renouvellement, ..., all)
        #[arg(long = "type")]
        procedure_type: Option<String>,

        /// Filter by status (en_cours, terminee, rejetee, suspendue, all)
        #[arg(long)]
        status: Option<String>,

        /// Substring of the entity's legal name
        #[arg(long)]
        entity: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show details of a procedure
    Procedure {
        /// Procedure code or id
        code: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List documents across procedures
    Documents {
        /// Substring of the document name or procedure code
        #[arg(long)]
        search: Option<String>,

        /// Filter by review status (en_attente, valide, rejete, all)
        #[arg(long)]
        status: Option<String>,

        /// Filter by document type
        #[arg(long = "type")]
        doc_type: Option<String>,

        /// Substring of the entity's legal name
        #[arg(long)]
        entity: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Review a pending document
    ValidateDocument {
        /// Procedure code or id
        procedure: String,

        /// Document id within the procedure
        document: String,

        /// valide or rejete
        status: String,

        #[arg(long)]
        comment: Option<String>,
    },

    /// Record the outcome of a pending step
    Step {
        /// Procedure code or id
        procedure: String,

        /// Step id within the procedure
        step_id: String,

        /// approve or reject
        outcome: String,

        #[arg(long)]
        comment: Option<String>,
    },

    /// List procedures waiting for a committee decision
    Pending {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record a committee decision
    Decide {
        /// Procedure code or id
        procedure: String,

        /// approuve or rejete
        #[arg(long)]
        decision: Option<String>,

        #[arg(long)]
        comment: Option<String>,

        /// Formal decision note
        #[arg(long)]
        note: Option<String>,
    },

    /// Suspend an in-progress procedure
    Suspend {
        /// Procedure code or id
        procedure: String,
    },

    /// Resume a suspended procedure
    Resume {
        /// Procedure code or id
        procedure: String,
    },

    /// Submit a new permit application from a JSON draft
    Apply {
        /// Path to the application draft
        file: PathBuf,
    },

    /// Show dashboard statistics
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List legal entities
    Entities {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List mineral substances
    Substances {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check the store for records that break data invariants
    Check,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::parse_from(["cadastre", "--cwd", "/tmp/store", "-v", "whoami"]);
        assert!(cli.verbose);
        assert_eq!(cli.cwd, Some(PathBuf::from("/tmp/store")));
        assert!(matches!(cli.command, Some(Commands::Whoami)));
    }

    #[test]
    fn test_parse_permits_filters() {
        let cli = Cli::parse_from([
            "cadastre", "permits", "--status", "expire", "--from", "2024-01-01", "--json",
        ]);
        match cli.command {
            Some(Commands::Permits { status, from, to, json, .. }) => {
                assert_eq!(status.as_deref(), Some("expire"));
                assert_eq!(from.as_deref(), Some("2024-01-01"));
                assert_eq!(to, None);
                assert!(json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_step_and_decide() {
        let cli = Cli::parse_from(["cadastre", "step", "PR-2025-017", "3", "approve", "--comment", "RAS"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Step { ref outcome, ref comment, .. })
                if outcome == "approve" && comment.as_deref() == Some("RAS")
        ));

        let cli = Cli::parse_from(["cadastre", "decide", "PR-2025-017", "--decision", "approuve"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Decide { ref decision, .. }) if decision.as_deref() == Some("approuve")
        ));
    }

    #[test]
    fn test_type_flag_name() {
        let cli = Cli::parse_from(["cadastre", "procedures", "--type", "demande"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Procedures { ref procedure_type, .. })
                if procedure_type.as_deref() == Some("demande")
        ));
    }
}
