use std::path::PathBuf;

use clap::{Parser, Subcommand};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "sortie", about = "Personnel database tooling: natural-language queries, record entry, CSV import, and reports")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Ask a natural-language question; translates to SQL and executes it
    Ask {
        /// The question, e.g. "Show me all pilots"
        question: String,
        /// OpenRouter API key (overrides OPENROUTER_API_KEY)
        #[arg(long)]
        api_key: Option<String>,
        /// Only translate; print the SQL without executing it
        #[arg(long)]
        no_execute: bool,
    },

    /// Probe the LLM API with a list of candidate models
    TestConnection {
        /// OpenRouter API key (overrides OPENROUTER_API_KEY)
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Bulk-import personnel records from a CSV file
    Import {
        /// Path to the CSV file
        file: PathBuf,
        /// Owning user id stamped on every imported record
        #[arg(long)]
        user_id: Uuid,
    },

    /// Add a single personnel record
    AddPersonnel {
        #[arg(long)]
        user_id: Uuid,
        #[arg(long)]
        service_number: String,
        #[arg(long)]
        rank: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        specialization: String,
        #[arg(long)]
        command: String,
        #[arg(long)]
        base_location: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        emergency_contact: Option<String>,
        /// Joining date, YYYY-MM-DD
        #[arg(long)]
        date_of_joining: Option<String>,
    },

    /// Update fields of the personnel record owned by a user
    UpdatePersonnel {
        #[arg(long)]
        user_id: Uuid,
        #[arg(long)]
        rank: Option<String>,
        #[arg(long)]
        unit: Option<String>,
        #[arg(long)]
        base_location: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        emergency_contact: Option<String>,
        #[arg(long)]
        mission_ready: Option<bool>,
    },

    /// Add a training program record
    AddTraining {
        #[arg(long)]
        user_id: Uuid,
        #[arg(long)]
        name: String,
        /// Start date, YYYY-MM-DD
        #[arg(long)]
        start_date: String,
        #[arg(long)]
        instructor: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Add a mission record
    AddMission {
        /// Commander (owning) user id
        #[arg(long)]
        user_id: Uuid,
        #[arg(long)]
        code: String,
        #[arg(long, default_value = "medium")]
        priority: String,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        brief: Option<String>,
    },

    /// Print an analytics view as a table
    Report {
        /// One of: personnel, specializations, readiness, geography,
        /// skill-gaps, security, threats, compliance, audit
        view: String,
    },
}
