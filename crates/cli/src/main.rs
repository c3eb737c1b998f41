mod cli;
mod render;
mod report;

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, NaiveTime, Utc};
use clap::Parser;
use tracing::info;

use sortie_backend::BackendClient;
use sortie_core::config::{load_dotenv, Config};
use sortie_core::records::{Mission, Profile, TrainingRecord};
use sortie_llm::probe::probe_connection;
use sortie_llm::QueryPipeline;

use crate::cli::{CliArgs, Command};
use crate::render::render_table;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    load_dotenv();
    let config = Config::from_env();
    config.log_summary();

    let args = CliArgs::parse();
    match args.command {
        Command::Ask {
            question,
            api_key,
            no_execute,
        } => ask(&config, &question, api_key.as_deref(), no_execute).await,
        Command::TestConnection { api_key } => test_connection(&config, api_key.as_deref()).await,
        Command::Import { file, user_id } => {
            let csv_text = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let client = BackendClient::new(&config.backend)?;
            let report = sortie_ingest::import_profiles(&client, user_id, &csv_text).await?;
            if !report.errors.is_empty() {
                for e in &report.errors {
                    eprintln!("{e}");
                }
                bail!("import aborted with {} error(s)", report.errors.len());
            }
            println!("Imported {} personnel records.", report.imported);
            Ok(())
        }
        Command::AddPersonnel {
            user_id,
            service_number,
            rank,
            first_name,
            last_name,
            specialization,
            command,
            base_location,
            phone,
            emergency_contact,
            date_of_joining,
        } => {
            let date_of_joining = date_of_joining
                .map(|raw| {
                    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
                        .with_context(|| format!("invalid --date-of-joining '{raw}'"))
                })
                .transpose()?;
            let profile = Profile {
                user_id,
                service_number,
                rank,
                first_name,
                last_name,
                specialization,
                command,
                unit: None,
                base_location,
                phone,
                emergency_contact,
                date_of_joining,
            };
            insert_one(&config, "profiles", serde_json::to_value(&profile)?).await?;
            println!("Personnel record added.");
            Ok(())
        }
        Command::UpdatePersonnel {
            user_id,
            rank,
            unit,
            base_location,
            phone,
            emergency_contact,
            mission_ready,
        } => {
            let mut patch = serde_json::Map::new();
            let mut set = |key: &str, value: Option<serde_json::Value>| {
                if let Some(v) = value {
                    patch.insert(key.to_string(), v);
                }
            };
            set("rank", rank.map(serde_json::Value::String));
            set("unit", unit.map(serde_json::Value::String));
            set("base_location", base_location.map(serde_json::Value::String));
            set("phone", phone.map(serde_json::Value::String));
            set(
                "emergency_contact",
                emergency_contact.map(serde_json::Value::String),
            );
            set("mission_ready", mission_ready.map(serde_json::Value::Bool));
            if patch.is_empty() {
                bail!("nothing to update; pass at least one field flag");
            }
            let client = BackendClient::new(&config.backend)?;
            client
                .update(
                    "profiles",
                    &serde_json::Value::Object(patch),
                    ("user_id", &user_id.to_string()),
                )
                .await
                .context("failed to update profile")?;
            println!("Profile updated.");
            Ok(())
        }
        Command::AddTraining {
            user_id,
            name,
            start_date,
            instructor,
            location,
            notes,
        } => {
            let record = TrainingRecord {
                user_id,
                training_name: name,
                training_type: "Program".to_string(),
                start_date,
                status: "scheduled".to_string(),
                instructor,
                location,
                notes,
            };
            insert_one(&config, "training_records", serde_json::to_value(&record)?).await?;
            println!("Training program created.");
            Ok(())
        }
        Command::AddMission {
            user_id,
            code,
            priority,
            location,
            brief,
        } => {
            let mission = Mission {
                mission_name: code.clone(),
                mission_type: "Assignment".to_string(),
                start_date: Utc::now(),
                status: "planned".to_string(),
                priority,
                location,
                description: brief,
                commander_id: user_id,
            };
            insert_one(&config, "missions", serde_json::to_value(&mission)?).await?;
            println!("Mission {code} created.");
            Ok(())
        }
        Command::Report { view } => {
            let Some(table) = report::resolve_view(&view) else {
                bail!(
                    "unknown view '{}'; available: {}",
                    view,
                    report::view_names().join(", ")
                );
            };
            let client = BackendClient::new(&config.backend)?;
            let rows = client.select(table, None).await?;
            info!(table, rows = rows.len(), "report fetched");
            println!("{}", render_table(&rows));
            Ok(())
        }
    }
}

async fn ask(config: &Config, question: &str, api_key: Option<&str>, no_execute: bool) -> Result<()> {
    let pipeline = QueryPipeline::from_config(config, api_key);

    if no_execute {
        let result = pipeline.translate(question).await;
        if let Some(error) = result.error {
            bail!("{error}");
        }
        println!("SQL:\n{}\n", result.sql);
        println!("{}", result.explanation);
        return Ok(());
    }

    let outcome = pipeline.ask(question).await;
    if let Some(error) = &outcome.result.error {
        bail!("{error}");
    }

    println!("SQL:\n{}\n", outcome.result.sql);
    println!("{}\n", outcome.result.explanation);

    if let Some(exec_error) = outcome.execution_error {
        bail!("{exec_error}");
    }

    println!("{}", render_table(&outcome.result.data));
    println!("{} rows", outcome.result.data.len());
    Ok(())
}

async fn test_connection(config: &Config, api_key: Option<&str>) -> Result<()> {
    let report = probe_connection(&config.llm, api_key).await;
    if report.success {
        println!("{}", report.message);
        if let Some(response) = report.response {
            println!("Response: {}", response.trim());
        }
        Ok(())
    } else {
        bail!("{}", report.message);
    }
}

async fn insert_one(config: &Config, table: &str, row: serde_json::Value) -> Result<()> {
    let client = BackendClient::new(&config.backend)?;
    client
        .insert(table, &[row])
        .await
        .with_context(|| format!("failed to insert into {table}"))?;
    Ok(())
}
