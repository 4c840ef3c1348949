use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::cli::error::{user_error, validate_app_id, validate_non_empty};
use crate::cli::output::{format_application_detail, format_application_table};
use crate::db::DbConnection;
use crate::models::Stage;
use crate::repo::ApplicationRepo;
use crate::tui::run_board;

#[derive(Parser)]
#[command(name = "huntl")]
#[command(about = "Job Hunt Ledger - track applications and move them through your pipeline")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new application
    Add {
        /// Company name
        company: String,
        /// Role title
        role: String,
        /// Initial pipeline stage (default: to-apply)
        #[arg(long)]
        stage: Option<String>,
        /// Job posting URL
        #[arg(long)]
        url: Option<String>,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// List applications
    List {
        /// Only show applications in this stage
        #[arg(long)]
        stage: Option<String>,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Show one application in full
    Show {
        /// Application ID
        id: String,
    },
    /// Edit fields of an application (unset flags leave fields unchanged)
    Edit {
        /// Application ID
        id: String,
        /// New company name
        #[arg(long)]
        company: Option<String>,
        /// New role title
        #[arg(long)]
        role: Option<String>,
        /// New job posting URL
        #[arg(long)]
        url: Option<String>,
        /// New free-form notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// Move an application to a different pipeline stage
    SetStage {
        /// Application ID
        id: String,
        /// Target stage (e.g. applied, hr-screen, offer)
        stage: String,
    },
    /// Delete an application
    Rm {
        /// Application ID
        id: String,
    },
    /// Open the interactive pipeline board (default)
    Board,
}

fn parse_stage_arg(s: &str) -> Stage {
    match Stage::from_str(s) {
        Some(stage) => stage,
        None => {
            let names: Vec<&str> = Stage::ALL.iter().map(|s| s.as_str()).collect();
            user_error(&format!(
                "Unknown stage '{}'. Valid stages: {}",
                s,
                names.join(", ")
            ));
        }
    }
}

fn parse_id_arg(s: &str) -> i64 {
    match validate_app_id(s) {
        Ok(id) => id,
        Err(msg) => user_error(&msg),
    }
}

/// CLI entry point
pub fn run() -> Result<()> {
    let _ = env_logger::try_init();
    let cli = Cli::parse();
    let conn = DbConnection::connect()?;

    match cli.command.unwrap_or(Commands::Board) {
        Commands::Add {
            company,
            role,
            stage,
            url,
            notes,
        } => {
            if let Err(msg) = validate_non_empty(&company, "Company") {
                user_error(&msg);
            }
            if let Err(msg) = validate_non_empty(&role, "Role") {
                user_error(&msg);
            }
            let stage = stage.as_deref().map(parse_stage_arg).unwrap_or(Stage::ToApply);
            let app = ApplicationRepo::create(&conn, &company, &role, stage, url, notes)?;
            println!(
                "Created application {} ({} / {})",
                app.id.unwrap_or(0),
                app.company,
                app.role
            );
        }
        Commands::List { stage, json } => {
            let mut apps = ApplicationRepo::list_all(&conn)?;
            if let Some(stage) = stage.as_deref().map(parse_stage_arg) {
                apps.retain(|a| a.stage == stage);
            }
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&apps).context("Failed to serialize applications")?
                );
            } else {
                print!("{}", format_application_table(&apps));
            }
        }
        Commands::Show { id } => {
            let id = parse_id_arg(&id);
            match ApplicationRepo::get_by_id(&conn, id)? {
                Some(app) => print!("{}", format_application_detail(&app)),
                None => user_error(&format!("No application with ID {}", id)),
            }
        }
        Commands::Edit {
            id,
            company,
            role,
            url,
            notes,
        } => {
            let id = parse_id_arg(&id);
            if company.is_none() && role.is_none() && url.is_none() && notes.is_none() {
                user_error("Nothing to edit. Pass at least one of --company, --role, --url, --notes.");
            }
            if let Some(company) = company.as_deref() {
                if let Err(msg) = validate_non_empty(company, "Company") {
                    user_error(&msg);
                }
            }
            if let Some(role) = role.as_deref() {
                if let Err(msg) = validate_non_empty(role, "Role") {
                    user_error(&msg);
                }
            }
            ApplicationRepo::update(
                &conn,
                id,
                company.as_deref(),
                role.as_deref(),
                url.as_deref(),
                notes.as_deref(),
            )?;
            println!("Updated application {}", id);
        }
        Commands::SetStage { id, stage } => {
            let id = parse_id_arg(&id);
            let stage = parse_stage_arg(&stage);
            ApplicationRepo::set_stage(&conn, id, stage)?;
            println!("Application {} moved to {}", id, stage.as_str());
        }
        Commands::Rm { id } => {
            let id = parse_id_arg(&id);
            ApplicationRepo::delete(&conn, id)?;
            println!("Deleted application {}", id);
        }
        Commands::Board => {
            run_board(&conn)?;
        }
    }

    Ok(())
}
