//! Terminal front end for the family medicine tracker.
//!
//! # Responsibility
//! - Map subcommands onto tracker use-cases over the configured database.
//! - Prompt on stdin for names that were not given on the command line.
//!
//! # Invariants
//! - Each invocation is one session; selection starts at member 0 unless
//!   `--member` says otherwise.
//! - A change that was applied but not saved is reported as a warning.

mod config;
mod input;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use input::LinePrompt;
use log::warn;
use medtrack_core::db::open_db;
use medtrack_core::{
    default_log_level, format_date, init_logging, parse_date, today, KeyValueStore, NaiveDate,
    NamePrompt, SqliteKeyValueStore, TrackerError, TrackerService,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "medtrack")]
#[command(about = "Track which medicines each family member took today")]
#[command(version)]
struct Cli {
    /// Tracker database file (overrides the config file)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List family members
    Members,
    /// Show a member's checklist for one day
    Show {
        /// Member index
        #[arg(short, long, default_value_t = 0)]
        member: usize,
        /// Date as YYYY-MM-DD (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Add a family member (prompts when NAME is omitted)
    AddMember { name: Option<String> },
    /// Add a medicine to a member (prompts when NAME is omitted)
    AddMedicine {
        /// Member index
        #[arg(short, long, default_value_t = 0)]
        member: usize,
        name: Option<String>,
    },
    /// Mark a medicine taken, or un-mark it if already taken
    Toggle {
        /// Member index
        #[arg(short, long, default_value_t = 0)]
        member: usize,
        /// Date as YYYY-MM-DD (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        medicine: String,
    },
    /// Export the full log as medicine-log.json
    Export {
        /// Directory to write into; prints to stdout when omitted
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::load_config()?;
    start_logging(&config);

    let db_path = match cli.db {
        Some(path) => path,
        None => config::get_db_path(&config)?,
    };
    let conn = open_db(&db_path)
        .with_context(|| format!("Failed to open tracker database: {}", db_path.display()))?;
    let store = SqliteKeyValueStore::try_new(&conn)?;
    let mut service = TrackerService::initialize(store);

    run(&mut service, cli.command)
}

fn run<S: KeyValueStore>(service: &mut TrackerService<S>, command: Commands) -> Result<()> {
    match command {
        Commands::Members => {
            for (index, member) in service.roster().members().iter().enumerate() {
                println!(
                    "{index}: {} ({} medicines)",
                    member.name,
                    member.medicines.len()
                );
            }
        }
        Commands::Show { member, date } => {
            let day = resolve_date(date.as_deref())?;
            select(service, member)?;
            print_day(service, day);
        }
        Commands::AddMember { name } => {
            let mut prompt = prompt_for(name);
            match applied(service.add_member(prompt.as_mut()))? {
                Some(Some(index)) => println!("Added member {index}."),
                Some(None) => println!("Cancelled."),
                None => {}
            }
        }
        Commands::AddMedicine { member, name } => {
            select(service, member)?;
            let mut prompt = prompt_for(name);
            match applied(service.add_medicine(member, prompt.as_mut()))? {
                Some(true) => println!("Added medicine to member {member}."),
                Some(false) => println!("Cancelled."),
                None => {}
            }
        }
        Commands::Toggle {
            member,
            date,
            medicine,
        } => {
            let day = resolve_date(date.as_deref())?;
            select(service, member)?;
            applied(service.toggle(member, day, &medicine))?;
            let state = if service.is_taken(member, day, &medicine) {
                "taken"
            } else {
                "not taken"
            };
            println!("{medicine} marked {state} on {}.", format_date(day));
        }
        Commands::Export { out } => {
            let export = service.export_log()?;
            match out {
                Some(dir) => {
                    let path = export
                        .write_to_dir(&dir)
                        .with_context(|| format!("Failed to write export into {}", dir.display()))?;
                    println!("Exported {}.", path.display());
                }
                None => println!("{}", export.body),
            }
        }
    }
    Ok(())
}

fn start_logging(config: &config::Config) {
    let level = config
        .logging
        .level
        .clone()
        .unwrap_or_else(|| default_log_level().to_string());
    let result = config::get_log_dir(config).and_then(|dir| {
        init_logging(&level, &dir.to_string_lossy()).map_err(anyhow::Error::msg)
    });
    if let Err(err) = result {
        eprintln!("warning: logging disabled: {err}");
    }
}

fn select<S: KeyValueStore>(service: &mut TrackerService<S>, member: usize) -> Result<()> {
    if service.select_member(member).is_err() {
        bail!(
            "No member at index {member}; run `medtrack members` to list {} member(s)",
            service.roster().len()
        );
    }
    Ok(())
}

fn print_day<S: KeyValueStore>(service: &TrackerService<S>, day: NaiveDate) {
    let index = service.selected_index();
    let Some(member) = service.selected_member() else {
        return;
    };
    println!("{} - {}", member.name, format_date(day));
    for medicine in &member.medicines {
        let mark = if service.is_taken(index, day, medicine) {
            'x'
        } else {
            ' '
        };
        println!("  [{mark}] {medicine}");
    }
}

fn resolve_date(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(text) => Ok(parse_date(text)?),
        None => Ok(today()),
    }
}

fn prompt_for(name: Option<String>) -> Box<dyn NamePrompt> {
    match name {
        Some(name) => {
            let mut answer = Some(name);
            Box::new(move |_: &str| -> Option<String> { answer.take() })
        }
        None => Box::new(LinePrompt::stdin()),
    }
}

/// Passes through results, downgrading unsaved-but-applied changes to a
/// warning (`Ok(None)`).
fn applied<T>(result: Result<T, TrackerError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.mutation_applied() => {
            warn!("event=cli_command module=cli status=not_durable");
            eprintln!("warning: {err}");
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::{run, Commands};
    use medtrack_core::{MemoryKeyValueStore, TrackerService};

    #[test]
    fn add_member_with_name_argument_does_not_prompt() {
        let mut service = TrackerService::initialize(MemoryKeyValueStore::new());
        run(
            &mut service,
            Commands::AddMember {
                name: Some("Ravi".to_string()),
            },
        )
        .unwrap();
        assert_eq!(service.roster().member(1).unwrap().name, "Ravi");
    }

    #[test]
    fn toggle_and_show_use_selected_member() {
        let mut service = TrackerService::initialize(MemoryKeyValueStore::new());
        run(
            &mut service,
            Commands::Toggle {
                member: 0,
                date: Some("2024-01-01".to_string()),
                medicine: "Pan 40".to_string(),
            },
        )
        .unwrap();
        run(
            &mut service,
            Commands::Show {
                member: 0,
                date: Some("2024-01-01".to_string()),
            },
        )
        .unwrap();

        let day = medtrack_core::parse_date("2024-01-01").unwrap();
        assert!(service.is_taken(0, day, "Pan 40"));
    }

    #[test]
    fn unknown_member_and_bad_date_fail() {
        let mut service = TrackerService::initialize(MemoryKeyValueStore::new());
        let unknown = run(
            &mut service,
            Commands::AddMedicine {
                member: 5,
                name: Some("X".to_string()),
            },
        );
        assert!(unknown.is_err());

        let bad_date = run(
            &mut service,
            Commands::Show {
                member: 0,
                date: Some("tomorrow".to_string()),
            },
        );
        assert!(bad_date.is_err());
    }

    #[test]
    fn export_writes_medicine_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut service = TrackerService::initialize(MemoryKeyValueStore::new());
        run(
            &mut service,
            Commands::Export {
                out: Some(dir.path().to_path_buf()),
            },
        )
        .unwrap();
        let body = std::fs::read_to_string(dir.path().join("medicine-log.json")).unwrap();
        assert_eq!(body, "{}");
    }
}
