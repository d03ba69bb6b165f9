mod tui;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use jobtrack::db::Database;
use jobtrack::error::exit_codes;
use jobtrack::{
    ApplicationDraft, ApplicationRecord, CoverLetterType, InterviewRound, Priority, Query,
    SortDirection, SortField, Status, StatusFilter, Tracker, YesNo,
};
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "jobtrack")]
#[command(about = "Job application tracker - record, filter and review where you've applied")]
struct Cli {
    /// Path to the tracker database
    #[arg(long, global = true, env = "JOBTRACK_DB")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a new application
    Add {
        /// Company name
        #[arg(short, long)]
        company: String,

        /// Role applied for
        #[arg(short, long)]
        role: String,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Edit an application (only the given fields change)
    Edit {
        /// Application ID (or a unique prefix)
        id: String,

        #[arg(short, long)]
        company: Option<String>,

        #[arg(short, long)]
        role: Option<String>,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Delete an application
    Rm {
        /// Application ID (or a unique prefix)
        id: String,
    },

    /// Show application details
    Show {
        /// Application ID (or a unique prefix)
        id: String,
    },

    /// List applications as a table
    List {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Show applications grouped by status
    Board {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Count applications per status
    Stats {
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Browse applications interactively
    Browse {
        #[command(flatten)]
        query: QueryArgs,
    },
}

#[derive(Args, Debug)]
struct FieldArgs {
    /// Team name ("" clears)
    #[arg(long)]
    team: Option<String>,

    /// Link to the posting
    #[arg(long)]
    link: Option<String>,

    /// Resume file name sent with the application
    #[arg(long)]
    resume: Option<String>,

    /// Cover letter PDF file name
    #[arg(long, conflicts_with_all = ["cover_letter_text", "no_cover_letter"])]
    cover_letter_file: Option<String>,

    /// Cover letter text
    #[arg(long, conflicts_with = "no_cover_letter")]
    cover_letter_text: Option<String>,

    /// Drop the cover letter
    #[arg(long)]
    no_cover_letter: bool,

    /// Whether a referral was given (yes/no)
    #[arg(long, value_parser = parse_yes_no)]
    referral: Option<YesNo>,

    /// Whether you reached out to a recruiter (yes/no)
    #[arg(long, value_parser = parse_yes_no)]
    recruiter_outreach: Option<YesNo>,

    /// Recruiter email or profile URL
    #[arg(long)]
    recruiter_contact: Option<String>,

    /// Date applied (YYYY-MM-DD, defaults to today on add)
    #[arg(long, value_parser = parse_date)]
    date: Option<String>,

    /// Applied, Interviewing, Accepted or Rejected
    #[arg(short, long, value_parser = parse_with::<Status>)]
    status: Option<Status>,

    /// High, Medium or Low
    #[arg(short, long, value_parser = parse_with::<Priority>)]
    priority: Option<Priority>,

    /// Follow-up date (YYYY-MM-DD, "" clears)
    #[arg(long, value_parser = parse_date)]
    follow_up: Option<String>,

    /// Salary range, e.g. "$150K - $180K"
    #[arg(long)]
    salary: Option<String>,

    /// Phone Screen, Technical, Behavioral, System Design or Final ("" clears)
    #[arg(long, value_parser = parse_with::<InterviewRound>)]
    round: Option<InterviewRound>,

    /// Free-form notes
    #[arg(long)]
    notes: Option<String>,
}

impl FieldArgs {
    fn apply(self, draft: &mut ApplicationDraft) {
        if let Some(team) = self.team {
            draft.team_name = non_empty(team);
        }
        if let Some(link) = self.link {
            draft.website_link = non_empty(link);
        }
        if let Some(resume) = self.resume {
            draft.resume_file_name = non_empty(resume);
        }
        if self.no_cover_letter {
            draft.cover_letter_type = CoverLetterType::None;
            draft.cover_letter.clear();
        }
        if let Some(file) = self.cover_letter_file {
            draft.cover_letter_type = CoverLetterType::File;
            draft.cover_letter = file;
        }
        if let Some(text) = self.cover_letter_text {
            draft.cover_letter_type = CoverLetterType::Text;
            draft.cover_letter = text;
        }
        if let Some(referral) = self.referral {
            draft.referral_given = referral;
        }
        if let Some(outreach) = self.recruiter_outreach {
            draft.recruiter_outreach = outreach;
        }
        if let Some(contact) = self.recruiter_contact {
            draft.recruiter_contact = non_empty(contact);
        }
        if let Some(date) = self.date {
            draft.date_applied = date;
        }
        if let Some(status) = self.status {
            draft.status = status;
        }
        if let Some(priority) = self.priority {
            draft.priority = priority;
        }
        if let Some(follow_up) = self.follow_up {
            draft.follow_up_date = non_empty(follow_up);
        }
        if let Some(salary) = self.salary {
            draft.salary_range = non_empty(salary);
        }
        if let Some(round) = self.round {
            draft.interview_round = round;
        }
        if let Some(notes) = self.notes {
            draft.notes = non_empty(notes);
        }
    }
}

#[derive(Args, Debug)]
struct QueryArgs {
    /// Filter by status (All, Applied, Interviewing, Accepted, Rejected)
    #[arg(short, long, default_value = "All", value_parser = parse_with::<StatusFilter>)]
    status: StatusFilter,

    /// Only show companies or roles containing this text
    #[arg(short = 'q', long, default_value = "")]
    search: String,

    /// Sort by date, company, status or priority
    #[arg(long, default_value = "date", value_parser = parse_with::<SortField>)]
    sort: SortField,

    /// Sort ascending (default is descending)
    #[arg(long)]
    asc: bool,
}

impl QueryArgs {
    fn into_query(self) -> Query {
        Query {
            status_filter: self.status,
            search_text: self.search,
            sort_field: self.sort,
            sort_direction: if self.asc {
                SortDirection::Asc
            } else {
                SortDirection::Desc
            },
        }
    }
}

fn parse_with<T: FromStr<Err = jobtrack::Error>>(s: &str) -> Result<T, String> {
    s.parse().map_err(|e: jobtrack::Error| e.to_string())
}

fn parse_yes_no(s: &str) -> Result<YesNo, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" => Ok(YesNo::Yes),
        "no" | "n" | "false" => Ok(YesNo::No),
        _ => Err(format!("expected yes or no, got '{}'", s)),
    }
}

/// Accepts YYYY-MM-DD, or "" to clear.
fn parse_date(s: &str) -> Result<String, String> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(String::new());
    }
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|date| date.to_string())
        .map_err(|e| format!("expected YYYY-MM-DD, got '{}': {}", s, e))
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn open_tracker(path: Option<PathBuf>) -> Result<Tracker<Database>> {
    let path = path.unwrap_or_else(Database::default_path);
    let db = Database::open_at(&path)
        .with_context(|| format!("Failed to open tracker database at {}", path.display()))?;
    Ok(Tracker::open(db))
}

/// Exact id, or a prefix matching exactly one application.
fn resolve_id(tracker: &Tracker<Database>, id: &str) -> Result<Option<String>> {
    if tracker.get(id).is_some() {
        return Ok(Some(id.to_string()));
    }
    let matches: Vec<&ApplicationRecord> = tracker
        .list()
        .iter()
        .filter(|r| !id.is_empty() && r.id.starts_with(id))
        .collect();
    match matches.as_slice() {
        [] => Ok(None),
        [only] => Ok(Some(only.id.clone())),
        _ => Err(anyhow!(
            "'{}' matches {} applications; use more of the ID",
            id,
            matches.len()
        )),
    }
}

fn main() {
    // Tracing is opt-in via RUST_LOG and goes to stderr.
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| {
            let raw = raw.trim();
            if raw.is_empty() {
                return None;
            }
            EnvFilter::try_new(raw).ok()
        })
        .unwrap_or_else(|| EnvFilter::new("off"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("Error: {:#}", err);
        let code = err
            .downcast_ref::<jobtrack::Error>()
            .map(jobtrack::Error::exit_code)
            .unwrap_or(exit_codes::OPERATION_FAILED);
        std::process::exit(code);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut tracker = open_tracker(cli.db)?;

    match cli.command {
        Commands::Add {
            company,
            role,
            fields,
        } => {
            let mut draft = ApplicationDraft::new(company.trim(), role.trim());
            fields.apply(&mut draft);
            let id = tracker.submit_new(draft)?;
            println!("Added application {}", id);
        }

        Commands::Edit {
            id,
            company,
            role,
            fields,
        } => {
            let id = resolve_id(&tracker, &id)?
                .ok_or_else(|| jobtrack::Error::NotFound(id.clone()))?;
            let mut draft = tracker
                .get(&id)
                .map(|record| record.details.clone())
                .ok_or_else(|| jobtrack::Error::NotFound(id.clone()))?;
            if let Some(company) = company {
                draft.company_name = company.trim().to_string();
            }
            if let Some(role) = role {
                draft.role = role.trim().to_string();
            }
            fields.apply(&mut draft);
            tracker.submit_edit(&id, draft)?;
            println!("Updated application {}", id);
        }

        Commands::Rm { id } => match resolve_id(&tracker, &id)? {
            Some(id) => {
                tracker.remove(&id);
                println!("Deleted application {}", id);
            }
            None => println!("No application matches '{}'.", id),
        },

        Commands::Show { id } => {
            let record = resolve_id(&tracker, &id)?
                .and_then(|id| tracker.get(&id))
                .ok_or_else(|| jobtrack::Error::NotFound(id.clone()))?;
            print_record(record);
        }

        Commands::List { query } => {
            tracker.set_query(query.into_query());
            let records = tracker.visible();
            if records.is_empty() {
                println!("No applications found.");
            } else {
                println!(
                    "{:<8} {:<13} {:<8} {:<22} {:<24} {:<10} {:<8} {:<10}",
                    "ID", "STATUS", "PRIORITY", "COMPANY", "ROLE", "APPLIED", "REFERRAL", "FOLLOW-UP"
                );
                println!("{}", "-".repeat(110));
                for record in &records {
                    let app = &record.details;
                    println!(
                        "{:<8} {:<13} {:<8} {:<22} {:<24} {:<10} {:<8} {:<10}",
                        short_id(&record.id),
                        truncate(app.status.as_str(), 13),
                        truncate(app.priority.as_str(), 8),
                        truncate(&app.company_name, 22),
                        truncate(&app.role, 24),
                        app.date_applied,
                        if app.referral_given.is_yes() { "yes" } else { "-" },
                        app.follow_up_date.as_deref().unwrap_or("-"),
                    );
                }
                println!("\n{} of {} application(s) shown", records.len(), tracker.list().len());
            }
        }

        Commands::Board { query } => {
            tracker.set_query(query.into_query());
            for column in tracker.board() {
                println!("== {} ({}) ==", column.status, column.records.len());
                if column.records.is_empty() {
                    println!("  No applications");
                }
                for record in column.records {
                    let app = &record.details;
                    let company = match &app.team_name {
                        Some(team) => format!("{} / {}", app.company_name, team),
                        None => app.company_name.clone(),
                    };
                    let referral = if app.referral_given.is_yes() { "  referral" } else { "" };
                    println!(
                        "  {:<8} {} - {}  [{}] {}{}",
                        short_id(&record.id),
                        company,
                        app.role,
                        app.priority,
                        app.date_applied,
                        referral
                    );
                }
                println!();
            }
        }

        Commands::Stats { json } => {
            let summary = tracker.summary();
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{:<14} {:>5}", "Total", summary.total);
                for status in Status::KNOWN {
                    println!("{:<14} {:>5}", status.as_str(), summary.count(&status));
                }
                if summary.other > 0 {
                    println!("{:<14} {:>5}", "Other", summary.other);
                }
            }
        }

        Commands::Browse { query } => {
            tui::run_browse(&mut tracker, query.into_query())?;
        }
    }

    Ok(())
}

fn print_record(record: &ApplicationRecord) {
    let app = &record.details;
    println!("Application {}", record.id);
    println!("Company: {}", app.company_name);
    if let Some(team) = &app.team_name {
        println!("Team: {}", team);
    }
    println!("Role: {}", app.role);
    println!("Status: {}", app.status);
    println!("Priority: {}", app.priority);
    println!("Applied: {}", app.date_applied);
    if let Some(follow_up) = &app.follow_up_date {
        println!("Follow-up: {}", follow_up);
    }
    if let Some(link) = &app.website_link {
        println!("Posting: {}", link);
    }
    if let Some(resume) = &app.resume_file_name {
        println!("Resume: {}", resume);
    }
    match app.cover_letter_type {
        CoverLetterType::None => {}
        CoverLetterType::File => println!("Cover letter: {}", app.cover_letter),
        CoverLetterType::Text => println!("\n--- Cover Letter ---\n{}\n", app.cover_letter),
    }
    println!("Referral: {}", app.referral_given.as_str());
    println!("Recruiter outreach: {}", app.recruiter_outreach.as_str());
    if let Some(contact) = &app.recruiter_contact {
        println!("Recruiter contact: {}", contact);
    }
    if let Some(salary) = &app.salary_range {
        println!("Salary: {}", salary);
    }
    if app.interview_round != InterviewRound::NotSet {
        println!("Interview round: {}", app.interview_round.as_str());
    }
    if let Some(notes) = &app.notes {
        println!("\n--- Notes ---\n{}", notes);
    }
}

pub(crate) fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
