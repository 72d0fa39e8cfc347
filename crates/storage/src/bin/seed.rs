use std::fmt;

use chrono::{DateTime, Utc};
use prep_core::Clock;
use prep_core::model::{
    FeedbackRecord, Interview, InterviewId, InterviewRecord, InterviewType, User, UserId,
};
use storage::repository::Storage;

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    user_id: String,
    user_name: String,
    now: Option<DateTime<Utc>>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidNow { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidNow { raw } => {
                write!(f, "invalid --now value (expected RFC3339): {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("PREPWISE_DB_URL").unwrap_or_else(|_| "sqlite:dev.sqlite3".into());
        let mut user_id =
            std::env::var("PREPWISE_USER_ID").unwrap_or_else(|_| "demo-user".into());
        let mut user_name = "Demo User".to_string();
        let mut now: Option<DateTime<Utc>> = None;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--user-id" => user_id = require_value(&mut args, "--user-id")?,
                "--user-name" => user_name = require_value(&mut args, "--user-name")?,
                "--now" => {
                    let value = require_value(&mut args, "--now")?;
                    let parsed = DateTime::parse_from_rfc3339(&value)
                        .map_err(|_| ArgsError::InvalidNow { raw: value.clone() })?
                        .with_timezone(&Utc);
                    now = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            user_id,
            user_name,
            now,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite:dev.sqlite3)");
    eprintln!("  --user-id <id>            Signed-in user to seed (default: demo-user)");
    eprintln!("  --user-name <name>        Display name (default: Demo User)");
    eprintln!("  --now <rfc3339>           Fixed current time for deterministic seeding");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  PREPWISE_DB_URL, PREPWISE_USER_ID");
}

struct Fixture {
    users: Vec<User>,
    interviews: Vec<InterviewRecord>,
    feedback: Vec<FeedbackRecord>,
}

fn interview(
    clock: &Clock,
    minutes_ago: i64,
    id: &str,
    owner: &UserId,
    role: &str,
    kind: InterviewType,
    techstack: &[&str],
) -> Result<Interview, prep_core::Error> {
    Ok(Interview::new(
        InterviewId::new(id)?,
        owner.clone(),
        role,
        kind,
        techstack.iter().map(|t| (*t).to_string()).collect(),
        clock.minutes_ago(minutes_ago),
    ))
}

/// Owned interviews with and without feedback, pool interviews from two
/// other users (one still a draft), and one legacy row without an id.
fn build_fixture(args: &Args, clock: &Clock) -> Result<Fixture, prep_core::Error> {
    let me = UserId::new(args.user_id.as_str())?;
    let mentor_a = UserId::new("mentor-a")?;
    let mentor_b = UserId::new("mentor-b")?;

    let users = vec![
        User::new(me.clone(), args.user_name.as_str(), None)?,
        User::new(mentor_a.clone(), "Mentor A", Some("a@example.com".into()))?,
        User::new(mentor_b.clone(), "Mentor B", None)?,
    ];

    let frontend = interview(
        clock,
        10,
        "demo-frontend",
        &me,
        "Frontend Developer",
        InterviewType::Technical,
        &["React", "TypeScript"],
    )?
    .with_finalized(true);
    let backend = interview(
        clock,
        20,
        "demo-backend",
        &me,
        "Backend Developer",
        InterviewType::Mixed,
        &["Rust", "PostgreSQL"],
    )?
    .with_finalized(true)
    .with_company("Initech");
    let behavioral = interview(
        clock,
        30,
        "demo-behavioral",
        &me,
        "Engineering Manager",
        InterviewType::Behavioral,
        &[],
    )?;
    let fullstack = interview(
        clock,
        5,
        "pool-fullstack",
        &mentor_a,
        "Full Stack Engineer",
        InterviewType::Technical,
        &["Node.js", "React", "MongoDB"],
    )?
    .with_finalized(true);
    let devops = interview(
        clock,
        15,
        "pool-devops",
        &mentor_b,
        "DevOps Engineer",
        InterviewType::Mixed,
        &["Kubernetes", "Terraform"],
    )?
    .with_finalized(true)
    .with_company("Globex");
    let draft = interview(
        clock,
        1,
        "pool-draft",
        &mentor_b,
        "Data Scientist",
        InterviewType::Technical,
        &["Python"],
    )?;

    let mut interviews: Vec<InterviewRecord> =
        [&frontend, &backend, &behavioral, &fullstack, &devops, &draft]
            .into_iter()
            .map(InterviewRecord::from_interview)
            .collect();
    let mut legacy = InterviewRecord::from_interview(&behavioral);
    legacy.id = None;
    legacy.role = "Legacy Interview".into();
    interviews.push(legacy);

    let feedback = vec![FeedbackRecord::new(
        frontend.id().clone(),
        me,
        78,
        clock.minutes_ago(2),
    )?];

    Ok(Fixture {
        users,
        interviews,
        feedback,
    })
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let storage = Storage::sqlite(&args.db_url).await?;
    let clock = args.now.map_or_else(Clock::system, Clock::fixed);
    let fixture = build_fixture(&args, &clock)?;

    for user in &fixture.users {
        storage.users.upsert_user(user).await?;
    }
    for record in &fixture.interviews {
        storage.interviews.upsert_interview(record).await?;
    }
    for feedback in &fixture.feedback {
        storage.feedback.upsert_feedback(feedback).await?;
    }

    println!(
        "Seeded {} users, {} interviews and {} feedback entries into {}",
        fixture.users.len(),
        fixture.interviews.len(),
        fixture.feedback.len(),
        args.db_url
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
