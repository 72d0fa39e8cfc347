use std::fmt;
use std::fmt::Write as _;

use services::{AppServices, Dashboard, DashboardConfig, DashboardView, InterviewCardItem};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidPoolLimit { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidPoolLimit { raw } => write!(f, "invalid --pool-limit value: {raw}"),
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

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [dashboard] [--db <sqlite_url>] [--user-id <id>] [--pool-limit <n>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite://dev.sqlite3");
    eprintln!("  --user-id unset (signed out)");
    eprintln!("  --pool-limit 20");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  PREPWISE_DB_URL, PREPWISE_USER_ID, PREPWISE_POOL_LIMIT, RUST_LOG");
}

struct Args {
    db_url: String,
    user_id: Option<String>,
    config: DashboardConfig,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("PREPWISE_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://dev.sqlite3".into(), normalize_sqlite_url);
        let mut user_id = std::env::var("PREPWISE_USER_ID")
            .ok()
            .filter(|value| !value.trim().is_empty());
        let mut config = DashboardConfig::from_env();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--user-id" => {
                    user_id = Some(require_value(args, "--user-id")?)
                        .filter(|value| !value.trim().is_empty());
                }
                "--pool-limit" => {
                    let value = require_value(args, "--pool-limit")?;
                    let parsed: u32 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidPoolLimit { raw: value.clone() })?;
                    config = config.with_pool_limit(parsed);
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
            config,
        })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim();
    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = std::path::Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

fn render_card(item: &InterviewCardItem) -> String {
    let mut line = format!(
        "  - [{}] {} ({})",
        item.interview_id, item.role, item.interview_type
    );
    // Writing into a String cannot fail.
    if let Some(company) = &item.company {
        let _ = write!(line, " @ {company}");
    }
    if !item.techstack.is_empty() {
        let _ = write!(line, " · {}", item.techstack.join(", "));
    }
    let _ = write!(line, " · {}", item.created_at.format("%b %d, %Y"));
    line
}

fn render_view(view: &DashboardView) -> String {
    let mut out = Vec::new();
    out.push(format!("Welcome back, {}", view.user().name()));
    out.push(format!(
        "{} available · {} taken",
        view.available_count(),
        view.taken_count()
    ));
    out.push(String::new());

    out.push(format!("Available Interviews ({})", view.available_count()));
    if view.needs_first_interview() {
        out.push("  No interviews available. Create your first mock interview.".into());
    }
    out.extend(view.available_items().iter().map(render_card));
    out.push(String::new());

    out.push(format!("Taken Interviews ({})", view.taken_count()));
    if !view.has_taken() {
        out.push("  You haven't taken any interviews yet.".into());
    }
    out.extend(view.taken_items().iter().map(render_card));
    out.join("\n")
}

fn render(dashboard: &Dashboard) -> String {
    match dashboard {
        Dashboard::SignedOut => {
            "Sign in to start practicing interviews (set --user-id or PREPWISE_USER_ID).".into()
        }
        Dashboard::Ready(view) => render_view(view),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1).peekable();
    match argv.peek().map(String::as_str) {
        Some("dashboard") => {
            argv.next();
        }
        Some(first) if !first.starts_with('-') => {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            return Err(ArgsError::UnknownArg(first.to_string()).into());
        }
        _ => {}
    }

    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    tracing::info!(db_url = %parsed.db_url, pool_limit = parsed.config.pool_limit, "starting dashboard");
    let services =
        AppServices::new_sqlite(&parsed.db_url, parsed.user_id.as_deref(), parsed.config).await?;

    let dashboard = services.dashboard().load().await?;
    println!("{}", render(&dashboard));
    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
