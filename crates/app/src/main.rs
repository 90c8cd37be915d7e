use std::fmt;

use catalog_core::filter::{ALL, FilterSelection};
use catalog_core::format::{Greeting, format_date, format_duration};
use catalog_core::model::{CourseId, LessonId, ParseIdError};
use catalog_core::pages::{CoursePage, LessonPage};
use catalog_core::{BrowseSession, ProgressPercent};
use services::config::{CONTENT_ENV, DB_URL_ENV, MEMORY_BACKEND};
use services::{AppServices, CatalogConfig, Clock, ProgressService, course_page, lesson_page};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingArgument { name: &'static str },
    UnknownArg(String),
    InvalidPercent { raw: String },
    InvalidAnswer { raw: String },
    InvalidDbUrl { raw: String },
    InvalidId(ParseIdError),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingArgument { name } => write!(f, "missing <{name}>"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidPercent { raw } => write!(f, "invalid percent: {raw}"),
            ArgsError::InvalidAnswer { raw } => write!(f, "invalid --answer value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidId(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<ParseIdError> for ArgsError {
    fn from(err: ParseIdError) -> Self {
        ArgsError::InvalidId(err)
    }
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- search [--query <text>] [--category <name>]");
    eprintln!("                             [--difficulty <level>] [--tag <tag>]...");
    eprintln!("                             [--sort newest|shortest|recommended]");
    eprintln!("  cargo run -p app -- course [<course-id>]");
    eprintln!("  cargo run -p app -- lesson [<lesson-id>] [--answer <n|->]...");
    eprintln!("  cargo run -p app -- progress <lesson-id> <percent>");
    eprintln!("  cargo run -p app -- continue");
    eprintln!();
    eprintln!("Every command accepts:");
    eprintln!("  --content <dir|url>   (default .)");
    eprintln!("  --db <sqlite_url>     (default sqlite://catalog.sqlite3, or `memory`)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  {CONTENT_ENV}, {DB_URL_ENV}, RUST_LOG");
}

#[derive(Debug)]
struct SearchArgs {
    query: String,
    category: String,
    difficulty: String,
    tags: Vec<String>,
    sort: String,
}

impl Default for SearchArgs {
    fn default() -> Self {
        Self {
            query: String::new(),
            category: ALL.to_owned(),
            difficulty: ALL.to_owned(),
            tags: Vec::new(),
            sort: "recommended".to_owned(),
        }
    }
}

#[derive(Debug)]
enum Command {
    Search(SearchArgs),
    Course(Option<CourseId>),
    Lesson {
        id: Option<LessonId>,
        answers: Vec<Option<usize>>,
    },
    Progress {
        lesson: LessonId,
        percent: ProgressPercent,
    },
    Continue,
}

#[derive(Debug, Default)]
struct Args {
    content: Option<String>,
    db_url: Option<String>,
}

impl Args {
    /// Consume a global flag; returns `false` when `arg` is not one.
    fn take_global(
        &mut self,
        arg: &str,
        args: &mut impl Iterator<Item = String>,
    ) -> Result<bool, ArgsError> {
        match arg {
            "--content" => self.content = Some(require_value(args, "--content")?),
            "--db" => {
                let value = require_value(args, "--db")?;
                if value.trim().is_empty() {
                    return Err(ArgsError::InvalidDbUrl { raw: value });
                }
                self.db_url = Some(normalize_sqlite_url(value));
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn config(&self) -> Result<CatalogConfig, services::ConfigError> {
        let content = self.content.clone().or_else(|| std::env::var(CONTENT_ENV).ok());
        let db_url = self
            .db_url
            .clone()
            .or_else(|| std::env::var(DB_URL_ENV).ok().map(normalize_sqlite_url));
        CatalogConfig::from_values(content.as_deref(), db_url.as_deref())
    }
}

fn parse_search(
    globals: &mut Args,
    args: &mut impl Iterator<Item = String>,
) -> Result<Command, ArgsError> {
    let mut search = SearchArgs::default();
    while let Some(arg) = args.next() {
        if globals.take_global(&arg, args)? {
            continue;
        }
        match arg.as_str() {
            "--query" | "-q" => search.query = require_value(args, "--query")?,
            "--category" => search.category = require_value(args, "--category")?,
            "--difficulty" => search.difficulty = require_value(args, "--difficulty")?,
            "--sort" => search.sort = require_value(args, "--sort")?,
            "--tag" => search.tags.push(require_value(args, "--tag")?),
            _ => return Err(ArgsError::UnknownArg(arg)),
        }
    }
    Ok(Command::Search(search))
}

/// Positional arguments of a command, with global flags consumed along the way.
fn collect_positionals(
    globals: &mut Args,
    args: &mut impl Iterator<Item = String>,
    mut on_flag: impl FnMut(&str, &mut dyn Iterator<Item = String>) -> Result<bool, ArgsError>,
) -> Result<Vec<String>, ArgsError> {
    let mut positionals = Vec::new();
    while let Some(arg) = args.next() {
        if globals.take_global(&arg, args)? {
            continue;
        }
        if arg.starts_with("--") {
            if on_flag(&arg, args)? {
                continue;
            }
            return Err(ArgsError::UnknownArg(arg));
        }
        positionals.push(arg);
    }
    Ok(positionals)
}

fn no_flags(_: &str, _: &mut dyn Iterator<Item = String>) -> Result<bool, ArgsError> {
    Ok(false)
}

fn parse_command(
    name: &str,
    globals: &mut Args,
    args: &mut impl Iterator<Item = String>,
) -> Result<Command, ArgsError> {
    match name {
        "search" => parse_search(globals, args),
        "course" => {
            let mut positionals = collect_positionals(globals, args, no_flags)?.into_iter();
            let id = positionals.next().map(|raw| raw.parse::<CourseId>()).transpose()?;
            reject_extra(positionals)?;
            Ok(Command::Course(id))
        }
        "lesson" => {
            let mut answers = Vec::new();
            let mut positionals =
                collect_positionals(globals, args, |flag, rest| match flag {
                    "--answer" => {
                        let raw = rest.next().ok_or(ArgsError::MissingValue { flag: "--answer" })?;
                        answers.push(parse_answer(raw)?);
                        Ok(true)
                    }
                    _ => Ok(false),
                })?
                .into_iter();
            let id = positionals.next().map(|raw| raw.parse::<LessonId>()).transpose()?;
            reject_extra(positionals)?;
            Ok(Command::Lesson { id, answers })
        }
        "progress" => {
            let mut positionals = collect_positionals(globals, args, no_flags)?.into_iter();
            let lesson = positionals
                .next()
                .ok_or(ArgsError::MissingArgument { name: "lesson-id" })?
                .parse::<LessonId>()?;
            let raw = positionals
                .next()
                .ok_or(ArgsError::MissingArgument { name: "percent" })?;
            let percent = raw
                .trim_end_matches('%')
                .parse::<i64>()
                .map_err(|_| ArgsError::InvalidPercent { raw: raw.clone() })?;
            reject_extra(positionals)?;
            Ok(Command::Progress {
                lesson,
                percent: ProgressPercent::new(percent),
            })
        }
        "continue" => {
            reject_extra(collect_positionals(globals, args, no_flags)?.into_iter())?;
            Ok(Command::Continue)
        }
        other => Err(ArgsError::UnknownArg(other.to_owned())),
    }
}

fn parse_answer(raw: String) -> Result<Option<usize>, ArgsError> {
    if raw == "-" {
        return Ok(None);
    }
    raw.parse()
        .map(Some)
        .map_err(|_| ArgsError::InvalidAnswer { raw })
}

fn reject_extra(mut rest: impl Iterator<Item = String>) -> Result<(), ArgsError> {
    match rest.next() {
        Some(extra) => Err(ArgsError::UnknownArg(extra)),
        None => Ok(()),
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    let trimmed = raw.trim().to_string();
    if trimmed.eq_ignore_ascii_case(MEMORY_BACKEND)
        || trimmed == "sqlite::memory:"
        || trimmed.starts_with("sqlite://")
        || trimmed.starts_with("sqlite:file:")
    {
        return trimmed;
    }

    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
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
    let Some(path) = db_url.strip_prefix("sqlite://") else {
        // memory backends and in-memory sqlite urls need no file
        return Ok(());
    };
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

//
// ─── COMMANDS ──────────────────────────────────────────────────────────────────
//

fn print_search(session: &BrowseSession, query: &str) {
    let results = session.run(query);
    println!("{}", results.count_label());
    for item in results.items() {
        let duration = format_duration(item.duration_minutes);
        println!("  [{}] {}  {}", item.thumbnail(), item.title, item.url);
        if duration.is_empty() {
            println!("       {}", item.meta_line());
        } else {
            println!("       {}  ({duration})", item.meta_line());
        }
    }
}

fn print_course(page: &CoursePage<'_>) {
    let course = page.course;
    println!("{}", course.title);
    println!("{} · {}", course.category, course.difficulty);
    if !course.description.is_empty() {
        println!("{}", course.description);
    }
    let duration = course
        .estimated_time
        .clone()
        .unwrap_or_else(|| format_duration(Some(course.duration_minutes())));
    println!("Estimated time: {duration}");
    println!("Created: {}", format_date(course.created_on()));
    if !course.outcomes.is_empty() {
        println!();
        println!("You will learn:");
        for outcome in &course.outcomes {
            println!("  - {outcome}");
        }
    }
    for module in &page.modules {
        println!();
        println!("{}", module.title);
        for lesson in &module.lessons {
            println!("  {}  lesson.html?id={}", lesson.title, lesson.id);
        }
    }
}

async fn print_lesson(
    page: &LessonPage<'_>,
    progress: &ProgressService,
    answers: &[Option<usize>],
) -> Result<(), Box<dyn std::error::Error>> {
    let lesson = page.lesson;
    let read = progress.progress(&lesson.id).await?;
    println!("{} / {}", page.course.title, page.module.title);
    println!("{}  ({read} read)", lesson.title);
    if !lesson.tldr.is_empty() {
        println!("TL;DR: {}", lesson.tldr);
    }

    if !page.toc.is_empty() {
        println!();
        println!("On this page:");
        for entry in &page.toc {
            println!("  #{}  {}", entry.anchor, entry.title);
        }
    }
    for section in &lesson.sections {
        println!();
        println!("## {}", section.title);
        println!("{}", section.body);
    }

    if lesson.has_quiz() {
        println!();
        println!("Quiz");
        let feedback = lesson.check_quiz(answers);
        for (question, feedback) in lesson.quiz.iter().zip(feedback) {
            println!("  {}", question.question);
            for (index, option) in question.options.iter().enumerate() {
                println!("    {index}) {option}");
            }
            let marker = if feedback.is_warning() { "!" } else { "✓" };
            println!("    {marker} {}", feedback.message());
        }
    }

    println!();
    if let Some(previous) = page.previous {
        println!("← {}", previous.title);
    }
    if let Some(next) = page.next {
        println!("→ {}", next.title);
    }
    if !page.related.is_empty() {
        let related: Vec<&str> = page.related.iter().map(|l| l.title.as_str()).collect();
        println!("Related: {}", related.join(", "));
    }
    for module in &page.sidebar {
        println!("[{}]", module.title);
        for link in &module.links {
            let marker = if link.active { "*" } else { " " };
            println!(" {marker} {}", link.lesson.title);
        }
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let mut globals = Args::default();

    let name = loop {
        match argv.next() {
            None => {
                print_usage();
                return Ok(());
            }
            Some(arg) if arg.starts_with('-') => {
                if !globals.take_global(&arg, &mut argv)? {
                    eprintln!("unknown argument: {arg}");
                    print_usage();
                    return Err(ArgsError::UnknownArg(arg).into());
                }
            }
            Some(name) => break name,
        }
    };

    let command = parse_command(&name, &mut globals, &mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let config = globals.config()?;
    debug!(?config, "resolved configuration");
    if let services::ProgressBackend::Sqlite(url) = &config.progress {
        prepare_sqlite_file(url)?;
    }
    let clock = Clock::default();
    let services = AppServices::new(&config, clock).await?;

    match command {
        Command::Search(args) => {
            let selection =
                FilterSelection::from_choices(&args.category, &args.difficulty, &args.tags, &args.sort)?;
            let mut session = services.catalog().browse().await?;
            session.set_selection(selection);
            println!("{}", Greeting::from_clock(&services.clock()));
            print_search(&session, &args.query);
        }
        Command::Course(id) => {
            let catalog = services.catalog().load().await?;
            print_course(&course_page(&catalog, id.as_ref())?);
        }
        Command::Lesson { id, answers } => {
            let catalog = services.catalog().load().await?;
            let page = lesson_page(&catalog, id.as_ref())?;
            print_lesson(&page, &services.progress(), &answers).await?;
        }
        Command::Progress { lesson, percent } => {
            services.progress().record(&lesson, percent).await?;
            println!("{lesson}: {percent}");
        }
        Command::Continue => match services.progress().continue_target().await? {
            Some(target) => println!("Continue where you left off: {target}"),
            None => println!("Nothing to continue yet."),
        },
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<(Command, Args), ArgsError> {
        let mut iter = args.iter().map(|s| (*s).to_owned());
        let name = iter.next().unwrap();
        let mut globals = Args::default();
        let command = parse_command(&name, &mut globals, &mut iter)?;
        Ok((command, globals))
    }

    #[test]
    fn search_flags_and_globals() {
        let (command, globals) = parse(&[
            "search", "--query", "pythn", "--tag", "python", "--tag", "basics", "--db", "memory",
            "--sort", "newest",
        ])
        .unwrap();
        let Command::Search(search) = command else {
            panic!("expected search");
        };
        assert_eq!(search.query, "pythn");
        assert_eq!(search.tags.len(), 2);
        assert_eq!(search.sort, "newest");
        assert_eq!(search.category, ALL);
        assert_eq!(globals.db_url.as_deref(), Some("memory"));
    }

    #[test]
    fn progress_requires_both_arguments() {
        assert!(matches!(
            parse(&["progress", "loops"]),
            Err(ArgsError::MissingArgument { name: "percent" })
        ));
        let (command, _) = parse(&["progress", "loops", "250"]).unwrap();
        let Command::Progress { percent, .. } = command else {
            panic!("expected progress");
        };
        assert_eq!(percent, ProgressPercent::COMPLETE);
    }

    #[test]
    fn lesson_answers_allow_blanks() {
        let (command, _) =
            parse(&["lesson", "loops", "--answer", "1", "--answer", "-"]).unwrap();
        let Command::Lesson { id, answers } = command else {
            panic!("expected lesson");
        };
        assert_eq!(id, Some(LessonId::new("loops")));
        assert_eq!(answers, vec![Some(1), None]);
    }

    #[test]
    fn blank_ids_are_rejected() {
        assert!(matches!(parse(&["lesson", "  "]), Err(ArgsError::InvalidId(_))));
        assert!(matches!(parse(&["progress", "", "10"]), Err(ArgsError::InvalidId(_))));
        let (command, _) = parse(&["course", " rust "]).unwrap();
        let Command::Course(id) = command else {
            panic!("expected course");
        };
        assert_eq!(id, Some(CourseId::new("rust")));
    }

    #[test]
    fn unknown_flags_and_extra_positionals_fail() {
        assert!(matches!(parse(&["course", "--nope"]), Err(ArgsError::UnknownArg(_))));
        assert!(matches!(parse(&["continue", "x"]), Err(ArgsError::UnknownArg(_))));
    }

    #[test]
    fn sqlite_urls_are_normalized() {
        assert_eq!(normalize_sqlite_url("memory".into()), "memory");
        assert_eq!(normalize_sqlite_url("sqlite:///tmp/a.db".into()), "sqlite:///tmp/a.db");
        assert_eq!(normalize_sqlite_url("sqlite:/tmp/b.db".into()), "sqlite:///tmp/b.db");
    }
}
