mod agenda;
mod app;
mod calendar;
mod content;
mod help;
mod jumpto;
mod summary;
mod theme;
use crate::agenda::write_agenda;
use crate::app::App;
use crate::calendar::{MonthPager, YearMonth};
use crate::content::{load_items, retain_workspace, PlatformFilter};
use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::error::Error;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use time::{macros::format_description, Date, OffsetDateTime};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives
static LOG_ENV: &str = "CONTENTCAL_LOG";

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(RunOptions),
    Help,
    Version,
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct RunOptions {
    file: PathBuf,
    month: Option<YearMonth>,
    filter: PlatformFilter,
    workspace: Option<String>,
    print: bool,
    log_file: Option<PathBuf>,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut file = None;
        let mut month = None;
        let mut filter = PlatformFilter::All;
        let mut workspace = None;
        let mut print = false;
        let mut log_file = None;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('p') | Arg::Long("platform") => {
                    let value = parser.value()?.string()?;
                    filter = PlatformFilter::from(Some(value.as_str()));
                }
                Arg::Short('w') | Arg::Long("workspace") => {
                    workspace = Some(parser.value()?.string()?);
                }
                Arg::Long("print") => print = true,
                Arg::Long("log-file") => log_file = Some(PathBuf::from(parser.value()?)),
                Arg::Value(value) if file.is_none() => file = Some(PathBuf::from(value)),
                Arg::Value(value) if month.is_none() => {
                    let value = value.string()?;
                    match parse_month(&value) {
                        Ok(ym) => month = Some(ym),
                        Err(e) => {
                            return Err(lexopt::Error::ParsingFailed { value, error: e })
                        }
                    }
                }
                _ => return Err(arg.unexpected()),
            }
        }
        let Some(file) = file else {
            return Err(lexopt::Error::from("no content file given"));
        };
        Ok(Command::Run(RunOptions {
            file,
            month,
            filter,
            workspace,
            print,
            log_file,
        }))
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(opts) => opts.run(),
            Command::Help => {
                println!("Usage: contentcal [OPTIONS] <FILE> [YYYY-MM]");
                println!();
                println!("Terminal content calendar for media-planning workspaces");
                println!();
                println!("Options:");
                println!("  -p, --platform <NAME>   Only show content for the given platform");
                println!("  -w, --workspace <ID>    Only show content from the given workspace");
                println!("      --print             Print the month's agenda and exit");
                println!("      --log-file <PATH>   Write diagnostic logs to the given file");
                println!("  -h, --help              Display this help message and exit");
                println!("  -V, --version           Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

impl RunOptions {
    fn run(self) -> anyhow::Result<()> {
        // Must happen before anything could spawn a thread
        let today = OffsetDateTime::now_local()
            .context("failed to determine local date")?
            .date();
        init_logging(self.print, self.log_file.as_deref())?;
        let mut items = load_items(&self.file)?;
        if let Some(workspace) = self.workspace.as_deref() {
            retain_workspace(&mut items, workspace);
        }
        let month = self.month.unwrap_or_else(|| YearMonth::containing(today));
        let pager = MonthPager::new(today, month, items, self.filter)
            .with_context(|| format!("failed to lay out calendar for {month}"))?;
        if self.print {
            let mut out = io::stdout().lock();
            write_agenda(&mut out, pager.grid(), &pager.summary(), pager.filter())
                .and_then(|()| out.flush())
                .context("failed to write agenda")?;
            Ok(())
        } else {
            with_terminal(|mut terminal| {
                terminal.hide_cursor().context("failed to hide cursor")?;
                App::new(pager).run(terminal)?;
                Ok(())
            })
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn parse_month(s: &str) -> Result<YearMonth, Box<dyn Error + Send + Sync>> {
    let date = Date::parse(&format!("{s}-01"), format_description!("[year]-[month]-[day]"))?;
    Ok(YearMonth::new(date.year(), date.month())?)
}

// The terminal belongs to the calendar, so interactive sessions only log when
// given a file to log to.
fn init_logging(print: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            subscriber
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None if print => subscriber.with_writer(io::stderr).try_init(),
        None => return Ok(()),
    }
    .map_err(|e| anyhow::anyhow!(e))
    .context("failed to initialize logging")
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}
