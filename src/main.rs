use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use hintgrid::{
    app::{Action, App},
    app_dirs::AppDirs,
    config::{ConfigStore, FileConfigStore},
    logging,
    report::{self, OutputFormat},
    runtime::{CrosstermEventSource, FixedTicker, GridEvent, Runner},
    thresholds::ThresholdTable,
    ui, Dashboard,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs,
    io::{self, stdin, stdout},
    ops::ControlFlow,
    path::PathBuf,
    process::ExitCode,
    time::Duration,
};

const TICK_RATE_MS: u64 = 250;

/// classify exercise statistics into hint, model-answer and difficulty indicators
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Reads an exercise statistics CSV export and lists, per diagnostic category, the exercises whose hint usage, error rates or comprehension metrics cross the thresholds of their difficulty tier."
)]
pub struct Cli {
    /// csv file to classify; omit or use "-" to read stdin
    file: Option<PathBuf>,

    /// output format (defaults to the grid on a terminal, table otherwise)
    #[clap(short = 'f', long, value_enum)]
    format: Option<OutputFormat>,

    /// json threshold table overriding the configured one
    #[clap(short = 't', long)]
    thresholds: Option<PathBuf>,

    /// reload the grid whenever the file changes on disk
    #[clap(short = 'w', long)]
    watch: bool,

    /// print the active threshold table as json and exit
    #[clap(long)]
    print_thresholds: bool,

    /// log verbosity: error, warn, info, debug or trace
    #[clap(long, default_value = "warn")]
    log_level: String,
}

impl Cli {
    /// The file argument, with "-" meaning stdin.
    fn source(&self) -> Option<PathBuf> {
        self.file.clone().filter(|path| path.as_os_str() != "-")
    }
}

fn main() -> Result<ExitCode, Box<dyn Error>> {
    let cli = Cli::parse();
    let level = logging::parse_level(&cli.log_level);

    let config = FileConfigStore::new().load();
    let format = cli.format.or(config.format).unwrap_or_else(|| {
        if stdout().is_tty() {
            OutputFormat::Tui
        } else {
            OutputFormat::Table
        }
    });

    match (format, AppDirs::log_path()) {
        (OutputFormat::Tui, Some(path)) => logging::init_file(level, &path),
        _ => logging::init_stderr(level),
    }
    tracing::debug!("hintgrid v{} starting", env!("CARGO_PKG_VERSION"));

    let table = match &cli.thresholds {
        Some(path) => ThresholdTable::from_path(path)
            .map_err(|err| format!("could not load thresholds from {}: {err}", path.display()))?,
        None => config.thresholds,
    };

    if cli.print_thresholds {
        println!("{}", table.to_json_pretty()?);
        return Ok(ExitCode::SUCCESS);
    }

    match format {
        OutputFormat::Tui => run_grid(&cli, table),
        OutputFormat::Table | OutputFormat::Json => run_headless(&cli, table, format),
    }
}

fn run_headless(
    cli: &Cli,
    table: ThresholdTable,
    format: OutputFormat,
) -> Result<ExitCode, Box<dyn Error>> {
    let text = match cli.source() {
        Some(path) => fs::read_to_string(&path)
            .map_err(|err| format!("could not read {}: {err}", path.display()))?,
        None => io::read_to_string(stdin())?,
    };

    let mut dashboard = Dashboard::new(table);
    let failed = dashboard.upload(&text).is_err();

    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report::render_json(
                dashboard.classification(),
                dashboard.status()
            ))?
        ),
        _ => print!(
            "{}",
            report::render_table(dashboard.classification(), dashboard.status())
        ),
    }

    Ok(if failed {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    })
}

fn run_grid(cli: &Cli, table: ThresholdTable) -> Result<ExitCode, Box<dyn Error>> {
    let Some(source) = cli.source() else {
        let mut cmd = Cli::command();
        cmd.error(
            ErrorKind::MissingRequiredArgument,
            "the grid needs a FILE to read; pipe input with --format table or json",
        )
        .exit();
    };

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let mut app = App::new(table, Some(source), cli.watch);
    app.reload();

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result.map(|_| ExitCode::SUCCESS)
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    terminal.draw(|f| ui::render(app, f))?;

    runner.run(|event| -> Result<ControlFlow<()>, Box<dyn Error>> {
        let action = match event {
            GridEvent::Tick => app.on_tick(),
            GridEvent::Resize => Action::Redraw,
            GridEvent::Key(key) => app.on_key(key),
        };

        match action {
            Action::Quit => return Ok(ControlFlow::Break(())),
            Action::Redraw => {
                terminal.draw(|f| ui::render(&*app, f))?;
            }
            Action::Continue => {}
        }
        Ok(ControlFlow::Continue(()))
    })
}
