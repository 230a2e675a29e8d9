// CounselDesk - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Config loading and logging initialisation (debug mode support)
// 3. Data source selection and loading
// 4. Dispatch to the write / history / summary / scholarships / settings views

use clap::{Parser, Subcommand};
use counseldesk::app::cache::SheetCache;
use counseldesk::app::journal::{NewSession, SaveOutcome};
use counseldesk::app::source::{self, DataSource};
use counseldesk::app::state::{Dashboard, HistoryView, ScholarshipView, SummaryView};
use counseldesk::core::export::{self, ExportFormat};
use counseldesk::core::model::{CounselLog, Location, SCHOLARSHIP_DISPLAY_COLUMNS};
use counseldesk::core::render;
use counseldesk::platform::config::{self, AppConfig, PlatformPaths};
use counseldesk::util::constants;
use counseldesk::util::error::{CounselDeskError, ExportError, Result};
use counseldesk::util::logging;
use std::io::Write;
use std::path::{Path, PathBuf};

/// CounselDesk - counseling journal and scholarship finder for school counselors.
///
/// Reads the student roster, counseling journal, and scholarship list from a
/// published Google Sheet or a directory of CSV files.
#[derive(Parser, Debug)]
#[command(name = "counseldesk", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Read students.csv, logs.csv and scholarships.csv from this directory
    /// instead of the spreadsheet. Enables saving new sessions.
    #[arg(short = 's', long = "source-dir", global = true)]
    source_dir: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,

    /// Ignore cached sheet exports and fetch again.
    #[arg(long = "refresh", global = true)]
    refresh: bool,

    /// Config file to use instead of the platform default.
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a counseling session.
    Write {
        /// Student name as it appears on the roster.
        #[arg(short = 'n', long)]
        name: String,

        /// Location: 교무실, 상담실1 or 상담실2.
        #[arg(short = 'l', long)]
        location: String,

        /// Session notes.
        #[arg(long)]
        content: String,

        /// File name of a recording to note with the session.
        #[arg(long)]
        audio: Option<String>,
    },

    /// Show a student's sessions and note keywords.
    History {
        #[arg(short = 'n', long)]
        name: String,

        /// Print keyword chips as HTML.
        #[arg(long)]
        html: bool,

        /// Export the sessions to a .csv or .json file.
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Keyword summary of one month.
    Summary {
        /// Year (default: newest year with sessions).
        #[arg(long)]
        year: Option<i32>,

        /// Month 1-12 (default: current month).
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,

        /// Print keyword chips as HTML.
        #[arg(long)]
        html: bool,
    },

    /// Scholarships with an estimated annual maximum of at least N 만원.
    Scholarships {
        #[arg(
            short = 'm',
            long = "min-amount",
            default_value_t = 0,
            value_parser = clap::value_parser!(u64).range(0..=constants::MAX_MIN_AMOUNT)
        )]
        min_amount: u64,

        /// Export the matching scholarships to a .csv or .json file.
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Show the data source and effective settings.
    Settings,
}

fn main() {
    let cli = Cli::parse();
    let paths = PlatformPaths::resolve();

    // Config is read before logging so its level can apply; its warnings are
    // reported once the subscriber is installed.
    let loaded = match &cli.config {
        Some(path) => config::load_config_strict(path),
        None => Ok(config::load_config(&paths.config_file())),
    };
    let (app_config, config_warnings) = match loaded {
        Ok(loaded) => loaded,
        Err(e) => {
            logging::init(cli.debug, None);
            eprintln!("Error: {}", CounselDeskError::from(e));
            std::process::exit(1);
        }
    };

    logging::init(cli.debug, app_config.log_level.as_deref());
    tracing::info!(
        version = constants::APP_VERSION,
        debug = cli.debug,
        "CounselDesk starting"
    );
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
        eprintln!("Warning: {warning}");
    }

    let source = DataSource::from_config(&app_config, cli.source_dir.as_deref());
    if let Err(e) = run(&cli, &paths, app_config, &source) {
        tracing::error!(error = %e, "Command failed");
        eprintln!("Error: {e}");
        if let (CounselDeskError::Source(_), DataSource::Sheet(ids)) = (&e, &source) {
            eprintln!("{}", source::sheet_troubleshooting(ids));
        }
        std::process::exit(1);
    }
}

fn run(cli: &Cli, paths: &PlatformPaths, app_config: AppConfig, source: &DataSource) -> Result<()> {
    if let Command::Settings = cli.command {
        print_settings(cli, paths, &app_config, source);
        return Ok(());
    }

    let cache = match source {
        DataSource::Sheet(_) => {
            let cache = SheetCache::new(paths.cache_dir(), app_config.cache_ttl_secs);
            if cli.refresh {
                cache.clear();
            }
            Some(cache)
        }
        DataSource::Local { .. } => None,
    };

    let mut dash = Dashboard::load(app_config, source.clone(), cache)?;
    for warning in &dash.data.warnings {
        eprintln!("Warning: {warning}");
    }

    match &cli.command {
        Command::Write {
            name,
            location,
            content,
            audio,
        } => {
            let session = NewSession {
                student_name: name.clone(),
                location: location.clone(),
                content: content.clone(),
                audio_file_name: audio.clone(),
            };
            let now = chrono::Local::now().naive_local();
            match dash.record(&session, now)? {
                SaveOutcome::Saved(log) => {
                    println!("Saved session to {}.\n", source.describe());
                    print!("{}", log_block(&log));
                }
                SaveOutcome::Preview(log) => {
                    println!(
                        "The spreadsheet source is read-only; nothing was saved. \
                         Use --source-dir to record sessions locally.\n"
                    );
                    print!("{}", log_block(&log));
                }
            }
        }
        Command::History { name, html, export } => {
            let view = dash.history(name)?;
            print_history(&view, *html);
            if let Some(path) = export {
                let count = export_history(&view, path)?;
                println!("\nExported {count} sessions to {}", path.display());
            }
        }
        Command::Summary { year, month, html } => {
            let today = chrono::Local::now().date_naive();
            let view = dash.summary(*year, *month, today)?;
            print_summary(&view, *html);
        }
        Command::Scholarships { min_amount, export } => {
            let view = dash.scholarships(*min_amount)?;
            print_scholarships(&view);
            if let Some(path) = export {
                let count = export_scholarships(&view, path)?;
                println!("\nExported {count} scholarships to {}", path.display());
            }
        }
        Command::Settings => {}
    }
    Ok(())
}

// =============================================================================
// Output
// =============================================================================

fn log_block(log: &CounselLog) -> String {
    let mut fields = vec![
        ("타임스탬프", log.timestamp_raw.as_str()),
        ("장소", log.location.as_str()),
        ("이름", log.name.as_str()),
        ("상담내용", log.content.as_str()),
    ];
    if !log.audio.is_empty() {
        fields.push(("녹음파일", log.audio.as_str()));
    }
    render::record_block(&fields)
}

fn print_keywords(items: &[(String, usize)], html: bool) {
    if items.is_empty() {
        println!("(no keywords)");
    } else if html {
        println!("{}", render::chips_html(items));
    } else {
        println!("{}", render::chips_text(items));
    }
}

fn print_history(view: &HistoryView<'_>, html: bool) {
    let s = view.student;
    print!(
        "{}",
        render::record_block(&[
            ("이름", s.name.as_str()),
            ("학년", s.grade.as_str()),
            ("반", s.class.as_str()),
            ("번호", s.number.as_str()),
        ])
    );

    println!("\n== 상담 기록 ({}) ==", view.logs.len());
    if view.logs.is_empty() {
        println!("No sessions recorded.");
    }
    for log in &view.logs {
        println!();
        print!("{}", log_block(log));
    }

    println!("\n== 키워드 ==");
    print_keywords(&view.keywords, html);
}

fn print_summary(view: &SummaryView<'_>, html: bool) {
    let years = view
        .years
        .iter()
        .map(|y| y.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    println!(
        "{}-{:02}: {} sessions (years with data: {})",
        view.year,
        view.month,
        view.logs.len(),
        if years.is_empty() { "none".to_string() } else { years }
    );

    if view.keywords.is_empty() {
        println!("\nNo notes for this month.");
        return;
    }
    println!();
    print!("{}", render::bar_chart(view.chart_items(), constants::BAR_CHART_WIDTH));
    println!("\n== 주요 키워드 ==");
    print_keywords(view.chip_items(), html);
}

fn print_scholarships(view: &ScholarshipView<'_>) {
    println!(
        "{} scholarships with an annual maximum of at least {}만원",
        view.matches.len(),
        view.min_amount
    );
    for s in &view.matches {
        let row = s.to_row();
        let fields: Vec<(&str, &str)> = SCHOLARSHIP_DISPLAY_COLUMNS
            .iter()
            .copied()
            .zip(row.iter().map(String::as_str))
            .collect();
        println!();
        print!("{}", render::record_block(&fields));
    }
}

fn print_settings(cli: &Cli, paths: &PlatformPaths, config: &AppConfig, source: &DataSource) {
    let config_file = cli.config.clone().unwrap_or_else(|| paths.config_file());
    println!("{} v{}", constants::APP_NAME, constants::APP_VERSION);
    println!("Config file     : {}", config_file.display());
    println!("Data source     : {}", source.describe());
    match source {
        DataSource::Sheet(ids) => {
            for kind in source::TableKind::all() {
                println!(
                    "  {:<12} gid {:<12} {}",
                    kind.label(),
                    kind.gid(ids),
                    source::csv_url(&ids.spreadsheet_id, kind.gid(ids))
                );
            }
            println!("Cache           : {} (ttl {} s)", paths.cache_dir().display(), config.cache_ttl_secs);
        }
        DataSource::Local { dir } => {
            for kind in source::TableKind::all() {
                println!("  {:<12} {}", kind.label(), dir.join(kind.local_file()).display());
            }
        }
    }
    println!(
        "Saving sessions : {}",
        if source.is_writable() {
            "enabled"
        } else {
            "read-only (use --source-dir to record locally)"
        }
    );
    let locations = Location::all()
        .iter()
        .map(|l| l.label())
        .collect::<Vec<_>>()
        .join(", ");
    println!("Locations       : {locations}");
    println!(
        "Keywords        : history top {}, summary top {}",
        config.history_top_k, config.summary_top_k
    );
}

// =============================================================================
// Export
// =============================================================================

fn create_export_file(path: &Path) -> std::result::Result<std::io::BufWriter<std::fs::File>, ExportError> {
    std::fs::File::create(path)
        .map(std::io::BufWriter::new)
        .map_err(|e| ExportError::Io {
            path: path.to_path_buf(),
            source: e,
        })
}

fn finish_export(mut out: std::io::BufWriter<std::fs::File>, path: &Path) -> std::result::Result<(), ExportError> {
    out.flush().map_err(|e| ExportError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

fn export_history(view: &HistoryView<'_>, path: &Path) -> Result<usize> {
    let format = ExportFormat::from_path(path)?;
    let mut out = create_export_file(path)?;
    let count = match format {
        ExportFormat::Csv => export::export_logs_csv(&view.logs, &mut out, path)?,
        ExportFormat::Json => export::export_json(&view.logs, &mut out, path)?,
    };
    finish_export(out, path)?;
    tracing::info!(count, path = %path.display(), "History exported");
    Ok(count)
}

fn export_scholarships(view: &ScholarshipView<'_>, path: &Path) -> Result<usize> {
    let format = ExportFormat::from_path(path)?;
    let mut out = create_export_file(path)?;
    let count = match format {
        ExportFormat::Csv => export::export_scholarships_csv(&view.matches, &mut out, path)?,
        ExportFormat::Json => export::export_json(&view.matches, &mut out, path)?,
    };
    finish_export(out, path)?;
    tracing::info!(count, path = %path.display(), "Scholarships exported");
    Ok(count)
}
