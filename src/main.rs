use clap::Parser;
use movie_query::core::ConfigProvider;
use movie_query::utils::error::ErrorSeverity;
use movie_query::utils::monitor::SystemMonitor;
use movie_query::utils::{logger, validation::Validate};
use movie_query::{
    CliConfig, DatasetLoader, LocalStorage, QueryEngine, QueryError, QuerySession, SessionSummary,
    TomlConfig,
};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

fn main() {
    let args = CliConfig::parse();

    // TOML 有寫的欄位覆蓋命令列的值，其餘沿用命令列
    let toml = match &args.config {
        Some(path) => match TomlConfig::from_file(path) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => None,
    };

    match toml.as_ref().and_then(|t| t.log_level()) {
        Some(level) if !args.verbose => logger::init_with_level(level),
        _ => logger::init_cli_logger(args.verbose),
    }

    tracing::info!("🚀 Starting movie-query");
    if args.verbose {
        tracing::debug!("CLI config: {:?}", args);
    }

    let result = match toml {
        Some(toml) => toml
            .validate()
            .and_then(|_| run(args.clone().with_toml(&toml))),
        None => run(args),
    };

    match result {
        Ok(summary) => {
            tracing::info!(
                "✅ Session finished: {} executed, {} failed",
                summary.executed,
                summary.failed
            );
        }
        Err(e) => {
            tracing::error!(
                "❌ Session failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }
}

fn run(config: CliConfig) -> Result<SessionSummary, QueryError> {
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        return Err(e);
    }

    let monitor = SystemMonitor::new(config.monitor);
    if monitor.is_enabled() {
        tracing::info!("🔍 System monitoring enabled");
    }

    let min_top_votes = config.min_top_votes();
    let queries = config.queries.clone();
    let storage = LocalStorage::new(config.data_dir().to_string());
    let loader = DatasetLoader::new(storage, config);
    let dataset = loader.load()?;
    monitor.log_load(&dataset.report);

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "\nTotal movies: {}", dataset.report.titles)?;
    writeln!(stdout, "Total ratings: {}\n", dataset.report.ratings)?;

    let engine =
        QueryEngine::new(&dataset.titles, &dataset.ratings).with_min_top_votes(min_top_votes);
    let session = QuerySession::new(engine);

    let input: Box<dyn BufRead> = match &queries {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(io::stdin().lock()),
    };
    let summary = session.run(input, &mut stdout)?;
    stdout.flush()?;

    monitor.log_session(&summary);
    Ok(summary)
}
