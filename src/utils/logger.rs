use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init_cli_logger(verbose: bool) {
    init_with_default(if verbose {
        "movie_query=debug,info"
    } else {
        "movie_query=info"
    });
}

/// 使用 TOML `[monitoring] log_level` 指定的層級
pub fn init_with_level(level: &str) {
    init_with_default(&format!("movie_query={}", level));
}

fn init_with_default(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    // 查詢結果寫到 stdout，日誌寫到 stderr
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}
