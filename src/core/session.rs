use crate::core::dispatch::{dispatch, Query};
use crate::core::query::QueryEngine;
use crate::utils::error::Result;
use std::io::{BufRead, Write};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub executed: usize,
    pub failed: usize,
    pub elapsed: Duration,
}

/// 逐行讀取查詢、執行並輸出結果
pub struct QuerySession<'a> {
    engine: QueryEngine<'a>,
}

impl<'a> QuerySession<'a> {
    pub fn new(engine: QueryEngine<'a>) -> Self {
        Self { engine }
    }

    pub fn run<R: BufRead, W: Write>(&self, input: R, out: &mut W) -> Result<SessionSummary> {
        let start = Instant::now();
        let mut summary = SessionSummary::default();

        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if self.execute_line(line, out)? {
                summary.executed += 1;
            } else {
                summary.failed += 1;
            }
        }

        summary.elapsed = start.elapsed();
        tracing::info!(
            "✅ Processed {} queries ({} failed) in {:?}",
            summary.executed + summary.failed,
            summary.failed,
            summary.elapsed
        );
        Ok(summary)
    }

    /// 執行一行查詢。查詢本身的錯誤會輸出後回傳 `Ok(false)`，
    /// 只有無法繼續的錯誤才回傳 `Err`。
    pub fn execute_line<W: Write>(&self, line: &str, out: &mut W) -> Result<bool> {
        let parsed = Query::parse(line);
        let start = Instant::now();

        let succeeded = match parsed {
            Ok(query) => {
                writeln!(out, "processing: {}", query)?;
                match dispatch(&self.engine, &query) {
                    Ok(output) => {
                        write!(out, "{}", output)?;
                        true
                    }
                    Err(e) if e.is_recoverable() => {
                        writeln!(out, "\t{}", e)?;
                        false
                    }
                    Err(e) => {
                        tracing::error!("❌ Query '{}' failed: {}", query, e);
                        return Err(e);
                    }
                }
            }
            Err(e) => {
                tracing::warn!("Skipping query '{}': {}", line, e);
                writeln!(out, "{}", e)?;
                false
            }
        };

        let elapsed = start.elapsed();
        tracing::debug!("Query finished in {:?}", elapsed);
        writeln!(out, "elapsed time (s): {}\n", elapsed.as_secs_f64())?;
        Ok(succeeded)
    }
}
