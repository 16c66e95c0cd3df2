use crate::domain::model::{Rating, RatingCollection, Title, TitleCollection};
use crate::domain::ports::{ConfigProvider, Storage};
use crate::utils::error::{QueryError, Result};
use serde::Deserialize;
use std::str::FromStr;
use std::time::{Duration, Instant};

/// IMDb TSV 的空值標記
pub const NULL_MARKER: &str = "\\N";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BasicsRow {
    tconst: String,
    title_type: String,
    primary_title: String,
    original_title: String,
    is_adult: String,
    start_year: String,
    runtime_minutes: String,
    genres: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RatingsRow {
    tconst: String,
    average_rating: String,
    num_votes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub titles: usize,
    pub ratings: usize,
    pub skipped_titles: usize,
    pub skipped_ratings: usize,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub titles: TitleCollection,
    pub ratings: RatingCollection,
    pub report: LoadReport,
}

pub struct DatasetLoader<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> DatasetLoader<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    /// 先載入作品，再載入評分；評分只保留對應到已載入作品的記錄
    pub fn load(&self) -> Result<Dataset> {
        let start = Instant::now();

        let basics_path = self.config.basics_file();
        tracing::info!("📥 Reading {} into dict...", basics_path);
        let phase = Instant::now();
        let (titles, skipped_titles) = self.load_titles(&basics_path)?;
        tracing::info!("elapsed time (s): {:.6}", phase.elapsed().as_secs_f64());

        let ratings_path = self.config.ratings_file();
        tracing::info!("📥 Reading {} into dict...", ratings_path);
        let phase = Instant::now();
        let (ratings, skipped_ratings) = self.load_ratings(&ratings_path, &titles)?;
        tracing::info!("elapsed time (s): {:.6}", phase.elapsed().as_secs_f64());

        let report = LoadReport {
            titles: titles.len(),
            ratings: ratings.len(),
            skipped_titles,
            skipped_ratings,
            elapsed: start.elapsed(),
        };
        tracing::debug!("Load report: {:?}", report);

        Ok(Dataset {
            titles,
            ratings,
            report,
        })
    }

    pub fn load_titles(&self, path: &str) -> Result<(TitleCollection, usize)> {
        let mut reader = tsv_reader(self.storage.open(path)?);
        let headers = reader.headers()?.clone();
        let mut record = csv::StringRecord::new();
        let mut titles = TitleCollection::new();
        let mut skipped = 0;

        while reader.read_record(&mut record)? {
            let row: BasicsRow = record.deserialize(Some(&headers))?;
            if row.is_adult != "0" && !self.config.include_adult() {
                skipped += 1;
                continue;
            }
            let line = line_of(&record);
            let title = Title {
                start_year: parse_or_zero(&row.start_year, path, line, "startYear")?,
                runtime_minutes: parse_or_zero(&row.runtime_minutes, path, line, "runtimeMinutes")?,
                genres: join_genres(&row.genres),
                tconst: row.tconst,
                title_type: row.title_type,
                primary_title: row.primary_title,
                original_title: row.original_title,
            };
            // 重複的 id 直接覆蓋
            titles.insert(title.tconst.clone(), title);
        }

        Ok((titles, skipped))
    }

    pub fn load_ratings(
        &self,
        path: &str,
        titles: &TitleCollection,
    ) -> Result<(RatingCollection, usize)> {
        let mut reader = tsv_reader(self.storage.open(path)?);
        let headers = reader.headers()?.clone();
        let mut record = csv::StringRecord::new();
        let mut ratings = RatingCollection::new();
        let mut skipped = 0;

        while reader.read_record(&mut record)? {
            let row: RatingsRow = record.deserialize(Some(&headers))?;
            if !titles.contains_key(&row.tconst) {
                skipped += 1;
                continue;
            }
            let line = line_of(&record);
            let average: f64 = parse_field(&row.average_rating, path, line, "averageRating")?;
            if average.is_nan() {
                return Err(malformed(path, line, "averageRating is NaN"));
            }
            let rating = Rating {
                average,
                votes: parse_field(&row.num_votes, path, line, "numVotes")?,
                tconst: row.tconst,
            };
            ratings.insert(rating.tconst.clone(), rating);
        }

        Ok((ratings, skipped))
    }
}

fn tsv_reader<R: std::io::Read>(source: R) -> csv::Reader<R> {
    // IMDb 的 TSV 不使用引號，標題裡的 '"' 要原樣保留
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .quoting(false)
        .has_headers(true)
        .flexible(true)
        .from_reader(source)
}

fn line_of(record: &csv::StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or_default()
}

fn malformed(path: &str, line: u64, reason: impl Into<String>) -> QueryError {
    QueryError::MalformedRecord {
        file: path.to_string(),
        line,
        reason: reason.into(),
    }
}

fn parse_field<T>(raw: &str, path: &str, line: u64, column: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse()
        .map_err(|e: T::Err| malformed(path, line, format!("{} '{}': {}", column, raw, e)))
}

fn parse_or_zero<T>(raw: &str, path: &str, line: u64, column: &str) -> Result<T>
where
    T: FromStr + Default,
    T::Err: std::fmt::Display,
{
    if raw == NULL_MARKER {
        return Ok(T::default());
    }
    parse_field(raw, path, line, column)
}

/// "Drama,Romance" -> "Drama, Romance"，空值時為 "None"
pub fn join_genres(raw: &str) -> String {
    let joined = raw.split(',').collect::<Vec<_>>().join(", ");
    if joined == NULL_MARKER {
        "None".to_string()
    } else {
        joined
    }
}
