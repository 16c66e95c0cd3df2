use crate::core::bounded::BoundedSorted;
use crate::core::keys;
use crate::domain::model::{Hit, Rating, RatingCollection, Title, TitleCollection};
use crate::utils::error::{QueryError, Result};
use std::collections::BTreeMap;
use std::fmt;

/// TOP 只考慮票數至少這麼多的作品
pub const DEFAULT_MIN_TOP_VOTES: u64 = 1000;

/// 在兩個唯讀集合上執行六種查詢。所有查詢狀態都只存在於單次呼叫內。
#[derive(Debug, Clone, Copy)]
pub struct QueryEngine<'a> {
    titles: &'a TitleCollection,
    ratings: &'a RatingCollection,
    min_top_votes: u64,
}

/// 查詢結果，透過 `Display` 輸出成文字行
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutput<'a> {
    Lookup {
        title: Option<&'a Title>,
        rating: Option<&'a Rating>,
    },
    Titles(Vec<&'a Title>),
    MostVotes(Vec<Hit<'a>>),
    Top(BTreeMap<i32, Vec<Hit<'a>>>),
}

impl<'a> QueryEngine<'a> {
    pub fn new(titles: &'a TitleCollection, ratings: &'a RatingCollection) -> Self {
        Self {
            titles,
            ratings,
            min_top_votes: DEFAULT_MIN_TOP_VOTES,
        }
    }

    pub fn with_min_top_votes(mut self, min_top_votes: u64) -> Self {
        self.min_top_votes = min_top_votes;
        self
    }

    pub fn lookup(&self, tconst: &str) -> QueryOutput<'a> {
        QueryOutput::Lookup {
            title: self.titles.get(tconst),
            rating: self.ratings.get(tconst),
        }
    }

    /// 依掃描順序輸出，不排序
    pub fn contains(&self, title_type: &str, words: &str) -> QueryOutput<'a> {
        let matches = self
            .titles
            .values()
            .filter(|title| title.title_type == title_type && title.primary_title.contains(words))
            .collect();
        QueryOutput::Titles(matches)
    }

    pub fn year_and_genre(&self, title_type: &str, year: i32, genre: &str) -> QueryOutput<'a> {
        let mut matches: BoundedSorted<&'a Title, _, _> =
            BoundedSorted::unbounded(keys::year_and_genre_key);
        for title in self.titles.values() {
            if title.title_type == title_type
                && title.start_year == year
                && title.genres.contains(genre)
            {
                matches.insert(title);
            }
        }
        QueryOutput::Titles(matches.into_vec())
    }

    /// 上下限可以是負數，只是不會有作品落在負的長度
    pub fn runtime(&self, title_type: &str, min_minutes: i64, max_minutes: i64) -> QueryOutput<'a> {
        let mut matches: BoundedSorted<&'a Title, _, _> = BoundedSorted::unbounded(keys::runtime_key);
        for title in self.titles.values() {
            if title.title_type == title_type
                && (min_minutes..=max_minutes).contains(&i64::from(title.runtime_minutes))
            {
                matches.insert(title);
            }
        }
        QueryOutput::Titles(matches.into_vec())
    }

    pub fn most_votes(&self, title_type: &str, limit: usize) -> Result<QueryOutput<'a>> {
        let mut matches: BoundedSorted<Hit<'a>, _, _> =
            BoundedSorted::bounded(keys::most_votes_key, limit);
        for rating in self.ratings.values() {
            let title = self.resolve(rating)?;
            if title.title_type == title_type {
                matches.insert(Hit { rating, title });
            }
        }
        tracing::debug!("MOST_VOTES kept {} of limit {}", matches.len(), limit);
        Ok(QueryOutput::MostVotes(matches.into_vec()))
    }

    /// 每一年各自維護一個容量為 `limit` 的序列，範圍內沒有結果的年份也會輸出
    pub fn top(
        &self,
        title_type: &str,
        limit: usize,
        start_year: i32,
        end_year: i32,
    ) -> Result<QueryOutput<'a>> {
        let mut years: BTreeMap<i32, BoundedSorted<Hit<'a>, _, _>> = (start_year..=end_year)
            .map(|year| (year, BoundedSorted::bounded(keys::top_key, limit)))
            .collect();

        for rating in self.ratings.values() {
            if rating.votes < self.min_top_votes {
                continue;
            }
            let title = self.resolve(rating)?;
            if title.title_type != title_type {
                continue;
            }
            if let Some(matches) = years.get_mut(&title.start_year) {
                matches.insert(Hit { rating, title });
            }
        }

        Ok(QueryOutput::Top(
            years
                .into_iter()
                .map(|(year, matches)| (year, matches.into_vec()))
                .collect(),
        ))
    }

    fn resolve(&self, rating: &Rating) -> Result<&'a Title> {
        self.titles
            .get(&rating.tconst)
            .ok_or_else(|| QueryError::ReferentialIntegrity {
                id: rating.tconst.clone(),
            })
    }
}

impl QueryOutput<'_> {
    /// 沒有任何結果時為 true。LOOKUP 只有在作品與評分都找不到時才算空。
    pub fn is_empty(&self) -> bool {
        match self {
            QueryOutput::Lookup { title, rating } => title.is_none() && rating.is_none(),
            QueryOutput::Titles(titles) => titles.is_empty(),
            QueryOutput::MostVotes(hits) => hits.is_empty(),
            QueryOutput::Top(years) => years.values().all(Vec::is_empty),
        }
    }
}

const NO_MATCH: &str = "No match found!";

impl fmt::Display for QueryOutput<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryOutput::Lookup { title, rating } => {
                match title {
                    Some(title) => writeln!(f, "\tMOVIE: {}", title)?,
                    None => writeln!(f, "\tMovie not found!")?,
                }
                match rating {
                    Some(rating) => writeln!(f, "\tRATING: {}", rating),
                    None => writeln!(f, "\tRating not found!"),
                }
            }
            QueryOutput::Titles(titles) => {
                if titles.is_empty() {
                    return writeln!(f, "\t{}", NO_MATCH);
                }
                for title in titles {
                    writeln!(f, "\t{}", title)?;
                }
                Ok(())
            }
            QueryOutput::MostVotes(hits) => {
                if hits.is_empty() {
                    return writeln!(f, "\t{}", NO_MATCH);
                }
                for (rank, hit) in hits.iter().enumerate() {
                    writeln!(
                        f,
                        "\t{}. VOTES: {}, MOVIE: {}",
                        rank + 1,
                        hit.rating.votes,
                        hit.title
                    )?;
                }
                Ok(())
            }
            QueryOutput::Top(years) => {
                for (year, hits) in years {
                    writeln!(f, "\tYEAR: {}", year)?;
                    if hits.is_empty() {
                        writeln!(f, "\t\t{}", NO_MATCH)?;
                        continue;
                    }
                    for (rank, hit) in hits.iter().enumerate() {
                        writeln!(
                            f,
                            "\t\t{}. RATING: {:?}, VOTES: {}, MOVIE: {}",
                            rank + 1,
                            hit.rating.average,
                            hit.rating.votes,
                            hit.title
                        )?;
                    }
                }
                Ok(())
            }
        }
    }
}
