use crate::core::query::{QueryEngine, QueryOutput};
use crate::utils::error::{QueryError, Result};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    Lookup,
    Contains,
    YearAndGenre,
    Runtime,
    MostVotes,
    Top,
}

impl QueryKind {
    pub const ALL: [QueryKind; 6] = [
        QueryKind::Lookup,
        QueryKind::Contains,
        QueryKind::YearAndGenre,
        QueryKind::Runtime,
        QueryKind::MostVotes,
        QueryKind::Top,
    ];

    pub fn from_command(command: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.command() == command)
    }

    pub fn command(self) -> &'static str {
        match self {
            QueryKind::Lookup => "LOOKUP",
            QueryKind::Contains => "CONTAINS",
            QueryKind::YearAndGenre => "YEAR_AND_GENRE",
            QueryKind::Runtime => "RUNTIME",
            QueryKind::MostVotes => "MOST_VOTES",
            QueryKind::Top => "TOP",
        }
    }
}

/// 一行查詢解析後的結果，參數都已轉成正確型別
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Lookup {
        tconst: String,
    },
    Contains {
        title_type: String,
        words: String,
    },
    YearAndGenre {
        title_type: String,
        year: i32,
        genre: String,
    },
    Runtime {
        title_type: String,
        min_minutes: i64,
        max_minutes: i64,
    },
    MostVotes {
        title_type: String,
        limit: usize,
    },
    Top {
        title_type: String,
        limit: usize,
        start_year: i32,
        end_year: i32,
    },
}

/// 依單一空白切出的參數；多餘的參數會被忽略
struct Args<'l> {
    command: &'l str,
    tokens: std::str::Split<'l, char>,
}

impl<'l> Args<'l> {
    fn next_str(&mut self, name: &str) -> Result<&'l str> {
        self.tokens
            .next()
            .ok_or_else(|| QueryError::MissingArgument {
                command: self.command.to_string(),
                name: name.to_string(),
            })
    }

    fn next_parsed<T>(&mut self, name: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        let raw = self.next_str(name)?;
        raw.parse().map_err(|e: T::Err| QueryError::InvalidArgument {
            command: self.command.to_string(),
            name: name.to_string(),
            value: raw.to_string(),
            reason: e.to_string(),
        })
    }

    /// 剩下的所有 token 以空白重新串回，CONTAINS 的字詞可能含空白。
    /// 沒有剩下 token 時為空字串，空字串是每個標題的子字串。
    fn rest(&mut self) -> String {
        self.tokens.by_ref().collect::<Vec<_>>().join(" ")
    }
}

impl Query {
    pub fn parse(line: &str) -> Result<Self> {
        let mut tokens = line.split(' ');
        let command = tokens.next().unwrap_or_default();
        let kind = QueryKind::from_command(command).ok_or_else(|| QueryError::UnknownQuery {
            command: command.to_string(),
        })?;
        let mut args = Args { command, tokens };

        let query = match kind {
            QueryKind::Lookup => Query::Lookup {
                tconst: args.next_str("id")?.to_string(),
            },
            QueryKind::Contains => Query::Contains {
                title_type: args.next_str("type")?.to_string(),
                words: args.rest(),
            },
            QueryKind::YearAndGenre => Query::YearAndGenre {
                title_type: args.next_str("type")?.to_string(),
                year: args.next_parsed("year")?,
                genre: args.next_str("genre")?.to_string(),
            },
            QueryKind::Runtime => Query::Runtime {
                title_type: args.next_str("type")?.to_string(),
                min_minutes: args.next_parsed("minMinutes")?,
                max_minutes: args.next_parsed("maxMinutes")?,
            },
            QueryKind::MostVotes => Query::MostVotes {
                title_type: args.next_str("type")?.to_string(),
                limit: args.next_parsed("n")?,
            },
            QueryKind::Top => Query::Top {
                title_type: args.next_str("type")?.to_string(),
                limit: args.next_parsed("n")?,
                start_year: args.next_parsed("startYear")?,
                end_year: args.next_parsed("endYear")?,
            },
        };
        Ok(query)
    }

    pub fn kind(&self) -> QueryKind {
        match self {
            Query::Lookup { .. } => QueryKind::Lookup,
            Query::Contains { .. } => QueryKind::Contains,
            Query::YearAndGenre { .. } => QueryKind::YearAndGenre,
            Query::Runtime { .. } => QueryKind::Runtime,
            Query::MostVotes { .. } => QueryKind::MostVotes,
            Query::Top { .. } => QueryKind::Top,
        }
    }
}

impl FromStr for Query {
    type Err = QueryError;

    fn from_str(line: &str) -> Result<Self> {
        Query::parse(line)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind().command())?;
        match self {
            Query::Lookup { tconst } => write!(f, " {}", tconst),
            Query::Contains { title_type, words } => write!(f, " {} {}", title_type, words),
            Query::YearAndGenre {
                title_type,
                year,
                genre,
            } => write!(f, " {} {} {}", title_type, year, genre),
            Query::Runtime {
                title_type,
                min_minutes,
                max_minutes,
            } => write!(f, " {} {} {}", title_type, min_minutes, max_minutes),
            Query::MostVotes { title_type, limit } => write!(f, " {} {}", title_type, limit),
            Query::Top {
                title_type,
                limit,
                start_year,
                end_year,
            } => write!(
                f,
                " {} {} {} {}",
                title_type, limit, start_year, end_year
            ),
        }
    }
}

/// 把解析好的查詢交給對應的操作
pub fn dispatch<'a>(engine: &QueryEngine<'a>, query: &Query) -> Result<QueryOutput<'a>> {
    tracing::debug!("Dispatching {:?}", query.kind());
    match query {
        Query::Lookup { tconst } => Ok(engine.lookup(tconst)),
        Query::Contains { title_type, words } => Ok(engine.contains(title_type, words)),
        Query::YearAndGenre {
            title_type,
            year,
            genre,
        } => Ok(engine.year_and_genre(title_type, *year, genre)),
        Query::Runtime {
            title_type,
            min_minutes,
            max_minutes,
        } => Ok(engine.runtime(title_type, *min_minutes, *max_minutes)),
        Query::MostVotes { title_type, limit } => engine.most_votes(title_type, *limit),
        Query::Top {
            title_type,
            limit,
            start_year,
            end_year,
        } => engine.top(title_type, *limit, *start_year, *end_year),
    }
}
