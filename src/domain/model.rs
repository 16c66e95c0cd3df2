use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// 一筆 title.basics 記錄，載入後不再修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Title {
    pub tconst: String,
    pub title_type: String,
    pub primary_title: String,
    pub original_title: String,
    /// 未知時為 0
    pub start_year: i32,
    /// 未知時為 0
    pub runtime_minutes: u32,
    /// 以 ", " 串接，缺值時為 "None"
    pub genres: String,
}

/// 一筆 title.ratings 記錄，`tconst` 必定對應到已載入的 Title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub tconst: String,
    pub average: f64,
    pub votes: u64,
}

pub type TitleCollection = HashMap<String, Title>;
pub type RatingCollection = HashMap<String, Rating>;

/// 排名查詢的結果：一筆評分與其對應的作品
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit<'a> {
    pub rating: &'a Rating,
    pub title: &'a Title,
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Identifier: {}, Title: {}, Type: {}, Year: {}, Runtime: {}, Genres: {}",
            self.tconst,
            self.primary_title,
            self.title_type,
            self.start_year,
            self.runtime_minutes,
            self.genres
        )
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Debug 格式保留小數點 (8.0 而非 8)
        write!(
            f,
            "Identifier: {}, Rating: {:?}, Votes: {}",
            self.tconst, self.average, self.votes
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_display() {
        let title = Title {
            tconst: "tt0111161".to_string(),
            title_type: "movie".to_string(),
            primary_title: "The Shawshank Redemption".to_string(),
            original_title: "The Shawshank Redemption".to_string(),
            start_year: 1994,
            runtime_minutes: 142,
            genres: "Drama".to_string(),
        };

        assert_eq!(
            title.to_string(),
            "Identifier: tt0111161, Title: The Shawshank Redemption, Type: movie, Year: 1994, Runtime: 142, Genres: Drama"
        );
    }

    #[test]
    fn test_rating_display_keeps_fraction() {
        let rating = Rating {
            tconst: "tt0000001".to_string(),
            average: 8.0,
            votes: 1500,
        };
        assert_eq!(
            rating.to_string(),
            "Identifier: tt0000001, Rating: 8.0, Votes: 1500"
        );
    }
}
