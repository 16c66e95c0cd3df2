//! 各查詢輸出順序所用的排序 key。
//!
//! 所有 key 都依遞增排序，需要「由大到小」的數值欄位取負值，最後一律以
//! primary title 遞增作為平手時的依據。

use crate::domain::model::{Hit, Title};

/// YEAR_AND_GENRE：primary title 遞增
pub fn year_and_genre_key<'a>(title: &&'a Title) -> &'a str {
    let title: &'a Title = *title;
    &title.primary_title
}

/// RUNTIME：片長遞減，再依 primary title
pub fn runtime_key<'a>(title: &&'a Title) -> (i64, &'a str) {
    let title: &'a Title = *title;
    (-i64::from(title.runtime_minutes), &title.primary_title)
}

/// MOST_VOTES：票數遞減，再依 primary title
pub fn most_votes_key<'a>(hit: &Hit<'a>) -> (i64, &'a str) {
    let title: &'a Title = hit.title;
    (-votes(hit), &title.primary_title)
}

/// TOP：平均分數遞減、票數遞減，再依 primary title
pub fn top_key<'a>(hit: &Hit<'a>) -> (f64, i64, &'a str) {
    let title: &'a Title = hit.title;
    (-hit.rating.average, -votes(hit), &title.primary_title)
}

fn votes(hit: &Hit<'_>) -> i64 {
    i64::try_from(hit.rating.votes).unwrap_or(i64::MAX)
}
