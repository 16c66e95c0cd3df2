pub mod bounded;
pub mod dispatch;
pub mod keys;
pub mod loader;
pub mod query;
pub mod session;

pub use crate::domain::model::{Hit, Rating, RatingCollection, Title, TitleCollection};
pub use crate::domain::ports::{ConfigProvider, Storage};
pub use crate::utils::error::Result;
