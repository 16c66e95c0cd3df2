use crate::utils::error::Result;
use std::io::Read;

pub trait Storage {
    /// 開啟資料檔供逐行讀取，`path` 相對於儲存位置
    fn open(&self, path: &str) -> Result<Box<dyn Read>>;
}

pub trait ConfigProvider {
    fn data_dir(&self) -> &str;
    fn basics_file(&self) -> String;
    fn ratings_file(&self) -> String;
    fn include_adult(&self) -> bool;
    fn min_top_votes(&self) -> u64;
}
