use crate::core::Storage;
use crate::utils::error::Result;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    fn open(&self, path: &str) -> Result<Box<dyn Read>> {
        let full_path = Path::new(&self.base_path).join(path);
        tracing::debug!("Opening {}", full_path.display());
        let file = File::open(full_path)?;
        Ok(Box::new(BufReader::new(file)))
    }
}
