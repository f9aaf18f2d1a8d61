//! JSON test data provider.
//!
//! Replays recorded or hand-written samples instead of querying the kernel, so
//! both output modes can be exercised on any host.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

use super::HostStatsProvider;
use crate::error::{Result, VmStatError};
use crate::memory::{HostSample, RawCounters};

/// Root structure for test data JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestData {
    #[serde(default)]
    pub version: String,
    pub page_size: u64,
    pub total_memory: u64,
    pub samples: Vec<HostSample>,
}

/// Loads and parses a test data file.
pub fn load_test_data_from_file(path: &Path) -> Result<TestData> {
    let content = fs::read_to_string(path)
        .map_err(|e| VmStatError::test_data(path, format!("read failed: {}", e)))?;

    let test_data: TestData = serde_json::from_str(&content)
        .map_err(|e| VmStatError::test_data(path, format!("invalid JSON: {}", e)))?;

    if test_data.samples.is_empty() {
        return Err(VmStatError::test_data(path, "no samples"));
    }
    if test_data.page_size == 0 {
        return Err(VmStatError::test_data(path, "page_size must be positive"));
    }

    Ok(test_data)
}

/// Provider that hands out the samples of a [`TestData`] in order.
///
/// Once the samples run out the last one is repeated.
#[derive(Debug, Clone)]
pub struct TestDataHostStats {
    data: TestData,
    next: usize,
    current: usize,
}

impl TestDataHostStats {
    /// Wraps already loaded test data. Fails when it has no samples.
    pub fn new(data: TestData) -> Result<Self> {
        if data.samples.is_empty() {
            return Err(VmStatError::retrieval("VM statistics", "test data has no samples"));
        }
        Ok(Self {
            data,
            next: 0,
            current: 0,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        Self::new(load_test_data_from_file(path)?)
    }

    pub fn sample_count(&self) -> usize {
        self.data.samples.len()
    }
}

impl HostStatsProvider for TestDataHostStats {
    fn page_size(&mut self) -> Result<u64> {
        Ok(self.data.page_size)
    }

    fn vm_statistics(&mut self) -> Result<RawCounters> {
        let last = self.data.samples.len() - 1;
        self.current = self.next.min(last);
        if self.next > last {
            debug!("Test data exhausted, repeating sample {}", last);
        }
        self.next = self.next.saturating_add(1);
        Ok(self.data.samples[self.current].counters)
    }

    fn total_physical_memory(&mut self) -> Result<u64> {
        Ok(self.data.total_memory)
    }

    fn swap_used(&mut self) -> Result<u64> {
        Ok(self.data.samples[self.current].swap_used)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE_JSON: &str = r#"{
        "version": "1",
        "page_size": 16384,
        "total_memory": 8589934592,
        "samples": [
            { "counters": { "free": 100, "pageins": 10 }, "swap_used": 1024 },
            { "counters": { "free": 90, "pageins": 25 }, "swap_used": 2048 }
        ]
    }"#;

    fn write_fixture(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_and_replay_samples() {
        let file = write_fixture(SAMPLE_JSON);
        let mut provider = TestDataHostStats::from_file(file.path()).unwrap();

        assert_eq!(provider.sample_count(), 2);
        assert_eq!(provider.page_size().unwrap(), 16384);
        assert_eq!(provider.total_physical_memory().unwrap(), 8_589_934_592);

        let first = provider.sample().unwrap();
        assert_eq!(first.counters.free, 100);
        assert_eq!(first.counters.active, 0);
        assert_eq!(first.swap_used, 1024);

        let second = provider.sample().unwrap();
        assert_eq!(second.counters.pageins, 25);
        assert_eq!(second.swap_used, 2048);

        // Exhausted: the last sample repeats
        let third = provider.sample().unwrap();
        assert_eq!(third, second);
    }

    #[test]
    fn test_empty_samples_rejected() {
        let file = write_fixture(r#"{"page_size": 4096, "total_memory": 1, "samples": []}"#);
        let err = load_test_data_from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("no samples"), "{}", err);
    }

    #[test]
    fn test_invalid_json_rejected() {
        let file = write_fixture("{ not json");
        let err = load_test_data_from_file(file.path()).unwrap_err();
        assert!(matches!(err, VmStatError::TestData { .. }));
    }

    #[test]
    fn test_missing_file_rejected() {
        let err = load_test_data_from_file(Path::new("/nonexistent/vmstat2.json")).unwrap_err();
        assert!(err.to_string().contains("read failed"), "{}", err);
    }
}
