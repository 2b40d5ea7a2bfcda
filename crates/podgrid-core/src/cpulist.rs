//! CPU list text codec.
//!
//! Pod status records a committed CPU set as a comma-separated list of
//! decimal core indices (`"0,1,4"`). Parsing also accepts inclusive
//! ranges (`"0-3,6"`) as written by Linux cpulist files.

use std::ops::RangeInclusive;

use thiserror::Error;

use crate::types::CoreIndex;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CpuListError {
    #[error("invalid core index {0:?}")]
    InvalidIndex(String),
    #[error("invalid core range {0:?}")]
    InvalidRange(String),
}

/// Parse a CPU list strictly. Any malformed entry fails the whole list.
///
/// The empty string (and whitespace) is the empty list.
pub fn parse_cpu_list(list: &str) -> Result<Vec<CoreIndex>, CpuListError> {
    list.trim()
        .split_terminator(',')
        .try_fold(Vec::new(), |mut cores, entry| {
            cores.extend(parse_entry(entry)?);
            Ok(cores)
        })
}

/// Parse a CPU list, skipping malformed entries and anything at or
/// above `bound`.
///
/// Used for CPU sets recorded on other pods, where one garbage entry
/// must not invalidate the rest of the node's snapshot. Ranges are
/// clipped to `bound` so a corrupt `"0-4294967295"` stays cheap.
pub fn parse_cpu_list_lossy(list: &str, bound: usize) -> Vec<CoreIndex> {
    let mut cores = Vec::new();
    for entry in list.split(',') {
        let Ok(range) = parse_entry(entry) else {
            continue;
        };
        if *range.start() >= bound {
            continue;
        }
        let end = (*range.end()).min(bound.saturating_sub(1));
        cores.extend(*range.start()..=end);
    }
    cores
}

/// Format cores as a comma-joined decimal list, in the given order.
pub fn format_cpu_list(cores: &[CoreIndex]) -> String {
    cores
        .iter()
        .map(CoreIndex::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn parse_entry(entry: &str) -> Result<RangeInclusive<CoreIndex>, CpuListError> {
    let entry = entry.trim();
    if let Some((start, end)) = entry.split_once('-') {
        let start = parse_index(start).map_err(|_| CpuListError::InvalidRange(entry.to_string()))?;
        let end = parse_index(end).map_err(|_| CpuListError::InvalidRange(entry.to_string()))?;
        if end < start {
            return Err(CpuListError::InvalidRange(entry.to_string()));
        }
        Ok(start..=end)
    } else {
        let core = parse_index(entry)?;
        Ok(core..=core)
    }
}

fn parse_index(s: &str) -> Result<CoreIndex, CpuListError> {
    s.trim()
        .parse()
        .map_err(|_| CpuListError::InvalidIndex(s.trim().to_string()))
}
