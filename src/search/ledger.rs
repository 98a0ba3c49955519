//! Append-only record of every generation evaluation.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use polars::df;
use polars::prelude::{CsvWriter, DataFrame, SerWriter};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::oracle::Evaluation;

/// One evaluated individual.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRecord {
    /// 0-based generation index.
    pub generation: usize,
    /// Index of the individual within its generation, in evaluation order.
    pub individual: usize,
    /// Item → position.
    pub placement: BTreeMap<String, usize>,
    pub evaluation: Evaluation,
}

/// Generation evaluations in the order they happened.
///
/// Records are ordered by generation, then by evaluation order within the
/// generation, and are never modified once appended.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunLedger {
    records: Vec<LedgerRecord>,
}

impl RunLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, record: LedgerRecord) {
        debug_assert!(self
            .records
            .last()
            .map_or(true, |last| (last.generation, last.individual)
                < (record.generation, record.individual)));
        self.records.push(record);
    }

    pub fn records(&self) -> &[LedgerRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records of one generation.
    pub fn generation(&self, generation: usize) -> impl Iterator<Item = &LedgerRecord> {
        self.records
            .iter()
            .filter(move |r| r.generation == generation)
    }

    /// Records whose evaluation failed.
    pub fn failures(&self) -> impl Iterator<Item = &LedgerRecord> {
        self.records.iter().filter(|r| r.evaluation.is_failed())
    }

    /// Running maximum of the score over the ledger, one value per record.
    pub fn best_so_far(&self) -> Vec<f64> {
        let mut best = f64::NEG_INFINITY;
        self.records
            .iter()
            .map(|r| {
                best = best.max(r.evaluation.score());
                best
            })
            .collect()
    }

    /// Tabular form with columns `GENERATION,POSITION,SCORE,ERROR`.
    ///
    /// `POSITION` is the item → position mapping as a JSON object; `ERROR`
    /// is null for scored records and holds the failure reason otherwise.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let generations: Vec<u64> = self.records.iter().map(|r| r.generation as u64).collect();
        let positions = self
            .records
            .iter()
            .map(|r| serde_json::to_string(&r.placement))
            .collect::<serde_json::Result<Vec<String>>>()?;
        let scores: Vec<f64> = self.records.iter().map(|r| r.evaluation.score()).collect();
        let errors: Vec<Option<String>> = self
            .records
            .iter()
            .map(|r| r.evaluation.failure_reason().map(str::to_string))
            .collect();

        Ok(df! {
            "GENERATION" => generations,
            "POSITION" => positions,
            "SCORE" => scores,
            "ERROR" => errors,
        }?)
    }

    /// Writes [`to_frame`](Self::to_frame) as CSV with a header row.
    pub fn write_csv<W: Write>(&self, out: W) -> Result<()> {
        let mut frame = self.to_frame()?;
        CsvWriter::new(out).include_header(true).finish(&mut frame)?;
        Ok(())
    }

    /// Writes the CSV form to `path`.
    pub fn save_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.write_csv(file)
    }

    /// Serializes the full ledger, evaluation variants included, as JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{CsvReadOptions, SerReader};

    fn record(generation: usize, individual: usize, evaluation: Evaluation) -> LedgerRecord {
        let mut placement = BTreeMap::new();
        placement.insert("A".to_string(), 1);
        placement.insert("B".to_string(), 0);
        LedgerRecord {
            generation,
            individual,
            placement,
            evaluation,
        }
    }

    fn sample() -> RunLedger {
        let mut ledger = RunLedger::new();
        ledger.push(record(0, 0, Evaluation::Scored(0.5)));
        ledger.push(record(0, 1, Evaluation::Failed {
            reason: "nan, in features".into(),
        }));
        ledger.push(record(1, 0, Evaluation::Scored(0.75)));
        ledger
    }

    #[test]
    fn test_queries() {
        let ledger = sample();
        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger.generation(0).count(), 2);
        assert_eq!(ledger.failures().count(), 1);
        assert_eq!(ledger.best_so_far(), vec![0.5, 0.5, 0.75]);
    }

    #[test]
    fn test_frame_columns() {
        let frame = sample().to_frame().unwrap();
        assert_eq!(frame.height(), 3);
        assert_eq!(
            frame.get_column_names().iter().map(|c| c.to_string()).collect::<Vec<_>>(),
            vec!["GENERATION", "POSITION", "SCORE", "ERROR"]
        );
        let scores: Vec<Option<f64>> = frame.column("SCORE").unwrap().f64().unwrap().into_iter().collect();
        assert_eq!(scores, vec![Some(0.5), Some(0.0), Some(0.75)]);
        assert_eq!(frame.column("ERROR").unwrap().null_count(), 2);
    }

    #[test]
    fn test_csv_layout() {
        let mut buf = Vec::new();
        sample().write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "GENERATION,POSITION,SCORE,ERROR");
        // The mapping and the reason contain commas and quotes, so they are
        // quoted with doubled inner quotes.
        assert!(lines[1].starts_with(r#"0,"{""A"":1,""B"":0}",0.5"#));
        assert!(lines[1].ends_with(','));
        assert!(lines[2].starts_with(r#"0,"{""A"":1,""B"":0}",0"#));
        assert!(lines[2].ends_with(r#","nan, in features""#));
        assert!(lines[3].starts_with(r#"1,"{""A"":1,""B"":0}",0.75"#));
    }

    #[test]
    fn test_save_csv_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ga_results.csv");
        sample().save_csv(&path).unwrap();

        let frame = CsvReadOptions::default()
            .try_into_reader_with_file_path(Some(path))
            .unwrap()
            .finish()
            .unwrap();
        assert_eq!(frame.height(), 3);
        let scores: Vec<Option<f64>> = frame.column("SCORE").unwrap().f64().unwrap().into_iter().collect();
        assert_eq!(scores, vec![Some(0.5), Some(0.0), Some(0.75)]);
        let positions: Vec<Option<&str>> = frame.column("POSITION").unwrap().str().unwrap().into_iter().collect();
        assert_eq!(positions[0], Some(r#"{"A":1,"B":0}"#));
        let errors: Vec<Option<&str>> = frame.column("ERROR").unwrap().str().unwrap().into_iter().collect();
        assert_eq!(errors, vec![None, Some("nan, in features"), None]);
    }

    #[test]
    fn test_empty_ledger_writes_header_only() {
        let mut buf = Vec::new();
        RunLedger::new().write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.trim_end(), "GENERATION,POSITION,SCORE,ERROR");
    }

    #[test]
    fn test_json_round_trip_keeps_failures() {
        let ledger = sample();
        let json = ledger.to_json().unwrap();
        let back: RunLedger = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ledger);
        assert!(back.records()[1].evaluation.is_failed());
    }
}
