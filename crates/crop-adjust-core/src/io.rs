//! Rectangle lists, JSON run configuration and reports.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::engine::CropAdjuster;
use crate::error::CropAdjustError;
use crate::params::{CropAdjustParams, ParamsError};
use crate::rect::Rect;

#[derive(thiserror::Error, Debug)]
pub enum CropAdjustIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    RectList(#[from] RectListError),
}

/// Malformed line in a rectangle list.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: expected four integers `x,y,w,h`, got {text:?}")]
pub struct RectListError {
    /// 1-based line number.
    pub line: usize,
    pub text: String,
}

/// Parse one rectangle per line.
///
/// Fields are separated by commas and/or whitespace. Blank lines and lines
/// starting with `#` are skipped.
pub fn parse_rect_list(text: &str) -> Result<Vec<Rect>, RectListError> {
    let mut rects = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let bad_line = || RectListError {
            line: i + 1,
            text: line.to_string(),
        };
        let fields: Vec<i32> = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|f| !f.is_empty())
            .map(str::parse::<i32>)
            .collect::<Result<_, _>>()
            .map_err(|_| bad_line())?;
        let coords: [i32; 4] = fields.try_into().map_err(|_| bad_line())?;
        rects.push(Rect::from(coords));
    }
    Ok(rects)
}

/// Read and parse a rectangle list file.
pub fn load_rect_list(path: impl AsRef<Path>) -> Result<Vec<Rect>, CropAdjustIoError> {
    let raw = fs::read_to_string(path)?;
    Ok(parse_rect_list(&raw)?)
}

/// Render rectangles in the list format accepted by [`parse_rect_list`].
pub fn format_rect_list(rects: &[Rect]) -> String {
    rects.iter().map(|r| format!("{r}\n")).collect()
}

/// Configuration for a batch run, loaded from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropAdjustConfig {
    pub image_path: String,
    pub rects_path: String,
    #[serde(default)]
    pub output_path: Option<String>,
    #[serde(default)]
    pub params: CropAdjustParams,
}

impl CropAdjustConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, CropAdjustIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), CropAdjustIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the output report path.
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("crop_adjust_report.json"))
    }

    pub fn build_adjuster(&self) -> Result<CropAdjuster, ParamsError> {
        CropAdjuster::new(self.params)
    }
}

/// Outcome for one input rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropReportEntry {
    pub given: Rect,
    #[serde(default)]
    pub fixed: Option<Rect>,
    #[serde(default)]
    pub error: Option<String>,
}

impl CropReportEntry {
    pub fn new(given: Rect, outcome: Result<Rect, CropAdjustError>) -> Self {
        match outcome {
            Ok(fixed) => Self {
                given,
                fixed: Some(fixed),
                error: None,
            },
            Err(err) => Self {
                given,
                fixed: None,
                error: Some(err.to_string()),
            },
        }
    }
}

/// GIVEN/FIXED pairs for one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropReport {
    pub image_path: String,
    pub params: CropAdjustParams,
    pub entries: Vec<CropReportEntry>,
}

impl CropReport {
    pub fn new(image_path: impl Into<String>, params: CropAdjustParams) -> Self {
        Self {
            image_path: image_path.into(),
            params,
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, given: Rect, outcome: Result<Rect, CropAdjustError>) {
        self.entries.push(CropReportEntry::new(given, outcome));
    }

    pub fn failures(&self) -> usize {
        self.entries.iter().filter(|e| e.error.is_some()).count()
    }

    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, CropAdjustIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), CropAdjustIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commas_whitespace_and_skips_blank_lines() {
        let text = "190,125,172,31\n\n  10 20 30 40  \n# comment\n1, 2,\t3 ,4\r\n";
        let rects = parse_rect_list(text).expect("parse");
        assert_eq!(
            rects,
            vec![
                Rect::new(190, 125, 172, 31),
                Rect::new(10, 20, 30, 40),
                Rect::new(1, 2, 3, 4),
            ]
        );
    }

    #[test]
    fn reports_bad_line_number() {
        let err = parse_rect_list("1,2,3,4\n1,2,3\n").expect_err("short line");
        assert_eq!(err.line, 2);
        assert_eq!(err.text, "1,2,3");

        let err = parse_rect_list("\n1,2,x,4").expect_err("non-integer");
        assert_eq!(err.line, 2);

        assert!(parse_rect_list("1,2,3,4,5").is_err());
    }

    #[test]
    fn negative_values_parse_and_are_left_to_the_engine() {
        let rects = parse_rect_list("-3,4,10,-1").expect("parse");
        assert_eq!(rects, vec![Rect::new(-3, 4, 10, -1)]);
    }

    #[test]
    fn formatted_list_parses_back() {
        let rects = vec![Rect::new(1, 2, 3, 4), Rect::new(50, 60, 70, 80)];
        let text = format_rect_list(&rects);
        assert_eq!(text, "1,2,3,4\n50,60,70,80\n");
        assert_eq!(parse_rect_list(&text).expect("parse"), rects);
    }

    #[test]
    fn config_json_on_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "image_path": "page.png", "rects_path": "page.txt",
                 "params": { "threshold": 0.3, "search_range": 8 } }"#,
        )
        .expect("write");

        let cfg = CropAdjustConfig::load_json(&path).expect("load");
        assert_eq!(cfg.params.threshold, 0.3);
        assert_eq!(cfg.params.search_range, 8);
        assert_eq!(cfg.params.tolerance, 20);
        assert_eq!(cfg.output_path(), PathBuf::from("crop_adjust_report.json"));
        assert!(cfg.build_adjuster().is_ok());
    }

    #[test]
    fn report_records_failures_and_round_trips() {
        let mut report = CropReport::new("page.png", CropAdjustParams::default());
        report.push(Rect::new(1, 1, 4, 4), Ok(Rect::new(0, 0, 6, 6)));
        let bad = Rect::new(0, 0, 0, 0);
        report.push(bad, Err(CropAdjustError::InvalidRectangle { rect: bad }));
        assert_eq!(report.failures(), 1);
        assert_eq!(
            report.entries[1].error.as_deref(),
            Some("rectangle 0,0,0,0 has no area")
        );

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("report.json");
        report.write_json(&path).expect("write");
        assert_eq!(CropReport::load_json(&path).expect("load"), report);
    }
}
