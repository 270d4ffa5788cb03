use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;

use crate::error::{FacetRankError, Result};
use crate::status::Status;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Aligned table with colors (default)
    #[default]
    Human,
    /// Same table without colors
    Plain,
    /// Pretty-printed JSON envelope
    Json,
}

impl OutputFormat {
    /// `--robot` wins over `--plain`.
    #[must_use]
    pub const fn from_args(robot: bool, plain: bool) -> Self {
        if robot {
            Self::Json
        } else if plain {
            Self::Plain
        } else {
            Self::Human
        }
    }

    #[must_use]
    pub const fn use_colors(&self) -> bool {
        matches!(self, Self::Human)
    }

    #[must_use]
    pub const fn is_machine_readable(&self) -> bool {
        matches!(self, Self::Json)
    }
}

#[derive(Serialize)]
pub struct RobotResponse<T> {
    pub status: RobotStatus,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub data: T,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RobotStatus {
    Ok,
    Error { code: String, message: String },
}

pub fn robot_ok<T: Serialize>(data: T) -> RobotResponse<T> {
    RobotResponse {
        status: RobotStatus::Ok,
        timestamp: Utc::now(),
        version: crate::VERSION.to_string(),
        data,
        warnings: Vec::new(),
    }
}

pub fn robot_error(err: &FacetRankError) -> RobotResponse<serde_json::Value> {
    RobotResponse {
        status: RobotStatus::Error {
            code: error_code(err).to_string(),
            message: err.to_string(),
        },
        timestamp: Utc::now(),
        version: crate::VERSION.to_string(),
        data: serde_json::Value::Null,
        warnings: Vec::new(),
    }
}

const fn error_code(err: &FacetRankError) -> &'static str {
    match err {
        FacetRankError::Io(_) => "io",
        FacetRankError::Json(_) | FacetRankError::Yaml(_) => "parse",
        FacetRankError::Config(_) | FacetRankError::MissingConfig(_) => "config",
        FacetRankError::InvalidInput(_) => "invalid_input",
        FacetRankError::UnsupportedFormat(_) => "unsupported_format",
    }
}

pub fn emit_json<T: Serialize>(value: &T) -> Result<()> {
    let payload = serde_json::to_string_pretty(value)?;
    println!("{payload}");
    Ok(())
}

/// Column-aligned text table.
#[derive(Debug, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) -> &mut Self {
        self.rows.push(row);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                let len = cell.chars().count();
                match widths.get_mut(i) {
                    Some(width) => *width = (*width).max(len),
                    None => widths.push(len),
                }
            }
        }
        widths
    }

    /// Render with padding computed on the uncolored text, so colors never
    /// break alignment.
    #[must_use]
    pub fn render(&self, colors: bool) -> String {
        let widths = self.widths();
        let mut lines = Vec::with_capacity(self.rows.len() + 1);

        let header = pad_row(&self.headers, &widths);
        lines.push(if colors {
            header.as_str().bold().to_string()
        } else {
            header
        });

        for row in &self.rows {
            let cells: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    let width = widths.get(i).copied().unwrap_or(0);
                    let padded = format!("{cell:<width$}");
                    if colors {
                        colorize_cell(cell, padded)
                    } else {
                        padded
                    }
                })
                .collect();
            lines.push(cells.join("  ").trim_end().to_string());
        }
        lines.join("\n")
    }
}

fn pad_row(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let width = widths.get(i).copied().unwrap_or(0);
            format!("{cell:<width$}")
        })
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn colorize_cell(raw: &str, padded: String) -> String {
    match Status::parse(raw) {
        Some(Status::Open) => padded.as_str().green().to_string(),
        Some(Status::Upcoming) => padded.as_str().yellow().to_string(),
        Some(Status::Closed) => padded.as_str().red().to_string(),
        _ if raw.ends_with('%') => padded.as_str().cyan().to_string(),
        _ => padded,
    }
}
