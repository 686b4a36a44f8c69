pub mod lines;
pub mod table;

use std::collections::BTreeMap;

use scraper::Html;
use serde::{Deserialize, Serialize};
use strum::AsRefStr;
use tracing::warn;

use crate::status::normalize_status;

pub use table::{locate_status_table, STATUS_TABLE_MARKER};

/// Contagem por balde de status. Só aparecem tallies positivos; linhas a
/// zero ficam registadas nos diagnósticos.
pub type StatusCounts = BTreeMap<String, u64>;

/// Which of the two report formats produced the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ExtractionPath {
    /// Pre-aggregated counts read from the marker table.
    StatusTable,
    /// One-by-one tally of inline `FS … // …: status` entries.
    TicketLines,
    /// Neither format matched; the empty mapping is a valid outcome but
    /// usually means the report format changed upstream.
    NoData,
}

/// Row/match accounting for one extraction run.
///
/// `rows_seen` counts table rows or line matches depending on the path.
/// Zero-count rows are deliberately kept apart from `rows_skipped` so a
/// status genuinely absent this period is distinguishable from a parsing
/// failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionDiagnostics {
    pub path: ExtractionPath,
    pub rows_seen: usize,
    pub header_rows: usize,
    pub rows_counted: usize,
    pub rows_skipped: usize,
    pub zero_count_rows: usize,
}

impl ExtractionDiagnostics {
    fn empty(path: ExtractionPath) -> Self {
        Self {
            path,
            rows_seen: 0,
            header_rows: 0,
            rows_counted: 0,
            rows_skipped: 0,
            zero_count_rows: 0,
        }
    }
}

/// Resultado de uma extração: o mapa balde→contagem e os diagnósticos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusExtraction {
    pub counts: StatusCounts,
    pub diagnostics: ExtractionDiagnostics,
}

impl StatusExtraction {
    /// Sum of all tallies across buckets.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }
}

/// Extrai as contagens por status de um relatório HTML.
///
/// Tenta primeiro a tabela de contagens (formato atual); sem tabela, cai
/// no varrimento de linhas `FS … // …` (formato antigo). Função pura sobre
/// a string de entrada: sem I/O, sem estado partilhado, invocável em
/// paralelo à vontade.
pub fn extract_status_counts(html: &str) -> StatusExtraction {
    let document = Html::parse_document(html);

    if let Some(table_element) = locate_status_table(&document) {
        let extraction = tally_table(table_element);
        if extraction.diagnostics.rows_counted == 0 {
            warn!(
                rows_seen = extraction.diagnostics.rows_seen,
                rows_skipped = extraction.diagnostics.rows_skipped,
                "status table located but produced no counts"
            );
        }
        return extraction;
    }

    let extraction = tally_ticket_lines(html);
    if extraction.diagnostics.rows_seen == 0 {
        warn!("no status table and no ticket lines found; report format may have changed");
        return StatusExtraction {
            counts: StatusCounts::new(),
            diagnostics: ExtractionDiagnostics::empty(ExtractionPath::NoData),
        };
    }

    extraction
}

/// Table path: rows carry pre-aggregated counts; duplicate labels that
/// normalize to the same bucket are summed.
fn tally_table(table_element: scraper::ElementRef<'_>) -> StatusExtraction {
    let mut counts = StatusCounts::new();
    let mut diagnostics = ExtractionDiagnostics::empty(ExtractionPath::StatusTable);

    for row in table::parse_rows(table_element) {
        diagnostics.rows_seen += 1;
        match row {
            table::ParsedRow::Header => diagnostics.header_rows += 1,
            table::ParsedRow::MissingCells
            | table::ParsedRow::EmptyLabel
            | table::ParsedRow::BadCount => diagnostics.rows_skipped += 1,
            table::ParsedRow::Zero { .. } => diagnostics.zero_count_rows += 1,
            table::ParsedRow::Data { label, count } => {
                diagnostics.rows_counted += 1;
                let bucket = normalize_status(&label);
                *counts.entry(bucket.key().to_string()).or_insert(0) += count;
            }
        }
    }

    StatusExtraction {
        counts,
        diagnostics,
    }
}

/// Fallback path: one increment per matched ticket line.
fn tally_ticket_lines(html: &str) -> StatusExtraction {
    let mut counts = StatusCounts::new();
    let mut diagnostics = ExtractionDiagnostics::empty(ExtractionPath::TicketLines);

    for status_text in lines::scan_ticket_lines(html) {
        diagnostics.rows_seen += 1;
        if status_text.is_empty() {
            diagnostics.rows_skipped += 1;
            continue;
        }
        diagnostics.rows_counted += 1;
        let bucket = normalize_status(status_text);
        *counts.entry(bucket.key().to_string()).or_insert(0) += 1;
    }

    StatusExtraction {
        counts,
        diagnostics,
    }
}
