use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::extraction::StatusCounts;
use crate::status::normalize_status;

/// Divergência entre a contagem extraída do HTML e o resumo `statusCount`
/// registado com o relatório. Ausência de um rótulo conta como zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discrepancy {
    pub label: String,
    pub extracted: u64,
    pub stored: u64,
}

/// Re-buckets a raw-label→count mapping through the status rule table,
/// summing labels that collapse into the same bucket.
///
/// The stored summary is keyed by verbatim report labels ("Autorizado",
/// "Consulta / Orçamento", …); pushing it through the same rules the
/// extractor uses makes the two sides comparable. Do not apply this to an
/// already-normalized mapping: canonical codes are not fixpoints of the
/// rule table ("CONSULTA_ORCAMENTO" itself contains "orcamento").
pub fn normalize_counts(raw: &StatusCounts) -> StatusCounts {
    let mut normalized = StatusCounts::new();
    for (label, count) in raw {
        let bucket = normalize_status(label);
        *normalized.entry(bucket.key().to_string()).or_insert(0) += count;
    }
    normalized
}

/// Compara a extração com o resumo registado e devolve as divergências,
/// ordenadas por rótulo. Lista vazia = extrator e base de dados de acordo.
pub fn reconcile(extracted: &StatusCounts, stored: &StatusCounts) -> Vec<Discrepancy> {
    let stored = normalize_counts(stored);

    let labels: BTreeSet<&str> = extracted
        .keys()
        .chain(stored.keys())
        .map(String::as_str)
        .collect();

    labels
        .into_iter()
        .filter_map(|label| {
            let extracted_count = extracted.get(label).copied().unwrap_or(0);
            let stored_count = stored.get(label).copied().unwrap_or(0);
            (extracted_count != stored_count).then(|| Discrepancy {
                label: label.to_string(),
                extracted: extracted_count,
                stored: stored_count,
            })
        })
        .collect()
}
