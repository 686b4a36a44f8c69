use axum::Json;
use tracing::{info, warn};

use fs_common::api::{ExtractRequest, ExtractResponse, ReconcileRequest, ReconcileResponse};
use fs_common::extraction::extract_status_counts;
use fs_common::reconcile::reconcile;

/// POST /api/extract — pure function call over the submitted report HTML.
///
/// An empty or unrecognized document is a valid `no_data` outcome, not an
/// error; the caller reads the diagnostics to tell the cases apart.
pub async fn extract_report(Json(request): Json<ExtractRequest>) -> Json<ExtractResponse> {
    let extraction = extract_status_counts(&request.html);

    info!(
        path = extraction.diagnostics.path.as_ref(),
        total = extraction.total(),
        buckets = extraction.counts.len(),
        "report extraction"
    );

    Json(ExtractResponse {
        counts: extraction.counts,
        diagnostics: extraction.diagnostics,
    })
}

/// POST /api/reconcile — extraction plus comparison against the stored
/// `statusCount` summary.
pub async fn reconcile_report(Json(request): Json<ReconcileRequest>) -> Json<ReconcileResponse> {
    let extraction = extract_status_counts(&request.html);
    let discrepancies = reconcile(&extraction.counts, &request.stored_counts);
    let consistent = discrepancies.is_empty();

    if consistent {
        info!(
            path = extraction.diagnostics.path.as_ref(),
            total = extraction.total(),
            "stored summary matches extraction"
        );
    } else {
        warn!(
            path = extraction.diagnostics.path.as_ref(),
            discrepancies = discrepancies.len(),
            "stored summary disagrees with extraction"
        );
    }

    Json(ReconcileResponse {
        counts: extraction.counts,
        diagnostics: extraction.diagnostics,
        discrepancies,
        consistent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fs_common::extraction::{ExtractionPath, StatusCounts};

    const REPORT: &str = r#"<h3>QUANTIDADE DE PROCESSOS PARA INTERVIR POR STATUS</h3>
        <table>
          <tr><th>Status</th><th>Quantidade</th></tr>
          <tr><td>Autorizado</td><td>12</td></tr>
          <tr><td>RECUSADO</td><td>3</td></tr>
        </table>"#;

    #[tokio::test]
    async fn extract_returns_counts_and_diagnostics() {
        let response = extract_report(Json(ExtractRequest {
            html: REPORT.to_string(),
        }))
        .await;

        assert_eq!(response.0.counts["AUTORIZADO"], 12);
        assert_eq!(response.0.diagnostics.path, ExtractionPath::StatusTable);
    }

    #[tokio::test]
    async fn extract_treats_empty_html_as_no_data() {
        let response = extract_report(Json(ExtractRequest {
            html: String::new(),
        }))
        .await;

        assert!(response.0.counts.is_empty());
        assert_eq!(response.0.diagnostics.path, ExtractionPath::NoData);
    }

    #[tokio::test]
    async fn reconcile_flags_disagreement() {
        let mut stored = StatusCounts::new();
        stored.insert("Autorizado".into(), 11);
        stored.insert("Recusado".into(), 3);

        let response = reconcile_report(Json(ReconcileRequest {
            html: REPORT.to_string(),
            stored_counts: stored,
        }))
        .await;

        assert!(!response.0.consistent);
        assert_eq!(response.0.discrepancies.len(), 1);
        assert_eq!(response.0.discrepancies[0].label, "AUTORIZADO");
        assert_eq!(response.0.discrepancies[0].extracted, 12);
        assert_eq!(response.0.discrepancies[0].stored, 11);
    }
}
