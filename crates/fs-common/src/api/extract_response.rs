use serde::{Deserialize, Serialize};

use crate::extraction::{ExtractionDiagnostics, StatusCounts};
use crate::reconcile::Discrepancy;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExtractResponse {
    pub counts: StatusCounts,
    pub diagnostics: ExtractionDiagnostics,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReconcileResponse {
    pub counts: StatusCounts,
    pub diagnostics: ExtractionDiagnostics,
    pub discrepancies: Vec<Discrepancy>,
    /// True when extraction and the stored summary agree exactly.
    pub consistent: bool,
}
