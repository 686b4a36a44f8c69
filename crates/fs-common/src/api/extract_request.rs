use serde::{Deserialize, Serialize};

use crate::extraction::StatusCounts;

/// Pedido de extração: o HTML do relatório, tal como guardado no registo.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExtractRequest {
    pub html: String,
}

/// Pedido de reconciliação: o HTML e o `statusCount` registado na base de
/// dados (rótulos em bruto, como o gerador do relatório os escreveu).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReconcileRequest {
    pub html: String,
    pub stored_counts: StatusCounts,
}
