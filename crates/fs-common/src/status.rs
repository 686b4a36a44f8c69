use serde::{Deserialize, Serialize};
use strum::{AsRefStr, IntoStaticStr};

/// Estado canónico de um processo no relatório de análise de fichas.
///
/// Os rótulos no HTML são texto livre (acentuados, abreviados, em
/// maiúsculas ou não); tudo o que não cair num destes valores fica no
/// balde `Other` com o texto original.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, IntoStaticStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CanonicalStatus {
    Autorizado,
    Recusado,
    Anulado,
    Orcamento,
    ConsultaOrcamento,
    PedidoAutorizacao,
    DevolveVidro,
}

impl CanonicalStatus {
    /// Stable string code used as the mapping key (e.g. `CONSULTA_ORCAMENTO`).
    pub fn code(&self) -> &'static str {
        self.into()
    }
}

/// Bucket a raw label lands in: a canonical status, or the verbatim
/// trimmed text when no rule matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StatusBucket {
    Canonical(CanonicalStatus),
    Other(String),
}

impl StatusBucket {
    pub fn key(&self) -> &str {
        match self {
            StatusBucket::Canonical(status) => status.code(),
            StatusBucket::Other(text) => text,
        }
    }
}

/// Predicate over the lowercased label text.
#[derive(Debug, Clone, Copy)]
pub enum LabelRule {
    Contains(&'static str),
    ContainsAny(&'static [&'static str]),
    ContainsAll(&'static [&'static str]),
}

impl LabelRule {
    fn matches(&self, lowered: &str) -> bool {
        match self {
            LabelRule::Contains(needle) => lowered.contains(needle),
            LabelRule::ContainsAny(needles) => needles.iter().any(|n| lowered.contains(n)),
            LabelRule::ContainsAll(needles) => needles.iter().all(|n| lowered.contains(n)),
        }
    }
}

/// Regras de normalização por ordem de prioridade: a primeira que bater
/// ganha. A ordem é comportamento observável (ex.: "Consulta / Orçamento"
/// resolve para `ORCAMENTO` porque a regra do orçamento vem primeiro) e
/// está coberta por testes — não reordenar sem os ajustar.
pub const STATUS_RULES: &[(LabelRule, CanonicalStatus)] = &[
    (LabelRule::Contains("autorizado"), CanonicalStatus::Autorizado),
    (LabelRule::Contains("recusado"), CanonicalStatus::Recusado),
    (LabelRule::Contains("anulado"), CanonicalStatus::Anulado),
    (
        LabelRule::ContainsAny(&["orçamento", "orcamento"]),
        CanonicalStatus::Orcamento,
    ),
    (LabelRule::Contains("consulta"), CanonicalStatus::ConsultaOrcamento),
    (
        LabelRule::ContainsAll(&["pedido", "autoriza"]),
        CanonicalStatus::PedidoAutorizacao,
    ),
    (LabelRule::Contains("devolve"), CanonicalStatus::DevolveVidro),
];

/// Normaliza um rótulo de status para o seu balde canónico.
///
/// Total e determinística: qualquer entrada produz um balde, nunca falha.
pub fn normalize_status(raw: &str) -> StatusBucket {
    let trimmed = raw.trim();
    let lowered = trimmed.to_lowercase();

    for (rule, canonical) in STATUS_RULES {
        if rule.matches(&lowered) {
            return StatusBucket::Canonical(*canonical);
        }
    }

    StatusBucket::Other(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical(raw: &str) -> StatusBucket {
        normalize_status(raw)
    }

    #[test]
    fn matches_autorizado_rule() {
        assert_eq!(
            canonical("AUTORIZADO"),
            StatusBucket::Canonical(CanonicalStatus::Autorizado)
        );
        assert_eq!(
            canonical("  autorizado pela seguradora "),
            StatusBucket::Canonical(CanonicalStatus::Autorizado)
        );
    }

    #[test]
    fn matches_recusado_rule() {
        assert_eq!(
            canonical("Recusado"),
            StatusBucket::Canonical(CanonicalStatus::Recusado)
        );
    }

    #[test]
    fn matches_anulado_rule() {
        assert_eq!(
            canonical("ANULADO"),
            StatusBucket::Canonical(CanonicalStatus::Anulado)
        );
    }

    #[test]
    fn matches_orcamento_rule_with_and_without_cedilla() {
        assert_eq!(
            canonical("ORÇAMENTO"),
            StatusBucket::Canonical(CanonicalStatus::Orcamento)
        );
        assert_eq!(
            canonical("Orcamento enviado"),
            StatusBucket::Canonical(CanonicalStatus::Orcamento)
        );
    }

    #[test]
    fn matches_consulta_rule_only_without_orcamento() {
        assert_eq!(
            canonical("Consulta"),
            StatusBucket::Canonical(CanonicalStatus::ConsultaOrcamento)
        );
        // Priority accident kept on purpose: the orçamento rule fires first.
        assert_eq!(
            canonical("Consulta / Orçamento"),
            StatusBucket::Canonical(CanonicalStatus::Orcamento)
        );
    }

    #[test]
    fn matches_pedido_autorizacao_rule() {
        assert_eq!(
            canonical("Pedido Autorização"),
            StatusBucket::Canonical(CanonicalStatus::PedidoAutorizacao)
        );
        // "pedido" alone is not enough.
        assert_eq!(
            canonical("Pedido de peças"),
            StatusBucket::Other("Pedido de peças".to_string())
        );
        // A label carrying both "pedido" and "recusado" resolves by priority.
        assert_eq!(
            canonical("Pedido recusado"),
            StatusBucket::Canonical(CanonicalStatus::Recusado)
        );
    }

    #[test]
    fn matches_devolve_vidro_rule() {
        assert_eq!(
            canonical("Devolve Vidro e Encerra!"),
            StatusBucket::Canonical(CanonicalStatus::DevolveVidro)
        );
    }

    #[test]
    fn unknown_labels_keep_verbatim_trimmed_text() {
        assert_eq!(
            canonical("  Pendente Aprovação  "),
            StatusBucket::Other("Pendente Aprovação".to_string())
        );
        assert_eq!(canonical(""), StatusBucket::Other(String::new()));
    }

    #[test]
    fn normalization_is_deterministic() {
        for raw in ["AUTORIZADO", "Pendente Aprovação", "Consulta / Orçamento"] {
            assert_eq!(canonical(raw), canonical(raw));
        }
    }

    #[test]
    fn canonical_codes_are_screaming_snake_case() {
        assert_eq!(CanonicalStatus::Autorizado.code(), "AUTORIZADO");
        assert_eq!(CanonicalStatus::ConsultaOrcamento.code(), "CONSULTA_ORCAMENTO");
        assert_eq!(CanonicalStatus::PedidoAutorizacao.code(), "PEDIDO_AUTORIZACAO");
        assert_eq!(CanonicalStatus::DevolveVidro.code(), "DEVOLVE_VIDRO");
    }

    #[test]
    fn bucket_key_matches_code_or_verbatim_text() {
        assert_eq!(
            StatusBucket::Canonical(CanonicalStatus::Recusado).key(),
            "RECUSADO"
        );
        assert_eq!(StatusBucket::Other("Em espera".into()).key(), "Em espera");
    }
}
