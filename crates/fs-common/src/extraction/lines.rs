use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Entrada inline no formato antigo do relatório:
    //   "FS 278 // BQ-86-ED: Consulta / Orçamento (87 dias aberto)"
    // O grupo de captura pára antes de '(' para excluir a contagem de dias,
    // e antes de '<' para não atravessar a tag seguinte.
    static ref FICHA_LINE_RE: Regex =
        Regex::new(r"(?i)FS\s*\d+\s*//\s*[\w-]+:\s*([^(<\n]+)").unwrap();
}

/// Varre o HTML em bruto à procura de entradas `FS <id> // <ref>: <status>`
/// e devolve o texto de status de cada uma, já aparado.
///
/// Usado quando o relatório não traz a tabela de contagens; cada resultado
/// vale exatamente um incremento no balde respetivo.
pub fn scan_ticket_lines(html: &str) -> impl Iterator<Item = &str> + '_ {
    FICHA_LINE_RE
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|status| status.as_str().trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_status_and_excludes_day_counts() {
        let html = "<td>FS 201 // 24-GP-49: ORÇAMENTO (178 dias aberto)</td>\n\
                    <td>FS 275 // 29-MS-81: AUTORIZADO (91 dias aberto)</td>";
        let statuses: Vec<&str> = scan_ticket_lines(html).collect();
        assert_eq!(statuses, vec!["ORÇAMENTO", "AUTORIZADO"]);
    }

    #[test]
    fn stops_at_closing_markup() {
        let html = "FS 34 // BH-93-QO: RECUSADO</td><td>outro texto";
        let statuses: Vec<&str> = scan_ticket_lines(html).collect();
        assert_eq!(statuses, vec!["RECUSADO"]);
    }

    #[test]
    fn matches_multi_word_statuses() {
        let html = "FS 45 // 40-25-NE: Devolve Vidro e Encerra! (6 dias aberto)";
        let statuses: Vec<&str> = scan_ticket_lines(html).collect();
        assert_eq!(statuses, vec!["Devolve Vidro e Encerra!"]);
    }

    #[test]
    fn tolerates_spacing_and_case_variations() {
        let html = "fs1002//EF-34-GH:Recusado\nFS  7 // AB-12-CD:  Consulta / Orçamento";
        let statuses: Vec<&str> = scan_ticket_lines(html).collect();
        assert_eq!(statuses, vec!["Recusado", "Consulta / Orçamento"]);
    }

    #[test]
    fn ignores_text_without_the_pattern() {
        assert_eq!(scan_ticket_lines("relatório sem fichas").count(), 0);
        // A bare "FS 12" with no "//" separator is not an entry.
        assert_eq!(scan_ticket_lines("FS 12: Autorizado").count(), 0);
    }
}
