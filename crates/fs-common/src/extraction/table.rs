use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

/// Marcador do cabeçalho da secção de contagens por status no relatório.
pub const STATUS_TABLE_MARKER: &str = "QUANTIDADE DE PROCESSOS";

static HEADINGS_AND_TABLES: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1, h2, h3, h4, table").unwrap());
static ROWS: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").unwrap());
static HEADER_CELLS: Lazy<Selector> = Lazy::new(|| Selector::parse("th").unwrap());
static DATA_CELLS: Lazy<Selector> = Lazy::new(|| Selector::parse("td").unwrap());

/// Collects the text of an element with markup stripped and whitespace
/// collapsed to single spaces.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Localiza a tabela de contagens: a primeira `<table>` que aparece, em
/// ordem de documento, depois de um cabeçalho com o marcador.
///
/// O marcador é comparado sem distinção de maiúsculas e os atributos dos
/// elementos são irrelevantes. Devolve `None` quando o relatório não tem a
/// secção (formato antigo, ver o scanner de linhas).
pub fn locate_status_table(document: &Html) -> Option<ElementRef<'_>> {
    let mut seen_marker = false;

    for element in document.select(&HEADINGS_AND_TABLES) {
        if element.value().name() == "table" {
            if seen_marker {
                return Some(element);
            }
        } else if element_text(element)
            .to_uppercase()
            .contains(STATUS_TABLE_MARKER)
        {
            seen_marker = true;
        }
    }

    None
}

/// Classification of a single `<tr>` of the status table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ParsedRow {
    /// Contains a `<th>` cell; excluded regardless of content.
    Header,
    /// Fewer than two `<td>` cells.
    MissingCells,
    /// First cell stripped down to nothing.
    EmptyLabel,
    /// Second cell is not a non-negative integer.
    BadCount,
    /// Parsed fine but the tally is zero; kept out of the mapping and
    /// reported separately so "genuinely zero" stays distinguishable
    /// from "malformed".
    Zero { label: String },
    Data { label: String, count: u64 },
}

/// Percorre as linhas da tabela em ordem de documento, uma passagem só.
pub(crate) fn parse_rows<'a>(table: ElementRef<'a>) -> impl Iterator<Item = ParsedRow> + 'a {
    table.select(&ROWS).map(|row| classify_row(row))
}

fn classify_row(row: ElementRef<'_>) -> ParsedRow {
    if row.select(&HEADER_CELLS).next().is_some() {
        return ParsedRow::Header;
    }

    let mut cells = row.select(&DATA_CELLS);
    let (Some(label_cell), Some(count_cell)) = (cells.next(), cells.next()) else {
        return ParsedRow::MissingCells;
    };

    let label = element_text(label_cell);
    if label.is_empty() {
        return ParsedRow::EmptyLabel;
    }

    match element_text(count_cell).parse::<u64>() {
        Ok(0) => ParsedRow::Zero { label },
        Ok(count) => ParsedRow::Data { label, count },
        Err(_) => ParsedRow::BadCount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(html: &str) -> Html {
        Html::parse_document(html)
    }

    #[test]
    fn locates_table_after_marker_heading() {
        let document = parse(
            r#"<h3 style="color: #2d3748;">QUANTIDADE DE PROCESSOS PARA INTERVIR POR STATUS</h3>
               <table><tr><td>Autorizado</td><td>2</td></tr></table>"#,
        );
        assert!(locate_status_table(&document).is_some());
    }

    #[test]
    fn marker_match_is_case_insensitive() {
        let document = parse("<h2>Quantidade de Processos</h2><table></table>");
        assert!(locate_status_table(&document).is_some());
    }

    #[test]
    fn ignores_tables_before_the_marker() {
        let document = parse(
            r#"<table id="before"><tr><td>x</td></tr></table>
               <h3>QUANTIDADE DE PROCESSOS</h3>
               <table id="after"><tr><td>Recusado</td><td>1</td></tr></table>"#,
        );
        let table = locate_status_table(&document).unwrap();
        assert_eq!(table.value().attr("id"), Some("after"));
    }

    #[test]
    fn missing_marker_or_table_yields_none() {
        assert!(locate_status_table(&parse("<p>sem relatório</p>")).is_none());
        assert!(locate_status_table(&parse("<h3>QUANTIDADE DE PROCESSOS</h3>")).is_none());
        // A heading that does not carry the marker does not arm the search.
        assert!(locate_status_table(&parse("<h3>RESUMO</h3><table></table>")).is_none());
    }

    #[test]
    fn classifies_header_short_and_malformed_rows() {
        let document = parse(
            r#"<h3>QUANTIDADE DE PROCESSOS</h3><table>
               <tr><th>Status</th><th>Quantidade</th></tr>
               <tr><td>só uma célula</td></tr>
               <tr><td>  </td><td>3</td></tr>
               <tr><td>Autorizado</td><td>doze</td></tr>
               <tr><td>Recusado</td><td>0</td></tr>
               <tr><td>Anulado</td><td>4</td></tr>
               </table>"#,
        );
        let table = locate_status_table(&document).unwrap();
        let rows: Vec<ParsedRow> = parse_rows(table).collect();

        assert_eq!(
            rows,
            vec![
                ParsedRow::Header,
                ParsedRow::MissingCells,
                ParsedRow::EmptyLabel,
                ParsedRow::BadCount,
                ParsedRow::Zero {
                    label: "Recusado".into()
                },
                ParsedRow::Data {
                    label: "Anulado".into(),
                    count: 4
                },
            ]
        );
    }

    #[test]
    fn strips_nested_markup_from_cells() {
        let document = parse(
            r#"<h3>QUANTIDADE DE PROCESSOS</h3><table>
               <tr><td><b>Devolve  Vidro</b> e Encerra!</td><td> <span>7</span> </td></tr>
               </table>"#,
        );
        let table = locate_status_table(&document).unwrap();
        let rows: Vec<ParsedRow> = parse_rows(table).collect();
        assert_eq!(
            rows,
            vec![ParsedRow::Data {
                label: "Devolve Vidro e Encerra!".into(),
                count: 7
            }]
        );
    }
}
