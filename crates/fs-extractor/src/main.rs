use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use fs_common::api::{ExtractResponse, ReconcileResponse};
use fs_common::extraction::{extract_status_counts, ExtractionPath, StatusCounts};
use fs_common::reconcile::reconcile;

/// Substitui os scripts de depuração avulsos: lê o HTML de um relatório e
/// imprime as contagens por status, opcionalmente reconciliando com o
/// `statusCount` registado na base de dados.
#[derive(Debug, Parser)]
#[command(
    name = "fs-extractor",
    about = "Extract per-status process counts from a fichas-de-serviço report"
)]
struct Cli {
    /// Report HTML file ("-" reads stdin)
    input: PathBuf,

    /// JSON file holding the stored statusCount summary to reconcile against
    #[arg(long)]
    baseline: Option<PathBuf>,

    /// Emit the result as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn read_input(path: &Path) -> std::io::Result<String> {
    if path.as_os_str() == "-" {
        let mut html = String::new();
        std::io::stdin().read_to_string(&mut html)?;
        Ok(html)
    } else {
        std::fs::read_to_string(path)
    }
}

fn read_baseline(path: &Path) -> Result<StatusCounts, String> {
    let raw = std::fs::read_to_string(path).map_err(|err| err.to_string())?;
    serde_json::from_str(&raw).map_err(|err| format!("invalid baseline JSON: {err}"))
}

fn print_extraction(response: &ExtractResponse) {
    if response.counts.is_empty() {
        println!("(sem contagens)");
    }
    for (label, count) in &response.counts {
        println!("{label}: {count}");
    }
    let d = &response.diagnostics;
    println!(
        "-- path={} rows_seen={} counted={} skipped={} zero={} header={}",
        d.path.as_ref(),
        d.rows_seen,
        d.rows_counted,
        d.rows_skipped,
        d.zero_count_rows,
        d.header_rows,
    );
}

fn main() -> ExitCode {
    fs_common::logging::init(env!("CARGO_PKG_NAME"));

    let cli = Cli::parse();

    let html = match read_input(&cli.input) {
        Ok(html) => html,
        Err(err) => {
            error!(input = %cli.input.display(), error = %err, "failed to read report HTML");
            return ExitCode::FAILURE;
        }
    };

    let extraction = extract_status_counts(&html);
    if extraction.diagnostics.path == ExtractionPath::NoData {
        // Valid outcome, but worth surfacing: likely a report-format change.
        eprintln!("aviso: nenhum dado de status encontrado no relatório");
    }

    let baseline = match cli.baseline.as_deref().map(read_baseline) {
        Some(Ok(baseline)) => Some(baseline),
        Some(Err(err)) => {
            error!(error = %err, "failed to read baseline");
            return ExitCode::FAILURE;
        }
        None => None,
    };

    match baseline {
        Some(stored_counts) => {
            let discrepancies = reconcile(&extraction.counts, &stored_counts);
            let response = ReconcileResponse {
                consistent: discrepancies.is_empty(),
                counts: extraction.counts,
                diagnostics: extraction.diagnostics,
                discrepancies,
            };

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&response).expect("response serializes"));
            } else {
                print_extraction(&ExtractResponse {
                    counts: response.counts.clone(),
                    diagnostics: response.diagnostics.clone(),
                });
                if response.consistent {
                    println!("reconciliação: OK");
                } else {
                    println!("reconciliação: {} divergência(s)", response.discrepancies.len());
                    for d in &response.discrepancies {
                        println!("  {}: extraído={} registado={}", d.label, d.extracted, d.stored);
                    }
                }
            }
        }
        None => {
            let response = ExtractResponse {
                counts: extraction.counts,
                diagnostics: extraction.diagnostics,
            };
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&response).expect("response serializes"));
            } else {
                print_extraction(&response);
            }
        }
    }

    ExitCode::SUCCESS
}
