use clap::{Parser, Subcommand};
use medwell_core::{
    constants::{EXPORT_DIR_ENV, REPORTS_FILE_ENV},
    reports_file_from_env_value, resolve_export_dir, ClassifiedElement, Doctor,
    DoctorDirectory, DoctorSearch, Page, PortalConfig, RangeFilter, Report, ReportId,
    ReportService, SearchQuery, DEFAULT_EXPORT_DIR,
};
use medwell_export::ExportService;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "medwell")]
#[command(about = "MedWell patient report portal CLI")]
struct Cli {
    /// Report feed JSON file (defaults to MEDWELL_REPORTS_FILE)
    #[arg(long, global = true)]
    reports: Option<PathBuf>,
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List reports
    List {
        /// Match title, doctor, summary or any result
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one report and its results
    Show {
        /// Report id
        id: String,
        /// Match element names or values
        #[arg(long)]
        search: Option<String>,
        /// Range filter: all, inRange, outOfRange or notAvailable
        #[arg(long, default_value_t = RangeFilter::All)]
        range: RangeFilter,
    },
    /// List reports with an overlapping title, the same doctor or a shared test
    Similar {
        /// Report id
        id: String,
    },
    /// Export a report as PDF
    Export {
        /// Report id
        id: String,
        /// Output directory (defaults to MEDWELL_EXPORT_DIR, then ./exports)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Find doctors by specialty, five per page
    Doctors {
        /// Match specialties containing this text
        #[arg(long)]
        specialty: Option<String>,
        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("warn".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let reports_file = cli
        .reports
        .or_else(|| reports_file_from_env_value(std::env::var(REPORTS_FILE_ENV).ok()));
    let export_dir = std::env::var(EXPORT_DIR_ENV)
        .ok()
        .filter(|dir| !dir.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_DIR));
    let config = PortalConfig::new(reports_file, export_dir)?;

    let Some(command) = cli.command else {
        println!("Use 'medwell --help' for commands");
        return Ok(());
    };

    match command {
        Commands::List { search } => {
            let service = load_service(&config);
            let reports = service.search(&SearchQuery::from(search));
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else if reports.is_empty() {
                println!("No reports found.");
            } else {
                for report in reports {
                    println!("{}", report_line(report));
                }
            }
        }
        Commands::Show { id, search, range } => {
            let service = load_service(&config);
            let id = ReportId::new(id);
            let report = service.find(&id)?;
            let rows = service.elements(&id, &SearchQuery::from(search), range)?;
            if cli.json {
                let json = serde_json::json!({
                    "report": report,
                    "rangeFilter": range,
                    "rows": rows.iter().map(row_json).collect::<Vec<_>>(),
                });
                println!("{}", serde_json::to_string_pretty(&json)?);
            } else {
                print_report(report, &rows, range);
            }
        }
        Commands::Similar { id } => {
            let service = load_service(&config);
            let similar = service.similar(&ReportId::new(id))?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&similar)?);
            } else if similar.is_empty() {
                println!("No similar reports found.");
            } else {
                for report in similar {
                    println!("{}", report_line(report));
                }
            }
        }
        Commands::Export { id, out } => {
            let service = load_service(&config);
            let report = service.find(&ReportId::new(id))?;
            let dir = resolve_export_dir(out.or_else(|| Some(config.export_dir().to_path_buf())))?;
            let exports = ExportService::new(&dir)?;
            let metadata = exports.export(report)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&metadata)?);
            } else {
                println!(
                    "Exported {} to {} ({} bytes, sha256 {})",
                    metadata.filename,
                    exports.export_dir().join(&metadata.relative_path).display(),
                    metadata.size_bytes,
                    metadata.hash
                );
            }
        }
        Commands::Doctors { specialty, page } => {
            let search = DoctorSearch::new()
                .with_specialty(SearchQuery::from(specialty))
                .with_page(page);
            let directory = DoctorDirectory::default();
            let results = directory.search(&search);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                print_doctors(&results);
            }
        }
    }

    Ok(())
}

/// Loads the report feed once, warning on stderr when only built-in reports are available.
fn load_service(config: &PortalConfig) -> ReportService {
    let service = ReportService::load(config.report_source().as_ref());
    if let Some(error) = service.load_error() {
        eprintln!("Warning: failed to load reports ({error}); showing built-in reports only");
    }
    service
}

fn report_line(report: &Report) -> String {
    format!(
        "ID: {}, Title: {}, Date: {}, Doctor: {}",
        report.id, report.title, report.date, report.doctor_name
    )
}

fn doctor_line(doctor: &Doctor) -> String {
    format!(
        "{} ({}), {}",
        doctor.name, doctor.specialty, doctor.address
    )
}

fn print_doctors(results: &Page<&Doctor>) {
    if results.items.is_empty() {
        println!("No doctors found.");
    }
    for doctor in &results.items {
        println!("{}", doctor_line(doctor));
    }
    if results.total_pages > 0 {
        println!("Page {} of {}", results.page, results.total_pages);
    }
}

fn row_line(row: &ClassifiedElement<'_>) -> String {
    format!(
        "  {:<24} {:<16} {:<24} {}",
        row.display_name(),
        row.data.value_with_unit(),
        row.data.range_text(),
        row.status().label()
    )
}

fn row_json(row: &ClassifiedElement<'_>) -> serde_json::Value {
    serde_json::json!({
        "name": row.name,
        "displayName": row.display_name(),
        "value": row.data.value,
        "min": row.data.min,
        "max": row.data.max,
        "unit": row.data.unit,
        "status": row.status().label(),
    })
}

fn print_report(report: &Report, rows: &[ClassifiedElement<'_>], range: RangeFilter) {
    println!("{}", report.title);
    println!("  Date:       {}", report.date);
    println!("  Collected:  {}", report.collection_date);
    println!("  Doctor:     {}", report.doctor_name);
    println!("  Summary:    {}", report.summary);
    if report.has_report_url() {
        println!("  Source:     {}", report.report_url);
    }
    println!();
    println!("Results ({}):", range.label());
    if rows.is_empty() {
        println!("  No matching results.");
    }
    for row in rows {
        println!("{}", row_line(row));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medwell_core::{classify_elements, fallback_reports};

    #[test]
    fn parses_show_with_range_filter() {
        let cli = Cli::try_parse_from(["medwell", "show", "3", "--range", "notAvailable"])
            .expect("parse");
        match cli.command {
            Some(Commands::Show { id, range, search }) => {
                assert_eq!(id, "3");
                assert_eq!(range, RangeFilter::NotAvailable);
                assert!(search.is_none());
            }
            _ => panic!("expected show"),
        }
    }

    #[test]
    fn rejects_unknown_range_filter() {
        assert!(Cli::try_parse_from(["medwell", "show", "1", "--range", "sideways"]).is_err());
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from(["medwell", "list", "--json", "--reports", "feed.json"])
            .expect("parse");
        assert!(cli.json);
        assert_eq!(cli.reports, Some(PathBuf::from("feed.json")));
    }

    #[test]
    fn lines_carry_report_and_row_text() {
        let reports = fallback_reports();
        assert_eq!(
            report_line(&reports[1]),
            "ID: 2, Title: Lipid Panel, Date: 15 Oct, 2024, Doctor: Dr. Rehan"
        );

        let rows = classify_elements(
            &reports[0].elements,
            &SearchQuery::new("calcium"),
            RangeFilter::All,
        );
        let line = row_line(&rows[0]);
        assert!(line.contains("Calcium"));
        assert!(line.contains("10.5 mg/dL"));
        assert!(line.ends_with("Out of Range"));

        let json = row_json(&rows[0]);
        assert_eq!(json["status"], "Out of Range");
        assert_eq!(json["unit"], "mg/dL");
    }

    #[test]
    fn parses_doctor_search() {
        let cli = Cli::try_parse_from(["medwell", "doctors", "--specialty", "surgeon", "--page", "2"])
            .expect("parse");
        match cli.command {
            Some(Commands::Doctors { specialty, page }) => {
                assert_eq!(specialty.as_deref(), Some("surgeon"));
                assert_eq!(page, 2);
            }
            _ => panic!("expected doctors"),
        }

        let cli = Cli::try_parse_from(["medwell", "doctors"]).expect("parse");
        assert!(matches!(
            cli.command,
            Some(Commands::Doctors { specialty: None, page: 1 })
        ));
    }

    #[test]
    fn doctor_line_carries_specialty_and_address() {
        let directory = DoctorDirectory::default();
        let page =
            directory.search(&DoctorSearch::new().with_specialty(SearchQuery::new("pediatric")));
        assert_eq!(
            doctor_line(page.items[0]),
            "Dr. Nishikant (Pediatrician), 456 Anna Salai, Chennai, Tamil Nadu"
        );
    }
}
