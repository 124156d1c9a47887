use std::io::{self, Write};

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::drill::{DrillOptions, DrillReport, Outcome};

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Type")]
    resource_type: String,
    #[tabled(rename = "Result")]
    result: &'static str,
}

/// Writes the user-facing result of a drill.
///
/// Import commands and narration go to `out`; deletion errors go to `err`.
/// Without `verbose` the only lines printed are import commands (with their
/// headers when `announce` is set) and deletion failures.
pub fn render(
    report: &DrillReport,
    options: &DrillOptions,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<()> {
    if report.creations == 0 {
        if options.verbose {
            writeln!(out, "No resource creations found in plan.")?;
        }
        return Ok(());
    }

    for checked in &report.checked {
        if options.verbose {
            writeln!(out, "Checking: {}", checked.address)?;
        }

        match &checked.outcome {
            Outcome::Importable { existing, command } => {
                if options.announce || options.verbose {
                    writeln!(out, "\n{} {} already exists", existing.kind_label, existing.name)?;
                    writeln!(
                        out,
                        "Run the following to import this resource into your state:"
                    )?;
                }
                writeln!(out, "{}", command)?;
            }
            Outcome::Deleted { existing } => {
                if options.verbose {
                    writeln!(out, "Deleted {}: {}", existing.kind_label.to_lowercase(), existing.name)?;
                }
            }
            Outcome::DeleteFailed { existing, error } => {
                writeln!(
                    out,
                    "Error deleting {}: {}",
                    existing.kind_label.to_lowercase(),
                    existing.import_id
                )?;
                writeln!(err, "{}", error)?;
            }
            Outcome::Unidentified { attribute } => {
                if options.verbose {
                    writeln!(
                        out,
                        "Skipping {}: {} is not known until apply",
                        checked.address, attribute
                    )?;
                }
            }
            Outcome::Absent | Outcome::CheckFailed { .. } => {}
        }
    }

    if !options.verbose {
        return Ok(());
    }

    if !report.unsupported.is_empty() {
        writeln!(out, "\nThe following resource types are not currently supported:")?;
        for resource_type in &report.unsupported {
            writeln!(out, "  {}", resource_type)?;
        }
    }

    if !report.checked.is_empty() {
        writeln!(out, "\n{}", summary_table(report))?;
    }

    Ok(())
}

fn summary_table(report: &DrillReport) -> String {
    let rows = report.checked.iter().map(|c| SummaryRow {
        address: c.address.clone(),
        resource_type: c.resource_type.clone(),
        result: c.outcome.summary(),
    });
    Table::new(rows).with(Style::sharp()).to_string()
}
