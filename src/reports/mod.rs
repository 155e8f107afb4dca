// ===== cellforge/src/reports/mod.rs =====
use cellforge::api::CellReport;
use cellforge::error::CfResult;
use cellforge::optimizer::overlap::OverlapMetric;
use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use std::io::Write;
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "snake_case")]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

pub fn print_cells(report: &CellReport) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Cell").add_attribute(Attribute::Bold),
        Cell::new("Size"),
        Cell::new("Leader").fg(Color::Cyan),
        Cell::new("Members"),
    ]);
    if let Some(col) = table.column_mut(1) {
        col.set_cell_alignment(CellAlignment::Right);
    }

    for (i, cell) in report.cells.iter().enumerate() {
        let (leader, rest) = match report.leaders.get(i) {
            Some(l) => (l.as_str(), cell.get(1..).unwrap_or_default()),
            None => ("-", &cell[..]),
        };
        table.add_row(vec![
            Cell::new(i + 1).add_attribute(Attribute::Bold),
            Cell::new(cell.len()),
            Cell::new(leader).fg(Color::Cyan),
            Cell::new(rest.join(" ")),
        ]);
    }
    println!("\n{}", table);
}

pub fn print_summary(report: &CellReport) {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);

    let rows = [
        ("Members", report.total_members.to_string()),
        ("Cells", report.cell_count.to_string()),
        ("Average size", format!("{:.1}", report.average_size)),
        ("Min overlap", report.min_overlap.to_string()),
        ("Placeholders", report.placeholders.to_string()),
        ("Trials", report.trials.to_string()),
    ];
    for (label, value) in rows {
        table.add_row(vec![
            Cell::new(label).add_attribute(Attribute::Bold),
            Cell::new(value).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("\n=== 🏆 RESULT ===\n{}", table);
}

/// One row per member: `cell,position,member,role` with 1-based numbering.
pub fn write_csv<W: Write>(report: &CellReport, writer: W) -> CfResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["cell", "position", "member", "role"])?;

    for (i, cell) in report.cells.iter().enumerate() {
        let has_leader = i < report.leaders.len();
        for (pos, member) in cell.iter().enumerate() {
            let role = if has_leader && pos == 0 {
                "leader"
            } else {
                "member"
            };
            wtr.write_record([
                (i + 1).to_string(),
                (pos + 1).to_string(),
                member.clone(),
                role.to_string(),
            ])?;
        }
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_score_report(rows: &[(OverlapMetric, usize, usize)]) {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.set_header(vec![
        Cell::new("Metric").add_attribute(Attribute::Bold),
        Cell::new("Overlap").fg(Color::Cyan),
        Cell::new("Unchanged"),
    ]);

    for (metric, overlap, baseline) in rows {
        table.add_row(vec![
            Cell::new(metric),
            Cell::new(overlap).set_alignment(CellAlignment::Right),
            Cell::new(baseline).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{}", table);
}
