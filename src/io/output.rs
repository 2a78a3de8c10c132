use crate::fingerprint::BinStats;
use crate::mesh::SurfaceMesh;
use prettytable::{format, row, Table};

/// Lines of the per-mesh report, label left and count right aligned.
fn report_line(label: &str, value: impl std::fmt::Display) -> String {
    format!("{:<21}{:>10}\n", label, value)
}

/// The report printed after fingerprinting a mesh.
pub fn mesh_report(name: &str, mesh: &SurfaceMesh, stats: &BinStats) -> String {
    let mut report = format!("{}:\n", name);
    report.push_str(&report_line("Number of vertices:", mesh.vertices.len()));
    report.push_str(&report_line("Number of indices:", mesh.indices.len()));
    report.push_str(&report_line("Number of d_i:", mesh.d_i.len()));
    report.push_str(&report_line("Number of d_e:", mesh.d_e.len()));
    report.push_str(&report_line("Degenerate triangles:", stats.degenerate));
    report.push_str(&report_line("Outside the grid:", stats.out_of_range));
    report.push('\n');
    report.push_str(&report_line("Non-zero bins:", stats.populated));
    report.push_str(&report_line("Total surface area:",
                                 format!("{:.5}", stats.integral_area)));
    report
}

/// One line of the difference number listing.
pub fn number_line(name: &str, number: f64) -> String {
    format!("{}:  {:6.4}", name, number)
}

/// Creates a format for the output tables.
pub fn table_format() -> format::TableFormat {
    let line_position =
        &[format::LinePosition::Title, format::LinePosition::Bottom];
    let line_separator = format::LineSeparator::new('-', '+', '+', '+');
    format::FormatBuilder::new().column_separator('|')
                                .separators(line_position, line_separator)
                                .padding(1, 1)
                                .build()
}

/// The closing summary: difference numbers sorted by name, then every unit
/// that failed.
///
/// * `numbers`: (difference map, difference number) pairs.
/// * `failures`: (file, reason) pairs.
pub fn summary(numbers: &[(String, f64)], failures: &[(String, String)]) -> String {
    let mut out = String::new();
    if !numbers.is_empty() {
        let mut numbers = numbers.to_vec();
        numbers.sort_by(|a, b| a.0.cmp(&b.0));
        let mut table = Table::new();
        table.set_format(table_format());
        table.set_titles(row![c => "#", "Difference Map", "Difference Number"]);
        for (i, (name, number)) in numbers.iter().enumerate() {
            table.add_row(row![r => i + 1, name, format!("{:.4}", number)]);
        }
        out.push_str(&table.to_string());
    }
    if !failures.is_empty() {
        out.push_str(&format!("  Failed: {}\n", failures.len()));
        for (file, reason) in failures {
            out.push_str(&format!("    {}: {}\n", file, reason));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_number_line() {
        assert_eq!(number_line("diff_a_b.dat", 12.5), "diff_a_b.dat:  12.5000");
        assert_eq!(number_line("diff_a_a.dat", 0.0), "diff_a_a.dat:  0.0000");
    }

    #[test]
    fn output_mesh_report() {
        let mesh = SurfaceMesh::new(vec![[0., 0., 0.], [1., 0., 0.], [0., 1., 0.]],
                                    vec![[0, 1, 2]],
                                    vec![1.0; 3],
                                    vec![1.0; 3]).unwrap();
        let stats = BinStats { triangles: 1,
                               degenerate: 0,
                               out_of_range: 0,
                               populated: 1,
                               integral_area: 0.5 };
        let report = mesh_report("triangle.cxs", &mesh, &stats);
        assert!(report.starts_with("triangle.cxs:\n"));
        assert!(report.contains("Number of vertices:           3\n"));
        assert!(report.contains("Non-zero bins:                1\n"));
        assert!(report.contains("Total surface area:     0.50000\n"));
    }

    #[test]
    fn output_summary_sorted() {
        let numbers = vec![(String::from("diff_b_c.dat"), 2.0),
                           (String::from("diff_a_b.dat"), 1.0)];
        let out = summary(&numbers, &[]);
        let a = out.find("diff_a_b.dat").unwrap();
        let b = out.find("diff_b_c.dat").unwrap();
        assert!(a < b);
        assert!(out.contains("1.0000"));
        assert!(!out.contains("Failed"));
    }

    #[test]
    fn output_summary_failures() {
        let failures = vec![(String::from("bad.cxs"), String::from("missing end"))];
        let out = summary(&[], &failures);
        assert_eq!(out, "  Failed: 1\n    bad.cxs: missing end\n");
    }
}
