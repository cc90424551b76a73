use keben_model::{Report, ValidationErrors};

/// One line per report: id, time, materials, driver, truck, route, paid, status.
pub fn report_line(report: &Report) -> String {
    format!(
        "{}  {}  {}  {}  {}  {}  paid {}  {}",
        report.id,
        report.timestamp.format("%Y-%m-%d %H:%M"),
        report.material_summary(),
        report.details.driver_name,
        report.details.truck_number,
        report.route(),
        report.details.amount_paid,
        report.sync_status,
    )
}

/// Orders reports for display. Storage order is oldest first.
pub fn sort_for_display(mut reports: Vec<Report>, newest_first: bool) -> Vec<Report> {
    if newest_first {
        reports.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    }
    reports
}

/// `field: message` for each validation failure.
pub fn validation_lines(errors: &ValidationErrors) -> Vec<String> {
    errors.iter().map(|e| format!("  {}: {}", e.field, e.message)).collect()
}
