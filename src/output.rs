use crate::engine::RunReport;
use crate::models::SimConfig;

pub trait Formatter {
    fn write(&self, report: &RunReport) -> String;
}

pub struct HumanFormatter;
pub struct SummaryFormatter;
pub struct JsonFormatter;

const RULE: &str = "==================================================";

impl Formatter for HumanFormatter {
    fn write(&self, report: &RunReport) -> String {
        let stats = &report.statistics;
        let mut out = String::new();
        out.push_str(RULE);
        out.push_str("\nSIMULATION RESULTS\n");
        out.push_str(RULE);
        out.push('\n');
        out.push_str(&format!("Boxes: {}\n", report.boxes));
        out.push_str(&format!("1) Customers arrived: {}\n", stats.created));
        out.push_str(&format!("2) Customers served: {}\n", stats.served));
        out.push_str(&format!("3) Customers abandoned: {}\n", stats.abandoned));
        out.push_str(&format!(
            "   - Processed total: {}\n",
            stats.served + stats.abandoned
        ));
        out.push_str(&format!("   - Still queued: {}\n", report.still_queued));
        out.push_str(&format!(
            "   - Still in service: {}\n",
            report.still_in_service
        ));
        out.push_str(&format!(
            "   - Efficiency: {:.1}%\n",
            stats.efficiency_pct()
        ));
        out.push_str(&format!(
            "4) Min service time: {} min\n",
            stats.min_service_secs / 60
        ));
        out.push_str(&format!(
            "5) Max service time: {} min\n",
            stats.max_service_secs / 60
        ));
        out.push_str(&format!(
            "6) Min wait time: {} min\n",
            stats.min_wait_secs / 60
        ));
        out.push_str(&format!(
            "7) Max wait time: {} min\n",
            stats.max_wait_secs / 60
        ));
        out.push_str(&format!(
            "8) Total operating cost: ${}\n",
            stats.total_cost
        ));
        out.push_str(&format!("   - Box cost: ${}\n", stats.box_cost));
        out.push_str(&format!(
            "   - Abandonment cost: ${}\n",
            stats.abandonment_cost
        ));
        out.push_str(&format!(
            "Closed at: {}s (+{}s overtime)\n",
            report.summary.finished_at, report.summary.overtime_secs
        ));
        if report.summary.forced {
            out.push_str("Warning: forced termination at the overtime cap\n");
        }
        out.push_str(RULE);
        out.push('\n');
        out
    }
}

impl Formatter for SummaryFormatter {
    fn write(&self, report: &RunReport) -> String {
        let stats = &report.statistics;
        format!(
            concat!(
                "boxes: {}\n",
                "created: {}\n",
                "served: {}\n",
                "abandoned: {}\n",
                "total_cost: {}\n",
                "forced: {}\n",
            ),
            report.boxes,
            stats.created,
            stats.served,
            stats.abandoned,
            stats.total_cost,
            report.summary.forced
        )
    }
}

impl Formatter for JsonFormatter {
    fn write(&self, report: &RunReport) -> String {
        let mut out = serde_json::to_string_pretty(report)
            .unwrap_or_else(|err| format!("{{\"error\": \"{}\"}}", err));
        out.push('\n');
        out
    }
}

pub fn comparison_human(reports: &[RunReport]) -> String {
    let mut out = String::new();
    out.push_str("Comparing box configurations:\n");
    for report in reports {
        let stats = &report.statistics;
        out.push_str(&format!(
            "{} boxes: total cost ${}, served {}, abandoned {}, efficiency {:.1}%\n",
            report.boxes,
            stats.total_cost,
            stats.served,
            stats.abandoned,
            stats.efficiency_pct()
        ));
    }
    if let Some(best) = reports.iter().min_by_key(|report| report.statistics.total_cost) {
        out.push_str(&format!(
            "Optimal configuration: {} boxes (total cost ${})\n",
            best.boxes, best.statistics.total_cost
        ));
    }
    out
}

pub fn comparison_summary(reports: &[RunReport]) -> String {
    let mut out = String::new();
    for report in reports {
        out.push_str(&format!(
            "{}: {}\n",
            report.boxes, report.statistics.total_cost
        ));
    }
    out
}

pub fn comparison_json(reports: &[RunReport]) -> String {
    let mut out = serde_json::to_string_pretty(reports)
        .unwrap_or_else(|err| format!("{{\"error\": \"{}\"}}", err));
    out.push('\n');
    out
}

pub fn show_config(config: &SimConfig) -> String {
    format!(
        concat!(
            "Boxes: {}\n",
            "Operating window: {}s\n",
            "Arrival probability: {}\n",
            "Max wait: {}s\n",
            "Service: mean {}s, stddev {}s, floor {}s\n",
            "Overtime cap: {}s\n",
            "Costs: {} per box, {} per abandonment\n",
            "Seed: {}\n",
        ),
        config.boxes,
        config.window_secs,
        config.arrival_probability,
        config.max_wait_secs,
        config.service.mean_secs,
        config.service.stddev_secs,
        config.service.floor_secs,
        config.overtime_cap_secs,
        config.costs.per_box,
        config.costs.per_abandonment,
        match config.seed {
            Some(seed) => seed.to_string(),
            None => "none".to_string(),
        }
    )
}
