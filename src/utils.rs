//! Formatting and export helpers for plans and reports.

use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::allocation::AllocationPlan;
use crate::bottleneck::BottleneckReport;
use crate::error::LoadError;
use crate::recommend::Recommendation;

/// Format a duration given in hours as days, hours and minutes.
pub fn format_hours(hours: f64) -> String {
    let total_minutes = (hours.max(0.0) * 60.0).round() as u64;
    let days = total_minutes / (24 * 60);
    let h = (total_minutes % (24 * 60)) / 60;
    let m = total_minutes % 60;

    if days > 0 {
        format!("{}d {:02}h {:02}m", days, h, m)
    } else {
        format!("{}h {:02}m", h, m)
    }
}

/// Save a plan as pretty-printed JSON.
pub fn save_plan_json<P: AsRef<Path>>(plan: &AllocationPlan, path: P) -> Result<(), LoadError> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, plan)?;
    Ok(())
}

impl fmt::Display for AllocationPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Distribution Plan")?;
        writeln!(
            f,
            "Coverage: {:.1}% ({} of {} units)",
            self.coverage, self.units_granted, self.units_requested
        )?;
        writeln!(
            f,
            "Total Cost: {:.2} of {:.2} (remaining {:.2})",
            self.total_cost, self.budget, self.remaining_budget
        )?;
        writeln!(f, "Delivery Time: {}", format_hours(self.total_time_hours))?;
        writeln!(f)?;

        for (i, route) in self.routes.iter().enumerate() {
            writeln!(
                f,
                "Route #{}: {}{}{}",
                i + 1,
                route.district,
                if route.priority { " [priority]" } else { "" },
                if route.partial { " [partial]" } else { "" },
            )?;
            writeln!(f, "  {}", route.path.join(" -> "))?;
            writeln!(
                f,
                "  Units: {} / {}  Cost: {:.2}  Time: {}",
                route.units,
                route.units_requested,
                route.cost,
                format_hours(route.time_hours)
            )?;
        }

        if !self.unmet_demand.is_empty() {
            writeln!(f)?;
            writeln!(f, "Unmet Demand:")?;
            for (district, units) in &self.unmet_demand {
                writeln!(f, "  {}: {}", district, units)?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for BottleneckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Bottlenecks Found:")?;
        writeln!(f, "  Capacity Issues: {}", self.capacity_constraints.len())?;
        for c in &self.capacity_constraints {
            writeln!(
                f,
                "    {}: {} / {} (gap {})",
                c.hub, c.current_capacity, c.recommended, c.gap
            )?;
        }
        writeln!(f, "  Connectivity Issues: {}", self.connectivity_issues.len())?;
        for c in &self.connectivity_issues {
            writeln!(f, "    {}: {}", c.hub, c.issue)?;
        }
        writeln!(f, "  Reliability Concerns: {}", self.reliability_concerns.len())?;
        for r in &self.reliability_concerns {
            writeln!(f, "    {} -> {}: {:.2}", r.from, r.to, r.reliability)?;
        }
        if let Some(gap) = &self.cold_chain_gap {
            writeln!(
                f,
                "  Cold Chain: {:.1}% coverage, target {:.0}%, {} districts need equipment",
                gap.current_coverage * 100.0,
                gap.target * 100.0,
                gap.districts_needing_cold_chain
            )?;
        }

        Ok(())
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {:.0} ({:?} impact, {})",
            self.kind, self.action, self.cost, self.impact, self.timeline
        )
    }
}

/// Plain-text rendering of a plan.
pub fn format_plan(plan: &AllocationPlan) -> String {
    plan.to_string()
}

/// Plain-text rendering of a bottleneck report.
pub fn format_bottlenecks(report: &BottleneckReport) -> String {
    report.to_string()
}

/// Plain-text rendering of recommendations.
pub fn format_recommendations(recommendations: &[Recommendation]) -> String {
    let header = format!("Recommendations ({}):\n", recommendations.len());
    recommendations
        .iter()
        .fold(header, |out, rec| out + &format!("  - {}\n", rec))
}
