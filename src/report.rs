//! Plain-text rendering of simulation results.
//!
//! Currency is shown with two decimals, counts with thousands separators
//! and percentages with one decimal.

use std::fmt::Write as _;

use crate::engine::{CreatorResult, SimulationResult, ValueStatus};
use crate::goal::CampaignGoal;

fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `1234567` -> `1,234,567`.
#[must_use]
pub fn format_count(value: i64) -> String {
    let grouped = group_digits(&value.unsigned_abs().to_string());
    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Unsigned variant of [`format_count`].
#[must_use]
pub fn format_count_u64(value: u64) -> String {
    group_digits(&value.to_string())
}

/// `1234.5` -> `$1,234.50`, `-3.0` -> `-$3.00`.
#[must_use]
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return format!("${value}");
    }
    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}${}.{cents}", group_digits(whole))
}

/// `12.345` -> `12.3%`.
#[must_use]
pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// Currency with an explicit `+` for non-negative values.
#[must_use]
pub fn signed_currency(value: f64) -> String {
    if value >= 0.0 {
        format!("+{}", format_currency(value))
    } else {
        format_currency(value)
    }
}

/// Count with an explicit `+` for non-negative values.
#[must_use]
pub fn signed_count(value: i64) -> String {
    if value >= 0 {
        format!("+{}", format_count(value))
    } else {
        format_count(value)
    }
}

/// Percentage with an explicit `+` for non-negative values.
#[must_use]
pub fn signed_percent(value: f64) -> String {
    if value >= 0.0 {
        format!("+{}", format_percent(value))
    } else {
        format_percent(value)
    }
}

/// Short verdict for one line item, e.g. `38.0% above target`.
#[must_use]
pub fn value_verdict(result: &CreatorResult) -> String {
    let pct = result.cpm_percentage_difference;
    match result.value_status {
        ValueStatus::Undervalued => format!("{} below target", format_percent(pct.abs())),
        ValueStatus::Overvalued => format!("{} above target", format_percent(pct.abs())),
        ValueStatus::Fair => format!("{} vs target", signed_percent(pct)),
    }
}

/// Renders a full text report.
#[must_use]
pub fn render(result: &SimulationResult, goal: &CampaignGoal) -> String {
    let mut out = String::new();
    let t = &result.totals;
    let c = &result.comparison;

    let _ = writeln!(out, "Campaign ({})", goal.campaign_type);
    let _ = writeln!(
        out,
        "  Budget {}  |  Target impressions {}  |  Target CPM {}  |  Creators planned {}",
        format_currency(goal.budget),
        format_count_u64(goal.target_impressions),
        format_currency(result.target_cpm),
        goal.creator_count,
    );
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Total impressions  {}  ({} / {} of target)",
        format_count_u64(t.impressions),
        signed_count(c.impression_difference),
        format_percent(c.impression_percentage),
    );
    let _ = writeln!(
        out,
        "Total cost         {}  ({} / {} of budget)",
        format_currency(t.cost),
        signed_currency(c.budget_difference),
        format_percent(c.budget_percentage),
    );
    let _ = writeln!(
        out,
        "Average CPM        {}  ({}{} vs target)",
        format_currency(t.cpm),
        if c.cpm_difference >= 0.0 { "+" } else { "-" },
        format_currency(c.cpm_difference.abs()),
    );

    if result.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "No creators selected.");
        return out;
    }

    let _ = writeln!(out);
    for r in &result.creator_results {
        let s = &r.selection;
        let _ = writeln!(
            out,
            "- {} ({} {}, {} x {}): {} impressions, {} cost, {} CPM, {} [{}]",
            s.creator_name,
            s.platform,
            s.metrics.handle,
            s.post_count,
            s.post_type,
            format_count_u64(r.expected_impressions),
            format_currency(r.estimated_cost),
            format_currency(r.cpm),
            r.value_status,
            value_verdict(r),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::engine::simulate;
    use crate::goal::CampaignType;
    use crate::metrics::{PlatformMetrics, Tier};
    use crate::selection::{CampaignSelection, PostType};

    #[test]
    fn counts_are_grouped() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(-430_000), "-430,000");
        assert_eq!(format_count_u64(1_234_567), "1,234,567");
    }

    #[test]
    fn currency_has_two_decimals() {
        assert_eq!(format_currency(1900.0), "$1,900.00");
        assert_eq!(format_currency(26_520.456), "$26,520.46");
        assert_eq!(format_currency(-18_420.0), "-$18,420.00");
        assert_eq!(format_currency(0.001), "$0.00");
        assert_eq!(format_currency(-0.001), "$0.00");
    }

    #[test]
    fn signed_variants_prefix_plus() {
        assert_eq!(signed_currency(18_420.0), "+$18,420.00");
        assert_eq!(signed_count(0), "+0");
        assert_eq!(signed_count(-5), "-5");
        assert_eq!(signed_percent(3.16), "+3.2%");
        assert_eq!(signed_percent(-7.26), "-7.3%");
    }

    #[test]
    fn render_lists_each_creator() {
        let goal = CampaignGoal::new(10_000.0, 1_000_000, CampaignType::Awareness, 1).unwrap();
        let selections = vec![CampaignSelection::new(
            "Brett Chody",
            "Instagram",
            PostType::Reel,
            2,
            PlatformMetrics::new("@brettchody", Tier::Micro, 50_000, 25_000, 5.2, 3.8),
        )];
        let result = simulate(&goal, &selections).unwrap();
        let text = render(&result, &goal);

        assert!(text.contains("Target CPM $10.00"));
        assert!(text.contains("Total impressions  50,000  (-950,000 / 5.0% of target)"));
        assert!(text.contains("Total cost         $1,900.00"));
        assert!(text.contains("Brett Chody (Instagram @brettchody, 2 x Reel)"));
        assert!(text.contains("overvalued [280.0% above target]"));
    }

    #[test]
    fn render_empty_result() {
        let goal = CampaignGoal::new(500.0, 10_000, CampaignType::Performance, 2).unwrap();
        let result = simulate(&goal, &[]).unwrap();
        let text = render(&result, &goal);
        assert!(text.contains("No creators selected."));
        assert!(text.contains("Average CPM        $0.00  (-$50.00 vs target)"));
    }
}
