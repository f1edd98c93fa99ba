use serde::Serialize;

use crate::core::fallback::first_non_zero_amount;
use crate::core::models::interaction::Interaction;

/// Cost-savings figures for one interaction.
///
/// `effective_baseline_cost` is the baseline actually used for the percent
/// math, after the fallback chain; it is kept as the original decimal string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostSavings {
    /// Savings percentage in `[0, 100]`; `None` when there is no usable
    /// baseline (rendered as "—", never "0%").
    pub percent: Option<f64>,
    /// Upstream token-savings figure, passed through verbatim.
    pub toon_tokens_saved: u64,
    pub effective_baseline_cost: String,
}

/// Compute savings for one interaction.
///
/// Baseline resolution: `baselineCost` if present and non-zero, else `cost`,
/// else `"0"`. Falling back to `cost` pins the percent at 0 instead of
/// producing a spurious 100% (or a division error) when no substitution
/// happened. A present `toonSkipReason` does not suppress the numbers; the
/// caller decides how to surface it.
pub fn calculate_cost_savings(interaction: &Interaction) -> CostSavings {
    let baseline = first_non_zero_amount(&[
        interaction.baseline_cost.as_deref(),
        interaction.cost.as_deref(),
    ]);
    let effective_baseline_cost = baseline.unwrap_or("0").to_string();

    let percent = baseline
        .and_then(|b| b.parse::<f64>().ok())
        .filter(|b| *b != 0.0)
        .map(|b| {
            let cost = parse_amount(interaction.cost.as_deref());
            ((b - cost) / b * 100.0).clamp(0.0, 100.0)
        });

    CostSavings {
        percent,
        toon_tokens_saved: interaction.toon_tokens_saved.unwrap_or(0),
        effective_baseline_cost,
    }
}

/// Lenient decimal-string parse: absent or malformed amounts count as zero.
fn parse_amount(value: Option<&str>) -> f64 {
    value
        .and_then(|s| s.trim().parse::<f64>().ok())
        .unwrap_or(0.0)
}
