use jobledger_core::Money;
use jobledger_import::Categorization;

const RULE_WIDTH: usize = 60;
const VENDOR_WIDTH: usize = 20;
const AMOUNT_WIDTH: usize = 8;

pub const REPORT_TITLE: &str = "JOB EXPENSE CATEGORIZATION REPORT";

/// Per-bucket subtotals in report order, plus their sum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Totals {
    pub subtotals: Vec<(String, Money)>,
    pub grand_total: Money,
}

impl Totals {
    pub fn of(categorized: &Categorization) -> Self {
        let subtotals: Vec<(String, Money)> = categorized
            .buckets()
            .map(|(name, txs)| (name.to_string(), txs.iter().map(|t| t.amount).sum()))
            .collect();
        let grand_total = subtotals.iter().map(|(_, total)| total).sum();
        Totals { subtotals, grand_total }
    }
}

/// Render the plain-text categorization report.
///
/// One section per bucket in name order, each closed by a subtotal; the
/// document ends with the grand total.
pub fn render_report(categorized: &Categorization) -> String {
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);
    let totals = Totals::of(categorized);

    let mut lines = vec![heavy.clone(), REPORT_TITLE.to_string(), heavy.clone(), String::new()];

    for ((name, txs), (_, subtotal)) in categorized.buckets().zip(&totals.subtotals) {
        lines.push(format!("📁 {}", name.to_uppercase()));
        lines.push(light.clone());
        lines.extend(txs.iter().map(|t| {
            format!(
                "  {}  {:<VENDOR_WIDTH$}  ${:>AMOUNT_WIDTH$}  {}",
                t.date,
                t.vendor,
                t.amount.to_plain_string(),
                t.description
            )
        }));
        lines.push(String::new());
        lines.push(format!("  SUBTOTAL: {}", subtotal.to_grouped_string()));
        lines.push(String::new());
    }

    lines.push(heavy.clone());
    lines.push(format!("GRAND TOTAL: {}", totals.grand_total.to_grouped_string()));
    lines.push(heavy);
    lines.join("\n")
}
