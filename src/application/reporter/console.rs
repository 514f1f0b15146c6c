//! Plain-text console summary.

use std::fmt;

use super::format::{coverage_grade, grouped, percent, price};
use crate::domain::{AggregateReport, AssetObservation, ExchangeResult};

const RULE_WIDTH: usize = 80;
const SUB_RULE_WIDTH: usize = 40;
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Console rendering of an aggregate report.
pub struct ConsoleSummary<'a> {
    report: &'a AggregateReport,
    display_limit: usize,
}

impl<'a> ConsoleSummary<'a> {
    pub fn new(report: &'a AggregateReport, display_limit: usize) -> Self {
        Self {
            report,
            display_limit,
        }
    }

    fn exchange(&self, f: &mut fmt::Formatter<'_>, result: &ExchangeResult) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "{} EXCHANGE", result.exchange().as_str().to_uppercase())?;
        writeln!(f, "{}", "-".repeat(SUB_RULE_WIDTH))?;

        if !result.is_success() {
            writeln!(f, "Status: FAILED")?;
            writeln!(f, "Error: {}", result.error().unwrap_or("unknown error"))?;
            return Ok(());
        }

        writeln!(
            f,
            "Status: OK (fetched {})",
            result.timestamp().format(TIME_FORMAT)
        )?;
        writeln!(f, "Gainers: {} tokens", result.gainers().len())?;
        writeln!(f, "Losers: {} tokens", result.losers().len())?;

        self.section(f, "GAINERS", result.gainers())?;
        self.section(f, "LOSERS", result.losers())
    }

    fn section(
        &self,
        f: &mut fmt::Formatter<'_>,
        title: &str,
        assets: &[AssetObservation],
    ) -> fmt::Result {
        if assets.is_empty() || self.display_limit == 0 {
            return Ok(());
        }
        writeln!(f)?;
        writeln!(f, "TOP {} {}:", self.display_limit, title)?;
        for (i, asset) in assets.iter().take(self.display_limit).enumerate() {
            writeln!(
                f,
                "  {:>2}. {:<8} ({:<20}) ${:<12} {:>8}  vol ${}",
                i + 1,
                asset.symbol(),
                asset.name(),
                price(asset.price()),
                percent(asset.change_percent()),
                grouped(asset.volume_24h()),
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for ConsoleSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(RULE_WIDTH);

        writeln!(f, "{rule}")?;
        writeln!(f, "CRYPTO TOP GAINERS & LOSERS SUMMARY")?;
        writeln!(
            f,
            "Generated: {}",
            self.report.generated_at().format(TIME_FORMAT)
        )?;
        writeln!(f, "{rule}")?;

        for result in self.report.results() {
            self.exchange(f, result)?;
        }

        let gainers = self.report.total_gainers();
        let losers = self.report.total_losers();
        writeln!(f)?;
        writeln!(f, "{rule}")?;
        writeln!(f, "OVERALL SUMMARY")?;
        writeln!(f, "{rule}")?;
        writeln!(f, "Total gainers collected: {gainers}")?;
        writeln!(f, "Total losers collected: {losers}")?;
        writeln!(f, "Total tokens analyzed: {}", gainers + losers)?;
        writeln!(
            f,
            "Exchanges failed: {} of {}",
            self.report.failure_count(),
            self.report.results().len()
        )?;
        writeln!(f, "Coverage quality: {}", coverage_grade(gainers + losers))?;
        write!(f, "{rule}")
    }
}
