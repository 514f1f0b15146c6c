//! Notification message in Telegram HTML.

use std::fmt;

use chrono::NaiveTime;

use super::format::{escape_html, grouped, percent, price};
use crate::domain::{AggregateReport, AssetObservation, ExchangeResult};

/// HTML rendering of an aggregate report for the notification sink.
pub struct HtmlMessage<'a> {
    report: &'a AggregateReport,
    display_limit: usize,
    next_run: NaiveTime,
}

impl<'a> HtmlMessage<'a> {
    pub fn new(report: &'a AggregateReport, display_limit: usize, next_run: NaiveTime) -> Self {
        Self {
            report,
            display_limit,
            next_run,
        }
    }

    fn exchange(&self, f: &mut fmt::Formatter<'_>, result: &ExchangeResult) -> fmt::Result {
        writeln!(
            f,
            "<b>{}</b>",
            result.exchange().as_str().to_uppercase()
        )?;

        if !result.is_success() {
            writeln!(
                f,
                "❌ Failed: {}",
                escape_html(result.error().unwrap_or("unknown error"))
            )?;
            return writeln!(f);
        }

        writeln!(
            f,
            "✅ Gainers: {} | 📉 Losers: {}",
            result.gainers().len(),
            result.losers().len()
        )?;
        writeln!(f)?;

        self.section(f, "🏆", "GAINERS", result.gainers())?;
        self.section(f, "📉", "LOSERS", result.losers())
    }

    fn section(
        &self,
        f: &mut fmt::Formatter<'_>,
        icon: &str,
        title: &str,
        assets: &[AssetObservation],
    ) -> fmt::Result {
        if assets.is_empty() || self.display_limit == 0 {
            return Ok(());
        }
        writeln!(f, "<b>{icon} TOP {} {title}:</b>", self.display_limit)?;
        for (i, asset) in assets.iter().take(self.display_limit).enumerate() {
            let dot = if asset.change_percent().is_sign_positive() {
                "🟢"
            } else {
                "🔴"
            };
            write!(f, "{}. {dot} <b>{}</b> ", i + 1, escape_html(asset.symbol()))?;
            if asset.name() != asset.symbol() {
                write!(f, "<i>{}</i> ", escape_html(asset.name()))?;
            }
            writeln!(f, "{}", percent(asset.change_percent()))?;
            writeln!(
                f,
                "   💰 ${} | 📈 ${}",
                price(asset.price()),
                grouped(asset.volume_24h())
            )?;
        }
        writeln!(f)
    }
}

impl fmt::Display for HtmlMessage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "🚀 <b>CRYPTO MARKET UPDATE</b> 🚀")?;
        writeln!(
            f,
            "📅 {}",
            self.report.generated_at().format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(f, "📊 <b>Top {} Gainers &amp; Losers Report</b>", self.display_limit)?;
        writeln!(f)?;

        for result in self.report.results() {
            self.exchange(f, result)?;
        }

        let gainers = self.report.total_gainers();
        let losers = self.report.total_losers();
        writeln!(f, "<b>📊 SUMMARY:</b>")?;
        writeln!(f, "🎯 Total Tokens Analyzed: {}", gainers + losers)?;
        writeln!(f, "📈 Total Gainers: {gainers}")?;
        writeln!(f, "📉 Total Losers: {losers}")?;
        if self.report.failure_count() > 0 {
            writeln!(
                f,
                "⚠️ Exchanges failed: {} of {}",
                self.report.failure_count(),
                self.report.results().len()
            )?;
        }
        writeln!(f)?;
        write!(f, "⏰ Next update: daily at {}", self.next_run.format("%H:%M"))
    }
}
