use std::io::{self, Write};

use colored::{ColoredString, Colorize};

use super::{AggregateReport, PerformanceReport, ReportError, Reporter};
use crate::savings::SavingsResult;

const RULE_WIDTH: usize = 96;

/// A reporter that prints savings estimates to the terminal.
#[derive(Debug, Clone)]
pub struct TerminalReporter {
    /// Whether to use colors in output (defaults to true).
    use_colors: bool,
    /// Currency symbol appended to money amounts.
    currency: String,
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalReporter {
    /// Create a new terminal reporter with default settings.
    pub fn new() -> Self {
        Self {
            use_colors: true,
            currency: "€".to_string(),
        }
    }

    /// Create a terminal reporter with color output disabled.
    pub fn without_colors() -> Self {
        Self {
            use_colors: false,
            ..Self::new()
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Format a duration in milliseconds to a human-readable string.
    fn format_duration(ms: f64) -> String {
        if ms.abs() >= 1000.0 {
            format!("{:.3} s", ms / 1000.0)
        } else {
            format!("{:.2} ms", ms)
        }
    }

    /// Format a gain percentage; positive means the optimized variant is faster.
    fn format_gain(gain_percent: f64) -> String {
        if gain_percent > 0.0 {
            format!("+{:.2}%", gain_percent)
        } else {
            format!("{:.2}%", gain_percent)
        }
    }

    /// Format a signed money amount, rounded to whole units.
    fn format_money(&self, amount: f64) -> String {
        let rounded = amount.round();
        if rounded > 0.0 {
            format!("+{:.0} {}", rounded, self.currency)
        } else if rounded < 0.0 {
            format!("{:.0} {}", rounded, self.currency)
        } else {
            format!("0 {}", self.currency)
        }
    }

    fn paint(&self, text: String, style: fn(&str) -> ColoredString) -> String {
        if self.use_colors {
            style(&text).to_string()
        } else {
            text
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(text.to_string(), |s| s.bold())
    }

    /// Green for non-negative amounts, red otherwise.
    fn paint_signed(&self, text: String, value: f64) -> String {
        if value >= 0.0 {
            self.paint(text, |s| s.green())
        } else {
            self.paint(text, |s| s.red())
        }
    }

    fn paint_verdict(&self, text: String, conclusive: bool) -> String {
        if conclusive {
            self.paint(text, |s| s.green())
        } else {
            self.paint(text, |s| s.yellow())
        }
    }

    /// Print the headline of a single-machine report.
    fn print_single_header(
        &self,
        writer: &mut impl Write,
        report: &PerformanceReport,
    ) -> io::Result<()> {
        writeln!(writer)?;
        let title = match &report.tag {
            Some(tag) => format!("Machine: {} ({})", report.machine, tag),
            None => format!("Machine: {}", report.machine),
        };
        writeln!(writer, "{}", self.bold(&title))?;
        writeln!(writer, "{}", "-".repeat(RULE_WIDTH))?;

        let baseline = &report.baseline.stats;
        let optimized = &report.optimized.stats;
        writeln!(
            writer,
            "{:<14} {:>14} (p10 {} / p90 {}, cv {:.1}%)",
            "Baseline",
            Self::format_duration(baseline.median),
            Self::format_duration(baseline.p10),
            Self::format_duration(baseline.p90),
            baseline.cv
        )?;
        writeln!(
            writer,
            "{:<14} {:>14} (p10 {} / p90 {}, cv {:.1}%)",
            "Optimized",
            Self::format_duration(optimized.median),
            Self::format_duration(optimized.p10),
            Self::format_duration(optimized.p90),
            optimized.cv
        )?;

        let comparison = &report.comparison;
        let gain = Self::format_gain(comparison.gain_percent);
        let verdict = if comparison.conclusive {
            "conclusive"
        } else {
            "inconclusive"
        };
        writeln!(
            writer,
            "{:<14} {} (p10 {:.2}% / p90 {:.2}%) {}",
            "Gain",
            self.paint_signed(gain, comparison.gain_percent),
            comparison.gain_p10,
            comparison.gain_p90,
            self.paint_verdict(verdict.to_string(), comparison.conclusive)
        )?;
        Ok(())
    }

    /// Print the annual savings block.
    fn print_savings(
        &self,
        writer: &mut impl Write,
        title: &str,
        savings: &SavingsResult,
    ) -> io::Result<()> {
        writeln!(writer)?;
        writeln!(writer, "{}", self.bold(title))?;
        writeln!(writer, "{}", "-".repeat(RULE_WIDTH))?;

        writeln!(
            writer,
            "{:<14} {:>16}",
            "Time saved",
            format!("{:.1} h/yr", savings.annual_time_saved_hours)
        )?;
        writeln!(
            writer,
            "{:<14} {:>16}   ({}/month)",
            "Server cost",
            self.format_money(savings.annual_cost_savings),
            self.format_money(savings.monthly_cost_savings())
        )?;
        writeln!(
            writer,
            "{:<14} {:>16}   ({:.2} {}/yr)",
            "Electricity",
            format!("{:.1} kWh", savings.annual_energy_saved_kwh),
            savings.annual_electricity_savings,
            self.currency
        )?;
        writeln!(
            writer,
            "{:<14} {:>16}   ({:.2} kg/month)",
            "CO2 avoided",
            format!("{:.1} kg", savings.annual_co2_saved_kg),
            savings.monthly_co2_saved_kg()
        )?;

        let total = format!("{:>16}", self.format_money(savings.total));
        writeln!(
            writer,
            "{} {} per year",
            self.bold(&format!("{:<14}", "Total")),
            self.paint_signed(total, savings.total),
        )?;
        writeln!(writer)?;
        Ok(())
    }

    /// Print the headline of an aggregate report.
    fn print_aggregate_header(
        &self,
        writer: &mut impl Write,
        aggregate: &AggregateReport,
    ) -> io::Result<()> {
        let stats = &aggregate.aggregate_stats;

        writeln!(writer)?;
        let title = format!("Aggregate over {} machines", aggregate.machine_count);
        writeln!(writer, "{}", self.bold(&title))?;
        writeln!(writer, "{}", "-".repeat(RULE_WIDTH))?;

        let median = format!("Median gain: {}", Self::format_gain(stats.median_gain));
        writeln!(writer, "{}", self.paint_signed(median, stats.median_gain))?;
        writeln!(
            writer,
            "P10/P90: {:.2}% / {:.2}%",
            stats.p10_gain, stats.p90_gain
        )?;
        Ok(())
    }

    /// Print the per-machine table header.
    fn print_table_header(&self, writer: &mut impl Write) -> io::Result<()> {
        writeln!(writer)?;
        let header = format!(
            "{:<28} {:>10} {:>14} {:>14} {:>8} {:>16}",
            "Machine", "Gain", "Baseline", "Optimized", "Verdict", "Savings/yr"
        );
        writeln!(writer, "{}", self.bold(&header))?;
        writeln!(writer, "{}", "-".repeat(RULE_WIDTH))?;
        Ok(())
    }

    /// Print a single machine row.
    fn print_machine_row(
        &self,
        writer: &mut impl Write,
        report: &PerformanceReport,
        savings: &SavingsResult,
    ) -> io::Result<()> {
        let name = if report.machine.chars().count() > 26 {
            let truncated: String = report.machine.chars().take(23).collect();
            format!("{}...", truncated)
        } else {
            report.machine.clone()
        };

        let gain = format!("{:>10}", Self::format_gain(report.comparison.gain_percent));
        let verdict = if report.comparison.conclusive { "✓" } else { "?" };
        let verdict = format!("{:>8}", verdict);
        let total = format!("{:>16}", self.format_money(savings.total));

        writeln!(
            writer,
            "{:<28} {} {:>14} {:>14} {} {}",
            name,
            self.paint_signed(gain, report.comparison.gain_percent),
            Self::format_duration(report.baseline.stats.median),
            Self::format_duration(report.optimized.stats.median),
            self.paint_verdict(verdict, report.comparison.conclusive),
            self.paint_signed(total, savings.total),
        )?;
        Ok(())
    }

    /// Write a single-machine report to any writer.
    pub fn write_single(
        &self,
        writer: &mut impl Write,
        report: &PerformanceReport,
        savings: &SavingsResult,
    ) -> io::Result<()> {
        self.print_single_header(writer, report)?;
        self.print_savings(writer, "Annual impact", savings)
    }

    /// Write an aggregate report to any writer.
    pub fn write_aggregate(
        &self,
        writer: &mut impl Write,
        aggregate: &AggregateReport,
        per_machine: &[(&str, SavingsResult)],
        total: &SavingsResult,
    ) -> io::Result<()> {
        self.print_aggregate_header(writer, aggregate)?;
        self.print_table_header(writer)?;

        for (report, (_, savings)) in aggregate.reports.iter().zip(per_machine) {
            self.print_machine_row(writer, report, savings)?;
        }

        let title = format!("Total annual impact ({} machines)", aggregate.machine_count);
        self.print_savings(writer, &title, total)
    }
}

impl Reporter for TerminalReporter {
    fn report_single(
        &self,
        report: &PerformanceReport,
        savings: &SavingsResult,
    ) -> Result<(), ReportError> {
        let stdout = io::stdout();
        let mut writer = stdout.lock();
        self.write_single(&mut writer, report, savings)?;
        Ok(())
    }

    fn report_aggregate(
        &self,
        aggregate: &AggregateReport,
        per_machine: &[(&str, SavingsResult)],
        total: &SavingsResult,
    ) -> Result<(), ReportError> {
        let stdout = io::stdout();
        let mut writer = stdout.lock();
        self.write_aggregate(&mut writer, aggregate, per_machine, total)?;
        Ok(())
    }
}
