//! Summary and table report generators for shell output.
//!
//! Provides compact, human-readable output for terminal usage.

use super::{ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::model::{Cycle, EolEntry, EolStatus, Product};
use crate::scan::{ComponentResult, ScanSummary};
use crate::store::CatalogStats;
use std::fmt::Write;

/// Apply ANSI color formatting if colored output is enabled.
fn ansi_color(text: &str, color: &str, colored: bool) -> String {
    if colored {
        match color {
            "red" => format!("\x1b[31m{text}\x1b[0m"),
            "green" => format!("\x1b[32m{text}\x1b[0m"),
            "yellow" => format!("\x1b[33m{text}\x1b[0m"),
            "cyan" => format!("\x1b[36m{text}\x1b[0m"),
            "bold" => format!("\x1b[1m{text}\x1b[0m"),
            "dim" => format!("\x1b[2m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    } else {
        text.to_string()
    }
}

const fn status_color(status: EolStatus) -> &'static str {
    match status {
        EolStatus::Eol => "red",
        EolStatus::EolSoon => "yellow",
        EolStatus::Active => "green",
        EolStatus::Unknown => "dim",
    }
}

fn days_label(days: Option<i64>) -> String {
    days.map_or_else(|| "-".to_string(), |d| d.to_string())
}

/// Summary reporter for shell output
pub struct SummaryReporter {
    /// Use colored output
    colored: bool,
}

impl SummaryReporter {
    /// Create a new summary reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: true }
    }

    /// Disable colored output
    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }

    const fn table(&self) -> TableReporter {
        TableReporter {
            colored: self.colored,
        }
    }

    fn attention_line(&self, c: &ComponentResult) -> String {
        let marker = match c.status {
            EolStatus::Eol => self.color("✗", "red"),
            _ => self.color("!", "yellow"),
        };
        let mut detail = Vec::new();
        if let Some(date) = &c.eol_date {
            detail.push(format!("EOL {date}"));
        }
        if let Some(days) = c.days_until_eol {
            detail.push(format!("{days} days left"));
        }
        if let Some(cycle) = &c.matched_cycle {
            detail.push(format!("cycle {cycle}"));
        }
        if let Some(latest) = &c.latest_version {
            detail.push(format!("latest {latest}"));
        }
        let detail = if detail.is_empty() {
            String::new()
        } else {
            format!(" ({})", detail.join(", "))
        };
        format!("  {marker} {} {}{detail}", c.name, c.version)
    }
}

impl Default for SummaryReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for SummaryReporter {
    fn generate_scan_report(
        &self,
        summary: &ScanSummary,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut lines = Vec::new();

        let title = config.title.as_deref().unwrap_or("EOL Scan Summary");
        lines.push(self.color(title, "bold"));
        lines.push(self.color("─".repeat(40).as_str(), "dim"));

        if !summary.image_reference.is_empty() {
            lines.push(format!(
                "{}     {}",
                self.color("Image:", "cyan"),
                summary.image_reference
            ));
        }
        if let Some(os) = &summary.os {
            let name = if os.pretty_name.is_empty() {
                format!("{} {}", os.name, os.version)
            } else {
                os.pretty_name.clone()
            };
            lines.push(format!(
                "{}        {} [{}]",
                self.color("OS:", "cyan"),
                name.trim(),
                self.color(os.status.label(), status_color(os.status))
            ));
        }
        let synced = if summary.db_last_updated.is_empty() {
            "never"
        } else {
            summary.db_last_updated.as_str()
        };
        lines.push(format!("{}   {synced}", self.color("Catalog:", "cyan")));
        lines.push(String::new());

        lines.push(self.color("Components:", "bold"));
        lines.push(format!("  Total:     {}", summary.total_components));
        lines.push(format!(
            "  EOL:       {}",
            self.color(&summary.eol_components.to_string(), "red")
        ));
        lines.push(format!(
            "  EOL soon:  {} (within {} days)",
            self.color(&summary.eol_soon_components.to_string(), "yellow"),
            summary.forward_lookup_days
        ));
        lines.push(format!(
            "  Active:    {}",
            self.color(&summary.active_components.to_string(), "green")
        ));
        lines.push(format!(
            "  Unknown:   {}",
            self.color(&summary.unknown_components.to_string(), "dim")
        ));

        let mut attention: Vec<&ComponentResult> = summary.eol_components().collect();
        if !attention.is_empty() {
            attention.sort_by(|a, b| {
                b.status
                    .severity()
                    .cmp(&a.status.severity())
                    .then_with(|| a.name.cmp(&b.name))
            });
            lines.push(String::new());
            lines.push(self.color("Needs attention:", "bold"));
            let shown = config.limit(attention.len());
            for c in &attention[..shown] {
                lines.push(self.attention_line(c));
            }
            if shown < attention.len() {
                lines.push(format!("  ... and {} more", attention.len() - shown));
            }
        }

        Ok(lines.join("\n") + "\n")
    }

    fn generate_stats_report(&self, stats: &CatalogStats) -> Result<String, ReportError> {
        self.table().generate_stats_report(stats)
    }

    fn generate_eol_listing(&self, entries: &[EolEntry]) -> Result<String, ReportError> {
        self.table().generate_eol_listing(entries)
    }

    fn generate_product_listing(&self, products: &[Product]) -> Result<String, ReportError> {
        self.table().generate_product_listing(products)
    }

    fn generate_cycle_listing(
        &self,
        product: &str,
        cycles: &[Cycle],
    ) -> Result<String, ReportError> {
        self.table().generate_cycle_listing(product, cycles)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Summary
    }
}

/// Table reporter for aligned terminal output
pub struct TableReporter {
    /// Use colored output
    colored: bool,
}

impl TableReporter {
    /// Create a new table reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: true }
    }

    /// Disable colored output
    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }

    /// Render rows as aligned columns. Widths are measured before coloring.
    fn render_rows(
        &self,
        out: &mut String,
        headers: &[&str],
        rows: &[(Vec<String>, Option<&'static str>)],
        color_column: usize,
    ) -> Result<(), ReportError> {
        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for (cells, _) in rows {
            for (w, cell) in widths.iter_mut().zip(cells) {
                *w = (*w).max(cell.chars().count());
            }
        }

        let header = headers
            .iter()
            .zip(&widths)
            .map(|(h, w)| format!("{h:<w$}"))
            .collect::<Vec<_>>()
            .join("  ");
        writeln!(out, "{}", self.color(header.trim_end(), "bold"))?;

        for (cells, color) in rows {
            let line = cells
                .iter()
                .zip(&widths)
                .enumerate()
                .map(|(i, (cell, w))| {
                    let padded = format!("{cell:<w$}");
                    match color {
                        Some(c) if i == color_column => self.color(&padded, c),
                        _ => padded,
                    }
                })
                .collect::<Vec<_>>()
                .join("  ");
            writeln!(out, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

impl Default for TableReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for TableReporter {
    fn generate_scan_report(
        &self,
        summary: &ScanSummary,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut out = String::new();

        if let Some(title) = &config.title {
            writeln!(out, "{}", self.color(title, "bold"))?;
        } else if !summary.image_reference.is_empty() {
            writeln!(out, "{}", self.color(&summary.image_reference, "bold"))?;
        }

        let components: Vec<&ComponentResult> = summary
            .components
            .iter()
            .filter(|c| !config.only_attention || c.status.needs_attention())
            .collect();
        let shown = config.limit(components.len());

        let rows: Vec<(Vec<String>, Option<&'static str>)> = components[..shown]
            .iter()
            .map(|c| {
                (
                    vec![
                        truncate(&c.name, 32),
                        truncate(&c.version, 20),
                        c.kind.clone(),
                        c.status.label().to_string(),
                        c.eol_date.clone().unwrap_or_else(|| "-".to_string()),
                        days_label(c.days_until_eol),
                        c.matched_product.clone().unwrap_or_else(|| "-".to_string()),
                        c.matched_cycle.clone().unwrap_or_else(|| "-".to_string()),
                    ],
                    Some(status_color(c.status)),
                )
            })
            .collect();

        self.render_rows(
            &mut out,
            &["NAME", "VERSION", "TYPE", "STATUS", "EOL DATE", "DAYS", "PRODUCT", "CYCLE"],
            &rows,
            3,
        )?;
        if shown < components.len() {
            writeln!(out, "... and {} more", components.len() - shown)?;
        }

        writeln!(out)?;
        writeln!(
            out,
            "{} components: {} EOL, {} EOL soon, {} active, {} unknown",
            summary.total_components,
            self.color(&summary.eol_components.to_string(), "red"),
            self.color(&summary.eol_soon_components.to_string(), "yellow"),
            self.color(&summary.active_components.to_string(), "green"),
            summary.unknown_components
        )?;
        Ok(out)
    }

    fn generate_stats_report(&self, stats: &CatalogStats) -> Result<String, ReportError> {
        let mut out = String::new();
        writeln!(out, "{}", self.color("Catalog Statistics", "bold"))?;
        writeln!(out, "{}", self.color("─".repeat(40).as_str(), "dim"))?;
        writeln!(out, "Categories:   {}", stats.total_categories)?;
        writeln!(out, "Products:     {}", stats.total_products)?;
        writeln!(out, "Cycles:       {}", stats.total_cycles)?;
        writeln!(
            out,
            "  EOL:        {}",
            self.color(&stats.eol_cycles.to_string(), "red")
        )?;
        writeln!(
            out,
            "  Active:     {}",
            self.color(&stats.active_cycles.to_string(), "green")
        )?;
        writeln!(out, "Identifiers:  {}", stats.total_identifiers)?;
        for (kind, count) in &stats.identifiers_by_type {
            writeln!(out, "  {:<10}  {count}", format!("{kind}:"))?;
        }

        if !stats.products_by_category.is_empty() {
            writeln!(out)?;
            writeln!(out, "{}", self.color("Products by category:", "cyan"))?;
            for (category, count) in &stats.products_by_category {
                writeln!(out, "  {category:<16}  {count}")?;
            }
        }

        writeln!(out)?;
        let sync = &stats.sync;
        writeln!(
            out,
            "Last full sync:     {}",
            sync.last_full_sync.as_deref().unwrap_or("never")
        )?;
        writeln!(
            out,
            "Last update check:  {}",
            sync.last_update_check.as_deref().unwrap_or("never")
        )?;
        if !sync.categories_synced.is_empty() {
            writeln!(out, "Synced categories:  {}", sync.categories_synced.join(", "))?;
        }
        Ok(out)
    }

    fn generate_eol_listing(&self, entries: &[EolEntry]) -> Result<String, ReportError> {
        let mut out = String::new();
        if entries.is_empty() {
            writeln!(out, "No matching cycles.")?;
            return Ok(out);
        }
        let rows: Vec<_> = entries
            .iter()
            .map(|e| {
                (
                    vec![
                        e.product.clone(),
                        e.category.clone().unwrap_or_else(|| "-".to_string()),
                        e.cycle.name.clone(),
                        e.cycle.eol.to_string(),
                        e.cycle
                            .latest_version
                            .clone()
                            .unwrap_or_else(|| "-".to_string()),
                    ],
                    None,
                )
            })
            .collect();
        self.render_rows(&mut out, &["PRODUCT", "CATEGORY", "CYCLE", "EOL", "LATEST"], &rows, 3)?;
        writeln!(out, "\n{} cycles", entries.len())?;
        Ok(out)
    }

    fn generate_product_listing(&self, products: &[Product]) -> Result<String, ReportError> {
        let mut out = String::new();
        if products.is_empty() {
            writeln!(out, "No products.")?;
            return Ok(out);
        }
        let rows: Vec<_> = products
            .iter()
            .map(|p| {
                (
                    vec![
                        p.name.clone(),
                        p.category.clone().unwrap_or_else(|| "-".to_string()),
                        truncate(p.label.as_deref().unwrap_or("-"), 40),
                        truncate(&p.aliases.join(","), 40),
                    ],
                    None,
                )
            })
            .collect();
        self.render_rows(&mut out, &["NAME", "CATEGORY", "LABEL", "ALIASES"], &rows, 0)?;
        writeln!(out, "\n{} products", products.len())?;
        Ok(out)
    }

    fn generate_cycle_listing(
        &self,
        product: &str,
        cycles: &[Cycle],
    ) -> Result<String, ReportError> {
        let mut out = String::new();
        writeln!(out, "{}", self.color(product, "bold"))?;
        if cycles.is_empty() {
            writeln!(out, "No cycles.")?;
            return Ok(out);
        }
        let rows: Vec<_> = cycles
            .iter()
            .map(|c| {
                let color = if c.eol.is_flagged() {
                    Some("red")
                } else if c.is_maintained {
                    Some("green")
                } else {
                    None
                };
                (
                    vec![
                        c.name.clone(),
                        c.codename.clone().unwrap_or_else(|| "-".to_string()),
                        c.release_date.clone().unwrap_or_else(|| "-".to_string()),
                        c.eol.to_string(),
                        c.support.to_string(),
                        if c.is_lts { "yes" } else { "no" }.to_string(),
                        c.latest_version.clone().unwrap_or_else(|| "-".to_string()),
                    ],
                    color,
                )
            })
            .collect();
        self.render_rows(
            &mut out,
            &["CYCLE", "CODENAME", "RELEASED", "EOL", "SUPPORT", "LTS", "LATEST"],
            &rows,
            3,
        )?;
        Ok(out)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Table
    }
}

/// Truncate a string to `max_len` characters, marking the cut with `...`.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{kept}...")
    } else {
        s.chars().take(max_len).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Milestone;
    use crate::scan::OsResult;

    fn summary() -> ScanSummary {
        let mut summary: ScanSummary = serde_json::from_value(serde_json::json!({
            "total_components": 3,
            "eol_components": 1,
            "eol_soon_components": 1,
            "active_components": 0,
            "unknown_components": 1,
            "components": [],
            "scan_time": "2025-06-01T00:00:00Z",
            "image_reference": "python:2.7-slim",
            "forward_lookup_days": 90
        }))
        .unwrap();
        summary.os = Some(OsResult {
            pretty_name: "Debian GNU/Linux 10 (buster)".to_string(),
            status: EolStatus::Eol,
            ..Default::default()
        });
        summary.components = vec![
            ComponentResult {
                name: "python".to_string(),
                version: "2.7.18".to_string(),
                kind: "binary".to_string(),
                status: EolStatus::Eol,
                eol_date: Some("2020-01-01".to_string()),
                matched_product: Some("python".to_string()),
                matched_cycle: Some("2.7".to_string()),
                ..Default::default()
            },
            ComponentResult {
                name: "nodejs".to_string(),
                version: "18.20.0".to_string(),
                status: EolStatus::EolSoon,
                days_until_eol: Some(29),
                ..Default::default()
            },
            ComponentResult {
                name: "left-pad".to_string(),
                version: "1.3.0".to_string(),
                ..Default::default()
            },
        ];
        summary
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a-very-long-package-name", 10), "a-very-...");
        assert_eq!(truncate("héllo wörld", 8), "héllo...");
        assert_eq!(truncate("abcdef", 2), "ab");
    }

    #[test]
    fn test_summary_without_color() {
        let report = SummaryReporter::new()
            .no_color()
            .generate_scan_report(&summary(), &ReportConfig::default())
            .unwrap();
        assert!(!report.contains("\x1b["));
        assert!(report.contains("python:2.7-slim"));
        assert!(report.contains("Debian GNU/Linux 10 (buster) [EOL]"));
        assert!(report.contains("Catalog:   never"));
        assert!(report.contains("python 2.7.18 (EOL 2020-01-01, cycle 2.7)"));
        assert!(report.contains("nodejs 18.20.0 (29 days left)"));
        assert!(!report.contains("left-pad"));
        // EOL entries are listed before EOL-soon ones
        assert!(report.find("python 2.7.18").unwrap() < report.find("nodejs").unwrap());
    }

    #[test]
    fn test_summary_respects_max_items() {
        let config = ReportConfig {
            max_items: Some(1),
            ..Default::default()
        };
        let report = SummaryReporter::new()
            .no_color()
            .generate_scan_report(&summary(), &config)
            .unwrap();
        assert!(report.contains("... and 1 more"));
    }

    #[test]
    fn test_table_alignment() {
        let report = TableReporter::new()
            .no_color()
            .generate_scan_report(&summary(), &ReportConfig::default())
            .unwrap();
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines[0], "python:2.7-slim");
        assert!(lines[1].starts_with("NAME"));
        let status_col = lines[1].find("STATUS").unwrap();
        assert_eq!(&lines[2][status_col..status_col + 3], "EOL");
        assert_eq!(&lines[3][status_col..status_col + 8], "EOL Soon");
        assert!(report.contains("3 components: 1 EOL, 1 EOL soon, 0 active, 1 unknown"));
    }

    #[test]
    fn test_table_attention_only() {
        let report = TableReporter::new()
            .no_color()
            .generate_scan_report(&summary(), &ReportConfig::attention_only())
            .unwrap();
        assert!(report.contains("nodejs"));
        assert!(!report.contains("left-pad"));
    }

    #[test]
    fn test_colored_status() {
        let report = TableReporter::new()
            .generate_scan_report(&summary(), &ReportConfig::default())
            .unwrap();
        assert!(report.contains("\x1b[31mEOL"));
        assert!(report.contains("\x1b[33mEOL Soon"));
    }

    #[test]
    fn test_cycle_listing() {
        let cycles = vec![
            Cycle::new("3.12")
                .with_eol(Milestone::Date("2028-10-31".to_string()))
                .maintained(true),
            Cycle::new("2.7").with_eol(Milestone::Flag(true)),
        ];
        let report = TableReporter::new()
            .no_color()
            .generate_cycle_listing("python", &cycles)
            .unwrap();
        assert!(report.starts_with("python\n"));
        assert!(report.contains("2028-10-31"));
        assert!(report.lines().any(|l| l.starts_with("2.7") && l.contains("yes")));
    }

    #[test]
    fn test_empty_listings() {
        let table = TableReporter::new().no_color();
        assert_eq!(table.generate_eol_listing(&[]).unwrap(), "No matching cycles.\n");
        assert_eq!(table.generate_product_listing(&[]).unwrap(), "No products.\n");
    }
}
