use std::fmt::Write;

use super::chart::line_chart;
use crate::models::{ReferralRecord, RepositorySummary, Series};
use crate::series::{split_series, Rankings};

/// Everything rendered for a single repository.
#[derive(Debug, Clone)]
pub struct RepositorySection {
    pub summary: RepositorySummary,
    pub views: Series,
    pub clones: Series,
    pub referrals: Vec<ReferralRecord>,
}

#[derive(Debug, Default)]
pub struct Report {
    sections: Vec<RepositorySection>,
    failures: Vec<(String, String)>,
    rankings: Rankings,
    top: usize,
}

impl Report {
    pub fn new(top: usize) -> Self {
        Self {
            top,
            ..Self::default()
        }
    }

    pub fn add_section(&mut self, section: RepositorySection) {
        self.sections.push(section);
    }

    /// Records a skipped repository. Whitespace in `reason` is collapsed so a
    /// multi-line API body stays inside one list item.
    pub fn add_failure(&mut self, repository: &str, reason: &str) {
        let reason = reason.split_whitespace().collect::<Vec<_>>().join(" ");
        self.failures.push((repository.to_string(), reason));
    }

    pub fn set_rankings(&mut self, rankings: Rankings) {
        self.rankings = rankings;
    }

    pub fn render(&self) -> String {
        let mut out = String::from("# GitHub Insights\n\n");

        for section in &self.sections {
            render_section(&mut out, section);
        }

        if !self.rankings.is_empty() {
            out.push_str("## Rankings\n\n");
            render_ranking(
                &mut out,
                "Top Repositories by Views",
                "Views",
                &self.rankings.top_views(self.top),
            );
            render_ranking(
                &mut out,
                "Top Repositories by Clones",
                "Clones",
                &self.rankings.top_clones(self.top),
            );
        }

        if !self.failures.is_empty() {
            out.push_str("## Failed Repositories\n\n");
            for (repository, reason) in &self.failures {
                let _ = writeln!(out, "- `{repository}`: {reason}");
            }
            out.push('\n');
        }

        out
    }
}

fn render_section(out: &mut String, section: &RepositorySection) {
    let repo = &section.summary.repository;
    let _ = writeln!(out, "## {repo}\n");

    let (total_views, unique_views) = split_series(&section.views);
    out.push_str(&line_chart(
        &format!("Visitors for {repo}"),
        "Views",
        &["Total Views", "Unique Views"],
        &[total_views, unique_views],
    ));
    out.push('\n');

    let (total_clones, unique_clones) = split_series(&section.clones);
    out.push_str(&line_chart(
        &format!("Git Clones for {repo}"),
        "Clones",
        &["Total Clones", "Unique Clones"],
        &[total_clones, unique_clones],
    ));
    out.push('\n');

    let _ = writeln!(
        out,
        "**Total views:** {} | **Total clones:** {}\n",
        section.summary.total_views, section.summary.total_clones
    );

    out.push_str("| Referral Source | Views | Unique Visitors |\n");
    out.push_str("|-|-|-|\n");
    for referral in &section.referrals {
        let _ = writeln!(
            out,
            "| {} | {} | {} |",
            escape_cell(&referral.source),
            referral.total,
            referral.unique
        );
    }
    out.push('\n');
}

fn render_ranking(out: &mut String, heading: &str, column: &str, ranked: &[(String, u64)]) {
    let _ = writeln!(out, "### {heading}\n");
    let _ = writeln!(out, "| # | Repository | {column} |");
    out.push_str("|-|-|-|\n");
    for (position, (repository, value)) in ranked.iter().enumerate() {
        let _ = writeln!(out, "| {} | {repository} | {value} |", position + 1);
    }
    out.push('\n');
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
