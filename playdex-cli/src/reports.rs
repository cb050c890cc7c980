use anyhow::Result;
use colored::Colorize;
use playdex_engine::{RankedEntry, RecordEvent, SummaryBlock, TimeSeriesPoint};
use serde::Serialize;
use std::io::Write;

use crate::util::csv_field;

/// Everything a run produced, ready to be written in any format.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlayReport {
    pub plays_found: usize,
    pub records_rejected: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<StatsSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<RecordEvent>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<Vec<TimeSeriesPoint>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsSection {
    pub summary: SummaryBlock,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    pub listing: Vec<RankedEntry>,
}

fn games_list(games: &[String]) -> String {
    format!("[{}]", games.join(", "))
}

pub fn generate_console_report(out: &mut dyn Write, report: &PlayReport) -> Result<()> {
    writeln!(out, "found {} plays.", report.plays_found)?;
    if report.records_rejected > 0 {
        writeln!(
            out,
            "{}",
            format!("skipped {} malformed records", report.records_rejected).yellow()
        )?;
    }

    if let Some(stats) = &report.stats {
        writeln!(out)?;
        writeln!(out, "{}", "📊 Play Statistics".bright_cyan().bold())?;
        writeln!(out, "{}", "==================".cyan())?;
        writeln!(
            out,
            "Current H index: {}",
            stats.summary.h_index.to_string().green()
        )?;
        for milestone in &stats.summary.milestones {
            writeln!(out, "Current # {}: {}", milestone.label, milestone.games)?;
        }
        writeln!(out)?;
        if let Some(filter) = &stats.filter {
            writeln!(out, "Games matching {filter:?}:")?;
        }
        for entry in &stats.listing {
            writeln!(out, "{}\t{}\t{}", entry.rank, entry.count, entry.name)?;
        }
    }

    if let Some(history) = &report.history {
        writeln!(out)?;
        writeln!(out, "{}", "🏆 H-index History".bright_yellow().bold())?;
        writeln!(out, "{}", "==================".yellow())?;
        for record in history {
            writeln!(
                out,
                "{}, H: {}, {} games: {}",
                record.date.format("%Y-%m-%d"),
                record.h_index,
                record.games.len(),
                games_list(&record.games)
            )?;
        }
    }

    if let Some(series) = &report.series {
        writeln!(out)?;
        writeln!(out, "{}", "📈 Daily Series".bright_blue().bold())?;
        writeln!(out, "{}", "===============".blue())?;
        writeln!(out, "{:<10}  {:>7}  {:>6}  {:>4}", "date", "plays", "games", "h")?;
        for point in series {
            writeln!(
                out,
                "{:<10}  {:>7}  {:>6}  {:>4}",
                point.date.format("%Y-%m-%d"),
                point.total_plays,
                point.distinct_games,
                point.h_index
            )?;
        }
    }

    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, report: &PlayReport) -> Result<()> {
    let json_output = serde_json::to_string_pretty(report)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report(out: &mut dyn Write, report: &PlayReport) -> Result<()> {
    writeln!(out, "# Playdex Report\n")?;
    writeln!(out, "- **Plays found**: {}", report.plays_found)?;
    writeln!(out, "- **Records skipped**: {}\n", report.records_rejected)?;

    if let Some(stats) = &report.stats {
        writeln!(out, "## Statistics\n")?;
        writeln!(out, "- **H index**: {}", stats.summary.h_index)?;
        writeln!(out, "- **Total plays**: {}", stats.summary.total_plays)?;
        writeln!(out, "- **Distinct games**: {}", stats.summary.distinct_games)?;
        for milestone in &stats.summary.milestones {
            writeln!(
                out,
                "- **{}** (≥{} plays): {}",
                milestone.label, milestone.threshold, milestone.games
            )?;
        }
        writeln!(out)?;
        if let Some(filter) = &stats.filter {
            writeln!(out, "_Games matching `{filter}`_\n")?;
        }
        writeln!(out, "| Rank | Plays | Game |")?;
        writeln!(out, "|-----:|------:|------|")?;
        for entry in &stats.listing {
            writeln!(
                out,
                "| {} | {} | {} |",
                entry.rank,
                entry.count,
                entry.name.replace('|', "\\|")
            )?;
        }
        writeln!(out)?;
    }

    if let Some(history) = &report.history {
        writeln!(out, "## H-index History\n")?;
        writeln!(out, "| Date | H | Games |")?;
        writeln!(out, "|------|--:|-------|")?;
        for record in history {
            writeln!(
                out,
                "| {} | {} | {} |",
                record.date.format("%Y-%m-%d"),
                record.h_index,
                record.games.join(", ").replace('|', "\\|")
            )?;
        }
        writeln!(out)?;
    }

    if let Some(series) = &report.series {
        writeln!(out, "## Daily Series\n")?;
        writeln!(out, "| Date | Plays | Games | H |")?;
        writeln!(out, "|------|------:|------:|--:|")?;
        for point in series {
            writeln!(
                out,
                "| {} | {} | {} | {} |",
                point.date.format("%Y-%m-%d"),
                point.total_plays,
                point.distinct_games,
                point.h_index
            )?;
        }
    }

    Ok(())
}

fn start_section(out: &mut dyn Write, first: &mut bool) -> std::io::Result<()> {
    if !*first {
        writeln!(out)?;
    }
    *first = false;
    Ok(())
}

/// CSV sections separated by blank lines, each with its own header row.
pub fn generate_csv_report(out: &mut dyn Write, report: &PlayReport) -> Result<()> {
    let mut first = true;

    if let Some(stats) = &report.stats {
        start_section(out, &mut first)?;
        writeln!(out, "metric,value")?;
        writeln!(out, "plays_found,{}", report.plays_found)?;
        writeln!(out, "h_index,{}", stats.summary.h_index)?;
        writeln!(out, "distinct_games,{}", stats.summary.distinct_games)?;
        for milestone in &stats.summary.milestones {
            writeln!(out, "{},{}", csv_field(&milestone.label), milestone.games)?;
        }
        start_section(out, &mut first)?;
        writeln!(out, "rank,count,name")?;
        for entry in &stats.listing {
            writeln!(out, "{},{},{}", entry.rank, entry.count, csv_field(&entry.name))?;
        }
    }

    if let Some(history) = &report.history {
        start_section(out, &mut first)?;
        writeln!(out, "date,h_index,games")?;
        for record in history {
            writeln!(
                out,
                "{},{},{}",
                record.date.format("%Y-%m-%d"),
                record.h_index,
                csv_field(&record.games.join("; "))
            )?;
        }
    }

    if let Some(series) = &report.series {
        start_section(out, &mut first)?;
        writeln!(out, "date,total_plays,distinct_games,h_index")?;
        for point in series {
            writeln!(
                out,
                "{},{},{},{}",
                point.date.format("%Y-%m-%d"),
                point.total_plays,
                point.distinct_games,
                point.h_index
            )?;
        }
    }

    Ok(())
}
