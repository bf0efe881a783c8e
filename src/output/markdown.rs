//! Markdown summary generation
//!
//! Renders the statistics of a crawl, and the size of the index it built, as a
//! human-readable report.

use crate::index::InvertedIndex;
use crate::output::stats::CrawlStatistics;
use crate::output::OutputResult;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Run details that do not come from the crawl itself
#[derive(Debug, Clone, Default)]
pub struct SummaryContext {
    pub config_hash: Option<String>,
    pub traversal: Option<String>,
}

/// Writes a markdown summary of a crawl to `output_path`
pub fn generate_markdown_summary(
    stats: &CrawlStatistics,
    index: &InvertedIndex,
    context: &SummaryContext,
    output_path: &Path,
) -> OutputResult<()> {
    let markdown = format_markdown_summary(stats, index, context);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    tracing::info!("Wrote crawl summary to {}", output_path.display());
    Ok(())
}

/// Formats a crawl summary as markdown
pub fn format_markdown_summary(
    stats: &CrawlStatistics,
    index: &InvertedIndex,
    context: &SummaryContext,
) -> String {
    let mut md = String::new();

    md.push_str("# Sumi-Lens Crawl Summary\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Seed**: {}\n", stats.seed));
    md.push_str(&format!("- **Started**: {}\n", stats.started_at.to_rfc3339()));
    if let Some(finished) = &stats.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished.to_rfc3339()));
    }
    if let Some(seconds) = stats.duration_seconds() {
        md.push_str(&format!("- **Duration**: {:.2} seconds\n", seconds));
    }
    if let Some(traversal) = &context.traversal {
        md.push_str(&format!("- **Traversal**: {}\n", traversal));
    }
    if let Some(hash) = &context.config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Page Budget**: {}\n", stats.budget));
    md.push_str(&format!("- **Pages Dispatched**: {}\n", stats.dispatched));
    md.push_str(&format!("- **Pages Indexed**: {}\n", stats.indexed));
    md.push_str(&format!("- **Words Indexed**: {}\n", stats.words_indexed));
    md.push_str(&format!("- **Links Found**: {}\n", stats.links_found));
    md.push_str(&format!(
        "- **Success Rate**: {:.2}%\n\n",
        stats.success_rate()
    ));

    md.push_str("## Index\n\n");
    md.push_str(&format!("- **Distinct Stems**: {}\n", index.num_words()));
    md.push_str(&format!("- **Locations**: {}\n\n", index.num_locations()));

    if !stats.skipped.is_empty() {
        md.push_str("## Skipped URLs\n\n");
        md.push_str("| Reason | Count |\n");
        md.push_str("|--------|-------|\n");
        for (reason, count) in &stats.skipped {
            md.push_str(&format!("| {} | {} |\n", reason, count));
        }
        md.push('\n');
    }

    if !index.is_empty() {
        md.push_str("## Indexed Locations\n\n");
        md.push_str("| Location | Words |\n");
        md.push_str("|----------|-------|\n");
        for (location, count) in index.counts().iter().take(50) {
            md.push_str(&format!("| {} | {} |\n", location, count));
        }
        if index.num_locations() > 50 {
            md.push_str(&format!("\n... and {} more\n", index.num_locations() - 50));
        }
        md.push('\n');
    }

    md
}
