//! Output of the mined lattice and of the CSV statistics row.

use std::io::{self, Write};

use clap::ValueEnum;
use eclat_core::{Bitset, ItemTree, LatticeSummary};

use crate::instrument::{Instruments, Measurement};

/// Lattice statistic columns, after the instrument columns.
pub const LATTICE_COLUMNS: &str = "count,count_maximal,avg,avg_maximal";

/// Pattern output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PatternFormat {
    /// One node per line, indented by depth: `<item> (<support>)`
    #[default]
    Tree,
    /// One JSON object per itemset: `{"items":[..],"support":n}`
    Json,
}

/// Full CSV header line, without the trailing newline.
#[must_use]
pub fn header_line(instruments: &Instruments) -> String {
    format!("{},{LATTICE_COLUMNS}", instruments.header())
}

/// CSV row for one run, without the trailing newline.
#[must_use]
pub fn stats_line(measurement: &Measurement, summary: &LatticeSummary) -> String {
    format!(
        "{},{},{},{:.6},{:.6}",
        measurement.csv_fields(),
        summary.count,
        summary.count_maximal,
        summary.avg_length(),
        summary.avg_maximal_length()
    )
}

/// Writes every frequent itemset of `tree` in `format`.
pub fn write_patterns<B: Bitset, W: Write>(
    tree: &ItemTree<B>,
    format: PatternFormat,
    out: &mut W,
) -> io::Result<()> {
    match format {
        PatternFormat::Tree => tree.write_tree(out),
        PatternFormat::Json => {
            for itemset in tree.itemsets() {
                serde_json::to_writer(&mut *out, &itemset)?;
                out.write_all(b"\n")?;
            }
            Ok(())
        }
    }
}
