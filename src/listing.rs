//! Output formatters for analyzed images.
//!
//! This module provides trait-based formatters for rendering an
//! [`ImageAnalysis`] as a text listing or as JSON, plus helpers for the
//! cross-reference tables and the compiled pattern table.

use std::collections::{BTreeMap, BTreeSet};

use crate::patterns::PatternSet;
use crate::types::ListingOptions;
use crate::xref::{CrossReferenceMaps, ImageAnalysis, ListingEntry};

/// Trait for formatting an analyzed image.
pub trait ListingFormatter {
    /// Format one address.
    fn format_entry(&self, entry: &ListingEntry) -> String;

    /// Separator emitted after an entry that ends a block.
    fn format_separator(&self) -> Option<String>;

    /// Format the complete listing.
    ///
    /// Default implementation concatenates entries, adding separators at
    /// block boundaries.
    fn format_listing(&self, analysis: &ImageAnalysis) -> String {
        let mut out = String::new();
        for entry in &analysis.entries {
            out.push_str(&self.format_entry(entry));
            if entry.boundary {
                if let Some(sep) = self.format_separator() {
                    out.push_str(&sep);
                }
            }
        }
        out
    }
}

/// Human-readable listing: one line per address.
///
/// `SBC 032: e032  Call Microsubroutine A=0x032`
#[derive(Debug, Clone, Default)]
pub struct TextFormatter {
    /// Listing options
    pub options: ListingOptions,
}

impl TextFormatter {
    /// Create a new text formatter with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a text formatter with explicit options.
    pub fn with_options(options: ListingOptions) -> Self {
        Self { options }
    }
}

impl ListingFormatter for TextFormatter {
    fn format_entry(&self, entry: &ListingEntry) -> String {
        let mut line = String::new();
        if self.options.flags {
            line.push_str(&format!("{:<3} ", entry.flags.render()));
        }
        line.push_str(&format!(
            "{:03x}: {:04x}  {}",
            entry.address, entry.word, entry.instruction
        ));
        line.push('\n');
        line
    }

    fn format_separator(&self) -> Option<String> {
        self.options.separators.then(|| String::from("\n"))
    }
}

/// JSON output formatter.
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    /// Pretty-print JSON
    pub pretty: bool,
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl JsonFormatter {
    /// Create a new JSON formatter with pretty printing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a compact JSON formatter.
    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl ListingFormatter for JsonFormatter {
    fn format_entry(&self, entry: &ListingEntry) -> String {
        serde_json::to_string(entry).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_separator(&self) -> Option<String> {
        None // Handled in format_listing
    }

    fn format_listing(&self, analysis: &ImageAnalysis) -> String {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(analysis)
        } else {
            serde_json::to_string(analysis)
        };
        rendered.unwrap_or_else(|_| "{}".to_string())
    }
}

/// Render the three cross-reference tables, one target per line.
pub fn format_xref(refs: &CrossReferenceMaps) -> String {
    let mut s = String::new();
    for (title, map) in [
        ("Call targets", &refs.call_target_ref),
        ("Branch targets", &refs.branch_target_ref),
        ("Conditional branch targets", &refs.cond_branch_target_ref),
    ] {
        s.push_str(&format!("{} ({}):\n", title, map.len()));
        s.push_str(&format_ref_map(map));
        s.push('\n');
    }
    s
}

fn format_ref_map(map: &BTreeMap<u16, BTreeSet<u16>>) -> String {
    map.iter()
        .map(|(target, sources)| {
            let sources: Vec<String> = sources.iter().map(|a| format!("{a:03x}")).collect();
            format!("  {:03x}: {}\n", target, sources.join(" "))
        })
        .collect()
}

/// Render the compiled pattern table.
pub fn format_patterns(patterns: &PatternSet) -> String {
    let mut s = String::from("idx  pattern              const  bits   dc     cyc  mnemonic\n");
    for (i, compiled) in patterns.iter().enumerate() {
        let p = &compiled.parsed;
        s.push_str(&format!(
            "{:3}  {}  {:04x}   {:04x}   {:04x}   {:<3}  {}\n",
            i,
            compiled.source.pattern_text,
            p.const_mask,
            p.const_bits,
            p.dont_care_mask,
            compiled.source.cycle_spec,
            compiled.source.mnemonic
        ));
    }
    s
}
