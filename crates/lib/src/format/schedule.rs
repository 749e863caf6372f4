//! # Doctor Schedule Formatter
//!
//! Models are told not to answer with markdown tables, but they often do. This
//! module rewrites pipe-delimited doctor rows into short labelled entries and
//! drops the table scaffolding around them. The output never contains a
//! pipe-delimited doctor row, so formatting twice is the same as formatting once.

use crate::constants::FEE_CURRENCY;
use serde::{Deserialize, Serialize};

/// The header line placed before the first doctor entry.
pub const SCHEDULE_HEADER: &str = "Available Doctors:";

/// One doctor parsed out of a table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorEntry {
    pub name: String,
    pub availability: String,
    /// The fee as written in the row, without the currency suffix.
    pub fee: String,
}

impl DoctorEntry {
    /// The fee with its currency, e.g. `2,200 PKR`.
    pub fn fee_with_currency(&self) -> String {
        if self
            .fee
            .to_ascii_uppercase()
            .trim_end()
            .ends_with(FEE_CURRENCY)
        {
            self.fee.clone()
        } else {
            format!("{} {FEE_CURRENCY}", self.fee)
        }
    }

    fn render(&self) -> String {
        format!(
            "{}\nAvailable: {}\nConsultation Fee: {}",
            self.name,
            self.availability,
            self.fee_with_currency()
        )
    }
}

enum Line<'a> {
    Dropped,
    Doctor(DoctorEntry),
    Plain(&'a str),
}

fn is_separator(line: &str) -> bool {
    line.trim().starts_with("|---") || line.contains("|--------|")
}

fn is_doctor_header(line: &str) -> bool {
    line.contains('|')
        && line.split('|').map(str::trim).any(|segment| {
            segment == "Doctor" || segment.starts_with("Doctor ")
        })
}

fn looks_like_doctor_row(line: &str) -> bool {
    line.contains('|') && (line.contains("Dr.") || line.contains("AM") || line.contains("PM"))
}

/// Parses a table row into a [`DoctorEntry`].
///
/// Returns `None` unless the line contains a `|` plus one of `Dr.`, `AM`, `PM`
/// and has at least three non-empty cells. Cells past the third are ignored.
pub fn parse_doctor_row(line: &str) -> Option<DoctorEntry> {
    if !looks_like_doctor_row(line) {
        return None;
    }
    let mut cells = line.split('|').map(str::trim).filter(|c| !c.is_empty());
    let name = cells.next()?;
    let availability = cells.next()?;
    let fee = cells.next()?;
    Some(DoctorEntry {
        name: name.to_string(),
        availability: availability.to_string(),
        fee: fee.to_string(),
    })
}

fn classify(line: &str) -> Line<'_> {
    if is_separator(line) || is_doctor_header(line) {
        return Line::Dropped;
    }
    match parse_doctor_row(line) {
        Some(entry) => Line::Doctor(entry),
        None => Line::Plain(line),
    }
}

/// Rewrites doctor table rows in `text` as labelled entries.
///
/// If any entry was produced, a single [`SCHEDULE_HEADER`] line opens the
/// schedule section just before the first entry. Otherwise the text comes back
/// with only the table separators and header rows removed.
pub fn format_doctor_schedule(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut header_written = false;

    for line in text.split('\n') {
        match classify(line) {
            Line::Dropped => {}
            Line::Plain(plain) => out.push(plain.to_string()),
            Line::Doctor(entry) => {
                if !header_written {
                    out.push(SCHEDULE_HEADER.to_string());
                    header_written = true;
                }
                out.push(entry.render());
            }
        }
    }

    out.join("\n")
}

/// All doctor entries found in `text`, in order of appearance.
pub fn extract_doctors(text: &str) -> Vec<DoctorEntry> {
    text.split('\n')
        .filter_map(|line| match classify(line) {
            Line::Doctor(entry) => Some(entry),
            _ => None,
        })
        .collect()
}
