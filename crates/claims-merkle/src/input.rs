//! Claim list parsing: one `address` or `address,weight` per line.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::error::ValidationError;
use crate::record::{Address, Record, ScalePolicy};

/// What to do when the same owner appears on more than one line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Fail the run, naming both lines.
    #[default]
    Reject,
    /// Keep every occurrence. Each gets its own leaf and proof; lookups by
    /// owner resolve to the first one.
    Allow,
}

/// Parse a whole claim list.
///
/// Blank lines before the first and after the last record are ignored; a
/// blank line between records is an invalid address. Errors carry the
/// 1-based line number.
pub fn parse_records(
    text: &str,
    scale: &ScalePolicy,
    duplicates: DuplicatePolicy,
) -> Result<Vec<Record>, ValidationError> {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let Some(first) = lines.iter().position(|l| !l.is_empty()) else {
        return Err(ValidationError::EmptyRecordSet);
    };
    let last = lines.iter().rposition(|l| !l.is_empty()).unwrap_or(first);

    let mut records = Vec::with_capacity(last - first + 1);
    let mut seen: HashMap<Address, usize> = HashMap::with_capacity(last - first + 1);
    for (offset, line) in lines[first..=last].iter().enumerate() {
        let number = first + offset + 1;
        let record = parse_line(line, scale).map_err(|e| e.at_line(number))?;
        match seen.entry(record.owner) {
            Entry::Vacant(slot) => {
                slot.insert(number);
            }
            Entry::Occupied(prior) => match duplicates {
                DuplicatePolicy::Reject => {
                    return Err(ValidationError::DuplicateOwner {
                        owner: record.owner,
                        first_line: *prior.get(),
                    }
                    .at_line(number));
                }
                DuplicatePolicy::Allow => {
                    tracing::warn!(
                        owner = %record.owner,
                        line = number,
                        first_line = *prior.get(),
                        "duplicate owner admitted"
                    );
                }
            },
        }
        records.push(record);
    }
    Ok(records)
}

/// Parse a single `address[,weight]` line.
pub fn parse_line(line: &str, scale: &ScalePolicy) -> Result<Record, ValidationError> {
    let fields: Vec<&str> = line.split(',').collect();
    match fields.as_slice() {
        [owner] => Record::parse(owner, None, scale),
        [owner, weight] => Record::parse(owner, Some(*weight), scale),
        _ => Err(ValidationError::TooManyFields {
            fields: fields.len(),
        }),
    }
}
