//! Proprietor splitting for mail-merge recipients.
//!
//! Registry proprietor strings pack co-owners and their correspondence
//! addresses into one field. The conventions are positional: co-owners are
//! joined by a literal ` AND `, and within each co-owner the name is
//! separated from the address block by a run of two spaces.

use crate::model::{LandownerRecipient, OwnershipRecord, ADDRESS_LINE_COUNT};

/// Literal separator between co-owners in a proprietor string.
pub const CO_OWNER_SEPARATOR: &str = " AND ";

/// Literal separator between a landowner's name and their address block.
pub const NAME_ADDRESS_SEPARATOR: &str = "  ";

/// One co-owner carved out of a proprietor string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandownerParty {
    pub name: String,
    pub address_lines: [String; ADDRESS_LINE_COUNT],
}

/// Split a proprietor string into its co-owner parties.
///
/// Every segment produces a party, even an empty one; a blank proprietor
/// therefore yields a single party with a blank name. Within a segment,
/// only the chunk after the first two-space separator is treated as the
/// address block; later chunks are discarded.
pub fn split_landowners(proprietor: &str) -> Vec<LandownerParty> {
    proprietor
        .split(CO_OWNER_SEPARATOR)
        .map(|segment| {
            // Trim before splitting; a leading double space would otherwise
            // shift the whole segment into the address position.
            let chunks: Vec<&str> = segment.trim().split(NAME_ADDRESS_SEPARATOR).collect();
            let block = chunks.get(1).copied().unwrap_or("");
            LandownerParty {
                name: title_case(chunks[0]),
                address_lines: split_address(block),
            }
        })
        .collect()
}

/// Explode one holding into addressee rows, one per co-owner party.
/// Recipients keep segment order within the proprietor string.
pub fn split_holding(record: &OwnershipRecord) -> Vec<LandownerRecipient> {
    split_landowners(&record.proprietor)
        .into_iter()
        .map(|party| LandownerRecipient {
            polygon_name: record.polygon_name.clone(),
            title_number: record.title_number.clone(),
            tenure: record.tenure.clone(),
            landowner: party.name,
            address_lines: party.address_lines,
            site_location: record.site_location.clone(),
        })
        .collect()
}

/// Split an address block on commas into trimmed lines, padding with empty
/// strings up to [`ADDRESS_LINE_COUNT`]. Parts beyond the cap are dropped.
pub fn split_address(block: &str) -> [String; ADDRESS_LINE_COUNT] {
    let mut lines = block.split(',').map(str::trim);
    std::array::from_fn(|_| lines.next().map(str::to_owned).unwrap_or_default())
}

/// Title-case a name: each run of letters starts upper and continues lower,
/// so `O'BRIEN` renders as `O'Brien` and `MARY-ANNE` as `Mary-Anne`.
/// Registry proprietor names arrive fully capitalised.
fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_word = false;
    for c in input.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}
