//! Per-polygon tuple deduplication.
//!
//! Pure functions: a polygon group in, an ordered set of distinct ownership
//! tuples out. No IO, no statement building.

use crate::model::{MappingEntry, OwnershipTuple, PolygonGroup, PolygonMappingSet};

/// Build the ordered distinct-tuple set for one polygon group.
///
/// Each incoming row is compared against every previously accepted tuple
/// with exact 4-field equality and appended only when none matches. The
/// comparison is a linear walk of the accepted entries, never a hash or
/// sort, so the set keeps first-seen order and the fields stay verbatim.
pub fn dedup_group(group: &PolygonGroup) -> PolygonMappingSet {
    let mut set = PolygonMappingSet::new(group.polygon_id);
    for record in &group.records {
        set.insert(MappingEntry {
            tuple: OwnershipTuple {
                title_number: record.title_number.clone(),
                tenure: record.tenure.clone(),
                proprietor: record.proprietor.clone(),
                address: record.address.clone(),
            },
            record_id: record.record_id,
        });
    }
    set
}

/// Overflow warning for a set holding more tuples than the pivot can take.
/// Names the true count found, not the persisted count.
pub fn overflow_warning(set: &PolygonMappingSet) -> Option<String> {
    if set.overflowed() {
        Some(format!(
            "Too many mapping items for polygon ID {} ({} found)",
            set.polygon_id,
            set.len()
        ))
    } else {
        None
    }
}
