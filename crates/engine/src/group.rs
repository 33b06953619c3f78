use std::collections::HashMap;

use crate::model::{JoinedRecord, PolygonGroup};

/// Group joined rows by polygon id, preserving input order.
///
/// Groups appear in first-seen order of their polygon id and rows keep
/// their original relative order within each group. No sorting by key;
/// downstream slot assignment depends on this order.
pub fn group_by_polygon(records: &[JoinedRecord]) -> Vec<PolygonGroup> {
    let mut index: HashMap<i64, usize> = HashMap::new();
    let mut groups: Vec<PolygonGroup> = Vec::new();

    for record in records {
        match index.get(&record.polygon_id) {
            Some(&i) => groups[i].records.push(record.clone()),
            None => {
                index.insert(record.polygon_id, groups.len());
                groups.push(PolygonGroup {
                    polygon_id: record.polygon_id,
                    records: vec![record.clone()],
                });
            }
        }
    }

    groups
}
