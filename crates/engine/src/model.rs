// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A single joined row from the upstream spatial intersection: one land
/// parcel matched against one ownership polygon.
#[derive(Debug, Clone)]
pub struct JoinedRecord {
    pub polygon_id: i64,
    pub site_identifier: String,
    pub title_number: String,
    pub tenure: String,
    pub proprietor: String,
    pub address: String,
    /// Carried through for provenance, never interpreted.
    pub revision_date: String,
    /// Land-registry record id. Present only in the id-tracking layout.
    pub record_id: Option<i64>,
    /// Upstream validity flag. Present only when the layout carries one.
    pub valid: Option<bool>,
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// All joined rows for one polygon, in input order.
#[derive(Debug, Clone)]
pub struct PolygonGroup {
    pub polygon_id: i64,
    pub records: Vec<JoinedRecord>,
}

// ---------------------------------------------------------------------------
// Deduplication
// ---------------------------------------------------------------------------

/// Number of ownership slots in the wide pivot table.
pub const SLOT_COUNT: usize = 15;

/// The 4-field unit of deduplication. Equality is exact whole-string
/// comparison on all four fields; no trimming, no case folding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipTuple {
    pub title_number: String,
    pub tenure: String,
    pub proprietor: String,
    pub address: String,
}

/// One distinct tuple plus the land-registry record id backing it
/// (id-tracking layout only). The id takes no part in tuple equality.
#[derive(Debug, Clone)]
pub struct MappingEntry {
    pub tuple: OwnershipTuple,
    pub record_id: Option<i64>,
}

/// Ordered set of distinct ownership tuples for one polygon.
///
/// Entries keep first-insertion order and are never reordered. The set may
/// grow past `SLOT_COUNT`; only the first `SLOT_COUNT` entries are eligible
/// for pivot persistence.
#[derive(Debug, Clone)]
pub struct PolygonMappingSet {
    pub polygon_id: i64,
    entries: Vec<MappingEntry>,
}

impl PolygonMappingSet {
    pub fn new(polygon_id: i64) -> Self {
        Self {
            polygon_id,
            entries: Vec::new(),
        }
    }

    /// Append the entry unless an equal tuple is already present.
    /// Returns true when the entry was accepted.
    pub fn insert(&mut self, entry: MappingEntry) -> bool {
        if self.entries.iter().any(|e| e.tuple == entry.tuple) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    /// The entries that fit the pivot table, in insertion order.
    pub fn persisted(&self) -> &[MappingEntry] {
        &self.entries[..self.entries.len().min(SLOT_COUNT)]
    }

    /// True when more distinct tuples arrived than the pivot can hold.
    pub fn overflowed(&self) -> bool {
        self.entries.len() > SLOT_COUNT
    }
}

// ---------------------------------------------------------------------------
// Mail merge
// ---------------------------------------------------------------------------

/// Number of positional address lines in a mail-merge row.
pub const ADDRESS_LINE_COUNT: usize = 6;

/// One ownership holding headed for the mail merge, before the proprietor
/// field is exploded into individual addressees.
#[derive(Debug, Clone)]
pub struct OwnershipRecord {
    pub polygon_name: String,
    pub title_number: String,
    pub tenure: String,
    pub proprietor: String,
    /// The holding's address text, republished as "location of site".
    pub site_location: String,
}

/// One addressee row in the mail-merge output.
#[derive(Debug, Clone, PartialEq)]
pub struct LandownerRecipient {
    pub polygon_name: String,
    pub title_number: String,
    pub tenure: String,
    pub landowner: String,
    pub address_lines: [String; ADDRESS_LINE_COUNT],
    pub site_location: String,
}
