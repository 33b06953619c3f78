// Land-parcel reconciliation engine: joined rows in, pivot/mapping
// statements and mail-merge recipients out. Statement execution lives
// behind `writer::StatementExecutor`, so no database dependency here.

pub mod config;
pub mod dedup;
pub mod engine;
pub mod error;
pub mod group;
pub mod input;
pub mod mailmerge;
pub mod model;
pub mod pivot;
pub mod report;
pub mod split;
pub mod writer;

pub use config::RunConfig;
pub use engine::run;
pub use error::EngineError;
pub use model::{JoinedRecord, OwnershipTuple, PolygonMappingSet, SLOT_COUNT};
pub use writer::StatementExecutor;
