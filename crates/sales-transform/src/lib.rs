//! Sales transformation: region adapters and consolidation.
//!
//! - **clean**: header cleaning, distinct rows, renames, the missing-value policy
//! - **join**: left join with suffix disambiguation
//! - **adapter**: the declarative region adapter
//! - **consolidate**: concatenation, deduplication and the completeness filter
//! - **frame**: canonical records and frames

pub mod adapter;
pub mod clean;
pub mod consolidate;
pub mod data_utils;
pub mod error;
pub mod frame;
pub mod join;

pub use adapter::{RegionAdapter, RegionInput, RegionOutput};
pub use consolidate::{
    Consolidated, Consolidator, completeness_mask, concat_frames, first_occurrence_mask,
};
pub use error::{Result, TransformError};
pub use frame::{CONSOLIDATED_ORIGIN, CanonicalRecord, SalesFrame, build_canonical_frame};
pub use join::left_join;
