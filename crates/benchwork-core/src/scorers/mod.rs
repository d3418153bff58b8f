//! Scoring strategies, one per task family.
//!
//! Each scorer is a set of pure functions over domain types; the
//! evaluation loops in `benchwork-harness` drive them item by item.
//!
//! - [`exact`]: numeric answer extraction + tolerance matching
//! - [`overlap`]: context assembly + bidirectional containment with
//!   precision/recall/F1 bookkeeping
//! - [`rubric`]: weighted checklists with completion-rate bucketing

pub mod exact;
pub mod overlap;
pub mod rubric;
