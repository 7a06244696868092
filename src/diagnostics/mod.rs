//! Advisory diagnostics attached to evaluation runs.
//!
//! Nothing here takes part in result identity: timings describe how long a
//! batch took, not what it computed.

pub mod timing;

pub use timing::{StageTiming, TimingBreakdown};
