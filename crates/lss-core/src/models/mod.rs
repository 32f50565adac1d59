//! Typed records of a splits file

mod attempt;
mod metadata;
mod run;
mod segment;
mod time;

pub use attempt::Attempt;
pub use metadata::{Metadata, MetadataRun, Platform, Variable};
pub use run::{AutoSplitterSettings, Run};
pub use segment::Segment;
pub use time::{BaseTime, SplitTime, Time, TimeKind, Timed, Times};
