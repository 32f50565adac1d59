//! lss-core - Core library for LiveSplit splits files
//!
//! This crate reads and writes `.lss` files faithfully (fields that were not
//! in the input are not written back), and reshapes the recorded segment
//! history into tables and statistics. It never touches the filesystem;
//! callers hand it bytes.

pub mod codec;
pub mod error;
pub mod export;
pub mod models;
pub mod projection;
pub mod scalar;
pub mod schema;
pub mod stats;
pub mod xml;

pub use error::{Error, Result};
pub use models::{Run, TimeKind};
pub use schema::Emit;

/// Parse and bind a splits file.
///
/// # Errors
///
/// Returns [`Error::Parse`] for malformed documents and [`Error::Schema`] or
/// [`Error::Format`] when the document does not describe a valid run.
pub fn read_run(bytes: &[u8]) -> Result<Run> {
    let root = xml::parse(bytes)?;
    let run: Run = codec::bind(&root)?;
    tracing::debug!(
        "Read run {} / {} with {} segments and {} attempts",
        run.game_name(),
        run.category_name(),
        run.segments().len(),
        run.attempt_history().len()
    );
    Ok(run)
}

/// Write a run as indented XML.
pub fn write_run(run: &Run, emit: Emit) -> Result<String> {
    xml::serialize_pretty(&codec::unbind(run, emit))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPLITS: &[u8] = b"\xEF\xBB\xBF<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Run version=\"1.7.0\">\n  <GameName>Celeste</GameName>\n  <CategoryName>Any%</CategoryName>\n  <Segments>\n    <Segment>\n      <Name>Prologue</Name>\n      <BestSegmentTime />\n    </Segment>\n  </Segments>\n</Run>\n";

    #[test]
    fn read_then_write_reproduces_the_file() {
        let run = read_run(SPLITS).unwrap();
        assert_eq!(
            write_run(&run, Emit::ExcludeUnset).unwrap().as_bytes(),
            &SPLITS[3..]
        );
    }

    #[test]
    fn write_run_output_reads_back() {
        let run = read_run(SPLITS).unwrap();
        let written = write_run(&run, Emit::ExcludeNone).unwrap();
        let reread = read_run(written.as_bytes()).unwrap();
        assert_eq!(reread.game_name(), "Celeste");
        assert_eq!(reread.segments()[0].name(), "Prologue");
        assert!(written.contains("<AttemptCount>0</AttemptCount>"));
    }
}
