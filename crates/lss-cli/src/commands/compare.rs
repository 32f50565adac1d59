use std::path::Path;

use lss_core::Run;

use crate::commands::common::load_run;
use crate::error::CliError;

/// Why two runs are not comparable, first mismatch only.
pub fn comparison_mismatch(first: &Run, second: &Run, strict: bool) -> Option<String> {
    if first.is_comparable(second, strict) {
        return None;
    }
    let reason = if first.game_name() != second.game_name() {
        format!("game {:?} vs {:?}", first.game_name(), second.game_name())
    } else if first.category_name() != second.category_name() {
        format!(
            "category {:?} vs {:?}",
            first.category_name(),
            second.category_name()
        )
    } else if first.segments().len() != second.segments().len() {
        format!(
            "{} segments vs {}",
            first.segments().len(),
            second.segments().len()
        )
    } else {
        let position = first
            .segments()
            .iter()
            .zip(second.segments())
            .position(|(left, right)| left.name() != right.name())
            .unwrap_or_default();
        format!(
            "segment {} is {:?} vs {:?}",
            position + 1,
            first.segments()[position].name(),
            second.segments()[position].name()
        )
    };
    Some(reason)
}

pub fn run_compare(first: &Path, second: &Path, loose: bool) -> Result<(), CliError> {
    let left = load_run(first)?;
    let right = load_run(second)?;

    match comparison_mismatch(&left, &right, !loose) {
        None => {
            println!("comparable");
            Ok(())
        }
        Some(reason) => {
            println!("not comparable: {reason}");
            Err(CliError::NotComparable)
        }
    }
}
