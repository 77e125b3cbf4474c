use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::station::Station;

/// How the guess's line set overlaps the target's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineOverlap {
    /// Both stations sit on exactly the same lines.
    Every,
    Some,
    None,
}

impl LineOverlap {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Every => "every",
            Self::Some => "some",
            Self::None => "none",
        }
    }
}

/// Attribute clues for one guess, all relative to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributeDifference {
    pub district: bool,
    pub line: LineOverlap,
    /// Sign of `target.year - guess.year`: -1, 0 or 1.
    pub year: i8,
}

#[must_use]
pub fn attribute_difference(target: &Station, guess: &Station) -> AttributeDifference {
    AttributeDifference {
        district: target.district == guess.district,
        line: line_overlap(target, guess),
        year: match target.year.cmp(&guess.year) {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        },
    }
}

fn line_overlap(target: &Station, guess: &Station) -> LineOverlap {
    let target_lines: BTreeSet<&str> = target.line.iter().map(String::as_str).collect();
    let guess_lines: BTreeSet<&str> = guess.line.iter().map(String::as_str).collect();
    let shared = target_lines.intersection(&guess_lines).count();

    if shared == target_lines.len() && shared == guess_lines.len() {
        LineOverlap::Every
    } else if shared > 0 {
        LineOverlap::Some
    } else {
        LineOverlap::None
    }
}
