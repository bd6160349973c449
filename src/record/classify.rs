//! Path-based record kind classification
//!
//! Source data of this kind encodes granularity in the directory layout
//! (`.../minute/ES 03-25.ncd`, `.../tick/ES 03-25.ncd`), not in a content
//! header the converter could sniff ahead of time. Classification is
//! therefore a naming convention. The codec still rejects a file whose
//! header kind disagrees with the classified kind.

use super::RecordKind;
use std::fmt;
use std::path::{Component, Path};

const MINUTE_SEGMENT: &str = "minute";
const TICK_SEGMENT: &str = "tick";
const DAY_SEGMENT: &str = "day";

/// Why a path was given its kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifyReason {
    /// A `minute` or `tick` directory segment matched
    Segment(RecordKind),
    /// A `day` directory matched; daily data is read as minute bars
    DayAsMinute,
    /// Nothing matched; fell back to minute bars
    Default,
}

impl ClassifyReason {
    /// True when the kind came from a fallback rather than an exact match
    pub fn is_fallback(self) -> bool {
        !matches!(self, ClassifyReason::Segment(_))
    }
}

impl fmt::Display for ClassifyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifyReason::Segment(kind) => write!(f, "'{}' directory", kind),
            ClassifyReason::DayAsMinute => f.write_str("'day' directory, read as minute"),
            ClassifyReason::Default => f.write_str("no recognized directory, defaulted"),
        }
    }
}

/// Result of classifying a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub kind: RecordKind,
    pub reason: ClassifyReason,
}

/// Classify a path into a record kind
pub fn classify(path: &Path) -> RecordKind {
    classify_with_reason(path).kind
}

/// Classify a path and report which rule decided it
///
/// Only directory segments are inspected, case-insensitively. The file name
/// itself never participates. Priority is `minute`, then `tick`, then `day`.
pub fn classify_with_reason(path: &Path) -> Classification {
    let dirs: Vec<String> = path
        .parent()
        .map(|parent| {
            parent
                .components()
                .filter_map(|c| match c {
                    Component::Normal(s) => Some(s.to_string_lossy().to_lowercase()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    let has = |token: &str| dirs.iter().any(|d| d == token);

    if has(MINUTE_SEGMENT) {
        Classification {
            kind: RecordKind::Minute,
            reason: ClassifyReason::Segment(RecordKind::Minute),
        }
    } else if has(TICK_SEGMENT) {
        Classification {
            kind: RecordKind::Tick,
            reason: ClassifyReason::Segment(RecordKind::Tick),
        }
    } else if has(DAY_SEGMENT) {
        Classification {
            kind: RecordKind::Minute,
            reason: ClassifyReason::DayAsMinute,
        }
    } else {
        Classification {
            kind: RecordKind::Minute,
            reason: ClassifyReason::Default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_tick_any_case() {
        for p in ["/db/tick/ES.ncd", "/db/TICK/ES.ncd", "/db/Tick/sub/ES.ncd"] {
            assert_eq!(classify(Path::new(p)), RecordKind::Tick, "{}", p);
        }
    }

    #[test]
    fn test_classify_minute() {
        let c = classify_with_reason(Path::new("/db/Minute/NQ 03-25/20250103.ncd"));
        assert_eq!(c.kind, RecordKind::Minute);
        assert_eq!(c.reason, ClassifyReason::Segment(RecordKind::Minute));
        assert!(!c.reason.is_fallback());
    }

    #[test]
    fn test_classify_default() {
        let c = classify_with_reason(Path::new("/somewhere/else/file.ncd"));
        assert_eq!(c.kind, RecordKind::Minute);
        assert_eq!(c.reason, ClassifyReason::Default);
        assert!(c.reason.is_fallback());
    }

    #[test]
    fn test_classify_day_reads_as_minute() {
        let c = classify_with_reason(Path::new("/db/day/ES.ncd"));
        assert_eq!(c.kind, RecordKind::Minute);
        assert_eq!(c.reason, ClassifyReason::DayAsMinute);
    }

    #[test]
    fn test_minute_wins_over_tick() {
        assert_eq!(
            classify(Path::new("/db/tick/minute/ES.ncd")),
            RecordKind::Minute
        );
    }

    #[test]
    fn test_file_name_ignored() {
        assert_eq!(classify(Path::new("/db/data/tick")), RecordKind::Minute);
        assert_eq!(classify(Path::new("tick.ncd")), RecordKind::Minute);
    }

    #[test]
    fn test_substring_does_not_match() {
        assert_eq!(
            classify(Path::new("/db/ticker/ES.ncd")),
            RecordKind::Minute
        );
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(classify(Path::new("tick/ES.ncd")), RecordKind::Tick);
    }
}
