//! Text versus binary detection.

use crate::types::Classification;
use unicode_general_category::{GeneralCategory, get_general_category};

/// Share of letter, number, separator and other-category characters above
/// which a decoded buffer is text.
pub const PRINTABLE_RATIO: f64 = 0.6;

/// Share of other-category characters above which a buffer that failed
/// the printable test is binary.
pub const CONTROL_RATIO: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MajorCategory {
    Letter,
    Number,
    Separator,
    Other,
    Mark,
    Punctuation,
    Symbol,
}

fn major_category(c: char) -> MajorCategory {
    use GeneralCategory::*;
    match get_general_category(c) {
        UppercaseLetter | LowercaseLetter | TitlecaseLetter | ModifierLetter | OtherLetter => {
            MajorCategory::Letter
        }
        DecimalNumber | LetterNumber | OtherNumber => MajorCategory::Number,
        SpaceSeparator | LineSeparator | ParagraphSeparator => MajorCategory::Separator,
        Control | Format | Surrogate | PrivateUse | Unassigned => MajorCategory::Other,
        NonspacingMark | SpacingMark | EnclosingMark => MajorCategory::Mark,
        MathSymbol | CurrencySymbol | ModifierSymbol | OtherSymbol => MajorCategory::Symbol,
        _ => MajorCategory::Punctuation,
    }
}

/// Decides whether `bytes` are text, binary or empty.
///
/// Anything that is not valid UTF-8 is binary. Decoded text is accepted
/// when more than 60% of its characters are letters, numbers, separators
/// or in the "other" category; failing that it is binary only if more
/// than 5% fall in the "other" category.
pub fn classify(bytes: &[u8]) -> Classification {
    if bytes.is_empty() {
        return Classification::Empty;
    }
    let Ok(text) = std::str::from_utf8(bytes) else {
        tracing::debug!("classified as binary: invalid UTF-8");
        return Classification::Binary;
    };

    let mut total = 0usize;
    let mut printable = 0usize;
    let mut other = 0usize;
    for c in text.chars() {
        total += 1;
        match major_category(c) {
            MajorCategory::Letter | MajorCategory::Number | MajorCategory::Separator => {
                printable += 1
            }
            MajorCategory::Other => {
                printable += 1;
                other += 1;
            }
            _ => {}
        }
    }

    let printable_ratio = printable as f64 / total as f64;
    let control_ratio = other as f64 / total as f64;
    tracing::debug!(total, printable_ratio, control_ratio, "classifying decoded text");

    if printable_ratio > PRINTABLE_RATIO {
        Classification::Text(text.to_owned())
    } else if control_ratio > CONTROL_RATIO {
        Classification::Binary
    } else {
        Classification::Text(text.to_owned())
    }
}
