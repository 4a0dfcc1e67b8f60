//! Sorting and fetch-ordering state for the row view.
//!
//! Sorting is single-column: clicking the same column toggles direction,
//! switching columns resets to ascending. Null or missing values always
//! sort last regardless of direction; defined values compare with a
//! numeric-aware string collation so `"2"` sorts before `"10"`.
//!
//! This module also owns the fetch [`Generation`] counter that guards
//! against a slow, superseded row fetch overwriting newer state.

use std::cmp::Ordering;

use serde_json::Value;

use crate::classify::stringify;
use crate::model::TableRow;

/// Sort direction for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

impl SortDirection {
    /// The opposite direction.
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Arrow glyph for column headers.
    #[must_use]
    pub const fn arrow(self) -> &'static str {
        match self {
            Self::Ascending => "▲",
            Self::Descending => "▼",
        }
    }
}

/// Current sort selection.
#[derive(Debug, Clone, Default)]
pub struct SortState {
    /// Sorted column, if any.
    pub column: Option<String>,
    /// Direction applied to that column.
    pub direction: SortDirection,
}

impl SortState {
    /// Register a click on a column header.
    ///
    /// Re-clicking the sorted column flips direction; any other column
    /// becomes the sorted column, ascending.
    pub fn toggle(&mut self, column: &str) {
        if self.column.as_deref() == Some(column) {
            self.direction = self.direction.flipped();
        } else {
            self.column = Some(column.to_string());
            self.direction = SortDirection::Ascending;
        }
    }

    /// Order rows in place according to this state.
    ///
    /// A no-op when no column is selected. The sort is stable, so rows
    /// that compare equal keep their fetch order.
    pub fn apply(&self, rows: &mut [TableRow]) {
        let Some(column) = &self.column else {
            return;
        };
        rows.sort_by(|a, b| compare_cells(a.get(column), b.get(column), self.direction));
    }
}

/// Compare two optional cell values for sorting.
///
/// Nulls are always last: a null/missing value orders after any defined
/// value in both directions. Defined values compare with [`natural_cmp`]
/// and the direction only inverts that comparison.
#[must_use]
pub fn compare_cells(a: Option<&Value>, b: Option<&Value>, direction: SortDirection) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());

    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => {
            let ordering = natural_cmp(&stringify(a), &stringify(b));
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        }
    }
}

/// Numeric-aware, case-insensitive string comparison.
///
/// Runs of ASCII digits compare by numeric value (so `"2" < "10"`,
/// `"item2" < "item10"`); everything else compares per lowercased
/// character. Longer digit runs with equal numeric value (leading
/// zeros) fall back to length.
#[must_use]
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let (mut i, mut j) = (0, 0);

    while i < a_chars.len() && j < b_chars.len() {
        let (ca, cb) = (a_chars[i], b_chars[j]);

        if ca.is_ascii_digit() && cb.is_ascii_digit() {
            let a_run = digit_run(&a_chars, i);
            let b_run = digit_run(&b_chars, j);
            let a_num: &[char] = &a_chars[i..a_run];
            let b_num: &[char] = &b_chars[j..b_run];

            // Strip leading zeros, compare by length then digit-wise.
            let a_trim = skip_zeros(a_num);
            let b_trim = skip_zeros(b_num);
            let ordering = a_trim
                .len()
                .cmp(&b_trim.len())
                .then_with(|| a_trim.cmp(b_trim))
                .then_with(|| a_num.len().cmp(&b_num.len()));
            if ordering != Ordering::Equal {
                return ordering;
            }
            i = a_run;
            j = b_run;
        } else {
            let ordering = ca
                .to_lowercase()
                .cmp(cb.to_lowercase())
                .then_with(|| ca.cmp(&cb));
            if ordering != Ordering::Equal {
                return ordering;
            }
            i += 1;
            j += 1;
        }
    }

    (a_chars.len() - i).cmp(&(b_chars.len() - j))
}

fn digit_run(chars: &[char], start: usize) -> usize {
    let mut end = start;
    while end < chars.len() && chars[end].is_ascii_digit() {
        end += 1;
    }
    end
}

fn skip_zeros(digits: &[char]) -> &[char] {
    let first = digits.iter().position(|c| *c != '0').unwrap_or(digits.len().saturating_sub(1));
    &digits[first..]
}

/// Monotonically increasing tag for row-fetch requests.
///
/// Every fetch carries the generation current at the time it was issued;
/// a response is applied only when its generation is still the latest,
/// so a slow superseded fetch can never overwrite newer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Generation(u64);

impl Generation {
    /// Advance to the next generation and return it.
    pub fn advance(&mut self) -> Generation {
        self.0 += 1;
        *self
    }

    /// Whether a response tagged `other` is still current.
    #[must_use]
    pub fn is_current(self, other: Generation) -> bool {
        self == other
    }
}
