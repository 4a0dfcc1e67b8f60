//! Delimiter-separated text detection.
//!
//! A candidate block is split on newlines and each of the three candidate
//! delimiters is judged by how many lines agree with the first line's
//! column count. The winner must produce at least two columns and at least
//! 80% agreement, otherwise the block is not CSV.

/// Candidate delimiters, in tie-breaking order.
const DELIMITERS: [char; 3] = [',', ';', '\t'];

/// Minimum fraction of lines that must agree on column count.
const AGREEMENT_NUM: usize = 4;
const AGREEMENT_DEN: usize = 5;

/// Try to parse a text block as delimiter-separated rows.
///
/// Returns the cell grid on success: one `Vec<String>` per non-blank
/// line, fields unquoted and trimmed. Returns `None` when no delimiter
/// clears both thresholds.
#[must_use]
pub fn detect_csv(text: &str) -> Option<Vec<Vec<String>>> {
    if !DELIMITERS.iter().any(|d| text.contains(*d)) {
        return None;
    }

    let lines: Vec<&str> = text
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .filter(|l| !l.trim().is_empty())
        .collect();
    if lines.is_empty() {
        return None;
    }

    // Elect the delimiter whose column counts are most self-consistent.
    let mut best: Option<(usize, char, usize)> = None;
    for delim in DELIMITERS {
        let counts: Vec<usize> = lines.iter().map(|l| split_quoted(l, delim).len()).collect();
        let first = counts[0];
        let agreement = counts.iter().filter(|c| **c == first).count();

        if best.map_or(true, |(a, _, _)| agreement > a) {
            best = Some((agreement, delim, first));
        }
    }

    let (agreement, delim, columns) = best?;
    if columns < 2 || agreement * AGREEMENT_DEN < lines.len() * AGREEMENT_NUM {
        return None;
    }

    Some(
        lines
            .iter()
            .map(|l| {
                split_quoted(l, delim)
                    .into_iter()
                    .map(|f| f.trim().to_string())
                    .collect()
            })
            .collect(),
    )
}

/// Split one line on `delim`, honoring double-quote wrapping.
///
/// A doubled quote inside a quoted field is an escaped quote; delimiters
/// inside quoted fields are not split points. Wrapping quotes are removed
/// from the returned fields.
#[must_use]
pub fn split_quoted(line: &str, delim: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '"' {
            if in_quotes && chars.peek() == Some(&'"') {
                // Escaped quote: keep one, stay inside the field.
                current.push('"');
                chars.next();
            } else {
                in_quotes = !in_quotes;
            }
        } else if c == delim && !in_quotes {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    fields.push(current);
    fields
}
