//! Delimiter detection from a leading sample

/// Candidate delimiters in preference order
pub const CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Used when no candidate appears consistently
pub const FALLBACK: u8 = b',';

/// Pick the delimiter whose per-line count (outside quotes) is most consistent
///
/// Each candidate is scored by how many sample lines share its most common
/// non-zero count. Ties go to the higher count, then to candidate order.
/// A trailing partial line (sample cut mid-line) is ignored.
///
/// # Examples
///
/// ```
/// use flightlog_ingest::sniff_delimiter;
///
/// let sample = b"Date;Flight_No;Passengers\n11/17/95;1044;\"JE, GM\"\n";
/// assert_eq!(sniff_delimiter(sample), b';');
/// ```
pub fn sniff_delimiter(sample: &[u8]) -> u8 {
    let text = String::from_utf8_lossy(sample);
    let mut lines: Vec<&str> = text.lines().collect();
    if lines.len() > 1 && !text.ends_with('\n') {
        lines.pop();
    }
    lines.retain(|l| !l.trim().is_empty());

    let mut best: Option<(usize, usize, u8)> = None;
    for &candidate in &CANDIDATES {
        let Some((count, agreeing)) = modal_count(&lines, candidate) else {
            continue;
        };
        let better = match best {
            None => true,
            Some((best_agreeing, best_count, _)) => {
                (agreeing, count) > (best_agreeing, best_count)
            }
        };
        if better {
            best = Some((agreeing, count, candidate));
        }
    }

    best.map(|(_, _, d)| d).unwrap_or(FALLBACK)
}

/// Most common non-zero per-line count and how many lines share it
fn modal_count(lines: &[&str], delimiter: u8) -> Option<(usize, usize)> {
    let mut tally: Vec<(usize, usize)> = Vec::new();
    for line in lines {
        let n = count_unquoted(line, delimiter);
        if n == 0 {
            continue;
        }
        match tally.iter_mut().find(|(count, _)| *count == n) {
            Some((_, lines_with)) => *lines_with += 1,
            None => tally.push((n, 1)),
        }
    }

    tally
        .into_iter()
        .max_by(|(ca, la), (cb, lb)| la.cmp(lb).then(ca.cmp(cb)))
}

fn count_unquoted(line: &str, delimiter: u8) -> usize {
    let mut in_quotes = false;
    let mut count = 0;
    for b in line.bytes() {
        if b == b'"' {
            in_quotes = !in_quotes;
        } else if b == delimiter && !in_quotes {
            count += 1;
        }
    }
    count
}
