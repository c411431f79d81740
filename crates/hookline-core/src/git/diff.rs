//! Unified diff parsing.
//!
//! Only the new-file side matters here: a line is "modified" when the diff
//! marks it as an addition. The parser walks the output hunk by hunk and keeps
//! an explicit counter of the current new-file line number, so context lines
//! (when the diff was produced with context) and the
//! `\ No newline at end of file` marker are handled as their own branches.

use std::collections::BTreeSet;

/// Range covered by one side of a hunk header (`-a,b` or `+c,d`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HunkRange {
    pub start: u32,
    pub count: u32,
}

/// Parses a hunk header such as `@@ -1,2 +3,4 @@ fn main()`.
///
/// Returns the old and new ranges. An omitted count means one line.
pub fn parse_hunk_header(line: &str) -> Option<(HunkRange, HunkRange)> {
    let rest = line.strip_prefix("@@ ")?;
    let end = rest.find(" @@")?;
    let mut ranges = rest[..end].split_whitespace();

    let old = parse_range(ranges.next()?.strip_prefix('-')?)?;
    let new = parse_range(ranges.next()?.strip_prefix('+')?)?;
    Some((old, new))
}

fn parse_range(spec: &str) -> Option<HunkRange> {
    let (start, count) = match spec.split_once(',') {
        Some((start, count)) => (start.parse().ok()?, count.parse().ok()?),
        None => (spec.parse().ok()?, 1),
    };
    Some(HunkRange { start, count })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Inside the `diff --git` / `---` / `+++` preamble of a file.
    Header,
    /// Inside a hunk: the next new-file line number and the old and new
    /// body lines still expected.
    Hunk {
        next_line: u32,
        old_left: u32,
        new_left: u32,
    },
}

/// Collects the new-file line numbers of every added line in `diff`.
///
/// Works on single- or multi-file diff output; callers that need one file
/// restrict the diff with a pathspec. A hunk ends once the line counts from
/// its header are used up, so a following `---`/`+++` file header is never
/// read as hunk body.
pub fn added_lines(diff: &str) -> BTreeSet<u32> {
    let mut lines = BTreeSet::new();
    let mut state = State::Header;

    for line in diff.lines() {
        if line.starts_with("diff --git ") {
            state = State::Header;
            continue;
        }

        if line.starts_with("@@ ") {
            state = match parse_hunk_header(line) {
                Some((old, new)) => State::Hunk {
                    next_line: new.start,
                    old_left: old.count,
                    new_left: new.count,
                },
                None => State::Header,
            };
            continue;
        }

        let State::Hunk {
            mut next_line,
            mut old_left,
            mut new_left,
        } = state
        else {
            continue;
        };

        match line.as_bytes().first() {
            Some(b'+') => {
                lines.insert(next_line);
                next_line += 1;
                new_left = new_left.saturating_sub(1);
            }
            Some(b' ') => {
                next_line += 1;
                old_left = old_left.saturating_sub(1);
                new_left = new_left.saturating_sub(1);
            }
            // Removed lines have no new-file position.
            Some(b'-') => old_left = old_left.saturating_sub(1),
            // "\ No newline at end of file" annotates the previous line only.
            Some(b'\\') => {}
            _ => {
                state = State::Header;
                continue;
            }
        }

        state = if old_left == 0 && new_left == 0 {
            State::Header
        } else {
            State::Hunk {
                next_line,
                old_left,
                new_left,
            }
        };
    }

    lines
}
