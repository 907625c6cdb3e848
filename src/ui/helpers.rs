use std::ops::Range;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Horizontally center a column `percent` wide inside `area`.
pub(crate) fn centered_column(percent: u16, area: Rect) -> Rect {
    let percent = percent.clamp(10, 100);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent) / 2),
            Constraint::Percentage(percent),
            Constraint::Percentage((100 - percent) / 2),
        ])
        .split(area)[1]
}

/// Greedy word wrap by character count. Words longer than `width` are split.
pub(crate) fn wrap_text(text: &str, width: usize) -> Vec<String> {
    wrap_ranges(text, width)
        .into_iter()
        .map(|line| text[line].to_string())
        .collect()
}

/// Byte ranges of `text` for each wrapped line. Whitespace at line breaks is
/// dropped; an empty text yields one empty line.
pub(crate) fn wrap_ranges(text: &str, width: usize) -> Vec<Range<usize>> {
    let width = width.max(1);
    let mut lines = Vec::new();
    // (start, end, char count) of the line being filled.
    let mut current: Option<(usize, usize, usize)> = None;

    for mut word in word_ranges(text) {
        while text[word.clone()].chars().count() > width {
            if let Some((start, end, _)) = current.take() {
                lines.push(start..end);
            }
            let split = text[word.clone()]
                .char_indices()
                .nth(width)
                .map_or(word.end, |(offset, _)| word.start + offset);
            lines.push(word.start..split);
            word = split..word.end;
        }

        let len = text[word.clone()].chars().count();
        current = match current {
            Some((start, end, chars)) => {
                let needed = chars + text[end..word.start].chars().count() + len;
                if needed > width {
                    lines.push(start..end);
                    Some((word.start, word.end, len))
                } else {
                    Some((start, word.end, needed))
                }
            }
            None => Some((word.start, word.end, len)),
        };
    }

    if let Some((start, end, _)) = current {
        lines.push(start..end);
    }
    if lines.is_empty() {
        lines.push(0..0);
    }
    lines
}

fn word_ranges(text: &str) -> Vec<Range<usize>> {
    let mut words = Vec::new();
    let mut start = None;
    for (index, ch) in text.char_indices() {
        match (ch.is_whitespace(), start) {
            (true, Some(word_start)) => {
                words.push(word_start..index);
                start = None;
            }
            (false, None) => start = Some(index),
            _ => {}
        }
    }
    if let Some(word_start) = start {
        words.push(word_start..text.len());
    }
    words
}

/// Byte ranges of `text` that match `term`, ignoring case. Matches do not
/// overlap and are returned left to right.
pub(crate) fn match_ranges(text: &str, term: &str) -> Vec<Range<usize>> {
    let term = term.trim();
    if term.is_empty() {
        return Vec::new();
    }

    let mut ranges = Vec::new();
    let mut search_from = 0;
    while search_from < text.len() {
        let found = text[search_from..]
            .char_indices()
            .find_map(|(offset, _)| {
                let start = search_from + offset;
                match_len(&text[start..], term).map(|len| start..start + len)
            });
        match found {
            Some(range) => {
                search_from = range.end;
                ranges.push(range);
            }
            None => break,
        }
    }
    ranges
}

/// Length in bytes of the prefix of `haystack` that equals `term` ignoring case.
fn match_len(haystack: &str, term: &str) -> Option<usize> {
    let mut hay = haystack.char_indices();
    let mut end = 0;
    for expected in term.chars() {
        let (index, actual) = hay.next()?;
        if !actual.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
        end = index + actual.len_utf8();
    }
    Some(end)
}

/// Wrap `text` to `width` and highlight every occurrence of `term`. Matches
/// are found before wrapping, so a match spanning a line break is highlighted
/// on both lines.
pub(crate) fn highlighted_lines(
    text: &str,
    term: &str,
    width: usize,
    base: Style,
) -> Vec<Line<'static>> {
    let highlight = Style::default()
        .fg(Color::Black)
        .bg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let matches = match_ranges(text, term);

    wrap_ranges(text, width)
        .into_iter()
        .map(|line| {
            let mut spans = Vec::new();
            let mut cursor = line.start;
            for found in &matches {
                let start = found.start.max(line.start);
                let end = found.end.min(line.end);
                if start >= end {
                    continue;
                }
                if start > cursor {
                    spans.push(Span::styled(text[cursor..start].to_string(), base));
                }
                spans.push(Span::styled(text[start..end].to_string(), highlight));
                cursor = end;
            }
            if cursor < line.end || spans.is_empty() {
                spans.push(Span::styled(text[cursor..line.end].to_string(), base));
            }
            Line::from(spans)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_breaks_on_words() {
        assert_eq!(
            wrap_text("in the beginning was the word", 12),
            vec!["in the", "beginning", "was the word"]
        );
    }

    #[test]
    fn wrap_splits_long_words() {
        assert_eq!(wrap_text("abcdefgh ij", 3), vec!["abc", "def", "gh", "ij"]);
    }

    #[test]
    fn wrap_counts_characters_not_bytes() {
        assert_eq!(wrap_text("በመጀመሪያ ቃል ነበረ", 7), vec!["በመጀመሪያ", "ቃል ነበረ"]);
    }

    #[test]
    fn wrap_empty_text_yields_one_blank_line() {
        assert_eq!(wrap_text("", 10), vec![String::new()]);
    }

    #[test]
    fn matches_ignore_case() {
        let text = "Love is patient, love is kind";
        let ranges = match_ranges(text, "LOVE");
        assert_eq!(ranges, vec![0..4, 17..21]);
    }

    #[test]
    fn matches_work_on_ethiopic_text() {
        let text = "እግዚአብሔር ፍቅር ነው ፍቅር";
        let ranges = match_ranges(text, "ፍቅር");
        assert_eq!(ranges.len(), 2);
        for range in ranges {
            assert_eq!(&text[range], "ፍቅር");
        }
    }

    #[test]
    fn blank_term_matches_nothing() {
        assert!(match_ranges("anything", "  ").is_empty());
    }

    #[test]
    fn highlighted_lines_keep_all_text() {
        let lines = highlighted_lines("a love b", "love", 40, Style::default());
        assert_eq!(lines.len(), 1);
        let rebuilt: String = lines[0].spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(rebuilt, "a love b");
        assert_eq!(lines[0].spans.len(), 3);
    }

    #[test]
    fn match_across_line_break_is_highlighted_on_both_lines() {
        let lines = highlighted_lines("God so loved the world", "so loved", 8, Style::default());
        let text: Vec<String> = lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        assert_eq!(text, vec!["God so", "loved", "the", "world"]);

        let first = lines[0].spans.last().unwrap();
        assert_eq!(first.content, "so");
        assert_eq!(first.style.bg, Some(Color::Yellow));
        let second = &lines[1].spans[0];
        assert_eq!(second.content, "loved");
        assert_eq!(second.style.bg, Some(Color::Yellow));
        assert_eq!(lines[2].spans[0].style.bg, None);
    }

    #[test]
    fn wrap_ranges_point_into_source_text() {
        let text = "ab  cd ef";
        let ranges = wrap_ranges(text, 6);
        assert_eq!(ranges, vec![0..6, 7..9]);
        assert_eq!(&text[ranges[0].clone()], "ab  cd");
    }
}
