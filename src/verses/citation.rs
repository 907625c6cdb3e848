use crate::models::{ChapterRef, Verse};

/// Render ascending, unique verse numbers as a compact citation such as
/// `3-5, 8, 10-11`.
///
/// Callers must pass numbers in strictly ascending order; [`Selection`]
/// guarantees this. Other input produces an unspecified string.
///
/// [`Selection`]: super::Selection
pub fn compress_ranges(numbers: &[u32]) -> String {
    debug_assert!(
        numbers.windows(2).all(|pair| pair[0] < pair[1]),
        "verse numbers must be strictly ascending: {numbers:?}"
    );

    let Some(&first) = numbers.first() else {
        return String::new();
    };

    let mut chunks = Vec::new();
    let mut start = first;
    for (index, &current) in numbers.iter().enumerate() {
        let next = numbers.get(index + 1).copied();
        if next.is_some() && next == current.checked_add(1) {
            continue;
        }
        if start == current {
            chunks.push(start.to_string());
        } else {
            chunks.push(format!("{start}-{current}"));
        }
        if let Some(next) = next {
            start = next;
        }
    }
    chunks.join(", ")
}

/// Text derived from a non-empty verse selection for display, copy, and share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    /// Selected verse texts joined with single spaces.
    pub quoted_text: String,
    /// `{book} {chapter}:{ranges}`.
    pub reference: String,
    /// Quoted text followed by a blank line and the attributed reference.
    pub shareable_block: String,
    /// Title handed to the share capability.
    pub share_title: String,
}

impl Citation {
    /// Build the citation for `verses` (ascending, unique) of `chapter`.
    /// Returns `None` for an empty selection.
    pub fn new(chapter: &ChapterRef, verses: &[Verse]) -> Option<Self> {
        if verses.is_empty() {
            return None;
        }

        let numbers: Vec<u32> = verses.iter().map(|v| v.number).collect();
        let quoted_text = verses
            .iter()
            .map(|v| v.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let reference = format!(
            "{} {}:{}",
            chapter.book,
            chapter.chapter,
            compress_ranges(&numbers)
        );
        let shareable_block = format!("\"{quoted_text}\"\n\n— {reference}");

        Some(Self {
            quoted_text,
            reference,
            shareable_block,
            share_title: format!("Bible Verses from {chapter}"),
        })
    }
}

/// Text used when sharing a whole chapter rather than selected verses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterShare {
    pub title: String,
    pub text: String,
    /// Bare `{book} {chapter}` copied when no share capability exists.
    pub reference: String,
}

impl ChapterShare {
    pub fn new(chapter: &ChapterRef) -> Self {
        Self {
            title: format!("Amharic Bible: {chapter}"),
            text: format!(
                "Check out {} chapter {} in the Amharic Bible.",
                chapter.book, chapter.chapter
            ),
            reference: chapter.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compresses_documented_examples() {
        assert_eq!(compress_ranges(&[]), "");
        assert_eq!(compress_ranges(&[5]), "5");
        assert_eq!(compress_ranges(&[3, 4, 5]), "3-5");
        assert_eq!(compress_ranges(&[1, 2, 4, 5, 7]), "1-2, 4-5, 7");
        assert_eq!(compress_ranges(&[1, 3, 5]), "1, 3, 5");
        assert_eq!(compress_ranges(&[3, 4, 5, 8, 10, 11]), "3-5, 8, 10-11");
    }

    #[test]
    fn pair_is_rendered_as_range() {
        assert_eq!(compress_ranges(&[9, 10]), "9-10");
    }

    #[test]
    #[should_panic(expected = "strictly ascending")]
    #[cfg(debug_assertions)]
    fn unsorted_input_trips_debug_assertion() {
        compress_ranges(&[3, 1]);
    }

    #[test]
    fn citation_joins_text_and_reference() {
        let chapter = ChapterRef::new("Book", 3);
        let verses = vec![
            Verse::new(1, "In the beginning"),
            Verse::new(2, "was the word"),
            Verse::new(4, "and light"),
        ];
        let citation = Citation::new(&chapter, &verses).unwrap();
        assert_eq!(citation.quoted_text, "In the beginning was the word and light");
        assert_eq!(citation.reference, "Book 3:1-2, 4");
        assert_eq!(
            citation.shareable_block,
            "\"In the beginning was the word and light\"\n\n— Book 3:1-2, 4"
        );
        assert_eq!(citation.share_title, "Bible Verses from Book 3");
    }

    #[test]
    fn empty_selection_has_no_citation() {
        assert!(Citation::new(&ChapterRef::new("Book", 1), &[]).is_none());
    }

    #[test]
    fn chapter_share_text() {
        let share = ChapterShare::new(&ChapterRef::new("የዮሐንስ ወንጌል", 3));
        assert_eq!(share.title, "Amharic Bible: የዮሐንስ ወንጌል 3");
        assert_eq!(share.text, "Check out የዮሐንስ ወንጌል chapter 3 in the Amharic Bible.");
        assert_eq!(share.reference, "የዮሐንስ ወንጌል 3");
    }
}
