use crate::models::{ChapterContent, Verse};

/// Re-derive canonical verse numbers for one chapter.
///
/// The oracle's numbering is not trusted: verses are stable-sorted by the
/// number they arrived with and then renumbered `1..=N` in that order. Text is
/// left untouched, and verses that arrived with the same number keep their
/// relative input order.
pub fn normalize(mut verses: Vec<Verse>) -> Vec<Verse> {
    // `sort_by_key` is stable, which is what keeps duplicates in input order.
    verses.sort_by_key(|verse| verse.number);
    for (index, verse) in verses.iter_mut().enumerate() {
        verse.number = index as u32 + 1;
    }
    verses
}

/// Apply [`normalize`] to a whole chapter payload.
pub fn normalize_chapter(content: ChapterContent) -> ChapterContent {
    ChapterContent {
        verses: normalize(content.verses),
    }
}
