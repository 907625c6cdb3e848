//! Domain models passed between the oracle client, the verse helpers, and the
//! TUI. They stay plain data holders; ordering and numbering rules live in the
//! `verses` module so every caller applies them the same way.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Smallest addressable unit of text. The number is only meaningful inside the
/// chapter that owns the verse; the chapter itself is tracked by the caller.
pub struct Verse {
    pub number: u32,
    pub text: String,
}

impl Verse {
    pub fn new(number: u32, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Verses of one chapter as displayed. Replaced wholesale on navigation.
pub struct ChapterContent {
    pub verses: Vec<Verse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Identity of a chapter: the book display name plus the chapter number.
/// Requests are tagged with this so late replies can be matched against the
/// chapter that is currently open.
pub struct ChapterRef {
    pub book: String,
    pub chapter: u32,
}

impl ChapterRef {
    pub fn new(book: impl Into<String>, chapter: u32) -> Self {
        Self {
            book: book.into(),
            chapter,
        }
    }
}

impl fmt::Display for ChapterRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.book, self.chapter)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A single hit from a search query. Independent of whichever chapter is open.
pub struct SearchResult {
    pub book: String,
    pub chapter: u32,
    pub verse_number: u32,
    pub text: String,
}

impl SearchResult {
    /// `Book 3:16` style label shown above each hit.
    pub fn reference(&self) -> String {
        format!("{} {}:{}", self.book, self.chapter, self.verse_number)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Which main panel the reader is looking at.
pub enum ViewMode {
    Chapter,
    Search,
}
