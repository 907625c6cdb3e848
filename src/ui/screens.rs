use ratatui::widgets::ListState;

use crate::books::{self, Book};
use crate::models::{ChapterContent, ChapterRef, SearchResult};
use crate::verses::{Citation, Selection};

/// Lifecycle of data sourced from the oracle.
pub(crate) enum LoadState<T> {
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> LoadState<T> {
    pub(crate) fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }
}

/// Sidebar listing every book. `selected` indexes `books::all_books()`.
pub(crate) struct BookMenu {
    pub(crate) selected: usize,
    pub(crate) visible: bool,
    pub(crate) list_state: ListState,
}

impl BookMenu {
    pub(crate) fn new() -> Self {
        Self {
            selected: 0,
            visible: true,
            list_state: ListState::default(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        books::all_books().count()
    }

    pub(crate) fn current(&self) -> Option<&'static Book> {
        books::all_books().nth(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        let len = self.len() as isize;
        if len == 0 {
            return;
        }
        self.selected = (self.selected as isize + offset).clamp(0, len - 1) as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.len().saturating_sub(1);
    }

    /// Point the menu at `name` if the catalog knows it.
    pub(crate) fn select_named(&mut self, name: &str) {
        if let Some(index) = books::all_books().position(|book| book.name == name) {
            self.selected = index;
        }
    }

    /// Row of the selected book in the rendered list, which has one heading
    /// row before each testament.
    pub(crate) fn list_row(&self) -> usize {
        if self.selected < books::OLD_TESTAMENT.len() {
            self.selected + 1
        } else {
            self.selected + 2
        }
    }
}

/// The open chapter: its identity, content, cursor, and verse selection.
pub(crate) struct ChapterScreen {
    pub(crate) target: ChapterRef,
    pub(crate) content: LoadState<ChapterContent>,
    pub(crate) cursor: usize,
    pub(crate) selection: Selection,
    /// Verse to place the cursor on once the content arrives.
    pub(crate) jump_to: Option<u32>,
    pub(crate) list_state: ListState,
}

impl ChapterScreen {
    /// A fresh screen for `target` with no content and an empty selection.
    pub(crate) fn loading(target: ChapterRef) -> Self {
        Self {
            target,
            content: LoadState::Loading,
            cursor: 0,
            selection: Selection::new(),
            jump_to: None,
            list_state: ListState::default(),
        }
    }

    pub(crate) fn chapter_count(&self) -> u32 {
        books::chapter_count(&self.target.book)
    }

    pub(crate) fn finish(&mut self, result: Result<ChapterContent, String>) {
        self.content = match result {
            Ok(content) => {
                if let Some(number) = self.jump_to.take() {
                    self.cursor = content
                        .verses
                        .iter()
                        .position(|v| v.number == number)
                        .unwrap_or(0);
                }
                LoadState::Loaded(content)
            }
            Err(message) => LoadState::Failed(message),
        };
    }

    fn verse_count(&self) -> usize {
        match &self.content {
            LoadState::Loaded(content) => content.verses.len(),
            _ => 0,
        }
    }

    pub(crate) fn move_cursor(&mut self, offset: isize) {
        let len = self.verse_count() as isize;
        if len == 0 {
            return;
        }
        self.cursor = (self.cursor as isize + offset).clamp(0, len - 1) as usize;
    }

    pub(crate) fn cursor_to_end(&mut self) {
        self.cursor = self.verse_count().saturating_sub(1);
    }

    /// Toggle the verse under the cursor. Returns `None` when nothing is loaded.
    pub(crate) fn toggle_current(&mut self) -> Option<bool> {
        let LoadState::Loaded(content) = &self.content else {
            return None;
        };
        let verse = content.verses.get(self.cursor)?;
        Some(self.selection.toggle(verse))
    }

    pub(crate) fn citation(&self) -> Option<Citation> {
        Citation::new(&self.target, self.selection.verses())
    }
}

/// Results of the latest search.
pub(crate) struct SearchScreen {
    pub(crate) term: String,
    pub(crate) results: LoadState<Vec<SearchResult>>,
    pub(crate) selected: usize,
    pub(crate) list_state: ListState,
}

impl SearchScreen {
    pub(crate) fn loading(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            results: LoadState::Loading,
            selected: 0,
            list_state: ListState::default(),
        }
    }

    pub(crate) fn finish(&mut self, result: Result<Vec<SearchResult>, String>) {
        self.selected = 0;
        self.results = match result {
            Ok(results) => LoadState::Loaded(results),
            Err(message) => LoadState::Failed(message),
        };
    }

    pub(crate) fn current(&self) -> Option<&SearchResult> {
        match &self.results {
            LoadState::Loaded(results) => results.get(self.selected),
            _ => None,
        }
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        let len = match &self.results {
            LoadState::Loaded(results) => results.len() as isize,
            _ => 0,
        };
        if len == 0 {
            return;
        }
        self.selected = (self.selected as isize + offset).clamp(0, len - 1) as usize;
    }
}

pub(crate) const TEXT_SIZE_MIN: i8 = -2;
pub(crate) const TEXT_SIZE_MAX: i8 = 2;

/// Reading text size step. The terminal cannot change its font, so the step
/// narrows the reading column and adds spacing between verses instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct TextSize(i8);

impl TextSize {
    pub(crate) fn step(self) -> i8 {
        self.0
    }

    /// Returns `false` when already at the largest size.
    pub(crate) fn increase(&mut self) -> bool {
        let next = (self.0 + 1).min(TEXT_SIZE_MAX);
        let changed = next != self.0;
        self.0 = next;
        changed
    }

    /// Returns `false` when already at the smallest size.
    pub(crate) fn decrease(&mut self) -> bool {
        let next = (self.0 - 1).max(TEXT_SIZE_MIN);
        let changed = next != self.0;
        self.0 = next;
        changed
    }

    /// Width of the reading column as a percentage of the main area.
    pub(crate) fn column_percent(self) -> u16 {
        match self.0 {
            i8::MIN..=-2 => 100,
            -1 => 90,
            0 => 80,
            1 => 70,
            _ => 60,
        }
    }

    /// Blank lines inserted after each verse.
    pub(crate) fn verse_spacing(self) -> usize {
        if self.0 > 0 {
            1
        } else {
            0
        }
    }
}

/// Digits typed into the chapter picker.
#[derive(Default)]
pub(crate) struct ChapterInput {
    pub(crate) digits: String,
    pub(crate) error: Option<String>,
}

impl ChapterInput {
    /// Append a digit; other characters are rejected.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_ascii_digit() && self.digits.len() < 3 {
            self.digits.push(ch);
            self.error = None;
            true
        } else {
            false
        }
    }

    pub(crate) fn pop_char(&mut self) {
        self.digits.pop();
        self.error = None;
    }

    /// Parse the typed chapter, checking it against `1..=max`.
    pub(crate) fn parse(&self, max: u32) -> Result<u32, String> {
        let chapter: u32 = self
            .digits
            .parse()
            .map_err(|_| "Enter a chapter number.".to_string())?;
        if (1..=max).contains(&chapter) {
            Ok(chapter)
        } else {
            Err(format!("Chapter must be between 1 and {max}."))
        }
    }
}

/// State of the share dialog for the current selection.
pub(crate) struct ShareDialog {
    pub(crate) citation: Citation,
    pub(crate) copied: bool,
}
