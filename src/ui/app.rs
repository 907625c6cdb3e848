use std::mem;
use std::sync::Arc;

use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};
use ratatui::Frame;
use tracing::{info, warn};

use crate::books::{self, Book, NEW_TESTAMENT, NEW_TESTAMENT_TITLE, OLD_TESTAMENT, OLD_TESTAMENT_TITLE};
use crate::fetch::{Completion, Loader, Request, RequestTracker};
use crate::models::{ChapterRef, ViewMode};
use crate::share::Platform;
use crate::source::ScriptureSource;
use crate::verses::ChapterShare;

use super::helpers::{centered_column, centered_rect, highlighted_lines, wrap_text};
use super::screens::{
    BookMenu, ChapterInput, ChapterScreen, LoadState, SearchScreen, ShareDialog, TextSize,
};

const APP_TITLE: &str = "Amharic Bible";
/// Header space for the title or the search bar.
const HEADER_HEIGHT: u16 = 3;
/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
const SIDEBAR_WIDTH: u16 = 30;
/// Rows moved by PageUp/PageDown.
const PAGE_STEP: isize = 10;

/// Which pane receives navigation keys.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Focus {
    Books,
    Content,
}

/// Fine-grained modes layered over the current view.
enum Mode {
    Normal,
    Searching(SearchInput),
    PickingChapter(ChapterInput),
    Sharing(ShareDialog),
}

/// Query typed into the header search bar.
#[derive(Default)]
struct SearchInput {
    query: String,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    loader: Loader,
    tracker: RequestTracker,
    platform: Box<dyn Platform>,
    menu: BookMenu,
    chapter: Option<ChapterScreen>,
    search: Option<SearchScreen>,
    view: ViewMode,
    focus: Focus,
    mode: Mode,
    text_size: TextSize,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(source: Arc<dyn ScriptureSource>, platform: Box<dyn Platform>) -> Self {
        Self {
            loader: Loader::new(source),
            tracker: RequestTracker::new(),
            platform,
            menu: BookMenu::new(),
            chapter: None,
            search: None,
            view: ViewMode::Chapter,
            focus: Focus::Books,
            mode: Mode::Normal,
            text_size: TextSize::default(),
            status: None,
        }
    }

    /// Whether any request is still outstanding.
    pub fn is_loading(&self) -> bool {
        self.tracker.chapter_pending() || self.tracker.search_pending()
    }

    /// Apply every finished request. Replies that no longer match the open
    /// chapter or the latest search are dropped.
    pub fn process_completions(&mut self) {
        while let Some(completion) = self.loader.try_next() {
            self.apply_completion(completion);
        }
    }

    fn apply_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Chapter {
                ticket,
                target,
                result,
            } => {
                let active = self.chapter.as_ref().map(|screen| &screen.target);
                if !self.tracker.accept_chapter(ticket, &target, active) {
                    return;
                }
                if let Some(screen) = self.chapter.as_mut() {
                    info!(chapter = %target, ok = result.is_ok(), "chapter request finished");
                    screen.finish(result.map_err(|err| err.user_message()));
                }
            }
            Completion::Search {
                ticket,
                query,
                result,
            } => {
                if !self.tracker.accept_search(ticket) {
                    return;
                }
                if let Some(screen) = self.search.as_mut() {
                    info!(%query, ok = result.is_ok(), "search request finished");
                    screen.finish(result.map_err(|err| err.user_message()));
                }
            }
        }
    }

    /// Handle one key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::Searching(input) => self.handle_search_input(code, input),
            Mode::PickingChapter(input) => self.handle_chapter_input(code, input),
            Mode::Sharing(dialog) => self.handle_share_dialog(code, dialog),
        };

        exit
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('q') => {
                *exit = true;
                return Mode::Normal;
            }
            KeyCode::Char('/') => {
                self.clear_status();
                return Mode::Searching(SearchInput::default());
            }
            KeyCode::Char('m') => {
                self.toggle_menu();
                return Mode::Normal;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.toggle_focus();
                return Mode::Normal;
            }
            KeyCode::Char('r') => {
                self.retry();
                return Mode::Normal;
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                if !self.text_size.increase() {
                    self.set_status("Text is already at the largest size.", StatusKind::Info);
                }
                return Mode::Normal;
            }
            KeyCode::Char('-') => {
                if !self.text_size.decrease() {
                    self.set_status("Text is already at the smallest size.", StatusKind::Info);
                }
                return Mode::Normal;
            }
            _ => {}
        }

        match (self.focus, self.view) {
            (Focus::Books, _) => {
                self.handle_menu_key(code);
                Mode::Normal
            }
            (Focus::Content, ViewMode::Search) => {
                self.handle_results_key(code);
                Mode::Normal
            }
            (Focus::Content, ViewMode::Chapter) => self.handle_chapter_key(code),
        }
    }

    fn handle_menu_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up => self.menu.move_selection(-1),
            KeyCode::Down => self.menu.move_selection(1),
            KeyCode::PageUp => self.menu.move_selection(-PAGE_STEP),
            KeyCode::PageDown => self.menu.move_selection(PAGE_STEP),
            KeyCode::Home => self.menu.select_first(),
            KeyCode::End => self.menu.select_last(),
            KeyCode::Enter => {
                if let Some(book) = self.menu.current() {
                    self.open_book(book);
                }
            }
            KeyCode::Esc => {
                if self.chapter.is_some() || self.search.is_some() {
                    self.focus = Focus::Content;
                }
            }
            _ => {}
        }
    }

    fn handle_chapter_key(&mut self, code: KeyCode) -> Mode {
        match code {
            KeyCode::Left | KeyCode::Char('[') => self.step_chapter(-1),
            KeyCode::Right | KeyCode::Char(']') => self.step_chapter(1),
            KeyCode::Char('c') => {
                if self.chapter.is_some() {
                    self.clear_status();
                    return Mode::PickingChapter(ChapterInput::default());
                }
                self.set_status("Select a book first.", StatusKind::Error);
            }
            KeyCode::Char('s') => return self.open_share_dialog(),
            KeyCode::Char('S') => self.share_chapter(),
            _ => {
                if let Some(screen) = self.chapter.as_mut() {
                    match code {
                        KeyCode::Up => screen.move_cursor(-1),
                        KeyCode::Down => screen.move_cursor(1),
                        KeyCode::PageUp => screen.move_cursor(-PAGE_STEP),
                        KeyCode::PageDown => screen.move_cursor(PAGE_STEP),
                        KeyCode::Home => screen.cursor = 0,
                        KeyCode::End => screen.cursor_to_end(),
                        KeyCode::Char(' ') | KeyCode::Enter => {
                            screen.toggle_current();
                        }
                        KeyCode::Esc => screen.selection.clear(),
                        _ => {}
                    }
                }
            }
        }
        Mode::Normal
    }

    fn handle_results_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.leave_search(),
            KeyCode::Enter => self.open_search_result(),
            _ => {
                if let Some(screen) = self.search.as_mut() {
                    match code {
                        KeyCode::Up => screen.move_selection(-1),
                        KeyCode::Down => screen.move_selection(1),
                        KeyCode::PageUp => screen.move_selection(-PAGE_STEP),
                        KeyCode::PageDown => screen.move_selection(PAGE_STEP),
                        _ => {}
                    }
                }
            }
        }
    }

    fn handle_search_input(&mut self, code: KeyCode, mut input: SearchInput) -> Mode {
        match code {
            KeyCode::Esc => return Mode::Normal,
            KeyCode::Enter => {
                let term = input.query.trim().to_string();
                if !term.is_empty() {
                    self.start_search(&term);
                }
                return Mode::Normal;
            }
            KeyCode::Backspace => {
                input.query.pop();
            }
            KeyCode::Char(ch) if !ch.is_control() => input.query.push(ch),
            _ => {}
        }
        Mode::Searching(input)
    }

    fn handle_chapter_input(&mut self, code: KeyCode, mut input: ChapterInput) -> Mode {
        match code {
            KeyCode::Esc => return Mode::Normal,
            KeyCode::Enter => {
                let Some(screen) = self.chapter.as_ref() else {
                    return Mode::Normal;
                };
                match input.parse(screen.chapter_count()) {
                    Ok(chapter) => {
                        if chapter != screen.target.chapter {
                            let target = ChapterRef::new(screen.target.book.clone(), chapter);
                            self.open_chapter(target);
                        }
                        return Mode::Normal;
                    }
                    Err(message) => input.error = Some(message),
                }
            }
            KeyCode::Backspace => input.pop_char(),
            KeyCode::Char(ch) => {
                input.push_char(ch);
            }
            _ => {}
        }
        Mode::PickingChapter(input)
    }

    fn handle_share_dialog(&mut self, code: KeyCode, mut dialog: ShareDialog) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('q') => return Mode::Normal,
            KeyCode::Char('c') | KeyCode::Char('y') => {
                match self.platform.copy(&dialog.citation.shareable_block) {
                    Ok(()) => {
                        dialog.copied = true;
                        self.set_status("Copied!", StatusKind::Info);
                    }
                    Err(err) => {
                        warn!(error = %err, "copying selection failed");
                        self.set_status(err.to_string(), StatusKind::Error);
                    }
                }
            }
            KeyCode::Char('s') => {
                if !self.platform.can_share() {
                    self.set_status(
                        "Sharing is not supported here. Try copying the text instead.",
                        StatusKind::Error,
                    );
                } else if let Err(err) = self
                    .platform
                    .share(&dialog.citation.share_title, &dialog.citation.shareable_block)
                {
                    warn!(error = %err, "sharing selection failed");
                    self.set_status(err.to_string(), StatusKind::Error);
                } else {
                    self.set_status("Opened share target.", StatusKind::Info);
                }
            }
            _ => {}
        }
        Mode::Sharing(dialog)
    }

    fn open_book(&mut self, book: &Book) {
        self.menu.select_named(book.name);
        self.focus = Focus::Content;
        self.open_chapter(ChapterRef::new(book.name, 1));
    }

    /// Switch to `target`: drop the old content and selection, show the
    /// loading state, and request the chapter.
    fn open_chapter(&mut self, target: ChapterRef) {
        self.clear_status();
        info!(chapter = %target, "opening chapter");
        let ticket = self.loader.dispatch(Request::Chapter(target.clone()));
        self.tracker.begin_chapter(ticket, target.clone());
        self.chapter = Some(ChapterScreen::loading(target));
        self.view = ViewMode::Chapter;
    }

    fn step_chapter(&mut self, delta: i64) {
        let Some(screen) = self.chapter.as_ref() else {
            self.set_status("Select a book first.", StatusKind::Error);
            return;
        };
        let next = i64::from(screen.target.chapter) + delta;
        if next < 1 {
            self.set_status("Already at the first chapter.", StatusKind::Info);
            return;
        }
        if next > i64::from(screen.chapter_count()) {
            self.set_status("Already at the last chapter.", StatusKind::Info);
            return;
        }
        let target = ChapterRef::new(screen.target.book.clone(), next as u32);
        self.open_chapter(target);
    }

    fn start_search(&mut self, term: &str) {
        self.clear_status();
        let ticket = self.loader.dispatch(Request::Search(term.to_string()));
        self.tracker.begin_search(ticket);
        self.search = Some(SearchScreen::loading(term));
        self.view = ViewMode::Search;
        self.focus = Focus::Content;
    }

    fn leave_search(&mut self) {
        self.tracker.abandon_search();
        self.search = None;
        self.view = ViewMode::Chapter;
        if self.chapter.is_none() {
            self.focus = Focus::Books;
        }
    }

    fn open_search_result(&mut self) {
        let Some(result) = self.search.as_ref().and_then(|s| s.current()).cloned() else {
            return;
        };
        match books::find_book(&result.book) {
            Some(book) => {
                self.menu.select_named(book.name);
                let chapter = result.chapter.clamp(1, book.chapters);
                self.open_chapter(ChapterRef::new(book.name, chapter));
                if let Some(screen) = self.chapter.as_mut() {
                    screen.jump_to = Some(result.verse_number);
                }
            }
            None => self.set_status(
                format!("\"{}\" is not in the book list.", result.book),
                StatusKind::Error,
            ),
        }
    }

    /// Re-issue the request behind the current view.
    fn retry(&mut self) {
        match self.view {
            ViewMode::Chapter => match self.chapter.as_ref() {
                Some(screen) if !screen.content.is_loading() => {
                    let target = screen.target.clone();
                    self.open_chapter(target);
                }
                Some(_) => {}
                None => self.set_status("Nothing to retry.", StatusKind::Info),
            },
            ViewMode::Search => match self.search.as_ref() {
                Some(screen) if !screen.results.is_loading() => {
                    let term = screen.term.clone();
                    self.start_search(&term);
                }
                Some(_) => {}
                None => self.set_status("Nothing to retry.", StatusKind::Info),
            },
        }
    }

    fn open_share_dialog(&mut self) -> Mode {
        match self.chapter.as_ref().and_then(|screen| screen.citation()) {
            Some(citation) => {
                self.clear_status();
                Mode::Sharing(ShareDialog {
                    citation,
                    copied: false,
                })
            }
            None => {
                self.set_status("Select one or more verses to share.", StatusKind::Error);
                Mode::Normal
            }
        }
    }

    /// Share the chapter reference, falling back to the clipboard when no
    /// share target exists.
    fn share_chapter(&mut self) {
        let Some(screen) = self.chapter.as_ref() else {
            self.set_status("Select a book first.", StatusKind::Error);
            return;
        };
        let share = ChapterShare::new(&screen.target);

        if self.platform.can_share() {
            match self.platform.share(&share.title, &share.text) {
                Ok(()) => self.set_status("Opened share target.", StatusKind::Info),
                Err(err) => {
                    warn!(error = %err, "sharing chapter failed");
                    self.set_status(err.to_string(), StatusKind::Error);
                }
            }
        } else {
            match self.platform.copy(&share.reference) {
                Ok(()) => {
                    self.set_status("Chapter reference copied to clipboard!", StatusKind::Info)
                }
                Err(err) => {
                    warn!(error = %err, "copying chapter reference failed");
                    self.set_status("Could not copy chapter reference.", StatusKind::Error);
                }
            }
        }
    }

    fn toggle_menu(&mut self) {
        self.menu.visible = !self.menu.visible;
        self.focus = if self.menu.visible {
            Focus::Books
        } else {
            Focus::Content
        };
    }

    fn toggle_focus(&mut self) {
        if !self.menu.visible {
            self.focus = Focus::Content;
            return;
        }
        self.focus = match self.focus {
            Focus::Books => Focus::Content,
            Focus::Content => Focus::Books,
        };
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_header(frame, chunks[0]);

        let main_area = if self.menu.visible {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
                .split(chunks[1]);
            self.draw_menu(frame, columns[0]);
            columns[1]
        } else {
            chunks[1]
        };

        match self.view {
            ViewMode::Chapter => self.draw_chapter(frame, main_area),
            ViewMode::Search => self.draw_search(frame, main_area),
        }

        self.draw_footer(frame, chunks[2]);

        match &self.mode {
            Mode::PickingChapter(input) => self.draw_chapter_picker(frame, area, input),
            Mode::Sharing(dialog) => self.draw_share_dialog(frame, area, dialog),
            Mode::Searching(_) | Mode::Normal => {}
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        if let Mode::Searching(input) = &self.mode {
            let block = Block::default().borders(Borders::ALL).title("Search");
            let paragraph = Paragraph::new(Span::raw(format!("Search: {}", input.query)))
                .block(block.clone());
            frame.render_widget(paragraph, area);

            let inner = block.inner(area);
            let typed = "Search: ".len() + input.query.chars().count();
            frame.set_cursor_position((cursor_column(inner, typed), inner.y));
            return;
        }

        let title = Line::from(vec![
            Span::styled(
                APP_TITLE,
                Style::default()
                    .fg(Color::Indexed(61))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "   በመጽሐፍ ቅዱስ ውስጥ ይፈልጉ: press /",
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        let paragraph = Paragraph::new(title).block(Block::default().borders(Borders::BOTTOM));
        frame.render_widget(paragraph, area);
    }

    fn draw_menu(&mut self, frame: &mut Frame, area: Rect) {
        let open_book = self.chapter.as_ref().map(|screen| screen.target.book.as_str());
        let heading = Style::default()
            .fg(Color::White)
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD);

        let mut items = Vec::with_capacity(books::all_books().count() + 2);
        items.push(ListItem::new(Span::styled(OLD_TESTAMENT_TITLE, heading)));
        items.extend(OLD_TESTAMENT.iter().map(|book| book_item(book, open_book)));
        items.push(ListItem::new(Span::styled(NEW_TESTAMENT_TITLE, heading)));
        items.extend(NEW_TESTAMENT.iter().map(|book| book_item(book, open_book)));

        let highlight = if self.focus == Focus::Books {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::REVERSED)
        } else {
            Style::default().fg(Color::Yellow)
        };
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Books"))
            .highlight_style(highlight);

        self.menu.list_state.select(Some(self.menu.list_row()));
        frame.render_stateful_widget(list, area, &mut self.menu.list_state);
    }

    fn draw_chapter(&mut self, frame: &mut Frame, area: Rect) {
        let text_size = self.text_size;
        let focused = self.focus == Focus::Content && matches!(self.mode, Mode::Normal);
        let Some(screen) = self.chapter.as_mut() else {
            draw_welcome(frame, area);
            return;
        };
        let chapter_count = screen.chapter_count();
        let ChapterScreen {
            target,
            content,
            cursor,
            selection,
            list_state,
            ..
        } = screen;
        let selection = &*selection;

        let content = match content {
            LoadState::Loading => {
                draw_loading(frame, area, &target.to_string(), "Loading chapter...");
                return;
            }
            LoadState::Failed(message) => {
                draw_error(frame, area, message);
                return;
            }
            LoadState::Loaded(content) => content,
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(
                format!(" {target} "),
                Style::default().add_modifier(Modifier::BOLD),
            ));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(0)])
            .split(inner);

        let mut info = vec![
            Span::styled("ምዕራፍ: ", Style::default().fg(Color::Gray)),
            Span::raw(format!("{} / {}", target.chapter, chapter_count)),
            Span::styled("   Aa ", Style::default().fg(Color::Gray)),
            Span::raw(format!("{:+}", text_size.step())),
        ];
        if !selection.is_empty() {
            info.push(Span::styled(
                format!("   {} selected, press s to share", selection.len()),
                Style::default().fg(Color::Indexed(61)),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(info)), rows[0]);

        if content.verses.is_empty() {
            let message = Paragraph::new("No verses were returned for this chapter. Press r to reload.")
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            frame.render_widget(message, rows[1]);
            return;
        }

        let column = centered_column(text_size.column_percent(), rows[1]);
        // Room for the highlight symbol and the verse number gutter.
        let text_width = (column.width as usize).saturating_sub(6).max(8);
        let selected_style = Style::default().bg(Color::Indexed(236));

        let items: Vec<ListItem> = content
            .verses
            .iter()
            .map(|verse| {
                let style = if selection.contains(verse.number) {
                    selected_style
                } else {
                    Style::default()
                };
                let mut lines = Vec::new();
                for (index, chunk) in wrap_text(&verse.text, text_width).into_iter().enumerate() {
                    let gutter = if index == 0 {
                        Span::styled(
                            format!("{:>3} ", verse.number),
                            Style::default()
                                .fg(Color::Indexed(61))
                                .add_modifier(Modifier::BOLD),
                        )
                    } else {
                        Span::raw("    ")
                    };
                    lines.push(Line::from(vec![gutter, Span::raw(chunk)]));
                }
                for _ in 0..text_size.verse_spacing() {
                    lines.push(Line::from(""));
                }
                ListItem::new(Text::from(lines)).style(style)
            })
            .collect();

        let mut list = List::new(items);
        if focused {
            list = list
                .highlight_symbol("▸ ")
                .highlight_style(Style::default().add_modifier(Modifier::BOLD));
        } else {
            list = list.highlight_symbol("  ");
        }
        list_state.select(Some(*cursor));
        frame.render_stateful_widget(list, column, list_state);
    }

    fn draw_search(&mut self, frame: &mut Frame, area: Rect) {
        let focused = self.focus == Focus::Content;
        let Some(screen) = self.search.as_mut() else {
            draw_welcome(frame, area);
            return;
        };
        let SearchScreen {
            term,
            results,
            selected,
            list_state,
        } = screen;
        let term = term.as_str();
        let title = format!(" Search Results for: \"{term}\" ");

        let results = match results {
            LoadState::Loading => {
                draw_loading(frame, area, &title, "Searching...");
                return;
            }
            LoadState::Failed(message) => {
                draw_error(frame, area, message);
                return;
            }
            LoadState::Loaded(results) => results,
        };

        let block = Block::default().borders(Borders::ALL).title(title);
        if results.is_empty() {
            let message = Paragraph::new("No results found for your search.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let inner_width = (block.inner(area).width as usize).saturating_sub(4).max(8);
        let reference_style = Style::default()
            .fg(Color::Indexed(61))
            .add_modifier(Modifier::BOLD);
        let items: Vec<ListItem> = results
            .iter()
            .map(|result| {
                let mut lines = vec![Line::from(Span::styled(result.reference(), reference_style))];
                lines.extend(highlighted_lines(
                    &result.text,
                    term,
                    inner_width,
                    Style::default(),
                ));
                lines.push(Line::from(""));
                ListItem::new(Text::from(lines))
            })
            .collect();

        let mut list = List::new(items).block(block);
        if focused {
            list = list.highlight_symbol("▸ ");
        } else {
            list = list.highlight_symbol("  ");
        }
        list_state.select(Some(*selected));
        frame.render_stateful_widget(list, area, list_state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let keys: &[(&'static str, &'static str)] = match (&self.mode, self.focus, self.view) {
            (Mode::Searching(_), _, _) => &[("[Enter]", " Search   "), ("[Esc]", " Cancel")],
            (Mode::PickingChapter(_), _, _) => &[("[0-9]", " Chapter   "), ("[Enter]", " Go   "), ("[Esc]", " Cancel")],
            (Mode::Sharing(_), _, _) => &[("[c]", " Copy   "), ("[s]", " Share   "), ("[Esc]", " Close")],
            (Mode::Normal, Focus::Books, _) => &[
                ("[↑↓]", " Navigate   "),
                ("[Enter]", " Open   "),
                ("[Tab]", " Reading pane   "),
                ("[m]", " Hide menu   "),
                ("[/]", " Search   "),
                ("[q]", " Quit"),
            ],
            (Mode::Normal, Focus::Content, ViewMode::Search) => &[
                ("[↑↓]", " Navigate   "),
                ("[Enter]", " Open chapter   "),
                ("[Esc]", " Back   "),
                ("[r]", " Retry   "),
                ("[q]", " Quit"),
            ],
            (Mode::Normal, Focus::Content, ViewMode::Chapter) => &[
                ("[↑↓]", " Verse   "),
                ("[Space]", " Select   "),
                ("[←→]", " Chapter   "),
                ("[c]", " Go to   "),
                ("[+/-]", " Size   "),
                ("[s]", " Share verses   "),
                ("[S]", " Share chapter   "),
                ("[Tab]", " Books   "),
                ("[q]", " Quit"),
            ],
        };

        Line::from(
            keys.iter()
                .flat_map(|(key, label)| {
                    [Span::styled(*key, key_style), Span::raw(*label)]
                })
                .collect::<Vec<_>>(),
        )
    }

    fn draw_chapter_picker(&self, frame: &mut Frame, area: Rect, input: &ChapterInput) {
        let Some(screen) = self.chapter.as_ref() else {
            return;
        };
        let popup_area = centered_rect(50, 25, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Go to Chapter").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let prompt = format!("{} (1-{}): ", screen.target.book, screen.chapter_count());
        let mut lines = vec![Line::from(vec![
            Span::raw(prompt.clone()),
            Span::styled(
                input.digits.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ])];
        if let Some(error) = &input.error {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        }

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
        let typed = prompt.chars().count() + input.digits.len();
        frame.set_cursor_position((cursor_column(inner, typed), inner.y));
    }

    fn draw_share_dialog(&self, frame: &mut Frame, area: Rect, dialog: &ShareDialog) {
        let popup_area = centered_rect(70, 60, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Share Verses").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let copy_label = if dialog.copied { " Copied!   " } else { " Copy Text   " };
        let mut actions = vec![Span::styled("[c]", key_style), Span::raw(copy_label)];
        if self.platform.can_share() {
            actions.push(Span::styled("[s]", key_style));
            actions.push(Span::raw(" Share   "));
        }
        actions.push(Span::styled("[Esc]", key_style));
        actions.push(Span::raw(" Close"));

        // Reference and actions keep fixed rows; only the quote is clipped.
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(inner);

        let quote = Paragraph::new(dialog.citation.quoted_text.clone()).wrap(Wrap { trim: true });
        frame.render_widget(quote, rows[0]);

        let reference = Paragraph::new(Span::styled(
            format!("— {}", dialog.citation.reference),
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Right);
        frame.render_widget(reference, rows[1]);
        frame.render_widget(Paragraph::new(Line::from(actions)), rows[3]);
    }
}

/// Column just past `typed` characters, kept inside `inner`.
fn cursor_column(inner: Rect, typed: usize) -> u16 {
    inner
        .x
        .saturating_add(u16::try_from(typed).unwrap_or(u16::MAX))
        .min(inner.right().saturating_sub(1))
}

fn book_item(book: &'static Book, open_book: Option<&str>) -> ListItem<'static> {
    let label = format!("  {}", book.name);
    if open_book == Some(book.name) {
        ListItem::new(Span::styled(
            label,
            Style::default()
                .fg(Color::Indexed(61))
                .add_modifier(Modifier::BOLD),
        ))
    } else {
        ListItem::new(label)
    }
}

fn draw_welcome(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Welcome to the Amharic Bible",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Select a book from the sidebar to begin your reading and study journey."),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn draw_loading(frame: &mut Frame, area: Rect, title: &str, message: &str) {
    let paragraph = Paragraph::new(vec![Line::from(""), Line::from(message.to_string())])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    frame.render_widget(paragraph, area);
}

/// Full-width error panel that replaces the main content.
fn draw_error(frame: &mut Frame, area: Rect, message: &str) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "An Error Occurred",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "Press r to try again.",
            Style::default().fg(Color::Gray),
        )),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        );
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::mpsc::{self, Receiver, Sender};
    use std::sync::Mutex;
    use std::thread;
    use std::time::Duration;

    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;
    use crate::models::{ChapterContent, SearchResult, Verse};
    use crate::share::ShareError;
    use crate::source::SourceError;

    const GENESIS: &str = "ኦሪት ዘፍጥረት";

    /// Serves chapters in reverse order so normalization is observable.
    /// Chapter 1 of any book waits for the gate before replying. The book
    /// "long" returns verses of a few hundred characters each.
    struct FakeSource {
        gate: Option<Mutex<Receiver<()>>>,
    }

    impl ScriptureSource for FakeSource {
        fn fetch_chapter(&self, book: &str, chapter: u32) -> Result<ChapterContent, SourceError> {
            if chapter == 1 {
                if let Some(gate) = &self.gate {
                    let _ = gate.lock().unwrap().recv();
                }
            }
            if book == "broken" {
                return Err(SourceError::EmptyReply);
            }
            Ok(ChapterContent {
                verses: (1..=4)
                    .rev()
                    .map(|n| {
                        let text = if book == "long" {
                            format!("verse{n} ").repeat(40)
                        } else {
                            format!("{book} {chapter} v{n}")
                        };
                        Verse::new(n + 10, text)
                    })
                    .collect(),
            })
        }

        fn search(&self, query: &str) -> Result<Vec<SearchResult>, SourceError> {
            if query == "fail" {
                return Err(SourceError::EmptyReply);
            }
            Ok(vec![
                SearchResult {
                    book: "የዮሐንስ ወንጌል".into(),
                    chapter: 3,
                    verse_number: 16,
                    text: format!("{query} so loved the world"),
                },
                SearchResult {
                    book: "Unknown".into(),
                    chapter: 1,
                    verse_number: 1,
                    text: query.to_string(),
                },
            ])
        }
    }

    #[derive(Clone, Default)]
    struct FakePlatform {
        copied: Arc<Mutex<Vec<String>>>,
        shared: Arc<Mutex<Vec<(String, String)>>>,
        can_share: bool,
        fail_copy: bool,
        fail_share: bool,
    }

    impl Platform for FakePlatform {
        fn copy(&mut self, text: &str) -> Result<(), ShareError> {
            if self.fail_copy {
                return Err(ShareError::ClipboardUnavailable);
            }
            self.copied.lock().unwrap().push(text.to_string());
            Ok(())
        }

        fn can_share(&self) -> bool {
            self.can_share
        }

        fn share(&mut self, title: &str, text: &str) -> Result<(), ShareError> {
            if !self.can_share {
                return Err(ShareError::ShareUnavailable);
            }
            if self.fail_share {
                return Err(ShareError::Share(io::Error::other("no handler")));
            }
            self.shared
                .lock()
                .unwrap()
                .push((title.to_string(), text.to_string()));
            Ok(())
        }
    }

    fn app_with(platform: FakePlatform) -> App {
        App::new(Arc::new(FakeSource { gate: None }), Box::new(platform))
    }

    fn gated_app() -> (App, Sender<()>) {
        let (tx, rx) = mpsc::channel();
        let source = FakeSource {
            gate: Some(Mutex::new(rx)),
        };
        (
            App::new(Arc::new(source), Box::new(FakePlatform::default())),
            tx,
        )
    }

    fn settle(app: &mut App) {
        for _ in 0..400 {
            app.process_completions();
            if !app.is_loading() {
                return;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("requests did not finish");
    }

    fn loaded_verses(app: &App) -> Vec<Verse> {
        match &app.chapter.as_ref().unwrap().content {
            LoadState::Loaded(content) => content.verses.clone(),
            _ => panic!("chapter is not loaded"),
        }
    }

    fn press(app: &mut App, keys: &[KeyCode]) {
        for key in keys {
            app.handle_key(*key);
        }
    }

    fn status_text(app: &App) -> Option<&str> {
        app.status.as_ref().map(|status| status.text.as_str())
    }

    #[test]
    fn opening_a_book_loads_normalized_chapter_one() {
        let mut app = app_with(FakePlatform::default());
        press(&mut app, &[KeyCode::Enter]);
        assert!(app.is_loading());
        assert!(app.chapter.as_ref().unwrap().content.is_loading());
        settle(&mut app);

        let verses = loaded_verses(&app);
        let numbers: Vec<u32> = verses.iter().map(|v| v.number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
        assert_eq!(verses[0].text, format!("{GENESIS} 1 v1"));
        assert!(app.focus == Focus::Content);
    }

    #[test]
    fn changing_chapter_clears_selection() {
        let mut app = app_with(FakePlatform::default());
        press(&mut app, &[KeyCode::Enter]);
        settle(&mut app);
        press(&mut app, &[KeyCode::Char(' '), KeyCode::Down, KeyCode::Char(' ')]);
        assert_eq!(app.chapter.as_ref().unwrap().selection.numbers(), vec![1, 2]);

        press(&mut app, &[KeyCode::Right]);
        let screen = app.chapter.as_ref().unwrap();
        assert_eq!(screen.target, ChapterRef::new(GENESIS, 2));
        assert!(screen.selection.is_empty());
        assert!(screen.content.is_loading());
        settle(&mut app);
    }

    #[test]
    fn chapter_navigation_stops_at_bounds() {
        let mut app = app_with(FakePlatform::default());
        press(&mut app, &[KeyCode::Enter]);
        settle(&mut app);
        press(&mut app, &[KeyCode::Left]);
        assert_eq!(status_text(&app), Some("Already at the first chapter."));
        assert_eq!(app.chapter.as_ref().unwrap().target.chapter, 1);
    }

    #[test]
    fn late_reply_for_previous_chapter_is_discarded() {
        let (mut app, gate) = gated_app();
        press(&mut app, &[KeyCode::Enter]);
        // Chapter 1 is stuck behind the gate; move on to chapter 2.
        press(&mut app, &[KeyCode::Right]);
        settle(&mut app);
        assert_eq!(loaded_verses(&app)[0].text, format!("{GENESIS} 2 v1"));

        gate.send(()).unwrap();
        for _ in 0..40 {
            app.process_completions();
            thread::sleep(Duration::from_millis(5));
        }
        let screen = app.chapter.as_ref().unwrap();
        assert_eq!(screen.target.chapter, 2);
        assert_eq!(loaded_verses(&app)[0].text, format!("{GENESIS} 2 v1"));
    }

    #[test]
    fn failed_chapter_shows_message_and_retries() {
        let mut app = app_with(FakePlatform::default());
        app.open_chapter(ChapterRef::new("broken", 2));
        settle(&mut app);
        assert!(matches!(
            app.chapter.as_ref().unwrap().content,
            LoadState::Failed(_)
        ));

        app.focus = Focus::Content;
        press(&mut app, &[KeyCode::Char('r')]);
        assert!(app.chapter.as_ref().unwrap().content.is_loading());
        settle(&mut app);
    }

    #[test]
    fn share_dialog_requires_a_selection() {
        let mut app = app_with(FakePlatform::default());
        press(&mut app, &[KeyCode::Enter]);
        settle(&mut app);
        press(&mut app, &[KeyCode::Char('s')]);
        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(status_text(&app), Some("Select one or more verses to share."));
    }

    #[test]
    fn copying_from_share_dialog_uses_shareable_block() {
        let platform = FakePlatform::default();
        let copied = Arc::clone(&platform.copied);
        let mut app = app_with(platform);
        press(&mut app, &[KeyCode::Enter]);
        settle(&mut app);
        press(
            &mut app,
            &[
                KeyCode::Char(' '),
                KeyCode::Down,
                KeyCode::Char(' '),
                KeyCode::Down,
                KeyCode::Down,
                KeyCode::Char(' '),
                KeyCode::Char('s'),
                KeyCode::Char('c'),
            ],
        );

        let Mode::Sharing(dialog) = &app.mode else {
            panic!("share dialog is not open");
        };
        assert!(dialog.copied);
        let expected = format!(
            "\"{GENESIS} 1 v1 {GENESIS} 1 v2 {GENESIS} 1 v4\"\n\n— {GENESIS} 1:1-2, 4"
        );
        assert_eq!(copied.lock().unwrap().as_slice(), &[expected]);

        press(&mut app, &[KeyCode::Char('s')]);
        assert_eq!(
            status_text(&app),
            Some("Sharing is not supported here. Try copying the text instead.")
        );

        press(&mut app, &[KeyCode::Esc]);
        assert!(matches!(app.mode, Mode::Normal));
        press(&mut app, &[KeyCode::Char('s')]);
        let Mode::Sharing(dialog) = &app.mode else {
            panic!("share dialog is not open");
        };
        assert!(!dialog.copied);
    }

    #[test]
    fn chapter_share_falls_back_to_copying_reference() {
        let platform = FakePlatform::default();
        let copied = Arc::clone(&platform.copied);
        let mut app = app_with(platform);
        press(&mut app, &[KeyCode::Enter]);
        settle(&mut app);
        press(&mut app, &[KeyCode::Char('S')]);
        assert_eq!(copied.lock().unwrap().as_slice(), &[format!("{GENESIS} 1")]);
        assert_eq!(status_text(&app), Some("Chapter reference copied to clipboard!"));
    }

    #[test]
    fn chapter_share_uses_share_target_when_available() {
        let platform = FakePlatform {
            can_share: true,
            ..FakePlatform::default()
        };
        let shared = Arc::clone(&platform.shared);
        let mut app = app_with(platform);
        press(&mut app, &[KeyCode::Enter]);
        settle(&mut app);
        press(&mut app, &[KeyCode::Char('S')]);
        let shared = shared.lock().unwrap();
        assert_eq!(shared[0].0, format!("Amharic Bible: {GENESIS} 1"));
        assert_eq!(
            shared[0].1,
            format!("Check out {GENESIS} chapter 1 in the Amharic Bible.")
        );
    }

    #[test]
    fn search_then_open_result_jumps_to_verse() {
        let mut app = app_with(FakePlatform::default());
        press(&mut app, &[KeyCode::Char('/')]);
        for ch in "  love ".chars() {
            app.handle_key(KeyCode::Char(ch));
        }
        press(&mut app, &[KeyCode::Enter]);
        assert!(app.view == ViewMode::Search);
        assert_eq!(app.search.as_ref().unwrap().term, "love");
        settle(&mut app);

        press(&mut app, &[KeyCode::Enter]);
        assert!(app.view == ViewMode::Chapter);
        let screen = app.chapter.as_ref().unwrap();
        assert_eq!(screen.target, ChapterRef::new("የዮሐንስ ወንጌል", 3));
        assert_eq!(screen.jump_to, Some(16));
        assert_eq!(app.menu.current().map(|b| b.name), Some("የዮሐንስ ወንጌል"));
        settle(&mut app);
    }

    #[test]
    fn unknown_result_book_reports_error() {
        let mut app = app_with(FakePlatform::default());
        app.start_search("x");
        settle(&mut app);
        press(&mut app, &[KeyCode::Down, KeyCode::Enter]);
        assert!(app.view == ViewMode::Search);
        assert_eq!(
            status_text(&app),
            Some("\"Unknown\" is not in the book list.")
        );
    }

    #[test]
    fn blank_search_is_ignored() {
        let mut app = app_with(FakePlatform::default());
        press(&mut app, &[KeyCode::Char('/'), KeyCode::Char(' '), KeyCode::Enter]);
        assert!(app.search.is_none());
        assert!(!app.is_loading());
        assert!(matches!(app.mode, Mode::Normal));
    }

    #[test]
    fn leaving_search_discards_pending_reply() {
        let mut app = app_with(FakePlatform::default());
        app.start_search("fail");
        press(&mut app, &[KeyCode::Esc]);
        assert!(app.search.is_none());
        assert!(!app.is_loading());
        thread::sleep(Duration::from_millis(50));
        app.process_completions();
        assert!(app.search.is_none());
    }

    #[test]
    fn chapter_picker_validates_input() {
        let mut app = app_with(FakePlatform::default());
        press(&mut app, &[KeyCode::Enter]);
        settle(&mut app);
        press(
            &mut app,
            &[KeyCode::Char('c'), KeyCode::Char('9'), KeyCode::Char('9'), KeyCode::Enter],
        );
        let Mode::PickingChapter(input) = &app.mode else {
            panic!("chapter picker is not open");
        };
        assert_eq!(input.error.as_deref(), Some("Chapter must be between 1 and 50."));

        press(&mut app, &[KeyCode::Backspace, KeyCode::Enter]);
        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(app.chapter.as_ref().unwrap().target.chapter, 9);
        settle(&mut app);
    }

    #[test]
    fn text_size_keys_are_clamped() {
        let mut app = app_with(FakePlatform::default());
        press(&mut app, &[KeyCode::Char('+'), KeyCode::Char('+')]);
        assert!(app.status.is_none());
        press(&mut app, &[KeyCode::Char('=')]);
        assert_eq!(status_text(&app), Some("Text is already at the largest size."));
        assert_eq!(app.text_size.step(), 2);
    }

    fn status_is_error(app: &App) -> bool {
        matches!(
            app.status.as_ref().map(|status| &status.kind),
            Some(StatusKind::Error)
        )
    }

    /// Open Genesis 1, select verses 1 and 3, and open the share dialog.
    fn app_sharing(platform: FakePlatform) -> App {
        let mut app = app_with(platform);
        press(&mut app, &[KeyCode::Enter]);
        settle(&mut app);
        press(
            &mut app,
            &[
                KeyCode::Char(' '),
                KeyCode::Down,
                KeyCode::Down,
                KeyCode::Char(' '),
                KeyCode::Char('s'),
            ],
        );
        assert!(matches!(app.mode, Mode::Sharing(_)));
        app
    }

    fn assert_chapter_untouched(app: &App) {
        let verses = loaded_verses(app);
        assert_eq!(verses.len(), 4);
        assert_eq!(verses[0].text, format!("{GENESIS} 1 v1"));
        assert_eq!(app.chapter.as_ref().unwrap().selection.numbers(), vec![1, 3]);
    }

    #[test]
    fn copy_failure_is_reported_and_dialog_stays_open() {
        let mut app = app_sharing(FakePlatform {
            fail_copy: true,
            ..FakePlatform::default()
        });
        press(&mut app, &[KeyCode::Char('c')]);

        let Mode::Sharing(dialog) = &app.mode else {
            panic!("share dialog closed after a failed copy");
        };
        assert!(!dialog.copied);
        assert_eq!(status_text(&app), Some("clipboard is not available"));
        assert!(status_is_error(&app));
        assert_chapter_untouched(&app);
    }

    #[test]
    fn share_failure_is_reported_and_dialog_stays_open() {
        let platform = FakePlatform {
            can_share: true,
            fail_share: true,
            ..FakePlatform::default()
        };
        let shared = Arc::clone(&platform.shared);
        let mut app = app_sharing(platform);
        press(&mut app, &[KeyCode::Char('s')]);

        let Mode::Sharing(dialog) = &app.mode else {
            panic!("share dialog closed after a failed share");
        };
        assert!(!dialog.copied);
        assert_eq!(
            status_text(&app),
            Some("failed to open share target: no handler")
        );
        assert!(status_is_error(&app));
        assert!(shared.lock().unwrap().is_empty());
        assert_chapter_untouched(&app);
    }

    #[test]
    fn chapter_share_failures_leave_chapter_alone() {
        let mut app = app_with(FakePlatform {
            fail_copy: true,
            ..FakePlatform::default()
        });
        press(&mut app, &[KeyCode::Enter]);
        settle(&mut app);
        press(&mut app, &[KeyCode::Char(' '), KeyCode::Down, KeyCode::Down, KeyCode::Char(' ')]);
        press(&mut app, &[KeyCode::Char('S')]);
        assert_eq!(status_text(&app), Some("Could not copy chapter reference."));
        assert!(status_is_error(&app));
        assert!(matches!(app.mode, Mode::Normal));
        assert_chapter_untouched(&app);

        let mut app = app_with(FakePlatform {
            can_share: true,
            fail_share: true,
            ..FakePlatform::default()
        });
        press(&mut app, &[KeyCode::Enter]);
        settle(&mut app);
        press(&mut app, &[KeyCode::Char('S')]);
        assert_eq!(
            status_text(&app),
            Some("failed to open share target: no handler")
        );
        assert_eq!(loaded_verses(&app).len(), 4);
    }

    #[test]
    fn failed_search_shows_error_and_retries_same_term() {
        let mut app = app_with(FakePlatform::default());
        app.start_search("fail");
        settle(&mut app);
        let screen = app.search.as_ref().unwrap();
        assert!(matches!(
            &screen.results,
            LoadState::Failed(message) if message == &SourceError::EmptyReply.user_message()
        ));
        assert!(screen.current().is_none());

        press(&mut app, &[KeyCode::Char('r')]);
        assert!(app.view == ViewMode::Search);
        let screen = app.search.as_ref().unwrap();
        assert_eq!(screen.term, "fail");
        assert!(screen.results.is_loading());
        assert!(app.is_loading());
        settle(&mut app);
        assert!(matches!(
            app.search.as_ref().unwrap().results,
            LoadState::Failed(_)
        ));
    }

    fn render(app: &mut App, width: u16, height: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        let buffer = terminal.backend().buffer();
        (0..height)
            .map(|y| (0..width).map(|x| buffer[(x, y)].symbol()).collect())
            .collect()
    }

    #[test]
    fn share_dialog_keeps_reference_and_actions_visible() {
        let mut app = app_with(FakePlatform::default());
        app.focus = Focus::Content;
        app.open_chapter(ChapterRef::new("long", 1));
        settle(&mut app);
        press(
            &mut app,
            &[
                KeyCode::Char(' '),
                KeyCode::Down,
                KeyCode::Char(' '),
                KeyCode::Down,
                KeyCode::Char(' '),
                KeyCode::Down,
                KeyCode::Char(' '),
                KeyCode::Char('s'),
            ],
        );
        assert!(matches!(app.mode, Mode::Sharing(_)));

        let rows = render(&mut app, 80, 24);
        assert!(rows.iter().any(|row| row.contains("long 1:1-4")));
        assert!(rows.iter().any(|row| row.contains("[c] Copy Text")));
        assert!(rows.iter().any(|row| row.contains("[Esc] Close")));
    }

    #[test]
    fn cursor_column_saturates_inside_area() {
        let inner = Rect::new(u16::MAX - 10, 0, 10, 1);
        assert_eq!(cursor_column(inner, 3), u16::MAX - 7);
        assert_eq!(cursor_column(inner, usize::MAX), u16::MAX - 1);
        let inner = Rect::new(2, 0, 20, 1);
        assert_eq!(cursor_column(inner, 5), 7);
        assert_eq!(cursor_column(inner, 500), 21);
    }
}
