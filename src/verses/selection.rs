use crate::models::Verse;

/// Toggle `verse` in `selection`, keyed by verse number.
///
/// When an entry with the same number exists it is removed (even if its text
/// differs); otherwise the verse is added and the result re-sorted ascending.
pub fn toggle(selection: &[Verse], verse: &Verse) -> Vec<Verse> {
    if selection.iter().any(|v| v.number == verse.number) {
        return selection
            .iter()
            .filter(|v| v.number != verse.number)
            .cloned()
            .collect();
    }
    let mut next = selection.to_vec();
    next.push(verse.clone());
    next.sort_by_key(|v| v.number);
    next
}

/// Verses the reader picked in the open chapter, kept strictly ascending by
/// number with no duplicates. Owned by the chapter view and cleared whenever
/// the chapter changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    verses: Vec<Verse>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or remove `verse`. Returns `true` when the verse is now selected.
    pub fn toggle(&mut self, verse: &Verse) -> bool {
        match self.verses.binary_search_by_key(&verse.number, |v| v.number) {
            Ok(index) => {
                self.verses.remove(index);
                false
            }
            Err(index) => {
                self.verses.insert(index, verse.clone());
                true
            }
        }
    }

    pub fn contains(&self, number: u32) -> bool {
        self.verses
            .binary_search_by_key(&number, |v| v.number)
            .is_ok()
    }

    pub fn clear(&mut self) {
        self.verses.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.verses.len()
    }

    pub fn verses(&self) -> &[Verse] {
        &self.verses
    }

    pub fn numbers(&self) -> Vec<u32> {
        self.verses.iter().map(|v| v.number).collect()
    }
}
