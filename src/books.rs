//! Static catalog of the books shown in the sidebar together with their
//! chapter counts. The display names double as the book identifiers passed to
//! the oracle and printed in citations.

/// One entry of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Book {
    pub name: &'static str,
    pub chapters: u32,
}

const fn book(name: &'static str, chapters: u32) -> Book {
    Book { name, chapters }
}

/// Heading used for the first sidebar section.
pub const OLD_TESTAMENT_TITLE: &str = "ብሉይ ኪዳን";
/// Heading used for the second sidebar section.
pub const NEW_TESTAMENT_TITLE: &str = "አዲስ ኪዳን";

pub const OLD_TESTAMENT: &[Book] = &[
    book("ኦሪት ዘፍጥረት", 50),
    book("ኦሪት ዘጸአት", 40),
    book("ኦሪት ዘሌዋውያን", 27),
    book("ኦሪት ዘኍልቍ", 36),
    book("ኦሪት ዘዳግም", 34),
    book("መጽሐፈ ኢያሱ", 24),
    book("መጽሐፈ መሣፍንት", 21),
    book("መጽሐፈ ሩት", 4),
    book("1ኛ ሳሙኤል", 31),
    book("2ኛ ሳሙኤል", 24),
    book("1ኛ ነገሥት", 22),
    book("2ኛ ነገሥት", 25),
    book("1ኛ ዜና መዋዕል", 29),
    book("2ኛ ዜና መዋዕል", 36),
    book("መጽሐፈ ዕዝራ", 10),
    book("መጽሐፈ ነህምያ", 13),
    book("መጽሐፈ አስቴር", 10),
    book("መጽሐፈ ኢዮብ", 42),
    book("መዝሙረ ዳዊት", 150),
    book("መጽሐፈ ምሳሌ", 31),
    book("መጽሐፈ መክብብ", 12),
    book("መኃልየ መኃልይ", 8),
    book("ትንቢተ ኢሳይያስ", 66),
    book("ትንቢተ ኤርምያስ", 52),
    book("ሰቆቃው ኤርምያስ", 5),
    book("ትንቢተ ሕዝቅኤል", 48),
    book("ትንቢተ ዳንኤል", 12),
    book("ትንቢተ ሆሴዕ", 14),
    book("ትንቢተ ኢዩኤል", 3),
    book("ትንቢተ አሞጽ", 9),
    book("ትንቢተ አብድዩ", 1),
    book("ትንቢተ ዮናስ", 4),
    book("ትንቢተ ሚክያስ", 7),
    book("ትንቢተ ናሆም", 3),
    book("ትንቢተ ዕንባቆም", 3),
    book("ትንቢተ ሶፎንያስ", 3),
    book("ትንቢተ ሐጌ", 2),
    book("ትንቢተ ዘካርያስ", 14),
    book("ትንቢተ ሚልክያስ", 4),
];

pub const NEW_TESTAMENT: &[Book] = &[
    book("የማቴዎስ ወንጌል", 28),
    book("የማርቆስ ወንጌል", 16),
    book("የሉቃስ ወንጌል", 24),
    book("የዮሐንስ ወንጌል", 21),
    book("የሐዋርያት ሥራ", 28),
    book("ወደ ሮሜ ሰዎች", 16),
    book("1ኛ ወደ ቆሮንቶስ ሰዎች", 16),
    book("2ኛ ወደ ቆሮንቶስ ሰዎች", 13),
    book("ወደ ገላትያ ሰዎች", 6),
    book("ወደ ኤፌሶን ሰዎች", 6),
    book("ወደ ፊልጵስዩስ ሰዎች", 4),
    book("ወደ ቆላስይስ ሰዎች", 4),
    book("1ኛ ወደ ተሰሎንቄ ሰዎች", 5),
    book("2ኛ ወደ ተሰሎንቄ ሰዎች", 3),
    book("1ኛ ወደ ጢሞቴዎስ", 6),
    book("2ኛ ወደ ጢሞቴዎስ", 4),
    book("ወደ ቲቶ", 3),
    book("ወደ ፊልሞና", 1),
    book("ወደ ዕብራውያን", 13),
    book("የያዕቆብ መልእክት", 5),
    book("1ኛ የጴጥሮስ መልእክት", 5),
    book("2ኛ የጴጥሮስ መልእክት", 3),
    book("1ኛ የዮሐንስ መልእክት", 5),
    book("2ኛ የዮሐንስ መልእክት", 1),
    book("3ኛ የዮሐንስ መልእክት", 1),
    book("የይሁዳ መልእክት", 1),
    book("የዮሐንስ ራእይ", 22),
];

/// Every book in sidebar order (Old Testament first).
pub fn all_books() -> impl Iterator<Item = &'static Book> {
    OLD_TESTAMENT.iter().chain(NEW_TESTAMENT.iter())
}

/// Look up a catalog entry by its display name.
pub fn find_book(name: &str) -> Option<&'static Book> {
    let name = name.trim();
    all_books().find(|book| book.name == name)
}

/// Number of chapters for a book. Books outside the catalog (for example a
/// name spelled differently by a search hit) are treated as single-chapter.
pub fn chapter_count(name: &str) -> u32 {
    find_book(name).map(|book| book.chapters).unwrap_or(1)
}
