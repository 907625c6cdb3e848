//! Pure helpers that turn untrusted oracle output into a stable reading and
//! sharing experience.

mod citation;
mod normalize;
mod selection;

pub use citation::{compress_ranges, Citation, ChapterShare};
pub use normalize::{normalize, normalize_chapter};
pub use selection::{toggle, Selection};
