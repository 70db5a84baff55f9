pub mod candidate;
pub mod editor;
pub mod fullwidth;
pub mod memory;
pub mod table;
pub mod usage;

pub use candidate::{Candidate, LookupTable, Orientation};
pub use editor::{Editor, PreeditParts, PINYIN_MAX_KEY_LENGTH, PINYIN_TONE_MARKS};
pub use fullwidth::{is_convertible_punct, punct_to_fullwidth, to_fullwidth, to_halfwidth};
pub use memory::{MemoryTable, TableLoadError};
pub use table::{ChineseMode, TableMetadata, TableQuery, WordQueryOptions};
pub use usage::UsageRecorder;
