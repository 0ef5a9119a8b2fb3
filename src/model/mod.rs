pub mod blocks;
pub mod entry;
mod property_value;

pub use blocks::*;
pub use entry::{Category, Entry, EntryContent, PageRecord};
pub use property_value::PropertyValue;
