//! XML navigation and text extraction helpers.

mod text;
mod utils;

pub use text::{clean_text, collect_text};
pub use utils::{
    descendants_with_tag, find_by_path, find_child, find_children, get_attribute, get_tag_name,
    has_tag, xml_lang,
};
