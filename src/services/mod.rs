pub mod decoration;
pub mod prompts;
pub mod providers;
pub mod search_form;
pub mod suggestions;

pub use search_form::{FormEdits, SearchForm};
pub use suggestions::SuggestionService;
