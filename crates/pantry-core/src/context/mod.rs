mod history;
mod builder;
mod rewrite;

pub use history::ChatHistoryStore;
pub use builder::{neutralize, render_history, PromptBuilder};
pub use rewrite::QueryRewriter;
