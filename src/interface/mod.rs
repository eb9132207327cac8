pub mod export;
pub mod prompts;
pub mod render;

pub use export::write_meals_csv;
pub use prompts::{prompt_number, prompt_yes_no, run_editor};
pub use render::{display_client_list, display_plan, format_plan, warning_text};
