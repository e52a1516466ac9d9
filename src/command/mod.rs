mod intent;
mod router;

pub use intent::{Action, CommandInput, CommandIntent, PARAM_CUSTOM_MESSAGE, PARAM_STORY_TEXT};
pub use router::{CommandRouter, DEFAULT_STORY_TEXT};
