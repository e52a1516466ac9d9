mod discord;
mod instagram;
mod orchestrator;
mod response;
mod twitch;
mod workflow;

#[cfg(test)]
pub(crate) mod testing;

pub use discord::DiscordAgent;
pub use instagram::InstagramAgent;
pub use orchestrator::Orchestrator;
pub use response::{
    AgentError, AgentResponse, MediaData, MediaType, MessageData, Platform, ResponseData,
    ResponseStatus, StoryData, StreamData,
};
pub use twitch::TwitchAgent;
pub use workflow::WorkflowRunner;

use rand::Rng;

/// Weighted coin flip; out-of-range probabilities are clamped
pub(crate) fn chance(probability: f64) -> bool {
    let p = if probability.is_nan() {
        0.0
    } else {
        probability.clamp(0.0, 1.0)
    };
    rand::thread_rng().gen_bool(p)
}
