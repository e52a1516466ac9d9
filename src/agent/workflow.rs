use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use super::{AgentResponse, Orchestrator};
use crate::command::CommandInput;

/// Pause between consecutive commands of a workflow
pub const WORKFLOW_PAUSE: Duration = Duration::from_millis(500);

/// Runs command batches one at a time
pub struct WorkflowRunner {
    orchestrator: Arc<Orchestrator>,
    pause: Duration,
}

impl WorkflowRunner {
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self {
            orchestrator,
            pause: WORKFLOW_PAUSE,
        }
    }

    /// Run every command in order and return all responses, flattened
    pub async fn execute_workflow<S: AsRef<str>>(&self, commands: &[S]) -> Vec<AgentResponse> {
        self.execute_workflow_with(commands, |_, _| {}).await
    }

    /// Like [`execute_workflow`](Self::execute_workflow), calling `on_command`
    /// with each command's responses as soon as it finishes
    pub async fn execute_workflow_with<S, F>(
        &self,
        commands: &[S],
        mut on_command: F,
    ) -> Vec<AgentResponse>
    where
        S: AsRef<str>,
        F: FnMut(&str, &[AgentResponse]),
    {
        let mut all_responses = Vec::new();

        for (index, command) in commands.iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.pause).await;
            }

            let input = CommandInput::new(command.as_ref());
            info!(
                command_id = %input.id,
                step = index + 1,
                total = commands.len(),
                "Running workflow step"
            );
            let responses = self.orchestrator.process_command(&input).await;
            on_command(command.as_ref(), &responses);
            all_responses.extend(responses);
        }

        all_responses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::testing::config;
    use crate::agent::{Platform, ResponseStatus};
    use crate::state::MemoryStore;
    use tokio::time::Instant;

    fn runner(live_probability: f64) -> WorkflowRunner {
        let orchestrator = Orchestrator::new(
            Arc::new(config(live_probability, 0.0)),
            Arc::new(MemoryStore::new()),
        )
        .unwrap();
        WorkflowRunner::new(Arc::new(orchestrator))
    }

    #[tokio::test(start_paused = true)]
    async fn test_help_then_check_stream_in_order() {
        let runner = runner(1.0);
        let start = Instant::now();
        let responses = runner.execute_workflow(&["help", "check stream live"]).await;

        assert!(start.elapsed() >= WORKFLOW_PAUSE);
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0].platform, Platform::Discord);
        assert_eq!(responses[0].action.as_deref(), Some("send_message"));
        assert_eq!(responses[1].platform, Platform::Twitch);
        assert_eq!(responses[1].action.as_deref(), Some("check_stream"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_only_between_commands() {
        let runner = runner(1.0);

        let start = Instant::now();
        runner.execute_workflow(&["help"]).await;
        assert!(start.elapsed() < WORKFLOW_PAUSE);

        let start = Instant::now();
        runner.execute_workflow(&["help", "help", "help"]).await;
        assert!(start.elapsed() >= WORKFLOW_PAUSE * 2);
        assert!(start.elapsed() < WORKFLOW_PAUSE * 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_multi_response_commands_stay_grouped() {
        let runner = runner(1.0);
        let commands = vec![
            "notify discord that I'm live".to_string(),
            "Order a pizza".to_string(),
            "help".to_string(),
        ];

        let mut groups = Vec::new();
        let responses = runner
            .execute_workflow_with(&commands, |command, batch| {
                groups.push((command.to_string(), batch.len()));
            })
            .await;

        assert_eq!(
            groups,
            vec![
                ("notify discord that I'm live".to_string(), 2),
                ("Order a pizza".to_string(), 1),
                ("help".to_string(), 1),
            ]
        );
        assert_eq!(responses.len(), 4);
        assert_eq!(responses[0].platform, Platform::Twitch);
        assert_eq!(responses[1].platform, Platform::Discord);
        assert_eq!(responses[2].status, ResponseStatus::Error);
        assert_eq!(responses[3].status, ResponseStatus::Success);
    }

    #[tokio::test]
    async fn test_empty_workflow() {
        let empty: [&str; 0] = [];
        assert!(runner(1.0).execute_workflow(&empty).await.is_empty());
    }
}
