use std::collections::HashMap;

use anyhow::{Context, Result};
use regex::Regex;

use super::intent::{
    Action, CommandIntent, MATCH_CONFIDENCE, PARAM_CUSTOM_MESSAGE, PARAM_STORY_TEXT,
};
use crate::agent::Platform;
use crate::config::RuleSpec;

/// Story text used when the command does not quote one
pub const DEFAULT_STORY_TEXT: &str = "Going live now! 🔴";

/// Built-in rules. Order is the tie-break: the first matching rule wins.
const BUILTIN_RULES: &[(&str, &str, &[Platform])] = &[
    (
        r"check.*twitch.*live|twitch.*status|stream.*live",
        "check_stream",
        &[Platform::Twitch],
    ),
    (
        r"notify.*discord.*live|send.*discord.*live|discord.*stream",
        "notify_live",
        &[Platform::Discord, Platform::Twitch],
    ),
    (
        r"instagram.*reel|last.*reel|recent.*reel",
        "get_latest_reel",
        &[Platform::Instagram],
    ),
    (
        r"notify.*discord.*reel|send.*reel.*discord",
        "notify_reel",
        &[Platform::Discord, Platform::Instagram],
    ),
    (
        r"post.*story.*live|story.*going.*live",
        "post_live_story",
        &[Platform::Instagram],
    ),
    (r"faq|help|commands", "show_help", &[Platform::Discord]),
];

const SUGGESTIONS: &[&str] = &[
    "Check if Twitch stream is live",
    "Notify Discord that I'm live on Twitch",
    "Show the last Instagram reel",
    "Send the last reel to Discord",
    "Post story: \"Going live now\"",
    "Show help and commands",
];

struct PatternRule {
    pattern: Regex,
    action: Action,
    platforms: Vec<Platform>,
}

/// Rule-based intent classifier
pub struct CommandRouter {
    rules: Vec<PatternRule>,
    message_patterns: [Regex; 2],
    story_pattern: Regex,
}

impl CommandRouter {
    /// Router with the built-in rules only
    #[cfg(test)]
    pub fn new() -> Result<Self> {
        Self::with_rules(&[])
    }

    /// Router with extra rules appended after the built-ins
    pub fn with_rules(extra: &[RuleSpec]) -> Result<Self> {
        let mut rules = Vec::with_capacity(BUILTIN_RULES.len() + extra.len());

        for (pattern, action, platforms) in BUILTIN_RULES {
            rules.push(PatternRule {
                pattern: compile(pattern)?,
                action: Action::from_tag(action),
                platforms: platforms.to_vec(),
            });
        }
        for rule in extra {
            rules.push(PatternRule {
                pattern: compile(&rule.pattern)?,
                action: Action::from_tag(&rule.action),
                platforms: rule.platforms.clone(),
            });
        }

        Ok(Self {
            rules,
            message_patterns: [
                compile(r#"message[:\s]+"([^"]+)""#)?,
                compile(r#"say[:\s]+"([^"]+)""#)?,
            ],
            story_pattern: compile(r#"story[:\s]+"([^"]+)""#)?,
        })
    }

    /// Classify free text into an intent
    pub fn parse_command(&self, text: &str) -> CommandIntent {
        let normalized = text.trim().to_lowercase();

        match self.rules.iter().find(|rule| rule.pattern.is_match(&normalized)) {
            Some(rule) => CommandIntent {
                action: rule.action.clone(),
                platform: rule.platforms.clone(),
                parameters: self.extract_parameters(text, &rule.action),
                confidence: MATCH_CONFIDENCE,
            },
            None => CommandIntent::unknown(text),
        }
    }

    fn extract_parameters(&self, text: &str, action: &Action) -> HashMap<String, String> {
        let mut params = HashMap::new();

        match action {
            Action::NotifyLive | Action::NotifyReel => {
                let custom = self
                    .message_patterns
                    .iter()
                    .find_map(|re| re.captures(text))
                    .map(|caps| caps[1].to_string());
                if let Some(message) = custom {
                    params.insert(PARAM_CUSTOM_MESSAGE.to_string(), message);
                }
            }
            Action::PostLiveStory => {
                let story = self
                    .story_pattern
                    .captures(text)
                    .map(|caps| caps[1].to_string())
                    .unwrap_or_else(|| DEFAULT_STORY_TEXT.to_string());
                params.insert(PARAM_STORY_TEXT.to_string(), story);
            }
            _ => {}
        }

        params
    }

    /// Example commands for display
    pub fn suggestions() -> &'static [&'static str] {
        SUGGESTIONS
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("(?i){}", pattern))
        .context(format!("Invalid command pattern: {}", pattern))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::intent::{PARAM_ORIGINAL_TEXT, UNKNOWN_CONFIDENCE};

    fn router() -> CommandRouter {
        CommandRouter::new().unwrap()
    }

    #[test]
    fn test_check_stream() {
        let intent = router().parse_command("Check if Twitch stream is live");
        assert_eq!(intent.action, Action::CheckStream);
        assert_eq!(intent.platform, vec![Platform::Twitch]);
        assert_eq!(intent.confidence, MATCH_CONFIDENCE);
        assert!(intent.parameters.is_empty());
    }

    #[test]
    fn test_notify_live_platform_order() {
        let intent = router().parse_command("Notify Discord that I'm live on Twitch");
        assert_eq!(intent.action, Action::NotifyLive);
        assert_eq!(intent.platform, vec![Platform::Discord, Platform::Twitch]);
    }

    #[test]
    fn test_notify_live_custom_message_keeps_case() {
        let intent = router()
            .parse_command(r#"Notify Discord I'm live, message: "Come hang out, Chat!""#);
        assert_eq!(intent.action, Action::NotifyLive);
        assert_eq!(intent.param(PARAM_CUSTOM_MESSAGE), Some("Come hang out, Chat!"));
    }

    #[test]
    fn test_say_is_second_choice_for_custom_message() {
        let intent = router().parse_command(r#"send discord live alert and say "We're on!""#);
        assert_eq!(intent.action, Action::NotifyLive);
        assert_eq!(intent.param(PARAM_CUSTOM_MESSAGE), Some("We're on!"));

        let both = router()
            .parse_command(r#"notify discord live say "second" message "first""#);
        assert_eq!(both.param(PARAM_CUSTOM_MESSAGE), Some("first"));
    }

    #[test]
    fn test_unquoted_message_is_ignored() {
        let intent = router().parse_command("notify discord live message hello");
        assert!(intent.param(PARAM_CUSTOM_MESSAGE).is_none());
    }

    #[test]
    fn test_latest_reel() {
        let intent = router().parse_command("Show the last Instagram reel");
        assert_eq!(intent.action, Action::GetLatestReel);
        assert_eq!(intent.platform, vec![Platform::Instagram]);
    }

    #[test]
    fn test_reel_fetch_rule_shadows_share_rule() {
        // "last.*reel" is checked before "send.*reel.*discord"
        let intent = router().parse_command("Send the last reel to Discord");
        assert_eq!(intent.action, Action::GetLatestReel);

        let intent = router().parse_command(r#"notify discord about my new reel say "new!""#);
        assert_eq!(intent.action, Action::NotifyReel);
        assert_eq!(intent.platform, vec![Platform::Discord, Platform::Instagram]);
        assert_eq!(intent.param(PARAM_CUSTOM_MESSAGE), Some("new!"));
    }

    #[test]
    fn test_stream_rule_beats_help_rule() {
        let intent = router().parse_command("help, is the stream live?");
        assert_eq!(intent.action, Action::CheckStream);

        let intent = router().parse_command("help");
        assert_eq!(intent.action, Action::ShowHelp);
    }

    #[test]
    fn test_post_story_with_text() {
        let intent = router().parse_command(r#"Post story: "Going live now""#);
        assert_eq!(intent.action, Action::PostLiveStory);
        assert_eq!(intent.param(PARAM_STORY_TEXT), Some("Going live now"));
    }

    #[test]
    fn test_post_story_default_text() {
        let intent = router().parse_command("story: going live soon");
        assert_eq!(intent.action, Action::PostLiveStory);
        assert_eq!(intent.param(PARAM_STORY_TEXT), Some(DEFAULT_STORY_TEXT));
    }

    #[test]
    fn test_show_help_variants() {
        for text in ["Show help and commands", "FAQ", "  list commands  "] {
            let intent = router().parse_command(text);
            assert_eq!(intent.action, Action::ShowHelp, "text: {}", text);
            assert_eq!(intent.platform, vec![Platform::Discord]);
        }
    }

    #[test]
    fn test_unknown_command() {
        let intent = router().parse_command("Order a pizza");
        assert_eq!(intent.action, Action::Unknown);
        assert!(intent.platform.is_empty());
        assert_eq!(intent.confidence, UNKNOWN_CONFIDENCE);
        assert_eq!(intent.param(PARAM_ORIGINAL_TEXT), Some("Order a pizza"));
    }

    #[test]
    fn test_empty_command_is_unknown() {
        let intent = router().parse_command("   ");
        assert_eq!(intent.action, Action::Unknown);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let router = router();
        for text in CommandRouter::suggestions() {
            assert_eq!(router.parse_command(text), router.parse_command(text));
        }
    }

    #[test]
    fn test_every_suggestion_is_recognized() {
        let router = router();
        for text in CommandRouter::suggestions() {
            assert_ne!(router.parse_command(text).action, Action::Unknown, "text: {}", text);
        }
    }

    #[test]
    fn test_extra_rules_come_after_builtins() {
        let extra = vec![
            RuleSpec {
                pattern: "clip".into(),
                action: "create_clip".into(),
                platforms: vec![Platform::Twitch],
            },
            RuleSpec {
                pattern: "help".into(),
                action: "never_reached".into(),
                platforms: vec![],
            },
        ];
        let router = CommandRouter::with_rules(&extra).unwrap();

        let intent = router.parse_command("Clip that!");
        assert_eq!(intent.action, Action::Other("create_clip".into()));
        assert_eq!(intent.platform, vec![Platform::Twitch]);

        assert_eq!(router.parse_command("help").action, Action::ShowHelp);
    }

    #[test]
    fn test_invalid_extra_rule_is_error() {
        let extra = vec![RuleSpec {
            pattern: "(unclosed".into(),
            action: "x".into(),
            platforms: vec![],
        }];
        let err = CommandRouter::with_rules(&extra).err().unwrap();
        assert!(err.to_string().contains("(unclosed"));
    }
}
