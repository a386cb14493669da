// SPDX-FileCopyrightText: 2026 Tanjiro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persona prompt loading and per-turn system prompt assembly.

use tanjiro_config::model::AgentConfig;
use tracing::{info, warn};

use crate::interests::{InterestSet, TopicAnalysis};

/// Built-in persona used when no prompt is configured.
pub const DEFAULT_PERSONA_PROMPT: &str = "\
You are Kamado Tanjiro from Demon Slayer. You are kind, determined, and always willing to help others. \
You speak with respect and use honorifics. You often talk about your family, especially your sister Nezuko, \
and your mission to turn her back into a human. You believe in the power of kindness and never give up, \
even in the face of overwhelming odds. You use phrases like \"I'll do my best!\" and \"I won't give up!\"

Respond as Tanjiro would, maintaining his personality and speech patterns.";

/// Resolves the persona prompt: `system_prompt_file`, then `system_prompt`,
/// then [`DEFAULT_PERSONA_PROMPT`].
///
/// An unreadable or blank prompt file is logged and skipped.
pub async fn load_persona_prompt(agent: &AgentConfig) -> String {
    if let Some(path) = &agent.system_prompt_file {
        match tokio::fs::read_to_string(path).await {
            Ok(content) if !content.trim().is_empty() => {
                info!(path = %path, "loaded persona prompt from file");
                return content.trim().to_string();
            }
            Ok(_) => warn!(path = %path, "persona prompt file is empty, falling back"),
            Err(e) => warn!(path = %path, error = %e, "failed to read persona prompt file, falling back"),
        }
    }

    match &agent.system_prompt {
        Some(prompt) if !prompt.trim().is_empty() => prompt.trim().to_string(),
        _ => DEFAULT_PERSONA_PROMPT.to_string(),
    }
}

/// Persona prompt plus what is known about the user this session.
pub fn build_system_prompt(
    persona: &str,
    analysis: &TopicAnalysis,
    interests: &InterestSet,
) -> String {
    let mut context = Vec::new();
    if let Some(line) = analysis.context_line() {
        context.push(line);
    }
    if let Some(line) = analysis.summary_line() {
        context.push(line);
    }
    if !interests.is_empty() {
        let declared: Vec<&str> = interests.iter().collect();
        context.push(format!(
            "The user told you they like: {}.",
            declared.join(", ")
        ));
    }

    if context.is_empty() {
        persona.to_string()
    } else {
        format!("{persona}\n\n{}", context.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[tokio::test]
    async fn default_prompt_when_nothing_configured() {
        let prompt = load_persona_prompt(&AgentConfig::default()).await;
        assert_eq!(prompt, DEFAULT_PERSONA_PROMPT);
        assert!(prompt.starts_with("You are Kamado Tanjiro"));
    }

    #[tokio::test]
    async fn inline_prompt_beats_default() {
        let agent = AgentConfig {
            system_prompt: Some("  You are a gentle swordsman.  ".into()),
            ..AgentConfig::default()
        };
        assert_eq!(load_persona_prompt(&agent).await, "You are a gentle swordsman.");
    }

    #[tokio::test]
    async fn file_prompt_beats_inline() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "You are Tanjiro, from a file.").unwrap();

        let agent = AgentConfig {
            system_prompt: Some("inline".into()),
            system_prompt_file: Some(file.path().display().to_string()),
            ..AgentConfig::default()
        };
        assert_eq!(load_persona_prompt(&agent).await, "You are Tanjiro, from a file.");
    }

    #[tokio::test]
    async fn missing_file_falls_back_to_inline() {
        let agent = AgentConfig {
            system_prompt: Some("inline".into()),
            system_prompt_file: Some("/nonexistent/tanjiro/persona.txt".into()),
            ..AgentConfig::default()
        };
        assert_eq!(load_persona_prompt(&agent).await, "inline");
    }

    #[test]
    fn system_prompt_without_context_is_persona() {
        let prompt = build_system_prompt("persona", &TopicAnalysis::default(), &InterestSet::new());
        assert_eq!(prompt, "persona");
    }

    #[test]
    fn system_prompt_appends_topics_and_interests() {
        let mut interests = InterestSet::new();
        interests.insert("Swords");
        let analysis = TopicAnalysis::analyze(["tell me about nezuko"], &interests);

        let prompt = build_system_prompt("persona", &analysis, &interests);
        assert_eq!(
            prompt,
            "persona\n\nThe user has shown interest in these topics: nezuko, sword.\n\
             The user told you they like: Swords."
        );
    }

    #[test]
    fn system_prompt_includes_model_summary() {
        let analysis = TopicAnalysis::from_weights(
            vec![("Nezuko".into(), 3)],
            vec![],
            Some("Protective of family.".into()),
        );
        let prompt = build_system_prompt("persona", &analysis, &InterestSet::new());
        assert_eq!(
            prompt,
            "persona\n\nThe user has shown interest in these topics: Nezuko.\n\
             User context: Protective of family."
        );
    }
}
