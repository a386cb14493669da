// SPDX-FileCopyrightText: 2026 Tanjiro Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model-backed interest analysis.
//!
//! The language model reads the recent user messages and answers with a JSON
//! object of weighted topics plus a one-line summary. If the call fails or
//! the answer does not parse, the keyword counts from
//! [`TopicAnalysis::analyze`] are used instead.

use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::Arc;

use serde::Deserialize;
use tanjiro_core::TanjiroError;
use tanjiro_core::traits::ProviderAdapter;
use tanjiro_core::types::{ProviderMessage, ProviderRequest, Speaker};
use tracing::{debug, warn};

use crate::interests::{InterestSet, TopicAnalysis, TopicWeight};

/// System prompt for the analysis call.
pub const ANALYST_PROMPT: &str =
    "You are an analysis assistant that identifies topics and patterns in conversation data.";

const ANALYSIS_TEMPERATURE: f32 = 0.2;

/// Weights the model is asked to use.
const MIN_WEIGHT: f64 = 1.0;
const MAX_WEIGHT: f64 = 5.0;

/// Shape of the model's answer.
#[derive(Debug, Deserialize)]
struct ModelTopics {
    #[serde(default)]
    demon_slayer_topics: BTreeMap<String, f64>,
    #[serde(default)]
    general_topics: BTreeMap<String, f64>,
    #[serde(default)]
    summary: Option<String>,
}

/// Runs interest analysis through the injected provider.
pub struct InterestAnalyzer {
    provider: Arc<dyn ProviderAdapter>,
}

impl InterestAnalyzer {
    pub fn new(provider: Arc<dyn ProviderAdapter>) -> Self {
        Self { provider }
    }

    /// Analyzes `user_inputs` with the model, falling back to keyword
    /// counting on any failure. No model call is made without user input.
    pub async fn analyze(&self, user_inputs: &[&str], interests: &InterestSet) -> TopicAnalysis {
        if user_inputs.is_empty() {
            return TopicAnalysis::analyze(user_inputs.iter().copied(), interests);
        }

        match self.ask_model(user_inputs, interests).await {
            Ok(analysis) => {
                debug!(
                    demon_slayer = analysis.demon_slayer.len(),
                    general = analysis.general.len(),
                    "model interest analysis finished"
                );
                analysis
            }
            Err(e) => {
                warn!(error = %e, "interest analysis failed, using keyword counts");
                TopicAnalysis::analyze(user_inputs.iter().copied(), interests)
            }
        }
    }

    async fn ask_model(
        &self,
        user_inputs: &[&str],
        interests: &InterestSet,
    ) -> Result<TopicAnalysis, TanjiroError> {
        let request = ProviderRequest {
            system_prompt: ANALYST_PROMPT.to_string(),
            messages: vec![ProviderMessage {
                role: Speaker::User,
                content: build_analysis_prompt(user_inputs, interests),
            }],
            temperature: Some(ANALYSIS_TEMPERATURE),
            json_output: true,
            ..ProviderRequest::default()
        };

        let response = self.provider.complete(request).await?;
        parse_analysis_response(&response.content)
    }
}

fn build_analysis_prompt(user_inputs: &[&str], interests: &InterestSet) -> String {
    let mut prompt = String::from(
        "Analyze the following user messages from a conversation with Tanjiro \
         (from the Demon Slayer anime). Identify the user's topics of interest, \
         both related to Demon Slayer and general.\n\n\
         Demon Slayer topics include characters (Nezuko, Zenitsu, ...), abilities \
         (breathing techniques, ...), plot elements (Muzan, demons, ...) and \
         relationships. General topics include themes, personal interests and \
         conversation patterns.\n\nUser messages:",
    );
    for (i, input) in user_inputs.iter().enumerate() {
        let _ = write!(prompt, "\n{}. {input}", i + 1);
    }
    if !interests.is_empty() {
        let declared: Vec<&str> = interests.iter().collect();
        let _ = write!(prompt, "\n\nThe user also said they like: {}.", declared.join(", "));
    }
    prompt.push_str(
        "\n\nReturn a JSON object with this structure:\n\
         {\"demon_slayer_topics\": {\"topic\": weight, ...}, \
         \"general_topics\": {\"topic\": weight, ...}, \
         \"summary\": \"Brief summary of the user's apparent interests\"}\n\
         Weights are integers from 1 to 5 giving the topic's importance in the \
         conversation. Treat synonyms and related concepts as one topic \
         (\"sister\" and \"Nezuko\" may be related). Include only topics that are \
         actually discussed.",
    );
    prompt
}

/// Parses the model's JSON answer. Text around the object, such as a
/// markdown code fence, is ignored.
fn parse_analysis_response(content: &str) -> Result<TopicAnalysis, TanjiroError> {
    let json = match (content.find('{'), content.rfind('}')) {
        (Some(start), Some(end)) if start < end => &content[start..=end],
        _ => {
            return Err(TanjiroError::provider(
                "interest analysis reply contains no JSON object",
            ));
        }
    };

    let topics: ModelTopics = serde_json::from_str(json).map_err(|e| TanjiroError::Provider {
        message: format!("interest analysis reply is not valid JSON: {e}"),
        source: Some(Box::new(e)),
    })?;

    Ok(TopicAnalysis::from_weights(
        to_weights(topics.demon_slayer_topics),
        to_weights(topics.general_topics),
        topics.summary,
    ))
}

fn to_weights(topics: BTreeMap<String, f64>) -> Vec<TopicWeight> {
    topics
        .into_iter()
        .filter(|(_, weight)| weight.is_finite() && *weight > 0.0)
        .map(|(topic, weight)| {
            let weight = weight.round().clamp(MIN_WEIGHT, MAX_WEIGHT) as u32;
            (topic.trim().to_string(), weight)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tanjiro_test_utils::MockProvider;
    use tracing_test::traced_test;

    const MODEL_REPLY: &str = r#"{
        "demon_slayer_topics": {"Nezuko": 4, "water breathing": 2},
        "general_topics": {"cooking": 1},
        "summary": "Worried about Nezuko and curious about swordsmanship."
    }"#;

    #[tokio::test]
    async fn model_answer_becomes_analysis() {
        let provider = Arc::new(MockProvider::with_responses(vec![MODEL_REPLY.into()]));
        let analyzer = InterestAnalyzer::new(provider.clone());

        let analysis = analyzer
            .analyze(&["How is Nezuko?", "Teach me water breathing"], &InterestSet::new())
            .await;

        assert_eq!(
            analysis.demon_slayer,
            vec![("Nezuko".to_string(), 4), ("water breathing".to_string(), 2)]
        );
        assert_eq!(analysis.general, vec![("cooking".to_string(), 1)]);
        assert_eq!(
            analysis.summary.as_deref(),
            Some("Worried about Nezuko and curious about swordsmanship.")
        );

        let requests = provider.requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].system_prompt, ANALYST_PROMPT);
        assert!(requests[0].json_output);
        assert_eq!(requests[0].temperature, Some(0.2));
        let prompt = &requests[0].messages[0].content;
        assert!(prompt.contains("\n1. How is Nezuko?\n2. Teach me water breathing"));
    }

    #[tokio::test]
    async fn declared_interests_are_part_of_the_prompt() {
        let provider = Arc::new(MockProvider::with_responses(vec![MODEL_REPLY.into()]));
        let analyzer = InterestAnalyzer::new(provider.clone());
        let mut interests = InterestSet::new();
        interests.insert("Hashira");

        analyzer.analyze(&["hello"], &interests).await;

        let requests = provider.requests().await;
        assert!(
            requests[0].messages[0]
                .content
                .contains("The user also said they like: Hashira.")
        );
    }

    #[tokio::test]
    #[traced_test]
    async fn provider_failure_falls_back_to_keywords() {
        let analyzer = InterestAnalyzer::new(Arc::new(MockProvider::failing()));

        let analysis = analyzer.analyze(&["nezuko", "nezuko again"], &InterestSet::new()).await;

        assert_eq!(analysis.demon_slayer, vec![("nezuko".to_string(), 2)]);
        assert!(analysis.summary.is_none());
        assert!(logs_contain("interest analysis failed"));
    }

    #[tokio::test]
    async fn unparseable_answer_falls_back_to_keywords() {
        let analyzer = InterestAnalyzer::new(Arc::new(MockProvider::with_responses(vec![
            "You seem to like Nezuko a lot!".into(),
        ])));

        let analysis = analyzer.analyze(&["is nezuko ok"], &InterestSet::new()).await;

        assert_eq!(analysis.demon_slayer, vec![("nezuko".to_string(), 1)]);
        assert!(analysis.summary.is_none());
    }

    #[tokio::test]
    async fn no_input_means_no_model_call() {
        let provider = Arc::new(MockProvider::new());
        let analyzer = InterestAnalyzer::new(provider.clone());

        let analysis = analyzer.analyze(&[], &InterestSet::new()).await;

        assert!(analysis.is_empty());
        assert_eq!(provider.call_count().await, 0);
    }

    #[test]
    fn fenced_answer_parses_and_weights_are_clamped() {
        let reply = "```json\n{\"demon_slayer_topics\": {\"Muzan\": 9.4, \"Demons\": 0}, \
                     \"general_topics\": {\"hope\": 2.6}}\n```";
        let analysis = parse_analysis_response(reply).unwrap();

        assert_eq!(analysis.demon_slayer, vec![("Muzan".to_string(), 5)]);
        assert_eq!(analysis.general, vec![("hope".to_string(), 3)]);
        assert!(analysis.summary.is_none());
    }

    #[test]
    fn wrong_shape_is_an_error() {
        let err = parse_analysis_response(r#"{"demon_slayer_topics": ["Nezuko"]}"#).unwrap_err();
        assert!(err.to_string().contains("not valid JSON"), "got: {err}");
        assert!(parse_analysis_response("no json here").is_err());
    }
}
