//! LLM-backed chat with per-user conversation memory

use std::collections::{HashMap, VecDeque};
use std::fmt::Write as _;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::debug;

use crate::llm::{GenerateRequest, GenerationConfig, LlmError, LlmProvider, Message};

use super::knowledge::language_name;

/// Turns kept per user
pub const HISTORY_LIMIT: usize = 10;
/// Turns replayed to the model
pub const PROMPT_HISTORY: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub user: String,
    pub bot: String,
    pub at: DateTime<Utc>,
}

/// What the farmer told us about themselves; all optional
#[derive(Debug, Clone, Default)]
pub struct FarmerContext {
    pub location: Option<String>,
    pub farm_size: Option<String>,
    pub crops: Option<String>,
    pub experience: Option<String>,
}

impl FarmerContext {
    pub fn is_empty(&self) -> bool {
        self.location.is_none()
            && self.farm_size.is_none()
            && self.crops.is_none()
            && self.experience.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct ChatReply {
    pub response: String,
    pub language: String,
    pub context_used: bool,
    /// Turns stored for this user before this one
    pub conversation_turn: usize,
    pub generated_at: DateTime<Utc>,
}

/// Long-lived assistant shared through application state
pub struct AiChatbot {
    provider: Arc<dyn LlmProvider>,
    history: Mutex<HashMap<String, VecDeque<Turn>>>,
}

impl AiChatbot {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            history: Mutex::new(HashMap::new()),
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Ask the model and remember the exchange under `user_id`.
    ///
    /// The history lock is not held while the model is running, so two
    /// concurrent messages from one user may both see the same prior turns.
    pub async fn reply(
        &self,
        user_id: &str,
        message: &str,
        language: &str,
        context: &FarmerContext,
    ) -> Result<ChatReply, LlmError> {
        let previous: Vec<Turn> = {
            let history = self.history.lock().await;
            history
                .get(user_id)
                .map(|turns| turns.iter().cloned().collect())
                .unwrap_or_default()
        };

        let request = build_request(message, language, context, &previous);
        debug!(user_id, turns = previous.len(), "Asking the assistant model");
        let answer = self.provider.generate(request).await?;

        self.remember(user_id, message, &answer.text).await;

        Ok(ChatReply {
            response: answer.text,
            language: language.to_string(),
            context_used: !context.is_empty(),
            conversation_turn: previous.len(),
            generated_at: Utc::now(),
        })
    }

    async fn remember(&self, user_id: &str, message: &str, response: &str) {
        let mut history = self.history.lock().await;
        let turns = history.entry(user_id.to_string()).or_default();
        turns.push_back(Turn {
            user: message.to_string(),
            bot: response.to_string(),
            at: Utc::now(),
        });
        while turns.len() > HISTORY_LIMIT {
            turns.pop_front();
        }
    }

    #[cfg(test)]
    pub async fn history_len(&self, user_id: &str) -> usize {
        self.history
            .lock()
            .await
            .get(user_id)
            .map(VecDeque::len)
            .unwrap_or(0)
    }
}

fn system_prompt(language: &str, context: &FarmerContext) -> String {
    let mut prompt = format!(
        "You are AgriBot, an expert agricultural assistant for the AgroMitra app. You help farmers with:
- Crop selection and planning
- Disease diagnosis and treatment
- Irrigation and water management
- Fertilizer recommendations
- Market prices and selling advice
- Government schemes and subsidies
- Weather and climate guidance
- Organic farming practices

Response Language: {} ({})

Guidelines:
- Be practical and actionable
- Consider Indian farming conditions
- Suggest cost-effective solutions
- Include local resource availability
- Be empathetic to farmer challenges
- Provide step-by-step guidance when needed
",
        language,
        language_name(language)
    );

    if !context.is_empty() {
        let unknown = || "Unknown".to_string();
        let _ = write!(
            prompt,
            "
Farmer Context:
- Location: {}
- Farm Size: {}
- Main Crops: {}
- Experience: {}
",
            context.location.clone().unwrap_or_else(unknown),
            context.farm_size.clone().unwrap_or_else(unknown),
            context.crops.clone().unwrap_or_else(unknown),
            context.experience.clone().unwrap_or_else(unknown),
        );
    }

    prompt
}

fn question_prompt(message: &str, language: &str) -> String {
    format!(
        "Farmer's Question: {}

Please provide a helpful, practical response in {} language.
If the question is about:
- Disease: Suggest using the disease detection feature
- Prices: Refer to price prediction tool
- Schemes: Direct to government schemes section
- General advice: Provide detailed guidance

Keep response conversational but informative.",
        message,
        language_name(language)
    )
}

/// Persona and context as the system prompt, the last few turns replayed as
/// messages, then the question
pub fn build_request(
    message: &str,
    language: &str,
    context: &FarmerContext,
    previous: &[Turn],
) -> GenerateRequest {
    let skip = previous.len().saturating_sub(PROMPT_HISTORY);
    let mut messages: Vec<Message> = previous[skip..]
        .iter()
        .flat_map(|turn| [Message::user(turn.user.clone()), Message::assistant(turn.bot.clone())])
        .collect();
    messages.push(Message::user(question_prompt(message, language)));

    GenerateRequest {
        messages,
        config: GenerationConfig::default(),
        system: Some(system_prompt(language, context)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{GenerateResponse, MessageRole};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Echoes the number of messages it was sent
    struct CountingProvider {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl LlmProvider for CountingProvider {
        async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(LlmError::RateLimitExceeded { retry_after: None });
            }
            Ok(GenerateResponse {
                text: format!("messages={}", request.messages.len()),
                finish_reason: None,
                usage: None,
            })
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    fn turn(n: usize) -> Turn {
        Turn {
            user: format!("q{}", n),
            bot: format!("a{}", n),
            at: Utc::now(),
        }
    }

    #[test]
    fn test_request_replays_last_three_turns() {
        let previous: Vec<Turn> = (1..=5).map(turn).collect();
        let request = build_request("When to sow wheat?", "hi", &FarmerContext::default(), &previous);

        assert_eq!(request.messages.len(), 7);
        assert_eq!(request.messages[0].text, "q3");
        assert_eq!(request.messages[1].role, MessageRole::Assistant);
        assert_eq!(request.messages[5].text, "a5");
        assert!(request.messages[6].text.contains("When to sow wheat?"));
        assert!(request.messages[6].text.contains("in Hindi language"));

        let system = request.system.unwrap();
        assert!(system.contains("AgriBot"));
        assert!(system.contains("Response Language: hi (Hindi)"));
        assert!(!system.contains("Farmer Context"));
    }

    #[test]
    fn test_request_includes_farmer_context() {
        let context = FarmerContext {
            location: Some("Nashik".to_string()),
            crops: Some("onion".to_string()),
            ..FarmerContext::default()
        };
        let request = build_request("hello", "en", &context, &[]);
        let system = request.system.unwrap();
        assert!(system.contains("- Location: Nashik"));
        assert!(system.contains("- Main Crops: onion"));
        assert!(system.contains("- Farm Size: Unknown"));
        assert_eq!(request.messages.len(), 1);
    }

    #[tokio::test]
    async fn test_history_is_kept_per_user_and_capped() {
        let bot = AiChatbot::new(Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
            fail: false,
        }));
        let context = FarmerContext::default();

        let first = bot.reply("ravi", "hi", "en", &context).await.unwrap();
        assert_eq!(first.conversation_turn, 0);
        assert_eq!(first.response, "messages=1");
        assert!(!first.context_used);

        let second = bot.reply("ravi", "and rice?", "en", &context).await.unwrap();
        assert_eq!(second.conversation_turn, 1);
        assert_eq!(second.response, "messages=3");

        for i in 0..12 {
            bot.reply("ravi", &format!("q{}", i), "en", &context).await.unwrap();
        }
        assert_eq!(bot.history_len("ravi").await, HISTORY_LIMIT);
        assert_eq!(bot.history_len("meena").await, 0);

        let capped = bot.reply("ravi", "again", "en", &context).await.unwrap();
        assert_eq!(capped.conversation_turn, HISTORY_LIMIT);
        // three replayed turns plus the question
        assert_eq!(capped.response, "messages=7");
    }

    #[tokio::test]
    async fn test_failed_call_is_not_remembered() {
        let bot = AiChatbot::new(Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
            fail: true,
        }));
        let result = bot.reply("ravi", "hi", "en", &FarmerContext::default()).await;
        assert!(matches!(result, Err(LlmError::RateLimitExceeded { .. })));
        assert_eq!(bot.history_len("ravi").await, 0);
        assert_eq!(bot.provider_name(), "counting");
    }
}
