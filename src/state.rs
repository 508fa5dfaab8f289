//! Long-lived services shared by every request

use std::convert::Infallible;
use std::sync::Arc;

use warp::Filter;

use crate::advisor::AiAdvisor;
use crate::auth::TokenService;
use crate::chatbot::AiChatbot;
use crate::config::AppConfig;
use crate::db::Database;
use crate::disease::DiseaseClassifier;
use crate::llm::LlmProvider;
use crate::stories::StoryStore;

pub struct AppState {
    pub config: AppConfig,
    pub db: Database,
    pub tokens: TokenService,
    pub stories: Arc<dyn StoryStore>,
    /// `None` when the model file could not be loaded
    pub classifier: Option<Arc<dyn DiseaseClassifier>>,
    pub advisor: Option<AiAdvisor>,
    pub chatbot: Option<AiChatbot>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(
        config: AppConfig,
        db: Database,
        stories: Arc<dyn StoryStore>,
        classifier: Option<Arc<dyn DiseaseClassifier>>,
        provider: Option<Arc<dyn LlmProvider>>,
    ) -> Self {
        let tokens = TokenService::new(&config.secret_key);
        Self {
            config,
            db,
            tokens,
            stories,
            classifier,
            advisor: provider.clone().map(AiAdvisor::new),
            chatbot: provider.map(AiChatbot::new),
        }
    }

    pub fn ai_available(&self) -> bool {
        self.chatbot.is_some()
    }

    pub fn shared(self) -> SharedState {
        Arc::new(self)
    }
}

pub fn with_state(
    state: SharedState,
) -> impl Filter<Extract = (SharedState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}
