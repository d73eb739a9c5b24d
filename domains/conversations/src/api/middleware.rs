//! Conversations domain state

use std::sync::Arc;

use axum::extract::FromRef;
use shipwright_projects::ProjectsRepositories;

use crate::service::ChatService;

/// Application state for the Conversations domain
#[derive(Clone)]
pub struct ConversationsState {
    pub repos: ProjectsRepositories,
    pub chat: Arc<ChatService>,
}

impl FromRef<ConversationsState> for Arc<ChatService> {
    fn from_ref(state: &ConversationsState) -> Self {
        state.chat.clone()
    }
}
