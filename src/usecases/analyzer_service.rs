//! Analyzer service. Orchestrates a single group analysis.
//!
//! Coordinates group-id normalization, Telegram lookup, windowed history retrieval
//! and the discussion engine.

use crate::domain::window::window_start;
use crate::domain::{AnalysisResult, DomainError, GroupId, analyze_messages};
use crate::ports::TgGateway;
use crate::usecases::HistoryService;
use crate::usecases::history_service::PageProgress;
use chrono::{DateTime, Local};
use std::sync::Arc;
use tracing::{info, warn};

/// Default trailing window, in complete days.
pub const DEFAULT_WINDOW_DAYS: u32 = 7;

/// Service for day-by-day discussion analysis of one group.
///
/// Orchestrates the flow:
/// 1. Normalize the group identifier (the only validation failure)
/// 2. Resolve the group through the gateway
/// 3. Fetch every message since local midnight `window_days` ago
/// 4. Resolve threads, bucket by day, filter and rank
pub struct AnalyzerService {
    tg: Arc<dyn TgGateway>,
    history: Arc<HistoryService>,
    window_days: u32,
    timezone: String,
}

impl AnalyzerService {
    /// Create a new analyzer service.
    ///
    /// # Arguments
    /// * `tg` - Telegram gateway used to resolve the group
    /// * `history` - Windowed history retrieval
    /// * `window_days` - Number of complete days to look back
    /// * `timezone` - Label reported in every result
    pub fn new(
        tg: Arc<dyn TgGateway>,
        history: Arc<HistoryService>,
        window_days: u32,
        timezone: impl Into<String>,
    ) -> Self {
        Self {
            tg,
            history,
            window_days,
            timezone: timezone.into(),
        }
    }

    pub fn window_days(&self) -> u32 {
        self.window_days
    }

    /// Analyze the last `window_days` days of a group.
    ///
    /// `raw_group_id` may be a username, a t.me link or a numeric id.
    /// `on_page` receives the running message count while history is fetched.
    pub async fn analyze_group(
        &self,
        raw_group_id: &str,
        on_page: PageProgress<'_>,
    ) -> Result<AnalysisResult, DomainError> {
        self.analyze_group_at(raw_group_id, Local::now(), on_page)
            .await
    }

    /// Same as [`analyze_group`](Self::analyze_group) with an explicit "now".
    pub async fn analyze_group_at(
        &self,
        raw_group_id: &str,
        now: DateTime<Local>,
        on_page: PageProgress<'_>,
    ) -> Result<AnalysisResult, DomainError> {
        info!(group = raw_group_id, "starting analysis");

        let group = GroupId::parse(raw_group_id)?;
        info!(group = %group, "normalized group id");

        let chat = self.tg.resolve_group(&group).await?;
        let since = window_start(&now, self.window_days);
        info!(
            chat_id = chat.id,
            title = %chat.title,
            window_days = self.window_days,
            since,
            "fetching messages"
        );

        let messages = self.history.fetch_window(chat.id, since, on_page).await?;
        if messages.is_empty() {
            warn!(
                chat_id = chat.id,
                "no messages found in the last {} days", self.window_days
            );
            return Ok(AnalysisResult::empty(&self.timezone));
        }

        info!(chat_id = chat.id, count = messages.len(), "processing messages");

        let result = analyze_messages(&messages, &Local, &self.timezone);
        let threads = result.total_threads();
        info!(
            chat_id = chat.id,
            days = result.days.len(),
            threads,
            "analysis complete"
        );
        if threads == 0 {
            warn!(chat_id = chat.id, "no active discussions found");
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Chat, ChatType, HistoryPage, Message};
    use std::time::Duration;

    struct FakeGateway {
        chat: Chat,
        history: Vec<Message>,
    }

    #[async_trait::async_trait]
    impl TgGateway for FakeGateway {
        async fn get_dialogs(&self) -> Result<Vec<Chat>, DomainError> {
            Ok(vec![self.chat.clone()])
        }

        async fn resolve_group(&self, group: &GroupId) -> Result<Chat, DomainError> {
            match group {
                GroupId::Username(name) if self.chat.username.as_deref() == Some(name) => {
                    Ok(self.chat.clone())
                }
                GroupId::Numeric(id) if *id == self.chat.id => Ok(self.chat.clone()),
                _ => Err(DomainError::GroupNotFound(group.to_string())),
            }
        }

        async fn get_history(
            &self,
            _chat_id: i64,
            offset_id: i32,
            limit: i32,
        ) -> Result<HistoryPage, DomainError> {
            let messages: Vec<Message> = self
                .history
                .iter()
                .filter(|m| offset_id == 0 || m.id < offset_id)
                .take(limit as usize)
                .cloned()
                .collect();
            Ok(HistoryPage {
                raw_len: messages.len(),
                next_offset: messages.iter().map(|m| m.id).min(),
                messages,
            })
        }
    }

    fn service(history: Vec<Message>) -> AnalyzerService {
        let tg: Arc<dyn TgGateway> = Arc::new(FakeGateway {
            chat: Chat {
                id: -1001234567890,
                title: "Rust Uzbekistan".into(),
                username: Some("rust_uz".into()),
                kind: ChatType::Supergroup,
            },
            history,
        });
        let history = Arc::new(HistoryService::new(Arc::clone(&tg), 100, Duration::ZERO));
        AnalyzerService::new(tg, history, DEFAULT_WINDOW_DAYS, "Asia/Tashkent")
    }

    fn msg(id: i32, date: i64, sender_id: i64, reply_to: Option<i32>) -> Message {
        Message {
            id,
            date,
            sender_id,
            text: format!("message {}", id),
            reply_to,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_invalid_group_id_is_validation_error() {
        let err = service(vec![]).analyze_group("bad id!", None).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_unknown_group_is_operational_error() {
        let err = service(vec![]).analyze_group("@someone_else", None).await.unwrap_err();
        assert!(!err.is_validation());
        assert!(matches!(err, DomainError::GroupNotFound(_)));
    }

    #[tokio::test]
    async fn test_empty_history_yields_empty_days() {
        let result = service(vec![]).analyze_group("t.me/rust_uz", None).await.unwrap();
        assert_eq!(result.timezone, "Asia/Tashkent");
        assert!(result.days.is_empty());
    }

    #[tokio::test]
    async fn test_messages_outside_window_are_ignored() {
        let now = Local::now();
        let recent = now.timestamp() - 60;
        let stale = now.timestamp() - 30 * 86_400;
        // newest first, as Telegram returns history
        let history = vec![
            msg(4, recent, 2, Some(3)),
            msg(3, recent - 10, 1, None),
            msg(2, stale, 2, Some(1)),
            msg(1, stale - 10, 1, None),
        ];

        let result = service(history)
            .analyze_group_at("-1001234567890", now, None)
            .await
            .unwrap();

        assert_eq!(result.total_threads(), 1);
        let thread = &result.days[0].threads[0];
        assert_eq!(thread.messages, 2);
        assert_eq!(thread.users, 2);
        assert_eq!(thread.topic, "message 3");
    }
}
