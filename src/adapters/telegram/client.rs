//! Implements TgGateway using grammers Client.
//!
//! Handles FloodWait by sleeping and retrying. Uses raw invoke for GetHistory
//! so pagination by `offset_id` stays under our control.

use crate::adapters::telegram::mapper;
use crate::domain::{Chat, DomainError, GroupId, HistoryPage};
use crate::ports::TgGateway;
use async_trait::async_trait;
use grammers_client::Client;
use grammers_client::InvocationError;
use grammers_client::peer::Peer;
use grammers_client::tl;
use grammers_session::storages::SqliteSession;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Attempts per history request before giving up on FloodWait.
const MAX_FLOOD_RETRIES: usize = 3;

/// Open (or create) the SQLite session at `session_path` and start a grammers client on it.
///
/// Authorization stored in the session survives restarts.
pub async fn connect(api_id: i32, session_path: &Path) -> anyhow::Result<Client> {
    if let Some(parent) = session_path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| anyhow::anyhow!("create session directory: {}", e))?;
    }
    let session = SqliteSession::open(session_path)
        .await
        .map_err(|e| anyhow::anyhow!("open session file: {}", e))?;
    info!(path = %session_path.display(), "session opened");

    let pool = grammers_client::SenderPool::new(Arc::new(session), api_id);
    let handle = pool.handle.clone();
    tokio::spawn(async move {
        pool.runner.run().await;
    });
    Ok(Client::new(handle))
}

/// Telegram gateway adapter. Holds a clone of the client shared with the auth adapter.
pub struct GrammersTgGateway {
    client: Client,
    /// Cache InputPeer by chat_id so resolved groups are not looked up again (avoids FLOOD_WAIT).
    peer_cache: Mutex<HashMap<i64, tl::enums::InputPeer>>,
}

impl GrammersTgGateway {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            peer_cache: Mutex::new(HashMap::new()),
        }
    }

    /// Remember the InputPeer of a resolved peer and return it as a domain Chat.
    async fn remember(&self, peer: &Peer) -> Result<Chat, DomainError> {
        let chat = mapper::chat_from_peer(peer);
        let peer_ref = peer
            .to_ref()
            .await
            .ok_or_else(|| DomainError::TgGateway("peer not in session cache".into()))?;
        let input_peer: tl::enums::InputPeer = peer_ref.into();
        self.peer_cache.lock().await.insert(chat.id, input_peer);
        Ok(chat)
    }

    /// Walk the dialog list looking for `chat_id`.
    async fn find_in_dialogs(&self, chat_id: i64) -> Result<Option<Peer>, DomainError> {
        let mut dialogs = self.client.iter_dialogs();
        while let Some(dialog) = dialogs
            .next()
            .await
            .map_err(|e| DomainError::TgGateway(e.to_string()))?
        {
            let peer = dialog.peer();
            if peer.id().bot_api_dialog_id() == chat_id {
                return Ok(Some(peer.clone()));
            }
        }
        Ok(None)
    }

    async fn input_peer(&self, chat_id: i64) -> Result<tl::enums::InputPeer, DomainError> {
        if let Some(peer) = self.peer_cache.lock().await.get(&chat_id) {
            return Ok(peer.clone());
        }
        let peer = self
            .find_in_dialogs(chat_id)
            .await?
            .ok_or_else(|| DomainError::GroupNotFound(chat_id.to_string()))?;
        self.remember(&peer).await?;
        self.peer_cache
            .lock()
            .await
            .get(&chat_id)
            .cloned()
            .ok_or_else(|| DomainError::TgGateway(format!("peer {} not cached", chat_id)))
    }
}

#[async_trait]
impl TgGateway for GrammersTgGateway {
    async fn get_dialogs(&self) -> Result<Vec<Chat>, DomainError> {
        let mut dialogs = self.client.iter_dialogs();
        let mut chats = Vec::new();
        while let Some(dialog) = dialogs
            .next()
            .await
            .map_err(|e| DomainError::TgGateway(e.to_string()))?
        {
            chats.push(mapper::chat_from_peer(dialog.peer()));
        }
        Ok(chats)
    }

    async fn resolve_group(&self, group: &GroupId) -> Result<Chat, DomainError> {
        let peer = match group {
            GroupId::Username(name) => self
                .client
                .resolve_username(name)
                .await
                .map_err(|e| match e {
                    InvocationError::Rpc(rpc) if rpc.name.starts_with("USERNAME_") => {
                        DomainError::GroupNotFound(group.to_string())
                    }
                    e => DomainError::TgGateway(e.to_string()),
                })?,
            GroupId::Numeric(id) => self.find_in_dialogs(*id).await?,
        };
        let peer = peer.ok_or_else(|| {
            DomainError::GroupNotFound(format!(
                "Cannot find any entity corresponding to \"{}\"",
                group
            ))
        })?;

        let chat = self.remember(&peer).await?;
        debug!(chat_id = chat.id, title = %chat.title, "group resolved");
        Ok(chat)
    }

    async fn get_history(
        &self,
        chat_id: i64,
        offset_id: i32,
        limit: i32,
    ) -> Result<HistoryPage, DomainError> {
        use tl::enums::messages::Messages;

        let input_peer = self.input_peer(chat_id).await?;
        let mut last_wait = 0u64;

        for attempt in 0..MAX_FLOOD_RETRIES {
            let req = tl::functions::messages::GetHistory {
                peer: input_peer.clone(),
                offset_id,
                offset_date: 0,
                add_offset: 0,
                limit,
                max_id: 0,
                min_id: 0,
                hash: 0,
            };

            match self.client.invoke(&req).await {
                Ok(raw) => {
                    let messages = match raw {
                        Messages::Messages(m) => m.messages,
                        Messages::Slice(m) => m.messages,
                        Messages::ChannelMessages(m) => m.messages,
                        Messages::NotModified(_) => return Ok(HistoryPage::default()),
                    };
                    return Ok(mapper::history_page(&messages));
                }
                Err(InvocationError::Rpc(rpc)) if rpc.code == 420 => {
                    let wait_secs = rpc.value.unwrap_or(60) as u64;
                    warn!(chat_id, attempt, wait_secs, "FloodWait, sleeping");
                    last_wait = wait_secs;
                    tokio::time::sleep(Duration::from_secs(wait_secs)).await;
                }
                Err(e) => return Err(DomainError::TgGateway(e.to_string())),
            }
        }
        Err(DomainError::FloodWait { seconds: last_wait })
    }
}
