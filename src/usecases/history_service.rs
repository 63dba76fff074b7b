//! Windowed history retrieval: page backwards from the newest message until the window start.
//!
//! - Pages of `page_size` messages, newest first
//! - Cursor = smallest raw id of the last page (service messages included)
//! - Stops on an empty page, a short raw page, or the first message older than the window

use crate::domain::{DomainError, Message};
use crate::ports::TgGateway;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Default number of messages requested per history page.
pub const DEFAULT_PAGE_SIZE: i32 = 100;

/// Called after every page with the running number of messages kept.
pub type PageProgress<'a> = Option<&'a (dyn Fn(usize) + Send + Sync)>;

/// History service. Collects every message sent since a cutoff.
pub struct HistoryService {
    tg: Arc<dyn TgGateway>,
    page_size: i32,
    page_delay: Duration,
}

impl HistoryService {
    pub fn new(tg: Arc<dyn TgGateway>, page_size: i32, page_delay: Duration) -> Self {
        Self {
            tg,
            page_size: page_size.max(1),
            page_delay,
        }
    }

    /// Fetch all messages of `chat_id` with `date >= since` (unix seconds). Order is newest first.
    pub async fn fetch_window(
        &self,
        chat_id: i64,
        since: i64,
        on_page: PageProgress<'_>,
    ) -> Result<Vec<Message>, DomainError> {
        let mut messages = Vec::new();
        let mut offset_id = 0i32;
        let mut pages = 0usize;

        loop {
            let page = self
                .tg
                .get_history(chat_id, offset_id, self.page_size)
                .await?;
            pages += 1;

            if page.is_exhausted() {
                break;
            }

            let raw_len = page.raw_len;
            let previous_offset = offset_id;
            if let Some(next) = page.next_offset {
                offset_id = next;
            }

            let mut reached_cutoff = false;
            for msg in page.messages {
                if msg.date < since {
                    reached_cutoff = true;
                    break;
                }
                messages.push(msg);
            }

            debug!(
                chat_id,
                page = pages,
                raw_len,
                offset_id,
                total = messages.len(),
                "fetched history page"
            );
            if let Some(report) = on_page {
                report(messages.len());
            }

            if reached_cutoff || raw_len < self.page_size as usize || offset_id == previous_offset
            {
                break;
            }

            // Small delay between pages to avoid FLOOD_WAIT
            if !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }
        }

        info!(chat_id, count = messages.len(), pages, "fetched messages in window");
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Chat, GroupId, HistoryPage};
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// In-memory history, newest first. Ids are assigned in date order starting at 1.
    /// Ids in `unmapped` occupy a raw slot but are dropped from the page, like service messages.
    struct FakeGateway {
        history: Vec<Message>,
        unmapped: HashSet<i32>,
        calls: Mutex<Vec<i32>>,
    }

    impl FakeGateway {
        fn with_dates(dates: &[i64]) -> Self {
            let mut history: Vec<Message> = dates
                .iter()
                .enumerate()
                .map(|(i, &date)| Message {
                    id: i as i32 + 1,
                    date,
                    ..Default::default()
                })
                .collect();
            history.sort_by(|a, b| b.id.cmp(&a.id));
            Self {
                history,
                unmapped: HashSet::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn with_unmapped(mut self, ids: &[i32]) -> Self {
            self.unmapped = ids.iter().copied().collect();
            self
        }
    }

    #[async_trait::async_trait]
    impl TgGateway for FakeGateway {
        async fn get_dialogs(&self) -> Result<Vec<Chat>, DomainError> {
            Ok(vec![])
        }

        async fn resolve_group(&self, group: &GroupId) -> Result<Chat, DomainError> {
            Err(DomainError::GroupNotFound(group.to_string()))
        }

        async fn get_history(
            &self,
            _chat_id: i64,
            offset_id: i32,
            limit: i32,
        ) -> Result<HistoryPage, DomainError> {
            self.calls.lock().unwrap().push(offset_id);
            let raw: Vec<&Message> = self
                .history
                .iter()
                .filter(|m| offset_id == 0 || m.id < offset_id)
                .take(limit as usize)
                .collect();
            Ok(HistoryPage {
                messages: raw
                    .iter()
                    .filter(|m| !self.unmapped.contains(&m.id))
                    .map(|m| (*m).clone())
                    .collect(),
                raw_len: raw.len(),
                next_offset: raw.iter().map(|m| m.id).min(),
            })
        }
    }

    fn service(gateway: Arc<FakeGateway>, page_size: i32) -> HistoryService {
        HistoryService::new(gateway, page_size, Duration::ZERO)
    }

    #[tokio::test]
    async fn test_pages_until_cutoff() {
        // ids 1..=7; ids 1 and 2 are older than the window
        let gateway = Arc::new(FakeGateway::with_dates(&[10, 20, 100, 110, 120, 130, 140]));
        let messages = service(Arc::clone(&gateway), 2)
            .fetch_window(1, 100, None)
            .await
            .unwrap();

        let ids: Vec<i32> = messages.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![7, 6, 5, 4, 3]);
        assert_eq!(*gateway.calls.lock().unwrap(), vec![0, 6, 4]);
    }

    #[tokio::test]
    async fn test_short_page_stops() {
        let gateway = Arc::new(FakeGateway::with_dates(&[100, 110, 120]));
        let messages = service(Arc::clone(&gateway), 5)
            .fetch_window(1, 0, None)
            .await
            .unwrap();

        assert_eq!(messages.len(), 3);
        assert_eq!(gateway.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_history() {
        let gateway = Arc::new(FakeGateway::with_dates(&[]));
        let messages = service(gateway, 100).fetch_window(1, 0, None).await.unwrap();
        assert!(messages.is_empty());
    }

    #[tokio::test]
    async fn test_exact_page_boundary_fetches_one_more_page() {
        let gateway = Arc::new(FakeGateway::with_dates(&[100, 110, 120, 130]));
        let messages = service(Arc::clone(&gateway), 2)
            .fetch_window(1, 0, None)
            .await
            .unwrap();

        assert_eq!(messages.len(), 4);
        assert_eq!(*gateway.calls.lock().unwrap(), vec![0, 3, 1]);
    }

    #[tokio::test]
    async fn test_skipped_messages_do_not_end_pagination() {
        // id 6 is a service message: the first raw page is full even though one item is dropped
        let gateway = Arc::new(
            FakeGateway::with_dates(&[100, 110, 120, 130, 140, 150, 160]).with_unmapped(&[6]),
        );
        let messages = service(Arc::clone(&gateway), 3)
            .fetch_window(1, 0, None)
            .await
            .unwrap();

        let ids: Vec<i32> = messages.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![7, 5, 4, 3, 2, 1]);
        assert_eq!(*gateway.calls.lock().unwrap(), vec![0, 5, 2]);
    }

    #[tokio::test]
    async fn test_page_of_only_skipped_messages_advances_cursor() {
        let gateway = Arc::new(
            FakeGateway::with_dates(&[100, 110, 120, 130, 140]).with_unmapped(&[5, 4]),
        );
        let messages = service(Arc::clone(&gateway), 2)
            .fetch_window(1, 0, None)
            .await
            .unwrap();

        let ids: Vec<i32> = messages.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert_eq!(*gateway.calls.lock().unwrap(), vec![0, 4, 2]);
    }

    #[tokio::test]
    async fn test_progress_reports_running_total() {
        let gateway = Arc::new(FakeGateway::with_dates(&[100, 110, 120, 130, 140]));
        let seen = Mutex::new(Vec::new());
        let report = |total: usize| seen.lock().unwrap().push(total);

        service(gateway, 2)
            .fetch_window(1, 0, Some(&report))
            .await
            .unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![2, 4, 5]);
    }
}
