use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::id::NodeId;

/// Payload published for every node removed from the tree.
/// 每個自內容樹刪除的節點所發布的事件資料。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDeleted {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub name: String,
    pub path: String,
}

#[derive(Debug, Default)]
struct HubState {
    next_token: u64,
    subscribers: Vec<(u64, Sender<NodeDeleted>)>,
}

/// Store-wide deletion channel. Clones share the same subscriber list.
/// 全域刪除事件通道；複製後共享同一份訂閱者清單。
#[derive(Debug, Clone, Default)]
pub struct DeletionEvents {
    state: Arc<Mutex<HubState>>,
}

impl DeletionEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new subscriber; it stays registered until the handle drops.
    /// 註冊新的訂閱者；在控制代碼釋放前持續有效。
    pub fn subscribe(&self) -> DeletionSubscription {
        let (tx, rx) = mpsc::channel();
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let token = state.next_token;
        state.next_token += 1;
        state.subscribers.push((token, tx));
        log::debug!("deletion subscriber {token} registered");
        DeletionSubscription {
            token,
            hub: Arc::clone(&self.state),
            rx,
        }
    }

    /// Sends the event to every live subscriber, pruning closed channels.
    pub fn publish(&self, event: &NodeDeleted) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state
            .subscribers
            .retain(|(_, tx)| tx.send(event.clone()).is_ok());
        log::debug!(
            "published deletion of {} to {} subscriber(s)",
            event.id,
            state.subscribers.len()
        );
    }

    pub fn subscriber_count(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .subscribers
            .len()
    }
}

/// Receiving end of a deletion subscription. Deregisters on drop.
/// 刪除事件訂閱的接收端；釋放時自動取消註冊。
#[derive(Debug)]
pub struct DeletionSubscription {
    token: u64,
    hub: Arc<Mutex<HubState>>,
    rx: Receiver<NodeDeleted>,
}

impl DeletionSubscription {
    /// 嘗試取得下一個事件（非阻塞）。 / Attempts to fetch the next event without blocking.
    pub fn try_next(&self) -> Option<NodeDeleted> {
        self.rx.try_recv().ok()
    }

    /// 在期限內等待事件，逾時回傳 `None`。 / Waits for an event until the timeout, returning `None` on timeout.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<NodeDeleted> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// Drains every event queued so far.
    pub fn drain(&self) -> Vec<NodeDeleted> {
        self.rx.try_iter().collect()
    }
}

impl Drop for DeletionSubscription {
    fn drop(&mut self) {
        let mut state = self.hub.lock().unwrap_or_else(PoisonError::into_inner);
        state.subscribers.retain(|(token, _)| *token != self.token);
        log::debug!("deletion subscriber {} released", self.token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(raw: u64) -> NodeDeleted {
        NodeDeleted {
            id: NodeId::from_u64(raw),
            parent: None,
            name: format!("node-{raw}"),
            path: format!("/node-{raw}"),
        }
    }

    #[test]
    fn subscribers_receive_published_events() {
        let hub = DeletionEvents::new();
        let first = hub.subscribe();
        let second = hub.subscribe();

        hub.publish(&event(7));

        assert_eq!(first.try_next(), Some(event(7)));
        assert_eq!(second.drain(), vec![event(7)]);
        assert!(first.try_next().is_none());
    }

    #[test]
    fn dropping_subscription_deregisters() {
        let hub = DeletionEvents::new();
        let shared = hub.clone();
        {
            let _subscription = shared.subscribe();
            assert_eq!(hub.subscriber_count(), 1);
        }
        assert_eq!(hub.subscriber_count(), 0);
        hub.publish(&event(1));
    }
}
