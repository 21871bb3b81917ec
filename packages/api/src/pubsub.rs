//! # MemoBroker — in-process fan-out of created memos
//!
//! Every call to [`MemoBroker::subscribe`] registers an unbounded queue
//! immediately, so a subscriber sees exactly the memos published after it
//! subscribed, in publish order, with none dropped however slowly it reads.
//! There is no replay and nothing survives the process.
//!
//! Publishing never waits on subscribers. Queues whose stream was dropped are
//! pruned on the next publish.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::stream::{self, BoxStream, StreamExt};
use store::Memo;
use tokio::sync::mpsc;

/// Stream of memos handed to one subscriber.
pub type MemoStream = BoxStream<'static, Memo>;

#[derive(Clone, Debug, Default)]
pub struct MemoBroker {
    subscribers: Arc<Mutex<Vec<mpsc::UnboundedSender<Memo>>>>,
}

impl MemoBroker {
    pub fn new() -> Self {
        Self::default()
    }

    fn subscribers(&self) -> MutexGuard<'_, Vec<mpsc::UnboundedSender<Memo>>> {
        // A panic while holding the lock cannot leave the list half-updated.
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Push a memo to every current subscriber. Returns how many received it.
    pub fn publish(&self, memo: &Memo) -> usize {
        let mut subscribers = self.subscribers();
        subscribers.retain(|sender| sender.send(memo.clone()).is_ok());
        let receivers = subscribers.len();
        if receivers == 0 {
            tracing::debug!(memo_id = %memo.id, "no subscribers for created memo");
        } else {
            tracing::trace!(memo_id = %memo.id, receivers, "published created memo");
        }
        receivers
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers()
            .iter()
            .filter(|sender| !sender.is_closed())
            .count()
    }

    /// Subscribe to memos published from now on. The stream ends when the
    /// broker is dropped.
    pub fn subscribe(&self) -> MemoStream {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.subscribers().push(sender);
        stream::unfold(receiver, |mut receiver| async move {
            receiver.recv().await.map(|memo| (memo, receiver))
        })
        .boxed()
    }
}
