use tokio::sync::broadcast;

/// Fan-out channel feeding live-search subscribers (the websocket
/// collaborator). Publishing with no subscribers is a no-op.
#[derive(Clone)]
pub struct LiveSearchHub {
    tx: broadcast::Sender<String>,
}

impl LiveSearchHub {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }

    pub fn publish(&self, term: &str) {
        let _ = self.tx.send(term.to_string());
    }
}

impl Default for LiveSearchHub {
    fn default() -> Self {
        Self::new(64)
    }
}
