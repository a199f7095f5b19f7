use crate::llm::Analyst;
use crate::store::{KvStore, RecordStore};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub store: RecordStore,
    /// Serializes read-modify-write cycles issued by this process.
    pub write_gate: Arc<Mutex<()>>,
    pub analyst: Option<Arc<dyn Analyst>>,
    pub target_weight: f64,
}

impl AppState {
    pub fn new(kv: Arc<dyn KvStore>, target_weight: f64) -> Self {
        Self {
            store: RecordStore::new(kv),
            write_gate: Arc::new(Mutex::new(())),
            analyst: None,
            target_weight,
        }
    }

    pub fn with_analyst(mut self, analyst: Arc<dyn Analyst>) -> Self {
        self.analyst = Some(analyst);
        self
    }
}
