//! Built-in memory curator: an append-only log of recent runs

use super::MemoryCurator;
use crate::error::EngineError;
use crate::types::Memory;
use async_trait::async_trait;
use chrono::Utc;
use insight_brief::{Brief, UNKNOWN};
use serde_json::{json, Value};

const DEFAULT_CAPACITY: usize = 50;

/// Appends each run to `memory.runs`, keeping the newest `capacity` entries
#[derive(Debug, Clone, Copy)]
pub struct RunLogCurator {
    capacity: usize,
}

impl RunLogCurator {
    #[inline]
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
        }
    }

    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for RunLogCurator {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[async_trait]
impl MemoryCurator for RunLogCurator {
    async fn update_memory(&self, mut memory: Memory, brief: &Brief) -> Result<Memory, EngineError> {
        let subject = brief
            .scope()
            .and_then(|scope| scope.get("category_or_product"))
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN);
        let record = json!({
            "mode": brief.mode().unwrap_or_default(),
            "business_goal": brief.business_goal().unwrap_or_default(),
            "category_or_product": subject,
            "recorded_at": Utc::now().to_rfc3339(),
        });

        let runs = memory
            .entry("runs")
            .or_insert_with(|| Value::Array(Vec::new()));
        let Value::Array(runs) = runs else {
            return Err(EngineError::Failed(
                "memory field 'runs' is not a list".to_string(),
            ));
        };

        runs.push(record);
        if runs.len() > self.capacity {
            let excess = runs.len() - self.capacity;
            runs.drain(..excess);
        }
        Ok(memory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn brief() -> Brief {
        serde_json::from_value::<Brief>(json!({
            "mode": "quick",
            "business_goal": "grow",
            "scope": {"type": "SKU", "value": "SKU-472"},
        }))
        .unwrap()
        .normalized()
    }

    #[tokio::test]
    async fn appends_run_and_keeps_other_keys() {
        let mut memory = Memory::default();
        memory.insert("insights", json!(["keep"]));

        let updated = RunLogCurator::default()
            .update_memory(memory, &brief())
            .await
            .unwrap();

        assert_eq!(updated.get("insights"), Some(&json!(["keep"])));
        let runs = updated.get("runs").and_then(Value::as_array).unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0]["category_or_product"], json!("SKU-472"));
        assert_eq!(runs[0]["mode"], json!("quick"));
    }

    #[tokio::test]
    async fn trims_to_capacity() {
        let curator = RunLogCurator::new(2);
        let mut memory = Memory::default();
        for _ in 0..3 {
            memory = curator.update_memory(memory, &brief()).await.unwrap();
        }
        assert_eq!(memory.get("runs").and_then(Value::as_array).map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn rejects_non_list_runs() {
        let mut entries = Map::new();
        entries.insert("runs".to_string(), json!("oops"));

        let result = RunLogCurator::default()
            .update_memory(Memory::new(entries), &brief())
            .await;
        assert!(matches!(result, Err(EngineError::Failed(_))));
    }
}
