use std::collections::HashMap;

use crate::api::QueueSnapshot;

/// 1-based queue positions grouped by valve, in priority order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueuePositions {
    positions: HashMap<String, Vec<usize>>,
}

impl QueuePositions {
    pub fn index(queue: &QueueSnapshot) -> Self {
        let mut positions: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, job) in queue.jobs.iter().enumerate() {
            positions
                .entry(job.valve_name.clone())
                .or_default()
                .push(i + 1);
        }
        Self { positions }
    }

    pub fn for_valve(&self, valve: &str) -> &[usize] {
        self.positions.get(valve).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::QueueJob;

    fn job(valve: &str) -> QueueJob {
        QueueJob {
            valve_name: valve.to_string(),
            duration_minutes: 10.0,
            is_scheduled: true,
        }
    }

    #[test]
    fn positions_are_one_based_and_ordered() {
        let queue = QueueSnapshot {
            jobs: vec![job("a"), job("lawn"), job("b"), job("c"), job("lawn"), job("d"), job("lawn")],
            queue_size: None,
        };
        let index = QueuePositions::index(&queue);
        assert_eq!(index.for_valve("lawn"), &[2, 5, 7]);
        assert_eq!(index.for_valve("a"), &[1]);
        assert!(index.for_valve("missing").is_empty());
    }
}
