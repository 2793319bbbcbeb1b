//! Dispatch engine - bounded concurrent block delivery for one target

use futures::stream::{self, StreamExt};
use tracing::{debug, error, instrument, warn};

use contracts::{Block, ContractError, QueueService, TargetDefinition};

/// One block's send failure, tagged with its submission index
#[derive(Debug)]
pub struct BlockFailure {
    /// Index of the block in packing order
    pub index: usize,

    /// Records the block carried
    pub records: usize,

    /// The transport error
    pub error: ContractError,
}

/// Send every block of one target through its service instance.
///
/// Blocks are submitted in packing order to a pool of width
/// `poster_concurrency` (clamped to at least 1). Every block is attempted
/// regardless of earlier failures; errors are merged by the single collector
/// draining the pool. The instance is disposed exactly once, after all
/// blocks completed; a dispose failure is logged, not reported as a
/// dispatch failure.
#[instrument(
    name = "engine_dispatch_blocks",
    skip(service, targets, blocks),
    fields(service = %service.name(), blocks = blocks.len())
)]
pub async fn dispatch_blocks(
    mut service: Box<dyn QueueService>,
    targets: &[TargetDefinition],
    blocks: Vec<Block>,
    poster_concurrency: usize,
) -> Vec<BlockFailure> {
    let width = poster_concurrency.max(1);
    let service_ref: &dyn QueueService = &*service;

    let mut failures: Vec<BlockFailure> = stream::iter(blocks.into_iter().enumerate())
        .map(|(index, block)| async move {
            let records = block.len();
            debug!(index, records, "Submitting block");
            match service_ref.send(targets, &block).await {
                Ok(()) => None,
                Err(error) => {
                    warn!(index, records, error = %error, "Block send failed");
                    Some(BlockFailure { index, records, error })
                }
            }
        })
        .buffer_unordered(width)
        .filter_map(|outcome| async move { outcome })
        .collect()
        .await;

    // stable diagnostics regardless of completion order
    failures.sort_by_key(|failure| failure.index);

    if let Err(e) = service.dispose().await {
        error!(service = %service.name(), error = %e, "Dispose failed");
    }

    failures
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use contracts::EventRecord;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tokio::time::{sleep, Duration};

    struct MockService {
        name: String,
        fail_indexes: Vec<usize>,
        completed: Arc<Mutex<Vec<usize>>>,
        disposed: Arc<AtomicUsize>,
        delay_ms: u64,
    }

    #[async_trait]
    impl QueueService for MockService {
        fn name(&self) -> &str {
            &self.name
        }

        async fn send(
            &self,
            _targets: &[TargetDefinition],
            block: &Block,
        ) -> Result<(), ContractError> {
            let index = block.records[0].event_id.parse::<usize>().unwrap();
            if self.delay_ms > 0 {
                // earlier blocks sleep longer, exposing reordering under
                // parallel posting
                sleep(Duration::from_millis(self.delay_ms * (4 - index as u64))).await;
            }
            self.completed.lock().unwrap().push(index);
            if self.fail_indexes.contains(&index) {
                return Err(ContractError::transport_send(&self.name, "mock failure"));
            }
            Ok(())
        }

        async fn dispose(&mut self) -> Result<(), ContractError> {
            self.disposed.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn blocks(n: usize) -> Vec<Block> {
        (0..n)
            .map(|i| Block {
                records: vec![EventRecord {
                    source_id: "src".into(),
                    partition_key: "pk".into(),
                    event_id: i.to_string(),
                    event_type: "x".into(),
                    payload: Bytes::from_static(b"{}"),
                }],
                packed_size: 2,
            })
            .collect()
    }

    fn service(
        fail_indexes: Vec<usize>,
        delay_ms: u64,
    ) -> (Box<MockService>, Arc<Mutex<Vec<usize>>>, Arc<AtomicUsize>) {
        let completed = Arc::new(Mutex::new(Vec::new()));
        let disposed = Arc::new(AtomicUsize::new(0));
        let svc = Box::new(MockService {
            name: "mock".into(),
            fail_indexes,
            completed: Arc::clone(&completed),
            disposed: Arc::clone(&disposed),
            delay_ms,
        });
        (svc, completed, disposed)
    }

    #[tokio::test]
    async fn test_all_blocks_sent_serially_in_order() {
        let (svc, completed, disposed) = service(vec![], 1);
        let failures = dispatch_blocks(svc, &[], blocks(4), 1).await;
        assert!(failures.is_empty());
        assert_eq!(*completed.lock().unwrap(), vec![0, 1, 2, 3]);
        assert_eq!(disposed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_siblings() {
        let (svc, completed, disposed) = service(vec![1], 0);
        let failures = dispatch_blocks(svc, &[], blocks(4), 1).await;
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].index, 1);
        assert_eq!(completed.lock().unwrap().len(), 4);
        assert_eq!(disposed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_parallel_posting_completes_out_of_order() {
        let (svc, completed, _) = service(vec![], 10);
        let failures = dispatch_blocks(svc, &[], blocks(4), 4).await;
        assert!(failures.is_empty());
        let done = completed.lock().unwrap().clone();
        assert_eq!(done.len(), 4);
        // delays are inverted, so completion order reverses submission order
        assert_ne!(done, vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn test_failures_reported_in_block_order() {
        let (svc, _, _) = service(vec![0, 2, 3], 3);
        let failures = dispatch_blocks(svc, &[], blocks(4), 4).await;
        let indexes: Vec<_> = failures.iter().map(|f| f.index).collect();
        assert_eq!(indexes, vec![0, 2, 3]);
    }

    #[tokio::test]
    async fn test_no_blocks_still_disposes_once() {
        let (svc, _, disposed) = service(vec![], 0);
        let failures = dispatch_blocks(svc, &[], Vec::new(), 1).await;
        assert!(failures.is_empty());
        assert_eq!(disposed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_concurrency_clamped_to_serial() {
        let (svc, completed, _) = service(vec![], 0);
        dispatch_blocks(svc, &[], blocks(3), 0).await;
        assert_eq!(*completed.lock().unwrap(), vec![0, 1, 2]);
    }
}
