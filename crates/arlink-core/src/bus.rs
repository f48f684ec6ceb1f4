use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::atomic::{AtomicU64, Ordering};

/// Create an ordered work queue (multi-producer, single-consumer).
pub fn work_queue<E: Send + 'static>() -> (WorkSender<E>, WorkQueue<E>) {
    let (tx, rx) = unbounded();
    (
        WorkSender { tx },
        WorkQueue {
            rx,
            consumer_guard: ConsumerGuard::new(),
        },
    )
}

/// Producer side. Cheap to clone, usable from any thread.
pub struct WorkSender<E: Send + 'static> {
    tx: Sender<E>,
}

impl<E: Send + 'static> Clone for WorkSender<E> {
    fn clone(&self) -> Self {
        Self { tx: self.tx.clone() }
    }
}

impl<E: Send + 'static> WorkSender<E> {
    /// Post work. Returns `false` once the consumer is gone.
    #[inline]
    pub fn post(&self, item: E) -> bool {
        self.tx.send(item).is_ok()
    }
}

/// Consumer side, owned by the context that executes the work.
///
/// Items come out in posting order. Only one thread may consume; the first
/// consumer becomes the owner and a second one trips a debug assertion.
pub struct WorkQueue<E: Send + 'static> {
    rx: Receiver<E>,
    consumer_guard: ConsumerGuard,
}

impl<E: Send + 'static> WorkQueue<E> {
    /// Drain everything queued so far, in order.
    #[inline]
    pub fn drain<F: FnMut(E)>(&self, mut f: F) -> usize {
        self.consumer_guard.assert_or_claim();
        let mut n = 0usize;
        while let Ok(item) = self.rx.try_recv() {
            f(item);
            n += 1;
        }
        n
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

/// Pins a queue to the first thread that consumes from it.
struct ConsumerGuard {
    owner: AtomicU64,
}

impl ConsumerGuard {
    const UNCLAIMED: u64 = 0;

    #[inline]
    fn new() -> Self {
        Self {
            owner: AtomicU64::new(Self::UNCLAIMED),
        }
    }

    #[inline]
    fn assert_or_claim(&self) {
        let id = consumer_id();
        match self
            .owner
            .compare_exchange(Self::UNCLAIMED, id, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => {}
            Err(owner) => debug_assert_eq!(
                owner, id,
                "work queue consumed from more than one thread"
            ),
        }
    }
}

/// Process-unique, never zero.
fn consumer_id() -> u64 {
    static NEXT: AtomicU64 = AtomicU64::new(1);
    thread_local! {
        static ID: u64 = NEXT.fetch_add(1, Ordering::Relaxed);
    }
    ID.with(|id| *id)
}
