//! Concurrency tests for the handoff queue backends.
//!
//! Both backends must preserve per-producer FIFO order, never exceed their
//! capacity and deliver every pushed item exactly once.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use kernel_admission_sim::core::Process;
use kernel_admission_sim::infra::queue::{ChannelQueue, HandoffQueue, RingQueue};

const PRODUCERS: usize = 4;
const PER_PRODUCER: usize = 250;

fn exercise_many_producers(queue: Arc<dyn HandoffQueue<(usize, usize)>>) {
    let capacity = queue.capacity();
    let max_seen = Arc::new(AtomicUsize::new(0));

    let producers: Vec<_> = (0..PRODUCERS)
        .map(|producer| {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                for seq in 0..PER_PRODUCER {
                    queue.push((producer, seq)).unwrap();
                }
            })
        })
        .collect();

    let consumer = {
        let queue = Arc::clone(&queue);
        let max_seen = Arc::clone(&max_seen);
        thread::spawn(move || {
            let mut next = vec![0usize; PRODUCERS];
            for _ in 0..PRODUCERS * PER_PRODUCER {
                max_seen.fetch_max(queue.size(), Ordering::Relaxed);
                let (producer, seq) = queue.pop().unwrap();
                assert_eq!(seq, next[producer], "per-producer FIFO order violated");
                next[producer] += 1;
            }
            next
        })
    };

    for p in producers {
        p.join().unwrap();
    }
    let counts = consumer.join().unwrap();

    assert!(counts.iter().all(|&c| c == PER_PRODUCER));
    assert!(max_seen.load(Ordering::Relaxed) <= capacity);
    assert!(queue.is_empty());
}

#[test]
fn test_ring_queue_many_producers() {
    exercise_many_producers(Arc::new(RingQueue::new(5).unwrap()));
}

#[test]
fn test_channel_queue_many_producers() {
    exercise_many_producers(Arc::new(ChannelQueue::new(5).unwrap()));
}

#[test]
fn test_pop_blocks_until_push() {
    let queue = Arc::new(RingQueue::<Process>::new(2).unwrap());

    let consumer = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || queue.pop().unwrap())
    };

    thread::sleep(Duration::from_millis(50));
    assert!(!consumer.is_finished());

    queue.push(Process::new(42, 0, 1, 1, [1])).unwrap();
    assert_eq!(consumer.join().unwrap().pid, 42);
}

#[test]
fn test_sentinel_observed_last() {
    let queue = Arc::new(RingQueue::<Process>::new(3).unwrap());

    let producers: Vec<_> = (0..3)
        .map(|id| {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                for i in 0..10 {
                    queue.push(Process::new(id * 100 + i, 0, 1, 1, [0])).unwrap();
                }
            })
        })
        .collect();

    let consumer = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || {
            let mut seen = 0;
            loop {
                let p = queue.pop().unwrap();
                if p.is_sentinel() {
                    break seen;
                }
                seen += 1;
            }
        })
    };

    for p in producers {
        p.join().unwrap();
    }
    queue.push(Process::sentinel()).unwrap();

    assert_eq!(consumer.join().unwrap(), 30);
}
