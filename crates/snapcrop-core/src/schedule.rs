//! Deferred frame delivery.
//!
//! Snap-back animations do not run on their own thread. Each animation step
//! is scheduled as a frame with a due time, and the host pumps the queue
//! from its render loop; frames are delivered in due-time order (insertion
//! order breaks ties) on the owner thread.
//!
//! The cancellation hazard: gesture input can resume while frames are still
//! pending, and a stale frame must never mutate the live transform after a
//! new gesture has taken ownership. Every frame carries the generation it
//! was issued under; bumping the generation invalidates everything pending,
//! and stale frames are dropped silently at delivery time.

use crate::matrix::Matrix;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// One animation step: the transform to adopt, and whether this step
/// completes the animation (the widget finalizes gesture state on it).
#[derive(Debug, Clone, Copy)]
pub struct AnimFrame {
    pub matrix: Matrix,
    pub finalize: bool,
}

#[derive(Debug)]
struct Scheduled {
    due: u64,
    seq: u64,
    generation: u64,
    frame: AnimFrame,
}

// Min-heap on (due, seq): earliest due first, insertion order on ties.
impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        (other.due, other.seq).cmp(&(self.due, self.seq))
    }
}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for Scheduled {}

/// Generation-tagged delayed frame queue.
///
/// Time is a host-supplied monotonic millisecond clock; `pump` advances it
/// and delivers every frame that has come due. Nothing blocks.
#[derive(Debug, Default)]
pub struct FrameQueue {
    now: u64,
    next_seq: u64,
    generation: u64,
    entries: BinaryHeap<Scheduled>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current animation generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Last pump time; new delays are measured from here.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Invalidate every pending frame. Called on gesture-down, image load,
    /// and dispose. Frames already in the queue stay there but will be
    /// dropped at delivery.
    pub fn invalidate(&mut self) {
        self.generation += 1;
    }

    /// Drop all pending frames immediately (dispose barrier).
    pub fn clear(&mut self) {
        self.invalidate();
        self.entries.clear();
    }

    /// Schedule a frame `delay_ms` after the last pump, tagged with the
    /// current generation.
    pub fn schedule(&mut self, delay_ms: u64, frame: AnimFrame) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Scheduled {
            due: self.now + delay_ms,
            seq,
            generation: self.generation,
            frame,
        });
    }

    /// True when frames issued under the current generation are still
    /// pending.
    pub fn has_pending(&self) -> bool {
        self.entries
            .iter()
            .any(|s| s.generation == self.generation)
    }

    /// Advance the clock to `now_ms` and deliver every due frame in order.
    /// Stale frames (older generation) are discarded without delivery.
    /// Returns the number of frames delivered.
    pub fn pump(&mut self, now_ms: u64, mut deliver: impl FnMut(AnimFrame)) -> usize {
        // The clock never runs backwards.
        if now_ms > self.now {
            self.now = now_ms;
        }
        let mut delivered = 0;
        while let Some(head) = self.entries.peek() {
            if head.due > self.now {
                break;
            }
            let entry = self.entries.pop().expect("peeked entry");
            if entry.generation != self.generation {
                continue;
            }
            deliver(entry.frame);
            delivered += 1;
        }
        delivered
    }
}
