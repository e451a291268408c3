use std::collections::{HashSet, VecDeque};

use parking_lot::{Condvar, Mutex};
use url::Url;

/// What a queued page is expected to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Category listing page; `page` is 1-based within its category.
    Listing { page: u32 },
    Detail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub url: String,
    /// Category the page was reached from.
    pub category: Option<String>,
    pub kind: TaskKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Queued,
    Duplicate,
    Full,
    ForeignHost,
    Invalid,
}

#[derive(Default)]
struct State {
    queue: VecDeque<Task>,
    seen: HashSet<String>,
    in_flight: usize,
}

/// Deduplicating FIFO work queue shared by the crawl workers.
///
/// `next` hands out tasks until the queue is drained and no worker still
/// holds a task that could enqueue more.
pub struct Frontier {
    state: Mutex<State>,
    ready: Condvar,
    allowed_host: Option<String>,
    max_size: usize,
}

impl Frontier {
    pub fn new(allowed_host: Option<String>, max_size: usize) -> Self {
        Self {
            state: Mutex::new(State::default()),
            ready: Condvar::new(),
            allowed_host,
            max_size,
        }
    }

    fn normalize(url: &str) -> Option<Url> {
        let mut url = Url::parse(url).ok()?;
        url.set_fragment(None);
        Some(url)
    }

    pub fn push(&self, mut task: Task) -> PushOutcome {
        let Some(url) = Self::normalize(&task.url) else {
            return PushOutcome::Invalid;
        };
        if let Some(host) = &self.allowed_host {
            if url.host_str() != Some(host.as_str()) {
                return PushOutcome::ForeignHost;
            }
        }
        task.url = url.into();

        let mut state = self.state.lock();
        if state.seen.contains(&task.url) {
            return PushOutcome::Duplicate;
        }
        if state.queue.len() >= self.max_size {
            return PushOutcome::Full;
        }
        state.seen.insert(task.url.clone());
        state.queue.push_back(task);
        drop(state);

        self.ready.notify_one();
        PushOutcome::Queued
    }

    /// Blocks until a task is available; `None` once the crawl is finished.
    pub fn next(&self) -> Option<TaskGuard<'_>> {
        let mut state = self.state.lock();
        loop {
            if let Some(task) = state.queue.pop_front() {
                state.in_flight += 1;
                return Some(TaskGuard {
                    frontier: self,
                    task,
                });
            }
            if state.in_flight == 0 {
                return None;
            }
            self.ready.wait(&mut state);
        }
    }

    fn done(&self) {
        let mut state = self.state.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
        let finished = state.in_flight == 0 && state.queue.is_empty();
        drop(state);

        if finished {
            self.ready.notify_all();
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.state.lock().queue.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn seen_count(&self) -> usize {
        self.state.lock().seen.len()
    }
}

/// A task handed to a worker. Dropping it marks the task complete.
pub struct TaskGuard<'a> {
    frontier: &'a Frontier,
    pub task: Task,
}

impl Drop for TaskGuard<'_> {
    fn drop(&mut self) {
        self.frontier.done();
    }
}
