use super::state::EntryId;
use std::collections::{HashSet, VecDeque};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BatchProgress {
    #[default]
    NotStarted,
    Converting {
        total: usize,
        done: usize,
        succeeded: usize,
        failed: usize,
    },
    Completed {
        total: usize,
        succeeded: usize,
        failed: usize,
    },
}

impl BatchProgress {
    pub fn percentage(&self) -> f32 {
        match self {
            BatchProgress::NotStarted => 0.0,
            BatchProgress::Converting { total, done, .. } => {
                if *total == 0 {
                    0.0
                } else {
                    (*done as f32) / (*total as f32)
                }
            }
            BatchProgress::Completed { total, .. } => {
                if *total == 0 {
                    0.0
                } else {
                    1.0
                }
            }
        }
    }

    /// "succeeded/total", or empty before a run starts.
    pub fn counter_text(&self) -> String {
        match self {
            BatchProgress::NotStarted => String::new(),
            BatchProgress::Converting {
                total, succeeded, ..
            }
            | BatchProgress::Completed {
                total, succeeded, ..
            } => format!("{}/{}", succeeded, total),
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, BatchProgress::Converting { .. })
    }
}

/// "Convert all" run: hands out entries while fewer than `limit` are in flight.
#[derive(Debug)]
pub struct ConversionQueue {
    pending: VecDeque<EntryId>,
    in_flight: HashSet<EntryId>,
    limit: usize,
    total: usize,
    succeeded: usize,
    failed: usize,
}

impl ConversionQueue {
    pub fn new(ids: Vec<EntryId>, limit: usize) -> Self {
        Self {
            total: ids.len(),
            pending: ids.into(),
            in_flight: HashSet::new(),
            limit: limit.max(1),
            succeeded: 0,
            failed: 0,
        }
    }

    pub fn next_dispatch(&mut self) -> Option<EntryId> {
        if self.in_flight.len() >= self.limit {
            return None;
        }
        let id = self.pending.pop_front()?;
        self.in_flight.insert(id);
        Some(id)
    }

    /// Records a result. Ids the queue did not dispatch are ignored.
    pub fn finish(&mut self, id: EntryId, succeeded: bool) -> bool {
        if !self.in_flight.remove(&id) {
            return false;
        }
        if succeeded {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        true
    }

    /// Drops an entry that left the session before its result was counted.
    pub fn forget(&mut self, id: EntryId) {
        let before = self.pending.len();
        self.pending.retain(|p| *p != id);
        if self.pending.len() != before || self.in_flight.remove(&id) {
            self.total -= 1;
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_done(&self) -> bool {
        self.pending.is_empty() && self.in_flight.is_empty()
    }

    pub fn progress(&self) -> BatchProgress {
        if self.is_done() {
            BatchProgress::Completed {
                total: self.total,
                succeeded: self.succeeded,
                failed: self.failed,
            }
        } else {
            BatchProgress::Converting {
                total: self.total,
                done: self.succeeded + self.failed,
                succeeded: self.succeeded,
                failed: self.failed,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{FileType, SessionState, UploadedFile};

    fn ids(n: usize) -> Vec<EntryId> {
        let mut session = SessionState::new();
        (0..n)
            .map(|i| {
                let id = session.add_file(&format!("f{i}.png"), 1).unwrap();
                session.complete_upload(
                    id,
                    UploadedFile {
                        file_type: FileType::Image,
                        server_filename: format!("f{i}.png"),
                        size_bytes: 1,
                        extension: "png".into(),
                    },
                );
                id
            })
            .collect()
    }

    #[test]
    fn never_exceeds_limit() {
        let mut queue = ConversionQueue::new(ids(5), 2);
        let a = queue.next_dispatch().unwrap();
        let _b = queue.next_dispatch().unwrap();
        assert_eq!(queue.next_dispatch(), None);
        assert_eq!(queue.in_flight(), 2);

        queue.finish(a, true);
        assert!(queue.next_dispatch().is_some());
        assert_eq!(queue.next_dispatch(), None);
    }

    #[test]
    fn progress_is_monotonic_and_exact() {
        let mut queue = ConversionQueue::new(ids(4), 3);
        let mut last_done = 0;
        let mut step = 0;
        while !queue.is_done() {
            while let Some(id) = queue.next_dispatch() {
                queue.finish(id, step % 2 == 0);
                step += 1;
                if let BatchProgress::Converting { done, .. } = queue.progress() {
                    assert!(done >= last_done);
                    last_done = done;
                }
            }
        }
        assert_eq!(
            queue.progress(),
            BatchProgress::Completed {
                total: 4,
                succeeded: 2,
                failed: 2
            }
        );
        assert_eq!(queue.progress().counter_text(), "2/4");
        assert_eq!(queue.progress().percentage(), 1.0);
    }

    #[test]
    fn forgetting_shrinks_total() {
        let all = ids(3);
        let mut queue = ConversionQueue::new(all.clone(), 1);
        let first = queue.next_dispatch().unwrap();
        queue.forget(all[2]);
        queue.forget(first);
        assert!(!queue.finish(first, true));

        let second = queue.next_dispatch().unwrap();
        queue.finish(second, true);
        assert_eq!(
            queue.progress(),
            BatchProgress::Completed {
                total: 1,
                succeeded: 1,
                failed: 0
            }
        );
    }

    #[test]
    fn empty_run_completes_immediately() {
        let queue = ConversionQueue::new(Vec::new(), 2);
        assert!(queue.is_done());
        assert_eq!(queue.progress().percentage(), 0.0);
    }
}
