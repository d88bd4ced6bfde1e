//! Callback scheduling for the engines.
//!
//! A single-threaded registry of repeating and one-shot tasks keyed by
//! [`TaskHandle`]. The owner asks for due tasks with [`TickScheduler::poll`]
//! and sleeps until [`TickScheduler::next_due`] in between; nothing here runs
//! on its own. Cancelling a handle guarantees the task never fires again.
//!
//! Repeating tasks fire at most once per poll. A late poll does not replay
//! the missed periods, it re-arms one period after the late instant. This
//! mirrors interval timers in an event loop and is the source of the
//! countdown and pomodoro drift.

use serde::{Deserialize, Serialize};

use crate::timer::EngineKind;

/// What a registration does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Task {
    /// Stopwatch redraw frame.
    StopwatchRedraw,
    TimerTick,
    PomodoroTick,
    /// Restart the countdown after it expired in loop mode.
    TimerLoopRestart,
    /// Start an engine after a voice command switched to its view.
    DeferredStart(EngineKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskHandle(u64);

#[derive(Debug, Clone)]
struct Registration {
    handle: TaskHandle,
    task: Task,
    due_ms: u64,
    period_ms: Option<u64>,
}

#[derive(Debug, Default)]
pub struct TickScheduler {
    next_id: u64,
    registrations: Vec<Registration>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire `task` every `period_ms`, first one period from `now_ms`.
    pub fn schedule_repeating(&mut self, task: Task, period_ms: u64, now_ms: u64) -> TaskHandle {
        let period = period_ms.max(1);
        self.register(task, now_ms.saturating_add(period), Some(period))
    }

    /// Fire `task` once, `delay_ms` from `now_ms`.
    pub fn schedule_once(&mut self, task: Task, delay_ms: u64, now_ms: u64) -> TaskHandle {
        self.register(task, now_ms.saturating_add(delay_ms), None)
    }

    fn register(&mut self, task: Task, due_ms: u64, period_ms: Option<u64>) -> TaskHandle {
        self.next_id += 1;
        let handle = TaskHandle(self.next_id);
        self.registrations.push(Registration {
            handle,
            task,
            due_ms,
            period_ms,
        });
        tracing::trace!(?task, due_ms, ?period_ms, "task scheduled");
        handle
    }

    /// Returns whether the handle was still pending.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.registrations.len();
        self.registrations.retain(|r| r.handle != handle);
        before != self.registrations.len()
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.registrations.iter().any(|r| r.handle == handle)
    }

    /// Earliest due instant, if anything is registered.
    pub fn next_due(&self) -> Option<u64> {
        self.registrations.iter().map(|r| r.due_ms).min()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Collect every task due at `now_ms`, earliest first.
    ///
    /// One-shots are removed. Repeating tasks are re-armed one period after
    /// their due instant, or after `now_ms` if that is already past.
    pub fn poll(&mut self, now_ms: u64) -> Vec<(TaskHandle, Task)> {
        let mut due: Vec<(u64, TaskHandle, Task)> = self
            .registrations
            .iter()
            .filter(|r| r.due_ms <= now_ms)
            .map(|r| (r.due_ms, r.handle, r.task))
            .collect();
        due.sort_by_key(|(due_ms, handle, _)| (*due_ms, *handle));

        self.registrations.retain_mut(|r| {
            if r.due_ms > now_ms {
                return true;
            }
            match r.period_ms {
                Some(period) => {
                    let next = r.due_ms.saturating_add(period);
                    r.due_ms = if next > now_ms {
                        next
                    } else {
                        now_ms.saturating_add(period)
                    };
                    true
                }
                None => false,
            }
        });

        due.into_iter().map(|(_, h, t)| (h, t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeating_task_fires_each_period() {
        let mut s = TickScheduler::new();
        s.schedule_repeating(Task::TimerTick, 10, 0);
        assert!(s.poll(9).is_empty());
        assert_eq!(s.poll(10).len(), 1);
        assert_eq!(s.next_due(), Some(20));
        assert_eq!(s.poll(20).len(), 1);
    }

    #[test]
    fn late_poll_fires_once_and_rearms_from_now() {
        let mut s = TickScheduler::new();
        s.schedule_repeating(Task::PomodoroTick, 1_000, 0);
        assert_eq!(s.poll(3_500).len(), 1);
        assert_eq!(s.next_due(), Some(4_500));
    }

    #[test]
    fn one_shot_fires_once() {
        let mut s = TickScheduler::new();
        let h = s.schedule_once(Task::TimerLoopRestart, 1_000, 0);
        assert!(s.is_pending(h));
        assert_eq!(s.poll(1_000), vec![(h, Task::TimerLoopRestart)]);
        assert!(!s.is_pending(h));
        assert!(s.poll(5_000).is_empty());
    }

    #[test]
    fn cancelled_task_never_fires() {
        let mut s = TickScheduler::new();
        let h = s.schedule_repeating(Task::TimerTick, 10, 0);
        assert!(s.cancel(h));
        assert!(!s.cancel(h));
        assert!(s.poll(100).is_empty());
        assert!(s.is_empty());
    }

    #[test]
    fn due_tasks_come_back_earliest_first() {
        let mut s = TickScheduler::new();
        let slow = s.schedule_once(Task::DeferredStart(EngineKind::Timer), 300, 0);
        let fast = s.schedule_repeating(Task::StopwatchRedraw, 16, 0);
        let fired: Vec<_> = s.poll(300).into_iter().map(|(h, _)| h).collect();
        assert_eq!(fired, vec![fast, slow]);
    }
}
