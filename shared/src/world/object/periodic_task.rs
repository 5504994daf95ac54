use std::time::{Duration, Instant};

/// Identifies a periodic task within the object that owns it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

/// A callback an object runs on a fixed interval from its peer's update
/// pass. Runs until stopped, and is stopped when the object despawns.
pub struct PeriodicTask<R> {
    interval: Duration,
    next_run: Option<Instant>,
    running: bool,
    callback: Box<dyn FnMut(&mut R)>,
}

impl<R> PeriodicTask<R> {
    pub fn new<F: FnMut(&mut R) + 'static>(interval: Duration, callback: F) -> Self {
        Self {
            interval,
            next_run: None,
            running: true,
            callback: Box::new(callback),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Runs the callback if the interval has elapsed. The first poll only
    /// schedules the first run. Missed intervals are not caught up.
    pub fn poll(&mut self, now: Instant, target: &mut R) -> bool {
        if !self.running {
            return false;
        }
        match self.next_run {
            None => {
                self.next_run = Some(now + self.interval);
                false
            }
            Some(next_run) if now >= next_run => {
                (self.callback)(target);
                self.next_run = Some(now + self.interval);
                true
            }
            Some(_) => false,
        }
    }
}

/// Running tasks in the order they were added. Stopped tasks are removed,
/// and handles are never reused.
pub(crate) struct PeriodicTasks<R> {
    tasks: Vec<(TaskHandle, PeriodicTask<R>)>,
    next_handle: u64,
}

impl<R> PeriodicTasks<R> {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_handle: 0,
        }
    }

    pub fn add(&mut self, task: PeriodicTask<R>) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        if task.is_running() {
            self.tasks.push((handle, task));
        }
        handle
    }

    pub fn get(&self, handle: TaskHandle) -> Option<&PeriodicTask<R>> {
        self.position(handle).map(|index| &self.tasks[index].1)
    }

    /// Stops and drops the task. Returns false if it had already stopped.
    pub fn stop(&mut self, handle: TaskHandle) -> bool {
        let Some(index) = self.position(handle) else {
            return false;
        };
        self.tasks.remove(index);
        true
    }

    pub fn poll_all(&mut self, now: Instant, target: &mut R) -> usize {
        let mut ran = 0;
        for (_, task) in &mut self.tasks {
            if task.poll(now, target) {
                ran += 1;
            }
        }
        ran
    }

    pub fn running_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn stop_all(&mut self) {
        self.tasks.clear();
    }

    fn position(&self, handle: TaskHandle) -> Option<usize> {
        self.tasks.iter().position(|(task_handle, _)| *task_handle == handle)
    }
}
