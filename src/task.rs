use crate::error::{Result, TowerError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskType {
    Away,
    Land,
    Wait,
    Load,
    Takeoff,
}

impl TaskType {
    pub const ALL: [TaskType; 5] = [
        TaskType::Away,
        TaskType::Land,
        TaskType::Wait,
        TaskType::Load,
        TaskType::Takeoff,
    ];

    /// Whether a task of type `next` may directly follow a task of this type.
    pub fn can_precede(self, next: TaskType) -> bool {
        use TaskType::*;
        matches!(
            (self, next),
            (Away, Away)
                | (Away, Land)
                | (Land, Wait)
                | (Land, Load)
                | (Wait, Wait)
                | (Wait, Load)
                | (Load, Takeoff)
                | (Takeoff, Away)
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            TaskType::Away => "AWAY",
            TaskType::Land => "LAND",
            TaskType::Wait => "WAIT",
            TaskType::Load => "LOAD",
            TaskType::Takeoff => "TAKEOFF",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TaskType {
    type Err = TowerError;

    fn from_str(s: &str) -> Result<Self> {
        TaskType::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| TowerError::MalformedTask(format!("unknown task type '{}'", s)))
    }
}

/// A single phase of an aircraft's lifecycle. Only `LOAD` tasks carry a
/// meaningful load percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Task {
    kind: TaskType,
    load_percent: u32,
}

impl Task {
    pub fn new(kind: TaskType) -> Task {
        Task {
            kind,
            load_percent: 0,
        }
    }

    pub fn load(load_percent: u32) -> Task {
        Task {
            kind: TaskType::Load,
            load_percent,
        }
    }

    pub fn kind(&self) -> TaskType {
        self.kind
    }

    pub fn load_percent(&self) -> u32 {
        match self.kind {
            TaskType::Load => self.load_percent,
            _ => 0,
        }
    }

    pub fn encode(&self) -> String {
        match self.kind {
            TaskType::Load => format!("{}@{}", self.kind, self.load_percent),
            other => other.to_string(),
        }
    }
}

impl From<TaskType> for Task {
    fn from(kind: TaskType) -> Self {
        Task::new(kind)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TaskType::Load => write!(f, "{} at {}%", self.kind, self.load_percent),
            other => write!(f, "{}", other),
        }
    }
}

impl FromStr for Task {
    type Err = TowerError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split('@');
        let kind = parts.next().unwrap_or_default().parse::<TaskType>()?;
        match (kind, parts.next(), parts.next()) {
            (_, Some(_), Some(_)) => Err(TowerError::MalformedTask(format!(
                "'{}' has more than one load percentage",
                s
            ))),
            (TaskType::Load, Some(percent), None) => percent
                .parse::<u32>()
                .map(Task::load)
                .map_err(|_| TowerError::MalformedTask(format!("bad load percentage in '{}'", s))),
            (_, Some(_), None) => Err(TowerError::MalformedTask(format!(
                "only LOAD tasks carry a load percentage, got '{}'",
                s
            ))),
            (kind, None, _) => Ok(Task::new(kind)),
        }
    }
}

impl TryFrom<String> for Task {
    type Error = TowerError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Task> for String {
    fn from(task: Task) -> Self {
        task.encode()
    }
}

/// Circular list of tasks an aircraft cycles through. Every adjacent pair,
/// including last to first, is a legal transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskList {
    tasks: Vec<Task>,
    current: usize,
}

impl TaskList {
    pub fn new(tasks: Vec<Task>) -> Result<TaskList> {
        Self::validate(&tasks)?;
        Ok(TaskList { tasks, current: 0 })
    }

    fn validate(tasks: &[Task]) -> Result<()> {
        if tasks.is_empty() {
            return Err(TowerError::MalformedTaskList(
                "task list is empty".to_string(),
            ));
        }

        // a single task wraps onto itself, so only AWAY and WAIT survive this
        let wrapped = tasks.iter().skip(1).chain(tasks.first());
        match tasks
            .iter()
            .zip(wrapped)
            .enumerate()
            .find(|(_, (task, next))| !task.kind().can_precede(next.kind()))
        {
            Some((i, (task, next))) => Err(TowerError::MalformedTaskList(format!(
                "{} cannot be followed by {} (position {} of {})",
                task.kind(),
                next.kind(),
                i + 1,
                tasks.len()
            ))),
            None => Ok(()),
        }
    }

    pub fn current_task(&self) -> &Task {
        &self.tasks[self.current]
    }

    pub fn next_task(&self) -> &Task {
        &self.tasks[(self.current + 1) % self.tasks.len()]
    }

    pub fn advance(&mut self) {
        self.current = (self.current + 1) % self.tasks.len();
    }

    pub fn position(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Tasks starting from the current one, wrapping around.
    pub fn rotated(&self) -> Vec<Task> {
        self.tasks[self.current..]
            .iter()
            .chain(&self.tasks[..self.current])
            .copied()
            .collect()
    }

    pub fn encode(&self) -> String {
        self.rotated()
            .iter()
            .map(Task::encode)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for TaskList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TaskList currently on {} [{}/{}]",
            self.current_task(),
            self.current + 1,
            self.tasks.len()
        )
    }
}

impl FromStr for TaskList {
    type Err = TowerError;

    fn from_str(s: &str) -> Result<Self> {
        let tasks = s
            .split(',')
            .map(|t| t.trim().parse::<Task>())
            .collect::<Result<Vec<_>>>()?;
        TaskList::new(tasks)
    }
}
