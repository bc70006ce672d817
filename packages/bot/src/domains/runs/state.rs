use std::fmt;

/// Progress of a run. A run only moves forward; failures are reported as a
/// [`RunError`](super::RunError) carrying the state reached so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum RunState {
    #[default]
    Start,
    Selected,
    ReferencesResolved,
    Posted,
    Recorded,
    Done,
}

impl RunState {
    pub fn next(self) -> Option<RunState> {
        match self {
            RunState::Start => Some(RunState::Selected),
            RunState::Selected => Some(RunState::ReferencesResolved),
            RunState::ReferencesResolved => Some(RunState::Posted),
            RunState::Posted => Some(RunState::Recorded),
            RunState::Recorded => Some(RunState::Done),
            RunState::Done => None,
        }
    }

    /// Whether the tweet is public at this state
    pub fn is_posted(self) -> bool {
        self >= RunState::Posted
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Start => "start",
            RunState::Selected => "selected",
            RunState::ReferencesResolved => "references_resolved",
            RunState::Posted => "posted",
            RunState::Recorded => "recorded",
            RunState::Done => "done",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
