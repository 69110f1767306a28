use serde::Serialize;

use super::form::FormState;

/// Rule deciding whether a step's required inputs are satisfied
pub type CompletionPredicate = fn(&FormState) -> bool;

/// Unique identifier for each wizard step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepId {
    #[default]
    Vehicle,
    Issue,
    Location,
    Photos,
    Review,
}

impl StepId {
    /// The fixed step sequence, in wizard order
    pub const ALL: [StepId; 5] = [
        StepId::Vehicle,
        StepId::Issue,
        StepId::Location,
        StepId::Photos,
        StepId::Review,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn first() -> Self {
        Self::ALL[0]
    }

    pub fn last() -> Self {
        Self::ALL[Self::COUNT - 1]
    }

    pub fn index(&self) -> usize {
        match self {
            StepId::Vehicle => 0,
            StepId::Issue => 1,
            StepId::Location => 2,
            StepId::Photos => 3,
            StepId::Review => 4,
        }
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    pub fn next(&self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn prev(&self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    pub fn title(&self) -> &'static str {
        match self {
            StepId::Vehicle => "Vehicle",
            StepId::Issue => "Issue",
            StepId::Location => "Location",
            StepId::Photos => "Photos",
            StepId::Review => "Review",
        }
    }

    /// Parse a step from its name or its 1-based position ("issue", "2")
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        if let Ok(num) = name.parse::<usize>() {
            return num.checked_sub(1).and_then(Self::from_index);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|step| step.title().to_lowercase() == name)
    }

    pub fn predicate(&self) -> CompletionPredicate {
        match self {
            StepId::Vehicle => vehicle_selected as CompletionPredicate,
            StepId::Issue => issue_described as CompletionPredicate,
            StepId::Location => location_present as CompletionPredicate,
            // Photos are optional
            StepId::Photos => always_complete as CompletionPredicate,
            StepId::Review => always_complete as CompletionPredicate,
        }
    }
}

fn vehicle_selected(form: &FormState) -> bool {
    form.vehicle.is_some()
}

fn issue_described(form: &FormState) -> bool {
    form.issue.as_ref().is_some_and(|issue| issue.is_complete())
}

fn location_present(form: &FormState) -> bool {
    form.location.is_some()
}

fn always_complete(_: &FormState) -> bool {
    true
}

impl std::fmt::Display for StepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

/// Per-step flags exposed to the step indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepStatus {
    pub step: StepId,
    pub complete: bool,
    pub active: bool,
    /// Whether `jump_to` would accept this step right now
    pub reachable: bool,
}

impl StepStatus {
    pub fn marker(&self) -> &'static str {
        if self.active {
            "[>]"
        } else if !self.reachable {
            "[#]"
        } else if self.complete {
            "[x]"
        } else {
            "[ ]"
        }
    }
}
