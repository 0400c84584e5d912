use std::fmt;

use crate::docker::ContainerState;

/// Where a tenant's runtime instance is in the replace cycle.
///
/// The lifecycle manager only ever drives `Absent | Running | Exited` to
/// `Absent` (via `Stopping` and `Removed` as needed) and then to `Running`
/// via `Starting`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceState {
    Absent,
    Running,
    /// Present but not running (exited, created, dead, ...).
    Exited(String),
    Stopping,
    Removed,
    Starting,
}

impl InstanceState {
    pub fn observed(state: Option<&ContainerState>) -> Self {
        match state {
            None => Self::Absent,
            Some(s) if s.running => Self::Running,
            Some(s) => Self::Exited(s.status.clone()),
        }
    }

    pub fn is_present(&self) -> bool {
        !matches!(self, Self::Absent | Self::Removed)
    }

    pub fn can_transition_to(&self, next: &InstanceState) -> bool {
        use InstanceState::*;
        matches!(
            (self, next),
            (Running, Stopping)
                | (Stopping, Exited(_))
                | (Running | Exited(_), Removed)
                | (Absent | Removed, Starting)
                | (Starting, Running)
        )
    }
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("absent"),
            Self::Running => f.write_str("running"),
            Self::Exited(status) => write!(f, "exited({status})"),
            Self::Stopping => f.write_str("stopping"),
            Self::Removed => f.write_str("removed"),
            Self::Starting => f.write_str("starting"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(status: &str, running: bool) -> ContainerState {
        ContainerState {
            status: status.into(),
            running,
        }
    }

    #[test]
    fn observed_from_inspect() {
        assert_eq!(InstanceState::observed(None), InstanceState::Absent);
        assert_eq!(
            InstanceState::observed(Some(&state("running", true))),
            InstanceState::Running
        );
        assert_eq!(
            InstanceState::observed(Some(&state("exited", false))),
            InstanceState::Exited("exited".into())
        );
    }

    #[test]
    fn replace_cycle_is_allowed() {
        use InstanceState::*;
        let cycle = [
            Running,
            Stopping,
            Exited("exited".into()),
            Removed,
            Starting,
            Running,
        ];
        for pair in cycle.windows(2) {
            assert!(pair[0].can_transition_to(&pair[1]), "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn cannot_start_over_a_present_instance() {
        use InstanceState::*;
        assert!(!Running.can_transition_to(&Starting));
        assert!(!Exited("created".into()).can_transition_to(&Starting));
        assert!(Absent.can_transition_to(&Starting));
    }

    #[test]
    fn presence() {
        assert!(InstanceState::Running.is_present());
        assert!(InstanceState::Exited("dead".into()).is_present());
        assert!(!InstanceState::Absent.is_present());
        assert!(!InstanceState::Removed.is_present());
    }
}
