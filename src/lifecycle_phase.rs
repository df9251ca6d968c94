/// Process-wide lifecycle phase. Exactly one phase is active at a time;
/// the only transition that revisits an earlier phase is the explicit
/// restart path back into `BackendStarting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LifecyclePhase {
    Cold,
    LocaleBootstrapped,
    BackendStarting,
    PresentationLoading,
    AwaitingReadiness,
    Running,
    Restarting,
    ShuttingDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StartKind {
    Initial,
    Restart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RestartDecision {
    StartNow,
    QueuedUntilRunning,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReadinessOutcome {
    FirstSignal { restart_queued: bool },
    Ignored,
}

#[derive(Debug)]
pub(crate) struct PhaseMachine {
    phase: LifecyclePhase,
    restart_queued: bool,
}

impl PhaseMachine {
    pub(crate) fn new() -> Self {
        Self {
            phase: LifecyclePhase::Cold,
            restart_queued: false,
        }
    }

    pub(crate) fn phase(&self) -> LifecyclePhase {
        self.phase
    }

    pub(crate) fn locale_bootstrapped(&mut self) -> Result<(), String> {
        match self.phase {
            LifecyclePhase::Cold => {
                self.phase = LifecyclePhase::LocaleBootstrapped;
                Ok(())
            }
            other => Err(format!("cannot bootstrap locale in phase {other:?}")),
        }
    }

    pub(crate) fn begin_content_start(&mut self) -> Result<StartKind, String> {
        match self.phase {
            LifecyclePhase::LocaleBootstrapped => {
                self.phase = LifecyclePhase::BackendStarting;
                Ok(StartKind::Initial)
            }
            LifecyclePhase::Restarting => {
                self.phase = LifecyclePhase::BackendStarting;
                Ok(StartKind::Restart)
            }
            other => Err(format!("cannot start content in phase {other:?}")),
        }
    }

    pub(crate) fn backend_started(&mut self) -> Result<(), String> {
        match self.phase {
            LifecyclePhase::BackendStarting => {
                self.phase = LifecyclePhase::PresentationLoading;
                Ok(())
            }
            other => Err(format!("backend start completed in phase {other:?}")),
        }
    }

    pub(crate) fn main_window_loaded(&mut self) -> Result<(), String> {
        match self.phase {
            LifecyclePhase::PresentationLoading => {
                self.phase = LifecyclePhase::AwaitingReadiness;
                Ok(())
            }
            other => Err(format!("main window loaded in phase {other:?}")),
        }
    }

    /// Consume the readiness signal. Signals outside `AwaitingReadiness`
    /// (a duplicate fire, or one raced against teardown) are ignored so
    /// the reveal sequence runs at most once per cycle.
    pub(crate) fn readiness_signaled(&mut self) -> ReadinessOutcome {
        match self.phase {
            LifecyclePhase::AwaitingReadiness => {
                self.phase = LifecyclePhase::Running;
                let restart_queued = std::mem::take(&mut self.restart_queued);
                ReadinessOutcome::FirstSignal { restart_queued }
            }
            _ => ReadinessOutcome::Ignored,
        }
    }

    /// An explicit restart request. Mid-startup requests are queued until
    /// `Running` is reached; anything else outside `Running` is rejected.
    pub(crate) fn request_restart(&mut self) -> RestartDecision {
        match self.phase {
            LifecyclePhase::Running => {
                self.phase = LifecyclePhase::Restarting;
                RestartDecision::StartNow
            }
            LifecyclePhase::AwaitingReadiness => {
                self.restart_queued = true;
                RestartDecision::QueuedUntilRunning
            }
            _ => RestartDecision::Rejected,
        }
    }

    /// Terminal. Returns whether this call initiated the shutdown.
    pub(crate) fn begin_shutdown(&mut self) -> bool {
        if self.phase == LifecyclePhase::ShuttingDown {
            return false;
        }
        self.phase = LifecyclePhase::ShuttingDown;
        self.restart_queued = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine_at_awaiting_readiness() -> PhaseMachine {
        let mut machine = PhaseMachine::new();
        machine.locale_bootstrapped().unwrap();
        machine.begin_content_start().unwrap();
        machine.backend_started().unwrap();
        machine.main_window_loaded().unwrap();
        machine
    }

    #[test]
    fn startup_walks_the_expected_phase_order() {
        let mut machine = PhaseMachine::new();
        assert_eq!(machine.phase(), LifecyclePhase::Cold);
        machine.locale_bootstrapped().unwrap();
        assert_eq!(machine.phase(), LifecyclePhase::LocaleBootstrapped);
        assert_eq!(machine.begin_content_start(), Ok(StartKind::Initial));
        assert_eq!(machine.phase(), LifecyclePhase::BackendStarting);
        machine.backend_started().unwrap();
        assert_eq!(machine.phase(), LifecyclePhase::PresentationLoading);
        machine.main_window_loaded().unwrap();
        assert_eq!(machine.phase(), LifecyclePhase::AwaitingReadiness);
        assert_eq!(
            machine.readiness_signaled(),
            ReadinessOutcome::FirstSignal {
                restart_queued: false
            }
        );
        assert_eq!(machine.phase(), LifecyclePhase::Running);
    }

    #[test]
    fn out_of_order_transitions_are_rejected() {
        let mut machine = PhaseMachine::new();
        assert!(machine.begin_content_start().is_err());
        assert!(machine.backend_started().is_err());
        assert!(machine.main_window_loaded().is_err());
    }

    #[test]
    fn duplicate_readiness_signal_is_ignored() {
        let mut machine = machine_at_awaiting_readiness();
        assert!(matches!(
            machine.readiness_signaled(),
            ReadinessOutcome::FirstSignal { .. }
        ));
        assert_eq!(machine.readiness_signaled(), ReadinessOutcome::Ignored);
        assert_eq!(machine.phase(), LifecyclePhase::Running);
    }

    #[test]
    fn restart_from_running_starts_immediately() {
        let mut machine = machine_at_awaiting_readiness();
        machine.readiness_signaled();
        assert_eq!(machine.request_restart(), RestartDecision::StartNow);
        assert_eq!(machine.phase(), LifecyclePhase::Restarting);
        assert_eq!(machine.begin_content_start(), Ok(StartKind::Restart));
    }

    #[test]
    fn restart_during_awaiting_readiness_is_queued_and_drained_on_signal() {
        let mut machine = machine_at_awaiting_readiness();
        assert_eq!(
            machine.request_restart(),
            RestartDecision::QueuedUntilRunning
        );
        assert_eq!(machine.phase(), LifecyclePhase::AwaitingReadiness);
        assert_eq!(
            machine.readiness_signaled(),
            ReadinessOutcome::FirstSignal {
                restart_queued: true
            }
        );
        // The queue drains once; the next signal-free cycle starts clean.
        assert_eq!(machine.request_restart(), RestartDecision::StartNow);
        assert_eq!(machine.begin_content_start(), Ok(StartKind::Restart));
        machine.backend_started().unwrap();
        machine.main_window_loaded().unwrap();
        assert_eq!(
            machine.readiness_signaled(),
            ReadinessOutcome::FirstSignal {
                restart_queued: false
            }
        );
    }

    #[test]
    fn restart_is_rejected_mid_startup_and_after_shutdown() {
        let mut machine = PhaseMachine::new();
        assert_eq!(machine.request_restart(), RestartDecision::Rejected);
        machine.locale_bootstrapped().unwrap();
        machine.begin_content_start().unwrap();
        assert_eq!(machine.request_restart(), RestartDecision::Rejected);
        machine.begin_shutdown();
        assert_eq!(machine.request_restart(), RestartDecision::Rejected);
    }

    #[test]
    fn shutdown_is_terminal_and_reports_only_the_first_call() {
        let mut machine = machine_at_awaiting_readiness();
        assert!(machine.begin_shutdown());
        assert!(!machine.begin_shutdown());
        assert_eq!(machine.phase(), LifecyclePhase::ShuttingDown);
        assert_eq!(machine.readiness_signaled(), ReadinessOutcome::Ignored);
    }
}
