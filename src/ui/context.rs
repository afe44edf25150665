//! Choosing between rich and plain terminal output

use console::Term;

/// Variables whose presence marks a CI runner
const CI_MARKERS: &[&str] = &["CI", "GITHUB_ACTIONS", "GITLAB_CI", "BUILDKITE", "JENKINS_URL", "TF_BUILD"];

/// How sync results are drawn
#[derive(Debug, Clone, Copy)]
pub struct UiContext {
    fancy: bool,
}

impl UiContext {
    /// Rich output when stdout is a terminal outside CI
    pub fn detect() -> Self {
        let in_ci = CI_MARKERS.iter().any(|var| {
            std::env::var_os(var).is_some_and(|value| !value.is_empty() && value != "false")
        });
        Self::new(Term::stdout().is_term(), in_ci)
    }

    pub fn new(terminal: bool, in_ci: bool) -> Self {
        Self {
            fancy: terminal && !in_ci,
        }
    }

    /// Tagged plain lines only, no spinners or colors beyond the tags
    pub fn plain() -> Self {
        Self { fancy: false }
    }

    pub fn use_fancy_output(&self) -> bool {
        self.fancy
    }
}
