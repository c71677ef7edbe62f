use super::policy::AdmissionPolicy;
use crate::connection::{Command, ConnectionRequest};

/// Evaluates connection requests against an [`AdmissionPolicy`].
///
/// Evaluation order:
///   1. Command gate (bind / associate kill-switches)
///   2. Default posture: open when no allow-list is configured
///   3. Allow promotion: hostname OR network match
///   4. Reject override: hostname OR network match forces deny
///
/// Pure computation, safe to share across tasks.
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    policy: AdmissionPolicy,
}

impl RuleEngine {
    pub fn new(policy: AdmissionPolicy) -> Self {
        Self { policy }
    }

    /// Returns `true` when the request may proceed.
    pub fn evaluate(&self, request: &ConnectionRequest) -> bool {
        if self.command_disabled(request.command) {
            return false;
        }

        let hostname = request.hostname();
        let ip = request.ip();

        let mut allow = self.policy.is_open();

        if !allow && !self.policy.allowed_hostnames.is_empty() {
            allow = hostname.is_some_and(|h| self.policy.allowed_hostnames.contains(h));
        }

        if !allow && !self.policy.allowed_networks.is_empty() {
            allow = ip.is_some_and(|ip| self.policy.allowed_networks.contains(ip));
        }

        if allow && !self.policy.rejected_hostnames.is_empty() {
            allow = !hostname.is_some_and(|h| self.policy.rejected_hostnames.contains(h));
        }

        if allow && !self.policy.rejected_networks.is_empty() {
            allow = !ip.is_some_and(|ip| self.policy.rejected_networks.contains(ip));
        }

        allow
    }

    fn command_disabled(&self, command: Command) -> bool {
        match command {
            Command::Bind => self.policy.disable_bind,
            Command::Associate => self.policy.disable_associate,
            Command::Connect => false,
        }
    }
}
