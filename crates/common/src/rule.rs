//! Rule abstraction and the tri-state decision type.

use crate::activity::ActivityInvocation;

/// Outcome of evaluating a rule, a module, or a whole qualifier set.
///
/// `Abstain` means "no applicable opinion" and must never be conflated with
/// `Allow` before final aggregation; the permissive default is applied once,
/// by the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
    Abstain,
}

impl Decision {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Allow => "allow",
            Decision::Deny => "deny",
            Decision::Abstain => "abstain",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pure predicate over one decoded consent section and the target activity.
///
/// Rules never fail; a field the section did not express folds into
/// [`Decision::Abstain`] for that check.
pub trait Rule: Send + Sync {
    fn evaluate(&self, invocation: &ActivityInvocation) -> Decision;
}

/// Fold rule outcomes with the engine's central precedence:
/// `Deny > Allow > Abstain`, short-circuiting on the first deny.
///
/// An explicit restriction in any applicable section must win; zero rules
/// degrade to `Abstain`.
pub fn evaluate_rules<'a>(
    rules: impl IntoIterator<Item = &'a Box<dyn Rule>>,
    invocation: &ActivityInvocation,
) -> Decision {
    let mut outcome = Decision::Abstain;
    for rule in rules {
        match rule.evaluate(invocation) {
            Decision::Deny => return Decision::Deny,
            Decision::Allow => outcome = Decision::Allow,
            Decision::Abstain => {}
        }
    }
    outcome
}
