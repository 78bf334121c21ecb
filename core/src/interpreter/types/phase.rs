//! Execution phase enums for each frame kind
//!
//! Each statement frame records which micro-step it is at, so a run can be
//! suspended between host ticks and resumed exactly where it stopped.

/// Phase for ordinary statements (commands, the start hat, bare reporters)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimplePhase {
    /// Resolve arguments and perform the effect
    Run,
    /// Effect done and its tick consumed; pop on next step
    Finish,
}

/// Phase for the delay statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitPhase {
    /// Resolve the duration and start the countdown
    Start,
    /// One tick consumed per step until the countdown runs out
    Counting,
}

/// Phase shared by repeat, for-each and while
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    /// Resolve the loop's arguments once
    Enter,
    /// Decide whether to run another iteration
    Check,
    /// Body finished (or was abandoned by continue)
    PostBody,
}

/// Phase for try/except
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TryPhase {
    Enter,
    /// Running the protected body
    Protected,
    /// A fault was caught; fallback not yet started
    Recover,
    /// Running the fallback body
    Fallback,
}
