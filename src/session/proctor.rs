//! Proctoring signal handling for an in-progress quiz session.
//!
//! Everything here is deterrence, not enforcement: all signals originate
//! from a browser environment the student controls, so no server-side
//! trust is ever placed in them.

/// Tab-switch strikes tolerated before forced submission.
pub const TAB_SWITCH_LIMIT: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// The page became hidden (tab switch, window minimize).
    TabHidden,
    /// The document left fullscreen mode.
    FullscreenExit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escalation {
    Warn { strikes: u32, limit: u32 },
    Terminate(Violation),
}

/// Counts violations and decides when to escalate. Tab switches get a
/// strike budget; fullscreen exit terminates with no tolerance. The
/// monitor never performs the submission itself -- idempotence is the
/// session state machine's job.
#[derive(Debug, Default)]
pub struct ProctorMonitor {
    strikes: u32,
}

impl ProctorMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strikes(&self) -> u32 {
        self.strikes
    }

    pub fn observe(&mut self, violation: Violation) -> Escalation {
        match violation {
            Violation::TabHidden => {
                self.strikes += 1;
                if self.strikes >= TAB_SWITCH_LIMIT {
                    Escalation::Terminate(Violation::TabHidden)
                } else {
                    Escalation::Warn {
                        strikes: self.strikes,
                        limit: TAB_SWITCH_LIMIT,
                    }
                }
            }
            Violation::FullscreenExit => Escalation::Terminate(Violation::FullscreenExit),
        }
    }
}

/// A keyboard chord as reported by the UI layer.
#[derive(Debug, Clone, Copy)]
pub struct KeyChord<'a> {
    pub key: &'a str,
    pub ctrl: bool,
    pub shift: bool,
}

/// Whether the context menu should be suppressed while a quiz runs.
pub fn blocks_context_menu() -> bool {
    true
}

/// Advisory filter for common developer-tool chords (F12, Ctrl+Shift+I,
/// Ctrl+Shift+J, Ctrl+U). UI friction only; it cannot stop a determined
/// user from inspecting traffic or state.
pub fn blocks_key_chord(chord: KeyChord) -> bool {
    match chord.key {
        "F12" => true,
        "I" | "J" => chord.ctrl && chord.shift,
        "U" => chord.ctrl && !chord.shift,
        _ => false,
    }
}
