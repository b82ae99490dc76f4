use std::fmt;
use std::ops::Not;

/// Five-valued logic used for fault simulation, plus a marker for values not computed yet
///
/// `D` is 1 in the good circuit and 0 in the faulty circuit; `Dbar` is the opposite.
/// `X` is a value that exists but is not determined by the current input assignment,
/// while `Unset` only appears before a node has been simulated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum LogicValue {
    /// Not computed yet
    #[default]
    Unset,
    /// Logic 0 in both circuits
    Zero,
    /// Logic 1 in both circuits
    One,
    /// 1 in the good circuit, 0 in the faulty circuit
    D,
    /// 0 in the good circuit, 1 in the faulty circuit
    Dbar,
    /// Unknown
    X,
}

impl LogicValue {
    /// Convert a boolean to a logic value
    pub fn from_bool(b: bool) -> LogicValue {
        if b {
            LogicValue::One
        } else {
            LogicValue::Zero
        }
    }

    /// Returns whether the value carries the fault effect (D or D')
    pub fn is_fault_effect(self) -> bool {
        matches!(self, LogicValue::D | LogicValue::Dbar)
    }

    /// Returns whether the value is a plain 0 or 1
    pub fn is_binary(self) -> bool {
        matches!(self, LogicValue::Zero | LogicValue::One)
    }

    /// Value in the good circuit, if known
    pub fn good(self) -> Option<bool> {
        match self {
            LogicValue::Zero | LogicValue::Dbar => Some(false),
            LogicValue::One | LogicValue::D => Some(true),
            LogicValue::X | LogicValue::Unset => None,
        }
    }

    /// Value in the faulty circuit, if known
    pub fn faulty(self) -> Option<bool> {
        match self {
            LogicValue::Zero | LogicValue::D => Some(false),
            LogicValue::One | LogicValue::Dbar => Some(true),
            LogicValue::X | LogicValue::Unset => None,
        }
    }

    /// Build a value from its good and faulty components
    pub fn from_pair(good: bool, faulty: bool) -> LogicValue {
        match (good, faulty) {
            (false, false) => LogicValue::Zero,
            (true, true) => LogicValue::One,
            (true, false) => LogicValue::D,
            (false, true) => LogicValue::Dbar,
        }
    }

    /// Apply a stuck-at fault to a naturally computed value
    ///
    /// A stuck-at-0 turns 1 into D and D' into 0; a stuck-at-1 turns 0 into D' and D into 1.
    /// Everything else is unchanged.
    pub fn with_fault(self, stuck_at: Option<bool>) -> LogicValue {
        use LogicValue::*;
        match (stuck_at, self) {
            (Some(false), One) => D,
            (Some(false), Dbar) => Zero,
            (Some(true), Zero) => Dbar,
            (Some(true), D) => One,
            _ => self,
        }
    }

    /// Character used in test pattern files; D and D' are reported by their good value
    pub fn to_pattern_char(self) -> char {
        match self {
            LogicValue::Zero | LogicValue::Dbar => '0',
            LogicValue::One | LogicValue::D => '1',
            LogicValue::X => 'X',
            LogicValue::Unset => 'U',
        }
    }

    /// Parse a character of an input vector: 0, 1 or X
    pub fn from_pattern_char(c: char) -> Option<LogicValue> {
        match c {
            '0' => Some(LogicValue::Zero),
            '1' => Some(LogicValue::One),
            'X' | 'x' => Some(LogicValue::X),
            _ => None,
        }
    }
}

impl Not for LogicValue {
    type Output = LogicValue;

    /// Five-valued complement; panics on an unset value
    fn not(self) -> LogicValue {
        use LogicValue::*;
        match self {
            Zero => One,
            One => Zero,
            D => Dbar,
            Dbar => D,
            X => X,
            Unset => panic!("Cannot invert a logic value that has not been computed"),
        }
    }
}

impl fmt::Display for LogicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogicValue::Zero => "0",
            LogicValue::One => "1",
            LogicValue::D => "D",
            LogicValue::Dbar => "B",
            LogicValue::X => "X",
            LogicValue::Unset => "U",
        };
        write!(f, "{}", s)
    }
}
