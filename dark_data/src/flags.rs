//! Bitmask-backed value types.
//!
//! Both [`StatusCondition`] and [`Difficulty`] are stored in the property tree as a
//! plain integer bitmask. They can also be viewed as a fixed-width bit vector, which
//! is what an editor ticks on and off.

use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error raised when a raw bitmask can't be turned into a flag set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagError {
    Negative { kind: &'static str, bits: i64 },
    UnknownBits { kind: &'static str, bits: i64 },
}

impl fmt::Display for FlagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagError::Negative { kind, bits } => write!(f, "{kind} flags can't be negative (got {bits})"),
            FlagError::UnknownBits { kind, bits } => {
                write!(f, "{kind} flags contain unrecognized bits ({bits:#b})")
            },
        }
    }
}

impl std::error::Error for FlagError {}

fn check_bits(kind: &'static str, bits: i64, mask: u32) -> Result<u32, FlagError> {
    if bits < 0 {
        return Err(FlagError::Negative { kind, bits });
    }
    if bits & !i64::from(mask) != 0 {
        return Err(FlagError::UnknownBits { kind, bits });
    }
    // bounded by the mask check above
    Ok(u32::try_from(bits).unwrap_or_default())
}

/// A set of zero or more status ailments affecting a fightable entity.
///
/// An empty set is "Normal". More than one flag may be active at once (a creature
/// can be poisoned and burned), but the single-value rendering only ever shows the
/// first active flag in declaration order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusCondition {
    flags: u32,
}

impl StatusCondition {
    // Bit 0 is unused; stored bitmasks start at BURNED = 2.
    pub const BURNED: u32 = 1 << 1;
    pub const FROZEN: u32 = 1 << 2;
    pub const PARALYSED: u32 = 1 << 3;
    pub const POISONED: u32 = 1 << 4;
    pub const ASLEEP: u32 = 1 << 5;
    pub const DROWSY: u32 = 1 << 6;
    pub const FROSTBITTEN: u32 = 1 << 7;
    pub const BOUND: u32 = 1 << 8;
    pub const CURSED: u32 = 1 << 9;

    pub const NUM_FLAGS: u32 = 9;
    const MASK: u32 = ((1 << Self::NUM_FLAGS) - 1) << 1;

    /// Flag bits paired with their display names, in declaration order.
    const NAMES: [(u32, &'static str); 9] = [
        (Self::BURNED, "Burned"),
        (Self::FROZEN, "Frozen"),
        (Self::PARALYSED, "Paralysed"),
        (Self::POISONED, "Poisoned"),
        (Self::ASLEEP, "Asleep"),
        (Self::DROWSY, "Drowsy"),
        (Self::FROSTBITTEN, "Frostbitten"),
        (Self::BOUND, "Bound"),
        (Self::CURSED, "Cursed"),
    ];

    /// A condition with no ailments.
    pub const fn normal() -> Self {
        Self { flags: 0 }
    }

    /// Build from a combination of the flag constants. Unknown bits are dropped.
    pub const fn new(flags: u32) -> Self {
        Self {
            flags: flags & Self::MASK,
        }
    }

    /// Build from a raw stored bitmask, rejecting negative or unrecognized bits.
    ///
    /// # Errors
    /// - if `bits` is negative or has a bit set beyond the known flags
    pub fn try_from_bits(bits: i64) -> Result<Self, FlagError> {
        check_bits("status condition", bits, Self::MASK).map(|flags| Self { flags })
    }

    /// Raw flags.
    pub const fn flags(self) -> u32 {
        self.flags
    }

    /// True if any of `flags` are set on this condition.
    pub const fn test_flags(self, flags: u32) -> bool {
        self.flags & flags != 0
    }

    pub const fn is_normal(self) -> bool {
        self.flags == 0
    }
    pub const fn is_burned(self) -> bool {
        self.test_flags(Self::BURNED)
    }
    pub const fn is_frozen(self) -> bool {
        self.test_flags(Self::FROZEN)
    }
    pub const fn is_paralysed(self) -> bool {
        self.test_flags(Self::PARALYSED)
    }
    pub const fn is_poisoned(self) -> bool {
        self.test_flags(Self::POISONED)
    }
    pub const fn is_asleep(self) -> bool {
        self.test_flags(Self::ASLEEP)
    }
    pub const fn is_drowsy(self) -> bool {
        self.test_flags(Self::DROWSY)
    }
    pub const fn is_frostbitten(self) -> bool {
        self.test_flags(Self::FROSTBITTEN)
    }
    pub const fn is_bound(self) -> bool {
        self.test_flags(Self::BOUND)
    }
    pub const fn is_cursed(self) -> bool {
        self.test_flags(Self::CURSED)
    }

    /// True if more than one ailment is active.
    pub const fn has_multiple_conditions(self) -> bool {
        self.flags.count_ones() > 1
    }

    /// Return a copy with `flags` switched on or off.
    #[must_use]
    pub const fn with(self, flags: u32, enabled: bool) -> Self {
        if enabled {
            Self::new(self.flags | flags)
        } else {
            Self::new(self.flags & !flags)
        }
    }

    /// Fixed-width bit vector view, index 0 being `BURNED`.
    pub fn to_bits(self) -> [bool; 9] {
        std::array::from_fn(|i| self.flags & (Self::BURNED << i) != 0)
    }

    /// Inverse of [`StatusCondition::to_bits`].
    pub fn from_bits(bits: [bool; 9]) -> Self {
        let flags = bits
            .iter()
            .enumerate()
            .filter(|(_, on)| **on)
            .fold(0, |acc, (i, _)| acc | (Self::BURNED << i));
        Self { flags }
    }

    /// Display names of every active flag, in declaration order.
    pub fn active_names(self) -> Vec<&'static str> {
        Self::NAMES
            .iter()
            .filter(|(flag, _)| self.test_flags(*flag))
            .map(|(_, name)| *name)
            .collect()
    }

    /// Flag bit for a display name, ignoring case.
    pub fn flag_named(name: &str) -> Option<u32> {
        Self::NAMES
            .iter()
            .find(|(_, n)| n.eq_ignore_ascii_case(name.trim()))
            .map(|(flag, _)| *flag)
    }

    /// Render for display.
    ///
    /// `as_list` joins every active flag with ", ". Otherwise only the first active
    /// flag is shown; a warning is logged if that hides other active flags.
    pub fn render(self, as_list: bool) -> String {
        if self.is_normal() {
            return "Normal".to_string();
        }
        let names = self.active_names();
        if as_list {
            names.join(", ")
        } else {
            if names.len() > 1 {
                warn!(
                    "status condition {:#b} rendered as a single value hides {} other flag(s)",
                    self.flags,
                    names.len() - 1
                );
            }
            names.first().map(ToString::to_string).unwrap_or_default()
        }
    }
}

impl fmt::Display for StatusCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(false))
    }
}

/// The difficulty levels a piece of content applies to.
///
/// No flags at all means the content applies to every difficulty ("Any").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Difficulty {
    flags: u32,
}

impl Difficulty {
    pub const EASY: u32 = 1 << 0;
    pub const MEDIUM: u32 = 1 << 1;
    pub const HARD: u32 = 1 << 2;

    pub const NUM_FLAGS: u32 = 3;

    const NAMES: [(u32, &'static str); 3] = [(Self::EASY, "Easy"), (Self::MEDIUM, "Medium"), (Self::HARD, "Hard")];

    /// Applies to all difficulties.
    pub const fn all() -> Self {
        Self { flags: 0 }
    }

    pub const fn easy() -> Self {
        Self { flags: Self::EASY }
    }

    pub const fn medium() -> Self {
        Self { flags: Self::MEDIUM }
    }

    pub const fn hard() -> Self {
        Self { flags: Self::HARD }
    }

    /// Build from a raw stored bitmask.
    ///
    /// # Errors
    /// - if `bits` is negative or has a bit set beyond easy/medium/hard
    pub fn try_from_bits(bits: i64) -> Result<Self, FlagError> {
        check_bits("difficulty", bits, (1 << Self::NUM_FLAGS) - 1).map(|flags| Self { flags })
    }

    pub const fn flags(self) -> u32 {
        self.flags
    }

    pub const fn test_flags(self, flags: u32) -> bool {
        self.flags & flags != 0
    }

    pub const fn applies_to_all(self) -> bool {
        self.flags == 0
    }

    /// True if this is easy, or applies to all difficulties.
    pub const fn applies_to_easy(self) -> bool {
        self.applies_to_all() || self.test_flags(Self::EASY)
    }
    pub const fn applies_to_medium(self) -> bool {
        self.applies_to_all() || self.test_flags(Self::MEDIUM)
    }
    pub const fn applies_to_hard(self) -> bool {
        self.applies_to_all() || self.test_flags(Self::HARD)
    }

    pub const fn applies_to_multiple_difficulties(self) -> bool {
        self.applies_to_all() || self.flags.count_ones() > 1
    }

    #[must_use]
    pub const fn with(self, flags: u32, enabled: bool) -> Self {
        let mask = (1 << Self::NUM_FLAGS) - 1;
        if enabled {
            Self {
                flags: (self.flags | flags) & mask,
            }
        } else {
            Self {
                flags: self.flags & !flags & mask,
            }
        }
    }

    pub fn to_bits(self) -> [bool; 3] {
        std::array::from_fn(|i| self.flags & (1 << i) != 0)
    }

    pub fn from_bits(bits: [bool; 3]) -> Self {
        let flags = bits
            .iter()
            .enumerate()
            .filter(|(_, on)| **on)
            .fold(0, |acc, (i, _)| acc | (1 << i));
        Self { flags }
    }

    /// Render for display; "Any" when applying to all difficulties.
    pub fn render(self, as_list: bool) -> String {
        if self.applies_to_all() {
            return "Any".to_string();
        }
        let names: Vec<&str> = Self::NAMES
            .iter()
            .filter(|(flag, _)| self.test_flags(*flag))
            .map(|(_, name)| *name)
            .collect();
        if as_list {
            names.join(", ")
        } else {
            if names.len() > 1 {
                warn!("difficulty {:#b} rendered as a single value hides other flags", self.flags);
            }
            names.first().map(ToString::to_string).unwrap_or_default()
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(false))
    }
}
