//! `Var` encodings for the model's value types.

use dark_data::{
    CardinalDirection, Colour, Difficulty, DoorLockState, Material, MoveCategory, MoveType, Nature, Rectangle,
    StairDirection, StatusCondition, TileType, WindowTileType,
};

use crate::tree::{Var, VarKind};

/// Two-way conversion between a field's value type and its stored [`Var`].
pub trait VarCodec: Sized + Clone {
    /// Primitive shape the value is stored as.
    const KIND: VarKind;

    fn to_var(&self) -> Var;

    /// Decode a stored value. `None` if the shape is wrong or the value is out of range.
    fn from_var(var: &Var) -> Option<Self>;

    /// Parse user-typed text (e.g. from a cheat command).
    fn parse_text(text: &str) -> Option<Self> {
        Var::from_attribute(text, Self::KIND).and_then(|v| Self::from_var(&v))
    }

    /// Human-readable form.
    fn describe(&self) -> String {
        self.to_var().to_string()
    }
}

impl VarCodec for bool {
    const KIND: VarKind = VarKind::Bool;

    fn to_var(&self) -> Var {
        Var::Bool(*self)
    }

    fn from_var(var: &Var) -> Option<Self> {
        match var {
            Var::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn parse_text(text: &str) -> Option<Self> {
        match text.to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        }
    }
}

impl VarCodec for i32 {
    const KIND: VarKind = VarKind::Int;

    fn to_var(&self) -> Var {
        Var::Int(i64::from(*self))
    }

    fn from_var(var: &Var) -> Option<Self> {
        match var {
            Var::Int(i) => i32::try_from(*i).ok(),
            _ => None,
        }
    }
}

impl VarCodec for f64 {
    const KIND: VarKind = VarKind::Double;

    fn to_var(&self) -> Var {
        Var::Double(*self)
    }

    fn from_var(var: &Var) -> Option<Self> {
        var.as_double().filter(|d| d.is_finite())
    }
}

impl VarCodec for String {
    const KIND: VarKind = VarKind::String;

    fn to_var(&self) -> Var {
        Var::String(self.clone())
    }

    fn from_var(var: &Var) -> Option<Self> {
        var.as_str().map(str::to_string)
    }
}

impl VarCodec for Vec<i32> {
    const KIND: VarKind = VarKind::IntArray;

    fn to_var(&self) -> Var {
        Var::Array(self.iter().map(|i| Var::Int(i64::from(*i))).collect())
    }

    fn from_var(var: &Var) -> Option<Self> {
        var.as_array()?.iter().map(i32::from_var).collect()
    }
}

impl VarCodec for Rectangle {
    const KIND: VarKind = VarKind::String;

    fn to_var(&self) -> Var {
        Var::String(self.to_string())
    }

    fn from_var(var: &Var) -> Option<Self> {
        var.as_str().and_then(Rectangle::parse)
    }
}

impl VarCodec for Colour {
    const KIND: VarKind = VarKind::String;

    fn to_var(&self) -> Var {
        Var::String(self.to_string())
    }

    fn from_var(var: &Var) -> Option<Self> {
        var.as_str().and_then(Colour::parse)
    }
}

/// Enumerations are stored as their integer tag and typed by their display name.
macro_rules! tag_codec {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl VarCodec for $ty {
                const KIND: VarKind = VarKind::Int;

                fn to_var(&self) -> Var {
                    Var::Int(self.tag())
                }

                fn from_var(var: &Var) -> Option<Self> {
                    match var {
                        Var::Int(tag) => <$ty>::from_tag(*tag),
                        _ => None,
                    }
                }

                fn parse_text(text: &str) -> Option<Self> {
                    if let Ok(tag) = text.trim().parse::<i64>() {
                        return <$ty>::from_tag(tag);
                    }
                    let wanted = text.trim().to_lowercase().replace(['_', '-'], " ");
                    <$ty>::ALL.into_iter().find(|v| v.to_string().to_lowercase() == wanted)
                }

                fn describe(&self) -> String {
                    self.to_string()
                }
            }
        )+
    };
}

tag_codec!(
    CardinalDirection,
    DoorLockState,
    Material,
    MoveCategory,
    MoveType,
    Nature,
    StairDirection,
    TileType,
    WindowTileType,
);

impl VarCodec for StatusCondition {
    const KIND: VarKind = VarKind::Int;

    fn to_var(&self) -> Var {
        Var::Int(i64::from(self.flags()))
    }

    fn from_var(var: &Var) -> Option<Self> {
        match var {
            Var::Int(bits) => StatusCondition::try_from_bits(*bits).ok(),
            _ => None,
        }
    }

    /// Accepts a bitmask or comma separated condition names ("burned,poisoned", "normal").
    fn parse_text(text: &str) -> Option<Self> {
        if let Ok(bits) = text.trim().parse::<i64>() {
            return StatusCondition::try_from_bits(bits).ok();
        }
        let mut condition = StatusCondition::normal();
        for word in text.split(',').map(str::trim) {
            if word.eq_ignore_ascii_case("normal") {
                continue;
            }
            condition = condition.with(StatusCondition::flag_named(word)?, true);
        }
        Some(condition)
    }

    fn describe(&self) -> String {
        self.render(true)
    }
}

impl VarCodec for Difficulty {
    const KIND: VarKind = VarKind::Int;

    fn to_var(&self) -> Var {
        Var::Int(i64::from(self.flags()))
    }

    fn from_var(var: &Var) -> Option<Self> {
        match var {
            Var::Int(bits) => Difficulty::try_from_bits(*bits).ok(),
            _ => None,
        }
    }

    fn parse_text(text: &str) -> Option<Self> {
        if let Ok(bits) = text.trim().parse::<i64>() {
            return Difficulty::try_from_bits(bits).ok();
        }
        let mut difficulty = Difficulty::all();
        for word in text.split(',').map(|w| w.trim().to_lowercase()) {
            let flag = match word.as_str() {
                "any" | "all" => continue,
                "easy" => Difficulty::EASY,
                "medium" => Difficulty::MEDIUM,
                "hard" => Difficulty::HARD,
                _ => return None,
            };
            difficulty = difficulty.with(flag, true);
        }
        Some(difficulty)
    }

    fn describe(&self) -> String {
        self.render(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enums_travel_as_tags() {
        assert_eq!(MoveType::Fire.to_var(), Var::Int(MoveType::Fire.tag()));
        assert_eq!(MoveType::from_var(&Var::Int(99)), None);
        assert_eq!(MoveType::from_var(&Var::from("fire")), None);
        assert_eq!(MoveType::parse_text("Fire"), Some(MoveType::Fire));
        assert_eq!(DoorLockState::parse_text("needs key"), Some(DoorLockState::NeedsKey));
    }

    #[test]
    fn flag_sets_reject_unknown_bits() {
        assert!(Difficulty::from_var(&Var::Int(1 << 5)).is_none());
        assert!(Difficulty::from_var(&Var::Int(-1)).is_none());
        assert!(StatusCondition::from_var(&Var::Int(1 << 10)).is_none());
        assert!(StatusCondition::from_var(&Var::Int(1)).is_none());
        let parsed = StatusCondition::parse_text("burned, poisoned").expect("names");
        assert!(parsed.is_burned() && parsed.is_poisoned());
        assert_eq!(Difficulty::parse_text("hard"), Some(Difficulty::hard()));
    }

    #[test]
    fn ints_must_fit() {
        assert_eq!(i32::from_var(&Var::Int(i64::MAX)), None);
        assert_eq!(Vec::<i32>::from_var(&Var::Array(vec![Var::Int(3), Var::Int(1)])), Some(vec![3, 1]));
        assert_eq!(Rectangle::from_var(&Var::from("1 2 3 4")), Some(Rectangle::new(1, 2, 3, 4)));
    }
}
