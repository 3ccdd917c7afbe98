//! The nine animatable region parameters and their fully-resolved form.
//!
//! A keyframe stores parameters sparsely (only what it authors); the
//! resolver produces a complete [`KeyframeValues`] with every field
//! populated, falling back to the per-parameter defaults below.

use serde::{Deserialize, Serialize};

/// One of the nine animatable parameters of a blur region.
///
/// `X/Y/Width/Height` are normalized to the source frame (0..1), `Rotation`
/// is degrees, the rest are normalized scalars.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Param {
    X,
    Y,
    Width,
    Height,
    Rotation,
    Strength,
    Feather,
    Opacity,
    CornerRadius,
}

impl Param {
    /// Fixed iteration order used everywhere a complete value set is built
    /// or digested.
    pub const ALL: [Param; 9] = [
        Param::X,
        Param::Y,
        Param::Width,
        Param::Height,
        Param::Rotation,
        Param::Strength,
        Param::Feather,
        Param::Opacity,
        Param::CornerRadius,
    ];

    /// Global default used when no keyframe authors this parameter.
    #[inline]
    pub fn default_value(self) -> f32 {
        match self {
            Param::X => 0.5,
            Param::Y => 0.5,
            Param::Width => 0.4,
            Param::Height => 0.25,
            Param::Rotation => 0.0,
            Param::Strength => 0.8,
            Param::Feather => 0.2,
            Param::Opacity => 1.0,
            Param::CornerRadius => 0.14,
        }
    }

    /// Canonical camelCase name, as used in persisted JSON documents.
    pub fn name(self) -> &'static str {
        match self {
            Param::X => "x",
            Param::Y => "y",
            Param::Width => "width",
            Param::Height => "height",
            Param::Rotation => "rotation",
            Param::Strength => "strength",
            Param::Feather => "feather",
            Param::Opacity => "opacity",
            Param::CornerRadius => "cornerRadius",
        }
    }

    /// Inverse of [`Param::name`]; unknown names return None so callers can
    /// skip parameters written by newer app versions.
    pub fn from_name(name: &str) -> Option<Param> {
        match name {
            "x" => Some(Param::X),
            "y" => Some(Param::Y),
            "width" => Some(Param::Width),
            "height" => Some(Param::Height),
            "rotation" => Some(Param::Rotation),
            "strength" => Some(Param::Strength),
            "feather" => Some(Param::Feather),
            "opacity" => Some(Param::Opacity),
            "cornerRadius" => Some(Param::CornerRadius),
            _ => None,
        }
    }

    #[inline]
    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

/// A fully-resolved parameter set: every field present, no options.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyframeValues {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub rotation: f32,
    pub strength: f32,
    pub feather: f32,
    pub opacity: f32,
    pub corner_radius: f32,
}

impl Default for KeyframeValues {
    fn default() -> Self {
        Self {
            x: Param::X.default_value(),
            y: Param::Y.default_value(),
            width: Param::Width.default_value(),
            height: Param::Height.default_value(),
            rotation: Param::Rotation.default_value(),
            strength: Param::Strength.default_value(),
            feather: Param::Feather.default_value(),
            opacity: Param::Opacity.default_value(),
            corner_radius: Param::CornerRadius.default_value(),
        }
    }
}

impl KeyframeValues {
    #[inline]
    pub fn get(&self, param: Param) -> f32 {
        match param {
            Param::X => self.x,
            Param::Y => self.y,
            Param::Width => self.width,
            Param::Height => self.height,
            Param::Rotation => self.rotation,
            Param::Strength => self.strength,
            Param::Feather => self.feather,
            Param::Opacity => self.opacity,
            Param::CornerRadius => self.corner_radius,
        }
    }

    #[inline]
    pub fn set(&mut self, param: Param, value: f32) {
        match param {
            Param::X => self.x = value,
            Param::Y => self.y = value,
            Param::Width => self.width = value,
            Param::Height => self.height = value,
            Param::Rotation => self.rotation = value,
            Param::Strength => self.strength = value,
            Param::Feather => self.feather = value,
            Param::Opacity => self.opacity = value,
            Param::CornerRadius => self.corner_radius = value,
        }
    }
}

/// Small set of parameters, used for the "enabled keyframe parameters"
/// toggle. Serializes as a list of parameter names.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Param>", into = "Vec<Param>")]
pub struct ParamSet(u16);

impl ParamSet {
    pub const EMPTY: ParamSet = ParamSet(0);

    pub fn all() -> Self {
        let mut set = ParamSet::EMPTY;
        for p in Param::ALL {
            set.insert(p);
        }
        set
    }

    #[inline]
    pub fn insert(&mut self, param: Param) {
        self.0 |= param.bit();
    }

    #[inline]
    pub fn remove(&mut self, param: Param) {
        self.0 &= !param.bit();
    }

    #[inline]
    pub fn contains(self, param: Param) -> bool {
        self.0 & param.bit() != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Param> {
        Param::ALL.into_iter().filter(move |p| self.contains(*p))
    }
}

impl FromIterator<Param> for ParamSet {
    fn from_iter<I: IntoIterator<Item = Param>>(iter: I) -> Self {
        let mut set = ParamSet::EMPTY;
        for p in iter {
            set.insert(p);
        }
        set
    }
}

impl From<Vec<Param>> for ParamSet {
    fn from(params: Vec<Param>) -> Self {
        params.into_iter().collect()
    }
}

impl From<ParamSet> for Vec<Param> {
    fn from(set: ParamSet) -> Self {
        set.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_roundtrip() {
        for p in Param::ALL {
            assert_eq!(Param::from_name(p.name()), Some(p));
        }
        assert_eq!(Param::from_name("saturation"), None);
    }

    #[test]
    fn param_set_basics() {
        let mut set = ParamSet::EMPTY;
        assert!(set.is_empty());
        set.insert(Param::X);
        set.insert(Param::Opacity);
        assert!(set.contains(Param::X));
        assert!(!set.contains(Param::Y));
        set.remove(Param::X);
        assert!(!set.contains(Param::X));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Param::Opacity]);
    }
}
