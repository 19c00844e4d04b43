//! Effect kinds and the per-kind argument they carry.

use crate::project::ProjectionKind;
use crate::state::{MonTimed, PlayerTimed};

use super::error::ChainError;
use super::handlers::{self, EffectHandler};

/// Every effect an effect chain can name.
///
/// `None` occupies the zero slot and marks an invalid node; executing it
/// aborts the chain.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
    strum::EnumCount,
    strum::FromRepr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum EffectKind {
    #[default]
    None,

    // ===== control =====
    Random,
    Select,
    SetValue,
    ClearValue,

    // ===== player and monster upkeep =====
    Damage,
    HealHp,
    MonHealHp,
    Nourish,
    Cure,
    TimedSet,
    TimedInc,
    TimedIncNoRes,
    TimedDec,
    MonTimedInc,

    // ===== owned by outer subsystems =====
    Recall,
    DeepDescent,
    MapArea,
    Summon,

    // ===== movement and area =====
    Teleport,
    ThrustAway,
    ProjectLos,
    ProjectLosAware,
    LightArea,
    DarkenArea,

    // ===== projections =====
    Ball,
    Breath,
    Arc,
    Swarm,
    Star,
    StarBall,
    Bolt,
    Beam,
    BoltOrBeam,
    Line,
    Alter,
    BoltStatus,
    BoltStatusDam,
    BoltAware,
    Touch,
    TouchAware,
    Spot,
}

impl EffectKind {
    /// True for kinds whose dice count the children that follow them.
    pub const fn is_control(self) -> bool {
        matches!(self, EffectKind::Random | EffectKind::Select)
    }

    pub const fn is_valid(self) -> bool {
        !matches!(self, EffectKind::None)
    }

    /// What the node's subtype slot means for this kind.
    pub const fn subtype_kind(self) -> SubtypeKind {
        use EffectKind::*;
        match self {
            ProjectLos | ProjectLosAware | Ball | Breath | Arc | Swarm | Star | StarBall
            | Bolt | Beam | BoltOrBeam | Line | Alter | BoltStatus | BoltStatusDam
            | BoltAware | Touch | TouchAware | Spot => SubtypeKind::Projection,
            Cure | TimedSet | TimedInc | TimedIncNoRes | TimedDec => SubtypeKind::PlayerTimed,
            MonTimedInc => SubtypeKind::MonTimed,
            Nourish | Teleport | Summon => SubtypeKind::Number,
            _ => SubtypeKind::None,
        }
    }

    /// The code that runs for this kind, if any.
    ///
    /// Kinds without a handler (`Recall`, `MapArea`, ...) execute as
    /// successful no-ops; the subsystems that own them react to the chain
    /// separately.
    pub fn handler(self) -> Option<EffectHandler> {
        handlers::lookup(self)
    }
}

/// Interpretation of a node's subtype slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SubtypeKind {
    None,
    Projection,
    PlayerTimed,
    MonTimed,
    Number,
}

/// Kind-dependent argument of an effect node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Subtype {
    #[default]
    None,
    Projection(ProjectionKind),
    Timed(PlayerTimed),
    MonTimed(MonTimed),
    Value(i32),
}

impl Subtype {
    /// Named nourish modes, in subtype order.
    pub const NOURISH_MODES: [&'static str; 4] = ["INC_BY", "DEC_BY", "SET_TO", "INC_TO"];

    /// Resolves a subtype name in the context of `kind`.
    ///
    /// Projection and timed names use their data-file spelling (`FIRE`,
    /// `BLIND`); numeric subtypes accept plain integers, and nourish also
    /// accepts its mode names.
    pub fn parse(kind: EffectKind, name: &str) -> Result<Self, ChainError> {
        let name = name.trim();
        let unknown = || ChainError::UnknownSubtype {
            effect: kind,
            name: name.to_string(),
        };
        match kind.subtype_kind() {
            SubtypeKind::None if name.is_empty() || name == "NONE" => Ok(Subtype::None),
            SubtypeKind::None => Err(unknown()),
            SubtypeKind::Projection => name
                .parse()
                .map(Subtype::Projection)
                .map_err(|_| unknown()),
            SubtypeKind::PlayerTimed => name.parse().map(Subtype::Timed).map_err(|_| unknown()),
            SubtypeKind::MonTimed => name.parse().map(Subtype::MonTimed).map_err(|_| unknown()),
            SubtypeKind::Number => {
                if name.is_empty() {
                    return Ok(Subtype::Value(0));
                }
                if kind == EffectKind::Nourish
                    && let Some(mode) = Self::NOURISH_MODES.iter().position(|m| *m == name)
                {
                    return Ok(Subtype::Value(mode as i32));
                }
                name.parse().map(Subtype::Value).map_err(|_| unknown())
            }
        }
    }

    pub const fn projection(self) -> Option<ProjectionKind> {
        match self {
            Subtype::Projection(kind) => Some(kind),
            _ => None,
        }
    }

    pub const fn timed(self) -> Option<PlayerTimed> {
        match self {
            Subtype::Timed(kind) => Some(kind),
            _ => None,
        }
    }

    pub const fn mon_timed(self) -> Option<MonTimed> {
        match self {
            Subtype::MonTimed(kind) => Some(kind),
            _ => None,
        }
    }

    /// Numeric view: the raw value, or zero for non-numeric subtypes.
    pub const fn value(self) -> i32 {
        match self {
            Subtype::Value(v) => v,
            _ => 0,
        }
    }

    /// True when the subtype is set to anything but zero / none.
    pub const fn is_set(self) -> bool {
        match self {
            Subtype::None => false,
            Subtype::Value(v) => v != 0,
            _ => true,
        }
    }
}

/// How an effect's description template is filled in.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectInfoFormat {
    #[default]
    None,
    Dice,
    Heal,
    Const,
    Cure,
    Timed,
    Seen,
    Summ,
    Tele,
    Light,
    Ball,
    Spot,
    Breath,
    Bolt,
    #[strum(serialize = "BOLTD")]
    BoltDam,
    Touch,
}
