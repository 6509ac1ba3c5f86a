//! Effect kinds and their families

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// What a resolution call is about
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum EffectKind {
    // Psychic
    Psi,
    PsiDrain,
    Telekinesis,

    // Holy
    AwayUndead,
    AwayEvil,
    AwayAll,
    TurnUndead,
    TurnEvil,
    TurnAll,
    DispUndead,
    DispEvil,
    DispGood,
    DispDemon,
    DispLiving,
    DispAll,

    // Elemental
    Fire,
    Cold,
    Elec,
    Acid,
    Poison,
    Missile,

    // Mental
    OldConfuse,
    OldSleep,
    OldSlow,
}

/// Rule family an effect kind is resolved by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[repr(u8)]
pub enum EffectFamily {
    Psychic,
    Holy,
    Elemental,
    Mental,
}

impl EffectKind {
    pub const fn family(self) -> EffectFamily {
        match self {
            EffectKind::Psi | EffectKind::PsiDrain | EffectKind::Telekinesis => {
                EffectFamily::Psychic
            }
            EffectKind::AwayUndead
            | EffectKind::AwayEvil
            | EffectKind::AwayAll
            | EffectKind::TurnUndead
            | EffectKind::TurnEvil
            | EffectKind::TurnAll
            | EffectKind::DispUndead
            | EffectKind::DispEvil
            | EffectKind::DispGood
            | EffectKind::DispDemon
            | EffectKind::DispLiving
            | EffectKind::DispAll => EffectFamily::Holy,
            EffectKind::Fire
            | EffectKind::Cold
            | EffectKind::Elec
            | EffectKind::Acid
            | EffectKind::Poison
            | EffectKind::Missile => EffectFamily::Elemental,
            EffectKind::OldConfuse | EffectKind::OldSleep | EffectKind::OldSlow => {
                EffectFamily::Mental
            }
        }
    }

    /// Gaze-type effects fail when the target cannot see the caster
    pub const fn requires_sight(self) -> bool {
        matches!(self, EffectKind::Psi | EffectKind::PsiDrain)
    }

    /// Teleport-away effects
    pub const fn is_away(self) -> bool {
        matches!(
            self,
            EffectKind::AwayUndead | EffectKind::AwayEvil | EffectKind::AwayAll
        )
    }

    /// Turn (frighten) effects
    pub const fn is_turn(self) -> bool {
        matches!(
            self,
            EffectKind::TurnUndead | EffectKind::TurnEvil | EffectKind::TurnAll
        )
    }
}
