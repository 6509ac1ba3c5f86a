//! UI invalidation flags
//!
//! The engine only ever inserts bits; the display layer reads and clears them.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RedrawFlags: u16 {
        const MANA = 0x0001;
        const HEALTH = 0x0002;
        const STATUS = 0x0004;
        /// Spell list window
        const SPELL_WINDOW = 0x0008;
        /// Imitator mimicry list
        const IMITATION = 0x0010;
        /// Recalculate bonuses (mount changed)
        const BONUS = 0x0020;
    }
}
