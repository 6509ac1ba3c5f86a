//! Engine-wide constants

/// Default projection range for bolts and `projectable`
pub const MAX_RANGE: i32 = 18;

/// Monsters farther than this never sense the player
pub const MAX_MONSTER_SENSING: i32 = 100;

/// Maximum distance the player can see
pub const MAX_PLAYER_SIGHT: i32 = 20;

/// Upper bound of every timed status counter
pub const TIMED_MAX: u16 = 10_000;

/// Size of the imitator's spell mimicry buffer
pub const MAX_MIMIC: usize = 16;

/// Hard cap on monster speed
pub const MAX_SPEED: i16 = 199;

/// Speed that yields 10 energy per game turn
pub const NORMAL_SPEED: i16 = 110;

/// Hard cap on monster maximum hit points
pub const MONSTER_MAXHP: i32 = 30_000;

/// Invulnerability is pierced one time in this many
pub const PENETRATE_INVULNERABILITY: i32 = 13;

/// Saturation point of byte-sized lore counters
pub const MAX_UCHAR: u8 = u8::MAX;

/// Energy gained per game turn, indexed by speed (110 = normal)
#[rustfmt::skip]
pub const EXTRACT_ENERGY: [u8; 200] = [
    /* Slow */     1,  1,  1,  1,  1,  1,  1,  1,  1,  1,
    /* Slow */     1,  1,  1,  1,  1,  1,  1,  1,  1,  1,
    /* Slow */     1,  1,  1,  1,  1,  1,  1,  1,  1,  1,
    /* Slow */     1,  1,  1,  1,  1,  1,  1,  1,  1,  1,
    /* Slow */     1,  1,  1,  1,  1,  1,  1,  1,  1,  1,
    /* Slow */     1,  1,  1,  1,  1,  1,  1,  1,  1,  1,
    /* S-50 */     1,  1,  1,  1,  1,  1,  1,  1,  1,  1,
    /* S-40 */     2,  2,  2,  2,  2,  2,  2,  2,  2,  2,
    /* S-30 */     2,  2,  2,  2,  2,  2,  2,  3,  3,  3,
    /* S-20 */     3,  3,  3,  3,  3,  4,  4,  4,  4,  4,
    /* S-10 */     5,  5,  5,  5,  6,  6,  7,  7,  8,  9,
    /* Norm */    10, 11, 12, 13, 14, 15, 16, 17, 18, 19,
    /* F+10 */    20, 21, 22, 23, 24, 25, 26, 27, 28, 29,
    /* F+20 */    30, 31, 32, 33, 34, 35, 36, 36, 37, 37,
    /* F+30 */    38, 38, 39, 39, 40, 40, 40, 41, 41, 41,
    /* F+40 */    42, 42, 42, 43, 43, 43, 44, 44, 44, 44,
    /* F+50 */    45, 45, 45, 45, 45, 46, 46, 46, 46, 46,
    /* F+60 */    47, 47, 47, 47, 47, 48, 48, 48, 48, 48,
    /* F+70 */    49, 49, 49, 49, 49, 49, 49, 49, 49, 49,
    /* Fast */    49, 49, 49, 49, 49, 49, 49, 49, 49, 49,
];

/// Energy per game turn for a given speed, clamped to the table.
pub fn speed_to_energy(speed: i16) -> i32 {
    let idx = speed.clamp(0, MAX_SPEED) as usize;
    i32::from(EXTRACT_ENERGY[idx])
}
