//! The player actor

mod you;

pub use you::{
    process_player_status, set_player_timed, take_hit, MimicEntry, Player, PlayerClass,
    PlayerStatus, PlayerTimed,
};
