pub mod error;
pub mod packet_type;
pub mod player_controller;
