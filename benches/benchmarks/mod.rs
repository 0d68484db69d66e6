pub mod cursor_movement;
pub mod typing;
