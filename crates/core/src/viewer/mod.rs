pub mod gallery;
pub mod overlay_controller;
pub mod view_state;
