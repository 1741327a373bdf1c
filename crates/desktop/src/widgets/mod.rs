pub mod overlay_canvas;
pub mod thumbnail_card;
