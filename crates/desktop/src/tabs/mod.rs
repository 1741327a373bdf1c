pub mod about_tab;
pub mod gallery_tab;
pub mod settings_tab;
