pub mod app;
pub mod controls_panel;
pub mod prize_banner;
pub mod reel_view;
pub mod settings_modal;
pub mod winner_modal;
