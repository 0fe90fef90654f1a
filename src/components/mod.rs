pub mod app;
pub mod board_view;
pub mod controls_panel;
pub mod game_over_overlay;
pub mod stats_panel;
pub mod time_display;
