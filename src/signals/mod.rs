pub mod rolling_window;
