pub use app::App;

mod app;
