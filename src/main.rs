use adw::Application;
use adw::prelude::*;

fn main() -> glib::ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let app = Application::builder()
        .application_id("io.labmentix.Client")
        .build();
    app.connect_activate(|app| {
        if let Err(e) = labmentix_gtk::storage::init() {
            log::warn!("history cache unavailable: {e}");
        }
        labmentix_gtk::app::build_ui(app);
    });
    app.run()
}
