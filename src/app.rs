use adw::Application;
use std::cell::RefCell;
use std::rc::Rc;

use crate::api::ApiClient;
use crate::auth::AuthStore;
use crate::chat::ChatController;
use crate::config::Config;
use crate::forms::ValidationRules;

/// Everything the views share. Lives on the GTK main thread.
pub struct AppContext {
    pub config: Config,
    pub rules: ValidationRules,
    pub client: ApiClient,
    pub auth: RefCell<AuthStore>,
    pub chat: ChatController,
}

impl AppContext {
    pub fn load() -> Result<Self, crate::api::ApiError> {
        let config = Config::load();
        let client = ApiClient::from_config(&config)?;
        log::info!("using backend {}", client.base_url());
        Ok(Self {
            rules: ValidationRules::from(&config),
            chat: ChatController::new(client.clone()),
            auth: RefCell::new(AuthStore::load()),
            client,
            config,
        })
    }
}

pub fn build_ui(app: &Application) {
    let ctx = match AppContext::load() {
        Ok(ctx) => Rc::new(ctx),
        Err(e) => {
            log::error!("cannot start: {e}");
            crate::ui::main_window::show_startup_error(app, &e.to_string());
            return;
        }
    };
    crate::ui::main_window::show_main_window(app, ctx);
}
