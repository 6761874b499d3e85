use adw::Application;
use adw::prelude::*;
use gtk4 as gtk;
use std::rc::Rc;

use crate::app::AppContext;
use crate::nav::Route;
use crate::ui::sidebar::Sidebar;

/// Handles every view gets: navigation, toasts and the shared context.
#[derive(Clone)]
pub struct Shell {
    pub ctx: Rc<AppContext>,
    stack: gtk::Stack,
    overlay: adw::ToastOverlay,
    sidebar: Sidebar,
}

impl Shell {
    pub fn navigate(&self, route: Route) {
        log::debug!("navigate to {}", route.name());
        self.stack.set_visible_child_name(route.name());
        self.sidebar.select(route);
    }

    pub fn toast(&self, message: &str) {
        self.overlay.add_toast(adw::Toast::new(message));
    }

    /// Rebuilds the nav links after the auth store changed.
    pub fn refresh_nav(&self) {
        let auth = self.ctx.auth.borrow().state().clone();
        self.sidebar.set_items(crate::nav::nav_items(&auth));
        if let Some(route) = self.stack.visible_child_name().and_then(|n| Route::from_name(&n)) {
            self.sidebar.select(route);
        }
    }
}

pub fn show_main_window(app: &Application, ctx: Rc<AppContext>) {
    let window = adw::ApplicationWindow::builder()
        .application(app)
        .title("Labmentix")
        .default_width(1040)
        .default_height(720)
        .build();

    let overlay = adw::ToastOverlay::new();
    let stack = gtk::Stack::builder()
        .transition_type(gtk::StackTransitionType::Crossfade)
        .hexpand(true)
        .vexpand(true)
        .build();

    let split = adw::Flap::builder()
        .reveal_flap(true)
        .locked(true)
        .modal(false)
        .build();

    let sidebar = Sidebar::new();
    split.set_flap(Some(&sidebar.widget()));
    split.set_content(Some(&stack));
    overlay.set_child(Some(&split));

    let shell = Shell { ctx, stack: stack.clone(), overlay, sidebar: sidebar.clone() };
    {
        let shell = shell.clone();
        sidebar.connect_route_activated(move |route| shell.navigate(route));
    }

    stack.add_named(&crate::ui::pages::home(&shell), Some(Route::Home.name()));
    stack.add_named(&crate::ui::pages::welcome(&shell), Some(Route::Welcome.name()));
    stack.add_named(&crate::ui::login::build(&shell), Some(Route::SignIn.name()));
    stack.add_named(&crate::ui::signup::build(&shell), Some(Route::SignUp.name()));
    stack.add_named(&crate::ui::chat_view::ChatView::new(&shell), Some(Route::Chat.name()));
    stack.add_named(&crate::ui::history::build(&shell), Some(Route::History.name()));
    stack.add_named(&crate::ui::signout::build(&shell), Some(Route::SignOut.name()));

    let container = gtk::Box::new(gtk::Orientation::Vertical, 0);
    let header = adw::HeaderBar::new();
    let title = adw::WindowTitle::new("Labmentix", "AI Powered Platform");
    header.set_title_widget(Some(&title));
    container.append(&header);
    container.append(&shell.overlay);
    window.set_content(Some(&container));

    shell.refresh_nav();
    shell.navigate(Route::Home);
    window.present();
}

/// Shown instead of the main window when the configuration is unusable.
pub fn show_startup_error(app: &Application, message: &str) {
    let window = adw::ApplicationWindow::builder()
        .application(app)
        .title("Labmentix")
        .default_width(420)
        .default_height(200)
        .build();
    let page = adw::StatusPage::builder()
        .icon_name("dialog-error-symbolic")
        .title("Cannot start Labmentix")
        .description(format!(
            "{message}\n\nCheck backend_url in labmentix.toml or set {}.",
            crate::config::BACKEND_URL_ENV
        ))
        .build();
    window.set_content(Some(&page));
    window.present();
}
