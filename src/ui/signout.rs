use gtk4 as gtk;
use gtk4::prelude::*;

use crate::nav::Route;
use crate::ui::Shell;

pub fn build(shell: &Shell) -> gtk::Widget {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 16);
    root.set_halign(gtk::Align::Center);
    root.set_valign(gtk::Align::Center);

    let title = gtk::Label::new(Some("Sign out of Labmentix?"));
    title.add_css_class("title-2");
    root.append(&title);

    let button = gtk::Button::with_label("Sign Out");
    button.add_css_class("destructive-action");
    button.add_css_class("pill");
    root.append(&button);

    let shell = shell.clone();
    button.connect_clicked(move |button| {
        button.set_sensitive(false);
        button.set_label("Signing out…");

        let client = shell.ctx.client.clone();
        let token = shell.ctx.auth.borrow().token().map(str::to_string);
        let shell = shell.clone();
        let button = button.clone();
        crate::utils::run_async_to_main(
            async move { client.sign_out(token.as_deref()).await },
            move |res| {
                button.set_sensitive(true);
                button.set_label("Sign Out");
                match res {
                    Ok(message) => {
                        log::info!("signed out: {}", message.as_deref().unwrap_or("ok"));
                        if let Err(e) = shell.ctx.auth.borrow_mut().clear_auth() {
                            log::error!("failed to persist auth state: {e}");
                        }
                        shell.refresh_nav();
                        shell.toast("You have signed out successfully!");
                        shell.navigate(Route::Home);
                    }
                    Err(e) => {
                        log::warn!("sign out failed: {e}");
                        shell.toast(&format!("Sign out failed: {}", e.user_message("please try again")));
                    }
                }
            },
        );
    });

    root.upcast()
}
