use gtk4 as gtk;
use gtk4::prelude::*;

use crate::forms::{Field, FormState};
use crate::nav::Route;
use crate::ui::Shell;
use crate::ui::form::FormView;

pub(crate) fn auth_page(title: &str, subtitle: &str) -> gtk::Box {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 12);
    root.set_margin_top(32);
    root.set_margin_bottom(32);
    root.set_margin_start(24);
    root.set_margin_end(24);
    root.set_halign(gtk::Align::Center);
    root.set_valign(gtk::Align::Center);
    root.set_width_request(380);

    let heading = gtk::Label::new(Some(title));
    heading.add_css_class("title-1");
    root.append(&heading);

    let sub = gtk::Label::new(Some(subtitle));
    sub.add_css_class("dim-label");
    sub.set_margin_bottom(12);
    root.append(&sub);
    root
}

pub(crate) fn link_row(prompt: &str, link: &str, shell: &Shell, route: Route) -> gtk::Box {
    let row = gtk::Box::new(gtk::Orientation::Horizontal, 4);
    row.set_halign(gtk::Align::Center);
    row.set_margin_top(12);
    let text = gtk::Label::new(Some(prompt));
    text.add_css_class("dim-label");
    row.append(&text);
    let button = gtk::Button::with_label(link);
    button.add_css_class("flat");
    let shell = shell.clone();
    button.connect_clicked(move |_| shell.navigate(route));
    row.append(&button);
    row
}

pub fn build(shell: &Shell) -> gtk::Widget {
    let root = auth_page("Welcome Back", "Sign in to continue your AI journey");

    let form = FormView::new(FormState::sign_in(shell.ctx.rules), "Sign In", "Signing In…");
    root.append(&form.widget());
    root.append(&link_row("Don't have an account?", "Create Account", shell, Route::SignUp));

    let shell = shell.clone();
    form.connect_submit(move |form| {
        let email = form.value(Field::Email);
        let password = form.value(Field::Password);
        form.set_busy(true);

        let client = shell.ctx.client.clone();
        let shell = shell.clone();
        let form = form.clone();
        crate::utils::run_async_to_main(
            async move { client.sign_in(&email, &password).await },
            move |res| {
                form.set_busy(false);
                if let Err(e) = shell.ctx.auth.borrow_mut().record_sign_in(&res) {
                    log::error!("failed to persist auth state: {e}");
                    shell.toast(&format!("Failed to save session: {e}"));
                }
                shell.refresh_nav();
                match res {
                    Ok(_) => {
                        log::info!("signed in");
                        form.reset();
                        shell.toast("Welcome back!");
                        shell.navigate(Route::Chat);
                    }
                    Err(e) => {
                        log::warn!("sign in failed: {e}");
                        shell.toast(&e.user_message("Invalid credentials. Please try again."));
                    }
                }
            },
        );
    });

    root.upcast()
}
