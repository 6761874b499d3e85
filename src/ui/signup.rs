use gtk4 as gtk;
use gtk4::prelude::*;

use crate::forms::{Field, FormState};
use crate::nav::Route;
use crate::ui::Shell;
use crate::ui::form::FormView;
use crate::ui::login::{auth_page, link_row};

pub fn build(shell: &Shell) -> gtk::Widget {
    let root = auth_page("Create Account", "Join our community today");

    let form = FormView::new(FormState::sign_up(shell.ctx.rules), "Create Account", "Creating Account…");
    root.append(&form.widget());
    root.append(&link_row("Already have an account?", "Sign in here", shell, Route::SignIn));

    let shell = shell.clone();
    form.connect_submit(move |form| {
        let name = form.value(Field::Name).trim().to_string();
        let email = form.value(Field::Email);
        let password = form.value(Field::Password);
        form.set_busy(true);

        let client = shell.ctx.client.clone();
        let shell = shell.clone();
        let form = form.clone();
        crate::utils::run_async_to_main(
            async move { client.sign_up(&name, &email, &password).await },
            move |res| {
                form.set_busy(false);
                let signed_in = match shell.ctx.auth.borrow_mut().record_sign_up(&res) {
                    Ok(signed_in) => signed_in,
                    Err(e) => {
                        log::error!("failed to persist auth state: {e}");
                        shell.toast(&format!("Failed to save session: {e}"));
                        matches!(&res, Ok(reply) if reply.token.is_some())
                    }
                };
                shell.refresh_nav();
                match res {
                    Ok(_) if signed_in => {
                        form.reset();
                        shell.toast("Welcome aboard!");
                        shell.navigate(Route::Chat);
                    }
                    Ok(_) => {
                        form.reset();
                        shell.toast("Account created, please sign in.");
                        shell.navigate(Route::SignIn);
                    }
                    Err(e) => {
                        log::warn!("sign up failed: {e}");
                        shell.toast(&e.user_message("Sign up failed. Please try again."));
                    }
                }
            },
        );
    });

    root.upcast()
}
