use gtk4 as gtk;
use gtk4::prelude::*;

use crate::api::models::HistoryEntry;
use crate::ui::Shell;

fn fill(list: &gtk::ListBox, entries: &[HistoryEntry]) {
    while let Some(child) = list.first_child() {
        list.remove(&child);
    }
    for entry in entries {
        let row = gtk::Box::new(gtk::Orientation::Vertical, 2);
        row.set_margin_top(6);
        row.set_margin_bottom(6);
        row.set_margin_start(8);
        row.set_margin_end(8);

        let text = gtk::Label::new(None);
        text.set_markup(&format!(
            "<b>{}:</b> {}",
            entry.kind.as_str(),
            glib::markup_escape_text(&entry.content)
        ));
        text.set_wrap(true);
        text.set_xalign(0.0);
        row.append(&text);

        if let Some(ts) = entry.timestamp {
            let when = gtk::Label::new(Some(
                &ts.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S").to_string(),
            ));
            when.add_css_class("dim-label");
            when.add_css_class("caption");
            when.set_xalign(0.0);
            row.append(&when);
        }
        list.append(&row);
    }
}

pub fn build(shell: &Shell) -> gtk::Widget {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 8);
    root.set_margin_top(12);
    root.set_margin_bottom(12);
    root.set_margin_start(12);
    root.set_margin_end(12);

    let title = gtk::Label::new(Some("Chat History"));
    title.add_css_class("title-2");
    title.set_halign(gtk::Align::Start);
    root.append(&title);

    let error = gtk::Label::new(None);
    error.add_css_class("error");
    error.set_halign(gtk::Align::Start);
    error.set_visible(false);
    root.append(&error);

    let list = gtk::ListBox::new();
    list.set_selection_mode(gtk::SelectionMode::None);
    list.add_css_class("boxed-list");
    let scroller = gtk::ScrolledWindow::builder().vexpand(true).child(&list).build();
    root.append(&scroller);

    // Reload every time the page is shown.
    let shell = shell.clone();
    root.connect_map(move |_| {
        let limit = shell.ctx.config.history_limit;
        match crate::storage::cached_history(limit) {
            Ok(cached) => fill(&list, &cached),
            Err(e) => log::warn!("history cache unavailable: {e}"),
        }

        let client = shell.ctx.client.clone();
        let token = shell.ctx.auth.borrow().token().map(str::to_string);
        let list = list.clone();
        let error = error.clone();
        crate::utils::run_async_to_main(
            async move { client.chat_history(token.as_deref()).await },
            move |res| match res {
                Ok(entries) => {
                    if let Err(e) = crate::storage::upsert_history(&entries, limit) {
                        log::warn!("failed to cache history: {e}");
                    }
                    error.set_visible(false);
                    fill(&list, &entries);
                }
                Err(e) => {
                    log::warn!("history fetch failed: {e}");
                    error.set_label("Failed to fetch chat history");
                    error.set_visible(true);
                }
            },
        );
    });

    root.upcast()
}
