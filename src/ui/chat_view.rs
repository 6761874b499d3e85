use gtk4 as gtk;
use gtk4::gio;
use gtk4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

use crate::api::models::Sender;
use crate::chat::{Attachment, ChatController, ChatError, Message, Turn};
use crate::ui::Shell;
use crate::utils::format_file_size;

pub struct ChatView;

impl ChatView {
    pub fn new(shell: &Shell) -> gtk::Widget {
        let root = gtk::Box::new(gtk::Orientation::Vertical, 6);
        root.set_margin_top(8);
        root.set_margin_bottom(8);
        root.set_margin_start(8);
        root.set_margin_end(8);

        let scroller = gtk::ScrolledWindow::builder()
            .vexpand(true)
            .hexpand(true)
            .build();
        let messages_box = gtk::Box::new(gtk::Orientation::Vertical, 10);
        messages_box.set_margin_start(12);
        messages_box.set_margin_end(12);
        scroller.set_child(Some(&messages_box));
        root.append(&scroller);

        let typing = gtk::Box::new(gtk::Orientation::Horizontal, 8);
        let spinner = gtk::Spinner::new();
        spinner.start();
        typing.append(&spinner);
        let typing_label = gtk::Label::new(Some("AI is thinking…"));
        typing_label.add_css_class("dim-label");
        typing.append(&typing_label);
        typing.set_visible(false);
        root.append(&typing);

        // Files picked for the next message.
        let pending: Rc<RefCell<Vec<Attachment>>> = Rc::new(RefCell::new(Vec::new()));
        let pending_box = gtk::Box::new(gtk::Orientation::Horizontal, 6);
        root.append(&pending_box);

        let input_row = gtk::Box::new(gtk::Orientation::Horizontal, 6);
        let attach_btn = gtk::Button::from_icon_name("mail-attachment-symbolic");
        attach_btn.set_tooltip_text(Some("Attach files"));
        let entry = gtk::Entry::new();
        entry.set_hexpand(true);
        entry.set_placeholder_text(Some("Type your message… (Enter to send)"));
        let send_btn = gtk::Button::with_label("Send");
        send_btn.add_css_class("suggested-action");
        input_row.append(&attach_btn);
        input_row.append(&entry);
        input_row.append(&send_btn);
        root.append(&input_row);

        let chat = shell.ctx.chat.clone();
        let render: Rc<dyn Fn()> = {
            let chat = chat.clone();
            let messages_box = messages_box.clone();
            let scroller = scroller.clone();
            let typing = typing.clone();
            Rc::new(move || {
                while let Some(child) = messages_box.first_child() {
                    messages_box.remove(&child);
                }
                for message in chat.snapshot() {
                    messages_box.append(&bubble(&message));
                }
                typing.set_visible(chat.is_loading());
                let adj = scroller.vadjustment();
                glib::idle_add_local_once(move || adj.set_value(adj.upper()));
            })
        };
        render();

        let render_pending: Rc<dyn Fn()> = {
            let pending = pending.clone();
            let pending_box = pending_box.clone();
            Rc::new(move || {
                while let Some(child) = pending_box.first_child() {
                    pending_box.remove(&child);
                }
                for file in pending.borrow().iter() {
                    let chip = gtk::Label::new(Some(&format!("{} ({})", file.name, format_file_size(file.size))));
                    chip.add_css_class("caption");
                    pending_box.append(&chip);
                }
                if !pending.borrow().is_empty() {
                    let clear = gtk::Button::from_icon_name("edit-clear-symbolic");
                    clear.add_css_class("flat");
                    clear.set_tooltip_text(Some("Remove attachments"));
                    let pending_for_clear = pending.clone();
                    let pending_box_for_clear = pending_box.clone();
                    clear.connect_clicked(move |_| {
                        pending_for_clear.borrow_mut().clear();
                        while let Some(child) = pending_box_for_clear.first_child() {
                            pending_box_for_clear.remove(&child);
                        }
                    });
                    pending_box.append(&clear);
                }
            })
        };

        // Send actions
        {
            let entry_for_send = entry.clone();
            let pending_for_send = pending.clone();
            let render = render.clone();
            let render_pending = render_pending.clone();
            let send: Rc<dyn Fn()> = Rc::new(move || {
                let text = entry_for_send.text().to_string();
                let files = pending_for_send.borrow().clone();
                match chat.begin(&text, files) {
                    Err(ChatError::EmptyInput) => {}
                    Ok(turn) => {
                        log::debug!("sending message {}", turn.user.id);
                        entry_for_send.set_text("");
                        pending_for_send.borrow_mut().clear();
                        render_pending();
                        render();
                        finish_turn(&chat, turn, render.clone());
                    }
                }
            });
            {
                let send = send.clone();
                send_btn.connect_clicked(move |_| (send)());
            }
            {
                let send = send.clone();
                entry.connect_activate(move |_| (send)());
            }
        }

        // Native chooser has to outlive the click handler.
        let chooser: Rc<RefCell<Option<gtk::FileChooserNative>>> = Rc::new(RefCell::new(None));
        {
            let root_for_dialog = root.clone();
            attach_btn.connect_clicked(move |_| {
                let parent = root_for_dialog.root().and_then(|r| r.downcast::<gtk::Window>().ok());
                let dialog = gtk::FileChooserNative::new(
                    Some("Attach files"),
                    parent.as_ref(),
                    gtk::FileChooserAction::Open,
                    Some("Attach"),
                    Some("Cancel"),
                );
                dialog.set_select_multiple(true);
                let pending = pending.clone();
                let render_pending = render_pending.clone();
                let chooser_for_response = chooser.clone();
                dialog.connect_response(move |dialog, response| {
                    if response == gtk::ResponseType::Accept {
                        let files = dialog.files();
                        for i in 0..files.n_items() {
                            let Some(path) = files
                                .item(i)
                                .and_then(|obj| obj.downcast::<gio::File>().ok())
                                .and_then(|file| file.path())
                            else {
                                continue;
                            };
                            match Attachment::from_path(path) {
                                Ok(file) => pending.borrow_mut().push(file),
                                Err(e) => log::warn!("skipping attachment: {e}"),
                            }
                        }
                        render_pending();
                    }
                    chooser_for_response.borrow_mut().take();
                });
                dialog.show();
                *chooser.borrow_mut() = Some(dialog);
            });
        }

        root.upcast()
    }
}

/// Waits for the assistant on the runtime, then redraws on the main loop.
fn finish_turn(chat: &ChatController, turn: Turn, render: Rc<dyn Fn()>) {
    let chat = chat.clone();
    crate::utils::run_async_to_main(async move { chat.finish(turn).await }, move |reply| {
        log::debug!("reply {} arrived", reply.id);
        render();
    });
}

fn bubble(message: &Message) -> gtk::Widget {
    let is_user = message.sender == Sender::User;
    let outer = gtk::Box::new(gtk::Orientation::Vertical, 2);
    outer.set_halign(if is_user { gtk::Align::End } else { gtk::Align::Start });

    let card = gtk::Box::new(gtk::Orientation::Vertical, 4);
    card.add_css_class("card");
    card.set_margin_top(2);
    for file in &message.files {
        let line = gtk::Label::new(Some(&format!("📄 {} · {}", file.name, format_file_size(file.size))));
        line.add_css_class("caption");
        line.set_halign(gtk::Align::Start);
        line.set_margin_start(10);
        line.set_margin_end(10);
        line.set_margin_top(6);
        card.append(&line);
    }
    if !message.content.is_empty() {
        let text = gtk::Label::new(Some(&message.content));
        text.set_wrap(true);
        text.set_selectable(true);
        text.set_xalign(0.0);
        text.set_max_width_chars(60);
        text.set_margin_top(8);
        text.set_margin_bottom(8);
        text.set_margin_start(10);
        text.set_margin_end(10);
        card.append(&text);
    }
    outer.append(&card);

    let stamp = gtk::Label::new(Some(
        &message.timestamp.with_timezone(&chrono::Local).format("%H:%M").to_string(),
    ));
    stamp.add_css_class("dim-label");
    stamp.add_css_class("caption");
    stamp.set_halign(if is_user { gtk::Align::End } else { gtk::Align::Start });
    outer.append(&stamp);
    outer.upcast()
}
