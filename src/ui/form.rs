use gtk4 as gtk;
use gtk4::prelude::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::forms::{Field, FormState};

#[derive(Clone)]
struct FieldRow {
    field: Field,
    input: gtk::Editable,
    error: gtk::Label,
}

/// Binds a [`FormState`] to entries, inline error labels and a submit button.
#[derive(Clone)]
pub struct FormView {
    root: gtk::Box,
    state: Rc<RefCell<FormState>>,
    rows: Rc<Vec<FieldRow>>,
    submit: gtk::Button,
    idle_label: &'static str,
    busy_label: &'static str,
    busy: Rc<Cell<bool>>,
}

impl FormView {
    pub fn new(state: FormState, idle_label: &'static str, busy_label: &'static str) -> Self {
        let root = gtk::Box::new(gtk::Orientation::Vertical, 8);
        let mut rows = Vec::new();
        for field in state.fields() {
            let label = gtk::Label::new(Some(field.label()));
            label.add_css_class("heading");
            label.set_halign(gtk::Align::Start);
            root.append(&label);

            let input: gtk::Editable = match field {
                Field::Password => {
                    let entry = gtk::PasswordEntry::new();
                    entry.set_show_peek_icon(true);
                    entry.set_hexpand(true);
                    entry.upcast()
                }
                _ => {
                    let entry = gtk::Entry::new();
                    entry.set_hexpand(true);
                    if field == Field::Email {
                        entry.set_input_purpose(gtk::InputPurpose::Email);
                    }
                    entry.upcast()
                }
            };
            root.append(&input);

            let error = gtk::Label::new(None);
            error.add_css_class("error");
            error.set_halign(gtk::Align::Start);
            error.set_visible(false);
            root.append(&error);

            rows.push(FieldRow { field, input, error });
        }

        let submit = gtk::Button::with_label(idle_label);
        submit.add_css_class("suggested-action");
        submit.add_css_class("pill");
        submit.set_margin_top(12);
        submit.set_sensitive(false);
        root.append(&submit);

        let view = Self {
            root,
            state: Rc::new(RefCell::new(state)),
            rows: Rc::new(rows),
            submit,
            idle_label,
            busy_label,
            busy: Rc::new(Cell::new(false)),
        };
        view.wire_inputs();
        view
    }

    fn wire_inputs(&self) {
        for row in self.rows.iter() {
            {
                let view = self.clone();
                let field = row.field;
                row.input.connect_changed(move |input| {
                    view.state.borrow_mut().change(field, &input.text());
                    view.refresh();
                });
            }
            {
                let view = self.clone();
                let field = row.field;
                let focus = gtk::EventControllerFocus::new();
                focus.connect_leave(move |_| {
                    view.state.borrow_mut().blur(field);
                    view.refresh();
                });
                row.input.add_controller(focus);
            }
            {
                // Enter in any field submits.
                let submit = self.submit.clone();
                if let Some(entry) = row.input.downcast_ref::<gtk::Entry>() {
                    entry.connect_activate(move |_| {
                        submit.emit_clicked();
                    });
                } else if let Some(entry) = row.input.downcast_ref::<gtk::PasswordEntry>() {
                    entry.connect_activate(move |_| {
                        submit.emit_clicked();
                    });
                }
            }
        }
    }

    fn refresh(&self) {
        let state = self.state.borrow();
        for row in self.rows.iter() {
            match state.error(row.field) {
                Some(err) => {
                    row.error.set_label(err);
                    row.error.set_visible(true);
                }
                None => row.error.set_visible(false),
            }
        }
        self.submit.set_sensitive(!self.busy.get() && state.is_submittable());
    }

    pub fn widget(&self) -> gtk::Widget {
        self.root.clone().upcast()
    }

    pub fn value(&self, field: Field) -> String {
        self.state.borrow().value(field).to_string()
    }

    /// Calls `f` only when every field validates. Otherwise the errors are
    /// shown and nothing is sent.
    pub fn connect_submit<F: Fn(&FormView) + 'static>(&self, f: F) {
        let view = self.clone();
        self.submit.connect_clicked(move |_| {
            if view.busy.get() {
                return;
            }
            let valid = view.state.borrow_mut().validate_all();
            view.refresh();
            if valid {
                f(&view);
            }
        });
    }

    pub fn set_busy(&self, busy: bool) {
        self.busy.set(busy);
        self.submit.set_label(if busy { self.busy_label } else { self.idle_label });
        for row in self.rows.iter() {
            row.input.set_sensitive(!busy);
        }
        self.refresh();
    }

    pub fn reset(&self) {
        self.state.borrow_mut().reset();
        for row in self.rows.iter() {
            row.input.set_text("");
        }
        self.refresh();
    }
}
