use gtk4 as gtk;
use gtk4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

use crate::nav::{NavItem, Route};

#[derive(Clone)]
pub struct Sidebar {
    root: gtk::Box,
    list: gtk::ListBox,
    items: Rc<RefCell<Vec<NavItem>>>,
}

impl Sidebar {
    pub fn new() -> Self {
        let root = gtk::Box::new(gtk::Orientation::Vertical, 6);
        root.set_margin_top(8);
        root.set_margin_bottom(8);
        root.set_margin_start(8);
        root.set_margin_end(8);
        root.set_width_request(200);

        let title = gtk::Label::new(Some("Labmentix"));
        title.add_css_class("heading");
        title.set_halign(gtk::Align::Start);
        root.append(&title);

        let list = gtk::ListBox::new();
        list.add_css_class("navigation-sidebar");
        list.set_selection_mode(gtk::SelectionMode::Single);
        root.append(&list);

        Self { root, list, items: Rc::new(RefCell::new(Vec::new())) }
    }

    pub fn widget(&self) -> gtk::Widget {
        self.root.clone().upcast()
    }

    pub fn connect_route_activated<F: Fn(Route) + 'static>(&self, f: F) {
        let items = self.items.clone();
        self.list.connect_row_activated(move |_, row| {
            let route = usize::try_from(row.index())
                .ok()
                .and_then(|idx| items.borrow().get(idx).map(|item| item.route));
            if let Some(route) = route {
                f(route);
            }
        });
    }

    pub fn set_items(&self, items: Vec<NavItem>) {
        while let Some(child) = self.list.first_child() {
            self.list.remove(&child);
        }
        for item in &items {
            let row = gtk::ListBoxRow::new();
            let content = gtk::Box::new(gtk::Orientation::Horizontal, 10);
            content.set_margin_top(8);
            content.set_margin_bottom(8);
            content.set_margin_start(8);
            content.set_margin_end(8);
            content.append(&gtk::Image::from_icon_name(item.icon));
            let label = gtk::Label::new(Some(item.label));
            label.set_halign(gtk::Align::Start);
            content.append(&label);
            row.set_child(Some(&content));
            self.list.append(&row);
        }
        *self.items.borrow_mut() = items;
    }

    /// Highlights the link for `route`, or nothing when it has no link.
    pub fn select(&self, route: Route) {
        let idx = self.items.borrow().iter().position(|item| item.route == route);
        match idx.and_then(|i| self.list.row_at_index(i as i32)) {
            Some(row) => self.list.select_row(Some(&row)),
            None => self.list.unselect_all(),
        }
    }
}
