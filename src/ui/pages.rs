//! Static marketing pages.

use gtk4 as gtk;
use gtk4::prelude::*;

use crate::nav::Route;
use crate::ui::Shell;

struct Feature {
    icon: &'static str,
    title: &'static str,
    body: &'static str,
}

const LAB_FEATURES: [Feature; 3] = [
    Feature {
        icon: "system-search-symbolic",
        title: "Advanced Research",
        body: "State-of-the-art laboratory equipment and methodologies for breakthrough scientific discoveries and research excellence.",
    },
    Feature {
        icon: "applications-science-symbolic",
        title: "Molecular Innovation",
        body: "Cutting-edge molecular analysis and synthesis technologies that push the boundaries of scientific understanding.",
    },
    Feature {
        icon: "utilities-system-monitor-symbolic",
        title: "Smart Analytics",
        body: "AI-powered data analysis and intelligent laboratory management systems for enhanced research efficiency.",
    },
];

const CHATBOT_FEATURES: [Feature; 3] = [
    Feature {
        icon: "user-available-symbolic",
        title: "Smart Conversations",
        body: "Engage in natural, intelligent conversations that understand context and provide meaningful responses.",
    },
    Feature {
        icon: "starred-symbolic",
        title: "Creative Solutions",
        body: "Get innovative ideas, creative writing assistance, and problem-solving support for any challenge.",
    },
    Feature {
        icon: "weather-storm-symbolic",
        title: "Lightning Fast",
        body: "Instant responses with powerful processing capabilities that adapt to your needs in real-time.",
    },
];

fn landing(
    shell: &Shell,
    title: &str,
    blurb: &str,
    features: &[Feature],
    cta: &str,
    target: Route,
) -> gtk::Widget {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 18);
    root.set_margin_top(40);
    root.set_margin_bottom(40);
    root.set_margin_start(40);
    root.set_margin_end(40);
    root.set_valign(gtk::Align::Center);

    let heading = gtk::Label::new(Some(title));
    heading.add_css_class("title-1");
    root.append(&heading);

    let intro = gtk::Label::new(Some(blurb));
    intro.set_wrap(true);
    intro.set_justify(gtk::Justification::Center);
    intro.set_max_width_chars(70);
    root.append(&intro);

    let cards = gtk::Box::new(gtk::Orientation::Horizontal, 12);
    cards.set_homogeneous(true);
    for feature in features {
        let card = gtk::Box::new(gtk::Orientation::Vertical, 6);
        card.add_css_class("card");
        let icon = gtk::Image::from_icon_name(feature.icon);
        icon.set_pixel_size(32);
        icon.set_margin_top(12);
        card.append(&icon);
        let name = gtk::Label::new(Some(feature.title));
        name.add_css_class("heading");
        card.append(&name);
        let body = gtk::Label::new(Some(feature.body));
        body.set_wrap(true);
        body.set_justify(gtk::Justification::Center);
        body.set_margin_start(12);
        body.set_margin_end(12);
        body.set_margin_bottom(12);
        card.append(&body);
        cards.append(&card);
    }
    root.append(&cards);

    let button = gtk::Button::with_label(cta);
    button.add_css_class("suggested-action");
    button.add_css_class("pill");
    button.set_halign(gtk::Align::Center);
    let shell = shell.clone();
    button.connect_clicked(move |_| shell.navigate(target));
    root.append(&button);

    root.upcast()
}

pub fn home(shell: &Shell) -> gtk::Widget {
    landing(
        shell,
        "Labmentix",
        "Welcome to the future of laboratory science. Experience cutting-edge solutions, advanced research tools, and innovative technologies that transform the way we understand and explore scientific frontiers.",
        &LAB_FEATURES,
        "Meet the AI Chatbot",
        Route::Welcome,
    )
}

pub fn welcome(shell: &Shell) -> gtk::Widget {
    landing(
        shell,
        "AI Chatbot",
        "Experience the next generation of conversational AI. Get instant answers, creative solutions, and intelligent assistance powered by cutting-edge technology.",
        &CHATBOT_FEATURES,
        "Start Chatting Now",
        Route::Chat,
    )
}
