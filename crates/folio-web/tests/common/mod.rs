//! Shared portfolio page fixture.

#![allow(dead_code)]

use folio_core::element::ElementHandle;
use folio_core::geometry::Rect;
use folio_web::memory::{ElementSpec, MemorySurface};

pub const VIEWPORT_WIDTH: f64 = 1280.0;
pub const VIEWPORT_HEIGHT: f64 = 800.0;

/// Handles into [`portfolio_page`].
#[derive(Debug, Clone)]
pub struct Portfolio {
    pub follower: ElementHandle,
    pub navbar: ElementHandle,
    pub nav_links: Vec<ElementHandle>,
    pub logo: ElementHandle,
    pub menu_button: ElementHandle,
    pub menu_icon: ElementHandle,
    pub menu_panel: ElementHandle,
    pub menu_close: ElementHandle,
    pub menu_link: ElementHandle,
    pub blobs: (ElementHandle, ElementHandle),
    pub home: ElementHandle,
    pub about: ElementHandle,
    pub skills: ElementHandle,
    pub testimonials: ElementHandle,
    pub contact: ElementHandle,
    pub expertise_card: ElementHandle,
    pub expertise_bar: ElementHandle,
    pub automation_card: ElementHandle,
    pub skill_bars: Vec<ElementHandle>,
    pub form: ElementHandle,
    pub name_input: ElementHandle,
    pub message_input: ElementHandle,
    pub submit: ElementHandle,
    pub toast: ElementHandle,
    pub toast_icon: ElementHandle,
    pub toast_title: ElementHandle,
    pub toast_message: ElementHandle,
    pub hero_title: ElementHandle,
}

fn band(top: f64, height: f64) -> Rect {
    Rect::new(0.0, top, VIEWPORT_WIDTH, height)
}

/// The portfolio page: five stacked sections, navigation, cards with
/// progress bars, a contact form and a toast.
///
/// | section | span |
/// |---|---|
/// | home | [0, 800) |
/// | about | [800, 1500) |
/// | skills | [1500, 2100) |
/// | (testimonials, no id) | [2100, 2400) |
/// | contact | [2400, 3200) |
pub fn portfolio_page() -> (MemorySurface, Portfolio) {
    let mut s = MemorySurface::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT);

    let follower = s.append_to_body(ElementSpec::new("div").id("mouseFollower"));

    let navbar = s.append_to_body(ElementSpec::new("nav").id("navbar"));
    let logo = s.append(navbar, ElementSpec::new("a").class("logo").attr("href", "#"));
    let nav_links = ["home", "about", "skills", "contact"]
        .iter()
        .map(|id| {
            s.append(
                navbar,
                ElementSpec::new("a")
                    .class("nav-link")
                    .attr("data-section", id)
                    .attr("href", &format!("#{id}")),
            )
        })
        .collect();

    let menu_button = s.append_to_body(ElementSpec::new("button").id("mobileMenuBtn"));
    let menu_icon = s.append(menu_button, ElementSpec::new("span").class("icon"));
    let menu_panel = s.append_to_body(ElementSpec::new("div").id("mobileMenu"));
    let menu_close = s.append(menu_panel, ElementSpec::new("button").id("mobileCloseBtn"));
    let menu_link = s.append(
        menu_panel,
        ElementSpec::new("a")
            .class("mobile-nav-link")
            .attr("href", "#about"),
    );

    let blob1 = s.append_to_body(ElementSpec::new("div").class("bg-blob-1"));
    let blob2 = s.append_to_body(ElementSpec::new("div").class("bg-blob-2"));

    let home = s.append_to_body(ElementSpec::new("section").id("home").rect(band(0.0, 800.0)));
    let hero_title = s.append(home, ElementSpec::new("h1").text("Hi, I'm Ada"));

    let about = s.append_to_body(ElementSpec::new("section").id("about").rect(band(800.0, 700.0)));
    let expertise_card = s.append(
        about,
        ElementSpec::new("div")
            .class("expertise-card")
            .rect(Rect::new(100.0, 900.0, 300.0, 200.0)),
    );
    let expertise_bar = s.append(
        expertise_card,
        ElementSpec::new("div")
            .class("progress-fill")
            .style("--width", "90%"),
    );

    let skills = s.append_to_body(ElementSpec::new("section").id("skills").rect(band(1500.0, 600.0)));
    let automation_card = s.append(
        skills,
        ElementSpec::new("div")
            .class("automation-card")
            .rect(Rect::new(100.0, 1600.0, 300.0, 400.0)),
    );
    let skill_bars = ["95%", "85%", "75%"]
        .iter()
        .map(|w| {
            s.append(
                automation_card,
                ElementSpec::new("div").class("progress-fill").style("--width", w),
            )
        })
        .collect();

    let testimonials = s.append_to_body(ElementSpec::new("section").rect(band(2100.0, 300.0)));

    let contact = s.append_to_body(ElementSpec::new("section").id("contact").rect(band(2400.0, 800.0)));
    let form = s.append(contact, ElementSpec::new("form").id("contactForm"));
    let name_input = s.append(form, ElementSpec::new("input").attr("name", "name").value(""));
    let message_input = s.append(form, ElementSpec::new("textarea").attr("name", "message").value(""));
    let submit = s.append(
        form,
        ElementSpec::new("button").id("submitBtn").text("Send Message"),
    );

    let toast = s.append_to_body(ElementSpec::new("div").id("toast"));
    let toast_icon = s.append(toast, ElementSpec::new("div").class("toast-icon"));
    let toast_title = s.append(toast, ElementSpec::new("h4").id("toastTitle"));
    let toast_message = s.append(toast, ElementSpec::new("p").id("toastMessage"));

    (
        s,
        Portfolio {
            follower,
            navbar,
            nav_links,
            logo,
            menu_button,
            menu_icon,
            menu_panel,
            menu_close,
            menu_link,
            blobs: (blob1, blob2),
            home,
            about,
            skills,
            testimonials,
            contact,
            expertise_card,
            expertise_bar,
            automation_card,
            skill_bars,
            form,
            name_input,
            message_input,
            submit,
            toast,
            toast_icon,
            toast_title,
            toast_message,
            hero_title,
        },
    )
}
