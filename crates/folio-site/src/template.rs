//! HTML page chrome.
//!
//! Every page shares one layout: head with stylesheets, navigation bar with
//! a theme toggle, a `<main>` element and a footer. Page bodies are plain
//! string building; all text from content files is escaped here.

use std::fmt::Write;

use folio_mail::ContactOutcome;
use folio_renderer::{HeadingEntry, escape_html};

use crate::page::PostMeta;

pub(crate) const STYLESHEET: &str = "/assets/site.css";
pub(crate) const HIGHLIGHT_LIGHT: &str = "/assets/highlight-light.css";
pub(crate) const HIGHLIGHT_DARK: &str = "/assets/highlight-dark.css";
pub(crate) const SCRIPT: &str = "/assets/site.js";

/// Navigation bar entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Nav {
    Home,
    Blog,
    About,
    Contact,
}

impl Nav {
    const ALL: [Self; 4] = [Self::Home, Self::Blog, Self::About, Self::Contact];

    fn href(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Blog => "/blog",
            Self::About => "/about",
            Self::Contact => "/contact",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Blog => "Blog",
            Self::About => "About",
            Self::Contact => "Contact",
        }
    }
}

/// Site identity used by every page.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Chrome<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub author: Option<&'a str>,
}

impl Chrome<'_> {
    fn page_title(&self, page: Option<&str>) -> String {
        match page {
            Some(page) if page != self.title => format!("{page} · {}", self.title),
            _ => self.title.to_owned(),
        }
    }

    /// Wrap `main` in the shared layout.
    fn layout(&self, page_title: Option<&str>, active: Option<Nav>, main: &str) -> String {
        let mut out = String::with_capacity(main.len() + 2048);

        out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
        out.push_str(
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
        );
        writeln!(
            out,
            "<title>{}</title>",
            escape_html(&self.page_title(page_title))
        )
        .unwrap();
        writeln!(
            out,
            "<meta name=\"description\" content=\"{}\">",
            escape_html(self.description)
        )
        .unwrap();
        writeln!(out, "<link rel=\"stylesheet\" href=\"{STYLESHEET}\">").unwrap();
        writeln!(
            out,
            "<link rel=\"stylesheet\" href=\"{HIGHLIGHT_LIGHT}\" id=\"highlight-light\">"
        )
        .unwrap();
        writeln!(
            out,
            "<link rel=\"stylesheet\" href=\"{HIGHLIGHT_DARK}\" id=\"highlight-dark\" disabled>"
        )
        .unwrap();
        writeln!(out, "<script src=\"{SCRIPT}\" defer></script>").unwrap();
        out.push_str("</head>\n<body>\n");

        self.navbar(&mut out, active);

        out.push_str("<main>\n");
        out.push_str(main);
        if !main.ends_with('\n') {
            out.push('\n');
        }
        out.push_str("</main>\n");

        self.footer(&mut out);
        out.push_str("</body>\n</html>\n");
        out
    }

    fn navbar(&self, out: &mut String, active: Option<Nav>) {
        out.push_str("<nav class=\"navbar\">\n");
        writeln!(
            out,
            "<a class=\"navbar-brand\" href=\"/\">{}</a>",
            escape_html(self.title)
        )
        .unwrap();
        out.push_str("<ul class=\"navbar-links\">\n");
        for item in Nav::ALL {
            if Some(item) == active {
                writeln!(
                    out,
                    "<li><a class=\"active\" href=\"{}\" aria-current=\"page\">{}</a></li>",
                    item.href(),
                    item.label()
                )
                .unwrap();
            } else {
                writeln!(out, "<li><a href=\"{}\">{}</a></li>", item.href(), item.label()).unwrap();
            }
        }
        out.push_str("</ul>\n");
        out.push_str(
            "<button type=\"button\" class=\"theme-toggle\" aria-label=\"Toggle dark mode\">◐</button>\n",
        );
        out.push_str("</nav>\n");
    }

    fn footer(&self, out: &mut String) {
        out.push_str("<footer class=\"footer\">\n");
        match self.author {
            Some(author) => writeln!(
                out,
                "<p>{} by {}</p>",
                escape_html(self.title),
                escape_html(author)
            )
            .unwrap(),
            None => writeln!(out, "<p>{}</p>", escape_html(self.title)).unwrap(),
        }
        out.push_str("</footer>\n");
    }
}

/// Full page for one post.
pub(crate) fn post(chrome: &Chrome<'_>, meta: &PostMeta, content: &str, toc: &[HeadingEntry]) -> String {
    let mut main = String::with_capacity(content.len() + 1024);

    main.push_str("<div class=\"post-layout\">\n<article class=\"post\">\n");
    post_header(&mut main, meta);
    main.push_str("<div class=\"post-content\">\n");
    main.push_str(content);
    if !content.ends_with('\n') {
        main.push('\n');
    }
    main.push_str("</div>\n</article>\n");
    toc_aside(&mut main, toc);
    main.push_str("</div>\n");

    chrome.layout(Some(&meta.title), Some(Nav::Blog), &main)
}

fn post_header(out: &mut String, meta: &PostMeta) {
    out.push_str("<header class=\"post-header\">\n");
    writeln!(out, "<h1 class=\"post-title\">{}</h1>", escape_html(&meta.title)).unwrap();

    out.push_str("<p class=\"post-meta\">");
    if let Some(author) = &meta.author {
        write!(out, "<span class=\"post-author\">{}</span>", escape_html(author)).unwrap();
    }
    if let Some(date) = &meta.date {
        date_element(out, meta, date);
    }
    write!(
        out,
        "<span class=\"post-read-time\">{}</span>",
        escape_html(&meta.read_time)
    )
    .unwrap();
    out.push_str("</p>\n");

    if let Some(image) = &meta.image {
        writeln!(
            out,
            "<img class=\"post-cover\" src=\"{}\" alt=\"{}\">",
            escape_html(image),
            escape_html(&meta.title)
        )
        .unwrap();
    }
    if let Some(description) = &meta.description {
        writeln!(
            out,
            "<p class=\"post-description\">{}</p>",
            escape_html(description)
        )
        .unwrap();
    }
    out.push_str("</header>\n");
}

fn date_element(out: &mut String, meta: &PostMeta, display: &str) {
    match meta.published {
        Some(date) => write!(
            out,
            "<time datetime=\"{}\">{}</time>",
            date.format("%Y-%m-%d"),
            escape_html(display)
        )
        .unwrap(),
        None => write!(out, "<time>{}</time>", escape_html(display)).unwrap(),
    }
}

/// "On this page" navigation. Nothing at all for an empty list.
fn toc_aside(out: &mut String, toc: &[HeadingEntry]) {
    if toc.is_empty() {
        return;
    }

    out.push_str("<aside class=\"toc\" aria-label=\"On this page\">\n");
    out.push_str("<p class=\"toc-title\">On this page</p>\n<ul>\n");
    for entry in toc {
        writeln!(
            out,
            "<li><a href=\"#{}\">{}</a></li>",
            escape_html(&entry.anchor),
            escape_html(&entry.text)
        )
        .unwrap();
    }
    out.push_str("</ul>\n</aside>\n");
}

fn card(out: &mut String, meta: &PostMeta) {
    out.push_str("<article class=\"card\">\n");
    writeln!(out, "<a class=\"card-link\" href=\"{}\">", escape_html(&meta.url())).unwrap();
    if let Some(image) = &meta.image {
        writeln!(
            out,
            "<img class=\"card-image\" src=\"{}\" alt=\"\" loading=\"lazy\">",
            escape_html(image)
        )
        .unwrap();
    }
    writeln!(out, "<h3 class=\"card-title\">{}</h3>", escape_html(&meta.title)).unwrap();
    out.push_str("</a>\n<p class=\"card-meta\">");
    if let Some(date) = &meta.date {
        date_element(out, meta, date);
    }
    write!(out, "<span>{}</span>", escape_html(&meta.read_time)).unwrap();
    out.push_str("</p>\n");
    if let Some(description) = &meta.description {
        writeln!(
            out,
            "<p class=\"card-description\">{}</p>",
            escape_html(description)
        )
        .unwrap();
    }
    if !meta.tags.is_empty() {
        out.push_str("<ul class=\"card-tags\">");
        for tag in &meta.tags {
            write!(out, "<li>{}</li>", escape_html(tag)).unwrap();
        }
        out.push_str("</ul>\n");
    }
    out.push_str("</article>\n");
}

fn card_grid(out: &mut String, posts: &[PostMeta]) {
    if posts.is_empty() {
        out.push_str("<p class=\"empty\">No posts yet.</p>\n");
        return;
    }
    out.push_str("<div class=\"cards\">\n");
    for meta in posts {
        card(out, meta);
    }
    out.push_str("</div>\n");
}

/// Landing page: hero block and the most recent posts.
pub(crate) fn home(chrome: &Chrome<'_>, recent: &[PostMeta]) -> String {
    let mut main = String::new();

    main.push_str("<section class=\"hero\">\n");
    writeln!(main, "<h1>{}</h1>", escape_html(chrome.title)).unwrap();
    writeln!(main, "<p>{}</p>", escape_html(chrome.description)).unwrap();
    main.push_str("<a class=\"button\" href=\"/blog\">Read the blog</a>\n</section>\n");

    main.push_str("<section class=\"recent\">\n<h2>Recent posts</h2>\n");
    card_grid(&mut main, recent);
    main.push_str("</section>\n");

    chrome.layout(None, Some(Nav::Home), &main)
}

/// Index of every post.
pub(crate) fn blog_index(chrome: &Chrome<'_>, posts: &[PostMeta]) -> String {
    let mut main = String::from("<section class=\"blog-index\">\n<h1>Blog</h1>\n");
    card_grid(&mut main, posts);
    main.push_str("</section>\n");

    chrome.layout(Some("Blog"), Some(Nav::Blog), &main)
}

/// About page around an already rendered body.
pub(crate) fn about(chrome: &Chrome<'_>, content: &str) -> String {
    let mut main = String::from("<article class=\"page\">\n");
    main.push_str(content);
    if !content.ends_with('\n') {
        main.push('\n');
    }
    main.push_str("</article>\n");

    chrome.layout(Some("About"), Some(Nav::About), &main)
}

/// About body used when no `about` page exists.
pub(crate) fn default_about(chrome: &Chrome<'_>) -> String {
    let mut out = String::from("<h1>About</h1>\n");
    writeln!(out, "<p>{}</p>", escape_html(chrome.description)).unwrap();
    if let Some(author) = chrome.author {
        writeln!(out, "<p>Written by {}.</p>", escape_html(author)).unwrap();
    }
    out
}

/// Contact form, with a banner after a submission.
pub(crate) fn contact(chrome: &Chrome<'_>, status: Option<ContactOutcome>) -> String {
    let mut main = String::from("<section class=\"contact\">\n<h1>Contact</h1>\n");

    match status {
        Some(ContactOutcome::Sent) => main.push_str(
            "<div class=\"banner banner-success\" role=\"status\">Thanks! Your message has been sent.</div>\n",
        ),
        Some(ContactOutcome::Failed) => main.push_str(
            "<div class=\"banner banner-error\" role=\"alert\">Sorry, your message could not be sent. Please try again later.</div>\n",
        ),
        None => {}
    }

    main.push_str(concat!(
        "<form class=\"contact-form\" method=\"post\" action=\"/contact\">\n",
        "<label for=\"name\">Name</label>\n",
        "<input id=\"name\" name=\"name\" type=\"text\" required>\n",
        "<label for=\"email\">Email</label>\n",
        "<input id=\"email\" name=\"email\" type=\"email\" required>\n",
        "<label for=\"message\">Message</label>\n",
        "<textarea id=\"message\" name=\"message\" rows=\"6\" required></textarea>\n",
        "<button type=\"submit\">Send</button>\n",
        "</form>\n",
    ));
    main.push_str("</section>\n");

    chrome.layout(Some("Contact"), Some(Nav::Contact), &main)
}

/// Page shown for an unknown path or slug.
pub(crate) fn not_found(chrome: &Chrome<'_>, path: &str) -> String {
    let mut main = String::from("<section class=\"not-found\">\n<h1>Page not found</h1>\n");
    writeln!(
        main,
        "<p>Nothing lives at <code>{}</code>.</p>",
        escape_html(path)
    )
    .unwrap();
    main.push_str("<p><a href=\"/blog\">Browse all posts</a> or <a href=\"/\">go home</a>.</p>\n");
    main.push_str("</section>\n");

    chrome.layout(Some("Not found"), None, &main)
}
