//! Page selection and the surrounding page template

use std::fmt::Write as _;

/// Heading shown on every page
pub const TITLE: &str = "Last Mile Optical Power Report";

/// Views selected by the `p` query parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    /// No `p`, or an empty one
    Main,
    /// `p=rep`
    Reports,
    /// `p=cfg`
    EditItems,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Main, Page::Reports, Page::EditItems];

    /// Resolve the `p` parameter; unknown values yield `None`
    pub fn from_param(param: Option<&str>) -> Option<Self> {
        match param.map(str::trim) {
            None | Some("") => Some(Page::Main),
            Some("rep") => Some(Page::Reports),
            Some("cfg") => Some(Page::EditItems),
            Some(_) => None,
        }
    }

    /// Link target for the navigation bar
    pub fn href(&self) -> &'static str {
        match self {
            Page::Main => "?",
            Page::Reports => "?p=rep",
            Page::EditItems => "?p=cfg",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Page::Main => "Main",
            Page::Reports => "Reports",
            Page::EditItems => "Edit Items",
        }
    }
}

/// Wrap a body fragment in the page header, navigation, and footer
pub fn layout(body: &str) -> String {
    let mut out = String::with_capacity(body.len() + 512);
    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html>\n<head>\n<title>Report</title>\n</head>\n<body>\n<h1>{}</h1>\n<hr>\n",
        TITLE
    );
    for page in Page::ALL {
        let _ = writeln!(out, "<a href=\"{}\">{}</a>", page.href(), page.label());
    }
    out.push_str("<br><hr>\n");
    out.push_str(body);
    out.push_str("\n<hr>\n</body>\n</html>\n");
    out
}
