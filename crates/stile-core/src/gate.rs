//! The page gate.
//!
//! The portal's pages split into a public set (reachable signed out) and a
//! protected set (members only). The gate decides, from a page name and the
//! session state, whether the user belongs somewhere else.

/// Pages reachable without a session. The empty name is the site root.
pub const PUBLIC_PAGES: &[&str] = &["index.html", "signup.html", ""];

/// Pages that require a session.
pub const PROTECTED_PAGES: &[&str] = &["dashboard.html", "profile.html"];

/// Where a signed-out visitor lands.
pub const PUBLIC_LANDING: &str = "index.html";

/// Where a signed-in member lands.
pub const PROTECTED_LANDING: &str = "dashboard.html";

/// Which side of the gate a page sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageClass {
    Public,
    Protected,
    /// Not on either list; the gate leaves these alone.
    Unlisted,
}

/// Classifies a page name against the allowlists.
pub fn classify(page: &str) -> PageClass {
    if PUBLIC_PAGES.contains(&page) {
        PageClass::Public
    } else if PROTECTED_PAGES.contains(&page) {
        PageClass::Protected
    } else {
        PageClass::Unlisted
    }
}

/// Extracts the page name from a path: the part after the last slash.
///
/// `"/portal/dashboard.html"` is `"dashboard.html"`; a trailing slash
/// leaves the empty name, which counts as the site root.
pub fn page_name(path: &str) -> &str {
    path.rfind('/').map_or(path, |i| &path[i + 1..])
}

/// Decides whether `page` is the wrong place for the current session state.
///
/// Signed-in members don't belong on public pages and get sent to the
/// member landing; signed-out visitors don't belong on protected pages and
/// get sent to the public landing. Unlisted pages never redirect.
pub fn check_auth_state(page: &str, logged_in: bool) -> Option<&'static str> {
    match classify(page) {
        PageClass::Public if logged_in => Some(PROTECTED_LANDING),
        PageClass::Protected if !logged_in => Some(PUBLIC_LANDING),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Signed-in on a public page redirects to the member landing.
    #[test]
    fn test_logged_in_on_public_page_redirects() {
        assert_eq!(check_auth_state("index.html", true), Some("dashboard.html"));
        assert_eq!(
            check_auth_state("signup.html", true),
            Some("dashboard.html")
        );
        assert_eq!(check_auth_state("", true), Some("dashboard.html"));
    }

    /// Signed-out on a protected page redirects to the public landing.
    #[test]
    fn test_logged_out_on_protected_page_redirects() {
        assert_eq!(
            check_auth_state("dashboard.html", false),
            Some("index.html")
        );
        assert_eq!(check_auth_state("profile.html", false), Some("index.html"));
    }

    /// The right place for the current state stays put.
    #[test]
    fn test_matching_state_stays_put() {
        assert_eq!(check_auth_state("index.html", false), None);
        assert_eq!(check_auth_state("dashboard.html", true), None);
    }

    /// Unlisted pages never redirect, either way.
    #[test]
    fn test_unlisted_page_never_redirects() {
        assert_eq!(check_auth_state("about.html", true), None);
        assert_eq!(check_auth_state("about.html", false), None);
    }

    /// Page name is the final path segment; trailing slash means the root.
    #[test]
    fn test_page_name_extraction() {
        assert_eq!(page_name("/portal/dashboard.html"), "dashboard.html");
        assert_eq!(page_name("index.html"), "index.html");
        assert_eq!(page_name("/portal/"), "");
        assert_eq!(page_name(""), "");
    }

    /// The empty name classifies as public (site root).
    #[test]
    fn test_root_is_public() {
        assert_eq!(classify(""), PageClass::Public);
        assert_eq!(check_auth_state(page_name("/portal/"), true), Some("dashboard.html"));
    }
}
