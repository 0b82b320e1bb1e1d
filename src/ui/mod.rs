//! Server-rendered HTML for the console.
//!
//! Pages are rendered as plain strings: a full document shell plus
//! per-component content, with HTMX handling form posts and fragment swaps.
//! Each component also exposes a fragment renderer that the POST handlers
//! use to swap updated state back into the page.
//!
//! Everything that renders user-supplied text goes through [`escape_html`].

pub mod chat;
pub mod email;
pub mod sms;

/// Color theme, carried as a cookie and passed explicitly into every render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    /// Light theme (the default for first-time visitors).
    #[default]
    Light,
    /// Dark theme.
    Dark,
}

impl Theme {
    /// Parse the `theme` cookie value; anything unrecognized falls back to
    /// the default.
    #[must_use]
    pub fn from_cookie(value: Option<&str>) -> Self {
        match value {
            Some("dark") => Self::Dark,
            _ => Self::Light,
        }
    }

    /// Cookie value and `<html>` class for this theme.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// The other theme.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    fn toggle_icon(self) -> &'static str {
        match self {
            Self::Light => "\u{1f31e}",
            Self::Dark => "\u{1f319}",
        }
    }
}

/// The active component in the page shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    /// Conversational chat panel.
    Chat,
    /// Email send form.
    Email,
    /// SMS send form.
    Sms,
}

impl Tab {
    fn label(self) -> &'static str {
        match self {
            Self::Chat => "Chat",
            Self::Email => "Email",
            Self::Sms => "SMS",
        }
    }

    fn href(self) -> &'static str {
        match self {
            Self::Chat => "/",
            Self::Email => "/email",
            Self::Sms => "/sms",
        }
    }
}

/// Outcome of a form submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// The gateway accepted the request.
    Success,
    /// The request failed; the form is re-rendered with its draft intact.
    Error,
}

/// Last operation's human-readable outcome, overwritten per attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    /// Success or failure.
    pub kind: StatusKind,
    /// Banner text shown to the user.
    pub text: String,
}

impl StatusLine {
    /// A success status.
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            text: text.into(),
        }
    }

    /// A failure status.
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }
}

/// Escape text for interpolation into HTML content or attribute values.
#[must_use]
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render a status banner fragment.
#[must_use]
pub fn status_banner(status: &StatusLine) -> String {
    let class = match status.kind {
        StatusKind::Success => "status-banner success",
        StatusKind::Error => "status-banner error",
    };
    format!(
        r#"<div class="{class}" role="status">{}</div>"#,
        escape_html(&status.text)
    )
}

/// Generate the full HTML document for a page.
pub fn html_shell(title: &str, theme: Theme, active: Tab, content: &str) -> String {
    let nav: String = [Tab::Chat, Tab::Email, Tab::Sms]
        .into_iter()
        .map(|tab| {
            let class = if tab == active {
                "nav-link active"
            } else {
                "nav-link"
            };
            format!(
                r#"<a href="{}" class="{class}">{}</a>"#,
                tab.href(),
                tab.label()
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en" class="{theme_class}">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="description" content="Chat, email and SMS console">
    <title>{title} - Courier</title>

    <!-- HTMX (local) -->
    <script src="/static/vendor/htmx-2.0.8.min.js"></script>

    <link rel="stylesheet" href="/static/app.css">
</head>
<body>
    <div id="app-shell">
        <header class="shell-header">
            <a href="/" class="brand">Courier</a>
            <nav class="shell-nav">{nav}</nav>
            <button class="theme-toggle" type="button" title="Toggle theme"
                hx-post="/theme/toggle" hx-swap="none">{icon}</button>
        </header>

        <main id="app">
            {content}
        </main>

        <footer class="shell-footer">
            <p>Powered by a remote messaging gateway</p>
        </footer>
    </div>
</body>
</html>"#,
        theme_class = theme.as_str(),
        icon = theme.toggle_icon(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_html_covers_markup_characters() {
        assert_eq!(
            escape_html(r#"<b>&"quote"&'tick'</b>"#),
            "&lt;b&gt;&amp;&quot;quote&quot;&amp;&#39;tick&#39;&lt;/b&gt;"
        );
        assert_eq!(escape_html("plain text"), "plain text");
    }

    #[test]
    fn theme_cookie_round_trip() {
        assert_eq!(Theme::from_cookie(Some("dark")), Theme::Dark);
        assert_eq!(Theme::from_cookie(Some("light")), Theme::Light);
        assert_eq!(Theme::from_cookie(Some("???")), Theme::Light);
        assert_eq!(Theme::from_cookie(None), Theme::Light);

        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled().as_str(), "light");
    }

    #[test]
    fn shell_marks_active_tab_and_theme() {
        let page = html_shell("Chat", Theme::Dark, Tab::Chat, "<p>hello</p>");

        assert!(page.contains(r#"<html lang="en" class="dark">"#));
        assert!(page.contains(r#"<a href="/" class="nav-link active">Chat</a>"#));
        assert!(page.contains(r#"<a href="/email" class="nav-link">Email</a>"#));
        assert!(page.contains("<p>hello</p>"));
    }

    #[test]
    fn status_banner_escapes_text() {
        let banner = status_banner(&StatusLine::error("<detail>"));
        assert!(banner.contains("status-banner error"));
        assert!(banner.contains("&lt;detail&gt;"));
    }
}
