//! Email form rendering.

use crate::gateway::EmailDraft;

use super::{StatusLine, escape_html, status_banner};

/// Success status shown after the gateway accepts an email.
pub const SENT_STATUS: &str = "Email sent successfully!";
/// Generic failure status when the gateway supplied no detail.
pub const FAILED_STATUS: &str = "Failed to send email. Please try again later.";

/// Full email panel.
#[must_use]
pub fn panel() -> String {
    format!(
        r#"<div class="form-panel">
    <h2 class="panel-title">Send Email</h2>
    {form}
</div>"#,
        form = form_fragment(&EmailDraft::default(), None),
    )
}

/// Email form fragment, re-rendered after every submission.
///
/// Success passes an empty draft (fields cleared); failure passes the
/// submitted draft back (fields retained). The recipient field is
/// constrained to address-like syntax by the input type only.
#[must_use]
pub fn form_fragment(draft: &EmailDraft, status: Option<&StatusLine>) -> String {
    let banner = status.map(status_banner).unwrap_or_default();
    format!(
        r#"<form id="email-form" class="send-form"
    hx-post="/email"
    hx-swap="outerHTML"
    hx-disabled-elt="find button">
    <div class="field">
        <label for="email-to">To</label>
        <input type="email" id="email-to" name="to" value="{to}" required>
    </div>
    <div class="field">
        <label for="email-subject">Subject</label>
        <input type="text" id="email-subject" name="subject" value="{subject}" required>
    </div>
    <div class="field">
        <label for="email-body">Message</label>
        <textarea id="email-body" name="body" rows="4" required>{body}</textarea>
    </div>
    <button type="submit">Send Email</button>
    {banner}
</form>"#,
        to = escape_html(&draft.to),
        subject = escape_html(&draft.subject),
        body = escape_html(&draft.body),
    )
}
