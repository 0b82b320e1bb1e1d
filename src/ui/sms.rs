//! SMS form rendering.

use crate::gateway::SmsDraft;

use super::{StatusLine, escape_html, status_banner};

/// Success status shown after the gateway accepts an SMS.
pub const SENT_STATUS: &str = "SMS sent successfully!";
/// Generic failure status when the gateway supplied no detail.
pub const FAILED_STATUS: &str = "Failed to send SMS";

/// Full SMS panel.
#[must_use]
pub fn panel() -> String {
    format!(
        r#"<div class="form-panel">
    <h2 class="panel-title">Send SMS</h2>
    {form}
</div>"#,
        form = form_fragment(&SmsDraft::default(), None),
    )
}

/// SMS form fragment, re-rendered after every submission.
///
/// The destination is digits only with a displayed "+" prefix; the length
/// guidance is advisory and not enforced here.
#[must_use]
pub fn form_fragment(draft: &SmsDraft, status: Option<&StatusLine>) -> String {
    let banner = status.map(status_banner).unwrap_or_default();
    format!(
        r#"<form id="sms-form" class="send-form"
    hx-post="/sms"
    hx-swap="outerHTML"
    hx-disabled-elt="find button">
    <div class="field">
        <label for="sms-to">Phone Number</label>
        <div class="phone-input">
            <span class="phone-prefix">+</span>
            <input type="tel" id="sms-to" name="to" value="{to}"
                placeholder="1234567890" pattern="[0-9]+" required>
        </div>
        <p class="field-hint">Enter the phone number without the + symbol (e.g., 1234567890)</p>
    </div>
    <div class="field">
        <label for="sms-message">Message</label>
        <textarea id="sms-message" name="message" rows="4" required>{message}</textarea>
        <p class="field-hint">Maximum length: 1600 characters</p>
    </div>
    <button type="submit">Send SMS</button>
    {banner}
</form>"#,
        to = escape_html(&draft.to),
        message = escape_html(&draft.message),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_form_is_empty_with_hints() {
        let html = form_fragment(&SmsDraft::default(), None);

        assert!(html.contains(r#"name="to" value="""#));
        assert!(html.contains("without the + symbol"));
        assert!(html.contains("Maximum length: 1600 characters"));
        assert!(!html.contains("status-banner"));
    }

    #[test]
    fn failed_form_retains_draft() {
        let draft = SmsDraft {
            to: "15551234567".to_string(),
            message: "hi there".to_string(),
        };
        let status = StatusLine::error(FAILED_STATUS);
        let html = form_fragment(&draft, Some(&status));

        assert!(html.contains(r#"value="15551234567""#));
        assert!(html.contains(">hi there</textarea>"));
        assert!(html.contains("Failed to send SMS"));
    }
}
