//! Chat panel rendering.

use crate::session::{ChatEntry, EntryRole};

use super::escape_html;

/// Fallback assistant entry appended when a chat exchange fails for any
/// reason (transport, non-2xx, malformed reply).
pub const FALLBACK_REPLY: &str = "Sorry, I encountered an error. Please try again.";

/// Full chat panel: transcript log, typing indicator and input form.
///
/// The form swaps the re-rendered transcript into `#chat-log`; the input is
/// cleared on submit and disabled, together with the Send button, while a
/// request is in flight.
#[must_use]
pub fn panel(entries: &[ChatEntry]) -> String {
    format!(
        r##"<div class="chat-panel">
    <h2 class="panel-title">AI Chat Assistant</h2>
    <div id="chat-log" class="chat-log">{log}</div>
    <div id="typing" class="typing-indicator htmx-indicator">
        <span></span><span></span><span></span>
    </div>
    <form class="chat-form"
        hx-post="/chat"
        hx-target="#chat-log"
        hx-swap="innerHTML"
        hx-indicator="#typing"
        hx-disabled-elt="find input, find button"
        hx-on--before-request="this.reset()">
        <input type="text" name="message" placeholder="Type your message..."
            autocomplete="off" required>
        <button type="submit">Send</button>
    </form>
</div>"##,
        log = conversation_fragment(entries),
    )
}

/// Transcript fragment: one bubble row per entry, users on the right,
/// the assistant on the left.
#[must_use]
pub fn conversation_fragment(entries: &[ChatEntry]) -> String {
    entries.iter().map(bubble).collect()
}

fn bubble(entry: &ChatEntry) -> String {
    let side = match entry.role {
        EntryRole::User => "user",
        EntryRole::Assistant => "assistant",
    };
    format!(
        r#"<div class="bubble-row {side}"><div class="bubble {side}">{}</div></div>"#,
        escape_html(&entry.text)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(role: EntryRole, text: &str) -> ChatEntry {
        ChatEntry {
            role,
            text: text.to_string(),
        }
    }

    #[test]
    fn fragment_renders_roles_in_order() {
        let entries = [
            entry(EntryRole::User, "hello"),
            entry(EntryRole::Assistant, "Hi"),
        ];
        let html = conversation_fragment(&entries);

        let user_pos = html.find("bubble user").unwrap();
        let assistant_pos = html.find("bubble assistant").unwrap();
        assert!(user_pos < assistant_pos);
        assert!(html.contains(">hello<"));
        assert!(html.contains(">Hi<"));
    }

    #[test]
    fn fragment_escapes_entry_text() {
        let entries = [entry(EntryRole::User, "<script>alert(1)</script>")];
        let html = conversation_fragment(&entries);

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn panel_embeds_empty_log_and_form() {
        let html = panel(&[]);

        assert!(html.contains(r#"id="chat-log""#));
        assert!(html.contains(r#"hx-post="/chat""#));
        assert!(html.contains(r#"name="message""#));
    }
}
