//! Chat widget panel.

use std::fmt::Write;

use crate::chat::ChatWidget;
use crate::llm::MessageRole;

use super::escape_html;

/// Browser side of the widget: keeps the transcript, posts it to the relay and
/// appends the reply as it streams in. A failed call leaves the transcript as is.
const SCRIPT: &str = r"
(() => {
  const root = document.getElementById('chat-widget');
  const list = root.querySelector('.transcript');
  const form = root.querySelector('form');
  const input = form.querySelector('input[name=message]');
  const messages = [];

  const render = () => {
    list.replaceChildren(...messages.map((m) => {
      const row = document.createElement('div');
      row.className = 'msg msg-' + m.role;
      const label = document.createElement('strong');
      label.textContent = m.role === 'user' ? 'You: ' : 'AI: ';
      row.append(label, m.content);
      return row;
    }));
  };

  form.addEventListener('submit', async (event) => {
    event.preventDefault();
    messages.push({ role: 'user', content: input.value });
    input.value = '';
    render();

    const response = await fetch('/api/chat', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({ messages }),
    });
    if (!response.ok) return;

    const reader = response.body.pipeThrough(new TextDecoderStream()).getReader();
    for (;;) {
      const { value, done } = await reader.read();
      if (done) break;
      if (!value) continue;
      const last = messages[messages.length - 1];
      if (last.role === 'assistant') last.content += value;
      else messages.push({ role: 'assistant', content: value });
      render();
    }
  });
})();
";

/// Render the chat panel with the widget's current transcript and input.
#[must_use]
pub fn panel(widget: &ChatWidget) -> String {
    let mut rows = String::new();
    for message in widget.transcript() {
        let role = match message.role {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        };
        let _ = write!(
            rows,
            r#"<div class="msg msg-{role}"><strong>{label}</strong>{content}</div>"#,
            label = message.role.label(),
            content = escape_html(&message.content),
        );
    }

    format!(
        r#"<section id="chat-widget" class="panel">
        <h2>AI Assistant</h2>
        <div class="transcript" aria-live="polite">{rows}</div>
        <form class="chat-form">
            <input name="message" value="{input}" placeholder="Ask about crypto trading..." autocomplete="off">
            <button class="btn btn-send" type="submit">Send</button>
        </form>
        <script>{SCRIPT}</script>
    </section>"#,
        input = escape_html(widget.input()),
    )
}
