//! Server-rendered HTML.
//!
//! The page is plain HTML with two self-contained panels. Each panel carries a
//! small inline script for its browser-side behavior; there are no external
//! assets.
//!
//! # Structure
//!
//! - [`chat`]: chat widget panel
//! - [`trade`]: trade form panel

pub mod chat;
pub mod trade;

use crate::chat::ChatWidget;
use crate::trade::TradeForm;

/// Render the full page: heading plus the two panels side by side.
#[must_use]
pub fn page() -> String {
    let content = format!(
        r#"<div class="panels">
    {chat}
    {trade}
</div>"#,
        chat = chat::panel(&ChatWidget::new()),
        trade = trade::panel(&TradeForm::new()),
    );
    html_shell("Crypto AI Trader", &content)
}

/// Generate the HTML shell for the application.
fn html_shell(title: &str, content: &str) -> String {
    let title = escape_html(title);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <style>{STYLE}</style>
</head>
<body>
    <main class="page">
        <h1>{title}</h1>
        {content}
    </main>
</body>
</html>"#
    )
}

const STYLE: &str = r"
body { font-family: system-ui, sans-serif; margin: 0; padding: 2rem 1rem; }
.page { max-width: 56rem; margin: 0 auto; }
h1 { font-size: 2.25rem; text-align: center; margin-bottom: 2rem; }
.panels { display: grid; grid-template-columns: 1fr; gap: 2rem; }
@media (min-width: 768px) { .panels { grid-template-columns: 1fr 1fr; } }
.panel { border: 1px solid #d4d4d8; border-radius: 0.5rem; padding: 1rem; height: 500px; box-sizing: border-box; display: flex; flex-direction: column; }
.panel h2 { font-size: 1.5rem; margin: 0 0 1rem; }
.transcript { flex: 1; overflow: auto; margin-bottom: 1rem; }
.msg { margin-bottom: 0.5rem; white-space: pre-wrap; }
.msg-user { color: #2563eb; }
.msg-assistant { color: #16a34a; }
.chat-form { display: flex; }
.chat-form input { flex: 1; padding: 0.25rem 0.5rem; }
.field { margin-bottom: 1rem; }
.field label { display: block; margin-bottom: 0.5rem; }
.field input, .field select { width: 100%; box-sizing: border-box; padding: 0.25rem 0.5rem; }
.actions { display: flex; justify-content: space-between; }
.btn { color: #fff; border: 0; border-radius: 0.25rem; padding: 0.5rem 1rem; cursor: pointer; }
.btn-send { background: #3b82f6; }
.btn-buy { background: #22c55e; }
.btn-sell { background: #ef4444; }
";

/// Escape text for use in HTML content and attribute values.
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
