//! HTML pages: the memo list and the not-found fallback.
//!
//! Self-contained documents with inline CSS/JS, built with `format!`.

use crate::dates;
use dated_memo_types::Memo;

const STYLE: &str = r#"
  * { margin: 0; padding: 0; box-sizing: border-box; }
  body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #0f1117; color: #e0e0e0; padding: 20px; max-width: 860px; margin: 0 auto; }
  h1 { color: #58a6ff; margin-bottom: 8px; }
  .meta { color: #8b949e; font-size: 0.85em; margin-bottom: 20px; }
  form { display: flex; gap: 8px; margin-bottom: 24px; flex-wrap: wrap; }
  input { background: #161b22; border: 1px solid #30363d; color: #e0e0e0; border-radius: 6px; padding: 8px 10px; font-size: 0.9em; }
  input#text { flex: 1; min-width: 240px; }
  button { background: #238636; border: none; color: #fff; border-radius: 6px; padding: 8px 14px; cursor: pointer; }
  button.remove { background: #21262d; border: 1px solid #30363d; color: #f85149; padding: 4px 10px; font-size: 0.8em; }
  table { width: 100%; border-collapse: collapse; }
  th { background: #161b22; color: #8b949e; text-align: left; padding: 8px 12px; font-size: 0.85em; text-transform: uppercase; border-bottom: 1px solid #30363d; }
  td { padding: 8px 12px; border-bottom: 1px solid #21262d; font-size: 0.9em; vertical-align: top; }
  tr:hover { background: #161b22; }
  .when { white-space: nowrap; color: #d29922; }
  a { color: #58a6ff; }
"#;

const SCRIPT: &str = r#"
function post_form(url, data, what) {
  fetch(url, { method: 'POST', body: new URLSearchParams(data) })
    .then(resp => resp.text().then(body => [resp, body]))
    .then(([resp, body]) => {
      if (resp.ok && body === 'ok') {
        window.location.reload();
      } else {
        alert(what + ' failed: ' + (resp.ok ? body : resp.statusText));
      }
    })
    .catch(e => alert(what + ' failed: ' + e));
}

function create_memo(event) {
  event.preventDefault();
  post_form('/create_memo', {
    time: document.getElementById('time').value,
    text: document.getElementById('text').value,
  }, 'create memo');
}

function remove_memo(id) {
  post_form('/remove_memo', { id: id }, 'remove memo');
}
"#;

pub fn render_index(memos: &[Memo]) -> String {
    let mut rows = String::new();
    for m in memos {
        rows.push_str(&format!(
            "<tr><td class=\"when\" title=\"{date}\">{when}</td><td>{text}</td>\
             <td><button class=\"remove\" onclick=\"remove_memo('{id}')\">Remove</button></td></tr>\n",
            date = escape_html(&m.date),
            when = escape_html(&dates::humanize(&m.date)),
            text = escape_html(&m.text),
            id = escape_html(&m.id),
        ));
    }
    if rows.is_empty() {
        rows = "<tr><td colspan=\"3\">No memos yet.</td></tr>".to_string();
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Memos</title>
<style>{style}</style>
</head>
<body>
  <h1>Memos</h1>
  <p class="meta">{count} memo{plural}</p>

  <form onsubmit="create_memo(event)">
    <input id="time" name="time" placeholder="MM/DD/YYYY" required>
    <input id="text" name="text" placeholder="Memo">
    <button type="submit">Add</button>
  </form>

  <table>
    <thead><tr><th>When</th><th>Memo</th><th></th></tr></thead>
    <tbody>{rows}</tbody>
  </table>

  <script>{script}</script>
</body>
</html>"#,
        style = STYLE,
        count = memos.len(),
        plural = if memos.len() == 1 { "" } else { "s" },
        rows = rows,
        script = SCRIPT,
    )
}

pub fn render_not_found(bad_url: &str, linkback: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Page not found</title>
<style>{style}</style>
</head>
<body>
  <h1>Page not found</h1>
  <p class="meta">There is no page at <code>{bad_url}</code>.</p>
  <p><a href="{linkback}">Back to the memo list</a></p>
</body>
</html>"#,
        style = STYLE,
        bad_url = escape_html(bad_url),
        linkback = escape_html(linkback),
    )
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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
