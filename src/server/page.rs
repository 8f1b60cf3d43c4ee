//! The single-page UI served at `/`.

use crate::session::AnalysisKind;

const PAGE_TITLE: &str = "ATS Resume Expert";

const TEMPLATE: &str = r##"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{{TITLE}}</title>
<style>
  body { font-family: system-ui, sans-serif; max-width: 960px; margin: 2rem auto; padding: 0 1rem; }
  textarea { width: 100%; min-height: 8rem; }
  .actions button { margin: .25rem .25rem .25rem 0; }
  #notice { color: #1a7f37; min-height: 1.5rem; }
  #error { color: #cf222e; min-height: 1.5rem; }
  #result { white-space: pre-wrap; border-left: 3px solid #ccc; padding-left: 1rem; }
</style>
</head>
<body>
<h1>{{TITLE}}</h1>

<label for="jd">Job Description:</label>
<textarea id="jd"></textarea>

<p>
  <label for="resume">Upload your resume (PDF)...</label>
  <input type="file" id="resume" accept="application/pdf">
</p>

<div class="actions">
{{ACTION_BUTTONS}}
</div>

<p>
  <input type="text" id="question" size="60" placeholder="Ask a question about your resume">
  <button id="ask">💬 Chat</button>
</p>

<p><a id="download" href="#">📥 Download Summary Report</a></p>

<div id="notice"></div>
<div id="error"></div>
<h3 id="heading"></h3>
<div id="result"></div>

<script>
let sessionId = null;
const $ = (id) => document.getElementById(id);

async function session() {
  if (!sessionId) {
    const res = await fetch('/api/sessions', { method: 'POST' });
    sessionId = (await res.json()).session_id;
    $('download').href = `/api/sessions/${sessionId}/report`;
  }
  return sessionId;
}

async function pushJobDescription() {
  const id = await session();
  await fetch(`/api/sessions/${id}/job-description`, {
    method: 'PUT',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify({ text: $('jd').value }),
  });
}

function show(outcome) {
  $('notice').textContent = '';
  $('error').textContent = '';
  $('heading').textContent = '';
  $('result').textContent = '';
  if (outcome.status === 'completed') {
    $('notice').textContent = outcome.notice;
    $('heading').textContent = outcome.heading;
    $('result').textContent = outcome.text;
  } else if (outcome.status === 'failed') {
    $('error').textContent = outcome.message;
  } else if (outcome.error) {
    $('error').textContent = outcome.error.message;
  }
}

async function post(path, body) {
  $('notice').textContent = 'Analyzing...';
  await pushJobDescription();
  const id = await session();
  const res = await fetch(`/api/sessions/${id}${path}`, {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify(body || {}),
  });
  show(await res.json());
}

$('resume').addEventListener('change', async () => {
  const file = $('resume').files[0];
  if (!file) return;
  const id = await session();
  const form = new FormData();
  form.append('resume', file);
  const res = await fetch(`/api/sessions/${id}/resume`, { method: 'POST', body: form });
  const body = await res.json();
  show({});
  if (res.ok) { $('notice').textContent = body.message; } else { $('error').textContent = body.error.message; }
});

document.querySelectorAll('button[data-action]').forEach((btn) => {
  btn.addEventListener('click', () => post(`/actions/${btn.dataset.action}`));
});
$('ask').addEventListener('click', () => post('/chat', { question: $('question').value }));
$('download').addEventListener('click', async (e) => {
  e.preventDefault();
  await pushJobDescription();
  window.location = $('download').href;
});
</script>
</body>
</html>
"##;

/// Render the index page with one button per analysis.
pub fn render_index() -> String {
    let buttons = AnalysisKind::ALL
        .iter()
        .map(|k| format!(r#"  <button data-action="{}">{}</button>"#, k.key(), k.label()))
        .collect::<Vec<_>>()
        .join("\n");

    TEMPLATE
        .replace("{{TITLE}}", PAGE_TITLE)
        .replace("{{ACTION_BUTTONS}}", &buttons)
}
