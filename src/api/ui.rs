/// Single-page form: shared pattern/whitelist inputs and three action tabs.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>PII Detection &amp; Anonymization App</title>
<style>
  body { font-family: system-ui, sans-serif; max-width: 960px; margin: 2rem auto; padding: 0 1rem; }
  .row { display: flex; gap: 1rem; }
  .row label { flex: 1; }
  input[type=text], textarea { width: 100%; box-sizing: border-box; font-family: monospace; }
  .tabs button { padding: .5rem 1rem; border: 1px solid #ccc; background: #f4f4f4; cursor: pointer; }
  .tabs button.active { background: #fff; border-bottom-color: #fff; font-weight: bold; }
  .panel { display: none; border: 1px solid #ccc; padding: 1rem; margin-top: -1px; }
  .panel.active { display: block; }
  .panel > * { display: block; margin-bottom: .75rem; }
</style>
</head>
<body>
<h1>PII Detection &amp; Anonymization</h1>
<p>Upload a file or enter text. Supports CSV, JSON and TXT.</p>

<div class="row">
  <label>Custom Regex Pattern (optional)<input type="text" id="custom-regex"></label>
  <label>Whitelist (comma-separated values)<input type="text" id="whitelist"></label>
</div>

<div class="tabs">
  <button data-tab="detect" class="active">Detect PII in File</button>
  <button data-tab="anonymize">Anonymize File</button>
  <button data-tab="quick">Quick Test Text</button>
</div>

<section class="panel active" id="tab-detect">
  <label>Upload File<input type="file" id="detect-file"></label>
  <button id="detect-btn">Detect PII</button>
  <label>Detection Results<textarea id="detect-output" rows="15" readonly></textarea></label>
</section>

<section class="panel" id="tab-anonymize">
  <label>Upload File<input type="file" id="anonymize-file"></label>
  <button id="anonymize-btn">Anonymize File</button>
  <label>Anonymized Output<textarea id="anonymize-output" rows="15" readonly></textarea></label>
  <a id="anonymize-download" hidden>Download anonymized file</a>
</section>

<section class="panel" id="tab-quick">
  <label>Enter Text<textarea id="quick-input" rows="4"></textarea></label>
  <button id="quick-btn">Anonymize Text</button>
  <label>Output<textarea id="quick-output" rows="6" readonly></textarea></label>
</section>

<script>
document.querySelectorAll(".tabs button").forEach(function (button) {
  button.addEventListener("click", function () {
    document.querySelectorAll(".tabs button").forEach(function (b) { b.classList.remove("active"); });
    document.querySelectorAll(".panel").forEach(function (p) { p.classList.remove("active"); });
    button.classList.add("active");
    document.getElementById("tab-" + button.dataset.tab).classList.add("active");
  });
});

function sharedFields() {
  return {
    custom_regex: document.getElementById("custom-regex").value,
    whitelist: document.getElementById("whitelist").value
  };
}

async function readFile(inputId) {
  var file = document.getElementById(inputId).files[0];
  if (!file) { return null; }
  var bytes = new Uint8Array(await file.arrayBuffer());
  var binary = "";
  for (var i = 0; i < bytes.length; i += 0x8000) {
    binary += String.fromCharCode.apply(null, bytes.subarray(i, i + 0x8000));
  }
  return { name: file.name, content: btoa(binary) };
}

async function post(url, body) {
  var response = await fetch(url, {
    method: "POST",
    headers: { "Content-Type": "application/json" },
    body: JSON.stringify(body)
  });
  var data = await response.json();
  return response.ok ? data : { result: data.message };
}

document.getElementById("detect-btn").addEventListener("click", async function () {
  var body = sharedFields();
  body.file = await readFile("detect-file");
  var data = await post("/api/detect-file", body);
  document.getElementById("detect-output").value = data.result;
});

document.getElementById("anonymize-btn").addEventListener("click", async function () {
  var body = sharedFields();
  body.file = await readFile("anonymize-file");
  var data = await post("/api/anonymize-file", body);
  document.getElementById("anonymize-output").value = data.result;
  var link = document.getElementById("anonymize-download");
  if (data.download) {
    link.href = URL.createObjectURL(new Blob([data.download.content], { type: "text/plain" }));
    link.download = data.download.filename;
    link.hidden = false;
  } else {
    link.hidden = true;
  }
});

document.getElementById("quick-btn").addEventListener("click", async function () {
  var body = sharedFields();
  body.text = document.getElementById("quick-input").value;
  var data = await post("/api/quick-test", body);
  document.getElementById("quick-output").value = data.result;
});
</script>
</body>
</html>
"##;
