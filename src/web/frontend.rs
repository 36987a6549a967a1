//! Embedded HTML/CSS/JS frontend for the shelfwatch web dashboard.
//!
//! The entire SPA is compiled into the binary as a string constant.
//! No external assets, no build tools, no CDN dependencies. The same
//! document is served for every routed path; the script reads
//! `location.pathname` to decide which view to show.

/// The complete single-page dashboard HTML.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>shelfwatch</title>
<style>
:root {
  --bg: #0d1117;
  --surface: #161b22;
  --border: #30363d;
  --text: #e6edf3;
  --text-muted: #8b949e;
  --accent: #58a6ff;
  --green: #3fb950;
  --yellow: #d29922;
  --red: #f85149;
  --radius: 8px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
  --mono: 'SF Mono', 'Cascadia Code', 'Fira Code', monospace;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  background: var(--bg);
  color: var(--text);
  font-family: var(--font);
  font-size: 14px;
  line-height: 1.5;
}

/* Layout */
.app {
  max-width: 1100px;
  margin: 0 auto;
  padding: 24px;
}

header {
  display: flex;
  align-items: center;
  justify-content: space-between;
  margin-bottom: 24px;
  padding-bottom: 16px;
  border-bottom: 1px solid var(--border);
}

header h1 {
  font-size: 24px;
  font-weight: 600;
}

header h1 .logo { color: var(--accent); font-family: var(--mono); font-weight: 700; }
header .subtitle { color: var(--text-muted); font-size: 13px; }

.badge {
  display: inline-flex;
  align-items: center;
  gap: 4px;
  padding: 4px 10px;
  border-radius: 12px;
  font-size: 12px;
  font-weight: 500;
  background: var(--surface);
  border: 1px solid var(--border);
}
.badge.ok { border-color: var(--green); color: var(--green); }
.badge.warn { border-color: var(--yellow); color: var(--yellow); }

/* Navigation */
nav {
  display: flex;
  gap: 4px;
  margin-bottom: 24px;
  background: var(--surface);
  border-radius: var(--radius);
  padding: 4px;
  border: 1px solid var(--border);
}

nav button {
  flex: 1;
  padding: 8px 16px;
  border: none;
  border-radius: 6px;
  background: transparent;
  color: var(--text-muted);
  font-size: 13px;
  font-weight: 500;
  cursor: pointer;
  transition: all 0.15s;
}
nav button:hover { color: var(--text); background: rgba(255,255,255,0.04); }
nav button.active { background: var(--accent); color: #fff; }

.panel { display: none; }
.panel.active { display: block; }

/* Cards */
.card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 20px;
  margin-bottom: 20px;
}
.card h2 { font-size: 15px; font-weight: 600; margin-bottom: 16px; }

.stats-grid {
  display: grid;
  grid-template-columns: repeat(4, 1fr);
  gap: 12px;
  margin-bottom: 20px;
}
.stat-card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 16px;
  text-align: center;
}
.stat-card .value { font-size: 26px; font-weight: 700; }
.stat-card .label { font-size: 12px; color: var(--text-muted); margin-top: 2px; }
.stat-card .value.red { color: var(--red); }
.stat-card .value.yellow { color: var(--yellow); }
.stat-card .value.green { color: var(--green); }

/* Toggle chips (time slots, sections) */
.chips { display: flex; flex-wrap: wrap; gap: 6px; margin-bottom: 16px; }
.chips button {
  padding: 4px 12px;
  border-radius: 12px;
  border: 1px solid var(--border);
  background: transparent;
  color: var(--text-muted);
  font-size: 12px;
  cursor: pointer;
}
.chips button.active { border-color: var(--accent); color: var(--accent); }

/* Bar chart */
.chart {
  display: flex;
  align-items: flex-end;
  gap: 8px;
  height: 180px;
  padding-top: 10px;
}
.bar-group { flex: 1; display: flex; flex-direction: column; align-items: center; height: 100%; }
.bar-group .bar {
  width: 70%;
  margin-top: auto;
  border-radius: 3px 3px 0 0;
  min-height: 2px;
  position: relative;
}
.bar-group .bar .chart-tooltip {
  display: none;
  position: absolute;
  bottom: 100%;
  left: 50%;
  transform: translateX(-50%);
  background: var(--bg);
  border: 1px solid var(--border);
  border-radius: 4px;
  padding: 3px 8px;
  font-size: 11px;
  white-space: nowrap;
  margin-bottom: 4px;
}
.bar-group .bar:hover .chart-tooltip { display: block; }
.bar-label {
  font-size: 10px;
  color: var(--text-muted);
  margin-top: 6px;
  max-width: 70px;
  overflow: hidden;
  text-overflow: ellipsis;
  white-space: nowrap;
}

/* Line chart */
.line-chart svg { width: 100%; height: 200px; }
.line-chart .axis { stroke: var(--border); stroke-width: 1; }
.line-chart text { fill: var(--text-muted); font-size: 10px; }

/* Tables */
table { width: 100%; border-collapse: collapse; }
th, td { text-align: left; padding: 8px 10px; border-bottom: 1px solid var(--border); }
th { color: var(--text-muted); font-size: 12px; font-weight: 500; }
td.num, th.num { text-align: right; }
td.mono { font-family: var(--mono); font-size: 12px; }
.status-pill {
  display: inline-block;
  padding: 2px 10px;
  border-radius: 10px;
  font-size: 11px;
  font-weight: 600;
}
.status-pill.low { background: rgba(248,81,73,0.15); color: var(--red); }
.status-pill.medium { background: rgba(210,153,34,0.15); color: var(--yellow); }
.status-pill.high { background: rgba(63,185,80,0.15); color: var(--green); }

.empty { text-align: center; padding: 40px 0; color: var(--text-muted); }
.empty .icon { font-size: 30px; margin-bottom: 8px; }

/* Upload */
.dropzone {
  border: 2px dashed var(--border);
  border-radius: var(--radius);
  padding: 40px;
  text-align: center;
  color: var(--text-muted);
  cursor: pointer;
  transition: border-color 0.15s;
}
.dropzone.drag { border-color: var(--accent); color: var(--accent); }

.previews { display: flex; flex-wrap: wrap; gap: 10px; margin-top: 16px; }
.preview {
  position: relative;
  width: 110px;
}
.preview img {
  width: 110px;
  height: 82px;
  object-fit: cover;
  border-radius: 6px;
  border: 1px solid var(--border);
}
.preview .name {
  font-size: 10px;
  color: var(--text-muted);
  overflow: hidden;
  text-overflow: ellipsis;
  white-space: nowrap;
}
.preview .remove {
  position: absolute;
  top: -6px;
  right: -6px;
  width: 20px;
  height: 20px;
  border-radius: 50%;
  border: none;
  background: var(--red);
  color: #fff;
  font-size: 11px;
  cursor: pointer;
  line-height: 20px;
}

.btn {
  padding: 8px 18px;
  border-radius: 6px;
  border: 1px solid var(--border);
  background: var(--surface);
  color: var(--text);
  font-size: 13px;
  cursor: pointer;
}
.btn.primary { background: var(--accent); border-color: var(--accent); color: #fff; }
.btn:disabled { opacity: 0.45; cursor: not-allowed; }
.btn-group { display: flex; gap: 10px; margin-top: 16px; }

.progress { height: 8px; background: var(--bg); border-radius: 4px; margin-top: 16px; overflow: hidden; display: none; }
.progress .fill { height: 100%; background: var(--accent); width: 0%; transition: width 0.3s; }

.error-box {
  display: none;
  margin-top: 16px;
  padding: 12px;
  border: 1px solid var(--red);
  border-radius: 6px;
  color: var(--red);
  font-size: 13px;
}

/* Alerts */
.alert-item {
  display: flex;
  justify-content: space-between;
  align-items: center;
  padding: 12px;
  border: 1px solid var(--red);
  border-radius: 6px;
  margin-bottom: 10px;
  background: rgba(248,81,73,0.06);
}
.alert-item .pct { color: var(--red); font-weight: 700; font-size: 18px; }
.alert-item .why { color: var(--text-muted); font-size: 12px; }
.all-good { text-align: center; padding: 40px 0; color: var(--green); }

/* Toast */
.toast {
  position: fixed;
  bottom: 24px;
  right: 24px;
  background: var(--surface);
  border: 1px solid var(--green);
  color: var(--text);
  padding: 10px 16px;
  border-radius: 6px;
  font-size: 13px;
  opacity: 0;
  transition: opacity 0.2s;
  pointer-events: none;
}
.toast.show { opacity: 1; }
.toast.error { border-color: var(--red); }
</style>
</head>
<body>
<div class="app">

  <!-- Header -->
  <header>
    <div>
      <h1><span class="logo">&#9632; shelfwatch</span></h1>
      <div class="subtitle">AI shelf-stock monitoring</div>
    </div>
    <div id="health-badge"></div>
  </header>

  <!-- Navigation -->
  <nav id="nav">
    <button data-view="dashboard">Dashboard</button>
    <button data-view="upload">Upload</button>
    <button data-view="alert">Alerts</button>
  </nav>

  <!-- Dashboard view -->
  <div class="panel" id="panel-dashboard">
    <div class="stats-grid">
      <div class="stat-card"><div class="value" id="stat-total">0</div><div class="label">Products Tracked</div></div>
      <div class="stat-card"><div class="value red" id="stat-low">0</div><div class="label">Low Stock</div></div>
      <div class="stat-card"><div class="value yellow" id="stat-medium">0</div><div class="label">Medium Stock</div></div>
      <div class="stat-card"><div class="value green" id="stat-high">0</div><div class="label">High Stock</div></div>
    </div>

    <div class="card">
      <h2>Stock Levels <span class="subtitle" id="dash-meta"></span></h2>
      <div class="chips" id="time-chips"></div>
      <div class="chart" id="bar-chart"></div>
    </div>

    <div class="card" id="line-card" style="display:none">
      <h2>Stock Over Time</h2>
      <div class="chips" id="section-chips"></div>
      <div class="line-chart" id="line-chart"></div>
    </div>

    <div class="card">
      <h2>Inventory</h2>
      <table>
        <thead>
          <tr>
            <th>#</th>
            <th>Product</th>
            <th class="num">Stock</th>
            <th>Status</th>
            <th class="num">Confidence</th>
            <th>Reasoning</th>
            <th>Updated</th>
          </tr>
        </thead>
        <tbody id="inventory-tbody"></tbody>
      </table>
      <div class="empty" id="dash-empty" style="display:none">
        <div class="icon">&#128230;</div>
        <p>No analysis yet. Upload shelf photos to populate the dashboard.</p>
      </div>
    </div>
  </div>

  <!-- Upload view -->
  <div class="panel" id="panel-upload">
    <div class="card">
      <h2>Upload Shelf Photos</h2>
      <div class="dropzone" id="dropzone">
        Drag and drop shelf photos here, or click to choose files.
      </div>
      <input type="file" id="file-input" accept="image/*" multiple style="display:none">
      <div class="previews" id="previews"></div>
      <div class="progress" id="progress"><div class="fill" id="progress-fill"></div></div>
      <div class="error-box" id="upload-error"></div>
      <div class="btn-group">
        <button class="btn primary" id="btn-upload" disabled>Analyze Photos</button>
        <button class="btn" id="btn-clear" disabled>Clear</button>
      </div>
    </div>
  </div>

  <!-- Alerts view -->
  <div class="panel" id="panel-alert">
    <div class="card">
      <h2>Low Stock Alerts <span class="subtitle" id="alert-meta"></span></h2>
      <div class="chips" id="alert-time-chips"></div>
      <div id="alert-list"></div>
      <div class="all-good" id="alert-good" style="display:none">All monitored products are sufficiently stocked.</div>
      <div class="empty" id="alert-empty" style="display:none">
        <div class="icon">&#128276;</div>
        <p>No analysis yet. Upload shelf photos first.</p>
      </div>
    </div>
  </div>

</div>

<!-- Toast -->
<div class="toast" id="toast"></div>

<script>
// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------
let currentView = 'dashboard';
let dashData = null;
let alertData = null;
let pendingFiles = [];   // { file, url } with object URLs revoked on removal
let uploading = false;
let progressTimer = null;

// ---------------------------------------------------------------------------
// API helpers
// ---------------------------------------------------------------------------
async function api(method, path, body) {
  const opts = { method, headers: {} };
  if (body) {
    opts.headers['Content-Type'] = 'application/json';
    opts.body = JSON.stringify(body);
  }
  const res = await fetch(path, opts);
  return res.json();
}

function toast(msg, isError) {
  const el = document.getElementById('toast');
  el.textContent = msg;
  el.className = 'toast show' + (isError ? ' error' : '');
  setTimeout(() => el.className = 'toast', 3000);
}

function esc(s) {
  if (!s) return '';
  return s.replace(/&/g,'&amp;').replace(/</g,'&lt;').replace(/>/g,'&gt;').replace(/"/g,'&quot;');
}

// Mirror selections into browser storage so a reload before the server
// round-trips still restores the last choice.
function saveSelection(sel) {
  try {
    if (sel.time) localStorage.setItem('selectedTimeKey', sel.time);
    if (sel.section) localStorage.setItem('selectedSectionKey', sel.section);
  } catch (e) { /* storage may be unavailable */ }
  api('PUT', '/api/selection', sel).catch(() => {});
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------
function viewFromPath(path) {
  if (path.startsWith('/upload')) return 'upload';
  if (path.startsWith('/alert')) return 'alert';
  return 'dashboard';
}

function showView(view, push) {
  currentView = view;
  if (push) {
    history.pushState({}, '', view === 'dashboard' ? '/dashboard' : '/' + view);
  }
  document.querySelectorAll('nav button').forEach(b =>
    b.classList.toggle('active', b.dataset.view === view));
  document.querySelectorAll('.panel').forEach(p => p.classList.remove('active'));
  document.getElementById('panel-' + view).classList.add('active');
  if (view === 'dashboard') loadDashboard();
  if (view === 'alert') loadAlerts();
}

document.getElementById('nav').addEventListener('click', e => {
  if (e.target.tagName !== 'BUTTON') return;
  showView(e.target.dataset.view, true);
});

window.addEventListener('popstate', () => showView(viewFromPath(location.pathname), false));

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------
async function loadDashboard(params) {
  try {
    const qs = params ? '?' + new URLSearchParams(params) : '';
    dashData = await api('GET', '/api/dashboard' + qs);
    renderDashboard();
  } catch (e) {
    toast('Failed to load dashboard: ' + e.message, true);
  }
}

function renderDashboard() {
  const d = dashData;
  document.getElementById('stat-total').textContent = d.summary.total;
  document.getElementById('stat-low').textContent = d.summary.low;
  document.getElementById('stat-medium').textContent = d.summary.medium;
  document.getElementById('stat-high').textContent = d.summary.high;

  const meta = [];
  if (d.model_used) meta.push(d.model_used);
  if (d.timestamp) meta.push(d.timestamp);
  document.getElementById('dash-meta').textContent = meta.join(' · ');

  const empty = document.getElementById('dash-empty');
  const tbody = document.getElementById('inventory-tbody');
  if (!d.has_data || d.rows.length === 0) {
    tbody.innerHTML = '';
    empty.style.display = 'block';
  } else {
    empty.style.display = 'none';
    tbody.innerHTML = d.rows.map(r => `
      <tr>
        <td class="num">${r.id}</td>
        <td>${esc(r.product)}</td>
        <td class="num">${r.stock_percent}%</td>
        <td><span class="status-pill ${r.status.toLowerCase()}">${r.status}</span></td>
        <td class="num">${r.confidence_percent != null ? r.confidence_percent + '%' : '—'}</td>
        <td>${esc(r.reasoning)}</td>
        <td class="mono">${esc(r.updated_at)}</td>
      </tr>
    `).join('');
  }

  renderChips('time-chips', d.times, d.selected_time, key => {
    saveSelection({ time: key });
    loadDashboard({ time: key });
  });

  renderBarChart(d.bar);

  // The line chart only exists for time-grouped payloads.
  const lineCard = document.getElementById('line-card');
  if (d.times.length > 0 && d.sections.length > 0) {
    lineCard.style.display = 'block';
    renderChips('section-chips', d.sections, d.selected_section, key => {
      saveSelection({ section: key });
      loadDashboard({ section: key, time: d.selected_time || '' });
    });
    renderLineChart(d.line, d.section_color || 'hsl(210, 65%, 50%)');
  } else {
    lineCard.style.display = 'none';
  }
}

function renderChips(id, keys, selected, onPick) {
  const el = document.getElementById(id);
  el.innerHTML = keys.map(k =>
    `<button class="${k === selected ? 'active' : ''}" data-key="${esc(k)}">${esc(k)}</button>`
  ).join('');
  el.onclick = e => {
    if (e.target.tagName !== 'BUTTON') return;
    onPick(e.target.dataset.key);
  };
}

function renderBarChart(bars) {
  const chart = document.getElementById('bar-chart');
  if (!bars || bars.length === 0) { chart.innerHTML = ''; return; }
  chart.innerHTML = bars.map(b => `
    <div class="bar-group">
      <div class="bar" style="height:${Math.max(b.stock, 1)}%;background:${b.color}">
        <div class="chart-tooltip">${esc(b.name)}: ${b.stock}%</div>
      </div>
      <div class="bar-label">${esc(b.name)}</div>
    </div>
  `).join('');
}

// Inline SVG polyline; missing points break the line instead of dipping to 0.
function renderLineChart(points, color) {
  const el = document.getElementById('line-chart');
  if (!points || points.length === 0) { el.innerHTML = ''; return; }

  const w = 600, h = 200, pad = 28;
  const step = points.length > 1 ? (w - 2 * pad) / (points.length - 1) : 0;
  const y = v => h - pad - (v / 100) * (h - 2 * pad);

  let segments = [];
  let run = [];
  points.forEach((p, i) => {
    if (p.stock == null) {
      if (run.length) segments.push(run);
      run = [];
      return;
    }
    run.push([pad + i * step, y(p.stock)]);
  });
  if (run.length) segments.push(run);

  const lines = segments.map(seg =>
    `<polyline fill="none" stroke="${color}" stroke-width="2" points="${seg.map(c => c.join(',')).join(' ')}"/>`
  ).join('');
  const dots = segments.flat().map(c =>
    `<circle cx="${c[0]}" cy="${c[1]}" r="3" fill="${color}"/>`
  ).join('');
  const labels = points.map((p, i) =>
    `<text x="${pad + i * step}" y="${h - 8}" text-anchor="middle">${esc(p.time)}</text>`
  ).join('');

  el.innerHTML = `<svg viewBox="0 0 ${w} ${h}">
    <line class="axis" x1="${pad}" y1="${h - pad}" x2="${w - pad}" y2="${h - pad}"/>
    <line class="axis" x1="${pad}" y1="${pad}" x2="${pad}" y2="${h - pad}"/>
    <text x="4" y="${y(100) + 4}">100</text>
    <text x="4" y="${y(0) + 4}">0</text>
    ${lines}${dots}${labels}
  </svg>`;
}

// ---------------------------------------------------------------------------
// Upload
// ---------------------------------------------------------------------------
const dropzone = document.getElementById('dropzone');
const fileInput = document.getElementById('file-input');

dropzone.addEventListener('click', () => fileInput.click());
dropzone.addEventListener('dragover', e => { e.preventDefault(); dropzone.classList.add('drag'); });
dropzone.addEventListener('dragleave', () => dropzone.classList.remove('drag'));
dropzone.addEventListener('drop', e => {
  e.preventDefault();
  dropzone.classList.remove('drag');
  addFiles(e.dataTransfer.files);
});
fileInput.addEventListener('change', () => {
  addFiles(fileInput.files);
  fileInput.value = '';
});

// Selections append to the pending set; picking twice keeps both batches.
function addFiles(list) {
  for (const file of list) {
    if (!file.type.startsWith('image/')) continue;
    pendingFiles.push({ file, url: URL.createObjectURL(file) });
  }
  renderPreviews();
}

function removeFile(index) {
  URL.revokeObjectURL(pendingFiles[index].url);
  pendingFiles.splice(index, 1);
  renderPreviews();
}

function clearFiles() {
  pendingFiles.forEach(p => URL.revokeObjectURL(p.url));
  pendingFiles = [];
  renderPreviews();
}

function renderPreviews() {
  const el = document.getElementById('previews');
  el.innerHTML = pendingFiles.map((p, i) => `
    <div class="preview">
      <img src="${p.url}" alt="">
      <div class="name">${esc(p.file.name)}</div>
      <button class="remove" data-i="${i}">&times;</button>
    </div>
  `).join('');
  el.onclick = e => {
    if (!e.target.classList.contains('remove')) return;
    removeFile(Number(e.target.dataset.i));
  };
  updateUploadButtons();
}

function updateUploadButtons() {
  document.getElementById('btn-upload').disabled = uploading || pendingFiles.length === 0;
  document.getElementById('btn-clear').disabled = uploading || pendingFiles.length === 0;
}

// The service gives no progress events, so the bar advances on a timer and
// holds near the end until the response lands.
function startProgress() {
  const box = document.getElementById('progress');
  const fill = document.getElementById('progress-fill');
  box.style.display = 'block';
  fill.style.width = '0%';
  let pct = 0;
  progressTimer = setInterval(() => {
    pct = Math.min(pct + Math.random() * 8 + 2, 95);
    fill.style.width = pct + '%';
  }, 400);
}

function finishProgress() {
  clearInterval(progressTimer);
  progressTimer = null;
  document.getElementById('progress-fill').style.width = '100%';
  setTimeout(() => { document.getElementById('progress').style.display = 'none'; }, 400);
}

document.getElementById('btn-clear').addEventListener('click', clearFiles);

document.getElementById('btn-upload').addEventListener('click', async () => {
  if (uploading || pendingFiles.length === 0) return;
  uploading = true;
  updateUploadButtons();
  document.getElementById('upload-error').style.display = 'none';
  startProgress();

  const form = new FormData();
  pendingFiles.forEach(p => form.append('files', p.file, p.file.name));

  try {
    const res = await fetch('/api/upload', { method: 'POST', body: form });
    const data = await res.json();
    finishProgress();
    if (res.ok) {
      clearFiles();
      toast('Analysis complete');
      showView('dashboard', true);
    } else {
      showUploadError(data.message || 'Upload failed.');
    }
  } catch (e) {
    finishProgress();
    showUploadError('Upload failed: ' + e.message);
  }
  uploading = false;
  updateUploadButtons();
});

function showUploadError(msg) {
  const el = document.getElementById('upload-error');
  el.textContent = msg;
  el.style.display = 'block';
}

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------
async function loadAlerts(time) {
  try {
    const qs = time ? '?time=' + encodeURIComponent(time) : '';
    alertData = await api('GET', '/api/alerts' + qs);
    renderAlerts();
  } catch (e) {
    toast('Failed to load alerts: ' + e.message, true);
  }
}

function renderAlerts() {
  const a = alertData;
  const list = document.getElementById('alert-list');
  const good = document.getElementById('alert-good');
  const empty = document.getElementById('alert-empty');
  document.getElementById('alert-meta').textContent = a.timestamp || '';

  renderChips('alert-time-chips', a.times, a.selected_time, key => {
    saveSelection({ time: key });
    loadAlerts(key);
  });

  if (!a.has_data) {
    list.innerHTML = '';
    good.style.display = 'none';
    empty.style.display = 'block';
    return;
  }
  empty.style.display = 'none';

  if (a.items.length === 0) {
    list.innerHTML = '';
    good.style.display = 'block';
    return;
  }
  good.style.display = 'none';
  list.innerHTML = a.items.map(item => `
    <div class="alert-item">
      <div>
        <div><strong>${esc(item.product)}</strong></div>
        <div class="why">${esc(item.reasoning || 'Stock below threshold')}</div>
      </div>
      <div class="pct">${item.stock_percent}%</div>
    </div>
  `).join('');
}

// ---------------------------------------------------------------------------
// Health badge
// ---------------------------------------------------------------------------
async function loadHealth() {
  try {
    const h = await api('GET', '/api/health');
    document.getElementById('health-badge').innerHTML = h.api_reachable
      ? '<span class="badge ok">&#9679; service online</span>'
      : '<span class="badge warn">&#9675; service unreachable</span>';
  } catch (e) {
    // Badge errors are not worth surfacing.
  }
}

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------
loadHealth();
showView(viewFromPath(location.pathname), false);
</script>
</body>
</html>"##;
