pub fn render_index(target_weight: f64) -> String {
    INDEX_HTML.replace("{{TARGET}}", &format!("{target_weight:.1}"))
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Weight Log</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #eef4f8;
      --bg-2: #bcd6e6;
      --ink: #2b2a28;
      --accent: #5b8fb9;
      --accent-2: #ffa41b;
      --good: #2d7a4b;
      --bad: #c63b2b;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #e4eef5 60%, #f4f8fb 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(860px, 100%);
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 28px;
      animation: rise 600ms ease;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(2rem, 4vw, 2.8rem);
      margin: 0;
    }

    h2 {
      margin: 0 0 12px;
      font-size: 1.4rem;
    }

    .subtitle {
      margin: 6px 0 0;
      color: #5f5c57;
    }

    .card {
      background: white;
      border-radius: 20px;
      padding: 20px;
      border: 1px solid rgba(47, 72, 88, 0.08);
    }

    form {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
      gap: 14px;
    }

    label {
      display: grid;
      gap: 6px;
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.08em;
      color: #8b857d;
    }

    label.wide {
      grid-column: 1 / -1;
    }

    input, textarea {
      font: inherit;
      padding: 10px 12px;
      border-radius: 12px;
      border: 1px solid rgba(47, 72, 88, 0.2);
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 14px 20px;
      font-size: 1rem;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: white;
      box-shadow: 0 10px 24px rgba(91, 143, 185, 0.3);
      transition: transform 150ms ease;
    }

    button:active {
      transform: scale(0.98);
    }

    button.small {
      padding: 8px 14px;
      font-size: 0.9rem;
      background: var(--accent-2);
      box-shadow: none;
    }

    #progress {
      white-space: pre-line;
      font-size: 1.1rem;
      line-height: 1.6;
    }

    #progress[data-direction="down"] { color: var(--good); }
    #progress[data-direction="up"] { color: var(--bad); }

    #chart {
      width: 100%;
      height: 260px;
      display: block;
    }

    #chart text {
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
    }

    .chart-line {
      fill: none;
      stroke: var(--accent);
      stroke-width: 3;
    }

    .chart-point {
      fill: var(--accent-2);
      stroke: white;
      stroke-width: 2;
    }

    .chart-grid {
      stroke: rgba(47, 72, 88, 0.12);
    }

    .chart-target {
      stroke: var(--good);
      stroke-dasharray: 4 6;
    }

    .chart-label {
      fill: #7a746d;
      font-size: 11px;
    }

    .history-item {
      border-top: 1px solid rgba(47, 72, 88, 0.08);
      padding: 12px 0;
    }

    .history-item .date {
      font-weight: 600;
      color: var(--accent);
    }

    .history-item h4 {
      margin: 8px 0 2px;
      font-size: 0.9rem;
    }

    .history-item p {
      margin: 0;
    }

    .analysis-actions {
      text-align: right;
      margin-top: 10px;
    }

    .status {
      font-size: 0.95rem;
      color: #6b645d;
      min-height: 1.2em;
    }

    .status[data-type="error"] { color: var(--bad); }
    .status[data-type="ok"] { color: var(--good); }

    @keyframes rise {
      from {
        opacity: 0;
        transform: translateY(18px);
      }
      to {
        opacity: 1;
        transform: translateY(0);
      }
    }

    @media (max-width: 600px) {
      .app {
        padding: 28px 22px;
      }
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Weight Log</h1>
      <p class="subtitle">Log your weight, exercise and meals every day. Target: {{TARGET}} kg.</p>
    </header>

    <section class="card">
      <form id="entry-form">
        <label>Date <input type="date" id="date" required /></label>
        <label>Weight (kg) <input type="number" id="weight" step="0.1" min="0.1" required /></label>
        <label class="wide">Exercise <textarea id="exercise" rows="2"></textarea></label>
        <label class="wide">Diet <textarea id="diet" rows="2"></textarea></label>
        <button type="submit" id="save-btn">Save</button>
      </form>
      <div class="status" id="status"></div>
    </section>

    <section class="card">
      <h2>Progress</h2>
      <div id="progress">No entries yet</div>
    </section>

    <section class="card">
      <h2>Weight trend</h2>
      <svg id="chart" viewBox="0 0 600 260" aria-label="Weight chart" role="img"></svg>
    </section>

    <section class="card">
      <h2>Diet &amp; exercise analysis</h2>
      <div id="analysis"></div>
    </section>

    <section class="card">
      <h2>History</h2>
      <div id="history"></div>
    </section>
  </main>

  <script>
    const TARGET_WEIGHT = {{TARGET}};
    const statusEl = document.getElementById('status');
    const progressEl = document.getElementById('progress');
    const chartEl = document.getElementById('chart');
    const analysisEl = document.getElementById('analysis');
    const historyEl = document.getElementById('history');
    const form = document.getElementById('entry-form');

    const getJson = async (url, options) => {
      const res = await fetch(url, options);
      const body = await res.json().catch(() => null);
      if (!res.ok) {
        throw new Error((body && body.message) || `Request failed (${res.status})`);
      }
      return body;
    };

    const RECORDS_KEY = 'weight-log:records';

    // Records and progress as last seen from the server. When the server is
    // unreachable the last saved copy from localStorage is shown instead.
    const store = {
      records: [],
      progress: null,
      offline: false,
      latestDate() {
        return this.records.length ? this.records[this.records.length - 1].date : null;
      },
      async refresh() {
        try {
          const [records, progress] = await Promise.all([
            getJson('/api/data'),
            getJson('/api/progress')
          ]);
          this.records = records || [];
          this.progress = progress;
          this.offline = false;
          localStorage.setItem(RECORDS_KEY, JSON.stringify(this.records));
        } catch (err) {
          const copy = readOfflineCopy();
          if (!copy) {
            throw err;
          }
          this.records = copy;
          this.progress = null;
          this.offline = true;
        }
      }
    };

    const readOfflineCopy = () => {
      try {
        const copy = JSON.parse(localStorage.getItem(RECORDS_KEY));
        return Array.isArray(copy) ? copy : null;
      } catch (err) {
        return null;
      }
    };

    const showOffline = (store) => {
      if (store.offline) {
        setStatus('Server unreachable, showing offline copy', 'error');
      }
    };

    const cacheKey = (date) => `weight-log:analysis:${date}`;

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const el = (tag, text, className) => {
      const node = document.createElement(tag);
      if (text !== undefined) {
        node.textContent = text;
      }
      if (className) {
        node.className = className;
      }
      return node;
    };

    const renderProgress = (store) => {
      const p = store.progress;
      if (!p) {
        progressEl.textContent = store.offline ? 'Progress needs the server' : 'No entries yet';
        progressEl.dataset.direction = '';
        return;
      }
      const lines = [`Current weight: ${p.current_weight.toFixed(1)} kg`];
      if (p.direction === 'initial') {
        lines.push('First entry');
      } else if (p.direction === 'down') {
        lines.push(`Down ${Math.abs(p.change).toFixed(1)} kg since last entry`);
      } else if (p.direction === 'up') {
        lines.push(`Up ${p.change.toFixed(1)} kg since last entry`);
      } else {
        lines.push('Same as last entry');
      }
      if (p.target_status === 'above') {
        lines.push(`${p.to_target.toFixed(1)} kg to go to reach ${p.target_weight} kg`);
      } else if (p.target_status === 'below') {
        lines.push(`${p.to_target.toFixed(1)} kg below the ${p.target_weight} kg target`);
      } else {
        lines.push(`Target of ${p.target_weight} kg reached!`);
      }
      progressEl.textContent = lines.join('\n');
      progressEl.dataset.direction = p.direction;
    };

    const formatAxisValue = (value) => {
      const rounded = Math.round(value * 10) / 10;
      return Number.isInteger(rounded) ? rounded.toString() : rounded.toFixed(1);
    };

    const renderChart = (store) => {
      const points = store.records
        .map((record) => ({ label: record.date.slice(5), value: parseFloat(record.weight) }))
        .filter((point) => !Number.isNaN(point.value));
      if (!points.length) {
        chartEl.innerHTML = '<text class="chart-label" x="50%" y="50%" text-anchor="middle">No data yet</text>';
        return;
      }

      const width = 600;
      const height = 260;
      const paddingX = 44;
      const paddingY = 34;
      const top = 24;

      const values = points.map((point) => point.value);
      let min = Math.min(...values, TARGET_WEIGHT) - 0.5;
      let max = Math.max(...values, TARGET_WEIGHT) + 0.5;

      const range = max - min;
      const xStep = points.length > 1 ? (width - paddingX * 2) / (points.length - 1) : 0;
      const scaleY = (height - top - paddingY) / range;
      const x = (index) => paddingX + index * xStep;
      const y = (value) => height - paddingY - (value - min) * scaleY;

      const path = points
        .map((point, index) => `${index === 0 ? 'M' : 'L'} ${x(index).toFixed(2)} ${y(point.value).toFixed(2)}`)
        .join(' ');

      const ticks = 4;
      let grid = '';
      for (let i = 0; i <= ticks; i += 1) {
        const value = min + (range * i) / ticks;
        const yPos = y(value);
        grid += `<line class="chart-grid" x1="${paddingX}" y1="${yPos}" x2="${width - paddingX}" y2="${yPos}" />`;
        grid += `<text class="chart-label" x="${paddingX - 10}" y="${yPos + 4}" text-anchor="end">${formatAxisValue(value)}</text>`;
      }

      const labelEvery = Math.max(1, Math.ceil(points.length / 10));
      const xLabels = points
        .map((point, index) => {
          if (index % labelEvery !== 0) {
            return '';
          }
          return `<text class="chart-label" x="${x(index)}" y="${height - paddingY + 18}" text-anchor="middle">${point.label}</text>`;
        })
        .join('');

      const circles = points
        .map((point, index) => `<circle class="chart-point" cx="${x(index)}" cy="${y(point.value)}" r="5"><title>${point.value} kg</title></circle>`)
        .join('');

      const targetLine = `<line class="chart-target" x1="${paddingX}" y1="${y(TARGET_WEIGHT)}" x2="${width - paddingX}" y2="${y(TARGET_WEIGHT)}" />`;

      chartEl.innerHTML = `
        ${grid}
        ${targetLine}
        <path class="chart-line" d="${path}" />
        ${circles}
        ${xLabels}
      `;
    };

    const renderHistory = (store) => {
      historyEl.replaceChildren();
      if (!store.records.length) {
        historyEl.appendChild(el('p', 'No entries yet'));
        return;
      }
      [...store.records].reverse().forEach((record) => {
        const item = el('div', undefined, 'history-item');
        item.appendChild(el('div', record.date, 'date'));
        item.appendChild(el('div', `Weight: ${record.weight} kg`));
        if (record.exercise) {
          item.appendChild(el('h4', 'Exercise'));
          item.appendChild(el('p', record.exercise));
        }
        if (record.diet) {
          item.appendChild(el('h4', 'Diet'));
          item.appendChild(el('p', record.diet));
        }
        historyEl.appendChild(item);
      });
    };

    const renderSummary = (summary, note) => {
      analysisEl.replaceChildren();
      if (!summary) {
        analysisEl.appendChild(el('p', 'Log some entries to see an analysis.'));
        return;
      }
      analysisEl.appendChild(el('h3', 'Recent health summary'));
      analysisEl.appendChild(el('p', `Exercise: ${summary.exercise_note} (${summary.exercise_rate}%)`));
      analysisEl.appendChild(el('p', `Diet logging: ${summary.diet_note} (${summary.diet_rate}%)`));
      analysisEl.appendChild(el('p', `Weight trend: ${summary.trend_note}`));
      analysisEl.appendChild(el('h3', 'Suggestions'));
      const list = el('ul');
      summary.suggestions.forEach((text) => list.appendChild(el('li', text)));
      analysisEl.appendChild(list);
      if (note) {
        analysisEl.appendChild(el('p', note, 'status'));
      }
      appendReanalyze();
    };

    const renderBlocks = (result) => {
      analysisEl.replaceChildren();
      analysisEl.appendChild(el('h3', 'AI health analysis'));
      result.blocks.forEach((block) => {
        if (block.kind === 'heading') {
          analysisEl.appendChild(el('h4', block.content));
        } else if (block.kind === 'list') {
          const list = el('ul');
          block.content.forEach((text) => list.appendChild(el('li', text)));
          analysisEl.appendChild(list);
        } else {
          analysisEl.appendChild(el('p', block.content));
        }
      });
      appendReanalyze();
    };

    const appendReanalyze = () => {
      const actions = el('div', undefined, 'analysis-actions');
      const button = el('button', 'Re-analyze', 'small');
      button.type = 'button';
      button.addEventListener('click', () => reanalyze(store));
      actions.appendChild(button);
      analysisEl.appendChild(actions);
    };

    const renderResult = (result) => {
      if (result.source === 'fallback') {
        renderSummary(result.summary, result.note);
      } else {
        renderBlocks(result);
      }
    };

    const showSummary = async (note) => {
      const summary = await getJson('/api/summary');
      renderSummary(summary, note);
    };

    const renderAnalysis = async (store) => {
      const date = store.latestDate();
      const cached = date && localStorage.getItem(cacheKey(date));
      if (cached) {
        try {
          renderResult(JSON.parse(cached));
          return;
        } catch (err) {
          localStorage.removeItem(cacheKey(date));
        }
      }
      if (store.offline) {
        analysisEl.replaceChildren(el('p', 'Analysis needs the server.'));
        return;
      }
      await showSummary();
    };

    const requestAnalysis = async (refresh) => {
      analysisEl.replaceChildren(el('p', 'Analysing your diet and exercise...'));
      try {
        const result = await getJson('/api/model-analysis', {
          method: 'POST',
          headers: { 'content-type': 'application/json' },
          body: JSON.stringify({ refresh })
        });
        if (result.source !== 'fallback') {
          localStorage.setItem(cacheKey(result.date), JSON.stringify(result));
        }
        renderResult(result);
      } catch (err) {
        await showSummary('Analysis failed, please try again later.').catch(() => {
          analysisEl.replaceChildren(el('p', err.message));
        });
      }
    };

    const reanalyze = async (store) => {
      const date = store.latestDate();
      if (!date) {
        return;
      }
      localStorage.removeItem(cacheKey(date));
      await fetch(`/api/analysis-data/${encodeURIComponent(date)}`, { method: 'DELETE' })
        .catch(() => null);
      await requestAnalysis(true);
    };

    const renderAll = async (store) => {
      renderProgress(store);
      renderChart(store);
      renderHistory(store);
      await renderAnalysis(store);
    };

    const save = async () => {
      const entry = {
        date: document.getElementById('date').value,
        weight: document.getElementById('weight').value,
        exercise: document.getElementById('exercise').value,
        diet: document.getElementById('diet').value
      };
      if (!entry.date || !entry.weight) {
        setStatus('Please enter a date and weight', 'error');
        return;
      }

      setStatus('Saving...', 'info');
      await getJson('/api/data', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify(entry)
      });
      setStatus('Saved', 'ok');
      setTimeout(() => setStatus('', ''), 1200);

      ['weight', 'exercise', 'diet'].forEach((id) => {
        document.getElementById(id).value = '';
      });

      localStorage.removeItem(cacheKey(entry.date));
      const previousLatest = store.latestDate();
      if (previousLatest) {
        localStorage.removeItem(cacheKey(previousLatest));
      }
      await store.refresh();
      showOffline(store);
      renderProgress(store);
      renderChart(store);
      renderHistory(store);
      if (entry.exercise.trim() || entry.diet.trim()) {
        await requestAnalysis(true);
      } else {
        await renderAnalysis(store);
      }
    };

    form.addEventListener('submit', (event) => {
      event.preventDefault();
      save().catch((err) => setStatus(err.message, 'error'));
    });

    document.getElementById('date').value = new Date().toISOString().split('T')[0];

    store
      .refresh()
      .then(() => {
        showOffline(store);
        return renderAll(store);
      })
      .catch((err) => setStatus(err.message, 'error'));
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_weight_is_substituted() {
        let html = render_index(72.5);
        assert!(html.contains("const TARGET_WEIGHT = 72.5;"));
        assert!(html.contains("Target: 72.5 kg."));
        assert!(!html.contains("{{TARGET}}"));
    }

    #[test]
    fn page_keeps_an_offline_copy_of_records() {
        let html = render_index(75.0);
        assert!(html.contains("const RECORDS_KEY = 'weight-log:records';"));
        assert!(html.contains("localStorage.setItem(RECORDS_KEY"));
        assert!(html.contains("showing offline copy"));
    }

    #[test]
    fn saving_notes_asks_for_a_fresh_analysis() {
        let html = render_index(75.0);
        assert!(html.contains("await requestAnalysis(true);\n      } else {"));
        assert!(!html.contains("requestAnalysis(false)"));
    }
}
