#![cfg(target_arch = "wasm32")]

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Node};

const STYLE_TAG_SELECTOR: &str = "style[data-health-ui]";

/// Default CSS for the dashboard with overridable design tokens.
pub const DEFAULT_STYLES: &str = r#"
:root {
  --health-font-family: 'Inter', system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
  --health-bg: #0f172a;
  --health-panel: #111c33;
  --health-card: #16233f;
  --health-border: rgba(148, 163, 184, 0.22);
  --health-text: #e2e8f0;
  --health-muted: #94a3b8;
  --health-accent: #38bdf8;
  --health-radius: 14px;
  --status-critical: #ef4444;
  --status-warning: #f59e0b;
  --status-normal: #3b82f6;
  --status-good: #4caf50;
  --chart-bmd: #9c27b0;
  --chart-hemoglobin: #e91e63;
}

.health-shell {
  font-family: var(--health-font-family);
  background: var(--health-bg);
  color: var(--health-text);
  display: grid;
  grid-template-columns: 220px 1fr;
  min-height: 100vh;
}

.health-nav {
  background: var(--health-panel);
  border-right: 1px solid var(--health-border);
  padding: 24px 16px;
  display: flex;
  flex-direction: column;
  gap: 6px;
}

.health-brand {
  font-size: 1.1rem;
  font-weight: 700;
  margin-bottom: 18px;
}

.nav-link {
  background: transparent;
  border: 0;
  border-radius: 10px;
  color: var(--health-muted);
  cursor: pointer;
  font: inherit;
  padding: 10px 12px;
  text-align: left;
}

.nav-link.is-active {
  background: rgba(56, 189, 248, 0.14);
  color: var(--health-accent);
}

.health-main {
  padding: 28px 32px;
  display: flex;
  flex-direction: column;
  gap: 24px;
}

.view-header h1 {
  margin: 0 0 4px;
  font-size: 1.5rem;
}

.view-header p {
  margin: 0;
  color: var(--health-muted);
}

.kpi-grid {
  display: grid;
  grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
  gap: 16px;
}

.kpi-card,
.panel {
  background: var(--health-card);
  border: 1px solid var(--health-border);
  border-radius: var(--health-radius);
  padding: 18px;
}

.kpi-card header {
  display: flex;
  justify-content: space-between;
  align-items: center;
  color: var(--health-muted);
  font-size: 0.85rem;
}

.kpi-value {
  font-size: 1.8rem;
  font-weight: 700;
  margin: 10px 0 2px;
}

.kpi-unit {
  color: var(--health-muted);
  font-size: 0.85rem;
  margin-left: 4px;
}

.kpi-bar {
  background: rgba(148, 163, 184, 0.18);
  border-radius: 999px;
  height: 8px;
  margin: 12px 0 8px;
  overflow: hidden;
}

.kpi-bar-fill {
  height: 100%;
  border-radius: 999px;
}

[data-status="critical"] { --status-color: var(--status-critical); }
[data-status="warning"] { --status-color: var(--status-warning); }
[data-status="normal"] { --status-color: var(--status-normal); }
[data-status="good"] { --status-color: var(--status-good); }

.kpi-bar-fill,
.status-pill {
  background: var(--status-color, var(--health-muted));
}

.status-pill {
  border-radius: 999px;
  color: #0b1120;
  font-size: 0.72rem;
  font-weight: 700;
  padding: 2px 8px;
  text-transform: uppercase;
}

.kpi-trend {
  color: var(--health-muted);
  font-size: 0.8rem;
}

.chart-grid {
  display: grid;
  grid-template-columns: repeat(auto-fit, minmax(320px, 1fr));
  gap: 16px;
}

.trend-chart svg {
  width: 100%;
  height: 160px;
}

.trend-chart polyline {
  fill: none;
  stroke-width: 3;
  stroke-linejoin: round;
}

.trend-chart .axis-label {
  color: var(--health-muted);
  display: flex;
  justify-content: space-between;
  font-size: 0.75rem;
}

.toolbar {
  display: flex;
  flex-wrap: wrap;
  gap: 12px;
  align-items: center;
}

.toolbar input,
.toolbar select {
  background: var(--health-panel);
  border: 1px solid var(--health-border);
  border-radius: 10px;
  color: var(--health-text);
  font: inherit;
  padding: 8px 12px;
}

.filter-chip {
  background: transparent;
  border: 1px solid var(--health-border);
  border-radius: 999px;
  color: var(--health-muted);
  cursor: pointer;
  font: inherit;
  padding: 6px 12px;
}

.filter-chip.is-active {
  border-color: var(--health-accent);
  color: var(--health-accent);
}

.patient-table {
  border-collapse: collapse;
  width: 100%;
}

.patient-table th,
.patient-table td {
  border-bottom: 1px solid var(--health-border);
  padding: 10px 12px;
  text-align: left;
}

.patient-table tbody tr {
  cursor: pointer;
}

.patient-table tbody tr:hover {
  background: rgba(56, 189, 248, 0.08);
}

.insight-list {
  list-style: none;
  margin: 0;
  padding: 0;
  display: flex;
  flex-direction: column;
  gap: 10px;
}

.empty-state {
  color: var(--health-muted);
  font-style: italic;
}

@media (max-width: 860px) {
  .health-shell {
    grid-template-columns: 1fr;
  }

  .health-nav {
    flex-direction: row;
    flex-wrap: wrap;
    border-right: 0;
    border-bottom: 1px solid var(--health-border);
  }
}
"#;

pub fn ensure_styles(document: &Document) -> Result<(), JsValue> {
    if document.query_selector(STYLE_TAG_SELECTOR)?.is_some() {
        return Ok(());
    }

    let head = document
        .head()
        .ok_or_else(|| JsValue::from_str("Document has no <head> element"))?;

    let style_el = document.create_element("style")?;
    style_el.set_attribute("data-health-ui", "v1")?;
    style_el.set_text_content(Some(DEFAULT_STYLES));
    head.append_child(&style_el.clone().dyn_into::<Node>()?)?;

    Ok(())
}
