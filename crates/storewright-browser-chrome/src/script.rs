//! In-page scripts for element operations.
//!
//! Every operation resolves its [`Locator`] from scratch inside the page and
//! answers with a JSON string, either `{"value": ...}` or
//! `{"error": "<kind>", "count": n}`. Returning a string keeps the reply a CDP
//! primitive regardless of how the evaluation is configured.

use crate::error::ChromeError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use storewright_interfaces::{ApiError, Locator, WaitState};

/// One element operation.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Op {
    Count,
    Visible,
    Texts,
    /// Strict: several matches are an error, none is `null`.
    Text,
    State { state: WaitState },
    Click,
    Fill { text: String },
    Select { value: String },
}

const RESOLVE: &str = r#"
  const visible = (el) => {
    const style = window.getComputedStyle(el);
    if (style.visibility === 'hidden' || style.display === 'none') return false;
    const rect = el.getBoundingClientRect();
    return rect.width > 0 && rect.height > 0;
  };
  let scope = [document];
  for (const seg of segments) {
    const found = new Set();
    for (const root of scope) {
      for (const el of root.querySelectorAll(seg.selector)) found.add(el);
    }
    let matches = Array.from(found).sort((a, b) =>
      a === b ? 0 : (a.compareDocumentPosition(b) & Node.DOCUMENT_POSITION_FOLLOWING ? -1 : 1));
    if (seg.hasText !== undefined) matches = matches.filter(el => (el.textContent || '').includes(seg.hasText));
    if (seg.textIs !== undefined) matches = matches.filter(el => (el.textContent || '').trim() === seg.textIs);
    if (seg.nth !== undefined) matches = matches.length > seg.nth ? [matches[seg.nth]] : [];
    scope = matches;
  }
  const els = scope;
  const single = () => {
    if (els.length === 0) throw { kind: 'notFound', count: 0 };
    if (els.length > 1) throw { kind: 'strict', count: els.length };
    return els[0];
  };
  const actionable = () => {
    const el = single();
    if (!visible(el)) throw { kind: 'hidden', count: 1 };
    el.scrollIntoView({ block: 'center' });
    return el;
  };
  const setValue = (el, proto, value) => {
    Object.getOwnPropertyDescriptor(proto, 'value').set.call(el, value);
    el.dispatchEvent(new Event('input', { bubbles: true }));
    el.dispatchEvent(new Event('change', { bubbles: true }));
  };
"#;

const DISPATCH: &str = r#"
  switch (op.kind) {
    case 'count': return { value: els.length };
    case 'visible': return { value: els.some(visible) };
    case 'texts': return { value: els.map(el => el.textContent || '') };
    case 'text':
      if (els.length === 0) return { value: null };
      return { value: single().textContent || '' };
    case 'state': {
      const shown = els.some(visible);
      switch (op.state) {
        case 'attached': return { value: els.length > 0 };
        case 'detached': return { value: els.length === 0 };
        case 'visible': return { value: shown };
        default: return { value: !shown };
      }
    }
    case 'click': actionable().click(); return { value: null };
    case 'fill': {
      const el = actionable();
      if (el.tagName !== 'INPUT' && el.tagName !== 'TEXTAREA') throw { kind: 'unsupported', count: 1 };
      el.focus();
      setValue(el, el.tagName === 'INPUT' ? HTMLInputElement.prototype : HTMLTextAreaElement.prototype, op.text);
      return { value: null };
    }
    case 'select': {
      const el = actionable();
      if (el.tagName !== 'SELECT') throw { kind: 'unsupported', count: 1 };
      if (!Array.from(el.options).some(o => o.value === op.value)) throw { kind: 'noOption', count: 0 };
      setValue(el, HTMLSelectElement.prototype, op.value);
      return { value: null };
    }
  }
  throw new Error('unknown op ' + op.kind);
"#;

/// Builds the expression performing `op` on `locator`.
pub fn element_op(locator: &Locator, op: &Op) -> Result<String, ChromeError> {
    let segments = serde_json::to_string(locator.segments())
        .map_err(|e| ChromeError::Payload(e.to_string()))?;
    let op = serde_json::to_string(op).map_err(|e| ChromeError::Payload(e.to_string()))?;
    Ok(format!(
        "JSON.stringify((() => {{\n  const segments = {segments};\n  const op = {op};\n{RESOLVE}\n  try {{{DISPATCH}  }} catch (e) {{\n    if (e && e.kind) return {{ error: e.kind, count: e.count }};\n    throw e;\n  }}\n}})())"
    ))
}

#[derive(Debug, Deserialize)]
struct Reply {
    #[serde(default)]
    value: Value,
    error: Option<String>,
    #[serde(default)]
    count: usize,
}

/// Interprets the JSON string returned by an [`element_op`] script.
pub fn parse_reply(locator: &Locator, op: &Op, raw: &str) -> Result<Value, ApiError> {
    let reply: Reply = serde_json::from_str(raw)?;
    let Some(kind) = reply.error else {
        return Ok(reply.value);
    };
    let operation = match op {
        Op::Click => "click",
        Op::Fill { .. } => "fill",
        Op::Select { .. } => "select_option",
        _ => "query",
    };
    Err(match kind.as_str() {
        "notFound" => ApiError::ElementNotFound(locator.to_string()),
        "strict" => ApiError::StrictModeViolation {
            locator: locator.to_string(),
            count: reply.count,
        },
        "hidden" => ApiError::UnsupportedElement {
            locator: locator.to_string(),
            operation: format!("{} (element is hidden)", operation),
        },
        "unsupported" => ApiError::UnsupportedElement {
            locator: locator.to_string(),
            operation: operation.to_string(),
        },
        "noOption" => ApiError::InvalidParameters(format!("no matching option in {}", locator)),
        other => ApiError::ProtocolError(format!("unknown script error {:?}", other)),
    })
}
