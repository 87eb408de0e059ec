//! Output → human/json/raw string formatting.
//!
//! Three modes:
//! - **Human** (default): one line per field, `OK` for writes
//! - **JSON** (`--json`): `serde_json::to_string_pretty`
//! - **Raw** (`--raw`): the payload exactly as the contract returns it

use ledger_executor::{Error, Event, HistoryQueryResult, Output, QueryResult};

/// Output formatting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
    Raw,
}

/// Format a successful output.
pub fn format_output(output: &Output, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => format_json(output),
        OutputMode::Raw => format_raw(output),
        OutputMode::Human => format_human(output),
    }
}

/// Format an error.
pub fn format_error(err: &Error, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => serde_json::to_string_pretty(&serde_json::json!({
            "error": format!("{}", err)
        }))
        .unwrap_or_else(|_| format!("{{\"error\": \"{}\"}}", err)),
        OutputMode::Raw => format!("{}", err),
        OutputMode::Human => format!("(error) {}", err),
    }
}

fn format_json(output: &Output) -> String {
    let rendered = match output {
        Output::Unit => return String::new(),
        Output::Event(event) => serde_json::to_string_pretty(event),
        Output::Events(results) => serde_json::to_string_pretty(results),
        Output::History(history) => serde_json::to_string_pretty(history),
    };
    rendered.unwrap_or_else(|e| format!("(error) {}", e))
}

fn format_raw(output: &Output) -> String {
    match output.to_payload() {
        Ok(payload) => String::from_utf8_lossy(&payload).into_owned(),
        Err(e) => format!("(error) {}", e),
    }
}

fn format_human(output: &Output) -> String {
    match output {
        Output::Unit => "OK".to_string(),
        Output::Event(event) => format_event(event, ""),
        Output::Events(results) => format_events(results),
        Output::History(history) => format_history(history),
    }
}

fn format_event(event: &Event, indent: &str) -> String {
    let fields = [
        ("type", event.kind.clone()),
        ("host", event.host.clone()),
        ("target", event.target.clone()),
        ("serviceProduct", event.service_product.clone()),
        ("minPrice", event.min_price.to_string()),
        ("maxLimit", event.max_num.to_string()),
        ("expireDate", event.expire_date.clone()),
        ("user", event.user.clone()),
        ("status", event.status.clone()),
        ("timestamp", event.timestamp.to_rfc3339()),
    ];
    fields
        .iter()
        .map(|(name, value)| format!("{}{}: {:?}", indent, name, value))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_events(results: &[QueryResult]) -> String {
    if results.is_empty() {
        return "(empty list)".to_string();
    }
    results
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{}) {:?}\n{}", i + 1, r.key, format_event(&r.record, "   ")))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_history(history: &[HistoryQueryResult]) -> String {
    if history.is_empty() {
        return "(empty list)".to_string();
    }
    history
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let header = format!(
                "{}) tx {} at {}{}",
                i + 1,
                h.tx_id,
                h.timestamp.to_rfc3339(),
                if h.is_delete { " (deleted)" } else { "" }
            );
            if h.is_delete {
                header
            } else {
                format!("{}\n{}", header, format_event(&h.record, "   "))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
