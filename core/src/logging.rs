//! Request/response logging in a copy-pasteable form.
//!
//! Every exchange is rendered as a `REQUEST` block holding an equivalent curl
//! command and a `RESPONSE` block holding the status and body. Logging is
//! best-effort: a formatting failure is reported at error level and the
//! caller's result is left alone.

use std::fmt::Write as _;

use colored::Colorize;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::LogError;
use crate::http::{HttpRequest, HttpResponse};

const RULE_WIDTH: usize = 80;
const JSON_INDENT: &[u8] = b"    ";

/// Emits both blocks for one exchange. Never fails.
///
/// The request block goes out before the response is formatted, so the curl
/// command survives a response that cannot be rendered.
pub fn log_exchange(request: &HttpRequest, response: &HttpResponse) {
    let test_name = current_test_name();
    match format_request(request, test_name.as_deref()) {
        Ok(block) => emit(&block),
        Err(err) => tracing::error!("Logging failed: {err}"),
    }
    match format_response(response) {
        Ok(block) => emit(&block),
        Err(err) => tracing::error!("Logging failed: {err}"),
    }
}

/// One event per line keeps every line prefixed by the subscriber.
fn emit(block: &str) {
    for line in block.lines() {
        tracing::info!("{line}");
    }
}

/// The `REQUEST` block: banner, optional test name, curl command.
pub fn format_request(request: &HttpRequest, test_name: Option<&str>) -> Result<String, LogError> {
    let mut out = String::new();
    writeln!(out, "{}", banner("REQUEST"))?;
    if let Some(name) = test_name {
        writeln!(out, "{}", format!("cargo test {name}").green())?;
    }
    out.push_str(&curl_command(request));
    Ok(out)
}

/// Renders the request as a curl invocation, one flag per line.
pub fn curl_command(request: &HttpRequest) -> String {
    let mut lines = vec![format!("curl -X {} '{}'", request.method, request.url)];
    lines.extend(
        request
            .headers
            .iter()
            .map(|(name, value)| format!("-H '{name}: {value}'")),
    );
    if let Some(body) = request.body.as_deref().filter(|body| *body != "{}") {
        lines.push(format!("-d '{body}'"));
    }
    lines.join(" \\\n")
}

/// The `RESPONSE` block. Failed statuses are highlighted in red.
pub fn format_response(response: &HttpResponse) -> Result<String, LogError> {
    let data = pretty_body(response)?;
    let mut out = String::new();
    writeln!(out, "{}", banner("RESPONSE"))?;
    if response.is_success() {
        writeln!(out, "\tSTATUS_CODE: {}", response.status.to_string().green())?;
        writeln!(out, "\tDATA:\n{data}")?;
    } else {
        writeln!(out, "\tSTATUS_CODE: {}", response.status.to_string().red())?;
        writeln!(out, "\tDATA: {}", data.red())?;
    }
    out.push_str(&"=".repeat(RULE_WIDTH));
    Ok(out)
}

/// JSON bodies re-indented, anything else as raw text.
fn pretty_body(response: &HttpResponse) -> Result<String, LogError> {
    let text = response.text()?;
    let Ok(value) = serde_json::from_str::<serde_json::Value>(text) else {
        return Ok(text.to_string());
    };
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(JSON_INDENT));
    value.serialize(&mut serializer)?;
    // serde_json only ever writes valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn banner(label: &str) -> String {
    let side = "=".repeat(40);
    format!("{side} {label} {side}")
}

/// Name of the running test, if any.
///
/// The libtest harness runs each test on a thread named after it.
pub fn current_test_name() -> Option<String> {
    std::thread::current()
        .name()
        .filter(|name| *name != "main")
        .map(str::to_string)
}
