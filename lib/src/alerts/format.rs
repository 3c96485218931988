/******************************************************************************
 * Copyright ContinuousC. Licensed under the "Elastic License 2.0".           *
 ******************************************************************************/

use std::fmt::Write;

use chrono::{DateTime, Utc};

use super::{Alert, AlertStatus};

pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S %Z";

pub fn format_timestamp(time: DateTime<Utc>) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Build the Telegram message body (HTML parse mode) for an alert.
///
/// `now` is rendered as Start Time for PROBLEM and informational
/// alerts, and as End Time for RESOLVED alerts. `start_time`, if
/// given, is the Start Time preserved from the original PROBLEM
/// event; `problem_details` the Details preserved from it, used when
/// a RESOLVED alert carries no details of its own.
pub fn format_message(
    alert: &Alert,
    now: DateTime<Utc>,
    start_time: Option<&str>,
    problem_details: Option<&str>,
) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} <b>{}</b>",
        status_glyph(&alert.status),
        escape_html(&alert.status.to_string())
    );
    if !alert.trigger_name.is_empty() {
        let _ = writeln!(
            out,
            "🔔 <b>Trigger:</b> {}",
            escape_html(&alert.trigger_name)
        );
    }
    if !alert.host.is_empty() {
        let _ = writeln!(out, "🖥 <b>Host:</b> {}", escape_html(&alert.host));
    }
    if !alert.severity.is_empty() {
        let _ = writeln!(
            out,
            "{} <b>Severity:</b> {}",
            severity_glyph(&alert.severity),
            escape_html(&alert.severity)
        );
    }

    let details = match problem_details {
        Some(preserved)
            if alert.status == AlertStatus::Resolved
                && alert.message.is_empty()
                && !preserved.is_empty() =>
        {
            preserved
        }
        _ => alert.message.as_str(),
    };
    if !details.is_empty() {
        let _ = writeln!(out, "📝 <b>Details:</b> {}", escape_html(details));
    }
    if !alert.event_id.is_empty() {
        let _ = writeln!(out, "🆔 <b>Event ID:</b> {}", escape_html(&alert.event_id));
    }

    if alert.status == AlertStatus::Resolved {
        if let Some(start) = start_time.filter(|s| !s.is_empty()) {
            let _ = writeln!(out, "🕐 <b>Start Time:</b> {start}");
        }
        let _ = write!(out, "🕑 <b>End Time:</b> {}", format_timestamp(now));
    } else {
        let _ = write!(out, "🕐 <b>Start Time:</b> {}", format_timestamp(now));
    }

    out
}

fn status_glyph(status: &AlertStatus) -> &'static str {
    match status {
        AlertStatus::Problem => "🔴",
        AlertStatus::Resolved => "✅",
        AlertStatus::Other(_) => "ℹ️",
    }
}

fn severity_glyph(severity: &str) -> &'static str {
    match severity.to_uppercase().as_str() {
        "DISASTER" => "💀",
        "HIGH" => "🔥",
        "AVERAGE" => "⚡",
        "WARNING" => "⚠️",
        "INFORMATION" => "ℹ️",
        "NOT_CLASSIFIED" => "❓",
        _ => "❔",
    }
}

/// Escape the characters with special meaning in Telegram's HTML
/// parse mode: `&`, `<` and `>`.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
