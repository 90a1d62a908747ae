//! Response rendering: JSON by default, XML under a fixed `response` root on request.

use crate::error::{AppError, ErrorBody};
use crate::extractors::ResponseFormat;
use axum::{
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// Root element of every XML body.
pub const XML_ROOT: &str = "response";

/// Element wrapping each entry of a sequence.
pub const XML_ITEM: &str = "item";

pub const XML_CONTENT_TYPE: &str = "application/xml";

/// Written verbatim ahead of the root element, space before `?>` included.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" ?>"#;

/// Result of a handler: status plus a mapping to render.
pub type Outcome = Result<(StatusCode, Value), AppError>;

/// Render `data` with `status` in the requested format. The status passes through unchanged.
pub fn format_response(data: &Value, status: StatusCode, format: ResponseFormat) -> Response {
    match format {
        ResponseFormat::Json => (status, Json(data)).into_response(),
        ResponseFormat::Xml => match to_xml(data) {
            Ok(body) => (status, [(CONTENT_TYPE, XML_CONTENT_TYPE)], body).into_response(),
            Err(e) => e.into_response(),
        },
    }
}

/// Render a handler outcome. Client errors honor the format; server faults are always JSON.
pub fn respond(format: ResponseFormat, outcome: Outcome) -> Response {
    match outcome {
        Ok((status, body)) => format_response(&body, status, format),
        Err(err) if err.is_internal() => err.into_response(),
        Err(err) => {
            let body = error_body(&err.to_string());
            format_response(&body, err.status(), format)
        }
    }
}

pub fn error_body(message: &str) -> Value {
    serde_json::to_value(ErrorBody {
        error: message.to_string(),
    })
    .unwrap_or(Value::Null)
}

pub fn message_body(message: &str) -> Value {
    serde_json::json!({ "message": message })
}

/// Serialize a mapping as an XML document rooted at `<response>`, without type attributes.
pub fn to_xml(data: &Value) -> Result<String, AppError> {
    let mut writer = Writer::new(XML_DECLARATION.as_bytes().to_vec());
    write_element(&mut writer, XML_ROOT, data)?;
    String::from_utf8(writer.into_inner()).map_err(|e| AppError::Internal(e.to_string()))
}

fn xml_err<E: std::fmt::Display>(e: E) -> AppError {
    AppError::Internal(format!("xml: {}", e))
}

fn xml_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9._-]*$").expect("valid xml name pattern"))
}

/// Keys that are not valid element names become `<key name="...">`.
fn start_for(key: &str) -> (BytesStart<'static>, &'static str) {
    let re = xml_name_re();
    if re.is_match(key) && !key.to_ascii_lowercase().starts_with("xml") {
        (BytesStart::new(key.to_string()), "")
    } else {
        let mut start = BytesStart::new("key");
        start.push_attribute(("name", key));
        (start, "key")
    }
}

fn write_element(writer: &mut Writer<Vec<u8>>, key: &str, value: &Value) -> Result<(), AppError> {
    let (start, fallback) = start_for(key);
    let end_name = if fallback.is_empty() { key } else { fallback };
    writer.write_event(Event::Start(start)).map_err(xml_err)?;
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                write_element(writer, k, v)?;
            }
        }
        Value::Array(items) => {
            for v in items {
                write_element(writer, XML_ITEM, v)?;
            }
        }
        Value::Null => {}
        Value::String(s) => {
            writer
                .write_event(Event::Text(BytesText::new(s)))
                .map_err(xml_err)?;
        }
        Value::Bool(_) | Value::Number(_) => {
            let text = value.to_string();
            writer
                .write_event(Event::Text(BytesText::new(&text)))
                .map_err(xml_err)?;
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(end_name)))
        .map_err(xml_err)?;
    Ok(())
}
