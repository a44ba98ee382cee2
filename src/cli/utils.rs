use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::screens::{Alert, AlertKind};

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(
    output_format: &OutputFormat,
    message: &str,
    error_code: Option<&str>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(
    output_format: &OutputFormat,
    collection_name: &str,
    message: &str,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    collection_name: []
                }))?
            );
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

/// Output a collection: JSON gets the raw items, text gets one line per item
pub fn output_collection<T, F>(
    output_format: &OutputFormat,
    collection_name: &str,
    items: &[T],
    line: F,
) -> anyhow::Result<()>
where
    T: serde::Serialize,
    F: Fn(&T) -> String,
{
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    collection_name: items
                }))?
            );
        }
        OutputFormat::Text => {
            for item in items {
                println!("{}", line(item));
            }
        }
    }
    Ok(())
}

/// Turn the alert a screen action left behind into command output. Errors
/// and warnings fail the command.
pub fn output_alert(
    output_format: &OutputFormat,
    alert: Option<&Alert>,
    fallback: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match alert {
        Some(alert) if alert.kind != AlertKind::Success => {
            anyhow::bail!("{}", alert.message)
        }
        Some(alert) => output_success(output_format, &alert.message, data),
        None => output_success(output_format, fallback, data),
    }
}
