use serde_json::Value;

use common::errors::SignalError;
use common::models::{Direction, TradeSignal};

const FENCE: &str = "```";

/// Removes markdown code fences (optionally tagged, e.g. ```` ```json ````)
/// wrapping `raw`. Pure text transform; applying it twice equals applying it
/// once.
pub fn strip_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    loop {
        let before = text;

        if let Some(rest) = text.strip_prefix(FENCE) {
            text = rest
                .trim_start_matches([' ', '\t'])
                .trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        }
        if let Some(rest) = text.strip_suffix(FENCE) {
            text = rest;
        }
        text = text.trim();

        if text == before {
            return text;
        }
    }
}

/// Turns raw model text into a validated signal.
pub fn parse_signal(raw: &str) -> Result<TradeSignal, SignalError> {
    let body = strip_fences(raw);

    let value: Value = serde_json::from_str(body)
        .map_err(|e| SignalError(format!("response is not valid JSON ({})", e)))?;

    let Value::Object(fields) = value else {
        return Err(SignalError("expected a JSON object".to_string()));
    };

    let direction = match fields.get("signal") {
        Some(Value::String(s)) => Direction::from_exact(s).ok_or_else(|| {
            SignalError(format!("unrecognized signal '{}', expected LONG or SHORT", s))
        })?,
        Some(other) => {
            return Err(SignalError(format!("'signal' must be a string, got {}", other)));
        }
        None => return Err(SignalError("missing 'signal' field".to_string())),
    };

    let rationale = match fields.get("rationale") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            return Err(SignalError(format!("'rationale' must be a string, got {}", other)));
        }
    };

    Ok(TradeSignal::new(direction, rationale))
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::models::RATIONALE_PLACEHOLDER;

    const BODIES: &[&str] = &[
        r#"{"signal":"LONG","rationale":"Upward momentum"}"#,
        r#"{"signal":"SHORT"}"#,
        r#"{"signal":"HOLD","rationale":"flat"}"#,
        "not json",
        "[1, 2, 3]",
    ];

    fn fenced(body: &str) -> Vec<String> {
        vec![
            format!("```json\n{}\n```", body),
            format!("```\n{}\n```", body),
            format!("``` json\n{}\n```", body),
            format!("  ```JSON\r\n{}\r\n```  \n", body),
            format!("```json\n```json\n{}\n```\n```", body),
        ]
    }

    #[test]
    fn test_strip_fences() {
        assert_eq!(strip_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_fences("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_fences("  plain text "), "plain text");
        assert_eq!(strip_fences("```"), "");
        assert_eq!(strip_fences("```json{\"a\":1}```"), "{\"a\":1}");
        assert_eq!(strip_fences("``` json\n{\"signal\":\"LONG\"}\n```"), "{\"signal\":\"LONG\"}");
    }

    #[test]
    fn test_strip_is_idempotent() {
        for body in BODIES {
            for wrapped in fenced(body) {
                let once = strip_fences(&wrapped);
                assert_eq!(strip_fences(once), once, "{wrapped:?}");
                assert_eq!(once, *body);
            }
        }
    }

    #[test]
    fn test_fenced_parses_like_unwrapped() {
        for body in BODIES {
            let direct = parse_signal(body);
            for wrapped in fenced(body) {
                assert_eq!(parse_signal(&wrapped), direct, "{wrapped:?}");
            }
        }
    }

    #[test]
    fn test_valid_signal() {
        let signal = parse_signal("```json\n{\"signal\":\"LONG\",\"rationale\":\"Upward momentum\"}\n```").unwrap();
        assert_eq!(signal.signal, Direction::Long);
        assert_eq!(signal.rationale, "Upward momentum");
    }

    #[test]
    fn test_missing_rationale_uses_placeholder() {
        for body in [
            r#"{"signal":"SHORT"}"#,
            r#"{"signal":"SHORT","rationale":null}"#,
            r#"{"signal":"SHORT","rationale":""}"#,
        ] {
            let signal = parse_signal(body).unwrap();
            assert_eq!(signal.signal, Direction::Short);
            assert_eq!(signal.rationale, RATIONALE_PLACEHOLDER);
        }
    }

    #[test]
    fn test_extra_fields_ignored() {
        let signal = parse_signal(r#"{"signal":"LONG","confidence":0.8,"rationale":"ok"}"#).unwrap();
        assert_eq!(signal.rationale, "ok");
    }

    #[test]
    fn test_unknown_direction_rejected() {
        for body in [
            r#"{"signal":"HOLD"}"#,
            r#"{"signal":"long"}"#,
            r#"{"signal":" LONG"}"#,
            r#"{"signal":""}"#,
            r#"{"signal":1}"#,
            r#"{"rationale":"no direction"}"#,
        ] {
            assert!(parse_signal(body).is_err(), "{body}");
        }
    }

    #[test]
    fn test_not_json_rejected() {
        let err = parse_signal("not json").unwrap_err();
        assert!(err.0.contains("not valid JSON"));

        assert!(parse_signal("").is_err());
        assert!(parse_signal("[\"LONG\"]").is_err());
        assert!(parse_signal(r#"{"signal":"LONG","rationale":42}"#).is_err());
    }
}
