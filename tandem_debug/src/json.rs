// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON helpers: batches in their wire shape, and recorded events.

use std::io::{self, Write};

use serde_json::{Value, json};

use tandem_core::command::Batch;

use crate::recorder::RecordedEvent;

/// Encodes a batch as compact wire JSON.
///
/// # Errors
///
/// Fails only if a property value cannot be represented in JSON (a
/// non-finite number).
pub fn encode_batch(batch: &Batch) -> serde_json::Result<String> {
    serde_json::to_string(batch)
}

/// Decodes a batch from wire JSON.
///
/// # Errors
///
/// Fails if `text` is not a well-formed batch.
pub fn decode_batch(text: &str) -> serde_json::Result<Batch> {
    serde_json::from_str(text)
}

/// Writes `batch` as indented JSON followed by a newline.
///
/// # Errors
///
/// Propagates write failures.
pub fn dump_pretty(batch: &Batch, writer: &mut dyn Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, batch)?;
    writeln!(writer)
}

/// Writes recorded events as a JSON array, one object per event.
///
/// # Errors
///
/// Propagates write failures.
pub fn export_events(events: &[RecordedEvent], writer: &mut dyn Write) -> io::Result<()> {
    let values: Vec<Value> = events.iter().map(event_json).collect();
    serde_json::to_writer(&mut *writer, &values)?;
    Ok(())
}

fn event_json(event: &RecordedEvent) -> Value {
    match event {
        RecordedEvent::CommandBuffered(e) => json!({
            "event": "CommandBuffered",
            "name": e.name.as_str(),
            "id": e.id.get(),
            "coalesced": e.coalesced,
            "pending": e.pending,
        }),
        RecordedEvent::BatchFlushed(e) => json!({
            "event": "BatchFlushed",
            "commands": e.commands,
        }),
        RecordedEvent::CommandApplied(e) => json!({
            "event": "CommandApplied",
            "index": e.index,
            "name": e.name.as_str(),
            "id": e.id.get(),
            "created": e.created,
        }),
        RecordedEvent::BatchApplied(e) => json!({
            "event": "BatchApplied",
            "commands": e.commands,
            "elements": e.elements,
        }),
        RecordedEvent::Validated(e) => json!({
            "event": "Validated",
            "elements": e.elements,
            "skipped": e.skipped,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tandem_core::command::{Command, CommandOptions};
    use tandem_core::element::{ElementId, Value as PropValue};
    use tandem_core::trace::BatchFlushedEvent;

    #[test]
    fn wire_shape_matches_protocol() {
        let batch = vec![
            Command::update(
                CommandOptions::new(ElementId(0))
                    .typed("Rectangle")
                    .with("x", 10),
            ),
            Command::destroy(ElementId(3)),
        ];
        let value: Value = serde_json::from_str(&encode_batch(&batch).unwrap()).unwrap();
        assert_eq!(
            value,
            json!([
                { "name": "updateElement", "options": { "id": 0, "type": "Rectangle", "x": 10.0 } },
                { "name": "destroyElement", "options": { "id": 3 } }
            ])
        );
    }

    #[test]
    fn parent_and_root_decode_from_wire() {
        let text = r#"[{"name":"updateElement","options":{"id":4,"parent":0,"root":true,"fill":"red","visible":false}}]"#;
        let batch = decode_batch(text).unwrap();
        let opts = &batch[0].options;
        assert_eq!(opts.id, ElementId(4));
        assert_eq!(opts.parent, Some(ElementId(0)));
        assert!(opts.root, "root flag decoded");
        assert_eq!(opts.props.get("fill"), Some(&PropValue::from("red")));
        assert_eq!(opts.props.flag("visible"), Some(false));
        assert!(!opts.props.contains_key("id"), "id is not a property");
    }

    #[test]
    fn non_finite_number_is_an_encode_error() {
        for n in [f64::NAN, f64::INFINITY] {
            let batch = vec![Command::update(
                CommandOptions::new(ElementId(1)).with("x", n),
            )];
            assert!(encode_batch(&batch).is_err(), "{n} must not become null");
        }
        let nested = vec![Command::update(CommandOptions::new(ElementId(1)).with(
            "x",
            PropValue::List(vec![PropValue::from(1), PropValue::from(f64::NEG_INFINITY)]),
        ))];
        assert!(encode_batch(&nested).is_err(), "inside a list too");
    }

    #[test]
    fn batch_survives_the_wire() {
        let batch = vec![
            Command::update(
                CommandOptions::new(ElementId(2))
                    .typed("Rectangle")
                    .parent(ElementId(0))
                    .with("fill", "blue"),
            ),
            Command::destroy(ElementId(2)),
        ];
        let text = encode_batch(&batch).unwrap();
        assert!(text.contains(r#""name":"destroyElement""#), "got: {text}");
        assert_eq!(decode_batch(&text).unwrap(), batch);
    }

    #[test]
    fn malformed_batch_is_rejected() {
        assert!(
            decode_batch(r#"[{"name":"moveElement","options":{"id":1}}]"#).is_err(),
            "unknown command name"
        );
        assert!(
            decode_batch(r#"[{"name":"destroyElement","options":{}}]"#).is_err(),
            "missing id"
        );
    }

    #[test]
    fn pretty_dump_ends_with_newline() {
        let mut out = Vec::new();
        dump_pretty(&vec![Command::destroy(ElementId(1))], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("]\n"), "got: {text}");
    }

    #[test]
    fn events_export_as_array() {
        let mut out = Vec::new();
        export_events(
            &[RecordedEvent::BatchFlushed(BatchFlushedEvent { commands: 3 })],
            &mut out,
        )
        .unwrap();
        let value: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value, json!([{ "event": "BatchFlushed", "commands": 3 }]));
    }
}
