//! Drives a document the way a view would: keydowns, pastes and focus requests.

use blockpad_engine::editing::{
    BlockDocument, BlockKind, BlockRecord, CaretRequest, Key, KeyInput, PendingFocus,
};
use blockpad_engine::paste::PastePayload;
use pretty_assertions::assert_eq;

fn contents(doc: &BlockDocument) -> Vec<&str> {
    doc.blocks().iter().map(|block| block.content.as_str()).collect()
}

#[test]
fn typing_enter_and_backspace_round_trip() {
    let mut doc = BlockDocument::new();
    let mut focus = PendingFocus::new();

    let caret = doc.insert_text(0, 0, "first line").unwrap();
    assert_eq!(caret, CaretRequest::at(0, 10));

    // Enter in the middle of the block
    let outcome = doc.handle_key(0, 5, &KeyInput::new(Key::Enter));
    focus.request(outcome.caret.unwrap());
    assert_eq!(contents(&doc), vec!["first", " line"]);

    // The view has not rendered the second surface yet
    assert_eq!(focus.take_ready(1), None);
    let ready = focus.take_ready(doc.len()).unwrap();
    assert_eq!(ready, CaretRequest::at(1, 0));

    // Backspace at the start of the new block joins them again
    let outcome = doc.handle_key(ready.block_index, 0, &KeyInput::new(Key::Backspace));
    assert_eq!(outcome.caret, Some(CaretRequest::at(0, 5)));
    assert_eq!(contents(&doc), vec!["first line"]);
}

#[test]
fn backspace_through_empty_blocks_stops_at_one() {
    let mut doc = BlockDocument::new();
    doc.handle_key(0, 0, &KeyInput::new(Key::Enter));
    doc.handle_key(1, 0, &KeyInput::new(Key::Enter));
    assert_eq!(doc.len(), 3);

    let mut index = doc.len() - 1;
    for _ in 0..5 {
        let outcome = doc.handle_key(index, 0, &KeyInput::new(Key::Backspace));
        if let Some(caret) = outcome.caret {
            index = caret.block_index;
        }
        assert!(doc.len() >= 1);
    }
    assert_eq!(contents(&doc), vec![""]);
}

#[test]
fn paste_code_then_persist_shape() {
    let mut doc = BlockDocument::from_records(&[BlockRecord::text("a", "Intro")]);
    let code = "fn main() {\n    println!(\"hi\");\n}";

    let caret = doc
        .paste(0, 5, PastePayload::Text(code.to_string()))
        .unwrap();
    assert_eq!(caret, CaretRequest::end_of(1));
    assert_eq!(caret.resolve_offset(doc.unit_len(1).unwrap()), code.chars().count());

    let records = doc.serialize();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].kind, BlockKind::Code);
    assert_eq!(records[1].content, code);
}
