/*!
 * # Editing Core Module
 *
 * The block document editing model: an ordered sequence of blocks and the
 * operations that keep it consistent while the user types.
 *
 * ## Architecture Overview
 *
 * ### 1. Single Owner: `BlockDocument`
 * - The document owns its blocks; the order of the sequence is the display order
 * - It is never empty: removing the last block clears it instead
 * - Block ids are unique and never reused
 *
 * ### 2. Content Units
 * - Caret offsets count **content units**, not bytes (see `content`)
 * - An embedded image is one atomic unit that a split never divides
 * - Splitting at any offset and merging back reproduces the content exactly
 *
 * ### 3. Command-Based Editing
 * - Every mutation is also a `Cmd` value, applied through `BlockDocument::apply`
 * - Each application yields a `Patch`: whether anything changed, the new
 *   version and where focus should go next
 * - Keydowns are resolved by the keyboard policy into split, merge, remove
 *   or pass-through
 *
 * ### 4. Caret Requests Instead of Focus
 * - The core never touches a rendered surface
 * - Mutations return a `CaretRequest` (block index + optional unit offset)
 * - Views that render asynchronously park requests in `PendingFocus`
 *
 * ### 5. Read API: Snapshots and Observers
 * - `snapshot()` returns an immutable copy of the blocks with the version
 * - `subscribe()` registers a callback fired after every effective mutation
 *
 * ## Usage Pattern
 *
 * ```rust
 * use blockpad_engine::editing::*;
 *
 * let mut doc = BlockDocument::from_records(&[BlockRecord::text("a", "hello")]);
 *
 * // Enter with the caret after "he"
 * let outcome = doc.handle_key(0, 2, &Key::Enter.into());
 * assert!(outcome.prevent_default());
 *
 * // Backspace at the start of the new block joins them again
 * let outcome = doc.handle_key(1, 0, &Key::Backspace.into());
 * assert_eq!(outcome.caret, Some(CaretRequest::at(0, 2)));
 *
 * // Persist
 * let records = doc.serialize();
 * assert_eq!(records[0].content, "hello");
 * ```
 */

// Module exports
pub mod block;
pub mod caret;
pub mod commands;
pub mod content;
pub mod document;
pub mod keyboard;
pub mod patch;
pub mod snapshot;

// Public API re-exports
pub use block::{Block, BlockId, BlockKind, BlockRecord};
pub use caret::{CaretRequest, PendingFocus};
pub use commands::Cmd;
pub use document::BlockDocument;
pub use keyboard::{Key, KeyAction, KeyInput, KeyOutcome, Modifiers, resolve_key};
pub use patch::Patch;
pub use snapshot::{Observer, Snapshot, SubscriptionId};
