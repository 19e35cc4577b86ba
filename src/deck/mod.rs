/*!
 * Deck building and packaging.
 *
 * - `card`: card records and stable note/card identifiers
 * - `builder`: per-entry translation, verification and audio pipeline
 * - `model`: Anki note type and templates
 * - `apkg`: Anki package writer
 * - `archive`: plain ZIP archive writer
 * - `assembler`: writes both artifacts into the output directory
 */

pub mod apkg;
pub mod archive;
pub mod assembler;
pub mod builder;
pub mod card;
pub mod model;

pub use self::assembler::{AssembledDeck, DeckAssembler};
pub use self::builder::{BuildReport, BuildStage, CardBuilder, EntryFailure};
pub use self::card::{card_id, note_guid, note_id, Card, Deck};
pub use self::model::NoteModel;
