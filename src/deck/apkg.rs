/*!
 * Anki package (.apkg) writer.
 *
 * An .apkg is a ZIP holding a `collection.anki2` SQLite database, a `media`
 * JSON map from numbered entry names to file names, and the numbered media
 * files themselves.
 */

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use log::debug;
use rusqlite::{params, Connection};
use serde_json::{json, Value};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::deck::card::{card_id, Deck};
use crate::deck::model::{field_checksum, strip_html, NoteModel};
use crate::errors::DeckError;

// @const: Database file name inside the package
pub const COLLECTION_FILE: &str = "collection.anki2";

// @const: Media map file name inside the package
pub const MEDIA_FILE: &str = "media";

// @const: Collection schema version understood by every Anki release since 2.0
const SCHEMA_VERSION: i64 = 11;

/// Collection tables, as created by Anki 2.0
const COLLECTION_SCHEMA: &str = "
CREATE TABLE col (
    id      integer primary key,
    crt     integer not null,
    mod     integer not null,
    scm     integer not null,
    ver     integer not null,
    dty     integer not null,
    usn     integer not null,
    ls      integer not null,
    conf    text not null,
    models  text not null,
    decks   text not null,
    dconf   text not null,
    tags    text not null
);
CREATE TABLE notes (
    id      integer primary key,
    guid    text not null,
    mid     integer not null,
    mod     integer not null,
    usn     integer not null,
    tags    text not null,
    flds    text not null,
    sfld    integer not null,
    csum    integer not null,
    flags   integer not null,
    data    text not null
);
CREATE TABLE cards (
    id      integer primary key,
    nid     integer not null,
    did     integer not null,
    ord     integer not null,
    mod     integer not null,
    usn     integer not null,
    type    integer not null,
    queue   integer not null,
    due     integer not null,
    ivl     integer not null,
    factor  integer not null,
    reps    integer not null,
    lapses  integer not null,
    left    integer not null,
    odue    integer not null,
    odid    integer not null,
    flags   integer not null,
    data    text not null
);
CREATE TABLE revlog (
    id      integer primary key,
    cid     integer not null,
    usn     integer not null,
    ease    integer not null,
    ivl     integer not null,
    lastIvl integer not null,
    factor  integer not null,
    time    integer not null,
    type    integer not null
);
CREATE TABLE graves (
    usn     integer not null,
    oid     integer not null,
    type    integer not null
);
CREATE INDEX ix_notes_usn ON notes (usn);
CREATE INDEX ix_cards_usn ON cards (usn);
CREATE INDEX ix_revlog_usn ON revlog (usn);
CREATE INDEX ix_cards_nid ON cards (nid);
CREATE INDEX ix_cards_sched ON cards (did, queue, due);
CREATE INDEX ix_revlog_cid ON revlog (cid);
CREATE INDEX ix_notes_csum ON notes (csum);
";

/// Counts of what was written to a package
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageSummary {
    pub notes: usize,
    pub cards: usize,
    pub media: usize,
}

/// Space separated tag list with surrounding spaces, as stored by Anki
pub fn format_tags(tags: &[String]) -> String {
    if tags.is_empty() {
        String::new()
    } else {
        format!(" {} ", tags.join(" "))
    }
}

/// Media map and ordered media names of a deck
///
/// Keys are the entry names inside the package ("0", "1", ...).
pub fn media_map(deck: &Deck) -> BTreeMap<String, String> {
    deck.cards
        .iter()
        .flat_map(|card| card.media().into_iter().map(|(name, _)| name))
        .enumerate()
        .map(|(index, name)| (index.to_string(), name))
        .collect()
}

/// Write the collection database of `deck` to `path`
pub fn write_collection(path: &Path, deck: &Deck, model: &NoteModel, modified: i64) -> Result<PackageSummary, DeckError> {
    let mut conn = Connection::open(path)?;
    conn.execute_batch(COLLECTION_SCHEMA)?;

    let tx = conn.transaction()?;

    let models = json!({ model.id.to_string(): model.to_json(deck.deck_id, modified) });
    tx.execute(
        "INSERT INTO col VALUES (1, ?1, ?2, ?3, ?4, 0, 0, 0, ?5, ?6, ?7, ?8, '{}')",
        params![
            modified,
            modified * 1000,
            modified * 1000,
            SCHEMA_VERSION,
            collection_conf(deck.deck_id, model.id).to_string(),
            models.to_string(),
            collection_decks(deck, modified).to_string(),
            deck_options().to_string(),
        ],
    )?;

    let mut cards_written = 0;
    {
        let mut insert_note = tx.prepare(
            "INSERT INTO notes (id, guid, mid, mod, usn, tags, flds, sfld, csum, flags, data)
             VALUES (?1, ?2, ?3, ?4, -1, ?5, ?6, ?7, ?8, 0, '')",
        )?;
        let mut insert_card = tx.prepare(
            "INSERT INTO cards (id, nid, did, ord, mod, usn, type, queue, due, ivl, factor, reps, lapses, left, odue, odid, flags, data)
             VALUES (?1, ?2, ?3, ?4, ?5, -1, 0, 0, ?6, 0, 0, 0, 0, 0, 0, 0, 0, '')",
        )?;

        for (position, card) in deck.cards.iter().enumerate() {
            let fields = model.note_fields(card);
            let sort_field = strip_html(&fields[0]);

            insert_note.execute(params![
                card.note_id,
                card.guid,
                model.id,
                modified,
                format_tags(&card.tags),
                model.joined_fields(card),
                sort_field,
                field_checksum(&fields[0]),
            ])?;

            for ord in 0..model.templates.len() as u32 {
                insert_card.execute(params![
                    card_id(card.note_id, ord),
                    card.note_id,
                    deck.deck_id,
                    ord,
                    modified,
                    position as i64 + 1,
                ])?;
                cards_written += 1;
            }
        }
    }
    tx.commit()?;

    let media = deck.cards.iter().map(|c| c.media().len()).sum();
    debug!("Wrote collection with {} notes and {} cards to {}", deck.cards.len(), cards_written, path.display());

    Ok(PackageSummary {
        notes: deck.cards.len(),
        cards: cards_written,
        media,
    })
}

/// Package a written collection and the deck's media into an .apkg
pub fn write_package(package_path: &Path, collection_path: &Path, deck: &Deck) -> Result<(), DeckError> {
    let file = File::create(package_path)?;
    let mut zip = ZipWriter::new(file);
    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file(COLLECTION_FILE, deflated)?;
    zip.write_all(&std::fs::read(collection_path)?)?;

    let media_map = media_map(deck);
    zip.start_file(MEDIA_FILE, deflated)?;
    zip.write_all(serde_json::to_string(&media_map)?.as_bytes())?;

    // MP3 does not compress further
    let payloads = deck.cards.iter().flat_map(|c| c.media());
    for (index, (_, audio)) in payloads.enumerate() {
        zip.start_file(index.to_string(), stored)?;
        zip.write_all(audio)?;
    }

    zip.finish()?;
    Ok(())
}

fn collection_conf(deck_id: i64, model_id: i64) -> Value {
    json!({
        "activeDecks": [deck_id],
        "addToCur": true,
        "collapseTime": 1200,
        "curDeck": deck_id,
        "curModel": model_id.to_string(),
        "dueCounts": true,
        "estTimes": true,
        "newBury": true,
        "newSpread": 0,
        "nextPos": 1,
        "sortBackwards": false,
        "sortType": "noteFld",
        "timeLim": 0,
    })
}

fn deck_entry(id: i64, name: &str, description: &str, modified: i64) -> Value {
    json!({
        "id": id,
        "name": name,
        "desc": description,
        "mod": modified,
        "usn": -1,
        "conf": 1,
        "dyn": 0,
        "collapsed": false,
        "extendNew": 10,
        "extendRev": 50,
        "lrnToday": [0, 0],
        "newToday": [0, 0],
        "revToday": [0, 0],
        "timeToday": [0, 0],
    })
}

fn collection_decks(deck: &Deck, modified: i64) -> Value {
    json!({
        "1": deck_entry(1, "Default", "", modified),
        deck.deck_id.to_string(): deck_entry(deck.deck_id, &deck.name, &deck.description, modified),
    })
}

fn deck_options() -> Value {
    json!({
        "1": {
            "id": 1,
            "name": "Default",
            "mod": 0,
            "usn": 0,
            "maxTaken": 60,
            "autoplay": true,
            "timer": 0,
            "replayq": true,
            "dyn": false,
            "new": {
                "bury": true,
                "delays": [1, 10],
                "initialFactor": 2500,
                "ints": [1, 4, 7],
                "order": 1,
                "perDay": 20,
                "separate": true,
            },
            "lapse": {
                "delays": [10],
                "leechAction": 0,
                "leechFails": 8,
                "minInt": 1,
                "mult": 0,
            },
            "rev": {
                "bury": true,
                "ease4": 1.3,
                "fuzz": 0.05,
                "ivlFct": 1,
                "maxIvl": 36500,
                "minSpace": 1,
                "perDay": 100,
            },
        }
    })
}
