/*!
 * Deck assembly.
 *
 * Turns the built cards into the two output artifacts, an importable .apkg
 * and a plain .zip archive. Both are staged in a temporary directory inside
 * the output directory and moved into place once complete, so a failed run
 * never leaves a half-written file behind.
 */

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::deck::apkg::{self, PackageSummary, COLLECTION_FILE};
use crate::deck::archive;
use crate::deck::card::Deck;
use crate::deck::model::NoteModel;
use crate::errors::DeckError;
use crate::file_utils::FileManager;

/// Paths and counts of an assembled deck
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledDeck {
    pub apkg_path: PathBuf,
    pub archive_path: PathBuf,
    pub summary: PackageSummary,
}

/// Writes decks into an output directory
#[derive(Debug, Clone)]
pub struct DeckAssembler {
    output_dir: PathBuf,
}

impl DeckAssembler {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Final .apkg and .zip paths of a deck
    pub fn output_paths(&self, deck: &Deck) -> (PathBuf, PathBuf) {
        let stem = FileManager::deck_file_stem(
            &deck.languages.source_language,
            &deck.languages.target_language,
            deck.deck_id,
        );
        (
            self.output_dir.join(format!("{}.apkg", stem)),
            self.output_dir.join(format!("{}.zip", stem)),
        )
    }

    /// Write both artifacts of `deck`
    ///
    /// # Arguments
    /// * `deck` - The deck, consumed
    /// * `vocabulary` - Raw vocabulary file content, copied into the archive
    pub async fn assemble(&self, deck: Deck, vocabulary: String) -> Result<AssembledDeck, DeckError> {
        if deck.cards.is_empty() {
            return Err(DeckError::Empty(deck.deck_id));
        }

        let assembler = self.clone();
        tokio::task::spawn_blocking(move || assembler.assemble_blocking(&deck, &vocabulary))
            .await
            .map_err(|e| DeckError::Io(std::io::Error::other(format!("Deck packaging task failed: {}", e))))?
    }

    fn assemble_blocking(&self, deck: &Deck, vocabulary: &str) -> Result<AssembledDeck, DeckError> {
        fs::create_dir_all(&self.output_dir)?;

        // Removed on drop, whatever happens below
        let staging = tempfile::Builder::new()
            .prefix(".lingodeck-staging-")
            .tempdir_in(&self.output_dir)?;
        debug!("Staging deck {} in {}", deck.deck_id, staging.path().display());

        let model = NoteModel::new(deck.deck_id, &deck.languages, deck.bidirectional);
        let modified = chrono::Utc::now().timestamp();

        let collection_path = staging.path().join(COLLECTION_FILE);
        let summary = apkg::write_collection(&collection_path, deck, &model, modified)?;

        let staged_apkg = staging.path().join("deck.apkg");
        apkg::write_package(&staged_apkg, &collection_path, deck)?;

        let staged_archive = staging.path().join("deck.zip");
        archive::write_archive(&staged_archive, deck, vocabulary)?;

        let (apkg_path, archive_path) = self.output_paths(deck);
        fs::rename(&staged_apkg, &apkg_path)?;
        fs::rename(&staged_archive, &archive_path)?;
        staging.close()?;

        info!(
            "Wrote {} notes ({} cards, {} audio files) to {}",
            summary.notes,
            summary.cards,
            summary.media,
            apkg_path.display()
        );

        Ok(AssembledDeck {
            apkg_path,
            archive_path,
            summary,
        })
    }
}
