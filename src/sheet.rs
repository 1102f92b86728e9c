//! Live Character Sheet
//!
//! The drawer only talks to the sheet through [`SheetStore`]: it reads the
//! loaded character's game system and calls the sheet's own insert and
//! reorder actions.

use crate::content::{Card, Character, GameSystem, Tracker, TrackerKind};
use crate::error::TreeResult;
use crate::models::ItemId;
use crate::tree::array_move;

pub trait SheetStore {
    fn character(&self) -> Option<&Character>;

    fn game(&self) -> Option<GameSystem> {
        self.character().map(|c| c.game)
    }

    fn card_index(&self, card_id: &str) -> Option<usize> {
        self.character()?.cards.iter().position(|c| c.id == card_id)
    }

    fn tracker_index(&self, kind: TrackerKind, tracker_id: &str) -> Option<usize> {
        self.character()?.trackers.position(kind, tracker_id)
    }

    /// Append to the card list; false when no character is loaded
    fn add_card(&mut self, card: Card) -> bool;

    /// Append to the list matching the tracker's kind
    fn add_tracker(&mut self, tracker: Tracker) -> bool;

    fn reorder_cards(&mut self, old: usize, new: usize) -> TreeResult<()>;

    fn reorder_trackers(&mut self, kind: TrackerKind, old: usize, new: usize) -> TreeResult<()>;

    /// Replace the loaded character, remembering the drawer item it came from
    fn load_character(&mut self, character: Character, source_item: Option<ItemId>);

    /// Drawer item a later save should write back to
    fn source_item_id(&self) -> Option<&str>;
}

/// In-memory sheet
#[derive(Debug, Default, Clone)]
pub struct Sheet {
    character: Option<Character>,
    source_item: Option<ItemId>,
}

impl Sheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_character(character: Character) -> Self {
        Self {
            character: Some(character),
            source_item: None,
        }
    }

    pub fn unload(&mut self) {
        self.character = None;
        self.source_item = None;
    }
}

fn reorder_in<T: Clone>(list: &mut Vec<T>, old: usize, new: usize) -> TreeResult<()> {
    *list = array_move(list, old, new)?;
    Ok(())
}

impl SheetStore for Sheet {
    fn character(&self) -> Option<&Character> {
        self.character.as_ref()
    }

    fn add_card(&mut self, card: Card) -> bool {
        match self.character.as_mut() {
            Some(character) => {
                character.cards.push(card);
                true
            }
            None => false,
        }
    }

    fn add_tracker(&mut self, tracker: Tracker) -> bool {
        match self.character.as_mut() {
            Some(character) => {
                character.trackers.push(tracker);
                true
            }
            None => false,
        }
    }

    fn reorder_cards(&mut self, old: usize, new: usize) -> TreeResult<()> {
        match self.character.as_mut() {
            Some(character) => reorder_in(&mut character.cards, old, new),
            None => Err(crate::error::TreeError::Unchanged),
        }
    }

    fn reorder_trackers(&mut self, kind: TrackerKind, old: usize, new: usize) -> TreeResult<()> {
        let Some(character) = self.character.as_mut() else {
            return Err(crate::error::TreeError::Unchanged);
        };
        let lists = &mut character.trackers;
        match kind {
            TrackerKind::Status => reorder_in(&mut lists.statuses, old, new),
            TrackerKind::StoryTag => reorder_in(&mut lists.story_tags, old, new),
            TrackerKind::StoryTheme => reorder_in(&mut lists.story_themes, old, new),
        }
    }

    fn load_character(&mut self, character: Character, source_item: Option<ItemId>) {
        tracing::info!(character = %character.name, source = ?source_item, "loading character");
        self.character = Some(character);
        self.source_item = source_item;
    }

    fn source_item_id(&self) -> Option<&str> {
        self.source_item.as_deref()
    }
}
