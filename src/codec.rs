//! Import / Export Codec
//!
//! Portable JSON documents for drawer nodes and sheet content:
//!
//! ```json
//! { "fileType": "CARD", "game": "LEGENDS", "version": 1, "content": { ... } }
//! ```
//!
//! `import_str` is the only way into the drawer from a file, so malformed
//! input stops here as a [`CodecError`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::content::{Card, Character, DrawerContent, GameSystem, Reidentify, Tracker};
use crate::error::CodecError;
use crate::ids::IdGenerator;
use crate::models::{Drawer, DrawerItem, Folder};

pub const EXPORT_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileType {
    Folder,
    DrawerItem,
    Drawer,
    Card,
    Tracker,
    Character,
}

/// Decoded payload of an export file
#[derive(Debug, Clone, PartialEq)]
pub enum Exported {
    Folder(Folder),
    DrawerItem(DrawerItem),
    Drawer(Drawer),
    Card(Card),
    Tracker(Tracker),
    Character(Character),
}

impl Exported {
    pub fn file_type(&self) -> FileType {
        match self {
            Exported::Folder(_) => FileType::Folder,
            Exported::DrawerItem(_) => FileType::DrawerItem,
            Exported::Drawer(_) => FileType::Drawer,
            Exported::Card(_) => FileType::Card,
            Exported::Tracker(_) => FileType::Tracker,
            Exported::Character(_) => FileType::Character,
        }
    }
}

/// A typed export file
#[derive(Debug, Clone, PartialEq)]
pub struct ExportDocument {
    /// `None` for folders and drawers mixing several systems
    pub game: Option<GameSystem>,
    pub payload: Exported,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    file_type: FileType,
    #[serde(default)]
    game: Option<GameSystem>,
    version: u32,
    content: serde_json::Value,
}

/// The one game every item below `folders`/`items` shares, if any
fn common_game(folders: &[Arc<Folder>], items: &[Arc<DrawerItem>]) -> Option<GameSystem> {
    let mut games = Vec::new();
    let mut stack: Vec<&Folder> = folders.iter().map(|f| &**f).collect();
    games.extend(items.iter().map(|i| i.game));
    while let Some(folder) = stack.pop() {
        games.extend(folder.items.iter().map(|i| i.game));
        stack.extend(folder.folders.iter().map(|f| &**f));
    }
    let first = *games.first()?;
    games.iter().all(|g| *g == first).then_some(first)
}

impl ExportDocument {
    pub fn folder(folder: &Folder) -> Self {
        Self {
            game: common_game(&folder.folders, &folder.items),
            payload: Exported::Folder(folder.clone()),
        }
    }

    pub fn item(item: &DrawerItem) -> Self {
        Self {
            game: Some(item.game),
            payload: Exported::DrawerItem(item.clone()),
        }
    }

    pub fn drawer(drawer: &Drawer) -> Self {
        Self {
            game: common_game(&drawer.folders, &drawer.root_items),
            payload: Exported::Drawer(drawer.clone()),
        }
    }

    pub fn card(card: &Card, game: GameSystem) -> Self {
        Self {
            game: Some(game),
            payload: Exported::Card(card.normalized()),
        }
    }

    pub fn tracker(tracker: &Tracker, game: GameSystem) -> Self {
        Self {
            game: Some(game),
            payload: Exported::Tracker(tracker.normalized()),
        }
    }

    pub fn character(character: &Character) -> Self {
        Self {
            game: Some(character.game),
            payload: Exported::Character(character.normalized()),
        }
    }

    pub fn file_type(&self) -> FileType {
        self.payload.file_type()
    }

    pub fn to_json(&self) -> Result<String, CodecError> {
        let content = match &self.payload {
            Exported::Folder(v) => serde_json::to_value(v)?,
            Exported::DrawerItem(v) => serde_json::to_value(v)?,
            Exported::Drawer(v) => serde_json::to_value(v)?,
            Exported::Card(v) => serde_json::to_value(v)?,
            Exported::Tracker(v) => serde_json::to_value(v)?,
            Exported::Character(v) => serde_json::to_value(v)?,
        };
        let raw = RawDocument {
            file_type: self.file_type(),
            game: self.game,
            version: EXPORT_VERSION,
            content,
        };
        Ok(serde_json::to_string_pretty(&raw)?)
    }

    /// Re-identified drawer nodes ready to merge into a folder
    ///
    /// Bare sheet content becomes one new item named after the content.
    pub fn into_drawer_nodes(
        self,
        ids: &dyn IdGenerator,
    ) -> Result<(Vec<Arc<Folder>>, Vec<Arc<DrawerItem>>), CodecError> {
        let content = match self.payload {
            Exported::Folder(folder) => return Ok((vec![Arc::new(folder.reidentify(ids))], Vec::new())),
            Exported::DrawerItem(item) => return Ok((Vec::new(), vec![Arc::new(item.reidentify(ids))])),
            Exported::Drawer(drawer) => {
                let folders = drawer.folders.iter().map(|f| Arc::new(f.reidentify(ids))).collect();
                let items = drawer.root_items.iter().map(|i| Arc::new(i.reidentify(ids))).collect();
                return Ok((folders, items));
            }
            Exported::Card(card) => DrawerContent::Card(card),
            Exported::Tracker(tracker) => DrawerContent::Tracker(tracker),
            Exported::Character(character) => DrawerContent::Character(character),
        };
        let game = match (&content, self.game) {
            (DrawerContent::Character(c), _) => c.game,
            (_, Some(game)) => game,
            (_, None) => return Err(CodecError::MissingGame),
        };
        let content = content.normalized().reidentify(ids);
        let name = match content.display_name().trim() {
            "" => "Imported".to_string(),
            name => name.to_string(),
        };
        let item = DrawerItem::new(ids.next_id(), name, game, content);
        Ok((Vec::new(), vec![Arc::new(item)]))
    }
}

pub fn export_folder(folder: &Folder) -> Result<String, CodecError> {
    ExportDocument::folder(folder).to_json()
}

pub fn export_item(item: &DrawerItem) -> Result<String, CodecError> {
    ExportDocument::item(item).to_json()
}

pub fn export_drawer(drawer: &Drawer) -> Result<String, CodecError> {
    ExportDocument::drawer(drawer).to_json()
}

pub fn export_card(card: &Card, game: GameSystem) -> Result<String, CodecError> {
    ExportDocument::card(card, game).to_json()
}

pub fn export_tracker(tracker: &Tracker, game: GameSystem) -> Result<String, CodecError> {
    ExportDocument::tracker(tracker, game).to_json()
}

pub fn export_character(character: &Character) -> Result<String, CodecError> {
    ExportDocument::character(character).to_json()
}

/// Parse and validate an export file
pub fn import_str(raw: &str) -> Result<ExportDocument, CodecError> {
    let doc: RawDocument = serde_json::from_str(raw)?;
    if doc.version == 0 || doc.version > EXPORT_VERSION {
        return Err(CodecError::Version(doc.version));
    }
    let payload = match doc.file_type {
        FileType::Folder => Exported::Folder(serde_json::from_value(doc.content)?),
        FileType::DrawerItem => Exported::DrawerItem(serde_json::from_value(doc.content)?),
        FileType::Drawer => Exported::Drawer(serde_json::from_value(doc.content)?),
        FileType::Card => Exported::Card(serde_json::from_value(doc.content)?),
        FileType::Tracker => Exported::Tracker(serde_json::from_value(doc.content)?),
        FileType::Character => Exported::Character(serde_json::from_value(doc.content)?),
    };
    tracing::debug!(file_type = ?doc.file_type, game = ?doc.game, "decoded export file");
    Ok(ExportDocument { game: doc.game, payload })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{CardType, StatusTracker};
    use crate::ids::SequentialIds;
    use crate::tree::fixtures::*;
    use std::collections::HashSet;

    #[test]
    fn test_envelope_fields() {
        let card = Card::new("c1", CardType::GroupTheme, "Crew");
        let raw = export_card(&card, GameSystem::Otherscape).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["fileType"], "CARD");
        assert_eq!(json["game"], "OTHERSCAPE");
        assert_eq!(json["version"], 1);
        assert_eq!(json["content"]["title"], "Crew");
    }

    #[test]
    fn test_folder_file_round_trip() {
        let tree = sample();
        let doc = import_str(&export_folder(&tree.folders[0]).unwrap()).unwrap();
        assert_eq!(doc.file_type(), FileType::Folder);
        assert_eq!(doc.game, Some(GameSystem::Legends));
        assert_eq!(doc.payload, Exported::Folder((*tree.folders[0]).clone()));
    }

    #[test]
    fn test_mixed_games_have_no_game() {
        let tree = sample();
        let mixed = Drawer::new(
            tree.folders.to_vec(),
            vec![Arc::new(status_item("s", "Shaken", GameSystem::CityOfMist))],
        );
        assert_eq!(ExportDocument::drawer(&mixed).game, None);
        assert_eq!(ExportDocument::drawer(&Drawer::default()).game, None);
    }

    #[test]
    fn test_rejects_bad_files() {
        assert!(matches!(import_str("not json"), Err(CodecError::Malformed(_))));
        let future = r#"{"fileType":"CARD","game":"LEGENDS","version":7,"content":{}}"#;
        assert!(matches!(import_str(future), Err(CodecError::Version(7))));
        let wrong_shape = r#"{"fileType":"TRACKER","game":"LEGENDS","version":1,"content":{"id":"x"}}"#;
        assert!(matches!(import_str(wrong_shape), Err(CodecError::Malformed(_))));
        let unknown = r#"{"fileType":"SPELLBOOK","version":1,"content":{}}"#;
        assert!(import_str(unknown).is_err());
    }

    #[test]
    fn test_bare_content_becomes_item() {
        let ids = SequentialIds::new("n");
        let tracker = Tracker::Status(StatusTracker::new("s1", "burning"));
        let doc = import_str(&export_tracker(&tracker, GameSystem::CityOfMist).unwrap()).unwrap();
        let (folders, items) = doc.into_drawer_nodes(&ids).unwrap();
        assert!(folders.is_empty());
        assert_eq!(items[0].name, "burning");
        assert_eq!(items[0].game, GameSystem::CityOfMist);
        assert_eq!(items[0].item_type, crate::content::ItemType::StatusTracker);
        assert_ne!(items[0].content, DrawerContent::Tracker(tracker));
    }

    #[test]
    fn test_content_without_game_rejected() {
        let raw = r#"{"fileType":"CARD","version":1,"content":{"id":"c","cardType":"LOADOUT","title":"Kit"}}"#;
        let doc = import_str(raw).unwrap();
        assert!(matches!(doc.into_drawer_nodes(&SequentialIds::new("n")), Err(CodecError::MissingGame)));
    }

    #[test]
    fn test_drawer_nodes_are_reidentified() {
        let tree = sample();
        let doc = ExportDocument::drawer(&tree);
        let (folders, items) = doc.into_drawer_nodes(&SequentialIds::new("n")).unwrap();
        let imported = Drawer::new(folders, items);
        let before: HashSet<String> = tree.all_ids().into_iter().collect();
        let after: HashSet<String> = imported.all_ids().into_iter().collect();
        assert_eq!(after.len(), before.len());
        assert!(after.is_disjoint(&before));
    }

    #[test]
    fn test_imported_item_type_follows_content() {
        let mut forged = card_item("c", "Blade");
        forged.item_type = crate::content::ItemType::FullCharacterSheet;
        let raw = export_item(&forged).unwrap();
        let (_, items) = import_str(&raw).unwrap().into_drawer_nodes(&SequentialIds::new("n")).unwrap();
        assert_eq!(items[0].item_type, items[0].content.item_type());
        assert_ne!(items[0].item_type, crate::content::ItemType::FullCharacterSheet);

        let nested = Folder {
            items: vec![Arc::new(forged)],
            ..Folder::new("f", "F")
        };
        let drawer = Drawer::new(vec![Arc::new(nested)], Vec::new());
        let doc = import_str(&export_drawer(&drawer).unwrap()).unwrap();
        let (folders, _) = doc.into_drawer_nodes(&SequentialIds::new("m")).unwrap();
        let item = &folders[0].items[0];
        assert_eq!(item.item_type, item.content.item_type());
    }
}
