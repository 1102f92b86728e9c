//! Sheet Content
//!
//! Cards and trackers as they appear on a character sheet, plus the typed
//! payload a drawer item stores. Everything here is a plain value: copying
//! content into the drawer or back onto the sheet is clone + re-identify.

use serde::{Deserialize, Serialize};

use crate::ids::IdGenerator;

/// Which rule system a piece of content belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameSystem {
    Legends,
    CityOfMist,
    Otherscape,
}

impl std::fmt::Display for GameSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            GameSystem::Legends => "Legend in the Mist",
            GameSystem::CityOfMist => "City of Mist",
            GameSystem::Otherscape => "Otherscape",
        };
        f.write_str(s)
    }
}

/// Structural type tag of a drawer item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemType {
    CharacterTheme,
    GroupTheme,
    Loadout,
    CharacterCard,
    StatusTracker,
    StoryTagTracker,
    StoryThemeTracker,
    FullCharacterSheet,
}

impl ItemType {
    pub fn is_card(&self) -> bool {
        matches!(
            self,
            ItemType::CharacterTheme | ItemType::GroupTheme | ItemType::Loadout | ItemType::CharacterCard
        )
    }

    pub fn tracker_kind(&self) -> Option<TrackerKind> {
        match self {
            ItemType::StatusTracker => Some(TrackerKind::Status),
            ItemType::StoryTagTracker => Some(TrackerKind::StoryTag),
            ItemType::StoryThemeTracker => Some(TrackerKind::StoryTheme),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardType {
    CharacterTheme,
    GroupTheme,
    Loadout,
    CharacterCard,
}

impl CardType {
    pub fn item_type(&self) -> ItemType {
        match self {
            CardType::CharacterTheme => ItemType::CharacterTheme,
            CardType::GroupTheme => ItemType::GroupTheme,
            CardType::Loadout => ItemType::Loadout,
            CardType::CharacterCard => ItemType::CharacterCard,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackerKind {
    Status,
    StoryTag,
    StoryTheme,
}

impl TrackerKind {
    pub fn item_type(&self) -> ItemType {
        match self {
            TrackerKind::Status => ItemType::StatusTracker,
            TrackerKind::StoryTag => ItemType::StoryTagTracker,
            TrackerKind::StoryTheme => ItemType::StoryThemeTracker,
        }
    }
}

/// Clone-with-fresh-ids for anything that carries nested ids
pub trait Reidentify: Sized {
    /// Deep copy with every nested `id` replaced by a fresh one
    fn reidentify(&self, ids: &dyn IdGenerator) -> Self;

    /// Visit every nested id, outermost first
    fn visit_ids(&self, f: &mut dyn FnMut(&str));

    fn collect_ids(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.visit_ids(&mut |id| out.push(id.to_string()));
        out
    }
}

/// A power or weakness tag on a theme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeTag {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_scratched: bool,
}

impl ThemeTag {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_scratched: false,
        }
    }
}

impl Reidentify for ThemeTag {
    fn reidentify(&self, ids: &dyn IdGenerator) -> Self {
        Self {
            id: ids.next_id(),
            ..self.clone()
        }
    }

    fn visit_ids(&self, f: &mut dyn FnMut(&str)) {
        f(&self.id);
    }
}

fn reidentify_all<T: Reidentify>(list: &[T], ids: &dyn IdGenerator) -> Vec<T> {
    list.iter().map(|x| x.reidentify(ids)).collect()
}

/// A themed card on the sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub card_type: CardType,
    pub title: String,
    /// Display-only: which face is showing
    #[serde(default)]
    pub is_flipped: bool,
    #[serde(default)]
    pub power_tags: Vec<ThemeTag>,
    #[serde(default)]
    pub weakness_tags: Vec<ThemeTag>,
    #[serde(default)]
    pub notes: String,
}

impl Card {
    pub fn new(id: impl Into<String>, card_type: CardType, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            card_type,
            title: title.into(),
            is_flipped: false,
            power_tags: Vec::new(),
            weakness_tags: Vec::new(),
            notes: String::new(),
        }
    }

    pub fn normalized(&self) -> Self {
        Self {
            is_flipped: false,
            ..self.clone()
        }
    }
}

impl Reidentify for Card {
    fn reidentify(&self, ids: &dyn IdGenerator) -> Self {
        Self {
            id: ids.next_id(),
            power_tags: reidentify_all(&self.power_tags, ids),
            weakness_tags: reidentify_all(&self.weakness_tags, ids),
            ..self.clone()
        }
    }

    fn visit_ids(&self, f: &mut dyn FnMut(&str)) {
        f(&self.id);
        self.power_tags.iter().for_each(|t| t.visit_ids(f));
        self.weakness_tags.iter().for_each(|t| t.visit_ids(f));
    }
}

/// Six-box status track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusTracker {
    pub id: String,
    pub name: String,
    #[serde(default = "empty_tiers")]
    pub tiers: Vec<bool>,
}

fn empty_tiers() -> Vec<bool> {
    vec![false; 6]
}

impl StatusTracker {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tiers: empty_tiers(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryTagTracker {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_scratched: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryThemeTracker {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_flipped: bool,
    #[serde(default)]
    pub tags: Vec<ThemeTag>,
}

/// A tracker on the sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "trackerType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tracker {
    Status(StatusTracker),
    StoryTag(StoryTagTracker),
    StoryTheme(StoryThemeTracker),
}

impl Tracker {
    pub fn id(&self) -> &str {
        match self {
            Tracker::Status(t) => &t.id,
            Tracker::StoryTag(t) => &t.id,
            Tracker::StoryTheme(t) => &t.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Tracker::Status(t) => &t.name,
            Tracker::StoryTag(t) => &t.name,
            Tracker::StoryTheme(t) => &t.name,
        }
    }

    pub fn kind(&self) -> TrackerKind {
        match self {
            Tracker::Status(_) => TrackerKind::Status,
            Tracker::StoryTag(_) => TrackerKind::StoryTag,
            Tracker::StoryTheme(_) => TrackerKind::StoryTheme,
        }
    }

    pub fn normalized(&self) -> Self {
        match self {
            Tracker::StoryTheme(t) => Tracker::StoryTheme(StoryThemeTracker {
                is_flipped: false,
                ..t.clone()
            }),
            other => other.clone(),
        }
    }
}

impl Reidentify for Tracker {
    fn reidentify(&self, ids: &dyn IdGenerator) -> Self {
        match self {
            Tracker::Status(t) => Tracker::Status(StatusTracker {
                id: ids.next_id(),
                ..t.clone()
            }),
            Tracker::StoryTag(t) => Tracker::StoryTag(StoryTagTracker {
                id: ids.next_id(),
                ..t.clone()
            }),
            Tracker::StoryTheme(t) => Tracker::StoryTheme(StoryThemeTracker {
                id: ids.next_id(),
                tags: reidentify_all(&t.tags, ids),
                ..t.clone()
            }),
        }
    }

    fn visit_ids(&self, f: &mut dyn FnMut(&str)) {
        f(self.id());
        if let Tracker::StoryTheme(t) = self {
            t.tags.iter().for_each(|tag| tag.visit_ids(f));
        }
    }
}

/// The three tracker lists of a character
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerLists {
    #[serde(default)]
    pub statuses: Vec<StatusTracker>,
    #[serde(default)]
    pub story_tags: Vec<StoryTagTracker>,
    #[serde(default)]
    pub story_themes: Vec<StoryThemeTracker>,
}

impl TrackerLists {
    pub fn len(&self, kind: TrackerKind) -> usize {
        match kind {
            TrackerKind::Status => self.statuses.len(),
            TrackerKind::StoryTag => self.story_tags.len(),
            TrackerKind::StoryTheme => self.story_themes.len(),
        }
    }

    pub fn position(&self, kind: TrackerKind, id: &str) -> Option<usize> {
        match kind {
            TrackerKind::Status => self.statuses.iter().position(|t| t.id == id),
            TrackerKind::StoryTag => self.story_tags.iter().position(|t| t.id == id),
            TrackerKind::StoryTheme => self.story_themes.iter().position(|t| t.id == id),
        }
    }

    pub fn push(&mut self, tracker: Tracker) {
        match tracker {
            Tracker::Status(t) => self.statuses.push(t),
            Tracker::StoryTag(t) => self.story_tags.push(t),
            Tracker::StoryTheme(t) => self.story_themes.push(t),
        }
    }
}

/// A whole character sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: String,
    pub name: String,
    pub game: GameSystem,
    #[serde(default)]
    pub cards: Vec<Card>,
    #[serde(default)]
    pub trackers: TrackerLists,
}

impl Character {
    pub fn new(id: impl Into<String>, name: impl Into<String>, game: GameSystem) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            game,
            cards: Vec::new(),
            trackers: TrackerLists::default(),
        }
    }

    pub fn normalized(&self) -> Self {
        let mut out = self.clone();
        out.cards = self.cards.iter().map(Card::normalized).collect();
        for theme in out.trackers.story_themes.iter_mut() {
            theme.is_flipped = false;
        }
        out
    }
}

impl Reidentify for Character {
    fn reidentify(&self, ids: &dyn IdGenerator) -> Self {
        let trackers = &self.trackers;
        Self {
            id: ids.next_id(),
            name: self.name.clone(),
            game: self.game,
            cards: reidentify_all(&self.cards, ids),
            trackers: TrackerLists {
                statuses: trackers
                    .statuses
                    .iter()
                    .map(|t| StatusTracker { id: ids.next_id(), ..t.clone() })
                    .collect(),
                story_tags: trackers
                    .story_tags
                    .iter()
                    .map(|t| StoryTagTracker { id: ids.next_id(), ..t.clone() })
                    .collect(),
                story_themes: trackers
                    .story_themes
                    .iter()
                    .map(|t| StoryThemeTracker {
                        id: ids.next_id(),
                        tags: reidentify_all(&t.tags, ids),
                        ..t.clone()
                    })
                    .collect(),
            },
        }
    }

    fn visit_ids(&self, f: &mut dyn FnMut(&str)) {
        f(&self.id);
        self.cards.iter().for_each(|c| c.visit_ids(f));
        self.trackers.statuses.iter().for_each(|t| f(&t.id));
        self.trackers.story_tags.iter().for_each(|t| f(&t.id));
        for theme in &self.trackers.story_themes {
            f(&theme.id);
            theme.tags.iter().for_each(|t| t.visit_ids(f));
        }
    }
}

/// What a drawer item holds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DrawerContent {
    Card(Card),
    Tracker(Tracker),
    Character(Character),
}

impl DrawerContent {
    pub fn item_type(&self) -> ItemType {
        match self {
            DrawerContent::Card(card) => card.card_type.item_type(),
            DrawerContent::Tracker(tracker) => tracker.kind().item_type(),
            DrawerContent::Character(_) => ItemType::FullCharacterSheet,
        }
    }

    /// Suggested item name when none is given
    pub fn display_name(&self) -> &str {
        match self {
            DrawerContent::Card(card) => &card.title,
            DrawerContent::Tracker(tracker) => tracker.name(),
            DrawerContent::Character(character) => &character.name,
        }
    }

    /// Transient display state reset to defaults
    pub fn normalized(&self) -> Self {
        match self {
            DrawerContent::Card(card) => DrawerContent::Card(card.normalized()),
            DrawerContent::Tracker(tracker) => DrawerContent::Tracker(tracker.normalized()),
            DrawerContent::Character(character) => DrawerContent::Character(character.normalized()),
        }
    }
}

impl Reidentify for DrawerContent {
    fn reidentify(&self, ids: &dyn IdGenerator) -> Self {
        match self {
            DrawerContent::Card(card) => DrawerContent::Card(card.reidentify(ids)),
            DrawerContent::Tracker(tracker) => DrawerContent::Tracker(tracker.reidentify(ids)),
            DrawerContent::Character(character) => DrawerContent::Character(character.reidentify(ids)),
        }
    }

    fn visit_ids(&self, f: &mut dyn FnMut(&str)) {
        match self {
            DrawerContent::Card(card) => card.visit_ids(f),
            DrawerContent::Tracker(tracker) => tracker.visit_ids(f),
            DrawerContent::Character(character) => character.visit_ids(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;

    fn theme() -> Card {
        let mut card = Card::new("c1", CardType::CharacterTheme, "Ancient Blade");
        card.is_flipped = true;
        card.power_tags.push(ThemeTag::new("t1", "razor edge"));
        card.weakness_tags.push(ThemeTag::new("t2", "rusted hilt"));
        card
    }

    #[test]
    fn test_item_type_from_content() {
        assert_eq!(DrawerContent::Card(theme()).item_type(), ItemType::CharacterTheme);
        let status = Tracker::Status(StatusTracker::new("s1", "wounded"));
        assert_eq!(DrawerContent::Tracker(status).item_type(), ItemType::StatusTracker);
        let hero = Character::new("h1", "Hero", GameSystem::Legends);
        assert_eq!(DrawerContent::Character(hero).item_type(), ItemType::FullCharacterSheet);
    }

    #[test]
    fn test_normalized_resets_flip() {
        let content = DrawerContent::Card(theme()).normalized();
        match content {
            DrawerContent::Card(card) => {
                assert!(!card.is_flipped);
                assert_eq!(card.power_tags.len(), 1);
            }
            _ => panic!("expected card"),
        }
    }

    #[test]
    fn test_reidentify_replaces_nested_ids() {
        let ids = SequentialIds::new("n");
        let card = theme();
        let copy = card.reidentify(&ids);
        assert_eq!(copy.collect_ids(), vec!["n-1", "n-2", "n-3"]);
        assert_eq!(copy.title, card.title);
        assert_eq!(copy.power_tags[0].name, "razor edge");
    }

    #[test]
    fn test_character_ids_visited() {
        let mut hero = Character::new("h1", "Hero", GameSystem::CityOfMist);
        hero.cards.push(theme());
        hero.trackers.statuses.push(StatusTracker::new("s1", "tired"));
        hero.trackers.story_themes.push(StoryThemeTracker {
            id: "st1".into(),
            name: "Rival".into(),
            is_flipped: true,
            tags: vec![ThemeTag::new("t9", "grudge")],
        });
        assert_eq!(hero.collect_ids(), vec!["h1", "c1", "t1", "t2", "s1", "st1", "t9"]);
        assert!(!hero.normalized().trackers.story_themes[0].is_flipped);
    }

    #[test]
    fn test_serde_tags() {
        let tracker = Tracker::StoryTag(StoryTagTracker {
            id: "x".into(),
            name: "on fire".into(),
            is_scratched: false,
        });
        let json = serde_json::to_value(DrawerContent::Tracker(tracker.clone())).unwrap();
        assert_eq!(json["kind"], "TRACKER");
        assert_eq!(json["data"]["trackerType"], "STORY_TAG");
        assert_eq!(json["data"]["isScratched"], false);
        let back: DrawerContent = serde_json::from_value(json).unwrap();
        assert_eq!(back, DrawerContent::Tracker(tracker));
        assert_eq!(serde_json::to_value(GameSystem::CityOfMist).unwrap(), "CITY_OF_MIST");
    }
}
