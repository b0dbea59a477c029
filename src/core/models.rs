use serde::{
    Deserialize,
    Serialize,
};

/// One practice item: a character and the word it is taught with.
///
/// Statistics are keyed by `glyph`; `id` only tells apart the option
/// widgets of a single round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    pub glyph: String,
    pub word: String,
}

impl Item {
    pub fn new(id: u32, glyph: impl Into<String>, word: impl Into<String>) -> Self {
        Self { id, glyph: glyph.into(), word: word.into() }
    }
}

/// One presentation cycle: a target plus its shuffled answer options.
/// Built by the round selector, consumed by a single answer, then dropped.
#[derive(Debug, Clone)]
pub struct Round {
    pub target: Item,
    pub options: Vec<Item>,
}

impl Round {
    pub fn option_by_id(&self, id: u32) -> Option<&Item> {
        self.options.iter().find(|option| option.id == id)
    }
}
