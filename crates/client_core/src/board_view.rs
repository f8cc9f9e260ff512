//! In-memory board state for one editing session.
//!
//! Every operation is a synchronous local transition. Operations that can be
//! no-ops report whether they changed anything so callers can skip saving.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use shared::domain::{BoardList, Card, CardId, ListId, Priority};

/// A card position: the list it lives in and its index within that list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CardSlot {
    pub list_id: ListId,
    pub index: usize,
}

impl CardSlot {
    pub fn new(list_id: ListId, index: usize) -> Self {
        Self { list_id, index }
    }
}

/// Field edits for a card; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardUpdate {
    pub text: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<NaiveDate>>,
}

impl CardUpdate {
    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
    }

    fn apply(self, card: &mut Card) {
        if let Some(text) = self.text {
            card.text = text;
        }
        if let Some(description) = self.description {
            card.description = description;
        }
        if let Some(priority) = self.priority {
            card.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            card.due_date = due_date;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BoardView {
    lists: Vec<BoardList>,
    new_list_title: String,
    new_card_texts: HashMap<ListId, String>,
    dragged: Option<CardSlot>,
    dragging_over: Option<CardSlot>,
    editing_card: Option<CardId>,
    editing_list: Option<ListId>,
}

impl BoardView {
    pub fn new(lists: Vec<BoardList>) -> Self {
        Self {
            lists,
            ..Self::default()
        }
    }

    pub fn lists(&self) -> &[BoardList] {
        &self.lists
    }

    pub fn into_lists(self) -> Vec<BoardList> {
        self.lists
    }

    pub fn list(&self, list_id: ListId) -> Option<&BoardList> {
        self.lists.iter().find(|list| list.id == list_id)
    }

    /// Finds the list holding `card_id` and the card's index in it.
    pub fn locate_card(&self, card_id: &CardId) -> Option<CardSlot> {
        self.lists.iter().find_map(|list| {
            list.cards
                .iter()
                .position(|card| &card.id == card_id)
                .map(|index| CardSlot::new(list.id, index))
        })
    }

    pub fn card(&self, list_id: ListId, card_id: &CardId) -> Option<&Card> {
        self.list(list_id)?
            .cards
            .iter()
            .find(|card| &card.id == card_id)
    }

    // Lists

    pub fn new_list_title(&self) -> &str {
        &self.new_list_title
    }

    pub fn set_new_list_title(&mut self, title: impl Into<String>) {
        self.new_list_title = title.into();
    }

    /// Adds the drafted list title as a new list and clears the draft.
    pub fn submit_new_list(&mut self) -> Option<ListId> {
        let title = std::mem::take(&mut self.new_list_title);
        let added = self.add_list(&title);
        if added.is_none() {
            self.new_list_title = title;
        }
        added
    }

    pub fn add_list(&mut self, title: &str) -> Option<ListId> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        let id = self.next_list_id();
        self.lists.push(BoardList::new(id, title));
        Some(id)
    }

    pub fn delete_list(&mut self, list_id: ListId) -> bool {
        let before = self.lists.len();
        self.lists.retain(|list| list.id != list_id);
        if self.editing_list == Some(list_id) {
            self.editing_list = None;
        }
        self.new_card_texts.remove(&list_id);
        self.lists.len() != before
    }

    pub fn editing_list(&self) -> Option<ListId> {
        self.editing_list
    }

    pub fn begin_list_rename(&mut self, list_id: ListId) {
        if self.list(list_id).is_some() {
            self.editing_list = Some(list_id);
        }
    }

    /// Commits a rename. A blank title keeps the old one and stays in
    /// editing mode.
    pub fn commit_list_rename(&mut self, list_id: ListId, title: &str) -> bool {
        let title = title.trim();
        if title.is_empty() {
            return false;
        }
        let Some(list) = self.lists.iter_mut().find(|list| list.id == list_id) else {
            return false;
        };
        list.title = title.to_string();
        self.editing_list = None;
        true
    }

    // Cards

    pub fn new_card_text(&self, list_id: ListId) -> &str {
        self.new_card_texts
            .get(&list_id)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn set_new_card_text(&mut self, list_id: ListId, text: impl Into<String>) {
        self.new_card_texts.insert(list_id, text.into());
    }

    /// Adds the list's drafted card text as a new card and clears the draft.
    pub fn submit_new_card(&mut self, list_id: ListId) -> Option<CardId> {
        let text = self.new_card_texts.get(&list_id).cloned().unwrap_or_default();
        let added = self.add_card(list_id, &text)?;
        self.new_card_texts.insert(list_id, String::new());
        Some(added)
    }

    /// Appends a card with medium priority and no due date. Blank text is a
    /// no-op.
    pub fn add_card(&mut self, list_id: ListId, text: &str) -> Option<CardId> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let list = self.lists.iter_mut().find(|list| list.id == list_id)?;
        let card = Card::new(text);
        let id = card.id.clone();
        list.cards.push(card);
        Some(id)
    }

    pub fn delete_card(&mut self, list_id: ListId, card_id: &CardId) -> bool {
        let Some(list) = self.lists.iter_mut().find(|list| list.id == list_id) else {
            return false;
        };
        let before = list.cards.len();
        list.cards.retain(|card| &card.id != card_id);
        if self.editing_card.as_ref() == Some(card_id) {
            self.editing_card = None;
        }
        list.cards.len() != before
    }

    pub fn editing_card(&self) -> Option<&CardId> {
        self.editing_card.as_ref()
    }

    /// Opens the editor for `card_id`, or closes it if it is already open.
    pub fn toggle_card_editing(&mut self, card_id: &CardId) {
        if self.editing_card.as_ref() == Some(card_id) {
            self.editing_card = None;
        } else {
            self.editing_card = Some(card_id.clone());
        }
    }

    /// Applies `update` to the card and closes the card editor.
    pub fn update_card(&mut self, list_id: ListId, card_id: &CardId, update: CardUpdate) -> bool {
        self.editing_card = None;
        let Some(card) = self
            .lists
            .iter_mut()
            .find(|list| list.id == list_id)
            .and_then(|list| list.cards.iter_mut().find(|card| &card.id == card_id))
        else {
            return false;
        };
        update.apply(card);
        true
    }

    // Drag and drop

    pub fn start_drag(&mut self, list_id: ListId, index: usize) {
        self.dragged = Some(CardSlot::new(list_id, index));
    }

    pub fn dragged(&self) -> Option<CardSlot> {
        self.dragged
    }

    /// Moves the insertion marker. `index == cards.len()` marks the list's tail.
    pub fn drag_over(&mut self, list_id: ListId, index: usize) {
        self.dragging_over = Some(CardSlot::new(list_id, index));
    }

    pub fn is_drop_target(&self, list_id: ListId, index: usize) -> bool {
        self.dragging_over == Some(CardSlot::new(list_id, index))
    }

    pub fn end_drag(&mut self) {
        self.dragged = None;
        self.dragging_over = None;
    }

    /// Drops the dragged card at `index` in `list_id`. Drag state is cleared
    /// whether or not a card moved.
    pub fn drop_on(&mut self, list_id: ListId, index: usize) -> bool {
        let Some(from) = self.dragged.take() else {
            return false;
        };
        self.dragging_over = None;
        self.move_card(from, CardSlot::new(list_id, index))
    }

    /// Removes the card at `from` and inserts it at `to`.
    ///
    /// Within one list a later target index is shifted down by one, since
    /// removing the card moves everything after it left. An unknown list or
    /// out-of-range source index leaves the board untouched; a target index
    /// past the end appends.
    pub fn move_card(&mut self, from: CardSlot, to: CardSlot) -> bool {
        let Some(source) = self.position(from.list_id) else {
            return false;
        };
        let Some(target) = self.position(to.list_id) else {
            return false;
        };
        if from.index >= self.lists[source].cards.len() {
            return false;
        }

        let card = self.lists[source].cards.remove(from.index);
        let index = if source == target && from.index < to.index {
            to.index - 1
        } else {
            to.index
        };
        let cards = &mut self.lists[target].cards;
        cards.insert(index.min(cards.len()), card);
        true
    }

    fn position(&self, list_id: ListId) -> Option<usize> {
        self.lists.iter().position(|list| list.id == list_id)
    }

    fn next_list_id(&self) -> ListId {
        let now = Utc::now().timestamp_millis();
        let highest = self.lists.iter().map(|list| list.id.0).max().unwrap_or(0);
        match highest.checked_add(1) {
            Some(next) => ListId(now.max(next)),
            // Ids already reach i64::MAX; take the first free one from now.
            None => {
                let taken = |id: i64| self.lists.iter().any(|list| list.id.0 == id);
                ListId((now..i64::MAX).find(|id| !taken(*id)).unwrap_or(now))
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/board_view_tests.rs"]
mod tests;
