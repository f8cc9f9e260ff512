use std::fmt::Write as _;

use chrono::NaiveDate;
use client_core::DueStatus;
use shared::domain::{BoardList, Card};

pub fn render_board(lists: &[BoardList], today: NaiveDate) -> String {
    if lists.is_empty() {
        return "(board is empty)\n".to_string();
    }

    let mut out = String::new();
    for list in lists {
        let _ = writeln!(out, "[{}] {} ({} cards)", list.id, list.title, list.cards.len());
        for card in &list.cards {
            render_card(&mut out, card, today);
        }
        out.push('\n');
    }
    out
}

fn render_card(out: &mut String, card: &Card, today: NaiveDate) {
    let _ = write!(out, "  - {} [{}] {}", card.id, card.priority.label(), card.text);
    if let Some(due) = card.due_date {
        let _ = write!(out, "  (due {due}, {})", DueStatus::of(due, today).label());
    }
    out.push('\n');
    if !card.description.is_empty() {
        let _ = writeln!(out, "      {}", card.description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::sample_lists;

    #[test]
    fn renders_lists_cards_and_due_status() {
        let today = NaiveDate::from_ymd_opt(2024, 12, 30).expect("date");
        let out = render_board(&sample_lists(), today);
        assert!(out.contains("[1] To Do (2 cards)"));
        assert!(out.contains("  - 1-1 [High] Strategic Planning  (due 2024-12-31, due soon)"));
        assert!(out.contains("  - 2-1 [High] Team Updates  (due 2024-12-25, overdue)"));
        assert!(out.contains("      Analyze Q1 spending"));
    }

    #[test]
    fn empty_board_says_so() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).expect("date");
        assert_eq!(render_board(&[], today), "(board is empty)\n");
    }
}
