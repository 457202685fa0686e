//! Keyboard input handling for the browse view.
//!
//! Keys translate into the coordinator's two mutators (plus refresh); the
//! cursor and detail scroll are the only state mutated directly here.

use super::{Action, UiState};
use crate::model::FilterStatus;
use crate::sync::Coordinator;
use crossterm::event::{KeyCode, KeyModifiers};

/// Lines scrolled per page in the detail pane.
const PAGE_LINES: u16 = 10;

pub(super) fn handle_input(
    coordinator: &mut Coordinator,
    ui: &mut UiState,
    code: KeyCode,
    modifiers: KeyModifiers,
) -> Action {
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    match code {
        KeyCode::Char('q') => return Action::Quit,

        // List navigation
        KeyCode::Char('j') | KeyCode::Down => {
            let len = coordinator.view().list.articles().len();
            if len > 0 {
                ui.cursor = (ui.cursor + 1).min(len - 1);
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            ui.cursor = ui.cursor.saturating_sub(1);
        }
        KeyCode::Char('g') | KeyCode::Home => {
            ui.cursor = 0;
        }
        KeyCode::Char('G') | KeyCode::End => {
            let len = coordinator.view().list.articles().len();
            ui.cursor = len.saturating_sub(1);
        }

        // Open the article under the cursor
        KeyCode::Enter | KeyCode::Char('l') => {
            let id = coordinator
                .view()
                .list
                .articles()
                .get(ui.cursor)
                .map(|a| a.id.clone());
            if let Some(id) = id {
                ui.detail_scroll = 0;
                coordinator.set_selection(Some(id));
            }
        }
        KeyCode::Esc | KeyCode::Char('h') => {
            ui.detail_scroll = 0;
            coordinator.set_selection(None);
        }

        // Filter switching
        KeyCode::Tab => {
            let next = coordinator.view().filter.next();
            switch_filter(coordinator, ui, next);
        }
        KeyCode::BackTab => {
            let prev = coordinator.view().filter.prev();
            switch_filter(coordinator, ui, prev);
        }
        KeyCode::Char('1') => switch_filter(coordinator, ui, FilterStatus::Unread),
        KeyCode::Char('2') => switch_filter(coordinator, ui, FilterStatus::All),
        KeyCode::Char('3') => switch_filter(coordinator, ui, FilterStatus::Read),
        KeyCode::Char('4') => switch_filter(coordinator, ui, FilterStatus::Starred),

        KeyCode::Char('r') => coordinator.refresh(),

        // Detail pane scrolling
        KeyCode::Char('J') | KeyCode::PageDown => {
            ui.detail_scroll = ui.detail_scroll.saturating_add(PAGE_LINES);
        }
        KeyCode::Char('K') | KeyCode::PageUp => {
            ui.detail_scroll = ui.detail_scroll.saturating_sub(PAGE_LINES);
        }

        _ => {}
    }

    Action::Continue
}

fn switch_filter(coordinator: &mut Coordinator, ui: &mut UiState, filter: FilterStatus) {
    coordinator.set_filter(filter);
    ui.cursor = 0;
    ui.detail_scroll = 0;
}
