//! Kanban board interface.
//!
//! Tasks are organised into one column per status. Moving a card between
//! columns is a plain status change through the store (any column to any
//! other), the incremental filter drives the same `TaskFilter` the CLI
//! uses, and the stats footer shows the aggregates for whatever the
//! filter currently leaves visible.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};

use chrono::Local;

use crate::cmd::format_percent;
use crate::dates::describe_due;
use crate::fields::{format_priority, format_task_status, TaskStatus};
use crate::filter::TaskFilter;
use crate::stats::{completion_rate, status_counts, workload};
use crate::store::Store;
use crate::task::Task;
use crate::tui::colors::{priority_color, ACCENT};

const COLUMN_COUNT: usize = 4;

/// Main board application state.
pub struct BoardApp {
    store: Store,
    selected_column: usize, // index into TaskStatus::ALL
    selected_card: usize,   // selected card within the column
    column_scroll_offsets: [usize; COLUMN_COUNT],
    status_message: String,
    show_task_detail: bool,
    show_stats: bool,
    filter_active: bool,
    filter_text: String,

    // Task ids organised into columns by status
    columns: [Vec<String>; COLUMN_COUNT],
}

impl BoardApp {
    /// Create a new board over the given store.
    pub fn new(store: Store) -> Self {
        let mut app = BoardApp {
            store,
            selected_column: 0,
            selected_card: 0,
            column_scroll_offsets: [0; COLUMN_COUNT],
            status_message: String::new(),
            show_task_detail: false,
            show_stats: false,
            filter_active: false,
            filter_text: String::new(),
            columns: Default::default(),
        };
        app.update_columns();
        app
    }

    /// The filter currently applied to the board.
    fn current_filter(&self) -> TaskFilter {
        TaskFilter {
            search: self.filter_text.clone(),
            ..TaskFilter::default()
        }
    }

    /// Rebuild the status columns from the store and the active filter.
    fn update_columns(&mut self) {
        for (i, column) in self.columns.iter_mut().enumerate() {
            column.clear();
            self.column_scroll_offsets[i] = 0;
        }

        let filter = self.current_filter();
        for task in filter.apply(self.store.tasks()) {
            self.columns[column_index(task.status)].push(task.id.clone());
        }

        self.clamp_selection();
    }

    /// Ensure selected column and card indices are valid.
    fn clamp_selection(&mut self) {
        if self.selected_column >= COLUMN_COUNT {
            self.selected_column = 0;
        }
        let column_len = self.columns[self.selected_column].len();
        if column_len == 0 {
            self.selected_card = 0;
            self.column_scroll_offsets[self.selected_column] = 0;
        } else if self.selected_card >= column_len {
            self.selected_card = column_len - 1;
        }
    }

    fn selected_task_id(&self) -> Option<String> {
        self.columns[self.selected_column]
            .get(self.selected_card)
            .cloned()
    }

    /// Move the selected card one column left or right.
    fn move_card(&mut self, forward: bool) {
        let target_column = if forward {
            if self.selected_column + 1 >= COLUMN_COUNT {
                return;
            }
            self.selected_column + 1
        } else {
            match self.selected_column.checked_sub(1) {
                Some(c) => c,
                None => return,
            }
        };
        let Some(task_id) = self.selected_task_id() else {
            return;
        };

        let status = TaskStatus::ALL[target_column];
        match self.store.set_status(&task_id, status) {
            Ok(_) => {
                self.update_columns();
                self.selected_column = target_column;
                if let Some(pos) = self.columns[target_column]
                    .iter()
                    .position(|id| *id == task_id)
                {
                    self.selected_card = pos;
                } else {
                    self.clamp_selection();
                }
                self.set_status_message(format!(
                    "Moved task to {}",
                    format_task_status(status)
                ));
            }
            Err(e) => self.set_status_message(format!("Error: {e}")),
        }
    }

    /// Toggle the selected task between Done and To Do.
    fn toggle_task_completion(&mut self) {
        let Some(task_id) = self.selected_task_id() else {
            return;
        };
        let Some(task) = self.store.task(&task_id) else {
            return;
        };
        let new_status = if task.status == TaskStatus::Done {
            TaskStatus::Todo
        } else {
            TaskStatus::Done
        };
        match self.store.set_status(&task_id, new_status) {
            Ok(_) => {
                self.update_columns();
                self.set_status_message(format!(
                    "Task marked as {}",
                    format_task_status(new_status)
                ));
            }
            Err(e) => self.set_status_message(format!("Error: {e}")),
        }
    }

    fn set_status_message(&mut self, msg: String) {
        self.status_message = msg;
    }

    fn clear_status_message(&mut self) {
        self.status_message.clear();
    }

    fn column_titles() -> [&'static str; COLUMN_COUNT] {
        ["To Do", "In Progress", "Review", "Done"]
    }

    /// Handle keyboard input. Returns true when the board should exit.
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                // Filter mode captures all typing until Enter or Esc.
                if self.filter_active {
                    match key.code {
                        KeyCode::Esc => {
                            self.filter_active = false;
                            self.filter_text.clear();
                            self.update_columns();
                            self.clear_status_message();
                        }
                        KeyCode::Enter => {
                            self.filter_active = false;
                            if self.filter_text.is_empty() {
                                self.set_status_message("Filter cleared".to_string());
                            } else {
                                let visible: usize =
                                    self.columns.iter().map(|col| col.len()).sum();
                                self.set_status_message(format!(
                                    "Filter: '{}' ({} tasks shown)",
                                    self.filter_text, visible
                                ));
                            }
                        }
                        KeyCode::Backspace => {
                            if !self.filter_text.is_empty() {
                                self.filter_text.pop();
                                self.update_columns();
                            }
                        }
                        KeyCode::Char(c) => {
                            self.filter_text.push(c);
                            self.update_columns();
                        }
                        _ => {}
                    }
                    return Ok(false);
                }

                self.clear_status_message();

                match key.code {
                    KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(true)
                    }
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(true)
                    }
                    KeyCode::Esc => return Ok(true),
                    KeyCode::Char('q') => return Ok(true),

                    // Task detail popup
                    KeyCode::Enter => {
                        self.show_task_detail = !self.show_task_detail;
                    }

                    // Card movement between columns (before plain navigation)
                    KeyCode::Left if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        self.move_card(false);
                    }
                    KeyCode::Right if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        self.move_card(true);
                    }

                    // Column navigation
                    KeyCode::Left => {
                        if self.selected_column > 0 {
                            self.selected_column -= 1;
                            self.clamp_selection();
                        }
                    }
                    KeyCode::Right => {
                        if self.selected_column < COLUMN_COUNT - 1 {
                            self.selected_column += 1;
                            self.clamp_selection();
                        }
                    }

                    // Card navigation within a column
                    KeyCode::Up => {
                        if self.selected_card > 0 {
                            self.selected_card -= 1;
                        }
                    }
                    KeyCode::Down => {
                        let column_len = self.columns[self.selected_column].len();
                        if column_len > 0 && self.selected_card < column_len - 1 {
                            self.selected_card += 1;
                        }
                    }

                    // Complete/reopen task
                    KeyCode::Char('c') => {
                        self.toggle_task_completion();
                    }

                    // Aggregates footer
                    KeyCode::Char('s') => {
                        self.show_stats = !self.show_stats;
                    }

                    // Filter mode
                    KeyCode::Char('/') => {
                        self.filter_active = true;
                        self.set_status_message(
                            "Filter: type to search content/assignee, Enter to apply, Esc to cancel"
                                .to_string(),
                        );
                    }

                    // Help
                    KeyCode::Char('h') => {
                        self.set_status_message(
                            "Help: Enter: Details | Ctrl+←/→: Move | c: Complete | s: Stats | /: Filter | Esc: Exit"
                                .to_string(),
                        );
                    }

                    _ => {}
                }
            }
        }
        Ok(false)
    }

    /// Render the board.
    fn render(&mut self, f: &mut Frame) {
        let mut constraints = vec![
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Board
        ];
        if self.show_stats {
            constraints.push(Constraint::Length(5)); // Aggregates footer
        }
        constraints.push(Constraint::Length(1)); // Status bar

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(f.area());

        self.render_header(f, chunks[0]);
        self.render_board(f, chunks[1]);
        if self.show_stats {
            self.render_stats(f, chunks[2]);
        }
        self.render_status_bar(f, chunks[chunks.len() - 1]);

        if self.show_task_detail {
            self.render_task_detail_popup(f);
        }
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let summary = format!(
            "{} project(s), {} task(s)",
            self.store.projects().len(),
            self.store.tasks().len()
        );
        let header_text = vec![Line::from(vec![
            Span::styled("TASK BOARD", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                summary,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ),
        ])];

        let header_block = Paragraph::new(header_text)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(header_block, area);
    }

    fn render_board(&mut self, f: &mut Frame, area: Rect) {
        let constraints: Vec<Constraint> = (0..COLUMN_COUNT)
            .map(|_| Constraint::Percentage(100 / COLUMN_COUNT as u16))
            .collect();

        let columns_layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        let titles = Self::column_titles();
        for (i, &column_area) in columns_layout.iter().enumerate() {
            self.render_column(f, column_area, i, titles[i]);
        }
    }

    fn render_column(&mut self, f: &mut Frame, area: Rect, column_index: usize, title: &str) {
        let is_selected = column_index == self.selected_column;
        let title = format!("{} ({})", title, self.columns[column_index].len());

        let border_style = if is_selected {
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(border_style);

        let inner = block.inner(area);
        f.render_widget(block, area);

        let cards = &self.columns[column_index];
        if cards.is_empty() {
            return;
        }

        let card_height = 5;
        let available_height = inner.height as usize;
        let visible_cards = available_height / card_height;

        // Keep the selected card visible by adjusting this column's scroll.
        let scroll_offset = if is_selected {
            let start_visible = self.column_scroll_offsets[column_index];
            let end_visible = start_visible + visible_cards;

            if self.selected_card < start_visible {
                self.column_scroll_offsets[column_index] = self.selected_card;
                self.selected_card
            } else if self.selected_card >= end_visible && end_visible > 0 {
                let new_offset = self.selected_card - visible_cards + 1;
                self.column_scroll_offsets[column_index] = new_offset;
                new_offset
            } else {
                start_visible
            }
        } else {
            self.column_scroll_offsets[column_index]
        };

        let mut current_y = 0;
        let mut rendered_cards = 0;

        for (card_index, task_id) in cards.iter().enumerate().skip(scroll_offset) {
            if let Some(task) = self.store.task(task_id) {
                if current_y + card_height > available_height {
                    break;
                }

                let is_this_card_selected = is_selected && card_index == self.selected_card;
                let card_area = Rect {
                    x: inner.x,
                    y: inner.y + current_y as u16,
                    width: inner.width,
                    height: card_height as u16,
                };

                render_card(f, card_area, task, is_this_card_selected);

                current_y += card_height;
                rendered_cards += 1;
            }
        }

        if scroll_offset > 0 {
            let indicator = Paragraph::new(format!("▲ +{} above", scroll_offset))
                .style(Style::default().fg(Color::Cyan));
            f.render_widget(
                indicator,
                Rect {
                    x: inner.x,
                    y: inner.y,
                    width: inner.width,
                    height: 1,
                },
            );
        }

        let remaining = cards.len() - scroll_offset - rendered_cards;
        if remaining > 0 {
            let indicator = Paragraph::new(format!("▼ +{} below", remaining))
                .style(Style::default().fg(Color::Cyan));
            f.render_widget(
                indicator,
                Rect {
                    x: inner.x,
                    y: inner.y + inner.height - 1,
                    width: inner.width,
                    height: 1,
                },
            );
        }
    }

    /// Render the aggregates footer over the currently visible tasks.
    fn render_stats(&self, f: &mut Frame, area: Rect) {
        let filter = self.current_filter();
        let visible = filter.apply(self.store.tasks());

        let counts = status_counts(visible.iter().copied());
        let rate = completion_rate(visible.iter().copied());
        let heavy: Vec<String> = workload(visible.iter().copied())
            .into_iter()
            .filter(|l| l.is_heavy())
            .map(|l| format!("{} ({})", l.name, l.count))
            .collect();

        let lines = vec![
            Line::from(format!(
                "Completion: {} ({} of {} done)",
                format_percent(rate),
                counts.done,
                counts.total()
            )),
            Line::from(format!(
                "To Do: {}  In Progress: {}  Review: {}  Done: {}",
                counts.todo, counts.in_progress, counts.review, counts.done
            )),
            Line::from(format!(
                "Heavy load: {}",
                if heavy.is_empty() {
                    "-".to_string()
                } else {
                    heavy.join(", ")
                }
            )),
        ];

        let footer = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Aggregates"));
        f.render_widget(footer, area);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let status_text = if self.filter_active {
            format!(
                "Filter: {} | Type to search, Enter to apply, Esc to cancel",
                self.filter_text
            )
        } else if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            let visible: usize = self.columns.iter().map(|col| col.len()).sum();
            let filter_indicator = if !self.filter_text.is_empty() {
                format!(" [Filter: {}]", self.filter_text)
            } else {
                String::new()
            };
            format!(
                "Tasks: {}{} | Ctrl+←/→: Move | c: Complete | s: Stats | /: Filter | h: Help",
                visible, filter_indicator
            )
        };

        let status = Paragraph::new(status_text)
            .style(Style::default().bg(ACCENT).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    fn render_task_detail_popup(&self, f: &mut Frame) {
        let Some(task_id) = self.selected_task_id() else {
            return;
        };
        let Some(task) = self.store.task(&task_id) else {
            return;
        };

        // Centered popup, 70% of the screen.
        let popup_area = {
            let area = f.area();
            let popup_width = (area.width * 70) / 100;
            let popup_height = (area.height * 70) / 100;
            let x = (area.width - popup_width) / 2;
            let y = (area.height - popup_height) / 2;
            Rect::new(x, y, popup_width, popup_height)
        };

        f.render_widget(Clear, popup_area);

        let today = Local::now().date_naive();
        let project = self
            .store
            .project(&task.project_id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| task.project_id.clone());

        let detail_lines = vec![
            Line::from(vec![Span::styled(
                format!("{}: {}", task.id, task.content),
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(format!("Status:    {}", format_task_status(task.status))),
            Line::from(format!("Priority:  {}", format_priority(task.priority))),
            Line::from(format!(
                "Assignee:  {}",
                task.assigned_to.as_deref().unwrap_or("-")
            )),
            Line::from(format!("Due:       {}", describe_due(task.due, today))),
            Line::from(format!("Project:   {project}")),
        ];

        let popup_block = Block::default()
            .borders(Borders::ALL)
            .title("Task Details (Press Enter to close)")
            .title_alignment(Alignment::Center)
            .border_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD));

        let popup_paragraph = Paragraph::new(detail_lines)
            .block(popup_block)
            .wrap(Wrap { trim: true })
            .style(Style::default().bg(Color::Black));

        f.render_widget(popup_paragraph, popup_area);
    }

    /// Main event loop.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}

fn column_index(status: TaskStatus) -> usize {
    match status {
        TaskStatus::Todo => 0,
        TaskStatus::InProgress => 1,
        TaskStatus::Review => 2,
        TaskStatus::Done => 3,
    }
}

/// Render a single task card.
fn render_card(f: &mut Frame, area: Rect, task: &Task, is_selected: bool) {
    let style = if is_selected {
        Style::default()
            .bg(ACCENT)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().bg(Color::DarkGray)
    };

    let available_width = area.width.saturating_sub(2) as usize;

    // Word-wrap the content into at most two lines.
    let mut lines = Vec::new();
    let mut current_line = String::new();
    for word in task.content.split_whitespace() {
        if current_line.is_empty() {
            current_line = word.to_string();
        } else if current_line.len() + 1 + word.len() <= available_width {
            current_line.push(' ');
            current_line.push_str(word);
        } else {
            lines.push(current_line.clone());
            current_line = word.to_string();
            if lines.len() >= 2 {
                break;
            }
        }
    }
    if !current_line.is_empty() && lines.len() < 2 {
        lines.push(current_line);
    }

    let mut card_text: Vec<Line> = lines.into_iter().map(Line::from).collect();
    let meta_style = if is_selected {
        Style::default()
    } else {
        Style::default().fg(priority_color(task.priority))
    };
    card_text.push(Line::from(Span::styled(
        format!(
            "{} | {}",
            format_priority(task.priority),
            task.assigned_to.as_deref().unwrap_or("-")
        ),
        meta_style,
    )));

    let card_block = Paragraph::new(card_text)
        .block(Block::default().borders(Borders::ALL))
        .style(style)
        .wrap(Wrap { trim: true });

    f.render_widget(card_block, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    #[test]
    fn columns_partition_tasks_by_status() {
        let app = BoardApp::new(seed::sample());
        let lengths: Vec<usize> = app.columns.iter().map(|c| c.len()).collect();
        assert_eq!(lengths, vec![2, 2, 1, 2]);
        assert_eq!(app.columns[2], vec!["task-3".to_string()]);
    }

    #[test]
    fn filter_text_narrows_the_board() {
        let mut app = BoardApp::new(seed::sample());
        app.filter_text = "bob".to_string();
        app.update_columns();
        let visible: usize = app.columns.iter().map(|c| c.len()).sum();
        assert_eq!(visible, 2);

        app.filter_text = "zzz".to_string();
        app.update_columns();
        let visible: usize = app.columns.iter().map(|c| c.len()).sum();
        assert_eq!(visible, 0);
        // Empty board is a valid state, not an error.
        assert_eq!(app.selected_card, 0);
    }

    #[test]
    fn moving_a_card_changes_its_status_column() {
        let mut app = BoardApp::new(seed::sample());
        // First card of the To Do column.
        let task_id = app.selected_task_id().unwrap();
        app.move_card(true);
        assert_eq!(
            app.store.task(&task_id).unwrap().status,
            TaskStatus::InProgress
        );
        assert_eq!(app.selected_column, 1);
        // The moved card stays selected in its new column.
        assert_eq!(app.selected_task_id().unwrap(), task_id);
    }

    #[test]
    fn moving_off_the_board_edge_is_a_no_op() {
        let mut app = BoardApp::new(seed::sample());
        app.selected_column = 0;
        app.move_card(false);
        assert_eq!(app.selected_column, 0);

        app.selected_column = COLUMN_COUNT - 1;
        app.clamp_selection();
        let before = app.store.task("task-6").unwrap().status;
        app.move_card(true);
        assert_eq!(app.store.task("task-6").unwrap().status, before);
    }

    #[test]
    fn completion_toggle_round_trips() {
        let mut app = BoardApp::new(seed::sample());
        let task_id = app.selected_task_id().unwrap();
        app.toggle_task_completion();
        assert_eq!(app.store.task(&task_id).unwrap().status, TaskStatus::Done);

        // Select it again in the Done column and toggle back.
        app.selected_column = 3;
        let pos = app.columns[3].iter().position(|id| *id == task_id).unwrap();
        app.selected_card = pos;
        app.toggle_task_completion();
        assert_eq!(app.store.task(&task_id).unwrap().status, TaskStatus::Todo);
    }
}
