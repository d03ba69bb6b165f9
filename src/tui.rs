use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use std::io::stdout;

use jobtrack::storage::KeyValueStore;
use jobtrack::{ApplicationRecord, CoverLetterType, InterviewRound, Priority, Query, Status, Tracker, View};

use crate::{short_id, truncate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    Search,
}

struct AppState {
    selected: usize,
    scroll_offset: u16,
    mode: Mode,
    message: Option<String>,
}

impl AppState {
    fn new() -> Self {
        Self {
            selected: 0,
            scroll_offset: 0,
            mode: Mode::Normal,
            message: None,
        }
    }

    fn next(&mut self, len: usize) {
        if len > 0 && self.selected < len - 1 {
            self.selected += 1;
            self.scroll_offset = 0;
        }
    }

    fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.scroll_offset = 0;
        }
    }

    fn clamp(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    fn reset(&mut self) {
        self.selected = 0;
        self.scroll_offset = 0;
    }

    fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(3);
    }

    fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(3);
    }
}

pub fn run_browse<S: KeyValueStore>(tracker: &mut Tracker<S>, query: Query) -> Result<()> {
    tracker.set_query(query);
    let mut state = AppState::new();

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_loop(&mut terminal, &mut state, tracker);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_loop<S: KeyValueStore>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut AppState,
    tracker: &mut Tracker<S>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| draw(frame, state, tracker))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if state.mode == Mode::Search {
            handle_search_key(key.code, state, tracker);
            continue;
        }

        state.message = None;
        let len = tracker.visible().len();
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => break,
            KeyCode::Down | KeyCode::Char('j') => state.next(len),
            KeyCode::Up | KeyCode::Char('k') => state.prev(),
            KeyCode::Char('J') | KeyCode::PageDown => state.scroll_down(),
            KeyCode::Char('K') | KeyCode::PageUp => state.scroll_up(),
            KeyCode::Char('v') => tracker.set_view(tracker.view().toggle()),
            KeyCode::Char('f') => update_query(tracker, state, |q| {
                q.status_filter = q.status_filter.next();
            }),
            KeyCode::Char('s') => update_query(tracker, state, |q| {
                q.sort_field = q.sort_field.next();
            }),
            KeyCode::Char('o') => update_query(tracker, state, |q| {
                q.sort_direction = q.sort_direction.toggle();
            }),
            KeyCode::Char('/') => state.mode = Mode::Search,
            KeyCode::Char(c @ '1'..='4') => {
                let status = Status::KNOWN[c as usize - '1' as usize].clone();
                set_status(tracker, state, status);
            }
            KeyCode::Char('d') => delete_selected(tracker, state),
            _ => {}
        }
    }
    Ok(())
}

fn handle_search_key<S: KeyValueStore>(code: KeyCode, state: &mut AppState, tracker: &mut Tracker<S>) {
    match code {
        KeyCode::Enter | KeyCode::Esc => state.mode = Mode::Normal,
        KeyCode::Backspace => update_query(tracker, state, |q| {
            q.search_text.pop();
        }),
        KeyCode::Char(c) => update_query(tracker, state, |q| q.search_text.push(c)),
        _ => {}
    }
}

fn update_query<S: KeyValueStore>(
    tracker: &mut Tracker<S>,
    state: &mut AppState,
    change: impl FnOnce(&mut Query),
) {
    let mut query = tracker.query().clone();
    change(&mut query);
    tracker.set_query(query);
    state.reset();
}

fn selected_record<S: KeyValueStore>(tracker: &Tracker<S>, state: &AppState) -> Option<ApplicationRecord> {
    tracker.visible().get(state.selected).map(|record| (*record).clone())
}

fn set_status<S: KeyValueStore>(tracker: &mut Tracker<S>, state: &mut AppState, status: Status) {
    let Some(record) = selected_record(tracker, state) else {
        return;
    };
    let company = record.details.company_name.clone();
    let mut draft = record.details;
    draft.status = status.clone();

    state.message = Some(match tracker.submit_edit(&record.id, draft) {
        Ok(()) => format!("{} -> {}", company, status),
        Err(err) => err.to_string(),
    });

    // Follow the edited record if it is still visible after re-sorting.
    let visible = tracker.visible();
    match visible.iter().position(|r| r.id == record.id) {
        Some(index) => state.selected = index,
        None => state.clamp(visible.len()),
    }
}

fn delete_selected<S: KeyValueStore>(tracker: &mut Tracker<S>, state: &mut AppState) {
    let Some(record) = selected_record(tracker, state) else {
        return;
    };
    tracker.remove(&record.id);
    state.message = Some(format!("Deleted {}", record.details.company_name));
    state.clamp(tracker.visible().len());
}

fn status_style(status: &Status) -> Style {
    match status {
        Status::Applied => Style::default().fg(Color::Blue),
        Status::Interviewing => Style::default().fg(Color::Yellow),
        Status::Accepted => Style::default().fg(Color::Green),
        Status::Rejected => Style::default().fg(Color::Red),
        Status::Unknown(_) => Style::default(),
    }
}

fn priority_style(priority: &Priority) -> Style {
    match priority {
        Priority::High => Style::default().fg(Color::Red),
        Priority::Medium => Style::default().fg(Color::Yellow),
        Priority::Low => Style::default().fg(Color::Cyan),
        Priority::Unknown(_) => Style::default(),
    }
}

fn draw<S: KeyValueStore>(frame: &mut Frame, state: &AppState, tracker: &Tracker<S>) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    frame.render_widget(summary_bar(tracker), rows[0]);

    match tracker.view() {
        View::Table => draw_table(frame, rows[1], state, tracker),
        View::Board => draw_board(frame, rows[1], state, tracker),
    }

    frame.render_widget(footer(state, tracker.query()), rows[2]);
}

fn summary_bar<S: KeyValueStore>(tracker: &Tracker<S>) -> Paragraph<'static> {
    let summary = tracker.summary();
    let mut spans = vec![Span::styled(
        format!(" Total {}", summary.total),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    for status in Status::KNOWN {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            format!("{} {}", status, summary.count(&status)),
            status_style(&status),
        ));
    }
    if summary.other > 0 {
        spans.push(Span::raw(format!("   Other {}", summary.other)));
    }

    Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL).title(" jobtrack "))
}

fn query_title(query: &Query, shown: usize) -> String {
    let mut title = format!(
        " Applications ({}) | {} | {} {} ",
        shown,
        query.status_filter,
        query.sort_field.label(),
        query.sort_direction.arrow()
    );
    if !query.search_text.is_empty() {
        title.push_str(&format!("| \"{}\" ", query.search_text));
    }
    title
}

fn draw_table<S: KeyValueStore>(frame: &mut Frame, area: Rect, state: &AppState, tracker: &Tracker<S>) {
    let visible = tracker.visible();

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Percentage(55),
        ])
        .split(area);

    let items: Vec<ListItem> = visible
        .iter()
        .map(|record| {
            let app = &record.details;
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<13}", truncate(app.status.as_str(), 12)), status_style(&app.status)),
                Span::raw(format!(
                    "{} | {} ",
                    truncate(&app.company_name, 20),
                    truncate(&app.role, 20)
                )),
                Span::styled(app.date_applied.clone(), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(query_title(tracker.query(), visible.len())),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    if !visible.is_empty() {
        list_state.select(Some(state.selected));
    }
    frame.render_stateful_widget(list, chunks[0], &mut list_state);

    let detail = match visible.get(state.selected) {
        Some(record) => build_detail(record),
        None if tracker.list().is_empty() => Text::raw("No applications yet. Add one with: jobtrack add"),
        None => Text::raw("No applications match the current filter"),
    };
    let detail_widget = Paragraph::new(detail)
        .block(Block::default().borders(Borders::ALL).title(" Detail "))
        .wrap(Wrap { trim: false })
        .scroll((state.scroll_offset, 0));

    frame.render_widget(detail_widget, chunks[1]);
}

fn draw_board<S: KeyValueStore>(frame: &mut Frame, area: Rect, state: &AppState, tracker: &Tracker<S>) {
    let visible = tracker.visible();
    let selected_id = visible.get(state.selected).map(|record| record.id.as_str());

    let columns = tracker.board();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for (column, chunk) in columns.iter().zip(chunks.iter()) {
        let mut items: Vec<ListItem> = column
            .records
            .iter()
            .map(|record| {
                let app = &record.details;
                let mut lines = vec![Line::from(Span::styled(
                    app.company_name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ))];
                if let Some(team) = &app.team_name {
                    lines.push(Line::from(Span::styled(team.clone(), Style::default().fg(Color::DarkGray))));
                }
                lines.push(Line::from(app.role.clone()));
                lines.push(Line::from(vec![
                    Span::styled(app.priority.to_string(), priority_style(&app.priority)),
                    Span::styled(format!(" {}", app.date_applied), Style::default().fg(Color::DarkGray)),
                ]));
                if app.referral_given.is_yes() {
                    lines.push(Line::from(Span::styled("Referral", Style::default().fg(Color::Green))));
                }
                lines.push(Line::from(""));
                ListItem::new(Text::from(lines))
            })
            .collect();

        if items.is_empty() {
            items.push(ListItem::new(Span::styled(
                "No applications",
                Style::default().fg(Color::DarkGray),
            )));
        }

        let mut list_state = ListState::default();
        list_state.select(
            column
                .records
                .iter()
                .position(|record| Some(record.id.as_str()) == selected_id),
        );

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(
                        format!(" {} ({}) ", column.status, column.records.len()),
                        status_style(&column.status),
                    )),
            )
            .highlight_style(Style::default().bg(Color::DarkGray));

        frame.render_stateful_widget(list, *chunk, &mut list_state);
    }
}

fn footer(state: &AppState, query: &Query) -> Paragraph<'static> {
    if state.mode == Mode::Search {
        return Paragraph::new(format!(" Search: {}_   (Enter to finish)", query.search_text));
    }
    if let Some(message) = &state.message {
        return Paragraph::new(format!(" {}", message)).style(Style::default().fg(Color::Yellow));
    }
    Paragraph::new(
        " j/k:navigate  J/K:scroll  v:table/board  f:filter  /:search  s:sort  o:order  1-4:set status  d:delete  q:quit",
    )
    .style(Style::default().fg(Color::DarkGray))
}

fn build_detail(record: &ApplicationRecord) -> Text<'static> {
    let app = &record.details;
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(
        app.company_name.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    if let Some(team) = &app.team_name {
        lines.push(Line::from(team.clone()));
    }
    lines.push(Line::from(app.role.clone()));
    lines.push(Line::from(""));

    lines.push(Line::from(vec![
        Span::raw("Status: "),
        Span::styled(app.status.to_string(), status_style(&app.status)),
        Span::raw("   Priority: "),
        Span::styled(app.priority.to_string(), priority_style(&app.priority)),
    ]));
    lines.push(Line::from(format!("Applied: {}", app.date_applied)));
    if let Some(follow_up) = &app.follow_up_date {
        lines.push(Line::from(Span::styled(
            format!("Follow-up: {}", follow_up),
            Style::default().fg(Color::Yellow),
        )));
    }
    if app.interview_round != InterviewRound::NotSet {
        lines.push(Line::from(format!("Interview round: {}", app.interview_round.as_str())));
    }
    if let Some(salary) = &app.salary_range {
        lines.push(Line::from(format!("Salary: {}", salary)));
    }
    if let Some(link) = &app.website_link {
        lines.push(Line::from(format!("Posting: {}", link)));
    }
    if let Some(resume) = &app.resume_file_name {
        lines.push(Line::from(format!("Resume: {}", resume)));
    }
    if app.cover_letter_type == CoverLetterType::File {
        lines.push(Line::from(format!("Cover letter: {}", app.cover_letter)));
    }

    lines.push(Line::from(format!(
        "Referral: {}   Recruiter outreach: {}",
        app.referral_given.as_str(),
        app.recruiter_outreach.as_str()
    )));
    if let Some(contact) = &app.recruiter_contact {
        lines.push(Line::from(format!("Recruiter: {}", contact)));
    }

    let sections = [
        ("COVER LETTER", (app.cover_letter_type == CoverLetterType::Text).then_some(app.cover_letter.as_str())),
        ("NOTES", app.notes.as_deref()),
    ];
    for (heading, body) in sections {
        let Some(body) = body else { continue };
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            heading,
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for line in textwrap::fill(body, 70).lines() {
            lines.push(Line::from(format!("  {}", line)));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("id {}", short_id(&record.id)),
        Style::default().fg(Color::DarkGray),
    )));

    Text::from(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobtrack::storage::MemoryStore;
    use jobtrack::{ApplicationDraft, SortField, StatusFilter};

    fn tracker_with(companies: &[&str]) -> Tracker<MemoryStore> {
        let mut tracker = Tracker::open(MemoryStore::new());
        for company in companies {
            tracker
                .submit_new(ApplicationDraft {
                    date_applied: "2024-01-01".to_string(),
                    ..ApplicationDraft::new(*company, "SWE")
                })
                .unwrap();
        }
        tracker
    }

    fn selected_company<S: KeyValueStore>(tracker: &Tracker<S>, state: &AppState) -> String {
        selected_record(tracker, state).unwrap().details.company_name
    }

    #[test]
    fn status_change_keeps_edited_record_selected_when_sorted_by_status() {
        let mut tracker = tracker_with(&["Acme", "Globex", "Initech"]);
        let mut query = tracker.query().clone();
        query.sort_field = SortField::Status;
        tracker.set_query(query);

        let mut state = AppState::new();
        state.selected = 0;
        assert_eq!(selected_company(&tracker, &state), "Acme");

        // Descending by label: Applied rows come before Accepted.
        set_status(&mut tracker, &mut state, Status::Accepted);
        assert_eq!(state.selected, 2);
        assert_eq!(selected_company(&tracker, &state), "Acme");

        set_status(&mut tracker, &mut state, Status::Rejected);
        assert_eq!(state.selected, 0);
        assert_eq!(selected_company(&tracker, &state), "Acme");
    }

    #[test]
    fn status_change_out_of_filter_clamps_selection() {
        let mut tracker = tracker_with(&["Acme", "Globex"]);
        let mut query = tracker.query().clone();
        query.status_filter = StatusFilter::Only(Status::Applied);
        tracker.set_query(query);

        let mut state = AppState::new();
        state.selected = 1;
        set_status(&mut tracker, &mut state, Status::Interviewing);

        assert_eq!(tracker.visible().len(), 1);
        assert_eq!(state.selected, 0);
    }
}
