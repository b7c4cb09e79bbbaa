use crate::form::{Form, FormField, FormMode};
use crate::task::Task;
use crate::todo_list::TodoList;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use std::io;
use tracing::debug;

/// Row backgrounds, picked by position in the list rather than by task.
pub const PALETTE: [Color; 9] = [
    Color::Rgb(0xff, 0xad, 0xad),
    Color::Rgb(0xff, 0xd6, 0xa5),
    Color::Rgb(0xfd, 0xff, 0xb6),
    Color::Rgb(0xca, 0xff, 0xbf),
    Color::Rgb(0x9b, 0xf6, 0xff),
    Color::Rgb(0xa0, 0xc4, 0xff),
    Color::Rgb(0xbd, 0xb2, 0xff),
    Color::Rgb(0xff, 0xc6, 0xff),
    Color::Rgb(0xff, 0xff, 0xfc),
];

pub fn row_color(index: usize) -> Color {
    PALETTE[index % PALETTE.len()]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub async fn run_app<B: Backend>(terminal: &mut Terminal<B>, list: &mut TodoList) -> io::Result<()> {
    list.load().await;
    let mut events = EventStream::new();
    loop {
        terminal.draw(|f| draw(f, list))?;

        let Some(event) = events.next().await else {
            return Ok(());
        };
        if let Event::Key(key) = event? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if handle_key(list, key).await == Flow::Quit {
                return Ok(());
            }
        }
    }
}

pub async fn handle_key(list: &mut TodoList, key: KeyEvent) -> Flow {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Flow::Quit;
    }
    if list.form.is_open() {
        handle_form_key(list, key).await;
        return Flow::Continue;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Flow::Quit,
        KeyCode::Up => list.select_previous(),
        KeyCode::Down => list.select_next(),
        KeyCode::Char('n') | KeyCode::Char('a') => list.form.open_create(),
        KeyCode::Char('e') | KeyCode::Enter => list.edit_selected(),
        KeyCode::Char('d') | KeyCode::Delete => list.remove_selected().await,
        KeyCode::Char(' ') | KeyCode::Char('c') => list.complete_selected().await,
        KeyCode::Char('r') => list.load().await,
        other => debug!(key = ?other, "unbound key"),
    }
    Flow::Continue
}

async fn handle_form_key(list: &mut TodoList, key: KeyEvent) {
    let on_status = list.form.focus == FormField::Status;
    match key.code {
        KeyCode::Esc => list.form.close(),
        KeyCode::Enter => list.submit_form().await,
        KeyCode::Tab | KeyCode::Down => list.form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => list.form.focus_previous(),
        KeyCode::Backspace => list.form.backspace(),
        KeyCode::Left if on_status => list.form.cycle_status(false),
        KeyCode::Right if on_status => list.form.cycle_status(true),
        KeyCode::Char(c) => list.form.push_char(c),
        _ => {}
    }
}

pub fn draw(f: &mut Frame, list: &TodoList) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    let header = Paragraph::new(Line::from(vec![
        Span::styled("ToDo List", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!("  {}", list.api().base_url())),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, rows[0]);

    if list.form.is_open() {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[1]);
        draw_tasks(f, list, body[0]);
        draw_form(f, &list.form, body[1]);
    } else {
        draw_tasks(f, list, rows[1]);
    }

    let hints = if list.form.is_open() {
        "enter save  tab next field  ←/→ status  esc cancel"
    } else {
        "n new  e edit  d delete  space complete  r reload  q quit"
    };
    f.render_widget(
        Paragraph::new(hints).style(Style::default().fg(Color::DarkGray)),
        rows[2],
    );
}

fn draw_tasks(f: &mut Frame, list: &TodoList, area: Rect) {
    let items: Vec<ListItem> = list
        .tasks
        .iter()
        .enumerate()
        .map(|(index, task)| task_item(index, task))
        .collect();

    let tasks = List::new(items)
        .block(Block::default().title("Tasks").borders(Borders::ALL))
        .highlight_symbol(">> ")
        .highlight_style(Style::default().add_modifier(Modifier::BOLD));

    let mut state = ListState::default();
    if !list.tasks.is_empty() {
        state.select(Some(list.selected_task));
    }
    f.render_stateful_widget(tasks, area, &mut state);
}

fn task_item(index: usize, task: &Task) -> ListItem<'static> {
    let checkbox = if task.is_completed() { "[x] " } else { "[ ] " };
    let mut lines = vec![Line::from(vec![
        Span::raw(checkbox),
        Span::styled(task.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
    ])];
    if !task.description.is_empty() {
        lines.push(Line::raw(format!("    {}", task.description)));
    }
    if let Some(date) = &task.due_date {
        lines.push(Line::raw(format!("    Due Date: {}", date.text())));
    }
    if let Some(time) = &task.due_time {
        lines.push(Line::raw(format!("    Due Time: {}", time.text())));
    }
    lines.push(Line::raw(format!("    Status: {}", task.status)));

    ListItem::new(lines).style(Style::default().fg(Color::Black).bg(row_color(index)))
}

fn draw_form(f: &mut Frame, form: &Form, area: Rect) {
    let (title, submit, fields) = match &form.mode {
        FormMode::None => return,
        FormMode::Creating(draft) => (
            "New ToDo",
            "Add ToDo",
            (&draft.title, &draft.description, &draft.status),
        ),
        FormMode::Editing(task) => (
            "Edit ToDo",
            "Update ToDo",
            (&task.title, &task.description, &task.status),
        ),
    };
    let (task_title, description, status) = fields;

    let mut lines = Vec::new();
    for field in FormField::ALL {
        let (value, valid) = match field {
            FormField::Title => (task_title.clone(), true),
            FormField::Description => (description.clone(), true),
            FormField::DueDate => (form.due_date_text.clone(), form.due_date_valid()),
            FormField::DueTime => (form.due_time_text.clone(), form.due_time_valid()),
            FormField::Status => (format!("< {} >", status.label()), true),
        };
        let focused = form.focus == field;
        let mut style = Style::default();
        if focused {
            style = style.fg(Color::Cyan).add_modifier(Modifier::BOLD);
        }
        if !valid {
            style = style.fg(Color::Red);
        }
        let marker = if focused { "> " } else { "  " };
        lines.push(Line::from(vec![
            Span::styled(format!("{marker}{}: ", field.label()), style),
            Span::styled(value, style),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::raw(format!("  [enter] {submit}  [esc] Cancel")));

    let panel = Paragraph::new(lines).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(panel, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::task::{Draft, DueDate, DueTime, TaskId, TaskStatus};
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use serde_json::json;
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn task(id: u64, title: &str) -> Task {
        Task {
            id: TaskId(id),
            title: title.to_string(),
            description: String::new(),
            status: TaskStatus::Pending,
            due_date: None,
            due_time: None,
        }
    }

    fn render(list: &TodoList) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw(f, list)).unwrap();
        terminal.backend().buffer().clone()
    }

    fn locate(buf: &Buffer, text: &str) -> Option<(u16, u16)> {
        let area = buf.area;
        let chars: Vec<String> = text.chars().map(String::from).collect();
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                let fits = chars.iter().enumerate().all(|(i, c)| {
                    let cx = x as usize + i;
                    cx < (area.x + area.width) as usize && buf[(cx as u16, y)].symbol() == c
                });
                if fits {
                    return Some((x, y));
                }
            }
        }
        None
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn offline_list() -> TodoList {
        TodoList::new(&Config::default()).unwrap()
    }

    #[test]
    fn palette_wraps_by_position() {
        assert_eq!(row_color(0), Color::Rgb(0xff, 0xad, 0xad));
        assert_eq!(row_color(8), Color::Rgb(0xff, 0xff, 0xfc));
        assert_eq!(row_color(9), row_color(0));
        assert_eq!(row_color(13), row_color(4));
    }

    #[test]
    fn task_without_dates_has_no_due_lines() {
        let mut list = offline_list();
        list.tasks = vec![task(1, "Buy milk")];

        let buf = render(&list);
        assert!(locate(&buf, "Buy milk").is_some());
        assert!(locate(&buf, "Status: pending").is_some());
        assert!(locate(&buf, "Due Date").is_none());
        assert!(locate(&buf, "Due Time").is_none());
    }

    #[test]
    fn due_date_and_time_shown_when_present() {
        let mut list = offline_list();
        let mut dated = task(1, "Dentist");
        dated.due_date = Some(DueDate::from_wire("2024-07-02"));
        dated.due_time = Some(DueTime::from_wire("14:30"));
        list.tasks = vec![dated];

        let buf = render(&list);
        assert!(locate(&buf, "Due Date: 2024-07-02").is_some());
        assert!(locate(&buf, "Due Time: 14:30").is_some());
    }

    #[test]
    fn unknown_status_is_shown_verbatim() {
        let mut list = offline_list();
        let mut blocked = task(1, "Deploy");
        blocked.status = TaskStatus::Other("blocked".to_string());
        list.tasks = vec![blocked];

        let buf = render(&list);
        assert!(locate(&buf, "Status: blocked").is_some());
    }

    #[test]
    fn form_panel_titles_follow_mode() {
        let mut list = offline_list();
        list.form.open_create();
        assert!(locate(&render(&list), "New ToDo").is_some());

        list.form.open_edit(&task(3, "Fix bike"));
        let buf = render(&list);
        assert!(locate(&buf, "Edit ToDo").is_some());
        assert!(locate(&buf, "Fix bike").is_some());
    }

    #[tokio::test]
    async fn deleting_first_task_recolors_the_next() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/todos/1"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/todos/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 2, "title": "Bravo", "description": "", "status": "pending"}
            ])))
            .mount(&server)
            .await;

        let base = Url::parse(&format!("{}/todos/", server.uri())).unwrap();
        let mut list = TodoList::new(&Config::with_base_url(base)).unwrap();
        list.tasks = vec![task(1, "Alpha"), task(2, "Bravo")];

        let buf = render(&list);
        let (x, y) = locate(&buf, "Bravo").unwrap();
        assert_eq!(buf[(x, y)].bg, PALETTE[1]);

        assert_eq!(handle_key(&mut list, press(KeyCode::Char('d'))).await, Flow::Continue);

        let buf = render(&list);
        assert!(locate(&buf, "Alpha").is_none());
        let (x, y) = locate(&buf, "Bravo").unwrap();
        assert_eq!(buf[(x, y)].bg, PALETTE[0]);
    }

    #[tokio::test]
    async fn typing_in_form_does_not_trigger_list_keys() {
        let mut list = offline_list();
        list.tasks = vec![task(1, "Alpha")];

        handle_key(&mut list, press(KeyCode::Char('n'))).await;
        for c in "quick".chars() {
            assert_eq!(handle_key(&mut list, press(KeyCode::Char(c))).await, Flow::Continue);
        }
        handle_key(&mut list, press(KeyCode::Tab)).await;
        handle_key(&mut list, press(KeyCode::Tab)).await;
        handle_key(&mut list, press(KeyCode::Tab)).await;
        handle_key(&mut list, press(KeyCode::Tab)).await;
        handle_key(&mut list, press(KeyCode::Right)).await;

        assert_eq!(
            list.form.mode,
            FormMode::Creating(Draft {
                title: "quick".to_string(),
                status: TaskStatus::InProgress,
                ..Draft::default()
            })
        );
        assert_eq!(list.tasks.len(), 1);

        handle_key(&mut list, press(KeyCode::Esc)).await;
        assert!(!list.form.is_open());
        assert_eq!(handle_key(&mut list, press(KeyCode::Char('q'))).await, Flow::Quit);
    }

    #[tokio::test]
    async fn edit_key_opens_selected_task() {
        let mut list = offline_list();
        list.tasks = vec![task(1, "Alpha"), task(2, "Bravo")];

        handle_key(&mut list, press(KeyCode::Down)).await;
        handle_key(&mut list, press(KeyCode::Char('e'))).await;
        assert_eq!(list.form.mode, FormMode::Editing(task(2, "Bravo")));

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key(&mut list, ctrl_c).await, Flow::Quit);
    }
}
