pub mod app;
pub mod event;
pub mod layout;

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{KeyCode, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use crate::app::{AppContext, Result};
use crate::domain::{Article, Failure};
use crate::feed::FeedController;

use self::app::{InputMode, TuiApp};
use self::event::{Action, AppEvent, EventHandler};

type Tui = Terminal<CrosstermBackend<Stdout>>;

type DetailResult = (String, std::result::Result<Article, Failure>);

pub async fn run(ctx: Arc<AppContext>) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, ctx).await;
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_app(terminal: &mut Tui, ctx: Arc<AppContext>) -> Result<()> {
    let config = &ctx.config;
    let mut tui_app = TuiApp::new(&config.feeds.categories, config.feeds.load_more_threshold);
    let event_handler = EventHandler::new(Duration::from_millis(100));

    let mut controller = ctx.feed_controller();
    let mut feed_events = controller.subscribe();
    let (detail_tx, mut detail_rx) = mpsc::unbounded_channel::<DetailResult>();

    controller.observe(tui_app.current_identity());

    loop {
        controller.poll();
        while let Ok(event) = feed_events.try_recv() {
            tui_app.on_feed_event(&event);
        }
        while let Ok((id, result)) = detail_rx.try_recv() {
            tui_app.on_detail(id, result);
        }

        let view = controller.view();
        terminal.draw(|frame| layout::render(frame, &mut tui_app, &view, &config.colors))?;

        match event_handler.next()? {
            AppEvent::Key(key) if tui_app.input_mode == InputMode::Search => {
                handle_search_key(&mut tui_app, &mut controller, key);
            }
            AppEvent::Key(key) => {
                let action = config.keybindings.get_action(&key);
                handle_action(&mut tui_app, &mut controller, &ctx, &detail_tx, action);
            }
            AppEvent::Tick => {}
        }

        let state = controller.state();
        if tui_app.should_load_more(state.items.len(), state.has_more) && !state.is_loading() {
            if let Err(refused) = controller.load_more() {
                tracing::debug!("Not loading more: {}", refused);
            }
        }

        if tui_app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_search_key(tui_app: &mut TuiApp, controller: &mut FeedController, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => tui_app.cancel_search(),
        KeyCode::Enter => {
            let identity = tui_app.submit_search();
            controller.observe(identity);
        }
        KeyCode::Backspace => {
            tui_app.search_input.pop();
        }
        KeyCode::Char(c) => tui_app.search_input.push(c),
        _ => {}
    }
}

fn handle_action(
    tui_app: &mut TuiApp,
    controller: &mut FeedController,
    ctx: &Arc<AppContext>,
    detail_tx: &mpsc::UnboundedSender<DetailResult>,
    action: Action,
) {
    let len = controller.state().items.len();

    match action {
        Action::Quit => {
            tui_app.should_quit = true;
        }
        Action::MoveUp => {
            tui_app.move_up();
        }
        Action::MoveDown => {
            tui_app.move_down(len);
        }
        Action::NextPage => {
            tui_app.next_page(len);
        }
        Action::PrevPage => {
            tui_app.prev_page();
        }
        Action::NextTab => {
            tui_app.next_tab();
            controller.observe(tui_app.current_identity());
        }
        Action::PrevTab => {
            tui_app.prev_tab();
            controller.observe(tui_app.current_identity());
        }
        Action::Select => {
            let Some(id) = controller
                .state()
                .items
                .get(tui_app.item_index)
                .map(|article| article.id.clone())
            else {
                return;
            };
            if tui_app.request_detail(&id) {
                let api = ctx.api.clone();
                let tx = detail_tx.clone();
                tokio::spawn(async move {
                    let result = api.article(&id).await;
                    let _ = tx.send((id, result));
                });
            }
        }
        Action::OpenInBrowser => {
            if let Some(article) = controller.state().items.get(tui_app.item_index) {
                if let Err(e) = open::that(&article.link) {
                    tui_app.set_status(format!("Failed to open browser: {}", e));
                }
            }
        }
        Action::Refresh => {
            tui_app.set_status("Refreshing news...".to_string());
            controller.refresh();
        }
        Action::Search => {
            tui_app.begin_search();
        }
        Action::ToggleMaximize => {
            tui_app.toggle_maximize();
        }
        Action::None => {}
    }
}
