//! Event loop of the terminal client.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::{Preferences, Settings};
use crate::net::{self, SocketClient};
use crate::protocol::ClientRequest;
use crate::route::Route;
use crate::sound::{self, SoundPlayer};
use crate::terminal::TerminalGuard;
use crate::ClientError;

use super::state::{ClientApp, JoinField, Screen, SetupField};
use super::ui;

/// Shared client app state.
type SharedApp = Arc<Mutex<ClientApp>>;

/// Run the quiz client, starting on `route`.
pub async fn run(settings: Settings, route: Route) -> Result<(), ClientError> {
    let prefs = Preferences::load(&settings.prefs_file).unwrap_or_else(|e| {
        warn!(error = %e, "ignoring unreadable preferences");
        Preferences::default()
    });
    let sound = SoundPlayer::new(prefs, Some(settings.prefs_file.clone()), sound::default_output());
    let app = Arc::new(Mutex::new(ClientApp::new(settings.server.clone(), sound)));

    info!(server = %settings.server, "connecting");
    let (socket, mut events) = net::connect(&settings.server).await?;

    tokio::spawn(load_packs(Arc::clone(&app), settings.server.clone()));

    let app_clone = Arc::clone(&app);
    let socket_clone = socket.clone();
    let recv_task = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let follow_up = app_clone.lock().await.handle_event(event);
            if let Some(request) = follow_up {
                send(&app_clone, &socket_clone, request);
            }
        }
    });

    let initial = app.lock().await.navigate(route);
    if let Some(request) = initial {
        send(&app, &socket, request);
    }

    let result = run_tui(Arc::clone(&app), socket.clone(), settings.tick_ms).await;

    recv_task.abort();
    socket.close();
    info!("client stopped");
    result
}

async fn load_packs(app: SharedApp, server: String) {
    match net::list_packs(&server).await {
        Ok(packs) => app.lock().await.set_packs(packs),
        Err(e) => {
            warn!(error = %e, "could not load packs");
            app.lock().await.set_pack_error(e.to_string());
        }
    }
}

/// Send a request in the background and feed its ack back into the app.
fn send(app: &SharedApp, socket: &SocketClient, request: ClientRequest) {
    let app = Arc::clone(app);
    let socket = socket.clone();
    tokio::spawn(async move {
        let ack = socket.request(&request).await;
        let follow_up = app.lock().await.handle_ack(&request, ack);
        if let Some(next) = follow_up {
            send(&app, &socket, next);
        }
    });
}

/// Run the client TUI.
async fn run_tui(app: SharedApp, socket: SocketClient, tick_ms: u64) -> Result<(), ClientError> {
    let mut guard = TerminalGuard::enter()?;
    let tick = Duration::from_millis(tick_ms);

    loop {
        {
            let mut app = app.lock().await;
            if app.should_quit {
                break;
            }
            app.tick();
            guard.terminal().draw(|frame| ui::render(frame, &app))?;
        }

        if event::poll(tick)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                let request = handle_input(&mut *app.lock().await, key);
                if let Some(request) = request {
                    send(&app, &socket, request);
                }
            }
        }
    }

    Ok(())
}

/// Handle one key press; returns a request to send, if any.
fn handle_input(app: &mut ClientApp, key: KeyEvent) -> Option<ClientRequest> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return None;
    }

    // The alert is modal.
    if app.alert.is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            app.dismiss_alert();
        }
        return None;
    }

    match key.code {
        KeyCode::F(1) => return app.navigate(Route::GameMaster),
        KeyCode::F(2) => return app.navigate(Route::Join),
        KeyCode::Esc => {
            app.should_quit = true;
            return None;
        }
        _ => {}
    }

    let typing = matches!(&app.screen, Screen::Join(form) if form.is_typing());
    if !typing {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                app.should_quit = true;
                return None;
            }
            KeyCode::Char('m') | KeyCode::Char('M') => {
                app.toggle_mute();
                return None;
            }
            _ => {}
        }
    }

    let in_room = matches!(&app.screen, Screen::Master(master) if master.view.room().is_some());
    match &app.screen {
        Screen::Master(_) if in_room => handle_host_input(app, key.code),
        Screen::Master(_) => handle_setup_input(app, key.code),
        Screen::Join(_) => handle_join_input(app, key.code),
        Screen::Game(_) => handle_game_input(app, key.code),
    }
}

fn handle_setup_input(app: &mut ClientApp, key: KeyCode) -> Option<ClientRequest> {
    let Screen::Master(master) = &mut app.screen else {
        return None;
    };
    let setup = &mut master.setup;

    match key {
        KeyCode::Tab | KeyCode::Down | KeyCode::Char('j') => setup.focus_next(),
        KeyCode::BackTab | KeyCode::Up | KeyCode::Char('k') => setup.focus_previous(),
        KeyCode::Left | KeyCode::Right | KeyCode::Char('-') | KeyCode::Char('+') => {
            let forward = matches!(key, KeyCode::Right | KeyCode::Char('+'));
            let step = if forward { 1 } else { -1 };
            match setup.focus {
                SetupField::Pack => {
                    setup.cycle_pack(forward);
                    setup.adjust_questions(0);
                }
                SetupField::Seconds => setup.adjust_seconds(step * 5),
                SetupField::Questions => setup.adjust_questions(step),
                SetupField::Create => {}
            }
        }
        KeyCode::Enter if setup.focus == SetupField::Create => return app.create_room(),
        KeyCode::Enter => setup.focus_next(),
        _ => {}
    }
    None
}

fn handle_host_input(app: &mut ClientApp, key: KeyCode) -> Option<ClientRequest> {
    match key {
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('s') | KeyCode::Char('n') => {
            app.host_action()
        }
        _ => None,
    }
}

fn handle_join_input(app: &mut ClientApp, key: KeyCode) -> Option<ClientRequest> {
    let Screen::Join(form) = &mut app.screen else {
        return None;
    };

    match key {
        KeyCode::Tab => form.focus_next(),
        KeyCode::BackTab => form.focus_previous(),
        KeyCode::Enter if form.code.trim().is_empty() => {
            form.focus = JoinField::Code;
            app.alert = Some("Enter a room code".to_string());
        }
        KeyCode::Enter => {
            let route = form.route();
            return app.navigate(route);
        }
        KeyCode::Backspace => form.pop_char(),
        KeyCode::Char(c) if form.is_typing() => form.push_char(c),
        KeyCode::Left if form.focus == JoinField::Avatar => form.move_avatar(-1, 0),
        KeyCode::Right if form.focus == JoinField::Avatar => form.move_avatar(1, 0),
        KeyCode::Up if form.focus == JoinField::Avatar => form.move_avatar(0, -1),
        KeyCode::Down if form.focus == JoinField::Avatar => form.move_avatar(0, 1),
        KeyCode::Down => form.focus_next(),
        KeyCode::Up => form.focus_previous(),
        _ => {}
    }
    None
}

fn handle_game_input(app: &mut ClientApp, key: KeyCode) -> Option<ClientRequest> {
    match key {
        KeyCode::Up | KeyCode::Char('k') => {
            app.move_cursor(false);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.move_cursor(true);
            None
        }
        KeyCode::Enter | KeyCode::Char(' ') => app.answer(None),
        KeyCode::Char(c @ '1'..='9') => {
            let position = c.to_digit(10).map_or(0, |d| d as usize - 1);
            app.answer(Some(position))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::state::GameScreen;
    use crate::game::room::{Role, RoomView};
    use crate::protocol::{PackInfo, Question, Room, RoomStatus, ServerEvent};

    fn app() -> ClientApp {
        ClientApp::new("http://localhost:3000".to_string(), SoundPlayer::silent())
    }

    fn press(app: &mut ClientApp, code: KeyCode) -> Option<ClientRequest> {
        handle_input(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut ClientApp, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_alert_blocks_input_until_dismissed() {
        let mut app = app();
        app.alert = Some("Choose a pack".to_string());

        assert_eq!(press(&mut app, KeyCode::F(2)), None);
        assert!(matches!(app.screen, Screen::Master(_)));
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);

        press(&mut app, KeyCode::Enter);
        assert!(app.alert.is_none());
        press(&mut app, KeyCode::F(2));
        assert!(matches!(app.screen, Screen::Join(_)));
    }

    #[test]
    fn test_join_form_typing_and_submit() {
        let mut app = app();
        press(&mut app, KeyCode::F(2));

        // 'q' and 'm' are text while a field has focus.
        type_text(&mut app, "qm1");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Mo");
        assert!(!app.should_quit);

        let request = press(&mut app, KeyCode::Enter);
        assert_eq!(
            request,
            Some(ClientRequest::JoinRoom {
                code: "QM1".to_string(),
                name: "Mo".to_string(),
                avatar: Some("😀".to_string()),
            })
        );
        assert!(matches!(app.screen, Screen::Game(_)));
    }

    #[test]
    fn test_join_requires_code() {
        let mut app = app();
        press(&mut app, KeyCode::F(2));
        assert_eq!(press(&mut app, KeyCode::Enter), None);
        assert_eq!(app.alert.as_deref(), Some("Enter a room code"));
    }

    #[test]
    fn test_setup_create_flow() {
        let mut app = app();
        app.set_packs(vec![PackInfo {
            file: "science.json".to_string(),
            title: "Science".to_string(),
            count: 4,
        }]);

        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Tab);

        assert_eq!(
            press(&mut app, KeyCode::Enter),
            Some(ClientRequest::CreateRoom {
                pack_file: "science.json".to_string(),
                duration_sec: 25,
                total_questions: 4,
            })
        );
    }

    #[test]
    fn test_host_keys_follow_room_status() {
        let mut app = app();
        app.handle_event(ServerEvent::RoomUpdate(Box::new(Room {
            code: "ROOM".to_string(),
            status: RoomStatus::Lobby,
            ..Room::default()
        })));

        assert_eq!(
            press(&mut app, KeyCode::Char('s')),
            Some(ClientRequest::StartGame {
                code: "ROOM".to_string()
            })
        );
    }

    #[test]
    fn test_number_keys_answer() {
        let mut app = app();
        app.screen = Screen::Game(GameScreen {
            code: "ROOM".to_string(),
            name: "Ana".to_string(),
            avatar: None,
            view: RoomView::with_rng(
                Role::Player {
                    code: "ROOM".to_string(),
                    name: "Ana".to_string(),
                },
                fastrand::Rng::with_seed(3),
            ),
            cursor: 0,
        });
        app.handle_event(ServerEvent::QuestionNew(Question {
            front: "Pick".to_string(),
            choices: vec!["a".to_string(), "b".to_string()],
        }));

        assert_eq!(press(&mut app, KeyCode::Char('9')), None);
        assert!(matches!(
            press(&mut app, KeyCode::Char('2')),
            Some(ClientRequest::Answer { .. })
        ));
        assert_eq!(press(&mut app, KeyCode::Enter), None);
    }

    #[test]
    fn test_mute_and_quit_keys() {
        let mut app = app();
        assert!(app.sound.is_muted());
        press(&mut app, KeyCode::Char('m'));
        assert!(!app.sound.is_muted());
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
