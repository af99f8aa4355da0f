//! Periodic Quiz entry point
//!
//! wasm32: the browser game. Native: the JSON config server.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlInputElement};

    use periodic_quiz::Game;
    use periodic_quiz::catalog::Language;
    use periodic_quiz::consts::MARK_RELEASE_MS;
    use periodic_quiz::layout::{self, Cell, FAMILY_LABELS, TableSize};
    use periodic_quiz::loader::{self, DataEndpoint};
    use periodic_quiz::persistence::PersistenceBridge;
    use periodic_quiz::platform::web::{BodyTheme, BrowserNavigation, LocalStorage};
    use periodic_quiz::round::{MarkKind, RoundEvent, RoundPhase};
    use periodic_quiz::settings::{
        ArcadeField, Difficulty, Gamemode, HintField, SettingEdit, TableField, ToggleField,
        format_arcade_value, parse_arcade_input,
    };

    type WebGame = Game<LocalStorage, BrowserNavigation, BodyTheme>;

    /// Page state: the game (once data is loaded) and the round clock
    struct App {
        game: Option<WebGame>,
        /// Handle of the installed one-second interval
        interval: Option<i32>,
        on_tick: Option<Closure<dyn FnMut()>>,
    }

    /// Button actions, encoded in `data-action`
    enum Action {
        Difficulty(Difficulty),
        Gamemode(Gamemode),
        Language(Language),
        Toggle(ToggleField),
        DarkMode,
        Restart,
        Pause,
        Start,
    }

    fn parse_action(raw: &str) -> Option<Action> {
        let (kind, value) = raw.split_once(':').unwrap_or((raw, ""));
        match kind {
            "difficulty" => Difficulty::from_str(value).map(Action::Difficulty),
            "gamemode" => Gamemode::from_str(value).map(Action::Gamemode),
            "language" => Language::from_str(value).map(Action::Language),
            "error-protection" => Some(Action::Toggle(ToggleField::ErrorProtection)),
            "answer-persist" => Some(Action::Toggle(ToggleField::AnswerPersist)),
            "table" => TableField::ALL
                .into_iter()
                .find(|f| f.label().eq_ignore_ascii_case(value))
                .map(|f| Action::Toggle(ToggleField::Table(f))),
            "hint" => HintField::ALL
                .into_iter()
                .find(|f| f.label().eq_ignore_ascii_case(value))
                .map(|f| Action::Toggle(ToggleField::Hint(f))),
            "dark" => Some(Action::DarkMode),
            "restart" => Some(Action::Restart),
            "pause" => Some(Action::Pause),
            "start" => Some(Action::Start),
            _ => None,
        }
    }

    fn arcade_key(field: ArcadeField) -> &'static str {
        match field {
            ArcadeField::TotalTime => "total",
            ArcadeField::BonusTime => "bonus",
            ArcadeField::PenaltyTime => "penalty",
        }
    }

    fn document() -> Document {
        web_sys::window()
            .and_then(|w| w.document())
            .expect("no document")
    }

    fn alert(message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }

    // === Rendering ===

    fn button(action: &str, label: &str, selected: bool) -> String {
        format!(
            r#"<button type="button" data-action="{}" class="{}">{}</button>"#,
            action,
            if selected { "option selected" } else { "option" },
            label
        )
    }

    fn render_controls(doc: &Document, game: &WebGame) {
        let Some(root) = doc.get_element_by_id("controls") else {
            return;
        };
        let prefs = game.preferences();
        let config = game.config();
        let mut html = String::new();

        html.push_str("<section><h2>Page Settings</h2>");
        html.push_str(&button(
            "dark",
            if prefs.dark_mode { "Dark mode: on" } else { "Dark mode: off" },
            prefs.dark_mode,
        ));
        html.push_str(&format!(
            r#"<label>Table Size <input data-input="table-size" inputmode="numeric" value="{}"></label></section>"#,
            prefs.table_size.step()
        ));

        html.push_str("<section><h2>Language</h2>");
        for language in Language::ALL {
            let action = format!("language:{}", language.as_str());
            html.push_str(&button(&action, language.label(), language == prefs.language));
        }
        html.push_str("</section><section><h2>Gamemode</h2>");
        for mode in Gamemode::ALL {
            let action = format!("gamemode:{}", mode.as_str());
            html.push_str(&button(&action, mode.label(), mode == game.gamemode()));
        }
        html.push_str("</section><section><h2>Difficulty</h2>");
        for difficulty in Difficulty::ALL {
            let action = format!("difficulty:{}", difficulty.as_str());
            html.push_str(&button(&action, difficulty.label(), difficulty == game.difficulty()));
        }
        html.push_str("</section>");

        if game.gamemode() == Gamemode::Arcade {
            html.push_str("<section><h2>Arcade Settings</h2>");
            for field in ArcadeField::ALL {
                html.push_str(&format!(
                    r#"<label>{} <input data-input="arcade:{}" inputmode="numeric" value="{}"></label>"#,
                    field.label(),
                    arcade_key(field),
                    format_arcade_value(config.arcade_value(field))
                ));
            }
            html.push_str("</section>");
        }

        html.push_str("<section><h2>General</h2>");
        html.push_str(&button("answer-persist", "Answer persist", config.answer_persist));
        html.push_str(&button("error-protection", "Error protection", config.error_protection));
        html.push_str("</section><section><h2>Table</h2>");
        for field in TableField::ALL {
            let action = format!("table:{}", field.label().to_lowercase());
            html.push_str(&button(&action, field.label(), config.toggle(ToggleField::Table(field))));
        }
        html.push_str("</section><section><h2>Hints</h2>");
        for field in HintField::ALL {
            let action = format!("hint:{}", field.label().to_lowercase());
            html.push_str(&button(&action, field.label(), config.hints.get(field)));
        }
        html.push_str("</section>");

        root.set_inner_html(&html);
    }

    fn render_hud(doc: &Document, game: &WebGame) {
        let Some(root) = doc.get_element_by_id("hud") else {
            return;
        };
        let round = game.round();
        if matches!(round.phase, RoundPhase::Idle | RoundPhase::Ended) {
            root.set_inner_html(&button("start", "Start", false));
            return;
        }
        let status = game.status();
        let pause_label = if round.phase == RoundPhase::Paused { "Resume" } else { "Pause" };
        root.set_inner_html(&format!(
            "{}{}<dl><dt>Attempts</dt><dd>{}</dd><dt>Score</dt><dd>{} / {}</dd>\
             <dt>Time</dt><dd id=\"hud-time\">{}</dd><dt>Errors</dt><dd>{}</dd></dl>",
            button("restart", "Restart", false),
            button("pause", pause_label, round.phase == RoundPhase::Paused),
            status.attempts,
            status.found,
            status.total,
            status.time,
            status.errors,
        ));
    }

    /// Clock text only, so a tick never replaces nodes under the cursor
    fn render_clock(doc: &Document, game: &WebGame) {
        if let Some(time) = doc.get_element_by_id("hud-time") {
            time.set_text_content(Some(&game.status().time));
        }
    }

    fn render_hints(doc: &Document, game: &WebGame) -> Result<(), JsValue> {
        let Some(root) = doc.get_element_by_id("hints") else {
            return Ok(());
        };
        root.set_inner_html("");
        let hints = game.hints();
        if hints.is_empty() || game.round().phase == RoundPhase::Ended {
            return Ok(());
        }
        let title = doc.create_element("h2")?;
        title.set_text_content(Some("Hints"));
        root.append_child(&title)?;
        let list = doc.create_element("dl")?;
        for hint in hints {
            let dt = doc.create_element("dt")?;
            dt.set_text_content(Some(hint.label));
            let dd = doc.create_element("dd")?;
            dd.set_text_content(Some(&hint.value));
            list.append_child(&dt)?;
            list.append_child(&dd)?;
        }
        root.append_child(&list)?;
        Ok(())
    }

    /// Build the table; without a game only atomic numbers are shown
    fn render_table(doc: &Document, game: Option<&WebGame>) -> Result<(), JsValue> {
        let Some(root) = doc.get_element_by_id("table") else {
            return Ok(());
        };
        root.set_inner_html("");

        let size = game
            .map(|g| g.preferences().table_size)
            .unwrap_or_default()
            .cell_px();
        let table = doc.create_element("table")?;
        let head = doc.create_element("tr")?;
        for label in FAMILY_LABELS {
            let th = doc.create_element("th")?;
            th.set_text_content(Some(label));
            head.append_child(&th)?;
        }
        table.append_child(&head)?;

        for row in layout::grid() {
            let tr = doc.create_element("tr")?;
            for cell in row {
                let td = doc.create_element("td")?;
                td.set_attribute("style", &format!("width:{}px;height:{}px", size, size))?;
                match cell {
                    Cell::Gap => {}
                    Cell::Series(label) => {
                        td.set_class_name("series");
                        td.set_text_content(Some(label));
                    }
                    Cell::Element(index) => fill_element_cell(doc, &td, index, game)?,
                }
                tr.append_child(&td)?;
            }
            table.append_child(&tr)?;
        }
        root.append_child(&table)?;
        Ok(())
    }

    fn fill_element_cell(
        doc: &Document,
        td: &Element,
        index: usize,
        game: Option<&WebGame>,
    ) -> Result<(), JsValue> {
        let protons = index as u32 + 1;
        let Some(game) = game else {
            td.set_class_name("element");
            td.set_text_content(Some(&protons.to_string()));
            return Ok(());
        };
        let Some(element) = game.catalog().get(index) else {
            return Ok(());
        };
        let config = game.config();

        td.set_class_name(&cell_classes(game, index));
        td.set_attribute("data-protons", &protons.to_string())?;

        let parts = [
            (config.table.protons, "protons", protons.to_string()),
            (config.table.symbol, "symbol", element.symbol.clone()),
            (
                config.table.name,
                "name",
                element.name(game.preferences().language).to_string(),
            ),
        ];
        for (on, class, text) in parts {
            if on {
                let span = doc.create_element("span")?;
                span.set_class_name(class);
                span.set_text_content(Some(&text));
                td.append_child(&span)?;
            }
        }
        Ok(())
    }

    fn cell_classes(game: &WebGame, index: usize) -> String {
        let mut classes = vec!["element"];
        if game.config().show_group_colors {
            if let Some(element) = game.catalog().get(index) {
                classes.push(element.kind.color_class());
            }
        }
        match game.round().mark(index).map(|m| m.kind) {
            Some(MarkKind::Correct) => classes.push("bg-correct"),
            Some(MarkKind::Wrong) => classes.push("bg-wrong"),
            None => {}
        }
        classes.join(" ")
    }

    /// Update one cell's classes in place
    fn refresh_cell(doc: &Document, game: &WebGame, index: usize) {
        let selector = format!("[data-protons=\"{}\"]", index + 1);
        if let Ok(Some(td)) = doc.query_selector(&selector) {
            td.set_class_name(&cell_classes(game, index));
        }
    }

    /// Counters, hints and table, after anything that changed the round
    fn render_round(app: &App) {
        let doc = document();
        let result = match &app.game {
            Some(game) => {
                render_hud(&doc, game);
                render_hints(&doc, game).and_then(|_| render_table(&doc, Some(game)))
            }
            None => render_table(&doc, None),
        };
        if let Err(e) = result {
            log::error!("Render failed: {:?}", e);
        }
    }

    /// Controls change only on player input
    fn render_all(app: &App) {
        if let Some(game) = &app.game {
            render_controls(&document(), game);
        }
        render_round(app);
    }

    // === Timer ===

    /// Install the one-second interval while the round runs, drop it otherwise
    fn sync_timer(app_rc: &Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let mut guard = app_rc.borrow_mut();
        let app = &mut *guard;
        let active = app.game.as_ref().is_some_and(|g| g.round().timer_active());

        match (active, app.interval) {
            (true, None) => {
                let Some(on_tick) = app.on_tick.as_ref() else {
                    return;
                };
                match window.set_interval_with_callback_and_timeout_and_arguments_0(
                    on_tick.as_ref().unchecked_ref(),
                    1000,
                ) {
                    Ok(id) => app.interval = Some(id),
                    Err(e) => log::error!("Failed to start timer: {:?}", e),
                }
            }
            (false, Some(id)) => {
                window.clear_interval_with_handle(id);
                app.interval = None;
            }
            _ => {}
        }
    }

    fn tick_callback(app_rc: &Rc<RefCell<App>>) -> Closure<dyn FnMut()> {
        let app = app_rc.clone();
        Closure::<dyn FnMut()>::new(move || {
            let event = app.borrow_mut().game.as_mut().and_then(|g| g.tick());
            if event.is_some() {
                after_event(&app, event);
            } else if let Some(game) = app.borrow().game.as_ref() {
                render_clock(&document(), game);
            }
        })
    }

    /// Re-render, fix up the timer and react to a round event
    fn after_event(app_rc: &Rc<RefCell<App>>, event: Option<RoundEvent>) {
        render_round(&app_rc.borrow());
        sync_timer(app_rc);

        match event {
            Some(RoundEvent::Won) => alert("You found every element!"),
            Some(RoundEvent::TimedOut) => alert("Time out!"),
            Some(RoundEvent::Correct { index } | RoundEvent::Wrong { index }) => {
                schedule_release(app_rc, index)
            }
            None => {}
        }
    }

    /// Release a transient mark after it has flashed
    fn schedule_release(app_rc: &Rc<RefCell<App>>, index: usize) {
        let mark = app_rc
            .borrow()
            .game
            .as_ref()
            .and_then(|g| g.round().mark(index));
        let Some(serial) = mark.filter(|m| !m.sticky).map(|m| m.serial) else {
            return;
        };
        let Some(window) = web_sys::window() else {
            return;
        };
        let app_for_release = app_rc.clone();
        let closure = Closure::once_into_js(move || {
            if let Some(game) = app_for_release.borrow_mut().game.as_mut() {
                game.release_mark(index, serial);
            }
            if let Some(game) = app_for_release.borrow().game.as_ref() {
                refresh_cell(&document(), game, index);
            }
        });
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.unchecked_ref(),
            MARK_RELEASE_MS,
        );
    }

    // === Input ===

    fn handle_action(app_rc: &Rc<RefCell<App>>, action: Action) {
        {
            let mut app = app_rc.borrow_mut();
            let Some(game) = app.game.as_mut() else {
                return;
            };
            match action {
                Action::Difficulty(d) => game.select_difficulty(d),
                Action::Gamemode(m) => game.select_gamemode(m),
                Action::Language(l) => game.select_language(l),
                Action::Toggle(field) => {
                    let on = !game.config().toggle(field);
                    game.edit(SettingEdit::Toggle(field, on));
                }
                Action::DarkMode => game.toggle_dark_mode(),
                Action::Restart => game.restart(),
                Action::Pause => game.toggle_pause(),
                Action::Start => game.start(),
            }
        }
        render_all(&app_rc.borrow());
        after_event(app_rc, None);
    }

    fn handle_input(app_rc: &Rc<RefCell<App>>, key: &str, value: &str) {
        {
            let mut app = app_rc.borrow_mut();
            let Some(game) = app.game.as_mut() else {
                return;
            };
            if key == "table-size" {
                if let Some(size) = TableSize::from_input(value) {
                    game.set_table_size(size);
                }
            } else if let Some(field) = key
                .strip_prefix("arcade:")
                .and_then(|k| ArcadeField::ALL.into_iter().find(|f| arcade_key(*f) == k))
            {
                match parse_arcade_input(value) {
                    Some(v) => game.edit(SettingEdit::Arcade(field, v)),
                    None => log::warn!("Ignoring arcade value {:?}", value),
                }
            }
        }
        render_all(&app_rc.borrow());
        after_event(app_rc, None);
    }

    fn setup_listeners(root: &Element, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        // Clicks: table cells and every button share one listener
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::MouseEvent| {
                let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                    return;
                };
                if let Ok(Some(cell)) = target.closest("[data-protons]") {
                    let protons = cell
                        .get_attribute("data-protons")
                        .and_then(|p| p.parse::<u32>().ok());
                    if let Some(protons) = protons {
                        let outcome = app.borrow_mut().game.as_mut().and_then(|g| g.click(protons));
                        after_event(&app, outcome);
                    }
                    return;
                }
                if let Ok(Some(button)) = target.closest("[data-action]") {
                    if let Some(action) = button.get_attribute("data-action").as_deref().and_then(parse_action) {
                        handle_action(&app, action);
                    }
                }
            });
            root.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Text inputs commit on change
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                let Some(input) = event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                else {
                    return;
                };
                if let Some(key) = input.get_attribute("data-input") {
                    handle_input(&app, &key, &input.value());
                }
            });
            root.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Periodic Quiz starting...");

        let doc = document();
        let root = match doc.get_element_by_id("app") {
            Some(root) => root,
            None => {
                log::error!("No #app element");
                return;
            }
        };
        root.set_inner_html(
            r#"<aside id="controls"></aside><main><section id="hud"></section><section id="hints"></section><div id="table"></div></main>"#,
        );

        let app = Rc::new(RefCell::new(App {
            game: None,
            interval: None,
            on_tick: None,
        }));
        let on_tick = tick_callback(&app);
        app.borrow_mut().on_tick = Some(on_tick);
        render_all(&app.borrow());
        if let Err(e) = setup_listeners(&root, app.clone()) {
            log::error!("Failed to attach listeners: {:?}", e);
        }

        let mut bridge = PersistenceBridge::new(LocalStorage::open(), BrowserNavigation);
        let Some(data) = loader::load_with(&mut bridge, &DataEndpoint::default(), loader::fetch_text).await
        else {
            // Placeholder table stays up
            return;
        };

        let seed = js_sys::Date::now() as u64;
        app.borrow_mut().game = Some(Game::with_seed(data, bridge, BodyTheme, seed));
        log::info!("Game initialized with seed: {}", seed);
        render_all(&app.borrow());
        after_event(&app, None);
        log::info!("Periodic Quiz running!");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    web_app::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() {
    env_logger::init();
    log::info!("Periodic Quiz config server starting...");

    let config = periodic_quiz::server::ServerConfig::from_env();
    if let Err(e) = periodic_quiz::server::run(config).await {
        log::error!("Server stopped: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
