//! Fun Levels entry point
//!
//! Detects which page it was loaded on, wires DOM events to the engine and
//! runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{DragEvent, Element, Event, KeyboardEvent};

    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use fun_levels::Settings;
    use fun_levels::consts::{GAME_PAGE, HOME_PAGE};
    use fun_levels::effects::{EffectLayer, TransitionCue, UnlockTransition};
    use fun_levels::games::ActiveGame;
    use fun_levels::levels::{EngineEvent, LevelEngine};
    use fun_levels::persistence::{self, LocalStore};
    use fun_levels::platform::{self, ErrorReporter};
    use fun_levels::unlock::{UnlockEvent, UnlockGate};
    use fun_levels::view::{self, Action, Hud};

    const EFFECTS_ID: &str = "fun-effects";
    const DEBUG_PANEL_ID: &str = "fun-debug-panel";

    /// Converts rAF timestamps into whole-millisecond steps
    #[derive(Default)]
    struct FrameClock {
        last_time: f64,
        carry_ms: f64,
    }

    impl FrameClock {
        fn step(&mut self, time: f64) -> u32 {
            let dt = if self.last_time > 0.0 {
                (time - self.last_time).max(0.0) + self.carry_ms
            } else {
                0.0
            };
            self.last_time = time;
            let whole = dt.floor();
            self.carry_ms = dt - whole;
            whole.min(u32::MAX as f64) as u32
        }
    }

    fn event_element(event: &Event) -> Option<Element> {
        event.target()?.dyn_into::<Element>().ok()
    }

    fn closest(el: &Element, selector: &str) -> Option<Element> {
        el.closest(selector).ok().flatten()
    }

    /// Fixed overlay the confetti and emoji are drawn into
    fn effects_overlay() -> Option<Element> {
        if let Some(el) = platform::try_element(EFFECTS_ID) {
            return Some(el);
        }
        let document = platform::document()?;
        let el = document.create_element("div").ok()?;
        el.set_id(EFFECTS_ID);
        platform::set_style(&el, "position", "fixed");
        platform::set_style(&el, "inset", "0");
        platform::set_style(&el, "pointer-events", "none");
        platform::set_style(&el, "overflow", "hidden");
        platform::set_style(&el, "z-index", "9999");
        document.body()?.append_child(&el).ok()?;
        Some(el)
    }

    fn load_settings() -> Settings {
        match LocalStore::open() {
            Ok(mut store) => Settings::load_or_init(&mut store),
            Err(e) => {
                log::warn!("{}, using default settings", e);
                Settings::default()
            }
        }
    }

    /// State behind the level containers on the game page
    struct GamePage {
        engine: LevelEngine,
        effects: EffectLayer,
        fx_rng: Pcg32,
        clock: FrameClock,
        shown_generation: Option<u64>,
        shown_live: String,
        last_hud: Option<Hud>,
        overlay_dirty: bool,
        errors: ErrorReporter,
    }

    impl GamePage {
        fn new(settings: &Settings, seed: u64) -> Self {
            let reduced = !settings.effects_enabled() || platform::prefers_reduced_motion();
            Self {
                engine: LevelEngine::standard(settings, seed),
                effects: EffectLayer::new(reduced),
                fx_rng: Pcg32::seed_from_u64(seed ^ 0x5eed),
                clock: FrameClock::default(),
                shown_generation: None,
                shown_live: String::new(),
                last_hud: None,
                overlay_dirty: false,
                errors: ErrorReporter::new(settings.debug_tools),
            }
        }

        fn frame(&mut self, time: f64) {
            let dt = self.clock.step(time);
            let events = self.engine.advance(dt);
            self.handle_events(events);
            self.collect_celebration();
            self.effects.advance(dt);
            self.render();
        }

        fn handle_events(&mut self, events: Vec<EngineEvent>) {
            for event in events {
                match event {
                    EngineEvent::LevelShown(level) => log::info!("Showing level {}", level),
                    EngineEvent::TimeUp => log::info!("Countdown finished"),
                    EngineEvent::BonusAdded { seconds, remaining } => {
                        log::debug!("+{}s, {}s left", seconds, remaining)
                    }
                    EngineEvent::GameReset(level) => log::debug!("Level {} restarted", level),
                    EngineEvent::InitFailed { level, message } => {
                        platform::show_error(
                            self.errors,
                            &format!("Level {} failed to start: {}", level, message),
                        )
                    }
                }
            }
        }

        /// Pull scheduled bursts and emoji rain out of the final level
        fn collect_celebration(&mut self) {
            let Some((bursts, rain)) = self.engine.interact(|game, _| match game {
                ActiveGame::Celebration(c) => Some((c.drain_bursts(), c.take_emoji_rain())),
                _ => None,
            })
            .flatten() else {
                return;
            };
            for burst in &bursts {
                self.effects.burst(burst, &mut self.fx_rng);
            }
            if let Some(rain) = rain {
                self.effects.add_emoji(rain);
            }
        }

        /// True when the current game took the action
        fn apply(&mut self, action: Action) -> bool {
            let confetti = action == Action::ConfettiClick;
            let applied = action.apply(&mut self.engine);
            if applied && confetti {
                self.effects.shower(&mut self.fx_rng);
            }
            let events = self.engine.drain_events();
            self.handle_events(events);
            applied
        }

        fn complete_from_marker(&mut self, next: &str) {
            if let Err(e) = self.engine.complete_level_attr(next) {
                log::warn!("{}", e);
            }
            let events = self.engine.drain_events();
            self.handle_events(events);
        }

        fn debug_skip(&mut self, raw: &str) {
            let result = raw
                .trim()
                .parse::<i64>()
                .map_err(|_| format!("Not a level number: {:?}", raw))
                .and_then(|level| self.engine.debug_skip(level).map_err(|e| e.to_string()));
            if let Err(message) = result {
                platform::show_error(self.errors, &message);
            }
            let events = self.engine.drain_events();
            self.handle_events(events);
        }

        fn render(&mut self) {
            for (id, visible) in self.engine.container_visibility() {
                if let Some(el) = platform::try_element(&id) {
                    platform::set_display(&el, visible);
                }
            }

            let hud = view::hud(&self.engine);
            if self.last_hud.as_ref() != Some(&hud) {
                platform::set_text("fun-timer", &hud.timer);
                if let Some((label, percent)) = &hud.progress {
                    platform::set_text("fun-level-label", label);
                    if let Some(bar) = platform::element_by_id("fun-progress-bar") {
                        platform::set_style(&bar, "width", &format!("{}%", percent));
                    }
                }
                self.last_hud = Some(hud);
            }

            self.render_game();

            if !self.effects.is_idle() || self.overlay_dirty {
                if let Some(overlay) = effects_overlay() {
                    platform::set_html(&overlay, &view::effects_html(&self.effects));
                }
                self.overlay_dirty = !self.effects.is_idle();
            }
        }

        fn render_game(&mut self) {
            let Some(game) = self.engine.current_game() else {
                return;
            };
            let Some(root) = platform::element_by_id(game.kind().root_id()) else {
                return;
            };
            let generation = self.engine.generation();
            if self.shown_generation != Some(generation) {
                platform::set_html(&root, &view::games::shell(game));
                self.shown_generation = Some(generation);
                self.shown_live.clear();
            }
            let live = view::games::live(game);
            if live != self.shown_live {
                if let Ok(Some(slot)) = root.query_selector("[data-live]") {
                    platform::set_html(&slot, &live);
                }
                self.shown_live = live;
            }
        }

        /// Text in the current level's field, for submit buttons
        fn level_text(&self) -> Option<String> {
            let root_id = self.engine.current_game()?.kind().root_id();
            let document = platform::document()?;
            let field = document
                .query_selector(&format!("#{} [data-input]", root_id))
                .ok()??;
            platform::input_value(&field)
        }
    }

    /// State behind the home page gates
    struct HomePage {
        gate: UnlockGate,
        transition: Option<UnlockTransition>,
        effects: EffectLayer,
        fx_rng: Pcg32,
        clock: FrameClock,
        reduced_motion: bool,
        shown_quiz: String,
        overlay_dirty: bool,
        errors: ErrorReporter,
    }

    impl HomePage {
        fn new(settings: &Settings, seed: u64) -> Self {
            let reduced_motion = !settings.effects_enabled() || platform::prefers_reduced_motion();
            Self {
                gate: UnlockGate::new(),
                transition: None,
                effects: EffectLayer::new(reduced_motion),
                fx_rng: Pcg32::seed_from_u64(seed),
                clock: FrameClock::default(),
                reduced_motion,
                shown_quiz: String::new(),
                overlay_dirty: false,
                errors: ErrorReporter::new(settings.debug_tools),
            }
        }

        fn handle(&mut self, events: Vec<UnlockEvent>) {
            for event in events {
                match event {
                    UnlockEvent::Reveal(source) => {
                        log::info!("Revealing hidden section ({:?})", source);
                        let mut transition = UnlockTransition::new(self.reduced_motion);
                        let cues = transition.advance(0);
                        self.transition = Some(transition);
                        self.play(cues);
                    }
                    UnlockEvent::Redirect { .. } => {
                        self.enter_game();
                    }
                    UnlockEvent::QuizOpened => {
                        if let Some(el) = platform::element_by_id("unlock-quiz") {
                            platform::set_display(&el, true);
                        }
                    }
                }
            }
        }

        /// Write the unlock flag and navigate. False while every gate is
        /// still closed.
        fn enter_game(&self) -> bool {
            let result = LocalStore::open().and_then(|mut store| self.gate.enter_game(&mut store));
            match result {
                Ok(Some(page)) => {
                    platform::navigate(page);
                    true
                }
                Ok(None) => false,
                Err(e) => {
                    platform::show_error(self.errors, &format!("Could not unlock the game page: {}", e));
                    false
                }
            }
        }

        fn play(&mut self, cues: Vec<TransitionCue>) {
            for cue in cues {
                match cue {
                    TransitionCue::Confetti => self.effects.shower(&mut self.fx_rng),
                    TransitionCue::CurtainClose | TransitionCue::CurtainOpen => {
                        if let Some(el) = platform::try_element("unlock-curtain") {
                            platform::set_class(&el, "active", cue == TransitionCue::CurtainClose);
                        }
                    }
                    TransitionCue::Reveal => {
                        if let Some(el) = platform::element_by_id("fun-section") {
                            platform::set_display(&el, true);
                            platform::set_class(&el, "revealed", true);
                        }
                        if let Some(el) = platform::try_element("unlock-quiz") {
                            platform::set_display(&el, false);
                        }
                    }
                    TransitionCue::ToastShow | TransitionCue::ToastHide => {
                        if let Some(el) = platform::try_element("unlock-toast") {
                            platform::set_class(&el, "show", cue == TransitionCue::ToastShow);
                        }
                    }
                    TransitionCue::Done => log::debug!("Unlock transition finished"),
                }
            }
        }

        fn frame(&mut self, time: f64) {
            let dt = self.clock.step(time);
            if let Some(event) = self.gate.advance(dt) {
                self.handle(vec![event]);
            }
            if let Some(transition) = self.transition.as_mut() {
                let cues = transition.advance(dt);
                if transition.is_done() {
                    self.transition = None;
                }
                self.play(cues);
            }
            self.effects.advance(dt);
            self.render();
        }

        fn render(&mut self) {
            let quiz = self.gate.quiz().map(view::games::quiz).unwrap_or_default();
            if quiz != self.shown_quiz {
                if let Some(el) = platform::try_element("unlock-quiz") {
                    platform::set_html(&el, &quiz);
                }
                self.shown_quiz = quiz;
            }
            if !self.effects.is_idle() || self.overlay_dirty {
                if let Some(overlay) = effects_overlay() {
                    platform::set_html(&overlay, &view::effects_html(&self.effects));
                }
                self.overlay_dirty = !self.effects.is_idle();
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Fun Levels starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let settings = load_settings();
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);

        if document.get_element_by_id("fun-level1").is_some() {
            start_game_page(&settings, seed);
        } else if document.get_element_by_id("fun-trigger").is_some()
            || document.get_element_by_id("fun-section").is_some()
        {
            start_home_page(&settings, seed);
        } else {
            log::info!("No fun elements on this page");
        }
    }

    fn start_game_page(settings: &Settings, seed: u64) {
        let granted = LocalStore::open().and_then(|mut store| persistence::consume_access(&mut store));
        match granted {
            Ok(true) => {}
            Ok(false) => {
                log::info!("No unlock flag, back to {}", HOME_PAGE);
                platform::navigate(HOME_PAGE);
                return;
            }
            Err(e) => {
                log::error!("Unlock flag unreadable: {}", e);
                platform::navigate(HOME_PAGE);
                return;
            }
        }

        let page = Rc::new(RefCell::new(GamePage::new(settings, seed)));
        {
            let mut p = page.borrow_mut();
            let events = p.engine.drain_events();
            p.handle_events(events);
            if let Err(e) = p.engine.begin() {
                platform::show_error(p.errors, &e.to_string());
            }
            let events = p.engine.drain_events();
            p.handle_events(events);
        }
        log::info!("Game page initialized with seed: {}", seed);

        setup_game_clicks(page.clone());
        setup_game_keys(page.clone());
        setup_game_inputs(page.clone());
        setup_drag_and_drop(page.clone());
        if settings.debug_tools {
            setup_debug_panel(page.clone());
        }

        game_frame(page);
    }

    fn game_frame(page: Rc<RefCell<GamePage>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            page.borrow_mut().frame(time);
            game_frame(page);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_game_clicks(page: Rc<RefCell<GamePage>>) {
        let Some(document) = platform::document() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::MouseEvent| {
            let Some(target) = event_element(&event) else {
                return;
            };
            let mut p = page.borrow_mut();

            if let Some(marker) = closest(&target, ".complete-level-btn") {
                let next = marker.get_attribute("data-next").unwrap_or_default();
                p.complete_from_marker(&next);
                return;
            }
            if closest(&target, "#confetti-btn").is_some() {
                p.apply(Action::ConfettiClick);
                return;
            }
            let Some(el) = closest(&target, "[data-action]") else {
                return;
            };
            let Some(name) = el.get_attribute("data-action") else {
                return;
            };
            let idx = el.get_attribute("data-idx");
            let text = p.level_text();
            if let Some(action) = Action::parse(&name, idx.as_deref(), text.as_deref()) {
                p.apply(action);
            }
        });
        let _ = document.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_game_keys(page: Rc<RefCell<GamePage>>) {
        let Some(document) = platform::document() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let focused = platform::focused_input();
            let input = focused.as_ref().map(|(kind, value)| (kind.as_str(), value.as_str()));
            let ctrl = event.ctrl_key() || event.meta_key();
            let Some(action) = Action::from_key(&event.key(), ctrl, input) else {
                return;
            };
            // Space and arrows keep scrolling the page unless a game used them
            if page.borrow_mut().apply(action) {
                event.prevent_default();
            }
        });
        let _ = document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_game_inputs(page: Rc<RefCell<GamePage>>) {
        let Some(document) = platform::document() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: Event| {
            let Some(target) = event_element(&event) else {
                return;
            };
            let Some(kind) = target.get_attribute("data-input") else {
                return;
            };
            let value = platform::input_value(&target).unwrap_or_default();
            if let Some(action) = Action::from_input(&kind, &value) {
                page.borrow_mut().apply(action);
            }
        });
        let _ = document.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_drag_and_drop(page: Rc<RefCell<GamePage>>) {
        let Some(document) = platform::document() else {
            return;
        };

        // Drag start selects the card
        {
            let page = page.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: DragEvent| {
                let Some(card) = event_element(&event).and_then(|t| closest(&t, "[data-action=\"drag-select\"]")) else {
                    return;
                };
                let idx = card.get_attribute("data-idx").unwrap_or_default();
                if let Some(transfer) = event.data_transfer() {
                    let _ = transfer.set_data("text/plain", &idx);
                }
                if let Some(action) = Action::parse("drag-select", Some(&idx), None) {
                    page.borrow_mut().apply(action);
                }
            });
            let _ = document.add_event_listener_with_callback("dragstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Allow dropping on the target
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: DragEvent| {
                if event_element(&event).and_then(|t| closest(&t, "[data-drop]")).is_some() {
                    event.prevent_default();
                }
            });
            let _ = document.add_event_listener_with_callback("dragover", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: DragEvent| {
                if event_element(&event).and_then(|t| closest(&t, "[data-drop]")).is_none() {
                    return;
                }
                event.prevent_default();
                page.borrow_mut().apply(Action::Drop);
            });
            let _ = document.add_event_listener_with_callback("drop", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_debug_panel(page: Rc<RefCell<GamePage>>) {
        let Some(document) = platform::document() else {
            return;
        };
        let Ok(panel) = document.create_element("div") else {
            return;
        };
        panel.set_id(DEBUG_PANEL_ID);
        platform::set_style(&panel, "position", "fixed");
        platform::set_style(&panel, "top", "8px");
        platform::set_style(&panel, "right", "8px");
        platform::set_style(&panel, "z-index", "10000");
        platform::set_style(&panel, "background", "rgba(0,0,0,0.75)");
        platform::set_style(&panel, "color", "#fff");
        platform::set_style(&panel, "padding", "6px 10px");
        let total = page.borrow().engine.registry().len();
        platform::set_html(&panel, &view::debug_panel_html(total));
        let Some(body) = document.body() else {
            return;
        };
        if body.append_child(&panel).is_err() {
            return;
        }

        if let Some(btn) = document.get_element_by_id("dbg-skip-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let raw = platform::element_by_id("dbg-lvl-skip")
                    .and_then(|el| platform::input_value(&el))
                    .unwrap_or_default();
                page.borrow_mut().debug_skip(&raw);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        log::info!("Debug panel enabled");
    }

    fn start_home_page(settings: &Settings, seed: u64) {
        if let Some(section) = platform::try_element("fun-section") {
            platform::set_display(&section, false);
        }
        let page = Rc::new(RefCell::new(HomePage::new(settings, seed)));

        // Keys anywhere on the page
        {
            let page = page.clone();
            let document = platform::document();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let typing = platform::typing_in_field();
                let mut p = page.borrow_mut();
                let events = p.gate.handle_key(&event.key(), typing);
                p.handle(events);
            });
            if let Some(document) = document {
                let _ = document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            }
            closure.forget();
        }

        // Links and buttons into the game page inside the revealed section
        if let Some(section) = platform::try_element("fun-section") {
            let page = page.clone();
            let selector = format!("a[href$=\"{}\"], [data-fun-enter]", GAME_PAGE);
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::MouseEvent| {
                if event_element(&event).and_then(|t| closest(&t, &selector)).is_none() {
                    return;
                }
                if page.borrow().enter_game() {
                    event.prevent_default();
                }
            });
            let _ = section.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Trigger clicks
        if let Some(trigger) = platform::try_element("fun-trigger") {
            let page = page.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let now = platform::now_ms() as u64;
                let mut p = page.borrow_mut();
                if let Some(event) = p.gate.handle_click(now) {
                    p.handle(vec![event]);
                }
            });
            let _ = trigger.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Fallback quiz answers
        if let Some(quiz) = platform::try_element("unlock-quiz") {
            let page = page.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::MouseEvent| {
                let Some(option) = event_element(&event)
                    .and_then(|t| closest(&t, "[data-action=\"quiz-answer\"]"))
                    .and_then(|el| el.get_attribute("data-idx"))
                    .and_then(|idx| idx.parse::<usize>().ok())
                else {
                    return;
                };
                page.borrow_mut().gate.answer_quiz(option);
            });
            let _ = quiz.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        log::info!("Home page gates armed");
        home_frame(page);
    }

    fn home_frame(page: Rc<RefCell<HomePage>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            page.borrow_mut().frame(time);
            home_frame(page);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Fun Levels (native) starting...");
    log::info!("The browser build needs `trunk serve`; running a headless walkthrough");

    println!("\nRunning headless walkthrough...");
    headless_walkthrough();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn headless_walkthrough() {
    use fun_levels::view::{Action, hud};
    use fun_levels::{LevelEngine, Settings};

    let mut engine = LevelEngine::standard(&Settings::default(), 42);
    if let Err(e) = engine.begin() {
        log::error!("Could not start: {}", e);
        return;
    }

    for _ in 0..5 {
        Action::ConfettiClick.apply(&mut engine);
    }
    engine.advance(250);
    Action::Drop.apply(&mut engine);
    engine.advance(700);
    println!("  {} ({})", hud(&engine).timer, describe(&engine));

    if let Err(e) = engine.debug_skip(13) {
        log::error!("Skip failed: {}", e);
        return;
    }
    Action::SecretSubmit("hari".to_string()).apply(&mut engine);
    engine.advance(900);
    Action::Surprise.apply(&mut engine);
    println!("  {} ({})", hud(&engine).timer, describe(&engine));

    if engine.current_level() == Some(engine.registry().len()) {
        println!("✓ Reached the final level!");
    } else {
        println!("✗ Stopped at {}", describe(&engine));
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn describe(engine: &fun_levels::LevelEngine) -> String {
    engine
        .progress()
        .map(|p| p.label())
        .unwrap_or_else(|| "no level".to_string())
}
