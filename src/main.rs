//! Lucky Wheel entry point
//!
//! Handles platform-specific initialization and runs the spin frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        Document, Element, EventTarget, HtmlButtonElement, HtmlCanvasElement, HtmlInputElement,
        HtmlSelectElement,
    };

    use lucky_wheel::audio::{AudioManager, frame_sounds};
    use lucky_wheel::generator::generate_prizes;
    use lucky_wheel::history::format_date;
    use lucky_wheel::persistence::AppStore;
    use lucky_wheel::platform::frame::{cancel_frame, request_frame};
    use lucky_wheel::platform::storage::LocalStorage;
    use lucky_wheel::platform::{KeyValueStore, MemoryStore, StorageError, frame_clock_ms, now_ms};
    use lucky_wheel::renderer::WheelCanvas;
    use lucky_wheel::scenario::DeleteRefused;
    use lucky_wheel::settings::volume_from_percent;
    use lucky_wheel::wheel::{PrizeSet, SpinEvent};
    use lucky_wheel::{History, ScenarioBook, Settings, SpinDriver};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    // Celebration effect; silently does nothing without the confetti script
    #[wasm_bindgen(inline_js = "
        export function fire_confetti(color) {
            try {
                if (typeof window.confetti !== 'function') return;
                const end = Date.now() + 3000;
                (function frame() {
                    window.confetti({ particleCount: 5, angle: 60, spread: 55, origin: { x: 0 }, colors: [color, '#ffffff'] });
                    window.confetti({ particleCount: 5, angle: 120, spread: 55, origin: { x: 1 }, colors: [color, '#ffffff'] });
                    if (Date.now() < end) requestAnimationFrame(frame);
                }());
            } catch (e) {
                console.warn('Confetti failed:', e);
            }
        }
    ")]
    extern "C" {
        fn fire_confetti(color: &str);
    }

    /// Storage backend: LocalStorage when the browser allows it
    enum Backend {
        Local(LocalStorage),
        Memory(MemoryStore),
    }

    impl KeyValueStore for Backend {
        fn get(&self, key: &str) -> Option<String> {
            match self {
                Backend::Local(s) => s.get(key),
                Backend::Memory(s) => s.get(key),
            }
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            match self {
                Backend::Local(s) => s.set(key, value),
                Backend::Memory(s) => s.set(key, value),
            }
        }

        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            match self {
                Backend::Local(s) => s.remove(key),
                Backend::Memory(s) => s.remove(key),
            }
        }
    }

    /// App instance holding all state
    struct App {
        driver: SpinDriver,
        book: ScenarioBook,
        history: History,
        settings: Settings,
        store: AppStore<Backend>,
        audio: AudioManager,
        canvas: Option<WheelCanvas>,
        rng: Pcg32,
        /// Pending animation frame (only while spinning)
        frame_id: Option<i32>,
        /// Name of the wheel the running spin was started on
        spin_scenario: String,
        generating: bool,
    }

    impl App {
        fn new(store: AppStore<Backend>, canvas: Option<WheelCanvas>) -> Self {
            let book = store.load_book();
            let history = store.load_history();
            let settings = store.load_settings();
            let mut audio = AudioManager::new();
            audio.set_volume(settings.effective_volume());
            Self {
                driver: SpinDriver::new(),
                book,
                history,
                settings,
                store,
                audio,
                canvas,
                rng: Pcg32::seed_from_u64(js_sys::Date::now() as u64),
                frame_id: None,
                spin_scenario: String::new(),
                generating: false,
            }
        }

        fn save_book(&mut self) {
            if let Err(e) = self.store.save_book(&self.book) {
                log::warn!("Failed to save scenarios: {}", e);
            }
        }

        fn save_history(&mut self) {
            if let Err(e) = self.store.save_history(&self.history) {
                log::warn!("Failed to save history: {}", e);
            }
        }

        fn save_settings(&mut self) {
            if let Err(e) = self.store.save_settings(&self.settings) {
                log::warn!("Failed to save settings: {}", e);
            }
        }

        /// Prizes being drawn: the running spin's snapshot, else the live scenario
        fn visible_prizes(&self) -> PrizeSet {
            match self.driver.prizes() {
                Some(snapshot) => snapshot.clone(),
                None => self.book.current().prize_set(),
            }
        }

        fn render(&self) {
            if let Some(canvas) = &self.canvas {
                canvas.render(&self.visible_prizes(), self.driver.rotation());
            }
        }

        fn handle_events(&mut self, events: Vec<SpinEvent>) {
            for sound in frame_sounds(&events) {
                self.audio.play(sound);
            }
            for event in events {
                if let SpinEvent::Finished { prize, .. } = event {
                    self.history.record(&prize, now_ms());
                    self.save_history();
                    if self.settings.effective_confetti() {
                        fire_confetti(&prize.color);
                    }
                    show_winner(&self.spin_scenario, &prize.label);
                }
            }
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn element(id: &str) -> Option<Element> {
        document()?.get_element_by_id(id)
    }

    fn input(id: &str) -> Option<HtmlInputElement> {
        element(id)?.dyn_into().ok()
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = element(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(id: &str, hidden: bool) {
        if let Some(el) = element(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    fn confirm(message: &str) -> bool {
        web_sys::window()
            .and_then(|w| w.confirm_with_message(message).ok())
            .unwrap_or(false)
    }

    fn alert(message: &str) {
        if let Some(w) = web_sys::window() {
            let _ = w.alert_with_message(message);
        }
    }

    fn escape_html(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&#39;")
    }

    /// Register a DOM event handler for the lifetime of the page
    fn listen(target: &EventTarget, event: &str, handler: impl FnMut(web_sys::Event) + 'static) {
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
        let _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn listen_id(id: &str, event: &str, handler: impl FnMut(web_sys::Event) + 'static) {
        match element(id) {
            Some(el) => listen(&el, event, handler),
            None => log::warn!("Missing element #{}", id),
        }
    }

    fn show_winner(scenario: &str, label: &str) {
        set_text("winner-scenario", scenario);
        set_text("winner-name", label);
        set_hidden("winner-modal", false);
    }

    /// Refresh everything outside the canvas
    fn update_ui(app: &App) {
        let spinning = app.driver.is_spinning();
        let scenario = app.book.current();

        if let Some(btn) = element("spin-btn").and_then(|e| e.dyn_into::<HtmlButtonElement>().ok()) {
            btn.set_disabled(spinning || scenario.prizes.is_empty());
            btn.set_text_content(Some(if spinning { "..." } else { "SPIN" }));
        }

        set_text("scenario-title", &scenario.name);
        set_text("prize-count", &scenario.prizes.len().to_string());

        // Scenario picker
        if let Some(el) = element("scenario-select") {
            let options: String = app
                .book
                .scenarios()
                .iter()
                .map(|s| {
                    format!(
                        "<option value=\"{}\"{}>{}</option>",
                        escape_html(&s.id),
                        if s.id == scenario.id { " selected" } else { "" },
                        escape_html(&s.name)
                    )
                })
                .collect();
            el.set_inner_html(&options);
        }

        // Prize editor
        if let Some(el) = element("prize-list") {
            let total = scenario.prize_set().total_weight().max(1) as f64;
            let rows: String = scenario
                .prizes
                .iter()
                .map(|p| {
                    let id = escape_html(&p.id);
                    format!(
                        "<li><span class=\"swatch\" style=\"background:{color}\"></span>\
                         <span class=\"label\">{label}</span>\
                         <input type=\"number\" min=\"1\" value=\"{weight}\" data-weight-id=\"{id}\">\
                         <span class=\"odds\">{odds:.1}%</span>\
                         <button data-remove-id=\"{id}\">✕</button></li>",
                        color = escape_html(&p.color),
                        label = escape_html(&p.label),
                        weight = p.weight,
                        odds = p.weight as f64 / total * 100.0,
                    )
                })
                .collect();
            el.set_inner_html(&rows);
        }

        // History
        if let Some(el) = element("history-list") {
            let now = now_ms();
            let rows: String = app
                .history
                .entries
                .iter()
                .map(|e| {
                    format!(
                        "<li><span class=\"label\">{}</span><span class=\"when\">{}</span></li>",
                        escape_html(&e.label),
                        format_date(e.timestamp, now)
                    )
                })
                .collect();
            el.set_inner_html(&rows);
        }
        set_hidden("history-empty", !app.history.is_empty());
    }

    /// Fill the settings controls from stored values (once, at startup)
    fn sync_settings_ui(settings: &Settings) {
        let checks = [
            ("mute-toggle", settings.muted),
            ("confetti-toggle", settings.confetti),
            ("reduced-motion-toggle", settings.reduced_motion),
        ];
        for (id, checked) in checks {
            if let Some(el) = input(id) {
                el.set_checked(checked);
            }
        }
        let values = [
            ("volume-input", format!("{:.0}", settings.master_volume * 100.0)),
            ("sfx-volume-input", format!("{:.0}", settings.sfx_volume * 100.0)),
            ("api-key-input", settings.generator_api_key.clone().unwrap_or_default()),
            ("model-input", settings.generator_model.clone()),
        ];
        for (id, value) in values {
            if let Some(el) = input(id) {
                el.set_value(&value);
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Lucky Wheel starting...");

        let backend = match LocalStorage::open() {
            Ok(storage) => Backend::Local(storage),
            Err(e) => {
                log::warn!("{} - changes will not persist", e);
                Backend::Memory(MemoryStore::new())
            }
        };

        let canvas = element("wheel-canvas")
            .and_then(|e| e.dyn_into::<HtmlCanvasElement>().ok())
            .and_then(|c| WheelCanvas::new(&c));
        if canvas.is_none() {
            log::error!("No drawable #wheel-canvas - wheel will not render");
        }

        let app = Rc::new(RefCell::new(App::new(AppStore::new(backend), canvas)));

        setup_spin_controls(app.clone());
        setup_history(app.clone());
        setup_scenarios(app.clone());
        setup_prize_editor(app.clone());
        setup_generator(app.clone());
        setup_settings(app.clone());
        setup_teardown(app.clone());

        {
            let a = app.borrow();
            a.render();
            update_ui(&a);
            sync_settings_ui(&a.settings);
        }

        if let Some(loading) = element("loading") {
            let _ = loading.class_list().add_1("hidden");
        }

        log::info!("Lucky Wheel running!");
    }

    /// Start a spin if idle; schedules the frame loop
    fn spin(app: &Rc<RefCell<App>>) {
        let started = {
            let mut guard = app.borrow_mut();
            let a = &mut *guard;
            a.audio.resume();
            let source = a.book.spin_source();
            let started = a.driver.request_spin(&source.prizes, frame_clock_ms(), &mut a.rng);
            if started {
                a.spin_scenario = source.name;
            }
            started
        };
        if started {
            set_hidden("winner-modal", true);
            update_ui(&app.borrow());
            schedule_frame(app);
        }
    }

    fn schedule_frame(app: &Rc<RefCell<App>>) {
        let next = app.clone();
        let id = request_frame(move |time| on_frame(next, time));
        app.borrow_mut().frame_id = id;
    }

    fn on_frame(app: Rc<RefCell<App>>, time: f64) {
        let spinning = {
            let mut a = app.borrow_mut();
            a.frame_id = None;
            let events = a.driver.update(time);
            a.render();
            a.handle_events(events);
            a.driver.is_spinning()
        };

        // Only schedule while spinning; an idle wheel costs no frames
        if spinning {
            schedule_frame(&app);
        } else {
            update_ui(&app.borrow());
        }
    }

    fn setup_spin_controls(app: Rc<RefCell<App>>) {
        {
            let app = app.clone();
            listen_id("spin-btn", "click", move |_| spin(&app));
        }

        // Space/Enter spins unless typing in a field
        if let Some(window) = web_sys::window() {
            let app = app.clone();
            listen(&window, "keydown", move |event| {
                let typing = event
                    .target()
                    .and_then(|t| t.dyn_into::<Element>().ok())
                    .map(|el| matches!(el.tag_name().as_str(), "INPUT" | "SELECT" | "TEXTAREA"))
                    .unwrap_or(false);
                let key = event
                    .dyn_ref::<web_sys::KeyboardEvent>()
                    .map(|k| k.key())
                    .unwrap_or_default();
                if !typing && (key == " " || key == "Enter") {
                    event.prevent_default();
                    spin(&app);
                }
            });
        }

        listen_id("winner-close", "click", |_| set_hidden("winner-modal", true));
    }

    fn setup_history(app: Rc<RefCell<App>>) {
        listen_id("clear-history-btn", "click", move |_| {
            if app.borrow().history.is_empty() || !confirm("Clear all spin history?") {
                return;
            }
            let mut a = app.borrow_mut();
            a.history.clear();
            a.save_history();
            update_ui(&a);
        });
    }

    fn setup_scenarios(app: Rc<RefCell<App>>) {
        {
            let app = app.clone();
            listen_id("scenario-select", "change", move |event| {
                let Some(select) = event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlSelectElement>().ok())
                else {
                    return;
                };
                let mut a = app.borrow_mut();
                if a.book.switch_to(&select.value()) {
                    a.save_book();
                    a.render();
                }
                update_ui(&a);
            });
        }

        {
            let app = app.clone();
            listen_id("add-scenario-btn", "click", move |_| {
                let Some(field) = input("scenario-name-input") else { return };
                let name = field.value();
                if name.trim().is_empty() {
                    return;
                }
                let now = now_ms();
                let mut a = app.borrow_mut();
                a.book.add_scenario(now.to_string(), &name, now);
                a.save_book();
                a.render();
                update_ui(&a);
                field.set_value("");
            });
        }

        {
            let app = app.clone();
            listen_id("rename-scenario-btn", "click", move |_| {
                let Some(field) = input("scenario-name-input") else { return };
                let mut a = app.borrow_mut();
                let id = a.book.current_id().to_string();
                if a.book.rename(&id, &field.value()) {
                    a.save_book();
                    update_ui(&a);
                    field.set_value("");
                }
            });
        }

        listen_id("delete-scenario-btn", "click", move |_| {
            if !confirm("Delete this wheel? This cannot be undone.") {
                return;
            }
            let mut a = app.borrow_mut();
            let id = a.book.current_id().to_string();
            match a.book.delete(&id) {
                Ok(()) => {
                    a.save_book();
                    a.render();
                    update_ui(&a);
                }
                Err(DeleteRefused::LastScenario) => alert("At least one wheel must remain."),
                Err(DeleteRefused::NotFound) => log::warn!("Scenario {} already gone", id),
            }
        });
    }

    fn setup_prize_editor(app: Rc<RefCell<App>>) {
        {
            let app = app.clone();
            listen_id("add-prize-btn", "click", move |_| {
                let (Some(name), Some(weight)) = (input("prize-name-input"), input("prize-weight-input"))
                else {
                    return;
                };
                let weight_value = weight.value().trim().parse::<i64>().unwrap_or(1);
                let id = now_ms().to_string();
                let mut a = app.borrow_mut();
                if a.book.current_mut().add_prize(id, &name.value(), weight_value).is_some() {
                    a.save_book();
                    a.render();
                    update_ui(&a);
                    name.set_value("");
                    weight.set_value("1");
                }
            });
        }

        // Delegated handlers for the rendered rows
        {
            let app = app.clone();
            listen_id("prize-list", "click", move |event| {
                let Some(button) = event
                    .target()
                    .and_then(|t| t.dyn_into::<Element>().ok())
                    .and_then(|el| el.closest("[data-remove-id]").ok().flatten())
                else {
                    return;
                };
                let Some(id) = button.get_attribute("data-remove-id") else { return };
                let mut a = app.borrow_mut();
                if a.book.current_mut().remove_prize(&id) {
                    a.save_book();
                    a.render();
                    update_ui(&a);
                }
            });
        }

        listen_id("prize-list", "change", move |event| {
            let Some(field) = event
                .target()
                .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
            else {
                return;
            };
            let Some(id) = field.get_attribute("data-weight-id") else { return };
            let weight = field.value().trim().parse::<i64>().unwrap_or(1);
            let mut a = app.borrow_mut();
            if a.book.current_mut().set_weight(&id, weight) {
                a.save_book();
                a.render();
                update_ui(&a);
            }
        });
    }

    fn setup_generator(app: Rc<RefCell<App>>) {
        listen_id("generate-btn", "click", move |_| {
            let Some(field) = input("theme-input") else { return };
            let theme = field.value();
            let config = {
                let mut a = app.borrow_mut();
                if a.generating {
                    return;
                }
                a.generating = true;
                a.settings.generator_config()
            };
            set_text("generate-status", "Generating...");

            let app = app.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let result = generate_prizes(&config, &theme, now_ms()).await;
                let mut a = app.borrow_mut();
                a.generating = false;
                match result {
                    Ok(prizes) => {
                        let count = prizes.len();
                        a.book.update_prizes(prizes);
                        a.save_book();
                        a.render();
                        update_ui(&a);
                        set_text("generate-status", &format!("Added {} prizes", count));
                    }
                    Err(e) => {
                        log::warn!("Prize generation failed: {}", e);
                        set_text("generate-status", &e.user_message());
                    }
                }
            });
        });
    }

    fn setup_settings(app: Rc<RefCell<App>>) {
        bind_setting(&app, "mute-toggle", |s, f| s.muted = f.checked());
        bind_setting(&app, "confetti-toggle", |s, f| s.confetti = f.checked());
        bind_setting(&app, "reduced-motion-toggle", |s, f| s.reduced_motion = f.checked());
        bind_setting(&app, "volume-input", |s, f| {
            if let Some(v) = volume_from_percent(&f.value()) {
                s.master_volume = v;
            }
        });
        bind_setting(&app, "sfx-volume-input", |s, f| {
            if let Some(v) = volume_from_percent(&f.value()) {
                s.sfx_volume = v;
            }
        });
        bind_setting(&app, "api-key-input", |s, f| s.set_api_key(&f.value()));
        bind_setting(&app, "model-input", |s, f| s.set_model(&f.value()));
    }

    /// Apply an input's value to the settings on change, then persist
    fn bind_setting(
        app: &Rc<RefCell<App>>,
        id: &str,
        apply: impl Fn(&mut Settings, &HtmlInputElement) + 'static,
    ) {
        let app = app.clone();
        listen_id(id, "change", move |event| {
            let Some(field) = event
                .target()
                .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
            else {
                return;
            };
            let mut a = app.borrow_mut();
            apply(&mut a.settings, &field);
            let volume = a.settings.effective_volume();
            a.audio.set_volume(volume);
            a.save_settings();
        });
    }

    /// Stop the frame loop when the page goes away
    fn setup_teardown(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        listen(&window, "pagehide", move |_| {
            let mut a = app.borrow_mut();
            if let Some(id) = a.frame_id.take() {
                cancel_frame(id);
            }
            if a.driver.cancel() {
                log::info!("Spin abandoned on page hide");
            }
        });
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Lucky Wheel (native) starting...");
    log::info!("The wheel UI runs in the browser (`trunk serve`); running a headless spin batch");

    let spins = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(20);
    run_headless(spins);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Spin the default wheel against a synthetic 60 Hz clock and report odds
#[cfg(not(target_arch = "wasm32"))]
fn run_headless(spins: usize) {
    use lucky_wheel::persistence::AppStore;
    use lucky_wheel::platform::{MemoryStore, now_ms};
    use lucky_wheel::wheel::{SpinDriver, SpinEvent};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const FRAME_MS: f64 = 1000.0 / 60.0;

    let mut store = AppStore::new(MemoryStore::new());
    let book = store.load_book();
    let scenario = book.current();
    let prizes = scenario.prize_set();
    let mut history = store.load_history();

    let seed = now_ms() as u64;
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut driver = SpinDriver::new();
    let mut wins = vec![0usize; prizes.len()];
    let mut now = 0.0;

    log::info!("Spinning \"{}\" {} times (seed {})", scenario.name, spins, seed);

    for spin in 1..=spins {
        if !driver.request_spin(&prizes, now, &mut rng) {
            log::warn!("Spin {} rejected", spin);
            break;
        }
        let mut ticks = 0;
        while driver.is_spinning() {
            now += FRAME_MS;
            for event in driver.update(now) {
                match event {
                    SpinEvent::Tick { .. } => ticks += 1,
                    SpinEvent::Finished { winner, prize } => {
                        wins[winner] += 1;
                        history.record(&prize, now_ms());
                        log::info!("Spin {}: {} ({} ticks)", spin, prize.label, ticks);
                    }
                }
            }
        }
        // Pause between spins
        now += 1000.0;
    }

    if let Err(e) = store.save_history(&history) {
        log::warn!("Failed to save history: {}", e);
    }

    let total = prizes.total_weight() as f64;
    println!("\n{} - {} spins", scenario.name, spins);
    for (prize, count) in prizes.iter().zip(&wins) {
        println!(
            "  {:<22} weight {:>2}  expected {:>5.1}%  observed {:>5.1}%",
            prize.label,
            prize.weight,
            prize.weight as f64 / total * 100.0,
            *count as f64 / spins.max(1) as f64 * 100.0
        );
    }
}
