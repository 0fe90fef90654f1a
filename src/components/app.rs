use std::rc::Rc;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use reaction_grid::model::block_lifetime_ms;
use reaction_grid::{
    BrowserScreen, BrowserTimers, GameConfig, GameState, RoundSummary, SessionController, Settings,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::KeyboardEvent;
use yew::prelude::*;

use super::{
    board_view::BoardView, controls_panel::ControlsPanel, game_over_overlay::GameOverOverlay,
    stats_panel::StatsPanel, time_display::TimeDisplay,
};

type Controller = SessionController<BrowserTimers, BrowserScreen>;

fn load_settings() -> Settings {
    if let Some(win) = web_sys::window() {
        if let Ok(Some(store)) = win.local_storage() {
            if let Ok(Some(raw)) = store.get_item(Settings::STORAGE_KEY) {
                return Settings::from_json(&raw);
            }
        }
    }
    Settings::default()
}

fn save_settings(settings: Settings) {
    if let Some(win) = web_sys::window() {
        if let Ok(Some(store)) = win.local_storage() {
            let _ = store.set_item(Settings::STORAGE_KEY, &settings.to_json());
        }
    }
}

fn random_seed() -> u64 {
    let hi = (js_sys::Math::random() * u32::MAX as f64) as u64;
    let lo = (js_sys::Math::random() * u32::MAX as f64) as u64;
    (hi << 32) | lo
}

#[function_component(App)]
pub fn app() -> Html {
    let controller: Rc<Controller> = use_memo((), |_| {
        Controller::new(
            GameConfig::default(),
            load_settings().level,
            BrowserTimers::new(),
            BrowserScreen,
            SmallRng::seed_from_u64(random_seed()),
        )
    });
    let snapshot = use_state({
        let controller = controller.clone();
        move || controller.state()
    });
    let summary = use_state(|| None::<RoundSummary>);

    // Push state into the view; feed window/document events to the controller
    {
        let controller = controller.clone();
        let snapshot = snapshot.clone();
        let summary = summary.clone();
        use_effect_with((), move |_| {
            {
                let snapshot = snapshot.clone();
                controller.subscribe(move |s: &Rc<GameState>| snapshot.set(s.clone()));
            }
            {
                let summary = summary.clone();
                controller.on_round_end(move |s| summary.set(Some(s)));
            }
            controller.relayout();

            let window = web_sys::window();
            let document = window.as_ref().and_then(|w| w.document());
            let resize_cb = {
                let controller = controller.clone();
                Closure::wrap(Box::new(move |_e: web_sys::Event| {
                    controller.relayout();
                }) as Box<dyn FnMut(_)>)
            };
            let fullscreen_cb = {
                let controller = controller.clone();
                Closure::wrap(Box::new(move |_e: web_sys::Event| {
                    controller.on_fullscreen_change();
                }) as Box<dyn FnMut(_)>)
            };
            let key_cb = {
                let controller = controller.clone();
                let summary = summary.clone();
                Closure::wrap(Box::new(move |e: KeyboardEvent| {
                    if e.code() == "Space" {
                        e.prevent_default();
                        if controller.state().is_running() {
                            controller.stop();
                        } else {
                            summary.set(None);
                            controller.start();
                        }
                    }
                }) as Box<dyn FnMut(_)>)
            };
            if let Some(w) = &window {
                let _ = w.add_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref());
                let _ = w.add_event_listener_with_callback("keydown", key_cb.as_ref().unchecked_ref());
            }
            if let Some(d) = &document {
                let _ = d.add_event_listener_with_callback(
                    "fullscreenchange",
                    fullscreen_cb.as_ref().unchecked_ref(),
                );
            }
            move || {
                if let Some(w) = &window {
                    let _ = w.remove_event_listener_with_callback(
                        "resize",
                        resize_cb.as_ref().unchecked_ref(),
                    );
                    let _ = w.remove_event_listener_with_callback(
                        "keydown",
                        key_cb.as_ref().unchecked_ref(),
                    );
                }
                if let Some(d) = &document {
                    let _ = d.remove_event_listener_with_callback(
                        "fullscreenchange",
                        fullscreen_cb.as_ref().unchecked_ref(),
                    );
                }
                drop(resize_cb);
                drop(fullscreen_cb);
                drop(key_cb);
            }
        });
    }

    // Remember the chosen level across page loads
    {
        let level = snapshot.level;
        use_effect_with(level, move |level| {
            save_settings(Settings { level: *level });
            || ()
        });
    }

    let start = {
        let controller = controller.clone();
        let summary = summary.clone();
        Callback::from(move |_| {
            summary.set(None);
            controller.start();
        })
    };
    let toggle_run = {
        let controller = controller.clone();
        let start = start.clone();
        Callback::from(move |_| {
            if controller.state().is_running() {
                controller.stop();
            } else {
                start.emit(());
            }
        })
    };
    let on_level = {
        let controller = controller.clone();
        Callback::from(move |level: u8| controller.change_level(level))
    };
    let on_reset = {
        let controller = controller.clone();
        let summary = summary.clone();
        Callback::from(move |_| {
            summary.set(None);
            controller.reset();
        })
    };
    let on_fullscreen = {
        let controller = controller.clone();
        Callback::from(move |_| controller.toggle_fullscreen())
    };
    let on_click = {
        let controller = controller.clone();
        Callback::from(move |cell: usize| {
            controller.on_click(cell);
        })
    };
    let close_summary = {
        let summary = summary.clone();
        Callback::from(move |_| summary.set(None))
    };

    let s = (*snapshot).clone();
    html! {
        <div id="root" style="position:relative; min-height:100vh; box-sizing:border-box; padding:16px; display:flex; flex-direction:column; align-items:center; gap:16px; background:#0e1116; color:#c9d1d9; font-family:sans-serif;">
            <div id="top-bar" style="display:flex; gap:16px; align-items:center; justify-content:center; flex-wrap:wrap;">
                <StatsPanel score={s.score} spawned={s.total_spawned} hit_rate={s.hit_rate()} level={s.level} />
                <TimeDisplay time_left={s.formatted_time()} running={s.is_running()} on_toggle_run={toggle_run} />
                <ControlsPanel level={s.level} on_level={on_level} on_reset={on_reset} on_toggle_fullscreen={on_fullscreen} />
            </div>
            <BoardView board={s.board.clone()} cell_px={s.cell_px} lifetime_ms={block_lifetime_ms(s.level)} on_click={on_click} />
            <GameOverOverlay summary={*summary} restart={start} close={close_summary} />
        </div>
    }
}
