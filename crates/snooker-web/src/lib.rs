//! Browser bridge for the snooker session.
//!
//! wasm-bindgen cannot export a stateful struct's methods as plain
//! functions, so the runner lives in a `thread_local!` and every export
//! borrows it through `with_runner`.

pub mod runner;

pub use runner::SessionRunner;

use std::cell::RefCell;

use snooker_core::InputEvent;
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<SessionRunner>> = RefCell::new(None);
}

fn with_runner<R>(f: impl FnOnce(&mut SessionRunner) -> R) -> R {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        let runner = borrow
            .as_mut()
            .expect("Snooker not initialized. Call snooker_init() first.");
        f(runner)
    })
}

/// Create the session. `config_json` may be empty for defaults.
#[wasm_bindgen]
pub fn snooker_init(config_json: &str) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let runner = SessionRunner::from_json(config_json).map_err(|err| {
        log::error!("snooker: {}", err);
        JsValue::from_str(&err.to_string())
    })?;
    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("snooker: initialized");
    Ok(())
}

#[wasm_bindgen]
pub fn snooker_tick(dt: f32) {
    with_runner(|r| r.tick(dt));
}

// ---- Input ----

#[wasm_bindgen]
pub fn snooker_pointer_down(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerDown { x, y }));
}

#[wasm_bindgen]
pub fn snooker_pointer_up(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerUp { x, y }));
}

#[wasm_bindgen]
pub fn snooker_pointer_move(x: f32, y: f32, held: bool) {
    with_runner(|r| r.push_input(InputEvent::PointerMove { x, y, held }));
}

#[wasm_bindgen]
pub fn snooker_key_down(key_code: u32) {
    with_runner(|r| r.push_input(InputEvent::KeyDown { key_code }));
}

#[wasm_bindgen]
pub fn snooker_key_up(key_code: u32) {
    with_runner(|r| r.push_input(InputEvent::KeyUp { key_code }));
}

// ---- Commands ----

#[wasm_bindgen]
pub fn snooker_set_standard() {
    with_runner(|r| r.session_mut().set_standard());
}

#[wasm_bindgen]
pub fn snooker_set_random_reds() {
    with_runner(|r| r.session_mut().set_random_reds());
}

#[wasm_bindgen]
pub fn snooker_set_all_random() {
    with_runner(|r| r.session_mut().set_all_random());
}

#[wasm_bindgen]
pub fn snooker_reset() {
    with_runner(|r| r.session_mut().reset());
}

#[wasm_bindgen]
pub fn snooker_place_cue_ball(x: f32, y: f32) -> bool {
    with_runner(|r| r.session_mut().place_cue_ball(x, y))
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_balls_ptr() -> *const f32 {
    with_runner(|r| r.balls_ptr())
}

#[wasm_bindgen]
pub fn get_ball_count() -> u32 {
    with_runner(|r| r.ball_count())
}

#[wasm_bindgen]
pub fn get_ball_floats() -> u32 {
    with_runner(|r| r.ball_floats())
}

#[wasm_bindgen]
pub fn get_game_events_ptr() -> *const f32 {
    with_runner(|r| r.game_events_ptr())
}

#[wasm_bindgen]
pub fn get_game_events_len() -> u32 {
    with_runner(|r| r.game_events_len())
}

#[wasm_bindgen]
pub fn get_cue() -> Vec<f32> {
    with_runner(|r| r.cue_snapshot().to_vec())
}

#[wasm_bindgen]
pub fn get_aim_dots() -> Vec<f32> {
    with_runner(|r| r.aim_dots().to_vec())
}

#[wasm_bindgen]
pub fn get_table_geometry() -> Vec<f32> {
    with_runner(|r| r.table_geometry())
}

#[wasm_bindgen]
pub fn get_pockets() -> Vec<f32> {
    with_runner(|r| r.pockets())
}

#[wasm_bindgen]
pub fn get_spots() -> Vec<f32> {
    with_runner(|r| r.spots())
}

#[wasm_bindgen]
pub fn get_world_width() -> f32 {
    with_runner(|r| r.world_width())
}

#[wasm_bindgen]
pub fn get_world_height() -> f32 {
    with_runner(|r| r.world_height())
}

// ---- HUD ----

#[wasm_bindgen]
pub fn get_score() -> u32 {
    with_runner(|r| r.session().score())
}

#[wasm_bindgen]
pub fn get_reds_remaining() -> u32 {
    with_runner(|r| r.session().reds_remaining() as u32)
}

#[wasm_bindgen]
pub fn get_mode() -> u32 {
    with_runner(|r| r.session().mode().code())
}

#[wasm_bindgen]
pub fn get_mode_text() -> String {
    with_runner(|r| r.session().mode_text().to_string())
}

#[wasm_bindgen]
pub fn get_message() -> String {
    with_runner(|r| r.session().message().text().unwrap_or_default().to_string())
}

#[wasm_bindgen]
pub fn get_message_alpha() -> u32 {
    with_runner(|r| r.session().message().alpha() as u32)
}

#[wasm_bindgen]
pub fn get_cue_ball_placed() -> bool {
    with_runner(|r| r.session().cue_ball_placed())
}

#[wasm_bindgen]
pub fn get_all_balls_stopped() -> bool {
    with_runner(|r| r.session().all_balls_stopped())
}

#[wasm_bindgen]
pub fn get_game_over() -> bool {
    with_runner(|r| r.session().is_game_over())
}

#[wasm_bindgen]
pub fn get_aim_assist() -> bool {
    with_runner(|r| r.session().aim_assist())
}
