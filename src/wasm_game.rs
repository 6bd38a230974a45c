// QuizWordz – A word game
// Copyright (C) 2024  Neil Roberts
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use wasm_bindgen::prelude::*;
use web_sys::console;
use super::catalog::Catalog;
use super::word_set::{WordSet, N_LETTERS};
use super::game::{ClickOutcome, Deferred, State};
use super::schedule::{Fired, Timers, TICK_INTERVAL_MS};
use super::session::Session;
use super::share::{self, SET_PARAM};
use js_sys::Reflect;
use rand::rngs::ThreadRng;

const WORD_SETS_FILE: &'static str = "word-sets.json";
const SHARE_TEXT_COPIED_ID: &'static str = "share-text-copied";
const SHARE_TEXT_ID: &'static str = "share-text";

#[derive(PartialEq, Eq, Copy, Clone)]
enum Page {
    Game,
    Share,
}

fn show_error(message: &str) {
    console::log_1(&message.into());

    let Some(window) = web_sys::window()
    else {
        return;
    };

    let Some(document) = window.document()
    else {
        return;
    };

    let Some(message_elem) = document.get_element_by_id("message")
    else {
        return;
    };

    message_elem.set_text_content(Some("An error occurred"));
}

struct Context {
    document: web_sys::HtmlDocument,
    window: web_sys::Window,
    message: web_sys::HtmlElement,
}

impl Context {
    fn new() -> Result<Context, String> {
        let Some(window) = web_sys::window()
        else {
            return Err("failed to get window".to_string());
        };

        let Some(document) = window.document()
            .and_then(|d| d.dyn_into::<web_sys::HtmlDocument>().ok())
        else {
            return Err("failed to get document".to_string());
        };

        let message = get_html_element(&document, "message")?;

        Ok(Context {
            document,
            window,
            message,
        })
    }
}

fn get_html_element(
    document: &web_sys::HtmlDocument,
    id: &str,
) -> Result<web_sys::HtmlElement, String> {
    document.get_element_by_id(id)
        .and_then(|c| c.dyn_into::<web_sys::HtmlElement>().ok())
        .ok_or_else(|| format!("failed to get {}", id))
}

type PromiseClosure = Closure::<dyn FnMut(JsValue)>;

struct Loader {
    context: Context,

    data_response_closure: Option<PromiseClosure>,
    data_content_closure: Option<PromiseClosure>,
    data_error_closure: Option<PromiseClosure>,

    floating_pointer: Option<*mut Loader>,
}

impl Loader {
    fn new(context: Context) -> Loader {
        Loader {
            context,
            data_response_closure: None,
            data_content_closure: None,
            data_error_closure: None,
            floating_pointer: None,
        }
    }

    fn start_floating(self) -> *mut Loader {
        assert!(self.floating_pointer.is_none());

        let floating_pointer = Box::into_raw(Box::new(self));

        unsafe {
            (*floating_pointer).floating_pointer = Some(floating_pointer);
        }

        floating_pointer
    }

    fn stop_floating(&mut self) -> Loader {
        match self.floating_pointer {
            Some(floating_pointer) => unsafe {
                // This should end up destroying the loader and
                // invalidating any closures that it holds
                *Box::from_raw(floating_pointer)
            },
            None => unreachable!(),
        }
    }

    fn queue_data_load(&mut self) {
        let floating_pointer = self.floating_pointer.unwrap();

        let response_closure = PromiseClosure::new(move |v: JsValue| {
            let (content_closure, error_closure) = unsafe {
                (
                    (*floating_pointer).data_content_closure.as_ref().unwrap(),
                    (*floating_pointer).data_error_closure.as_ref().unwrap(),
                )
            };

            let Ok(response) = v.dyn_into::<web_sys::Response>()
            else {
                show_error("Error getting word sets response");
                unsafe {
                    (*floating_pointer).stop_floating();
                }
                return;
            };

            let promise = match response.json() {
                Ok(p) => p,
                Err(_) => {
                    show_error("Error fetching json from word sets");
                    unsafe {
                        (*floating_pointer).stop_floating();
                    }
                    return;
                },
            };
            let _ = promise.then2(content_closure, error_closure);
        });

        let content_closure = PromiseClosure::new(move |v| {
            unsafe {
                (*floating_pointer).data_loaded(v);
            }
        });

        let error_closure = PromiseClosure::new(move |_| {
            show_error("Error loading word sets");
            unsafe {
                (*floating_pointer).stop_floating();
            }
        });

        let mut request_init = web_sys::RequestInit::new();
        request_init.cache(web_sys::RequestCache::NoCache);

        let promise = self.context.window.fetch_with_str_and_init(
            WORD_SETS_FILE,
            &request_init,
        );

        let _ = promise.then2(&response_closure, &error_closure);

        self.data_response_closure = Some(response_closure);
        self.data_content_closure = Some(content_closure);
        self.data_error_closure = Some(error_closure);
    }

    fn data_loaded(&mut self, data: JsValue) {
        match parse_catalog(data) {
            Err(_) => {
                self.stop_floating();
            },
            Ok(catalog) => self.start_game(catalog),
        }
    }

    fn start_game(&mut self, catalog: Catalog) {
        let Loader { context, .. } = self.stop_floating();

        let requested = take_requested_set(&context);

        if let Some(id) = requested.as_deref() {
            if catalog.position(id).is_none() {
                console::log_1(&format!("Unknown word set: {}", id).into());
            }
        }

        match QuizWordz::new(context, catalog, requested.as_deref()) {
            Ok(quizwordz) => {
                // Leak the main quizwordz object so that it will live as
                // long as the web page
                std::mem::forget(quizwordz);
            },
            Err(e) => show_error(&e),
        }
    }
}

/// Runs the game’s timers on the window. The deferred work is passed to
/// a single callback as an encoded number.
struct BrowserTimers {
    window: web_sys::Window,
    tick_function: Option<js_sys::Function>,
    deferred_function: Option<js_sys::Function>,
    interval: Option<i32>,
    timeouts: Vec<i32>,
}

impl BrowserTimers {
    fn new(window: web_sys::Window) -> BrowserTimers {
        BrowserTimers {
            window,
            tick_function: None,
            deferred_function: None,
            interval: None,
            timeouts: Vec::new(),
        }
    }
}

impl Timers for BrowserTimers {
    fn queue_deferred(&mut self, deferred: Deferred, delay_ms: u32) {
        let Some(function) = self.deferred_function.as_ref()
        else {
            return;
        };

        match self.window.set_timeout_with_callback_and_timeout_and_arguments_1(
            function,
            delay_ms as i32,
            &JsValue::from_f64(deferred.to_bits() as f64),
        ) {
            Ok(handle) => self.timeouts.push(handle),
            Err(_) => console::log_1(&"Error setting timeout".into()),
        }
    }

    fn start_ticking(&mut self) {
        if self.interval.is_some() {
            return;
        }

        let Some(function) = self.tick_function.as_ref()
        else {
            return;
        };

        match self.window.set_interval_with_callback_and_timeout_and_arguments_0(
            function,
            TICK_INTERVAL_MS as i32,
        ) {
            Ok(handle) => self.interval = Some(handle),
            Err(_) => console::log_1(&"Error setting interval".into()),
        }
    }

    fn stop_ticking(&mut self) {
        if let Some(handle) = self.interval.take() {
            self.window.clear_interval_with_handle(handle);
        }
    }

    fn cancel_deferreds(&mut self) {
        for handle in self.timeouts.drain(..) {
            self.window.clear_timeout_with_handle(handle);
        }
    }
}

struct QuizWordz {
    context: Context,
    closures: Vec<Closure::<dyn Fn(JsValue)>>,
    game_contents: web_sys::HtmlElement,
    theme: web_sys::HtmlElement,
    set_number: web_sys::HtmlElement,
    timer: web_sys::HtmlElement,
    pause_button: web_sys::HtmlElement,
    paused_message: web_sys::HtmlElement,
    game_grid: web_sys::HtmlElement,
    result_overlay: web_sys::HtmlElement,
    result_theme: web_sys::HtmlElement,
    result_words: web_sys::HtmlElement,
    result_time: web_sys::HtmlElement,
    cells: Vec<web_sys::HtmlElement>,
    session: Session<ThreadRng>,
    timers: BrowserTimers,
}

impl QuizWordz {
    fn new(
        context: Context,
        catalog: Catalog,
        requested: Option<&str>,
    ) -> Result<Box<QuizWordz>, String> {
        let document = &context.document;

        let game_contents = get_html_element(document, "game-contents")?;
        let theme = get_html_element(document, "theme")?;
        let set_number = get_html_element(document, "set-number")?;
        let timer = get_html_element(document, "timer")?;
        let pause_button = get_html_element(document, "pause-button")?;
        let paused_message = get_html_element(document, "paused-message")?;
        let game_grid = get_html_element(document, "game-grid")?;
        let result_overlay = get_html_element(document, "result-overlay")?;
        let result_theme = get_html_element(document, "result-theme")?;
        let result_words = get_html_element(document, "result-words")?;
        let result_time = get_html_element(document, "result-time")?;

        let session = Session::new(catalog, requested, rand::thread_rng());
        let timers = BrowserTimers::new(context.window.clone());

        let mut quizwordz = Box::new(QuizWordz {
            context,
            closures: Vec::new(),
            game_contents,
            theme,
            set_number,
            timer,
            pause_button,
            paused_message,
            game_grid,
            result_overlay,
            result_theme,
            result_words,
            result_time,
            cells: Vec::with_capacity(N_LETTERS),
            session,
            timers,
        });

        quizwordz.create_cells()?;

        quizwordz.create_closures();
        quizwordz.set_up_button("pause-button", QuizWordz::toggle_pause);
        quizwordz.set_up_button("play-again-button", QuizWordz::play_again);
        quizwordz.set_up_button("share-button", QuizWordz::show_share_page);
        quizwordz.set_up_button("copy-share", QuizWordz::copy_share_text);
        quizwordz.set_up_button("close-share-cross", QuizWordz::close_share_page);

        quizwordz.session.start(&mut quizwordz.timers);

        quizwordz.update_title();
        quizwordz.flush_game_changes();
        quizwordz.set_page(Page::Game);

        quizwordz.show_game_contents();

        Ok(quizwordz)
    }

    fn create_cells(&mut self) -> Result<(), String> {
        for i in 0..N_LETTERS {
            let Some(cell) = self.context.document.create_element("div").ok()
                .and_then(|c| c.dyn_into::<web_sys::HtmlElement>().ok())
            else {
                return Err("failed to create letter element".to_string());
            };

            let _ = cell.set_attribute("class", "letter");
            let _ = cell.set_attribute("data-index", &i.to_string());
            cell.set_id(&format!("letter-{}", i));

            let _ = self.game_grid.append_with_node_1(&cell);

            self.cells.push(cell);
        }

        Ok(())
    }

    fn create_closures(&mut self) {
        let quizwordz_pointer = self as *mut QuizWordz;

        let click_closure = Closure::<dyn Fn(JsValue)>::new(
            move |event: JsValue| {
                let quizwordz = unsafe { &mut *quizwordz_pointer };

                let Some(index) = event.dyn_into::<web_sys::Event>().ok()
                    .and_then(|event| event.current_target())
                    .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
                    .and_then(|element| element.get_attribute("data-index"))
                    .and_then(|index| index.parse::<usize>().ok())
                else {
                    return;
                };

                quizwordz.handle_cell_click(index);
            }
        );

        for cell in self.cells.iter() {
            let _ = cell.add_event_listener_with_callback(
                "click",
                click_closure.as_ref().unchecked_ref(),
            );
        }

        self.closures.push(click_closure);

        let tick_closure = Closure::<dyn Fn(JsValue)>::new(
            move |_event: JsValue| {
                let quizwordz = unsafe { &mut *quizwordz_pointer };
                quizwordz.handle_fired(Fired::Tick);
            }
        );

        self.timers.tick_function = Some(
            tick_closure.as_ref().unchecked_ref::<js_sys::Function>().clone()
        );

        self.closures.push(tick_closure);

        let deferred_closure = Closure::<dyn Fn(JsValue)>::new(
            move |bits: JsValue| {
                let quizwordz = unsafe { &mut *quizwordz_pointer };

                let Some(deferred) = bits.as_f64()
                    .and_then(|bits| Deferred::from_bits(bits as u64))
                else {
                    console::log_1(&"Invalid deferred callback".into());
                    return;
                };

                quizwordz.handle_fired(Fired::Deferred(deferred));
            }
        );

        self.timers.deferred_function = Some(
            deferred_closure.as_ref()
                .unchecked_ref::<js_sys::Function>()
                .clone()
        );

        self.closures.push(deferred_closure);
    }

    fn set_up_button(&mut self, id: &str, handler: fn(&mut QuizWordz)) {
        let quizwordz_pointer = self as *mut QuizWordz;

        let closure = Closure::<dyn Fn(JsValue)>::new(
            move |_event: JsValue| {
                let quizwordz = unsafe { &mut *quizwordz_pointer };
                handler(quizwordz);
            }
        );

        let Some(button) =
            self.context.document.get_element_by_id(id)
            .and_then(|c| c.dyn_into::<web_sys::EventTarget>().ok())
        else {
            console::log_1(&format!("Missing button: {}", id).into());
            return;
        };

        let _ = button.add_event_listener_with_callback(
            "click",
            closure.as_ref().unchecked_ref(),
        );

        self.closures.push(closure);
    }

    fn handle_cell_click(&mut self, index: usize) {
        let outcome = self.session.click(index, &mut self.timers);

        if outcome == ClickOutcome::Missed {
            self.animate_error();
        }

        self.flush_game_changes();
    }

    fn handle_fired(&mut self, fired: Fired) {
        self.session.handle(fired, &mut self.timers);
        self.flush_game_changes();
    }

    fn toggle_pause(&mut self) {
        self.session.toggle_pause(&mut self.timers);
        self.flush_game_changes();
    }

    fn play_again(&mut self) {
        self.session.play_again(&mut self.timers);
        self.update_title();
        self.set_page(Page::Game);
        self.flush_game_changes();
    }

    fn show_share_page(&mut self) {
        if let Some(share_text_elem) =
            self.context.document.get_element_by_id(SHARE_TEXT_ID)
        {
            let share_text = self.session.share_text(&self.base_url());

            set_element_text(&share_text_elem, &share_text);

            self.set_element_visibility(SHARE_TEXT_COPIED_ID, false);
        }

        self.set_page(Page::Share);
    }

    fn close_share_page(&mut self) {
        self.set_page(Page::Game);
    }

    fn copy_share_text(&mut self) {
        let Some(share_text_elem) =
            self.context.document.get_element_by_id(SHARE_TEXT_ID)
            .and_then(|c| c.dyn_into::<web_sys::HtmlTextAreaElement>().ok())
        else {
            console::log_1(&"Error getting share text element".into());
            return;
        };

        share_text_elem.select();

        let copy_result = self.context.document.exec_command("copy");

        let _ = share_text_elem.set_selection_range(0, 0);

        if copy_result.is_err() {
            console::log_1(&"copy command failed".into());
        } else {
            self.set_element_visibility(SHARE_TEXT_COPIED_ID, true);
        }
    }

    fn base_url(&self) -> String {
        let Some(location) = self.context.document.location()
        else {
            return String::new();
        };

        let origin = location.origin().unwrap_or_default();
        let path_name = location.pathname().unwrap_or_default();

        origin + &path_name
    }

    fn show_game_contents(&self) {
        let _ = self.context.message.style().set_property("display", "none");
        let _ = self.game_contents.style().set_property("display", "block");
    }

    fn update_title(&self) {
        let catalog = self.session.catalog();

        set_element_text(&self.theme, self.session.word_set().theme());
        set_element_text(
            &self.set_number,
            &format!(
                "Set {} of {}",
                self.session.set_index() + 1,
                catalog.len(),
            ),
        );
    }

    fn animate_error(&self) {
        // Re-add the element to restart the shake animation
        if let Some(parent) = self.game_grid.parent_node() {
            self.game_grid.remove();
            let _ = parent.append_child(&self.game_grid);
        }
    }

    fn set_element_visibility(&self, id: &str, visibility: bool) {
        if let Some(elem) =
            self.context.document.get_element_by_id(id)
            .and_then(|c| c.dyn_into::<web_sys::HtmlElement>().ok())
        {
            set_visibility(&elem, visibility);
        }
    }

    fn set_page(&self, page: Page) {
        self.set_element_visibility("share-overlay", page == Page::Share);
    }

    fn flush_game_changes(&mut self) {
        let game = self.session.game_mut();

        let letters_changed = game.changed_letters();
        let selection_changed = game.changed_selection();

        if letters_changed {
            for (cell, letter) in self.cells.iter().zip(game.grid().letters()) {
                set_element_text(cell, &letter.to_string());
            }
        }

        if letters_changed || selection_changed {
            for (i, cell) in self.cells.iter().enumerate() {
                let selected = game.is_selected(i);

                set_class(cell, "selected", selected);
                set_class(cell, "solved", game.is_solved(i));
                set_class(cell, "error", selected && game.is_error());
            }
        }

        if let Some(elapsed) = game.changed_elapsed() {
            set_element_text(&self.timer, &share::format_time(elapsed));
        }

        if let Some(state) = game.changed_state() {
            self.update_state(state);
        }
    }

    fn update_state(&self, state: State) {
        let paused = state == State::Paused;

        set_element_text(
            &self.pause_button,
            if paused { "Resume" } else { "Pause" },
        );
        let _ = self.pause_button.set_attribute(
            "aria-label",
            if paused { "Resume" } else { "Pause" },
        );

        set_visibility(&self.paused_message, paused);
        set_visibility(&self.game_grid, !paused);

        if let Some(result) = self.session.result() {
            set_element_text(&self.result_theme, result.theme);
            set_element_text(
                &self.result_time,
                &share::format_time(result.final_time),
            );

            clear_element(&self.result_words);

            for word in result.solved_words {
                let Ok(li) = self.context.document.create_element("li")
                else {
                    continue;
                };

                set_element_text(&li, word);

                let _ = self.result_words.append_with_node_1(&li);
            }

            set_visibility(&self.result_overlay, true);
        } else {
            set_visibility(&self.result_overlay, false);
        }
    }
}

fn get_string_property(data: &JsValue, key: &str) -> Result<String, ()> {
    Reflect::get(data, &key.into())
        .map_err(|_| ())
        .and_then(|v| TryInto::<String>::try_into(v).map_err(|_| ()))
}

fn parse_word_set(data: JsValue) -> Result<WordSet, ()> {
    let Ok(id) = get_string_property(&data, "id")
    else {
        show_error("Error getting word set id");
        return Err(());
    };

    let Ok(theme) = get_string_property(&data, "theme")
    else {
        show_error("Error getting word set theme");
        return Err(());
    };

    let Ok(words_array) = Reflect::get(&data, &"words".into())
        .map_err(|_| ())
        .and_then(|v| TryInto::<js_sys::Array>::try_into(v).map_err(|_| ()))
    else {
        show_error("Error getting word list");
        return Err(());
    };

    let mut words = Vec::new();

    for word_value in words_array.iter() {
        let Ok(word) = TryInto::<String>::try_into(word_value)
        else {
            show_error("Error getting word from the list");
            return Err(());
        };

        words.push(word);
    }

    WordSet::new(&id, &theme, words).map_err(|e| {
        show_error(&format!("{}: {}", id, e));
    })
}

fn parse_catalog(data: JsValue) -> Result<Catalog, ()> {
    let Ok(word_set_array) = TryInto::<js_sys::Array>::try_into(data)
    else {
        show_error("Error getting word set array");
        return Err(());
    };

    let mut word_sets = Vec::new();

    for data in word_set_array.iter() {
        word_sets.push(parse_word_set(data)?);
    }

    Catalog::new(word_sets).map_err(|e| show_error(&e.to_string()))
}

fn clear_element(element: &web_sys::Element) {
    while let Some(child) = element.first_child() {
        let _ = element.remove_child(&child);
    }
}

fn set_element_text(element: &web_sys::Element, text: &str) {
    clear_element(element);

    if let Some(document) = element.owner_document() {
        let text = document.create_text_node(text);
        let _ = element.append_with_node_1(&text);
    }
}

fn set_visibility(element: &web_sys::HtmlElement, visibility: bool) {
    let _ = element.style().set_property(
        "display",
        if visibility { "block" } else { "none" },
    );
}

fn set_class(element: &web_sys::Element, class: &str, value: bool) {
    let class_list = element.class_list();

    if value {
        let _ = class_list.add_1(class);
    } else {
        let _ = class_list.remove_1(class);
    }
}

/// Reads the word set chosen by a shared link and then removes the query
/// from the address so that reloading picks a new puzzle.
fn take_requested_set(context: &Context) -> Option<String> {
    let location = context.document.location()?;
    let search = location.search().ok()?;

    if search.is_empty() {
        return None;
    }

    let params = web_sys::UrlSearchParams::new_with_str(&search).ok()?;
    let requested = params.get(SET_PARAM);

    match (context.window.history(), location.pathname()) {
        (Ok(history), Ok(path_name)) => {
            if history.replace_state_with_url(
                &JsValue::NULL,
                "",
                Some(&path_name),
            ).is_err() {
                console::log_1(&"Error clearing the query string".into());
            }
        },
        _ => console::log_1(&"Error getting history".into()),
    }

    requested
}

#[wasm_bindgen]
pub fn init_quizwordz() {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));

    let context = match Context::new() {
        Ok(c) => c,
        Err(e) => {
            show_error(&e);
            return;
        }
    };

    let loader = Loader::new(context);

    let floating_pointer = loader.start_floating();

    unsafe {
        (*floating_pointer).queue_data_load();
    }
}
