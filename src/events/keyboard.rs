use crate::keymap::{self, Command};
use crate::session::{self, AppHandles};
use crate::{dom, editor, layer_manager, overlay, panel};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn wire_global_keydown(app: AppHandles) {
    let closure = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        if dom::is_text_entry(ev.target()) {
            return;
        }
        let ctrl = ev.ctrl_key() || ev.meta_key();
        let Some(cmd) = keymap::command_for_key(&ev.key(), ctrl) else {
            return;
        };
        if keymap::needs_debug(cmd) && !app.viewer.borrow().debug() {
            return;
        }
        ev.prevent_default();
        run_command(&app, cmd);
    }) as Box<dyn FnMut(_)>);
    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

/// Shared by the keyboard and the toolbar buttons.
pub fn run_command(app: &AppHandles, cmd: Command) {
    log::debug!("[keys] {:?}", cmd);
    let document = dom::window_document();
    let result = {
        let mut viewer = app.viewer.borrow_mut();
        match cmd {
            Command::ToggleDebug => {
                viewer.toggle_debug();
                Ok(())
            }
            Command::ToggleViewMode => {
                if !viewer.toggle_view_mode() {
                    if let Some(d) = &document {
                        overlay::toast(d, "Modo de visualização bloqueado", false);
                    }
                }
                Ok(())
            }
            Command::ToggleDrawing => viewer.toggle_drawing().map(|on| {
                log::info!("[polygon] drawing {}", if on { "on" } else { "off" });
            }),
            Command::DeleteSelected => match viewer.selected().cloned() {
                Some(id) => viewer.delete_hotspot(&id),
                None => Ok(()),
            },
            Command::DuplicateSelected => match viewer.selected().cloned() {
                Some(id) => viewer.duplicate_hotspot(&id).map(|_| ()),
                None => Ok(()),
            },
            Command::AllOffExceptDaylight => {
                viewer.turn_off_except_daylight();
                Ok(())
            }
            Command::PresetAll => {
                viewer.preset_all();
                Ok(())
            }
            Command::StopEditing => {
                viewer.stop_editing();
                Ok(())
            }
            Command::Save | Command::Export => Ok(()),
        }
    };
    match cmd {
        Command::Save => session::save(app),
        Command::Export => session::export(app),
        Command::ToggleDebug => {
            app.persist_local();
            session::refresh_panels(app);
        }
        Command::ToggleViewMode => app.persist_local(),
        Command::AllOffExceptDaylight | Command::PresetAll => {
            if let Some(d) = &document {
                panel::sync_values(d, &app.viewer.borrow());
                layer_manager::rebuild(d, app);
            }
        }
        Command::ToggleDrawing
        | Command::DeleteSelected
        | Command::DuplicateSelected
        | Command::StopEditing => {
            if let Some(d) = &document {
                editor::rebuild(d, app);
            }
        }
    }
    if let Err(e) = result {
        super::report(app, e);
    }
    app.refresh_chrome();
}
