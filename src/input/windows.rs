// input/windows.rs - Win32 low-level keyboard/mouse hooks
//
// A dedicated thread installs WH_KEYBOARD_LL and WH_MOUSE_LL hooks and
// runs the message pump that services them. Hook procedures are plain C
// callbacks, so the event sender lives in process-global state. Teardown
// posts WM_QUIT to the pump thread and joins it.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use crossbeam_channel::Sender;
use lazy_static::lazy_static;

use screenreel_core::hotkeys::{Key, MouseButton, RawInputEvent};

use windows::Win32::Foundation::{LPARAM, LRESULT, WPARAM};
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    VIRTUAL_KEY, VK_CONTROL, VK_ESCAPE, VK_LCONTROL, VK_LEFT, VK_NEXT, VK_PRIOR, VK_RCONTROL,
    VK_RETURN, VK_RIGHT, VK_SPACE,
};
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, DispatchMessageW, GetMessageW, PostThreadMessageW, SetWindowsHookExW,
    TranslateMessage, UnhookWindowsHookEx, KBDLLHOOKSTRUCT, MSG, MSLLHOOKSTRUCT, WH_KEYBOARD_LL,
    WH_MOUSE_LL, WM_KEYDOWN, WM_KEYUP, WM_LBUTTONDOWN, WM_LBUTTONUP, WM_QUIT, WM_RBUTTONDOWN,
    WM_RBUTTONUP, WM_SYSKEYDOWN, WM_SYSKEYUP,
};

lazy_static! {
    static ref EVENT_SENDER: Mutex<Option<Sender<RawInputEvent>>> = Mutex::new(None);
}

pub struct WindowsInputHook {
    pump_thread_id: Arc<AtomicU32>,
    pump: Option<thread::JoinHandle<()>>,
}

impl WindowsInputHook {
    pub fn new() -> Self {
        Self {
            pump_thread_id: Arc::new(AtomicU32::new(0)),
            pump: None,
        }
    }
}

impl super::InputHook for WindowsInputHook {
    fn start(&mut self, events: Sender<RawInputEvent>) -> anyhow::Result<()> {
        *EVENT_SENDER.lock().unwrap() = Some(events);

        let thread_id = Arc::clone(&self.pump_thread_id);
        let (ready_tx, ready_rx) = crossbeam_channel::bounded(1);
        let pump = thread::Builder::new()
            .name("input-hook".into())
            .spawn(move || unsafe {
                thread_id.store(GetCurrentThreadId(), Ordering::SeqCst);

                let keyboard = SetWindowsHookExW(WH_KEYBOARD_LL, Some(keyboard_proc), None, 0);
                let mouse = SetWindowsHookExW(WH_MOUSE_LL, Some(mouse_proc), None, 0);
                let installed = keyboard.is_ok() && mouse.is_ok();
                let _ = ready_tx.send(installed);
                if !installed {
                    if let Ok(hook) = keyboard {
                        let _ = UnhookWindowsHookEx(hook);
                    }
                    if let Ok(hook) = mouse {
                        let _ = UnhookWindowsHookEx(hook);
                    }
                    return;
                }

                let mut msg = MSG::default();
                while GetMessageW(&mut msg, None, 0, 0).as_bool() {
                    let _ = TranslateMessage(&msg);
                    DispatchMessageW(&msg);
                }

                if let Ok(hook) = keyboard {
                    let _ = UnhookWindowsHookEx(hook);
                }
                if let Ok(hook) = mouse {
                    let _ = UnhookWindowsHookEx(hook);
                }
            })
            .context("failed to spawn input hook thread")?;
        self.pump = Some(pump);

        match ready_rx.recv_timeout(Duration::from_secs(5)) {
            Ok(true) => Ok(()),
            _ => {
                self.stop();
                anyhow::bail!("failed to install global keyboard/mouse hooks")
            }
        }
    }

    fn stop(&mut self) {
        let thread_id = self.pump_thread_id.load(Ordering::SeqCst);
        if thread_id != 0 {
            unsafe {
                let _ = PostThreadMessageW(thread_id, WM_QUIT, WPARAM(0), LPARAM(0));
            }
        }
        if let Some(pump) = self.pump.take() {
            let _ = pump.join();
        }
        *EVENT_SENDER.lock().unwrap() = None;
    }
}

impl Drop for WindowsInputHook {
    fn drop(&mut self) {
        use super::InputHook;
        self.stop();
    }
}

fn send_event(event: RawInputEvent) {
    if let Some(sender) = EVENT_SENDER.lock().unwrap().as_ref() {
        let _ = sender.send(event);
    }
}

fn map_key(vk_code: u32) -> Option<Key> {
    match VIRTUAL_KEY(vk_code as u16) {
        VK_CONTROL | VK_LCONTROL | VK_RCONTROL => Some(Key::Modifier),
        VK_SPACE => Some(Key::Space),
        VK_RETURN => Some(Key::Enter),
        VK_PRIOR => Some(Key::PageUp),
        VK_NEXT => Some(Key::PageDown),
        VK_LEFT => Some(Key::Left),
        VK_RIGHT => Some(Key::Right),
        VK_ESCAPE => Some(Key::Escape),
        _ => None,
    }
}

unsafe extern "system" fn keyboard_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    if code >= 0 {
        let info = &*(lparam.0 as *const KBDLLHOOKSTRUCT);
        if let Some(key) = map_key(info.vkCode) {
            let event = match wparam.0 as u32 {
                WM_KEYDOWN | WM_SYSKEYDOWN => Some(RawInputEvent::KeyDown(key)),
                WM_KEYUP | WM_SYSKEYUP => Some(RawInputEvent::KeyUp(key)),
                _ => None,
            };
            if let Some(event) = event {
                send_event(event);
            }
        }
    }
    CallNextHookEx(None, code, wparam, lparam)
}

unsafe extern "system" fn mouse_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    if code >= 0 {
        let info = &*(lparam.0 as *const MSLLHOOKSTRUCT);
        let (x, y) = (info.pt.x, info.pt.y);
        let event = match wparam.0 as u32 {
            WM_LBUTTONDOWN => Some(RawInputEvent::ButtonDown {
                button: MouseButton::Left,
                x,
                y,
            }),
            WM_LBUTTONUP => Some(RawInputEvent::ButtonUp {
                button: MouseButton::Left,
                x,
                y,
            }),
            WM_RBUTTONDOWN => Some(RawInputEvent::ButtonDown {
                button: MouseButton::Right,
                x,
                y,
            }),
            WM_RBUTTONUP => Some(RawInputEvent::ButtonUp {
                button: MouseButton::Right,
                x,
                y,
            }),
            _ => None,
        };
        if let Some(event) = event {
            send_event(event);
        }
    }
    CallNextHookEx(None, code, wparam, lparam)
}
