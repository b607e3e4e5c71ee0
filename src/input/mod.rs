// input/mod.rs - Global Input Hook Boundary
//
// Raw key/mouse events are delivered by an OS-level hook on its own
// thread. Only Windows ships a real hook; on other platforms startup
// fails with a configuration error rather than silently not listening.

#[cfg(windows)]
pub mod windows;

use crossbeam_channel::Sender;

use screenreel_core::hotkeys::RawInputEvent;

/// Trait for the external global-input-hook capability
pub trait InputHook {
    /// Install the hook and begin delivering events into `events`.
    fn start(&mut self, events: Sender<RawInputEvent>) -> anyhow::Result<()>;

    /// Uninstall the hook and stop the delivery thread.
    fn stop(&mut self);
}

/// Create the platform input hook
pub fn create_input_hook() -> anyhow::Result<Box<dyn InputHook>> {
    #[cfg(windows)]
    {
        Ok(Box::new(windows::WindowsInputHook::new()))
    }

    #[cfg(not(windows))]
    {
        anyhow::bail!("global input hooks are not supported on this platform")
    }
}
