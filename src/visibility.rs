//! Window visibility boundary
//!
//! The recorder hides its own console window while recording so it does
//! not end up in the captured frames. The toggle is an external OS
//! capability; only Windows has a real implementation.

/// Trait for the external window-visibility capability
pub trait WindowVisibility: Send {
    fn show(&self);
    fn hide(&self);
}

/// Create the platform visibility toggle
pub fn create_window_visibility() -> Box<dyn WindowVisibility> {
    #[cfg(windows)]
    {
        Box::new(windows_impl::ConsoleVisibility)
    }
    #[cfg(not(windows))]
    {
        Box::new(NoopVisibility)
    }
}

#[cfg(not(windows))]
struct NoopVisibility;

#[cfg(not(windows))]
impl WindowVisibility for NoopVisibility {
    fn show(&self) {
        log::debug!("window visibility toggle is not supported on this platform");
    }

    fn hide(&self) {
        log::debug!("window visibility toggle is not supported on this platform");
    }
}

#[cfg(windows)]
mod windows_impl {
    use windows::Win32::System::Console::GetConsoleWindow;
    use windows::Win32::UI::WindowsAndMessaging::{ShowWindow, SW_HIDE, SW_SHOW};

    use super::WindowVisibility;

    pub struct ConsoleVisibility;

    impl WindowVisibility for ConsoleVisibility {
        fn show(&self) {
            let hwnd = unsafe { GetConsoleWindow() };
            if !hwnd.is_invalid() {
                let _ = unsafe { ShowWindow(hwnd, SW_SHOW) };
            }
        }

        fn hide(&self) {
            let hwnd = unsafe { GetConsoleWindow() };
            if !hwnd.is_invalid() {
                let _ = unsafe { ShowWindow(hwnd, SW_HIDE) };
            }
        }
    }
}
