//! User32.dll bindings for window responsiveness checks

use winapi::shared::basetsd::DWORD_PTR;
use winapi::shared::minwindef::{BOOL, DWORD, FALSE, LPARAM, TRUE};
use winapi::shared::windef::HWND;
use winapi::um::winuser::{
    EnumWindows, GetWindow, GetWindowThreadProcessId, IsWindowVisible, SendMessageTimeoutW,
    GW_OWNER, SMTO_ABORTIFHUNG, WM_NULL,
};

/// Milliseconds a window has to answer before it counts as hung
pub const RESPONSE_TIMEOUT_MS: u32 = 5000;

struct WindowSearch {
    pid: DWORD,
    windows: Vec<HWND>,
}

unsafe extern "system" fn collect_main_windows(hwnd: HWND, lparam: LPARAM) -> BOOL {
    let search = &mut *(lparam as *mut WindowSearch);

    let mut owner_pid: DWORD = 0;
    GetWindowThreadProcessId(hwnd, &mut owner_pid);
    if owner_pid == search.pid
        && GetWindow(hwnd, GW_OWNER).is_null()
        && IsWindowVisible(hwnd) != FALSE
    {
        search.windows.push(hwnd);
    }
    TRUE
}

/// Visible, unowned top-level windows of `pid`, in z-order
pub fn main_windows(pid: u32) -> Vec<HWND> {
    let mut search = WindowSearch {
        pid,
        windows: Vec::new(),
    };
    unsafe {
        EnumWindows(
            Some(collect_main_windows),
            &mut search as *mut WindowSearch as LPARAM,
        );
    }
    search.windows
}

/// Sends `WM_NULL` and reports whether the window answered in time
pub fn window_responds(hwnd: HWND, timeout_ms: u32) -> bool {
    let mut result: DWORD_PTR = 0;
    let sent = unsafe {
        SendMessageTimeoutW(
            hwnd,
            WM_NULL,
            0,
            0,
            SMTO_ABORTIFHUNG,
            timeout_ms,
            &mut result,
        )
    };
    sent != 0
}

/// Whether the main window of `pid` answers messages. A process without a
/// window is always responding.
pub fn is_process_responding(pid: u32) -> bool {
    main_windows(pid)
        .first()
        .map_or(true, |&hwnd| window_responds(hwnd, RESPONSE_TIMEOUT_MS))
}
