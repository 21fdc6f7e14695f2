/*
 * lib.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of Burrow, a cross-platform Gopher client.
 *
 * Burrow is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Burrow is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Burrow.  If not, see <http://www.gnu.org/licenses/>.
 */

//! C FFI for burrow core. Addresses, histories, and downloads are opaque
//! handles created and freed by this library; returned strings are owned by
//! the caller (free with burrow_string_free). All string parameters are
//! UTF-8 NUL-terminated. All calls are blocking and handles are not
//! thread-safe; drive each handle from one thread at a time.

use libc::{c_char, c_int, c_void, size_t};
use std::ffi::{CStr, CString};
use std::ptr;

use burrow_core::{Directory, FileDownload, GopherAddr, GopherError, History, Item, ItemType};

/// Wrapper so *mut c_void can be moved into Send closures. The progress
/// callback runs on whichever thread called burrow_download_start.
struct SendableUserData(*mut c_void);
unsafe impl Send for SendableUserData {}

impl SendableUserData {
    /// Accessor rather than direct field access: a closure naming only the
    /// pointer field captures a bare *mut c_void, which is not Send.
    fn get(&self) -> *mut c_void {
        self.0
    }
}

/// Download progress callback: cumulative bytes written, then user_data.
type ProgressCallback = extern "C" fn(u64, *mut c_void);

/// Error code for operations that need a live connection but found none
/// (or a disconnect of an address that was never connected).
pub const BURROW_ERR_NOT_CONNECTED: c_int = -2;

thread_local! {
    static LAST_ERROR: std::cell::RefCell<Option<CString>> = std::cell::RefCell::new(None);
}

fn set_last_error_msg(msg: &str) {
    let msg = CString::new(msg).unwrap_or_else(|_| CString::new("(error)").unwrap());
    LAST_ERROR.with(|e| *e.borrow_mut() = Some(msg));
}

fn set_last_error(err: &GopherError) {
    set_last_error_msg(&err.to_string());
}

fn clear_last_error() {
    LAST_ERROR.with(|e| *e.borrow_mut() = None);
}

fn err_code(err: &GopherError) -> c_int {
    match err {
        GopherError::NotConnected => BURROW_ERR_NOT_CONNECTED,
        _ => -1,
    }
}

fn ptr_to_str(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string()) }
}

/// Allocates a C string for the caller; interior NULs collapse to "".
fn to_c_string(s: &str) -> *mut c_char {
    CString::new(s)
        .unwrap_or_else(|_| CString::new("").unwrap())
        .into_raw()
}

unsafe fn history_item<'a>(hist: *const History, index: size_t) -> Option<&'a Item> {
    if hist.is_null() {
        return None;
    }
    (*hist).current().and_then(|d| d.items().get(index))
}

/// Version string (static, do not free).
#[no_mangle]
pub extern "C" fn burrow_version() -> *const c_char {
    b"0.1.0\0".as_ptr() as *const c_char
}

/// Last error message from a failed call on this thread. Valid until the
/// next FFI call. Do not free.
#[no_mangle]
pub extern "C" fn burrow_last_error() -> *const c_char {
    LAST_ERROR.with(|e| {
        e.borrow()
            .as_ref()
            .map(|s| s.as_ptr())
            .unwrap_or(ptr::null())
    })
}

/// Free a string returned by any burrow_* call. No-op if ptr is NULL.
#[no_mangle]
pub unsafe extern "C" fn burrow_string_free(ptr: *mut c_char) {
    if !ptr.is_null() {
        let _ = CString::from_raw(ptr);
    }
}

// ---------- Address ----------

/// Create an address. selector may be NULL for the root selector; type_char
/// is the Gopher item type code (e.g. '1' for a directory). Returns an owned
/// handle (free with burrow_addr_free), or NULL on error.
#[no_mangle]
pub unsafe extern "C" fn burrow_addr_new(
    host: *const c_char,
    port: u16,
    selector: *const c_char,
    type_char: c_char,
) -> *mut GopherAddr {
    let host = match ptr_to_str(host) {
        Some(s) => s,
        None => {
            set_last_error_msg("host is null or not valid UTF-8");
            return ptr::null_mut();
        }
    };
    let selector = ptr_to_str(selector);
    let kind = ItemType::from_char(type_char as u8 as char);
    clear_last_error();
    Box::into_raw(Box::new(GopherAddr::new(host, port, selector, kind)))
}

/// Parse a gopher:// URL (the scheme prefix is optional) into an owned
/// address handle, or NULL on error.
#[no_mangle]
pub unsafe extern "C" fn burrow_addr_parse(url: *const c_char) -> *mut GopherAddr {
    let url = match ptr_to_str(url) {
        Some(s) => s,
        None => {
            set_last_error_msg("url is null or not valid UTF-8");
            return ptr::null_mut();
        }
    };
    match GopherAddr::parse(&url) {
        Ok(addr) => {
            clear_last_error();
            Box::into_raw(Box::new(addr))
        }
        Err(e) => {
            set_last_error(&e);
            ptr::null_mut()
        }
    }
}

/// Free an address handle, closing its connection if one is open. No-op if
/// addr is NULL.
#[no_mangle]
pub unsafe extern "C" fn burrow_addr_free(addr: *mut GopherAddr) {
    if !addr.is_null() {
        let _ = Box::from_raw(addr);
    }
}

/// Host name (caller frees), or NULL if addr is NULL.
#[no_mangle]
pub unsafe extern "C" fn burrow_addr_host(addr: *const GopherAddr) -> *mut c_char {
    if addr.is_null() {
        set_last_error_msg("addr is null");
        return ptr::null_mut();
    }
    clear_last_error();
    to_c_string((*addr).host())
}

/// Port number, or 0 if addr is NULL.
#[no_mangle]
pub unsafe extern "C" fn burrow_addr_port(addr: *const GopherAddr) -> u16 {
    if addr.is_null() {
        return 0;
    }
    (*addr).port()
}

/// Selector string (caller frees). NULL means the root selector (or a NULL
/// addr; check burrow_last_error to distinguish).
#[no_mangle]
pub unsafe extern "C" fn burrow_addr_selector(addr: *const GopherAddr) -> *mut c_char {
    if addr.is_null() {
        set_last_error_msg("addr is null");
        return ptr::null_mut();
    }
    clear_last_error();
    match (*addr).selector() {
        Some(s) => to_c_string(s),
        None => ptr::null_mut(),
    }
}

/// Item type code of the address, or 0 if addr is NULL.
#[no_mangle]
pub unsafe extern "C" fn burrow_addr_type(addr: *const GopherAddr) -> c_char {
    if addr.is_null() {
        return 0;
    }
    (*addr).kind().code() as u8 as c_char
}

/// Format the address as a gopher:// URL with the given item type code, or
/// with the address's own type if type_char is 0. Caller frees.
#[no_mangle]
pub unsafe extern "C" fn burrow_addr_to_url(
    addr: *const GopherAddr,
    type_char: c_char,
) -> *mut c_char {
    if addr.is_null() {
        set_last_error_msg("addr is null");
        return ptr::null_mut();
    }
    clear_last_error();
    let url = if type_char == 0 {
        (*addr).to_url()
    } else {
        (*addr).to_url_as(ItemType::from_char(type_char as u8 as char))
    };
    to_c_string(&url)
}

/// New owned address one selector level up, or NULL when already at the
/// root (no error is set for that case).
#[no_mangle]
pub unsafe extern "C" fn burrow_addr_parent(addr: *const GopherAddr) -> *mut GopherAddr {
    if addr.is_null() {
        set_last_error_msg("addr is null");
        return ptr::null_mut();
    }
    clear_last_error();
    match (*addr).parent() {
        Some(parent) => Box::into_raw(Box::new(parent)),
        None => ptr::null_mut(),
    }
}

/// Resolve and connect. Returns 0 on success, -1 on failure (message in
/// burrow_last_error).
#[no_mangle]
pub unsafe extern "C" fn burrow_addr_connect(addr: *mut GopherAddr) -> c_int {
    if addr.is_null() {
        set_last_error_msg("addr is null");
        return -1;
    }
    match (*addr).connect() {
        Ok(()) => {
            clear_last_error();
            0
        }
        Err(e) => {
            let code = err_code(&e);
            set_last_error(&e);
            code
        }
    }
}

/// Close the connection. Returns 0 on success, BURROW_ERR_NOT_CONNECTED if
/// there was nothing to close.
#[no_mangle]
pub unsafe extern "C" fn burrow_addr_disconnect(addr: *mut GopherAddr) -> c_int {
    if addr.is_null() {
        set_last_error_msg("addr is null");
        return -1;
    }
    match (*addr).disconnect() {
        Ok(()) => {
            clear_last_error();
            0
        }
        Err(e) => {
            let code = err_code(&e);
            set_last_error(&e);
            code
        }
    }
}

/// 1 if the address has an open connection, 0 otherwise.
#[no_mangle]
pub unsafe extern "C" fn burrow_addr_is_connected(addr: *const GopherAddr) -> c_int {
    if addr.is_null() {
        return 0;
    }
    (*addr).is_connected() as c_int
}

// ---------- History ----------

/// Create an empty browsing history (free with burrow_history_free).
#[no_mangle]
pub extern "C" fn burrow_history_new() -> *mut History {
    Box::into_raw(Box::new(History::new()))
}

/// Free a history handle and every directory it holds. No-op if hist is
/// NULL.
#[no_mangle]
pub unsafe extern "C" fn burrow_history_free(hist: *mut History) {
    if !hist.is_null() {
        let _ = Box::from_raw(hist);
    }
}

/// Fetch the directory at addr and make it the current history entry,
/// discarding forward entries. Unless NULL was passed, addr is consumed
/// (even when the fetch fails) and must not be used or freed afterwards.
/// Connects the address if it is not already connected. Returns 0 on
/// success, negative on failure.
#[no_mangle]
pub unsafe extern "C" fn burrow_history_push(hist: *mut History, addr: *mut GopherAddr) -> c_int {
    if hist.is_null() || addr.is_null() {
        set_last_error_msg("hist or addr is null");
        return -1;
    }
    let addr = *Box::from_raw(addr);
    match (*hist).push(addr) {
        Ok(_) => {
            clear_last_error();
            0
        }
        Err(e) => {
            let code = err_code(&e);
            set_last_error(&e);
            code
        }
    }
}

/// Step back one entry without refetching. Returns 0 on success, -1 when
/// already at the oldest entry.
#[no_mangle]
pub unsafe extern "C" fn burrow_history_prev(hist: *mut History) -> c_int {
    if hist.is_null() {
        set_last_error_msg("hist is null");
        return -1;
    }
    match (*hist).prev() {
        Some(_) => {
            clear_last_error();
            0
        }
        None => {
            set_last_error_msg("no previous directory");
            -1
        }
    }
}

/// Step forward one entry without refetching. Returns 0 on success, -1 when
/// already at the newest entry.
#[no_mangle]
pub unsafe extern "C" fn burrow_history_next(hist: *mut History) -> c_int {
    if hist.is_null() {
        set_last_error_msg("hist is null");
        return -1;
    }
    match (*hist).next() {
        Some(_) => {
            clear_last_error();
            0
        }
        None => {
            set_last_error_msg("no next directory");
            -1
        }
    }
}

/// 1 if there is an entry before the current one.
#[no_mangle]
pub unsafe extern "C" fn burrow_history_has_prev(hist: *const History) -> c_int {
    if hist.is_null() {
        return 0;
    }
    (*hist).has_prev() as c_int
}

/// 1 if there is an entry after the current one.
#[no_mangle]
pub unsafe extern "C" fn burrow_history_has_next(hist: *const History) -> c_int {
    if hist.is_null() {
        return 0;
    }
    (*hist).has_next() as c_int
}

/// Drop every entry after the current one.
#[no_mangle]
pub unsafe extern "C" fn burrow_history_truncate_forward(hist: *mut History) {
    if !hist.is_null() {
        (*hist).truncate_forward();
    }
}

/// Drop every entry before the current one.
#[no_mangle]
pub unsafe extern "C" fn burrow_history_truncate_backward(hist: *mut History) {
    if !hist.is_null() {
        (*hist).truncate_backward();
    }
}

/// Number of items in the current directory, 0 if the history is empty.
#[no_mangle]
pub unsafe extern "C" fn burrow_history_items_count(hist: *const History) -> size_t {
    if hist.is_null() {
        return 0;
    }
    (*hist).current().map(|d| d.items_count()).unwrap_or(0)
}

/// Number of protocol defects repaired while parsing the current directory.
#[no_mangle]
pub unsafe extern "C" fn burrow_history_error_count(hist: *const History) -> u32 {
    if hist.is_null() {
        return 0;
    }
    (*hist).current().map(|d| d.error_count()).unwrap_or(0)
}

/// URL of the current directory (caller frees), or NULL if the history is
/// empty.
#[no_mangle]
pub unsafe extern "C" fn burrow_history_url(hist: *const History) -> *mut c_char {
    if hist.is_null() {
        set_last_error_msg("hist is null");
        return ptr::null_mut();
    }
    match (*hist).current() {
        Some(dir) => {
            clear_last_error();
            to_c_string(&dir.to_url())
        }
        None => {
            set_last_error_msg("history is empty");
            ptr::null_mut()
        }
    }
}

/// New owned address of the current directory's parent, or NULL when the
/// current directory is the root (no error is set for that case).
#[no_mangle]
pub unsafe extern "C" fn burrow_history_parent(hist: *const History) -> *mut GopherAddr {
    if hist.is_null() {
        set_last_error_msg("hist is null");
        return ptr::null_mut();
    }
    let dir: &Directory = match (*hist).current() {
        Some(dir) => dir,
        None => {
            set_last_error_msg("history is empty");
            return ptr::null_mut();
        }
    };
    clear_last_error();
    match dir.parent() {
        Some(parent) => Box::into_raw(Box::new(parent)),
        None => ptr::null_mut(),
    }
}

/// Item type code of the current directory's item at index, or 0 if the
/// index is out of range.
#[no_mangle]
pub unsafe extern "C" fn burrow_history_item_type(hist: *const History, index: size_t) -> c_char {
    match history_item(hist, index) {
        Some(item) => {
            clear_last_error();
            item.kind().code() as u8 as c_char
        }
        None => {
            set_last_error_msg("no such item");
            0
        }
    }
}

/// Display label of the current directory's item at index (caller frees),
/// or NULL if the index is out of range.
#[no_mangle]
pub unsafe extern "C" fn burrow_history_item_label(
    hist: *const History,
    index: size_t,
) -> *mut c_char {
    match history_item(hist, index) {
        Some(item) => {
            clear_last_error();
            to_c_string(item.label())
        }
        None => {
            set_last_error_msg("no such item");
            ptr::null_mut()
        }
    }
}

/// URL of the current directory's item at index (caller frees), or NULL if
/// the index is out of range.
#[no_mangle]
pub unsafe extern "C" fn burrow_history_item_url(
    hist: *const History,
    index: size_t,
) -> *mut c_char {
    match history_item(hist, index) {
        Some(item) => {
            clear_last_error();
            to_c_string(&item.to_url())
        }
        None => {
            set_last_error_msg("no such item");
            ptr::null_mut()
        }
    }
}

/// New owned, unconnected copy of the address of the current directory's
/// item at index (free with burrow_addr_free), or NULL if the index is out
/// of range.
#[no_mangle]
pub unsafe extern "C" fn burrow_history_item_addr(
    hist: *const History,
    index: size_t,
) -> *mut GopherAddr {
    match history_item(hist, index) {
        Some(item) => {
            clear_last_error();
            Box::into_raw(Box::new(item.addr().replicate()))
        }
        None => {
            set_last_error_msg("no such item");
            ptr::null_mut()
        }
    }
}

// ---------- Download ----------

/// Prepare a download of addr to an explicit destination path. On success
/// addr is consumed (do not use or free it); on failure NULL is returned
/// and addr is untouched. Free the handle with burrow_download_free.
#[no_mangle]
pub unsafe extern "C" fn burrow_download_setup(
    addr: *mut GopherAddr,
    type_char: c_char,
    path: *const c_char,
) -> *mut FileDownload {
    if addr.is_null() {
        set_last_error_msg("addr is null");
        return ptr::null_mut();
    }
    let path = match ptr_to_str(path) {
        Some(s) => s,
        None => {
            set_last_error_msg("path is null or not valid UTF-8");
            return ptr::null_mut();
        }
    };
    let addr = *Box::from_raw(addr);
    let kind = ItemType::from_char(type_char as u8 as char);
    clear_last_error();
    Box::into_raw(Box::new(FileDownload::setup(addr, kind, path)))
}

/// Prepare a download of addr into the system temporary directory, naming
/// the file after the selector. On success addr is consumed; on failure
/// NULL is returned and addr is untouched.
#[no_mangle]
pub unsafe extern "C" fn burrow_download_setup_temp(
    addr: *mut GopherAddr,
    type_char: c_char,
) -> *mut FileDownload {
    if addr.is_null() {
        set_last_error_msg("addr is null");
        return ptr::null_mut();
    }
    let addr = *Box::from_raw(addr);
    let kind = ItemType::from_char(type_char as u8 as char);
    clear_last_error();
    Box::into_raw(Box::new(FileDownload::setup_temp(addr, kind)))
}

/// Free a download handle. No-op if dl is NULL.
#[no_mangle]
pub unsafe extern "C" fn burrow_download_free(dl: *mut FileDownload) {
    if !dl.is_null() {
        let _ = Box::from_raw(dl);
    }
}

/// Install a progress callback, invoked with the cumulative byte count
/// after each chunk. The callback runs on the thread that calls
/// burrow_download_start; the UI marshals if it needs another thread.
#[no_mangle]
pub unsafe extern "C" fn burrow_download_set_progress(
    dl: *mut FileDownload,
    callback: ProgressCallback,
    user_data: *mut c_void,
) {
    if dl.is_null() {
        return;
    }
    let user_data = SendableUserData(user_data);
    (*dl).set_progress(move |n| callback(n, user_data.get()));
}

/// Run the transfer to completion, blocking. Returns 0 on success, negative
/// on failure (message in burrow_last_error).
#[no_mangle]
pub unsafe extern "C" fn burrow_download_start(dl: *mut FileDownload) -> c_int {
    if dl.is_null() {
        set_last_error_msg("dl is null");
        return -1;
    }
    match (*dl).download() {
        Ok(_) => {
            clear_last_error();
            0
        }
        Err(e) => {
            let code = err_code(&e);
            set_last_error(&e);
            code
        }
    }
}

/// Destination path of the download (caller frees).
#[no_mangle]
pub unsafe extern "C" fn burrow_download_path(dl: *const FileDownload) -> *mut c_char {
    if dl.is_null() {
        set_last_error_msg("dl is null");
        return ptr::null_mut();
    }
    clear_last_error();
    to_c_string(&(*dl).path().to_string_lossy())
}

/// Bytes written so far (the final size once the download completes).
#[no_mangle]
pub unsafe extern "C" fn burrow_download_size(dl: *const FileDownload) -> u64 {
    if dl.is_null() {
        return 0;
    }
    (*dl).size()
}

/// File name component of the destination path (caller frees), or NULL if
/// the path has none.
#[no_mangle]
pub unsafe extern "C" fn burrow_download_basename(dl: *const FileDownload) -> *mut c_char {
    if dl.is_null() {
        set_last_error_msg("dl is null");
        return ptr::null_mut();
    }
    clear_last_error();
    match (*dl).path().file_name() {
        Some(name) => to_c_string(&name.to_string_lossy()),
        None => ptr::null_mut(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    extern "C" fn record_progress(n: u64, user_data: *mut c_void) {
        unsafe {
            *(user_data as *mut u64) = n;
        }
    }

    #[test]
    fn download_progress_reaches_c_callback() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().expect("local_addr").port();
        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept");
            let mut byte = [0u8; 1];
            while let Ok(1) = stream.read(&mut byte) {
                if byte[0] == b'\n' {
                    break;
                }
            }
            stream.write_all(b"payload bytes").expect("write");
        });

        let host = CString::new("127.0.0.1").expect("host");
        let selector = CString::new("/file.bin").expect("selector");
        let dest = std::env::temp_dir().join(format!("burrow_ffi_{}.bin", std::process::id()));
        let path = CString::new(dest.to_str().expect("utf-8 path")).expect("path");

        let mut last: u64 = 0;
        unsafe {
            let addr = burrow_addr_new(host.as_ptr(), port, selector.as_ptr(), '9' as c_char);
            assert!(!addr.is_null());
            let dl = burrow_download_setup(addr, '9' as c_char, path.as_ptr());
            assert!(!dl.is_null());
            burrow_download_set_progress(
                dl,
                record_progress,
                &mut last as *mut u64 as *mut c_void,
            );
            assert_eq!(burrow_download_start(dl), 0);
            assert_eq!(burrow_download_size(dl), 13);
            burrow_download_free(dl);
        }
        assert_eq!(last, 13);
        assert_eq!(
            std::fs::read(&dest).expect("read back"),
            b"payload bytes"
        );
        std::fs::remove_file(&dest).ok();
        server.join().expect("server");
    }
}
