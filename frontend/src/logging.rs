use seed::{prelude::*, *};

pub fn debug(message: &str) {
    web_sys::console::debug_1(&format!("[frontend] {message}").into());
}

pub fn error(message: &str) {
    web_sys::console::error_1(&format!("[frontend] {message}").into());
}
