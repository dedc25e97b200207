#![cfg_attr(not(any(target_arch = "wasm32", test)), allow(dead_code))]

mod config;
mod contact;
mod cursor;
mod dispatch;
mod filter;
mod interaction;
mod logging;
mod reveal;
mod scroll_effects;
mod timing;
mod view;

#[cfg(target_arch = "wasm32")]
mod contact_form;
#[cfg(target_arch = "wasm32")]
mod frontend;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("These page effects run in the browser. Run `trunk serve` or `trunk build --release`.");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    frontend::run();
}
