mod api;
mod controller;
mod dom;
mod form;
mod render;

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("Budget predictor starting...");

    if let Err(e) = dom::mount() {
        log::error!("Failed to mount prediction form: {}", e);
    }
}
