// Prevents additional console window on Windows in release
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use dx12game_proto_lib::{launch, logging, Variant};

fn main() {
    logging::init_logging();
    std::process::exit(launch(Variant::Full));
}
