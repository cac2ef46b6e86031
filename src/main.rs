//! # Voxel Demos Entry Point
//!
//! Native entry point; see `run_web()` in the library for the browser.
//!
//! ```bash
//! cargo run --release -- cube
//! cargo run --release -- voxels
//! cargo run --release -- my_config.json
//! ```

fn main() {
    #[cfg(not(target_family = "wasm"))]
    if let Err(err) = voxel_demos::run() {
        log::error!("{}", err);
        std::process::exit(1);
    }
}
