// This binary crate is intentionally minimal.
// All timing logic lives in the library (src/lib.rs and its modules).
// Run examples with:
//   cargo run --example trainer_sim
fn main() {
    println!("looptime: wall-clock timing breakdowns for model-based RL training loops.");
    println!("Run `cargo run --example trainer_sim` to see a simulated training run.");
    println!("Run `cargo run --bin monitor` to watch one live in the browser.");
}
