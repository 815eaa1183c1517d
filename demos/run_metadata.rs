use looptime::RunMetadata;

fn main() {
    let meta = RunMetadata::collect(Some(42));

    match serde_json::to_string_pretty(&meta) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("failed to serialize metadata: {e}"),
    }

    match meta.save_json("run_metadata.json") {
        Ok(()) => println!("\nsaved to run_metadata.json"),
        Err(e) => eprintln!("failed to save metadata: {e}"),
    }
}
