fn main() {
    // Validate embedded rule tables at compile time.
    validate_json(
        "src/rules/default_forward.json",
        include_str!("src/rules/default_forward.json"),
    );
    validate_json(
        "src/rules/default_reverse.json",
        include_str!("src/rules/default_reverse.json"),
    );
}

fn validate_json(path: &str, content: &str) {
    println!("cargo:rerun-if-changed={path}");
    if serde_json::from_str::<serde_json::Value>(content).is_err() {
        panic!("{path} contains invalid JSON");
    }
}
