//! The `models` command — prints the advertised model catalog.

pub fn run() {
    for model in groundcrew_providers::catalog() {
        println!("{:<22} {:<14} {}", model.id, model.name, model.description);
    }
}
