fn main() {
    if let Err(err) = progress_grid::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
