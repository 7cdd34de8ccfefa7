fn main() {
    if let Err(err) = mindmark::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
