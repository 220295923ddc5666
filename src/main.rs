fn main() {
    if let Err(err) = lead_import::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
