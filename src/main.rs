fn main() {
    if let Err(err) = pizza_sales::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
