fn main() {
    if let Err(error) = sales_activity_lib::run_from_env() {
        eprintln!("{error}");
        std::process::exit(error.exit_code());
    }
}
